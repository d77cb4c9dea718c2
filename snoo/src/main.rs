//! snoo - command-line access to the reddit API through libsnoo

use std::io::BufRead;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use libsnoo::config::{default_session_path, ClientConfig};
use libsnoo::{Client, Fullname, Listing, Page, Result, SnooError, Sort};

#[derive(Parser, Debug)]
#[command(name = "snoo")]
#[command(version, about = "Talk to the reddit API from the command line")]
#[command(long_about = r#"Talk to the reddit API from the command line.

EXAMPLES:
    # Log in once; the session is saved for later commands
    snoo login alice

    # Who am I?
    snoo whoami

    # Newest links in a subreddit, as JSON
    snoo links rust --sort new --limit 5 --format json

    # Find subreddits
    snoo search programming

    # Any read operation by name
    snoo raw user alice

EXIT CODES:
    0 - Success
    1 - Network, HTTP or service error
    2 - Login required or credentials rejected
    3 - Invalid input
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (overrides SNOO_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and save the session
    Login {
        user: String,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Show the logged-in account
    Whoami,

    /// List links in a subreddit
    Links {
        subreddit: String,

        /// hot, new, rising, top or controversial
        #[arg(short, long, default_value = "hot")]
        sort: String,

        /// Fullname cursor to continue after
        #[arg(long)]
        after: Option<String>,

        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Search subreddits
    Search { query: String },

    /// Run a read operation by name and print the raw data
    Raw {
        operation: String,

        /// Positional path arguments
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    libsnoo::logging::from_env(cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    let config = match path {
        Some(path) => ClientConfig::load_from_path(path)?,
        None => ClientConfig::load()?,
    };

    if config.session_file.is_some() {
        return Ok(config);
    }
    let session = default_session_path()?;
    Ok(config.with_session_file(session.to_string_lossy()))
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;
    let mut client = Client::new(config)?;
    client.load_session(None)?;

    let json = cli.format == "json";

    match cli.command {
        Commands::Login {
            user,
            password_stdin,
        } => {
            let password = read_password(&user, password_stdin)?;
            client.login(&user, &password).await?;
            client.save_session(None)?;
            if let Some(path) = client.session().path() {
                tracing::info!("Session saved to {}", path.display());
            }
            println!("Logged in as {}", user);
        }
        Commands::Whoami => {
            let me = client.me().await?;
            if json {
                print_json(&me)?;
            } else {
                println!(
                    "{} ({} link karma, {} comment karma)",
                    me.name, me.link_karma, me.comment_karma
                );
            }
        }
        Commands::Links {
            subreddit,
            sort,
            after,
            limit,
        } => {
            let sort: Sort = sort.parse()?;
            let page = Page {
                after,
                before: None,
                limit,
            };
            let listing = client.fetch_links(&subreddit, sort, &page).await?;
            print_links(&listing, json)?;
        }
        Commands::Search { query } => {
            let found = client.find_subreddits(&query).await?;
            if json {
                print_json(&found)?;
            } else {
                for subreddit in found {
                    println!("r/{}\t{}", subreddit.display_name, subreddit.title);
                }
            }
        }
        Commands::Raw { operation, args } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let operation: libsnoo::Operation = operation.parse()?;
            if operation.verb() != libsnoo::Verb::Get {
                return Err(SnooError::InvalidInput(format!(
                    "raw only runs read operations; '{}' is a {}",
                    operation,
                    operation.verb()
                )));
            }
            let payload = client.call(operation, &args, None).await?;
            print_json(&payload.into_data())?;
        }
    }

    Ok(())
}

fn read_password(user: &str, from_stdin: bool) -> Result<String> {
    if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }
    Ok(rpassword::prompt_password(format!("Password for {}: ", user))?)
}

fn print_links(listing: &Listing, json: bool) -> Result<()> {
    if json {
        return print_json(listing);
    }
    for link in listing.links() {
        println!("{:>6}  {}  ({})", link.score, link.title, link.fullname());
    }
    if let Some(after) = &listing.after {
        println!("next page: --after {}", after);
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| SnooError::InvalidInput(format!("failed to encode output: {}", e)))?;
    println!("{}", text);
    Ok(())
}
