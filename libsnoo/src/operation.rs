//! The table of logical API operations
//!
//! Every call the client makes is one of these variants. Each variant knows
//! its HTTP verb and its path template; templates use `%s` for positional
//! arguments supplied at the call site.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SnooError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Me,
    Info,
    Search,
    Login,
    Submit,
    Comment,
    Vote,
    Save,
    Unsave,
    Hide,
    Unhide,
    Subreddits,
    Links,
    FrontPage,
    Comments,
    User,
}

impl Operation {
    pub const ALL: [Operation; 16] = [
        Operation::Me,
        Operation::Info,
        Operation::Search,
        Operation::Login,
        Operation::Submit,
        Operation::Comment,
        Operation::Vote,
        Operation::Save,
        Operation::Unsave,
        Operation::Hide,
        Operation::Unhide,
        Operation::Subreddits,
        Operation::Links,
        Operation::FrontPage,
        Operation::Comments,
        Operation::User,
    ];

    pub fn verb(&self) -> Verb {
        match self {
            Operation::Me
            | Operation::Info
            | Operation::Search
            | Operation::Subreddits
            | Operation::Links
            | Operation::FrontPage
            | Operation::Comments
            | Operation::User => Verb::Get,
            Operation::Login
            | Operation::Submit
            | Operation::Comment
            | Operation::Vote
            | Operation::Save
            | Operation::Unsave
            | Operation::Hide
            | Operation::Unhide => Verb::Post,
        }
    }

    pub fn path_template(&self) -> &'static str {
        match self {
            Operation::Me => "/api/me",
            Operation::Info => "/by_id/%s",
            Operation::Search => "/reddits/search",
            Operation::Login => "/api/login/%s",
            Operation::Submit => "/api/submit",
            Operation::Comment => "/api/comment",
            Operation::Vote => "/api/vote",
            Operation::Save => "/api/save",
            Operation::Unsave => "/api/unsave",
            Operation::Hide => "/api/hide",
            Operation::Unhide => "/api/unhide",
            Operation::Subreddits => "/reddits/%s",
            Operation::Links => "/r/%s/%s",
            Operation::FrontPage => "/%s",
            Operation::Comments => "/comments/%s",
            Operation::User => "/user/%s/about",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Me => "me",
            Operation::Info => "info",
            Operation::Search => "search",
            Operation::Login => "login",
            Operation::Submit => "submit",
            Operation::Comment => "comment",
            Operation::Vote => "vote",
            Operation::Save => "save",
            Operation::Unsave => "unsave",
            Operation::Hide => "hide",
            Operation::Unhide => "unhide",
            Operation::Subreddits => "subreddits",
            Operation::Links => "links",
            Operation::FrontPage => "front_page",
            Operation::Comments => "comments",
            Operation::User => "user",
        }
    }

    /// Look up an operation by its name, e.g. `"vote"`
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name() == name)
            .ok_or_else(|| SnooError::UnknownOperation(name.to_string()))
    }

    /// Number of `%s` placeholders in the path template
    pub fn arity(&self) -> usize {
        self.path_template().matches("%s").count()
    }

    /// Fill the path template positionally with `args`
    pub fn path(&self, args: &[&str]) -> Result<String> {
        let template = self.path_template();
        let expected = self.arity();
        if args.len() != expected {
            return Err(SnooError::PathArguments {
                expected,
                given: args.len(),
            });
        }

        for arg in args {
            self.check_path_arg(arg)?;
        }

        let mut path = String::with_capacity(template.len());
        let mut args = args.iter();
        let mut pieces = template.split("%s").peekable();
        while let Some(piece) = pieces.next() {
            path.push_str(piece);
            if pieces.peek().is_some() {
                if let Some(arg) = args.next() {
                    path.push_str(arg);
                }
            }
        }

        Ok(path)
    }
}

impl Operation {
    // Arguments are spliced into the path verbatim, so they must not be able
    // to add segments, a query or a fragment. `subreddits` takes nested
    // directory names like `mine/subscriber`.
    fn check_path_arg(&self, arg: &str) -> Result<()> {
        let nested = matches!(self, Operation::Subreddits);
        let valid = !arg.is_empty()
            && arg.split('/').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ',' | '+'))
            })
            && (nested || !arg.contains('/'));

        if valid {
            Ok(())
        } else {
            Err(SnooError::InvalidInput(format!(
                "invalid path argument for {}: '{}'",
                self, arg
            )))
        }
    }
}

impl FromStr for Operation {
    type Err = SnooError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
