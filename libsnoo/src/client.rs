//! The client: session, configuration and transport behind one handle
//!
//! # Examples
//!
//! ```no_run
//! use libsnoo::{Client, ClientConfig};
//! use std::path::Path;
//!
//! # async fn example() -> libsnoo::error::Result<()> {
//! let mut client = Client::new(ClientConfig::default().with_user_agent("my-bot/0.1"))?;
//!
//! if !client.load_session(Some(Path::new("session.json")))? {
//!     client.login("alice", "hunter2").await?;
//!     client.save_session(Some(Path::new("session.json")))?;
//! }
//!
//! let me = client.me().await?;
//! println!("logged in as {}", me.name);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::dispatch::build_request;
use crate::envelope::{self, Payload};
use crate::error::{Result, SnooError};
use crate::operation::Operation;
use crate::query::{self, Params};
use crate::session::{AuthState, Session};
use crate::transport::http::HttpTransport;
use crate::transport::Transport;

/// Credentials returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    pub modhash: String,
    pub cookie: String,
}

pub struct Client {
    config: ClientConfig,
    session: Session,
    transport: Box<dyn Transport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("state", &self.session.state())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client that talks HTTP to `config.base_url`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client over any transport
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        let session = config
            .session_path()
            .map(Session::with_path)
            .unwrap_or_default();

        Self {
            config,
            session,
            transport: Box::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn state(&self) -> AuthState {
        self.session.state()
    }

    pub fn require_login(&self) -> Result<()> {
        self.session.require_login()
    }

    /// Install credentials obtained elsewhere, e.g. from another process
    pub fn set_credentials(&mut self, modhash: impl Into<String>, cookie: impl Into<String>) {
        self.session.set_credentials(modhash, cookie);
    }

    /// Load a saved session from `path`, or from the configured session file.
    ///
    /// Returns `Ok(false)` when the file does not exist yet.
    pub fn load_session(&mut self, path: Option<&Path>) -> Result<bool> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self
                .session
                .path()
                .map(Path::to_path_buf)
                .ok_or(SnooError::MissingPath)?,
        };
        self.session.load(path)
    }

    /// Save the session to `path`, or to the remembered/configured file
    pub fn save_session(&mut self, path: Option<&Path>) -> Result<()> {
        self.session.save(path)
    }

    /// Perform one API call and decode its response.
    ///
    /// No login guard is applied here; the typed operations check
    /// `require_login` themselves before calling this.
    pub async fn call(
        &self,
        operation: Operation,
        path_args: &[&str],
        data: Option<&Params>,
    ) -> Result<Payload> {
        let request = build_request(&self.config, &self.session, operation, path_args, data)?;

        tracing::debug!("{} {} ({})", request.verb, request.url, operation);

        // Login carries the password out and the session cookie back
        let log_bodies = self.config.debug && operation != Operation::Login;
        if log_bodies {
            if let Some(body) = &request.body {
                tracing::debug!("request body: {}", body);
            }
        }

        let raw = self.transport.send(&request).await?;

        if log_bodies {
            tracing::debug!("response body: {}", raw);
        }

        envelope::decode(&raw)
    }

    /// Like [`Client::call`], looking the operation up by name
    pub async fn call_named(
        &self,
        name: &str,
        path_args: &[&str],
        data: Option<&Params>,
    ) -> Result<Payload> {
        let operation = Operation::from_name(name)?;
        self.call(operation, path_args, data).await
    }

    /// Authenticate with a username and password.
    ///
    /// On success the session holds the returned modhash and cookie. On
    /// failure the session is left as it was.
    ///
    /// # Errors
    ///
    /// - `SnooError::InvalidCredentials` when the service rejects the login
    /// - `SnooError::MalformedResponse` when a success response lacks the
    ///   modhash or cookie
    pub async fn login(&mut self, user: &str, password: &str) -> Result<LoginResult> {
        tracing::debug!("Logging in as {}", user);

        let data = query::params([("user", user), ("passwd", password)]);
        let payload = self
            .call(Operation::Login, &[user], Some(&data))
            .await
            .map_err(|e| match e {
                SnooError::Api(errors) => SnooError::InvalidCredentials(errors),
                other => other,
            })?;

        let result: LoginResult = payload.decode()?;
        self.session
            .set_credentials(result.modhash.clone(), result.cookie.clone());
        tracing::info!("Logged in as {}", user);

        Ok(result)
    }
}
