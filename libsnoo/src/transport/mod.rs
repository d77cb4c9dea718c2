//! Transport abstraction
//!
//! A transport sends one fully built [`Request`] and returns the raw
//! response body. It knows nothing about operations, sessions or envelopes.
//!
//! # Examples
//!
//! ```no_run
//! use libsnoo::config::ClientConfig;
//! use libsnoo::operation::Verb;
//! use libsnoo::request::Request;
//! use libsnoo::transport::{http::HttpTransport, Transport};
//!
//! # async fn example() -> libsnoo::error::Result<()> {
//! let transport = HttpTransport::new(&ClientConfig::default())?;
//! let body = transport
//!     .send(&Request::new(Verb::Get, "https://www.reddit.com/r/rust.json"))
//!     .await?;
//! println!("{} bytes", body.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::request::Request;

pub mod http;

// Available for all builds so integration tests and embedders can use it
pub mod mock;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the response body.
    ///
    /// # Errors
    ///
    /// `SnooError::Transport` when the service answers with a non-success
    /// status (the error carries the status line) or when no response was
    /// received at all (`network error: ...`)
    async fn send(&self, request: &Request) -> Result<String>;
}
