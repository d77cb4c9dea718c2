//! libsnoo - client library for the reddit HTTP API
//!
//! Logs in with the cookie + modhash scheme, sends requests for a closed set
//! of API operations, unwraps the service's `{"json": {"errors", "data"}}`
//! envelope into typed results, and decodes listings into plain records.

pub mod api;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod models;
pub mod operation;
pub mod query;
pub mod request;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use api::{Page, Sort, SubredditListing, VoteDirection};
pub use client::{Client, LoginResult};
pub use config::ClientConfig;
pub use envelope::Payload;
pub use error::{ErrorList, Result, SnooError};
pub use models::{Account, Comment, Fullname, Link, Listing, Subreddit, Thing};
pub use operation::{Operation, Verb};
pub use session::{AuthState, Session};
