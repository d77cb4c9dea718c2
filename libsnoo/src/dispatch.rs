//! Turning a logical operation into a concrete request
//!
//! GET requests get a `.json` suffix and carry `data` in the query string.
//! POST requests carry `data` as a form body with `api_type=json` forced in,
//! plus `modhash`/`uh` when the session is authenticated. Authenticated
//! requests of either verb send the session cookie.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::operation::{Operation, Verb};
use crate::query::{self, Params};
use crate::request::{self, Request};
use crate::session::Session;

pub const SESSION_COOKIE: &str = "reddit_session";

/// Build the request for `operation` without sending it
pub fn build_request(
    config: &ClientConfig,
    session: &Session,
    operation: Operation,
    path_args: &[&str],
    data: Option<&Params>,
) -> Result<Request> {
    let path = operation.path(path_args)?;
    let base = config.base_url.trim_end_matches('/');

    let mut request = match operation.verb() {
        Verb::Get => {
            let mut url = format!("{}{}.json", base, path);
            if let Some(data) = data.filter(|d| !d.is_empty()) {
                url.push('?');
                url.push_str(&query::encode(data));
            }
            Request::new(Verb::Get, url)
        }
        Verb::Post => {
            let mut body = data.cloned().unwrap_or_default();
            body.insert("api_type".to_string(), "json".to_string());
            if let Some(modhash) = session.modhash() {
                body.insert("modhash".to_string(), modhash.to_string());
                body.insert("uh".to_string(), modhash.to_string());
            }
            Request::new(Verb::Post, format!("{}{}", base, path))
                .with_header(request::CONTENT_TYPE, request::FORM_CONTENT_TYPE)
                .with_body(query::encode(&body))
        }
    };

    request
        .headers
        .insert(request::USER_AGENT.to_string(), config.user_agent());

    if let Some(cookie) = session.cookie() {
        request.headers.insert(
            request::COOKIE.to_string(),
            format!("{}={}", SESSION_COOKIE, cookie),
        );
    }

    Ok(request)
}
