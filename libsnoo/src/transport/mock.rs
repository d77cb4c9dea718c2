//! Mock transport for testing
//!
//! Records every request it is asked to send and answers from a script of
//! canned responses. Clones share the same script and request log, so a
//! test can keep one handle while the client owns another.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Result, SnooError};
use crate::request::Request;
use crate::transport::Transport;

/// One scripted answer
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// `200 OK` with this body
    Body(String),
    /// Non-success status line, e.g. `"503 Service Unavailable"`
    Status(String),
    /// No response at all
    NetworkFailure(String),
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that answers the given bodies in order
    pub fn with_bodies<I, S>(bodies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let transport = Self::new();
        for body in bodies {
            transport.push_body(body);
        }
        transport
    }

    pub fn push(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn push_body(&self, body: impl Into<String>) {
        self.push(MockResponse::Body(body.into()));
    }

    pub fn push_status(&self, status: impl Into<String>) {
        self.push(MockResponse::Status(status.into()));
    }

    /// Get all requests that were sent
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<Request> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Get the number of times send was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &Request) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Status(status)) => Err(SnooError::Transport { status }),
            Some(MockResponse::NetworkFailure(message)) => Err(SnooError::network(message)),
            None => Err(SnooError::network(format!(
                "mock transport has no response scripted for {} {}",
                request.verb, request.url
            ))),
        }
    }
}
