//! Caller-facing request results.
//!
//! # Design
//! Every dispatched, non-cancelled request ends in exactly one
//! `ClassifiedResult`. Local failures (connectivity, transport, decoding)
//! and server failures (non-2xx responses) are separate variants because
//! callers usually handle them differently: the first is retried or shown
//! as "check your connection", the second carries the server's own words.

use std::fmt;

/// What kind of local failure produced a `ClientError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientErrorKind {
    Timeout,
    NoConnection,
    MalformedUrl,
    ParseFailure,
    Unclassified,
}

/// A failure detected on this side of the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    pub title: String,
    pub message: String,
    pub kind: ClientErrorKind,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.message)
        }
    }
}

impl std::error::Error for ClientError {}

/// A failure reported by the server through a non-success status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    pub title: String,
    pub message: String,
    pub status: u16,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.title)
    }
}

impl std::error::Error for ServerError {}

/// Terminal state of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedResult<T> {
    Success(T),
    Client(ClientError),
    Server(ServerError),
}

impl<T> ClassifiedResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ClassifiedResult::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            ClassifiedResult::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ClassifiedResult<U> {
        match self {
            ClassifiedResult::Success(value) => ClassifiedResult::Success(f(value)),
            ClassifiedResult::Client(e) => ClassifiedResult::Client(e),
            ClassifiedResult::Server(e) => ClassifiedResult::Server(e),
        }
    }
}
