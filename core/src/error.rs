//! Error types raised before or during transport.
//!
//! # Design
//! `BuildError` covers everything that can go wrong while turning an
//! endpoint into a `WireRequest`; it always fires before any network call.
//! `TransportError` is what an executor reports when no usable HTTP response
//! came back. Both travel inside `RawOutcome` as a `RequestError` so the
//! parser sees a single error slot, like a platform completion handler.
//! Terminal, caller-facing failures live in `crate::result` instead.

use thiserror::Error;

/// Failure to build a wire request from an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The base URL plus path did not form a valid absolute URL.
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The parameters could not be serialized for the chosen encoding.
    #[error("parameter encoding failed: {0}")]
    Encoding(String),
}

/// Coarse classification of transport failures, modelled on platform
/// URL-loading error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The operation was cancelled before it finished.
    Cancelled,
    /// The request or resource timeout elapsed.
    TimedOut,
    /// The URL was rejected by the transport.
    BadUrl,
    /// The host could not be resolved or connected to.
    CannotConnect,
    /// The transport failed without a more specific reason.
    Unknown,
    /// Any other transport failure (I/O, protocol, body read).
    Other,
}

/// A failure reported by the HTTP execution context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == TransportErrorKind::Cancelled
    }
}

/// The error slot of a `RawOutcome`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl RequestError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RequestError::Transport(e) if e.is_cancelled())
    }
}
