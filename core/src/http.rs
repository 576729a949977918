//! Wire-level HTTP types shared by the builder, dispatcher and parser.
//!
//! # Design
//! These types describe requests and outcomes as plain data. The builder
//! produces a `WireRequest` without touching the network; an `HttpExecutor`
//! turns it into a `RawOutcome`; the parser consumes the outcome. All fields
//! use owned types so values can move freely between threads.

use std::fmt;

use crate::error::RequestError;

/// Header set used by endpoints and wire requests.
///
/// Kept as an ordered list so rendering is stable. Names are unique
/// case-insensitively; use [`set_header`] to insert.
pub type Headers = Vec<(String, String)>;

/// Insert or replace a header, matching names case-insensitively.
pub fn set_header(headers: &mut Headers, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

/// Look up a header value by case-insensitive name.
pub fn header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built HTTP request described as plain data.
///
/// Produced by [`crate::builder::build_request`]. Once handed to the
/// dispatcher it is moved into the executor and never mutated again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

/// The raw result of executing one `WireRequest`.
///
/// Mirrors what a platform HTTP stack hands back: any combination of body
/// bytes, status code and error. `status` is `None` when no HTTP response
/// was received at all.
#[derive(Debug, Clone, Default)]
pub struct RawOutcome {
    pub body: Option<Vec<u8>>,
    pub status: Option<u16>,
    pub error: Option<RequestError>,
}

impl RawOutcome {
    /// An outcome carrying a received HTTP response.
    pub fn response(status: u16, body: Option<Vec<u8>>) -> Self {
        Self {
            body: body.filter(|b| !b.is_empty()),
            status: Some(status),
            error: None,
        }
    }

    /// An outcome carrying only an error.
    pub fn failed(error: impl Into<RequestError>) -> Self {
        Self {
            body: None,
            status: None,
            error: Some(error.into()),
        }
    }

    /// Body bytes, treating an empty body the same as a missing one.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref().filter(|b| !b.is_empty())
    }
}
