//! Diagnostic dumps of outgoing requests and failed responses.
//!
//! Rendering never fails: bodies are decoded as lossy UTF-8 and an
//! unparsable URL simply renders empty components.

use std::fmt::Write;

use tracing::{debug, warn};
use url::Url;

use crate::http::{header, WireRequest};

/// Render `request` the way it would appear on the wire.
pub fn render_request(request: &WireRequest) -> String {
    let parsed = Url::parse(&request.url).ok();
    let path = parsed.as_ref().map(Url::path).unwrap_or_default();
    let query = parsed.as_ref().and_then(Url::query).unwrap_or_default();
    let host = parsed.as_ref().and_then(Url::host_str).unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "\n - - - - - - - - - - OUTGOING - - - - - - - - - - \n");
    let _ = writeln!(out, "{}\n", request.url);
    let _ = writeln!(out, "{} {path}?{query} HTTP/1.1", request.method);
    let _ = writeln!(out, "HOST: {host}");
    for (name, value) in &request.headers {
        let _ = writeln!(out, "{name}: {value}");
    }
    if let Some(body) = &request.body {
        let _ = writeln!(out, "\n{}", String::from_utf8_lossy(body));
    }
    if let Some(cookies) = header(&request.headers, "Cookie") {
        let _ = writeln!(out, "\ncookies: {cookies}");
    }
    out.push_str("\n - - - - - - - - - -  END - - - - - - - - - - \n");
    out
}

/// Dump an outgoing request at debug level.
pub fn log_request(request: &WireRequest) {
    debug!("{}", render_request(request));
}

/// Dump the raw body and status of a response that did not succeed.
pub fn log_failure(body: Option<&[u8]>, error: Option<&dyn std::error::Error>, status: Option<u16>) {
    let body = body.map(String::from_utf8_lossy).unwrap_or_default();
    let error = error.map(ToString::to_string).unwrap_or_else(|| "none".to_string());
    warn!(
        status = status.unwrap_or(0),
        "Data: {body} \n Error: {error} \n Code: {}",
        status.unwrap_or(0)
    );
}
