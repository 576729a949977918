//! HTTP execution context.
//!
//! # Design
//! Executors are blocking: `execute` performs one round-trip and returns
//! whatever came back. The dispatcher runs them on tokio's blocking pool,
//! so any number of requests proceed in parallel without the executor
//! knowing about async at all. Non-2xx statuses are data, not errors; only
//! a missing response becomes a `TransportError`.

use std::io;

use tracing::debug;

use crate::builder::REQUEST_TIMEOUT;
use crate::error::{TransportError, TransportErrorKind};
use crate::http::{HttpMethod, RawOutcome, WireRequest};

/// Performs one HTTP round-trip.
pub trait HttpExecutor: Send + Sync + 'static {
    fn execute(&self, request: WireRequest) -> RawOutcome;
}

impl<F> HttpExecutor for F
where
    F: Fn(WireRequest) -> RawOutcome + Send + Sync + 'static,
{
    fn execute(&self, request: WireRequest) -> RawOutcome {
        self(request)
    }
}

/// `HttpExecutor` backed by a `ureq` agent.
///
/// Status codes are never turned into errors, and both the per-call and
/// the response-wait timeouts are pinned to [`REQUEST_TIMEOUT`].
#[derive(Debug, Clone)]
pub struct UreqExecutor {
    agent: ureq::Agent,
}

impl UreqExecutor {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .timeout_recv_response(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpExecutor for UreqExecutor {
    fn execute(&self, request: WireRequest) -> RawOutcome {
        let url = request.url.as_str();
        let headers = &request.headers;
        let body = request.body.as_deref();

        let sent = match (request.method, body) {
            (HttpMethod::Get, None) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
            // Body-less methods still carry a body when the endpoint encoded one.
            (HttpMethod::Get, Some(body)) => {
                with_headers(self.agent.get(url), headers).force_send_body().send(body)
            }
            (HttpMethod::Delete, Some(body)) => {
                with_headers(self.agent.delete(url), headers).force_send_body().send(body)
            }
            (HttpMethod::Post, body) => {
                with_headers(self.agent.post(url), headers).send(body.unwrap_or_default())
            }
            (HttpMethod::Put, body) => {
                with_headers(self.agent.put(url), headers).send(body.unwrap_or_default())
            }
            (HttpMethod::Patch, body) => {
                with_headers(self.agent.patch(url), headers).send(body.unwrap_or_default())
            }
        };

        let mut response = match sent {
            Ok(response) => response,
            Err(e) => {
                debug!(method = %request.method, url, error = %e, "transport failure");
                return RawOutcome::failed(transport_error(e));
            }
        };

        let status = response.status().as_u16();
        match response.body_mut().read_to_vec() {
            Ok(bytes) => RawOutcome::response(status, Some(bytes)),
            Err(e) => RawOutcome {
                body: None,
                status: Some(status),
                error: Some(transport_error(e).into()),
            },
        }
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn transport_error(error: ureq::Error) -> TransportError {
    let kind = match &error {
        ureq::Error::Timeout(_) => TransportErrorKind::TimedOut,
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => TransportErrorKind::BadUrl,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportErrorKind::CannotConnect,
        ureq::Error::Io(e) => io_error_kind(e),
        _ => TransportErrorKind::Other,
    };
    TransportError::new(kind, error.to_string())
}

fn io_error_kind(error: &io::Error) -> TransportErrorKind {
    match error.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportErrorKind::TimedOut,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected => TransportErrorKind::CannotConnect,
        _ => TransportErrorKind::Unknown,
    }
}
