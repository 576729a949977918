//! Turns an `Endpoint` into a `WireRequest`.
//!
//! # Design
//! Building is pure: no I/O and no shared state, so the same endpoint always
//! yields the same request. Every failure is a `BuildError` and surfaces
//! before the dispatcher touches the registry or the network.

use std::time::Duration;

use url::Url;

use crate::encoding::{encode_parameters, CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::endpoint::{Endpoint, HttpTask};
use crate::error::BuildError;
use crate::http::{set_header, Headers, HttpMethod, WireRequest};

/// Request and resource timeout applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// A request in progress, mutated by the parameter encoder.
#[derive(Debug, Clone)]
pub struct RequestDraft {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

impl RequestDraft {
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn finish(self) -> WireRequest {
        WireRequest {
            method: self.method,
            url: self.url.into(),
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Build the wire request for `endpoint`.
pub fn build_request(endpoint: &Endpoint) -> Result<WireRequest, BuildError> {
    let url = endpoint_url(&endpoint.base_url, &endpoint.path)?;
    let mut draft = RequestDraft::new(endpoint.method, url);
    for (name, value) in &endpoint.headers {
        set_header(&mut draft.headers, name, value);
    }

    match &endpoint.task {
        HttpTask::Plain => {
            set_header(&mut draft.headers, CONTENT_TYPE, JSON_CONTENT_TYPE);
        }
        HttpTask::Parameters {
            body,
            encoding,
            url,
        } => {
            encode_parameters(&mut draft, body.as_ref(), *encoding, url.as_ref())?;
        }
        HttpTask::ParametersAndHeaders {
            body,
            encoding,
            url,
            headers,
        } => {
            for (name, value) in headers {
                set_header(&mut draft.headers, name, value);
            }
            encode_parameters(&mut draft, body.as_ref(), *encoding, url.as_ref())?;
        }
    }

    Ok(draft.finish())
}

/// Join `base` and `path` with exactly one separating slash.
fn endpoint_url(base: &str, path: &str) -> Result<Url, BuildError> {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let raw = if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    };
    Url::parse(&raw).map_err(|e| BuildError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })
}
