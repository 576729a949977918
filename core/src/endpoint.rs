//! Declarative endpoint descriptors.
//!
//! An `Endpoint` says where a request goes and what it carries; the builder
//! turns it into a `WireRequest`. Descriptors are plain values the caller
//! creates per request.

use serde_json::{Map, Value};

use crate::http::{Headers, HttpMethod};

/// Key/value parameter set for bodies and query strings.
pub type Parameters = Map<String, Value>;

/// How body parameters are attached to the request.
///
/// URL parameters are always appended to the query string; this only
/// selects what happens to body parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterEncoding {
    /// Serialize as a JSON object body (`application/json`).
    #[default]
    JsonBody,
    /// Serialize as an `application/x-www-form-urlencoded` body.
    FormBody,
    /// Append to the URL query string.
    UrlQuery,
}

/// What a request carries besides its URL and method.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HttpTask {
    /// No parameters; the request is sent with a JSON content type.
    #[default]
    Plain,

    Parameters {
        body: Option<Parameters>,
        encoding: ParameterEncoding,
        url: Option<Parameters>,
    },

    /// Like `Parameters`, with extra headers merged in before encoding.
    ParametersAndHeaders {
        body: Option<Parameters>,
        encoding: ParameterEncoding,
        url: Option<Parameters>,
        headers: Headers,
    },
}

/// Caller-supplied description of one HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub base_url: String,
    pub path: String,
    pub method: HttpMethod,
    pub headers: Headers,
    pub task: HttpTask,
}

impl Endpoint {
    pub fn new(base_url: &str, path: &str, method: HttpMethod) -> Self {
        Self {
            base_url: base_url.to_string(),
            path: path.to_string(),
            method,
            headers: Headers::new(),
            task: HttpTask::Plain,
        }
    }

    pub fn get(base_url: &str, path: &str) -> Self {
        Self::new(base_url, path, HttpMethod::Get)
    }

    pub fn post(base_url: &str, path: &str) -> Self {
        Self::new(base_url, path, HttpMethod::Post)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        crate::http::set_header(&mut self.headers, name, value);
        self
    }

    pub fn with_task(mut self, task: HttpTask) -> Self {
        self.task = task;
        self
    }
}
