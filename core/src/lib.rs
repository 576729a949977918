//! HTTP request dispatch core.
//!
//! # Overview
//! Turns declarative `Endpoint` descriptors into wire requests, runs them
//! on a pluggable executor while tracking every in-flight request in a
//! cancellable registry, and classifies each outcome into exactly one
//! `ClassifiedResult`: a decoded payload, a local `ClientError`, or a
//! `ServerError`.
//!
//! # Design
//! - Building (`builder`, `encoding`) and parsing (`classify`, `decode`,
//!   `parser`) are pure; only the `executor` touches the network.
//! - `Dispatcher` owns an injected `TaskRegistry`; there is no global state.
//! - Outcomes are delivered once, by callback or future; a cancelled
//!   request delivers nothing.
//! - Diagnostics go through `tracing`; the crate never installs a
//!   subscriber.

pub mod builder;
pub mod classify;
pub mod client;
pub mod config;
pub mod connectivity;
pub mod decode;
pub mod dispatcher;
pub mod encoding;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod http;
pub mod logger;
pub mod parser;
pub mod registry;
pub mod result;
pub mod types;

pub use builder::{build_request, REQUEST_TIMEOUT};
pub use classify::{classify, FailureReason, Verdict};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use connectivity::{AlwaysOnline, Connectivity, ConnectivityFlag};
pub use decode::{decode, DecodeError, DecodeErrorKind, KeyDecoding};
pub use dispatcher::{Dispatcher, PendingRequest};
pub use encoding::parameters;
pub use endpoint::{Endpoint, HttpTask, ParameterEncoding, Parameters};
pub use error::{BuildError, RequestError, TransportError, TransportErrorKind};
pub use executor::{HttpExecutor, UreqExecutor};
pub use http::{Headers, HttpMethod, RawOutcome, WireRequest};
pub use parser::ResponseParser;
pub use registry::{TaskHandle, TaskId, TaskRegistry};
pub use result::{ClassifiedResult, ClientError, ClientErrorKind, ServerError};
pub use types::{Pagination, ResponseEnvelope};
