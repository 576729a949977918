//! High-level client: dispatch, wait, classify.
//!
//! # Design
//! `ApiClient` wires a `Dispatcher` to a `ResponseParser`. Each call
//! resolves to `Some(result)` exactly once, or to `None` when the request
//! was cancelled through [`ApiClient::cancel`]. When the connectivity probe
//! reports the network as down, the request is never handed to the
//! executor.

use serde::de::DeserializeOwned;
use tokio::runtime::Handle;

use crate::config::ClientConfig;
use crate::connectivity::{AlwaysOnline, Connectivity};
use crate::dispatcher::Dispatcher;
use crate::endpoint::Endpoint;
use crate::executor::{HttpExecutor, UreqExecutor};
use crate::http::RawOutcome;
use crate::parser::{no_connection, ResponseParser};
use crate::result::ClassifiedResult;

pub struct ApiClient<E, C = AlwaysOnline> {
    dispatcher: Dispatcher<E>,
    parser: ResponseParser<C>,
    config: ClientConfig,
}

impl ApiClient<UreqExecutor, AlwaysOnline> {
    /// Client over the default `ureq` executor, configured from the
    /// environment.
    pub fn with_runtime(runtime: Handle) -> Self {
        Self::new(UreqExecutor::new(), AlwaysOnline, ClientConfig::from_env(), runtime)
    }
}

impl<E: HttpExecutor, C: Connectivity> ApiClient<E, C> {
    pub fn new(executor: E, connectivity: C, config: ClientConfig, runtime: Handle) -> Self {
        Self {
            dispatcher: Dispatcher::new(executor, runtime),
            parser: ResponseParser::new(connectivity, config.key_decoding),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher<E> {
        &self.dispatcher
    }

    /// Send `endpoint` and decode a successful body as `T`.
    pub async fn request<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Option<ClassifiedResult<T>> {
        match self.fetch(endpoint).await? {
            Ok(outcome) => Some(self.parser.parse(&outcome)),
            Err(offline) => Some(offline),
        }
    }

    /// Send `endpoint` and decode a successful body as a
    /// `ResponseEnvelope<T>`, yielding its `data`.
    pub async fn request_envelope<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
    ) -> Option<ClassifiedResult<T>> {
        match self.fetch(endpoint).await? {
            Ok(outcome) => Some(self.parser.parse_envelope(&outcome)),
            Err(offline) => Some(offline),
        }
    }

    /// Cancel every in-flight request. Their futures resolve to `None`.
    pub fn cancel(&self) {
        self.dispatcher.cancel();
    }

    pub fn is_requesting(&self) -> bool {
        self.dispatcher.is_requesting()
    }

    async fn fetch<T>(&self, endpoint: &Endpoint) -> Option<Result<RawOutcome, ClassifiedResult<T>>> {
        if !self.parser.connectivity().is_network_available() {
            return Some(Err(ClassifiedResult::Client(no_connection())));
        }
        self.dispatcher
            .send(endpoint, self.config.log_requests)
            .outcome()
            .await
            .map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::ConnectivityFlag;
    use crate::http::WireRequest;
    use crate::result::{ClientErrorKind, ServerError};
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    fn client_with<F>(executor: F, connectivity: ConnectivityFlag) -> ApiClient<F, ConnectivityFlag>
    where
        F: Fn(WireRequest) -> RawOutcome + Send + Sync + 'static,
    {
        ApiClient::new(executor, connectivity, ClientConfig::default(), Handle::current())
    }

    #[tokio::test]
    async fn offline_requests_never_reach_the_executor() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let client = client_with(
            move |_req| {
                counter.fetch_add(1, Ordering::SeqCst);
                RawOutcome::response(200, Some(br#"{"id": 1}"#.to_vec()))
            },
            ConnectivityFlag::new(false),
        );

        let result = client
            .request::<Item>(&Endpoint::get("http://localhost:1", "items/1"))
            .await
            .unwrap();
        match result {
            ClassifiedResult::Client(e) => assert_eq!(e.kind, ClientErrorKind::NoConnection),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!client.is_requesting());
    }

    #[tokio::test]
    async fn envelope_request_yields_data() {
        let client = client_with(
            |_req| RawOutcome::response(200, Some(br#"{"data": {"id": 1}, "error": false}"#.to_vec())),
            ConnectivityFlag::default(),
        );
        let result = client
            .request_envelope::<Item>(&Endpoint::get("http://localhost:1", "items/1"))
            .await;
        assert_eq!(result, Some(ClassifiedResult::Success(Item { id: 1 })));
    }

    #[tokio::test]
    async fn server_failures_are_classified() {
        let client = client_with(
            |_req| RawOutcome::response(404, Some(b"<html>missing</html>".to_vec())),
            ConnectivityFlag::default(),
        );
        let result = client
            .request::<Item>(&Endpoint::get("http://localhost:1", "items/2"))
            .await;
        assert_eq!(
            result,
            Some(ClassifiedResult::Server(ServerError {
                title: "user not found".to_string(),
                message: "user not found".to_string(),
                status: 404,
            }))
        );
    }

    #[tokio::test]
    async fn build_failures_become_client_errors() {
        let client = client_with(|_req| RawOutcome::response(200, None), ConnectivityFlag::default());
        let result = client.request::<Item>(&Endpoint::get("nope", "x")).await.unwrap();
        match result {
            ClassifiedResult::Client(e) => assert_eq!(e.kind, ClientErrorKind::MalformedUrl),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
