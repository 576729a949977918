//! Turns a `RawOutcome` into a `ClassifiedResult`.
//!
//! # Design
//! Parsing is a short pipeline where the first step that produces a result
//! wins:
//!
//! 1. local errors: no connectivity, then any build/transport error;
//! 2. a missing HTTP response;
//! 3. the status verdict, which either decodes the body or builds a
//!    `ServerError` from it.
//!
//! Logging along the way is best-effort and never changes the result.

use serde::de::DeserializeOwned;
use tracing::{debug, error, Level};

use crate::classify::{classify, FailureReason, Verdict};
use crate::connectivity::Connectivity;
use crate::decode::{decode, json_object, server_message, KeyDecoding};
use crate::error::{BuildError, RequestError, TransportErrorKind};
use crate::http::RawOutcome;
use crate::logger::log_failure;
use crate::result::{ClassifiedResult, ClientError, ClientErrorKind, ServerError};
use crate::types::ResponseEnvelope;

pub const NO_CONNECTION_TITLE: &str = "Нет соединения";
pub const NO_CONNECTION_MESSAGE: &str = "Попробовать снова";
pub const PARSER_ERROR_TITLE: &str = "Ошибка парсера";
pub const NO_DATA_TITLE: &str = "no data";
pub const LOCAL_ERROR_TITLE: &str = "local error";

/// Classifies raw outcomes, decoding successful bodies as JSON.
#[derive(Debug, Clone)]
pub struct ResponseParser<C> {
    connectivity: C,
    keys: KeyDecoding,
}

impl<C: Connectivity> ResponseParser<C> {
    pub fn new(connectivity: C, keys: KeyDecoding) -> Self {
        Self { connectivity, keys }
    }

    pub fn connectivity(&self) -> &C {
        &self.connectivity
    }

    /// Classify `outcome`, decoding a successful body as `T`.
    pub fn parse<T: DeserializeOwned>(&self, outcome: &RawOutcome) -> ClassifiedResult<T> {
        if let Some(local) = self.local_error(outcome) {
            return ClassifiedResult::Client(local);
        }

        let Some(status) = outcome.status else {
            return ClassifiedResult::Client(ClientError::new(
                ClientErrorKind::Unclassified,
                FailureReason::Failed.as_str(),
                "no response received",
            ));
        };

        match classify(status) {
            Verdict::Success => self.decode_success(outcome.body()),
            Verdict::Failure(reason) => {
                ClassifiedResult::Server(server_error(outcome.body(), status, reason))
            }
        }
    }

    /// Classify `outcome`, decoding a `ResponseEnvelope<T>` and yielding its
    /// `data`.
    pub fn parse_envelope<T: DeserializeOwned>(&self, outcome: &RawOutcome) -> ClassifiedResult<T> {
        self.parse::<ResponseEnvelope<T>>(outcome).map(|envelope| envelope.data)
    }

    /// Local failure for `outcome`, if any: no connectivity first, then
    /// whatever error the outcome carries.
    pub fn local_error(&self, outcome: &RawOutcome) -> Option<ClientError> {
        if !self.connectivity.is_network_available() {
            return Some(no_connection());
        }
        outcome.error.as_ref().map(client_error_for)
    }

    fn decode_success<T: DeserializeOwned>(&self, body: Option<&[u8]>) -> ClassifiedResult<T> {
        let Some(body) = body else {
            return ClassifiedResult::Client(ClientError::new(
                ClientErrorKind::ParseFailure,
                NO_DATA_TITLE,
                "",
            ));
        };

        if tracing::enabled!(Level::DEBUG) {
            if let Some(object) = json_object(body) {
                debug!("RESPONSE: {}", serde_json::Value::Object(object));
            }
        }

        match decode::<T>(body, self.keys) {
            Ok(value) => ClassifiedResult::Success(value),
            Err(e) => {
                error!(kind = %e.kind, path = e.path.as_deref().unwrap_or(""), "could not decode response: {}", e.description);
                log_failure(Some(body), Some(&e), None);
                ClassifiedResult::Client(ClientError::new(
                    ClientErrorKind::ParseFailure,
                    PARSER_ERROR_TITLE,
                    e.description,
                ))
            }
        }
    }
}

/// The `ClientError` reported when the network is unavailable.
pub fn no_connection() -> ClientError {
    ClientError::new(
        ClientErrorKind::NoConnection,
        NO_CONNECTION_TITLE,
        NO_CONNECTION_MESSAGE,
    )
}

fn client_error_for(err: &RequestError) -> ClientError {
    let (kind, title) = match err {
        RequestError::Transport(t) => match t.kind {
            TransportErrorKind::TimedOut => (ClientErrorKind::Timeout, FailureReason::Outdated.as_str()),
            TransportErrorKind::Unknown => (ClientErrorKind::Unclassified, FailureReason::Failed.as_str()),
            TransportErrorKind::BadUrl => (ClientErrorKind::MalformedUrl, FailureReason::BadRequest.as_str()),
            _ => (ClientErrorKind::Unclassified, LOCAL_ERROR_TITLE),
        },
        RequestError::Build(BuildError::InvalidUrl { .. }) => {
            (ClientErrorKind::MalformedUrl, FailureReason::BadRequest.as_str())
        }
        RequestError::Build(BuildError::Encoding(_)) => (ClientErrorKind::Unclassified, LOCAL_ERROR_TITLE),
    };
    ClientError::new(kind, title, err.to_string())
}

fn server_error(body: Option<&[u8]>, status: u16, reason: FailureReason) -> ServerError {
    log_failure(body, None, Some(status));
    let title = body
        .and_then(server_message)
        .unwrap_or_else(|| reason.as_str().to_string());
    ServerError {
        title,
        message: reason.as_str().to_string(),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::{AlwaysOnline, ConnectivityFlag};
    use crate::error::TransportError;
    use crate::types::Pagination;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    fn parser() -> ResponseParser<AlwaysOnline> {
        ResponseParser::new(AlwaysOnline, KeyDecoding::ConvertFromSnakeCase)
    }

    fn response(status: u16, body: &str) -> RawOutcome {
        RawOutcome::response(status, Some(body.as_bytes().to_vec()))
    }

    fn transport(kind: TransportErrorKind) -> RawOutcome {
        RawOutcome::failed(TransportError::new(kind, "transport said no"))
    }

    #[test]
    fn success_body_is_dumped_at_debug_level() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || {
            parser().parse::<Item>(&response(200, r#"{"id": 3}"#))
        });
        assert_eq!(result, ClassifiedResult::Success(Item { id: 3 }));
    }

    #[test]
    fn envelope_payload_is_unwrapped() {
        let outcome = response(200, r#"{"data": {"id": 1}, "error": false}"#);
        assert_eq!(parser().parse_envelope::<Item>(&outcome), ClassifiedResult::Success(Item { id: 1 }));
    }

    #[test]
    fn plain_payload_decodes() {
        let outcome = response(201, r#"{"id": 5}"#);
        assert_eq!(parser().parse::<Item>(&outcome), ClassifiedResult::Success(Item { id: 5 }));
    }

    #[test]
    fn redirect_307_is_decoded_as_success() {
        let outcome = response(307, r#"{"id": 9}"#);
        assert!(parser().parse::<Item>(&outcome).is_success());
    }

    #[test]
    fn not_found_without_body_uses_reason() {
        let result = parser().parse::<Item>(&RawOutcome::response(404, None));
        assert_eq!(
            result,
            ClassifiedResult::Server(ServerError {
                title: "user not found".to_string(),
                message: "user not found".to_string(),
                status: 404,
            })
        );
    }

    #[test]
    fn not_found_with_any_body_is_a_server_error() {
        for body in [r#"{"data": {"id": 1}}"#, "<html/>", r#"{"message": 3}"#] {
            match parser().parse::<Item>(&response(404, body)) {
                ClassifiedResult::Server(e) => {
                    assert_eq!(e.status, 404);
                    assert_eq!(e.title, "user not found");
                }
                other => panic!("unexpected result for {body}: {other:?}"),
            }
        }
    }

    #[test]
    fn server_message_overrides_reason_title() {
        let result = parser().parse::<Item>(&response(401, r#"{"message": "Token expired"}"#));
        match result {
            ClassifiedResult::Server(e) => {
                assert_eq!(e.title, "Token expired");
                assert_eq!(e.message, "authentication error");
                assert_eq!(e.status, 401);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn bad_gateway_without_body_uses_reason() {
        match parser().parse::<Item>(&RawOutcome::response(502, None)) {
            ClassifiedResult::Server(e) => assert_eq!(e.title, "bad request"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_success_body_is_no_data() {
        let result = parser().parse::<Item>(&response(200, ""));
        assert_eq!(
            result,
            ClassifiedResult::Client(ClientError::new(ClientErrorKind::ParseFailure, "no data", ""))
        );
    }

    #[test]
    fn undecodable_body_is_a_parse_failure() {
        match parser().parse::<Item>(&response(200, r#"{"name": "x"}"#)) {
            ClassifiedResult::Client(e) => {
                assert_eq!(e.kind, ClientErrorKind::ParseFailure);
                assert_eq!(e.title, "Ошибка парсера");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn offline_wins_over_everything() {
        let flag = ConnectivityFlag::new(false);
        let parser = ResponseParser::new(flag, KeyDecoding::ConvertFromSnakeCase);
        let result = parser.parse::<Item>(&response(200, r#"{"id": 1}"#));
        assert_eq!(result, ClassifiedResult::Client(no_connection()));
    }

    #[test]
    fn transport_errors_map_to_client_kinds() {
        let cases = [
            (TransportErrorKind::TimedOut, ClientErrorKind::Timeout, "outdated"),
            (TransportErrorKind::Unknown, ClientErrorKind::Unclassified, "network request failed"),
            (TransportErrorKind::BadUrl, ClientErrorKind::MalformedUrl, "bad request"),
            (TransportErrorKind::CannotConnect, ClientErrorKind::Unclassified, "local error"),
            (TransportErrorKind::Other, ClientErrorKind::Unclassified, "local error"),
        ];
        for (transport_kind, kind, title) in cases {
            match parser().parse::<Item>(&transport(transport_kind)) {
                ClassifiedResult::Client(e) => {
                    assert_eq!(e.kind, kind, "{transport_kind:?}");
                    assert_eq!(e.title, title, "{transport_kind:?}");
                    assert_eq!(e.message, "transport said no");
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn transport_error_wins_over_status() {
        let mut outcome = response(200, r#"{"id": 1}"#);
        outcome.error = Some(TransportError::new(TransportErrorKind::Other, "body read failed").into());
        assert!(!parser().parse::<Item>(&outcome).is_success());
    }

    #[test]
    fn build_errors_are_local() {
        let outcome = RawOutcome::failed(BuildError::InvalidUrl {
            url: "x".to_string(),
            reason: "relative URL without a base".to_string(),
        });
        match parser().parse::<Item>(&outcome) {
            ClassifiedResult::Client(e) => assert_eq!(e.kind, ClientErrorKind::MalformedUrl),
            other => panic!("unexpected result: {other:?}"),
        }

        let outcome = RawOutcome::failed(BuildError::Encoding("nope".to_string()));
        match parser().parse::<Item>(&outcome) {
            ClassifiedResult::Client(e) => assert_eq!(e.kind, ClientErrorKind::Unclassified),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_response_is_reported() {
        match parser().parse::<Item>(&RawOutcome::default()) {
            ClassifiedResult::Client(e) => {
                assert_eq!(e.kind, ClientErrorKind::Unclassified);
                assert_eq!(e.title, "network request failed");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn envelope_of_pagination_uses_key_conversion() {
        let outcome = response(
            200,
            r#"{"data": {"total_items": 3, "current_page": 1, "has_more_pages": false,
                "has_pages": false, "last_page": 1, "per_page": 10}, "error": false, "code": 200}"#,
        );
        let page = parser().parse_envelope::<Pagination>(&outcome).success().unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.per_page, 10);
    }
}
