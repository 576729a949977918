//! Status-code classification.

use std::fmt;

/// Why a response counts as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    UserNotFound,
    AuthenticationError,
    BadRequest,
    Outdated,
    Failed,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureReason::UserNotFound => "user not found",
            FailureReason::AuthenticationError => "authentication error",
            FailureReason::BadRequest => "bad request",
            FailureReason::Outdated => "outdated",
            FailureReason::Failed => "network request failed",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failure(FailureReason),
}

/// Map an HTTP status code to a verdict. Arms are checked in order.
pub fn classify(status: u16) -> Verdict {
    match status {
        200..=299 => Verdict::Success,
        404 => Verdict::Failure(FailureReason::UserNotFound),
        307 => Verdict::Success,
        401..=500 => Verdict::Failure(FailureReason::AuthenticationError),
        501..=599 => Verdict::Failure(FailureReason::BadRequest),
        600 => Verdict::Failure(FailureReason::Outdated),
        _ => Verdict::Failure(FailureReason::Failed),
    }
}
