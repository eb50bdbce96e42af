use crate::client::LookupError;
use crate::domain::{ErrorCode, KnownErrorCode};
use crate::normalize::LookupStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
/// User-facing description of a failed lookup.
pub struct FailureReport {
    pub status: LookupStatus,
    pub message: String,
    pub details: String,
    pub code: Option<ErrorCode>,
    pub more_info: Option<String>,
}

fn message_for_code(code: KnownErrorCode) -> (&'static str, LookupStatus) {
    match code {
        KnownErrorCode::ResourceNotFound => ("Number not found", LookupStatus::Inactive),
        KnownErrorCode::InvalidPhoneNumber => ("Invalid phone number", LookupStatus::Invalid),
        KnownErrorCode::AuthenticationFailed => (
            "Authentication error with the lookup provider",
            LookupStatus::Error,
        ),
        KnownErrorCode::UnsupportedCountry => (
            "Lookup not available for this country",
            LookupStatus::Unsupported,
        ),
        KnownErrorCode::UnsupportedNumberType => (
            "This type of number cannot be validated",
            LookupStatus::Invalid,
        ),
        KnownErrorCode::TooManyRequests => (
            "Too many requests to the lookup provider",
            LookupStatus::Error,
        ),
    }
}

/// Map a lookup failure to a message and status. Provider codes win over HTTP statuses.
pub fn normalize_error(error: &LookupError) -> FailureReport {
    let mut report = FailureReport {
        status: LookupStatus::Error,
        message: "Lookup failed".to_owned(),
        details: match error {
            LookupError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        },
        code: error.code(),
        more_info: error.more_info().map(str::to_owned),
    };

    if let Some(known) = error.code().and_then(ErrorCode::known) {
        let (message, status) = message_for_code(known);
        report.message = message.to_owned();
        report.status = status;
        return report;
    }

    match error.http_status() {
        Some(400) => {
            report.message = "Invalid request parameters".to_owned();
            report.details = format!("Error 400: {}", report.details);
        }
        Some(401) => {
            report.message = "Unauthorized - check your credentials".to_owned();
        }
        Some(404) => {
            report.message = "Resource not found".to_owned();
            report.status = LookupStatus::Inactive;
        }
        _ => {}
    }
    report
}
