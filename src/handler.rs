//! HTTP endpoint logic: CORS, method checks, body parsing and response shaping.

use chrono::{SecondsFormat, Utc};
use http::{Method, Response, StatusCode, header};
use serde::Serialize;
use serde_json::{Value, json};

use crate::client::{FailedAttempt, LookupClient, LookupOutcome};
use crate::domain::LookupRequest;
use crate::normalize::{FailureReport, LookupStatus, normalize_error, normalize_lookup};

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
];

const ENCODE_FAILURE_BODY: &str = r#"{"success":false,"error":"Failed to encode response"}"#;

/// Fields read from the request body. Anything that is not an object reads as empty.
#[derive(Debug, Default)]
struct LookupRequestBody {
    number: Option<String>,
    country: Option<String>,
}

impl LookupRequestBody {
    fn from_json(value: &Value) -> Self {
        Self {
            number: value.get("number").and_then(scalar_to_string),
            country: value.get("country").and_then(scalar_to_string),
        }
    }
}

/// Strings pass through; numbers are accepted for `number` as clients often send digits.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuccessBody {
    success: bool,
    status: LookupStatus,
    number: String,
    valid: Option<bool>,
    line_type: String,
    carrier: String,
    country: String,
    method: String,
    timestamp: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fallback_attempts: Vec<AttemptBody>,
    raw_data: Value,
}

#[derive(Debug, Serialize)]
struct AttemptBody {
    method: String,
    error: String,
}

impl From<FailedAttempt> for AttemptBody {
    fn from(value: FailedAttempt) -> Self {
        Self {
            method: value.method.to_string(),
            error: value.error,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureBody {
    success: bool,
    status: LookupStatus,
    error: String,
    details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    more_info: Option<String>,
    timestamp: String,
}

impl FailureBody {
    fn new(report: FailureReport) -> Self {
        Self {
            success: false,
            status: report.status,
            error: report.message,
            details: report.details,
            code: report.code.map(|code| code.as_i32()),
            more_info: report.more_info,
            timestamp: timestamp(),
        }
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn respond(status: StatusCode, body: String) -> Result<Response<String>, http::Error> {
    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json");
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }
    builder.body(body)
}

fn respond_json(
    status: StatusCode,
    body: &impl Serialize,
) -> Result<Response<String>, http::Error> {
    match serde_json::to_string(body) {
        Ok(body) => respond(status, body),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode response body");
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                ENCODE_FAILURE_BODY.to_owned(),
            )
        }
    }
}

fn respond_error(status: StatusCode, error: &str) -> Result<Response<String>, http::Error> {
    respond_json(
        status,
        &ErrorBody {
            success: false,
            error,
        },
    )
}

/// The subset of the provider payload echoed back for debugging.
fn raw_data(raw: &Value) -> Value {
    json!({
        "phoneNumber": raw.get("phone_number"),
        "nationalFormat": raw.get("national_format"),
        "countryCode": raw.get("country_code"),
        "valid": raw.get("valid"),
        "lineTypeIntelligence": raw.get("line_type_intelligence"),
        "carrier": raw.get("carrier"),
    })
}

/// Handles lookup requests. Holds no client when credentials are missing, so every `POST`
/// answers with a configuration error instead of the function failing to start.
#[derive(Debug, Clone)]
pub struct LookupHandler {
    client: Option<LookupClient>,
}

impl LookupHandler {
    pub fn new(client: Option<LookupClient>) -> Self {
        Self { client }
    }

    pub async fn handle(
        &self,
        method: &Method,
        body: &[u8],
    ) -> Result<Response<String>, http::Error> {
        if method == Method::OPTIONS {
            return respond(StatusCode::OK, String::new());
        }
        if method != Method::POST {
            return respond_error(
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed. Use POST.",
            );
        }

        let Some(client) = &self.client else {
            tracing::error!("lookup credentials not configured");
            return respond_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Lookup credentials not configured in environment variables",
            );
        };

        let parsed = match serde_json::from_slice::<Value>(body) {
            Ok(value) => LookupRequestBody::from_json(&value),
            Err(err) => {
                tracing::warn!(error = %err, "request body is not valid JSON");
                return respond_error(StatusCode::BAD_REQUEST, "Request body must be valid JSON");
            }
        };

        let Some(number) = parsed.number.as_deref().filter(|it| !it.trim().is_empty()) else {
            return respond_error(StatusCode::BAD_REQUEST, "Phone number is required");
        };

        let request = match LookupRequest::from_input(number, parsed.country.as_deref()) {
            Ok(request) => request,
            Err(err) => return respond_error(StatusCode::BAD_REQUEST, &err.to_string()),
        };

        tracing::info!(number = request.number().raw(), "lookup request");

        match client.lookup(&request).await {
            Ok(outcome) => respond_json(StatusCode::OK, &success_body(&request, outcome)),
            Err(err) => {
                tracing::error!(
                    error = %err,
                    code = err.code().map(|code| code.as_i32()),
                    status = err.http_status(),
                    more_info = err.more_info(),
                    "lookup failed"
                );
                // 200 so the frontend can render the failure.
                respond_json(StatusCode::OK, &FailureBody::new(normalize_error(&err)))
            }
        }
    }
}

fn success_body(request: &LookupRequest, outcome: LookupOutcome) -> SuccessBody {
    let normalized = normalize_lookup(&outcome.lookup);
    tracing::info!(
        status = %normalized.status,
        method = %normalized.method,
        line_type = %normalized.line_type,
        "lookup succeeded"
    );

    SuccessBody {
        success: true,
        status: normalized.status,
        number: normalized
            .number
            .unwrap_or_else(|| request.number().raw().to_owned()),
        valid: normalized.valid,
        line_type: normalized.line_type,
        carrier: normalized.carrier,
        country: normalized.country,
        method: normalized.method.to_string(),
        timestamp: timestamp(),
        fallback_attempts: outcome
            .failed_attempts
            .into_iter()
            .map(AttemptBody::from)
            .collect(),
        raw_data: raw_data(&outcome.lookup.raw),
    }
}
