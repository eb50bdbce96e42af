use serde::Deserialize;

use crate::domain::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Provider error envelope returned with non-2xx statuses.
pub struct ApiErrorBody {
    pub code: Option<ErrorCode>,
    pub message: Option<String>,
    pub more_info: Option<String>,
    pub status: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorJson {
    #[serde(default)]
    code: Option<i32>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    more_info: Option<String>,
    #[serde(default)]
    status: Option<u16>,
}

/// Decode the error envelope. Returns `None` for bodies that are not JSON objects or carry
/// neither a code nor a message.
pub fn decode_api_error(json: &str) -> Option<ApiErrorBody> {
    let parsed: ApiErrorJson = serde_json::from_str(json).ok()?;
    if parsed.code.is_none() && parsed.message.is_none() {
        return None;
    }
    Some(ApiErrorBody {
        code: parsed.code.map(ErrorCode::new),
        message: parsed.message,
        more_info: parsed.more_info,
        status: parsed.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_full_envelope() {
        let json = r#"
        {
          "code": 20404,
          "message": "The requested resource /PhoneNumbers/+1999 was not found",
          "more_info": "https://www.twilio.com/docs/errors/20404",
          "status": 404
        }
        "#;

        let body = decode_api_error(json).unwrap();
        assert_eq!(body.code, Some(ErrorCode::new(20404)));
        assert_eq!(body.status, Some(404));
        assert_eq!(
            body.more_info.as_deref(),
            Some("https://www.twilio.com/docs/errors/20404")
        );
    }

    #[test]
    fn decode_rejects_html_and_empty_objects() {
        assert!(decode_api_error("<html>Bad Gateway</html>").is_none());
        assert!(decode_api_error("{}").is_none());
        assert!(decode_api_error(r#"{"status": 500}"#).is_none());
    }
}
