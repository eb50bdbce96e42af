use serde::Deserialize;

use super::TransportError;
use crate::domain::{ErrorCode, LineTypeInfo, LookupMethod, ProviderLookup};

pub const LINE_TYPE_INTELLIGENCE: &str = "line_type_intelligence";

#[derive(Debug, Clone, Deserialize)]
struct LookupV2JsonResponse {
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    national_format: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    calling_country_code: Option<String>,
    #[serde(default)]
    valid: Option<bool>,
    #[serde(default)]
    validation_errors: Option<Vec<String>>,
    #[serde(default)]
    line_type_intelligence: Option<LineTypeIntelligenceJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct LineTypeIntelligenceJson {
    #[serde(default, rename = "type")]
    line_type: Option<String>,
    #[serde(default)]
    carrier_name: Option<String>,
    #[serde(default)]
    mobile_country_code: Option<String>,
    #[serde(default)]
    mobile_network_code: Option<String>,
    #[serde(default)]
    error_code: Option<i32>,
}

pub fn decode_lookup_v2_json_response(
    method: LookupMethod,
    json: &str,
) -> Result<ProviderLookup, TransportError> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    let parsed: LookupV2JsonResponse = serde_json::from_value(raw.clone())?;

    Ok(ProviderLookup {
        method,
        phone_number: parsed.phone_number,
        national_format: parsed.national_format,
        country_code: parsed.country_code,
        calling_country_code: parsed.calling_country_code,
        valid: parsed.valid,
        validation_errors: parsed.validation_errors.unwrap_or_default(),
        line_type: parsed.line_type_intelligence.map(|lti| LineTypeInfo {
            line_type: lti.line_type,
            carrier_name: lti.carrier_name,
            mobile_country_code: lti.mobile_country_code,
            mobile_network_code: lti.mobile_network_code,
            error_code: lti.error_code.map(ErrorCode::new),
        }),
        raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reads_line_type_intelligence() {
        let json = r#"
        {
          "calling_country_code": "1",
          "country_code": "US",
          "phone_number": "+14159929960",
          "national_format": "(415) 992-9960",
          "valid": true,
          "validation_errors": [],
          "caller_name": null,
          "line_type_intelligence": {
            "error_code": null,
            "mobile_country_code": "310",
            "mobile_network_code": "456",
            "carrier_name": "verizon",
            "type": "nonFixedVoip"
          },
          "url": "https://lookups.twilio.com/v2/PhoneNumbers/+14159929960"
        }
        "#;

        let lookup = decode_lookup_v2_json_response(LookupMethod::V2LineType, json).unwrap();
        assert_eq!(lookup.method, LookupMethod::V2LineType);
        assert_eq!(lookup.phone_number.as_deref(), Some("+14159929960"));
        assert_eq!(lookup.country_code.as_deref(), Some("US"));
        assert_eq!(lookup.valid, Some(true));

        let lti = lookup.line_type.unwrap();
        assert_eq!(lti.line_type.as_deref(), Some("nonFixedVoip"));
        assert_eq!(lti.carrier_name.as_deref(), Some("verizon"));
        assert_eq!(lti.mobile_network_code.as_deref(), Some("456"));
        assert_eq!(lti.error_code, None);
        assert_eq!(lookup.raw["url"], "https://lookups.twilio.com/v2/PhoneNumbers/+14159929960");
    }

    #[test]
    fn decode_basic_answer_with_validation_errors() {
        let json = r#"
        {
          "calling_country_code": null,
          "country_code": null,
          "phone_number": "+1415",
          "national_format": null,
          "valid": false,
          "validation_errors": ["TOO_SHORT"],
          "line_type_intelligence": null
        }
        "#;

        let lookup = decode_lookup_v2_json_response(LookupMethod::V2Basic, json).unwrap();
        assert_eq!(lookup.valid, Some(false));
        assert_eq!(lookup.validation_errors, vec!["TOO_SHORT".to_owned()]);
        assert!(lookup.line_type.is_none());
        assert!(lookup.country_code.is_none());
    }

    #[test]
    fn decode_keeps_line_type_error_code() {
        let json = r#"
        {
          "phone_number": "+442071838750",
          "valid": true,
          "line_type_intelligence": {
            "error_code": 60600,
            "type": null,
            "carrier_name": null
          }
        }
        "#;

        let lookup = decode_lookup_v2_json_response(LookupMethod::V2LineType, json).unwrap();
        let lti = lookup.line_type.unwrap();
        assert_eq!(lti.error_code, Some(ErrorCode::new(60600)));
        assert!(lti.line_type.is_none());
    }

    #[test]
    fn decode_rejects_non_json() {
        let err = decode_lookup_v2_json_response(LookupMethod::V2Basic, "<html>").unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }
}
