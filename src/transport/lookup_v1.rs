use serde::Deserialize;

use super::TransportError;
use crate::domain::{ErrorCode, LineTypeInfo, LookupMethod, ProviderLookup};

pub const CARRIER: &str = "carrier";

#[derive(Debug, Clone, Deserialize)]
struct LookupV1JsonResponse {
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    national_format: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    carrier: Option<CarrierJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct CarrierJson {
    #[serde(default, rename = "type")]
    line_type: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mobile_country_code: Option<String>,
    #[serde(default)]
    mobile_network_code: Option<String>,
    #[serde(default)]
    error_code: Option<i32>,
}

pub fn decode_lookup_v1_json_response(json: &str) -> Result<ProviderLookup, TransportError> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    let parsed: LookupV1JsonResponse = serde_json::from_value(raw.clone())?;

    Ok(ProviderLookup {
        method: LookupMethod::V1Carrier,
        phone_number: parsed.phone_number,
        national_format: parsed.national_format,
        country_code: parsed.country_code,
        calling_country_code: None,
        valid: None,
        validation_errors: Vec::new(),
        line_type: parsed.carrier.map(|carrier| LineTypeInfo {
            line_type: carrier.line_type,
            carrier_name: carrier.name,
            mobile_country_code: carrier.mobile_country_code,
            mobile_network_code: carrier.mobile_network_code,
            error_code: carrier.error_code.map(ErrorCode::new),
        }),
        raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_maps_carrier_block_to_line_type_info() {
        let json = r#"
        {
          "caller_name": null,
          "carrier": {
            "error_code": null,
            "mobile_country_code": "310",
            "mobile_network_code": "456",
            "name": "verizon",
            "type": "mobile"
          },
          "country_code": "US",
          "national_format": "(510) 867-5310",
          "phone_number": "+15108675310",
          "add_ons": null,
          "url": "https://lookups.twilio.com/v1/PhoneNumbers/+15108675310?Type=carrier"
        }
        "#;

        let lookup = decode_lookup_v1_json_response(json).unwrap();
        assert_eq!(lookup.method, LookupMethod::V1Carrier);
        assert_eq!(lookup.valid, None);
        assert_eq!(lookup.national_format.as_deref(), Some("(510) 867-5310"));

        let carrier = lookup.line_type.unwrap();
        assert_eq!(carrier.line_type.as_deref(), Some("mobile"));
        assert_eq!(carrier.carrier_name.as_deref(), Some("verizon"));
        assert_eq!(carrier.mobile_country_code.as_deref(), Some("310"));
    }

    #[test]
    fn decode_without_carrier_block() {
        let json = r#"{ "phone_number": "+15108675310", "country_code": "US" }"#;
        let lookup = decode_lookup_v1_json_response(json).unwrap();
        assert!(lookup.line_type.is_none());
        assert_eq!(lookup.country_code.as_deref(), Some("US"));
    }
}
