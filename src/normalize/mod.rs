//! Normalization: turn provider answers and provider failures into one simplified status.

mod messages;

use serde::Serialize;

use crate::domain::{LookupMethod, ProviderLookup};

pub use messages::{FailureReport, normalize_error};

pub const UNKNOWN_CARRIER: &str = "Unknown";
pub const UNKNOWN_COUNTRY: &str = "N/A";
pub const UNKNOWN_LINE_TYPE: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStatus {
    Active,
    Inactive,
    Invalid,
    Unknown,
    Unsupported,
    Error,
}

impl LookupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Invalid => "invalid",
            Self::Unknown => "unknown",
            Self::Unsupported => "unsupported",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLookup {
    pub status: LookupStatus,
    pub number: Option<String>,
    pub valid: Option<bool>,
    pub line_type: String,
    pub carrier: String,
    pub country: String,
    pub method: LookupMethod,
}

/// Status implied by a provider line type, if the line type decides it at all.
///
/// Both the v2 camelCase names and the older snake_case names are accepted.
pub fn status_for_line_type(line_type: &str) -> Option<LookupStatus> {
    match line_type {
        "mobile" | "landline" | "fixedVoip" | "nonFixedVoip" | "voip" | "tollFree"
        | "toll_free" | "personal" | "premium" | "sharedCost" | "uan" | "voicemail"
        | "pager" => Some(LookupStatus::Active),
        "invalid" => Some(LookupStatus::Inactive),
        _ => None,
    }
}

/// Map a provider answer to a normalized status plus carrier, line type and country.
pub fn normalize_lookup(lookup: &ProviderLookup) -> NormalizedLookup {
    let mut normalized = NormalizedLookup {
        status: LookupStatus::Unknown,
        number: lookup.phone_number.clone(),
        valid: lookup.valid,
        line_type: UNKNOWN_LINE_TYPE.to_owned(),
        carrier: UNKNOWN_CARRIER.to_owned(),
        country: UNKNOWN_COUNTRY.to_owned(),
        method: lookup.method,
    };

    if lookup.valid == Some(false) {
        normalized.status = LookupStatus::Invalid;
        return normalized;
    }

    let mut status = None;
    if let Some(info) = &lookup.line_type {
        if let Some(line_type) = info.line_type.as_deref().filter(|it| !it.is_empty()) {
            normalized.line_type = line_type.to_owned();
            status = status_for_line_type(line_type);
        }
        if let Some(carrier) = info.carrier_name.as_deref().filter(|it| !it.is_empty()) {
            normalized.carrier = carrier.to_owned();
        }
    }

    if let Some(country) = lookup.country_code.as_deref().filter(|it| !it.is_empty()) {
        normalized.country = country.to_owned();
    }

    normalized.status = match status {
        Some(status) => status,
        None if lookup.valid == Some(true) => LookupStatus::Active,
        None => LookupStatus::Unknown,
    };
    normalized
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::domain::LineTypeInfo;

    fn lookup(valid: Option<bool>, line_type: Option<&str>) -> ProviderLookup {
        ProviderLookup {
            method: LookupMethod::V2LineType,
            phone_number: Some("+14155552671".to_owned()),
            national_format: None,
            country_code: Some("US".to_owned()),
            calling_country_code: Some("1".to_owned()),
            valid,
            validation_errors: Vec::new(),
            line_type: line_type.map(|line_type| LineTypeInfo {
                line_type: Some(line_type.to_owned()),
                carrier_name: Some("AT&T Wireless".to_owned()),
                ..Default::default()
            }),
            raw: Value::Null,
        }
    }

    #[test]
    fn invalid_numbers_keep_default_metadata() {
        let normalized = normalize_lookup(&lookup(Some(false), Some("mobile")));
        assert_eq!(normalized.status, LookupStatus::Invalid);
        assert_eq!(normalized.carrier, UNKNOWN_CARRIER);
        assert_eq!(normalized.country, UNKNOWN_COUNTRY);
        assert_eq!(normalized.line_type, UNKNOWN_LINE_TYPE);
        assert_eq!(normalized.valid, Some(false));
    }

    #[test]
    fn mobile_and_landline_are_active() {
        for line_type in ["mobile", "landline"] {
            let normalized = normalize_lookup(&lookup(Some(true), Some(line_type)));
            assert_eq!(normalized.status, LookupStatus::Active);
            assert_eq!(normalized.line_type, line_type);
            assert_eq!(normalized.carrier, "AT&T Wireless");
            assert_eq!(normalized.country, "US");
        }
    }

    #[test]
    fn voip_and_toll_free_count_as_active() {
        assert_eq!(status_for_line_type("nonFixedVoip"), Some(LookupStatus::Active));
        assert_eq!(status_for_line_type("voip"), Some(LookupStatus::Active));
        assert_eq!(status_for_line_type("tollFree"), Some(LookupStatus::Active));
        assert_eq!(status_for_line_type("toll_free"), Some(LookupStatus::Active));
    }

    #[test]
    fn invalid_line_type_is_inactive_even_when_valid() {
        let normalized = normalize_lookup(&lookup(Some(true), Some("invalid")));
        assert_eq!(normalized.status, LookupStatus::Inactive);
    }

    #[test]
    fn undetermined_line_type_falls_back_on_validity() {
        let normalized = normalize_lookup(&lookup(Some(true), Some("unknown")));
        assert_eq!(normalized.status, LookupStatus::Active);
        assert_eq!(normalized.line_type, "unknown");

        let normalized = normalize_lookup(&lookup(Some(true), None));
        assert_eq!(normalized.status, LookupStatus::Active);
        assert_eq!(normalized.carrier, UNKNOWN_CARRIER);
    }

    #[test]
    fn v1_answers_without_line_type_stay_unknown() {
        let mut answer = lookup(None, None);
        answer.method = LookupMethod::V1Carrier;
        let normalized = normalize_lookup(&answer);
        assert_eq!(normalized.status, LookupStatus::Unknown);
        assert_eq!(normalized.method, LookupMethod::V1Carrier);
        assert_eq!(normalized.country, "US");

        let mut answer = lookup(None, Some("mobile"));
        answer.method = LookupMethod::V1Carrier;
        assert_eq!(normalize_lookup(&answer).status, LookupStatus::Active);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LookupStatus::Unsupported).unwrap(),
            "\"unsupported\""
        );
        assert_eq!(LookupStatus::Inactive.to_string(), "inactive");
    }
}
