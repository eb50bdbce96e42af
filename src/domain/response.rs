use crate::domain::value::{ErrorCode, LookupMethod};

#[derive(Debug, Clone, PartialEq)]
/// A successful provider answer, decoded from either Lookup v1 or v2.
pub struct ProviderLookup {
    pub method: LookupMethod,
    pub phone_number: Option<String>,
    pub national_format: Option<String>,
    pub country_code: Option<String>,
    pub calling_country_code: Option<String>,
    /// Only Lookup v2 reports validity; v1 answers leave this `None`.
    pub valid: Option<bool>,
    pub validation_errors: Vec<String>,
    /// Line-type intelligence (v2) or the carrier block (v1).
    pub line_type: Option<LineTypeInfo>,
    /// The decoded JSON payload, kept for debugging output.
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineTypeInfo {
    pub line_type: Option<String>,
    pub carrier_name: Option<String>,
    pub mobile_country_code: Option<String>,
    pub mobile_network_code: Option<String>,
    pub error_code: Option<ErrorCode>,
}
