use std::fmt;
use std::str::FromStr;

use phonenumber::country;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::validation::ValidationError;

fn non_empty_trimmed(
    value: impl Into<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

fn prefixed_sid(
    value: impl Into<String>,
    field: &'static str,
    expected_prefix: &'static str,
) -> Result<String, ValidationError> {
    let value = non_empty_trimmed(value, field)?;
    if !value.starts_with(expected_prefix) {
        return Err(ValidationError::InvalidSid {
            field,
            expected_prefix,
        });
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Twilio account SID.
///
/// Invariant: non-empty after trimming and starts with `AC`.
pub struct AccountSid(String);

impl AccountSid {
    pub const FIELD: &'static str = "account_sid";
    pub const PREFIX: &'static str = "AC";

    /// Create a validated [`AccountSid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        prefixed_sid(value, Self::FIELD, Self::PREFIX).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Twilio API key SID, used as the basic-auth user name with an [`ApiKeySecret`].
///
/// Invariant: non-empty after trimming and starts with `SK`.
pub struct ApiKeySid(String);

impl ApiKeySid {
    pub const FIELD: &'static str = "api_key";
    pub const PREFIX: &'static str = "SK";

    /// Create a validated [`ApiKeySid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        prefixed_sid(value, Self::FIELD, Self::PREFIX).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone)]
/// Twilio auth token.
///
/// Invariant: must not be empty. The value never shows up in `Debug` output.
pub struct AuthToken(SecretString);

impl AuthToken {
    pub const FIELD: &'static str = "auth_token";

    /// Create a validated [`AuthToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(SecretString::from(value)))
    }

    /// Borrow the token for the basic-auth header.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[derive(Clone)]
/// Twilio API key secret.
///
/// Invariant: must not be empty. The value never shows up in `Debug` output.
pub struct ApiKeySecret(SecretString);

impl ApiKeySecret {
    pub const FIELD: &'static str = "api_secret";

    /// Create a validated [`ApiKeySecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(SecretString::from(value)))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ApiKeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKeySecret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number as sent to the lookup provider.
///
/// Invariant: non-empty after trimming. This type does not normalize; if you want E.164
/// normalization, parse into [`PhoneNumber`] and convert it into [`RawPhoneNumber`].
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    pub const FIELD: &'static str = "number";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        non_empty_trimmed(value, Self::FIELD).map(Self)
    }

    /// Raw (trimmed) value as sent to the provider.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    pub const FIELD: &'static str = "number";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let raw = non_empty_trimmed(input, Self::FIELD)?;

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// Whether the number matches a known numbering plan pattern for its region.
    pub fn is_valid(&self) -> bool {
        phonenumber::is_valid(&self.parsed)
    }

    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// ISO-3166 alpha-2 region used as the default region for national-format numbers.
///
/// Invariant: the region is known to `phonenumber`; stored upper-case.
pub struct CountryCode {
    code: String,
    id: country::Id,
}

impl CountryCode {
    pub const FIELD: &'static str = "country";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let code = non_empty_trimmed(value, Self::FIELD)?.to_ascii_uppercase();
        let id = code
            .parse::<country::Id>()
            .map_err(|_| ValidationError::InvalidCountryCode {
                input: code.clone(),
            })?;
        Ok(Self { code, id })
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn id(&self) -> country::Id {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// One way of asking the provider about a number. The fallback chain tries these in order.
pub enum LookupMethod {
    /// Lookup v2 with `Fields=line_type_intelligence`.
    V2LineType,
    /// Lookup v2 without data packages: validity and formatting only.
    V2Basic,
    /// Lookup v1 with `Type=carrier`.
    V1Carrier,
}

impl LookupMethod {
    /// Chain used when nothing else is configured.
    pub const DEFAULT_CHAIN: [LookupMethod; 3] = [Self::V2LineType, Self::V2Basic, Self::V1Carrier];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V2LineType => "v2-line-type",
            Self::V2Basic => "v2-basic",
            Self::V1Carrier => "v1-carrier",
        }
    }
}

impl fmt::Display for LookupMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v2-line-type" => Ok(Self::V2LineType),
            "v2-basic" => Ok(Self::V2Basic),
            "v1-carrier" => Ok(Self::V1Carrier),
            _ => Err(ValidationError::UnknownLookupMethod {
                input: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Provider error code.
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct ErrorCode(i32);

impl ErrorCode {
    pub fn new(code: i32) -> Self {
        Self(code)
    }

    pub fn as_i32(self) -> i32 {
        self.0
    }

    /// Map this code to a known error code variant, if one exists.
    pub fn known(self) -> Option<KnownErrorCode> {
        KnownErrorCode::from_code(self.0)
    }

    pub fn is_retryable(self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_retryable())
    }

    pub fn is_auth_error(self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_auth_error())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Provider error codes this crate gives a specific meaning to.
pub enum KnownErrorCode {
    AuthenticationFailed,
    ResourceNotFound,
    TooManyRequests,
    InvalidPhoneNumber,
    UnsupportedCountry,
    UnsupportedNumberType,
}

impl KnownErrorCode {
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            20003 => Self::AuthenticationFailed,
            20404 => Self::ResourceNotFound,
            20429 => Self::TooManyRequests,
            21211 => Self::InvalidPhoneNumber,
            21450 => Self::UnsupportedCountry,
            21612 => Self::UnsupportedNumberType,
            _ => return None,
        })
    }

    pub fn code(self) -> i32 {
        match self {
            Self::AuthenticationFailed => 20003,
            Self::ResourceNotFound => 20404,
            Self::TooManyRequests => 20429,
            Self::InvalidPhoneNumber => 21211,
            Self::UnsupportedCountry => 21450,
            Self::UnsupportedNumberType => 21612,
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, Self::TooManyRequests)
    }

    pub fn is_auth_error(self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sids_trim_and_check_prefix() {
        let sid = AccountSid::new("  AC123 ").unwrap();
        assert_eq!(sid.as_str(), "AC123");
        assert!(matches!(
            AccountSid::new("SK123"),
            Err(ValidationError::InvalidSid {
                expected_prefix: "AC",
                ..
            })
        ));
        assert!(matches!(
            AccountSid::new("   "),
            Err(ValidationError::Empty {
                field: AccountSid::FIELD
            })
        ));

        let key = ApiKeySid::new("SKabc").unwrap();
        assert_eq!(key.as_str(), "SKabc");
        assert!(ApiKeySid::new("ACabc").is_err());
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let token = AuthToken::new("hunter2").unwrap();
        assert_eq!(token.expose(), "hunter2");
        assert_eq!(format!("{token:?}"), "AuthToken(***)");
        assert!(AuthToken::new("").is_err());

        let secret = ApiKeySecret::new(" s ").unwrap();
        assert_eq!(secret.expose(), " s ");
        assert!(!format!("{secret:?}").contains(" s "));
    }

    #[test]
    fn raw_phone_number_trims_and_exposes_raw() {
        let raw = RawPhoneNumber::new(" +14155552671 ").unwrap();
        assert_eq!(raw.raw(), "+14155552671");
        assert!(RawPhoneNumber::new("").is_err());
    }

    #[test]
    fn phone_number_parsing_and_equality_use_e164() {
        let p1 = PhoneNumber::parse(None, "+14155552671").unwrap();
        let p2 = PhoneNumber::parse(Some(country::Id::US), "(415) 555-2671").unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p1.e164(), "+14155552671");

        let raw: RawPhoneNumber = p2.into();
        assert_eq!(raw.raw(), "+14155552671");
        assert!(PhoneNumber::parse(None, "not-a-number").is_err());
    }

    #[test]
    fn country_code_is_case_insensitive() {
        let cc = CountryCode::new(" mx ").unwrap();
        assert_eq!(cc.as_str(), "MX");
        assert_eq!(cc.id(), country::Id::MX);
        assert!(CountryCode::new("ZZ").is_err());
        assert!(CountryCode::new("").is_err());
    }

    #[test]
    fn lookup_method_parses_and_displays() {
        for method in LookupMethod::DEFAULT_CHAIN {
            assert_eq!(method.to_string().parse::<LookupMethod>().unwrap(), method);
        }
        assert_eq!(
            " V1-Carrier ".parse::<LookupMethod>().unwrap(),
            LookupMethod::V1Carrier
        );
        assert!("v3".parse::<LookupMethod>().is_err());
    }

    #[test]
    fn error_code_known_mapping() {
        assert_eq!(
            ErrorCode::new(20404).known(),
            Some(KnownErrorCode::ResourceNotFound)
        );
        assert!(ErrorCode::new(20003).is_auth_error());
        assert!(ErrorCode::new(20429).is_retryable());

        let unknown = ErrorCode::new(99999);
        assert!(unknown.known().is_none());
        assert!(!unknown.is_retryable());
        assert!(!unknown.is_auth_error());
    }

    #[test]
    fn known_error_code_round_trips_its_number() {
        for code in [20003, 20404, 20429, 21211, 21450, 21612] {
            assert_eq!(KnownErrorCode::from_code(code).unwrap().code(), code);
        }
    }
}
