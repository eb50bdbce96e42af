use crate::domain::validation::ValidationError;
use crate::domain::value::{CountryCode, PhoneNumber, RawPhoneNumber};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single number to look up.
pub struct LookupRequest {
    number: RawPhoneNumber,
    country: Option<CountryCode>,
}

impl LookupRequest {
    pub fn new(number: RawPhoneNumber, country: Option<CountryCode>) -> Self {
        Self { number, country }
    }

    /// Build a request from user input.
    ///
    /// The number is sent in E.164 form when it parses as a valid number (using `country` as
    /// the default region). Anything else is passed through trimmed, so the provider still
    /// decides whether it is valid.
    pub fn from_input(number: &str, country: Option<&str>) -> Result<Self, ValidationError> {
        let country = country
            .filter(|value| !value.trim().is_empty())
            .map(CountryCode::new)
            .transpose()?;
        let raw = RawPhoneNumber::new(number)?;

        let number = match PhoneNumber::parse(country.as_ref().map(CountryCode::id), raw.raw()) {
            Ok(parsed) if parsed.is_valid() => parsed.into(),
            _ => raw,
        };

        Ok(Self { number, country })
    }

    pub fn number(&self) -> &RawPhoneNumber {
        &self.number
    }

    pub fn country(&self) -> Option<&CountryCode> {
        self.country.as_ref()
    }
}
