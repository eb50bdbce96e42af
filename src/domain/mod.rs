//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::LookupRequest;
pub use response::{LineTypeInfo, ProviderLookup};
pub use validation::ValidationError;
pub use value::{
    AccountSid, ApiKeySecret, ApiKeySid, AuthToken, CountryCode, ErrorCode, KnownErrorCode,
    LookupMethod, PhoneNumber, RawPhoneNumber,
};
