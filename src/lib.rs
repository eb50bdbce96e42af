//! Phone number lookup over the Twilio Lookup API, normalized into a simple status.
//!
//! The crate has a domain layer of strong types, a transport layer for wire-format details,
//! a client layer running the lookup fallback chain, and a normalization layer that maps
//! provider answers and failures to one [`LookupStatus`]. [`LookupHandler`] wraps all of it
//! as an HTTP endpoint.
//!
//! ```rust,no_run
//! use phone_lookup::{Auth, LookupClient, LookupRequest, normalize_lookup};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LookupClient::new(Auth::account("AC...", "...")?)?;
//!     let request = LookupRequest::from_input("+14155552671", None)?;
//!     let outcome = client.lookup(&request).await?;
//!     println!("{}", normalize_lookup(&outcome.lookup).status);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod handler;
pub mod normalize;
pub mod telemetry;
mod transport;

pub use client::{
    Auth, FailedAttempt, LookupClient, LookupClientBuilder, LookupError, LookupOutcome,
};
pub use config::{Config, ConfigError};
pub use domain::{
    AccountSid, ApiKeySecret, ApiKeySid, AuthToken, CountryCode, ErrorCode, KnownErrorCode,
    LineTypeInfo, LookupMethod, LookupRequest, PhoneNumber, ProviderLookup, RawPhoneNumber,
    ValidationError,
};
pub use handler::LookupHandler;
pub use normalize::{
    FailureReport, LookupStatus, NormalizedLookup, normalize_error, normalize_lookup,
};
