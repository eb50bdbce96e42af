//! Client layer: orchestrates transport calls and the lookup fallback chain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{
    AccountSid, ApiKeySecret, ApiKeySid, AuthToken, ErrorCode, KnownErrorCode, LookupMethod,
    LookupRequest, ProviderLookup, ValidationError,
};
use crate::transport::{ApiErrorBody, decode_api_error, decode_lookup_json_response, lookup_url};

const DEFAULT_BASE_URL: &str = "https://lookups.twilio.com";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn get<'a>(
        &'a self,
        url: Url,
        username: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        url: Url,
        username: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .basic_auth(username, Some(password))
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Credentials for the lookup provider.
///
/// Use [`Auth::account`] with the account SID and auth token, or [`Auth::api_key`] with an
/// API key pair.
pub enum Auth {
    AccountToken {
        account_sid: AccountSid,
        auth_token: AuthToken,
    },
    ApiKey {
        key_sid: ApiKeySid,
        secret: ApiKeySecret,
    },
}

impl Auth {
    pub fn account(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::AccountToken {
            account_sid: AccountSid::new(account_sid)?,
            auth_token: AuthToken::new(auth_token)?,
        })
    }

    pub fn api_key(
        key_sid: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::ApiKey {
            key_sid: ApiKeySid::new(key_sid)?,
            secret: ApiKeySecret::new(secret)?,
        })
    }

    fn basic_auth(&self) -> (&str, &str) {
        match self {
            Self::AccountToken {
                account_sid,
                auth_token,
            } => (account_sid.as_str(), auth_token.expose()),
            Self::ApiKey { key_sid, secret } => (key_sid.as_str(), secret.expose()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`LookupClient`].
pub enum LookupError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status without a provider error envelope.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The provider answered with its error envelope.
    #[error("API error (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        code: Option<ErrorCode>,
        message: Option<String>,
        more_info: Option<String>,
    },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl LookupError {
    /// Provider error code, when the provider sent one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }

    /// HTTP status of the failed response, when there was one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn more_info(&self) -> Option<&str> {
        match self {
            Self::Api { more_info, .. } => more_info.as_deref(),
            _ => None,
        }
    }

    /// Whether trying another lookup method cannot change the outcome.
    ///
    /// Rate limiting counts: every method draws on the same account quota, so the whole
    /// request should be retried later instead.
    pub fn is_terminal(&self) -> bool {
        if matches!(self, Self::Validation(_)) || self.http_status() == Some(401) {
            return true;
        }
        match self.code() {
            Some(code) => {
                code.is_auth_error()
                    || code.is_retryable()
                    || code.known() == Some(KnownErrorCode::InvalidPhoneNumber)
            }
            None => false,
        }
    }

    fn from_error_response(status: u16, body: String) -> Self {
        match decode_api_error(&body) {
            Some(ApiErrorBody {
                code,
                message,
                more_info,
                ..
            }) => Self::Api {
                status,
                code,
                message,
                more_info,
            },
            None => Self::HttpStatus {
                status,
                body: if body.trim().is_empty() {
                    None
                } else {
                    Some(body)
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A method that failed before the chain found an answer.
pub struct FailedAttempt {
    pub method: LookupMethod,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
/// Result of [`LookupClient::lookup`].
pub struct LookupOutcome {
    pub lookup: ProviderLookup,
    pub failed_attempts: Vec<FailedAttempt>,
}

#[derive(Debug, Clone)]
/// Builder for [`LookupClient`].
pub struct LookupClientBuilder {
    auth: Auth,
    base_url: String,
    methods: Vec<LookupMethod>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl LookupClientBuilder {
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            base_url: DEFAULT_BASE_URL.to_owned(),
            methods: LookupMethod::DEFAULT_CHAIN.to_vec(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the provider base URL (scheme, host and optional path prefix).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the fallback chain. Methods are tried in the given order.
    pub fn methods(mut self, methods: impl IntoIterator<Item = LookupMethod>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Set an HTTP client timeout applied to each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<LookupClient, LookupError> {
        let base_url = parse_base_url(&self.base_url)?;
        if self.methods.is_empty() {
            return Err(ValidationError::Empty { field: "methods" }.into());
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| LookupError::Transport(Box::new(err)))?;

        Ok(LookupClient::from_parts(
            self.auth,
            base_url,
            self.methods,
            Arc::new(ReqwestTransport { client }),
        ))
    }
}

fn parse_base_url(value: &str) -> Result<Url, ValidationError> {
    match Url::parse(value.trim()) {
        Ok(url) if !url.cannot_be_a_base() => Ok(url),
        _ => Err(ValidationError::InvalidUrl {
            input: value.to_owned(),
        }),
    }
}

#[derive(Clone)]
/// Phone lookup client.
///
/// By default it talks to `https://lookups.twilio.com` and tries Lookup v2 with line-type
/// intelligence, then plain Lookup v2, then Lookup v1 with carrier data.
pub struct LookupClient {
    auth: Auth,
    base_url: Url,
    methods: Vec<LookupMethod>,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for LookupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupClient")
            .field("auth", &self.auth)
            .field("base_url", &self.base_url.as_str())
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

impl LookupClient {
    /// Create a client with the default endpoint and fallback chain.
    ///
    /// For more customization, use [`LookupClient::builder`].
    pub fn new(auth: Auth) -> Result<Self, LookupError> {
        Self::builder(auth).build()
    }

    pub fn builder(auth: Auth) -> LookupClientBuilder {
        LookupClientBuilder::new(auth)
    }

    pub(crate) fn from_parts(
        auth: Auth,
        base_url: Url,
        methods: Vec<LookupMethod>,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            auth,
            base_url,
            methods,
            http,
        }
    }

    pub fn methods(&self) -> &[LookupMethod] {
        &self.methods
    }

    /// Ask the provider once, using a single method.
    ///
    /// Errors:
    /// - [`LookupError::Api`] when the provider answers non-2xx with its error envelope,
    /// - [`LookupError::HttpStatus`] for other non-2xx responses,
    /// - [`LookupError::Parse`] when a 2xx body cannot be decoded.
    pub async fn fetch(
        &self,
        method: LookupMethod,
        request: &LookupRequest,
    ) -> Result<ProviderLookup, LookupError> {
        let url = lookup_url(&self.base_url, method, request).map_err(|_| {
            LookupError::Validation(ValidationError::InvalidUrl {
                input: self.base_url.to_string(),
            })
        })?;
        let (username, password) = self.auth.basic_auth();

        tracing::debug!(method = %method, url = %url, "sending lookup request");

        let response = self
            .http
            .get(url, username, password)
            .await
            .map_err(LookupError::Transport)?;

        if !(200..=299).contains(&response.status) {
            return Err(LookupError::from_error_response(
                response.status,
                response.body,
            ));
        }

        tracing::debug!(method = %method, body = %response.body, "raw lookup response");

        decode_lookup_json_response(method, &response.body)
            .map_err(|err| LookupError::Parse(Box::new(err)))
    }

    /// Run the fallback chain: try each configured method until one answers.
    ///
    /// A terminal error (see [`LookupError::is_terminal`]), such as bad credentials or rate
    /// limiting, ends the chain at once. When every method fails, the last error is returned.
    pub async fn lookup(&self, request: &LookupRequest) -> Result<LookupOutcome, LookupError> {
        let mut failed_attempts = Vec::new();
        let mut last_error = None;

        for &method in &self.methods {
            match self.fetch(method, request).await {
                Ok(lookup) => {
                    return Ok(LookupOutcome {
                        lookup,
                        failed_attempts,
                    });
                }
                Err(err) if err.is_terminal() => {
                    tracing::warn!(method = %method, error = %err, "lookup failed, not retrying");
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(
                        method = %method,
                        error = %err,
                        "lookup failed, trying next method"
                    );
                    failed_attempts.push(FailedAttempt {
                        method,
                        error: err.to_string(),
                    });
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or(LookupError::Validation(ValidationError::Empty {
            field: "methods",
        })))
    }
}
