use std::sync::OnceLock;

use phone_lookup::telemetry::{self, TelemetryConfig};
use phone_lookup::{Config, LookupHandler};
use vercel_runtime::{Body, Error, Request, Response, run};

static STATE: OnceLock<LookupHandler> = OnceLock::new();

#[tokio::main]
async fn main() -> Result<(), Error> {
    let state = match Config::from_env() {
        Ok(config) => {
            telemetry::init(&config.telemetry());
            match config.build_client() {
                Ok(client) => LookupHandler::new(Some(client)),
                Err(err) => {
                    tracing::error!(error = %err, "lookup client not available");
                    LookupHandler::new(None)
                }
            }
        }
        Err(err) => {
            telemetry::init(&TelemetryConfig::default());
            tracing::error!(error = %err, "failed to read configuration");
            LookupHandler::new(None)
        }
    };
    STATE.get_or_init(|| state);

    run(handler).await
}

/// POST /api/lookup: look up one phone number.
pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    let state = STATE.get_or_init(|| LookupHandler::new(None));

    let body: &[u8] = match req.body() {
        Body::Empty => &[],
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes,
    };

    let response = state.handle(req.method(), body).await?;
    let (parts, text) = response.into_parts();
    let body = if text.is_empty() {
        Body::Empty
    } else {
        Body::Text(text)
    };
    Ok(Response::from_parts(parts, body))
}
