//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod api_error;
mod lookup_v1;
mod lookup_v2;

use url::Url;

use crate::domain::{LookupMethod, LookupRequest, ProviderLookup};

pub use api_error::{ApiErrorBody, decode_api_error};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("base url cannot carry path segments: {url}")]
    CannotBeABase { url: String },
}

/// Build the request URL for one lookup method.
pub fn lookup_url(
    base: &Url,
    method: LookupMethod,
    request: &LookupRequest,
) -> Result<Url, TransportError> {
    let mut url = base.clone();
    let version = match method {
        LookupMethod::V2LineType | LookupMethod::V2Basic => "v2",
        LookupMethod::V1Carrier => "v1",
    };

    url.path_segments_mut()
        .map_err(|_| TransportError::CannotBeABase {
            url: base.to_string(),
        })?
        .pop_if_empty()
        .extend([version, "PhoneNumbers", request.number().raw()]);

    {
        let mut query = url.query_pairs_mut();
        match method {
            LookupMethod::V2LineType => {
                query.append_pair("Fields", lookup_v2::LINE_TYPE_INTELLIGENCE);
            }
            LookupMethod::V2Basic => {}
            LookupMethod::V1Carrier => {
                query.append_pair("Type", lookup_v1::CARRIER);
            }
        }
        if let Some(country) = request.country() {
            query.append_pair("CountryCode", country.as_str());
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

/// Decode a 2xx lookup body according to the API version the method talks to.
pub fn decode_lookup_json_response(
    method: LookupMethod,
    json: &str,
) -> Result<ProviderLookup, TransportError> {
    match method {
        LookupMethod::V2LineType | LookupMethod::V2Basic => {
            lookup_v2::decode_lookup_v2_json_response(method, json)
        }
        LookupMethod::V1Carrier => lookup_v1::decode_lookup_v1_json_response(json),
    }
}
