//! The upstream relay: fetch a remote URL on the caller's behalf and stream
//! the response back, re-headered for cross-origin playback.

use axum::body::boxed;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use axum::response::Response;
use futures_util::TryStreamExt;
use hyper::Body;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::cors;
use crate::error::RelayError;
use crate::state::AppState;

/// Outbound requests imitate an ordinary browser; several media CDNs refuse
/// clients that arrive without a User-Agent or a same-origin-looking Referer.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Hop-by-hop headers that would corrupt HTTP/1.1 framing if copied onto the
/// relayed response.
const SKIPPED_HEADERS: &[HeaderName] = &[header::CONNECTION, header::TRANSFER_ENCODING];

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    pub url: Option<String>,
    pub key: Option<String>,
}

pub async fn proxy_handler(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Result<Response, RelayError> {
    let target = validate_request(&params, state.config.proxy_key.as_deref())?;
    tracing::debug!(url = %target, "relaying upstream fetch");
    relay(&target).await
}

/// Pre-fetch validation. Runs entirely before any outbound I/O.
fn validate_request(params: &ProxyParams, proxy_key: Option<&str>) -> Result<Url, RelayError> {
    let raw = match params.url.as_deref() {
        Some(value) if !value.is_empty() => value,
        _ => return Err(RelayError::MissingUrl),
    };

    if let Some(secret) = proxy_key {
        if params.key.as_deref() != Some(secret) {
            return Err(RelayError::Unauthorized);
        }
    }

    let target = Url::parse(raw).map_err(|_| RelayError::InvalidUrl)?;
    if target.host_str().is_none() || !matches!(target.scheme(), "http" | "https") {
        return Err(RelayError::InvalidUrl);
    }
    Ok(target)
}

/// The fixed outbound header set, built fresh per request. Origin and Referer
/// come from the target's scheme and host only, never its path or query.
fn upstream_headers(target: &Url) -> HeaderMap {
    let origin = target.origin().ascii_serialization();
    let referer = format!("{origin}/");

    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    if let Ok(value) = HeaderValue::from_str(&referer) {
        headers.insert(header::REFERER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&origin) {
        headers.insert(header::ORIGIN, value);
    }
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

/// Fetch the target and hand its response back as ours. The body is wired
/// through as a stream, so each chunk goes out as it arrives and dropping the
/// client connection drops the upstream read with it.
async fn relay(target: &Url) -> Result<Response, RelayError> {
    // One fresh client per request: connections are not pooled across calls.
    let client = Client::new();
    let upstream = client
        .get(target.clone())
        .headers(upstream_headers(target))
        .send()
        .await
        .map_err(|err| {
            tracing::error!(error = %err, url = %target, "upstream request failed");
            RelayError::Fetch
        })?;

    let status = upstream.status();
    if !status.is_success() {
        tracing::warn!(status = %status, url = %target, "upstream returned an error status");
        return Err(RelayError::Upstream(status));
    }

    let upstream_header_map = upstream.headers().clone();
    let stream = upstream.bytes_stream().map_err(|err| {
        // The status line is already on the wire; nothing left to do but log
        // and let the connection tear down with a truncated body.
        tracing::warn!(error = %err, "upstream body failed mid-stream");
        std::io::Error::new(std::io::ErrorKind::Other, err)
    });

    let mut response = Response::builder()
        .status(status)
        .body(boxed(Body::wrap_stream(stream)))
        .map_err(|err| {
            tracing::error!(error = %err, "failed to assemble relay response");
            RelayError::Fetch
        })?;

    let headers = response.headers_mut();
    for (name, value) in upstream_header_map.iter() {
        if SKIPPED_HEADERS.contains(name) {
            continue;
        }
        headers.insert(name.clone(), value.clone());
    }
    // Applied after the upstream copy so the relay's values always win.
    cors::apply_cors(headers);

    Ok(response)
}
