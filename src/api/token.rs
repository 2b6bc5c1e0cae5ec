use std::sync::LazyLock;

use axum::{
    Extension,
    extract::RawQuery,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use regex::Regex;

use crate::{
    server::CaptureState,
    types::{AccessToken, Authorization},
    warning,
};

static ACCESS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"access_token=([^&]*)").expect("valid access_token pattern"));
static ERROR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|&)error=([^&]*)").expect("valid error pattern"));

const THANKS_PAGE: &str = "<script>close()</script>Thanks! You may now close this window.";
const DENIED_PAGE: &str = "<h4>Authorization was denied.</h4><p>You may now close this window.</p>";
const MISSING_TOKEN_PAGE: &str = "<h4>Missing access token.</h4><p>Please try to authorize again.</p>";

pub async fn token(
    RawQuery(query): RawQuery,
    Extension(state): Extension<CaptureState>,
) -> Response {
    let Some(query) = query else {
        return super::not_found().await.into_response();
    };

    if let Some(token) = extract_access_token(&query) {
        state.complete(Authorization::Granted(token)).await;
        return Html(THANKS_PAGE).into_response();
    }

    if let Some(reason) = extract_error(&query) {
        state.complete(Authorization::Denied(reason)).await;
        return Html(DENIED_PAGE).into_response();
    }

    // keep listening, the user can restart the flow from the same tab
    warning!("Authorization callback without access token, still waiting...");
    (StatusCode::BAD_REQUEST, Html(MISSING_TOKEN_PAGE)).into_response()
}

/// Reads the percent-decoded `access_token` value from a query string.
pub fn extract_access_token(query: &str) -> Option<AccessToken> {
    capture(&ACCESS_TOKEN, query).map(AccessToken::new)
}

/// Reads the `error` value Spotify sends when the user declined access.
pub fn extract_error(query: &str) -> Option<String> {
    capture(&ERROR, query)
}

fn capture(pattern: &Regex, query: &str) -> Option<String> {
    let raw = pattern.captures(query)?.get(1)?.as_str();
    if raw.is_empty() {
        return None;
    }
    let value = urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    Some(value)
}
