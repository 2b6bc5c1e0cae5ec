use std::{io, net::SocketAddr};

use thiserror::Error;

/// Errors produced while authorizing, fetching or exporting.
///
/// `RetriesExhausted`, `Bind` and `AuthorizationDenied` end the run. `Http`
/// and `Json` show up per request attempt and are retried by the client
/// before they turn into `RetriesExhausted`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("giving up on {url} after {attempts} attempts (last error: {last})")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot bind authorization server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("authorization server failed: {0}")]
    Serve(#[source] io::Error),

    #[error("authorization denied by Spotify: {0}")]
    AuthorizationDenied(String),

    #[error("authorization server stopped before a token was received")]
    AuthorizationAborted,

    #[error("pagination error: {0}")]
    Pagination(String),

    #[error("unexpected response from {0}")]
    UnexpectedResponse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
