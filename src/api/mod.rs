//! # API Module
//!
//! HTTP handlers of the local authorization capture server.
//!
//! ## Overview
//!
//! Spotify's implicit grant flow redirects the browser to
//! `http://127.0.0.1:43019/redirect#access_token=...`. The token sits in the
//! URL fragment, which a browser never sends to the server. Two routes turn it
//! into something the server can read:
//!
//! - [`redirect`] - Answers with a script that re-navigates to
//!   `/token?<fragment>`, moving the fragment into the query string.
//! - [`token`] - Reads `access_token` from the query string and signals the
//!   end of the flow through [`crate::server::CaptureState`].
//!
//! Every other path gets [`not_found`].
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use tokio::sync::oneshot;
//! use spotback::server::{CaptureState, router};
//!
//! let (tx, rx) = oneshot::channel();
//! let app = router(CaptureState::new(tx));
//! ```

mod redirect;
mod token;

use axum::{http::StatusCode, response::Html};

pub use redirect::{RELAY_SCRIPT, redirect};
pub use token::{extract_access_token, extract_error, token};

pub async fn not_found() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html("<h4>Not found.</h4>"))
}
