use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;

use crate::{
    Error, Res,
    config::{self, Config},
    server, success,
    types::AccessToken,
    warning,
};

/// Runs the OAuth 2.0 implicit grant flow through the local capture server.
///
/// This function orchestrates the entire authorization process:
/// 1. Binding the capture server to `127.0.0.1:43019`
/// 2. Opening the authorization URL in the user's browser
/// 3. Waiting until the browser relayed the token to `/token`
/// 4. Releasing the port and returning the token
///
/// The listener is bound before the browser opens, so Spotify's redirect
/// cannot arrive before anyone listens.
///
/// # Implicit Grant
///
/// Spotify returns the token in the fragment of the redirect URL
/// (`/redirect#access_token=...`). Browsers never send fragments to a server,
/// so `/redirect` answers with a small script that navigates to
/// `/token?<fragment>`, where the token finally becomes visible.
///
/// # Error Handling
///
/// - Bind failures are fatal; there is no fallback port because Spotify only
///   redirects to the registered URI
/// - Browser launch failures result in a warning with the URL to open manually
/// - A denial (`error=access_denied`) ends the flow with
///   [`Error::AuthorizationDenied`]
///
/// # Example
///
/// ```
/// let token = authorize(&Config::from_env()).await?;
/// ```
pub async fn authorize(config: &Config) -> Res<AccessToken> {
    let listener = server::bind(config::server_addr()).await?;
    let auth_url = authorize_url(config)?;

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for authorization in the browser...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let token = server::capture_token(listener).await;
    pb.finish_and_clear();

    let token = token?;
    success!("Authorization successful!");
    Ok(token)
}

/// Builds Spotify's authorize URL for the implicit grant flow.
pub fn authorize_url(config: &Config) -> Res<Url> {
    let redirect_uri = config::redirect_uri();
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("response_type", "token"),
            ("client_id", config.client_id.as_str()),
            ("scope", config.scope.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ],
    )
    .map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.auth_url)))
}
