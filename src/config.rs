//! Configuration management for the Spotify library exporter.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Values are resolved once at startup into a
//! [`Config`] which is passed around read-only afterwards.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults
//!
//! The port of the local authorization server is not configurable. Spotify only
//! redirects to URIs registered for the client id, and the registered one is
//! `http://127.0.0.1:43019/redirect`.

use std::{
    env,
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use crate::{Error, Res};

/// Port the authorization capture server binds on `127.0.0.1`.
pub const SERVER_PORT: u16 = 43019;

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1/";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_CLIENT_ID: &str = "5c098bcc800e45d49e476265bc9b6934";
pub const DEFAULT_SCOPE: &str = "playlist-read-private user-library-read user-follow-read";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `spotback/.env` inside the platform-specific
/// local data directory. A missing file is not an error, every value has a
/// default.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/spotback/.env`
/// - macOS: `~/Library/Application Support/spotback/.env`
/// - Windows: `%LOCALAPPDATA%/spotback/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file exists but cannot be read or parsed
///
/// # Example
///
/// ```
/// use spotback::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Res<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| Error::Config(e.to_string()))?;
    }
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotback/.env");
    path
}

/// Returns the address the local authorization server binds to.
pub fn server_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, SERVER_PORT))
}

/// Returns the redirect URI registered with Spotify for the client id.
pub fn redirect_uri() -> String {
    format!("http://127.0.0.1:{}/redirect", SERVER_PORT)
}

/// Retry and pagination limits applied to every API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per request before giving up, including the first one.
    pub max_attempts: u32,
    /// Fixed pause between two attempts.
    pub delay: Duration,
    /// Upper bound on pages followed by a single paginated listing.
    pub max_pages: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
            max_pages: 10_000,
        }
    }
}

/// Process-wide settings, resolved once by [`Config::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the Web API, always ending with `/`.
    pub api_url: String,
    /// Spotify's OAuth authorize endpoint.
    pub auth_url: String,
    pub client_id: String,
    /// Space separated list of requested scopes.
    pub scope: String,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    /// Builds the configuration from the environment.
    ///
    /// Reads `SPOTIFY_API_URL`, `SPOTIFY_API_AUTH_URL`,
    /// `SPOTIFY_API_AUTH_CLIENT_ID` and `SPOTIFY_API_AUTH_SCOPE`, falling back
    /// to the defaults for unset or empty variables.
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::from_env();
    /// assert!(config.api_url.ends_with('/'));
    /// ```
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: with_trailing_slash(var_or("SPOTIFY_API_URL", defaults.api_url)),
            auth_url: var_or("SPOTIFY_API_AUTH_URL", defaults.auth_url),
            client_id: var_or("SPOTIFY_API_AUTH_CLIENT_ID", defaults.client_id),
            scope: var_or("SPOTIFY_API_AUTH_SCOPE", defaults.scope),
            retry: defaults.retry,
        }
    }

    /// Returns a copy pointing at a different API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = with_trailing_slash(api_url.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

fn var_or(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default,
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
