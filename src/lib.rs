//! Spotify Library Export CLI Library
//!
//! This library provides functionality for exporting a user's Spotify library
//! (saved albums, saved tracks, followed artists and playlists with their full
//! track listings) into local files. It includes the local OAuth capture server,
//! a retrying and paginating Web API client, and the rendering of the fetched
//! collections.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local authorization capture server
//! - `cli` - Command-line export driver
//! - `config` - Configuration management and environment variables
//! - `error` - Error type shared by all modules
//! - `export` - Rendering of collections to JSON or tab-separated text
//! - `server` - Local HTTP server that captures the OAuth token
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use spotback::{config::Config, spotify::SpotifyClient, types::AccessToken};
//!
//! #[tokio::main]
//! async fn main() -> spotback::Res<()> {
//!     let client = SpotifyClient::with_config(AccessToken::new("BQC..."), &Config::from_env())?;
//!     let albums = client.list("me/albums", &[("limit", "50")]).await?;
//!     println!("{} albums", albums.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod server;
pub mod spotify;
pub mod types;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in the crate reports an [`Error`]. Fatal
/// conditions such as exhausted retries are returned like any other error
/// and only the binary decides to terminate the process.
///
/// # Example
///
/// ```
/// use spotback::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

#[doc(hidden)]
pub fn timestamp() -> String {
    chrono::Local::now().format("%I:%M:%S").to_string()
}

/// Prints a timestamped informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Starting authorization...");
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] [{}] {}", $crate::timestamp(), "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a timestamped success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authorization successful!");
/// success!("Wrote {} albums", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] [{}] {}", $crate::timestamp(), "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a timestamped error message with a red exclamation mark and exits
/// the program with status 1.
///
/// Library code never calls this. Errors travel up as [`Error`] values and
/// the binary uses this macro once it decides the run cannot continue.
///
/// # Example
///
/// ```
/// error!("Export failed: {}", err);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] [{}] {}", $crate::timestamp(), "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a timestamped warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, e.g. a failed request attempt that is about
/// to be retried.
///
/// # Example
///
/// ```
/// warning!("Couldn't load URL: {} ({})", url, err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] [{}] {}", $crate::timestamp(), "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
