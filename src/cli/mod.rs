//! # CLI Module
//!
//! This module provides the command-line layer of spotback. It resolves the
//! access token (given on the command line or obtained through the browser),
//! asks for an output file name when none was given, and runs the export.
//!
//! ## Data Flow
//!
//! 1. **Token**: `--token` or [`SpotifyClient::authorize`]
//! 2. **Profile**: `GET me` for the user id
//! 3. **Collections**: saved albums, saved tracks, followed artists, playlists
//! 4. **Files**: one file per collection, written after it was fetched fully
//! 5. **Summary**: a table of written files
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotback library                       # authorize in the browser, JSON files
//! spotback --format txt library          # tab-separated text files
//! spotback --token BQC... library        # reuse an existing OAuth token
//! ```
//!
//! ## Error Handling
//!
//! Errors are returned to `main`, which prints them and exits with status 1.
//! Files already written for earlier collections are kept.

mod export;

use std::io::{self, BufRead, Write};

use tabled::Table;

use crate::{
    Res,
    config::Config,
    export::Format,
    spotify::SpotifyClient,
    types::AccessToken,
};

pub use export::export_library;

/// Options of an export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub token: Option<String>,
    pub format: Format,
    pub file: Option<String>,
}

pub async fn run(options: ExportOptions, config: &Config) -> Res<()> {
    let base = match options.file {
        Some(file) if !file.trim().is_empty() => file,
        _ => prompt_file_name(&mut io::stdin().lock())?,
    };

    let spotify = match options.token {
        Some(token) => SpotifyClient::with_config(AccessToken::new(token), config)?,
        None => SpotifyClient::authorize(config).await?,
    };

    let rows = export_library(&spotify, &base, options.format).await?;
    println!("{}", Table::new(rows));
    Ok(())
}

/// Asks for a file name until a non-empty one is entered.
pub fn prompt_file_name<R: BufRead>(input: &mut R) -> Res<String> {
    loop {
        print!("Enter a file name (e.g. playlists.txt): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no file name given").into());
        }

        let name = line.trim();
        if !name.is_empty() {
            return Ok(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn prompt_skips_blank_lines() {
        let mut input = Cursor::new("\n   \nlibrary\n");
        assert_eq!(prompt_file_name(&mut input).unwrap(), "library");
    }

    #[test]
    fn prompt_fails_on_end_of_input() {
        let mut input = Cursor::new("\n");
        assert!(prompt_file_name(&mut input).is_err());
    }
}
