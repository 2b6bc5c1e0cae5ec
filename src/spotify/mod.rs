//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the
//! exporter. It handles the browser-based authorization, authenticated
//! requests with a fixed retry budget, and the two pagination conventions of
//! the API.
//!
//! ## Architecture
//!
//! ```text
//! Export driver (CLI)
//!          ↓
//! SpotifyClient (get / list / list_by_cursor / authorize)
//!     ├── Authorization (implicit grant, local capture server)
//!     ├── Pagination (offset `next` links, cursor containers)
//!     └── Retry (fixed attempts, fixed delay)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Opens the authorize page and captures the token through the
//!   local server started in [`crate::server`]
//! - [`client`] - The [`SpotifyClient`] facade
//! - [`paging`] - How to read offset and cursor pages
//! - [`retry`] - The generic retry loop
//!
//! ## Pagination
//!
//! Most library endpoints (`me/albums`, `me/tracks`, playlists) return
//! `{"items": [...], "next": url}` and are drained with
//! [`SpotifyClient::list`]. `me/following` nests items in an `artists` container
//! with an `after` cursor and is drained with [`SpotifyClient::list_by_cursor`]
//! and [`paging::Container`].
//!
//! ## Error Handling
//!
//! Transient failures are retried and logged. Once the retry budget of a
//! request is spent the client returns [`crate::Error::RetriesExhausted`] and
//! nothing fetched for that listing is kept. The binary then exits with a
//! non-zero status.
//!
//! ## Usage Patterns
//!
//! ```rust
//! let spotify = SpotifyClient::authorize(&config).await?;
//! let tracks = spotify.list("me/tracks", &[("limit", "50")]).await?;
//! let artists = spotify
//!     .list_by_cursor("me/following?type=artist", &[("limit", "50")], &paging::Container::new("artists"))
//!     .await?;
//! ```
//!
//! ## Thread Safety
//!
//! Requests are awaited one after another. There is no parallel fetching and
//! the token is never mutated after the client was created.

pub mod auth;
pub mod client;
pub mod paging;
pub mod retry;

pub use client::SpotifyClient;
