use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Ordered query parameters of a request.
pub type Params = Vec<(String, String)>;

/// OAuth bearer token used for every API request of a run.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Outcome reported by the capture server's `/token` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Granted(AccessToken),
    Denied(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: Option<AlbumRef>,
}

/// Item of `me/tracks` and of a playlist's track listing. `track` is null for
/// removed or unavailable tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAlbum {
    pub album: Album,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksRef {
    pub href: String,
    pub total: u64,
}

/// Playlist as listed by `users/{id}/playlists`, before its tracks are loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub name: String,
    pub tracks: TracksRef,
}

/// Playlist after its `tracks` field was replaced with the full listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<SavedTrack>,
}

#[derive(Tabled)]
pub struct ExportTableRow {
    pub resource: String,
    pub items: usize,
    pub file: String,
}
