use std::{fmt, path::PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    Error, Res,
    types::{Artist, ArtistRef, Playlist, SavedAlbum, SavedTrack, Track},
};

const LINE_END: &str = "\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// JSON array of the records returned by Spotify
    Json,
    /// Tab-separated text
    Txt,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Txt => "txt",
        }
    }
}

/// A library collection written to its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    SavedAlbums,
    SavedTracks,
    FollowedArtists,
    Playlists,
}

impl Resource {
    pub fn slug(&self) -> &'static str {
        match self {
            Resource::SavedAlbums => "saved-albums",
            Resource::SavedTracks => "saved-tracks",
            Resource::FollowedArtists => "followed-artists",
            Resource::Playlists => "playlists",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Resource::SavedAlbums => "albums",
            Resource::SavedTracks => "tracks",
            Resource::FollowedArtists => "artists",
            Resource::Playlists => "playlists",
        };
        f.write_str(label)
    }
}

/// `<base>-<resource>.<ext>`, e.g. `library-saved-albums.json`.
pub fn output_path(base: &str, resource: Resource, format: Format) -> PathBuf {
    PathBuf::from(format!("{}-{}.{}", base, resource.slug(), format.extension()))
}

pub fn render(resource: Resource, format: Format, records: &[Value]) -> Res<String> {
    match format {
        Format::Json => Ok(serde_json::to_string(records)?),
        Format::Txt => render_text(resource, records),
    }
}

/// Renders and writes one collection. Called only once the whole collection
/// has been fetched.
pub async fn write(
    base: &str,
    resource: Resource,
    format: Format,
    records: &[Value],
) -> Res<PathBuf> {
    let path = output_path(base, resource, format);
    let contents = render(resource, format, records)?;
    async_fs::write(&path, contents).await?;
    Ok(path)
}

fn render_text(resource: Resource, records: &[Value]) -> Res<String> {
    let mut out = String::new();
    match resource {
        Resource::SavedAlbums => {
            for saved in parse::<SavedAlbum>(records)? {
                let album = saved.album;
                let artists = join_artists(&album.artists);
                push_line(&mut out, &[album.name.as_str(), artists.as_str(), album.uri.as_str()]);
            }
        }
        Resource::SavedTracks => {
            for track in parse::<SavedTrack>(records)?.into_iter().filter_map(|s| s.track) {
                push_track(&mut out, &track);
            }
        }
        Resource::FollowedArtists => {
            for artist in parse::<Artist>(records)? {
                push_line(&mut out, &[artist.name.as_str(), artist.uri.as_str()]);
            }
        }
        Resource::Playlists => {
            for playlist in parse::<Playlist>(records)? {
                out.push_str(&playlist.name);
                out.push_str(LINE_END);
                for track in playlist.tracks.into_iter().filter_map(|s| s.track) {
                    push_track(&mut out, &track);
                }
                out.push_str(LINE_END);
            }
        }
    }
    Ok(out)
}

fn parse<T: DeserializeOwned>(records: &[Value]) -> Res<Vec<T>> {
    records
        .iter()
        .map(|record| T::deserialize(record).map_err(Error::from))
        .collect()
}

fn push_track(out: &mut String, track: &Track) {
    let album = track.album.as_ref().map(|a| a.name.as_str()).unwrap_or("");
    let artists = join_artists(&track.artists);
    push_line(out, &[track.name.as_str(), artists.as_str(), album, track.uri.as_str()]);
}

fn push_line(out: &mut String, fields: &[&str]) {
    out.push_str(&fields.join("\t"));
    out.push_str(LINE_END);
}

fn join_artists(artists: &[ArtistRef]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
