use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    Res,
    export::{self, Format, Resource},
    info,
    spotify::{SpotifyClient, paging::Container},
    success,
    types::{ExportTableRow, PlaylistSummary, User},
};

/// Exports the library of the authorized user into one file per resource.
///
/// Fetches, in order, the saved albums, saved tracks, followed artists and
/// playlists (each with its full track listing). Every file is written right
/// after its collection was fetched completely; a failing request aborts the
/// export before the file of the current resource is written.
///
/// # Arguments
///
/// * `spotify` - Client bound to a token with the `playlist-read-private`,
///   `user-library-read` and `user-follow-read` scopes
/// * `base` - File name prefix, `<base>-<resource>.<ext>`
/// * `format` - Output format of every file
///
/// # Returns
///
/// One summary row per written file.
pub async fn export_library(
    spotify: &SpotifyClient,
    base: &str,
    format: Format,
) -> Res<Vec<ExportTableRow>> {
    let me: User = serde_json::from_value(spotify.get("me", &[]).await?)?;
    info!(
        "Logged in as {} ({})",
        me.display_name.as_deref().unwrap_or(&me.id),
        me.id
    );

    let mut rows = Vec::new();

    let albums = spotify.list("me/albums", &[("limit", "50")]).await?;
    info!("{}", joined_names(&albums, "/album/name"));
    rows.push(save(base, Resource::SavedAlbums, format, &albums).await?);

    let tracks = spotify.list("me/tracks", &[("limit", "50")]).await?;
    rows.push(save(base, Resource::SavedTracks, format, &tracks).await?);

    let artists = spotify
        .list_by_cursor(
            "me/following?type=artist",
            &[("limit", "50")],
            &Container::new("artists"),
        )
        .await?;
    info!("{}", joined_names(&artists, "/name"));
    rows.push(save(base, Resource::FollowedArtists, format, &artists).await?);

    let playlists = load_playlists(spotify, &me).await?;
    rows.push(save(base, Resource::Playlists, format, &playlists).await?);

    Ok(rows)
}

async fn load_playlists(spotify: &SpotifyClient, me: &User) -> Res<Vec<Value>> {
    let path = format!("users/{}/playlists", urlencoding::encode(&me.id));
    let mut playlists = spotify.list(&path, &[("limit", "50")]).await?;

    let pb = playlist_progress(playlists.len());
    for playlist in playlists.iter_mut() {
        let summary = PlaylistSummary::deserialize(&*playlist)?;
        pb.set_message(summary.name.clone());
        pb.suspend(|| {
            info!(
                "Loading playlist: {} ({} songs)",
                summary.name, summary.tracks.total
            )
        });

        let tracks = spotify.list(&summary.tracks.href, &[("limit", "100")]).await?;
        if let Some(fields) = playlist.as_object_mut() {
            fields.insert("tracks".to_string(), Value::Array(tracks));
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(playlists)
}

fn playlist_progress(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Comma-joined string values found at `pointer` in each record.
fn joined_names(records: &[Value], pointer: &str) -> String {
    records
        .iter()
        .filter_map(|record| record.pointer(pointer).and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(",")
}

async fn save(
    base: &str,
    resource: Resource,
    format: Format,
    records: &[Value],
) -> Res<ExportTableRow> {
    let path = export::write(base, resource, format, records).await?;
    success!(
        "Wrote {} {} to file: {}",
        records.len(),
        resource,
        path.display()
    );
    Ok(ExportTableRow {
        resource: resource.slug().to_string(),
        items: records.len(),
        file: path.display().to_string(),
    })
}
