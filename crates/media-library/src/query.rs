use tracing::debug;

use crate::{MediaCatalog, Result, Track};

/// Resolve a free-text filter against the catalog.
///
/// Matching is a case-insensitive substring test over title, artist and
/// album. An empty or absent filter returns the full catalog. Results are
/// ordered by title ascending, case-insensitively. The catalog is re-read
/// on every invocation.
pub fn query(catalog: &dyn MediaCatalog, filter: Option<&str>) -> Result<Vec<Track>> {
    let mut tracks = catalog.all()?;

    let filter = filter.map(str::trim).filter(|f| !f.is_empty());
    if let Some(filter) = filter {
        let needle = filter.to_lowercase();
        tracks.retain(|track| matches(track, &needle));
    }

    tracks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));

    debug!(
        filter = filter.unwrap_or(""),
        results = tracks.len(),
        "library query"
    );
    Ok(tracks)
}

fn matches(track: &Track, needle: &str) -> bool {
    let field_matches = |field: Option<&str>| {
        field
            .map(|f| f.to_lowercase().contains(needle))
            .unwrap_or(false)
    };
    track.title.to_lowercase().contains(needle)
        || field_matches(track.artist.as_deref())
        || field_matches(track.album.as_deref())
}
