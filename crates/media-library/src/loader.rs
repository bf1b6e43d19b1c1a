use std::path::Path;

use tracing::info;

use crate::{CatalogEntry, LibraryError, MemoryCatalog, Result, Track};

/// Load a catalog from a JSON file holding an array of entries.
pub fn load_catalog(path: &Path) -> Result<MemoryCatalog> {
    let data = std::fs::read_to_string(path).map_err(|e| LibraryError::Io(e.to_string()))?;
    let catalog = parse_catalog(&data)?;
    info!(path = %path.display(), tracks = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Parse a JSON catalog, keeping only music entries.
pub fn parse_catalog(json: &str) -> Result<MemoryCatalog> {
    let entries: Vec<CatalogEntry> =
        serde_json::from_str(json).map_err(|e| LibraryError::Parse(e.to_string()))?;
    let tracks: Vec<Track> = entries
        .into_iter()
        .filter(|entry| entry.is_music)
        .map(Track::from)
        .collect();
    Ok(MemoryCatalog::new(tracks))
}
