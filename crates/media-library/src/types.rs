use serde::{Deserialize, Serialize};

/// A single playable track from the device catalog.
///
/// Tracks are immutable once constructed; they are produced by a catalog
/// query and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: u64,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Locator for the playable resource (file path or URL).
    pub uri: String,
}

/// One entry of a catalog source file before normalization.
///
/// Entries with `is_music: false` (ringtones, notification sounds) are
/// filtered out when the catalog is built. A missing title maps to
/// "Unknown Title".
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    pub uri: String,
    #[serde(default = "default_is_music")]
    pub is_music: bool,
}

fn default_is_music() -> bool {
    true
}

impl From<CatalogEntry> for Track {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title.unwrap_or_else(|| "Unknown Title".to_string()),
            artist: entry.artist,
            album: entry.album,
            uri: entry.uri,
        }
    }
}
