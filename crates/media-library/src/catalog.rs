use crate::{Result, Track};

/// Read access to the device's media catalog.
///
/// `all` re-reads the underlying store on every call; nothing in this crate
/// caches catalog contents between queries.
pub trait MediaCatalog {
    fn all(&self) -> Result<Vec<Track>>;
}

/// An in-memory catalog. Backs tests and hosts that build the track list
/// themselves (the media index itself lives outside this crate).
#[derive(Debug)]
pub struct MemoryCatalog {
    tracks: Vec<Track>,
}

impl MemoryCatalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl MediaCatalog for MemoryCatalog {
    fn all(&self) -> Result<Vec<Track>> {
        Ok(self.tracks.clone())
    }
}
