use std::fmt;

/// External-tool identifier of a track; the only notion of track identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One playable playlist entry. Compare tracks with [`Track::same_as`];
/// two different tracks may well share a title.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub url: String,
    /// Duration in whole seconds as reported by the listing, 0 when unknown.
    pub duration: u64,
}

impl Track {
    pub fn same_as(&self, other: &Track) -> bool {
        self.id == other.id
    }
}
