//! Track model and the append-only playback queue.

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Session-unique track identifier, assigned in increasing order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A track as produced by ingestion, before the queue gives it an id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    /// Handle the audio output loads.
    pub source: PathBuf,
    pub cover_art: Option<PathBuf>,
    /// Display-only length; the output's reported duration wins for seeking.
    pub duration_hint: Option<Duration>,
}

/// A queued track. Immutable once the queue has created it.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    id: TrackId,
    title: String,
    artist: String,
    source: PathBuf,
    cover_art: Option<PathBuf>,
    duration_hint: Option<Duration>,
}

impl Track {
    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn cover_art(&self) -> Option<&Path> {
        self.cover_art.as_deref()
    }

    pub fn duration_hint(&self) -> Option<Duration> {
        self.duration_hint
    }
}

/// Ordered tracks of a session.
///
/// Insertion order is preserved and nothing is ever removed or moved, so an
/// index stays valid for the whole session.
#[derive(Debug)]
pub struct PlaybackQueue {
    tracks: Vec<Track>,
    next_id: u64,
}

impl Default for PlaybackQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 1,
        }
    }

    /// Append `new_tracks` in order, assigning ids. Returns the index range
    /// the tracks now occupy.
    pub fn append(&mut self, new_tracks: Vec<NewTrack>) -> Range<usize> {
        let start = self.tracks.len();
        self.tracks.reserve(new_tracks.len());
        for t in new_tracks {
            let id = TrackId(self.next_id);
            self.next_id += 1;
            self.tracks.push(Track {
                id,
                title: t.title,
                artist: t.artist,
                source: t.source,
                cover_art: t.cover_art,
                duration_hint: t.duration_hint,
            });
        }
        start..self.tracks.len()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// Index of the track with `id`, if queued.
    pub fn position_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.position_of(id).is_some()
    }
}
