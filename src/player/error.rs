//! Error types for the playback session and audio output.

use std::path::PathBuf;

use thiserror::Error;

use super::queue::TrackId;

/// A command was rejected because its precondition did not hold.
///
/// Rejected commands leave the session untouched; callers are expected to
/// disable the matching controls instead of surfacing these.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// Transport or navigation requested with nothing queued.
    #[error("queue is empty")]
    EmptyQueue,

    /// `add_tracks` called with no tracks.
    #[error("no tracks to add")]
    EmptyBatch,

    /// Track index past the end of the queue.
    #[error("index {index} out of range for queue of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Track id not present in the queue.
    #[error("unknown track {0}")]
    UnknownTrack(TrackId),

    /// Seek target that cannot be clamped to a position.
    #[error("invalid seek position: {0}")]
    InvalidPosition(f64),
}

/// Failure reported by an audio output device.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("no audio output device: {0}")]
    NoDevice(String),

    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("seek failed: {0}")]
    Seek(String),

    #[error("no track loaded")]
    NothingLoaded,
}
