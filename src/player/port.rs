//! The audio output capability the session directs.

use std::path::Path;
use std::time::Duration;

use super::error::OutputError;

/// Notifications from the output, drained by [`Session::pump`](super::Session::pump).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    /// Playback position of the loaded track.
    Position(Duration),
    /// The loaded track played to its end.
    Ended,
}

/// A device that renders the loaded track.
///
/// Implementations must tolerate a `load` superseding an earlier one at any
/// time, and `play` after `Ended` restarts the loaded track.
pub trait AudioOutput {
    /// Replace the loaded track with `source`, positioned at the start and paused.
    fn load(&mut self, source: &Path) -> Result<(), OutputError>;
    fn play(&mut self) -> Result<(), OutputError>;
    fn pause(&mut self) -> Result<(), OutputError>;
    fn seek(&mut self, position: Duration) -> Result<(), OutputError>;
    fn set_volume(&mut self, level: f32) -> Result<(), OutputError>;
    fn position(&self) -> Duration;
    /// Length of the loaded track, if the device knows it.
    fn duration(&self) -> Option<Duration>;
    /// Next pending notification, if any.
    fn poll_event(&mut self) -> Option<OutputEvent>;
}
