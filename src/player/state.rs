//! Session state types: transport, repeat mode and the consolidated
//! `PlaybackState` value read by the UI.

use std::collections::BTreeSet;
use std::time::Duration;

use super::queue::TrackId;

/// Volume a session starts at, and the level `toggle_mute` restores.
pub const DEFAULT_VOLUME: f32 = 0.8;

/// Transport status of the session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Transport {
    /// Nothing queued yet.
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Policy applied when a track finishes on its own.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RepeatMode {
    #[default]
    Off,
    /// Loop the whole queue.
    All,
    /// Replay the current track.
    One,
}

impl RepeatMode {
    /// The mode after this one in the `Off -> All -> One -> Off` cycle.
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

/// Mutable state of a playback session.
///
/// `current_index` is only meaningful while the queue is non-empty, and
/// `transport` is `Stopped` exactly when the queue is empty.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub transport: Transport,
    /// Elapsed time in the current track, never past `duration` when known.
    pub position: Duration,
    /// Length of the current track as last reported by the audio output.
    pub duration: Option<Duration>,
    /// Output level in `0.0..=1.0`.
    pub volume: f32,
    pub repeat_mode: RepeatMode,
    pub shuffle: bool,
    pub liked: BTreeSet<TrackId>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME, false, RepeatMode::Off)
    }
}

impl PlaybackState {
    /// Fresh state for an empty queue with the given starting modes.
    pub fn new(volume: f32, shuffle: bool, repeat_mode: RepeatMode) -> Self {
        let volume = if volume.is_nan() {
            DEFAULT_VOLUME
        } else {
            volume.clamp(0.0, 1.0)
        };
        Self {
            current_index: 0,
            transport: Transport::Stopped,
            position: Duration::ZERO,
            duration: None,
            volume,
            repeat_mode,
            shuffle,
            liked: BTreeSet::new(),
        }
    }
}
