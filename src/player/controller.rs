//! The playback state machine.
//!
//! Every command mutates the session state and returns the [`PortCall`]s the
//! audio output must receive, in order. A rejected command returns an error
//! and changes nothing.

use std::path::PathBuf;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::error::SessionError;
use super::queue::{NewTrack, PlaybackQueue, Track, TrackId};
use super::state::{DEFAULT_VOLUME, PlaybackState, RepeatMode, Transport};

/// Volume restored by `toggle_mute` when the session is silent.
pub const MUTE_RESTORE_VOLUME: f32 = DEFAULT_VOLUME;

/// A call the session issues on the audio output.
#[derive(Debug, Clone, PartialEq)]
pub enum PortCall {
    Load(PathBuf),
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
}

/// Inbound commands from the presentation layer.
#[derive(Debug, Clone)]
pub enum Command {
    /// Append tracks; the first tracks ever added start playing.
    AddTracks(Vec<NewTrack>),
    /// Play the track at the given queue index.
    Select(usize),
    TogglePlayPause,
    Next,
    Previous,
    /// Seek to an absolute position in seconds.
    Seek(f64),
    /// Seek relative to the current position, in seconds.
    SeekBy(f64),
    SetVolume(f32),
    ToggleMute,
    ToggleShuffle,
    CycleRepeatMode,
    ToggleLiked(TrackId),
}

impl Command {
    /// One-line form for logs. Track batches are summarized by their size.
    pub fn describe(&self) -> String {
        match self {
            Command::AddTracks(tracks) => format!("AddTracks({} tracks)", tracks.len()),
            other => format!("{other:?}"),
        }
    }
}

type Calls = Result<Vec<PortCall>, SessionError>;

/// Owns the queue and playback state and decides what plays next.
pub struct Controller {
    queue: PlaybackQueue,
    state: PlaybackState,
    rng: StdRng,
}

impl Controller {
    /// Create a controller for an empty queue starting from `state`'s modes.
    pub fn new(state: PlaybackState) -> Self {
        Self::with_rng(state, StdRng::from_entropy())
    }

    /// Like [`Controller::new`] with an explicit shuffle source.
    pub fn with_rng(state: PlaybackState, rng: StdRng) -> Self {
        Self {
            queue: PlaybackQueue::new(),
            state,
            rng,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    /// The track under the cursor, `None` while the queue is empty.
    pub fn current_track(&self) -> Option<&Track> {
        self.queue.get(self.state.current_index)
    }

    pub fn is_liked(&self, id: TrackId) -> bool {
        self.state.liked.contains(&id)
    }

    /// Run one command.
    pub fn handle(&mut self, cmd: Command) -> Calls {
        match cmd {
            Command::AddTracks(tracks) => self.add_tracks(tracks),
            Command::Select(index) => self.select_track(index),
            Command::TogglePlayPause => self.toggle_play_pause(),
            Command::Next => self.next(),
            Command::Previous => self.previous(),
            Command::Seek(seconds) => self.seek(seconds),
            Command::SeekBy(delta) => self.seek_by(delta),
            Command::SetVolume(level) => Ok(self.set_volume(level)),
            Command::ToggleMute => Ok(self.toggle_mute()),
            Command::ToggleShuffle => {
                self.toggle_shuffle();
                Ok(Vec::new())
            }
            Command::CycleRepeatMode => {
                self.cycle_repeat_mode();
                Ok(Vec::new())
            }
            Command::ToggleLiked(id) => self.toggle_liked(id).map(|_| Vec::new()),
        }
    }

    /// Append tracks to the queue. Adding to an empty queue starts playing
    /// the first new track; later additions leave transport alone.
    pub fn add_tracks(&mut self, tracks: Vec<NewTrack>) -> Calls {
        if tracks.is_empty() {
            return Err(SessionError::EmptyBatch);
        }
        let was_empty = self.queue.is_empty();
        let added = self.queue.append(tracks);
        debug!(added = added.len(), total = self.queue.len(), "tracks queued");

        if was_empty {
            Ok(self.start_at(0))
        } else {
            Ok(Vec::new())
        }
    }

    /// Jump to `index` and play it from the start.
    pub fn select_track(&mut self, index: usize) -> Calls {
        self.ensure_not_empty()?;
        let len = self.queue.len();
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        Ok(self.start_at(index))
    }

    pub fn toggle_play_pause(&mut self) -> Calls {
        self.ensure_not_empty()?;
        if self.state.transport == Transport::Playing {
            self.state.transport = Transport::Paused;
            Ok(vec![PortCall::Pause])
        } else {
            self.state.transport = Transport::Playing;
            Ok(vec![PortCall::Play])
        }
    }

    /// Advance to the following track, wrapping past the end.
    pub fn next(&mut self) -> Calls {
        self.advance(true)
    }

    /// Step back to the preceding track, wrapping past the start.
    ///
    /// With shuffle on this picks a random track, same as `next`.
    pub fn previous(&mut self) -> Calls {
        self.advance(false)
    }

    /// The current track finished on its own.
    pub fn on_ended(&mut self) -> Calls {
        self.ensure_not_empty()?;
        match self.state.repeat_mode {
            RepeatMode::One => {
                debug!(index = self.state.current_index, "repeating track");
                self.state.position = Duration::ZERO;
                self.state.transport = Transport::Playing;
                Ok(vec![PortCall::Seek(Duration::ZERO), PortCall::Play])
            }
            // Navigation always wraps, so Off and All both loop the queue.
            RepeatMode::Off | RepeatMode::All => self.next(),
        }
    }

    /// Overwrite position (and duration) from a report by the output.
    pub fn on_position_tick(&mut self, position: Duration, duration: Option<Duration>) {
        if self.queue.is_empty() {
            return;
        }
        self.state.duration = duration;
        self.state.position = match duration {
            Some(d) => position.min(d),
            None => position,
        };
    }

    /// Seek to `seconds`, clamped into the current track.
    pub fn seek(&mut self, seconds: f64) -> Calls {
        self.ensure_not_empty()?;
        let target = clamp_position(seconds, self.state.duration)
            .ok_or(SessionError::InvalidPosition(seconds))?;
        self.state.position = target;
        Ok(vec![PortCall::Seek(target)])
    }

    pub fn seek_by(&mut self, delta: f64) -> Calls {
        let current = self.state.position.as_secs_f64();
        self.seek(current + delta)
    }

    /// Set the output level, clamped to `0.0..=1.0`. NaN is ignored.
    pub fn set_volume(&mut self, level: f32) -> Vec<PortCall> {
        if level.is_nan() {
            return Vec::new();
        }
        self.apply_volume(level.clamp(0.0, 1.0))
    }

    /// Silence the output, or restore [`MUTE_RESTORE_VOLUME`] when silent.
    pub fn toggle_mute(&mut self) -> Vec<PortCall> {
        let level = if self.state.volume > 0.0 {
            0.0
        } else {
            MUTE_RESTORE_VOLUME
        };
        self.apply_volume(level)
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.shuffle = !self.state.shuffle;
        debug!(shuffle = self.state.shuffle, "shuffle toggled");
    }

    pub fn cycle_repeat_mode(&mut self) {
        self.state.repeat_mode = self.state.repeat_mode.cycled();
        debug!(mode = ?self.state.repeat_mode, "repeat mode changed");
    }

    /// Flip the favorite flag of `id`. Returns whether it is now liked.
    pub fn toggle_liked(&mut self, id: TrackId) -> Result<bool, SessionError> {
        if !self.queue.contains(id) {
            return Err(SessionError::UnknownTrack(id));
        }
        if self.state.liked.remove(&id) {
            Ok(false)
        } else {
            self.state.liked.insert(id);
            Ok(true)
        }
    }

    fn ensure_not_empty(&self) -> Result<(), SessionError> {
        if self.queue.is_empty() {
            Err(SessionError::EmptyQueue)
        } else {
            Ok(())
        }
    }

    fn advance(&mut self, forward: bool) -> Calls {
        self.ensure_not_empty()?;
        let len = self.queue.len();
        let current = self.state.current_index;
        let index = if self.state.shuffle {
            self.rng.gen_range(0..len)
        } else if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        Ok(self.start_at(index))
    }

    fn start_at(&mut self, index: usize) -> Vec<PortCall> {
        let Some(track) = self.queue.get(index) else {
            return Vec::new();
        };
        let source = track.source().to_path_buf();
        debug!(index, id = %track.id(), title = track.title(), "starting track");

        self.state.current_index = index;
        self.state.position = Duration::ZERO;
        self.state.duration = None;
        self.state.transport = Transport::Playing;
        vec![PortCall::Load(source), PortCall::Play]
    }

    fn apply_volume(&mut self, level: f32) -> Vec<PortCall> {
        self.state.volume = level;
        vec![PortCall::SetVolume(level)]
    }
}

/// Clamp a seek target into `0..=duration`, or only `>= 0` when the
/// duration is unknown. `None` for NaN or an unrepresentable target.
fn clamp_position(seconds: f64, duration: Option<Duration>) -> Option<Duration> {
    if seconds.is_nan() {
        return None;
    }
    let floor = seconds.max(0.0);
    match duration {
        Some(d) => Some(Duration::from_secs_f64(floor.min(d.as_secs_f64())).min(d)),
        None => Duration::try_from_secs_f64(floor).ok(),
    }
}
