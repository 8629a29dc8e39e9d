//! Playback session: the queue, transport state and the policies deciding
//! which track plays next.
//!
//! `Controller` is a pure state machine that answers every command with the
//! list of calls the audio output should receive. `Session` pairs it with an
//! [`AudioOutput`] and carries those calls out.

mod controller;
mod error;
mod port;
mod queue;
mod session;
mod state;

pub use controller::{Command, Controller, MUTE_RESTORE_VOLUME, PortCall};
pub use error::{OutputError, SessionError};
pub use port::{AudioOutput, OutputEvent};
pub use queue::{NewTrack, PlaybackQueue, Track, TrackId};
pub use session::Session;
pub use state::{DEFAULT_VOLUME, PlaybackState, RepeatMode, Transport};

#[cfg(test)]
pub(crate) mod fake;
