//! Recording audio output for tests.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use super::controller::PortCall;
use super::error::OutputError;
use super::port::{AudioOutput, OutputEvent};

/// Records every call as a [`PortCall`] and replays queued events.
#[derive(Debug, Default)]
pub(crate) struct FakeOutput {
    pub calls: Vec<PortCall>,
    pub events: VecDeque<OutputEvent>,
    pub duration: Option<Duration>,
    pub position: Duration,
    /// Make `play` fail after recording it.
    pub reject_play: bool,
}

impl FakeOutput {
    pub fn with_duration(secs: u64) -> Self {
        Self {
            duration: Some(Duration::from_secs(secs)),
            ..Self::default()
        }
    }
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, source: &Path) -> Result<(), OutputError> {
        self.calls.push(PortCall::Load(source.to_path_buf()));
        self.position = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) -> Result<(), OutputError> {
        self.calls.push(PortCall::Play);
        if self.reject_play {
            return Err(OutputError::NoDevice("device unplugged".into()));
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), OutputError> {
        self.calls.push(PortCall::Pause);
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<(), OutputError> {
        self.calls.push(PortCall::Seek(position));
        self.position = position;
        Ok(())
    }

    fn set_volume(&mut self, level: f32) -> Result<(), OutputError> {
        self.calls.push(PortCall::SetVolume(level));
        Ok(())
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn poll_event(&mut self) -> Option<OutputEvent> {
        self.events.pop_front()
    }
}
