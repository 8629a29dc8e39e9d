//! Glue between the controller and an audio output.

use tracing::{debug, warn};

use super::controller::{Command, Controller, PortCall};
use super::error::SessionError;
use super::port::{AudioOutput, OutputEvent};
use super::queue::{PlaybackQueue, Track};
use super::state::PlaybackState;

/// A controller driving one audio output.
///
/// Output failures are logged and dropped: the controller keeps the state it
/// chose even if the device did not follow.
pub struct Session<P> {
    controller: Controller,
    output: P,
}

impl<P: AudioOutput> Session<P> {
    /// Pair `controller` with `output` and push the starting volume.
    pub fn new(controller: Controller, output: P) -> Self {
        let volume = controller.state().volume;
        let mut session = Self { controller, output };
        session.apply(vec![PortCall::SetVolume(volume)]);
        session
    }

    /// Run `cmd` and forward its calls to the output.
    pub fn dispatch(&mut self, cmd: Command) -> Result<(), SessionError> {
        if matches!(cmd, Command::Seek(_) | Command::SeekBy(_)) {
            // Seeks clamp against, and step from, what the device reports now.
            self.controller
                .on_position_tick(self.output.position(), self.output.duration());
        }
        debug!(cmd = %cmd.describe(), "dispatch");
        let calls = self.controller.handle(cmd)?;
        self.apply(calls);
        Ok(())
    }

    /// Feed every pending output notification to the controller.
    /// Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.output.poll_event() {
            handled += 1;
            match event {
                OutputEvent::Position(position) => {
                    let duration = self.output.duration();
                    self.controller.on_position_tick(position, duration);
                }
                OutputEvent::Ended => match self.controller.on_ended() {
                    Ok(calls) => self.apply(calls),
                    Err(e) => debug!(error = %e, "end of track ignored"),
                },
            }
        }
        handled
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn state(&self) -> &PlaybackState {
        self.controller.state()
    }

    pub fn queue(&self) -> &PlaybackQueue {
        self.controller.queue()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.controller.current_track()
    }

    #[cfg(test)]
    pub fn output(&self) -> &P {
        &self.output
    }

    #[cfg(test)]
    pub fn output_mut(&mut self) -> &mut P {
        &mut self.output
    }

    fn apply(&mut self, calls: Vec<PortCall>) {
        for call in calls {
            let result = match &call {
                PortCall::Load(source) => self.output.load(source),
                PortCall::Play => self.output.play(),
                PortCall::Pause => self.output.pause(),
                PortCall::Seek(position) => self.output.seek(*position),
                PortCall::SetVolume(level) => self.output.set_volume(*level),
            };
            if let Err(e) = result {
                warn!(?call, error = %e, "audio output call failed");
            }
        }
    }
}
