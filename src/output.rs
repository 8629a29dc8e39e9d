//! [`AudioOutput`] backed by a `rodio` sink on the default device.
//!
//! rodio mixes on its own thread; this wrapper only creates sinks, forwards
//! transport calls and turns sink state into [`OutputEvent`]s when polled.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lofty::prelude::*;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, info};

use crate::config::AudioSettings;
use crate::player::{AudioOutput, OutputError, OutputEvent};

pub struct RodioOutput {
    stream: OutputStream,
    sink: Option<Sink>,
    source: Option<PathBuf>,
    duration: Option<Duration>,
    volume: f32,
    gate: EventGate,
}

/// What a sink observation should turn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Ended,
    Tick,
}

/// Decides when a sink's state is worth reporting: the end of a track once
/// per load, and position ticks at most once per `tick` while playing.
#[derive(Debug)]
struct EventGate {
    tick: Duration,
    last_tick: Option<Instant>,
    ended_reported: bool,
}

impl EventGate {
    fn new(tick: Duration) -> Self {
        Self {
            tick,
            last_tick: None,
            ended_reported: false,
        }
    }

    /// A new source is playing; the next end and the next tick are reported.
    fn rearm(&mut self) {
        self.last_tick = None;
        self.ended_reported = false;
    }

    /// Report the next tick without waiting out the interval.
    fn tick_now(&mut self) {
        self.last_tick = None;
    }

    fn observe(&mut self, drained: bool, paused: bool, now: Instant) -> Option<Signal> {
        // A drain is reported even if a pause landed after it.
        if drained {
            if self.ended_reported {
                return None;
            }
            self.ended_reported = true;
            return Some(Signal::Ended);
        }
        if paused {
            return None;
        }
        let due = self
            .last_tick
            .is_none_or(|last| now.duration_since(last) >= self.tick);
        if due {
            self.last_tick = Some(now);
            return Some(Signal::Tick);
        }
        None
    }
}

impl RodioOutput {
    /// Open the default output device.
    pub fn open(settings: &AudioSettings) -> Result<Self, OutputError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| OutputError::NoDevice(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped, which garbles the TUI.
        stream.log_on_drop(false);
        info!("opened default audio output");

        Ok(Self {
            stream,
            sink: None,
            source: None,
            duration: None,
            volume: settings.initial_volume,
            gate: EventGate::new(Duration::from_millis(settings.tick_ms.max(1))),
        })
    }

    fn start_sink(&mut self, path: &Path) -> Result<(), OutputError> {
        let (sink, decoded_duration) = open_sink(&self.stream, path)?;
        sink.set_volume(self.volume);
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.duration = decoded_duration.or_else(|| probe_duration(path));
        self.source = Some(path.to_path_buf());
        self.gate.rearm();
        debug!(path = %path.display(), duration = ?self.duration, "loaded source");
        Ok(())
    }

    /// A sink that played to the end cannot be restarted; decode the source again.
    fn reload_if_drained(&mut self) -> Result<(), OutputError> {
        let drained = self
            .sink
            .as_ref()
            .map(Sink::empty)
            .ok_or(OutputError::NothingLoaded)?;
        if drained {
            let path = self.source.clone().ok_or(OutputError::NothingLoaded)?;
            self.start_sink(&path)?;
        }
        Ok(())
    }

    fn sink(&self) -> Result<&Sink, OutputError> {
        self.sink.as_ref().ok_or(OutputError::NothingLoaded)
    }
}

/// Create a paused sink with `path` decoded into it.
fn open_sink(stream: &OutputStream, path: &Path) -> Result<(Sink, Option<Duration>), OutputError> {
    let file = File::open(path).map_err(|source| OutputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| OutputError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let duration = decoder.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.append(decoder);
    Ok((sink, duration))
}

/// Container-level duration for formats the decoder cannot size up front.
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, source: &Path) -> Result<(), OutputError> {
        // Silence the previous track even if the new one fails to open.
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.duration = None;
        self.start_sink(source)
    }

    fn play(&mut self) -> Result<(), OutputError> {
        self.reload_if_drained()?;
        self.sink()?.play();
        Ok(())
    }

    fn pause(&mut self) -> Result<(), OutputError> {
        self.sink()?.pause();
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<(), OutputError> {
        self.reload_if_drained()?;
        self.sink()?
            .try_seek(position)
            .map_err(|e| OutputError::Seek(e.to_string()))?;
        self.gate.tick_now();
        Ok(())
    }

    fn set_volume(&mut self, level: f32) -> Result<(), OutputError> {
        self.volume = level;
        if let Some(sink) = &self.sink {
            sink.set_volume(level);
        }
        Ok(())
    }

    fn position(&self) -> Duration {
        self.sink.as_ref().map(Sink::get_pos).unwrap_or_default()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn poll_event(&mut self) -> Option<OutputEvent> {
        let sink = self.sink.as_ref()?;
        match self.gate.observe(sink.empty(), sink.is_paused(), Instant::now())? {
            Signal::Ended => Some(OutputEvent::Ended),
            Signal::Tick => Some(OutputEvent::Position(sink.get_pos())),
        }
    }
}
