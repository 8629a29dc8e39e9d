use std::path::PathBuf;

use tracing::info;

use crate::config::{self, LibrarySettings, RepeatModeSetting};
use crate::library::scan_paths;
use crate::player::{AudioOutput, Command, Controller, PlaybackState, RepeatMode, Session};

pub fn repeat_mode(setting: RepeatModeSetting) -> RepeatMode {
    match setting {
        RepeatModeSetting::Off => RepeatMode::Off,
        RepeatModeSetting::All => RepeatMode::All,
        RepeatModeSetting::One => RepeatMode::One,
    }
}

/// Session on `output` starting with the configured volume and modes.
pub fn build_session<P: AudioOutput>(settings: &config::Settings, output: P) -> Session<P> {
    let state = PlaybackState::new(
        settings.audio.initial_volume,
        settings.playback.shuffle,
        repeat_mode(settings.playback.repeat_mode),
    );
    Session::new(Controller::new(state), output)
}

/// Scan `paths` and queue whatever audio they contain. Returns how many
/// tracks were added.
pub fn ingest<P: AudioOutput>(
    session: &mut Session<P>,
    paths: &[PathBuf],
    library: &LibrarySettings,
) -> usize {
    if paths.is_empty() {
        return 0;
    }
    let tracks = scan_paths(paths, library);
    let count = tracks.len();
    if session.dispatch(Command::AddTracks(tracks)).is_ok() {
        info!(count, queued = session.queue().len(), "tracks added");
        count
    } else {
        0
    }
}
