use std::path::PathBuf;

use serde::Deserialize;

use crate::player::DEFAULT_VOLUME;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/spindle/config.toml` or `~/.config/spindle/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SPINDLE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume the session starts with, in `0.0..=1.0`.
    pub initial_volume: f32,
    /// Minimum interval between position reports from the output (milliseconds).
    pub tick_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: DEFAULT_VOLUME,
            tick_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Repeat mode the session starts with.
    pub repeat_mode: RepeatModeSetting,
}

#[derive(Debug, Copy, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatModeSetting {
    #[default]
    #[serde(alias = "none", alias = "no-loop", alias = "no_loop")]
    Off,
    #[serde(
        alias = "loop-all",
        alias = "loop_all",
        alias = "loopall",
        alias = "repeat-all"
    )]
    All,
    #[serde(
        alias = "loop-one",
        alias = "loop_one",
        alias = "loopone",
        alias = "repeat-one"
    )]
    One,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub seek_seconds: u64,
    /// Volume change applied by `+` / `-`.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Sibling file names used as cover art, checked in order (case-insensitive).
    pub cover_names: Vec<String>,
    /// Artist shown for files without an artist tag.
    pub default_artist: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            cover_names: vec![
                "cover.jpg".into(),
                "cover.png".into(),
                "folder.jpg".into(),
                "folder.png".into(),
                "front.jpg".into(),
            ],
            default_artist: "Local File".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether liked tracks get a marker in the track list.
    pub show_liked_marker: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ spindle ~ ".to_string(),
            show_liked_marker: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive, overridden by `SPINDLE_LOG`.
    pub level: String,
    /// Where `spindle.log` is written. Defaults to the XDG state directory.
    pub directory: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
