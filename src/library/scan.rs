use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::player::NewTrack;

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

pub(super) fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Build tracks from `paths`, in argument order.
///
/// Audio files are taken as given. Directories are walked according to
/// `settings` and contribute their audio files sorted by path. Anything else
/// is skipped.
pub fn scan_paths(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<NewTrack> {
    let extensions = normalized_extensions(settings);
    let mut covers = CoverLookup::default();
    let mut tracks: Vec<NewTrack> = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found = walk_dir(path, settings, &extensions);
            found.sort();
            tracks.extend(found.iter().map(|p| read_track(p, settings, &mut covers)));
        } else if path.is_file() && is_audio_file(path, &extensions) {
            tracks.push(read_track(path, settings, &mut covers));
        } else {
            debug!(path = %path.display(), "skipping non-audio path");
        }
    }

    info!(count = tracks.len(), "scanned audio files");
    tracks
}

fn walk_dir(dir: &Path, settings: &LibrarySettings, extensions: &[String]) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_audio_file(p, extensions))
        .collect()
}

/// Read display metadata for one file, falling back to the file name and
/// `default_artist` when tags are missing or unreadable.
pub(super) fn read_track(
    path: &Path,
    settings: &LibrarySettings,
    covers: &mut CoverLookup,
) -> NewTrack {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist = settings.default_artist.clone();
    let mut duration_hint: Option<Duration> = None;

    if let Ok(tagged) = lofty::read_from_path(path) {
        duration_hint = Some(tagged.properties().duration()).filter(|d| !d.is_zero());

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.title() {
                let v = v.trim();
                if !v.is_empty() {
                    title = v.to_string();
                }
            }
            if let Some(v) = tag.artist() {
                let v = v.trim();
                if !v.is_empty() {
                    artist = v.to_string();
                }
            }
        }
    }

    NewTrack {
        title,
        artist,
        source: path.to_path_buf(),
        cover_art: covers.cover_for(path, &settings.cover_names),
        duration_hint,
    }
}

/// Cover art resolved per directory, so a folder is listed once per scan.
#[derive(Debug, Default)]
pub(super) struct CoverLookup {
    by_dir: HashMap<PathBuf, Option<PathBuf>>,
}

impl CoverLookup {
    /// Cover for the directory holding `track`.
    pub(super) fn cover_for(&mut self, track: &Path, names: &[String]) -> Option<PathBuf> {
        let dir = track
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        self.by_dir
            .entry(dir.to_path_buf())
            .or_insert_with(|| find_cover(dir, names))
            .clone()
    }
}

/// First file in `dir` whose name matches one of `names`, in the order of
/// `names`.
pub(super) fn find_cover(dir: &Path, names: &[String]) -> Option<PathBuf> {
    if names.is_empty() {
        return None;
    }
    let entries: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .collect();

    names.iter().find_map(|name| {
        entries
            .iter()
            .find(|p| {
                p.file_name()
                    .and_then(|s| s.to_str())
                    .is_some_and(|f| f.eq_ignore_ascii_case(name.trim()))
                    && p.is_file()
            })
            .cloned()
    })
}
