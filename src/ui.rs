//! UI rendering for the terminal user interface.
//!
//! Everything here only reads session state; input handling lives in the
//! runtime event loop.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::config::{ControlsSettings, UiSettings};
use crate::player::{Controller, PlaybackState, RepeatMode, Track, Transport};

/// What one frame renders.
pub struct View<'a> {
    pub controller: &'a Controller,
    /// Highlighted row in the track list.
    pub cursor: usize,
    /// Text typed into the add prompt, when it is open.
    pub prompt: Option<&'a str>,
    pub message: Option<&'a str>,
}

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Format a `Duration` as `m:ss`.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `elapsed / total`, with `0:00` standing in for an unknown total.
fn time_text(position: Duration, total: Option<Duration>) -> String {
    format!(
        "{} / {}",
        format_time(position),
        format_time(total.unwrap_or_default())
    )
}

/// Fraction of the track played, in `0.0..=1.0`.
fn progress_ratio(position: Duration, total: Option<Duration>) -> f64 {
    match total {
        Some(t) if !t.is_zero() => (position.as_secs_f64() / t.as_secs_f64()).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

fn transport_label(transport: Transport) -> &'static str {
    match transport {
        Transport::Stopped => "Stopped",
        Transport::Playing => "Playing",
        Transport::Paused => "Paused",
    }
}

fn repeat_label(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "Repeat: Off",
        RepeatMode::All => "Repeat: All",
        RepeatMode::One => "Repeat: One",
    }
}

fn status_text(state: &PlaybackState, message: Option<&str>) -> String {
    let mut parts = vec![
        transport_label(state.transport).to_string(),
        format!("Shuffle: {}", if state.shuffle { "ON" } else { "OFF" }),
        repeat_label(state.repeat_mode).to_string(),
        format!("Vol: {:.0}%", state.volume * 100.0),
    ];
    if let Some(msg) = message {
        parts.push(msg.to_string());
    }
    parts.join(" • ")
}

fn controls_text(seek_seconds: u64) -> String {
    [
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next".to_string(),
        "[j/k] move".to_string(),
        "[enter] play selected".to_string(),
        format!("[H/L] seek -/+{seek_seconds}s"),
        "[+/-] volume".to_string(),
        "[m] mute".to_string(),
        "[s] shuffle".to_string(),
        "[r] repeat".to_string(),
        "[f] like".to_string(),
        "[a] add files".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

fn track_row(view: &View, index: usize, track: &Track, show_liked: bool) -> String {
    let state = view.controller.state();
    let playing_here = index == state.current_index && state.transport != Transport::Stopped;
    let marker = if playing_here { "▶" } else { " " };
    let liked = if show_liked && view.controller.is_liked(track.id()) {
        "♥"
    } else {
        " "
    };
    format!("{marker}{liked} {} - {}", track.title(), track.artist())
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// First row to render so the cursor stays centered when the list overflows.
fn window_start(total: usize, height: usize, cursor: usize) -> usize {
    if total <= height || height == 0 {
        return 0;
    }
    let half = height / 2;
    cursor.saturating_sub(half).min(total - height)
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, view: &View, ui_settings: &UiSettings, controls: &ControlsSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let state = view.controller.state();
    let current = view.controller.current_track();

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" spindle ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(state, view.message))
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let now_playing = match current {
        Some(track) => {
            let cover = track
                .cover_art()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{}\n{}\nCover: {}",
                track.title(),
                track.artist(),
                cover
            )
        }
        None => "No song selected\nAdd music to begin (press a)".to_string(),
    };
    let now_playing = Paragraph::new(now_playing)
        .block(Block::bordered().padding(LEFT_PAD).title(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[2]);

    let total = state.duration.or(current.and_then(Track::duration_hint));
    let gauge = Gauge::default()
        .block(Block::bordered().title(" progress "))
        .ratio(progress_ratio(state.position, total))
        .label(time_text(state.position, total));
    frame.render_widget(gauge, chunks[3]);

    {
        let queue = view.controller.queue();
        let total = queue.len();
        let list_height = chunks[4].height.saturating_sub(2) as usize;
        let start = window_start(total, list_height, view.cursor);
        let end = (start + list_height.max(1)).min(total);

        // Only build items for the visible window.
        let items: Vec<ListItem> = queue
            .iter()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(i, t)| ListItem::new(track_row(view, i, t, ui_settings.show_liked_marker)))
            .collect();

        let title = format!(" playlist ({total}) ");
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        if total > 0 {
            list_state.select(Some(view.cursor.saturating_sub(start)));
        }
        frame.render_stateful_widget(list, chunks[4], &mut list_state);
    }

    if let Some(input) = view.prompt {
        let popup = centered_rect_sized(72, 3, chunks[4]);
        frame.render_widget(Clear, popup);
        let prompt = Paragraph::new(format!("{input}_")).block(
            Block::bordered()
                .padding(LEFT_PAD)
                .title(" add file or folder (enter adds, esc cancels) "),
        );
        frame.render_widget(prompt, popup);
    }

    let footer = Paragraph::new(controls_text(controls.seek_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{NewTrack, TrackId};
    use std::path::PathBuf;

    fn controller_with(n: usize) -> Controller {
        let mut c = Controller::new(PlaybackState::default());
        let tracks = (0..n)
            .map(|i| NewTrack {
                title: format!("Song {i}"),
                artist: "Local File".into(),
                source: PathBuf::from(format!("/m/{i}.mp3")),
                cover_art: None,
                duration_hint: None,
            })
            .collect();
        c.add_tracks(tracks).unwrap();
        c
    }

    #[test]
    fn format_time_uses_minutes_and_padded_seconds() {
        assert_eq!(format_time(Duration::ZERO), "0:00");
        assert_eq!(format_time(Duration::from_secs(7)), "0:07");
        assert_eq!(format_time(Duration::from_millis(65_900)), "1:05");
        assert_eq!(format_time(Duration::from_secs(3_600)), "60:00");
    }

    #[test]
    fn time_text_shows_zero_for_unknown_total() {
        assert_eq!(time_text(Duration::from_secs(12), None), "0:12 / 0:00");
        assert_eq!(
            time_text(Duration::from_secs(12), Some(Duration::from_secs(200))),
            "0:12 / 3:20"
        );
    }

    #[test]
    fn progress_ratio_is_bounded() {
        assert_eq!(progress_ratio(Duration::from_secs(5), None), 0.0);
        assert_eq!(progress_ratio(Duration::from_secs(5), Some(Duration::ZERO)), 0.0);
        assert_eq!(
            progress_ratio(Duration::from_secs(30), Some(Duration::from_secs(60))),
            0.5
        );
        assert_eq!(
            progress_ratio(Duration::from_secs(90), Some(Duration::from_secs(60))),
            1.0
        );
    }

    #[test]
    fn window_start_centers_cursor_in_long_lists() {
        assert_eq!(window_start(5, 10, 4), 0);
        assert_eq!(window_start(100, 10, 3), 0);
        assert_eq!(window_start(100, 10, 50), 45);
        assert_eq!(window_start(100, 10, 99), 90);
    }

    #[test]
    fn status_text_lists_modes_and_message() {
        let mut state = PlaybackState::default();
        state.shuffle = true;
        assert_eq!(
            status_text(&state, Some("added 2 track(s)")),
            "Stopped • Shuffle: ON • Repeat: Off • Vol: 80% • added 2 track(s)"
        );
    }

    #[test]
    fn track_row_marks_current_and_liked() {
        let mut c = controller_with(2);
        let liked: TrackId = c.queue().get(1).unwrap().id();
        c.toggle_liked(liked).unwrap();
        let view = View {
            controller: &c,
            cursor: 0,
            prompt: None,
            message: None,
        };

        let q = c.queue();
        assert_eq!(track_row(&view, 0, q.get(0).unwrap(), true), "▶  Song 0 - Local File");
        assert_eq!(track_row(&view, 1, q.get(1).unwrap(), true), " ♥ Song 1 - Local File");
        assert_eq!(track_row(&view, 1, q.get(1).unwrap(), false), "   Song 1 - Local File");
    }

    #[test]
    fn controls_text_includes_seek_step() {
        assert!(controls_text(9).contains("[H/L] seek -/+9s"));
    }
}
