use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::config;
use crate::player::{AudioOutput, Command, PlaybackState, Session, Transport};
use crate::runtime::startup;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Highlighted row in the track list.
    pub cursor: usize,
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Path being typed into the add prompt, if open.
    pub prompt: Option<String>,
    /// One-line feedback shown in the status box.
    pub message: Option<String>,
    /// Current index last seen, so the cursor only jumps when playback moves.
    last_current: Option<usize>,
}

impl EventLoopState {
    /// Move the cursor onto the current track whenever playback changes
    /// track, and keep it inside the queue.
    pub fn sync_cursor(&mut self, state: &PlaybackState, queue_len: usize) {
        if queue_len == 0 {
            self.cursor = 0;
            self.last_current = None;
            return;
        }
        let current = (state.transport != Transport::Stopped).then_some(state.current_index);
        if current != self.last_current {
            if let Some(i) = current {
                self.cursor = i;
            }
            self.last_current = current;
        }
        self.cursor = self.cursor.min(queue_len - 1);
    }
}

/// Main terminal event loop: drains output events, draws, and handles
/// input. Returns `Ok(())` when shutdown is requested.
pub fn run<P: AudioOutput>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    session: &mut Session<P>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        session.pump();
        state.sync_cursor(session.state(), session.queue().len());

        let view = ui::View {
            controller: session.controller(),
            cursor: state.cursor,
            prompt: state.prompt.as_deref(),
            message: state.message.as_deref(),
        };
        terminal.draw(|f| ui::draw(f, &view, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, session, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn dispatch<P: AudioOutput>(session: &mut Session<P>, cmd: Command) {
    if let Err(e) = session.dispatch(cmd) {
        debug!(error = %e, "command ignored");
    }
}

/// Handle one key press. Returns `true` when the user asked to quit.
pub fn handle_key_event<P: AudioOutput>(
    key: KeyEvent,
    settings: &config::Settings,
    session: &mut Session<P>,
    state: &mut EventLoopState,
) -> bool {
    if let Some(input) = state.prompt.as_mut() {
        match key.code {
            KeyCode::Esc => state.prompt = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter => {
                let raw = state.prompt.take().unwrap_or_default();
                add_from_prompt(&raw, settings, session, state);
            }
            KeyCode::Char(c) if !c.is_control() => input.push(c),
            _ => {}
        }
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }
    let len = session.queue().len();

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char(' ') | KeyCode::Char('p') => dispatch(session, Command::TogglePlayPause),
        KeyCode::Char('l') | KeyCode::Char('n') => dispatch(session, Command::Next),
        KeyCode::Char('h') | KeyCode::Char('b') => dispatch(session, Command::Previous),
        KeyCode::Char('L') => {
            dispatch(session, Command::SeekBy(settings.controls.seek_seconds as f64));
        }
        KeyCode::Char('H') => {
            dispatch(session, Command::SeekBy(-(settings.controls.seek_seconds as f64)));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let level = session.state().volume + settings.controls.volume_step;
            dispatch(session, Command::SetVolume(level));
        }
        KeyCode::Char('-') => {
            let level = session.state().volume - settings.controls.volume_step;
            dispatch(session, Command::SetVolume(level));
        }
        KeyCode::Char('m') => dispatch(session, Command::ToggleMute),
        KeyCode::Char('s') => dispatch(session, Command::ToggleShuffle),
        KeyCode::Char('r') => dispatch(session, Command::CycleRepeatMode),
        KeyCode::Char('f') => {
            if let Some(id) = session.queue().get(state.cursor).map(|t| t.id()) {
                dispatch(session, Command::ToggleLiked(id));
            }
        }
        KeyCode::Char('a') => {
            state.message = None;
            state.prompt = Some(String::new());
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if len > 0 {
                state.cursor = (state.cursor + 1) % len;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if len > 0 {
                state.cursor = (state.cursor + len - 1) % len;
            }
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                state.cursor = 0;
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => state.cursor = len.saturating_sub(1),
        KeyCode::Enter => dispatch(session, Command::Select(state.cursor)),
        _ => {}
    }

    false
}

fn add_from_prompt<P: AudioOutput>(
    raw: &str,
    settings: &config::Settings,
    session: &mut Session<P>,
    state: &mut EventLoopState,
) {
    let raw = raw.trim();
    if raw.is_empty() {
        return;
    }
    let path = expand_home(raw);
    let added = startup::ingest(session, std::slice::from_ref(&path), &settings.library);
    state.message = Some(if added == 0 {
        format!("no audio files found at {}", path.display())
    } else {
        format!("added {added} track(s)")
    });
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(raw)
}
