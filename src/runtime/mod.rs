use std::env;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::output::RodioOutput;

mod event_loop;
mod logging;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = settings::load_settings();
    let _log_guard = logging::init(&settings.log);
    if let Some(reason) = fallback {
        warn!(%reason, "using default settings");
    }

    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    info!(paths = paths.len(), "starting spindle");

    let output = RodioOutput::open(&settings.audio)?;
    let mut session = startup::build_session(&settings, output);
    startup::ingest(&mut session, &paths, &settings.library);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &settings, &mut session, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shutting down");
    run_result
}
