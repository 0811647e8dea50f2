use std::env;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::config::Settings;
use crate::tool::YtDlp;

mod event_loop;
mod logging;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = Settings::load_or_default();
    if let Some(reason) = &fallback {
        eprintln!("earworm: {reason}, using defaults");
    }

    if let Err(e) = logging::init_logging(&settings.log) {
        eprintln!("earworm: logging disabled: {e}");
    }
    log::info!("starting earworm");
    if let Some(reason) = fallback {
        log::warn!("{reason}, using defaults");
    }

    let tool = YtDlp::new(settings.tool.program.clone(), settings.tool.extra_args.clone());
    let audio_player = AudioPlayer::new()?;

    let url = env::args().nth(1);
    let mut app = App::new(settings);
    if let Some(url) = url {
        app.set_url(url);
    }
    app.set_playback_handle(audio_player.playback_handle());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &mut app, &tool, &audio_player);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.close(&audio_player);
    audio_player.quit();
    log::info!("shutting down");

    run_result
}
