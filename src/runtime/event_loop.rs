use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Focus, PendingAction};
use crate::audio::AudioPlayer;
use crate::tool::ToolRunner;
use crate::ui;

/// Main terminal event loop: draws the form, runs queued blocking actions and
/// handles input. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    tool: &dyn ToolRunner,
    audio_player: &AudioPlayer,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Show what is about to block before blocking on it.
        if let Some(action) = app.pending {
            app.status = action.progress_status().to_string();
            terminal.draw(|f| ui::draw(f, app))?;
            app.take_pending();
            app.run_pending(action, tool, audio_player, &mut rand::thread_rng());
            continue;
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key_event(key, app, audio_player);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key_event(key: KeyEvent, app: &mut App, audio_player: &AudioPlayer) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.dialog().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_dialog();
        }
        return;
    }

    match app.focus {
        Focus::Url => handle_url_key(key, ctrl, app),
        Focus::Choices => handle_choice_key(key, app, audio_player),
    }
}

fn handle_url_key(key: KeyEvent, ctrl: bool, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.request(PendingAction::LoadPlaylist),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Backspace => app.pop_url_char(),
        KeyCode::Char('u') if ctrl => app.clear_url(),
        KeyCode::Char(c) if !ctrl && !c.is_control() => app.push_url_char(c),
        _ => {}
    }
}

fn handle_choice_key(key: KeyEvent, app: &mut App, audio_player: &AudioPlayer) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Char(' ') => app.select_cursor(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(d) = c.to_digit(10) {
                app.select(d as usize - 1);
            }
        }
        KeyCode::Enter => app.submit(),
        KeyCode::Char('n') => {
            if app.session.is_some() {
                app.request(PendingAction::NextQuestion);
            }
        }
        KeyCode::Char('p') => app.play_excerpt(audio_player),
        KeyCode::Char('s') => app.stop_playback(audio_player),
        KeyCode::Tab | KeyCode::Char('u') => app.toggle_focus(),
        _ => {}
    }
}
