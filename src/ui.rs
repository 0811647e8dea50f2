//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the quiz form using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::{Duration, Instant};

use crate::app::{App, Dialog, DialogKind, Focus};
use crate::quiz::SessionState;

const URL_CONTROLS: &[(&str, &str)] = &[
    ("enter", "load playlist"),
    ("tab", "choices"),
    ("ctrl-u", "clear"),
    ("esc", "quit"),
];

const CHOICE_CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("space/1-9", "select"),
    ("enter", "submit"),
    ("n", "next question"),
    ("p", "play excerpt"),
    ("s", "stop"),
    ("tab/u", "url"),
    ("q", "quit"),
];

/// Render the controls help text for the focused part of the form.
fn controls_text(focus: Focus) -> String {
    let controls = match focus {
        Focus::Url => URL_CONTROLS,
        Focus::Choices => CHOICE_CONTROLS,
    };
    controls
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Excerpt progress as `Excerpt: 00:12/00:30 (from 01:05)`, when one is playing.
fn excerpt_text(app: &App, now: Instant) -> Option<String> {
    let info = app.playback_handle.as_ref()?.lock().ok()?;
    if !info.playing {
        return None;
    }
    Some(format!(
        "Excerpt: {}/{} (from {})",
        format_mmss(info.elapsed(now)),
        format_mmss(info.length),
        format_mmss(info.offset)
    ))
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn focused_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn dialog_color(kind: DialogKind) -> Color {
    match kind {
        DialogKind::Info => Color::Blue,
        DialogKind::Warning => Color::Yellow,
        DialogKind::Error | DialogKind::Incorrect => Color::Red,
        DialogKind::Correct => Color::Green,
    }
}

fn draw_dialog(frame: &mut Frame, dialog: &Dialog, area: Rect) {
    let width = (dialog.message.chars().count().min(66) as u16 + 6).max(30);
    let popup_area = centered_rect_sized(width, 7, area);
    frame.render_widget(Clear, popup_area);

    let body = format!("{}\n\n[enter] ok", dialog.message);
    let popup = Paragraph::new(body)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(dialog_color(dialog.kind)))
                .title(format!(" {} ", dialog.title))
                .title_alignment(Alignment::Center)
                .padding(Padding::horizontal(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(popup, popup_area);
}

fn choices_title(app: &App) -> &'static str {
    let Some(session) = &app.session else {
        return " choices ";
    };
    match session.state() {
        SessionState::Empty | SessionState::Ready => " no question yet ",
        SessionState::QuestionActive => match session.question() {
            Some(q) if q.is_answered() => " answered, [n] for the next one ",
            _ => " which song is this? ",
        },
    }
}

/// Render the entire UI into the provided `frame` using `app` state.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(app.settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" earworm ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // URL field
    let url_focused = app.focus == Focus::Url;
    let url_text = if url_focused {
        format!("{}_", app.url)
    } else {
        app.url.clone()
    };
    let url = Paragraph::new(url_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focused_border(url_focused))
            .title(" playlist url ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(url, chunks[1]);

    // Status box
    let status = {
        let mut parts: Vec<String> = vec![app.status.clone()];
        if let Some(session) = &app.session {
            let score = app.score();
            parts.push(format!(
                "Songs: {} • Choices: {} • Score: {}/{}",
                session.track_count(),
                session.num_choices(),
                score.correct,
                score.answered
            ));
        }
        if let Some(excerpt) = excerpt_text(app, Instant::now()) {
            parts.push(excerpt);
        }
        parts.join("\n")
    };
    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[2]);

    // Choices
    {
        let choices_focused = app.focus == Focus::Choices;
        let items: Vec<ListItem> = app
            .session
            .as_ref()
            .and_then(|s| s.question())
            .map(|q| {
                q.choices()
                    .iter()
                    .enumerate()
                    .map(|(i, track)| {
                        let marker = if app.selected == Some(i) { "(•)" } else { "( )" };
                        ListItem::new(format!("{marker} {}. {}", i + 1, track.title))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let total = items.len();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(focused_border(choices_focused))
                    .title(choices_title(app)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 && choices_focused {
            state.select(Some(app.cursor.min(total - 1)));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    let footer = Paragraph::new(controls_text(app.focus))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    if let Some(dialog) = app.dialog() {
        let area = frame.area();
        draw_dialog(frame, dialog, area);
    }

    if app.pending.is_some() {
        let busy = Paragraph::new("please wait...").italic().alignment(Alignment::Right);
        let area = Rect {
            height: 1,
            ..chunks[4]
        };
        frame.render_widget(busy, area);
    }
}
