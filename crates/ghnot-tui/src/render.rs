use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::ui::toasts::ToastLevel;
use crate::ui::{theme, views, App, InputMode, View};

pub(crate) fn render(f: &mut Frame, app: &App) {
    let bg_block = Block::default().style(Style::default().bg(theme::BG_APP));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(f.area());

    render_header(f, app, chunks[0]);
    match app.view {
        View::List => views::render_list(f, app, chunks[1]),
        View::Results => views::render_results(f, app, chunks[1]),
    }
    render_footer(f, app, chunks[2]);
    render_statusbar(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let chrome = if app.pending_quit {
        theme::status_error()
    } else {
        theme::status_info()
    };

    let mut spans = vec![
        Span::styled(" ghnot ", chrome),
        Span::styled(
            format!("{}/{} shown", app.visible_len(), app.notifications().len()),
            theme::text_muted(),
        ),
    ];
    if app.marked_len() > 0 {
        spans.push(Span::styled(format!(" · {} marked", app.marked_len()), theme::marker()));
    }
    if app.show_all {
        spans.push(Span::styled(" · all", theme::text_muted()));
    }
    if let Some(filter) = app.filter_source() {
        spans.push(Span::styled(format!(" · filter: {}", filter), theme::tag()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = match app.input_mode {
        InputMode::Filter => prompt("/", &app.input),
        InputMode::Command => prompt(":", &app.input),
        InputMode::Normal if app.pending_quit => Line::from(Span::styled(
            " Press Ctrl+C again to quit",
            theme::status_error(),
        )),
        InputMode::Normal => {
            let hints = match app.view {
                View::List => {
                    " j/k move · space mark · / filter · : action · r read · d done · h hide · o open · a all · q quit"
                }
                View::Results => " j/k scroll · esc back (cancels remaining)",
            };
            Line::from(Span::styled(hints, theme::text_dim()))
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

fn prompt<'a>(sigil: &'a str, input: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(sigil, theme::marker()),
        Span::styled(input, theme::input_active()),
        Span::styled("█", theme::text_dim()),
    ])
}

fn render_statusbar(f: &mut Frame, app: &App, area: Rect) {
    let Some(toast) = app.toasts.current() else {
        return;
    };
    let style = match toast.level {
        ToastLevel::Info => theme::status_info(),
        ToastLevel::Success => theme::status_success(),
        ToastLevel::Warning => theme::status_warning(),
        ToastLevel::Error => theme::status_error(),
    };
    let line = Line::from(Span::styled(
        format!(" {} {}", toast.level.icon(), toast.message),
        style,
    ));
    f.render_widget(Paragraph::new(line), area);
}
