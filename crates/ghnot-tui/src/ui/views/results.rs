use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::app::ResultKind;
use crate::ui::{theme, App};

/// Output of the running action batch, with a progress header.
pub fn render_results(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).split(area);

    let (completed, total) = app.queue.progress();
    let status = match app.queue.in_flight() {
        Some(id) => Span::styled(format!("running on {}", id), theme::status_info()),
        None if completed == total => Span::styled("done", theme::status_success()),
        None => Span::styled("idle", theme::text_muted()),
    };
    let header = Line::from(vec![
        Span::styled(format!(" {} ", app.queue.action()), theme::text_bold()),
        Span::styled(format!("{}/{} ", completed, total), theme::text_muted()),
        status,
    ]);
    f.render_widget(
        Paragraph::new(header).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(theme::border_inactive()),
        ),
        chunks[0],
    );

    let lines: Vec<Line> = app
        .results
        .iter()
        .skip(app.results_scroll)
        .map(|line| {
            let style = match line.kind {
                ResultKind::Info => theme::text_muted(),
                ResultKind::Output => theme::text_primary(),
                ResultKind::Error => theme::status_error(),
            };
            Line::from(Span::styled(format!(" {}", line.text), style))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), chunks[1]);
}
