use chrono::Utc;
use ghnot_core::models::format_relative_time;
use ghnot_core::Notification;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::{theme, App};

/// Cut `text` to at most `width` display columns, ending with `…` when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn row<'a>(n: &'a Notification, marked: bool, width: usize) -> Line<'a> {
    let now = Utc::now();
    let mut spans = vec![
        Span::styled(if marked { "▌" } else { " " }, theme::marker()),
        Span::styled(if n.unread { "● " } else { "  " }, theme::unread_dot()),
        Span::styled(format!("{:<8} ", format_relative_time(n.updated_at, now)), theme::text_dim()),
        Span::styled(format!("{:<11} ", n.subject.kind), theme::text_muted()),
        Span::styled(
            format!("{:<7} ", n.subject.state.as_deref().unwrap_or("-")),
            theme::subject_state(n.subject.state.as_deref()),
        ),
        Span::styled(
            format!("{} ", n.repository.full_name),
            ratatui::style::Style::default().fg(theme::repo_color(&n.repository.full_name)),
        ),
    ];

    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    let mut suffix = Vec::new();
    if let Some(author) = &n.author {
        suffix.push(Span::styled(format!(" @{}", author.login), theme::text_muted()));
    }
    if !n.meta.tags.is_empty() {
        suffix.push(Span::styled(format!(" [{}]", n.meta.tags.join(", ")), theme::tag()));
    }
    if n.meta.hidden || n.meta.done {
        let label = if n.meta.done { " (done)" } else { " (hidden)" };
        suffix.push(Span::styled(label, theme::text_dim()));
    }
    let suffix_width: usize = suffix.iter().map(|s| s.content.width()).sum();

    let title_width = width.saturating_sub(used + suffix_width);
    let title_style = if n.unread {
        theme::text_bold()
    } else {
        theme::text_primary()
    };
    spans.push(Span::styled(truncate(&n.subject.title, title_width), title_style));
    spans.extend(suffix);
    Line::from(spans)
}

pub fn render_list(f: &mut Frame, app: &App, area: Rect) {
    if app.visible_len() == 0 {
        let message = if app.filter_source().is_some() {
            "  No notifications match the filter"
        } else {
            "  Inbox zero"
        };
        f.render_widget(
            ratatui::widgets::Paragraph::new(message).style(theme::text_muted()),
            area,
        );
        return;
    }

    let width = area.width as usize;
    let items: Vec<ListItem> = app
        .visible()
        .map(|n| ListItem::new(row(n, app.is_marked(&n.id), width)))
        .collect();

    let list = List::new(items).highlight_style(theme::row_selected());
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}
