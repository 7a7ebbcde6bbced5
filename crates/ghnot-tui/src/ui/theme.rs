// Colors and semantic styles for the notification list and result view.

use ratatui::style::{Color, Modifier, Style};

pub const BG_APP: Color = Color::Rgb(0, 0, 0);

/// Cursor row background
pub const BG_SELECTED: Color = Color::Rgb(32, 32, 32);

pub const BG_INPUT: Color = Color::Rgb(18, 18, 18);

pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 220);
pub const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);
pub const TEXT_DIM: Color = Color::Rgb(90, 90, 90);

pub const ACCENT_PRIMARY: Color = Color::Rgb(86, 156, 214);
pub const ACCENT_SUCCESS: Color = Color::Rgb(106, 153, 85);
pub const ACCENT_WARNING: Color = Color::Rgb(206, 145, 120);
pub const ACCENT_ERROR: Color = Color::Rgb(244, 112, 112);
pub const ACCENT_SPECIAL: Color = Color::Rgb(169, 154, 203);

pub const BORDER_INACTIVE: Color = Color::Rgb(60, 60, 60);

pub const REPO_PALETTE: [Color; 8] = [
    Color::Rgb(86, 156, 214),
    Color::Rgb(106, 153, 85),
    Color::Rgb(169, 154, 203),
    Color::Rgb(206, 145, 120),
    Color::Rgb(78, 154, 154),
    Color::Rgb(180, 180, 120),
    Color::Rgb(180, 100, 100),
    Color::Rgb(140, 140, 170),
];

/// Deterministic color for a repository name
pub fn repo_color(full_name: &str) -> Color {
    let hash: usize = full_name.bytes().map(|b| b as usize).sum();
    REPO_PALETTE[hash % REPO_PALETTE.len()]
}

pub fn text_primary() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn text_dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn text_bold() -> Style {
    Style::default()
        .fg(TEXT_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn border_inactive() -> Style {
    Style::default().fg(BORDER_INACTIVE)
}

pub fn row_selected() -> Style {
    Style::default().fg(TEXT_PRIMARY).bg(BG_SELECTED)
}

pub fn marker() -> Style {
    Style::default()
        .fg(ACCENT_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn unread_dot() -> Style {
    Style::default().fg(ACCENT_PRIMARY)
}

pub fn tag() -> Style {
    Style::default().fg(ACCENT_SPECIAL)
}

pub fn status_success() -> Style {
    Style::default().fg(ACCENT_SUCCESS)
}

pub fn status_warning() -> Style {
    Style::default().fg(ACCENT_WARNING)
}

pub fn status_error() -> Style {
    Style::default().fg(ACCENT_ERROR)
}

pub fn status_info() -> Style {
    Style::default().fg(ACCENT_PRIMARY)
}

pub fn input_active() -> Style {
    Style::default().fg(TEXT_PRIMARY).bg(BG_INPUT)
}

/// Style for a subject state such as `open`, `closed` or `merged`.
pub fn subject_state(state: Option<&str>) -> Style {
    match state {
        Some("open") => status_success(),
        Some("merged") => Style::default().fg(ACCENT_SPECIAL),
        Some("closed") => status_error(),
        _ => text_dim(),
    }
}
