use std::sync::atomic::{AtomicU8, Ordering};

use ratatui::style::{Color, Modifier, Style};

/// Color mode: 0 = NO_COLOR, 1 = ANSI 16, 2 = truecolor.
static COLOR_MODE: AtomicU8 = AtomicU8::new(1);

/// Initialize theme settings. Call once at startup.
pub fn init() {
    if std::env::var_os("NO_COLOR").is_some() {
        COLOR_MODE.store(0, Ordering::Release);
    } else if std::env::var("COLORTERM")
        .map(|v| v == "truecolor" || v == "24bit")
        .unwrap_or(false)
    {
        COLOR_MODE.store(2, Ordering::Release);
    }
}

/// Title badge.
/// Truecolor: indigo bg. ANSI 16: Blue bg. NO_COLOR: REVERSED.
pub fn brand_badge() -> Style {
    match COLOR_MODE.load(Ordering::Acquire) {
        0 => Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        2 => Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(87, 70, 175))
            .add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    }
}

/// Selected table row.
pub fn selected() -> Style {
    match COLOR_MODE.load(Ordering::Acquire) {
        0 => Style::default().add_modifier(Modifier::REVERSED),
        2 => Style::default()
            .fg(Color::Rgb(255, 255, 175))
            .bg(Color::Rgb(95, 0, 255)),
        _ => Style::default().fg(Color::LightYellow).bg(Color::Magenta),
    }
}

/// Column headers.
pub fn header() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Search prompt and footer keys.
pub fn accent_bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Muted/secondary text.
pub fn muted() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Table border.
pub fn border() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Border while a query is active.
pub fn border_focused() -> Style {
    Style::default()
}

/// Error message.
pub fn error() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}
