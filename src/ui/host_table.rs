use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use unicode_width::UnicodeWidthStr;

use super::theme;
use crate::app::App;

const PLACEHOLDER: &str = "Search SSH hosts...";
const PROMPT: &str = " > ";

/// Column titles, in the order of `Host::columns`.
pub const COLUMNS: [&str; 5] = ["Name", "Aliases", "User", "Hostname", "Port"];

/// Upper bound on each column's width.
const MAX_WIDTHS: [u16; 5] = [30, 30, 16, 40, 7];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Search input
        Constraint::Min(3),    // Host table
        Constraint::Length(1), // Footer
    ])
    .split(frame.area());

    render_search_bar(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(PROMPT, theme::accent_bold())];
    if app.query.is_empty() {
        spans.push(Span::styled(PLACEHOLDER, theme::muted()));
    } else {
        spans.push(Span::raw(app.query.as_str()));
        let match_info = match app.filtered.len() {
            0 => "  (no matches)".to_string(),
            1 => "  (1 match)".to_string(),
            n => format!("  ({} matches)", n),
        };
        spans.push(Span::styled(match_info, theme::muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    frame.set_cursor_position(Position::new(cursor_x(area, &app.query), area.y));
}

/// Column of the input cursor, kept inside `area`.
fn cursor_x(area: Rect, query: &str) -> u16 {
    let offset = display_width(PROMPT).saturating_add(display_width(query));
    area.x
        .saturating_add(offset)
        .min(area.right().saturating_sub(1))
}

fn display_width(s: &str) -> u16 {
    u16::try_from(s.width()).unwrap_or(u16::MAX)
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" pssh ", theme::brand_badge()),
        Span::raw(format!(" {}/{} ", app.filtered.len(), app.hosts().len())),
    ]);
    let border = if app.query.is_empty() {
        theme::border()
    } else {
        theme::border_focused()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border);

    let rows = app.rows();
    if rows.is_empty() {
        let msg = if app.hosts().is_empty() {
            "  No hosts found in your SSH config."
        } else {
            "  No matches. Try a different search."
        };
        frame.render_widget(Paragraph::new(msg).style(theme::muted()).block(block), area);
        return;
    }

    let widths = column_widths(&rows);
    let header = Row::new(COLUMNS.iter().map(|c| Cell::from(*c))).style(theme::header());
    let body = rows
        .iter()
        .map(|row| Row::new(row.iter().map(|value| Cell::from(*value))));

    let table = Table::new(body, widths.map(Constraint::Length))
        .header(header)
        .block(block)
        .row_highlight_style(theme::selected())
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Width of each column: the widest cell or title, capped by `MAX_WIDTHS`.
pub fn column_widths(rows: &[[&str; 5]]) -> [u16; 5] {
    let mut widths = COLUMNS.map(display_width);
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(value));
        }
    }
    for (w, max) in widths.iter_mut().zip(MAX_WIDTHS) {
        *w = (*w).min(max);
    }
    widths
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let esc_label = if app.query.is_empty() {
        " quit  "
    } else {
        " clear  "
    };
    let footer = Line::from(vec![
        Span::styled(" Enter", theme::accent_bold()),
        Span::styled(" connect  ", theme::muted()),
        Span::styled("Esc", theme::accent_bold()),
        Span::styled(esc_label, theme::muted()),
        Span::styled("Up/Down", theme::accent_bold()),
        Span::styled(" move  ", theme::muted()),
        Span::styled("Ctrl+C", theme::accent_bold()),
        Span::styled(" quit", theme::muted()),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}
