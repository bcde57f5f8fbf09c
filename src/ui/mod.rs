mod host_table;
pub mod theme;

use ratatui::Frame;
use ratatui::widgets::Paragraph;

use crate::app::App;

pub use host_table::COLUMNS;

const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 6;

/// Top-level render entry point.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Terminal too small guard
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = Paragraph::new("Terminal too small. Need at least 40x6.").style(theme::error());
        frame.render_widget(msg, area);
        return;
    }

    host_table::render(frame, app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Action;
    use crate::host::HostSet;
    use crate::ssh_config::parser::parse_content;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::path::Path;

    fn sample() -> HostSet {
        let content = "\
Host web1
  HostName 10.0.0.5
  User deploy
Host web2
  HostName 10.0.0.5
Host db1
  HostName 10.0.0.9
  Port 5432
";
        HostSet::from_blocks(parse_content(content, Path::new("/tmp/test_config")).unwrap())
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_renders_columns_and_hosts() {
        let set = sample();
        let app = App::new(set.hosts());
        let screen = draw(&app, 80, 12);
        for title in COLUMNS {
            assert!(screen.contains(title), "missing column {}", title);
        }
        assert!(screen.contains("web1"));
        assert!(screen.contains("(web2)"));
        assert!(screen.contains("5432"));
        assert!(screen.contains("Search SSH hosts..."));
        assert!(screen.contains("2/2"));
    }

    #[test]
    fn test_renders_query_and_no_matches() {
        let set = sample();
        let app = App::new(set.hosts())
            .update(Action::Insert('z'))
            .update(Action::Insert('z'));
        let screen = draw(&app, 80, 12);
        assert!(screen.contains("zz"));
        assert!(screen.contains("no matches"));
        assert!(screen.contains("No matches. Try a different search."));
        assert!(screen.contains("0/2"));
    }

    #[test]
    fn test_too_small() {
        let set = sample();
        let app = App::new(set.hosts());
        let screen = draw(&app, 30, 4);
        assert!(screen.contains("Terminal too small"));
    }
}
