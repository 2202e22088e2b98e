use crossterm::style::StyledContent;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};

use crate::session::run::TestRun;
use crate::ui::ansi;
use crate::ui::paragraph::ParagraphView;
use crate::ui::theme::Theme;

const IDLE_HINT: &str = "ctrl+r to restart, ctrl+q to menu";

/// The typing screen: clock above the windowed paragraph.
pub struct TypingArea<'a> {
    run: &'a TestRun,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(run: &'a TestRun, theme: &'a Theme) -> Self {
        Self { run, theme }
    }

    /// Clock and paragraph as one escaped string sized for `area`.
    pub fn screen_text(&self, area: Rect) -> String {
        let view = ParagraphView::layout(
            &self.run.state,
            &self.theme.text_styles(),
            area.width,
            area.height,
        );
        let running = self.run.clock.is_running();
        let clock = StyledContent::new(self.theme.timer_style(running), self.run.clock.view());
        view.render_with_clock(&clock.to_string())
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let text = ansi::to_text(&self.screen_text(layout[0]));
        Paragraph::new(text).render(layout[0], buf);

        if !self.run.clock.is_running() {
            Paragraph::new(Line::styled(IDLE_HINT, self.theme.hint_style()))
                .alignment(Alignment::Center)
                .render(layout[1], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::keyboard::layout::InputMap;
    use crate::session::input::KeyAction;
    use crate::session::result::{ResultIdentifier, TestKind};

    fn run() -> TestRun {
        TestRun::new(
            ResultIdentifier::new(TestKind::Timer, 30, "Common words"),
            "the quick brown fox".chars().collect(),
            Arc::new(InputMap::identity()),
        )
    }

    #[test]
    fn test_screen_text_shows_clock_and_words() {
        let run = run();
        let theme = Theme::default();
        let text = ansi::strip(&TypingArea::new(&run, &theme).screen_text(Rect::new(0, 0, 60, 10)));
        assert!(text.contains("0:30"));
        assert!(text.contains("the quick brown fox"));
    }

    #[test]
    fn test_renders_into_buffer() {
        let mut run = run();
        run.apply(KeyAction::Rune('t'));
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        TypingArea::new(&run, &theme).render(area, &mut buf);

        let content: String = buf.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("0:30"));
        assert!(content.contains("quick"));
        assert!(!content.contains("ctrl+r"));
    }
}
