use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::TestResult;
use crate::ui::components::chart::WpmChart;
use crate::ui::theme::Theme;

const DELTA_DISPLAY_CAP: f64 = 100.0;

/// Signed change against the average, capped for display so a first run
/// does not read "+5000%".
pub fn format_delta(delta: f64) -> String {
    let shown = delta.min(DELTA_DISPLAY_CAP);
    let sign = if shown >= 0.0 { "+" } else { "" };
    format!("{sign}{shown:.1}%")
}

pub fn format_elapsed(secs: f64) -> String {
    let whole = secs.round() as u64;
    if whole >= 60 {
        format!("{}m{:02}s", whole / 60, whole % 60)
    } else {
        format!("{whole}s")
    }
}

pub struct ResultsView<'a> {
    result: &'a TestResult,
    theme: &'a Theme,
}

impl<'a> ResultsView<'a> {
    pub fn new(result: &'a TestResult, theme: &'a Theme) -> Self {
        Self { result, theme }
    }

    pub fn summary_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let r = self.result;
        let label = Style::default().fg(colors.text_pending());
        let value = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);
        let delta_style = if r.delta_wpm >= 0.0 {
            Style::default().fg(colors.success())
        } else {
            Style::default().fg(colors.error())
        };

        vec![
            Line::from(vec![
                Span::styled("wpm ", label),
                Span::styled(
                    r.wpm.to_string(),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("accuracy ", label),
                Span::styled(format!("{:.1}%", r.accuracy), value),
                Span::styled("   Δavg ", label),
                Span::styled(format_delta(r.delta_wpm), delta_style),
                Span::styled("   raw ", label),
                Span::styled(r.raw_wpm.to_string(), value),
                Span::styled("   cpm ", label),
                Span::styled(r.cpm.to_string(), value),
                Span::styled("   time ", label),
                Span::styled(format_elapsed(r.elapsed_secs), value),
            ]),
            Line::from(vec![
                Span::styled("test ", label),
                Span::styled(r.identifier.to_string(), value),
            ]),
        ]
    }
}

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Results ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(6),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(self.summary_lines())
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let points = WpmChart::points(&self.result.wpm_each_second);
        WpmChart::new(&points, self.theme).render(layout[1], buf);

        Paragraph::new(Line::styled(
            "enter or ctrl+r to restart, ctrl+q to menu, esc to quit",
            self.theme.hint_style(),
        ))
        .alignment(Alignment::Center)
        .render(layout[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_delta_caps_and_signs() {
        assert_eq!(format_delta(5000.0), "+100.0%");
        assert_eq!(format_delta(12.345), "+12.3%");
        assert_eq!(format_delta(0.0), "+0.0%");
        assert_eq!(format_delta(-20.0), "-20.0%");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(29.6), "30s");
        assert_eq!(format_elapsed(125.0), "2m05s");
    }
}
