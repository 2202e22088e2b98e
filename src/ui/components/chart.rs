use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Widget};

use crate::ui::theme::Theme;

/// Per-second speed of one run.
pub struct WpmChart<'a> {
    pub data: &'a [(f64, f64)],
    pub theme: &'a Theme,
}

impl<'a> WpmChart<'a> {
    pub fn new(data: &'a [(f64, f64)], theme: &'a Theme) -> Self {
        Self { data, theme }
    }

    /// Pairs each sample with its one-based second.
    pub fn points(samples: &[f64]) -> Vec<(f64, f64)> {
        samples
            .iter()
            .enumerate()
            .map(|(i, wpm)| ((i + 1) as f64, *wpm))
            .collect()
    }
}

impl Widget for WpmChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" WPM Each Second ")
            .border_style(Style::default().fg(colors.border()));

        if self.data.len() < 2 {
            block.render(area, buf);
            return;
        }

        let max_x = self.data.last().map(|(x, _)| *x).unwrap_or(1.0);
        let max_y = self
            .data
            .iter()
            .map(|(_, y)| *y)
            .fold(0.0f64, f64::max)
            .max(10.0);

        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(colors.accent()))
            .data(self.data);

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .title("Second")
                    .style(Style::default().fg(colors.text_pending()))
                    .bounds([1.0, max_x]),
            )
            .y_axis(
                Axis::default()
                    .title("WPM")
                    .style(Style::default().fg(colors.text_pending()))
                    .labels(["0".to_string(), format!("{:.0}", max_y * 1.1)])
                    .bounds([0.0, max_y * 1.1]),
            );

        chart.render(area, buf);
    }
}
