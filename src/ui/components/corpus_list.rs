use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::config::Config;
use crate::generator::corpus::{CorpusKind, CorpusRegistry};
use crate::ui::theme::Theme;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigRow {
    KeyboardLayout,
    Theme,
    Corpus(String),
}

/// Rows of the configuration screen: layout, theme, then one per corpus.
pub fn config_rows(registry: &CorpusRegistry) -> Vec<ConfigRow> {
    let mut rows = vec![ConfigRow::KeyboardLayout, ConfigRow::Theme];
    rows.extend(registry.names(None).into_iter().map(ConfigRow::Corpus));
    rows
}

pub struct ConfigView<'a> {
    pub config: &'a Config,
    pub registry: &'a CorpusRegistry,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl ConfigView<'_> {
    fn row_line(&self, row: &ConfigRow, is_selected: bool) -> Line<'static> {
        let colors = &self.theme.colors;
        let indicator = if is_selected { ">" } else { " " };
        let style = if is_selected {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        let dim = Style::default().fg(colors.text_pending());

        match row {
            ConfigRow::KeyboardLayout => Line::from(vec![
                Span::styled(format!(" {indicator} Keyboard layout  "), style),
                Span::styled(self.config.keyboard_layout.clone(), dim),
            ]),
            ConfigRow::Theme => Line::from(vec![
                Span::styled(format!(" {indicator} Theme            "), style),
                Span::styled(self.theme.name.clone(), dim),
            ]),
            ConfigRow::Corpus(name) => {
                let mark = if self.config.is_corpus_enabled(name) { "[x]" } else { "[ ]" };
                let kind = match self.registry.get(name).map(|c| c.kind) {
                    Ok(CorpusKind::Sentences) => "sentences",
                    Ok(CorpusKind::Words) => "words",
                    Err(_) => "",
                };
                Line::from(vec![
                    Span::styled(format!(" {indicator} {mark} {name}  "), style),
                    Span::styled(kind.to_string(), dim),
                ])
            }
        }
    }
}

impl Widget for ConfigView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Configuration ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let mut lines = vec![Line::from("")];
        for (i, row) in config_rows(self.registry).iter().enumerate() {
            lines.push(self.row_line(row, i == self.selected));
        }
        Paragraph::new(lines).render(layout[0], buf);

        Paragraph::new(Line::styled(
            "up/down select  enter or space change  ctrl+q back to menu",
            self.theme.hint_style(),
        ))
        .alignment(Alignment::Center)
        .render(layout[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::corpus::Corpus;

    #[test]
    fn test_rows_list_every_corpus() {
        let mut registry = CorpusRegistry::new();
        registry.insert(Corpus::new("a", CorpusKind::Words, vec!["x".to_string()]));
        registry.insert(Corpus::new("b", CorpusKind::Sentences, vec!["y z".to_string()]));
        assert_eq!(
            config_rows(&registry),
            vec![
                ConfigRow::KeyboardLayout,
                ConfigRow::Theme,
                ConfigRow::Corpus("a".into()),
                ConfigRow::Corpus("b".into()),
            ]
        );
    }

    #[test]
    fn test_disabled_corpus_is_unchecked() {
        let mut registry = CorpusRegistry::new();
        registry.insert(Corpus::new("a", CorpusKind::Words, vec!["x".to_string()]));
        let mut config = Config::default();
        config.toggle_corpus("a");
        let theme = Theme::default();
        let view = ConfigView {
            config: &config,
            registry: &registry,
            selected: 2,
            theme: &theme,
        };
        let line = view.row_line(&ConfigRow::Corpus("a".into()), true);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("> [ ] a"));
    }
}
