use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::config::MenuCursors;
use crate::session::result::{ResultIdentifier, TestKind};
use crate::ui::theme::Theme;

/// Which column of the menu the arrow keys move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Entries,
    Setting,
    Corpus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSettings {
    pub kind: TestKind,
    pub choice: usize,
    pub corpora: Vec<String>,
    pub corpus: usize,
}

impl RunSettings {
    pub fn new(kind: TestKind, choice: usize, corpora: Vec<String>, corpus: usize) -> Self {
        let choice = if choice < kind.choices().len() { choice } else { 0 };
        let corpus = if corpus < corpora.len() { corpus } else { 0 };
        Self {
            kind,
            choice,
            corpora,
            corpus,
        }
    }

    pub fn setting(&self) -> u64 {
        self.kind.choices()[self.choice]
    }

    pub fn corpus_name(&self) -> Option<&str> {
        self.corpora.get(self.corpus).map(String::as_str)
    }

    /// `None` while no corpus is available for this kind.
    pub fn identifier(&self) -> Option<ResultIdentifier> {
        let corpus = self.corpus_name()?;
        Some(ResultIdentifier::new(self.kind, self.setting(), corpus))
    }

    fn cycle_choice(&mut self, forward: bool) {
        self.choice = cycle(self.choice, self.kind.choices().len(), forward);
    }

    fn cycle_corpus(&mut self, forward: bool) {
        self.corpus = cycle(self.corpus, self.corpora.len(), forward);
    }
}

fn cycle(idx: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward { (idx + 1) % len } else { (idx + len - 1) % len }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestSettings {
    Timer(RunSettings),
    WordCount(RunSettings),
    SentenceCount(RunSettings),
    Config,
}

impl TestSettings {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Timer(s) | Self::WordCount(s) | Self::SentenceCount(s) => s.kind.label(),
            Self::Config => "Configuration",
        }
    }

    pub fn run_settings(&self) -> Option<&RunSettings> {
        match self {
            Self::Timer(s) | Self::WordCount(s) | Self::SentenceCount(s) => Some(s),
            Self::Config => None,
        }
    }

    fn run_settings_mut(&mut self) -> Option<&mut RunSettings> {
        match self {
            Self::Timer(s) | Self::WordCount(s) | Self::SentenceCount(s) => Some(s),
            Self::Config => None,
        }
    }
}

/// Corpus names offered to each kind of run.
#[derive(Clone, Debug, Default)]
pub struct CorpusChoices {
    pub any: Vec<String>,
    pub words: Vec<String>,
    pub sentences: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct MainMenu {
    pub entries: Vec<TestSettings>,
    pub selected: usize,
    pub focus: Focus,
}

impl MainMenu {
    pub fn new(cursors: &MenuCursors, corpora: CorpusChoices) -> Self {
        let settings = |kind: TestKind, names: Vec<String>| {
            let (choice, corpus) = cursors.for_kind(kind);
            RunSettings::new(kind, choice, names, corpus)
        };
        Self {
            entries: vec![
                TestSettings::Timer(settings(TestKind::Timer, corpora.any)),
                TestSettings::WordCount(settings(TestKind::WordCount, corpora.words)),
                TestSettings::SentenceCount(settings(TestKind::SentenceCount, corpora.sentences)),
                TestSettings::Config,
            ],
            selected: 0,
            focus: Focus::Entries,
        }
    }

    pub fn current(&self) -> &TestSettings {
        &self.entries[self.selected]
    }

    pub fn cursors(&self) -> MenuCursors {
        let mut cursors = MenuCursors::default();
        for entry in &self.entries {
            if let Some(s) = entry.run_settings() {
                cursors.set_for_kind(s.kind, s.choice, s.corpus);
            }
        }
        cursors
    }

    pub fn up(&mut self) {
        self.vertical(false);
    }

    pub fn down(&mut self) {
        self.vertical(true);
    }

    fn vertical(&mut self, forward: bool) {
        let selected = self.selected;
        match self.focus {
            Focus::Entries => self.selected = cycle(selected, self.entries.len(), forward),
            Focus::Setting => {
                if let Some(s) = self.entries[selected].run_settings_mut() {
                    s.cycle_choice(forward);
                }
            }
            Focus::Corpus => {
                if let Some(s) = self.entries[selected].run_settings_mut() {
                    s.cycle_corpus(forward);
                }
            }
        }
    }

    pub fn right(&mut self) {
        if self.current().run_settings().is_none() {
            return;
        }
        self.focus = match self.focus {
            Focus::Entries => Focus::Setting,
            Focus::Setting => Focus::Corpus,
            Focus::Corpus => Focus::Entries,
        };
    }

    pub fn left(&mut self) {
        if self.current().run_settings().is_none() {
            return;
        }
        self.focus = match self.focus {
            Focus::Entries => Focus::Corpus,
            Focus::Setting => Focus::Entries,
            Focus::Corpus => Focus::Setting,
        };
    }
}

pub struct MenuView<'a> {
    pub menu: &'a MainMenu,
    pub theme: &'a Theme,
    pub notice: Option<&'a str>,
}

impl<'a> MenuView<'a> {
    pub fn new(menu: &'a MainMenu, theme: &'a Theme, notice: Option<&'a str>) -> Self {
        Self { menu, theme, notice }
    }
}

impl Widget for MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "keytrail",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Terminal Typing Speed Trainer",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let pending = Style::default().fg(colors.text_pending()).add_modifier(Modifier::DIM);
        let mut lines = Vec::new();
        for (i, entry) in self.menu.entries.iter().enumerate() {
            let is_selected = i == self.menu.selected;
            let indicator = if is_selected { ">" } else { " " };
            let enabled = entry.run_settings().is_none_or(|s| !s.corpora.is_empty());
            let label_style = if !enabled {
                pending
            } else if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let mut spans = vec![Span::styled(
                format!(" {indicator} {:<20}", entry.label()),
                label_style,
            )];
            if let Some(s) = entry.run_settings() {
                let highlight = |focus: Focus| {
                    if is_selected && self.menu.focus == focus {
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default().fg(colors.fg())
                    }
                };
                spans.push(Span::styled(
                    format!(" {} {} ", s.setting(), s.kind.unit()),
                    highlight(Focus::Setting),
                ));
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    format!(" {} ", s.corpus_name().unwrap_or("no corpus enabled")),
                    highlight(Focus::Corpus),
                ));
            }
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }
        Paragraph::new(lines).render(layout[1], buf);

        let footer = match self.notice {
            Some(notice) => Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(colors.error()),
            )),
            None => Line::from(Span::styled(
                "up/down select  left/right/tab change column  enter start  esc quit",
                pending,
            )),
        };
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .render(layout[2], buf);
    }
}
