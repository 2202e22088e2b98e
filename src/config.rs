use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::corpus::LocalCorpus;
use crate::keyboard::layout::LAYOUT_NAMES;
use crate::session::result::{DEFAULT_CHOICE, TestKind};
use crate::store::history::DEFAULT_HISTORY_LIMIT;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_keyboard_layout")]
    pub keyboard_layout: String,
    #[serde(default)]
    pub disabled_corpora: Vec<String>,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default)]
    pub cursors: MenuCursors,
    #[serde(default)]
    pub local_corpora: Vec<LocalCorpus>,
}

/// Last menu selections, restored on the next start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCursors {
    #[serde(default = "default_choice")]
    pub timer: usize,
    #[serde(default = "default_choice")]
    pub word_count: usize,
    #[serde(default = "default_choice")]
    pub sentence_count: usize,
    #[serde(default)]
    pub timer_corpus: usize,
    #[serde(default)]
    pub word_corpus: usize,
    #[serde(default)]
    pub sentence_corpus: usize,
}

fn default_theme() -> String {
    crate::ui::theme::DEFAULT_THEME.to_string()
}
fn default_keyboard_layout() -> String {
    "qwerty".to_string()
}
fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_choice() -> usize {
    DEFAULT_CHOICE
}

impl Default for MenuCursors {
    fn default() -> Self {
        Self {
            timer: default_choice(),
            word_count: default_choice(),
            sentence_count: default_choice(),
            timer_corpus: 0,
            word_corpus: 0,
            sentence_corpus: 0,
        }
    }
}

impl MenuCursors {
    /// (setting choice, corpus) cursors for `kind`.
    pub fn for_kind(&self, kind: TestKind) -> (usize, usize) {
        match kind {
            TestKind::Timer => (self.timer, self.timer_corpus),
            TestKind::WordCount => (self.word_count, self.word_corpus),
            TestKind::SentenceCount => (self.sentence_count, self.sentence_corpus),
        }
    }

    pub fn set_for_kind(&mut self, kind: TestKind, choice: usize, corpus: usize) {
        let (c, k) = match kind {
            TestKind::Timer => (&mut self.timer, &mut self.timer_corpus),
            TestKind::WordCount => (&mut self.word_count, &mut self.word_corpus),
            TestKind::SentenceCount => (&mut self.sentence_count, &mut self.sentence_corpus),
        };
        *c = choice;
        *k = corpus;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            keyboard_layout: default_keyboard_layout(),
            disabled_corpora: Vec::new(),
            history_limit: default_history_limit(),
            tick_rate_ms: default_tick_rate_ms(),
            cursors: MenuCursors::default(),
            local_corpora: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keytrail")
            .join("config.toml")
    }

    /// Resets values an older or hand-edited file may have left out of range.
    /// Corpus cursors are clamped later, once the corpus lists are known.
    pub fn normalize(&mut self) {
        if !LAYOUT_NAMES.contains(&self.keyboard_layout.as_str()) {
            tracing::warn!(layout = %self.keyboard_layout, "unknown keyboard layout, using qwerty");
            self.keyboard_layout = default_keyboard_layout();
        }
        for kind in [TestKind::Timer, TestKind::WordCount, TestKind::SentenceCount] {
            let (choice, corpus) = self.cursors.for_kind(kind);
            if choice >= kind.choices().len() {
                self.cursors.set_for_kind(kind, default_choice(), corpus);
            }
        }
        if self.history_limit == 0 {
            self.history_limit = default_history_limit();
        }
        if self.history_limit > DEFAULT_HISTORY_LIMIT {
            tracing::warn!(
                history_limit = self.history_limit,
                max = DEFAULT_HISTORY_LIMIT,
                "history limit too large, capping"
            );
            self.history_limit = DEFAULT_HISTORY_LIMIT;
        }
        if self.tick_rate_ms == 0 {
            self.tick_rate_ms = default_tick_rate_ms();
        }
    }

    pub fn is_corpus_enabled(&self, name: &str) -> bool {
        !self.disabled_corpora.iter().any(|n| n == name)
    }

    pub fn toggle_corpus(&mut self, name: &str) {
        if self.is_corpus_enabled(name) {
            self.disabled_corpora.push(name.to_string());
        } else {
            self.disabled_corpora.retain(|n| n != name);
        }
    }
}
