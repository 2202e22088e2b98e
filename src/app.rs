use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Config;
use crate::event::AppEvent;
use crate::generator::CorpusGenerator;
use crate::generator::corpus::{CorpusKind, CorpusRegistry};
use crate::keyboard::layout::{InputMap, KeyboardLayout, LAYOUT_NAMES};
use crate::session::input::KeyAction;
use crate::session::result::{ResultIdentifier, TestKind, TestResult};
use crate::session::run::{RunStatus, TestRun};
use crate::store::history::HistoryStore;
use crate::store::json_store::JsonStore;
use crate::ui::components::corpus_list::{ConfigRow, config_rows};
use crate::ui::components::menu::{CorpusChoices, MainMenu, TestSettings};
use crate::ui::theme::Theme;

pub enum Screen {
    Menu,
    Test(Box<TestRun>),
    Results(Box<TestResult>),
    Config,
}

pub struct App {
    pub screen: Screen,
    pub menu: MainMenu,
    pub config: Config,
    pub config_selected: usize,
    pub theme: Theme,
    pub generator: CorpusGenerator,
    pub history: HistoryStore,
    pub notice: Option<String>,
    pub should_quit: bool,
    input_map: Arc<InputMap>,
    store: Option<JsonStore>,
    config_path: Option<PathBuf>,
}

fn input_map_for(layout: &str) -> Arc<InputMap> {
    let layout = KeyboardLayout::from_name(layout).unwrap_or_default();
    Arc::new(layout.input_map())
}

impl App {
    /// Builds the app from its parts. `store` and `config_path` are `None`
    /// when nothing should be written to disk.
    pub fn new(
        config: Config,
        generator: CorpusGenerator,
        store: Option<JsonStore>,
        config_path: Option<PathBuf>,
    ) -> Self {
        let history = match &store {
            Some(store) => store.load_history(config.history_limit),
            None => HistoryStore::new(config.history_limit),
        };
        let theme = Theme::load(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "unknown theme, using default");
            Theme::default()
        });
        let menu = MainMenu::new(&config.cursors, corpus_choices(&config, generator.registry()));

        Self {
            screen: Screen::Menu,
            menu,
            input_map: input_map_for(&config.keyboard_layout),
            config,
            config_selected: 0,
            theme,
            generator,
            history,
            notice: None,
            should_quit: false,
            store,
            config_path,
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.config.tick_rate_ms)
    }

    pub fn handle(&mut self, event: AppEvent) {
        let screen = std::mem::replace(&mut self.screen, Screen::Menu);
        self.screen = match event {
            AppEvent::Key(key) if key.kind == KeyEventKind::Press => self.on_key(screen, key),
            AppEvent::Key(_) => screen,
            AppEvent::Tick(dt) => self.on_tick(screen, dt),
            AppEvent::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                screen
            }
        };
    }

    /// Starts a run, or stays on the menu with a notice when no text can
    /// be generated for it.
    pub fn begin(&mut self, identifier: ResultIdentifier) -> Screen {
        let count = identifier.kind.sample_count(identifier.setting);
        match self.generator.generate(&identifier.corpus, count) {
            Ok(target) if !target.is_empty() => {
                tracing::debug!(test = %identifier, chars = target.len(), "run started");
                self.notice = None;
                Screen::Test(Box::new(TestRun::new(identifier, target, self.input_map.clone())))
            }
            Ok(_) => {
                tracing::warn!(corpus = %identifier.corpus, "corpus is empty");
                self.notice = Some(format!("Corpus {} has no entries", identifier.corpus));
                Screen::Menu
            }
            Err(err) => {
                tracing::warn!(%err, "could not start run");
                self.notice = Some(err.to_string());
                Screen::Menu
            }
        }
    }

    fn quit(&mut self) {
        self.save_config();
        self.should_quit = true;
    }

    fn on_key(&mut self, screen: Screen, key: KeyEvent) -> Screen {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return screen;
        }
        match screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Test(run) => self.handle_test_key(run, key),
            Screen::Results(result) => self.handle_results_key(result, key),
            Screen::Config => self.handle_config_key(key),
        }
    }

    fn on_tick(&mut self, screen: Screen, dt: Duration) -> Screen {
        match screen {
            Screen::Test(mut run) => match run.tick(dt) {
                RunStatus::Running => Screen::Test(run),
                RunStatus::Finished => self.finish(*run),
            },
            other => other,
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> Screen {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.quit(),
            KeyCode::Char('q') if ctrl => self.quit(),
            KeyCode::Up | KeyCode::Char('k') => self.menu.up(),
            KeyCode::Down | KeyCode::Char('j') => self.menu.down(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => self.menu.left(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.menu.right(),
            KeyCode::Enter => {
                self.config.cursors = self.menu.cursors();
                self.save_config();
                let identifier = match self.menu.current() {
                    TestSettings::Config => return Screen::Config,
                    settings => settings.run_settings().and_then(|s| s.identifier()),
                };
                return match identifier {
                    Some(identifier) => self.begin(identifier),
                    None => {
                        self.notice = Some("No corpus enabled for this run".to_string());
                        Screen::Menu
                    }
                };
            }
            _ => {}
        }
        Screen::Menu
    }

    fn handle_test_key(&mut self, mut run: Box<TestRun>, key: KeyEvent) -> Screen {
        let Some(action) = KeyAction::classify(&key) else {
            return Screen::Test(run);
        };
        match action {
            KeyAction::Quit => {
                self.quit();
                Screen::Test(run)
            }
            KeyAction::Menu => Screen::Menu,
            KeyAction::Restart => self.begin(run.identifier.clone()),
            edit => match run.apply(edit) {
                RunStatus::Running => Screen::Test(run),
                RunStatus::Finished => self.finish(*run),
            },
        }
    }

    fn handle_results_key(&mut self, result: Box<TestResult>, key: KeyEvent) -> Screen {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.quit();
                Screen::Results(result)
            }
            KeyCode::Char('q') if ctrl => Screen::Menu,
            KeyCode::Enter => self.begin(result.identifier.clone()),
            KeyCode::Char('r') if ctrl => self.begin(result.identifier.clone()),
            _ => Screen::Results(result),
        }
    }

    fn handle_config_key(&mut self, key: KeyEvent) -> Screen {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let rows = config_rows(self.generator.registry());
        match key.code {
            KeyCode::Esc => {
                self.quit();
                return Screen::Config;
            }
            KeyCode::Char('q') if ctrl => {
                self.save_config();
                self.menu = MainMenu::new(
                    &self.config.cursors,
                    corpus_choices(&self.config, self.generator.registry()),
                );
                return Screen::Menu;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.config_selected = (self.config_selected + rows.len() - 1) % rows.len();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.config_selected = (self.config_selected + 1) % rows.len();
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('e') => {
                if let Some(row) = rows.get(self.config_selected) {
                    self.change_config_row(row);
                }
            }
            _ => {}
        }
        Screen::Config
    }

    fn change_config_row(&mut self, row: &ConfigRow) {
        match row {
            ConfigRow::KeyboardLayout => {
                let next = next_in(LAYOUT_NAMES, &self.config.keyboard_layout);
                self.config.keyboard_layout = next.to_string();
                self.input_map = input_map_for(&self.config.keyboard_layout);
            }
            ConfigRow::Theme => {
                let themes = Theme::available_themes();
                let names: Vec<&str> = themes.iter().map(String::as_str).collect();
                let next = next_in(&names, &self.config.theme).to_string();
                if let Some(theme) = Theme::load(&next) {
                    self.config.theme = next;
                    self.theme = theme;
                }
            }
            ConfigRow::Corpus(name) => self.config.toggle_corpus(name),
        }
    }

    fn finish(&mut self, run: TestRun) -> Screen {
        let identifier = run.identifier.clone();
        let result = run.into_result(self.history.results_for(&identifier));
        tracing::info!(
            test = %identifier,
            wpm = result.wpm,
            accuracy = result.accuracy,
            "run finished"
        );
        self.history.push(result.clone());
        if let Some(store) = &self.store {
            if let Err(err) = store.save_history(&self.history) {
                tracing::warn!(%err, "failed to save history");
            }
        }
        Screen::Results(Box::new(result))
    }

    fn save_config(&self) {
        if let Some(path) = &self.config_path {
            if let Err(err) = self.config.save_to(path) {
                tracing::warn!(%err, "failed to save config");
            }
        }
    }
}

/// The option after `current`, wrapping; the first option when `current`
/// is not listed.
fn next_in<'a>(options: &[&'a str], current: &str) -> &'a str {
    let next = options
        .iter()
        .position(|o| *o == current)
        .map_or(0, |i| (i + 1) % options.len());
    options.get(next).copied().unwrap_or("")
}

/// Enabled corpus names per run kind.
pub fn corpus_choices(config: &Config, registry: &CorpusRegistry) -> CorpusChoices {
    let enabled = |kind: Option<CorpusKind>| {
        registry
            .names(kind)
            .into_iter()
            .filter(|name| config.is_corpus_enabled(name))
            .collect::<Vec<_>>()
    };
    CorpusChoices {
        any: enabled(None),
        words: enabled(Some(CorpusKind::Words)),
        sentences: enabled(Some(CorpusKind::Sentences)),
    }
}

/// First enabled corpus suitable for `kind`, used when the command line
/// names no corpus.
pub fn default_corpus(choices: &CorpusChoices, kind: TestKind) -> Option<String> {
    let list = match kind {
        TestKind::Timer => &choices.any,
        TestKind::WordCount => &choices.words,
        TestKind::SentenceCount => &choices.sentences,
    };
    list.first().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::corpus::Corpus;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(ch: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
    }

    fn app() -> App {
        let mut registry = CorpusRegistry::new();
        registry.insert(Corpus::new("one", CorpusKind::Words, vec!["ab".to_string()]));
        registry.insert(Corpus::new("blank", CorpusKind::Sentences, Vec::new()));
        App::new(Config::default(), CorpusGenerator::new(registry), None, None)
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn test_menu_enter_starts_run_and_completion_shows_results() {
        let mut app = app();
        app.menu.selected = 1;
        app.handle(key(KeyCode::Enter));
        assert!(matches!(app.screen, Screen::Test(_)));

        type_str(&mut app, "a");
        app.handle(AppEvent::Tick(Duration::from_secs(3)));
        type_str(&mut app, "b");

        let Screen::Results(result) = &app.screen else {
            panic!("expected results screen");
        };
        assert_eq!(result.identifier, ResultIdentifier::new(TestKind::WordCount, 25, "one"));
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn test_timer_run_ends_on_tick() {
        let mut app = app();
        app.handle(key(KeyCode::Enter));
        type_str(&mut app, "a");
        for _ in 0..300 {
            app.handle(AppEvent::Tick(Duration::from_millis(100)));
        }
        let Screen::Results(result) = &app.screen else {
            panic!("expected results screen");
        };
        assert_eq!(result.elapsed_secs, 30.0);
        assert_eq!(result.wpm_each_second.len(), 31);
    }

    #[test]
    fn test_menu_key_abandons_run() {
        let mut app = app();
        app.handle(key(KeyCode::Enter));
        type_str(&mut app, "a");
        app.handle(ctrl('q'));
        assert!(matches!(app.screen, Screen::Menu));
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_restart_replaces_run() {
        let mut app = app();
        app.handle(key(KeyCode::Enter));
        type_str(&mut app, "a");
        app.handle(ctrl('r'));
        let Screen::Test(run) = &app.screen else {
            panic!("expected a fresh run");
        };
        assert_eq!(run.state.cursor(), 0);
        assert!(!run.clock.is_running());
    }

    #[test]
    fn test_empty_corpus_stays_on_menu() {
        let mut app = app();
        app.menu.selected = 2;
        app.handle(key(KeyCode::Enter));
        assert!(matches!(app.screen, Screen::Menu));
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_results_enter_restarts() {
        let mut app = app();
        app.menu.selected = 1;
        app.handle(key(KeyCode::Enter));
        type_str(&mut app, "ab");
        assert!(matches!(app.screen, Screen::Results(_)));
        app.handle(key(KeyCode::Enter));
        assert!(matches!(app.screen, Screen::Test(_)));
    }

    #[test]
    fn test_escape_quits_from_test() {
        let mut app = app();
        app.handle(key(KeyCode::Enter));
        app.handle(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_config_screen_toggles_corpus_and_layout() {
        let mut app = app();
        app.menu.selected = 3;
        app.handle(key(KeyCode::Enter));
        assert!(matches!(app.screen, Screen::Config));

        app.handle(key(KeyCode::Enter));
        assert_eq!(app.config.keyboard_layout, "dvorak");

        app.handle(key(KeyCode::Down));
        app.handle(key(KeyCode::Down));
        app.handle(key(KeyCode::Enter));
        assert!(!app.config.is_corpus_enabled("one"));

        app.handle(ctrl('q'));
        assert!(matches!(app.screen, Screen::Menu));
        let words = app.menu.entries[1].run_settings().unwrap();
        assert!(words.corpora.is_empty());
    }

    #[test]
    fn test_next_in_wraps() {
        let names = ["a", "b", "c"];
        assert_eq!(next_in(&names, "a"), "b");
        assert_eq!(next_in(&names, "c"), "a");
        assert_eq!(next_in(&names, "zzz"), "a");
        assert_eq!(next_in(&[], "a"), "");
    }

    #[test]
    fn test_default_corpus_by_kind() {
        let app = app();
        let choices = corpus_choices(&app.config, app.generator.registry());
        assert_eq!(default_corpus(&choices, TestKind::WordCount), Some("one".into()));
        assert_eq!(default_corpus(&choices, TestKind::SentenceCount), Some("blank".into()));
    }
}
