use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Style;
use ratatui::widgets::Block;

use keytrail::app::{App, Screen, corpus_choices, default_corpus};
use keytrail::config::Config;
use keytrail::event::EventHandler;
use keytrail::generator::CorpusGenerator;
use keytrail::generator::corpus::CorpusRegistry;
use keytrail::logging::{self, Verbosity};
use keytrail::session::result::{ResultIdentifier, TestKind};
use keytrail::store::json_store::JsonStore;
use keytrail::ui::components::corpus_list::ConfigView;
use keytrail::ui::components::menu::MenuView;
use keytrail::ui::components::results::ResultsView;
use keytrail::ui::components::typing_area::TypingArea;
use keytrail::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "keytrail", version, about = "Terminal typing speed trainer")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Keyboard layout (qwerty, dvorak, colemak, colemak-dh)")]
    layout: Option<String>,

    #[arg(short, long, help = "Log debug output")]
    verbose: bool,

    #[arg(short, long, group = "run", help = "Start a word count run with N words")]
    words: Option<u64>,

    #[arg(short, long, group = "run", help = "Start a sentence run with N sentences")]
    sentences: Option<u64>,

    #[arg(long, group = "run", help = "Start a timed run of SECS seconds")]
    time: Option<u64>,

    #[arg(short, long, help = "Corpus for a run started from the command line")]
    corpus: Option<String>,
}

impl Cli {
    fn direct_run(&self) -> Option<(TestKind, u64)> {
        match (self.words, self.sentences, self.time) {
            (Some(n), _, _) => Some((TestKind::WordCount, n)),
            (_, Some(n), _) => Some((TestKind::SentenceCount, n)),
            (_, _, Some(secs)) => Some((TestKind::Timer, secs)),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = logging::default_log_path();
    if let Err(err) = logging::init(Verbosity::from_flag(cli.verbose), &log_path) {
        eprintln!("keytrail: logging disabled: {err:#}");
    }

    let config_path = Config::config_path();
    let mut config = Config::load_from(&config_path).unwrap_or_else(|err| {
        tracing::warn!(%err, "failed to read config, using defaults");
        Config::default()
    });
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    if let Some(layout) = &cli.layout {
        config.keyboard_layout = layout.clone();
        config.normalize();
    }

    let mut registry = CorpusRegistry::with_embedded()?;
    registry.load_local(&config.local_corpora);

    let store = match JsonStore::new() {
        Ok(store) => Some(store),
        Err(err) => {
            tracing::warn!(%err, "history disabled");
            None
        }
    };

    let mut app = App::new(config, CorpusGenerator::new(registry), store, Some(config_path));

    if let Some((kind, setting)) = cli.direct_run() {
        let choices = corpus_choices(&app.config, app.generator.registry());
        match cli.corpus.clone().or_else(|| default_corpus(&choices, kind)) {
            Some(corpus) => {
                app.screen = app.begin(ResultIdentifier::new(kind, setting, corpus));
            }
            None => app.notice = Some(format!("No corpus enabled for a {}", kind.label())),
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(app.tick_rate());

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(?err, "event loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        app.handle(events.next()?);

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let theme: &Theme = &app.theme;

    let bg = Block::default().style(Style::default().bg(theme.colors.bg()));
    frame.render_widget(bg, area);

    match &app.screen {
        Screen::Menu => frame.render_widget(
            MenuView::new(&app.menu, theme, app.notice.as_deref()),
            area,
        ),
        Screen::Test(run) => frame.render_widget(TypingArea::new(run, theme), area),
        Screen::Results(result) => frame.render_widget(ResultsView::new(result, theme), area),
        Screen::Config => frame.render_widget(
            ConfigView {
                config: &app.config,
                registry: app.generator.registry(),
                selected: app.config_selected,
                theme,
            },
            area,
        ),
    }
}
