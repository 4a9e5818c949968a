use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
};
use tracing::info;
use typemeter::{
    app::{Action, App},
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    config::{ConfigStore, FileConfigStore, Overrides},
    runtime::{CrosstermEventSource, FixedTicker, Runner, TypeEvent},
    sample::{source_for, SampleKind},
    ui::screen_area,
};

/// typing speed test with live wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the sample text as fast and as accurately as you can. Words per minute, accuracy and the share of wrong characters update live until the text matches exactly."
)]
pub struct Cli {
    /// custom prompt to use
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// where sample texts come from
    #[clap(short = 's', long, value_enum)]
    source: Option<SampleKind>,

    /// text file with one sample per line (selects the file source)
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// number of generated sentences per test
    #[clap(long)]
    sentences: Option<usize>,

    /// milliseconds between live metric refreshes
    #[clap(long)]
    tick_ms: Option<u64>,

    /// hide the wrong-character percentage
    #[clap(long)]
    hide_wrong: bool,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            tick_rate_ms: self.tick_ms,
            source: self.source,
            samples_file: self.file.clone(),
            generated_sentences: self.sentences,
            hide_wrong_percent: self.hide_wrong,
        }
    }
}

/// Log to a file: the terminal belongs to the UI while we run.
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = std::env::var("TYPEMETER_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let store = FileConfigStore::new();
    let config = store.load().with_overrides(&cli.overrides());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved config");
    }

    let source = source_for(&config, cli.prompt.clone());
    let mut app = App::new(&config, source, SystemClock);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::from_millis(config.tick_rate_ms()),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app, || runner.step());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run<B: Backend, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
    mut next_event: impl FnMut() -> TypeEvent,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        match next_event() {
            TypeEvent::Tick => {
                if app.wants_tick() {
                    app.on_tick();
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            TypeEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            TypeEvent::Key(key) => {
                if app.on_key(key) == Action::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui<C: Clock>(app: &App<C>, f: &mut Frame) {
    f.render_widget(app, screen_area(f.area()));
}
