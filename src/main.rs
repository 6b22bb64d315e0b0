//! STACKFALL - falling blocks in the terminal
//!
//! Log in, stack pieces, chase the leaderboard.

mod board;
mod game;
mod input;
mod login;
mod piece;
mod randomizer;
mod records;
mod score;
mod session;
mod settings;
mod shape;
mod submit;
mod tetromino;
mod ui;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::KeyBindings;
use login::LoginScreen;
use ratatui::{backend::CrosstermBackend, Terminal};
use records::RecordStore;
use session::Session;
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

/// Application state
enum AppState {
    Login(LoginScreen),
    Playing(Session),
}

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct Args {
    /// Seed for the piece randomizer
    seed: Option<u64>,
    /// Override for the score file location
    records: Option<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().context("--seed needs a value")?;
                    parsed.seed = Some(
                        value
                            .parse()
                            .with_context(|| format!("invalid seed {:?}", value))?,
                    );
                }
                "--records" => {
                    let value = args.next().context("--records needs a path")?;
                    parsed.records = Some(PathBuf::from(value));
                }
                other => bail!("unknown argument {:?} (expected --seed <n> or --records <path>)", other),
            }
        }
        Ok(parsed)
    }
}

/// Turns wall-clock frames into whole milliseconds for the engine
///
/// Sub-millisecond remainders carry over to the next frame so gravity keeps
/// pace with real time.
struct FrameClock {
    last: Instant,
}

impl FrameClock {
    fn new(now: Instant) -> Self {
        Self { last: now }
    }

    /// Whole milliseconds since the previous call
    fn advance(&mut self, now: Instant) -> u64 {
        let elapsed_ms = now.saturating_duration_since(self.last).as_millis() as u64;
        self.last += Duration::from_millis(elapsed_ms);
        elapsed_ms
    }
}

/// Get the stackfall temp directory, creating it if needed
fn stackfall_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("stackfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;

    // Setup tracing to log file
    let log_dir = stackfall_temp_dir();
    let log_file = format!("{:08x}.log", rand::random::<u32>());
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("stackfall=debug".parse()?),
        )
        .with_ansi(false)
        .init();

    tracing::info!("STACKFALL starting up, log={}", log_dir.join(&log_file).display());

    let settings = Settings::load();
    let bindings = KeyBindings::from_settings(&settings);

    let records_path = args
        .records
        .clone()
        .or_else(RecordStore::default_path)
        .unwrap_or_else(|| log_dir.join("records.json"));
    let store = RecordStore::open(records_path);
    tracing::info!("Score records at {}", store.path().display());

    // Runtime for background score submission
    let runtime = tokio::runtime::Runtime::new().context("failed to create async runtime")?;

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let app = App {
        settings: &settings,
        bindings: &bindings,
        store: &store,
        seed: args.seed,
        runtime: runtime.handle().clone(),
    };
    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    // Write back so a first run leaves an editable config file
    if let Err(e) = settings.save() {
        tracing::warn!("Could not save settings: {:#}", e);
        eprintln!("Warning: Could not save settings: {:#}", e);
    }

    if let Ok(Some((username, points))) = &result {
        println!("\nThanks for playing STACKFALL, {}!", username);
        println!("Last Score: {}", points);
        if let Some(stats) = store.stats(username) {
            println!("Best: {} | Games: {}", stats.high_score, stats.games_played);
        }
    }

    result.map(|_| ())
}

/// Everything the frame loop needs that outlives a single session
struct App<'a> {
    settings: &'a Settings,
    bindings: &'a KeyBindings,
    store: &'a RecordStore,
    seed: Option<u64>,
    runtime: tokio::runtime::Handle,
}

impl App<'_> {
    /// Run until the player quits from the login screen.
    /// Returns the last player's name and score, if a game was played.
    fn run(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<Option<(String, u64)>> {
        let frame_duration = Duration::from_micros(1_000_000 / self.settings.gameplay.frame_rate());
        let mut state = AppState::Login(LoginScreen::new(self.store));
        let mut last_result: Option<(String, u64)> = None;
        let mut clock = FrameClock::new(Instant::now());

        loop {
            // Render
            terminal.draw(|frame| match &state {
                AppState::Login(screen) => ui::render_login(frame, screen),
                AppState::Playing(session) => {
                    ui::render_game(frame, session, self.settings, self.bindings)
                }
            })?;

            // Handle input
            if event::poll(frame_duration)? {
                if let Event::Key(key) = event::read()? {
                    match &mut state {
                        _ if key.kind != KeyEventKind::Press => {}
                        AppState::Login(screen) => {
                            let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                                && key.code == KeyCode::Char('c');
                            match key.code {
                                KeyCode::Esc => return Ok(last_result),
                                _ if ctrl_c => return Ok(last_result),
                                KeyCode::Char(c) => screen.text_input_char(c),
                                KeyCode::Backspace => screen.text_input_backspace(),
                                KeyCode::Enter => {
                                    if let Some((username, player)) = screen.submit(self.store) {
                                        let session = Session::new(
                                            &username,
                                            player,
                                            self.settings,
                                            self.seed,
                                            self.store,
                                            self.runtime.clone(),
                                        );
                                        state = AppState::Playing(session);
                                        clock = FrameClock::new(Instant::now());
                                    }
                                }
                                _ => {}
                            }
                        }
                        AppState::Playing(session) => {
                            if session.game.is_game_over() {
                                // Keys held through the end of a game are ignored for a moment
                                let ready = session.accepts_menu_input(Instant::now());
                                match key.code {
                                    _ if !ready => {}
                                    KeyCode::Enter => {
                                        session.restart();
                                        clock = FrameClock::new(Instant::now());
                                    }
                                    KeyCode::Esc => {
                                        tracing::info!("{} logged out", session.game.username());
                                        state = AppState::Login(LoginScreen::new(self.store));
                                    }
                                    _ => {}
                                }
                            } else if let Some(action) = self.bindings.action_for(key) {
                                session.game.process_action(action);
                                if session.game.is_game_over() {
                                    last_result = Some((
                                        session.game.username().to_string(),
                                        session.game.score().points,
                                    ));
                                }
                            }
                        }
                    }
                }
            }

            // Advance gravity by the real time since the previous frame
            let now = Instant::now();
            let elapsed_ms = clock.advance(now);

            if let AppState::Playing(session) = &mut state {
                let was_over = session.game.is_game_over();
                session.game.tick(elapsed_ms);
                if !was_over && session.game.is_game_over() {
                    last_result = Some((
                        session.game.username().to_string(),
                        session.game.score().points,
                    ));
                }
                session.update(now);
            }
        }
    }
}
