mod logging;
mod ui;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    io::{self, stdin, Write},
    time::{Duration, Instant},
};
use tracing::{debug, info};
use wordveil::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    game::{Game, Mode, SoundCue},
    picker::PickerStep,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner, Scheduler},
    ActionError,
};

const TICK_RATE_MS: u64 = 250;

/// hide-the-word memorization game for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a sentence, study it, then hide the words behind numbered cells. A spinner picks a hidden cell; name the word that belongs there."
)]
pub struct Cli {
    /// sentence to memorize (words are split on whitespace)
    #[clap(short = 's', long)]
    sentence: Option<String>,

    /// start with the words already hidden instead of in study mode
    #[clap(long)]
    hidden: bool,

    /// delay between the spinner's first steps, in milliseconds
    #[clap(long)]
    start_cadence_ms: Option<u64>,

    /// spinner time after which each step gets slower, in milliseconds
    #[clap(long)]
    slowdown_after_ms: Option<u64>,

    /// spinner time after which it settles on a cell, in milliseconds
    #[clap(long)]
    stop_after_ms: Option<u64>,

    /// how much slower each step gets once slowing down, in milliseconds
    #[clap(long)]
    cadence_step_ms: Option<u64>,

    /// ring the terminal bell on right and wrong answers
    #[clap(long)]
    bell: bool,

    /// seed the spinner for a repeatable game
    #[clap(long)]
    seed: Option<u64>,

    /// write the effective settings to the config file before starting
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line flags over the stored config
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(ms) = self.start_cadence_ms {
            cfg.picker.start_cadence_ms = ms;
        }
        if let Some(ms) = self.slowdown_after_ms {
            cfg.picker.slowdown_after_ms = ms;
        }
        if let Some(ms) = self.stop_after_ms {
            cfg.picker.stop_after_ms = ms;
        }
        if let Some(ms) = self.cadence_step_ms {
            cfg.picker.cadence_step_ms = ms;
        }
        cfg.start_hidden |= self.hidden;
        cfg.bell |= self.bell;
        cfg
    }
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub scheduler: Scheduler,
    /// Cells per board row as last drawn; used for up/down movement.
    pub grid_columns: usize,
    rng: StdRng,
    bell: bool,
}

impl App {
    pub fn new(game: Game, bell: bool, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            game,
            scheduler: Scheduler::new(),
            grid_columns: 1,
            rng,
            bell,
        }
    }

    /// Handle one key press. Returns false when the player asked to quit.
    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return false;
        }

        let row = self.grid_columns.max(1) as isize;
        let result = match self.game.mode() {
            Mode::Board => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return false,
                KeyCode::Left => self.game.move_cursor(-1),
                KeyCode::Right => self.game.move_cursor(1),
                KeyCode::Up => self.game.move_cursor(-row),
                KeyCode::Down => self.game.move_cursor(row),
                KeyCode::Enter => self.game.open_answer_at_cursor(),
                KeyCode::Char(' ') => self.start_picker(now),
                KeyCode::Char('h') => self.game.hide_words(),
                KeyCode::Char('e') => self.game.open_settings(),
                _ => Ok(()),
            },
            Mode::Answer(_) => match key.code {
                KeyCode::Esc => {
                    self.game.close_dialog();
                    Ok(())
                }
                KeyCode::Up => self.game.choose_option(-1),
                KeyCode::Down => self.game.choose_option(1),
                KeyCode::Enter => self
                    .game
                    .submit_answer(&mut self.rng)
                    .map(|verdict| debug!(%verdict, "answered")),
                _ => Ok(()),
            },
            Mode::Settings(_) => match key.code {
                KeyCode::Esc => {
                    self.game.close_dialog();
                    Ok(())
                }
                KeyCode::Enter => self.game.save_settings(),
                KeyCode::Backspace => self.game.settings_backspace(),
                KeyCode::Char('u') if ctrl => self.game.settings_clear(),
                KeyCode::Char(c) if !ctrl => self.game.settings_input(c),
                _ => Ok(()),
            },
        };

        if let Err(err) = result {
            debug!(%err, key = ?key.code, "action rejected");
        }
        self.sync_scheduler();
        true
    }

    fn start_picker(&mut self, now: Instant) -> Result<(), ActionError> {
        let (token, first_tick_in) = self.game.start_picker()?;
        self.scheduler.schedule(token, first_tick_in, now);
        Ok(())
    }

    /// Fire the picker tick if it is due and schedule the next one.
    pub fn on_timer(&mut self, now: Instant) {
        let Some(token) = self.scheduler.take_due(now) else {
            return;
        };

        if let PickerStep::Selected { next_in, .. } = self.game.on_picker_tick(token, &mut self.rng)
        {
            self.scheduler.schedule(token, next_in, now);
        }
    }

    /// Drop any pending tick whose run no longer exists.
    fn sync_scheduler(&mut self) {
        if !self.game.is_picking() {
            self.scheduler.cancel();
        }
    }

    /// Number of terminal bells owed for the cues raised since the last call.
    pub fn take_bells(&mut self) -> usize {
        let cues = self.game.drain_cues();
        if !self.bell {
            return 0;
        }
        cues.iter()
            .map(|cue| match cue {
                SoundCue::Right => 1,
                SoundCue::Wrong(_) => 2,
                SoundCue::Finding | SoundCue::StopFinding => 0,
            })
            .sum()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = logging::init(&AppDirs::log_dir())?;

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    config
        .picker
        .validate()
        .context("invalid spinner timings")?;
    if cli.save_config {
        store
            .save(&config)
            .with_context(|| format!("saving {}", store.path().display()))?;
        info!(path = %store.path().display(), "config saved");
    }

    let game = Game::new(
        cli.sentence.as_deref().unwrap_or_default(),
        config.start_hidden,
        config.picker,
    );
    let mut app = App::new(game, config.bell, cli.seed);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend + Write>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    info!("game started");

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        let deadline = app.scheduler.time_until(Instant::now());
        match runner.step_within(deadline) {
            GameEvent::Key(key) => {
                if !app.on_key(key, Instant::now()) {
                    break;
                }
            }
            GameEvent::Resize | GameEvent::Tick => {}
        }

        app.on_timer(Instant::now());

        let bells = app.take_bells();
        if bells > 0 {
            let out = terminal.backend_mut();
            for _ in 0..bells {
                out.write_all(b"\x07")?;
            }
            Write::flush(out)?;
        }
    }

    info!("game closed");
    Ok(())
}
