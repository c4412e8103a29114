//! Flappy Plus entry point
//!
//! Runs the terminal front-end: poll input, tick the simulation, draw, at a
//! fixed frame rate until a quit intent arrives.

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Stdout, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use crossterm::{
    ExecutableCommand, cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    terminal,
};

use flappy_plus::platform::intent_for_event;
use flappy_plus::renderer::{self, terminal::play_area};
use flappy_plus::sim::{GamePhase, GameState, RngSampler, TickInput, tick};
use flappy_plus::view::snapshot;
use flappy_plus::{HighScores, Settings, Tuning};

const USAGE: &str = "usage: flappy-plus [--tuning FILE] [--settings FILE] [--seed N] [--log FILE]";

/// Command-line options
#[derive(Debug, Default)]
struct Args {
    tuning: Option<PathBuf>,
    settings: Option<PathBuf>,
    seed: Option<u64>,
    log: Option<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Args::default();
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value\n{USAGE}"));
            match flag.as_str() {
                "--tuning" => parsed.tuning = Some(PathBuf::from(value()?)),
                "--settings" => parsed.settings = Some(PathBuf::from(value()?)),
                "--log" => parsed.log = Some(PathBuf::from(value()?)),
                "--seed" => {
                    let raw = value()?;
                    parsed.seed = Some(raw.parse().map_err(|_| format!("invalid seed: {raw}"))?);
                }
                "-h" | "--help" => return Err(USAGE.to_string()),
                other => return Err(format!("unknown argument: {other}\n{USAGE}")),
            }
        }
        Ok(parsed)
    }
}

/// Puts the terminal into game mode and restores it on drop, including on
/// early returns and panics unwinding through `main`
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut Stdout) -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(EnableMouseCapture)?;
        out.execute(cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(DisableMouseCapture);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Front-end session: simulation plus everything that only the front-end needs
struct Game {
    state: GameState,
    settings: Settings,
    scores: HighScores,
    input: TickInput,
    last_phase: GamePhase,
    last_rank: Option<usize>,
}

impl Game {
    fn new(state: GameState, settings: Settings) -> Self {
        Self {
            last_phase: state.phase,
            state,
            settings,
            scores: HighScores::new(),
            input: TickInput::default(),
            last_rank: None,
        }
    }

    /// Drain pending terminal events into intents until `deadline`
    fn poll_input(&mut self, deadline: Instant) -> std::io::Result<()> {
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                return Ok(());
            }
            if let Some(intent) = intent_for_event(&event::read()?) {
                self.input.push(intent);
            }
            if timeout.is_zero() {
                return Ok(());
            }
        }
    }

    fn update(&mut self, dt: f32) {
        tick(&mut self.state, &self.input, dt);
        self.input.clear();

        let phase = self.state.phase;
        if phase != self.last_phase {
            if phase == GamePhase::Dead {
                self.last_rank = self.scores.add_score(self.state.score, self.state.level);
                if let Some(rank) = self.last_rank {
                    log::info!("Run placed #{} this session", rank);
                }
            }
            self.last_phase = phase;
        }
    }

    fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let (cols, rows) = play_area(cols, rows);
        let mut snap = snapshot(&self.state);
        if let (GamePhase::Dead, Some(rank), Some(overlay)) =
            (self.state.phase, self.last_rank, snap.overlay.as_mut())
        {
            overlay.subtitle = format!("{}  (#{} this session)", overlay.subtitle, rank);
        }
        let frame = renderer::rasterize(&snap, cols, rows, &self.settings);
        renderer::draw(out, &frame, &snap)
    }
}

fn run(game: &mut Game) -> std::io::Result<()> {
    let mut out = BufWriter::new(stdout());
    let frame_budget = game.settings.frame_duration();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        game.poll_input(frame_start + frame_budget)?;
        if game.input.quit_requested() {
            log::info!("Quit requested");
            return Ok(());
        }

        let now = Instant::now();
        let dt = game.settings.clamp_dt(now - last);
        last = now;

        game.update(dt);
        game.render(&mut out)?;

        let spent = frame_start.elapsed();
        if spent < frame_budget {
            std::thread::sleep(frame_budget - spent);
        }
    }
}

fn init_logging(path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    // stdout belongs to the renderer, so log lines go to a file
    let path = path.unwrap_or_else(|| PathBuf::from("flappy-plus.log"));
    let file = File::create(&path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse(std::env::args().skip(1))?;
    init_logging(args.log)?;
    log::info!("Flappy Plus starting...");

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if settings.tick_rate == 0 {
        log::warn!("tick_rate 0 in settings, running at 1 fps");
    }
    let sampler = match args.seed {
        Some(seed) => RngSampler::from_seed(seed),
        None => RngSampler::from_entropy(),
    };
    let state = GameState::new(tuning, sampler)?;
    let mut game = Game::new(state, settings);

    let mut out = stdout();
    let guard = TerminalGuard::enter(&mut out)?;
    let result = run(&mut game);
    drop(guard);

    log::info!(
        "Session over: best {}, {} runs",
        game.state.best,
        game.scores.runs()
    );
    result?;
    Ok(())
}
