#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Reel Spin.

mod outcome_transfer;

use std::{
    fmt::Write as _,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::Vec2;
use rand_chacha::ChaCha8Rng;
use reelspin_core::{AudioCueSystem, CueId, GridDimensions, RandomSource, SlotConfig};
use reelspin_engine::{FrameReport, UpdateLoop};
use reelspin_rendering::{
    ButtonLayout, Color, Hud, Presentation, RenderingBackend, SurfaceSync, SymbolPalette,
};
use reelspin_rendering_macroquad::MacroquadBackend;
use reelspin_system_audio_cues::{play_all, CueTable};
use reelspin_system_choreographer::RngSource;
use reelspin_system_win_evaluator::{evaluate, WinReport};
use reelspin_world::query;
use tracing_subscriber::EnvFilter;

use self::outcome_transfer::SpinOutcome;

/// Simulated time after which a headless spin is considered stuck.
const MAX_SIMULATED_SPIN: Duration = Duration::from_secs(60);
/// Height of the band below the grid that holds the spin button.
const BUTTON_BAND: f32 = 240.0;

type SessionRandom = RngSource<ChaCha8Rng>;

/// Command-line options accepted by the Reel Spin binary.
#[derive(Debug, Parser)]
#[command(name = "reelspin", about = "Toy slot machine with animated reels")]
struct CliArgs {
    /// TOML file overriding the default slot configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the number of grid rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Overrides the number of grid columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Seed for the symbol generator; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file replacing the numbered audio cue table.
    #[arg(long, value_name = "PATH")]
    cues: Option<PathBuf>,
    /// Runs the given number of spins without a window and prints each outcome.
    #[arg(long, value_name = "SPINS")]
    headless: Option<u32>,
    /// Fixed frame step used by headless runs, in milliseconds.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    frame_ms: u64,
    /// Prints the grid and wins encoded in a shared outcome code, then exits.
    #[arg(long, value_name = "CODE")]
    replay: Option<String>,
    /// Draws coloured quads instead of loading symbol sprites.
    #[arg(long)]
    no_sprites: bool,
    /// Location of the sprite manifest.
    #[arg(long, value_name = "PATH")]
    sprite_manifest: Option<PathBuf>,
    /// Synchronises presentation with the display refresh rate.
    #[arg(long, value_name = "ON")]
    vsync: Option<bool>,
    /// Logs the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Audio system that reports cues through the log.
#[derive(Debug, Default)]
struct TracingAudio;

impl AudioCueSystem for TracingAudio {
    fn play(&mut self, cue: &CueId) {
        tracing::debug!(cue = cue.as_str(), "audio cue");
    }
}

/// Entry point for the Reel Spin command-line interface.
fn main() -> Result<()> {
    install_tracing();
    let args = CliArgs::parse();

    if let Some(code) = &args.replay {
        let outcome = SpinOutcome::decode(code).context("failed to decode outcome code")?;
        let report = evaluate(outcome.dimensions(), &outcome.snapshot());
        print!("{}", describe_outcome(&outcome, &report));
        return Ok(());
    }

    let config = load_config(args.config.as_deref(), args.rows, args.columns)?;
    let cues = load_cues(args.cues.as_deref(), &config)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "symbol generator seeded");

    let mut update_loop = UpdateLoop::new(config, SessionRandom::seeded(seed), cues)
        .context("invalid slot configuration")?;

    match args.headless {
        Some(spins) => {
            let frame = Duration::from_millis(args.frame_ms);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "{}", update_loop.welcome_banner())?;
            let _ = run_headless(&mut update_loop, spins, frame, &mut out)?;
            Ok(())
        }
        None => run_interactive(&args, update_loop),
    }
}

fn install_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();
}

/// Reads the optional TOML configuration and applies command-line overrides.
fn load_config(
    path: Option<&Path>,
    rows: Option<u32>,
    columns: Option<u32>,
) -> Result<SlotConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path).with_context(|| {
                format!("failed to read slot configuration at {}", path.display())
            })?;
            parse_config(&contents).with_context(|| {
                format!("failed to parse slot configuration at {}", path.display())
            })?
        }
        None => SlotConfig::default(),
    };
    if let Some(rows) = rows {
        config.rows = rows;
    }
    if let Some(columns) = columns {
        config.columns = columns;
    }
    Ok(config)
}

fn parse_config(contents: &str) -> Result<SlotConfig> {
    toml::from_str(contents).context("slot configuration is not valid toml")
}

/// Reads the optional cue table, defaulting to one numbered cue per cell.
fn load_cues(path: Option<&Path>, config: &SlotConfig) -> Result<CueTable> {
    let Some(path) = path else {
        return Ok(CueTable::numbered(config.dimensions().cell_count()));
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read cue table at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse cue table at {}", path.display()))
}

/// Runs `spins` spins at a fixed frame step, writing each outcome to `out`.
fn run_headless<R, W>(
    update_loop: &mut UpdateLoop<R>,
    spins: u32,
    frame: Duration,
    out: &mut W,
) -> Result<Vec<SpinOutcome>>
where
    R: RandomSource,
    W: Write,
{
    let dimensions = update_loop.config().dimensions();
    let mut audio = TracingAudio;
    let mut outcomes = Vec::with_capacity(spins as usize);

    for spin in 1..=spins {
        if !update_loop.try_spin() {
            bail!("spin {spin} was rejected while the previous spin was in flight");
        }

        let mut elapsed = Duration::ZERO;
        let report = loop {
            if elapsed > MAX_SIMULATED_SPIN {
                bail!("spin {spin} did not settle within {MAX_SIMULATED_SPIN:?}");
            }
            let report = update_loop.update(frame);
            elapsed += frame;
            play_all(&report.cues, &mut audio);
            if report.spin_completed() {
                break report;
            }
        };

        let outcome = completed_outcome(dimensions, &report)?;
        let evaluation = evaluate(dimensions, &outcome.snapshot());
        writeln!(out, "spin {spin} after {} ms", elapsed.as_millis())?;
        write!(out, "{}", describe_outcome(&outcome, &evaluation))?;
        writeln!(out, "code: {}", outcome.encode())?;
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

fn completed_outcome(dimensions: GridDimensions, report: &FrameReport) -> Result<SpinOutcome> {
    let snapshot = report
        .completed_spin
        .as_ref()
        .context("frame report is missing the completed spin")?;
    Ok(SpinOutcome::from_snapshot(dimensions, snapshot))
}

/// Renders the grid row by row followed by the winning runs.
fn describe_outcome(outcome: &SpinOutcome, report: &WinReport) -> String {
    let dimensions = outcome.dimensions();
    let snapshot = outcome.snapshot();
    let mut text = String::new();

    for row in 0..dimensions.rows() {
        let symbols: Vec<String> = snapshot
            .row(dimensions, row)
            .iter()
            .map(|symbol| symbol.get().to_string())
            .collect();
        let _ = writeln!(text, "row {row}: {}", symbols.join(" "));
    }

    if report.is_win() {
        for win in report.rows() {
            let _ = writeln!(
                text,
                "win: row {} has {} x symbol {}",
                win.row,
                win.run_length,
                win.symbol.get()
            );
        }
    } else {
        text.push_str("no win\n");
    }

    text
}

/// Short status line shown after a spin resolves.
fn outcome_message(report: &FrameReport) -> String {
    match report.wins.len() {
        0 => "No win. Press Space to spin again.".to_owned(),
        1 => "1 winning row!".to_owned(),
        rows => format!("{rows} winning rows!"),
    }
}

fn run_interactive(args: &CliArgs, mut update_loop: UpdateLoop<SessionRandom>) -> Result<()> {
    let config = update_loop.config().clone();
    let grid_size = Vec2::new(
        config.columns as f32 * config.cell_size,
        config.rows as f32 * config.cell_size,
    );
    let origin = Vec2::new(config.origin.x, config.origin.y);
    let world_size = Vec2::new(
        grid_size.x + origin.x * 2.0,
        grid_size.y + origin.y * 2.0 + BUTTON_BAND,
    );
    let button = ButtonLayout::new(
        Vec2::new(world_size.x * 0.5, origin.y + grid_size.y + BUTTON_BAND * 0.5),
        Vec2::new(config.cell_size.max(160.0), BUTTON_BAND * 0.5),
    )
    .context("failed to lay out the spin button")?;

    let presentation = Presentation::new(
        "Reel Spin",
        Color::from_rgb_u8(18, 18, 28),
        Vec2::new(1024.0, 768.0),
        world_size,
        button,
        SymbolPalette::default(),
    );

    let mut backend = MacroquadBackend::new()
        .with_show_fps(args.show_fps)
        .with_sprite_loading(!args.no_sprites);
    if let Some(enabled) = args.vsync {
        backend = backend.with_vsync(enabled);
    }
    if let Some(path) = &args.sprite_manifest {
        backend = backend.with_manifest_path(path.clone());
    }

    let dimensions = config.dimensions();
    let mut sync = SurfaceSync::new(config.cell_size);
    let mut audio = TracingAudio;
    let mut message = Some(update_loop.welcome_banner().to_owned());

    backend.run(presentation, move |dt, input, surface| {
        if input.spin_requested && update_loop.try_spin() {
            message = None;
        }

        let report = update_loop.update(dt);
        play_all(&report.cues, &mut audio);
        if let Some(snapshot) = &report.completed_spin {
            let outcome = SpinOutcome::from_snapshot(dimensions, snapshot);
            tracing::info!(code = %outcome.encode(), "replay this spin with --replay");
            message = Some(outcome_message(&report));
        }

        let stats = sync.sync(&query::cell_view(update_loop.world()), surface);
        if stats.created > 0 {
            tracing::debug!(drawables = stats.created, "created cell drawables");
        }

        Hud {
            spin_enabled: update_loop.can_spin(),
            message: message.clone(),
        }
    })
}
