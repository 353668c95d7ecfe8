#![deny(unsafe_code)]
//! CLI binary for the flowfield particle animation.
//!
//! Subcommands:
//! - `render`: run N ticks headless, write a PNG and a replayable seed file
//! - `animate`: tick in real time on a background thread, saving PNG frames
//! - `params`: print every simulation parameter with its default

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use flowfield_core::RunSeed;
use flowfield_render::{snapshot::write_png, PixelCanvas, SharedCanvas};
use flowfield_sim::{
    Clock, EpochStats, FlowParams, FlowSimulation, ManualClock, Runner, SystemClock,
};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "flowfield", about = "Noise-driven flow-field particle animation")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand that runs a simulation.
#[derive(Args)]
struct RunArgs {
    /// Canvas width in pixels (overrides --params).
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Canvas height in pixels (overrides --params).
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// PRNG seed. A random one is chosen and logged when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation parameters as a JSON object (see `flowfield params`).
    #[arg(long, default_value = "{}")]
    params: String,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulation for N ticks without delays and write a PNG.
    Render {
        #[command(flatten)]
        run: RunArgs,

        /// Number of ticks to simulate.
        #[arg(short, long, default_value_t = 2000)]
        ticks: u64,

        /// Output PNG path. The seed file is written beside it as .json.
        #[arg(short, long, default_value = "flowfield.png")]
        output: PathBuf,

        /// Skip writing the seed file.
        #[arg(long)]
        no_seed_file: bool,

        /// Replay a seed file written by a previous render; other run options are ignored.
        #[arg(long)]
        replay: Option<PathBuf>,
    },
    /// Tick in real time and save a numbered PNG frame at a fixed period.
    Animate {
        #[command(flatten)]
        run: RunArgs,

        /// Number of frames to save before stopping.
        #[arg(short, long, default_value_t = 100)]
        frames: u64,

        /// Milliseconds between saved frames.
        #[arg(long, default_value_t = 1000)]
        frame_interval_ms: u64,

        /// Directory receiving frame_NNNNN.png files.
        #[arg(short, long, default_value = "frames")]
        out_dir: PathBuf,
    },
    /// Print the parameter schema.
    Params,
}

/// Parses `--params`, applies dimension overrides, and settles the seed.
fn resolve(run: &RunArgs) -> Result<(FlowParams, u64), CliError> {
    let json: serde_json::Value = serde_json::from_str(&run.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let mut params = FlowParams::from_json(&json)?;
    params = params.with_dimensions(
        run.width.unwrap_or(params.width),
        run.height.unwrap_or(params.height),
    );
    params.validate()?;
    let seed = run.seed.unwrap_or_else(rand::random);
    log::info!("seed: {seed}");
    Ok((params, seed))
}

fn stats_json(stats: EpochStats) -> serde_json::Value {
    serde_json::json!({
        "epochs": stats.epochs_completed,
        "ticks": stats.total_ticks,
        "epoch_ticks": stats.epoch_ticks,
    })
}

fn render(
    params: &FlowParams,
    seed: u64,
    ticks: u64,
    output: &Path,
    seed_file: bool,
    json: bool,
) -> Result<(), CliError> {
    let mut sim = FlowSimulation::seeded(params, seed)?;
    let mut canvas = PixelCanvas::new(params.width, params.height, params.background)?;
    let mut runner = Runner::new(ManualClock::new(), params.tick_interval());
    runner.run_ticks(&mut sim, &mut canvas, ticks);

    write_png(&canvas, output)?;
    let seed_path = seed_file.then(|| output.with_extension("json"));
    if let Some(path) = &seed_path {
        let mut run_seed = RunSeed::new(params.width, params.height, seed);
        run_seed.params = params.to_json();
        run_seed.ticks = ticks;
        run_seed.write_json(path)?;
    }

    let stats = sim.stats();
    if json {
        let info = serde_json::json!({
            "width": params.width,
            "height": params.height,
            "seed": seed,
            "ticks": ticks,
            "simulated_ms": runner.clock().elapsed().as_millis() as u64,
            "time_coordinate": sim.time_coordinate(),
            "active_particles": sim.population().active_count(),
            "stats": stats_json(stats),
            "output": output.display().to_string(),
            "seed_file": seed_path.map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {}x{} ({ticks} ticks, {} epochs, seed {seed}) -> {}",
            params.width,
            params.height,
            stats.epochs_completed,
            output.display()
        );
    }
    Ok(())
}

fn animate(
    params: &FlowParams,
    seed: u64,
    frames: u64,
    frame_interval: Duration,
    out_dir: &Path,
    json: bool,
) -> Result<(), CliError> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| CliError::Io(format!("{}: {e}", out_dir.display())))?;

    let mut sim = FlowSimulation::seeded(params, seed)?;
    let shared = SharedCanvas::new(PixelCanvas::new(
        params.width,
        params.height,
        params.background,
    )?);
    let stop = Arc::new(AtomicBool::new(false));

    let sim_thread = {
        let mut sink = shared.clone();
        let stop = Arc::clone(&stop);
        let interval = params.tick_interval();
        thread::spawn(move || {
            let mut runner = Runner::new(SystemClock::new(), interval);
            let ticks = runner.run_until(&mut sim, &mut sink, &stop);
            (ticks, sim.stats())
        })
    };

    let mut clock = SystemClock::new();
    let written = (0..frames).try_for_each(|i| {
        if i > 0 {
            clock.wait(frame_interval);
        }
        let path = out_dir.join(format!("frame_{i:05}.png"));
        write_png(&shared.snapshot(), &path)
    });

    stop.store(true, Ordering::Release);
    let (ticks, stats) = sim_thread
        .join()
        .map_err(|_| CliError::Runtime("simulation thread panicked".into()))?;
    written?;

    if json {
        let info = serde_json::json!({
            "seed": seed,
            "frames": frames,
            "ticks": ticks,
            "stats": stats_json(stats),
            "out_dir": out_dir.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "animated {frames} frames over {ticks} ticks ({} epochs, seed {seed}) -> {}",
            stats.epochs_completed,
            out_dir.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Params => {
            let schema = FlowParams::param_schema();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else if let Some(entries) = schema.as_object() {
                for (name, entry) in entries {
                    println!(
                        "  {name:<18} {:<8} default {:<10} {}",
                        entry["type"].as_str().unwrap_or("?"),
                        entry["default"].to_string(),
                        entry["description"].as_str().unwrap_or("")
                    );
                }
            }
        }
        Command::Render {
            run,
            ticks,
            output,
            no_seed_file,
            replay,
        } => {
            let (params, seed, ticks) = match replay {
                Some(path) => {
                    let run_seed =
                        RunSeed::read_json(&path).map_err(|e| CliError::Input(e.to_string()))?;
                    let params = FlowParams::from_json(&run_seed.params)?
                        .with_dimensions(run_seed.width, run_seed.height);
                    log::info!("replaying {} (seed: {})", path.display(), run_seed.seed);
                    (params, run_seed.seed, run_seed.ticks)
                }
                None => {
                    let (params, seed) = resolve(&run)?;
                    (params, seed, ticks)
                }
            };
            render(&params, seed, ticks, &output, !no_seed_file, cli.json)?;
        }
        Command::Animate {
            run,
            frames,
            frame_interval_ms,
            out_dir,
        } => {
            let (params, seed) = resolve(&run)?;
            animate(
                &params,
                seed,
                frames,
                Duration::from_millis(frame_interval_ms),
                &out_dir,
                cli.json,
            )?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
