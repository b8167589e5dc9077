//! Command line front end for the predator-prey simulation.

mod input;
mod output;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use eco_core::{EcosystemConfig, GeneratorConfig, RunConfig, ShardStrategyKind};
use eco_world::{generator, Simulation, SimulationResult};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "ecosystem")]
#[command(about = "Deterministic rabbits-and-foxes grid simulation")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print the final world
    Run {
        /// Scenario file, stdin when omitted
        input: Option<PathBuf>,

        /// Worker threads (default: available parallelism)
        #[arg(long, short = 't')]
        threads: Option<usize>,

        #[arg(long, value_enum, default_value_t = ShardArg::Contiguous)]
        shards: ShardArg,

        /// Draw the board on stderr after every generation
        #[arg(long)]
        show_generations: bool,

        /// Print elapsed milliseconds before the result
        #[arg(long)]
        timing: bool,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Write a random scenario
    Generate {
        #[arg(long)]
        rows: usize,

        #[arg(long)]
        cols: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, default_value_t = 0.05)]
        rock_density: f32,

        #[arg(long, default_value_t = 0.2)]
        rabbit_density: f32,

        #[arg(long, default_value_t = 0.05)]
        fox_density: f32,

        #[arg(long, default_value_t = 100)]
        generations: u64,

        #[arg(long, default_value_t = 2)]
        rabbit_breeding: u32,

        #[arg(long, default_value_t = 4)]
        fox_breeding: u32,

        #[arg(long, default_value_t = 3)]
        fox_starvation: u32,

        /// Output file, stdout when omitted
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ShardArg {
    Contiguous,
    PerRow,
    PerCell,
}

impl From<ShardArg> for ShardStrategyKind {
    fn from(arg: ShardArg) -> Self {
        match arg {
            ShardArg::Contiguous => ShardStrategyKind::Contiguous,
            ShardArg::PerRow => ShardStrategyKind::PerRow,
            ShardArg::PerCell => ShardStrategyKind::PerCell,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_telemetry(cli.log_json)?;

    match cli.command {
        Commands::Run {
            input,
            threads,
            shards,
            show_generations,
            timing,
            format,
        } => {
            let mut run_config = RunConfig {
                shard_strategy: shards.into(),
                ..RunConfig::default()
            };
            if let Some(threads) = threads {
                run_config.workers = threads;
            }
            run(input, run_config, show_generations, timing, format)
        }
        Commands::Generate {
            rows,
            cols,
            seed,
            rock_density,
            rabbit_density,
            fox_density,
            generations,
            rabbit_breeding,
            fox_breeding,
            fox_starvation,
            output,
        } => {
            let config = GeneratorConfig {
                ecosystem: EcosystemConfig {
                    rabbit_breeding,
                    fox_breeding,
                    fox_starvation,
                    generations,
                    rows,
                    cols,
                },
                seed,
                rock_density,
                rabbit_density,
                fox_density,
            };
            generate(&config, output)
        }
    }
}

fn run(
    path: Option<PathBuf>,
    run_config: RunConfig,
    show_generations: bool,
    timing: bool,
    format: Format,
) -> Result<()> {
    let text = read_input(path.as_ref())?;
    let scenario = input::parse_scenario(&text).context("Invalid scenario")?;
    let mut sim =
        Simulation::new(&scenario, run_config).context("Failed to set up the simulation")?;

    let started = Instant::now();
    let result = if show_generations {
        run_rendered(&mut sim)?
    } else {
        sim.run()
    };
    let elapsed = started.elapsed();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if timing {
        writeln!(out, "{}", output::format_timing(elapsed))?;
    }
    match format {
        Format::Text => out.write_all(output::format_result(&result).as_bytes())?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &result)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn run_rendered(sim: &mut Simulation) -> Result<SimulationResult> {
    let stderr = io::stderr();
    let mut err = stderr.lock();
    err.write_all(output::render_board(sim.grid(), sim.generation()).as_bytes())?;
    while !sim.is_finished() {
        sim.step();
        err.write_all(output::render_board(sim.grid(), sim.generation()).as_bytes())?;
    }
    Ok(sim.result())
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn generate(config: &GeneratorConfig, path: Option<PathBuf>) -> Result<()> {
    let scenario = generator::generate(config).context("Invalid generator settings")?;
    let text = input::write_scenario(&scenario);

    match path {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                path = %path.display(),
                objects = scenario.placements.len(),
                "Scenario written"
            );
        }
        None => io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}
