//! gasket CLI
//!
//! Command-line interface for the Sierpinski gasket generators.
//!
//! Usage:
//!   gasket chaos [--points <n>] [--seed <s>] [--mode <all|final>] [--snapshots <k>]
//!   gasket ifs8 [--generation <g>] [--mode <all|final>] [--name-base <stem>]
//!   gasket info [--generations <g>]
//!
//! Shared options: --format <png|tif|svg> --size <px> --dpi <dpi> --out-dir <dir>
//! --config <file.toml>. Set RUST_LOG=debug for engine diagnostics.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use gasket_core::config::{GasketConfig, OutputFormat, SaveMode};
use gasket_core::generators::{chaos, subdivision};
use gasket_core::pipeline::{self, WrittenFrame};

/// gasket: chaos game and 8-map subdivision on the equilateral triangle
#[derive(Parser)]
#[command(name = "gasket")]
#[command(version)]
#[command(about = "Sierpinski gasket generators with reverse reconstruction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chaos game: forward points and their reconstructed predecessors
    Chaos {
        /// Number of points to generate
        #[arg(short = 'n', long)]
        points: Option<usize>,

        /// Random seed (omit for a non-reproducible run)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Save every snapshot or only the final frame
        #[arg(short, long, value_enum)]
        mode: Option<SaveMode>,

        /// Snapshot count k (frames 0..=k in all mode)
        #[arg(short = 'k', long)]
        snapshots: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// 8-map IFS: recursive subdivision with the central inverted cell removed
    Ifs8 {
        /// Final generation
        #[arg(short, long)]
        generation: Option<usize>,

        /// Save every generation or only the final one
        #[arg(short, long, value_enum)]
        mode: Option<SaveMode>,

        /// File name stem for frames
        #[arg(long)]
        name_base: Option<String>,

        /// Accept generations above the configured limit
        #[arg(long)]
        allow_deep: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show fractal dimensions and subdivision growth
    Info {
        /// Last generation listed
        #[arg(short, long, default_value = "8")]
        generations: usize,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Image size (256, 512, 1024, 2048 or 4096)
    #[arg(long)]
    size: Option<u32>,

    /// Resolution; raster frames are size * dpi / 100 pixels wide
    #[arg(long)]
    dpi: Option<u32>,

    /// Directory for written frames
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// TOML file with defaults for any option
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl OutputArgs {
    /// Load the config file (if any) and apply shared overrides
    fn resolve(&self) -> Result<GasketConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => GasketConfig::load(path)?,
            None => GasketConfig::default(),
        };
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(size) = self.size {
            config.output.image_size = size;
        }
        if let Some(out_dir) = &self.out_dir {
            config.output.out_dir = out_dir.clone();
        }
        Ok(config)
    }
}

// ============================================================================
// Commands Implementation
// ============================================================================

fn report(frames: &[WrittenFrame]) {
    for frame in frames {
        println!("Saved: {} ({} elements)", frame.path.display(), frame.elements);
    }
}

fn cmd_chaos(
    points: Option<usize>,
    seed: Option<u64>,
    mode: Option<SaveMode>,
    snapshots: Option<usize>,
    output: OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("gasket chaos game");
    println!("=================");

    let mut config = output.resolve()?;
    if let Some(points) = points {
        config.chaos.n_points = points;
    }
    if seed.is_some() {
        config.chaos.seed = seed;
    }
    if let Some(mode) = mode {
        config.chaos.save_mode = mode;
    }
    if let Some(snapshots) = snapshots {
        config.chaos.snapshot_count = snapshots;
    }
    if let Some(dpi) = output.dpi {
        config.chaos.dpi = dpi;
    }

    println!("Points: {}", config.chaos.n_points);
    println!("Mode: {}", config.chaos.save_mode);
    match config.chaos.seed {
        Some(seed) => println!("Seed: {}", seed),
        None => println!("Seed: random"),
    }

    let start = Instant::now();
    let frames = pipeline::chaos_from_config(&config)?;
    report(&frames);

    println!("Time: {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);
    println!(
        "Theoretical fractal dimension (log 3 / log 2): {:.5}",
        chaos::similarity_dimension()
    );
    Ok(())
}

fn cmd_ifs8(
    generation: Option<usize>,
    mode: Option<SaveMode>,
    name_base: Option<String>,
    allow_deep: bool,
    output: OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("gasket 8-map IFS");
    println!("================");

    let mut config = output.resolve()?;
    if let Some(generation) = generation {
        config.ifs8.max_generation = generation;
    }
    if let Some(mode) = mode {
        config.ifs8.save_mode = mode;
    }
    if let Some(name_base) = name_base {
        config.ifs8.name_base = name_base;
    }
    if let Some(dpi) = output.dpi {
        config.ifs8.dpi = dpi;
    }
    config.ifs8.allow_deep |= allow_deep;

    if config.ifs8.allow_deep && config.ifs8.max_generation > config.ifs8.generation_limit {
        log::warn!(
            "generation {} is above the limit of {}; memory use grows as 8^g",
            config.ifs8.max_generation,
            config.ifs8.generation_limit
        );
    }

    println!("Generation: {}", config.ifs8.max_generation);
    println!("Mode: {}", config.ifs8.save_mode);

    let start = Instant::now();
    let frames = pipeline::subdivision_from_config(&config)?;
    report(&frames);

    println!("Time: {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);
    println!(
        "Theoretical fractal dimension (log 8 / log 3): {:.5}",
        subdivision::similarity_dimension()
    );
    Ok(())
}

fn cmd_info(generations: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("gasket Information");
    println!("==================");
    println!("Chaos game dimension (log 3 / log 2): {:.5}", chaos::similarity_dimension());
    println!("8-map IFS dimension (log 8 / log 3):  {:.5}", subdivision::similarity_dimension());
    println!();
    println!("{:>4}  {:>22}  {:>12}", "gen", "triangles", "area kept");

    for g in 0..=generations {
        let count = subdivision::triangle_count(g)
            .map_or_else(|| "overflow".to_string(), |n| n.to_string());
        println!(
            "{:>4}  {:>22}  {:>11.4}%",
            g,
            count,
            subdivision::retained_area_fraction(g) * 100.0
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chaos { points, seed, mode, snapshots, output } => {
            cmd_chaos(points, seed, mode, snapshots, output)
        }
        Commands::Ifs8 { generation, mode, name_base, allow_deep, output } => {
            cmd_ifs8(generation, mode, name_base, allow_deep, output)
        }
        Commands::Info { generations } => {
            cmd_info(generations)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
