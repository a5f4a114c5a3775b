use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ecalab::export::ExportConfig;
use ecalab::{Program, RunConfig, Runner};

/// Elementary cellular automata laboratory.
#[derive(Parser)]
#[command(name = "ecalab", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Evolve automata and save their space-time diagrams.
    Ace {
        #[command(flatten)]
        common: Common,
        /// Also write each diagram as a GIF.
        #[arg(long)]
        gif: bool,
        /// Pixels per cell in GIF output.
        #[arg(long, default_value_t = 1)]
        scale: u32,
    },
    /// Damage spreading between an automaton and a one-cell perturbation.
    Hamming {
        #[command(flatten)]
        common: Common,
    },
    /// Visit every initial state and tally the states reached at each step.
    Attractor {
        #[command(flatten)]
        common: Common,
    },
    /// Unreached fraction and entropy of the last step over a range of cell counts.
    Entropy {
        #[command(flatten)]
        common: Common,
    },
}

#[derive(Args)]
struct Common {
    /// Options as option:value, e.g. reglas:30,90,100-110 pasos:200 celdas:400.
    options: Vec<String>,

    /// Directory receiving the generated files.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Seed for random initialization.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let (program, common, gif, scale) = match cli.command {
        Command::Ace { common, gif, scale } => (Program::Automaton, common, gif, scale),
        Command::Hamming { common } => (Program::Hamming, common, false, 1),
        Command::Attractor { common } => (Program::Attractor, common, false, 1),
        Command::Entropy { common } => (Program::Irreversibility, common, false, 1),
    };

    let mut config = RunConfig::new(program);
    config.apply_options(&common.options);
    config.validate();

    let export = ExportConfig {
        output_dir: common.output_dir,
        cell_scale: scale,
    };
    let mut rng = match common.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let report = Runner::new(&config, &export).with_gif(gif).run(&mut rng)?;

    for (rule, exponent) in &report.exponents {
        match exponent {
            Some(a) => println!("{rule}: Hamming exponent {a:.5}"),
            None => println!("{rule}: Hamming exponent not computable"),
        }
    }
    log::info!(
        "{} files written, {} rule(s) failed",
        report.written.len(),
        report.failures
    );
    if report.failures > 0 {
        anyhow::bail!("{} rule(s) failed", report.failures);
    }
    Ok(())
}
