//! Constant multiplier generator binary.

use clap::{Parser, Subcommand, ValueEnum};
use constmul::batch::{write_batch, DEFAULT_OUTPUT_DIR};
use constmul::core::{BitContext, GenResult};
use constmul::emit::ModuleKind;
use constmul::netlist::CrossCheck;
use constmul::search::{generate, PlacementTable};
use std::path::PathBuf;
use std::process::ExitCode;

/// Multiplierless constant multipliers from minimum-adder decompositions
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Constant width in bits
    #[arg(short, long, default_value_t = 8, global = true)]
    bits: u32,

    /// Operand width in bits
    #[arg(short, long, default_value_t = 16, global = true)]
    width: u32,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every decomposition found by the search
    Table,

    /// Print the decomposed multiplier for one constant
    Mul {
        #[arg(allow_hyphen_values = true)]
        constant: i64,
    },

    /// Print the decomposed multiply-accumulate module for one constant
    Macc {
        #[arg(allow_hyphen_values = true)]
        constant: i64,
    },

    /// Print the behavioral reference multiplier for one constant
    Spec {
        #[arg(allow_hyphen_values = true)]
        constant: i64,
    },

    /// Write one file per constant in range
    Batch {
        /// Module flavour to write
        #[arg(short, long, value_enum, default_value_t = Kind::Macc)]
        kind: Kind,

        /// Output directory
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        out: PathBuf,
    },

    /// Cross-check decomposed modules against the reference for every constant
    Verify,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Mul,
    Macc,
    Spec,
}

impl From<Kind> for ModuleKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Mul => ModuleKind::Multiplier,
            Kind::Macc => ModuleKind::Macc,
            Kind::Spec => ModuleKind::Reference,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> GenResult<ExitCode> {
    let ctx = BitContext::new(cli.bits, cli.width)?;

    match &cli.command {
        Commands::Table => {
            let table = generate(ctx);
            for discovery in table.discoveries() {
                println!("[{}] {}", discovery.round, discovery);
            }
            for value in table.unreachable() {
                println!("unreachable: {}", value);
            }
            print!("{}", table.stats());
        }
        Commands::Mul { constant } => print_module(ctx, ModuleKind::Multiplier, *constant)?,
        Commands::Macc { constant } => print_module(ctx, ModuleKind::Macc, *constant)?,
        Commands::Spec { constant } => print_module(ctx, ModuleKind::Reference, *constant)?,
        Commands::Batch { kind, out } => {
            let table = generate(ctx);
            let written = write_batch(out, (*kind).into(), &table)?;
            println!("Wrote {} files to {}", written, out.display());
        }
        Commands::Verify => {
            let table = generate(ctx);
            let report = CrossCheck::new(&table).run()?;
            print!("{}", report);
            if !report.is_ok() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_module(ctx: BitContext, kind: ModuleKind, constant: i64) -> GenResult<()> {
    let n = ctx.check_constant(constant)?;
    let table: PlacementTable = generate(ctx);
    let mut text = String::new();
    kind.emit(&table, n, &mut text)?;
    print!("{}", text);
    Ok(())
}
