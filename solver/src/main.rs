//! CLI driver: load a level pack, look the puzzle up in the registration
//! table, and run it.
//!
//! Usage:
//!   solver <PUZZLE> <LEVELS> [--output <path>]
//!   solver --list

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use astatine::puzzles::{castle_bailey, maze};
use astatine::{load_levels, LevelError, LevelSet};

type RunFn = fn(&LevelSet, &mut dyn Write) -> Result<(), LevelError>;

// Explicit registration table, built at startup and handed to the lookup;
// puzzle modules know nothing about it.
fn registry() -> Vec<(&'static str, RunFn)> {
    vec![
        ("maze", maze::solve as RunFn),
        ("maze-all", maze::solve_all as RunFn),
        ("castle-bailey", castle_bailey::solve as RunFn),
    ]
}

#[derive(Parser)]
#[command(name = "solver")]
#[command(about = "Solve grid logic puzzle level packs")]
#[command(version)]
struct Cli {
    /// Puzzle to run (see --list)
    puzzle: Option<String>,

    /// Path to the level pack JSON file
    levels: Option<PathBuf>,

    /// Write results to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List registered puzzles and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let registry = registry();

    if cli.list {
        for (name, _) in &registry {
            println!("{name}");
        }
        return Ok(());
    }

    let (Some(puzzle), Some(path)) = (cli.puzzle, cli.levels) else {
        bail!("expected <PUZZLE> <LEVELS>; use --list to see registered puzzles");
    };
    let run = registry
        .iter()
        .find(|(name, _)| *name == puzzle)
        .map(|&(_, f)| f)
        .with_context(|| format!("unknown puzzle {puzzle:?}"))?;

    let set = load_levels(&path).with_context(|| format!("cannot load {}", path.display()))?;
    info!("solving {} level(s) of {}", set.levels.len(), puzzle);

    match cli.output {
        Some(out_path) => {
            let file = File::create(&out_path)
                .with_context(|| format!("cannot create {}", out_path.display()))?;
            let mut out = BufWriter::new(file);
            run(&set, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            run(&set, &mut lock)?;
        }
    }
    Ok(())
}
