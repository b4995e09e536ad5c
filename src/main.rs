//! # Quire CLI
//!
//! Usage:
//!   quire puzzle.json -o puzzle.pdf
//!   echo '{ ... }' | quire --mode solution -o answers.pdf
//!   quire --example > puzzle.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use quire::puzzle::file::{example_json, PuzzleFile};
use quire::render::RenderMode;

#[derive(Parser, Debug)]
#[command(name = "quire", version, about = "Lay out a word puzzle as a PDF")]
struct Cli {
    /// Puzzle JSON file (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Where to write the PDF
    #[arg(short, long, value_name = "FILE", default_value = "puzzle.pdf")]
    output: PathBuf,

    /// Print answers or leave them blank (overrides the file)
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Stop after this many pages (overrides the file)
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Number of clue columns (overrides the file)
    #[arg(long, value_name = "N")]
    columns: Option<usize>,

    /// Print an example puzzle file and exit
    #[arg(long)]
    example: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Puzzle,
    Solution,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Puzzle => RenderMode::Puzzle,
            ModeArg::Solution => RenderMode::Solution,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.example {
        print!("{}", example_json());
        return Ok(());
    }

    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let mut file = PuzzleFile::from_json(&input)?;
    if let Some(mode) = cli.mode {
        file.options.mode = mode.into();
    }
    if let Some(limit) = cli.max_pages {
        file.page.max_pages = Some(limit);
    }
    if let Some(columns) = cli.columns {
        file.options.clue_columns = columns;
    }

    let rendered = quire::render(&file)?;
    for warning in &rendered.warnings {
        tracing::warn!(%warning, "layout warning");
    }
    fs::write(&cli.output, &rendered.pdf)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    eprintln!(
        "Wrote {} page(s), {} bytes to {}",
        rendered.pages,
        rendered.pdf.len(),
        cli.output.display()
    );
    Ok(())
}
