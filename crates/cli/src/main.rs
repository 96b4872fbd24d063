//! CLI tool for extracting election candidates from an XLSX workbook.

use anyhow::{Context, Result};
use ballot_core::{to_json, write_json, Ballot, ColumnLayout, DirectorySink, TitleOverrides};
use ballot_xlsx::{ExtractOptions, Extractor};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Extract candidate names, statements and headshots from an election workbook.
#[derive(Parser, Debug)]
#[command(name = "ballot-extract")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input workbook (.xlsx)
    input: PathBuf,

    /// Where to write the candidates JSON
    #[arg(short, long, default_value = "assets/data/candidates.json")]
    output: PathBuf,

    /// Directory for extracted headshot images
    #[arg(long, default_value = "assets/headshots")]
    headshots: PathBuf,

    /// Record headshot paths relative to this directory
    #[arg(long, default_value = ".")]
    relative_to: PathBuf,

    /// Override a position title: SHEET=TITLE (repeatable)
    #[arg(short, long = "title", value_name = "SHEET=TITLE")]
    titles: Vec<String>,

    /// JSON file mapping sheet names to position titles
    #[arg(long, value_name = "FILE")]
    titles_file: Option<PathBuf>,

    /// Do not apply the built-in fixes for truncated sheet names
    #[arg(long)]
    no_default_titles: bool,

    /// Column holding candidate names
    #[arg(long, default_value = "A")]
    name_column: String,

    /// Column holding candidate statements
    #[arg(long, default_value = "C")]
    statement_column: String,

    /// Print the JSON to stdout instead of writing it to --output
    #[arg(short, long)]
    print: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if !args.input.is_file() {
        anyhow::bail!("Missing spreadsheet at {}", args.input.display());
    }

    let options = build_options(&args)?;
    let mut sink = DirectorySink::new(&args.headshots).with_relative_to(&args.relative_to);
    std::fs::create_dir_all(&args.headshots).with_context(|| {
        format!(
            "Failed to create headshot directory: {}",
            args.headshots.display()
        )
    })?;

    if args.verbose {
        eprintln!("Processing: {}", args.input.display());
    }

    let ballot = Extractor::new(options)
        .extract_file(&args.input, &mut sink)
        .with_context(|| format!("Failed to extract {}", args.input.display()))?;

    if args.verbose {
        eprintln!(
            "  Found {} positions, {} candidates",
            ballot.positions.len(),
            ballot.candidate_count()
        );
    }

    emit(&args, &ballot, &mut std::io::stdout().lock())
}

/// Write the result. With `--print`, stdout carries only the JSON document.
fn emit(args: &Args, ballot: &Ballot, out: &mut impl Write) -> Result<()> {
    if args.print {
        write!(out, "{}", to_json(ballot)?)?;
        eprintln!("Extracted headshots to {}", args.headshots.display());
    } else {
        write_json(&args.output, ballot)
            .with_context(|| format!("Failed to write {}", args.output.display()))?;
        writeln!(out, "Wrote {}", args.output.display())?;
        writeln!(out, "Extracted headshots to {}", args.headshots.display())?;
    }
    out.flush()?;
    Ok(())
}

/// Assemble extraction options from the command line.
fn build_options(args: &Args) -> Result<ExtractOptions> {
    let mut titles = if args.no_default_titles {
        TitleOverrides::new()
    } else {
        TitleOverrides::builtin()
    };

    if let Some(path) = &args.titles_file {
        titles.extend(load_titles_file(path)?);
    }
    for assignment in &args.titles {
        let (sheet, title) = TitleOverrides::parse_assignment(assignment)?;
        titles.insert(sheet, title);
    }
    log::debug!("Using {} title overrides", titles.len());

    let columns = ColumnLayout::new()
        .with_name_column(&args.name_column)?
        .with_statement_column(&args.statement_column)?;

    Ok(ExtractOptions::new()
        .with_titles(titles)
        .with_columns(columns))
}

fn load_titles_file(path: &Path) -> Result<TitleOverrides> {
    TitleOverrides::from_json_file(path)
        .with_context(|| format!("Failed to read title overrides from {}", path.display()))
}
