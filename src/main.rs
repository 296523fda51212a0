//! `explodeview`: drive an assembly viewing session from the command line.
//!
//! `list`, `show`, and `groups` print the read model for one assembly. `run`
//! replays a JSONL stream of viewer commands (one `{"op": ...}` object per
//! line), printing each resulting action as a JSON line and the final snapshot
//! at the end.


use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use assembly::catalog::{Catalog, CatalogError};
use assembly::command::Command as SessionCommand;
use assembly::group::build_groups;
use assembly::session::Session;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: invalid command: {source}")]
    BadCommand {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "explodeview", about = "Exploded-view assembly session CLI")]
struct Cli {
    /// Catalog file (.yaml, .yml, or .json). Uses the built-in catalog when absent.
    #[arg(long, env = "EXPLODEVIEW_CATALOG")]
    catalog: Option<PathBuf>,

    /// Assembly to activate first. Unknown ids fall back to the first assembly.
    #[arg(long, env = "EXPLODEVIEW_ASSEMBLY", default_value = "1")]
    assembly: String,

    /// Log at debug level.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the catalog's assemblies.
    List,
    /// Print the snapshot of the active assembly.
    Show {
        #[arg(long, default_value_t = 0.0)]
        explode: f64,
    },
    /// Print the sidebar rows of the active assembly.
    Groups,
    /// Replay JSONL commands against a session.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
    input: String,
}

#[derive(Debug, Serialize)]
struct AssemblySummary<'a> {
    id: &'a str,
    name: &'a str,
    parts: usize,
    groups: usize,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct RunStats {
    applied: usize,
    skipped: usize,
    actions: usize,
}

fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(error) = dotenv {
        tracing::debug!(%error, "no .env loaded");
    }

    let catalog = open_catalog(cli.catalog.as_deref())?;
    let mut session = Session::new(catalog);
    session.activate(&cli.assembly);

    match cli.command {
        Command::List => print_json(&summaries(session.catalog())),
        Command::Show { explode } => {
            session.set_explosion_factor(explode);
            print_json(&session.snapshot())
        }
        Command::Groups => print_json(&session.group_rows()),
        Command::Run(args) => {
            let mut reader = open_input(&args.input)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let stats = run_script(&mut session, &mut reader, &mut out)?;
            tracing::info!(applied = stats.applied, skipped = stats.skipped, actions = stats.actions, "run complete");
            print_json(&session.snapshot())
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).init();
}

fn open_catalog(path: Option<&Path>) -> Result<Catalog, CliError> {
    let catalog = match path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    tracing::debug!(assemblies = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn open_input(input: &str) -> Result<Box<dyn BufRead>, CliError> {
    if input == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(input).map_err(|source| CliError::Io { context: "open input", source })?;
    Ok(Box::new(BufReader::new(file)))
}

fn summaries(catalog: &Catalog) -> Vec<AssemblySummary<'_>> {
    catalog
        .assemblies()
        .iter()
        .map(|a| AssemblySummary { id: &a.id, name: &a.name, parts: a.parts.len(), groups: build_groups(a).len() })
        .collect()
}

/// Apply every command line from `reader`, writing each action to `out` as
/// one JSON line. Blank lines and `#` comments are skipped.
fn run_script(session: &mut Session, reader: &mut dyn BufRead, out: &mut dyn Write) -> Result<RunStats, CliError> {
    let mut stats = RunStats::default();
    let mut line = String::new();
    let mut line_no = 0_usize;
    loop {
        line.clear();
        let bytes = reader.read_line(&mut line).map_err(|source| CliError::Io { context: "read input", source })?;
        if bytes == 0 {
            break;
        }
        line_no += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            stats.skipped += 1;
            continue;
        }
        let command = serde_json::from_str::<SessionCommand>(trimmed)
            .map_err(|source| CliError::BadCommand { line: line_no, source })?;

        for action in session.apply(command) {
            let rendered = serde_json::to_string(&action)?;
            writeln!(out, "{rendered}").map_err(|source| CliError::Io { context: "write output", source })?;
            stats.actions += 1;
        }
        stats.applied += 1;
    }
    Ok(stats)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
