mod render;

use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xmlpath_core::{CompileOptions, DEFAULT_MAX_DEPTH, compile_with};

const LOG_ENV: &str = "XMLPATH_LOG";

#[derive(Parser)]
#[command(name = "xmlpath")]
#[command(version)]
#[command(about = "Compile XML path expressions and print their steps", long_about = None)]
struct Cli {
    /// Path expressions to compile (one per line from stdin if omitted)
    paths: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Maximum nesting of paths inside predicates
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Log filter, e.g. `debug` (defaults to $XMLPATH_LOG, then `warn`)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Fully expanded path syntax
    Text,
    /// Indented step and predicate tree
    Tree,
    /// JSON
    Json,
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    // A subscriber may already be installed; the first one wins.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn read_paths(args: Vec<String>) -> Result<Vec<String>, String> {
    if !args.is_empty() {
        return Ok(args);
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("error reading stdin: {e}"))?;
    Ok(buffer
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

/// Compile every path, returning whether all of them compiled
fn run(cli: Cli) -> Result<bool, String> {
    let options = CompileOptions::default().with_max_depth(cli.max_depth);
    let paths = read_paths(cli.paths)?;
    if paths.is_empty() {
        return Err("no path expressions given\n\nFor more information, try '--help'".to_string());
    }
    info!(count = paths.len(), "compiling paths");

    let mut all_ok = true;
    for source in &paths {
        match compile_with(source, &options) {
            Ok(path) => {
                let output = match cli.format {
                    Format::Text => path.to_string(),
                    Format::Tree => render::tree(&path).to_string(),
                    Format::Json => serde_json::to_string_pretty(&path)
                        .map_err(|e| format!("error serializing output: {e}"))?,
                };
                println!("{output}");
            }
            Err(e) => {
                all_ok = false;
                eprintln!("xmlpath: {}", e.pointer());
            }
        }
    }
    Ok(all_ok)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("xmlpath: {e}");
            ExitCode::FAILURE
        }
    }
}
