//! CLI layer: argument parsing, command dispatch, and subcommand implementations.

pub mod args;

pub use args::*;

use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::Path;

use ignore::WalkBuilder;
use regex::Regex;
use serde_json::json;
use tracing::debug;

use funcmock::{
    clean_path, find_call_sites, load_sources, needing_mocks, tokenize_source,
    CallCandidate, MockError, MockSet,
};
use funcmock::oracle::ScannedDefinitions;

// ─── CLI ─────────────────────────────────────────────────────────────

/// Token-based call-site detection and mock-function synthesis for PHP-style sources
#[derive(Parser, Debug)]
#[command(name = "funcmock", version, about, after_help = "\
Run 'funcmock <COMMAND> --help' for detailed options and examples.\n\
Common options: -d <DIR> (directory), -e <EXT> (extension filter), --json")]
pub(crate) struct Cli {
    /// Log verbosity: error, warn, info, debug, trace (or set RUST_LOG)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// List every free-function call site in the sources
    Scan(ScanArgs),

    /// Report the functions a test run would need mocks for
    Detect(DetectArgs),

    /// Render the forwarding shims for the needed mocks (diagnostic)
    Stubs(StubsArgs),
}

// ─── Main entry point ───────────────────────────────────────────────

pub fn run() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Scan(args) => cmd_scan(args),
        Commands::Detect(args) => cmd_detect(args),
        Commands::Stubs(args) => cmd_stubs(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// ─── Source collection ──────────────────────────────────────────────

/// Resolve the sources a command operates on: explicit file arguments as
/// given (order preserved — it is the load order), otherwise a directory
/// walk filtered by extension, sorted for determinism.
pub(crate) fn collect_sources(files: &[String], dir: &str, ext: &str) -> Vec<String> {
    if !files.is_empty() {
        return files.to_vec();
    }

    let extensions: Vec<String> = ext
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let mut found = Vec::new();
    let walker = WalkBuilder::new(dir).hidden(false).git_ignore(true).build();
    for entry in walker.flatten() {
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let ext_match = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)));
        if ext_match {
            found.push(clean_path(&path.to_string_lossy()));
        }
    }
    found.sort();
    debug!(files = found.len(), dir = %dir, "collected sources from walk");
    found
}

pub(crate) fn name_filter(pattern: Option<&str>) -> Result<Option<Regex>, MockError> {
    match pattern {
        None => Ok(None),
        Some(p) => Regex::new(p)
            .map(Some)
            .map_err(|source| MockError::InvalidFilter { pattern: p.to_string(), source }),
    }
}

pub(crate) fn ambient_names(ambient: Option<&str>) -> Vec<String> {
    ambient
        .map(|s| {
            s.split(',')
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Load + tokenize + classify + scan definitions, shared by all commands.
fn detect_pipeline(
    sources: &[String],
) -> Result<(Vec<CallCandidate>, ScannedDefinitions), MockError> {
    for path in sources {
        if !Path::new(path).exists() {
            return Err(MockError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("source file not found: {}", path),
            )));
        }
    }
    let combined = load_sources(sources)?;
    let tokens = tokenize_source(&combined);
    let candidates = find_call_sites(&tokens);
    let oracle = ScannedDefinitions::from_tokens(&tokens);
    Ok((candidates, oracle))
}

// ─── Commands ───────────────────────────────────────────────────────

fn cmd_scan(args: ScanArgs) -> Result<(), MockError> {
    let sources = collect_sources(&args.files, &args.dir, &args.ext);
    let filter = name_filter(args.filter.as_deref())?;
    let (candidates, _) = detect_pipeline(&sources)?;

    let matched: Vec<&CallCandidate> = candidates
        .iter()
        .filter(|c| filter.as_ref().is_none_or(|re| re.is_match(&c.name)))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matched).unwrap());
    } else {
        for c in &matched {
            println!("{}  (token {})", c.name, c.token_index);
        }
        eprintln!(
            "{} call site(s) across {} file(s)",
            matched.len(),
            sources.len()
        );
    }
    Ok(())
}

fn cmd_detect(args: DetectArgs) -> Result<(), MockError> {
    let sources = collect_sources(&args.files, &args.dir, &args.ext);
    let filter = name_filter(args.filter.as_deref())?;
    let (candidates, oracle) = detect_pipeline(&sources)?;
    let oracle = oracle.with_ambient(ambient_names(args.ambient.as_deref()));

    let needed: BTreeSet<String> = needing_mocks(&candidates, &oracle)
        .into_iter()
        .filter(|name| filter.as_ref().is_none_or(|re| re.is_match(name)))
        .collect();

    if args.json {
        let mut out = json!({ "needs_mock": needed });
        if args.defs {
            out["defined"] = json!(oracle.names());
        }
        println!("{}", serde_json::to_string_pretty(&out).unwrap());
    } else {
        if args.defs {
            for name in oracle.names() {
                println!("defined    {}", name);
            }
        }
        for name in &needed {
            println!("needs mock {}", name);
        }
        eprintln!(
            "{} function(s) need mocks across {} file(s)",
            needed.len(),
            sources.len()
        );
    }
    Ok(())
}

fn cmd_stubs(args: StubsArgs) -> Result<(), MockError> {
    let sources = collect_sources(&args.files, &args.dir, &args.ext);
    let (candidates, oracle) = detect_pipeline(&sources)?;
    let oracle = oracle.with_ambient(ambient_names(args.ambient.as_deref()));
    let needed = needing_mocks(&candidates, &oracle);

    let mut mocks = MockSet::new();
    mocks.synthesize(needed, &oracle);
    print!("{}", mocks.definition_text());
    eprintln!("{} shim(s) rendered", mocks.len());
    Ok(())
}
