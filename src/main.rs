//! bashdoc — generate cross-referenced documentation from annotated shell
//! scripts.
//!
//! Annotations are `@` tags on comment lines immediately preceding a
//! function or variable declaration. Two modes:
//!
//! - **stdin mode**: `bashdoc < lib.sh`
//! - **file mode**: `bashdoc -o docs/lib.md libraries/*.sh`
//!
//! All inputs of a run share one parser, so the variable cross-reference
//! tables span files.

mod diag;
mod model;
mod parser;
mod render;
mod toc;

use anyhow::{Context, Result};
use clap::Parser;
use diag::{Reporter, Verbosity};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "bashdoc",
    about = "Generate cross-referenced documentation from annotated shell scripts"
)]
struct Cli {
    /// Input files (glob patterns and directories supported). If omitted,
    /// reads from stdin.
    files: Vec<String>,

    /// Output file (defaults to stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Increase diagnostic verbosity (-v: info, -vv: debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable color in diagnostic output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let reporter = Reporter::new(Verbosity::resolve(cli.verbose), cli.no_color);
    let renderer = render::create_renderer(&cli.format)?;

    let mut parser = parser::Parser::new(&reporter);
    if cli.files.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        parser.parse("<stdin>", &input);
    } else {
        for path in expand_globs(&cli.files)? {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parser.parse(&path.to_string_lossy(), &content);
        }
    }

    let doc = match parser.finish() {
        Ok(doc) => doc,
        Err(errors) => {
            for error in &errors {
                reporter.report(error);
            }
            reporter.info(&format!(
                "{} fatal error(s), output suppressed",
                errors.len()
            ));
            std::process::exit(1);
        }
    };

    let output = renderer.render(&doc);
    match &cli.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{output}"),
    }
    Ok(())
}

/// File extensions recognized when scanning directories.
const SUPPORTED_EXTENSIONS: &[&str] = &["sh", "bash", "bats"];

/// Expand glob patterns into a list of real file paths. Bare directory
/// paths are scanned (non-recursively) for supported file types. Results
/// are sorted and deduplicated for deterministic multi-file runs.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}
