use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use crate::ast;

/// astkit: inspect and convert `s(:type, ...)` syntax trees
#[derive(Parser, Debug)]
#[command(name = "astkit", version)]
#[command(about = "Read a syntax tree in s-expression notation and render it", long_about = None)]
pub struct Cli {
    /// Log filter directive for stderr (falls back to RUST_LOG, then "info")
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Disable ANSI colors in log output
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,

    /// Also write DEBUG-level logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a tree and print it in the requested format
    Render {
        /// Input file; standard input when omitted or "-"
        file: Option<PathBuf>,

        #[arg(long, short, value_enum, default_value_t = Format::Sexp)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `(type child ...)`
    Sexp,
    /// `s(:type, child, ...)`
    Inspect,
    /// Structural array as JSON
    Json,
}

impl Cli {
    /// Parse CLI arguments from the environment
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

/// Parses `source` and renders the tree in `format`.
pub fn render(source: &str, format: Format) -> anyhow::Result<String> {
    let tree = ast::read(source).context("failed to read tree")?;
    debug!(node_type = %tree.node_type(), ?format, "rendering tree");
    Ok(match format {
        Format::Sexp => tree.to_sexp(),
        Format::Inspect => tree.inspect(),
        Format::Json => serde_json::to_string_pretty(&tree)?,
    })
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path.display()))
        }
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source).context("failed to read standard input")?;
            Ok(source)
        }
    }
}

/// Executes a parsed command line, returning the text to print.
pub fn run(cli: &Cli) -> anyhow::Result<String> {
    match &cli.command {
        Command::Render { file, format } => {
            let source = read_input(file.as_ref())?;
            info!(bytes = source.len(), "read input");
            render(&source, *format)
        }
    }
}
