//! vaultmark: inspect and verify a notes vault from the command line

mod vault;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use vaultmark_config::Config;
use vaultmark_engine::{ConvertContext, Converter, Document, EntityRecord};

use crate::vault::Vault;

#[derive(Parser, Debug)]
#[command(name = "vaultmark")]
#[command(about = "Convert notes markup to document trees and back")]
#[command(version)]
#[command(after_help = "Examples:
  vaultmark --vault ~/notes parse journal/today.md     # Print the tree as JSON
  vaultmark --vault ~/notes parse today.md > t.json
  vaultmark --vault ~/notes serialize t.json           # Print markup for a tree
  vaultmark check                                      # Round trip every note in the configured vault
  vaultmark index                                      # Print the reference index")]
struct Cli {
    /// Vault directory (defaults to `vault_path` from the config file)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// More output; repeat for trace logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a note and print its document tree as JSON
    Parse {
        /// Markup file inside the vault
        file: PathBuf,
    },
    /// Serialize a JSON document tree back to markup
    Serialize {
        /// JSON file, or `-` for stdin
        input: PathBuf,
    },
    /// Check that every note in the vault survives parse and serialize unchanged
    Check {
        /// Number of parallel jobs (defaults to number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Print every indexed record as JSON
    Index,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::load().context("Failed to load config")?;
    let options = config.as_ref().map(Config::convert_options).unwrap_or_default();
    let vault_path = match (cli.vault, config) {
        (Some(path), _) => path,
        (None, Some(config)) => config.vault_path,
        (None, None) => anyhow::bail!(
            "No vault given. Pass --vault or set vault_path in {}",
            Config::config_path().display()
        ),
    };

    let vault = Vault::open(&vault_path)
        .with_context(|| format!("Failed to open vault {}", vault_path.display()))?;
    let converter = Converter::new(options).context("Failed to build converter")?;

    match cli.command {
        Command::Parse { file } => parse_file(&vault, &converter, &file),
        Command::Serialize { input } => serialize_tree(&vault, &converter, &input),
        Command::Check { jobs } => check_vault(&vault, &converter, jobs),
        Command::Index => print_index(&vault),
    }
}

fn parse_file(vault: &Vault, converter: &Converter, file: &Path) -> Result<()> {
    let relative = vault.relative(file)?;
    let markup = vault.read(&relative)?;
    let ctx = ConvertContext::new(&vault.id, &vault.index).with_document(&relative);
    let doc = converter
        .parse(&markup, &ctx)
        .with_context(|| format!("Failed to parse {relative}"))?;

    for node in doc.unresolved_references() {
        log::info!("{relative}: unresolved {}", node.type_name());
    }
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn serialize_tree(vault: &Vault, converter: &Converter, input: &Path) -> Result<()> {
    let json = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?
    };
    let doc: Document = serde_json::from_str(&json).context("Input is not a document tree")?;
    let ctx = ConvertContext::new(&vault.id, &vault.index);
    print!("{}", converter.serialize(&doc, &ctx));
    Ok(())
}

fn check_vault(vault: &Vault, converter: &Converter, jobs: Option<usize>) -> Result<()> {
    if vault.documents.is_empty() {
        eprintln!("No notes found in {}", vault.root.display());
        return Ok(());
    }

    if let Some(n) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let failures: Vec<_> = vault
        .documents
        .par_iter()
        .filter_map(|relative| {
            let result = vault.read(relative).map_err(anyhow::Error::from).and_then(|markup| {
                let ctx = ConvertContext::new(&vault.id, &vault.index).with_document(relative);
                let doc = converter.parse(&markup, &ctx)?;
                let written = converter.serialize(&doc, &ctx);
                if written != markup {
                    anyhow::bail!("serialized markup differs from source{}", first_difference(&markup, &written));
                }
                Ok(doc.unresolved_references().len())
            });
            match result {
                Ok(unresolved) => {
                    if unresolved > 0 {
                        log::info!("{relative}: {unresolved} unresolved references");
                    }
                    None
                }
                Err(e) => Some((relative, e)),
            }
        })
        .collect();

    for (file, e) in &failures {
        eprintln!("{file}: {e:#}");
    }
    eprintln!(
        "Checked {} notes, {} failed",
        vault.documents.len(),
        failures.len()
    );

    if !failures.is_empty() {
        anyhow::bail!("{} notes did not round trip", failures.len());
    }
    Ok(())
}

/// ` at line N` for the first line that differs, or nothing.
fn first_difference(a: &str, b: &str) -> String {
    let mut left = a.lines();
    let mut right = b.lines();
    let mut line = 1;
    loop {
        match (left.next(), right.next()) {
            (None, None) => return String::new(),
            (l, r) if l != r => return format!(" at line {line}"),
            _ => line += 1,
        }
    }
}

fn print_index(vault: &Vault) -> Result<()> {
    let mut records: Vec<&EntityRecord> = vault
        .index
        .vault(&vault.id)
        .map(|v| v.records().collect())
        .unwrap_or_default();
    records.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
