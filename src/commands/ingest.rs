//! Ingest command - split files into chunks and store them with metadata

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;
use tracing::warn;

use pdf_vault::core::pdf::collect_documents;
use pdf_vault::{Config, DocumentStore, MetadataInput};

pub fn run(config: &Config, path: &Path, metadata: MetadataInput, json: bool) -> Result<()> {
    if !path.exists() {
        bail!("path not found: {}", path.display());
    }

    let files = collect_documents(path);
    if files.is_empty() {
        bail!("no .pdf, .txt or .md files found under {}", path.display());
    }

    let mut store = DocumentStore::open(config)?;
    let mut stored = Vec::new();
    let mut failed = Vec::new();

    for file in &files {
        match store.store_file(file, metadata.clone()) {
            Ok(chunks) => {
                if !json {
                    println!(
                        "{} {} ({} chunks)",
                        "✓".green(),
                        file.display(),
                        chunks.to_string().cyan()
                    );
                }
                stored.push((file.display().to_string(), chunks));
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "failed to ingest");
                if !json {
                    println!("{} {}: {}", "✗".red(), file.display(), e);
                }
                failed.push((file.display().to_string(), e.to_string()));
            }
        }
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "stored": stored
                    .iter()
                    .map(|(file, chunks)| serde_json::json!({ "file": file, "chunks": chunks }))
                    .collect::<Vec<_>>(),
                "failed": failed
                    .iter()
                    .map(|(file, error)| serde_json::json!({ "file": file, "error": error }))
                    .collect::<Vec<_>>(),
                "store_dir": config.store_dir().display().to_string(),
            }))?
        );
    } else {
        let total: usize = stored.iter().map(|(_, n)| n).sum();
        println!();
        println!(
            "{} Stored {} chunks from {} files",
            "→".dimmed(),
            total.to_string().cyan(),
            stored.len()
        );
        if !failed.is_empty() {
            println!("  {} {} files failed", "✗".red(), failed.len());
        }
    }

    if !failed.is_empty() && stored.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
