//! Search command - similarity search over stored chunks

use anyhow::Result;
use colored::Colorize;

use pdf_vault::{Config, DocumentStore};

use super::retrieve::print_chunk;

pub fn run(config: &Config, query: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let store = DocumentStore::open(config)?;
    let results = store.search(query, limit.unwrap_or(5))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("{} No results found for: {}", "→".dimmed(), query.cyan());
        return Ok(());
    }

    println!(
        "{} {} results for: {}",
        "→".dimmed(),
        results.len(),
        query.cyan()
    );
    println!();

    for (i, chunk) in results.iter().enumerate() {
        print_chunk(i + 1, chunk);
    }

    Ok(())
}
