//! Retrieve command - chunks closest to a date, filtered by clearance

use anyhow::Result;
use colored::Colorize;

use pdf_vault::{Chunk, Clearance, Config, DocumentStore};

pub fn run(
    config: &Config,
    date: &str,
    clearance: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let store = DocumentStore::open(config)?;
    let mut results = store.retrieve_by_date(date, clearance)?;
    if let Some(limit) = limit {
        results.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("{} No chunks found near {}", "→".dimmed(), date.cyan());
        return Ok(());
    }

    let level = clearance.map(|c| Clearance::from_tag(c).to_string());
    println!(
        "{} {} chunks nearest {} (clearance: {})",
        "→".dimmed(),
        results.len(),
        date.cyan(),
        level.as_deref().unwrap_or("any")
    );
    println!();

    for (i, chunk) in results.iter().enumerate() {
        print_chunk(i + 1, chunk);
    }

    Ok(())
}

pub(crate) fn print_chunk(rank: usize, chunk: &Chunk) {
    let meta = &chunk.metadata;
    println!(
        "{}. {} [{}] {}",
        rank.to_string().bold(),
        meta.source.cyan(),
        meta.version_tag,
        security_label(&meta.security_tag)
    );
    println!("   {}", meta.date.dimmed());
    println!("   {}", preview(&chunk.content, 100).dimmed());
    println!();
}

fn security_label(tag: &str) -> colored::ColoredString {
    match Clearance::from_tag(tag) {
        Clearance::Public => tag.green(),
        Clearance::Confidential => tag.yellow(),
        Clearance::Restricted | Clearance::TopSecret => tag.red(),
    }
}

/// First `max_chars` characters on one line (char-aware for Unicode)
fn preview(content: &str, max_chars: usize) -> String {
    let flat: String = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max_chars {
        format!("{}...", flat.chars().take(max_chars).collect::<String>())
    } else {
        flat
    }
}
