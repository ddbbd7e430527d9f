//! Status command - summary of the document store

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use pdf_vault::{Config, DocumentStore};

#[derive(Serialize)]
struct StoreStatus {
    store_dir: String,
    chunk_count: usize,
    document_count: usize,
    last_indexed: Option<String>,
    documents: Vec<DocumentLine>,
}

#[derive(Serialize)]
struct DocumentLine {
    id: String,
    date: String,
    version_tag: String,
    security_tag: String,
}

pub fn run(config: &Config, json: bool) -> Result<()> {
    let store = DocumentStore::open(config)?;
    let stats = store.stats()?;

    let status = StoreStatus {
        store_dir: config.store_dir().display().to_string(),
        chunk_count: stats.chunk_count,
        document_count: stats.document_count,
        last_indexed: stats.last_indexed.and_then(|ts| {
            chrono::DateTime::from_timestamp(ts, 0).map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        }),
        documents: store
            .documents()
            .iter()
            .map(|(id, record)| DocumentLine {
                id: id.clone(),
                date: record.date.clone(),
                version_tag: record.version_tag.clone(),
                security_tag: record.security_tag.clone(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Store Status".bold());
    println!();
    println!("  {} Location: {}", "→".dimmed(), status.store_dir);
    println!(
        "  {} {} documents, {} chunks",
        "→".dimmed(),
        status.document_count.to_string().cyan(),
        status.chunk_count.to_string().cyan()
    );
    println!(
        "  {} Last indexed: {}",
        "→".dimmed(),
        status.last_indexed.as_deref().unwrap_or("never")
    );

    if !status.documents.is_empty() {
        println!();
        for doc in &status.documents {
            println!(
                "   {:<32} {:<28} {:<8} {}",
                doc.id, doc.date, doc.version_tag, doc.security_tag
            );
        }
    }

    Ok(())
}
