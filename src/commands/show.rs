//! Show command - print the metadata record of an ingested document

use anyhow::Result;
use colored::Colorize;

use pdf_vault::{Config, DocumentStore};

pub fn run(config: &Config, document_id: &str, json: bool) -> Result<()> {
    let store = DocumentStore::open(config)?;

    let Some(record) = store.document(document_id) else {
        if json {
            println!(
                "{}",
                serde_json::json!({ "error": "Document not found", "document": document_id })
            );
        } else {
            println!("{}", format!("Document '{}' not found.", document_id).red());
        }
        std::process::exit(1);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("{}", document_id.bold());
        println!("  {} date:     {}", "→".dimmed(), record.date);
        println!("  {} version:  {}", "→".dimmed(), record.version_tag);
        println!("  {} security: {}", "→".dimmed(), record.security_tag);
    }

    Ok(())
}
