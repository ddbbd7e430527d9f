//! End-to-end tests against an on-disk store

use std::fs;

use pdf_vault::core::splitter::{SplitterConfig, TextSplitter};
use pdf_vault::{Clearance, Config, DocumentStore, MetadataInput, StoreError};
use tempfile::TempDir;

fn metadata(date: &str, version: &str, security: &str) -> MetadataInput {
    MetadataInput {
        date: Some(date.to_string()),
        version_tag: Some(version.to_string()),
        security_tag: Some(security.to_string()),
    }
}

fn one(text: &str) -> Vec<String> {
    vec![text.to_string()]
}

#[test]
fn open_creates_store_directory() {
    let tmp = TempDir::new().unwrap();
    let config = Config::new(tmp.path().join("nested/store"));

    let store = DocumentStore::open(&config).unwrap();
    assert!(config.store_dir().is_dir());
    assert!(config.index_path().exists());
    // no snapshot until the first write
    assert!(!config.metadata_path().exists());
    assert_eq!(store.stats().unwrap().chunk_count, 0);
}

#[test]
fn state_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let config = Config::new(tmp.path());

    {
        let mut store = DocumentStore::open(&config).unwrap();
        store
            .store("plan.pdf", one("quarterly plan"), metadata("2023-01-05", "v1.0", "Confidential"))
            .unwrap();
    }
    assert!(config.metadata_path().exists());

    let store = DocumentStore::open(&config).unwrap();
    let record = store.document("plan.pdf").unwrap();
    assert_eq!(record.date, "2023-01-05");
    assert_eq!(record.security_tag, "Confidential");

    let results = store.retrieve_by_date("2023-01-06", Some("Confidential")).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, "quarterly plan");
    assert_eq!(results[0].metadata.source, "plan.pdf");
}

#[test]
fn ranking_across_documents() {
    let tmp = TempDir::new().unwrap();
    let mut store = DocumentStore::open(&Config::new(tmp.path())).unwrap();

    store.store("jan01.pdf", one("a"), metadata("2023-01-01", "v1.0", "Public")).unwrap();
    store.store("jan10.pdf", one("b"), metadata("2023-01-10", "v1.0", "Public")).unwrap();
    store.store("jan05.pdf", one("c"), metadata("2023-01-05", "v1.0", "Public")).unwrap();
    store.store("jan07.pdf", one("d"), metadata("2023-01-07", "v0.9", "Public")).unwrap();

    let results = store.retrieve_by_date("2023-01-06", None).unwrap();
    let sources: Vec<&str> = results.iter().map(|c| c.metadata.source.as_str()).collect();
    assert_eq!(sources, vec!["jan07.pdf", "jan05.pdf", "jan10.pdf", "jan01.pdf"]);

    let again = store.retrieve_by_date("2023-01-06", None).unwrap();
    assert_eq!(results, again);
}

#[test]
fn clearance_matrix() {
    let tmp = TempDir::new().unwrap();
    let mut store = DocumentStore::open(&Config::new(tmp.path())).unwrap();

    for level in Clearance::ALL {
        store
            .store(level.as_str(), one(level.as_str()), metadata("2023-01-01", "v1.0", level.as_str()))
            .unwrap();
    }

    for requester in Clearance::ALL {
        let results = store
            .retrieve_by_date("2023-01-01", Some(requester.as_str()))
            .unwrap();
        let mut visible: Vec<Clearance> = results
            .iter()
            .map(|c| Clearance::from_tag(&c.metadata.security_tag))
            .collect();
        visible.sort();

        let expected: Vec<Clearance> = Clearance::ALL
            .into_iter()
            .filter(|doc| doc.ordinal() <= requester.ordinal())
            .collect();
        assert_eq!(visible, expected, "requester {requester}");
    }
}

#[test]
fn invalid_date_and_empty_input() {
    let tmp = TempDir::new().unwrap();
    let config = Config::new(tmp.path());
    let mut store = DocumentStore::open(&config).unwrap();

    let err = store.retrieve_by_date("06/01/2023", None).unwrap_err();
    assert!(matches!(err, StoreError::InvalidDate(_)));

    let err = store
        .store("empty.pdf", Vec::new(), MetadataInput::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
    assert!(store.document("empty.pdf").is_none());
    assert!(!config.metadata_path().exists());
}

#[test]
fn store_text_file() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("minutes.txt");
    let text = "Budget approved for the next quarter.\n\n".repeat(10);
    fs::write(&source, &text).unwrap();

    let splitter = TextSplitter::new(SplitterConfig {
        chunk_size: 100,
        chunk_overlap: 0,
    });
    let mut store = DocumentStore::open(&Config::new(tmp.path().join("store")))
        .unwrap()
        .with_splitter(splitter);

    let chunks = store
        .store_file(&source, metadata("2024-02-01", "v3.0", "Restricted"))
        .unwrap();
    assert!(chunks > 1);
    assert_eq!(store.stats().unwrap().chunk_count, chunks);

    let record = store.document("minutes.txt").unwrap();
    assert_eq!(record.version_tag, "v3.0");

    let hidden = store.retrieve_by_date("2024-02-01", Some("Public")).unwrap();
    assert!(hidden.is_empty());
    let visible = store.retrieve_by_date("2024-02-01", Some("Top Secret")).unwrap();
    assert_eq!(visible.len(), chunks);
    assert!(visible.iter().all(|c| c.metadata.source == "minutes.txt"));
}
