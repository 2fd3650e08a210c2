//! Configuration file loading and validation

use tempfile::TempDir;
use winston::config::Config;
use winston::retrieval::{RetrievalService, ScoringStrategy};
use winston::WinstonError;

const CLIENT_CONFIG: &str = r#"
[_meta]
schema_version = "1.0.0"

[corpus]
data_dir = "/srv/winston/kb"

[retrieval]
default_kb = "acme"
top_k = 3
top_n = 2

[[knowledge_bases]]
id = "acme"
title = "Acme Studio"
strategy = "boosted"

[[knowledge_bases]]
id = "acme-docs"
"#;

#[test]
fn test_load_client_config() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, CLIENT_CONFIG).unwrap();

    let config = Config::load(&path).expect("config should load");
    let registry = config.registry();

    assert_eq!(registry.ids(), vec!["acme", "acme-docs"]);
    assert_eq!(registry.default_id(), "acme");

    let docs = registry.resolve(Some("ACME-DOCS")).unwrap();
    assert_eq!(docs.title, "ACME-DOCS");
    assert_eq!(docs.strategy, ScoringStrategy::NormalizedThreshold);

    let acme = registry.resolve(None).unwrap();
    assert_eq!(acme.title, "Acme Studio");
    assert_eq!(acme.strategy, ScoringStrategy::Boosted);

    println!("✓ Loaded {} knowledge bases", registry.entries().len());
}

#[test]
fn test_service_uses_configured_limits() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, CLIENT_CONFIG).unwrap();

    let config = Config::load(&path).unwrap();
    let service = RetrievalService::from_config(&config);

    assert_eq!(service.default_top_k(), 3);
    assert_eq!(service.default_top_n(), 2);
    assert!(matches!(
        service.resolve("werule"),
        Err(WinstonError::UnknownKnowledgeBase { .. })
    ));
}

#[test]
fn test_default_kb_must_be_registered() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        CLIENT_CONFIG.replace("default_kb = \"acme\"", "default_kb = \"globex\""),
    )
    .unwrap();

    match Config::load(&path) {
        Err(WinstonError::ConfigValidation { errors }) => {
            assert!(errors.iter().any(|e| e.path == "retrieval.default_kb"));
        }
        other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.toml");

    assert!(matches!(
        Config::load(&path),
        Err(WinstonError::ConfigNotFound { .. })
    ));
}

#[test]
fn test_save_then_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");

    let mut config = Config::default();
    config.retrieval.top_k = 8;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.retrieval.top_k, 8);
    assert_eq!(loaded.knowledge_bases.len(), config.knowledge_bases.len());
}
