//! Embedding config tests.

use crate::{EmbeddingConfig, EmbeddingProvider, EnvEmbeddingConfig};
use serial_test::serial;
use std::env;

fn clear_env() {
    env::remove_var("EMBEDDING_PROVIDER");
    env::remove_var("TAKEOFF_CONSUMER_GROUP");
    env::remove_var("FAKE_EMBEDDING_SIZE");
}

#[test]
#[serial]
fn test_load_embedding_config_with_defaults() {
    clear_env();
    let config = EnvEmbeddingConfig::from_env().unwrap();
    assert_eq!(config.provider(), EmbeddingProvider::TitanTakeoff);
    assert!(config.consumer_group().is_none());
    assert_eq!(config.fake_dimension(), 768);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_load_embedding_config_with_custom_values() {
    clear_env();
    env::set_var("EMBEDDING_PROVIDER", "fake");
    env::set_var("TAKEOFF_CONSUMER_GROUP", "embed");
    env::set_var("FAKE_EMBEDDING_SIZE", "16");
    let config = EnvEmbeddingConfig::from_env().unwrap();
    assert_eq!(config.provider(), EmbeddingProvider::DeterministicFake);
    assert_eq!(config.consumer_group(), Some("embed"));
    assert_eq!(config.fake_dimension(), 16);
    clear_env();
}

#[test]
#[serial]
fn test_load_embedding_config_rejects_unknown_provider() {
    clear_env();
    env::set_var("EMBEDDING_PROVIDER", "zhipuai");
    assert!(EnvEmbeddingConfig::from_env().is_err());
    clear_env();
}

#[test]
fn test_validate_fake_dimension() {
    let config = EnvEmbeddingConfig {
        embedding_provider: EmbeddingProvider::DeterministicFake,
        consumer_group: None,
        fake_dimension: 0,
    };
    assert!(config.validate().is_err());
}
