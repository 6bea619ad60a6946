//! Environment overrides for resolver settings

use phonetica_common::config::{TomlConfig, DEFAULT_REMOTE_ENDPOINT};
use phonetica_resolver::config::{ResolverSettings, CACHE_MAX_ENTRIES_ENV, ENDPOINTS_ENV};
use serial_test::serial;
use std::env;

fn clear_env() {
    env::remove_var(ENDPOINTS_ENV);
    env::remove_var(CACHE_MAX_ENTRIES_ENV);
}

#[test]
#[serial]
fn test_defaults_without_env() {
    clear_env();

    let settings = ResolverSettings::resolve(&TomlConfig::default());

    assert_eq!(settings.endpoints, vec![DEFAULT_REMOTE_ENDPOINT.to_string()]);
    assert_eq!(settings.cache_max_entries, 1000);
    assert!(settings.persist_cache);
}

#[test]
#[serial]
fn test_env_endpoints_override_toml() {
    clear_env();
    env::set_var(ENDPOINTS_ENV, "http://a.test/, http://b.test/{word}");

    let mut config = TomlConfig::default();
    config.remote.endpoints = vec!["http://toml.test/".to_string()];
    let settings = ResolverSettings::resolve(&config);

    assert_eq!(
        settings.endpoints,
        vec!["http://a.test/".to_string(), "http://b.test/{word}".to_string()]
    );

    clear_env();
}

#[test]
#[serial]
fn test_blank_env_endpoints_fall_back_to_toml() {
    clear_env();
    env::set_var(ENDPOINTS_ENV, " , ");

    let mut config = TomlConfig::default();
    config.remote.endpoints = vec!["http://toml.test/".to_string()];
    let settings = ResolverSettings::resolve(&config);

    assert_eq!(settings.endpoints, vec!["http://toml.test/".to_string()]);

    clear_env();
}

#[test]
#[serial]
fn test_env_cache_size() {
    clear_env();
    env::set_var(CACHE_MAX_ENTRIES_ENV, "250");
    assert_eq!(ResolverSettings::resolve(&TomlConfig::default()).cache_max_entries, 250);

    env::set_var(CACHE_MAX_ENTRIES_ENV, "lots");
    let mut config = TomlConfig::default();
    config.cache.max_entries = 42;
    assert_eq!(ResolverSettings::resolve(&config).cache_max_entries, 42);

    clear_env();
}

#[test]
#[serial]
fn test_remote_resolver_requires_endpoint() {
    clear_env();

    let mut config = TomlConfig::default();
    config.remote.endpoints.clear();
    let settings = ResolverSettings::resolve(&config);

    assert!(settings.remote_resolver().is_err());
}
