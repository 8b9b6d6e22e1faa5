use std::{fs, sync::Mutex, time::Duration};

use kizuna_config::{ConfigLoadError, ConfigLoader, MappingTableSource};
use kizuna_core::OverflowPolicy;
use kizuna_model::{CatalogId, PrimaryId};
use once_cell::sync::Lazy;
use tempfile::TempDir;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const VARS: &[&str] = &[
    "KIZUNA_CONFIG",
    "KIZUNA_MAPPING_PATH",
    "KIZUNA_MAPPING_JSON",
    "KIZUNA_FETCH_TIMEOUT",
    "KIZUNA_OVERFLOW_POLICY",
    "KIZUNA_GENRE_CATALOG_URL",
];

fn clear_env() {
    for var in VARS {
        unsafe { std::env::remove_var(var) };
    }
}

fn loader(dir: &TempDir) -> ConfigLoader {
    ConfigLoader::new().with_env_file(dir.path().join("missing.env"))
}

#[test]
fn config_file_and_relative_mapping_are_loaded() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("mapping.json"),
        r#"{"1376": {"imdb_id": "tt0409591", "title": "Naruto"}}"#,
    )
    .unwrap();
    let config = dir.path().join("kizuna.toml");
    fs::write(
        &config,
        r#"
mapping_path = "mapping.json"

[reconcile]
fetch_timeout = "2s"
overflow = "linear"
"#,
    )
    .unwrap();

    let load = loader(&dir).with_config_path(&config).load().unwrap();

    assert_eq!(load.reconcile.fetch_timeout, Duration::from_secs(2));
    assert_eq!(load.reconcile.overflow, OverflowPolicy::Linear);
    assert_eq!(load.mappings.len(), 1);
    assert_eq!(
        load.mapping_source,
        MappingTableSource::ConfigFile(dir.path().join("mapping.json"))
    );
    assert!(!load.env_file_loaded);

    let reconciler = load.into_reconciler();
    assert!(reconciler.has_mapping(&CatalogId::parse("tt0409591").unwrap()));
    assert_eq!(reconciler.settings().fetch_timeout, Duration::from_secs(2));
}

#[test]
fn inline_mapping_json_wins_over_config_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = TempDir::new().unwrap();
    let config = dir.path().join("kizuna.toml");
    fs::write(&config, "mapping_path = \"does-not-matter.json\"\n").unwrap();
    unsafe {
        std::env::set_var(
            "KIZUNA_MAPPING_JSON",
            r#"{"42": {"reference_id": "tt42", "from_season": 2}}"#,
        );
        std::env::set_var("KIZUNA_FETCH_TIMEOUT", "250ms");
    }

    let load = loader(&dir).with_config_path(&config).load();
    clear_env();
    let load = load.unwrap();

    assert_eq!(load.mapping_source, MappingTableSource::EnvInline);
    assert_eq!(load.reconcile.fetch_timeout, Duration::from_millis(250));
    let entry = load
        .mappings
        .entry_for_primary(&PrimaryId::new("42").unwrap())
        .unwrap();
    assert_eq!(entry.from_season(), 2);
}

#[test]
fn explicit_mapping_path_and_env_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = TempDir::new().unwrap();
    let mapping = dir.path().join("anime.toml");
    fs::write(
        &mapping,
        "[7]\nreference_id = \"tt7\"\n\n[8]\nreference_id = \"tt7\"\nfrom_season = 2\n",
    )
    .unwrap();
    let env_file = dir.path().join(".env");
    fs::write(&env_file, "KIZUNA_OVERFLOW_POLICY=linear\n").unwrap();

    let load = ConfigLoader::new()
        .with_env_file(&env_file)
        .with_config_path({
            let config = dir.path().join("kizuna.toml");
            fs::write(&config, "").unwrap();
            config
        })
        .with_mapping_path(&mapping)
        .load();
    clear_env();
    let load = load.unwrap();

    assert!(load.env_file_loaded);
    assert_eq!(load.reconcile.overflow, OverflowPolicy::Linear);
    assert_eq!(load.mapping_source, MappingTableSource::Explicit(mapping));
    assert_eq!(load.mappings.len(), 2);
}

#[test]
fn missing_explicit_config_is_an_error() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = TempDir::new().unwrap();
    let err = loader(&dir)
        .with_config_path(dir.path().join("nope.toml"))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn unreadable_mapping_is_reported() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = TempDir::new().unwrap();
    let mapping = dir.path().join("broken.json");
    fs::write(&mapping, "{ not json").unwrap();
    let config = dir.path().join("kizuna.toml");
    fs::write(&config, "").unwrap();

    let err = loader(&dir)
        .with_config_path(&config)
        .with_mapping_path(&mapping)
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Mapping(_)));
}
