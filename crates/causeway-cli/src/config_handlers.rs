//! `causeway config` subcommands.
//!
//! Keys are the dotted names of [`ConfigKey`]; anything else is rejected
//! before a file is read or written. `set` edits the file itself, without
//! the `CAUSEWAY_*` overlay, and refuses to write settings a search
//! could not run with.

use crate::cli::ConfigAction;
use crate::config::{CausewayConfig, ConfigKey};
use causeway_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Handle a config subcommand.
///
/// Takes the raw `--config` path because `path` and `init` run before a
/// config file exists.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Get { key } => {
            let key: ConfigKey = key.parse()?;
            let config = CausewayConfig::load(config_path)?;
            match key.get(&config) {
                Some(value) => println!("{value}"),
                None => eprintln!("{key} is not set"),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let key: ConfigKey = key.parse()?;
            let path = existing_config_path(config_path)?;
            set_in_file(&path, key, &value)?;
            println!("Set {key} = {value} in {}", path.display());
            Ok(())
        }
        ConfigAction::Init { file, force } => cmd_config_init(file.as_deref(), force),
        ConfigAction::Export => {
            for (var, value) in CausewayConfig::load(config_path)?.to_env_vars() {
                println!("{var}={value}");
            }
            Ok(())
        }
    }
}

fn cmd_config_path(config_path: Option<&str>) -> Result<()> {
    let path = CausewayConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory for this platform"))?;
    println!("{}", path.display());
    if !path.exists() {
        eprintln!("(file does not exist; run `causeway config init` to create it)");
    }
    Ok(())
}

fn existing_config_path(config_path: Option<&str>) -> Result<PathBuf> {
    let path = CausewayConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory"))?;
    if !path.exists() {
        return Err(Error::config(format!(
            "Config file does not exist at {}. Run `causeway config init` first.",
            path.display()
        )));
    }
    Ok(path)
}

/// Rewrite the file at `path` with `key` set to `value`. The file is left
/// untouched when the value does not parse or fails validation.
fn set_in_file(path: &Path, key: ConfigKey, value: &str) -> Result<CausewayConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let mut config: CausewayConfig = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;

    key.set(&mut config, value)?;
    config.search.validate()?;

    std::fs::write(path, config.to_toml_string()?).map_err(|e| Error::io_with_path(e, path))?;
    log::debug!("{key} set to {value:?} in {}", path.display());
    Ok(config)
}

fn cmd_config_init(file: Option<&str>, force: bool) -> Result<()> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => CausewayConfig::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }
    let toml_str = CausewayConfig::default().to_toml_string()?;
    std::fs::write(&path, toml_str).map_err(|e| Error::io_with_path(e, &path))?;

    println!("Config file created at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use causeway_search::{ColliderStrategy, ConflictPolicy};

    fn write_default(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, CausewayConfig::default().to_toml_string().unwrap()).unwrap();
        path
    }

    fn run(path: &Path, action: ConfigAction) -> Result<()> {
        handle_config_command(path.to_str(), action)
    }

    fn set(key: &str, value: &str) -> ConfigAction {
        ConfigAction::Set {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_path_explicit() {
        assert!(cmd_config_path(Some("/explicit/config.toml")).is_ok());
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);

        let get = |key: &str| ConfigAction::Get { key: key.to_string() };
        assert!(run(&path, get("search.conflict_policy")).is_ok());
        assert!(run(&path, get("output.result_path")).is_ok());

        let err = run(&path, get("search.nonexistent")).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("unknown key"));
        assert!(run(&path, get("search")).is_err());
    }

    #[test]
    fn test_set_typed_fields() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);

        run(&path, set("search.collider_strategy", "cpc")).unwrap();
        run(&path, set("search.conflict_policy", "overwrite-existing")).unwrap();
        run(&path, set("search.depth", "4")).unwrap();
        run(&path, set("search.prevent_cycles", "true")).unwrap();
        run(&path, set("output.result_path", "out/result.json")).unwrap();

        let config = CausewayConfig::load(path.to_str()).unwrap();
        assert_eq!(config.search.depth, 4);
        assert_eq!(config.search.collider_strategy, ColliderStrategy::Conservative);
        assert_eq!(config.search.conflict_policy, ConflictPolicy::OverwriteExisting);
        assert!(config.search.prevent_cycles);
        assert_eq!(config.output.result_path.as_deref(), Some("out/result.json"));

        // Names are written in their canonical form.
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("collider_strategy = \"conservative\""));
    }

    #[test]
    fn test_set_leaves_file_alone_on_bad_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        let before = std::fs::read_to_string(&path).unwrap();

        for (key, value) in [
            ("search.depth", "-9"),
            ("search.depth", "deep"),
            ("search.max_meek_passes", "0"),
            ("search.collider_strategy", "psychic"),
            ("search.stable", "yes"),
            ("search.alpha", "0.05"),
            ("logging.level", "debug"),
        ] {
            assert!(run(&path, set(key, value)).is_err(), "{key} = {value}");
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_set_missing_file() {
        let err = run(Path::new("/nonexistent/config.toml"), set("search.depth", "1")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_set_ignores_env_overlay() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        let _guard =
            crate::config::tests::EnvGuard::new("CAUSEWAY_OUTPUT_KNOWLEDGE_PATH", "from-env.toml");

        let written = set_in_file(&path, ConfigKey::Depth, "2").unwrap();
        assert_eq!(written.search.depth, 2);
        assert!(written.output.knowledge_path.is_none());
        assert!(!std::fs::read_to_string(&path).unwrap().contains("from-env"));
    }

    #[test]
    fn test_init_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("causeway").join("config.toml");

        cmd_config_init(path.to_str(), false).unwrap();
        let config = CausewayConfig::load(path.to_str()).unwrap();
        assert_eq!(config.search, causeway_search::SearchConfig::default());
    }

    #[test]
    fn test_init_no_overwrite_without_force() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "existing").unwrap();

        let err = cmd_config_init(path.to_str(), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        cmd_config_init(path.to_str(), true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[search]"));
    }

    #[test]
    fn test_export() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        assert!(run(&path, ConfigAction::Export).is_ok());
    }
}
