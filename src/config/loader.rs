use std::{
    env, fs,
    path::{Path, PathBuf},
};

use log::debug;

use crate::config::{validator, Config};
use crate::error::{Context, Result};

/// Environment variable naming an explicit JSON config file.
pub const CONFIG_ENV_VAR: &str = "TITRATION_CLI_CONFIG";

const CONFIG_DIR_NAME: &str = "titration-cli";
const CONFIG_FILE_NAME: &str = "config.json";

/// Resolve the active configuration.
///
/// Lookup order: the path in `TITRATION_CLI_CONFIG`, then
/// `<config dir>/titration-cli/config.json`, then the builtin settings.
pub fn load_config() -> Result<Config> {
    if let Some(path) = env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
        return load_config_from(Path::new(&path));
    }

    match default_config_path() {
        Some(path) if path.is_file() => load_config_from(&path),
        _ => {
            debug!("no config file found, using builtin settings");
            Ok(Config::builtin())
        }
    }
}

/// Parse and validate a JSON config file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config JSON at {}", path.display()))?;

    let config: Config = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse config JSON at {}", path.display()))?;

    validator::validate_config(&config)?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config(r#"{ "browser": { "page_size": 5 }, "labels": { "acid": "HA" } }"#);
        let config = load_config_from(file.path()).expect("config loads");

        assert_eq!(config.browser.page_size, 5);
        assert_eq!(config.labels.acid, "HA");
        assert_eq!(config.labels.base, "base");
        assert_eq!(config.ph, Config::builtin().ph);
        assert_eq!(config.display.refresh_per_second, 10);
    }

    #[test]
    fn rejects_malformed_json() {
        let file = write_config("{ not json");
        let err = load_config_from(file.path()).expect_err("parse should fail");
        assert!(
            err.to_string().contains("failed to parse config JSON"),
            "unexpected error message: {err}"
        );
    }

    #[test]
    fn rejects_invalid_values() {
        let file = write_config(r#"{ "ph": { "min": 10.0, "max": 2.0 } }"#);
        let err = load_config_from(file.path()).expect_err("validation should fail");
        assert!(
            err.to_string().contains("ph.min"),
            "unexpected error message: {err}"
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");
        let err = load_config_from(&path).expect_err("read should fail");
        assert!(err.to_string().contains("absent.json"));
    }
}
