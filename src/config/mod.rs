mod schema;

pub use schema::{Config, ScraperConfig, SourcesConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/admit-score/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("admit-score"))
}

/// Get the default config file path (~/.config/admit-score/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/admit-score/config.yaml); a missing default file yields the
///   built-in configuration.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_explicit_missing_file_errors() {
        let temp_path = env::temp_dir().join("admit_score_test_missing_config.yaml");
        let _ = fs::remove_file(&temp_path);
        assert!(load_config(Some(temp_path)).is_err());
    }

    #[test]
    fn test_load_config_file() {
        let temp_path = env::temp_dir().join("admit_score_test_config.yaml");
        fs::write(&temp_path, "audit_log: /tmp/a.json\n").unwrap();

        let config = load_config(Some(temp_path.clone())).unwrap();
        assert_eq!(config.audit_log, Some(PathBuf::from("/tmp/a.json")));

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_invalid_yaml_errors() {
        let temp_path = env::temp_dir().join("admit_score_test_bad_config.yaml");
        fs::write(&temp_path, "institution: [1, 2\n").unwrap();
        assert!(load_config(Some(temp_path.clone())).is_err());
        let _ = fs::remove_file(&temp_path);
    }
}
