use crate::error::{InsightsError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "FOOTFALL_CONFIG";
pub const CONFIG_FILE: &str = "footfall.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub output: OutputConfig,
    pub random: RandomConfig,
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    pub dir: String,
    pub preview_rows: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RandomConfig {
    /// 0 draws from ambient entropy.
    pub seed: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServiceConfig {
    pub latency_ms: u64,
    pub page_size: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log file to append to in addition to the console. Empty disables it.
    pub file: String,
}

impl LoggingConfig {
    pub fn file_path(&self) -> Option<PathBuf> {
        let trimmed = self.file.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

/// Default configuration embedded in the binary
pub const DEFAULT_CONFIG: &str = r#"
[output]
dir = "reports"
preview_rows = 5

[random]
seed = 0

[service]
latency_ms = 0
page_size = 20

[logging]
file = ""
"#;

impl Config {
    pub fn from_toml(contents: &str) -> Result<Config> {
        let config: Config = toml::from_str(contents)?;
        if config.service.page_size == 0 {
            return Err(InsightsError::Config(
                "service.page_size must be at least 1".into(),
            ));
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// File named by `FOOTFALL_CONFIG`.
    Env(PathBuf),
    File(PathBuf),
    Embedded,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Env(path) => write!(f, "{} ({})", path.display(), CONFIG_ENV),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Embedded => write!(f, "embedded default"),
        }
    }
}

/// Load configuration.
///
/// Search order:
/// 1. The file named by `FOOTFALL_CONFIG` (must exist if set)
/// 2. `footfall.toml` in the working directory
/// 3. Falls back to embedded default config
///
/// Runs before logging is set up, so the caller logs the returned source.
pub fn load_config() -> Result<(Config, ConfigSource)> {
    let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    resolve_config(explicit, Path::new(CONFIG_FILE))
}

fn resolve_config(explicit: Option<PathBuf>, local: &Path) -> Result<(Config, ConfigSource)> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(InsightsError::Config(format!(
                "{} points to missing file {}",
                CONFIG_ENV,
                path.display()
            )));
        }
        let config = Config::from_file(&path)?;
        return Ok((config, ConfigSource::Env(path)));
    }

    if local.exists() {
        let config = Config::from_file(local)?;
        return Ok((config, ConfigSource::File(local.to_path_buf())));
    }

    Ok((Config::from_toml(DEFAULT_CONFIG)?, ConfigSource::Embedded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.output.dir, "reports");
        assert_eq!(config.output.preview_rows, 5);
        assert_eq!(config.random.seed, 0);
        assert_eq!(config.service.page_size, 20);
        assert_eq!(config.logging.file_path(), None);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let bad = DEFAULT_CONFIG.replace("page_size = 20", "page_size = 0");
        assert!(matches!(
            Config::from_toml(&bad),
            Err(InsightsError::Config(_))
        ));
    }

    #[test]
    fn missing_section_is_a_toml_error() {
        let err = Config::from_toml("[output]\ndir = \"x\"\npreview_rows = 1\n").unwrap_err();
        assert!(matches!(err, InsightsError::Toml(_)));
    }

    #[test]
    fn reads_config_file() {
        let path = std::env::temp_dir().join(format!("footfall-config-{}.toml", std::process::id()));
        let contents = DEFAULT_CONFIG
            .replace("seed = 0", "seed = 42")
            .replace("file = \"\"", "file = \"footfall.log\"");
        std::fs::write(&path, contents).unwrap();
        let config = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.random.seed, 42);
        assert_eq!(config.logging.file_path(), Some(PathBuf::from("footfall.log")));
    }

    #[test]
    fn resolution_prefers_env_then_local_then_embedded() {
        let dir = std::env::temp_dir().join(format!("footfall-resolve-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let env_file = dir.join("env.toml");
        let local_file = dir.join("footfall.toml");
        std::fs::write(&env_file, DEFAULT_CONFIG.replace("seed = 0", "seed = 1")).unwrap();
        std::fs::write(&local_file, DEFAULT_CONFIG.replace("seed = 0", "seed = 2")).unwrap();

        let (config, source) = resolve_config(Some(env_file.clone()), &local_file).unwrap();
        assert_eq!(config.random.seed, 1);
        assert_eq!(source, ConfigSource::Env(env_file));

        let (config, source) = resolve_config(None, &local_file).unwrap();
        assert_eq!(config.random.seed, 2);
        assert_eq!(source, ConfigSource::File(local_file.clone()));

        let missing = dir.join("absent.toml");
        let (config, source) = resolve_config(None, &missing).unwrap();
        assert_eq!(config.random.seed, 0);
        assert_eq!(source, ConfigSource::Embedded);
        assert_eq!(source.to_string(), "embedded default");

        assert!(matches!(
            resolve_config(Some(missing), &local_file),
            Err(InsightsError::Config(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }
}
