//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$TNEFEXTRACT_CONFIG` (environment variable)
//! 2. `~/.config/tnefextract/config.toml` (Linux/macOS)
//!    `%APPDATA%\tnefextract\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Where and how extracted files are written.
    pub extract: ExtractConfig,
    /// Caller-side bounds applied around each decode.
    pub limits: LimitsConfig,
    /// Decoder behavior.
    pub decode: DecodeConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Extraction output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Name of the output subdirectory created inside a scanned directory.
    pub output_dir_name: String,
    /// Also write `body.txt` / `body.html` next to the attachments.
    pub write_bodies: bool,
    /// Maximum length of a sanitized output file name.
    pub max_filename_len: usize,
}

/// Bounds enforced by the batch driver, not by the decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Files larger than this are skipped (default: 268435456 = 256 MB).
    pub max_file_size: u64,
    /// Attachments written per input file.
    pub max_attachments: usize,
}

/// Decoder behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Report malformed input as errors instead of returning partial results.
    pub strict: bool,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_dir_name: "processed".to_string(),
            write_bodies: false,
            max_filename_len: 150,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: 256 * 1024 * 1024, // 256 MB
            max_attachments: 4096,
        }
    }
}

// ── Loading ────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("TNEFEXTRACT_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("tnefextract").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tnefextract")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("tnefextract.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.general.log_level, "warn");
        assert_eq!(cfg.extract.output_dir_name, "processed");
        assert!(!cfg.extract.write_bodies);
        assert_eq!(cfg.limits.max_file_size, 256 * 1024 * 1024);
        assert!(!cfg.decode.strict);
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.extract.output_dir_name, cfg.extract.output_dir_name);
        assert_eq!(parsed.limits.max_attachments, cfg.limits.max_attachments);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[extract]
output_dir_name = "out"

[decode]
strict = true
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(cfg.extract.output_dir_name, "out");
        assert!(cfg.decode.strict);
        // Other fields use defaults
        assert_eq!(cfg.extract.max_filename_len, 150);
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_log_file_path_uses_cache_override() {
        let mut cfg = Config::default();
        cfg.general.cache_dir = Some(PathBuf::from("/tmp/tnef-cache"));
        assert_eq!(
            log_file_path(&cfg),
            PathBuf::from("/tmp/tnef-cache/tnefextract.log")
        );
    }
}
