//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quizgrade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizgradeConfig {
    /// Where `grade` writes submission reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report format when `--format` is not given: json, markdown, all.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Tracing filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Treat validation warnings and ungraded questions as failures.
    #[serde(default)]
    pub fail_on_invalid: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizgrade-results")
}

fn default_format() -> String {
    "json".to_string()
}

pub fn default_log_filter() -> String {
    "quizgrade=info".to_string()
}

impl Default for QuizgradeConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_format: default_format(),
            log_filter: default_log_filter(),
            fail_on_invalid: false,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables resolve to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizgrade.toml` in the current directory
/// 2. `~/.config/quizgrade/config.toml`
///
/// `QUIZGRADE_OUTPUT_DIR` overrides `output_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizgradeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizgrade.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizgradeConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZGRADE_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    Ok(config)
}

/// Parse config text, resolving `${VAR}` references in string values.
fn parse_config(content: &str) -> Result<QuizgradeConfig> {
    let mut config: QuizgradeConfig = toml::from_str(content)?;
    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));
    config.default_format = resolve_env_vars(&config.default_format);
    config.log_filter = resolve_env_vars(&config.log_filter);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizgrade"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZGRADE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZGRADE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZGRADE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_QUIZGRADE_TEST_VAR");
    }

    #[test]
    fn unterminated_reference_is_left_alone() {
        assert_eq!(resolve_env_vars("a${b"), "a${b");
    }

    #[test]
    fn default_config() {
        let config = QuizgradeConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("./quizgrade-results"));
        assert_eq!(config.default_format, "json");
        assert_eq!(config.log_filter, "quizgrade=info");
        assert!(!config.fail_on_invalid);
    }

    #[test]
    fn parse_partial_config() {
        std::env::set_var("_QUIZGRADE_RESULTS", "/tmp/results");
        let config = parse_config(
            r#"
output_dir = "${_QUIZGRADE_RESULTS}/term1"
fail_on_invalid = true
"#,
        )
        .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/results/term1"));
        assert!(config.fail_on_invalid);
        assert_eq!(config.default_format, "json");
        std::env::remove_var("_QUIZGRADE_RESULTS");
    }

    #[test]
    fn explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizgrade.toml");
        std::fs::write(&path, "default_format = \"markdown\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_format, "markdown");
    }
}
