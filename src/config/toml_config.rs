use crate::adapters::store::DEFAULT_STORE_FILE;
use crate::core::current::CURRENT_PAST_DAYS;
use crate::core::geography::BOUNDARY_SIMPLIFY_TOLERANCE;
use crate::core::snoopers::lib_dem_newbies::DEFAULT_BASE_URL;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ElectionError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_USER_AGENT: &str = concat!("every-election/", env!("CARGO_PKG_VERSION"));
const DEFAULT_STORE_PATH: &str = "./data";

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub snooper: SnooperConfig,
    #[serde(default)]
    pub store: StoreConfig,
    pub slack: Option<SlackConfig>,
    pub projection: Option<ProjectionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnooperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    pub webhook_url: String,
    pub channel: Option<String>,
    pub username: Option<String>,
    pub icon_emoji: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectionConfig {
    pub current_past_days: Option<i64>,
    pub simplify_tolerance: Option<f64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_store_path() -> String {
    DEFAULT_STORE_PATH.to_string()
}

impl Default for SnooperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            file_name: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ElectionError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ElectionError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SLACK_WEBHOOK_URL})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_base_url("snooper.base_url", &self.snooper.base_url)?;

        if let Some(timeout) = self.snooper.timeout_seconds {
            validation::validate_positive_number("snooper.timeout_seconds", timeout, 1)?;
        }

        validation::validate_path("store.path", &self.store.path)?;
        if let Some(file_name) = &self.store.file_name {
            validation::validate_path("store.file_name", file_name)?;
        }

        if let Some(slack) = &self.slack {
            validation::validate_url("slack.webhook_url", &slack.webhook_url)?;
            if let Some(channel) = &slack.channel {
                validation::validate_non_empty_string("slack.channel", channel)?;
            }
        }

        if let Some(projection) = &self.projection {
            if let Some(days) = projection.current_past_days {
                validation::validate_range("projection.current_past_days", days, 0, 3650)?;
            }
            if let Some(tolerance) = projection.simplify_tolerance {
                validation::validate_range("projection.simplify_tolerance", tolerance, 0.0, 1.0)?;
            }
        }

        Ok(())
    }

    pub fn current_past_days(&self) -> i64 {
        self.projection
            .as_ref()
            .and_then(|p| p.current_past_days)
            .unwrap_or(CURRENT_PAST_DAYS)
    }

    pub fn simplify_tolerance(&self) -> f64 {
        self.projection
            .as_ref()
            .and_then(|p| p.simplify_tolerance)
            .unwrap_or(BOUNDARY_SIMPLIFY_TOLERANCE)
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.snooper.base_url
    }

    fn store_path(&self) -> &str {
        &self.store.path
    }

    fn store_file_name(&self) -> &str {
        self.store.file_name.as_deref().unwrap_or(DEFAULT_STORE_FILE)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.snooper.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn user_agent(&self) -> &str {
        self.snooper.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    fn slack_webhook_url(&self) -> Option<&str> {
        self.slack.as_ref().map(|s| s.webhook_url.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r##"
[snooper]
base_url = "https://snoop.example.com/"
timeout_seconds = 10

[store]
path = "./snoop-data"
file_name = "snooped.json"

[slack]
webhook_url = "https://hooks.slack.com/services/T000/B000/XXX"
channel = "#by-elections"

[projection]
current_past_days = 30
"##;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), "https://snoop.example.com/");
        assert_eq!(config.request_timeout_seconds(), 10);
        assert_eq!(config.store_path(), "./snoop-data");
        assert_eq!(config.store_file_name(), "snooped.json");
        assert_eq!(
            config.slack_webhook_url(),
            Some("https://hooks.slack.com/services/T000/B000/XXX")
        );
        assert_eq!(config.current_past_days(), 30);
        assert_eq!(config.simplify_tolerance(), BOUNDARY_SIMPLIFY_TOLERANCE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.store_file_name(), DEFAULT_STORE_FILE);
        assert_eq!(config.request_timeout_seconds(), DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.slack_webhook_url(), None);
        assert_eq!(config.current_past_days(), CURRENT_PAST_DAYS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var(
            "EVERY_ELECTION_TEST_WEBHOOK",
            "https://hooks.slack.com/services/env",
        );

        let toml_content = r#"
[slack]
webhook_url = "${EVERY_ELECTION_TEST_WEBHOOK}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.slack_webhook_url(),
            Some("https://hooks.slack.com/services/env")
        );

        std::env::remove_var("EVERY_ELECTION_TEST_WEBHOOK");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[snooper]
base_url = "libdemnewbies.org.uk"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[store]
path = ""
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[projection]
simplify_tolerance = 5.0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[snooper\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ElectionError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[store]\npath = \"./from-file\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.store_path(), "./from-file");
    }
}
