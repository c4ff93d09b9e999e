use crate::config::{
    validate_provider, CliConfig, DEFAULT_OUTPUT_PATH, DEFAULT_REMEMBER_COUNT_HOURS,
    DEFAULT_STATE_FILE,
};
use crate::core::converter::DEFAULT_REFERENCE_ZONE;
use crate::core::ConfigProvider;
use crate::utils::error::{MeetingError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub meeting: MeetingConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingConfig {
    pub reference_zone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub state_file: Option<String>,
    pub remember_count_hours: Option<u64>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MeetingError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Command line values win over the file.
    pub fn apply_overrides(&mut self, cli: &CliConfig) {
        if let Some(path) = &cli.participants {
            self.source.path = Some(path.clone());
        }
        if let Some(zone) = &cli.reference_zone {
            tracing::info!("Reference zone overridden to: {}", zone);
            self.meeting.reference_zone = Some(zone.clone());
        }
        if let Some(path) = &cli.output_path {
            self.output.path = Some(path.clone());
        }
        if let Some(path) = &cli.state_file {
            self.session.state_file = Some(path.clone());
        }
        if let Some(hours) = cli.remember_count_hours {
            self.session.remember_count_hours = Some(hours);
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn source_path(&self) -> Option<&str> {
        self.source.path.as_deref()
    }

    fn reference_zone(&self) -> &str {
        self.meeting
            .reference_zone
            .as_deref()
            .unwrap_or(DEFAULT_REFERENCE_ZONE)
    }

    fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn state_file(&self) -> &str {
        self.session
            .state_file
            .as_deref()
            .unwrap_or(DEFAULT_STATE_FILE)
    }

    fn remember_count_hours(&self) -> u64 {
        self.session
            .remember_count_hours
            .unwrap_or(DEFAULT_REMEMBER_COUNT_HOURS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
