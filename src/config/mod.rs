pub mod toml_config;

use crate::core::converter::{Zone, DEFAULT_REFERENCE_ZONE};
use crate::core::ConfigProvider;
use crate::utils::error::{MeetingError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_STATE_FILE: &str = "./output/session.json";
pub const DEFAULT_REMEMBER_COUNT_HOURS: u64 = 24;
const MAX_REMEMBER_COUNT_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "meeting-times"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Compute each participant's local time for a meeting")
)]
pub struct CliConfig {
    /// File with one `name timezone` pair per line
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub participants: Option<String>,

    /// Meeting date in the reference zone, yyyy-MM-dd HH:mm:ss
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub date: String,

    /// TOML configuration file; flags given here override its values
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub config: Option<String>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub reference_zone: Option<String>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub output_path: Option<String>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub state_file: Option<String>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub remember_count_hours: Option<u64>,

    /// Validate and convert without writing tables or session state
    #[cfg_attr(feature = "cli", arg(long))]
    pub dry_run: bool,

    #[cfg_attr(feature = "cli", arg(short, long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON lines"))]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn source_path(&self) -> Option<&str> {
        self.participants.as_deref()
    }

    fn reference_zone(&self) -> &str {
        self.reference_zone.as_deref().unwrap_or(DEFAULT_REFERENCE_ZONE)
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn state_file(&self) -> &str {
        self.state_file.as_deref().unwrap_or(DEFAULT_STATE_FILE)
    }

    fn remember_count_hours(&self) -> u64 {
        self.remember_count_hours
            .unwrap_or(DEFAULT_REMEMBER_COUNT_HOURS)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// Checks shared by every [`ConfigProvider`].
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_non_empty_string("meeting.reference_zone", config.reference_zone())?;
    config
        .reference_zone()
        .parse::<Zone>()
        .map_err(|e| MeetingError::InvalidConfigValueError {
            field: "meeting.reference_zone".to_string(),
            value: config.reference_zone().to_string(),
            reason: e.user_friendly_message(),
        })?;

    validate_path("output.path", config.output_path())?;
    validate_path("session.state_file", config.state_file())?;
    validate_range(
        "session.remember_count_hours",
        config.remember_count_hours(),
        1,
        MAX_REMEMBER_COUNT_HOURS,
    )?;
    Ok(())
}
