pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{report::render_report, session::SessionStore, storage::CsvTableStore};
pub use crate::config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::{
    converter::{convert, TimeConverter, Zone},
    engine::SchedulerEngine,
    history::{MeetingHistory, SharedHistory},
    pipeline::{compute_participants, MeetingPipeline},
    source::{parse_participants, FileParticipantSource},
};
pub use crate::domain::model::{
    ComputedParticipant, MeetingReport, MeetingRequest, ParticipantRecord, SessionState,
};
pub use crate::utils::error::{MeetingError, Result};
