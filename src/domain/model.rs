use crate::core::history::MeetingHistory;
use crate::utils::error::{MeetingError, Result};
use crate::utils::validation::Validate;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One non-empty line of the participant source, as read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub name: String,
    /// Empty when the line had a single token.
    pub offset_spec: String,
}

impl ParticipantRecord {
    pub fn new(name: impl Into<String>, offset_spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset_spec: offset_spec.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub source_path: String,
    pub meeting_date: String,
}

impl MeetingRequest {
    pub fn new(source_path: impl Into<String>, meeting_date: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            meeting_date: meeting_date.into(),
        }
    }
}

impl Validate for MeetingRequest {
    fn validate(&self) -> Result<()> {
        if self.source_path.trim().is_empty() || self.meeting_date.trim().is_empty() {
            return Err(MeetingError::invalid_input("You should provide both values"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedParticipant {
    pub name: String,
    pub local_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingOutcome {
    pub meeting_date: String,
    pub reference_zone: String,
    pub participants: Vec<ComputedParticipant>,
}

/// A persisted participant row joined with its time row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredParticipant {
    pub id: u64,
    pub name: String,
    pub time: String,
}

/// Everything the presentation layer needs after a successful run.
#[derive(Debug, Clone)]
pub struct MeetingReport {
    pub outcome: MeetingOutcome,
    pub previous_participant_count: Option<usize>,
    pub history: MeetingHistory,
    pub stored: Vec<StoredParticipant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedCount {
    pub count: usize,
    pub stored_at: DateTime<Utc>,
}

/// State kept between requests of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub history: MeetingHistory,
    #[serde(default)]
    pub last_participant_count: Option<RememberedCount>,
}

impl SessionState {
    /// The previous participant count, unless it is older than `max_age`.
    pub fn remembered_count(&self, now: DateTime<Utc>, max_age: Duration) -> Option<usize> {
        self.last_participant_count
            .filter(|remembered| now - remembered.stored_at < max_age)
            .map(|remembered| remembered.count)
    }

    pub fn remember_count(&mut self, count: usize, now: DateTime<Utc>) {
        self.last_participant_count = Some(RememberedCount {
            count,
            stored_at: now,
        });
    }
}
