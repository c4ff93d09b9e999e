use crate::domain::model::{
    ComputedParticipant, MeetingOutcome, ParticipantRecord, StoredParticipant,
};
use crate::utils::error::Result;

pub trait ParticipantSource {
    fn read(&self, path: &str) -> Result<Vec<ParticipantRecord>>;
}

/// Two related tables (names and times) paired by a generated id.
pub trait TableStore {
    /// Creates the tables if they are absent. Calling it again is a no-op.
    fn ensure_tables(&self) -> Result<()>;
    /// Stores the whole batch or nothing. Returns the id assigned to each
    /// participant, in order.
    fn insert_all(&self, participants: &[ComputedParticipant]) -> Result<Vec<u64>>;
    fn rows(&self) -> Result<Vec<StoredParticipant>>;
}

pub trait ConfigProvider {
    fn source_path(&self) -> Option<&str>;
    fn reference_zone(&self) -> &str;
    fn output_path(&self) -> &str;
    fn state_file(&self) -> &str;
    fn remember_count_hours(&self) -> u64;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Vec<ParticipantRecord>>;
    fn transform(&self, records: Vec<ParticipantRecord>) -> Result<MeetingOutcome>;
    fn load(&self, outcome: &MeetingOutcome) -> Result<Vec<StoredParticipant>>;
}
