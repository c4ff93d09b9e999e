pub mod converter;
pub mod engine;
pub mod history;
pub mod pipeline;
pub mod source;

pub use crate::domain::model::{ComputedParticipant, MeetingOutcome, ParticipantRecord};
pub use crate::domain::ports::{ConfigProvider, ParticipantSource, Pipeline, TableStore};
pub use crate::utils::error::Result;
