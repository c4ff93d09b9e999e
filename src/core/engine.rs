use crate::domain::model::{MeetingReport, SessionState};
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use chrono::{DateTime, Duration, Utc};

pub struct SchedulerEngine<P: Pipeline> {
    pipeline: P,
    remember_count_for: Duration,
}

impl<P: Pipeline> SchedulerEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::with_count_memory(pipeline, Duration::hours(24))
    }

    pub fn with_count_memory(pipeline: P, remember_count_for: Duration) -> Self {
        Self {
            pipeline,
            remember_count_for,
        }
    }

    /// Runs the pipeline and, only if every step succeeds, records the
    /// meeting in `session`.
    pub fn run(&self, session: &mut SessionState, now: DateTime<Utc>) -> Result<MeetingReport> {
        tracing::info!("Starting meeting time computation");

        let records = self.pipeline.extract()?;
        tracing::info!("Extracted {} participant records", records.len());

        let outcome = self.pipeline.transform(records)?;
        tracing::info!(
            "Computed local times for {} participants (reference zone {})",
            outcome.participants.len(),
            outcome.reference_zone
        );

        let stored = self.pipeline.load(&outcome)?;
        tracing::info!("Tables now hold {} participants", stored.len());

        let previous_participant_count = session.remembered_count(now, self.remember_count_for);
        session.remember_count(outcome.participants.len(), now);
        session.history.append(outcome.meeting_date.clone());

        Ok(MeetingReport {
            outcome,
            previous_participant_count,
            history: session.history.clone(),
            stored,
        })
    }
}
