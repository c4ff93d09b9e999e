use crate::domain::model::MeetingReport;
use std::fmt;

pub fn render_report(report: &MeetingReport) -> String {
    ReportView(report).to_string()
}

struct ReportView<'a>(&'a MeetingReport);

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let outcome = &report.outcome;

        writeln!(f, "Participants")?;
        for participant in &outcome.participants {
            writeln!(f, "  {}: {}", participant.name, participant.local_time)?;
        }
        writeln!(f)?;

        writeln!(f, "Number of participants: {}", outcome.participants.len())?;
        if let Some(previous) = report.previous_participant_count {
            writeln!(f, "Participants at the last meeting: {}", previous)?;
        }
        writeln!(
            f,
            "Current meeting: {} ({})",
            outcome.meeting_date, outcome.reference_zone
        )?;
        writeln!(f)?;

        writeln!(f, "Meeting history")?;
        for date in report.history.all() {
            writeln!(f, "  {}", date)?;
        }
        writeln!(f)?;

        // padding counts chars, so widths do too
        let name_width = report
            .stored
            .iter()
            .map(|row| row.name.chars().count())
            .chain(std::iter::once("Name".len()))
            .max()
            .unwrap_or(0);
        writeln!(f, "{:>4}  {:<name_width$}  Time", "Id", "Name")?;
        for row in &report.stored {
            writeln!(f, "{:>4}  {:<name_width$}  {}", row.id, row.name, row.time)?;
        }
        Ok(())
    }
}
