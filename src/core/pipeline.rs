use crate::core::converter::TimeConverter;
use crate::domain::model::{
    ComputedParticipant, MeetingOutcome, MeetingRequest, ParticipantRecord, StoredParticipant,
};
use crate::domain::ports::{ParticipantSource, Pipeline, TableStore};
use crate::utils::error::Result;
use crate::utils::validation::{validate_participant, Validate};

/// Validates every record before converting any of them, so a bad line
/// anywhere yields an error and no participants.
pub fn compute_participants(
    records: &[ParticipantRecord],
    meeting_date: &str,
    converter: &TimeConverter,
) -> Result<Vec<ComputedParticipant>> {
    let instant = converter.anchor(meeting_date)?;

    for (index, record) in records.iter().enumerate() {
        validate_participant(index + 1, record)?;
    }

    records
        .iter()
        .map(|record| {
            let local_time = converter.localize(&instant, &record.offset_spec)?;
            tracing::debug!("{} ({}) -> {}", record.name, record.offset_spec, local_time);
            Ok(ComputedParticipant {
                name: record.name.clone(),
                local_time,
            })
        })
        .collect()
}

/// Runs one meeting request through extract, transform and load.
pub struct MeetingPipeline<S: ParticipantSource, T: TableStore> {
    source: S,
    store: T,
    request: MeetingRequest,
    converter: TimeConverter,
}

impl<S: ParticipantSource, T: TableStore> MeetingPipeline<S, T> {
    pub fn new(source: S, store: T, request: MeetingRequest, converter: TimeConverter) -> Self {
        Self {
            source,
            store,
            request,
            converter,
        }
    }
}

impl<S: ParticipantSource, T: TableStore> Pipeline for MeetingPipeline<S, T> {
    fn extract(&self) -> Result<Vec<ParticipantRecord>> {
        self.request.validate()?;
        tracing::debug!("Reading participants from: {}", self.request.source_path);
        self.source.read(&self.request.source_path)
    }

    fn transform(&self, records: Vec<ParticipantRecord>) -> Result<MeetingOutcome> {
        let participants =
            compute_participants(&records, &self.request.meeting_date, &self.converter)?;

        Ok(MeetingOutcome {
            meeting_date: self.request.meeting_date.clone(),
            reference_zone: self.converter.reference().to_string(),
            participants,
        })
    }

    fn load(&self, outcome: &MeetingOutcome) -> Result<Vec<StoredParticipant>> {
        self.store.ensure_tables()?;
        let ids = self.store.insert_all(&outcome.participants)?;
        for (participant, id) in outcome.participants.iter().zip(&ids) {
            tracing::debug!("Stored participant {} as row {}", participant.name, id);
        }
        self.store.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::MeetingError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct MockSource {
        files: HashMap<String, String>,
    }

    impl MockSource {
        fn with_file(path: &str, content: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), content.to_string());
            Self { files }
        }
    }

    impl ParticipantSource for MockSource {
        fn read(&self, path: &str) -> Result<Vec<ParticipantRecord>> {
            self.files
                .get(path)
                .map(|content| crate::core::source::parse_participants(content))
                .ok_or_else(|| MeetingError::SourceNotFound {
                    path: path.to_string(),
                })
        }
    }

    /// Rejects any batch containing `fail_on`.
    #[derive(Default)]
    struct MockStore {
        rows: RefCell<Vec<StoredParticipant>>,
        fail_on: Option<String>,
    }

    impl TableStore for MockStore {
        fn ensure_tables(&self) -> Result<()> {
            Ok(())
        }

        fn insert_all(&self, participants: &[ComputedParticipant]) -> Result<Vec<u64>> {
            if let Some(bad) = &self.fail_on {
                if participants.iter().any(|p| &p.name == bad) {
                    return Err(MeetingError::IoError(std::io::Error::other("disk full")));
                }
            }
            let mut rows = self.rows.borrow_mut();
            Ok(participants
                .iter()
                .map(|participant| {
                    let id = rows.len() as u64 + 1;
                    rows.push(StoredParticipant {
                        id,
                        name: participant.name.clone(),
                        time: participant.local_time.clone(),
                    });
                    id
                })
                .collect())
        }

        fn rows(&self) -> Result<Vec<StoredParticipant>> {
            Ok(self.rows.borrow().clone())
        }
    }

    fn pipeline(content: &str, date: &str) -> MeetingPipeline<MockSource, MockStore> {
        MeetingPipeline::new(
            MockSource::with_file("people.txt", content),
            MockStore::default(),
            MeetingRequest::new("people.txt", date),
            TimeConverter::default(),
        )
    }

    #[test]
    fn test_compute_preserves_input_order() {
        let records = vec![
            ParticipantRecord::new("Zed", "GMT-9"),
            ParticipantRecord::new("Amy", "GMT+1"),
            ParticipantRecord::new("Kim", "GMT+2"),
        ];

        let computed =
            compute_participants(&records, "2021-11-15 15:30:00", &TimeConverter::default())
                .unwrap();

        let names: Vec<_> = computed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Kim"]);
        assert_eq!(computed[0].local_time, "2021-11-15 04:30:00");
        assert_eq!(computed[1].local_time, "2021-11-15 14:30:00");
        assert_eq!(computed[2].local_time, "2021-11-15 15:30:00");
    }

    #[test]
    fn test_short_line_fails_whole_batch() {
        let p = pipeline("Alice GMT+1\nBob\nCarol GMT-9\n", "2021-11-15 15:30:00");
        let records = p.extract().unwrap();
        assert_eq!(records.len(), 3);

        match p.transform(records) {
            Err(MeetingError::InvalidInput { message }) => {
                assert!(message.starts_with("Participant 2"), "{message}")
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_zone_fails_whole_batch() {
        let p = pipeline("Alice GMT+1\nBob Nowhere/Land\n", "2021-11-15 15:30:00");
        let records = p.extract().unwrap();
        assert!(matches!(
            p.transform(records),
            Err(MeetingError::ConversionError { .. })
        ));
    }

    #[test]
    fn test_invalid_date_with_empty_source() {
        let p = pipeline("", "2021-11-15");
        let records = p.extract().unwrap();
        assert!(records.is_empty());
        assert!(matches!(
            p.transform(records),
            Err(MeetingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_blank_request_is_rejected() {
        let p = pipeline("Alice GMT+1\n", "  ");
        match p.extract() {
            Err(MeetingError::InvalidInput { message }) => {
                assert_eq!(message, "You should provide both values")
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_load_pairs_rows() {
        let p = pipeline("Alice GMT+1\nBob GMT-9\n", "2021-11-15 15:30:00");
        let records = p.extract().unwrap();
        let outcome = p.transform(records).unwrap();
        assert_eq!(outcome.reference_zone, "GMT+02:00");

        let stored = p.load(&outcome).unwrap();
        assert_eq!(
            stored,
            vec![
                StoredParticipant {
                    id: 1,
                    name: "Alice".to_string(),
                    time: "2021-11-15 14:30:00".to_string(),
                },
                StoredParticipant {
                    id: 2,
                    name: "Bob".to_string(),
                    time: "2021-11-15 04:30:00".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_failed_load_stores_nothing() {
        let mut p = pipeline("Alice GMT+1\nBob GMT-9\n", "2021-11-15 15:30:00");
        p.store.fail_on = Some("Bob".to_string());

        let records = p.extract().unwrap();
        let outcome = p.transform(records).unwrap();
        assert!(matches!(p.load(&outcome), Err(MeetingError::IoError(_))));
        assert!(p.store.rows().unwrap().is_empty());
    }
}
