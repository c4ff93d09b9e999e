use crate::domain::model::ParticipantRecord;
use crate::domain::ports::ParticipantSource;
use crate::utils::error::{MeetingError, Result};
use std::fs;
use std::path::Path;

/// Reads participants from a plain text file, one `name offset` per line.
#[derive(Debug, Clone, Default)]
pub struct FileParticipantSource;

impl FileParticipantSource {
    pub fn new() -> Self {
        Self
    }
}

impl ParticipantSource for FileParticipantSource {
    fn read(&self, path: &str) -> Result<Vec<ParticipantRecord>> {
        let not_found = || MeetingError::SourceNotFound {
            path: path.to_string(),
        };

        if path.trim().is_empty() || !Path::new(path).is_file() {
            return Err(not_found());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            tracing::debug!("Failed to read participant source {}: {}", path, e);
            not_found()
        })?;

        let records = parse_participants(&content);
        tracing::debug!("Read {} participant records from {}", records.len(), path);
        Ok(records)
    }
}

/// Splits each non-empty line on whitespace. A line with one token keeps an
/// empty offset so validation can report it by position.
pub fn parse_participants(content: &str) -> Vec<ParticipantRecord> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            let mut tokens = line.split_whitespace();
            let name = tokens.next().unwrap_or_default();
            let offset_spec = tokens.next().unwrap_or_default();

            let extra = tokens.count();
            if extra > 0 {
                tracing::debug!(
                    "Participant {} has {} extra token(s), ignoring them",
                    index + 1,
                    extra
                );
            }

            ParticipantRecord::new(name, offset_spec)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_single_line_source() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Test GMT+1").unwrap();

        let records = FileParticipantSource::new()
            .read(file.path().to_str().unwrap())
            .unwrap();

        assert_eq!(records, vec![ParticipantRecord::new("Test", "GMT+1")]);
    }

    #[test]
    fn test_missing_source() {
        let source = FileParticipantSource::new();
        for path in ["", " ", "   ", "nonexistent.txt", "nonsense"] {
            match source.read(path) {
                Err(MeetingError::SourceNotFound { path: reported }) => assert_eq!(reported, path),
                other => panic!("expected SourceNotFound for {:?}, got {:?}", path, other),
            }
        }
    }

    #[test]
    fn test_directory_is_not_a_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileParticipantSource::new().read(dir.path().to_str().unwrap());
        assert!(matches!(result, Err(MeetingError::SourceNotFound { .. })));
    }

    #[test]
    fn test_parse_participants_tokens() {
        let content = "Alice   GMT+1\n\n  \t\nBob\tGMT-9 trailing words\r\nCarol\n";
        let records = parse_participants(content);

        assert_eq!(
            records,
            vec![
                ParticipantRecord::new("Alice", "GMT+1"),
                ParticipantRecord::new("Bob", "GMT-9"),
                ParticipantRecord::new("Carol", ""),
            ]
        );
    }
}
