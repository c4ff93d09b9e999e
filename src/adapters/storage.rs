use crate::domain::model::{ComputedParticipant, StoredParticipant};
use crate::domain::ports::TableStore;
use crate::utils::error::{MeetingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const PARTICIPANTS_TABLE: &str = "participants.csv";
pub const TIMES_TABLE: &str = "times.csv";

#[derive(Debug, Serialize, Deserialize)]
struct NameRow {
    id: u64,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TimeRow {
    id: u64,
    time: String,
}

/// Keeps participant names and their local times in two CSV files under
/// `base_path`, rows paired by `id`.
#[derive(Debug, Clone)]
pub struct CsvTableStore {
    base_path: PathBuf,
}

/// New contents of one table, written beside it before being renamed over it.
struct StagedTable {
    target: PathBuf,
    staging: PathBuf,
    contents: Vec<u8>,
    original_len: usize,
}

impl CsvTableStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn table(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    fn staging(&self, name: &str) -> PathBuf {
        self.base_path.join(format!(".{}.tmp", name))
    }

    fn create_if_absent(path: &Path, header: &[&str]) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(header)?;
        writer.flush()?;
        tracing::debug!("Created table {}", path.display());
        Ok(())
    }

    fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
        let mut reader = csv::Reader::from_path(path)?;
        reader
            .deserialize()
            .map(|row| row.map_err(MeetingError::from))
            .collect()
    }

    /// Existing file contents followed by `rows`, without a second header.
    fn extended<T: Serialize>(existing: Vec<u8>, rows: &[T]) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(existing);
        for row in rows {
            writer.serialize(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| MeetingError::IoError(e.into_error()))
    }

    fn stage<T: Serialize>(&self, name: &str, rows: &[T]) -> Result<StagedTable> {
        let target = self.table(name);
        let existing = fs::read(&target)?;
        let original_len = existing.len();
        Ok(StagedTable {
            staging: self.staging(name),
            contents: Self::extended(existing, rows)?,
            target,
            original_len,
        })
    }

    fn discard(path: &Path) {
        if !path.exists() {
            return;
        }
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Could not remove staging file {}: {}", path.display(), e);
        }
    }

    /// Writes every staged table, then renames them into place. Nothing is
    /// renamed unless every staging write succeeded.
    fn commit(tables: &[StagedTable]) -> Result<()> {
        for (i, table) in tables.iter().enumerate() {
            if let Err(e) = fs::write(&table.staging, &table.contents) {
                tables[..i].iter().for_each(|t| Self::discard(&t.staging));
                return Err(e.into());
            }
        }

        for (i, table) in tables.iter().enumerate() {
            if let Err(e) = fs::rename(&table.staging, &table.target) {
                for done in &tables[..i] {
                    let original = &done.contents[..done.original_len];
                    if let Err(restore) = fs::write(&done.target, original) {
                        tracing::error!("Could not restore {}: {}", done.target.display(), restore);
                    }
                }
                tables[i..].iter().for_each(|t| Self::discard(&t.staging));
                return Err(e.into());
            }
        }
        Ok(())
    }
}

impl TableStore for CsvTableStore {
    fn ensure_tables(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Self::create_if_absent(&self.table(PARTICIPANTS_TABLE), &["id", "name"])?;
        Self::create_if_absent(&self.table(TIMES_TABLE), &["id", "time"])?;
        Ok(())
    }

    fn insert_all(&self, participants: &[ComputedParticipant]) -> Result<Vec<u64>> {
        if participants.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<NameRow> = Self::read_rows(&self.table(PARTICIPANTS_TABLE))?;
        let times: Vec<TimeRow> = Self::read_rows(&self.table(TIMES_TABLE))?;
        // an orphan row in either table still claims its id
        let last_id = names
            .iter()
            .map(|row| row.id)
            .chain(times.iter().map(|row| row.id))
            .max()
            .unwrap_or(0);
        let ids: Vec<u64> = (last_id + 1..).take(participants.len()).collect();

        let name_rows: Vec<NameRow> = ids
            .iter()
            .zip(participants)
            .map(|(&id, p)| NameRow {
                id,
                name: p.name.clone(),
            })
            .collect();
        let time_rows: Vec<TimeRow> = ids
            .iter()
            .zip(participants)
            .map(|(&id, p)| TimeRow {
                id,
                time: p.local_time.clone(),
            })
            .collect();

        let staged = [
            self.stage(PARTICIPANTS_TABLE, &name_rows)?,
            self.stage(TIMES_TABLE, &time_rows)?,
        ];
        Self::commit(&staged)?;
        Ok(ids)
    }

    fn rows(&self) -> Result<Vec<StoredParticipant>> {
        let names: Vec<NameRow> = Self::read_rows(&self.table(PARTICIPANTS_TABLE))?;
        let mut times: HashMap<u64, String> =
            Self::read_rows::<TimeRow>(&self.table(TIMES_TABLE))?
                .into_iter()
                .map(|row| (row.id, row.time))
                .collect();

        Ok(names
            .into_iter()
            .filter_map(|row| {
                let time = times.remove(&row.id)?;
                Some(StoredParticipant {
                    id: row.id,
                    name: row.name,
                    time,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn participant(name: &str, time: &str) -> ComputedParticipant {
        ComputedParticipant {
            name: name.to_string(),
            local_time: time.to_string(),
        }
    }

    #[test]
    fn test_ensure_tables_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new(dir.path().join("tables"));

        store.ensure_tables().unwrap();
        store
            .insert_all(&[participant("Alice", "2021-11-15 14:30:00")])
            .unwrap();
        store.ensure_tables().unwrap();

        assert_eq!(store.rows().unwrap().len(), 1);
        let header = fs::read_to_string(dir.path().join("tables").join(TIMES_TABLE)).unwrap();
        assert!(header.starts_with("id,time\n"));
    }

    #[test]
    fn test_ids_continue_across_stores() {
        let dir = TempDir::new().unwrap();

        let store = CsvTableStore::new(dir.path());
        store.ensure_tables().unwrap();
        let ids = store
            .insert_all(&[
                participant("Alice", "2021-11-15 14:30:00"),
                participant("Bob", "2021-11-15 04:30:00"),
            ])
            .unwrap();
        assert_eq!(ids, vec![1, 2]);

        let reopened = CsvTableStore::new(dir.path());
        reopened.ensure_tables().unwrap();
        let ids = reopened
            .insert_all(&[participant("Carol", "2021-11-15 15:30:00")])
            .unwrap();
        assert_eq!(ids, vec![3]);

        let rows = reopened.rows().unwrap();
        assert_eq!(
            rows.iter().map(|r| (r.id, r.name.as_str(), r.time.as_str())).collect::<Vec<_>>(),
            vec![
                (1, "Alice", "2021-11-15 14:30:00"),
                (2, "Bob", "2021-11-15 04:30:00"),
                (3, "Carol", "2021-11-15 15:30:00"),
            ]
        );
    }

    #[test]
    fn test_orphan_time_row_id_is_not_reused() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new(dir.path());
        store.ensure_tables().unwrap();
        fs::write(dir.path().join(TIMES_TABLE), "id,time\n1,2021-11-15 14:30:00\n").unwrap();

        let ids = store
            .insert_all(&[participant("Bob", "2021-11-15 04:30:00")])
            .unwrap();
        assert_eq!(ids, vec![2]);

        let rows = store.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Bob");
        assert_eq!(rows[0].time, "2021-11-15 04:30:00");
    }

    #[test]
    fn test_failed_batch_leaves_tables_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new(dir.path());
        store.ensure_tables().unwrap();
        store
            .insert_all(&[participant("Alice", "2021-11-15 14:30:00")])
            .unwrap();

        let names_before = fs::read(dir.path().join(PARTICIPANTS_TABLE)).unwrap();
        let times_before = fs::read(dir.path().join(TIMES_TABLE)).unwrap();

        // the times table cannot be staged, after the names table already was
        let blocked = dir.path().join(format!(".{}.tmp", TIMES_TABLE));
        fs::create_dir(&blocked).unwrap();

        let result = store.insert_all(&[
            participant("Bob", "2021-11-15 04:30:00"),
            participant("Carol", "2021-11-15 15:30:00"),
        ]);
        assert!(matches!(result, Err(MeetingError::IoError(_))));

        assert_eq!(fs::read(dir.path().join(PARTICIPANTS_TABLE)).unwrap(), names_before);
        assert_eq!(fs::read(dir.path().join(TIMES_TABLE)).unwrap(), times_before);
        assert!(!dir.path().join(format!(".{}.tmp", PARTICIPANTS_TABLE)).exists());

        fs::remove_dir(&blocked).unwrap();
        let ids = store
            .insert_all(&[participant("Bob", "2021-11-15 04:30:00")])
            .unwrap();
        assert_eq!(ids, vec![2]);
        assert_eq!(store.rows().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_batch_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new(dir.path().join("missing"));
        assert_eq!(store.insert_all(&[]).unwrap(), Vec::<u64>::new());
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_insert_without_tables_fails() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::new(dir.path().join("missing"));
        assert!(store
            .insert_all(&[participant("Alice", "2021-11-15 14:30:00")])
            .is_err());
    }
}
