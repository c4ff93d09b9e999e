use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Past meeting dates, newest first. Entries are never removed or rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingHistory {
    dates: VecDeque<String>,
}

impl MeetingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, meeting_date: impl Into<String>) {
        self.dates.push_front(meeting_date.into());
    }

    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.dates.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// A history owned by one session but reachable from several threads.
#[derive(Debug, Default)]
pub struct SharedHistory {
    inner: Mutex<MeetingHistory>,
}

impl SharedHistory {
    pub fn new(history: MeetingHistory) -> Self {
        Self {
            inner: Mutex::new(history),
        }
    }

    pub fn append(&self, meeting_date: impl Into<String>) {
        // append is a single push, so a poisoned lock still holds a consistent history
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .append(meeting_date);
    }

    pub fn snapshot(&self) -> MeetingHistory {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
