use crate::domain::model::SessionState;
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

/// Persists [`SessionState`] as a JSON file between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file is a fresh session.
    pub fn load(&self) -> Result<SessionState> {
        if !self.path.exists() {
            tracing::debug!("No session state at {}, starting fresh", self.path.display());
            return Ok(SessionState::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, state: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        Ok(())
    }
}
