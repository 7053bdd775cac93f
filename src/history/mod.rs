pub mod storage;
pub mod types;

pub use storage::{get_outcomes_path, load_outcome_history, save_outcome_history};
pub use types::{OutcomeHistory, OutcomeRecord};

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::student::Student;

/// Write-only sink for admission outcomes
pub trait OutcomeStore: Send + Sync {
    fn append(&self, student: &Student, admitted: bool) -> Result<()>;
}

/// Outcome store backed by a versioned JSON file.
///
/// Each append rewrites the file atomically; appends from one process are
/// serialized so none are lost.
pub struct OutcomeLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl OutcomeLog {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl OutcomeStore for OutcomeLog {
    fn append(&self, student: &Student, admitted: bool) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut history = load_outcome_history(&self.path)?;
        history.append(student.clone(), admitted);
        save_outcome_history(&self.path, &history)?;
        tracing::debug!(path = %self.path.display(), total = history.records.len(), "outcome recorded");
        Ok(())
    }
}

/// In-memory outcome store
#[derive(Debug, Default)]
pub struct MemoryOutcomes {
    history: Mutex<OutcomeHistory>,
}

impl MemoryOutcomes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> OutcomeHistory {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl OutcomeStore for MemoryOutcomes {
    fn append(&self, student: &Student, admitted: bool) -> Result<()> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .append(student.clone(), admitted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::types::tests::sample_student;
    use std::env;

    #[test]
    fn test_outcome_log_appends_to_file() {
        let temp_path = env::temp_dir().join("admit_score_test_outcome_log.json");
        let _ = std::fs::remove_file(&temp_path);

        let log = OutcomeLog::new(temp_path.clone());
        log.append(&sample_student(), true).unwrap();
        log.append(&sample_student(), false).unwrap();

        let history = load_outcome_history(&temp_path).unwrap();
        assert_eq!(history.records.len(), 2);
        assert_eq!(history.admit_rate(), Some(0.5));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_memory_outcomes() {
        let store = MemoryOutcomes::new();
        store.append(&sample_student(), true).unwrap();
        assert_eq!(store.snapshot().records.len(), 1);
    }
}
