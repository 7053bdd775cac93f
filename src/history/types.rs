use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::student::Student;

/// On-disk format of the outcome history file
pub const OUTCOME_HISTORY_VERSION: u32 = 1;

/// One admission decision kept for future confidence calibration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutcomeRecord {
    pub student: Student,
    pub admitted: bool,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeHistory {
    pub version: u32,
    #[serde(default)]
    pub records: Vec<OutcomeRecord>,
}

impl Default for OutcomeHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeHistory {
    pub fn new() -> Self {
        Self {
            version: OUTCOME_HISTORY_VERSION,
            records: Vec::new(),
        }
    }

    pub fn append(&mut self, student: Student, admitted: bool) {
        self.records.push(OutcomeRecord {
            student,
            admitted,
            recorded_at: Utc::now(),
        });
    }

    /// Share of recorded students who were admitted, None when empty
    pub fn admit_rate(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let admitted = self.records.iter().filter(|r| r.admitted).count();
        Some(admitted as f64 / self.records.len() as f64)
    }
}
