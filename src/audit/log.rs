use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A single traceability record emitted while scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub metadata: Value,
}

impl AuditEntry {
    pub fn new(action: &str, metadata: Value) -> Self {
        Self {
            timestamp: Utc::now(),
            action: action.to_string(),
            metadata,
        }
    }
}

/// Destination for audit entries. Implementations must not fail outward.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry);
}

/// Sink that drops everything, for callers that don't need a trail
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AuditSink for NullSink {
    fn record(&self, _entry: AuditEntry) {}
}

/// In-memory append-only audit log.
///
/// Cloning shares the underlying log, so one handle can be passed into the
/// aggregator while the caller keeps another to read or save entries.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    inner: Arc<Mutex<Vec<AuditEntry>>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries in insertion order
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries with the given action tag, in insertion order
    pub fn with_action(&self, action: &str) -> Vec<AuditEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.action == action)
            .collect()
    }
}

impl AuditSink for AuditLog {
    fn record(&self, entry: AuditEntry) {
        // A poisoned lock still holds a valid Vec; keep appending
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }
}

/// Write the audit log to a JSON file atomically
pub fn save_audit_log(path: &Path, log: &AuditLog) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, &log.entries())
        .context("Failed to serialize audit log")?;

    file.commit().context("Failed to save audit log")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::env;
    use std::thread;

    #[test]
    fn test_record_preserves_order() {
        let log = AuditLog::new();
        log.record(AuditEntry::new("first", json!({})));
        log.record(AuditEntry::new("second", json!({"n": 2})));

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "first");
        assert_eq!(entries[1].action, "second");
        assert_eq!(entries[1].metadata["n"], 2);
    }

    #[test]
    fn test_clones_share_entries() {
        let log = AuditLog::new();
        let handle = log.clone();
        handle.record(AuditEntry::new("shared", json!({})));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_concurrent_appends_not_lost() {
        let log = AuditLog::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = log.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        log.record(AuditEntry::new("tick", json!({"thread": t, "i": i})));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(log.len(), 400);
    }

    #[test]
    fn test_with_action_filters() {
        let log = AuditLog::new();
        log.record(AuditEntry::new("a", json!({})));
        log.record(AuditEntry::new("b", json!({})));
        log.record(AuditEntry::new("a", json!({})));
        assert_eq!(log.with_action("a").len(), 2);
        assert!(log.with_action("c").is_empty());
    }

    #[test]
    fn test_save_audit_log_writes_json() {
        let temp_path = env::temp_dir().join("admit_score_test_audit.json");
        let _ = std::fs::remove_file(&temp_path);

        let log = AuditLog::new();
        log.record(AuditEntry::new("weights_updated", json!({"academic": 0.5})));
        save_audit_log(&temp_path, &log).unwrap();

        let content = std::fs::read_to_string(&temp_path).unwrap();
        let parsed: Vec<AuditEntry> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].action, "weights_updated");

        let _ = std::fs::remove_file(&temp_path);
    }
}
