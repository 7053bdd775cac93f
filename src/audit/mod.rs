pub mod log;

pub use log::{save_audit_log, AuditEntry, AuditLog, AuditSink, NullSink};
