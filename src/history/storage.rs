use anyhow::{ensure, Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::types::{OutcomeHistory, OUTCOME_HISTORY_VERSION};

/// ~/.config/admit-score/outcomes.json
pub fn get_outcomes_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("outcomes.json"))
}

/// Read recorded admission outcomes.
///
/// Nothing recorded yet (no file) is an empty history. A file written in
/// another format version is refused rather than reinterpreted.
pub fn load_outcome_history(path: &Path) -> Result<OutcomeHistory> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(OutcomeHistory::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read outcomes from {}", path.display()))
        }
    };

    let history: OutcomeHistory = serde_json::from_str(&content)
        .with_context(|| format!("Malformed outcome history in {}", path.display()))?;
    ensure!(
        history.version == OUTCOME_HISTORY_VERSION,
        "Outcome history {} has format version {}, expected {}",
        path.display(),
        history.version,
        OUTCOME_HISTORY_VERSION
    );

    Ok(history)
}

/// Replace the outcome file with `history`. Readers see either the old or
/// the new file, never a partial write.
pub fn save_outcome_history(path: &Path, history: &OutcomeHistory) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create outcomes directory {}", dir.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    serde_json::to_writer_pretty(&mut file, history)
        .with_context(|| format!("Failed to encode {} outcome records", history.records.len()))?;
    file.commit()
        .with_context(|| format!("Failed to write outcomes to {}", path.display()))
}
