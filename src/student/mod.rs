pub mod types;

pub use types::{AcademicRecord, Contributions, SchoolContext, Student};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load a student record from a YAML file
pub fn load_student(path: &Path) -> Result<Student> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read student file at {}", path.display()))?;

    let student: Student = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse student: invalid YAML in {}", path.display()))?;

    Ok(student)
}
