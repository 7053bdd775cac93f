/// Errors that abort scoring for a single student.
///
/// Both variants point at a misconfigured institution or bad reference data,
/// never at missing student data, so they are surfaced instead of defaulted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("data quality error: {0}")]
    DataQuality(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ScoreOutcome<T> = std::result::Result<T, ScoreError>;
