pub mod audit;
pub mod config;
pub mod error;
pub mod history;
pub mod output;
pub mod profile;
pub mod scoring;
pub mod student;

pub use error::{ScoreError, ScoreOutcome};
