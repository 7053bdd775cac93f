pub mod formatter;

pub use formatter::{
    format_profile, format_result_detail, format_score, format_scored_table, format_tsv,
    should_use_colors, ScoredStudent,
};
