use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::profile::SchoolProfile;
use crate::scoring::{Category, ScoreResult};
use crate::student::Student;

/// A scored student for display. `label` is usually the input file name.
pub struct ScoredStudent<'a> {
    pub label: &'a str,
    pub student: &'a Student,
    pub result: &'a ScoreResult,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Scores are shown with three decimals ("0.946", "-0.120")
pub fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

fn paint_category(category: Category, use_colors: bool) -> String {
    let label = category.to_string();
    if !use_colors {
        return label;
    }
    match category {
        Category::Safety => label.green().bold().to_string(),
        Category::Target => label.cyan().to_string(),
        Category::Reach => label.yellow().to_string(),
        Category::BelowThreshold => label.red().to_string(),
    }
}

/// Format students as a ranked table: Index, Score, Category, School, Label
/// No headers (minimal format)
pub fn format_scored_table(students: &[ScoredStudent], use_colors: bool) -> String {
    if students.is_empty() {
        return "No students scored.".to_string();
    }

    students
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>7}", format_score(scored.result.final_score));
            // Pad outside the color codes so columns stay aligned
            let padding = " ".repeat(15usize.saturating_sub(scored.result.category.to_string().len()));
            let category = format!("{}{}", paint_category(scored.result.category, use_colors), padding);

            if use_colors {
                format!(
                    "{} {}  {}  {}  {}",
                    index_str.dimmed(),
                    score_str.bold(),
                    category,
                    scored.student.school_id().cyan(),
                    scored.label
                )
            } else {
                format!(
                    "{} {}  {}  {}  {}",
                    index_str,
                    score_str,
                    category,
                    scored.student.school_id(),
                    scored.label
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single result with its component breakdown (for verbose mode)
pub fn format_result_detail(scored: &ScoredStudent, use_colors: bool) -> String {
    let r = scored.result;
    let c = &r.component_scores;
    let title = if use_colors {
        scored.label.bold().to_string()
    } else {
        scored.label.to_string()
    };

    format!(
        "{}\n  School: {}\n  Final Score: {}\n  Confidence: {}\n  Category: {}\n  Components:\n    academic: {}\n    contributions: {}\n    mission_fit: {}",
        title,
        scored.student.school_id(),
        format_score(r.final_score),
        format_score(r.confidence),
        paint_category(r.category, use_colors),
        format_score(c.academic),
        format_score(c.contributions),
        format_score(c.mission_fit),
    )
}

/// Format results as tab-separated values for scripting
/// Columns: label, school, final_score, confidence, category, academic,
/// contributions, mission_fit (no headers, no colors)
pub fn format_tsv(students: &[ScoredStudent]) -> String {
    students
        .iter()
        .map(|s| {
            let r = s.result;
            format!(
                "{}\t{}\t{:.4}\t{:.4}\t{}\t{:.4}\t{:.4}\t{:.4}",
                s.label,
                s.student.school_id(),
                r.final_score,
                r.confidence,
                r.category,
                r.component_scores.academic,
                r.component_scores.contributions,
                r.component_scores.mission_fit
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn opt_f64(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// Format a school profile with multi-line output
pub fn format_profile(profile: &SchoolProfile, use_colors: bool) -> String {
    let name = if use_colors {
        profile.name.bold().to_string()
    } else {
        profile.name.clone()
    };

    format!(
        "{} ({})\n  GPA mean: {}\n  GPA std: {}\n  Competitiveness: {:.2}\n  AP courses: {}\n  Source: {}",
        name,
        profile.id,
        opt_f64(profile.gpa_mean),
        opt_f64(profile.gpa_std),
        profile.competitiveness(),
        profile
            .ap_courses
            .map_or_else(|| "-".to_string(), |n| n.to_string()),
        profile.data_source
    )
}
