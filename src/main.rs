use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use admit_score::audit::{save_audit_log, AuditLog};
use admit_score::history::{get_outcomes_path, OutcomeLog};
use admit_score::profile::{build_sources, ProfileLookup, ProfileResolver, StaticProfiles};
use admit_score::scoring::{validate_institution, ScoreAggregator};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_SCORING: i32 = 5;
const EXIT_IO: i32 = 6;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one or more student files and rank them
    Score {
        /// Student YAML files
        #[arg(required = true)]
        students: Vec<PathBuf>,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Resolve and print a school profile
    Profile {
        school_id: String,
    },
    /// Validate the configuration and exit
    Check,
    /// Record an admission outcome for later calibration
    Record {
        /// Student YAML file
        student: PathBuf,

        /// Whether the student was admitted
        #[arg(long, action = clap::ArgAction::Set)]
        admitted: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "admit-score")]
#[command(about = "Admissions desirability scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/admit-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match admit_score::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate institution config at startup
    let institution = config.institution.clone().unwrap_or_default();
    if let Err(errors) = validate_institution(&institution) {
        eprintln!("Institution config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let weight_sum = institution.weights.sum();
    if (weight_sum - 1.0).abs() > 1e-9 {
        tracing::info!(weight_sum, "component weights do not sum to 1.0; scores are scaled");
    }

    // Static profiles replace the resolver entirely when configured
    let lookup: Arc<dyn ProfileLookup> = match config.school_profiles {
        Some(ref profiles) => {
            tracing::info!(count = profiles.len(), "using static school profiles");
            Arc::new(profiles.iter().cloned().collect::<StaticProfiles>())
        }
        None => {
            let sources = match build_sources(&config.sources.clone().unwrap_or_default()) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Data source error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            tracing::info!(count = sources.len(), "resolving school profiles through data sources");
            Arc::new(ProfileResolver::new(sources))
        }
    };

    let audit = AuditLog::new();
    let aggregator = ScoreAggregator::new(institution, lookup.clone(), Arc::new(audit.clone()));

    match cli.command {
        Commands::Score { students, tsv } => {
            let mut scored = Vec::new();
            let mut failures = 0;

            for path in &students {
                let student = match admit_score::student::load_student(path) {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_IO);
                    }
                };

                match aggregator.score(&student) {
                    Ok(result) => scored.push((path.display().to_string(), student, result)),
                    Err(e) => {
                        // Keep scoring the rest; the exit code reports the failure
                        eprintln!("Scoring failed for {}: {}", path.display(), e);
                        failures += 1;
                    }
                }
            }

            // Highest score first
            scored.sort_by(|a, b| {
                b.2.final_score
                    .partial_cmp(&a.2.final_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let rows: Vec<admit_score::output::ScoredStudent> = scored
                .iter()
                .map(|(label, student, result)| admit_score::output::ScoredStudent {
                    label,
                    student,
                    result,
                })
                .collect();

            let use_colors = admit_score::output::should_use_colors();
            if tsv {
                println!("{}", admit_score::output::format_tsv(&rows));
            } else if cli.verbose && !rows.is_empty() {
                for row in &rows {
                    println!("{}", admit_score::output::format_result_detail(row, use_colors));
                    println!();
                }
            } else {
                println!("{}", admit_score::output::format_scored_table(&rows, use_colors));
            }

            if let Some(ref path) = config.audit_log {
                if let Err(e) = save_audit_log(path, &audit) {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_IO);
                }
                tracing::info!(path = %path.display(), entries = audit.len(), "audit log written");
            }

            if failures > 0 {
                std::process::exit(EXIT_SCORING);
            }
        }
        Commands::Profile { school_id } => match lookup.lookup(&school_id) {
            Some(profile) => {
                let use_colors = admit_score::output::should_use_colors();
                println!("{}", admit_score::output::format_profile(&profile, use_colors));
            }
            None => {
                eprintln!("No school profile for '{}' in configured school_profiles", school_id);
                std::process::exit(EXIT_CONFIG);
            }
        },
        Commands::Check => {
            let institution = aggregator.config();
            println!(
                "Configuration OK: {} mission metrics, thresholds {}/{}/{}",
                institution.mission_metrics.len(),
                institution.thresholds.safety,
                institution.thresholds.target,
                institution.thresholds.reach
            );
        }
        Commands::Record { student, admitted } => {
            let outcomes_path = match config.outcomes.clone().map_or_else(get_outcomes_path, Ok) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let record = match admit_score::student::load_student(&student) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_IO);
                }
            };

            let aggregator =
                aggregator.with_outcome_store(Arc::new(OutcomeLog::new(outcomes_path.clone())));
            if let Err(e) = aggregator.record_outcome(&record, admitted) {
                eprintln!("Failed to record outcome: {:#}", e);
                std::process::exit(EXIT_IO);
            }

            println!(
                "Recorded {} for {} in {}",
                if admitted { "admission" } else { "rejection" },
                student.display(),
                outcomes_path.display()
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
