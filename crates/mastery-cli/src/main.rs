//! Mastery CLI - command-line interface for mastery verification over a journal.

use clap::{Parser, Subcommand};
use mastery_core::{Dimension, LearnerId, Level};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod path;

use commands::{
    assign, dormancy, evaluate, gaps, log, record, reset, return_flow, rings, status, submit,
    verify,
};

#[derive(Parser)]
#[command(name = "mastery")]
#[command(about = "Mastery verification engine CLI")]
struct Cli {
    /// Engine configuration (TOML); defaults apply when absent
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a learner at a level (provisional)
    Assign {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Learner ID
        learner: LearnerId,
        /// Level to assign
        level: Level,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Submit a graded exercise result
    Submit {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Learner ID
        learner: LearnerId,
        /// Exercise result JSON file (or stdin if not provided)
        input: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Record pre-classified evidence
    Record {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Learner ID
        learner: LearnerId,
        /// Level the evidence counts toward
        level: Level,
        /// Dimension (foundation, breadth, depth, application)
        dimension: Dimension,
        /// Score
        #[arg(long, default_value_t = 1.0)]
        score: f64,
        /// Record a failed attempt
        #[arg(long)]
        failed: bool,
        /// Context tag (breadth)
        #[arg(long)]
        context_tag: Option<String>,
        /// Source exercise
        #[arg(long)]
        exercise: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run the promotion evaluator for one level
    Evaluate {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Learner ID
        learner: LearnerId,
        /// Level to evaluate
        level: Level,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show verification status rows
    Status {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Learner ID
        learner: LearnerId,
        /// Only this level
        #[arg(long)]
        level: Option<Level>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show progress rings for one level
    Rings {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Learner ID
        learner: LearnerId,
        /// Level to show
        level: Level,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show what is still missing for one level
    Gaps {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Learner ID
        learner: LearnerId,
        /// Level to inspect
        level: Level,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show recent evidence, newest first
    Log {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Learner ID
        learner: LearnerId,
        /// Only evidence recorded at this level
        #[arg(long)]
        level: Option<Level>,
        /// Maximum records to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check a learner for inactivity
    Dormancy {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Learner ID
        learner: LearnerId,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Bring a dormant learner back after a warmup
    Return {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Learner ID
        learner: LearnerId,
        /// The warmup was passed
        #[arg(long)]
        passed: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Remove a status row (evidence is kept)
    Reset {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Learner ID
        learner: LearnerId,
        /// Level to reset
        level: Level,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Verify all evidence IDs in a journal
    Verify {
        /// Journal file (.mvj)
        #[arg(long)]
        journal: String,
        /// Exit with error code if any verification fails
        #[arg(long)]
        strict: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MASTERY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Assign {
            journal,
            learner,
            level,
            json,
        } => assign::run(journal, config, learner, level, json),
        Commands::Submit {
            journal,
            learner,
            input,
            json,
        } => submit::run(journal, config, learner, input, json),
        Commands::Record {
            journal,
            learner,
            level,
            dimension,
            score,
            failed,
            context_tag,
            exercise,
            json,
        } => record::run(
            journal,
            config,
            record::Args {
                learner,
                level,
                dimension,
                score,
                passed: !failed,
                context_tag,
                exercise,
            },
            json,
        ),
        Commands::Evaluate {
            journal,
            learner,
            level,
            json,
        } => evaluate::run(journal, config, learner, level, json),
        Commands::Status {
            journal,
            learner,
            level,
            json,
        } => status::run(journal, config, learner, level, json),
        Commands::Rings {
            journal,
            learner,
            level,
            json,
        } => rings::run(journal, config, learner, level, json),
        Commands::Gaps {
            journal,
            learner,
            level,
            json,
        } => gaps::run(journal, config, learner, level, json),
        Commands::Log {
            journal,
            learner,
            level,
            limit,
            json,
        } => log::run(journal, config, learner, level, limit, json),
        Commands::Dormancy {
            journal,
            learner,
            json,
        } => dormancy::run(journal, config, learner, json),
        Commands::Return {
            journal,
            learner,
            passed,
            json,
        } => return_flow::run(journal, config, learner, passed, json),
        Commands::Reset {
            journal,
            learner,
            level,
            json,
        } => reset::run(journal, config, learner, level, json),
        Commands::Verify {
            journal,
            strict,
            json,
        } => verify::run(journal, strict, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
