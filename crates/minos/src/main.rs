//! Minos - judge CLI for Arena
//!
//! Lists and shows problems from the built-in bank, runs candidate code
//! through a Charon engine and prints every result as JSON on stdout.
//! Logs go to stderr.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_common::{ArenaError, Language, ProblemId};
use charon::Engine;
use minos::{Config, LogFormat, Problem};

#[derive(Parser)]
#[command(name = "minos")]
#[command(about = "Judge code against the Arena problem bank", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every problem
    Problems,

    /// Show one problem
    Show {
        /// Problem id
        id: ProblemId,

        /// Only include starter code for this language
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Show a random problem
    Random {
        /// Only include starter code for this language
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Execute a source file once, without judging
    Exec {
        /// Source language (python, cpp, java)
        #[arg(short, long)]
        language: String,

        /// Source file
        #[arg(short, long)]
        file: PathBuf,

        /// File whose contents become the program's stdin
        #[arg(short, long)]
        stdin_file: Option<PathBuf>,
    },

    /// Run a source file against a problem's first test case
    Run {
        /// Problem id
        #[arg(short, long)]
        problem: ProblemId,

        /// Source language (python, cpp, java)
        #[arg(short, long)]
        language: String,

        /// Source file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Judge a source file against every test case of a problem
    Submit {
        /// Problem id
        #[arg(short, long)]
        problem: ProblemId,

        /// Source language (python, cpp, java)
        #[arg(short, long)]
        language: String,

        /// Source file
        #[arg(short, long)]
        file: PathBuf,

        /// Seconds the candidate spent on the problem
        #[arg(short, long, default_value = "0")]
        time_taken: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_tracing(config.log_format);

    let cli = Cli::parse();
    tracing::debug!(environment = %config.environment, "Configuration loaded");

    match dispatch(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(format: LogFormat) {
    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minos=info,charon=info".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

async fn dispatch(command: Commands, config: &Config) -> Result<ExitCode> {
    match command {
        Commands::Problems => {
            let summaries: Vec<_> = minos::get_all_problems().iter().map(Problem::summary).collect();
            print_json(&summaries)?;
        }

        Commands::Show { id, language } => {
            let problem = minos::get_problem(id).ok_or(ArenaError::ProblemNotFound(id))?;
            print_problem(problem, language.as_deref())?;
        }

        Commands::Random { language } => {
            print_problem(minos::get_random_problem(), language.as_deref())?;
        }

        Commands::Exec {
            language,
            file,
            stdin_file,
        } => {
            let code = read_source(&file)?;
            let stdin = match stdin_file {
                Some(path) => read_source(&path)?,
                None => String::new(),
            };

            let mut engine = Engine::with_config(config.engine.clone())?;
            let result = engine.execute(&code, &language, &stdin).await;
            engine.cleanup();
            print_json(&result?)?;
        }

        Commands::Run {
            problem,
            language,
            file,
        } => {
            let problem = minos::get_problem(problem).ok_or(ArenaError::ProblemNotFound(problem))?;
            let code = read_source(&file)?;

            let mut engine = Engine::with_config(config.engine.clone())?;
            let run = minos::run_sample(&engine, &code, &language, problem).await;
            engine.cleanup();
            print_json(&run?)?;
        }

        Commands::Submit {
            problem,
            language,
            file,
            time_taken,
        } => {
            let problem = minos::get_problem(problem).ok_or(ArenaError::ProblemNotFound(problem))?;
            let code = read_source(&file)?;

            let engine = Engine::with_config(config.engine.clone())?;
            let submission =
                minos::judge_submission(engine, &code, &language, problem, time_taken).await?;

            tracing::info!(
                submission_id = %submission.id,
                problem_id = submission.problem_id,
                verdict = %submission.report.verdict,
                "Submission judged"
            );
            print_json(&submission)?;

            if !submission.all_passed() {
                return Ok(ExitCode::from(1));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a problem, narrowing its starter code to one language when asked
fn print_problem(problem: &Problem, language: Option<&str>) -> Result<()> {
    let mut value = serde_json::to_value(problem)?;

    if let Some(tag) = language {
        let language: Language = tag.parse()?;
        value["starter_code"] = match problem.starter_code(language) {
            Some(code) => serde_json::Value::String(code.to_string()),
            None => serde_json::Value::Null,
        };
    }

    print_json(&value)
}
