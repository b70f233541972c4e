use mutant_campaign::config::{self, CampaignConfig};
use mutant_campaign::executor::Executor;
use mutant_campaign::mutants::ResultLog;
use mutant_campaign::operators::Catalog;
use mutant_campaign::{output, planner, safety, state, MutationError};

use std::path::{Path, PathBuf};
use std::process;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mutant-campaign",
    version,
    about = "Mutation testing campaigns for JavaScript and TypeScript"
)]
struct Cli {
    /// Log every plan and mutant diff to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover mutation sites and write the plan file
    Plan {
        /// Source files to plan
        files: Vec<Utf8PathBuf>,
        /// Read additional source paths from a file, one per line
        #[arg(long)]
        files_from: Option<PathBuf>,
        /// Plan file to write
        #[arg(short, long, env = "MUTATOR_PLAN_FILE", default_value = config::DEFAULT_PLAN_FILE)]
        out: PathBuf,
        /// Output JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
    /// Apply every plan in turn and run the test suite against it
    Run {
        /// Plan file to execute
        #[arg(short, long, env = "MUTATOR_PLAN_FILE", default_value = config::DEFAULT_PLAN_FILE)]
        plans: PathBuf,
        /// Directory for kill records and debug copies
        #[arg(long, env = "MUTATOR_LOG_DIR", default_value = config::DEFAULT_LOG_DIR)]
        log_dir: PathBuf,
        /// Mochawesome report written by the test command
        #[arg(long, env = "MUTATOR_REPORT", default_value = config::DEFAULT_REPORT_PATH)]
        report: PathBuf,
        /// Shell command that builds and tests the project
        #[arg(long, env = "MUTATOR_TEST_CMD", default_value = config::DEFAULT_TEST_CMD)]
        test_cmd: String,
        /// Directory the test command runs in
        #[arg(long, default_value = ".")]
        working_dir: PathBuf,
        /// Where the campaign summary is saved
        #[arg(long, default_value = config::DEFAULT_STATE_FILE)]
        state_file: PathBuf,
        /// Save each mutant to the log dir instead of running tests
        #[arg(long)]
        debug: bool,
        /// Output JSON instead of human-readable text
        #[arg(long)]
        json: bool,
        /// Exit code only, no output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Summary of the last campaign
    Status {
        #[arg(long, default_value = config::DEFAULT_STATE_FILE)]
        state_file: PathBuf,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// List the mutation operators with their plan indices
    Operators {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Plan {
            files,
            files_from,
            out,
            json,
        } => cmd_plan(files, files_from, &out, json),
        Commands::Run {
            plans,
            log_dir,
            report,
            test_cmd,
            working_dir,
            state_file,
            debug,
            json,
            quiet,
        } => {
            let config = CampaignConfig {
                plan_file: plans,
                log_dir,
                report_path: report,
                test_cmd,
                working_dir,
                state_file,
                debug,
            };
            cmd_run(&config, json, quiet)
        }
        Commands::Status { state_file, json } => cmd_status(&state_file, json),
        Commands::Operators { json } => cmd_operators(json),
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("MUTATOR_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{}", json),
        Err(e) => output::print_error(&format!("Failed to serialize output: {}", e)),
    }
}

fn cmd_plan(
    mut files: Vec<Utf8PathBuf>,
    files_from: Option<PathBuf>,
    out: &Path,
    json_mode: bool,
) -> i32 {
    if let Some(list) = files_from {
        match planner::read_file_list(&list) {
            Ok(more) => files.extend(more),
            Err(e) => {
                output::print_error(&format!("Failed to read {}: {}", list.display(), e));
                return 2;
            }
        }
    }

    let catalog = Catalog::standard();
    let plans = match planner::plan(&files, &catalog) {
        Ok(plans) => plans,
        Err(e @ MutationError::InvalidInput(_)) => {
            output::print_error(&format!("{}. Pass paths or --files-from <list>.", e));
            return 2;
        }
        Err(e) => {
            output::print_error(&format!("Planning failed: {}", e));
            return 2;
        }
    };
    if let Err(e) = planner::write_plans(out, &plans) {
        output::print_error(&format!("Failed to write {}: {}", out.display(), e));
        return 2;
    }

    if json_mode {
        print_json(&plans);
    } else {
        output::print_plan_summary(&plans, &catalog, out);
    }
    0
}

fn cmd_run(config: &CampaignConfig, json_mode: bool, quiet: bool) -> i32 {
    let plans = match planner::read_plans(&config.plan_file) {
        Ok(plans) => plans,
        Err(e) => {
            output::print_error(&format!(
                "Failed to read plans from {}: {}. Run `mutant-campaign plan` first.",
                config.plan_file.display(),
                e
            ));
            return 2;
        }
    };

    match safety::recover_interrupted(plans.iter().map(|p| p.filepath.as_std_path())) {
        Ok(restored) if !restored.is_empty() => {
            let names: Vec<String> = restored.iter().map(|p| p.display().to_string()).collect();
            output::print_error(&format!(
                "Recovered {} from a previously interrupted run. Re-run to continue.",
                names.join(", ")
            ));
            return 3;
        }
        Ok(_) => {}
        Err(e) => {
            output::print_error(&format!("Failed to recover an interrupted run: {}", e));
            return 3;
        }
    }

    let catalog = Catalog::standard();
    let mut executor = Executor::new(&catalog, config.harness(), ResultLog::new(&config.log_dir))
        .with_mode(config.mode());
    let summary = match executor.run(&plans) {
        Ok(summary) => summary,
        Err(e @ MutationError::Restore { .. }) => {
            output::print_error(&format!("{}. The backup next to the file holds the original.", e));
            return 3;
        }
        Err(e) => {
            output::print_error(&format!("Campaign failed: {}", e));
            return 2;
        }
    };

    if let Err(e) = state::save_to_path(&summary, &config.state_file) {
        warn!(path = %config.state_file.display(), error = %e, "failed to save campaign state");
    }

    let code = if summary.has_survivors() { 1 } else { 0 };
    if quiet {
        return code;
    }
    if json_mode {
        print_json(&summary);
    } else {
        output::print_campaign_result(&summary);
    }
    code
}

fn cmd_status(state_file: &Path, json_mode: bool) -> i32 {
    let summary = match state::load_from_path(state_file) {
        Some(summary) => summary,
        None => {
            output::print_error("No previous campaign found. Run `mutant-campaign run` first.");
            return 2;
        }
    };
    if json_mode {
        print_json(&summary);
    } else {
        output::print_status(&summary);
    }
    0
}

#[derive(Serialize)]
struct OperatorEntry<'a> {
    index: usize,
    name: &'a str,
}

fn cmd_operators(json_mode: bool) -> i32 {
    let catalog = Catalog::standard();
    if json_mode {
        let entries: Vec<OperatorEntry> = catalog
            .iter()
            .map(|(index, op)| OperatorEntry {
                index,
                name: op.name,
            })
            .collect();
        print_json(&entries);
    } else {
        output::print_operators(&catalog);
    }
    0
}
