mod commands;
mod logging;

use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, TaskArgs};
use dotenv::dotenv;
use refsweep_core::AppConfig;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let file_cfg = match refsweep_core::load_configuration() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::DedupePdfs(task)) => run_dedupe(task, &file_cfg),
        Some(Commands::CleanNotes(task)) => run_notes(task, &file_cfg),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", file_cfg);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_dedupe(task: TaskArgs, file_cfg: &AppConfig) -> anyhow::Result<()> {
    let cfg = task.into_run_config(file_cfg)?;
    let report = refsweep_core::run_pdf_dedupe(&cfg)?;

    println!("summary={}", report.summary_md.display());
    println!("exact={}", report.exact_csv.display());
    println!("suspicious={}", report.suspicious_csv.display());
    if let Some(deleted) = &report.deleted_csv {
        println!("deleted={}", deleted.display());
    }
    println!("{}", serde_json::to_string(&report.metrics)?);

    info!(
        "{} attachments scanned, {} delete candidates, {} suspicious",
        format!("{}", report.metrics.pdf_attachments_total).green(),
        format!("{}", report.metrics.exact_delete_candidates).red(),
        format!("{}", report.metrics.suspicious_rows).yellow(),
    );
    Ok(())
}

fn run_notes(task: TaskArgs, file_cfg: &AppConfig) -> anyhow::Result<()> {
    let cfg = task.into_run_config(file_cfg)?;
    let report = refsweep_core::run_note_cleanup(&cfg)?;

    println!("summary={}", report.summary_md.display());
    println!("candidates={}", report.candidates_csv.display());
    println!("suspicious={}", report.suspicious_csv.display());
    if let Some(deleted) = &report.deleted_csv {
        println!("deleted={}", deleted.display());
    }
    println!("{}", serde_json::to_string(&report.metrics)?);

    info!(
        "{} notes scanned, {} placeholder candidates, {} suspicious",
        format!("{}", report.metrics.notes_total).green(),
        format!("{}", report.metrics.candidate_placeholder_notes).red(),
        format!("{}", report.metrics.suspicious_notes).yellow(),
    );
    Ok(())
}
