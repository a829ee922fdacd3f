//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the prepare/process pipelines
//! - prints summaries
//! - writes the GPS input file and optional exports

use clap::Parser;

use crate::cli::{Cli, Command, PrepareArgs, ProcessArgs};
use crate::domain::{PrepareConfig, ProcessConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `pgps` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Prepare(args) => handle_prepare(args),
        Command::Process(args) => handle_process(args),
    }
}

fn handle_prepare(args: PrepareArgs) -> Result<(), AppError> {
    let config = prepare_config_from_args(&args);
    let run = pipeline::run_prepare(&config)?;

    crate::io::export::write_gps_input(&config.gps_out, &run.gps_text)?;

    if let Some(path) = &config.export {
        crate::io::export::write_windowed_csv(path, &run.windowed)?;
    }
    if let Some(path) = &config.report_json {
        crate::io::export::write_resolution_json(path, &run.outcome)?;
    }

    println!(
        "{}",
        crate::report::format_prepare_summary(&run.ingest, &run.outcome, &run.windowed, &config)
    );

    Ok(())
}

fn handle_process(args: ProcessArgs) -> Result<(), AppError> {
    let config = process_config_from_args(&args);
    let run = pipeline::run_process(&config)?;

    if let Some(path) = &config.export {
        crate::io::export::write_scored_csv(path, &run.filtered)?;
    }

    println!(
        "{}",
        crate::report::format_process_summary(
            run.normalized.len(),
            run.skipped,
            &run.filtered,
            &run.group_counts,
            &run.subgroup_counts,
            &config,
        )
    );

    Ok(())
}

pub fn prepare_config_from_args(args: &PrepareArgs) -> PrepareConfig {
    PrepareConfig {
        input: args.input.clone(),
        gps_out: args.gps_out.clone(),
        export: args.export.clone(),
        report_json: args.report_json.clone(),
        batch_size: args.batch_size,
        flank: args.flank,
        timeout_secs: args.timeout_secs,
    }
}

pub fn process_config_from_args(args: &ProcessArgs) -> ProcessConfig {
    ProcessConfig {
        inputs: args.input.clone(),
        abs_cutoff: args.abs_cutoff,
        rel_cutoff: args.rel_cutoff,
        top_k: args.top_k,
        export: args.export.clone(),
    }
}
