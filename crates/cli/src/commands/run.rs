//! `singlish-e2e run`

use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use singlish_e2e::CaseRunner;

use super::{load_config, select_cases, CaseArgs, TargetArgs};
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub cases: CaseArgs,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Cases run concurrently
    #[arg(long, env = "SINGLISH_E2E_WORKERS")]
    pub workers: Option<usize>,

    /// Run every case this many times and flag disagreeing attempts
    #[arg(long)]
    pub repeat_each: Option<u32>,

    /// Skip the HTTP reachability check of the target
    #[arg(long)]
    pub skip_preflight: bool,

    /// Output directory for the JSON report
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Returns the process exit status
pub async fn execute(args: RunArgs, config_path: &Path, format: OutputFormat) -> anyhow::Result<i32> {
    let mut config = load_config(config_path, &args.cases, &args.target)?;
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(repeat_each) = args.repeat_each {
        config.repeat_each = repeat_each;
    }
    if args.skip_preflight {
        config.preflight = false;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }

    let cases = select_cases(&config, &args.cases)?;
    if cases.is_empty() {
        warn!("No cases selected");
        output::print_warning("No cases selected.");
        return Ok(0);
    }

    let runner = CaseRunner::from_config(&config)?;
    runner
        .driver()
        .check_installed()
        .context("node cannot load playwright")?;

    if config.preflight {
        config.target.probe().await?;
    } else {
        info!("Skipping target preflight");
    }

    let suite = runner.run(&cases).await;
    runner.write_results(&suite)?;

    output::print_suite(&suite, format);
    Ok(suite.exit_code())
}
