//! `singlish-e2e list`

use clap::Args;
use std::path::Path;

use super::{load_config, select_cases, CaseArgs, TargetArgs};
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub cases: CaseArgs,
}

pub fn execute(args: ListArgs, config_path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(config_path, &args.cases, &TargetArgs::default())?;
    let cases = select_cases(&config, &args.cases)?;
    output::print_cases(&cases, format);
    Ok(())
}
