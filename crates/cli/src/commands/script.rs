//! `singlish-e2e script <id>`

use clap::Args;
use std::path::{Path, PathBuf};

use singlish_e2e::{E2eError, PlaywrightDriver};

use super::{load_config, select_cases, CaseArgs, TargetArgs};

#[derive(Args)]
pub struct ScriptArgs {
    /// Case id
    pub id: String,

    /// Directory of extra YAML case files
    #[arg(long)]
    pub cases: Option<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn execute(args: ScriptArgs, config_path: &Path) -> anyhow::Result<()> {
    let case_args = CaseArgs {
        cases: args.cases,
        ids: vec![args.id.clone()],
        ..Default::default()
    };
    let config = load_config(config_path, &case_args, &args.target)?;

    let case = select_cases(&config, &case_args)?
        .into_iter()
        .next()
        .ok_or(E2eError::CaseNotFound(args.id))?;

    let driver = PlaywrightDriver::new(config.playwright, config.target)?;
    println!("{}", driver.build_script(&case)?);
    Ok(())
}
