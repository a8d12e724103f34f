//! `singlish-e2e check`

use clap::Args;
use std::path::Path;

use singlish_e2e::PlaywrightDriver;

use super::{load_config, CaseArgs, TargetArgs};
use crate::output;

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub async fn execute(args: CheckArgs, config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path, &CaseArgs::default(), &args.target)?;

    let driver = PlaywrightDriver::new(config.playwright.clone(), config.target.clone())?;
    driver.check_installed()?;
    output::print_success(&format!(
        "{} can load playwright",
        config.playwright.node_binary.display()
    ));

    config.target.probe().await?;
    output::print_success(&format!("{} is reachable", config.target.url));
    Ok(())
}
