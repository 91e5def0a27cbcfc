use std::{path::PathBuf, process::ExitCode};

use clap::Args;
use eyre::Result;
use vrap_manifest::VrapToml;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to vrap.toml (defaults to ./vrap.toml)
    #[arg(short, long, default_value = "vrap.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<ExitCode> {
        let vrap_toml = VrapToml::open(&self.config).unwrap_or_exit();
        let api = vrap_toml.load_api().unwrap_or_exit();

        let report = ops::check(&vrap_toml, &api);
        report.render(&mut TerminalOutput::new());

        Ok(ExitCode::SUCCESS)
    }
}
