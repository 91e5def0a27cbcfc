use std::{path::PathBuf, process::ExitCode};

use clap::Args;
use eyre::{Context, Result};
use vrap_manifest::VrapToml;

use super::UnwrapOrExit;
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
    target::TargetSupport,
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to vrap.toml (defaults to ./vrap.toml)
    #[arg(short, long, default_value = "vrap.toml")]
    pub config: PathBuf,

    /// Output directory (overrides vrap.toml setting)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Build id recorded in gen.properties (overrides vrap.toml setting)
    #[arg(long)]
    pub build_id: Option<String>,

    /// Maximum number of concurrent writes (overrides vrap.toml setting)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: Option<u64>,

    /// List the files that would be generated without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with an error if any unit failed
    #[arg(long)]
    pub strict: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<ExitCode> {
        let vrap_toml = VrapToml::open(&self.config).unwrap_or_exit();
        let api = vrap_toml.load_api().unwrap_or_exit();
        let codegen = &vrap_toml.manifest().codegen;

        let opts = GenerateOptions {
            output_dir: self.output_dir(&vrap_toml).unwrap_or_exit(),
            build_id: self
                .build_id
                .clone()
                .unwrap_or_else(|| codegen.build_id().to_string()),
            concurrency: self
                .concurrency
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(codegen.concurrency),
            dry_run: self.dry_run,
        };
        let target = TargetSupport::get(codegen.target);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .wrap_err("Failed to start the async runtime")?;
        let report = runtime.block_on(ops::generate(vrap_toml.manifest(), &api, target, opts))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.render(&mut TerminalOutput::new());
        }

        if self.strict && !report.is_success() {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }

    /// Resolve the output directory, applying the same safety check to an
    /// override as to the configured value.
    fn output_dir(&self, vrap_toml: &VrapToml) -> vrap_manifest::Result<PathBuf> {
        let dir = self
            .output
            .clone()
            .unwrap_or_else(|| vrap_toml.output_dir());
        vrap_toml.check_output_dir(&dir)?;
        Ok(dir)
    }
}
