//! Generate operation - runs a target's generators against the API model.

use std::{path::PathBuf, sync::Arc};

use eyre::{Context, Result};
use tracing::info;
use vrap_codegen::{
    CoreCodeGenerator, GenerationOptions, GeneratorSet, RenderFailurePolicy, UnitFailure,
    generation::build_metadata,
};
use vrap_core::FileDataSink;
use vrap_manifest::{Manifest, RenderFailures};
use vrap_model::{Api, ApiModel};

use crate::{
    reports::{GenerateReport, GenerationResult, PreviewResult, WrittenResult},
    target::TargetSupport,
};

/// Options for the generate operation, after command line overrides.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Destination directory.
    pub output_dir: PathBuf,
    pub build_id: String,
    pub concurrency: usize,
    /// Whether to enumerate without writing.
    pub dry_run: bool,
}

/// Execute the generate operation.
pub async fn generate(
    manifest: &Manifest,
    api: &Api,
    target: TargetSupport,
    opts: GenerateOptions,
) -> Result<GenerateReport> {
    let model = Arc::new(ApiModel::resolve(api));
    let generators = target.generator_set(&model, &manifest.packages);
    let options = GenerationOptions::default()
        .with_concurrency(opts.concurrency)
        .with_build_id(opts.build_id.as_str())
        .with_render_failures(render_failure_policy(manifest.codegen.render_failures))
        .with_collision_detection(manifest.codegen.detect_collisions);

    info!(
        generator = %target.target(),
        output = %opts.output_dir.display(),
        dry_run = opts.dry_run,
        "generating"
    );

    let result = if opts.dry_run {
        GenerationResult::Preview(preview(generators, model, options).await?)
    } else {
        let sink = Arc::new(FileDataSink::new(opts.output_dir.clone()));
        let report = CoreCodeGenerator::new(sink, generators, model, options)
            .generate()
            .await;
        GenerationResult::Written(WrittenResult {
            output_dir: opts.output_dir,
            report,
        })
    };

    Ok(GenerateReport {
        title: api.title.clone(),
        target: target.target(),
        description: target.description.to_string(),
        result,
    })
}

fn render_failure_policy(setting: RenderFailures) -> RenderFailurePolicy {
    match setting {
        RenderFailures::Isolate => RenderFailurePolicy::Isolate,
        RenderFailures::Abort => RenderFailurePolicy::Abort,
    }
}

/// Enumerate every unit in generation order without writing anything.
async fn preview(
    generators: GeneratorSet,
    model: Arc<ApiModel>,
    options: GenerationOptions,
) -> Result<PreviewResult> {
    tokio::task::spawn_blocking(move || {
        let mut result = PreviewResult {
            files: vec![build_metadata(&options.build_id).relative_path().to_string()],
            failures: Vec::new(),
        };
        for unit in generators.units(&model) {
            match unit {
                Ok(file) => result.files.push(file.relative_path().to_string()),
                Err(failure) => {
                    result.failures.push(UnitFailure::from(failure));
                    if options.render_failures == RenderFailurePolicy::Abort {
                        break;
                    }
                }
            }
        }
        result
    })
    .await
    .wrap_err("Failed to enumerate generated files")
}

#[cfg(test)]
mod tests {
    use vrap_manifest::Target;

    use super::*;

    const API: &str = r#"
        title = "Shop"

        [[types]]
        kind = "object"
        name = "Cart"
        package = "cart"

        [[types]]
        kind = "string"
        name = "CartState"
        package = "cart"
        enum = ["Active"]

        [[resources]]
        relative_uri = "/carts"

        [[resources.methods]]
        method = "get"

        [[resources.methods.responses]]
        status = 200
        body = "Cart"
    "#;

    fn manifest(target: &str) -> Manifest {
        format!("[codegen]\ntarget = \"{}\"\n\n[api]\npath = \"api.toml\"\n", target)
            .parse()
            .unwrap()
    }

    fn options(output_dir: PathBuf, dry_run: bool) -> GenerateOptions {
        GenerateOptions {
            output_dir,
            build_id: "b1".to_string(),
            concurrency: 4,
            dry_run,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_generate_python() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("gen");
        let api: Api = toml::from_str(API).unwrap();

        let report = generate(
            &manifest("python"),
            &api,
            TargetSupport::get(Target::Python),
            options(out.clone(), false),
        )
        .await
        .unwrap();

        assert!(report.is_success());
        assert_eq!(report.target, Target::Python);
        assert_eq!(
            std::fs::read_to_string(out.join("gen.properties")).unwrap(),
            "hash=b1"
        );
        assert!(out.join("vrap/models/cart.py").is_file());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("gen");
        let api: Api = toml::from_str(API).unwrap();

        let report = generate(
            &manifest("ramldoc"),
            &api,
            TargetSupport::get(Target::RamlDoc),
            options(out.clone(), true),
        )
        .await
        .unwrap();

        assert!(!out.exists());
        let GenerationResult::Preview(preview) = &report.result else {
            panic!("expected a preview");
        };
        assert_eq!(preview.files[0], "gen.properties");
        assert!(preview.files.contains(&"types/cart/Cart.raml".to_string()));
        assert!(preview.files.contains(&"api.raml".to_string()));
        assert!(preview.failures.is_empty());
    }
}
