//! The generation coordinator.
//!
//! [`CoreCodeGenerator::generate`] runs one build in three strictly ordered
//! phases:
//!
//! 1. `clean` the sink (a failure is logged and generation proceeds)
//! 2. enumerate every unit and write it through the bounded write stage
//! 3. `post_clean` the sink, whatever the writes did
//!
//! Enumeration renders on a blocking thread and hands files to the write
//! stage through a bounded channel, so a slow sink throttles rendering and
//! only a bounded number of rendered files is held in memory.

use std::{collections::HashSet, sync::Arc};

use tokio::sync::mpsc;
use tracing::{error, info, warn};
use vrap_core::{DataSink, TemplateFile};
use vrap_model::ApiModel;

use crate::{
    generation::{GeneratorSet, RenderFailure, build_metadata},
    report::{GenerationReport, UnitFailure},
    write_stage,
};

/// Default number of concurrent writes.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Default build id recorded in the metadata file.
pub const DEFAULT_BUILD_ID: &str = "unknown";

/// Handling of renderer and producer failures during enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFailurePolicy {
    /// Record the failure and keep enumerating.
    #[default]
    Isolate,
    /// Stop enumerating at the first failure. Units enumerated so far are
    /// still written and post-clean still runs.
    Abort,
}

/// Settings for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Maximum number of writes in flight. Values below 1 are treated as 1.
    pub concurrency: usize,
    /// Recorded verbatim in `gen.properties`.
    pub build_id: String,
    pub render_failures: RenderFailurePolicy,
    /// Warn about relative paths enumerated more than once.
    pub detect_collisions: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            build_id: DEFAULT_BUILD_ID.to_string(),
            render_failures: RenderFailurePolicy::default(),
            detect_collisions: false,
        }
    }
}

impl GenerationOptions {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_build_id(mut self, build_id: impl Into<String>) -> Self {
        self.build_id = build_id.into();
        self
    }

    pub fn with_render_failures(mut self, policy: RenderFailurePolicy) -> Self {
        self.render_failures = policy;
        self
    }

    pub fn with_collision_detection(mut self, enabled: bool) -> Self {
        self.detect_collisions = enabled;
        self
    }
}

/// Writes every unit of a [`GeneratorSet`] to a [`DataSink`].
pub struct CoreCodeGenerator {
    sink: Arc<dyn DataSink>,
    generators: Arc<GeneratorSet>,
    model: Arc<ApiModel>,
    options: GenerationOptions,
}

impl CoreCodeGenerator {
    pub fn new(
        sink: Arc<dyn DataSink>,
        generators: impl Into<Arc<GeneratorSet>>,
        model: impl Into<Arc<ApiModel>>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            sink,
            generators: generators.into(),
            model: model.into(),
            options,
        }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Run the build.
    ///
    /// Never fails: every failure is logged and recorded in the returned
    /// report. Returns after post-clean has run.
    pub async fn generate(&self) -> GenerationReport {
        let clean_succeeded = self.sink.clean().await;
        if clean_succeeded {
            info!("data sink cleanup successful");
        } else {
            warn!("data sink cleanup unsuccessful, generating into a possibly dirty destination");
        }

        let cap = self.options.concurrency.max(1);
        let (tx, rx) = mpsc::channel(cap);
        let enumeration = tokio::task::spawn_blocking({
            let generators = Arc::clone(&self.generators);
            let model = Arc::clone(&self.model);
            let options = self.options.clone();
            move || enumerate(&generators, &model, &options, tx)
        });

        let written = write_stage::run(Arc::clone(&self.sink), rx, cap).await;
        let enumerated = enumeration.await.unwrap_or_else(|e| {
            error!(error = %e, "unit enumeration stopped unexpectedly");
            Enumeration {
                aborted: Some(format!("enumeration failed: {}", e)),
                ..Default::default()
            }
        });

        let post_clean_succeeded = match self.sink.post_clean().await {
            Ok(()) => true,
            Err(e) => {
                error!(error = ?e, "data sink post clean failed");
                false
            }
        };

        let mut failures = enumerated.failures;
        failures.extend(written.failures);
        let report = GenerationReport {
            attempted: written.attempted,
            written: written.written,
            failures,
            collisions: enumerated.collisions,
            aborted: enumerated.aborted,
            clean_succeeded,
            post_clean_succeeded,
        };
        info!(
            attempted = report.attempted,
            written = report.written,
            failed = report.failures.len(),
            "files generation ended"
        );
        report
    }
}

/// What the enumeration side saw.
#[derive(Debug, Default)]
struct Enumeration {
    failures: Vec<UnitFailure>,
    collisions: Vec<String>,
    aborted: Option<String>,
}

/// Render every unit and hand it to the write stage. Runs on a blocking thread.
fn enumerate(
    generators: &GeneratorSet,
    model: &ApiModel,
    options: &GenerationOptions,
    tx: mpsc::Sender<TemplateFile>,
) -> Enumeration {
    let mut enumeration = Enumeration::default();
    let mut seen = options.detect_collisions.then(HashSet::new);

    let units = std::iter::once(Ok(build_metadata(&options.build_id))).chain(generators.units(model));
    for unit in units {
        let file = match unit {
            Ok(file) => file,
            Err(failure) => {
                if record_render_failure(&mut enumeration, failure, options.render_failures) {
                    break;
                }
                continue;
            }
        };

        if let Some(seen) = seen.as_mut()
            && !seen.insert(file.relative_path().to_string())
        {
            warn!(path = %file.relative_path(), "duplicate relative path, last write wins");
            enumeration.collisions.push(file.relative_path().to_string());
        }

        if tx.blocking_send(file).is_err() {
            error!("write stage stopped before enumeration finished");
            enumeration.aborted = Some("write stage stopped early".to_string());
            break;
        }
    }
    enumeration
}

/// Record a render failure. Returns true if enumeration should stop.
fn record_render_failure(
    enumeration: &mut Enumeration,
    failure: RenderFailure,
    policy: RenderFailurePolicy,
) -> bool {
    error!(target_unit = %failure.target, error = %failure.message, "Error occurred while rendering");
    let stop = policy == RenderFailurePolicy::Abort;
    if stop {
        enumeration.aborted = Some(failure.to_string());
    }
    enumeration.failures.push(failure.into());
    stop
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingSink, SinkEvent, StaticProducer};

    fn generator(sink: &Arc<RecordingSink>, generators: GeneratorSet) -> CoreCodeGenerator {
        CoreCodeGenerator::new(
            Arc::clone(sink) as Arc<dyn DataSink>,
            generators,
            ApiModel::default(),
            GenerationOptions::default().with_build_id("abc123"),
        )
    }

    #[tokio::test]
    async fn test_metadata_is_always_written() {
        let sink = Arc::new(RecordingSink::new());
        let report = generator(&sink, GeneratorSet::new()).generate().await;

        assert_eq!(report.attempted, 1);
        assert_eq!(sink.content("gen.properties").as_deref(), Some("hash=abc123"));
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_phases_are_ordered() {
        let sink = Arc::new(RecordingSink::new());
        let generators = GeneratorSet::new().with_file_producer(StaticProducer::paths(["a", "b"]));
        generator(&sink, generators).generate().await;

        let events = sink.events();
        assert_eq!(events.first(), Some(&SinkEvent::Clean));
        assert_eq!(events.last(), Some(&SinkEvent::PostClean));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, SinkEvent::WriteFinished(_)))
                .count(),
            3
        );
    }

    #[tokio::test]
    async fn test_collisions_are_reported_and_still_written() {
        let sink = Arc::new(RecordingSink::new());
        let generators = GeneratorSet::new()
            .with_file_producer(StaticProducer::paths(["dup.py", "other.py"]))
            .with_file_producer(StaticProducer::paths(["dup.py"]));
        let generator = CoreCodeGenerator::new(
            Arc::clone(&sink) as Arc<dyn DataSink>,
            generators,
            ApiModel::default(),
            GenerationOptions::default().with_collision_detection(true),
        );

        let report = generator.generate().await;

        assert_eq!(report.collisions, vec!["dup.py"]);
        assert_eq!(report.attempted, 4);
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_collisions_ignored_by_default() {
        let sink = Arc::new(RecordingSink::new());
        let generators = GeneratorSet::new()
            .with_file_producer(StaticProducer::paths(["dup.py", "dup.py"]));

        let report = generator(&sink, generators).generate().await;

        assert!(report.collisions.is_empty());
        assert_eq!(report.written, 3);
    }

    #[test]
    fn test_record_render_failure_policy() {
        let failure = RenderFailure {
            target: "union type 'Payment'".to_string(),
            message: "boom".to_string(),
        };

        let mut enumeration = Enumeration::default();
        assert!(!record_render_failure(
            &mut enumeration,
            failure.clone(),
            RenderFailurePolicy::Isolate
        ));
        assert!(enumeration.aborted.is_none());

        let mut enumeration = Enumeration::default();
        assert!(record_render_failure(
            &mut enumeration,
            failure,
            RenderFailurePolicy::Abort
        ));
        assert_eq!(
            enumeration.aborted.as_deref(),
            Some("failed to render union type 'Payment': boom")
        );
        assert_eq!(enumeration.failures.len(), 1);
    }
}
