//! End-to-end tests for the generation coordinator.
//!
//! Every test drives [`CoreCodeGenerator::generate`] against an instrumented
//! in-memory sink.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use eyre::{Result, bail};
use vrap_codegen::{
    CoreCodeGenerator, FailureStage, GenerationOptions, GeneratorSet, RenderFailurePolicy,
    Renderer,
    testing::{
        FailingProducer, RecordingSink, SinkEvent, StaticProducer, generate_to_temp,
        read_generated,
    },
};
use vrap_core::{DataSink, TemplateFile};
use vrap_model::{Api, ApiModel, ObjectType};

fn run(
    sink: &Arc<RecordingSink>,
    generators: GeneratorSet,
    options: GenerationOptions,
) -> CoreCodeGenerator {
    CoreCodeGenerator::new(
        Arc::clone(sink) as Arc<dyn DataSink>,
        generators,
        ApiModel::default(),
        options,
    )
}

fn numbered(count: usize) -> StaticProducer {
    StaticProducer::paths((0..count).map(|i| format!("unit_{:03}.py", i)))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_three_producers_write_four_files() {
    let sink = Arc::new(RecordingSink::new());
    let generators = GeneratorSet::new()
        .with_file_producer(StaticProducer::paths(["a.py"]))
        .with_file_producer(StaticProducer::paths(["b.py"]))
        .with_file_producer(StaticProducer::paths(["c.py"]));

    let report = run(&sink, generators, GenerationOptions::default())
        .generate()
        .await;

    assert_eq!(
        sink.attempted_paths(),
        vec!["a.py", "b.py", "c.py", "gen.properties"]
    );
    assert_eq!(sink.count(&SinkEvent::PostClean), 1);
    assert_eq!(report.attempted, 4);
    assert_eq!(report.written, 4);
    assert!(report.is_success());
    assert!(report.clean_succeeded);
    assert!(report.post_clean_succeeded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_cap_is_respected() {
    let sink = Arc::new(RecordingSink::new().with_write_delay(Duration::from_millis(5)));
    let generators = GeneratorSet::new().with_file_producer(numbered(150));

    let report = run(
        &sink,
        generators,
        GenerationOptions::default().with_concurrency(100),
    )
    .generate()
    .await;

    assert_eq!(report.attempted, 151);
    assert_eq!(report.written, 151);
    assert_eq!(sink.written_paths().len(), 151);
    assert!(sink.peak_in_flight() <= 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_small_cap_keeps_writes_overlapping_but_bounded() {
    let sink = Arc::new(RecordingSink::new().with_write_delay(Duration::from_millis(20)));
    let generators = GeneratorSet::new().with_file_producer(numbered(20));

    let report = run(
        &sink,
        generators,
        GenerationOptions::default().with_concurrency(4),
    )
    .generate()
    .await;

    assert_eq!(report.written, 21);
    assert!(sink.peak_in_flight() <= 4);
    assert!(sink.peak_in_flight() > 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_one_failing_write_is_isolated() {
    let sink = Arc::new(RecordingSink::new().fail_on("unit_004.py"));
    let generators = GeneratorSet::new().with_file_producer(numbered(10));

    let report = run(&sink, generators, GenerationOptions::default())
        .generate()
        .await;

    assert_eq!(report.attempted, 11);
    assert_eq!(report.written, 10);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, FailureStage::Write);
    assert_eq!(report.failures[0].target, "unit_004.py");
    assert_eq!(report.failures[0].message, "permission denied");
    assert!(!sink.written_paths().contains(&"unit_004.py".to_string()));
    assert_eq!(sink.count(&SinkEvent::PostClean), 1);
    assert!(!report.is_success());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_write_failing_still_reaches_post_clean() {
    let sink = Arc::new(
        RecordingSink::new()
            .fail_on("gen.properties")
            .fail_on("a.py")
            .panic_on("b.py"),
    );
    let generators =
        GeneratorSet::new().with_file_producer(StaticProducer::paths(["a.py", "b.py"]));

    let report = run(&sink, generators, GenerationOptions::default())
        .generate()
        .await;

    assert_eq!(report.attempted, 3);
    assert_eq!(report.written, 0);
    assert_eq!(report.failures.len(), 3);
    assert_eq!(sink.events().last(), Some(&SinkEvent::PostClean));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failing_clean_is_not_fatal() {
    let sink = Arc::new(RecordingSink::new().failing_clean());
    let generators = GeneratorSet::new().with_file_producer(numbered(5));

    let report = run(&sink, generators, GenerationOptions::default())
        .generate()
        .await;

    assert!(!report.clean_succeeded);
    assert_eq!(report.written, 6);
    assert!(report.is_success());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_clean_precedes_writes_and_post_clean_follows_them() {
    let sink = Arc::new(RecordingSink::new().with_write_delay(Duration::from_millis(2)));
    let generators = GeneratorSet::new().with_file_producer(numbered(30));

    run(
        &sink,
        generators,
        GenerationOptions::default().with_concurrency(8),
    )
    .generate()
    .await;

    let events = sink.events();
    assert_eq!(events[0], SinkEvent::Clean);
    assert_eq!(sink.count(&SinkEvent::Clean), 1);
    let post_clean = events
        .iter()
        .position(|e| *e == SinkEvent::PostClean)
        .unwrap();
    assert_eq!(post_clean, events.len() - 1);
    let finished = events
        .iter()
        .filter(|e| matches!(e, SinkEvent::WriteFinished(_)))
        .count();
    assert_eq!(finished, 31);
}

#[tokio::test]
async fn test_metadata_is_stable() {
    for build_id in ["unknown", "3f2c1a9e"] {
        let sink = Arc::new(RecordingSink::new());
        run(
            &sink,
            GeneratorSet::new(),
            GenerationOptions::default().with_build_id(build_id),
        )
        .generate()
        .await;

        assert_eq!(
            sink.content("gen.properties"),
            Some(format!("hash={}", build_id))
        );
    }
}

struct ObjectRenderer;

impl Renderer<ObjectType> for ObjectRenderer {
    fn render(&self, entity: &ObjectType) -> Result<TemplateFile> {
        if entity.name == "Broken" {
            bail!("unsupported discriminator");
        }
        Ok(TemplateFile::new(
            format!("models/{}.py", entity.name),
            format!("class {}: ...", entity.name),
        ))
    }
}

fn model_with_broken_type() -> ApiModel {
    let api: Api = toml::from_str(
        r#"
        title = "Shop"

        [[types]]
        kind = "object"
        name = "Cart"

        [[types]]
        kind = "object"
        name = "Broken"

        [[types]]
        kind = "object"
        name = "Order"
        "#,
    )
    .unwrap();
    ApiModel::resolve(&api)
}

fn render_generator(sink: &Arc<RecordingSink>, policy: RenderFailurePolicy) -> CoreCodeGenerator {
    let generators = GeneratorSet::new()
        .with_object_type_renderer(ObjectRenderer)
        .with_file_producer(StaticProducer::paths(["__init__.py"]));
    CoreCodeGenerator::new(
        Arc::clone(sink) as Arc<dyn DataSink>,
        generators,
        model_with_broken_type(),
        GenerationOptions::default().with_render_failures(policy),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_render_failure_isolated_by_default() {
    let sink = Arc::new(RecordingSink::new());
    let report = render_generator(&sink, RenderFailurePolicy::Isolate)
        .generate()
        .await;

    assert_eq!(
        sink.written_paths(),
        vec![
            "__init__.py",
            "gen.properties",
            "models/Cart.py",
            "models/Order.py"
        ]
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, FailureStage::Render);
    assert_eq!(report.failures[0].target, "object type 'Broken'");
    assert!(report.aborted.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_render_failure_aborts_enumeration() {
    let sink = Arc::new(RecordingSink::new());
    let report = render_generator(&sink, RenderFailurePolicy::Abort)
        .generate()
        .await;

    assert_eq!(sink.written_paths(), vec!["gen.properties", "models/Cart.py"]);
    assert_eq!(report.attempted, 2);
    assert_eq!(
        report.aborted.as_deref(),
        Some("failed to render object type 'Broken': unsupported discriminator")
    );
    assert_eq!(sink.count(&SinkEvent::PostClean), 1);
    assert!(!report.is_success());
}

struct PanickingRenderer;

impl Renderer<ObjectType> for PanickingRenderer {
    fn render(&self, entity: &ObjectType) -> Result<TemplateFile> {
        if entity.name == "Broken" {
            panic!("discriminator table is empty");
        }
        ObjectRenderer.render(entity)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_renderer_panic_is_isolated() {
    let sink = Arc::new(RecordingSink::new());
    let generators = GeneratorSet::new().with_object_type_renderer(PanickingRenderer);

    let report = CoreCodeGenerator::new(
        Arc::clone(&sink) as Arc<dyn DataSink>,
        generators,
        model_with_broken_type(),
        GenerationOptions::default(),
    )
    .generate()
    .await;

    assert_eq!(
        sink.written_paths(),
        vec!["gen.properties", "models/Cart.py", "models/Order.py"]
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, FailureStage::Render);
    assert_eq!(report.failures[0].target, "object type 'Broken'");
    assert_eq!(
        report.failures[0].message,
        "panicked: discriminator table is empty"
    );
    assert!(report.aborted.is_none());
    assert_eq!(sink.count(&SinkEvent::PostClean), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_renderer_panic_aborts_under_abort_policy() {
    let sink = Arc::new(RecordingSink::new());
    let generators = GeneratorSet::new().with_object_type_renderer(PanickingRenderer);

    let report = CoreCodeGenerator::new(
        Arc::clone(&sink) as Arc<dyn DataSink>,
        generators,
        model_with_broken_type(),
        GenerationOptions::default().with_render_failures(RenderFailurePolicy::Abort),
    )
    .generate()
    .await;

    assert_eq!(sink.written_paths(), vec!["gen.properties", "models/Cart.py"]);
    assert_eq!(
        report.aborted.as_deref(),
        Some("failed to render object type 'Broken': panicked: discriminator table is empty")
    );
}

/// Counts every render call.
struct CountingRenderer(Arc<AtomicUsize>);

impl Renderer<ObjectType> for CountingRenderer {
    fn render(&self, entity: &ObjectType) -> Result<TemplateFile> {
        self.0.fetch_add(1, Ordering::SeqCst);
        ObjectRenderer.render(entity)
    }
}

fn model_with_object_types(count: usize) -> ApiModel {
    let mut src = String::from("title = \"Shop\"\n");
    for i in 0..count {
        src.push_str(&format!(
            "\n[[types]]\nkind = \"object\"\nname = \"Type{:03}\"\n",
            i
        ));
    }
    let api: Api = toml::from_str(&src).unwrap();
    ApiModel::resolve(&api)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_sink_throttles_rendering() {
    const TOTAL: usize = 500;
    const CAP: usize = 4;

    let rendered = Arc::new(AtomicUsize::new(0));
    let sink = Arc::new(RecordingSink::new().holding_writes());
    let generator = CoreCodeGenerator::new(
        Arc::clone(&sink) as Arc<dyn DataSink>,
        GeneratorSet::new().with_object_type_renderer(CountingRenderer(Arc::clone(&rendered))),
        model_with_object_types(TOTAL),
        GenerationOptions::default().with_concurrency(CAP),
    );

    let run = tokio::spawn(async move { generator.generate().await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Writes have started while enumeration is still pending
    assert_eq!(sink.in_flight(), CAP);
    assert!(!run.is_finished());
    // At most: writes in flight, a full channel, and one unit waiting to be
    // sent. The metadata file takes one of those slots.
    let held = rendered.load(Ordering::SeqCst);
    assert!(held <= 2 * CAP + 1, "rendered {held} units ahead of the sink");

    sink.release_writes();
    let report = run.await.unwrap();

    assert_eq!(rendered.load(Ordering::SeqCst), TOTAL);
    assert_eq!(report.attempted, TOTAL + 1);
    assert_eq!(report.written, TOTAL + 1);
    assert!(sink.peak_in_flight() <= CAP);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failing_producer_is_reported() {
    let sink = Arc::new(RecordingSink::new());
    let generators = GeneratorSet::new()
        .with_file_producer(FailingProducer)
        .with_file_producer(StaticProducer::paths(["a.py"]));

    let report = run(&sink, generators, GenerationOptions::default())
        .generate()
        .await;

    assert_eq!(sink.written_paths(), vec!["a.py", "gen.properties"]);
    assert_eq!(report.failures[0].target, "file producer 'FailingProducer'");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_generate_to_filesystem() {
    let generators = GeneratorSet::new()
        .with_file_producer(StaticProducer::paths(["pkg/models/__init__.py"]));

    let (dir, report) = generate_to_temp(
        generators,
        ApiModel::default(),
        GenerationOptions::default().with_build_id("abc"),
    )
    .await
    .unwrap();

    assert!(report.is_success());
    assert_eq!(read_generated(dir.path(), "gen.properties").unwrap(), "hash=abc");
    assert_eq!(
        read_generated(dir.path(), "pkg/models/__init__.py").unwrap(),
        "pkg/models/__init__.py"
    );
}
