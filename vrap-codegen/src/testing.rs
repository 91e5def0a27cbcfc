//! Test utilities for the generation pipeline.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use eyre::{Result, bail, eyre};
use tokio::sync::Semaphore;
use vrap_core::{DataSink, FileDataSink, TemplateFile};
use vrap_model::ApiModel;

use crate::{
    CoreCodeGenerator, FileProducer, GenerationOptions, GenerationReport, GeneratorSet,
};

/// A sink call observed by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// `clean` returned.
    Clean,
    /// `write` was entered for the path.
    WriteStarted(String),
    /// `write` returned for the path, successfully or not.
    WriteFinished(String),
    /// `post_clean` was entered.
    PostClean,
}

/// An in-memory [`DataSink`] that records every call.
///
/// Tracks the number of writes in flight and the peak seen, and can be told
/// to fail `clean`, fail or panic on specific paths, delay each write, or
/// hold every write until released.
#[derive(Debug, Default)]
pub struct RecordingSink {
    clean_result: Option<bool>,
    failing_paths: HashSet<String>,
    panicking_paths: HashSet<String>,
    write_delay: Option<Duration>,
    hold: Option<Semaphore>,
    events: Mutex<Vec<SinkEvent>>,
    files: Mutex<BTreeMap<String, String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `clean` report failure.
    pub fn failing_clean(mut self) -> Self {
        self.clean_result = Some(false);
        self
    }

    /// Make `write` return an error for the path.
    pub fn fail_on(mut self, path: impl Into<String>) -> Self {
        self.failing_paths.insert(path.into());
        self
    }

    /// Make `write` panic for the path.
    pub fn panic_on(mut self, path: impl Into<String>) -> Self {
        self.panicking_paths.insert(path.into());
        self
    }

    /// Sleep in every `write`, to keep writes overlapping.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    /// Block every `write` after it is entered until
    /// [`release_writes`](Self::release_writes) is called.
    pub fn holding_writes(mut self) -> Self {
        self.hold = Some(Semaphore::new(0));
        self
    }

    /// Let held and future writes proceed.
    pub fn release_writes(&self) {
        if let Some(hold) = &self.hold {
            hold.close();
        }
    }

    /// Number of writes currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Every recorded call, in order.
    pub fn events(&self) -> Vec<SinkEvent> {
        lock(&self.events).clone()
    }

    /// Paths `write` was entered for, sorted.
    pub fn attempted_paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self
            .events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::WriteStarted(path) => Some(path),
                _ => None,
            })
            .collect();
        paths.sort();
        paths
    }

    /// Paths successfully written, sorted.
    pub fn written_paths(&self) -> Vec<String> {
        lock(&self.files).keys().cloned().collect()
    }

    /// Content written at the path, if any.
    pub fn content(&self, path: &str) -> Option<String> {
        lock(&self.files).get(path).cloned()
    }

    /// Number of times the event was recorded.
    pub fn count(&self, event: &SinkEvent) -> usize {
        lock(&self.events).iter().filter(|e| *e == event).count()
    }

    /// Highest number of writes observed in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, event: SinkEvent) {
        lock(&self.events).push(event);
    }
}

#[async_trait]
impl DataSink for RecordingSink {
    async fn clean(&self) -> bool {
        self.record(SinkEvent::Clean);
        self.clean_result.unwrap_or(true)
    }

    async fn write(&self, file: &TemplateFile) -> Result<()> {
        let path = file.relative_path().to_string();
        self.record(SinkEvent::WriteStarted(path.clone()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(hold) = &self.hold {
            // Never granted a permit, so this only returns once closed
            let _closed = hold.acquire().await;
        }
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        let result = if self.panicking_paths.contains(&path) {
            panic!("sink exploded on {}", path);
        } else if self.failing_paths.contains(&path) {
            Err(eyre!("permission denied"))
        } else {
            lock(&self.files).insert(path.clone(), file.content().to_string());
            Ok(())
        };

        self.record(SinkEvent::WriteFinished(path));
        result
    }

    async fn post_clean(&self) -> Result<()> {
        self.record(SinkEvent::PostClean);
        Ok(())
    }
}

/// Decrements the in-flight counter when a write returns or unwinds.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A [`FileProducer`] returning a fixed list of files.
#[derive(Debug, Clone)]
pub struct StaticProducer(Vec<TemplateFile>);

impl StaticProducer {
    pub fn new(files: Vec<TemplateFile>) -> Self {
        Self(files)
    }

    /// Files at the given paths, each with its path as content.
    pub fn paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            paths
                .into_iter()
                .map(|path| {
                    let path = path.into();
                    TemplateFile::new(path.clone(), path)
                })
                .collect(),
        )
    }
}

impl FileProducer for StaticProducer {
    fn produce_files(&self) -> Result<Vec<TemplateFile>> {
        Ok(self.0.clone())
    }
}

/// A [`FileProducer`] that always fails.
#[derive(Debug, Clone, Copy)]
pub struct FailingProducer;

impl FileProducer for FailingProducer {
    fn produce_files(&self) -> Result<Vec<TemplateFile>> {
        bail!("producer failed")
    }
}

/// Generate into a temporary directory and return it with the report.
///
/// The directory will be cleaned up when the returned `TempDir` is dropped.
pub async fn generate_to_temp(
    generators: GeneratorSet,
    model: ApiModel,
    options: GenerationOptions,
) -> Result<(tempfile::TempDir, GenerationReport)> {
    let temp_dir = tempfile::TempDir::new()?;
    let sink = Arc::new(FileDataSink::new(temp_dir.path()));
    let report = CoreCodeGenerator::new(sink, generators, model, options)
        .generate()
        .await;
    Ok((temp_dir, report))
}

/// Read a generated file, relative to the output directory.
pub fn read_generated(root: &Path, relative_path: &str) -> Result<String> {
    std::fs::read_to_string(root.join(relative_path))
        .map_err(|e| eyre!("failed to read generated '{}': {}", relative_path, e))
}
