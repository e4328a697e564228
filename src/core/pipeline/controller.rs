//! Pipeline orchestration: builder, startup, and the running handle.

use super::item::WorkItem;
use super::stages::{average_stage, convert_stage, extract_stage, insert_stage, PipelineShared};
use crate::core::loader::{ImageLoader, PixelLoader};
use crate::core::scanner::{Discovery, ScanConfig};
use crate::error::PipelineError;
use crate::events::{Event, EventSender, PipelineEvent, PipelineSummary};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::info;

/// How long a stage parks on its input pile before re-checking the
/// termination predicate.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Builder for the pipeline controller
pub struct PipelineBuilder {
    roots: Vec<PathBuf>,
    scan_config: ScanConfig,
    poll_interval: Duration,
    loader: Option<Arc<dyn PixelLoader>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            scan_config: ScanConfig::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            loader: None,
        }
    }

    /// Directories to discover images in
    pub fn roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.roots = roots;
        self
    }

    /// Discovery configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.scan_config = config;
        self
    }

    /// Include hidden files during discovery
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.scan_config.include_hidden = include;
        self
    }

    /// Stage poll interval (bounds how long an idle stage waits before
    /// re-checking for completion)
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Substitute the pixel loader (e.g., a stub for tests)
    pub fn loader(mut self, loader: Arc<dyn PixelLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Build the controller
    pub fn build(self) -> PipelineController {
        PipelineController {
            roots: self.roots,
            scan_config: self.scan_config,
            poll_interval: self.poll_interval,
            loader: self
                .loader
                .unwrap_or_else(|| Arc::new(ImageLoader::new())),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns one pipeline run: starts discovery and the four stage workers,
/// and exposes the completion predicate and the ordered view to the
/// consumer.
pub struct PipelineController {
    roots: Vec<PathBuf>,
    scan_config: ScanConfig,
    poll_interval: Duration,
    loader: Arc<dyn PixelLoader>,
}

impl PipelineController {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Launch discovery and the four stage workers. Non-blocking; the
    /// returned handle is used to observe progress and join the run.
    pub fn start(&self, events: &EventSender) -> RunningPipeline {
        let shared = Arc::new(PipelineShared::new());
        let started = Instant::now();

        events.send(Event::Pipeline(PipelineEvent::Started));
        info!(roots = ?self.roots, "pipeline started");

        let mut workers = Vec::new();

        // Discovery: the sole producer. It publishes the final count and
        // wakes all stages so a zero-image run terminates promptly.
        {
            let shared = Arc::clone(&shared);
            let events = events.clone();
            let roots = self.roots.clone();
            let discovery = Discovery::new(self.scan_config.clone());
            workers.push((
                "discovery",
                thread::spawn(move || {
                    let total = discovery.run(&roots, &shared.to_extract, &events);
                    shared.finalize_total(total);
                    shared.wake_all();
                }),
            ));
        }

        {
            let shared = Arc::clone(&shared);
            let events = events.clone();
            let loader = Arc::clone(&self.loader);
            let poll = self.poll_interval;
            workers.push((
                "extract",
                thread::spawn(move || extract_stage(&shared, loader.as_ref(), poll, &events)),
            ));
        }

        {
            let shared = Arc::clone(&shared);
            let events = events.clone();
            let poll = self.poll_interval;
            workers.push((
                "average",
                thread::spawn(move || average_stage(&shared, poll, &events)),
            ));
        }

        {
            let shared = Arc::clone(&shared);
            let events = events.clone();
            let poll = self.poll_interval;
            workers.push((
                "convert",
                thread::spawn(move || convert_stage(&shared, poll, &events)),
            ));
        }

        {
            let shared = Arc::clone(&shared);
            let events = events.clone();
            let poll = self.poll_interval;
            workers.push((
                "insert",
                thread::spawn(move || insert_stage(&shared, poll, &events)),
            ));
        }

        RunningPipeline {
            shared,
            workers,
            events: events.clone(),
            started,
        }
    }
}

/// A live pipeline run with joinable worker handles.
///
/// The consumer (a display layer, or the CLI here) polls
/// [`RunningPipeline::is_complete`] and [`RunningPipeline::current_ordering`],
/// then calls [`RunningPipeline::wait`] to join every worker.
pub struct RunningPipeline {
    shared: Arc<PipelineShared>,
    workers: Vec<(&'static str, JoinHandle<()>)>,
    events: EventSender,
    started: Instant,
}

impl RunningPipeline {
    /// The termination predicate: discovery count finalized and every
    /// discovered image present in the ordered result set.
    pub fn is_complete(&self) -> bool {
        self.shared.is_complete()
    }

    /// The hue-ordered view. Valid at any time; before completion it is
    /// a growing prefix of the final result.
    pub fn current_ordering(&self) -> Vec<WorkItem> {
        self.shared.results.snapshot_ordered()
    }

    /// Total discovered images, or `None` while discovery is still
    /// enumerating.
    pub fn total_images(&self) -> Option<usize> {
        self.shared.total_images()
    }

    /// Join every worker and produce the final result.
    pub fn wait(self) -> Result<PipelineResult, PipelineError> {
        for (name, handle) in self.workers {
            handle
                .join()
                .map_err(|_| PipelineError::WorkerPanicked { name })?;
        }

        let items = self.shared.results.snapshot_ordered();
        let total_images = self.shared.total_images().unwrap_or(items.len());
        let failed = items.iter().filter(|i| i.is_failed()).count();
        let duration_ms = self.started.elapsed().as_millis() as u64;

        info!(total_images, failed, duration_ms, "pipeline completed");
        self.events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_images,
                failed,
                duration_ms,
            },
        }));

        Ok(PipelineResult {
            items,
            total_images,
            failed,
            duration_ms,
        })
    }
}

/// Result of a completed pipeline run
#[derive(Debug)]
pub struct PipelineResult {
    /// Every discovered image, ascending by hue then path
    pub items: Vec<WorkItem>,
    /// Total images discovered
    pub total_images: usize,
    /// Items whose pixel load failed (flagged, still in `items`)
    pub failed: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Rgb;
    use crate::error::LoadError;
    use crate::events::null_sender;
    use std::fs::File;
    use std::path::Path;
    use tempfile::TempDir;

    /// Loader that maps file stems to solid colors, so hues are known
    /// without decoding anything.
    struct StubLoader;

    impl PixelLoader for StubLoader {
        fn load(&self, path: &Path) -> Result<Vec<Rgb>, LoadError> {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let color = match stem {
                "red" => Rgb::new(255, 0, 0),      // hue 0
                "green" => Rgb::new(0, 255, 0),    // hue 120
                "blue" => Rgb::new(0, 0, 255),     // hue 240
                _ => {
                    return Err(LoadError::Decode {
                        path: path.to_path_buf(),
                        reason: "stub has no color for this file".to_string(),
                    })
                }
            };
            Ok(vec![color; 4])
        }
    }

    fn touch(dir: &TempDir, name: &str) {
        File::create(dir.path().join(name)).unwrap();
    }

    fn test_controller(dir: &TempDir) -> PipelineController {
        PipelineController::builder()
            .roots(vec![dir.path().to_path_buf()])
            .poll_interval(Duration::from_millis(5))
            .loader(Arc::new(StubLoader))
            .build()
    }

    #[test]
    fn empty_directory_completes_with_empty_ordering() {
        let dir = TempDir::new().unwrap();
        let running = test_controller(&dir).start(&null_sender());

        let result = running.wait().unwrap();

        assert_eq!(result.total_images, 0);
        assert!(result.items.is_empty());
    }

    #[test]
    fn images_come_out_in_hue_order() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "blue.png");
        touch(&dir, "red.png");
        touch(&dir, "green.png");

        let running = test_controller(&dir).start(&null_sender());
        let result = running.wait().unwrap();

        assert_eq!(result.total_images, 3);
        let stems: Vec<_> = result
            .items
            .iter()
            .map(|i| i.path.file_stem().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(stems, vec!["red", "green", "blue"]);

        let hues: Vec<_> = result.items.iter().map(|i| i.hue.unwrap()).collect();
        assert_eq!(hues, vec![0.0, 120.0, 240.0]);
    }

    #[test]
    fn failing_image_is_flagged_not_dropped() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "red.png");
        touch(&dir, "mystery.png"); // stub loader errors on this one

        let running = test_controller(&dir).start(&null_sender());
        let result = running.wait().unwrap();

        assert_eq!(result.total_images, 2);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.failed, 1);

        // Failed items sort ahead of any valid hue.
        assert!(result.items[0].is_failed());
        assert!(!result.items[1].is_failed());
    }

    #[test]
    fn completion_predicate_flips_after_wait() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "red.png");

        let running = test_controller(&dir).start(&null_sender());

        // Poll until complete; the run is tiny, so bound the wait hard.
        let deadline = Instant::now() + Duration::from_secs(10);
        while !running.is_complete() {
            assert!(Instant::now() < deadline, "pipeline failed to complete");
            thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(running.current_ordering().len(), 1);
        let result = running.wait().unwrap();
        assert_eq!(result.total_images, 1);
    }

    #[test]
    fn current_ordering_is_valid_before_completion() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "red.png");
        touch(&dir, "blue.png");

        let running = test_controller(&dir).start(&null_sender());

        // Partial snapshots must always be hue-sorted, whatever their size.
        let snapshot = running.current_ordering();
        let hues: Vec<f64> = snapshot.iter().map(|i| i.sort_hue()).collect();
        let mut sorted = hues.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(hues, sorted);

        running.wait().unwrap();
    }

    #[test]
    fn builder_uses_image_loader_by_default() {
        let controller = PipelineController::builder().build();
        // Just exercising the default wiring; an empty root set completes
        // immediately.
        let result = controller.start(&null_sender()).wait().unwrap();
        assert_eq!(result.total_images, 0);
    }
}
