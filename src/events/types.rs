//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the hue sorting pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Discovery phase events
    Scan(ScanEvent),
    /// Per-stage processing events
    Stage(StageEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events from image discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Discovery has started
    Started { paths: Vec<PathBuf> },
    /// An image was found and handed to the pipeline
    ImageFound { path: PathBuf },
    /// An error occurred but discovery continues
    Error { path: PathBuf, message: String },
    /// Discovery completed; the total image count is now final
    Completed { total_images: usize },
}

/// The four pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageKind {
    Extract,
    Average,
    Convert,
    Insert,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageKind::Extract => write!(f, "extract"),
            StageKind::Average => write!(f, "average"),
            StageKind::Convert => write!(f, "convert"),
            StageKind::Insert => write!(f, "insert"),
        }
    }
}

/// Events from the stage workers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageEvent {
    /// A stage finished its transform for one item
    ItemProcessed { stage: StageKind, path: PathBuf },
    /// A stage hit a per-item failure; the item is flagged and forwarded
    ItemFailed {
        stage: StageKind,
        path: PathBuf,
        message: String,
    },
    /// An item reached the ordered result set
    ItemInserted { path: PathBuf, inserted: usize },
    /// A stage loop observed the termination predicate and exited
    Finished { stage: StageKind },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Pipeline completed: every discovered image is in the result set
    Completed { summary: PipelineSummary },
}

/// Summary of a completed pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Total images discovered and processed
    pub total_images: usize,
    /// Number of items that failed loading (still present in the result)
    pub failed: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
