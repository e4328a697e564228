//! # Core Module
//!
//! The UI-agnostic hue-ordering engine.
//!
//! ## Modules
//! - `scanner` - discovers images in directories
//! - `loader` - turns file paths into pixel samples
//! - `color` - channel averaging and RGB to HSL conversion
//! - `pile` - the thread-safe hand-off buffer between stages
//! - `ordered` - the hue-ordered result sink
//! - `pipeline` - the stage workers and their controller

pub mod color;
pub mod loader;
pub mod ordered;
pub mod pile;
pub mod pipeline;
pub mod scanner;

// Re-export commonly used types
pub use color::{Hsl, Rgb};
pub use ordered::OrderedResultSet;
pub use pile::ConcurrentPile;
pub use pipeline::{PipelineController, PipelineResult, RunningPipeline, WorkItem};
pub use scanner::ScanConfig;
