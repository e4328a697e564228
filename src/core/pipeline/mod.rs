//! # Pipeline Module
//!
//! The concurrent hue-ordering pipeline.
//!
//! ## Stages
//! 1. **Extract** - load pixel samples for each discovered image
//! 2. **Average** - collapse samples into one mean color
//! 3. **Convert** - turn the mean color into a hue
//! 4. **Insert** - deposit the item into the hue-ordered result set
//!
//! Discovery runs alongside the stages as a fifth worker and is the only
//! producer for the extract pile. Every stage polls its input pile with a
//! bounded wait and stops once the termination predicate holds: discovery
//! has finalized the image count and the result set holds that many items.

mod controller;
mod item;
mod stages;

pub use controller::{PipelineBuilder, PipelineController, PipelineResult, RunningPipeline};
pub use item::{WorkItem, FAILED_HUE};
pub use stages::PipelineShared;
