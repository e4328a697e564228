//! The work item that flows through the pipeline.

use crate::core::color::Rgb;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sort key substituted for items whose load failed. Below the valid hue
/// range, so failed items group at the front of the ordering.
pub const FAILED_HUE: f64 = -1.0;

/// One image moving through the pipeline.
///
/// Created by discovery with only `path` set. Each stage populates
/// exactly its own field and forwards the item; at any instant exactly
/// one stage or one pile holds a given item, so no field is ever
/// concurrently mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Location of the source image. Immutable once created.
    pub path: PathBuf,
    /// Per-pixel color samples. Populated by the extract stage; empty
    /// before, and left empty when loading fails.
    pub samples: Vec<Rgb>,
    /// Mean color over `samples`. Populated by the average stage.
    pub average_color: Option<Rgb>,
    /// Hue of `average_color`, degrees in [0, 360). Populated by the
    /// convert stage; `None` for failed items.
    pub hue: Option<f64>,
    /// Set when the pixel loader could not produce samples. Failed items
    /// are flagged and forwarded, never dropped - dropping would make the
    /// completion count unreachable and stall every stage.
    pub error: Option<String>,
}

impl WorkItem {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            samples: Vec::new(),
            average_color: None,
            hue: None,
            error: None,
        }
    }

    /// Whether the pixel loader failed for this item.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// The hue used for ordering: the computed hue, or [`FAILED_HUE`]
    /// for items that never got one.
    pub fn sort_hue(&self) -> f64 {
        self.hue.unwrap_or(FAILED_HUE)
    }
}
