//! The four stage workers and the state they share.
//!
//! Every stage runs the same loop: check the termination predicate,
//! then poll its input pile with a bounded wait, transform the item,
//! and hand it to the next structure. The predicate is re-checked on
//! every iteration - not just when the pile is empty - so no stage
//! lingers once global work is exhausted.

use super::item::WorkItem;
use crate::core::color;
use crate::core::loader::PixelLoader;
use crate::core::ordered::OrderedResultSet;
use crate::core::pile::ConcurrentPile;
use crate::events::{Event, EventSender, StageEvent, StageKind};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Shared mutable state of one pipeline run: the four inter-stage piles,
/// the ordered sink, and the discovery count.
///
/// Each structure is synchronized independently, so stages only contend
/// on the piles they actually touch.
pub struct PipelineShared {
    /// Input to the extract stage, fed by discovery.
    pub to_extract: ConcurrentPile<WorkItem>,
    pub to_average: ConcurrentPile<WorkItem>,
    pub to_convert: ConcurrentPile<WorkItem>,
    pub to_insert: ConcurrentPile<WorkItem>,
    /// The final hue-ordered sink.
    pub results: OrderedResultSet,
    /// Total discovered images. Unset until discovery finishes
    /// enumeration, which is how readers tell "not yet known" from
    /// "zero".
    total_images: OnceLock<usize>,
}

impl PipelineShared {
    pub fn new() -> Self {
        Self {
            to_extract: ConcurrentPile::new(),
            to_average: ConcurrentPile::new(),
            to_convert: ConcurrentPile::new(),
            to_insert: ConcurrentPile::new(),
            results: OrderedResultSet::new(),
            total_images: OnceLock::new(),
        }
    }

    /// Publish the final discovery count. Called exactly once, after
    /// enumeration ends.
    pub fn finalize_total(&self, total: usize) {
        if self.total_images.set(total).is_err() {
            warn!("discovery count finalized more than once, keeping first value");
        }
    }

    /// The discovery count, or `None` while enumeration is still running.
    pub fn total_images(&self) -> Option<usize> {
        self.total_images.get().copied()
    }

    /// The termination predicate every stage evaluates: the count is
    /// final and every discovered image has reached the ordered sink.
    pub fn is_complete(&self) -> bool {
        match self.total_images() {
            Some(total) => self.results.len() == total,
            None => false,
        }
    }

    /// Wake every stage blocked on a pile so it re-checks the predicate
    /// immediately.
    pub fn wake_all(&self) {
        self.to_extract.wake_all();
        self.to_average.wake_all();
        self.to_convert.wake_all();
        self.to_insert.wake_all();
    }
}

impl Default for PipelineShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Generic stage loop: poll `input`, transform, repeat until the
/// termination predicate holds.
fn run_stage<F>(
    shared: &PipelineShared,
    stage: StageKind,
    input: &ConcurrentPile<WorkItem>,
    poll_interval: Duration,
    events: &EventSender,
    mut transform: F,
) where
    F: FnMut(WorkItem),
{
    loop {
        if shared.is_complete() {
            break;
        }

        match input.take_timeout(poll_interval) {
            Some(item) => {
                trace!(stage = %stage, path = %item.path.display(), "processing item");
                transform(item);
            }
            None => continue,
        }
    }

    debug!(stage = %stage, "stage finished");
    events.send(Event::Stage(StageEvent::Finished { stage }));
}

/// Extract stage: load pixel samples for each item.
///
/// A load failure flags the item and forwards it anyway. Dropping it
/// would leave the result set permanently short of the discovery count
/// and stall every stage.
pub fn extract_stage(
    shared: &PipelineShared,
    loader: &dyn PixelLoader,
    poll_interval: Duration,
    events: &EventSender,
) {
    run_stage(
        shared,
        StageKind::Extract,
        &shared.to_extract,
        poll_interval,
        events,
        |mut item| {
            match loader.load(&item.path) {
                Ok(samples) => {
                    item.samples = samples;
                    events.send(Event::Stage(StageEvent::ItemProcessed {
                        stage: StageKind::Extract,
                        path: item.path.clone(),
                    }));
                }
                Err(e) => {
                    warn!(path = %item.path.display(), error = %e, "pixel load failed");
                    events.send(Event::Stage(StageEvent::ItemFailed {
                        stage: StageKind::Extract,
                        path: item.path.clone(),
                        message: e.to_string(),
                    }));
                    item.error = Some(e.to_string());
                }
            }
            shared.to_average.put(item);
        },
    );
}

/// Average stage: collapse the samples into one mean color.
pub fn average_stage(shared: &PipelineShared, poll_interval: Duration, events: &EventSender) {
    run_stage(
        shared,
        StageKind::Average,
        &shared.to_average,
        poll_interval,
        events,
        |mut item| {
            if !item.is_failed() {
                match color::average_color(&item.samples) {
                    Ok(average) => {
                        item.average_color = Some(average);
                        events.send(Event::Stage(StageEvent::ItemProcessed {
                            stage: StageKind::Average,
                            path: item.path.clone(),
                        }));
                    }
                    Err(e) => {
                        // Only reachable if a loader returned zero samples.
                        warn!(path = %item.path.display(), error = %e, "averaging failed");
                        events.send(Event::Stage(StageEvent::ItemFailed {
                            stage: StageKind::Average,
                            path: item.path.clone(),
                            message: e.to_string(),
                        }));
                        item.error = Some(e.to_string());
                    }
                }
            }
            // The samples served their purpose; keep the item light for
            // the ordered sink and its snapshots.
            item.samples = Vec::new();
            shared.to_convert.put(item);
        },
    );
}

/// Convert stage: average color to hue.
pub fn convert_stage(shared: &PipelineShared, poll_interval: Duration, events: &EventSender) {
    run_stage(
        shared,
        StageKind::Convert,
        &shared.to_convert,
        poll_interval,
        events,
        |mut item| {
            if let Some(average) = item.average_color {
                item.hue = Some(color::rgb_to_hsl(average).h);
                events.send(Event::Stage(StageEvent::ItemProcessed {
                    stage: StageKind::Convert,
                    path: item.path.clone(),
                }));
            }
            shared.to_insert.put(item);
        },
    );
}

/// Insert stage: deposit each item into the hue-ordered sink.
///
/// When an insert satisfies the termination predicate, this stage wakes
/// every pile so its siblings exit immediately instead of waiting out
/// their poll timeout.
pub fn insert_stage(shared: &PipelineShared, poll_interval: Duration, events: &EventSender) {
    run_stage(
        shared,
        StageKind::Insert,
        &shared.to_insert,
        poll_interval,
        events,
        |item| {
            let path = item.path.clone();
            shared.results.insert(item);
            events.send(Event::Stage(StageEvent::ItemInserted {
                path,
                inserted: shared.results.len(),
            }));

            if shared.is_complete() {
                shared.wake_all();
            }
        },
    );
}
