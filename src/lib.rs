//! # huesort
//!
//! Sorts an image gallery by dominant hue.
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation
//! layers:
//! - `core` - the concurrent hue-ordering pipeline
//! - `events` - event-driven progress reporting (GUI-ready)
//! - `error` - layered error types
//!
//! Discovery, four stage workers, and the ordered result sink cooperate
//! without a central scheduler: every worker evaluates the same
//! termination predicate, so the pipeline halts deterministically once
//! each discovered image has been processed exactly once.

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{HueSorterError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
