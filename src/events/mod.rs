//! # Events Module
//!
//! Event-driven progress reporting for the pipeline.
//!
//! ## Design
//! The core library emits events through channels, allowing any UI
//! (CLI, GUI, web) to subscribe and display progress.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! // In a separate thread, listen for events
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Scan(ScanEvent::ImageFound { path }) => println!("found {:?}", path),
//!             Event::Stage(StageEvent::ItemInserted { inserted, .. }) => {
//!                 println!("{} images ordered", inserted)
//!             }
//!             _ => {}
//!         }
//!     }
//! });
//!
//! // Start the pipeline with the sender
//! controller.start(&sender);
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
