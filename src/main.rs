//! # huesort CLI
//!
//! Command-line interface for the hue sorter.
//!
//! ## Usage
//! ```bash
//! huesort sort ~/Pictures
//! huesort sort ~/Pictures --output json
//! ```

mod cli;

use huesort::Result;

fn main() -> Result<()> {
    huesort::init_tracing();
    cli::run()
}
