//! # cep-race
//!
//! Races redundant postal-code lookup services and returns whichever answers
//! first, bounded by a single deadline.
//!
//! ## How a race works
//!
//! - One [`Fetcher`] per configured source runs as a detached tokio task
//! - Every fetcher reports exactly one [`Outcome`] into a channel sized to the
//!   number of fetchers, so no send ever waits
//! - The [`Racer`] takes the first outcome, success or failure, or gives up
//!   with [`Error::Timeout`] at the deadline
//! - Losing fetchers see the race token fire, drop their request and exit
//!
//! ## Quick Start
//!
//! ```no_run
//! use cep_race::{Config, Racer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let racer = Racer::new(Config::default())?;
//!
//!     match racer.race_postal_code("01153000").await {
//!         Ok(resolved) => println!("{} answered: {}", resolved.source_name, resolved.address),
//!         Err(e) => eprintln!("lookup failed: {}", e),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Single-source lookups
pub mod fetcher;
/// Race orchestration
pub mod racer;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{Config, SourceConfig, SourceFormat};
pub use error::{Error, FailureKind, FetchError, Result};
pub use fetcher::Fetcher;
pub use racer::{RaceContext, Racer};
pub use types::{Address, Outcome, Resolved, Verdict};
