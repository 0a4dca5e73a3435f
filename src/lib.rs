//! # Demand-driven satellite position streaming
//!
//! This crate tracks the live position of an orbiting object by polling a
//! remote HTTP endpoint at a bounded rate, exposing the results as a
//! continuous, backpressure-aware sequence of position records, optionally
//! augmented with the rate of change versus the previous record.
//!
//! ## Core Concepts
//!
//! - **Source**: generates records on demand; [`location::LocationSource`]
//!   is the rate-limited HTTP poller
//! - **Processor**: per-record transform; [`delta::DeltaProcessor`] attaches
//!   first-order deltas
//! - **Sink**: consumes records and signals acceptance for backpressure
//! - **Pipeline**: connects the three with demand-driven flow control
//!
//! ## Example
//!
//! ```rust,no_run
//! use satstream::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = LocationSource::builder().id(25544).build()?;
//!     let sink = CollectSink::new();
//!
//!     Pipeline::new(source, DeltaProcessor::new())
//!         .sink(sink.clone())
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod delta;
pub mod error;
pub mod location;
pub mod pipeline;
pub mod record;
pub mod sinks;
pub mod sources;
pub mod traits;

// Re-export commonly used items
pub mod prelude {
    pub use crate::delta::DeltaProcessor;
    pub use crate::error::{Error, Result};
    pub use crate::location::{CloseHandle, LocationSource, LocationSourceBuilder};
    pub use crate::pipeline::{IdentityProcessor, Pipeline};
    pub use crate::record::{DeltaRecord, PositionRecord};
    pub use crate::sinks::{CollectSink, CountSink};
    pub use crate::sources::VecSource;
    pub use crate::traits::{Processor, Sink, Source, WriteOutcome};
}

// Re-export main error type
pub use error::{Error, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
