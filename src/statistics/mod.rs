//! Probe statistics subsystem.
//!
//! # Data Flow
//! ```text
//! availability log (CSV, external producer)
//!     → loader.rs (read file, skip header)
//!     → record.rs (parse one row)
//!     → aggregate.rs (group by server id, count/min/max/avg)
//!     → AggregateMap (replaced wholesale per load)
//! ```

pub mod aggregate;
pub mod loader;
pub mod record;

pub use aggregate::{AggregateMap, ServerAggregate};
pub use loader::StatisticsLoader;
pub use record::{ProbeStatus, RawProbeRecord};
