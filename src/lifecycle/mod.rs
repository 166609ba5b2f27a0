//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! SIGINT/SIGTERM → Shutdown::trigger
//!     → refresh scheduler finishes its current cycle and exits
//!     → config watcher dropped
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
