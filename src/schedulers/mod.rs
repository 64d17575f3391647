//! Concurrent plan execution.
//!
//! The scheduler walks a plan's dependency levels and runs every builder
//! in a level concurrently; a level only starts once the previous one has
//! fully settled, so a builder never observes an input before its producer
//! completed. The only cross-node ordering guarantee is dependency order;
//! builders within a level finish in whatever order the runtime chooses.

pub mod scheduler;

pub use scheduler::RunError;
pub(crate) use scheduler::Scheduler;
