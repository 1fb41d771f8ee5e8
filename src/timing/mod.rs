//! Wall-clock plumbing: elapsed-time primitives and the scheduler that turns
//! key edges plus elapsed milliseconds into engine calls.

pub mod scheduler;
pub mod timer;

pub use scheduler::Scheduler;
pub use timer::{Interval, Timer};
