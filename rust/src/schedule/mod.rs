//! MPM scheduling: schedule graph construction and the critical-path passes.
//!
//! The schedule graph is the caller's task graph with a synthetic end task
//! attached after every sink. The forward pass computes earliest dates by
//! ascending level; the backward pass computes latest dates and margins by
//! descending level.

mod calculation;
mod graph;
mod types;

pub use graph::MpmGraph;
pub use types::{Durations, LevelGroup, SchedulingAttributes, Task};
