//! Metra Potential Method (MPM) scheduling graphs.
//!
//! Builds a directed task graph from a predecessor or successor relation,
//! derives its matrix algebra (adjacency, powers, transitive closure),
//! assigns topological levels, and runs the earliest-date / latest-date
//! passes that yield dates and margins per task.
//!
//! Layers compose over one graph structure:
//! - [`SimpleGraph`]: adjacency, derived relation, closure, circuit check
//! - [`LeveledGraph`]: a simple graph plus levels when it has no circuit
//! - [`MpmGraph`]: tasks with durations, a synthetic end task and the passes

pub mod config;
pub mod error;
pub mod graph;
pub mod interner;
pub mod levels;
pub mod logging;
pub mod matrix;
pub mod quantity;
pub mod relation;
pub mod schedule;

#[cfg(feature = "python")]
mod python;

pub use config::{GraphConfig, MarginLayout};
pub use error::{MpmError, Result};
pub use graph::SimpleGraph;
pub use interner::{VertexIndex, VertexOrdering};
pub use levels::{assign_levels, LevelMap, LeveledGraph};
pub use matrix::Matrix;
pub use quantity::{Precision, Quantity, QuantityError};
pub use relation::{relation_map, Direction, Relation, RelationInput, RelationMap};
pub use schedule::{Durations, LevelGroup, MpmGraph, SchedulingAttributes, Task};
