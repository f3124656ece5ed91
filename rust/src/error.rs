//! Error types for graph construction, levelling and scheduling.

use thiserror::Error;

use crate::quantity::QuantityError;

/// Errors raised while building or scheduling an MPM graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MpmError {
    /// Invalid construction options (relation direction, label collisions).
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    /// A vertex of the relation has no entry in the duration map.
    #[error("Missing duration for task: {0}")]
    MissingDuration(String),
    /// Levels or dates requested on a graph whose closure has a nonzero trace.
    #[error("Circular dependency detected in task graph")]
    CyclicGraph,
    /// Latest dates requested before earliest dates were computed.
    #[error("Earliest date of task {0} is not computed; run the earliest-date pass first")]
    PrecursorState(String),
    /// Negative, non-finite or unrepresentable duration.
    #[error("Invalid duration for task {task}: {reason}")]
    InvalidDuration { task: String, reason: String },
    /// A date or margin of this task does not fit the decimal range.
    #[error("Date arithmetic failed for task {task}: {source}")]
    DateOverflow {
        task: String,
        source: QuantityError,
    },
    /// Lookup by an identifier that is not a vertex of the graph.
    #[error("Task not found: {0}")]
    UnknownTask(String),
}

pub type Result<T> = std::result::Result<T, MpmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MpmError::MissingDuration("C".into()).to_string(),
            "Missing duration for task: C"
        );
        assert_eq!(
            MpmError::CyclicGraph.to_string(),
            "Circular dependency detected in task graph"
        );
        let err = MpmError::InvalidDuration {
            task: "A".into(),
            reason: "negative".into(),
        };
        assert_eq!(err.to_string(), "Invalid duration for task A: negative");
        let err = MpmError::DateOverflow {
            task: "fin".into(),
            source: QuantityError::Overflow("1 + 2".into()),
        };
        assert_eq!(
            err.to_string(),
            "Date arithmetic failed for task fin: arithmetic overflow: 1 + 2"
        );
    }
}
