//! Types for MPM schedule graphs.

use rustc_hash::FxHashMap;

use crate::quantity::Quantity;

/// Task durations keyed by task label.
pub type Durations = FxHashMap<String, Quantity>;

/// Per-task results of the two scheduling passes.
///
/// Fields stay `None` until the pass that computes them has run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulingAttributes {
    /// Earliest date (forward pass).
    pub earliest_date: Option<Quantity>,
    /// Latest date (backward pass).
    pub latest_date: Option<Quantity>,
    /// Slack before delaying any immediate successor.
    pub free_margin: Option<Quantity>,
    /// Slack before delaying the project end.
    pub total_margin: Option<Quantity>,
}

impl SchedulingAttributes {
    pub fn is_critical(&self) -> bool {
        self.total_margin == Some(Quantity::ZERO)
    }
}

/// A task of the schedule graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    id: String,
    duration: Quantity,
    synthetic: bool,
    pub(crate) schedule: SchedulingAttributes,
}

impl Task {
    pub fn new(id: impl Into<String>, duration: Quantity) -> Self {
        Self {
            id: id.into(),
            duration,
            synthetic: false,
            schedule: SchedulingAttributes::default(),
        }
    }

    /// Zero-duration finish task appended after every sink.
    pub(crate) fn end(id: impl Into<String>) -> Self {
        Self {
            synthetic: true,
            ..Self::new(id, Quantity::ZERO)
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn duration(&self) -> Quantity {
        self.duration
    }

    /// True for the synthesized end task.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn schedule(&self) -> &SchedulingAttributes {
        &self.schedule
    }

    pub fn earliest_date(&self) -> Option<Quantity> {
        self.schedule.earliest_date
    }

    pub fn latest_date(&self) -> Option<Quantity> {
        self.schedule.latest_date
    }

    pub fn free_margin(&self) -> Option<Quantity> {
        self.schedule.free_margin
    }

    pub fn total_margin(&self) -> Option<Quantity> {
        self.schedule.total_margin
    }
}

/// Tasks of one level, as a renderer groups them on a single rank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelGroup<'a> {
    pub level: usize,
    /// `Some("niv{level}")` when levels are shown, except on the last level.
    pub title: Option<String>,
    pub tasks: Vec<&'a str>,
}
