//! Configuration for MPM schedule graphs.

use crate::error::MpmError;

/// How a renderer lays out the two margin cells of a task box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarginLayout {
    /// Free margin above total margin.
    #[default]
    Stacked,
    /// Free margin and total margin on one row.
    SideBySide,
}

impl TryFrom<u8> for MarginLayout {
    type Error = MpmError;

    /// `1` = stacked, `2` = side by side.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MarginLayout::Stacked),
            2 => Ok(MarginLayout::SideBySide),
            other => Err(MpmError::Configuration(format!(
                "unknown margin layout {other}, expected 1 or 2"
            ))),
        }
    }
}

/// Options of an MPM schedule graph.
///
/// Only `end_label` is structural: it names the synthetic finish task.
/// Everything else is surfaced to renderers unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphConfig {
    /// Display name of the start node.
    pub start_label: String,
    /// Label of the synthetic end task.
    pub end_label: String,
    /// Show level titles above each level group.
    pub show_levels: bool,
    /// Show the free/total margin cells.
    pub show_margins: bool,
    pub margin_layout: MarginLayout,
    /// Verbosity level: 0=silent, 1=summary, 2=tasks, 3=debug.
    pub verbosity: u8,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            start_label: "début".to_string(),
            end_label: "fin".to_string(),
            show_levels: false,
            show_margins: false,
            margin_layout: MarginLayout::Stacked,
            verbosity: 0,
        }
    }
}

impl GraphConfig {
    pub fn with_start_label(mut self, label: impl Into<String>) -> Self {
        self.start_label = label.into();
        self
    }

    pub fn with_end_label(mut self, label: impl Into<String>) -> Self {
        self.end_label = label.into();
        self
    }

    pub fn with_show_levels(mut self, show: bool) -> Self {
        self.show_levels = show;
        self
    }

    pub fn with_margins(mut self, show: bool, layout: MarginLayout) -> Self {
        self.show_margins = show;
        self.margin_layout = layout;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}
