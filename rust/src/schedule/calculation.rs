//! Earliest-date and latest-date passes over an MPM graph.

use crate::error::{MpmError, Result};
use crate::quantity::{Quantity, QuantityError};
use crate::{log_summary, log_tasks};

use super::graph::MpmGraph;

fn date_error(task: &str) -> impl FnOnce(QuantityError) -> MpmError + '_ {
    move |source| MpmError::DateOverflow {
        task: task.to_string(),
        source,
    }
}

impl MpmGraph {
    /// Forward pass: earliest date of every task, by ascending level.
    ///
    /// A task without predecessors starts at 0. Otherwise its earliest date is
    /// the max over predecessors `p` of `p.earliest + p.duration`. Running the
    /// pass again recomputes the same values. Fails with
    /// `MpmError::DateOverflow` when a date leaves the decimal range.
    pub fn earliest_dates(&mut self) -> Result<()> {
        let verbosity = self.config.verbosity;

        for idx in self.levels.ascending() {
            let mut earliest = Quantity::ZERO;
            for &p in self.graph.predecessors_of(idx) {
                let pred = &self.graph.nodes()[p];
                // Lower levels are done before this one, so this only fires
                // on an inconsistent level map.
                let pred_earliest = pred
                    .earliest_date()
                    .ok_or_else(|| MpmError::PrecursorState(pred.id().to_string()))?;
                let finish = pred_earliest
                    .checked_add(pred.duration())
                    .map_err(date_error(self.graph.label(idx)))?;
                earliest = earliest.max(finish);
            }

            log_tasks!(
                verbosity,
                "[mpm] earliest {} = {}",
                self.graph.label(idx),
                self.precision.format(earliest)
            );
            self.graph.nodes_mut()[idx].schedule.earliest_date = Some(earliest);
        }

        log_summary!(
            verbosity,
            "[mpm] earliest-date pass done, project end at {}",
            self.project_duration()
                .map(|d| self.precision.format(d))
                .unwrap_or_default()
        );
        Ok(())
    }

    /// Backward pass: latest date and margins of every task, by descending level.
    ///
    /// Requires `earliest_dates` to have run; fails with
    /// `MpmError::PrecursorState` otherwise. A task without successors keeps
    /// its earliest date as latest date and gets zero margins.
    pub fn latest_dates(&mut self) -> Result<()> {
        let verbosity = self.config.verbosity;

        if let Some(task) = self.tasks().iter().find(|t| t.earliest_date().is_none()) {
            return Err(MpmError::PrecursorState(task.id().to_string()));
        }

        for idx in self.levels.descending() {
            let task = &self.graph.nodes()[idx];
            let label = task.id();
            let duration = task.duration();
            let earliest = task
                .earliest_date()
                .ok_or_else(|| MpmError::PrecursorState(label.to_string()))?;

            let mut latest: Option<Quantity> = None;
            let mut free_margin: Option<Quantity> = None;
            for &s in self.graph.successors_of(idx) {
                let succ = &self.graph.nodes()[s];
                let (Some(succ_earliest), Some(succ_latest)) =
                    (succ.earliest_date(), succ.latest_date())
                else {
                    return Err(MpmError::PrecursorState(succ.id().to_string()));
                };
                let candidate = succ_latest
                    .checked_sub(duration)
                    .map_err(date_error(label))?;
                latest = Some(latest.map_or(candidate, |l| l.min(candidate)));
                let slack = succ_earliest
                    .checked_sub(duration)
                    .and_then(|d| d.checked_sub(earliest))
                    .map_err(date_error(label))?;
                free_margin = Some(free_margin.map_or(slack, |m| m.min(slack)));
            }

            let latest = latest.unwrap_or(earliest);
            let free_margin = free_margin.unwrap_or(Quantity::ZERO);
            let total_margin = latest.checked_sub(earliest).map_err(date_error(label))?;

            log_tasks!(
                verbosity,
                "[mpm] latest {} = {} (free margin {}, total margin {})",
                self.graph.label(idx),
                self.precision.format(latest),
                self.precision.format(free_margin),
                self.precision.format(total_margin)
            );

            let schedule = &mut self.graph.nodes_mut()[idx].schedule;
            schedule.latest_date = Some(latest);
            schedule.free_margin = Some(free_margin);
            schedule.total_margin = Some(total_margin);
        }

        log_summary!(
            verbosity,
            "[mpm] latest-date pass done, {} critical tasks",
            self.critical_tasks().len()
        );
        Ok(())
    }

    /// Run both passes in order.
    pub fn schedule(&mut self) -> Result<()> {
        self.earliest_dates()?;
        self.latest_dates()
    }

    /// Earliest date of the end task, once the forward pass has run.
    pub fn project_duration(&self) -> Option<Quantity> {
        self.end_task().earliest_date()
    }

    /// Tasks with zero total margin, in vertex order, end task excluded.
    pub fn critical_tasks(&self) -> Vec<&str> {
        self.tasks()
            .iter()
            .filter(|t| !t.is_synthetic() && t.schedule().is_critical())
            .map(|t| t.id())
            .collect()
    }
}
