//! Python bindings (enabled with the `python` feature).

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

// Note: std HashMap at the boundary for PyO3 interface compatibility

use crate::config::{GraphConfig, MarginLayout};
use crate::error::MpmError;
use crate::levels::LeveledGraph;
use crate::quantity::Quantity;
use crate::relation::{RelationInput, RelationMap};
use crate::schedule::{Durations, MpmGraph, Task};

impl From<MpmError> for PyErr {
    fn from(err: MpmError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn to_relation_map(map: Option<HashMap<String, Vec<String>>>) -> Option<RelationMap> {
    map.map(|m| m.into_iter().collect())
}

fn to_py_map(map: RelationMap) -> HashMap<String, Vec<String>> {
    map.into_iter().collect()
}

fn to_durations(durations: HashMap<String, f64>) -> PyResult<Durations> {
    durations
        .into_iter()
        .map(|(task, value)| {
            Quantity::try_from(value)
                .map(|q| (task.clone(), q))
                .map_err(|e| {
                    MpmError::InvalidDuration {
                        task,
                        reason: e.to_string(),
                    }
                    .into()
                })
        })
        .collect()
}

/// Structural graph with adjacency, closure, powers and levels.
#[pyclass(name = "SimpleGraph")]
pub struct PySimpleGraph {
    inner: LeveledGraph,
}

#[pymethods]
impl PySimpleGraph {
    #[new]
    #[pyo3(signature = (successors=None, predecessors=None))]
    fn new(
        successors: Option<HashMap<String, Vec<String>>>,
        predecessors: Option<HashMap<String, Vec<String>>>,
    ) -> PyResult<Self> {
        let relation = RelationInput {
            predecessors: to_relation_map(predecessors),
            successors: to_relation_map(successors),
        }
        .into_relation()?;
        Ok(Self {
            inner: LeveledGraph::new(&relation),
        })
    }

    fn has_no_circuit(&self) -> bool {
        self.inner.graph().has_no_circuit()
    }

    fn vertices(&self) -> Vec<String> {
        self.inner.graph().ordering().labels().to_vec()
    }

    fn adjacency(&self) -> Vec<Vec<u64>> {
        self.inner.graph().adjacency().to_rows()
    }

    fn closure(&self) -> Vec<Vec<u64>> {
        self.inner.graph().closure().to_rows()
    }

    /// Closure first, then powers 1..n.
    fn matrices(&self) -> Vec<Vec<Vec<u64>>> {
        self.inner
            .graph()
            .matrices()
            .into_iter()
            .map(|m| m.to_rows())
            .collect()
    }

    fn predecessors(&self) -> HashMap<String, Vec<String>> {
        to_py_map(self.inner.graph().predecessor_map())
    }

    fn successors(&self) -> HashMap<String, Vec<String>> {
        to_py_map(self.inner.graph().successor_map())
    }

    /// Label -> level, or None when the graph has a circuit.
    fn levels(&self) -> Option<HashMap<String, usize>> {
        self.inner
            .levels()
            .map(|_| self.inner.level_map().into_iter().collect())
    }

    fn __repr__(&self) -> String {
        format!(
            "SimpleGraph(vertices={}, has_no_circuit={})",
            self.inner.graph().len(),
            self.inner.graph().has_no_circuit()
        )
    }
}

/// MPM schedule graph.
#[pyclass(name = "MpmGraph")]
pub struct PyMpmGraph {
    inner: MpmGraph,
}

fn display_row(mpm: &MpmGraph, task: &Task) -> HashMap<String, String> {
    let fmt = |value: Option<Quantity>| value.map(|v| mpm.format(v)).unwrap_or_default();
    let attrs = task.schedule();
    HashMap::from([
        ("ed".to_string(), fmt(attrs.earliest_date)),
        ("ld".to_string(), fmt(attrs.latest_date)),
        ("ml".to_string(), fmt(attrs.free_margin)),
        ("mt".to_string(), fmt(attrs.total_margin)),
    ])
}

#[pymethods]
impl PyMpmGraph {
    #[new]
    #[pyo3(signature = (
        durations,
        successors=None,
        predecessors=None,
        start_label=None,
        end_label=None,
        show_levels=false,
        show_margins=false,
        presentation=1,
        verbosity=0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        durations: HashMap<String, f64>,
        successors: Option<HashMap<String, Vec<String>>>,
        predecessors: Option<HashMap<String, Vec<String>>>,
        start_label: Option<String>,
        end_label: Option<String>,
        show_levels: bool,
        show_margins: bool,
        presentation: u8,
        verbosity: u8,
    ) -> PyResult<Self> {
        let defaults = GraphConfig::default();
        let config = GraphConfig {
            start_label: start_label.unwrap_or(defaults.start_label),
            end_label: end_label.unwrap_or(defaults.end_label),
            show_levels,
            show_margins,
            margin_layout: MarginLayout::try_from(presentation)?,
            verbosity,
        };
        let input = RelationInput {
            predecessors: to_relation_map(predecessors),
            successors: to_relation_map(successors),
        };
        let inner = MpmGraph::from_input(input, &to_durations(durations)?, config)?;
        Ok(Self { inner })
    }

    fn earliest_dates(&mut self) -> PyResult<()> {
        Ok(self.inner.earliest_dates()?)
    }

    fn latest_dates(&mut self) -> PyResult<()> {
        Ok(self.inner.latest_dates()?)
    }

    fn schedule(&mut self) -> PyResult<()> {
        Ok(self.inner.schedule()?)
    }

    fn vertices(&self) -> Vec<String> {
        self.inner.graph().ordering().labels().to_vec()
    }

    fn levels(&self) -> HashMap<String, usize> {
        self.inner.level_map().into_iter().collect()
    }

    /// (earliest, latest, free margin, total margin) as floats.
    fn dates(
        &self,
        label: &str,
    ) -> PyResult<(Option<f64>, Option<f64>, Option<f64>, Option<f64>)> {
        let attrs = self.inner.task(label)?.schedule();
        let f = |v: Option<Quantity>| v.map(|q| q.to_f64());
        Ok((
            f(attrs.earliest_date),
            f(attrs.latest_date),
            f(attrs.free_margin),
            f(attrs.total_margin),
        ))
    }

    /// Display strings keyed "ed", "ld", "ml", "mt"; blank until computed.
    fn display(&self, label: &str) -> PyResult<HashMap<String, String>> {
        let task = self.inner.task(label)?;
        Ok(display_row(&self.inner, task))
    }

    fn project_duration(&self) -> Option<f64> {
        self.inner.project_duration().map(|q| q.to_f64())
    }

    fn critical_tasks(&self) -> Vec<String> {
        self.inner
            .critical_tasks()
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn predecessors(&self) -> HashMap<String, Vec<String>> {
        to_py_map(self.inner.predecessor_map())
    }

    fn successors(&self) -> HashMap<String, Vec<String>> {
        to_py_map(self.inner.successor_map())
    }

    fn adjacency(&self) -> Vec<Vec<u64>> {
        self.inner.graph().adjacency().to_rows()
    }

    fn closure(&self) -> Vec<Vec<u64>> {
        self.inner.graph().closure().to_rows()
    }

    /// Closure first, then powers 1..n.
    fn matrices(&self) -> Vec<Vec<Vec<u64>>> {
        self.inner
            .graph()
            .matrices()
            .into_iter()
            .map(|m| m.to_rows())
            .collect()
    }

    /// (level, title, tasks) per level; title is None unless show_levels is set.
    fn level_groups(&self) -> Vec<(usize, Option<String>, Vec<String>)> {
        self.inner
            .level_groups()
            .into_iter()
            .map(|group| {
                let tasks = group.tasks.into_iter().map(String::from).collect();
                (group.level, group.title, tasks)
            })
            .collect()
    }

    /// Tasks linked from the start node.
    fn start_edges(&self) -> Vec<String> {
        self.inner.start_edges().into_iter().map(String::from).collect()
    }

    /// (from, to, weight) with the weight displayed at the graph's precision.
    fn weighted_edges(&self) -> Vec<(String, String, String)> {
        self.inner
            .weighted_edges()
            .into_iter()
            .map(|(from, to, weight)| (from.to_string(), to.to_string(), self.inner.format(weight)))
            .collect()
    }

    /// Edges implied by transitivity only.
    fn closure_only_edges(&self) -> Vec<(String, String)> {
        let graph = self.inner.graph();
        graph
            .closure_only_edges()
            .into_iter()
            .map(|(from, to)| (graph.label(from).to_string(), graph.label(to).to_string()))
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "MpmGraph(tasks={}, end={:?}, project_duration={:?})",
            self.inner.len(),
            self.inner.end_task().id(),
            self.inner.project_duration().map(|q| q.to_string())
        )
    }
}

/// The mpm_graph Python module.
#[pymodule]
fn mpm_graph(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySimpleGraph>()?;
    m.add_class::<PyMpmGraph>()?;
    Ok(())
}
