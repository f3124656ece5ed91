//! MPM schedule graph construction.

use rustc_hash::FxHashMap;

use crate::config::GraphConfig;
use crate::error::{MpmError, Result};
use crate::graph::SimpleGraph;
use crate::interner::VertexIndex;
use crate::levels::LevelMap;
use crate::quantity::{Precision, Quantity};
use crate::relation::{Relation, RelationInput, RelationMap};
use crate::{log_debug, log_summary, log_tasks};

use super::types::{Durations, LevelGroup, Task};

/// Task graph with a synthetic end task, levels and scheduling attributes.
#[derive(Clone, Debug)]
pub struct MpmGraph {
    pub(crate) graph: SimpleGraph<Task>,
    pub(crate) levels: LevelMap,
    pub(crate) precision: Precision,
    pub(crate) end: VertexIndex,
    pub(crate) config: GraphConfig,
}

impl MpmGraph {
    /// Build the schedule graph from relation options.
    ///
    /// Fails with `MpmError::Configuration` unless exactly one of
    /// predecessors/successors is set.
    pub fn from_input(input: RelationInput, durations: &Durations, config: GraphConfig) -> Result<Self> {
        Self::new(&input.into_relation()?, durations, config)
    }

    /// Build the schedule graph.
    ///
    /// The caller's relation is built once to find its sinks, the end task is
    /// attached after them, and the full graph is built a second time. Levels
    /// are computed on that final graph.
    pub fn new(relation: &Relation, durations: &Durations, config: GraphConfig) -> Result<Self> {
        let verbosity = config.verbosity;
        let end_label = config.end_label.as_str();

        for (task, duration) in durations {
            if duration.is_negative() {
                return Err(MpmError::InvalidDuration {
                    task: task.clone(),
                    reason: format!("negative duration {duration}"),
                });
            }
        }
        if relation.labels().any(|label| label == end_label) {
            return Err(MpmError::Configuration(format!(
                "end label {end_label:?} is already a task"
            )));
        }

        // First pass: the caller's graph, only to find its sinks.
        let structural = SimpleGraph::new(relation);
        let mut predecessors = structural.predecessor_map();
        let sinks: Vec<String> = structural
            .sinks()
            .into_iter()
            .map(|idx| structural.label(idx).to_string())
            .collect();
        log_debug!(verbosity, "[mpm] sinks attached to {end_label:?}: {sinks:?}");
        predecessors.insert(end_label.to_string(), sinks);

        // Second pass: the full graph including the end task.
        let graph = SimpleGraph::with_nodes(&Relation::predecessors(predecessors), |label| {
            if label == end_label {
                return Ok(Task::end(label));
            }
            durations
                .get(label)
                .map(|duration| Task::new(label, *duration))
                .ok_or_else(|| MpmError::MissingDuration(label.to_string()))
        })?;

        if !graph.has_no_circuit() {
            return Err(MpmError::CyclicGraph);
        }
        let levels = graph.assign_levels()?;
        let end = graph
            .index_of(end_label)
            .ok_or_else(|| MpmError::UnknownTask(end_label.to_string()))?;
        let precision = Precision::of(durations.values());

        log_summary!(
            verbosity,
            "[mpm] built graph: {} tasks, {} levels, precision {}",
            graph.len(),
            levels.max_level().map_or(0, |m| m + 1),
            precision.digits()
        );
        for idx in 0..graph.len() {
            log_tasks!(verbosity, "[mpm]   {} -> level {}", graph.label(idx), levels.level(idx));
        }
        log_debug!(verbosity, "[mpm] closure:\n{}", graph.closure());

        Ok(Self {
            graph,
            levels,
            precision,
            end,
            config,
        })
    }

    /// Underlying graph, including the end task.
    pub fn graph(&self) -> &SimpleGraph<Task> {
        &self.graph
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn levels(&self) -> &LevelMap {
        &self.levels
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Tasks in vertex order, including the end task.
    pub fn tasks(&self) -> &[Task] {
        self.graph.nodes()
    }

    pub fn task(&self, label: &str) -> Result<&Task> {
        self.graph
            .node(label)
            .ok_or_else(|| MpmError::UnknownTask(label.to_string()))
    }

    pub fn end_task(&self) -> &Task {
        &self.graph.nodes()[self.end]
    }

    pub fn level_of(&self, label: &str) -> Result<usize> {
        self.graph
            .index_of(label)
            .map(|idx| self.levels.level(idx))
            .ok_or_else(|| MpmError::UnknownTask(label.to_string()))
    }

    pub fn level_map(&self) -> FxHashMap<String, usize> {
        (0..self.len())
            .map(|idx| (self.graph.label(idx).to_string(), self.levels.level(idx)))
            .collect()
    }

    pub fn predecessor_map(&self) -> RelationMap {
        self.graph.predecessor_map()
    }

    pub fn successor_map(&self) -> RelationMap {
        self.graph.successor_map()
    }

    /// Display form of a date or margin at this graph's precision.
    pub fn format(&self, value: Quantity) -> String {
        self.precision.format(value)
    }

    /// Tasks linked from the start node: every level-0 task.
    pub fn start_edges(&self) -> Vec<&str> {
        self.levels
            .groups()
            .first()
            .map(|group| group.iter().map(|&idx| self.graph.label(idx)).collect())
            .unwrap_or_default()
    }

    /// Edges `(from, to, weight)` where the weight is the duration of `from`.
    pub fn weighted_edges(&self) -> Vec<(&str, &str, Quantity)> {
        self.graph
            .edges()
            .into_iter()
            .map(|(from, to)| {
                (
                    self.graph.label(from),
                    self.graph.label(to),
                    self.graph.nodes()[from].duration(),
                )
            })
            .collect()
    }

    /// Level groups with titles when `show_levels` is set.
    pub fn level_groups(&self) -> Vec<LevelGroup<'_>> {
        let last = self.levels.max_level();
        self.levels
            .groups()
            .into_iter()
            .enumerate()
            .map(|(level, group)| LevelGroup {
                level,
                title: (self.config.show_levels && Some(level) != last)
                    .then(|| format!("niv{level}")),
                tasks: group.into_iter().map(|idx| self.graph.label(idx)).collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::relation_map;

    fn durations(entries: &[(&str, i64)]) -> Durations {
        entries
            .iter()
            .map(|&(k, v)| (k.to_string(), Quantity::integer(v)))
            .collect()
    }

    fn canonical() -> (Relation, Durations) {
        let relation = Relation::predecessors(relation_map([
            ("A", vec![]),
            ("B", vec![]),
            ("C", vec!["A"]),
            ("D", vec!["A", "B"]),
            ("E", vec!["B"]),
            ("F", vec!["D", "E"]),
            ("G", vec!["E"]),
            ("H", vec!["C", "F"]),
            ("I", vec!["F", "G"]),
            ("J", vec!["H", "I"]),
        ]));
        let durations = durations(&[
            ("A", 7),
            ("B", 3),
            ("C", 4),
            ("D", 2),
            ("E", 8),
            ("F", 6),
            ("G", 5),
            ("H", 7),
            ("I", 5),
            ("J", 3),
        ]);
        (relation, durations)
    }

    #[test]
    fn test_end_task_follows_sinks() {
        let (relation, durations) = canonical();
        let mpm = MpmGraph::new(&relation, &durations, GraphConfig::default()).unwrap();

        assert_eq!(mpm.len(), 11);
        assert_eq!(mpm.end_task().id(), "fin");
        assert!(mpm.end_task().is_synthetic());
        assert_eq!(mpm.predecessor_map()["fin"], vec!["J"]);
        assert_eq!(mpm.level_of("fin").unwrap(), 5);
        assert!(mpm.successor_map()["fin"].is_empty());
    }

    #[test]
    fn test_several_sinks_join_end() {
        let relation = Relation::successors(relation_map([("a", vec!["b", "c"])]));
        let mpm = MpmGraph::new(
            &relation,
            &durations(&[("a", 1), ("b", 2), ("c", 3)]),
            GraphConfig::default().with_end_label("end"),
        )
        .unwrap();

        assert_eq!(mpm.predecessor_map()["end"], vec!["b", "c"]);
        assert_eq!(mpm.start_edges(), vec!["a"]);
    }

    #[test]
    fn test_missing_duration() {
        let (relation, mut durations) = canonical();
        durations.remove("G");
        let err = MpmGraph::new(&relation, &durations, GraphConfig::default()).unwrap_err();
        assert_eq!(err, MpmError::MissingDuration("G".to_string()));
    }

    #[test]
    fn test_target_only_task_needs_duration() {
        let relation = Relation::successors(relation_map([("a", vec!["z"])]));
        let err = MpmGraph::new(&relation, &durations(&[("a", 1)]), GraphConfig::default())
            .unwrap_err();
        assert_eq!(err, MpmError::MissingDuration("z".to_string()));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let relation = Relation::successors(relation_map([("a", vec!["b"])]));
        let err = MpmGraph::new(
            &relation,
            &durations(&[("a", 1), ("b", -2)]),
            GraphConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MpmError::InvalidDuration { task, .. } if task == "b"));
    }

    #[test]
    fn test_cyclic_relation_rejected() {
        let relation = Relation::successors(relation_map([("a", vec!["b"]), ("b", vec!["a"])]));
        let err = MpmGraph::new(
            &relation,
            &durations(&[("a", 1), ("b", 1)]),
            GraphConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, MpmError::CyclicGraph);
    }

    #[test]
    fn test_end_label_collision() {
        let relation = Relation::successors(relation_map([("a", vec!["fin"])]));
        let err = MpmGraph::new(
            &relation,
            &durations(&[("a", 1), ("fin", 1)]),
            GraphConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MpmError::Configuration(_)));
    }

    #[test]
    fn test_from_input_requires_one_relation() {
        let err = MpmGraph::from_input(
            RelationInput::default(),
            &Durations::default(),
            GraphConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MpmError::Configuration(_)));
    }

    #[test]
    fn test_unknown_task_lookup() {
        let (relation, durations) = canonical();
        let mpm = MpmGraph::new(&relation, &durations, GraphConfig::default()).unwrap();
        assert_eq!(
            mpm.task("Z").unwrap_err(),
            MpmError::UnknownTask("Z".to_string())
        );
        assert!(mpm.level_of("Z").is_err());
    }

    #[test]
    fn test_weighted_edges_use_tail_duration() {
        let relation = Relation::successors(relation_map([("a", vec!["b"])]));
        let mpm = MpmGraph::new(
            &relation,
            &durations(&[("a", 4), ("b", 2)]),
            GraphConfig::default(),
        )
        .unwrap();

        assert_eq!(
            mpm.weighted_edges(),
            vec![
                ("a", "b", Quantity::integer(4)),
                ("b", "fin", Quantity::integer(2))
            ]
        );
    }

    #[test]
    fn test_level_group_titles() {
        let (relation, durations) = canonical();
        let hidden = MpmGraph::new(&relation, &durations, GraphConfig::default()).unwrap();
        assert!(hidden.level_groups().iter().all(|g| g.title.is_none()));

        let shown = MpmGraph::new(
            &relation,
            &durations,
            GraphConfig::default().with_show_levels(true),
        )
        .unwrap();
        let groups = shown.level_groups();
        assert_eq!(groups.len(), 6);
        assert_eq!(groups[0].title.as_deref(), Some("niv0"));
        assert_eq!(groups[0].tasks, vec!["A", "B"]);
        assert_eq!(groups[5].title, None);
        assert_eq!(groups[5].tasks, vec!["fin"]);
    }

    #[test]
    fn test_precision_from_durations() {
        let relation = Relation::successors(relation_map([("a", vec!["b"])]));
        let mut durations = durations(&[("a", 1)]);
        durations.insert("b".to_string(), "2.25".parse().unwrap());
        let mpm = MpmGraph::new(&relation, &durations, GraphConfig::default()).unwrap();

        assert_eq!(mpm.precision().digits(), 2);
        assert_eq!(mpm.format("3.50".parse().unwrap()), "3.5");
    }

    #[test]
    fn test_empty_relation_has_only_end() {
        let relation = Relation::successors(RelationMap::default());
        let mpm = MpmGraph::new(&relation, &Durations::default(), GraphConfig::default()).unwrap();
        assert_eq!(mpm.len(), 1);
        assert_eq!(mpm.level_of("fin").unwrap(), 0);
    }
}
