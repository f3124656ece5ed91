//! Topological levels by iterated matrix nulling.
//!
//! Column `j` of `A^k` is null iff no walk of length `k` ends at `j`. In an
//! acyclic graph, a vertex whose column first becomes null at `A^(k+1)` has
//! a longest incoming path of exactly `k` edges, which is its level. This is
//! Kahn's layering expressed with the same power primitive the closure uses.

use std::borrow::Borrow;

use rustc_hash::FxHashMap;

use crate::error::{MpmError, Result};
use crate::graph::SimpleGraph;
use crate::interner::VertexIndex;
use crate::matrix::Matrix;
use crate::relation::Relation;

/// Level of every vertex, indexed by vertex.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelMap {
    levels: Vec<usize>,
}

impl LevelMap {
    #[inline]
    pub fn level(&self, idx: VertexIndex) -> usize {
        self.levels[idx]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn max_level(&self) -> Option<usize> {
        self.levels.iter().copied().max()
    }

    /// Vertices grouped by level; `groups()[l]` holds level `l` in vertex order.
    pub fn groups(&self) -> Vec<Vec<VertexIndex>> {
        let mut groups = vec![Vec::new(); self.max_level().map_or(0, |m| m + 1)];
        for (idx, &level) in self.levels.iter().enumerate() {
            groups[level].push(idx);
        }
        groups
    }

    /// Vertices sorted by ascending level, ties by vertex index.
    pub fn ascending(&self) -> Vec<VertexIndex> {
        let mut order: Vec<VertexIndex> = (0..self.levels.len()).collect();
        order.sort_by_key(|&idx| (self.levels[idx], idx));
        order
    }

    /// Vertices sorted by descending level, ties by descending vertex index.
    pub fn descending(&self) -> Vec<VertexIndex> {
        let mut order = self.ascending();
        order.reverse();
        order
    }
}

/// Assign levels from an adjacency matrix.
///
/// The graph must be acyclic. On a cyclic graph some columns never become
/// null; that is detected after `n` powers and reported as
/// `MpmError::CyclicGraph`.
pub fn assign_levels(adjacency: &Matrix) -> Result<LevelMap> {
    let n = adjacency.size();
    levels_from_powers(n, adjacency.powers().take(n))
}

impl<N> SimpleGraph<N> {
    /// Levels from the powers already computed for the closure.
    pub fn assign_levels(&self) -> Result<LevelMap> {
        levels_from_powers(self.len(), self.powers())
    }
}

/// Levels from `A^1, A^2, ...` of an `n`-vertex graph.
///
/// An acyclic graph has `A^n = 0`, so `n` powers always suffice.
fn levels_from_powers<M: Borrow<Matrix>>(
    n: usize,
    powers: impl IntoIterator<Item = M>,
) -> Result<LevelMap> {
    let mut levels: Vec<Option<usize>> = vec![None; n];
    let mut assigned = 0;

    if n == 0 {
        return Ok(LevelMap::default());
    }

    // powers[level] = A^(level + 1)
    for (level, power) in powers.into_iter().take(n).enumerate() {
        for col in power.borrow().null_columns() {
            if levels[col].is_none() {
                levels[col] = Some(level);
                assigned += 1;
            }
        }
        if assigned == n {
            return Ok(LevelMap {
                levels: levels.into_iter().map(|l| l.unwrap_or(0)).collect(),
            });
        }
    }

    Err(MpmError::CyclicGraph)
}

/// Structural graph with levels when it has no circuit.
///
/// Levelling is skipped silently on a cyclic graph; `levels()` is then `None`.
#[derive(Clone, Debug)]
pub struct LeveledGraph {
    graph: SimpleGraph,
    levels: Option<LevelMap>,
}

impl LeveledGraph {
    pub fn new(relation: &Relation) -> Self {
        let graph = SimpleGraph::new(relation);
        let levels = if graph.has_no_circuit() {
            graph.assign_levels().ok()
        } else {
            None
        };
        Self { graph, levels }
    }

    pub fn graph(&self) -> &SimpleGraph {
        &self.graph
    }

    pub fn levels(&self) -> Option<&LevelMap> {
        self.levels.as_ref()
    }

    pub fn level_of(&self, label: &str) -> Option<usize> {
        let idx = self.graph.index_of(label)?;
        self.levels.as_ref().map(|levels| levels.level(idx))
    }

    /// Label -> level; empty for a cyclic graph.
    pub fn level_map(&self) -> FxHashMap<String, usize> {
        match &self.levels {
            Some(levels) => self
                .graph
                .ordering()
                .labels()
                .iter()
                .cloned()
                .zip(levels.as_slice().iter().copied())
                .collect(),
            None => FxHashMap::default(),
        }
    }

    /// Labels grouped by level, for renderers that align a level on one rank.
    pub fn level_groups(&self) -> Vec<Vec<&str>> {
        match &self.levels {
            Some(levels) => levels
                .groups()
                .into_iter()
                .map(|group| group.into_iter().map(|idx| self.graph.label(idx)).collect())
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::relation_map;

    fn canonical() -> Relation {
        Relation::predecessors(relation_map([
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
        ]))
    }

    #[test]
    fn test_canonical_levels() {
        let leveled = LeveledGraph::new(&canonical());
        let expected = [
            ("A", 0),
            ("B", 0),
            ("C", 1),
            ("D", 1),
            ("E", 1),
            ("F", 2),
            ("G", 2),
            ("H", 3),
            ("I", 3),
            ("J", 4),
        ];
        for (label, level) in expected {
            assert_eq!(leveled.level_of(label), Some(level), "level of {label}");
        }
        assert_eq!(
            leveled.level_groups(),
            vec![
                vec!["A", "B"],
                vec!["C", "D", "E"],
                vec!["F", "G"],
                vec!["H", "I"],
                vec!["J"]
            ]
        );
    }

    #[test]
    fn test_level_is_longest_path() {
        // a -> b -> c and a -> c: c sits at level 2, not 1
        let relation = Relation::successors(relation_map([("a", vec!["b", "c"]), ("b", vec!["c"])]));
        let leveled = LeveledGraph::new(&relation);
        assert_eq!(leveled.level_of("c"), Some(2));
    }

    #[test]
    fn test_cyclic_graph_skips_levels() {
        let relation = Relation::successors(relation_map([("a", vec!["b"]), ("b", vec!["a"])]));
        let leveled = LeveledGraph::new(&relation);

        assert!(leveled.levels().is_none());
        assert!(leveled.level_groups().is_empty());
        assert!(leveled.level_map().is_empty());
        assert_eq!(
            assign_levels(leveled.graph().adjacency()),
            Err(MpmError::CyclicGraph)
        );
    }

    #[test]
    fn test_isolated_vertices_are_level_zero() {
        let relation = Relation::successors(relation_map([("x", Vec::<&str>::new()), ("y", vec![])]));
        let leveled = LeveledGraph::new(&relation);
        assert_eq!(leveled.level_map().get("x"), Some(&0));
        assert_eq!(leveled.level_map().get("y"), Some(&0));
    }

    #[test]
    fn test_ascending_and_descending_orders() {
        let graph = SimpleGraph::new(&canonical());
        let levels = assign_levels(graph.adjacency()).unwrap();

        let ascending = levels.ascending();
        assert_eq!(ascending.first(), Some(&0));
        assert_eq!(ascending.last(), Some(&9));
        for pair in ascending.windows(2) {
            assert!(levels.level(pair[0]) <= levels.level(pair[1]));
        }
        assert_eq!(levels.descending().first(), Some(&9));
    }

    #[test]
    fn test_stored_powers_match_fresh_powers() {
        let graph = SimpleGraph::new(&canonical());
        assert_eq!(graph.assign_levels(), assign_levels(graph.adjacency()));

        let cyclic = SimpleGraph::new(&Relation::successors(relation_map([
            ("a", vec!["b"]),
            ("b", vec!["c"]),
            ("c", vec!["a"]),
        ])));
        assert_eq!(cyclic.assign_levels(), Err(MpmError::CyclicGraph));
    }

    #[test]
    fn test_longest_chain_needs_every_power() {
        // a -> b -> c -> d: d first has a null column in A^4
        let relation = Relation::successors(relation_map([
            ("a", vec!["b"]),
            ("b", vec!["c"]),
            ("c", vec!["d"]),
        ]));
        let levels = SimpleGraph::new(&relation).assign_levels().unwrap();
        assert_eq!(levels.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_adjacency() {
        let levels = assign_levels(&Matrix::zeros(0)).unwrap();
        assert!(levels.is_empty());
        assert!(levels.groups().is_empty());
    }
}
