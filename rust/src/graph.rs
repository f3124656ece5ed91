//! Simple directed graph: adjacency, derived relation and transitive closure.

use std::convert::Infallible;

use crate::interner::{VertexIndex, VertexOrdering};
use crate::matrix::Matrix;
use crate::relation::{Direction, Relation, RelationMap};

/// Directed graph over sorted task labels with its matrix algebra.
///
/// Built once from a [`Relation`]; everything here is immutable afterwards
/// except the node payloads, which schedule passes update in place.
#[derive(Clone, Debug)]
pub struct SimpleGraph<N = String> {
    ordering: VertexOrdering,
    nodes: Vec<N>,
    source: Direction,
    adjacency: Matrix,
    predecessors: Vec<Vec<VertexIndex>>,
    successors: Vec<Vec<VertexIndex>>,
    /// `A^1 ..= A^n`.
    powers: Vec<Matrix>,
    closure: Matrix,
}

impl SimpleGraph<String> {
    /// Graph whose nodes are the task labels themselves.
    pub fn new(relation: &Relation) -> Self {
        match Self::with_nodes(relation, |label| Ok::<_, Infallible>(label.to_string())) {
            Ok(graph) => graph,
            Err(never) => match never {},
        }
    }
}

impl<N> SimpleGraph<N> {
    /// Build the graph, creating one node per vertex with `make_node`.
    ///
    /// Labels that only appear as neighbours still become vertices. Repeated
    /// neighbours collapse into a single edge.
    pub fn with_nodes<F, E>(relation: &Relation, mut make_node: F) -> Result<Self, E>
    where
        F: FnMut(&str) -> Result<N, E>,
    {
        let ordering = VertexOrdering::from_labels(relation.labels());
        let n = ordering.len();

        let mut adjacency = Matrix::zeros(n);
        for (key, neighbours) in relation.map() {
            // Every label was interned above, so lookups cannot miss.
            let Some(k) = ordering.index_of(key) else {
                continue;
            };
            for neighbour in neighbours {
                let Some(v) = ordering.index_of(neighbour) else {
                    continue;
                };
                match relation.direction() {
                    Direction::Successors => adjacency.set(k, v, 1),
                    Direction::Predecessors => adjacency.set(v, k, 1),
                }
            }
        }

        let predecessors = (0..n)
            .map(|j| (0..n).filter(|&i| adjacency.get(i, j) != 0).collect())
            .collect();
        let successors = (0..n)
            .map(|i| (0..n).filter(|&j| adjacency.get(i, j) != 0).collect())
            .collect();

        let powers: Vec<Matrix> = adjacency.powers().take(n).collect();
        let closure = Matrix::boolean_union(n, &powers);

        let nodes = ordering
            .labels()
            .iter()
            .map(|label| make_node(label.as_str()))
            .collect::<Result<Vec<N>, E>>()?;

        Ok(Self {
            ordering,
            nodes,
            source: relation.direction(),
            adjacency,
            predecessors,
            successors,
            powers,
            closure,
        })
    }

    pub fn len(&self) -> usize {
        self.ordering.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordering.is_empty()
    }

    pub fn ordering(&self) -> &VertexOrdering {
        &self.ordering
    }

    #[inline]
    pub fn index_of(&self, label: &str) -> Option<VertexIndex> {
        self.ordering.index_of(label)
    }

    /// Label of a vertex. Panics on an out-of-range index.
    #[inline]
    pub fn label(&self, idx: VertexIndex) -> &str {
        &self.ordering.labels()[idx]
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [N] {
        &mut self.nodes
    }

    pub fn node(&self, label: &str) -> Option<&N> {
        self.index_of(label).map(|idx| &self.nodes[idx])
    }

    /// Direction the graph was built from; the other one is derived.
    pub fn source_direction(&self) -> Direction {
        self.source
    }

    pub fn adjacency(&self) -> &Matrix {
        &self.adjacency
    }

    /// Transitive closure: `(i, j) = 1` iff `j` is reachable from `i`.
    pub fn closure(&self) -> &Matrix {
        &self.closure
    }

    /// `A^k` for `k` in `1..=n`.
    pub fn power(&self, k: usize) -> Option<&Matrix> {
        k.checked_sub(1).and_then(|i| self.powers.get(i))
    }

    /// `A^1 ..= A^n`, in order.
    pub fn powers(&self) -> &[Matrix] {
        &self.powers
    }

    /// Closure first, then `A^1 ..= A^n`.
    pub fn matrices(&self) -> Vec<&Matrix> {
        std::iter::once(&self.closure).chain(&self.powers).collect()
    }

    /// True iff the closure has a zero trace, i.e. no vertex reaches itself.
    pub fn has_no_circuit(&self) -> bool {
        self.closure.trace() == 0
    }

    #[inline]
    pub fn predecessors_of(&self, idx: VertexIndex) -> &[VertexIndex] {
        &self.predecessors[idx]
    }

    #[inline]
    pub fn successors_of(&self, idx: VertexIndex) -> &[VertexIndex] {
        &self.successors[idx]
    }

    /// Vertices without predecessors.
    pub fn sources(&self) -> Vec<VertexIndex> {
        (0..self.len())
            .filter(|&i| self.predecessors[i].is_empty())
            .collect()
    }

    /// Vertices without successors.
    pub fn sinks(&self) -> Vec<VertexIndex> {
        (0..self.len())
            .filter(|&i| self.successors[i].is_empty())
            .collect()
    }

    pub fn predecessor_map(&self) -> RelationMap {
        self.label_map(&self.predecessors)
    }

    pub fn successor_map(&self) -> RelationMap {
        self.label_map(&self.successors)
    }

    /// The relation opposite to the one the graph was built from.
    pub fn derived_relation(&self) -> Relation {
        match self.source {
            Direction::Successors => Relation::predecessors(self.predecessor_map()),
            Direction::Predecessors => Relation::successors(self.successor_map()),
        }
    }

    /// Direct edges `(from, to)` in row-major order.
    pub fn edges(&self) -> Vec<(VertexIndex, VertexIndex)> {
        self.successors
            .iter()
            .enumerate()
            .flat_map(|(i, succ)| succ.iter().map(move |&j| (i, j)))
            .collect()
    }

    /// Closure edges that are not direct edges (implied by transitivity).
    pub fn closure_only_edges(&self) -> Vec<(VertexIndex, VertexIndex)> {
        let n = self.len();
        let mut edges = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if self.closure.get(i, j) != 0 && self.adjacency.get(i, j) == 0 {
                    edges.push((i, j));
                }
            }
        }
        edges
    }

    fn label_map(&self, lists: &[Vec<VertexIndex>]) -> RelationMap {
        lists
            .iter()
            .enumerate()
            .map(|(i, list)| {
                let labels = list.iter().map(|&j| self.label(j).to_string()).collect();
                (self.label(i).to_string(), labels)
            })
            .collect()
    }
}
