//! Task registry input: the precedence relation as supplied by the caller.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::error::{MpmError, Result};

/// Task label -> directly related task labels.
pub type RelationMap = FxHashMap<String, Vec<String>>;

/// Which side of the precedence relation a map describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// `map[t]` lists the tasks that must finish before `t`.
    Predecessors,
    /// `map[t]` lists the tasks that follow `t`.
    Successors,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Predecessors => Direction::Successors,
            Direction::Successors => Direction::Predecessors,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Predecessors => write!(f, "predecessors"),
            Direction::Successors => write!(f, "successors"),
        }
    }
}

/// A precedence relation given in exactly one direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    direction: Direction,
    map: RelationMap,
}

impl Relation {
    pub fn new(direction: Direction, map: RelationMap) -> Self {
        Self { direction, map }
    }

    pub fn predecessors(map: RelationMap) -> Self {
        Self::new(Direction::Predecessors, map)
    }

    pub fn successors(map: RelationMap) -> Self {
        Self::new(Direction::Successors, map)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn map(&self) -> &RelationMap {
        &self.map
    }

    pub fn into_map(self) -> RelationMap {
        self.map
    }

    /// Every label the relation mentions, as a key or as a neighbour.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.map
            .iter()
            .flat_map(|(k, vs)| std::iter::once(k.as_str()).chain(vs.iter().map(|v| v.as_str())))
    }
}

/// Caller-facing relation options: one of the two maps must be set.
#[derive(Clone, Debug, Default)]
pub struct RelationInput {
    pub predecessors: Option<RelationMap>,
    pub successors: Option<RelationMap>,
}

impl RelationInput {
    /// Validate the options into a single-direction relation.
    ///
    /// Fails with `MpmError::Configuration` when neither or both maps are set.
    pub fn into_relation(self) -> Result<Relation> {
        match (self.predecessors, self.successors) {
            (Some(map), None) => Ok(Relation::predecessors(map)),
            (None, Some(map)) => Ok(Relation::successors(map)),
            (None, None) => Err(MpmError::Configuration(
                "one of predecessors or successors is required".to_string(),
            )),
            (Some(_), Some(_)) => Err(MpmError::Configuration(
                "predecessors and successors are mutually exclusive".to_string(),
            )),
        }
    }
}

impl TryFrom<RelationInput> for Relation {
    type Error = MpmError;

    fn try_from(input: RelationInput) -> Result<Self> {
        input.into_relation()
    }
}

/// Build a `RelationMap` from `(label, neighbours)` pairs.
pub fn relation_map<I, K, N, S>(entries: I) -> RelationMap
where
    I: IntoIterator<Item = (K, N)>,
    K: Into<String>,
    N: IntoIterator<Item = S>,
    S: Into<String>,
{
    entries
        .into_iter()
        .map(|(k, ns)| (k.into(), ns.into_iter().map(Into::into).collect()))
        .collect()
}
