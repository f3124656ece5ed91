//! Vertex ordering: task labels to dense matrix indices.
//!
//! Labels are sorted lexicographically once, so index `i` is the `i`-th
//! smallest label. Every matrix of a graph is indexed through this ordering.

use rustc_hash::FxHashMap;

/// Dense vertex index (0-based; display numbering adds one).
pub type VertexIndex = usize;

/// Bijection between task labels and dense indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexOrdering {
    to_index: FxHashMap<String, VertexIndex>,
    labels: Vec<String>,
}

impl VertexOrdering {
    /// Build the ordering from any collection of labels.
    /// Duplicates collapse to one vertex.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort();
        labels.dedup();

        let mut to_index =
            FxHashMap::with_capacity_and_hasher(labels.len(), Default::default());
        for (idx, label) in labels.iter().enumerate() {
            to_index.insert(label.clone(), idx);
        }

        Self { to_index, labels }
    }

    /// Index of a label, if it is a vertex.
    #[inline]
    pub fn index_of(&self, label: &str) -> Option<VertexIndex> {
        self.to_index.get(label).copied()
    }

    /// Label of an index.
    #[inline]
    pub fn label(&self, idx: VertexIndex) -> Option<&str> {
        self.labels.get(idx).map(|s| s.as_str())
    }

    /// Labels in vertex order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// 1-based numbering used by matrix displays: `(number, label)`.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (idx + 1, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_and_deduplicated() {
        let ordering = VertexOrdering::from_labels(["C", "A", "B", "A"]);

        assert_eq!(ordering.len(), 3);
        assert_eq!(ordering.labels(), &["A", "B", "C"]);
        assert_eq!(ordering.index_of("A"), Some(0));
        assert_eq!(ordering.index_of("C"), Some(2));
        assert_eq!(ordering.index_of("Z"), None);
        assert_eq!(ordering.label(1), Some("B"));
        assert_eq!(ordering.label(3), None);
    }

    #[test]
    fn test_numbered_is_one_based() {
        let ordering = VertexOrdering::from_labels(["y", "x"]);
        let numbered: Vec<_> = ordering.numbered().collect();
        assert_eq!(numbered, vec![(1, "x"), (2, "y")]);
    }

    #[test]
    fn test_lexicographic_not_numeric() {
        let ordering = VertexOrdering::from_labels(["10", "2", "1"]);
        assert_eq!(ordering.labels(), &["1", "10", "2"]);
    }
}
