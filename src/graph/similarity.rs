//! Paragraph similarity graph
//!
//! Paragraphs are linked by the entities they share. With at most a few
//! dozen paragraphs per request, the graph is kept as a dense symmetric
//! matrix together with each node's total outgoing weight.

use crate::types::Paragraph;

/// Denominators smaller than this make the similarity zero
pub const DENOMINATOR_EPSILON: f64 = 1e-6;

/// Nodes whose outgoing weight is at or below this contribute nothing
pub const OUT_WEIGHT_EPSILON: f64 = 1e-6;

/// Entity-overlap similarity between two paragraphs
///
/// `|ids(a) ∩ ids(b)| / (ln mentions(a) + ln mentions(b))`, or zero when
/// either paragraph has no mentions or the denominator vanishes (two
/// paragraphs with a single mention each).
pub fn paragraph_similarity(a: &Paragraph, b: &Paragraph) -> f64 {
    if a.mention_count() == 0 || b.mention_count() == 0 {
        return 0.0;
    }

    let denominator = (a.mention_count() as f64).ln() + (b.mention_count() as f64).ln();
    if denominator.abs() < DENOMINATOR_EPSILON {
        return 0.0;
    }

    a.common_entities(b) as f64 / denominator
}

/// A symmetric weighted graph over paragraphs
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    /// Number of nodes
    pub num_nodes: usize,
    /// Row-major `num_nodes x num_nodes` weights; the diagonal stays zero
    weights: Vec<f64>,
    /// Sum of each row, diagonal excluded
    out_weight: Vec<f64>,
}

impl SimilarityGraph {
    /// Build the graph from paragraphs with their entities assigned
    pub fn from_paragraphs(paragraphs: &[Paragraph]) -> Self {
        let n = paragraphs.len();
        let mut weights = vec![0.0; n * n];

        for a in 0..n {
            for b in (a + 1)..n {
                let similarity = paragraph_similarity(&paragraphs[a], &paragraphs[b]);
                weights[a * n + b] = similarity;
                weights[b * n + a] = similarity;
            }
        }

        let out_weight: Vec<f64> = (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| j != i)
                    .map(|j| weights[i * n + j])
                    .sum::<f64>()
            })
            .collect();

        Self {
            num_nodes: n,
            weights,
            out_weight,
        }
    }

    /// Edge weight between two nodes (zero on the diagonal)
    #[inline]
    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.weights[from * self.num_nodes + to]
    }

    /// Total outgoing weight of a node
    #[inline]
    pub fn out_weight(&self, node: usize) -> f64 {
        self.out_weight[node]
    }

    /// Iterate over neighbours with a positive edge weight
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let row = &self.weights[node * self.num_nodes..(node + 1) * self.num_nodes];
        row.iter()
            .enumerate()
            .filter(move |&(j, &w)| j != node && w > 0.0)
            .map(|(j, &w)| (j, w))
    }

    /// Number of undirected edges with positive weight
    pub fn num_edges(&self) -> usize {
        (0..self.num_nodes).map(|i| self.neighbors(i).count()).sum::<usize>() / 2
    }

    /// Nodes that pass no score on (outgoing weight ~ 0)
    pub fn dangling_nodes(&self) -> Vec<usize> {
        (0..self.num_nodes)
            .filter(|&n| self.out_weight[n] <= OUT_WEIGHT_EPSILON)
            .collect()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }
}

impl Default for SimilarityGraph {
    fn default() -> Self {
        Self {
            num_nodes: 0,
            weights: Vec::new(),
            out_weight: Vec::new(),
        }
    }
}
