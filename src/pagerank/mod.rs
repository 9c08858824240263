//! Paragraph ranking
//!
//! This module provides the damped iterative score update over the
//! paragraph similarity graph, with an optional positional prior.

pub mod positional;

pub use positional::{position_bias, PositionalPageRank};

/// Result of a ranking run
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// Scores for each node (indexed by paragraph index)
    pub scores: Vec<f64>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Largest per-node change in the last iteration
    pub delta: f64,
    /// Whether the algorithm converged before the iteration cap
    pub converged: bool,
}

impl PageRankResult {
    /// Create a new ranking result
    pub fn new(scores: Vec<f64>, iterations: usize, delta: f64, converged: bool) -> Self {
        Self {
            scores,
            iterations,
            delta,
            converged,
        }
    }

    /// Get top N nodes by score, highest first
    pub fn top_n(&self, n: usize) -> Vec<(usize, f64)> {
        let mut indexed: Vec<_> = self.scores.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
        indexed.truncate(n);
        indexed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_n_orders_by_score() {
        let result = PageRankResult::new(vec![1.0, 3.0, 2.0], 4, 0.0, true);
        assert_eq!(result.top_n(2), vec![(1, 3.0), (2, 2.0)]);
        assert_eq!(result.top_n(10).len(), 3);
    }
}
