//! Top-k paragraph selection
//!
//! Orders paragraphs by their final score and keeps the best `top_k`. The
//! sort is stable, so equal scores keep document order.

use crate::pagerank::PageRankResult;
use crate::types::Paragraph;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Selected paragraph indices mapped to the entities they mention
pub type KeyParagraphs = BTreeMap<usize, BTreeSet<usize>>;

/// A selected paragraph with its score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedParagraph {
    /// Index into the ranked (filtered) paragraph list
    pub index: usize,
    /// Final score
    pub score: f64,
    /// Entities mentioned in the paragraph, ordered
    pub entity_ids: BTreeSet<usize>,
}

/// Result of paragraph selection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionResult {
    /// Selected paragraphs, highest score first
    pub paragraphs: Vec<SelectedParagraph>,
}

impl SelectionResult {
    /// Number of selected paragraphs
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Materialise the index -> entity ids map
    pub fn to_key_paragraphs(&self) -> KeyParagraphs {
        self.paragraphs
            .iter()
            .map(|p| (p.index, p.entity_ids.clone()))
            .collect()
    }
}

/// Score-ordered top-k selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphSelector {
    top_k: usize,
}

impl ParagraphSelector {
    /// Create a selector keeping at most `top_k` paragraphs
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Pick the `min(top_k, n)` best-scoring paragraphs
    pub fn select(&self, paragraphs: &[Paragraph], ranking: &PageRankResult) -> SelectionResult {
        let selected = ranking
            .top_n(self.top_k)
            .into_iter()
            .filter_map(|(index, score)| {
                paragraphs.get(index).map(|paragraph| SelectedParagraph {
                    index,
                    score,
                    entity_ids: paragraph.entity_ids().iter().copied().collect(),
                })
            })
            .collect();

        SelectionResult {
            paragraphs: selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Interval;

    fn paragraphs(n: usize) -> Vec<Paragraph> {
        (0..n)
            .map(|i| {
                let mut p = Paragraph::new(Interval::new(i as i64 * 100, i as i64 * 100 + 50));
                p.record_mention(i);
                p.record_mention(i + 10);
                p
            })
            .collect()
    }

    #[test]
    fn test_select_highest_scores() {
        let paragraphs = paragraphs(4);
        let ranking = PageRankResult::new(vec![0.5, 2.0, 1.0, 1.5], 10, 0.0, true);

        let result = ParagraphSelector::new(2).select(&paragraphs, &ranking);

        let indices: Vec<usize> = result.paragraphs.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(result.paragraphs[0].score, 2.0);
        assert_eq!(
            result.paragraphs[0].entity_ids,
            [1, 11].into_iter().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_top_k_larger_than_paragraphs() {
        let paragraphs = paragraphs(3);
        let ranking = PageRankResult::new(vec![1.0, 1.0, 1.0], 1, 0.0, true);

        let result = ParagraphSelector::new(10).select(&paragraphs, &ranking);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_ties_keep_document_order() {
        let paragraphs = paragraphs(3);
        let ranking = PageRankResult::new(vec![1.3, 1.1, 1.3], 1, 0.0, true);

        let result = ParagraphSelector::new(1).select(&paragraphs, &ranking);
        assert_eq!(result.paragraphs[0].index, 0);
    }

    #[test]
    fn test_zero_top_k() {
        let paragraphs = paragraphs(2);
        let ranking = PageRankResult::new(vec![1.0, 2.0], 1, 0.0, true);

        let result = ParagraphSelector::new(0).select(&paragraphs, &ranking);
        assert!(result.is_empty());
        assert!(result.to_key_paragraphs().is_empty());
    }

    #[test]
    fn test_to_key_paragraphs_ordered_by_index() {
        let paragraphs = paragraphs(3);
        let ranking = PageRankResult::new(vec![0.1, 0.2, 0.3], 1, 0.0, true);

        let map = ParagraphSelector::new(3)
            .select(&paragraphs, &ranking)
            .to_key_paragraphs();

        let keys: Vec<usize> = map.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2]);
        assert!(map[&2].contains(&12));
    }

    #[test]
    fn test_selection_serializes() {
        let paragraphs = paragraphs(1);
        let ranking = PageRankResult::new(vec![1.45], 100, 1.3, false);

        let result = ParagraphSelector::new(1).select(&paragraphs, &ranking);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["paragraphs"][0]["index"], 0);
        assert_eq!(json["paragraphs"][0]["entity_ids"], serde_json::json!([0, 10]));
    }
}
