//! Paragraph filtering
//!
//! Paragraph boundaries come from the caller; this stage only decides which
//! of them take part in ranking. Short spans are dropped and the remainder is
//! capped at the first `max_paragraphs` in document order.

use crate::types::{Interval, Paragraph, RankerConfig};

/// Filtering thresholds for paragraph spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphLimits {
    /// Spans with `high - low` below this are discarded
    pub min_len: i64,
    /// Survivors past this count are discarded
    pub max_count: usize,
}

impl Default for ParagraphLimits {
    fn default() -> Self {
        Self {
            min_len: 40,
            max_count: 30,
        }
    }
}

impl From<&RankerConfig> for ParagraphLimits {
    fn from(config: &RankerConfig) -> Self {
        Self {
            min_len: config.min_paragraph_len,
            max_count: config.max_paragraphs,
        }
    }
}

/// Build paragraph records from spans, in the given order
///
/// Later paragraphs are dropped without regard to importance once
/// `max_count` is reached. Returns `None` when no paragraph survives.
pub fn build_paragraphs(spans: &[(i64, i64)], limits: ParagraphLimits) -> Option<Vec<Paragraph>> {
    let paragraphs: Vec<Paragraph> = spans
        .iter()
        .map(|&span| Interval::from(span))
        .filter(|position| position.span_len() >= limits.min_len)
        .take(limits.max_count)
        .map(Paragraph::new)
        .collect();

    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs)
    }
}
