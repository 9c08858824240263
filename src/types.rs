//! Core types for key_paragraphs
//!
//! This module defines the fundamental data structures used throughout the library:
//! character-offset intervals, paragraph records, and ranker configuration.

use crate::errors::{RankError, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Interval
// ============================================================================

/// An inclusive character-offset range `[low, high]`.
///
/// `low <= high` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Interval {
    /// First character offset (inclusive)
    pub low: i64,
    /// Last character offset (inclusive)
    pub high: i64,
}

impl Interval {
    /// Create a new interval
    pub fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// Two closed intervals overlap iff `a.low <= b.high && b.low <= a.high`
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.low <= other.high && other.low <= self.high
    }

    /// Distance between the bounds (`high - low`), saturating at the `i64` range
    pub fn span_len(&self) -> i64 {
        self.high.saturating_sub(self.low)
    }
}

impl From<(i64, i64)> for Interval {
    fn from((low, high): (i64, i64)) -> Self {
        Self { low, high }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

// ============================================================================
// Paragraph
// ============================================================================

/// A paragraph of the input document and the entities mentioned in it.
///
/// `mention_count` counts every assigned mention, repeats included, while
/// `entity_ids` holds each entity once. The similarity denominator uses the
/// former and the intersection numerator the latter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    position: Interval,
    entity_ids: FxHashSet<usize>,
    mention_count: usize,
}

impl Paragraph {
    /// Create a paragraph with no mentions
    pub fn new(position: Interval) -> Self {
        Self {
            position,
            entity_ids: FxHashSet::default(),
            mention_count: 0,
        }
    }

    /// Character span of the paragraph
    pub fn position(&self) -> Interval {
        self.position
    }

    /// Distinct entities mentioned in the paragraph
    pub fn entity_ids(&self) -> &FxHashSet<usize> {
        &self.entity_ids
    }

    /// Total number of mentions assigned, including repeats
    pub fn mention_count(&self) -> usize {
        self.mention_count
    }

    /// Record one mention of `entity` in this paragraph
    pub fn record_mention(&mut self, entity: usize) {
        self.entity_ids.insert(entity);
        self.mention_count += 1;
    }

    /// Number of entities shared with another paragraph
    pub fn common_entities(&self, other: &Paragraph) -> usize {
        let (small, large) = if self.entity_ids.len() <= other.entity_ids.len() {
            (&self.entity_ids, &other.entity_ids)
        } else {
            (&other.entity_ids, &self.entity_ids)
        };
        small.iter().filter(|id| large.contains(id)).count()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Additive prior applied to each paragraph score after every iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionPrior {
    /// U-shaped bonus favouring the start, the end and the exact middle
    #[default]
    UShaped,
    /// No positional prior (plain damped update)
    None,
}

/// Configuration for paragraph ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    /// Damping factor for the score update (typically 0.85)
    pub damping: f64,
    /// Maximum iterations of the score update
    pub max_iterations: usize,
    /// Convergence threshold (stop when the largest delta drops below it)
    pub convergence_threshold: f64,
    /// Paragraphs whose span is shorter than this are discarded
    pub min_paragraph_len: i64,
    /// Only the first `max_paragraphs` surviving paragraphs are ranked
    pub max_paragraphs: usize,
    /// Longest accepted input, in characters
    pub max_text_len: usize,
    /// Positional prior added to every score
    pub position_prior: PositionPrior,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            convergence_threshold: 1e-5,
            min_paragraph_len: 40,
            max_paragraphs: 30,
            max_text_len: 100_000,
            position_prior: PositionPrior::UShaped,
        }
    }
}

impl RankerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON and validate it
    ///
    /// Omitted fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(RankError::invalid_config(format!(
                "damping must be between 0 and 1, got {}",
                self.damping
            )));
        }

        if self.max_iterations == 0 {
            return Err(RankError::invalid_config("max_iterations must be > 0"));
        }

        if !(self.convergence_threshold > 0.0) {
            return Err(RankError::invalid_config(
                "convergence_threshold must be > 0",
            ));
        }

        if self.max_paragraphs == 0 {
            return Err(RankError::invalid_config("max_paragraphs must be > 0"));
        }

        Ok(())
    }

    /// Builder method: set damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Builder method: set max iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder method: set convergence threshold
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Builder method: set minimum paragraph span
    pub fn with_min_paragraph_len(mut self, min_len: i64) -> Self {
        self.min_paragraph_len = min_len;
        self
    }

    /// Builder method: set maximum number of ranked paragraphs
    pub fn with_max_paragraphs(mut self, max: usize) -> Self {
        self.max_paragraphs = max;
        self
    }

    /// Builder method: set maximum input length
    pub fn with_max_text_len(mut self, max: usize) -> Self {
        self.max_text_len = max;
        self
    }

    /// Builder method: set positional prior
    pub fn with_position_prior(mut self, prior: PositionPrior) -> Self {
        self.position_prior = prior;
        self
    }
}
