//! # key_paragraphs
//!
//! Selects the key paragraphs of a document by how strongly they share named
//! entities with the rest of the text.
//!
//! The caller supplies the document, the character spans of its paragraphs
//! and, per entity, the spans where it is mentioned. Paragraphs become nodes
//! of a graph weighted by entity overlap, a TextRank-style update with a
//! positional prior scores them, and the best `top_k` are returned together
//! with the entities they mention.
//!
//! ## Quick Start
//!
//! ```
//! use key_paragraphs::extract_key_paragraphs;
//!
//! let text = "lorem ipsum ".repeat(20);
//! let paragraphs = [(0, 50), (60, 120)];
//! let entities: Vec<Vec<(i64, i64)>> = vec![vec![(10, 12), (70, 72)]];
//!
//! let key = extract_key_paragraphs(&text, &paragraphs, &entities, 1);
//! assert_eq!(key.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`interval`]: augmented AVL interval tree for span lookup
//! - [`paragraph`]: paragraph filtering and entity assignment
//! - [`graph`]: entity-overlap similarity graph
//! - [`pagerank`]: damped score update with positional prior
//! - [`summarizer`]: top-k selection
//! - [`pipeline`]: stage orchestration and observer hooks

pub mod errors;
pub mod graph;
pub mod interval;
pub mod pagerank;
pub mod paragraph;
pub mod pipeline;
pub mod summarizer;
pub mod types;

pub use errors::{RankError, Result};
pub use interval::IntervalTree;
pub use pipeline::{extract_key_paragraphs, ParagraphRanker, PipelineObserver};
pub use summarizer::KeyParagraphs;
pub use types::{Interval, Paragraph, PositionPrior, RankerConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
