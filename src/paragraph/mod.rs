//! Paragraph records
//!
//! This module turns caller-supplied paragraph spans into ranked candidates
//! and attaches entity mentions to them through the interval tree.

pub mod assign;
pub mod segment;

pub use crate::types::Paragraph;
pub use assign::{assign_entities, index_paragraphs, AssignmentStats};
pub use segment::{build_paragraphs, ParagraphLimits};
