//! Graph construction and representation
//!
//! This module provides the entity co-occurrence graph over paragraphs.

pub mod similarity;

pub use similarity::{paragraph_similarity, SimilarityGraph};
