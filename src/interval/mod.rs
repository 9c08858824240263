//! Interval indexing
//!
//! This module provides the augmented AVL interval tree used to map an
//! entity mention span to the paragraph that contains it.

pub mod tree;

pub use crate::types::Interval;
pub use tree::{Inorder, IntervalTree, TreeEntry};
