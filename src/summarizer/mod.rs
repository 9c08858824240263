//! Key paragraph selection
//!
//! Turns the final paragraph scores into the ordered index -> entity ids map
//! returned to callers.

pub mod selector;

pub use selector::{KeyParagraphs, ParagraphSelector, SelectedParagraph, SelectionResult};
