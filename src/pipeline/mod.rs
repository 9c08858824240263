//! Ranking pipeline
//!
//! Stage orchestration ([`runner`]) and the observer hooks it reports to
//! ([`observer`]).

pub mod observer;
pub mod runner;

pub use observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, StageReportBuilder,
    StageTimingObserver,
};
pub use runner::{extract_key_paragraphs, ParagraphRanker};
