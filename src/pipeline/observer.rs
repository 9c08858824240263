//! Pipeline observer: hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. Use cases include timing stages, capturing intermediate
//! artifacts in tests, and collecting the entity mentions that fell outside
//! every paragraph.
//!
//! Every hook has a no-op default, so an observer only implements what it
//! cares about. [`NoopObserver`] is zero-sized and compiles away entirely.

use crate::graph::SimilarityGraph;
use crate::interval::IntervalTree;
use crate::pagerank::PageRankResult;
use crate::summarizer::SelectionResult;
use crate::types::{Interval, Paragraph};
use std::time::{Duration, Instant};

/// Paragraph filtering and truncation
pub const STAGE_PARAGRAPHS: &str = "paragraphs";
/// Interval tree build and entity assignment
pub const STAGE_ASSIGN: &str = "assign";
/// Similarity matrix construction
pub const STAGE_GRAPH: &str = "graph";
/// Iterative scoring
pub const STAGE_RANK: &str = "rank";
/// Top-k selection
pub const STAGE_SELECT: &str = "select";

// ============================================================================
// StageClock / StageReport
// ============================================================================

/// Wall-clock timer for a single stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock(Instant);

impl StageClock {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Summary of one completed stage.
///
/// Only the metrics meaningful for a stage are set; the rest stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    elapsed: Duration,
    paragraphs: Option<usize>,
    nodes: Option<usize>,
    edges: Option<usize>,
    matched: Option<usize>,
    unmatched: Option<usize>,
    iterations: Option<usize>,
    converged: Option<bool>,
    residual: Option<f64>,
}

impl StageReport {
    /// A report carrying only the elapsed time.
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Paragraphs surviving the stage
    pub fn paragraphs(&self) -> Option<usize> {
        self.paragraphs
    }

    pub fn nodes(&self) -> Option<usize> {
        self.nodes
    }

    pub fn edges(&self) -> Option<usize> {
        self.edges
    }

    /// Mentions attached to a paragraph
    pub fn matched(&self) -> Option<usize> {
        self.matched
    }

    /// Mentions with no containing paragraph
    pub fn unmatched(&self) -> Option<usize> {
        self.unmatched
    }

    pub fn iterations(&self) -> Option<usize> {
        self.iterations
    }

    pub fn converged(&self) -> Option<bool> {
        self.converged
    }

    /// Largest score change in the final iteration
    pub fn residual(&self) -> Option<f64> {
        self.residual
    }
}

/// Fluent construction of a [`StageReport`] with optional metrics.
#[derive(Debug, Clone)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn paragraphs(mut self, n: usize) -> Self {
        self.report.paragraphs = Some(n);
        self
    }

    pub fn nodes(mut self, n: usize) -> Self {
        self.report.nodes = Some(n);
        self
    }

    pub fn edges(mut self, n: usize) -> Self {
        self.report.edges = Some(n);
        self
    }

    pub fn matched(mut self, n: usize) -> Self {
        self.report.matched = Some(n);
        self
    }

    pub fn unmatched(mut self, n: usize) -> Self {
        self.report.unmatched = Some(n);
        self
    }

    pub fn iterations(mut self, n: usize) -> Self {
        self.report.iterations = Some(n);
        self
    }

    pub fn converged(mut self, converged: bool) -> Self {
        self.report.converged = Some(converged);
        self
    }

    pub fn residual(mut self, residual: f64) -> Self {
        self.report.residual = Some(residual);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

// ============================================================================
// PipelineObserver
// ============================================================================

/// Callbacks fired while a request moves through the ranking stages.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// Paragraphs kept after filtering and truncation
    fn on_paragraphs(&mut self, _paragraphs: &[Paragraph]) {}

    /// Index built over the kept paragraphs
    fn on_tree(&mut self, _tree: &IntervalTree<usize>) {}

    /// A mention of `entity` at `span` overlapped no paragraph
    fn on_unmatched_mention(&mut self, _entity: usize, _span: Interval) {}

    fn on_graph(&mut self, _graph: &SimilarityGraph) {}

    fn on_rank(&mut self, _rank: &PageRankResult) {}

    fn on_selection(&mut self, _selection: &SelectionResult) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that records the report of every finished stage, in order.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// Sum of the elapsed time of all recorded stages
    pub fn total_elapsed(&self) -> Duration {
        self.reports.iter().map(|(_, report)| report.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults_to_none() {
        let report = StageReport::new(Duration::from_millis(3));
        assert_eq!(report.elapsed(), Duration::from_millis(3));
        assert!(report.nodes().is_none());
        assert!(report.converged().is_none());
        assert!(report.residual().is_none());
    }

    #[test]
    fn test_builder_sets_metrics() {
        let report = StageReportBuilder::new(Duration::ZERO)
            .paragraphs(4)
            .nodes(4)
            .edges(2)
            .matched(7)
            .unmatched(1)
            .iterations(12)
            .converged(true)
            .residual(1e-6)
            .build();

        assert_eq!(report.paragraphs(), Some(4));
        assert_eq!(report.nodes(), Some(4));
        assert_eq!(report.edges(), Some(2));
        assert_eq!(report.matched(), Some(7));
        assert_eq!(report.unmatched(), Some(1));
        assert_eq!(report.iterations(), Some(12));
        assert_eq!(report.converged(), Some(true));
        assert_eq!(report.residual(), Some(1e-6));
    }

    #[test]
    fn test_timing_observer_collects_in_order() {
        let mut obs = StageTimingObserver::new();
        obs.on_stage_start(STAGE_GRAPH);
        obs.on_stage_end(STAGE_GRAPH, &StageReport::new(Duration::from_millis(2)));
        obs.on_stage_end(STAGE_RANK, &StageReport::new(Duration::from_millis(5)));

        let names: Vec<&str> = obs.reports().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec![STAGE_GRAPH, STAGE_RANK]);
        assert_eq!(obs.total_elapsed(), Duration::from_millis(7));
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = StageClock::start();
        let first = clock.elapsed();
        assert!(clock.elapsed() >= first);
    }
}
