//! Pipeline runner: orchestrates stage execution and artifact flow.
//!
//! [`ParagraphRanker`] runs a request through five stages:
//!
//! 1. Filter and truncate the caller's paragraph spans
//! 2. Index paragraphs in an interval tree and assign entity mentions
//! 3. Build the entity-overlap similarity graph
//! 4. Score paragraphs with the damped update and positional prior
//! 5. Select the top-k paragraphs
//!
//! An unusable request (empty input, `top_k == 0`, no surviving paragraph)
//! short-circuits to an empty map; the entry points never fail. The
//! `observer` passed to [`ParagraphRanker::extract_with_observer`] is
//! notified at every stage boundary.

use crate::errors::Result;
use crate::graph::SimilarityGraph;
use crate::pagerank::{PageRankResult, PositionalPageRank};
use crate::paragraph::{assign_entities, build_paragraphs, index_paragraphs, ParagraphLimits};
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, StageReportBuilder, STAGE_ASSIGN,
    STAGE_GRAPH, STAGE_PARAGRAPHS, STAGE_RANK, STAGE_SELECT,
};
use crate::summarizer::{KeyParagraphs, ParagraphSelector, SelectionResult};
use crate::types::{Paragraph, RankerConfig};

/// Enter a tracing span for a pipeline stage; it closes when the enclosing
/// block ends.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

/// Rank the paragraphs of a document with the default configuration.
///
/// Shorthand for [`ParagraphRanker::extract_key_paragraphs`] on
/// [`ParagraphRanker::new`].
pub fn extract_key_paragraphs<S>(
    input: &str,
    paragraph_spans: &[(i64, i64)],
    entity_spans: &[S],
    top_k: usize,
) -> KeyParagraphs
where
    S: AsRef<[(i64, i64)]>,
{
    ParagraphRanker::new().extract_key_paragraphs(input, paragraph_spans, entity_spans, top_k)
}

/// Entity co-occurrence paragraph ranker
#[derive(Debug, Clone, Default)]
pub struct ParagraphRanker {
    config: RankerConfig,
}

impl ParagraphRanker {
    /// Create a ranker with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ranker from a validated configuration
    pub fn with_config(config: RankerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a ranker from a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self {
            config: RankerConfig::from_json(json)?,
        })
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Select up to `top_k` key paragraphs of `input`.
    ///
    /// `paragraph_spans` are inclusive character ranges of the paragraphs and
    /// `entity_spans[e]` lists the mention spans of entity `e`. The result maps
    /// the index of each selected paragraph (among those that survived
    /// filtering) to the ids of the entities it mentions.
    pub fn extract_key_paragraphs<S>(
        &self,
        input: &str,
        paragraph_spans: &[(i64, i64)],
        entity_spans: &[S],
        top_k: usize,
    ) -> KeyParagraphs
    where
        S: AsRef<[(i64, i64)]>,
    {
        self.extract_with_observer(input, paragraph_spans, entity_spans, top_k, &mut NoopObserver)
    }

    /// Same as [`extract_key_paragraphs`](Self::extract_key_paragraphs),
    /// reporting every stage to `observer`.
    pub fn extract_with_observer<S>(
        &self,
        input: &str,
        paragraph_spans: &[(i64, i64)],
        entity_spans: &[S],
        top_k: usize,
        observer: &mut impl PipelineObserver,
    ) -> KeyParagraphs
    where
        S: AsRef<[(i64, i64)]>,
    {
        self.run(input, paragraph_spans, entity_spans, top_k, observer)
            .map(|selection| selection.to_key_paragraphs())
            .unwrap_or_default()
    }

    fn run<S>(
        &self,
        input: &str,
        paragraph_spans: &[(i64, i64)],
        entity_spans: &[S],
        top_k: usize,
        observer: &mut impl PipelineObserver,
    ) -> Option<SelectionResult>
    where
        S: AsRef<[(i64, i64)]>,
    {
        if input.is_empty() {
            tracing::debug!("empty input, nothing to rank");
            return None;
        }
        if top_k == 0 {
            tracing::debug!("top_k is zero, nothing to select");
            return None;
        }

        let length = input.chars().count();
        if length > self.config.max_text_len {
            // Spans come from the caller and are used as given
            tracing::warn!(
                length,
                limit = self.config.max_text_len,
                "input longer than the accepted text length"
            );
        }

        let mut paragraphs = self.paragraph_stage(paragraph_spans, observer)?;
        self.assign_stage(&mut paragraphs, entity_spans, observer);
        let graph = self.graph_stage(&paragraphs, observer);
        let ranking = self.rank_stage(&graph, observer);
        Some(self.select_stage(&paragraphs, &ranking, top_k, observer))
    }

    fn paragraph_stage(
        &self,
        spans: &[(i64, i64)],
        observer: &mut impl PipelineObserver,
    ) -> Option<Vec<Paragraph>> {
        trace_stage!(STAGE_PARAGRAPHS);
        observer.on_stage_start(STAGE_PARAGRAPHS);
        let clock = StageClock::start();
        let paragraphs = build_paragraphs(spans, ParagraphLimits::from(&self.config));
        let report = StageReportBuilder::new(clock.elapsed())
            .paragraphs(paragraphs.as_ref().map_or(0, Vec::len))
            .build();
        observer.on_stage_end(STAGE_PARAGRAPHS, &report);

        let Some(paragraphs) = paragraphs else {
            tracing::debug!(spans = spans.len(), "no paragraph survived filtering");
            return None;
        };
        observer.on_paragraphs(&paragraphs);
        Some(paragraphs)
    }

    fn assign_stage<S>(
        &self,
        paragraphs: &mut [Paragraph],
        entity_spans: &[S],
        observer: &mut impl PipelineObserver,
    ) where
        S: AsRef<[(i64, i64)]>,
    {
        trace_stage!(STAGE_ASSIGN);
        observer.on_stage_start(STAGE_ASSIGN);
        let clock = StageClock::start();

        let index = index_paragraphs(paragraphs);
        for entry in &index {
            tracing::trace!(
                interval = %entry.interval,
                max_high = entry.max_high,
                paragraph = *entry.payload,
                "paragraph index node"
            );
        }
        observer.on_tree(&index);

        let stats = assign_entities(paragraphs, &index, entity_spans);
        for &(entity, span) in &stats.unmatched {
            tracing::debug!(entity, span = %span, "mention overlaps no paragraph");
            observer.on_unmatched_mention(entity, span);
        }

        let report = StageReportBuilder::new(clock.elapsed())
            .matched(stats.matched)
            .unmatched(stats.unmatched.len())
            .build();
        observer.on_stage_end(STAGE_ASSIGN, &report);
    }

    fn graph_stage(
        &self,
        paragraphs: &[Paragraph],
        observer: &mut impl PipelineObserver,
    ) -> SimilarityGraph {
        trace_stage!(STAGE_GRAPH);
        observer.on_stage_start(STAGE_GRAPH);
        let clock = StageClock::start();
        let graph = SimilarityGraph::from_paragraphs(paragraphs);
        let report = StageReportBuilder::new(clock.elapsed())
            .nodes(graph.num_nodes)
            .edges(graph.num_edges())
            .build();
        observer.on_stage_end(STAGE_GRAPH, &report);
        observer.on_graph(&graph);
        graph
    }

    fn rank_stage(
        &self,
        graph: &SimilarityGraph,
        observer: &mut impl PipelineObserver,
    ) -> PageRankResult {
        trace_stage!(STAGE_RANK);
        observer.on_stage_start(STAGE_RANK);
        let clock = StageClock::start();
        let ranking = PositionalPageRank::from_config(&self.config).run(graph);
        let report = StageReportBuilder::new(clock.elapsed())
            .iterations(ranking.iterations)
            .converged(ranking.converged)
            .residual(ranking.delta)
            .build();
        observer.on_stage_end(STAGE_RANK, &report);

        tracing::debug!(
            iterations = ranking.iterations,
            converged = ranking.converged,
            delta = ranking.delta,
            "paragraph scores computed"
        );
        observer.on_rank(&ranking);
        ranking
    }

    fn select_stage(
        &self,
        paragraphs: &[Paragraph],
        ranking: &PageRankResult,
        top_k: usize,
        observer: &mut impl PipelineObserver,
    ) -> SelectionResult {
        trace_stage!(STAGE_SELECT);
        observer.on_stage_start(STAGE_SELECT);
        let clock = StageClock::start();
        let selection = ParagraphSelector::new(top_k).select(paragraphs, ranking);
        let report = StageReport::new(clock.elapsed());
        observer.on_stage_end(STAGE_SELECT, &report);
        observer.on_selection(&selection);
        selection
    }
}
