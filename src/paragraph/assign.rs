//! Entity assignment
//!
//! Every entity mention is mapped to the paragraph containing it with a
//! single witness query against an interval tree built over the paragraph
//! positions. Mentions that fall outside all paragraphs are collected but
//! otherwise ignored.

use crate::interval::IntervalTree;
use crate::types::{Interval, Paragraph};

/// Outcome of assigning entity mentions to paragraphs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentStats {
    /// Mentions that landed in a paragraph
    pub matched: usize,
    /// `(entity id, span)` of every mention with no containing paragraph
    pub unmatched: Vec<(usize, Interval)>,
}

/// Build the lookup index over paragraph positions
///
/// The payload of each node is the paragraph's index in `paragraphs`.
pub fn index_paragraphs(paragraphs: &[Paragraph]) -> IntervalTree<usize> {
    paragraphs
        .iter()
        .enumerate()
        .map(|(index, paragraph)| (paragraph.position(), index))
        .collect()
}

/// Attach every entity mention to the paragraph it falls in
///
/// `entities[e]` holds the mention spans of entity `e`.
pub fn assign_entities<S>(
    paragraphs: &mut [Paragraph],
    index: &IntervalTree<usize>,
    entities: &[S],
) -> AssignmentStats
where
    S: AsRef<[(i64, i64)]>,
{
    let mut stats = AssignmentStats::default();

    for (entity, mentions) in entities.iter().enumerate() {
        for &span in mentions.as_ref() {
            let span = Interval::from(span);
            match index.overlap_search(span) {
                Some((_, &paragraph)) => {
                    if let Some(target) = paragraphs.get_mut(paragraph) {
                        target.record_mention(entity);
                        stats.matched += 1;
                    } else {
                        stats.unmatched.push((entity, span));
                    }
                }
                None => stats.unmatched.push((entity, span)),
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paragraph::{build_paragraphs, ParagraphLimits};

    fn two_paragraphs() -> Vec<Paragraph> {
        build_paragraphs(&[(0, 50), (60, 120)], ParagraphLimits::default()).unwrap()
    }

    #[test]
    fn test_index_payloads() {
        let paragraphs = two_paragraphs();
        let index = index_paragraphs(&paragraphs);

        assert_eq!(index.len(), 2);
        let payloads: Vec<usize> = index.inorder().map(|e| *e.payload).collect();
        assert_eq!(payloads, vec![0, 1]);
    }

    #[test]
    fn test_mentions_assigned() {
        let mut paragraphs = two_paragraphs();
        let index = index_paragraphs(&paragraphs);
        let entities: Vec<Vec<(i64, i64)>> = vec![vec![(10, 12), (70, 72)]];

        let stats = assign_entities(&mut paragraphs, &index, &entities);

        assert_eq!(stats.matched, 2);
        assert!(stats.unmatched.is_empty());
        for p in &paragraphs {
            assert_eq!(p.mention_count(), 1);
            assert!(p.entity_ids().contains(&0));
        }
    }

    #[test]
    fn test_repeat_mentions_counted() {
        let mut paragraphs = two_paragraphs();
        let index = index_paragraphs(&paragraphs);
        let entities: Vec<Vec<(i64, i64)>> = vec![vec![(1, 2), (5, 6), (9, 9)], vec![(20, 25)]];

        assign_entities(&mut paragraphs, &index, &entities);

        assert_eq!(paragraphs[0].mention_count(), 4);
        assert_eq!(paragraphs[0].entity_ids().len(), 2);
        assert_eq!(paragraphs[1].mention_count(), 0);
    }

    #[test]
    fn test_entity_miss_is_dropped() {
        let mut paragraphs = two_paragraphs();
        let index = index_paragraphs(&paragraphs);
        let before = paragraphs.clone();
        let entities: [&[(i64, i64)]; 2] = [&[(52, 55)], &[(500, 510)]];

        let stats = assign_entities(&mut paragraphs, &index, &entities[..]);

        assert_eq!(stats.matched, 0);
        assert_eq!(
            stats.unmatched,
            vec![(0, Interval::new(52, 55)), (1, Interval::new(500, 510))]
        );
        assert_eq!(paragraphs, before);
    }

    #[test]
    fn test_entity_ids_follow_input_order() {
        let mut paragraphs = two_paragraphs();
        let index = index_paragraphs(&paragraphs);
        let entities: Vec<Vec<(i64, i64)>> = vec![vec![], vec![(80, 81)], vec![(90, 95)]];

        assign_entities(&mut paragraphs, &index, &entities);

        let ids = paragraphs[1].entity_ids();
        assert!(ids.contains(&1) && ids.contains(&2));
        assert!(!ids.contains(&0));
    }
}
