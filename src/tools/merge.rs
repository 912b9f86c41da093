//! Multi-source paginated merge primitive.
//!
//! The fetch-then-merge-then-paginate pattern recurs across the timeline and
//! relationship aggregations: several independently fetched record sets are
//! combined into one totally ordered sequence, and a single offset/limit
//! window is applied over the merged result rather than per source.

use crate::repositories::Page;
use std::cmp::Ordering;

/// A window over a merged multi-source sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedWindow<T> {
    /// The items inside the requested window, in merge order
    pub items: Vec<T>,

    /// Sum of all per-source match counts before windowing
    pub total_count: usize,

    /// Whether records exist beyond this window
    pub has_more: bool,
}

/// Merge fully fetched source pages into one ordered sequence and apply a
/// single offset/limit window.
///
/// Each source page must contain the complete matched set for that source;
/// `total_count` is the sum of the per-source counts. `has_more` is true iff
/// `offset + items.len() < total_count`.
pub fn merge_window<T, F>(
    sources: Vec<Page<T>>,
    compare: F,
    limit: usize,
    offset: usize,
) -> MergedWindow<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    let total_count: usize = sources.iter().map(|source| source.total_count).sum();

    let mut merged: Vec<T> = sources
        .into_iter()
        .flat_map(|source| source.items)
        .collect();
    merged.sort_by(|a, b| compare(a, b));

    let items: Vec<T> = merged.into_iter().skip(offset).take(limit).collect();
    let has_more = offset + items.len() < total_count;

    MergedWindow {
        items,
        total_count,
        has_more,
    }
}

/// Merge fully fetched source pages into one ordered sequence without
/// windowing.
pub fn merge_all<T, F>(sources: Vec<Page<T>>, compare: F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut merged: Vec<T> = sources
        .into_iter()
        .flat_map(|source| source.items)
        .collect();
    merged.sort_by(|a, b| compare(a, b));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(values: Vec<u32>) -> Page<u32> {
        let total = values.len();
        Page::new(values, total)
    }

    #[test]
    fn test_merge_orders_across_sources() {
        let window = merge_window(
            vec![page(vec![5, 1, 9]), page(vec![4, 8])],
            |a, b| b.cmp(a),
            10,
            0,
        );
        assert_eq!(window.items, vec![9, 8, 5, 4, 1]);
        assert_eq!(window.total_count, 5);
        assert!(!window.has_more);
    }

    #[test]
    fn test_window_applies_over_merged_sequence() {
        let window = merge_window(
            vec![page(vec![5, 1, 9]), page(vec![4, 8])],
            |a, b| b.cmp(a),
            2,
            1,
        );
        // Merged: 9 8 5 4 1; offset 1, limit 2 -> 8 5
        assert_eq!(window.items, vec![8, 5]);
        assert_eq!(window.total_count, 5);
        assert!(window.has_more);
    }

    #[test]
    fn test_window_length_invariant() {
        // items.len() == min(limit, total - offset) for offset < total
        let sources = || vec![page(vec![3, 1]), page(vec![4, 2, 5])];
        for (limit, offset) in [(1usize, 0usize), (3, 2), (10, 4), (2, 3)] {
            let window = merge_window(sources(), |a, b| b.cmp(a), limit, offset);
            assert_eq!(window.items.len(), limit.min(5 - offset));
        }
    }

    #[test]
    fn test_offset_beyond_total_yields_empty() {
        let window = merge_window(vec![page(vec![1, 2])], |a, b| b.cmp(a), 10, 5);
        assert!(window.items.is_empty());
        assert_eq!(window.total_count, 2);
        assert!(!window.has_more);
    }

    #[test]
    fn test_has_more_equivalence() {
        let sources = || vec![page(vec![1, 2, 3, 4])];
        for (limit, offset) in [(2usize, 0usize), (2, 2), (4, 0), (1, 3), (5, 0)] {
            let window = merge_window(sources(), |a, b| b.cmp(a), limit, offset);
            assert_eq!(
                window.has_more,
                offset + window.items.len() < window.total_count,
                "limit={} offset={}",
                limit,
                offset
            );
        }
    }

    #[test]
    fn test_merge_all_no_window() {
        let merged = merge_all(vec![page(vec![2, 1]), page(vec![3])], |a, b| a.cmp(b));
        assert_eq!(merged, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_sources() {
        let window = merge_window(Vec::<Page<u32>>::new(), |a: &u32, b: &u32| b.cmp(a), 5, 0);
        assert!(window.items.is_empty());
        assert_eq!(window.total_count, 0);
        assert!(!window.has_more);
    }
}
