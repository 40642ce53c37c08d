//! Aggregation of per-team scores into rankings, and combination of rankings.

use std::collections::hash_map::Entry;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::rank::{CombinedRank, WeightedRank};

/// Rank of each team under one criterion.
pub type RankMap<T, R> = FxHashMap<T, R>;

/// Operator-supplied tie-break weight per team.
///
/// Teams missing from the table are weighted with `W::default()`.
pub type Tiebreaks<T, W> = FxHashMap<T, W>;

/// Groups `(team, score)` pairs by team and reduces each group to a rank.
///
/// `reduce` is called once per team, with every score of that team.
/// Teams without scores never appear in the input, so they never appear
/// in the result.
pub fn aggregate<T, S, R, I, F>(scores: I, mut reduce: F) -> RankMap<T, R>
where
    T: Eq + Hash,
    I: IntoIterator<Item = (T, S)>,
    F: FnMut(&[S]) -> R,
{
    let mut grouped: FxHashMap<T, Vec<S>> = FxHashMap::default();
    for (team, score) in scores {
        grouped.entry(team).or_default().push(score);
    }

    grouped
        .into_iter()
        .map(|(team, scores)| {
            let rank = reduce(&scores);
            (team, rank)
        })
        .collect()
}

/// Like [`aggregate`], with each team's rank preceded by its tie-break weight.
pub fn aggregate_weighted<T, S, R, W, I, F>(
    scores: I,
    tiebreaks: &Tiebreaks<T, W>,
    reduce: F,
) -> RankMap<T, WeightedRank<W, R>>
where
    T: Eq + Hash,
    W: Clone + Default,
    I: IntoIterator<Item = (T, S)>,
    F: FnMut(&[S]) -> R,
{
    let ranks = aggregate(scores, reduce);

    let unmatched = tiebreaks.keys().filter(|t| !ranks.contains_key(*t)).count();
    if unmatched > 0 {
        tracing::warn!(unmatched, "ignoring tie-break weights for teams without scores");
    }

    ranks
        .into_iter()
        .map(|(team, rank)| {
            let weight = tiebreaks.get(&team).cloned().unwrap_or_default();
            (team, WeightedRank::new(weight, rank))
        })
        .collect()
}

/// Combines a primary ranking with secondary rankings.
///
/// Every team of `primary` gets a [`CombinedRank`] whose secondary
/// positions come from `others` in order, absent where that ranking has
/// no entry for the team. Teams only present in `others` are dropped.
pub fn combine<T, R>(primary: RankMap<T, R>, others: &[&RankMap<T, R>]) -> RankMap<T, CombinedRank<R>>
where
    T: Eq + Hash,
    R: Clone,
{
    primary
        .into_iter()
        .map(|(team, rank)| {
            let secondary = others.iter().map(|o| o.get(&team).cloned());
            let combined = CombinedRank::new(rank, secondary);
            (team, combined)
        })
        .collect()
}

/// Best rank of each team over several `(team, rank)` listings.
///
/// Used when a team's best result over repeated heats counts. On ties
/// the first listed rank is kept.
pub fn max_ranking<T, R, I, J>(rankings: I) -> RankMap<T, R>
where
    T: Eq + Hash,
    R: PartialOrd,
    I: IntoIterator<Item = J>,
    J: IntoIterator<Item = (T, R)>,
{
    let mut max = FxHashMap::default();
    for ranking in rankings {
        for (team, rank) in ranking {
            match max.entry(team) {
                Entry::Occupied(mut e) => {
                    if *e.get() < rank {
                        e.insert(rank);
                    }
                }
                Entry::Vacant(e) => {
                    e.insert(rank);
                }
            }
        }
    }
    max
}

/// Orders teams by rank, highest first.
///
/// The sort is stable: teams that compare equal keep their input order.
/// Only pairwise comparisons are used, never transitivity, so
/// [`CombinedRank`] values with absent positions sort deterministically.
pub fn sort_descending<T, R, I>(ranks: I) -> Vec<(T, R)>
where
    R: PartialOrd,
    I: IntoIterator<Item = (T, R)>,
{
    merge_sort_descending(ranks.into_iter().collect())
}

fn merge_sort_descending<T, R: PartialOrd>(mut items: Vec<(T, R)>) -> Vec<(T, R)> {
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let mut left = merge_sort_descending(items).into_iter().peekable();
    let mut right = merge_sort_descending(right).into_iter().peekable();

    let mut merged = Vec::with_capacity(left.len() + right.len());
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => r.1 > l.1,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        merged.extend(if take_right { right.next() } else { left.next() });
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_groups_by_team() {
        let scores = vec![("a", 1), ("b", 2), ("a", 3), ("a", 4)];
        let ranks = aggregate(scores, |ss| ss.iter().sum::<i32>());
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks["a"], 8);
        assert_eq!(ranks["b"], 2);
    }

    #[test]
    fn test_aggregate_calls_reduce_once_per_team() {
        let mut calls = 0;
        let ranks = aggregate(vec![("a", 1), ("a", 2), ("b", 3)], |ss| {
            calls += 1;
            ss.len()
        });
        assert_eq!(calls, 2);
        assert_eq!(ranks["a"], 2);
    }

    #[test]
    fn test_aggregate_weighted() {
        let mut tiebreaks = Tiebreaks::default();
        tiebreaks.insert("b", 1);
        tiebreaks.insert("ghost", 5);

        let scores = vec![("a", 10), ("b", 1)];
        let ranks = aggregate_weighted(scores, &tiebreaks, |ss| *ss.iter().max().unwrap());

        assert_eq!(ranks["a"], WeightedRank::new(0, 10));
        assert_eq!(ranks["b"], WeightedRank::new(1, 1));
        assert!(!ranks.contains_key("ghost"));
        assert!(ranks["b"] > ranks["a"]);
    }

    #[test]
    fn test_combine_missing_secondary() {
        let primary: RankMap<_, _> = [("a", 10), ("b", 10)].into_iter().collect();
        let secondary: RankMap<_, _> = [("a", 5), ("z", 1)].into_iter().collect();

        let combined = combine(primary, &[&secondary]);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined["a"].secondary(), &[Some(5)]);
        assert_eq!(combined["b"].secondary(), &[None]);
        assert_eq!(combined["a"], combined["b"]);
    }

    #[test]
    fn test_max_ranking() {
        let heats = vec![vec![("x", 3), ("y", 1)], vec![("x", 5)]];
        let best = max_ranking(heats);
        assert_eq!(best.len(), 2);
        assert_eq!(best["x"], 5);
        assert_eq!(best["y"], 1);
    }

    #[test]
    fn test_max_ranking_keeps_first_on_tie() {
        let heats = vec![
            vec![("x", WeightedRank::new(1, 0))],
            vec![("x", WeightedRank::new(1, 0))],
        ];
        assert_eq!(max_ranking(heats)["x"], WeightedRank::new(1, 0));
    }

    #[test]
    fn test_sort_descending_stable() {
        let ranks = vec![("a", 1), ("b", 3), ("c", 1), ("d", 2), ("e", 3)];
        let sorted = sort_descending(ranks);
        assert_eq!(sorted, vec![("b", 3), ("e", 3), ("d", 2), ("a", 1), ("c", 1)]);
    }

    #[test]
    fn test_sort_descending_combined() {
        let ranks = vec![
            ("a", CombinedRank::new(10, [Some(5)])),
            ("b", CombinedRank::new(12, [None])),
            ("c", CombinedRank::new(10, [Some(7)])),
        ];
        let order: Vec<_> = sort_descending(ranks).into_iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_descending_empty() {
        let sorted = sort_descending(Vec::<(&str, i32)>::new());
        assert!(sorted.is_empty());
    }
}
