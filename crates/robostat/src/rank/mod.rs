//! Rank values and the functions that build standings from scores.
//!
//! A rank is any ordered value assigned to a team for one ranking
//! criterion. [`WeightedRank`] lets an operator-supplied tie-break weight
//! dominate the natural rank, and [`CombinedRank`] orders teams across
//! several criteria, tolerating criteria a team has no rank in.

pub mod aggregate;

use std::cmp::Ordering;
use std::fmt;

pub use aggregate::{
    aggregate, aggregate_weighted, combine, max_ranking, sort_descending, RankMap, Tiebreaks,
};

/// A rank preceded by a tie-break weight.
///
/// Ordered by weight first, then by the inner rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeightedRank<W, R> {
    pub weight: W,
    pub rank: R,
}

impl<W, R> WeightedRank<W, R> {
    pub fn new(weight: W, rank: R) -> Self {
        Self { weight, rank }
    }
}

impl<W: fmt::Display, R: fmt::Display> fmt::Display for WeightedRank<W, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}]", self.weight, self.rank)
    }
}

/// A team's position across several ranking criteria, first one primary.
///
/// Secondary ranks may be absent. Two combined ranks compare by their
/// primary ranks, then by each later position where *both* sides have a
/// rank; positions where either side is absent are skipped. This makes
/// equality non-transitive (`[10, 5] == [10, -] == [10, 7]`), so only
/// `PartialEq` and `PartialOrd` are implemented; sort these with
/// [`sort_descending`], which never assumes transitivity.
#[derive(Debug, Clone)]
pub struct CombinedRank<R> {
    primary: R,
    secondary: Vec<Option<R>>,
}

impl<R> CombinedRank<R> {
    pub fn new(primary: R, secondary: impl IntoIterator<Item = Option<R>>) -> Self {
        Self {
            primary,
            secondary: secondary.into_iter().collect(),
        }
    }

    /// The primary rank.
    pub fn primary(&self) -> &R {
        &self.primary
    }

    /// The secondary ranks in order, `None` where the team has no rank.
    pub fn secondary(&self) -> &[Option<R>] {
        &self.secondary
    }

    /// All positions in order, primary first.
    pub fn ranks(&self) -> impl Iterator<Item = Option<&R>> {
        std::iter::once(Some(&self.primary)).chain(self.secondary.iter().map(Option::as_ref))
    }
}

impl<R: PartialOrd> PartialEq for CombinedRank<R> {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl<R: PartialOrd> PartialOrd for CombinedRank<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.primary.partial_cmp(&other.primary) {
            Some(Ordering::Equal) => {}
            ord => return ord,
        }
        for (a, b) in self.secondary.iter().zip(&other.secondary) {
            if let (Some(a), Some(b)) = (a, b) {
                match a.partial_cmp(b) {
                    Some(Ordering::Equal) => {}
                    ord => return ord,
                }
            }
        }
        Some(Ordering::Equal)
    }
}

impl<R: fmt::Display> fmt::Display for CombinedRank<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.primary)?;
        for (i, rank) in self.secondary.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match rank {
                Some(rank) => write!(f, "{}", rank)?,
                None => write!(f, "-")?,
            }
        }
        write!(f, ")")
    }
}
