//! Tournament bookkeeping: blocks of events scored by one ruleset, and
//! named rankings computed over them.
//!
//! Storage is not handled here. Callers fetch stored score rows however
//! they like and hand them to [`Block::decode_scores`] or
//! [`Tournament::decode_block_scores`].

use std::fmt;
use std::sync::Arc;

use crate::error::{CodecError, TournamentError};
use crate::ruleset::{decode_scores, Ruleset};

/// A ruleset shared between blocks and threads.
pub type SharedRuleset<S> = Arc<dyn Ruleset<Score = S> + Send + Sync>;

/// A group of events scored with the same ruleset.
pub struct Block<S> {
    id: String,
    name: String,
    ruleset: SharedRuleset<S>,
}

impl<S> Block<S> {
    /// Creates a block named after its id.
    pub fn new(id: impl Into<String>, ruleset: SharedRuleset<S>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ruleset,
        }
    }

    /// Sets a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ruleset(&self) -> &SharedRuleset<S> {
        &self.ruleset
    }

    /// Decodes `(team, payload)` rows with this block's ruleset.
    ///
    /// See [`decode_scores`] for the handling of missing payloads.
    pub fn decode_scores<T, D, I>(&self, rows: I) -> Result<Vec<(T, Option<S>)>, CodecError>
    where
        D: AsRef<[u8]>,
        I: IntoIterator<Item = (T, Option<D>)>,
    {
        decode_scores(self.ruleset.as_ref(), rows)
    }
}

impl<S> fmt::Debug for Block<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A named ranking function.
///
/// `C` is whatever context the function reads its scores from and `O`
/// is what it produces, typically sorted `(team, rank)` standings.
pub struct Ranking<C, O> {
    id: String,
    name: String,
    compute: Box<dyn Fn(&C) -> O + Send + Sync>,
}

impl<C, O> Ranking<C, O> {
    /// Creates a ranking named after its id.
    pub fn new(id: impl Into<String>, compute: impl Fn(&C) -> O + Send + Sync + 'static) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            compute: Box::new(compute),
        }
    }

    /// Sets a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the ranking function.
    pub fn compute(&self, ctx: &C) -> O {
        (self.compute)(ctx)
    }
}

impl<C, O> fmt::Debug for Ranking<C, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ranking")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of blocks and rankings, each kept in registration order.
pub struct Tournament<S, C, O> {
    blocks: Vec<Block<S>>,
    rankings: Vec<Ranking<C, O>>,
}

impl<S, C, O> Tournament<S, C, O> {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            rankings: Vec::new(),
        }
    }

    /// Registers a block. Block ids are unique.
    pub fn add_block(&mut self, block: Block<S>) -> Result<&Block<S>, TournamentError> {
        if self.block(block.id()).is_some() {
            return Err(TournamentError::DuplicateBlock {
                id: block.id().to_string(),
            });
        }
        tracing::debug!(block = block.id(), "registered block");
        self.blocks.push(block);
        Ok(&self.blocks[self.blocks.len() - 1])
    }

    /// Registers a ranking. Ranking ids are unique.
    pub fn add_ranking(&mut self, ranking: Ranking<C, O>) -> Result<&Ranking<C, O>, TournamentError> {
        if self.ranking(ranking.id()).is_some() {
            return Err(TournamentError::DuplicateRanking {
                id: ranking.id().to_string(),
            });
        }
        tracing::debug!(ranking = ranking.id(), "registered ranking");
        self.rankings.push(ranking);
        Ok(&self.rankings[self.rankings.len() - 1])
    }

    pub fn block(&self, id: &str) -> Option<&Block<S>> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn ranking(&self, id: &str) -> Option<&Ranking<C, O>> {
        self.rankings.iter().find(|r| r.id() == id)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block<S>> {
        self.blocks.iter()
    }

    pub fn rankings(&self) -> impl Iterator<Item = &Ranking<C, O>> {
        self.rankings.iter()
    }

    /// Runs the ranking registered as `id`.
    pub fn compute_ranking(&self, id: &str, ctx: &C) -> Result<O, TournamentError> {
        self.ranking(id)
            .map(|r| r.compute(ctx))
            .ok_or_else(|| TournamentError::UnknownRanking { id: id.to_string() })
    }

    /// Decodes `(block_id, team, payload)` rows spanning several blocks.
    ///
    /// Each payload is decoded with the ruleset of its row's block.
    pub fn decode_block_scores<B, T, D, I>(&self, rows: I) -> Result<Vec<(T, Option<S>)>, TournamentError>
    where
        B: AsRef<str>,
        D: AsRef<[u8]>,
        I: IntoIterator<Item = (B, T, Option<D>)>,
    {
        rows.into_iter()
            .map(|(block_id, team, data)| {
                let block_id = block_id.as_ref();
                let block = self.block(block_id).ok_or_else(|| TournamentError::UnknownBlock {
                    id: block_id.to_string(),
                })?;
                let score = data
                    .map(|data| block.ruleset().decode(data.as_ref()))
                    .transpose()
                    .map_err(|source| TournamentError::Codec {
                        block: block_id.to_string(),
                        source,
                    })?;
                Ok((team, score))
            })
            .collect()
    }
}

impl<S, C, O> Default for Tournament<S, C, O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompositeRecord, IntCategory, Record};
    use crate::rank::{aggregate, sort_descending};
    use crate::ruleset::{scored, CategoryRuleset};

    type Scores = Vec<(&'static str, Option<Record>)>;

    fn make_ruleset(name: &str) -> SharedRuleset<Record> {
        let schema = CompositeRecord::builder(name)
            .int("points", IntCategory::u8())
            .build()
            .unwrap();
        Arc::new(CategoryRuleset::new(schema).unwrap())
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut tournament: Tournament<Record, Scores, ()> = Tournament::new();
        tournament
            .add_block(Block::new("heat1", make_ruleset("Heat")))
            .unwrap();
        assert!(matches!(
            tournament.add_block(Block::new("heat1", make_ruleset("Heat"))),
            Err(TournamentError::DuplicateBlock { .. })
        ));

        tournament.add_ranking(Ranking::new("total", |_| ())).unwrap();
        assert!(matches!(
            tournament.add_ranking(Ranking::new("total", |_| ())),
            Err(TournamentError::DuplicateRanking { .. })
        ));
    }

    #[test]
    fn test_names_default_to_id() {
        let block = Block::new("heat1", make_ruleset("Heat"));
        assert_eq!(block.name(), "heat1");
        let block = block.with_name("Heat 1");
        assert_eq!(block.name(), "Heat 1");

        let ranking: Ranking<(), ()> = Ranking::new("final", |_| ()).with_name("Final");
        assert_eq!(ranking.id(), "final");
        assert_eq!(ranking.name(), "Final");
    }

    #[test]
    fn test_decode_block_scores() {
        let mut tournament: Tournament<Record, (), ()> = Tournament::new();
        tournament.add_block(Block::new("a", make_ruleset("A"))).unwrap();
        tournament.add_block(Block::new("b", make_ruleset("B"))).unwrap();

        let rows: Vec<(&str, &str, Option<Vec<u8>>)> = vec![
            ("a", "team1", Some(vec![4])),
            ("b", "team2", None),
            ("b", "team1", Some(vec![9])),
        ];
        let decoded = tournament.decode_block_scores(rows).unwrap();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].1.as_ref().unwrap().schema().name(), "A");
        assert!(decoded[1].1.is_none());
        assert_eq!(decoded[2].1.as_ref().unwrap().int("points"), Some(9));
    }

    #[test]
    fn test_decode_block_scores_errors() {
        let mut tournament: Tournament<Record, (), ()> = Tournament::new();
        tournament.add_block(Block::new("a", make_ruleset("A"))).unwrap();

        let rows = vec![("missing", "team1", Some(vec![1u8]))];
        assert!(matches!(
            tournament.decode_block_scores(rows),
            Err(TournamentError::UnknownBlock { .. })
        ));

        let rows = vec![("a", "team1", Some(vec![1u8, 2]))];
        assert!(matches!(
            tournament.decode_block_scores(rows),
            Err(TournamentError::Codec { source: CodecError::TrailingBytes { .. }, .. })
        ));
    }

    #[test]
    fn test_compute_ranking() {
        let mut tournament: Tournament<Record, Scores, Vec<(&'static str, i128)>> =
            Tournament::new();
        let block = tournament
            .add_block(Block::new("heat", make_ruleset("Heat")))
            .unwrap();
        let scores = block
            .decode_scores(vec![
                ("x", Some(vec![3u8])),
                ("y", Some(vec![7u8])),
                ("z", None),
            ])
            .unwrap();

        tournament
            .add_ranking(Ranking::new("best", |scores: &Scores| {
                let ranks = aggregate(scored(scores.iter().cloned()), |ss: &[Record]| {
                    ss.iter().filter_map(|s| s.int("points")).max().unwrap_or(0)
                });
                sort_descending(ranks)
            }))
            .unwrap();

        let standings = tournament.compute_ranking("best", &scores).unwrap();
        assert_eq!(standings, vec![("y", 7), ("x", 3)]);
        assert!(matches!(
            tournament.compute_ranking("worst", &scores),
            Err(TournamentError::UnknownRanking { .. })
        ));
    }
}
