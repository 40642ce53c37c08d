//! Decodes a small set of stored results and prints the final standings.
//!
//! Run with `RUST_LOG=debug` to see decoding and registration events.

use std::sync::Arc;

use robostat::rank::{aggregate, aggregate_weighted, combine, sort_descending, Tiebreaks};
use robostat::{
    Block, CategoryRuleset, CompositeRecord, FieldValue, IntCategory, Ranking, Record, Ruleset,
    Tournament,
};
use tracing_subscriber::EnvFilter;

type Rows = Vec<(&'static str, &'static str, Option<Vec<u8>>)>;

fn encode(ruleset: &CategoryRuleset, time: u16, checkpoints: &[u8]) -> Vec<u8> {
    let checkpoints: Vec<FieldValue> = checkpoints.iter().map(|&c| c.into()).collect();
    let score = ruleset
        .create()
        .with("time", time)
        .and_then(|s| s.with("checkpoints", checkpoints))
        .expect("schema has these fields");
    ruleset.validate(&score).expect("valid score");
    ruleset.encode(&score).expect("validated score encodes")
}

fn points(score: &Record) -> i128 {
    let checkpoints = score.list("checkpoints").map_or(0, <[_]>::len) as i128;
    let time = score.int("time").unwrap_or(0);
    checkpoints * 100 - time
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let schema = CompositeRecord::builder("Run")
        .int("time", IntCategory::u16())
        .list("checkpoints", IntCategory::u8())
        .build()
        .expect("valid schema");
    let ruleset = Arc::new(CategoryRuleset::new(schema).expect("valid schema"));

    let rows: Rows = vec![
        ("qualifier", "Robotti", Some(encode(&ruleset, 95, &[1, 2, 3]))),
        ("qualifier", "Kone", Some(encode(&ruleset, 80, &[1, 2]))),
        ("qualifier", "Rotta", None),
        ("final", "Robotti", Some(encode(&ruleset, 70, &[1, 2, 3]))),
        ("final", "Kone", Some(encode(&ruleset, 60, &[1, 2, 3]))),
        ("final", "Rotta", Some(encode(&ruleset, 99, &[1]))),
    ];

    let mut tournament: Tournament<Record, Rows, Vec<(&'static str, String)>> = Tournament::new();
    for id in ["qualifier", "final"] {
        tournament
            .add_block(Block::new(id, ruleset.clone()))
            .expect("unique block id");
    }

    let decode = |rows: &Rows, block: &str| {
        let rows: Vec<_> = rows
            .iter()
            .filter(|(b, _, _)| *b == block)
            .map(|(b, team, data)| (*b, *team, data.clone()))
            .collect();
        robostat::scored(tournament.decode_block_scores(rows).expect("decodable rows"))
            .collect::<Vec<_>>()
    };
    let finals = decode(&rows, "final");
    let qualifiers = decode(&rows, "qualifier");

    let mut tiebreaks = Tiebreaks::default();
    tiebreaks.insert("Kone", 1);

    let primary = aggregate_weighted(finals, &tiebreaks, |ss: &[Record]| {
        ss.iter().map(points).max().unwrap_or(0)
    });
    let secondary = aggregate(qualifiers, |ss: &[Record]| {
        robostat::WeightedRank::new(0, ss.iter().map(points).max().unwrap_or(0))
    });
    let standings: Vec<_> = sort_descending(combine(primary, &[&secondary]))
        .into_iter()
        .map(|(team, rank)| (team, rank.to_string()))
        .collect();

    tournament
        .add_ranking(
            Ranking::new("overall", move |_: &Rows| standings.clone()).with_name("Overall standings"),
        )
        .expect("unique ranking id");

    for ranking in tournament.rankings() {
        println!("=== {} ===", ranking.name());
        for (place, (team, rank)) in ranking.compute(&rows).into_iter().enumerate() {
            println!("{:>2}. {:<10} {}", place + 1, team, rank);
        }
    }
}
