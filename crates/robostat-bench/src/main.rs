//! Benchmark for score decoding and standings computation.
//!
//! Generates a synthetic competition (teams x heats of nested score
//! records), then times encoding, decoding and ranking.

use std::time::Instant;

use robostat::rank::{aggregate, combine, max_ranking, sort_descending};
use robostat::{
    CategoryRuleset, CompositeRecord, FieldValue, IntCategory, Record, Ruleset, decode_scores,
    scored,
};

// =============================================================================
// SYNTHETIC DATA
// =============================================================================

/// Small deterministic generator so repeated runs see identical data.
struct Lcg(u64);

impl Lcg {
    fn below(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn make_ruleset() -> CategoryRuleset {
    let attempt = CompositeRecord::builder("Attempt")
        .int("time", IntCategory::u16())
        .int("bonus", IntCategory::i16())
        .build()
        .expect("valid schema");
    let schema = CompositeRecord::builder("Heat")
        .list("attempts", attempt)
        .int("penalty", IntCategory::u8())
        .build()
        .expect("valid schema");
    CategoryRuleset::new(schema).expect("valid schema")
}

fn make_score(ruleset: &CategoryRuleset, rng: &mut Lcg) -> Record {
    let attempt_schema = match ruleset.schema().field("attempts") {
        Some(robostat::Category::List(inner)) => match inner.as_ref() {
            robostat::Category::Composite(schema) => schema.clone(),
            _ => unreachable!("attempts holds records"),
        },
        _ => unreachable!("heat has attempts"),
    };

    let attempts: Vec<FieldValue> = (0..1 + rng.below(5))
        .map(|_| {
            Record::new(attempt_schema.clone())
                .with("time", rng.below(600) as u16)
                .and_then(|r| r.with("bonus", rng.below(200) as i16 - 100))
                .expect("attempt fields")
                .into()
        })
        .collect();

    ruleset
        .create()
        .with("attempts", attempts)
        .and_then(|r| r.with("penalty", rng.below(10) as u8))
        .expect("heat fields")
}

fn heat_points(scores: &[Record]) -> i128 {
    scores
        .iter()
        .map(|s| {
            let best = s
                .list("attempts")
                .unwrap_or(&[])
                .iter()
                .filter_map(FieldValue::as_record)
                .map(|a| a.int("bonus").unwrap_or(0) * 10 - a.int("time").unwrap_or(0))
                .max()
                .unwrap_or(i128::MIN / 2);
            best - 50 * s.int("penalty").unwrap_or(0)
        })
        .max()
        .unwrap_or(i128::MIN)
}

fn main() {
    let teams: u64 = std::env::args()
        .nth(1)
        .and_then(|n| n.parse().ok())
        .unwrap_or(2_000);
    let heats = 4;

    println!("Generating {} teams x {} heats", teams, heats);

    let ruleset = make_ruleset();
    let mut rng = Lcg(0x5eed);

    // Encode
    let encode_start = Instant::now();
    let mut stored: Vec<Vec<(u64, Option<Vec<u8>>)>> = Vec::with_capacity(heats);
    let mut total_bytes = 0;
    for _ in 0..heats {
        let rows: Vec<_> = (0..teams)
            .map(|team| {
                // Roughly one team in twenty skips a heat
                if rng.below(20) == 0 {
                    return (team, None);
                }
                let score = make_score(&ruleset, &mut rng);
                ruleset.validate(&score).expect("generated score is valid");
                let bytes = ruleset.encode(&score).expect("validated score encodes");
                total_bytes += bytes.len();
                (team, Some(bytes))
            })
            .collect();
        stored.push(rows);
    }
    let encode_time = encode_start.elapsed();
    println!("Encoded {} bytes in {:?}", total_bytes, encode_time);

    // Decode
    let decode_start = Instant::now();
    let decoded: Vec<_> = stored
        .iter()
        .map(|rows| decode_scores(&ruleset, rows.iter().map(|(t, d)| (*t, d.as_deref()))))
        .collect::<Result<_, _>>()
        .expect("stored scores decode");
    let decode_time = decode_start.elapsed();
    println!("Decoded {} heats in {:?}", decoded.len(), decode_time);

    // Rank: final heat is primary, best of the earlier heats breaks ties
    let rank_start = Instant::now();
    let mut per_heat: Vec<_> = decoded
        .into_iter()
        .map(|rows| aggregate(scored(rows), heat_points))
        .collect();
    let primary = per_heat.pop().unwrap_or_default();
    let qualifying = max_ranking(per_heat);
    let standings = sort_descending(combine(primary, &[&qualifying]));
    let rank_time = rank_start.elapsed();
    println!("Ranked {} teams in {:?}", standings.len(), rank_time);

    println!("\n=== Top 5 ===");
    for (place, (team, rank)) in standings.iter().take(5).enumerate() {
        println!("{:>2}. team {:<6} {}", place + 1, team, rank);
    }
}
