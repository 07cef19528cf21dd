//! League schedule tests.
//!
//! These tests check pair coverage, per-round exclusivity, bye rotation and
//! home/away balance of generated round-robin schedules.

use bracket_engine::{ScheduleError, TeamRef, generate_round_robin};
use std::collections::{HashMap, HashSet};

fn teams(n: usize) -> Vec<TeamRef> {
    (0..n).map(|i| TeamRef::new(format!("club-{i:02}"))).collect()
}

fn unordered(a: &TeamRef, b: &TeamRef) -> (TeamRef, TeamRef) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

#[test]
fn test_four_team_example_schedule() {
    let teams: Vec<TeamRef> = ["A", "B", "C", "D"].into_iter().map(TeamRef::from).collect();
    let league = generate_round_robin(&teams, 1).unwrap();

    let rounds: Vec<Vec<(String, String)>> = (0..3)
        .map(|r| {
            league
                .round(r)
                .map(|m| (m.home.to_string(), m.away.to_string()))
                .collect()
        })
        .collect();

    let pair = |h: &str, a: &str| (h.to_string(), a.to_string());
    assert_eq!(rounds[0], vec![pair("A", "D"), pair("B", "C")]);
    assert_eq!(rounds[1], vec![pair("A", "C"), pair("D", "B")]);
    assert_eq!(rounds[2], vec![pair("A", "B"), pair("C", "D")]);
}

#[test]
fn test_every_pair_meets_once_per_repetition() {
    for n in [2, 3, 6, 7, 10, 11] {
        for reps in 1..=3 {
            let field = teams(n);
            let league = generate_round_robin(&field, reps).unwrap();

            let pairs = n * (n - 1) / 2;
            assert_eq!(
                league.matches.len(),
                reps as usize * pairs,
                "{n} teams, {reps} repetition(s)"
            );

            let mut meetings: HashMap<(TeamRef, TeamRef), u32> = HashMap::new();
            for m in &league.matches {
                let (h, a) = (m.home.team().unwrap(), m.away.team().unwrap());
                *meetings.entry(unordered(h, a)).or_default() += 1;
            }
            assert_eq!(meetings.len(), pairs);
            assert!(meetings.values().all(|&count| count == reps));
        }
    }
}

#[test]
fn test_no_team_twice_in_a_round() {
    let league = generate_round_robin(&teams(9), 2).unwrap();

    for round in 0..league.round_count {
        let mut seen = HashSet::new();
        for m in league.round(round) {
            assert!(seen.insert(m.home.to_string()), "home repeated in round {round}");
            assert!(seen.insert(m.away.to_string()), "away repeated in round {round}");
        }
    }
}

#[test]
fn test_odd_field_bye_rotation() {
    let field = teams(7);
    let league = generate_round_robin(&field, 2).unwrap();

    assert_eq!(league.round_count, 14);
    assert_eq!(league.byes.len(), 14);

    let mut byes: HashMap<&TeamRef, u32> = HashMap::new();
    for bye in &league.byes {
        *byes.entry(&bye.team).or_default() += 1;
        assert!(
            league
                .round(bye.round)
                .all(|m| m.home.team() != Some(&bye.team) && m.away.team() != Some(&bye.team)),
            "{} has a bye in round {} but plays",
            bye.team,
            bye.round
        );
    }
    assert_eq!(byes.len(), 7);
    assert!(byes.values().all(|&count| count == 2));
}

#[test]
fn test_even_repetitions_balance_home_games() {
    let field = teams(6);
    let league = generate_round_robin(&field, 2).unwrap();

    let mut home_games: HashMap<String, usize> = HashMap::new();
    for m in &league.matches {
        *home_games.entry(m.home.to_string()).or_default() += 1;
    }
    // Each team plays 10 games, half of them at home
    assert!(home_games.values().all(|&count| count == 5), "{home_games:?}");
}

#[test]
fn test_second_repetition_mirrors_first() {
    let league = generate_round_robin(&teams(4), 2).unwrap();

    for r in 0..3 {
        let first: Vec<_> = league.round(r).map(|m| (m.home.clone(), m.away.clone())).collect();
        let second: Vec<_> = league.round(r + 3).map(|m| (m.away.clone(), m.home.clone())).collect();
        assert_eq!(first, second);
    }
}

#[test]
fn test_rejects_small_or_duplicate_fields() {
    assert!(matches!(
        generate_round_robin(&teams(1), 1),
        Err(ScheduleError::InvalidInput(_))
    ));
    assert!(matches!(
        generate_round_robin(&[], 1),
        Err(ScheduleError::InvalidInput(_))
    ));

    let dupes = vec![TeamRef::from("x"), TeamRef::from("y"), TeamRef::from("x")];
    assert!(generate_round_robin(&dupes, 1).is_err());
}

#[test]
fn test_idempotent_structure() {
    let field = teams(8);
    let a = generate_round_robin(&field, 2).unwrap();
    let b = generate_round_robin(&field, 2).unwrap();

    let keys = |l: &bracket_engine::LeagueSchedule| -> Vec<_> {
        l.matches.iter().map(|m| m.fixture_key()).collect()
    };
    assert_eq!(keys(&a), keys(&b));
}
