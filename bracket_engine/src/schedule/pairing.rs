//! Pairing primitives shared by every generator.
//!
//! All functions here are pure: identical inputs always produce identical
//! output, with no randomness and no clock.

use super::errors::{ScheduleError, ScheduleResult};

/// Pairings for one round-robin round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPairings<T> {
    /// `(home, away)` pairs in circle order
    pub pairs: Vec<(T, T)>,
    /// Entrant sitting out this round (odd entrant counts only)
    pub bye: Option<T>,
}

/// Pair one round of a round-robin using the circle method.
///
/// The first entrant stays fixed while the rest rotate right by `round_index`
/// positions; position `i` then meets position `n - 1 - i`. An odd list gets a
/// synthetic bye appended before rotating, and whoever draws it sits out.
pub fn round_robin_round<T: Clone>(teams: &[T], round_index: usize) -> RoundPairings<T> {
    let mut slots: Vec<Option<&T>> = teams.iter().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    if slots.len() < 2 {
        return RoundPairings {
            pairs: Vec::new(),
            bye: teams.first().cloned(),
        };
    }

    let rest_len = slots.len() - 1;
    slots[1..].rotate_right(round_index % rest_len);

    let n = slots.len();
    let mut pairs = Vec::with_capacity(n / 2);
    let mut bye = None;
    for i in 0..n / 2 {
        match (slots[i], slots[n - 1 - i]) {
            (Some(home), Some(away)) => pairs.push((home.clone(), away.clone())),
            (Some(team), None) | (None, Some(team)) => bye = Some(team.clone()),
            (None, None) => {}
        }
    }

    RoundPairings { pairs, bye }
}

/// Number of rounds a single round-robin cycle needs for `n` entrants
pub fn rounds_per_cycle(n: usize) -> usize {
    if n < 2 {
        0
    } else if n % 2 == 0 {
        n - 1
    } else {
        n
    }
}

/// Smallest power of two that is `>= n` (1 for `n == 0`)
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Canonical bracket order for a power-of-two field.
///
/// Consecutive entries form first-round matches (1 v n, …) and the halves are
/// interleaved recursively so seeds 1 and 2 can only meet in the final.
pub fn standard_seed_order(n: usize) -> ScheduleResult<Vec<u32>> {
    if n == 0 || !n.is_power_of_two() {
        return Err(ScheduleError::invalid(format!(
            "bracket size must be a power of two, got {n}"
        )));
    }

    let mut order: Vec<u32> = vec![1];
    let mut size = 1u32;
    while (size as usize) < n {
        size *= 2;
        order = order
            .iter()
            .flat_map(|&seed| [seed, size + 1 - seed])
            .collect();
    }

    Ok(order)
}

/// Seeds (1-indexed) that receive a first-round bye in an `n`-team bracket.
///
/// The strongest `next_power_of_two(n) - n` seeds are padded; in
/// [`standard_seed_order`] each of them meets a phantom seed above `n`, so no
/// two byes ever share a match.
pub fn bye_seeds(n: usize) -> Vec<u32> {
    let byes = next_power_of_two(n) - n;
    (1..=byes as u32).collect()
}

/// Fold an ordered list into best-vs-worst pairs: `0 v n-1`, `1 v n-2`, …
///
/// The middle entry of an odd list is left out.
pub(crate) fn fold_pairs<T: Clone>(ordered: &[T]) -> Vec<(T, T)> {
    let n = ordered.len();
    (0..n / 2)
        .map(|i| (ordered[i].clone(), ordered[n - 1 - i].clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_method_four_teams() {
        let teams = ["A", "B", "C", "D"];

        let r0 = round_robin_round(&teams, 0);
        assert_eq!(r0.pairs, vec![("A", "D"), ("B", "C")]);
        assert_eq!(r0.bye, None);

        let r1 = round_robin_round(&teams, 1);
        assert_eq!(r1.pairs, vec![("A", "C"), ("D", "B")]);

        let r2 = round_robin_round(&teams, 2);
        assert_eq!(r2.pairs, vec![("A", "B"), ("C", "D")]);
    }

    #[test]
    fn test_circle_method_odd_gets_bye() {
        let teams = ["A", "B", "C"];
        let byes: Vec<&str> = (0..3)
            .map(|r| round_robin_round(&teams, r).bye.unwrap())
            .collect();

        assert_eq!(byes.len(), 3);
        let mut sorted = byes.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["A", "B", "C"]);

        for r in 0..3 {
            assert_eq!(round_robin_round(&teams, r).pairs.len(), 1);
        }
    }

    #[test]
    fn test_rounds_per_cycle() {
        assert_eq!(rounds_per_cycle(1), 0);
        assert_eq!(rounds_per_cycle(4), 3);
        assert_eq!(rounds_per_cycle(5), 5);
    }

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(8), 8);
        assert_eq!(next_power_of_two(9), 16);
    }

    #[test]
    fn test_standard_seed_order() {
        assert_eq!(standard_seed_order(2).unwrap(), vec![1, 2]);
        assert_eq!(standard_seed_order(4).unwrap(), vec![1, 4, 2, 3]);
        assert_eq!(
            standard_seed_order(8).unwrap(),
            vec![1, 8, 4, 5, 2, 7, 3, 6]
        );
    }

    #[test]
    fn test_standard_seed_order_rejects_non_power() {
        assert!(standard_seed_order(6).is_err());
        assert!(standard_seed_order(0).is_err());
    }

    #[test]
    fn test_top_two_seeds_in_opposite_halves() {
        for exp in 1..7 {
            let n = 1usize << exp;
            let order = standard_seed_order(n).unwrap();
            let half = n / 2;
            let pos1 = order.iter().position(|&s| s == 1).unwrap();
            let pos2 = order.iter().position(|&s| s == 2).unwrap();
            assert!(pos1 < half && pos2 >= half, "n = {n}");
        }
    }

    #[test]
    fn test_bye_seeds() {
        assert_eq!(bye_seeds(5), vec![1, 2, 3]);
        assert!(bye_seeds(8).is_empty());
        assert_eq!(bye_seeds(6), vec![1, 2]);
    }

    #[test]
    fn test_fold_pairs() {
        assert_eq!(fold_pairs(&[1, 2, 3, 4]), vec![(1, 4), (2, 3)]);
        assert_eq!(fold_pairs(&[1, 2, 3]), vec![(1, 3)]);
        assert!(fold_pairs::<u8>(&[]).is_empty());
    }
}
