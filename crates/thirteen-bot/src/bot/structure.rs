use std::collections::BTreeMap;
use thirteen_core::model::card::Card;
use thirteen_core::model::rank::Rank;

/// Minimum run of distinct consecutive ranks that counts as structure.
const RUN_LENGTH: usize = 3;

/// Cards that belong to a pair, triple, quad, or a run of three or more
/// consecutive ranks (Twos never extend a run). Breaking these up is a last
/// resort when following a single.
pub fn structural_cards(hand: &[Card]) -> Vec<Card> {
    let mut by_rank: BTreeMap<Rank, Vec<Card>> = BTreeMap::new();
    for card in hand {
        by_rank.entry(card.rank).or_default().push(*card);
    }

    let mut structural: Vec<Card> = by_rank
        .values()
        .filter(|group| group.len() >= 2)
        .flatten()
        .copied()
        .collect();

    let mut run: Vec<Rank> = Vec::new();
    for rank in by_rank.keys().copied() {
        if rank.is_two() {
            run.clear();
            continue;
        }
        if run.last().is_some_and(|last| last.value() + 1 != rank.value()) {
            run.clear();
        }
        run.push(rank);
        if run.len() >= RUN_LENGTH {
            for member in &run {
                structural.extend(by_rank[member].iter().copied());
            }
        }
    }

    structural.sort();
    structural.dedup();
    structural
}

#[cfg(test)]
mod tests {
    use super::structural_cards;
    use thirteen_core::model::card::parse_cards;

    #[test]
    fn pairs_and_runs_are_structural() {
        let hand = parse_cards("3S 3C 5D 7H 8S 9C QD").unwrap();
        let structure = structural_cards(&hand);
        assert_eq!(structure, parse_cards("3S 3C 7H 8S 9C").unwrap());
    }

    #[test]
    fn twos_break_runs() {
        let hand = parse_cards("KS AC 2D").unwrap();
        assert!(structural_cards(&hand).is_empty());
    }

    #[test]
    fn loose_singles_are_not_structural() {
        let hand = parse_cards("3S 5D 9C JH").unwrap();
        assert!(structural_cards(&hand).is_empty());
    }
}
