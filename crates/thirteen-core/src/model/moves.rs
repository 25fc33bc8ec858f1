//! Legal move enumeration.
//!
//! Straights and consecutive pairs are generated from representative suit
//! choices only: for runs, one variant built from each rank's lowest suit
//! and one from each rank's highest suit; for consecutive pairs, the two
//! lowest suits of every rank. Other suit mixes are valid plays when
//! submitted directly but are not enumerated here.

use crate::model::card::Card;
use crate::model::combo::{HandIdentity, beats_identity, identify};
use crate::model::rank::Rank;
use std::collections::BTreeMap;

/// Every enumerated subset of `hand` that beats `table`, in generation order:
/// singles, pairs, triples, quads, straights, consecutive pairs.
pub fn legal_moves(hand: &[Card], table: Option<&[Card]>) -> Vec<Vec<Card>> {
    let table_identity = table.map(identify);
    let mut generator = Generator {
        table: table_identity,
        moves: Vec::new(),
    };

    let mut sorted = hand.to_vec();
    sorted.sort_by_key(|card| card.value());
    let n = sorted.len();

    for card in &sorted {
        generator.offer(vec![*card]);
    }
    for w in sorted.windows(2) {
        if w[0].rank == w[1].rank {
            generator.offer(w.to_vec());
        }
    }
    for w in sorted.windows(3) {
        if w[0].rank == w[2].rank {
            generator.offer(w.to_vec());
        }
    }
    if n >= 4 {
        for w in sorted.windows(4) {
            if w[0].rank == w[3].rank {
                generator.offer(w.to_vec());
            }
        }
    }

    let groups = group_by_rank(&sorted);
    let ranks: Vec<u8> = groups.keys().copied().collect();

    for start in 0..ranks.len() {
        if ranks[start] == Rank::Two.value() {
            continue;
        }
        let mut run = vec![ranks[start]];
        for next in start + 1..ranks.len() {
            if ranks[next] == Rank::Two.value() || ranks[next] != ranks[next - 1] + 1 {
                break;
            }
            run.push(ranks[next]);
            if run.len() >= 3 {
                let highest: Vec<Card> = run
                    .iter()
                    .filter_map(|r| groups[r].last().copied())
                    .collect();
                let lowest: Vec<Card> = run
                    .iter()
                    .filter_map(|r| groups[r].first().copied())
                    .collect();
                let same = highest == lowest;
                generator.offer(highest);
                if !same {
                    generator.offer(lowest);
                }
            }
        }
    }

    for start in 0..ranks.len() {
        if ranks[start] == Rank::Two.value() || groups[&ranks[start]].len() < 2 {
            continue;
        }
        let mut run = vec![ranks[start]];
        for next in start + 1..ranks.len() {
            let rank = ranks[next];
            if rank == Rank::Two.value()
                || rank != ranks[next - 1] + 1
                || groups[&rank].len() < 2
            {
                break;
            }
            run.push(rank);
            if run.len() >= 3 {
                let pairs: Vec<Card> = run
                    .iter()
                    .flat_map(|r| groups[r].iter().take(2).copied())
                    .collect();
                generator.offer(pairs);
            }
        }
    }

    generator.moves
}

/// Keeps only the moves that include `card`.
pub fn containing(moves: Vec<Vec<Card>>, card: Card) -> Vec<Vec<Card>> {
    moves.into_iter().filter(|mv| mv.contains(&card)).collect()
}

fn group_by_rank(sorted: &[Card]) -> BTreeMap<u8, Vec<Card>> {
    let mut groups: BTreeMap<u8, Vec<Card>> = BTreeMap::new();
    for card in sorted {
        groups.entry(card.rank.value()).or_default().push(*card);
    }
    groups
}

struct Generator {
    table: Option<HandIdentity>,
    moves: Vec<Vec<Card>>,
}

impl Generator {
    fn offer(&mut self, subset: Vec<Card>) {
        if beats_identity(&identify(&subset), self.table.as_ref()) {
            self.moves.push(subset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{containing, legal_moves};
    use crate::model::card::{Card, parse_cards};
    use crate::model::combo::{ComboKind, identify};

    fn cards(raw: &str) -> Vec<Card> {
        parse_cards(raw).expect("valid card list")
    }

    fn kinds(moves: &[Vec<Card>]) -> Vec<ComboKind> {
        moves.iter().map(|mv| identify(mv).kind).collect()
    }

    #[test]
    fn empty_hand_has_no_moves() {
        assert!(legal_moves(&[], None).is_empty());
    }

    #[test]
    fn leading_lists_singles_then_groups() {
        let moves = legal_moves(&cards("5S 5H 9D"), None);
        assert_eq!(
            kinds(&moves),
            vec![ComboKind::Single, ComboKind::Single, ComboKind::Single, ComboKind::Pair]
        );
    }

    #[test]
    fn triples_only_pair_adjacent_cards() {
        let moves = legal_moves(&cards("7S 7C 7H"), None);
        let pairs = moves.iter().filter(|mv| mv.len() == 2).count();
        let triples = moves.iter().filter(|mv| mv.len() == 3).count();
        assert_eq!(pairs, 2);
        assert_eq!(triples, 1);
    }

    #[test]
    fn runs_emit_lowest_and_highest_suit_variants() {
        let moves = legal_moves(&cards("3S 3H 4C 5D"), None);
        let straights: Vec<_> = moves
            .iter()
            .filter(|mv| identify(mv).kind == ComboKind::Straight)
            .collect();
        assert_eq!(straights.len(), 2);
        assert!(straights.contains(&&cards("3H 4C 5D")));
        assert!(straights.contains(&&cards("3S 4C 5D")));
    }

    #[test]
    fn runs_extend_and_stop_at_two() {
        let moves = legal_moves(&cards("QS KS AS 2S"), None);
        let straights: Vec<_> = moves
            .iter()
            .filter(|mv| identify(mv).kind == ComboKind::Straight)
            .collect();
        assert_eq!(straights, vec![&cards("QS KS AS")]);
    }

    #[test]
    fn consecutive_pairs_use_two_lowest_suits() {
        let moves = legal_moves(&cards("4S 4C 4H 5S 5D 6C 6H"), None);
        let seq: Vec<_> = moves
            .iter()
            .filter(|mv| identify(mv).kind == ComboKind::SeqPairs)
            .collect();
        assert_eq!(seq, vec![&cards("4S 4C 5S 5D 6C 6H")]);
    }

    #[test]
    fn following_filters_by_beat() {
        let moves = legal_moves(&cards("3S 8D 8H KC"), Some(&cards("9S")));
        assert_eq!(moves, vec![cards("KC")]);
    }

    #[test]
    fn bombs_offered_against_a_single_two() {
        let moves = legal_moves(&cards("3D 9S 9C 9D 9H"), Some(&cards("2S")));
        assert_eq!(moves, vec![cards("9S 9C 9D 9H")]);
    }

    #[test]
    fn opening_filter_keeps_three_of_spades_moves() {
        let moves = legal_moves(&cards("3S 3C 4D 5H"), None);
        let opening = containing(moves, Card::THREE_OF_SPADES);
        assert!(!opening.is_empty());
        assert!(opening.iter().all(|mv| mv.contains(&Card::THREE_OF_SPADES)));
        assert!(opening.contains(&cards("3S")));
        assert!(opening.contains(&cards("3S 3C")));
    }
}
