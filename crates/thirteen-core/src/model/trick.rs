use crate::model::card::Card;
use crate::model::combo::{HandIdentity, identify};
use crate::model::player::Seat;
use serde::{Deserialize, Serialize};

/// One accepted play within a trick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    pub cards: Vec<Card>,
}

impl Play {
    pub fn identity(&self) -> HandIdentity {
        identify(&self.cards)
    }
}

/// Plays of the current trick; the most recent entry is the table state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickPile {
    plays: Vec<Play>,
}

impl TrickPile {
    pub fn new() -> Self {
        Self { plays: Vec::new() }
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    /// The combination currently to beat.
    pub fn table(&self) -> Option<&Play> {
        self.plays.last()
    }

    pub fn table_cards(&self) -> Option<&[Card]> {
        self.table().map(|play| play.cards.as_slice())
    }

    pub fn owner(&self) -> Option<Seat> {
        self.table().map(|play| play.seat)
    }

    pub fn push(&mut self, seat: Seat, mut cards: Vec<Card>) {
        cards.sort_by_key(|card| card.value());
        self.plays.push(Play { seat, cards });
    }

    /// Empties the pile, handing back the plays in order.
    pub fn clear(&mut self) -> Vec<Play> {
        std::mem::take(&mut self.plays)
    }

    pub fn card_count(&self) -> usize {
        self.plays.iter().map(|play| play.cards.len()).sum()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.plays.iter().flat_map(|play| play.cards.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::TrickPile;
    use crate::model::card::parse_cards;
    use crate::model::combo::ComboKind;
    use crate::model::player::Seat;

    #[test]
    fn latest_play_is_the_table() {
        let mut pile = TrickPile::new();
        assert!(pile.table().is_none());
        pile.push(Seat(1), parse_cards("5S").unwrap());
        pile.push(Seat(2), parse_cards("9H").unwrap());
        assert_eq!(pile.owner(), Some(Seat(2)));
        assert_eq!(pile.table_cards(), Some(parse_cards("9H").unwrap().as_slice()));
        assert_eq!(pile.card_count(), 2);
    }

    #[test]
    fn push_sorts_cards_by_value() {
        let mut pile = TrickPile::new();
        pile.push(Seat(0), parse_cards("5H 3S 4C").unwrap());
        let table = pile.table().unwrap();
        assert_eq!(table.cards, parse_cards("3S 4C 5H").unwrap());
        assert_eq!(table.identity().kind, ComboKind::Straight);
    }

    #[test]
    fn clear_returns_history() {
        let mut pile = TrickPile::new();
        pile.push(Seat(3), parse_cards("KD").unwrap());
        let history = pile.clear();
        assert_eq!(history.len(), 1);
        assert!(pile.is_empty());
    }
}
