pub mod card;
pub mod combo;
pub mod deck;
pub mod hand;
pub mod moves;
pub mod player;
pub mod rank;
pub mod round;
pub mod suit;
pub mod swap;
pub mod trick;
pub mod variant;
