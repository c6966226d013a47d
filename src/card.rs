use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NUM_CARDS_DECK: u8 = 52;
pub const CARDS_PER_SUIT: u8 = 13;

pub const ACE: u8 = 1;
pub const JACK: u8 = 11;
pub const QUEEN: u8 = 12;
pub const KING: u8 = 13;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Spades,
    Hearts,
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Spades, Suit::Hearts];

impl Suit {
    pub fn is_red(self) -> bool {
        matches!(self, Suit::Diamonds | Suit::Hearts)
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
        }
    }
}

/// A card of a standard 52 card deck.
///
/// Cards are numbered suit by suit (clubs, diamonds, spades, hearts), ace
/// through king, so `Card(0)` is the ace of clubs and `Card(51)` the king of
/// hearts.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card(u8);

impl Card {
    /// `None` if `rank` is outside `ACE..=KING`.
    pub fn new(suit: Suit, rank: u8) -> Option<Self> {
        (ACE..=KING)
            .contains(&rank)
            .then(|| Card(suit as u8 * CARDS_PER_SUIT + rank - 1))
    }

    pub fn from_index(index: u8) -> Option<Self> {
        (index < NUM_CARDS_DECK).then_some(Card(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn suit(self) -> Suit {
        ALL_SUITS[(self.0 / CARDS_PER_SUIT) as usize]
    }

    /// Ace is 1, king is 13.
    pub fn rank(self) -> u8 {
        self.0 % CARDS_PER_SUIT + 1
    }

    pub fn is_red(self) -> bool {
        self.suit().is_red()
    }

    pub fn is_black(self) -> bool {
        !self.is_red()
    }

    pub fn is_king(self) -> bool {
        self.rank() == KING
    }

    pub fn is_ace(self) -> bool {
        self.rank() == ACE
    }
}

impl TryFrom<u8> for Card {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Card::from_index(index).ok_or_else(|| format!("card index {index} out of range"))
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.0
    }
}

/// Every card of the deck in index order.
pub fn full_deck() -> Vec<Card> {
    (0..NUM_CARDS_DECK).map(Card).collect()
}

pub fn rank_label(rank: u8) -> String {
    match rank {
        ACE => "A".to_string(),
        JACK => "J".to_string(),
        QUEEN => "Q".to_string(),
        KING => "K".to_string(),
        _ => rank.to_string(),
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = format!("{}{}", rank_label(self.rank()), self.suit().symbol());
        if self.is_red() {
            write!(f, "{}", label.red())
        } else {
            write!(f, "{}", label.bold())
        }
    }
}
