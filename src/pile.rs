use crate::card::Card;
use crate::error::StateError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COLUMN_HEADERS: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];
pub const FOUNDATION_HEADERS: [&str; 4] = ["SA", "SB", "SC", "SD"];
pub const STOCK_HEADER: &str = "ST";
pub const WASTE_HEADER: &str = "WA";

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum PileRole {
    Stock,
    Waste,
    Column,
    Foundation,
}

/// Key of a pile inside a game state.
///
/// Serialized as its header (`"A"`..`"G"` for columns, `"SA"`..`"SD"` for
/// foundations, `"ST"` and `"WA"`) so a state can be written as a JSON object.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PileId {
    Stock,
    Waste,
    Column(u8),
    Foundation(u8),
}

impl PileId {
    pub fn role(self) -> PileRole {
        match self {
            PileId::Stock => PileRole::Stock,
            PileId::Waste => PileRole::Waste,
            PileId::Column(_) => PileRole::Column,
            PileId::Foundation(_) => PileRole::Foundation,
        }
    }

    /// `None` for an out of range column or foundation index.
    pub fn header(self) -> Option<&'static str> {
        match self {
            PileId::Stock => Some(STOCK_HEADER),
            PileId::Waste => Some(WASTE_HEADER),
            PileId::Column(idx) => COLUMN_HEADERS.get(idx as usize).copied(),
            PileId::Foundation(idx) => FOUNDATION_HEADERS.get(idx as usize).copied(),
        }
    }

    /// Parses anything `Display` writes: a header, or `Column(n)` /
    /// `Foundation(n)` for indices past the header tables.
    pub fn from_header(header: &str) -> Option<Self> {
        match header {
            STOCK_HEADER => Some(PileId::Stock),
            WASTE_HEADER => Some(PileId::Waste),
            _ => COLUMN_HEADERS
                .iter()
                .position(|h| *h == header)
                .map(|idx| PileId::Column(idx as u8))
                .or_else(|| {
                    FOUNDATION_HEADERS
                        .iter()
                        .position(|h| *h == header)
                        .map(|idx| PileId::Foundation(idx as u8))
                })
                .or_else(|| parse_indexed(header, "Column(").map(PileId::Column))
                .or_else(|| parse_indexed(header, "Foundation(").map(PileId::Foundation)),
        }
    }
}

fn parse_indexed(text: &str, prefix: &str) -> Option<u8> {
    text.strip_prefix(prefix)?.strip_suffix(')')?.parse().ok()
}

impl TryFrom<String> for PileId {
    type Error = String;

    fn try_from(header: String) -> Result<Self, Self::Error> {
        PileId::from_header(&header).ok_or_else(|| format!("unknown pile header {header:?}"))
    }
}

impl From<PileId> for String {
    fn from(id: PileId) -> String {
        id.to_string()
    }
}

impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.header() {
            Some(header) => write!(f, "{header}"),
            None => write!(f, "{self:?}"),
        }
    }
}

/// An ordered stack of cards. `cards[0]` is the bottom card and the last
/// element is the top. The lowest `invisible_count` cards are face down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PileRepr")]
pub struct Pile {
    role: PileRole,
    cards: Vec<Card>,
    invisible_count: usize,
}

#[derive(Deserialize)]
struct PileRepr {
    role: PileRole,
    cards: Vec<Card>,
    invisible_count: usize,
}

impl TryFrom<PileRepr> for Pile {
    type Error = StateError;

    fn try_from(repr: PileRepr) -> Result<Self, Self::Error> {
        Pile::with_cards(repr.role, repr.cards, repr.invisible_count)
    }
}

impl Pile {
    pub fn new(role: PileRole) -> Self {
        Self {
            role,
            cards: Vec::new(),
            invisible_count: 0,
        }
    }

    pub fn with_cards(
        role: PileRole,
        cards: Vec<Card>,
        invisible_count: usize,
    ) -> Result<Self, StateError> {
        if invisible_count > cards.len() {
            return Err(StateError::TooManyInvisible {
                invisible: invisible_count,
                len: cards.len(),
            });
        }
        Ok(Self {
            role,
            cards,
            invisible_count,
        })
    }

    pub fn role(&self) -> PileRole {
        self.role
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn invisible_count(&self) -> usize {
        self.invisible_count
    }

    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn visible_cards(&self) -> &[Card] {
        &self.cards[self.invisible_count..]
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Removes the top card. Taking a face-down card also drops it from the
    /// invisible count.
    pub fn pop(&mut self) -> Option<Card> {
        let card = self.cards.pop()?;
        self.invisible_count = self.invisible_count.min(self.cards.len());
        Some(card)
    }

    /// Turns the top card face up if it is face down. Returns whether a card
    /// was revealed.
    pub fn reveal_top(&mut self) -> bool {
        if !self.cards.is_empty() && self.invisible_count == self.cards.len() {
            self.invisible_count -= 1;
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}
