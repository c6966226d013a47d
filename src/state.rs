use crate::card::{full_deck, Card};
use crate::error::StateError;
use crate::pile::{Pile, PileId, PileRole};
use chrono::{DateTime, Utc};
use colored::Colorize;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const NUM_COLUMNS: u8 = 7;
pub const NUM_FOUNDATIONS: u8 = 4;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub time_score: i64,
    pub game_won: bool,
    piles: BTreeMap<PileId, Pile>,
}

impl GameState {
    /// An empty state: no piles, no timestamps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shuffles a full deck and lays out a fresh Klondike game. Column `i`
    /// gets `i + 1` cards with all but the top one face down, the rest of the
    /// deck becomes the stock.
    pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = full_deck();
        deck.shuffle(rng);
        Self::deal_from(deck)
    }

    /// Lays out `deck` as dealt, drawing cards from its end. Whatever is left
    /// keeps its order as the stock, so the next card drawn is its last one.
    pub fn deal_from(mut deck: Vec<Card>) -> Self {
        let mut columns: Vec<Vec<Card>> = vec![Vec::new(); NUM_COLUMNS as usize];
        for row in 0..NUM_COLUMNS as usize {
            for column in columns.iter_mut().skip(row) {
                if let Some(card) = deck.pop() {
                    column.push(card);
                }
            }
        }

        let mut state = Self::new();
        for (idx, cards) in columns.into_iter().enumerate() {
            let invisible = cards.len().saturating_sub(1);
            let pile = Pile::with_cards(PileRole::Column, cards, invisible)
                .expect("a dealt column has one face up card");
            state.insert_pile(PileId::Column(idx as u8), pile);
        }
        for idx in 0..NUM_FOUNDATIONS {
            state.insert_pile(PileId::Foundation(idx), Pile::new(PileRole::Foundation));
        }
        let stock = Pile::with_cards(PileRole::Stock, deck, 0)
            .expect("a pile without invisible cards is always valid");
        state.insert_pile(PileId::Stock, stock);
        state.insert_pile(PileId::Waste, Pile::new(PileRole::Waste));
        state
    }

    pub fn piles(&self) -> &BTreeMap<PileId, Pile> {
        &self.piles
    }

    pub fn pile(&self, id: PileId) -> Option<&Pile> {
        self.piles.get(&id)
    }

    pub fn pile_mut(&mut self, id: PileId) -> Option<&mut Pile> {
        self.piles.get_mut(&id)
    }

    pub fn insert_pile(&mut self, id: PileId, pile: Pile) -> Option<Pile> {
        self.piles.insert(id, pile)
    }

    pub fn total_cards(&self) -> usize {
        self.piles.values().map(Pile::len).sum()
    }

    /// Takes every card off every non-foundation pile and puts it on the
    /// foundation of its suit. Cards whose foundation is missing go back on
    /// their pile face up.
    pub fn play_out(&mut self) {
        let ids: Vec<PileId> = self.piles.keys().copied().collect();
        for id in ids.into_iter().filter(|id| id.role() != PileRole::Foundation) {
            let mut taken = Vec::new();
            if let Some(pile) = self.piles.get_mut(&id) {
                while let Some(card) = pile.pop() {
                    taken.push(card);
                }
            }

            let mut stranded = Vec::new();
            for card in taken {
                match self.piles.get_mut(&PileId::Foundation(card.suit() as u8)) {
                    Some(foundation) if foundation.role() == PileRole::Foundation => {
                        foundation.push(card)
                    }
                    _ => stranded.push(card),
                }
            }
            if let Some(pile) = self.piles.get_mut(&id) {
                stranded.into_iter().rev().for_each(|card| pile.push(card));
            }
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.start_time = Some(now);
    }

    /// Stamps the end of the game. The end time can only be set once.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<(), StateError> {
        let start = self.start_time.ok_or(StateError::NotStarted)?;
        if self.end_time.is_some() {
            return Err(StateError::AlreadyFinished);
        }
        if now < start {
            return Err(StateError::EndBeforeStart { start, end: now });
        }
        self.end_time = Some(now);
        Ok(())
    }

    /// Whole seconds between start and end, truncating any fraction.
    pub fn elapsed_seconds(&self) -> Result<i64, StateError> {
        let start = self.start_time.ok_or(StateError::NotStarted)?;
        let end = self.end_time.ok_or(StateError::NotFinished)?;
        if end < start {
            return Err(StateError::EndBeforeStart { start, end });
        }
        Ok((end - start).num_seconds())
    }
}

fn write_pile(f: &mut fmt::Formatter, id: PileId, pile: &Pile) -> fmt::Result {
    write!(f, "{}\t", id.to_string().cyan())?;
    pile.iter().enumerate().try_for_each(|(idx, card)| {
        if idx < pile.invisible_count() {
            write!(f, "##\t")
        } else {
            write!(f, "{}\t", card)
        }
    })?;
    writeln!(f)
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "\n--------- Foundations ---------")?;
        for (id, pile) in self.piles.iter().filter(|(id, _)| id.role() == PileRole::Foundation) {
            write!(
                f,
                "{} [{}]\t",
                id.to_string().cyan(),
                pile.top().map_or_else(|| " ".to_string(), |card| card.to_string())
            )?;
        }
        writeln!(f)?;
        writeln!(f, "--------- Columns -------------")?;
        for (id, pile) in self.piles.iter().filter(|(id, _)| id.role() == PileRole::Column) {
            write_pile(f, *id, pile)?;
        }
        writeln!(f, "--------- Stock ---------------")?;
        if let Some(stock) = self.pile(PileId::Stock) {
            writeln!(f, "{} cards", stock.len())?;
        }
        writeln!(f, "--------- Waste ---------------")?;
        if let Some(waste) = self.pile(PileId::Waste) {
            waste.iter().try_for_each(|card| write!(f, "{} ", card))?;
        }
        writeln!(f)
    }
}
