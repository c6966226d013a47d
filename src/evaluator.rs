//! Game state creation, end of game scoring and win detection.
//!
//! Everything here is a free function over a caller owned [`GameState`].

use crate::error::StateError;
use crate::pile::PileRole;
use crate::state::GameState;
use log::{debug, info, trace};
use rand::{thread_rng, Rng};

pub const PENALTY_INTERVAL_SECS: i64 = 10;
pub const PENALTY_PER_INTERVAL: i64 = -2;
pub const BONUS_NUMERATOR: i64 = 700_000;
pub const BONUS_MIN_SECS: i64 = 30;

/// A shuffled and dealt game, ready to be started.
pub fn create_initial_state() -> GameState {
    create_initial_state_with(&mut thread_rng())
}

pub fn create_initial_state_with<R: Rng + ?Sized>(rng: &mut R) -> GameState {
    let state = GameState::deal(rng);
    debug!("dealt {} cards over {} piles", state.total_cards(), state.piles().len());
    state
}

/// Sets the time score to `elapsed / 10 * -2`, replacing whatever it was.
/// Meant for games that ended without a win.
pub fn apply_time_penalty(game_state: &mut GameState) -> Result<(), StateError> {
    let seconds = game_state.elapsed_seconds()?;
    game_state.time_score = seconds / PENALTY_INTERVAL_SECS * PENALTY_PER_INTERVAL;
    debug!("time penalty after {seconds}s: {}", game_state.time_score);
    Ok(())
}

/// Sets the time score to `700000 / elapsed` for games longer than 30
/// seconds. Shorter games keep their current time score. Assumes the game is
/// won.
pub fn apply_bonus_score(game_state: &mut GameState) -> Result<(), StateError> {
    let seconds = game_state.elapsed_seconds()?;
    if seconds > BONUS_MIN_SECS {
        game_state.time_score = BONUS_NUMERATOR / seconds;
        debug!("time bonus after {seconds}s: {}", game_state.time_score);
    } else {
        debug!("no time bonus for a {seconds}s game");
    }
    Ok(())
}

/// Flags the game as won when no pile has face down cards and the stock is
/// empty. The first offending pile ends the check; the flag is never cleared.
pub fn detect_game_win(game_state: &mut GameState) {
    for (id, pile) in game_state.piles() {
        if pile.invisible_count() > 0 {
            trace!("{id} still has {} invisible cards", pile.invisible_count());
            return;
        }

        if pile.role() == PileRole::Stock && !pile.is_empty() {
            trace!("stock {id} still has {} cards", pile.len());
            return;
        }
    }

    if !game_state.game_won {
        info!("game won");
    }
    game_state.game_won = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Suit, ACE};
    use crate::pile::{Pile, PileId};
    use crate::tests::{seeded_rng, state_with_duration, won_board};
    use pretty_assertions::assert_eq;

    fn column(cards: usize, invisible: usize) -> Pile {
        let cards = (0..cards as u8).map(|idx| Card::from_index(idx).unwrap()).collect();
        Pile::with_cards(PileRole::Column, cards, invisible).unwrap()
    }

    #[test]
    fn penalty_formula() {
        for (secs, expected) in [(0, 0), (5, 0), (9, 0), (10, -2), (19, -2), (100, -20), (3605, -720)] {
            let mut state = state_with_duration(secs);
            apply_time_penalty(&mut state).unwrap();
            assert_eq!(state.time_score, expected, "after {secs}s");
        }
    }

    #[test]
    fn penalty_replaces_previous_score() {
        let mut state = state_with_duration(100);
        state.time_score = 5_000;
        apply_time_penalty(&mut state).unwrap();
        assert_eq!(state.time_score, -20);
        apply_time_penalty(&mut state).unwrap();
        assert_eq!(state.time_score, -20);
    }

    #[test]
    fn bonus_formula() {
        for (secs, expected) in [(31, 22_580), (35, 20_000), (100, 7_000), (700_000, 1), (700_001, 0)] {
            let mut state = state_with_duration(secs);
            apply_bonus_score(&mut state).unwrap();
            assert_eq!(state.time_score, expected, "after {secs}s");
        }
    }

    #[test]
    fn bonus_is_a_no_op_for_short_games() {
        for secs in [0, 1, 29, 30] {
            let mut state = state_with_duration(secs);
            state.time_score = 123;
            apply_bonus_score(&mut state).unwrap();
            assert_eq!(state.time_score, 123, "after {secs}s");
        }
    }

    #[test]
    fn bonus_keeps_penalty_for_short_games() {
        let mut state = state_with_duration(25);
        state.time_score = -40;
        apply_bonus_score(&mut state).unwrap();
        assert_eq!(state.time_score, -40);
    }

    #[test]
    fn last_scoring_call_wins() {
        let mut state = state_with_duration(100);
        apply_time_penalty(&mut state).unwrap();
        apply_bonus_score(&mut state).unwrap();
        assert_eq!(state.time_score, 7_000);
        apply_time_penalty(&mut state).unwrap();
        assert_eq!(state.time_score, -20);
    }

    #[test]
    fn scoring_needs_timestamps() {
        let mut state = GameState::new();
        state.time_score = 9;
        assert_eq!(apply_time_penalty(&mut state), Err(StateError::NotStarted));
        assert_eq!(apply_bonus_score(&mut state), Err(StateError::NotStarted));

        state.start_time = state_with_duration(0).start_time;
        assert_eq!(apply_time_penalty(&mut state), Err(StateError::NotFinished));
        assert_eq!(apply_bonus_score(&mut state), Err(StateError::NotFinished));
        assert_eq!(state.time_score, 9);
    }

    #[test]
    fn scoring_rejects_end_before_start() {
        let mut state = state_with_duration(-50);
        state.time_score = 9;
        assert!(matches!(
            apply_time_penalty(&mut state),
            Err(StateError::EndBeforeStart { .. })
        ));
        assert!(matches!(
            apply_bonus_score(&mut state),
            Err(StateError::EndBeforeStart { .. })
        ));
        assert_eq!(state.time_score, 9);
    }

    #[test]
    fn cleared_board_is_won() {
        let mut state = won_board();
        detect_game_win(&mut state);
        assert!(state.game_won);
    }

    #[test]
    fn played_out_deal_is_won_with_bonus() {
        let mut state = create_initial_state_with(&mut seeded_rng(17));
        state.start_time = state_with_duration(140).start_time;
        state.end_time = state_with_duration(140).end_time;
        state.play_out();
        detect_game_win(&mut state);
        assert!(state.game_won);
        apply_bonus_score(&mut state).unwrap();
        assert_eq!(state.time_score, 5_000);
    }

    #[test]
    fn empty_state_is_won() {
        let mut state = GameState::new();
        detect_game_win(&mut state);
        assert!(state.game_won);
    }

    #[test]
    fn fresh_deal_is_not_won() {
        let mut state = create_initial_state_with(&mut seeded_rng(1));
        detect_game_win(&mut state);
        assert!(!state.game_won);
    }

    #[test]
    fn invisible_card_blocks_win() {
        let mut state = won_board();
        state.insert_pile(PileId::Column(3), column(2, 1));
        detect_game_win(&mut state);
        assert!(!state.game_won);
    }

    #[test]
    fn visible_columns_with_empty_stock_win() {
        let mut state = won_board();
        state.insert_pile(PileId::Column(0), column(4, 0));
        detect_game_win(&mut state);
        assert!(state.game_won);
    }

    #[test]
    fn non_empty_stock_blocks_win() {
        let mut state = won_board();
        state
            .pile_mut(PileId::Stock)
            .unwrap()
            .push(Card::new(Suit::Clubs, ACE).unwrap());
        detect_game_win(&mut state);
        assert!(!state.game_won);
    }

    #[test]
    fn only_stock_role_is_checked_for_cards() {
        let mut state = won_board();
        state
            .pile_mut(PileId::Waste)
            .unwrap()
            .push(Card::new(Suit::Hearts, ACE).unwrap());
        detect_game_win(&mut state);
        assert!(state.game_won);
    }

    #[test]
    fn stock_role_is_checked_under_any_id() {
        let mut state = won_board();
        let stock = Pile::with_cards(PileRole::Stock, vec![Card::new(Suit::Spades, ACE).unwrap()], 0).unwrap();
        state.insert_pile(PileId::Column(6), stock);
        detect_game_win(&mut state);
        assert!(!state.game_won);
    }

    #[test]
    fn win_flag_is_never_cleared() {
        let mut state = won_board();
        detect_game_win(&mut state);
        assert!(state.game_won);

        state.insert_pile(PileId::Column(2), column(3, 2));
        detect_game_win(&mut state);
        assert!(state.game_won);
    }

    #[test]
    fn detection_is_idempotent() {
        let mut lost = create_initial_state_with(&mut seeded_rng(9));
        let before = lost.clone();
        detect_game_win(&mut lost);
        detect_game_win(&mut lost);
        assert_eq!(lost, before);

        let mut won = won_board();
        detect_game_win(&mut won);
        let after_first = won.clone();
        detect_game_win(&mut won);
        assert_eq!(won, after_first);
    }

    #[test]
    fn initial_state_is_unstarted() {
        let state = create_initial_state();
        assert_eq!(state.start_time, None);
        assert_eq!(state.end_time, None);
        assert_eq!(state.time_score, 0);
        assert!(!state.game_won);
        assert_eq!(state.total_cards(), 52);
    }
}
