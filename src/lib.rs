//! Scoring and win detection for a single player Klondike game.

pub mod card;
pub mod error;
pub mod evaluator;
pub mod pile;
pub mod state;


pub use card::Card;
pub use error::StateError;
pub use evaluator::{
    apply_bonus_score, apply_time_penalty, create_initial_state, create_initial_state_with,
    detect_game_win,
};
pub use pile::{Pile, PileId, PileRole};
pub use state::GameState;
