mod action;
mod state;

pub use action::{Action, FilterField};
pub use state::{AppState, Screen, UiState};
