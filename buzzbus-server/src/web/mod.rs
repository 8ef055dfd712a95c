//! Web layer for the campus bus route planner.
//!
//! Provides the JSON API the BuzzBus frontend calls.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
