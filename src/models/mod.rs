//! Core data models for the player service.

mod ids;
mod player;

pub use ids::*;
pub use player::*;
