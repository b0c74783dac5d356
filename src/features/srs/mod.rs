pub mod deck_builder;
pub mod scheduler;

pub use deck_builder::build_deck;
pub use scheduler::{Quality, initial_schedule, review};
