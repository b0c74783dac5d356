pub mod analysis;
pub mod cards;
pub mod judgment;
pub mod student;
