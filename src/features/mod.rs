pub mod errors;
pub mod feedback;
pub mod srs;
