//! Fabrima Domain Concerns

pub mod assistant;
pub mod carts;
