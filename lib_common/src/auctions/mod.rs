//! Domain types for the auction pipeline.

pub mod endpoints;
pub mod tuple;
