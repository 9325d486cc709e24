//! General helper functions.

pub mod ids;
