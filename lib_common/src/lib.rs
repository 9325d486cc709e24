// Declare the modules to re-export
#[cfg(feature = "auctions")]
pub mod auctions;
#[cfg(feature = "connections")]
pub mod connections;
#[cfg(feature = "retrieve")]
pub mod retrieve;
#[cfg(feature = "utils")]
pub mod utils;

// Re-export the domain types used throughout the gateway
#[cfg(feature = "auctions")]
pub use auctions::endpoints::*;
#[cfg(feature = "auctions")]
pub use auctions::tuple::*;
