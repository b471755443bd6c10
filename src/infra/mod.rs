//! External collaborators: port directory, pricing oracle, weather provider.

pub mod ports;
pub mod pricing;
pub mod weather;
