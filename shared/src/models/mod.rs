//! Domain models for the agronomic decision engine

mod crop;
mod indicators;
mod risk;
mod weather;

pub use crop::*;
pub use indicators::*;
pub use risk::*;
pub use weather::*;
