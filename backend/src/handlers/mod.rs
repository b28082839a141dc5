//! HTTP handlers for the agronomic decision engine

pub mod assessment;
pub mod catalog;
pub mod health;
pub mod risk;
pub mod weather;

pub use assessment::*;
pub use catalog::*;
pub use health::*;
pub use risk::*;
pub use weather::*;
