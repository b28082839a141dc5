//! Services for the agronomic decision engine

pub mod assessment;
pub mod knowledge_base;
pub mod weather;

pub use assessment::AssessmentService;
pub use weather::WeatherService;
