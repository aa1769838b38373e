pub mod error;
pub mod rolling;
pub mod thresholds;
