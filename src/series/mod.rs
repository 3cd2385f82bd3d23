//! Time-series preparation and normalization.
//!
//! `prepare` turns the raw provider table into a gap-free daily series;
//! `normalize` standardizes it for clustering. Both stages are pure: same
//! input, same output, no mutation of upstream artifacts.

pub mod normalize;
pub mod prepare;

pub use normalize::normalize;
pub use prepare::prepare_daily_series;
