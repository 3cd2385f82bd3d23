//! Dataset providers: remote Tesouro Transparente fetch and the synthetic
//! offline sample.

pub mod sample;
pub mod tesouro;

pub use sample::{SampleOptions, generate_sample};
pub use tesouro::{Dataset, FetchOutcome, TesouroClient};
