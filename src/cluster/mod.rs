//! Unsupervised partitioning of the normalized series and the deterministic
//! rule that turns unordered cluster ids into an ordered cycle labeling.

pub mod kmeans;
pub mod label;

pub use kmeans::{KMeansOptions, cluster_series};
pub use label::{label_series, vocabulary_for};
