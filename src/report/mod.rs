//! Terminal report formatting.

mod format;

pub use format::{format_cluster_table, format_run_summary};
