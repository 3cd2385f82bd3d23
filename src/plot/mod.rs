//! Visualization hooks for the labeled series.
//!
//! Both renderers consume a finished `LabeledSeries` and have no effect on
//! the classification pipeline: the terminal plot for quick sanity checks,
//! the SVG chart for sharing.

pub mod ascii;
pub mod svg;

pub use ascii::render_labeled_series;
pub use svg::write_labeled_series_svg;
