//! Domain model for the rate cycle classifier.

mod types;

pub use types::{
    ClassifyConfig, ClusterAssignment, ClusterSummary, DailySeries, DecimalSep, InputSource,
    LabeledDay, LabeledSeries, NormalizedSeries, RateRecord, SeriesFile,
};
