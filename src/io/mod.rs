//! Input/output boundary: CSV ingest of the Tesouro taxas table, CSV export
//! of the labeled series, and the portable labeled-series JSON file.

pub mod export;
pub mod ingest;
pub mod series;
