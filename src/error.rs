//! Application error type.
//!
//! Every fatal error carries:
//! - a `kind` so callers can distinguish bad input data from bad configuration
//!   from internal/network failures without string matching
//! - an `exit_code` for the binary (2 = config/input file, 3 = data, 4 = network/internal)
//! - a human-readable message

/// Error taxonomy of the classification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed date or rate value in the raw table.
    Parse,
    /// The instrument filter matched zero rows, or a query hit an empty series.
    EmptyDataset,
    /// The first observation of the filtered series has no rate value,
    /// so there is nothing to forward-fill from.
    IncompleteSeries,
    /// Zero variance in the series to be normalized.
    DegenerateSeries,
    /// The requested cluster count cannot be satisfied without an empty cluster.
    UnresolvableClustering,
    /// Invalid CLI/config combination (e.g. label vocabulary length != K).
    InvalidConfig,
    /// Local filesystem failure (open/create/read/write).
    Io,
    /// Remote fetch failure.
    Network,
    /// Anything that indicates a bug rather than bad input.
    Internal,
}

impl ErrorKind {
    fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InvalidConfig | ErrorKind::Io => 2,
            ErrorKind::Parse
            | ErrorKind::EmptyDataset
            | ErrorKind::IncompleteSeries
            | ErrorKind::DegenerateSeries
            | ErrorKind::UnresolvableClustering => 3,
            ErrorKind::Network | ErrorKind::Internal => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            exit_code: kind.exit_code(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
