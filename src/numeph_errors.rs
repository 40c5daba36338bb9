use thiserror::Error;

use crate::ephemeris::segment_id::SegmentId;

#[derive(Error, Debug)]
pub enum NumephError {
    #[error("Unknown segment: {0}")]
    UnknownSegment(SegmentId),

    #[error("Unknown body in topology: {0}")]
    UnknownBody(String),

    #[error("Time {time} is outside every record of segment {segment}")]
    TimeOutOfRange { segment: SegmentId, time: f64 },

    #[error("Invalid time window: start {start} is after end {end}")]
    InvalidTimeWindow { start: f64, end: f64 },

    #[error("Malformed kernel data: {0}")]
    MalformedKernelData(String),

    #[error("Invalid Chebyshev record: {0}")]
    InvalidRecord(String),

    #[error("Unable to parse topology expression: {0}")]
    TopologyParse(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON (de)serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, NumephError>;

impl PartialEq for NumephError {
    fn eq(&self, other: &Self) -> bool {
        use NumephError::*;
        match (self, other) {
            (UnknownSegment(a), UnknownSegment(b)) => a == b,
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (
                TimeOutOfRange {
                    segment: sa,
                    time: ta,
                },
                TimeOutOfRange {
                    segment: sb,
                    time: tb,
                },
            ) => sa == sb && ta.to_bits() == tb.to_bits(),
            (
                InvalidTimeWindow { start: sa, end: ea },
                InvalidTimeWindow { start: sb, end: eb },
            ) => sa == sb && ea == eb,
            (MalformedKernelData(a), MalformedKernelData(b)) => a == b,
            (InvalidRecord(a), InvalidRecord(b)) => a == b,
            (TopologyParse(a), TopologyParse(b)) => a == b,
            (PersistenceFailure(a), PersistenceFailure(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,

            // foreign errors are not comparable, same variant is enough
            (IoError(_), IoError(_)) => true,
            (SerdeJson(_), SerdeJson(_)) => true,

            _ => false,
        }
    }
}
