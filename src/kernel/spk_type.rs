use std::fmt;

use crate::numeph_errors::{NumephError, Result};

/// SPK data type of a segment, as stored in its summary.
///
/// Only the Chebyshev position layouts (types 2 and 3) can be sliced; every
/// other type is kept as its raw code so it can still be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpkDataType {
    ModifiedDifferenceArray,
    ChebyshevPositionOnly,
    ChebyshevPositionVelocity,
    ChebyshevNonUniform,
    Other(i32),
}

impl SpkDataType {
    pub fn to_i32(self) -> i32 {
        match self {
            SpkDataType::ModifiedDifferenceArray => 1,
            SpkDataType::ChebyshevPositionOnly => 2,
            SpkDataType::ChebyshevPositionVelocity => 3,
            SpkDataType::ChebyshevNonUniform => 14,
            SpkDataType::Other(code) => code,
        }
    }

    /// Number of coefficient blocks stored after `mid` and `radius` in each record.
    ///
    /// Return
    /// ----------
    /// * `3` for type 2 (x, y, z), `6` for type 3 (x, y, z, vx, vy, vz), or
    ///   [`NumephError::MalformedKernelData`] for any layout that cannot be sliced.
    pub fn coefficient_blocks(self) -> Result<usize> {
        match self {
            SpkDataType::ChebyshevPositionOnly => Ok(3),
            SpkDataType::ChebyshevPositionVelocity => Ok(6),
            other => Err(NumephError::MalformedKernelData(format!(
                "unsupported SPK data type {} ({other})",
                other.to_i32()
            ))),
        }
    }
}

impl From<i32> for SpkDataType {
    fn from(code: i32) -> Self {
        match code {
            1 => SpkDataType::ModifiedDifferenceArray,
            2 => SpkDataType::ChebyshevPositionOnly,
            3 => SpkDataType::ChebyshevPositionVelocity,
            14 => SpkDataType::ChebyshevNonUniform,
            other => SpkDataType::Other(other),
        }
    }
}

impl From<SpkDataType> for i32 {
    fn from(data_type: SpkDataType) -> Self {
        data_type.to_i32()
    }
}

impl fmt::Display for SpkDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpkDataType::ModifiedDifferenceArray => write!(f, "Modified Difference Array"),
            SpkDataType::ChebyshevPositionOnly => write!(f, "Chebyshev Position Only"),
            SpkDataType::ChebyshevPositionVelocity => write!(f, "Chebyshev Position Velocity"),
            SpkDataType::ChebyshevNonUniform => write!(f, "Chebyshev Non Uniform"),
            SpkDataType::Other(code) => write!(f, "SPK type {code}"),
        }
    }
}
