//! Conversions between civil epochs and the internal time axis.
//!
//! Every record domain and every query time handled by the crate is expressed
//! in **TDB seconds past J2000** ([`EtSeconds`]), the native time axis of SPK
//! kernels. The helpers below bridge from Julian dates and
//! [`hifitime::Epoch`] to that axis.
use std::str::FromStr;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{EtSeconds, J2000_JD, SECONDS_PER_DAY},
    numeph_errors::{NumephError, Result},
};

/// Transformation from a TDB julian date (JD) to seconds past J2000
///
/// Argument
/// --------
/// * `jd`: a julian date in the TDB time scale
///
/// Return
/// ------
/// * the number of TDB seconds elapsed since J2000
pub fn jd_to_et_seconds(jd: f64) -> EtSeconds {
    (jd - J2000_JD) * SECONDS_PER_DAY
}

/// Transformation from seconds past J2000 to a TDB julian date (JD)
pub fn et_seconds_to_jd(et: EtSeconds) -> f64 {
    et / SECONDS_PER_DAY + J2000_JD
}

/// Express a [`hifitime::Epoch`] (any time scale) as TDB seconds past J2000
pub fn epoch_to_et_seconds(epoch: &Epoch) -> EtSeconds {
    epoch.to_et_seconds()
}

/// Parse an ISO-8601 date (for example `"2020-01-01T00:00:00 UTC"`) into TDB seconds past J2000
///
/// Argument
/// --------
/// * `date`: a date string understood by [`hifitime::Epoch::from_str`]
///
/// Return
/// ------
/// * the date on the internal time axis, or [`NumephError::InvalidConfig`] if
///   the string cannot be parsed
pub fn date_to_et_seconds(date: &str) -> Result<EtSeconds> {
    let epoch = Epoch::from_str(date)
        .map_err(|err| NumephError::InvalidConfig(format!("invalid date '{date}': {err}")))?;
    Ok(epoch_to_et_seconds(&epoch))
}

/// Closed time window `[start, end]` on the internal time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: EtSeconds,
    pub end: EtSeconds,
}

impl TimeWindow {
    /// Build a window, rejecting `start > end` and non-finite bounds.
    pub fn new(start: EtSeconds, end: EtSeconds) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(NumephError::InvalidTimeWindow { start, end });
        }
        Ok(TimeWindow { start, end })
    }

    pub fn from_epochs(start: &Epoch, end: &Epoch) -> Result<Self> {
        Self::new(epoch_to_et_seconds(start), epoch_to_et_seconds(end))
    }

    pub fn from_jd(start_jd: f64, end_jd: f64) -> Result<Self> {
        Self::new(jd_to_et_seconds(start_jd), jd_to_et_seconds(end_jd))
    }
}
