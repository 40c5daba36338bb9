//! Chebyshev record: one polynomial piece of a segment.
//!
//! This module defines [`ChebyshevRecord`], a compact container for a single
//! *ephemeris record*: a half-open time domain `[start, end)` expressed in
//! TDB seconds past J2000, and three arrays of Chebyshev coefficients
//! (`x`, `y`, `z`) for the position (km), lowest degree first.
//!
//! ## Raw SPK layout (per record)
//! An SPK type 2 / type 3 record stores, as consecutive `f64` words:
//! 1. `mid` (TDB seconds from J2000),
//! 2. `radius` (seconds),
//! 3. `ncoeff` Chebyshev coefficients for X (km),
//! 4. `ncoeff` for Y (km),
//! 5. `ncoeff` for Z (km),
//! 6. (type 3 only) `3 * ncoeff` velocity coefficients, ignored here.
//!
//! The domain of a record is `[mid - radius, mid + radius)`.
//!
//! ## See also
//! ------------
//! * [`crate::ephemeris::evaluator`] – Clenshaw evaluation of the three series.
//! * [`crate::ephemeris::segment_store::SegmentStore`] – Ordered collection of records.
use std::fmt;

use hifitime::{Duration, Epoch};

use crate::{
    constants::{EtSeconds, Position},
    ephemeris::evaluator::clenshaw,
    numeph_errors::{NumephError, Result},
};

/// One Chebyshev polynomial piece (domain and coefficients of the three axes).
///
/// Records are immutable once built: the constructors check that the domain is
/// finite and non-empty and that the three axes carry the same, non-zero,
/// number of finite coefficients.
///
/// See also
/// ------------
/// * [`ChebyshevRecord::from_words`] – Decode one raw SPK record.
/// * [`ChebyshevRecord::position`] – Evaluate the position inside the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevRecord {
    domain_start: EtSeconds,
    domain_end: EtSeconds,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl ChebyshevRecord {
    /// Build a record from its domain and coefficients.
    ///
    /// Arguments
    /// -----------------
    /// * `domain_start`, `domain_end`: Bounds of the half-open validity domain (TDB seconds).
    /// * `x`, `y`, `z`: Chebyshev coefficients (km), lowest degree first.
    ///
    /// Return
    /// ----------
    /// * The record, or [`NumephError::InvalidRecord`] when `domain_start >= domain_end`,
    ///   a bound or a coefficient is not finite, or the axes have different/zero lengths.
    pub fn new(
        domain_start: EtSeconds,
        domain_end: EtSeconds,
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
    ) -> Result<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start >= domain_end {
            return Err(NumephError::InvalidRecord(format!(
                "empty or non finite domain [{domain_start}, {domain_end})"
            )));
        }
        if x.is_empty() || x.len() != y.len() || x.len() != z.len() {
            return Err(NumephError::InvalidRecord(format!(
                "coefficient counts differ or are zero (x: {}, y: {}, z: {})",
                x.len(),
                y.len(),
                z.len()
            )));
        }
        if x.iter().chain(&y).chain(&z).any(|c| !c.is_finite()) {
            return Err(NumephError::InvalidRecord(format!(
                "non finite coefficient in record [{domain_start}, {domain_end})"
            )));
        }

        Ok(ChebyshevRecord {
            domain_start,
            domain_end,
            x,
            y,
            z,
        })
    }

    /// Build a record from the SPK midpoint/radius representation.
    pub fn from_mid_radius(
        mid: EtSeconds,
        radius: f64,
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
    ) -> Result<Self> {
        Self::new(mid - radius, mid + radius, x, y, z)
    }

    /// Decode one raw SPK record from its `f64` words.
    ///
    /// The slice **must** contain exactly one record: `mid`, `radius`, then
    /// `ncoeff` words for each axis X, Y, Z, optionally followed by velocity
    /// coefficients which are ignored.
    ///
    /// Arguments
    /// -----------------
    /// * `words`: The record words (`rsize` of them).
    /// * `ncoeff`: Number of Chebyshev coefficients per axis.
    ///
    /// Return
    /// ----------
    /// * The decoded record, or [`NumephError::MalformedKernelData`] if the slice is too short.
    pub fn from_words(words: &[f64], ncoeff: usize) -> Result<Self> {
        let needed = 2 + 3 * ncoeff;
        if ncoeff == 0 || words.len() < needed {
            return Err(NumephError::MalformedKernelData(format!(
                "record of {} words cannot hold 3 axes of {ncoeff} coefficients",
                words.len()
            )));
        }

        let (mid, radius) = (words[0], words[1]);
        let coefficients = &words[2..needed];
        let (x, rest) = coefficients.split_at(ncoeff);
        let (y, z) = rest.split_at(ncoeff);

        Self::from_mid_radius(mid, radius, x.to_vec(), y.to_vec(), z.to_vec())
            .map_err(|err| NumephError::MalformedKernelData(err.to_string()))
    }

    pub fn domain_start(&self) -> EtSeconds {
        self.domain_start
    }

    pub fn domain_end(&self) -> EtSeconds {
        self.domain_end
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Number of coefficients per axis (polynomial degree + 1).
    pub fn ncoeff(&self) -> usize {
        self.x.len()
    }

    /// True when `t` lies in the half-open domain `[start, end)`.
    pub fn covers(&self, t: EtSeconds) -> bool {
        self.domain_start <= t && t < self.domain_end
    }

    /// Map a time onto the canonical Chebyshev interval `[-1, 1]`.
    pub fn normalized_time(&self, t: EtSeconds) -> f64 {
        2.0 * (t - self.domain_start) / (self.domain_end - self.domain_start) - 1.0
    }

    /// Evaluate the three Chebyshev series at `t`.
    ///
    /// No range check is done here: record selection is the job of
    /// [`SegmentStore::find_record`](crate::ephemeris::segment_store::SegmentStore::find_record).
    ///
    /// Return
    /// ----------
    /// * Position in kilometers.
    pub fn position(&self, t: EtSeconds) -> Position {
        let u = self.normalized_time(t);
        Position::new(clenshaw(&self.x, u), clenshaw(&self.y, u), clenshaw(&self.z, u))
    }
}

impl fmt::Display for ChebyshevRecord {
    /// Pretty‑print a record with its domain and formatted coefficients.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start_str = format!("{}", Epoch::from_et_seconds(self.domain_start));
        let span_str = format!(
            "{}",
            Duration::from_seconds(self.domain_end - self.domain_start)
        );

        let label_width = 16;
        let value_width = start_str.len().max(span_str.len()).max(55);

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = label_width + 2,
            value = value_width + 2
        );

        writeln!(
            f,
            "+{:^label$}+{:^value$}+",
            "Chebyshev Record",
            "",
            label = label_width + 2,
            value = value_width + 2
        )?;
        writeln!(f, "{border}")?;
        writeln!(
            f,
            "| {:<label$} | {:<value$} |",
            "Start",
            start_str,
            label = label_width,
            value = value_width
        )?;
        writeln!(
            f,
            "| {:<label$} | {:<value$} |",
            "Span",
            span_str,
            label = label_width,
            value = value_width
        )?;
        writeln!(f, "{border}")?;

        for (axis, coeffs) in &[("X", &self.x), ("Y", &self.y), ("Z", &self.z)] {
            writeln!(
                f,
                "| {:<label$} | {:value$} |",
                *axis,
                "",
                label = label_width,
                value = value_width
            )?;
            for chunk in coeffs.chunks(4) {
                let line = chunk
                    .iter()
                    .map(|c| format!("{c:>12.4e}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(
                    f,
                    "| {:<label$} | {:<value$} |",
                    "",
                    line,
                    label = label_width,
                    value = value_width
                )?;
            }
            writeln!(f, "{border}")?;
        }

        Ok(())
    }
}
