//! Ordered Chebyshev records of one `(center, target)` segment.
//!
//! A [`SegmentStore`] keeps its records sorted by strictly increasing
//! `domain_start`. Record domains are half-open (`[start, end)`), so a time
//! shared by two adjacent records belongs to the one that starts there, and the
//! upper bound of the last record is not covered.
//!
//! Lookups use a binary search over the record starts: queries are usually
//! clustered or monotonically increasing in time and a segment of a full DE
//! kernel holds tens of thousands of records.
use serde::{Deserialize, Serialize};

use crate::{
    constants::EtSeconds,
    ephemeris::{chebyshev_record::ChebyshevRecord, segment_id::SegmentId},
    numeph_errors::{NumephError, Result},
    time::TimeWindow,
};

/// Treatment of the record containing the end bound of a time window.
///
/// * `Exclusive`: keep `[rec(t1), rec(t2))`, the record covering `t2` is dropped.
///   When both bounds fall in the same record, that record is kept.
/// * `Inclusive`: keep `[rec(t1), rec(t2)]`, every record intersecting the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowEnd {
    #[default]
    Exclusive,
    Inclusive,
}

/// Rounding allowed between the end of a record and the start of the next one.
pub const BOUNDARY_ULPS: f64 = 4.0;

fn overlaps(previous: &ChebyshevRecord, next: &ChebyshevRecord) -> bool {
    let end = previous.domain_end();
    let slack = BOUNDARY_ULPS * f64::EPSILON * end.abs().max(1.0);
    next.domain_start() < end - slack
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentStore {
    id: SegmentId,
    records: Vec<ChebyshevRecord>,
}

impl SegmentStore {
    /// Build a store from records sorted by increasing domain start.
    ///
    /// Neighbouring domains must not overlap. A shared boundary may differ by
    /// [`BOUNDARY_ULPS`] units in the last place, the rounding left by SPK
    /// `mid ± radius` domains. Gaps are accepted (times inside a gap are not
    /// covered).
    ///
    /// Return
    /// ----------
    /// * The store, or [`NumephError::InvalidRecord`] if the domain starts are not
    ///   strictly increasing or two neighbouring domains overlap.
    pub fn new(id: SegmentId, records: Vec<ChebyshevRecord>) -> Result<Self> {
        for pair in records.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            let problem = if next.domain_start() <= previous.domain_start() {
                "are not in increasing time order"
            } else if overlaps(previous, next) {
                "overlap"
            } else {
                continue;
            };
            return Err(NumephError::InvalidRecord(format!(
                "records of segment {id} {problem}: [{}, {}) followed by [{}, {})",
                previous.domain_start(),
                previous.domain_end(),
                next.domain_start(),
                next.domain_end()
            )));
        }
        Ok(SegmentStore { id, records })
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn records(&self) -> &[ChebyshevRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Covered range `[first start, last end)`, `None` for an empty store.
    pub fn coverage(&self) -> Option<(EtSeconds, EtSeconds)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.domain_start(), last.domain_end()))
    }

    /// Index of the unique record with `domain_start <= t < domain_end`.
    ///
    /// Arguments
    /// -----------------
    /// * `t`: Query time in TDB seconds past J2000.
    ///
    /// Return
    /// ----------
    /// * The record index, or [`NumephError::TimeOutOfRange`] when `t` is before the
    ///   first record, at or after the end of the last one, inside a gap, or NaN.
    pub fn find_record(&self, t: EtSeconds) -> Result<usize> {
        let out_of_range = || NumephError::TimeOutOfRange {
            segment: self.id,
            time: t,
        };

        if t.is_nan() {
            return Err(out_of_range());
        }

        // number of records starting at or before t
        let starts_before = self.records.partition_point(|r| r.domain_start() <= t);
        let index = starts_before.checked_sub(1).ok_or_else(out_of_range)?;

        if self.records[index].covers(t) {
            Ok(index)
        } else {
            Err(out_of_range())
        }
    }

    /// Record covering `t`, see [`Self::find_record`].
    pub fn record(&self, t: EtSeconds) -> Result<&ChebyshevRecord> {
        let index = self.find_record(t)?;
        Ok(&self.records[index])
    }

    /// Keep the whole records intersecting `[t1, t2]`.
    ///
    /// Bounds may lie outside the coverage or inside a gap. A window touching no
    /// record gives an empty store. Applying it twice with the same bounds yields
    /// the same store.
    ///
    /// Return
    /// ----------
    /// * The restricted store, or [`NumephError::InvalidTimeWindow`] if `t1 > t2`
    ///   or a bound is NaN.
    pub fn restrict(&self, t1: EtSeconds, t2: EtSeconds) -> Result<SegmentStore> {
        let window = TimeWindow::new(t1, t2)?;
        // first record ending after t1, one past the last record starting at or before t2
        let first = self
            .records
            .partition_point(|r| r.domain_end() <= window.start);
        let stop = self
            .records
            .partition_point(|r| r.domain_start() <= window.end)
            .max(first);

        Ok(SegmentStore {
            id: self.id,
            records: self.records[first..stop].to_vec(),
        })
    }

    /// Slice the store between the records covering `t1` and `t2`, with an
    /// explicit end-bound policy.
    ///
    /// Return
    /// ----------
    /// * The sliced store, [`NumephError::InvalidTimeWindow`] if `t1 > t2`, or
    ///   [`NumephError::TimeOutOfRange`] if a bound is not covered.
    ///
    /// See also
    /// ------------
    /// * [`WindowEnd`] – What happens to the record covering `t2`.
    /// * [`Self::restrict`] – Intersection with no coverage requirement.
    pub fn window(&self, t1: EtSeconds, t2: EtSeconds, end: WindowEnd) -> Result<SegmentStore> {
        let window = TimeWindow::new(t1, t2)?;
        let first = self.find_record(window.start)?;
        let last = self.find_record(window.end)?;

        let stop = match end {
            WindowEnd::Inclusive => last + 1,
            WindowEnd::Exclusive => last.max(first + 1),
        };

        Ok(SegmentStore {
            id: self.id,
            records: self.records[first..stop].to_vec(),
        })
    }
}
