//! Multi-hop composition of segment positions.
//!
//! The compositor evaluates every segment listed by a [`Topology`] entry at the
//! same time and adds or subtracts the resulting vectors. Either every term is
//! evaluated or the whole call fails: no partially summed vector is returned.
use tracing::trace;

use crate::{
    constants::{EtSeconds, Position},
    ephemeris::{ephemeris_set::EphemerisSet, topology::Topology},
    numeph_errors::Result,
};

/// Position (km) of `body` following its topology entry.
///
/// Arguments
/// -----------------
/// * `set`: Segments to evaluate.
/// * `body`: Body name, looked up case-insensitively in `topology`.
/// * `t`: Query time in TDB seconds past J2000.
/// * `topology`: Body name → signed segment terms.
///
/// Return
/// ----------
/// * The signed sum of the segment positions, or
///   - [`NumephError::UnknownBody`](crate::numeph_errors::NumephError::UnknownBody) when `body` has no entry,
///   - [`NumephError::UnknownSegment`](crate::numeph_errors::NumephError::UnknownSegment) when a term is not in `set`,
///   - [`NumephError::TimeOutOfRange`](crate::numeph_errors::NumephError::TimeOutOfRange) from the first failing term.
///
/// See also
/// ------------
/// * [`Topology::geocentric`] – Default geocentric table.
/// * [`crate::ephemeris::evaluator::evaluate`] – Single segment evaluation.
pub fn relative_position(
    set: &EphemerisSet,
    body: &str,
    t: EtSeconds,
    topology: &Topology,
) -> Result<Position> {
    let terms = topology.get(body)?;
    trace!(body, t, terms = terms.len(), "composing body position");

    terms.iter().try_fold(Position::zeros(), |acc, term| {
        Ok(acc + set.position(term.segment, t)? * term.sign.factor())
    })
}
