//! Collection of segment stores keyed by `(center, target)`.
//!
//! An [`EphemerisSet`] is the unit of persistence: it is built once by the
//! [`KernelSlicer`](crate::kernel::kernel_slicer::KernelSlicer) or decoded by a
//! [`PersistenceAdapter`](crate::persistence::PersistenceAdapter), then only read.
//! It holds no interior mutability and can be shared between threads.
use std::{collections::BTreeMap, fmt};

use hifitime::Epoch;

use crate::{
    constants::{EtSeconds, Position},
    ephemeris::{
        compositor::relative_position,
        evaluator::evaluate,
        segment_id::SegmentId,
        segment_store::SegmentStore,
        topology::Topology,
    },
    numeph_errors::{NumephError, Result},
    time::epoch_to_et_seconds,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EphemerisSet {
    segments: BTreeMap<SegmentId, SegmentStore>,
}

impl EphemerisSet {
    /// Build a set from stores; a later store with the same identity replaces the earlier one.
    pub fn from_stores(stores: impl IntoIterator<Item = SegmentStore>) -> Self {
        stores.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn contains(&self, id: SegmentId) -> bool {
        self.segments.contains_key(&id)
    }

    /// Segment identities in increasing `(center, target)` order.
    pub fn segment_ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.segments.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentStore> {
        self.segments.values()
    }

    /// Store of a segment, [`NumephError::UnknownSegment`] if absent.
    pub fn segment(&self, id: SegmentId) -> Result<&SegmentStore> {
        self.segments
            .get(&id)
            .ok_or(NumephError::UnknownSegment(id))
    }

    /// Position (km) of `id.target` relative to `id.center` at `t` (TDB seconds past J2000).
    pub fn position(&self, id: SegmentId, t: EtSeconds) -> Result<Position> {
        evaluate(self.segment(id)?, t)
    }

    /// Same as [`Self::position`] with a [`hifitime::Epoch`] query time.
    pub fn position_at(&self, id: SegmentId, epoch: &Epoch) -> Result<Position> {
        self.position(id, epoch_to_et_seconds(epoch))
    }

    /// Position of a named body through a topology, see [`relative_position`].
    pub fn body_position(&self, body: &str, t: EtSeconds, topology: &Topology) -> Result<Position> {
        relative_position(self, body, t, topology)
    }

    /// Same as [`Self::body_position`] with a [`hifitime::Epoch`] query time.
    pub fn body_position_at(
        &self,
        body: &str,
        epoch: &Epoch,
        topology: &Topology,
    ) -> Result<Position> {
        self.body_position(body, epoch_to_et_seconds(epoch), topology)
    }
}

impl FromIterator<SegmentStore> for EphemerisSet {
    fn from_iter<I: IntoIterator<Item = SegmentStore>>(iter: I) -> Self {
        EphemerisSet {
            segments: iter.into_iter().map(|store| (store.id(), store)).collect(),
        }
    }
}

impl fmt::Display for EphemerisSet {
    /// One line per segment: identity, record count and covered range.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+{:-^78}+", " Ephemeris Segments ")?;
        for store in self.segments.values() {
            let coverage = match store.coverage() {
                Some((start, end)) => format!(
                    "{} -> {}",
                    Epoch::from_et_seconds(start),
                    Epoch::from_et_seconds(end)
                ),
                None => "empty".to_string(),
            };
            writeln!(
                f,
                "| {:<76} |",
                format!(
                    "{:<10} {:>6} records  {}",
                    store.id().to_string(),
                    store.len(),
                    coverage
                )
            )?;
        }
        writeln!(f, "+{:-^78}+", "")
    }
}
