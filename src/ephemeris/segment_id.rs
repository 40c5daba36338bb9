use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an SPK segment: the NAIF code of the center body and of the target body.
///
/// Ordering is lexicographic on `(center, target)`, which is the order used when
/// an [`EphemerisSet`](crate::ephemeris::ephemeris_set::EphemerisSet) is persisted.
/// Serialized as a two element array `[center, target]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct SegmentId {
    pub center: i32,
    pub target: i32,
}

impl SegmentId {
    pub const fn new(center: i32, target: i32) -> Self {
        SegmentId { center, target }
    }
}

impl From<(i32, i32)> for SegmentId {
    fn from((center, target): (i32, i32)) -> Self {
        SegmentId { center, target }
    }
}

impl From<SegmentId> for (i32, i32) {
    fn from(id: SegmentId) -> Self {
        (id.center, id.target)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.center, self.target)
    }
}
