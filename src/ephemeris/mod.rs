//! Ephemeris segment engine.
//!
//! - [`chebyshev_record`]: one Chebyshev polynomial piece and its raw SPK decoding.
//! - [`segment_store`]: ordered records of one `(center, target)` pair, lookup and windowing.
//! - [`ephemeris_set`]: every store of an extraction, keyed by [`segment_id::SegmentId`].
//! - [`evaluator`]: Clenshaw evaluation of a store at a query time.
//! - [`topology`] / [`compositor`]: signed multi-segment composition of body positions.
pub mod chebyshev_record;
pub mod compositor;
pub mod ephemeris_set;
pub mod evaluator;
pub mod segment_id;
pub mod segment_store;
pub mod topology;
