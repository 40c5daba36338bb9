//! Extraction of time-bounded segment stores from a kernel.
//!
//! The [`KernelSlicer`] is the only component that turns raw kernel words into
//! [`ChebyshevRecord`]s. For each requested segment it:
//!
//! 1. reads every summary with that `(center, target)` identity (large kernels
//!    may split a body over several arrays), in increasing start order,
//! 2. checks the record layout (`rsize = 2 + components * ncoeff`, one block of
//!    `rsize` words per record),
//! 3. decodes every record, its domain being `[mid - radius, mid + radius)`,
//! 4. keeps the records selected by the time window, if any.
//!
//! # Window end policy
//!
//! With a window `[t1, t2]`, [`WindowEnd::Exclusive`] keeps the records from the
//! one covering `t1` up to, but not including, the one covering `t2`.
//! [`WindowEnd::Inclusive`] also keeps the record covering `t2`.
use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::{
    ephemeris::{
        chebyshev_record::ChebyshevRecord,
        ephemeris_set::EphemerisSet,
        segment_id::SegmentId,
        segment_store::{SegmentStore, WindowEnd},
    },
    kernel::{summary_record::Summary, KernelReader, RawSegment},
    numeph_errors::{NumephError, Result},
    time::TimeWindow,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KernelSlicer {
    window_end: WindowEnd,
}

impl KernelSlicer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window_end(mut self, window_end: WindowEnd) -> Self {
        self.window_end = window_end;
        self
    }

    pub fn window_end(&self) -> WindowEnd {
        self.window_end
    }

    /// Extract segment stores from a kernel.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: Source kernel.
    /// * `segments`: Identities to extract, `None` for every segment of the kernel.
    /// * `window`: Optional time window applied to every extracted segment.
    ///
    /// Return
    /// ----------
    /// * One [`SegmentStore`] per extracted identity, or
    ///   - [`NumephError::UnknownSegment`] if a requested identity is not in the kernel,
    ///   - [`NumephError::MalformedKernelData`] if a segment layout is inconsistent,
    ///   - [`NumephError::TimeOutOfRange`] if a window bound is outside a segment.
    ///
    /// See also
    /// ------------
    /// * [`SegmentStore::window`] – Record selection for a window.
    pub fn slice<R: KernelReader + ?Sized>(
        &self,
        reader: &mut R,
        segments: Option<&[SegmentId]>,
        window: Option<TimeWindow>,
    ) -> Result<EphemerisSet> {
        let summaries = reader.enumerate_segments()?;

        if let Some(requested) = segments {
            let available: BTreeSet<SegmentId> = summaries.iter().map(Summary::id).collect();
            if let Some(missing) = requested.iter().find(|id| !available.contains(id)) {
                return Err(NumephError::UnknownSegment(*missing));
            }
        }

        let selected = summaries
            .iter()
            .filter(|summary| segments.is_none_or(|requested| requested.contains(&summary.id())))
            .sorted_by(|a, b| {
                a.id()
                    .cmp(&b.id())
                    .then(a.start_epoch.total_cmp(&b.start_epoch))
            })
            .chunk_by(|summary| summary.id());

        let mut stores = Vec::new();
        for (id, group) in &selected {
            let mut records = Vec::new();
            for summary in group {
                let raw = reader.read_records(summary)?;
                records.extend(decode_records(&raw)?);
            }

            let store = SegmentStore::new(id, records)?;
            let gaps = store
                .records()
                .windows(2)
                .filter(|pair| pair[0].domain_end() < pair[1].domain_start())
                .count();
            if gaps > 0 {
                warn!(segment = %id, gaps, "segment coverage has gaps");
            }
            let read = store.len();
            let store = match window {
                Some(window) => store.window(window.start, window.end, self.window_end)?,
                None => store,
            };
            debug!(segment = %id, read, kept = store.len(), "sliced segment");
            stores.push(store);
        }

        let set = EphemerisSet::from_stores(stores);
        info!(
            segments = set.len(),
            records = set.iter().map(SegmentStore::len).sum::<usize>(),
            "kernel sliced"
        );
        Ok(set)
    }
}

/// Decode every record of a raw segment.
pub fn decode_records(raw: &RawSegment) -> Result<Vec<ChebyshevRecord>> {
    let ncoeff = raw.ncoeff()?;
    raw.records()
        .map(|words| ChebyshevRecord::from_words(words, ncoeff))
        .collect()
}
