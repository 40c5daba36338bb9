//! Kernel held in memory.
//!
//! [`MemoryKernel`] stores segments already laid out the way an SPK type 2
//! kernel stores them (summary, directory, flat record words). It is used to
//! feed the [`KernelSlicer`](crate::kernel::kernel_slicer::KernelSlicer) with
//! synthetic data without writing a file.
use crate::{
    ephemeris::{chebyshev_record::ChebyshevRecord, segment_id::SegmentId},
    kernel::{
        directory::DirectoryData, spk_type::SpkDataType, summary_record::Summary, KernelReader,
        RawSegment,
    },
    numeph_errors::{NumephError, Result},
};

/// Reference frame code written in synthetic summaries (J2000).
const J2000_FRAME: i32 = 1;

#[derive(Debug, Clone, Default)]
pub struct MemoryKernel {
    segments: Vec<(Summary, RawSegment)>,
    next_addr: i32,
}

impl MemoryKernel {
    pub fn new() -> Self {
        MemoryKernel {
            segments: Vec::new(),
            next_addr: 1,
        }
    }

    /// Add a segment given in its raw form.
    ///
    /// The summary addresses are rewritten so that every segment occupies its own
    /// address range, the way it would in a DAF file.
    pub fn push_raw(&mut self, mut summary: Summary, raw: RawSegment) {
        let next_addr = self.next_addr.max(1);
        let array_words = (raw.coefficients.len() + 4) as i32;
        summary.initial_addr = next_addr;
        summary.final_addr = next_addr + array_words - 1;
        self.next_addr = summary.final_addr + 1;
        self.segments.push((summary, raw));
    }

    /// Add a type 2 segment built from records.
    ///
    /// Each record is stored as `mid = (start + end) / 2` and
    /// `radius = (end - start) / 2`, so domains are reproduced exactly when both
    /// halves are representable (integral second bounds are).
    ///
    /// Return
    /// ----------
    /// * `Ok(())`, or [`NumephError::InvalidRecord`] if `records` is empty or the
    ///   records do not share the same number of coefficients.
    pub fn push_segment(&mut self, id: SegmentId, records: &[ChebyshevRecord]) -> Result<()> {
        let (first, last) = match (records.first(), records.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(NumephError::InvalidRecord(format!(
                    "segment {id} has no records"
                )))
            }
        };
        let ncoeff = first.ncoeff();
        if let Some(other) = records.iter().find(|r| r.ncoeff() != ncoeff) {
            return Err(NumephError::InvalidRecord(format!(
                "segment {id} mixes records of {ncoeff} and {} coefficients",
                other.ncoeff()
            )));
        }

        let rsize = 2 + 3 * ncoeff;
        let mut coefficients = Vec::with_capacity(rsize * records.len());
        for record in records {
            let (start, end) = (record.domain_start(), record.domain_end());
            coefficients.push((start + end) / 2.0);
            coefficients.push((end - start) / 2.0);
            coefficients.extend_from_slice(record.x());
            coefficients.extend_from_slice(record.y());
            coefficients.extend_from_slice(record.z());
        }

        let summary = Summary {
            start_epoch: first.domain_start(),
            end_epoch: last.domain_end(),
            target: id.target,
            center: id.center,
            frame_id: J2000_FRAME,
            data_type: SpkDataType::ChebyshevPositionOnly.to_i32(),
            initial_addr: 0,
            final_addr: 0,
        };
        let raw = RawSegment {
            directory: DirectoryData {
                init: first.domain_start(),
                intlen: first.domain_end() - first.domain_start(),
                rsize,
                n_records: records.len(),
            },
            components: 3,
            coefficients,
        };
        self.push_raw(summary, raw);
        Ok(())
    }

    /// Builder form of [`Self::push_segment`].
    pub fn with_segment(mut self, id: SegmentId, records: &[ChebyshevRecord]) -> Result<Self> {
        self.push_segment(id, records)?;
        Ok(self)
    }
}

impl KernelReader for MemoryKernel {
    fn enumerate_segments(&mut self) -> Result<Vec<Summary>> {
        Ok(self
            .segments
            .iter()
            .map(|(summary, _)| summary.clone())
            .collect())
    }

    fn read_records(&mut self, summary: &Summary) -> Result<RawSegment> {
        self.segments
            .iter()
            .find(|(stored, _)| stored == summary)
            .map(|(_, raw)| raw.clone())
            .ok_or(NumephError::UnknownSegment(summary.id()))
    }
}
