//! # Kernel access
//!
//! Everything that touches a binary ephemeris kernel lives here. The rest of the
//! crate only sees the [`KernelReader`] trait:
//!
//! * [`KernelReader::enumerate_segments`] lists the segment summaries,
//! * [`KernelReader::read_records`] returns the raw record words of one segment.
//!
//! Two readers are provided:
//!
//! * [`daf_kernel::DafKernel`]: little-endian NAIF SPK files (DAF container),
//!   Chebyshev types 2 and 3,
//! * [`memory_kernel::MemoryKernel`]: segments held in memory, mostly for tests
//!   and synthetic data.
//!
//! [`kernel_slicer::KernelSlicer`] turns what a reader returns into an
//! [`EphemerisSet`](crate::ephemeris::ephemeris_set::EphemerisSet).
pub mod daf_header;
pub mod daf_kernel;
pub mod directory;
pub mod kernel_slicer;
pub mod memory_kernel;
pub mod spk_type;
pub mod summary_record;

use crate::{
    kernel::{directory::DirectoryData, summary_record::Summary},
    numeph_errors::{NumephError, Result},
};

/// Raw content of one Chebyshev segment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSegment {
    pub directory: DirectoryData,
    /// Coefficient blocks per record: 3 (x, y, z) or 6 (with velocities).
    pub components: usize,
    /// `n_records * rsize` words; each record is `mid`, `radius`, then the blocks.
    pub coefficients: Vec<f64>,
}

impl RawSegment {
    pub fn rsize(&self) -> usize {
        self.directory.rsize
    }

    pub fn n_records(&self) -> usize {
        self.directory.n_records
    }

    /// Chebyshev coefficients per axis, checking the record layout.
    ///
    /// Return
    /// ----------
    /// * `ncoeff` such that `rsize = 2 + components * ncoeff`, or
    ///   [`NumephError::MalformedKernelData`] if the words do not describe
    ///   `n_records` records of that shape.
    pub fn ncoeff(&self) -> Result<usize> {
        let rsize = self.rsize();
        if self.components == 0 || rsize <= 2 || (rsize - 2) % self.components != 0 {
            return Err(NumephError::MalformedKernelData(format!(
                "record size {rsize} does not hold {} coefficient blocks",
                self.components
            )));
        }
        if self.coefficients.len() != self.directory.record_words() {
            return Err(NumephError::MalformedKernelData(format!(
                "{} coefficient words for {} records of {rsize} words",
                self.coefficients.len(),
                self.n_records()
            )));
        }
        Ok((rsize - 2) / self.components)
    }

    /// Record words, one slice of `rsize` words per record.
    pub fn records(&self) -> impl Iterator<Item = &[f64]> {
        self.coefficients.chunks_exact(self.rsize().max(1))
    }
}

/// Source of raw Chebyshev segments.
pub trait KernelReader {
    /// Summaries of every segment in the kernel, in file order.
    fn enumerate_segments(&mut self) -> Result<Vec<Summary>>;

    /// Raw records of the segment described by `summary`.
    fn read_records(&mut self, summary: &Summary) -> Result<RawSegment>;
}
