//! Description of a full extraction run.
//!
//! An [`ExtractionConfig`] names the kernel to read, what to keep from it and
//! where to write the result. It is usually stored as JSON:
//!
//! ```json
//! {
//!   "kernel": "de440.bsp",
//!   "output": "de440_2024.json",
//!   "start": "2024-01-01T00:00:00 TDB",
//!   "end": "2025-01-01T00:00:00 TDB",
//!   "window_end": "inclusive",
//!   "topology": { "moon": "(3,301) - (3,399)" }
//! }
//! ```
//!
//! The segments extracted are the union of `segments` and of every segment the
//! `topology` references. When both are absent the whole kernel is extracted.
use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufReader, BufWriter, Write},
};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    ephemeris::{
        ephemeris_set::EphemerisSet, segment_id::SegmentId, segment_store::WindowEnd,
        topology::Topology,
    },
    kernel::{daf_kernel::DafKernel, kernel_slicer::KernelSlicer},
    numeph_errors::{NumephError, Result},
    persistence,
    time::{date_to_et_seconds, TimeWindow},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    /// SPK kernel to read.
    pub kernel: Utf8PathBuf,
    /// Destination of the sliced set, the extension picks the format.
    pub output: Utf8PathBuf,
    /// Window start, any date string `hifitime::Epoch` parses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Window end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentId>>,
    #[serde(default)]
    pub window_end: WindowEnd,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<Topology>,
}

impl ExtractionConfig {
    /// Configuration extracting the whole kernel without time window.
    pub fn new(kernel: impl Into<Utf8PathBuf>, output: impl Into<Utf8PathBuf>) -> Self {
        ExtractionConfig {
            kernel: kernel.into(),
            output: output.into(),
            start: None,
            end: None,
            segments: None,
            window_end: WindowEnd::default(),
            topology: None,
        }
    }

    pub fn with_window(mut self, start: &str, end: &str) -> Self {
        self.start = Some(start.to_string());
        self.end = Some(end.to_string());
        self
    }

    pub fn with_segments(mut self, segments: Vec<SegmentId>) -> Self {
        self.segments = Some(segments);
        self
    }

    pub fn with_window_end(mut self, window_end: WindowEnd) -> Self {
        self.window_end = window_end;
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = Some(topology);
        self
    }

    /// Read and validate a JSON configuration file.
    pub fn from_json(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let config: ExtractionConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as indented JSON.
    pub fn to_json(&self, path: impl AsRef<Utf8Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Time window described by `start` and `end`, `None` when both are absent.
    pub fn time_window(&self) -> Result<Option<TimeWindow>> {
        match (&self.start, &self.end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => Ok(Some(TimeWindow::new(
                date_to_et_seconds(start)?,
                date_to_et_seconds(end)?,
            )?)),
            _ => Err(NumephError::InvalidConfig(
                "'start' and 'end' must be given together".to_string(),
            )),
        }
    }

    /// Segments to extract, `None` for every segment of the kernel.
    pub fn requested_segments(&self) -> Option<Vec<SegmentId>> {
        if self.segments.is_none() && self.topology.is_none() {
            return None;
        }
        let mut requested: BTreeSet<SegmentId> = self
            .segments
            .iter()
            .flatten()
            .copied()
            .collect();
        if let Some(topology) = &self.topology {
            requested.extend(topology.required_segments());
        }
        Some(requested.into_iter().collect())
    }

    /// Check the configuration without touching the file system.
    ///
    /// Return
    /// ----------
    /// * `Ok(())`, or [`NumephError::InvalidConfig`] / [`NumephError::InvalidTimeWindow`]
    ///   describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.kernel.as_str().is_empty() {
            return Err(NumephError::InvalidConfig(
                "'kernel' must not be empty".to_string(),
            ));
        }
        if self.output.as_str().is_empty() {
            return Err(NumephError::InvalidConfig(
                "'output' must not be empty".to_string(),
            ));
        }
        if self.segments.as_ref().is_some_and(Vec::is_empty) {
            return Err(NumephError::InvalidConfig(
                "'segments' must name at least one segment".to_string(),
            ));
        }
        if self.topology.as_ref().is_some_and(|t| t.bodies().next().is_none()) {
            return Err(NumephError::InvalidConfig(
                "'topology' must describe at least one body".to_string(),
            ));
        }
        self.time_window()?;
        Ok(())
    }

    /// Open the kernel, slice it and save the result to `output`.
    ///
    /// Return
    /// ----------
    /// * The saved set, or the first error met on the way.
    pub fn run(&self) -> Result<EphemerisSet> {
        self.validate()?;
        let window = self.time_window()?;
        let segments = self.requested_segments();

        let mut kernel = DafKernel::open(&self.kernel)?;
        let set = KernelSlicer::new()
            .with_window_end(self.window_end)
            .slice(&mut kernel, segments.as_deref(), window)?;
        persistence::save(&set, &self.output)?;

        info!(kernel = %self.kernel, output = %self.output, segments = set.len(), "extraction done");
        Ok(set)
    }
}
