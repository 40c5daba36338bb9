//! # numeph
//!
//! Slice NAIF SPK ephemeris kernels into compact sets of Chebyshev segments and
//! evaluate body positions from them.
//!
//! ```rust, ignore
//! use numeph::{
//!     ephemeris::{segment_id::SegmentId, topology::Topology},
//!     kernel::{daf_kernel::DafKernel, kernel_slicer::KernelSlicer},
//!     persistence,
//!     time::TimeWindow,
//! };
//!
//! let mut kernel = DafKernel::open("de440.bsp")?;
//! let topology = Topology::geocentric();
//! let segments: Vec<SegmentId> = topology.required_segments().into_iter().collect();
//! let window = TimeWindow::from_jd(2460310.5, 2460676.5)?;
//!
//! let set = KernelSlicer::new().slice(&mut kernel, Some(&segments), Some(window))?;
//! persistence::save(&set, "de440_2024.json")?;
//!
//! let set = persistence::load("de440_2024.json")?;
//! let mars = set.body_position("mars", 7.5e8, &topology)?;
//! ```
pub mod config;
pub mod constants;
pub mod ephemeris;
pub mod kernel;
pub mod numeph_errors;
pub mod persistence;
pub mod time;
