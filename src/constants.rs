//! # Constants and type definitions for numeph
//!
//! This module centralizes the **time constants**, **DAF layout constants**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Time scale constants (J2000 epoch, day length)
//! - Binary layout of DAF/SPK kernels (record length, word size)
//! - Core type aliases used across the crate

use nalgebra::Vector3;

// -------------------------------------------------------------------------------------------------
// Time constants
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian date of J2000.0 (2000-01-01 12:00:00 TDB), origin of the internal time axis
pub const J2000_JD: f64 = 2_451_545.0;

// -------------------------------------------------------------------------------------------------
// DAF / SPK layout
// -------------------------------------------------------------------------------------------------

/// Size in bytes of one DAF physical record
pub const DAF_RECORD_BYTES: usize = 1024;

/// Size in bytes of one DAF word (an IEEE-754 double)
pub const DAF_WORD_BYTES: usize = 8;

/// Number of words of the segment directory footer (INIT, INTLEN, RSIZE, N)
pub const SPK_DIRECTORY_WORDS: usize = 4;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Seconds past J2000 in the TDB time scale (a.k.a. ET seconds)
pub type EtSeconds = f64;

/// Distance in kilometers
pub type Kilometer = f64;

/// Cartesian position in kilometers
pub type Position = Vector3<Kilometer>;
