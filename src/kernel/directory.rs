//! Directory footer of an SPK type 2/3 segment.
//!
//! The last four words of every Chebyshev segment array are:
//!
//! * `init`: start epoch of the first record (TDB seconds past J2000),
//! * `intlen`: time span covered by one record (seconds),
//! * `rsize`: record size in **double precision words** (`2 + components * ncoeff`),
//! * `n_records`: number of records in the segment.
//!
//! All four are stored as little-endian `f64`. The directory of a segment whose
//! summary ends at DAF address `final_addr` starts at byte `(final_addr - 4) * 8`.
use std::fmt;

use hifitime::{Duration, Epoch};
use nom::{number::complete::le_f64, IResult, Parser};

use crate::{
    constants::EtSeconds,
    numeph_errors::{NumephError, Result},
};

#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    pub init: EtSeconds,
    pub intlen: f64,
    pub rsize: usize,
    pub n_records: usize,
}

impl DirectoryData {
    fn parse(input: &[u8]) -> IResult<&[u8], (f64, f64, f64, f64)> {
        (le_f64, le_f64, le_f64, le_f64).parse(input)
    }

    /// Decode the 32-byte directory footer.
    ///
    /// Return
    /// ----------
    /// * The directory, or [`NumephError::MalformedKernelData`] if fewer than 32 bytes
    ///   are given or a count is not a non-negative integer.
    pub fn read(input: &[u8]) -> Result<Self> {
        let (_, (init, intlen, rsize, n_records)) = Self::parse(input).map_err(|err| {
            NumephError::MalformedKernelData(format!("unreadable segment directory: {err}"))
        })?;
        Self::from_words(init, intlen, rsize, n_records)
    }

    /// Build a directory from its four raw words.
    fn from_words(init: f64, intlen: f64, rsize: f64, n_records: f64) -> Result<Self> {
        Ok(DirectoryData {
            init,
            intlen,
            rsize: count_word("RSIZE", rsize)?,
            n_records: count_word("N", n_records)?,
        })
    }

    /// Number of words holding the records themselves.
    pub fn record_words(&self) -> usize {
        self.rsize.saturating_mul(self.n_records)
    }
}

fn count_word(name: &str, value: f64) -> Result<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(NumephError::MalformedKernelData(format!(
            "segment directory word {name} is not a count: {value}"
        )));
    }
    Ok(value as usize)
}

impl fmt::Display for DirectoryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let epoch = Epoch::from_et_seconds(self.init);
        let record_length = Duration::from_seconds(self.intlen);

        writeln!(f, "+----------------+----------------------------+")?;
        writeln!(f, "| {:<14} | {:<26} |", "Field", "Value")?;
        writeln!(f, "+----------------+----------------------------+")?;
        writeln!(f, "| {:<14} | {:<26} |", "init (epoch)", epoch.to_string())?;
        writeln!(f, "| {:<14} | {:<26} |", "intlen", record_length.to_string())?;
        writeln!(f, "| {:<14} | {:<26} |", "rsize", self.rsize)?;
        writeln!(f, "| {:<14} | {:<26} |", "n_records", self.n_records)?;
        writeln!(f, "+----------------+----------------------------+")
    }
}

#[cfg(test)]
mod test_directory {
    use super::*;

    fn footer(words: [f64; 4]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn test_directory_read() {
        let bytes = footer([-14200747200.0, 1382400.0, 41.0, 25112.0]);
        let directory = DirectoryData::read(&bytes).unwrap();
        assert_eq!(
            directory,
            DirectoryData {
                init: -14200747200.0,
                intlen: 1382400.0,
                rsize: 41,
                n_records: 25112,
            }
        );
        assert_eq!(directory.record_words(), 41 * 25112);
    }

    #[test]
    fn test_directory_rejects_bad_words() {
        assert!(matches!(
            DirectoryData::read(&footer([0.0, 10.0, 41.5, 3.0])),
            Err(NumephError::MalformedKernelData(_))
        ));
        assert!(matches!(
            DirectoryData::read(&footer([0.0, 10.0, 41.0, -1.0])),
            Err(NumephError::MalformedKernelData(_))
        ));
        assert!(matches!(
            DirectoryData::read(&[0u8; 24]),
            Err(NumephError::MalformedKernelData(_))
        ));
    }

    #[test]
    fn test_directory_display() {
        let dir_data = DirectoryData {
            init: -14200747200.0,
            intlen: 1382400.0,
            rsize: 41,
            n_records: 25112,
        };

        let expected_output = r#"+----------------+----------------------------+
| Field          | Value                      |
+----------------+----------------------------+
| init (epoch)   | 1549-12-31T00:00:00 ET     |
| intlen         | 16 days                    |
| rsize          | 41                         |
| n_records      | 25112                      |
+----------------+----------------------------+
"#;

        assert_eq!(format!("{dir_data}"), expected_output);
    }
}
