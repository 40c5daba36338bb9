//! DAF (Double Precision Array File) file record parsing.
//!
//! The first 1024-byte record of a DAF container (an SPK kernel here) holds
//! the structural metadata needed to walk the file:
//!
//! * **`idword`**: format identifier, `"DAF/SPK"` for SPK kernels.
//! * **`nd`** / **`ni`**: number of double / integer components of each array
//!   summary. SPK kernels use `nd = 2`, `ni = 6`.
//! * **`fward`** / **`bward`**: record numbers (1-based) of the first and last
//!   summary record of the doubly linked summary list.
//! * **`free`**: first free DAF address.
//! * **`locfmt`**: binary format of the numbers stored in the file
//!   (`"LTL-IEEE"` or `"BIG-IEEE"`).
//!
//! Only little-endian kernels are read; [`DAFHeader::check_spk`] rejects the rest.

use std::fmt;

use nom::{bytes::complete::take, number::complete::le_i32, IResult};

use crate::numeph_errors::{NumephError, Result};

/// In-memory representation of the DAF file record.
#[derive(Debug, PartialEq, Clone)]
pub struct DAFHeader {
    pub idword: String,
    pub internal_filename: String,
    pub nd: i32,
    pub ni: i32,
    pub fward: i32,
    pub bward: i32,
    pub free: i32,
    pub locfmt: String,
}

impl DAFHeader {
    /// Parse the first 1024‑byte DAF record into a [`DAFHeader`].
    ///
    /// Arguments
    /// -----------------
    /// * `input`: A byte slice starting at the beginning of the file.
    ///
    /// Return
    /// ----------
    /// * An [`IResult`] whose value is `(remaining, header)`, string fields trimmed.
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, id_word) = take(8usize)(input)?; // "DAF/SPK "
        let (input, nd) = le_i32(input)?;
        let (input, ni) = le_i32(input)?;
        let (input, ifname) = take(60usize)(input)?;
        let (input, fward) = le_i32(input)?;
        let (input, bward) = le_i32(input)?;
        let (input, free) = le_i32(input)?;
        let (input, locfmt) = take(8usize)(input)?;
        Ok((
            input,
            DAFHeader {
                idword: String::from_utf8_lossy(id_word).trim().to_string(),
                internal_filename: String::from_utf8_lossy(ifname).trim().to_string(),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: String::from_utf8_lossy(locfmt).trim().to_string(),
            },
        ))
    }

    /// Decode the file record and check that it describes a readable SPK kernel.
    pub fn read(input: &[u8]) -> Result<Self> {
        let (_, header) = Self::parse(input).map_err(|err| {
            NumephError::MalformedKernelData(format!("unreadable DAF file record: {err}"))
        })?;
        header.check_spk()?;
        Ok(header)
    }

    /// Reject anything that is not a little-endian `DAF/SPK` file with the SPK summary shape.
    pub fn check_spk(&self) -> Result<()> {
        if self.idword != "DAF/SPK" {
            return Err(NumephError::MalformedKernelData(format!(
                "not an SPK kernel (id word '{}')",
                self.idword
            )));
        }
        if self.locfmt != "LTL-IEEE" {
            return Err(NumephError::MalformedKernelData(format!(
                "unsupported binary format '{}', only LTL-IEEE kernels are read",
                self.locfmt
            )));
        }
        if self.nd != 2 || self.ni != 6 {
            return Err(NumephError::MalformedKernelData(format!(
                "unexpected SPK summary shape ND={} NI={}",
                self.nd, self.ni
            )));
        }
        if self.fward < 2 {
            return Err(NumephError::MalformedKernelData(format!(
                "invalid first summary record number {}",
                self.fward
            )));
        }
        Ok(())
    }

    /// Size of one array summary in double precision words: `ND + ceil(NI / 2)`.
    pub fn summary_words(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }
}

impl fmt::Display for DAFHeader {
    /// Render a fixed-width table summarizing the DAF header fields.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 18;
        const VALUE_WIDTH: usize = 50;

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = LABEL_WIDTH + 1,
            value = VALUE_WIDTH + 1
        );

        let rows = [
            ("ID Word", format!("{} (Format ID)", self.idword)),
            ("Internal Name", self.internal_filename.clone()),
            (
                "ND (doubles)",
                format!("{} double precision summary components", self.nd),
            ),
            (
                "NI (integers)",
                format!("{} integer summary components", self.ni),
            ),
            (
                "Forward Ptr",
                format!("Record # of first summary: {}", self.fward),
            ),
            (
                "Backward Ptr",
                format!("Record # of last summary: {}", self.bward),
            ),
            ("Free Addr", format!("Next free address: {}", self.free)),
            ("Binary Format", self.locfmt.clone()),
        ];

        writeln!(f, "{border}")?;
        writeln!(
            f,
            "| {:<label$}| {:<value$}|",
            "DAF File Header",
            "",
            label = LABEL_WIDTH,
            value = VALUE_WIDTH
        )?;
        writeln!(f, "{border}")?;
        for (label, value) in rows {
            writeln!(
                f,
                "| {:<label$}| {:<value$}|",
                label,
                value,
                label = LABEL_WIDTH,
                value = VALUE_WIDTH
            )?;
        }
        writeln!(f, "{border}")
    }
}
