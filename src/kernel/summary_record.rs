//! SPK array summaries (segment descriptors).
//!
//! A DAF summary record starts with three control words (next record, previous
//! record, number of summaries) followed by the packed summaries. With the SPK
//! shape `ND = 2`, `NI = 6`, one summary is five words:
//!
//! ```text
//! start_epoch f64 | end_epoch f64 | target i32 | center i32 | frame i32 | type i32 | initial i32 | final i32
//! ```
//!
//! `initial_addr` and `final_addr` are 1-based DAF word addresses of the first
//! and last word of the segment array.
use std::fmt;

use hifitime::Epoch;
use nom::{
    number::complete::{le_f64, le_i32},
    IResult,
};

use crate::{
    constants::EtSeconds, ephemeris::segment_id::SegmentId, kernel::spk_type::SpkDataType,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub start_epoch: EtSeconds,
    pub end_epoch: EtSeconds,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    pub initial_addr: i32,
    pub final_addr: i32,
}

impl Summary {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, start_epoch) = le_f64(input)?;
        let (input, end_epoch) = le_f64(input)?;

        let (input, target) = le_i32(input)?;
        let (input, center) = le_i32(input)?;
        let (input, frame_id) = le_i32(input)?;
        let (input, data_type) = le_i32(input)?;
        let (input, initial_addr) = le_i32(input)?;
        let (input, final_addr) = le_i32(input)?;
        Ok((
            input,
            Summary {
                start_epoch,
                end_epoch,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            },
        ))
    }

    pub fn data_type(&self) -> SpkDataType {
        SpkDataType::from(self.data_type)
    }

    pub fn id(&self) -> SegmentId {
        SegmentId::new(self.center, self.target)
    }

    /// Number of words of the segment array (coefficients and directory).
    pub fn array_words(&self) -> usize {
        (self.final_addr - self.initial_addr + 1).max(0) as usize
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            (
                "start_epoch",
                format!("{}", Epoch::from_et_seconds(self.start_epoch)),
            ),
            (
                "end_epoch",
                format!("{}", Epoch::from_et_seconds(self.end_epoch)),
            ),
            ("segment", self.id().to_string()),
            ("frame_id", self.frame_id.to_string()),
            ("data_type", SpkDataType::from(self.data_type).to_string()),
            ("initial_addr", self.initial_addr.to_string()),
            ("final_addr", self.final_addr.to_string()),
        ];

        let label_width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(10);
        let value_width = fields.iter().map(|(_, v)| v.len()).max().unwrap_or(10);

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = label_width + 2,
            value = value_width + 2
        );

        writeln!(f, "{border}")?;
        writeln!(
            f,
            "| {:<label_width$} | {:<value_width$} |",
            "Field", "Value",
        )?;
        writeln!(f, "{border}")?;

        for (label, value) in fields {
            writeln!(f, "| {label:<label_width$} | {value:<value_width$} |")?;
        }

        writeln!(f, "{border}")
    }
}
