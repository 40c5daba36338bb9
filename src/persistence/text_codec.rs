//! Line-oriented text encoding of an ephemeris set.
//!
//! ```text
//! numeph 1
//! segment 0 3 2
//! record 0e0 1e1 2 1e0 5e-1 0e0 0e0 0e0 0e0
//! record 1e1 2e1 2 1e0 5e-1 0e0 0e0 0e0 0e0
//! segment 3 301 1
//! record ...
//! ```
//!
//! * `segment <center> <target> <n_records>` opens a segment followed by exactly
//!   `n_records` record lines,
//! * `record <start> <end> <ncoeff> <x...> <y...> <z...>` holds one record.
//!
//! Floats are written in the shortest scientific notation that reads back to the
//! same `f64`. Blank lines and lines starting with `#` are ignored.
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};

use itertools::Itertools;
use nom::{
    bytes::complete::tag,
    character::complete::{i32 as parse_i32, space0, space1, u32 as parse_u32, u64 as parse_u64},
    combinator::all_consuming,
    multi::many1,
    number::complete::double,
    sequence::{preceded, terminated},
    IResult, Parser,
};

use crate::{
    ephemeris::{
        chebyshev_record::ChebyshevRecord, ephemeris_set::EphemerisSet, segment_id::SegmentId,
        segment_store::SegmentStore,
    },
    numeph_errors::{NumephError, Result},
    persistence::{PersistenceAdapter, FORMAT_NAME, FORMAT_VERSION},
};

fn header_line(input: &str) -> IResult<&str, u32> {
    all_consuming(terminated(
        preceded((tag(FORMAT_NAME), space1), parse_u32),
        space0,
    ))
    .parse(input)
}

fn segment_line(input: &str) -> IResult<&str, (i32, i32, u64)> {
    all_consuming(terminated(
        preceded(
            tag("segment"),
            (
                preceded(space1, parse_i32),
                preceded(space1, parse_i32),
                preceded(space1, parse_u64),
            ),
        ),
        space0,
    ))
    .parse(input)
}

fn record_line(input: &str) -> IResult<&str, (f64, f64, u64, Vec<f64>)> {
    all_consuming(terminated(
        preceded(
            tag("record"),
            (
                preceded(space1, double),
                preceded(space1, double),
                preceded(space1, parse_u64),
                many1(preceded(space1, double)),
            ),
        ),
        space0,
    ))
    .parse(input)
}

fn format_floats(values: &[f64]) -> String {
    values.iter().map(|v| format!("{v:e}")).join(" ")
}

/// Segment being read: identity, announced record count and records read so far.
struct OpenSegment {
    id: SegmentId,
    expected: usize,
    records: Vec<ChebyshevRecord>,
}

impl OpenSegment {
    fn close(self, line: usize) -> Result<SegmentStore> {
        if self.records.len() != self.expected {
            return Err(failure(
                line,
                format!(
                    "segment {} announces {} records but {} were read",
                    self.id,
                    self.expected,
                    self.records.len()
                ),
            ));
        }
        SegmentStore::new(self.id, self.records).map_err(|err| failure(line, err.to_string()))
    }
}

fn failure(line: usize, message: impl std::fmt::Display) -> NumephError {
    NumephError::PersistenceFailure(format!("line {line}: {message}"))
}

/// Text [`PersistenceAdapter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCodec;

impl PersistenceAdapter for TextCodec {
    fn encode(&self, set: &EphemerisSet, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "{FORMAT_NAME} {FORMAT_VERSION}")?;
        for store in set.iter() {
            let id = store.id();
            writeln!(writer, "segment {} {} {}", id.center, id.target, store.len())?;
            for record in store.records() {
                writeln!(
                    writer,
                    "record {:e} {:e} {} {} {} {}",
                    record.domain_start(),
                    record.domain_end(),
                    record.ncoeff(),
                    format_floats(record.x()),
                    format_floats(record.y()),
                    format_floats(record.z())
                )?;
            }
        }
        Ok(())
    }

    fn decode(&self, reader: &mut dyn Read) -> Result<EphemerisSet> {
        let lines = BufReader::new(reader)
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line));

        let mut stores: Vec<SegmentStore> = Vec::new();
        let mut open: Option<OpenSegment> = None;
        let mut header_seen = false;
        let mut last_line = 0;

        for (number, line) in lines {
            let line = line.map_err(|err| match err.kind() {
                ErrorKind::InvalidData => failure(number, "not valid UTF-8 text"),
                _ => NumephError::from(err),
            })?;
            last_line = number;
            let content = line.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            if !header_seen {
                let (_, version) = header_line(content)
                    .map_err(|_| failure(number, format!("expected '{FORMAT_NAME} <version>'")))?;
                if version != FORMAT_VERSION {
                    return Err(failure(number, format!("unsupported version {version}")));
                }
                header_seen = true;
                continue;
            }

            if content.starts_with("segment") {
                let (_, (center, target, expected)) = segment_line(content)
                    .map_err(|_| failure(number, format!("malformed segment line '{content}'")))?;
                if let Some(previous) = open.take() {
                    stores.push(previous.close(number)?);
                }
                let id = SegmentId::new(center, target);
                if stores.iter().any(|s| s.id() == id) {
                    return Err(failure(number, format!("segment {id} appears twice")));
                }
                open = Some(OpenSegment {
                    id,
                    expected: expected as usize,
                    records: Vec::new(),
                });
            } else if content.starts_with("record") {
                let segment = open
                    .as_mut()
                    .ok_or_else(|| failure(number, "record outside of a segment"))?;
                let (_, (start, end, ncoeff, coefficients)) = record_line(content)
                    .map_err(|_| failure(number, format!("malformed record line '{content}'")))?;

                let ncoeff = ncoeff as usize;
                if ncoeff.checked_mul(3) != Some(coefficients.len()) {
                    return Err(failure(
                        number,
                        format!(
                            "expected 3 x {ncoeff} coefficients, found {}",
                            coefficients.len()
                        ),
                    ));
                }
                let (x, rest) = coefficients.split_at(ncoeff);
                let (y, z) = rest.split_at(ncoeff);
                let record = ChebyshevRecord::new(start, end, x.to_vec(), y.to_vec(), z.to_vec())
                    .map_err(|err| failure(number, err))?;
                segment.records.push(record);
            } else {
                return Err(failure(number, format!("unexpected line '{content}'")));
            }
        }

        if !header_seen {
            return Err(NumephError::PersistenceFailure(
                "empty document, missing header".to_string(),
            ));
        }
        if let Some(segment) = open {
            stores.push(segment.close(last_line)?);
        }
        Ok(EphemerisSet::from_stores(stores))
    }
}

#[cfg(test)]
mod test_text_codec {
    use super::*;

    fn linear_store() -> SegmentStore {
        SegmentStore::new(
            SegmentId::new(0, 3),
            vec![
                ChebyshevRecord::new(0.0, 10.0, vec![5.0, 5.0], vec![0.0, 0.0], vec![0.0, 0.0])
                    .unwrap(),
                ChebyshevRecord::new(10.0, 20.0, vec![15.0, 5.0], vec![0.0, 0.0], vec![0.0, 0.0])
                    .unwrap(),
            ],
        )
        .unwrap()
    }

    fn encode(set: &EphemerisSet) -> String {
        let mut buffer = Vec::new();
        TextCodec.encode(set, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn decode(text: &str) -> Result<EphemerisSet> {
        TextCodec.decode(&mut text.as_bytes())
    }

    #[test]
    fn test_text_layout() {
        let set = EphemerisSet::from_stores([linear_store()]);
        let expected = "numeph 1\n\
                        segment 0 3 2\n\
                        record 0e0 1e1 2 5e0 5e0 0e0 0e0 0e0 0e0\n\
                        record 1e1 2e1 2 1.5e1 5e0 0e0 0e0 0e0 0e0\n";
        assert_eq!(encode(&set), expected);
    }

    #[test]
    fn test_text_round_trip_is_exact() {
        let awkward = ChebyshevRecord::new(
            -1.0 / 3.0,
            1.0e9 / 7.0,
            vec![0.1, -2.5e-17],
            vec![-0.0, 6.02214076e23],
            vec![f64::MIN_POSITIVE, f64::MAX],
        )
        .unwrap();
        let set = EphemerisSet::from_stores([
            linear_store(),
            SegmentStore::new(SegmentId::new(3, 301), vec![awkward]).unwrap(),
        ]);

        let decoded = decode(&encode(&set)).unwrap();
        assert_eq!(decoded, set);

        let restored = &decoded.segment(SegmentId::new(3, 301)).unwrap().records()[0];
        assert_eq!(restored.domain_start().to_bits(), (-1.0f64 / 3.0).to_bits());
        assert_eq!(restored.y()[0].to_bits(), (-0.0f64).to_bits());
    }

    #[test]
    fn test_text_comments_and_blank_lines() {
        let text = "# sliced from de440\n\nnumeph 1\n\nsegment 3 399 1\n  record 0e0 1e1 1 1e0 2e0 3e0  \n";
        let set = decode(text).unwrap();
        let store = set.segment(SegmentId::new(3, 399)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].z(), &[3.0]);
    }

    #[test]
    fn test_text_decode_failures() {
        let expect_failure = |text: &str, message: &str| match decode(text) {
            Err(NumephError::PersistenceFailure(found)) => assert_eq!(found, message),
            other => panic!("expected a persistence failure, got {other:?}"),
        };

        expect_failure("", "empty document, missing header");
        expect_failure("numeph 2\n", "line 1: unsupported version 2");
        expect_failure(
            "numeph 1\nrecord 0e0 1e1 1 1e0 1e0 1e0\n",
            "line 2: record outside of a segment",
        );
        expect_failure(
            "numeph 1\nsegment 0 3 1\nrecord 0e0 1e1 2 1e0 1e0 1e0\n",
            "line 3: expected 3 x 2 coefficients, found 3",
        );
        expect_failure(
            "numeph 1\nsegment 0 3 2\nrecord 0e0 1e1 1 1e0 1e0 1e0\n",
            "line 3: segment (0,3) announces 2 records but 1 were read",
        );
        expect_failure(
            "numeph 1\nsegment 0 3 x\n",
            "line 2: malformed segment line 'segment 0 3 x'",
        );
        expect_failure("numeph 1\nvelocity 1 2\n", "line 2: unexpected line 'velocity 1 2'");
        expect_failure(
            "numeph 1\nsegment 0 3 2\nrecord 0e0 1.2e1 1 1e0 1e0 1e0\nrecord 1e1 2e1 1 1e0 1e0 1e0\n",
            "line 4: Invalid Chebyshev record: records of segment (0,3) overlap: [0, 12) followed by [10, 20)",
        );
    }

    #[test]
    fn test_text_invalid_utf8_is_a_decode_failure() {
        let mut bytes = b"numeph 1\nsegment 0 3 1\n".to_vec();
        bytes.extend_from_slice(&[b'r', 0xff, 0xfe, b'\n']);

        match TextCodec.decode(&mut bytes.as_slice()) {
            Err(NumephError::PersistenceFailure(found)) => {
                assert_eq!(found, "line 3: not valid UTF-8 text")
            }
            other => panic!("expected a persistence failure, got {other:?}"),
        }
    }
}
