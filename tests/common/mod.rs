#![allow(dead_code)]

use std::path::Path;

use approx::assert_relative_eq;
use camino::Utf8PathBuf;
use numeph::{
    constants::{Position, DAF_RECORD_BYTES, DAF_WORD_BYTES},
    ephemeris::{chebyshev_record::ChebyshevRecord, segment_id::SegmentId},
};

pub const WORDS_PER_RECORD: usize = DAF_RECORD_BYTES / DAF_WORD_BYTES;

/// One segment of a synthetic SPK file.
pub struct SpkSegment {
    pub id: SegmentId,
    /// SPK data type written in the summary (2 or 3 for readable segments).
    pub data_type: i32,
    pub records: Vec<ChebyshevRecord>,
}

impl SpkSegment {
    pub fn type2(id: SegmentId, records: Vec<ChebyshevRecord>) -> Self {
        SpkSegment {
            id,
            data_type: 2,
            records,
        }
    }

    pub fn type3(id: SegmentId, records: Vec<ChebyshevRecord>) -> Self {
        SpkSegment {
            id,
            data_type: 3,
            records,
        }
    }

    fn components(&self) -> usize {
        if self.data_type == 3 {
            6
        } else {
            3
        }
    }

    fn ncoeff(&self) -> usize {
        self.records[0].ncoeff()
    }

    fn rsize(&self) -> usize {
        2 + self.components() * self.ncoeff()
    }

    /// Record words followed by the 4 word directory.
    fn array_words(&self) -> Vec<f64> {
        let mut words = Vec::new();
        for record in &self.records {
            let (start, end) = (record.domain_start(), record.domain_end());
            words.push((start + end) / 2.0);
            words.push((end - start) / 2.0);
            words.extend_from_slice(record.x());
            words.extend_from_slice(record.y());
            words.extend_from_slice(record.z());
            // velocity blocks of type 3 segments
            words.resize(words.len() + (self.components() - 3) * self.ncoeff(), 0.0);
        }
        let first = &self.records[0];
        words.push(first.domain_start());
        words.push(first.domain_end() - first.domain_start());
        words.push(self.rsize() as f64);
        words.push(self.records.len() as f64);
        words
    }
}

fn put_words(bytes: &mut [u8], word_offset: usize, words: &[f64]) {
    for (i, word) in words.iter().enumerate() {
        let at = (word_offset + i) * DAF_WORD_BYTES;
        bytes[at..at + DAF_WORD_BYTES].copy_from_slice(&word.to_le_bytes());
    }
}

/// Layout of the DAF file record, with free form identification words.
pub fn file_record(idword: &str, locfmt: &str, fward: i32, bward: i32, free: i32) -> Vec<u8> {
    let mut bytes = vec![0u8; DAF_RECORD_BYTES];
    bytes[..8].copy_from_slice(format!("{idword:<8}").as_bytes());
    bytes[8..12].copy_from_slice(&2i32.to_le_bytes());
    bytes[12..16].copy_from_slice(&6i32.to_le_bytes());
    bytes[16..76].copy_from_slice(format!("{:<60}", "NUMEPH SYNTHETIC KERNEL").as_bytes());
    bytes[76..80].copy_from_slice(&fward.to_le_bytes());
    bytes[80..84].copy_from_slice(&bward.to_le_bytes());
    bytes[84..88].copy_from_slice(&free.to_le_bytes());
    bytes[88..96].copy_from_slice(format!("{locfmt:<8}").as_bytes());
    bytes
}

/// Bytes of an SPK file holding `segments`, with at most `per_record`
/// summaries per summary record.
///
/// Layout: file record, then one (summary record, name record) pair per group
/// of summaries, then the segment arrays.
pub fn spk_bytes(segments: &[SpkSegment], per_record: usize) -> Vec<u8> {
    let groups = segments.len().div_ceil(per_record).max(1);
    let data_record = 2 + 2 * groups;
    let mut next_addr = (data_record - 1) * WORDS_PER_RECORD + 1;

    let mut summaries = Vec::new();
    let mut arrays = Vec::new();
    for segment in segments {
        let words = segment.array_words();
        let initial = next_addr;
        let last = initial + words.len() - 1;
        next_addr = last + 1;
        summaries.push((segment, initial as i32, last as i32));
        arrays.extend(words);
    }

    let total_records = data_record - 1 + arrays.len().div_ceil(WORDS_PER_RECORD);
    let mut bytes = vec![0u8; total_records * DAF_RECORD_BYTES];
    bytes[..DAF_RECORD_BYTES].copy_from_slice(&file_record(
        "DAF/SPK",
        "LTL-IEEE",
        2,
        2 * groups as i32,
        next_addr as i32,
    ));

    let chunks: Vec<_> = summaries.chunks(per_record.max(1)).collect();
    for group in 0..groups {
        let record_number = 2 + 2 * group;
        let word_offset = (record_number - 1) * WORDS_PER_RECORD;
        let next = if group + 1 < groups {
            (record_number + 2) as f64
        } else {
            0.0
        };
        let prev = if group == 0 {
            0.0
        } else {
            (record_number - 2) as f64
        };
        let group_summaries = chunks.get(group).copied().unwrap_or(&[]);
        put_words(
            &mut bytes,
            word_offset,
            &[next, prev, group_summaries.len() as f64],
        );

        for (index, (segment, initial, last)) in group_summaries.iter().enumerate() {
            let at = (word_offset + 3 + index * 5) * DAF_WORD_BYTES;
            let first = &segment.records[0];
            let end = segment.records[segment.records.len() - 1].domain_end();
            bytes[at..at + 8].copy_from_slice(&first.domain_start().to_le_bytes());
            bytes[at + 8..at + 16].copy_from_slice(&end.to_le_bytes());
            let integers = [
                segment.id.target,
                segment.id.center,
                1,
                segment.data_type,
                *initial,
                *last,
            ];
            for (k, value) in integers.iter().enumerate() {
                let offset = at + 16 + 4 * k;
                bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
            }
        }
    }

    put_words(&mut bytes, (data_record - 1) * WORDS_PER_RECORD, &arrays);
    bytes
}

/// Write an SPK file and return its UTF-8 path.
pub fn write_spk(dir: &Path, name: &str, segments: &[SpkSegment], per_record: usize) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.join(name)).expect("temp dir path is UTF-8");
    std::fs::write(&path, spk_bytes(segments, per_record)).expect("write synthetic kernel");
    path
}

/// Degree 1 record with `x(t) = a_x + b_x * (t - mid) / radius` on `[start, end)`.
pub fn linear_record(start: f64, end: f64, x: [f64; 2], y: [f64; 2], z: [f64; 2]) -> ChebyshevRecord {
    ChebyshevRecord::new(start, end, x.to_vec(), y.to_vec(), z.to_vec()).unwrap()
}

/// Records of width `step` on `[0, n * step)` whose x coordinate equals `t`.
pub fn identity_records(n: usize, step: f64) -> Vec<ChebyshevRecord> {
    (0..n)
        .map(|i| {
            let start = i as f64 * step;
            let end = start + step;
            let mid = (start + end) / 2.0;
            linear_record(start, end, [mid, step / 2.0], [0.0, 0.0], [0.0, 0.0])
        })
        .collect()
}

/// Records of width `step` on `[0, n * step)` with a constant position.
pub fn constant_records(n: usize, step: f64, position: [f64; 3]) -> Vec<ChebyshevRecord> {
    (0..n)
        .map(|i| {
            let start = i as f64 * step;
            linear_record(
                start,
                start + step,
                [position[0], 0.0],
                [position[1], 0.0],
                [position[2], 0.0],
            )
        })
        .collect()
}

pub fn assert_position_close(actual: &Position, expected: [f64; 3], epsilon: f64) {
    assert_relative_eq!(actual.x, expected[0], epsilon = epsilon);
    assert_relative_eq!(actual.y, expected[1], epsilon = epsilon);
    assert_relative_eq!(actual.z, expected[2], epsilon = epsilon);
}
