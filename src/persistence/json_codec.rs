//! JSON encoding of an ephemeris set.
//!
//! ```json
//! {
//!   "format": "numeph",
//!   "version": 1,
//!   "segments": [
//!     { "center": 0, "target": 3,
//!       "records": [ { "start": 0.0, "end": 10.0, "x": [..], "y": [..], "z": [..] } ] }
//!   ]
//! }
//! ```
//!
//! `serde_json` is built with `float_roundtrip`, so every `f64` read back is
//! bit-identical to the one written.
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::{
    ephemeris::{
        chebyshev_record::ChebyshevRecord, ephemeris_set::EphemerisSet, segment_id::SegmentId,
        segment_store::SegmentStore,
    },
    numeph_errors::{NumephError, Result},
    persistence::{PersistenceAdapter, FORMAT_NAME, FORMAT_VERSION},
};

#[derive(Debug, Serialize, Deserialize)]
struct SetDocument {
    format: String,
    version: u32,
    segments: Vec<SegmentDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SegmentDocument {
    center: i32,
    target: i32,
    records: Vec<RecordDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordDocument {
    start: f64,
    end: f64,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl From<&ChebyshevRecord> for RecordDocument {
    fn from(record: &ChebyshevRecord) -> Self {
        RecordDocument {
            start: record.domain_start(),
            end: record.domain_end(),
            x: record.x().to_vec(),
            y: record.y().to_vec(),
            z: record.z().to_vec(),
        }
    }
}

impl From<&SegmentStore> for SegmentDocument {
    fn from(store: &SegmentStore) -> Self {
        SegmentDocument {
            center: store.id().center,
            target: store.id().target,
            records: store.records().iter().map(RecordDocument::from).collect(),
        }
    }
}

impl SegmentDocument {
    fn into_store(self) -> Result<SegmentStore> {
        let id = SegmentId::new(self.center, self.target);
        let records = self
            .records
            .into_iter()
            .enumerate()
            .map(|(index, r)| {
                ChebyshevRecord::new(r.start, r.end, r.x, r.y, r.z).map_err(|err| {
                    NumephError::PersistenceFailure(format!(
                        "segment {id}, record {index}: {err}"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        SegmentStore::new(id, records)
            .map_err(|err| NumephError::PersistenceFailure(format!("segment {id}: {err}")))
    }
}

/// JSON [`PersistenceAdapter`], compact by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Codec writing indented JSON.
    pub fn pretty() -> Self {
        JsonCodec { pretty: true }
    }
}

impl PersistenceAdapter for JsonCodec {
    fn encode(&self, set: &EphemerisSet, writer: &mut dyn Write) -> Result<()> {
        let document = SetDocument {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
            segments: set.iter().map(SegmentDocument::from).collect(),
        };
        if self.pretty {
            serde_json::to_writer_pretty(writer, &document)?;
        } else {
            serde_json::to_writer(writer, &document)?;
        }
        Ok(())
    }

    fn decode(&self, reader: &mut dyn Read) -> Result<EphemerisSet> {
        let document: SetDocument = serde_json::from_reader(reader)?;
        if document.format != FORMAT_NAME || document.version != FORMAT_VERSION {
            return Err(NumephError::PersistenceFailure(format!(
                "unsupported document format '{}' version {}",
                document.format, document.version
            )));
        }

        let mut stores = Vec::with_capacity(document.segments.len());
        for segment in document.segments {
            let id = SegmentId::new(segment.center, segment.target);
            if stores.iter().any(|s: &SegmentStore| s.id() == id) {
                return Err(NumephError::PersistenceFailure(format!(
                    "segment {id} appears twice"
                )));
            }
            stores.push(segment.into_store()?);
        }
        Ok(EphemerisSet::from_stores(stores))
    }
}
