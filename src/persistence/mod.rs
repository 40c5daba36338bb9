//! # Persistence of ephemeris sets
//!
//! An [`EphemerisSet`] is saved once after slicing a kernel and loaded many
//! times afterwards. Two formats are provided:
//!
//! * [`json_codec::JsonCodec`]: a JSON document (serde), easy to inspect and to
//!   consume from other tools,
//! * [`text_codec::TextCodec`]: a line-oriented text format, one record per line.
//!
//! Both reproduce every coefficient and domain bound bit for bit: saving then
//! loading a set yields an equal set.
//!
//! [`save`] and [`load`] pick the codec from the file extension: `.json` is
//! JSON, anything else is text.
pub mod json_codec;
pub mod text_codec;

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
};

use camino::Utf8Path;
use tracing::info;

use crate::{
    ephemeris::ephemeris_set::EphemerisSet,
    numeph_errors::Result,
    persistence::{json_codec::JsonCodec, text_codec::TextCodec},
};

/// Identifier written at the top of every persisted set.
pub const FORMAT_NAME: &str = "numeph";

/// Current version of the persisted layout.
pub const FORMAT_VERSION: u32 = 1;

/// Encoding of an [`EphemerisSet`] to and from a byte stream.
pub trait PersistenceAdapter {
    fn encode(&self, set: &EphemerisSet, writer: &mut dyn Write) -> Result<()>;

    fn decode(&self, reader: &mut dyn Read) -> Result<EphemerisSet>;

    /// Write `set` to `path`, replacing any existing file.
    fn save(&self, set: &EphemerisSet, path: &Utf8Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.encode(set, &mut writer)?;
        writer.flush()?;
        info!(path = %path, segments = set.len(), "ephemeris set saved");
        Ok(())
    }

    /// Read a set previously written by [`Self::save`].
    fn load(&self, path: &Utf8Path) -> Result<EphemerisSet> {
        let mut reader = BufReader::new(File::open(path)?);
        let set = self.decode(&mut reader)?;
        info!(path = %path, segments = set.len(), "ephemeris set loaded");
        Ok(set)
    }
}

/// Codec matching the extension of `path`.
pub fn codec_for(path: &Utf8Path) -> Box<dyn PersistenceAdapter> {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Box::new(JsonCodec::default()),
        _ => Box::new(TextCodec),
    }
}

/// Save `set` with the codec chosen from the extension of `path`.
pub fn save(set: &EphemerisSet, path: impl AsRef<Utf8Path>) -> Result<()> {
    let path = path.as_ref();
    codec_for(path).save(set, path)
}

/// Load a set with the codec chosen from the extension of `path`.
pub fn load(path: impl AsRef<Utf8Path>) -> Result<EphemerisSet> {
    let path = path.as_ref();
    codec_for(path).load(path)
}
