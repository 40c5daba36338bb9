//! Reader for NAIF SPK kernels stored in a DAF container.
//!
//! Opening a kernel reads the file record ([`DAFHeader`]) and walks the doubly
//! linked list of summary records starting at `fward`:
//!
//! ```text
//! record fward:   next | prev | nsum | summary 1 | summary 2 | ... | summary nsum
//! record next:    ...
//! ```
//!
//! The three control words are stored as `f64`. A `next` of zero ends the list.
//! Segment arrays are only read on demand by [`KernelReader::read_records`],
//! so opening a large kernel is cheap.
//!
//! The file handle is owned by the [`DafKernel`] and closed when it is dropped.
use std::{
    collections::HashSet,
    fmt,
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
};

use camino::{Utf8Path, Utf8PathBuf};
use nom::{multi::count, number::complete::le_f64, IResult, Parser};
use tracing::{debug, info};

use crate::{
    constants::{DAF_RECORD_BYTES, DAF_WORD_BYTES, SPK_DIRECTORY_WORDS},
    kernel::{
        daf_header::DAFHeader, directory::DirectoryData, summary_record::Summary, KernelReader,
        RawSegment,
    },
    numeph_errors::{NumephError, Result},
};

/// Number of control words at the start of a summary record.
const SUMMARY_CONTROL_WORDS: usize = 3;

fn parse_words(input: &[u8], n_words: usize) -> IResult<&[u8], Vec<f64>> {
    count(le_f64, n_words).parse(input)
}

#[derive(Debug)]
pub struct DafKernel {
    path: Utf8PathBuf,
    file: BufReader<File>,
    header: DAFHeader,
    summaries: Vec<Summary>,
}

impl DafKernel {
    /// Open an SPK kernel and read its segment summaries.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: Location of the `.bsp` file.
    ///
    /// Return
    /// ----------
    /// * The opened kernel, or
    ///   - [`NumephError::IoError`] if the file cannot be opened or is truncated,
    ///   - [`NumephError::MalformedKernelData`] if it is not a little-endian
    ///     `DAF/SPK` file or its summary list is inconsistent.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = BufReader::new(File::open(&path)?);

        let header = DAFHeader::read(&read_daf_record(&mut file, 1)?)?;
        let summaries = read_summaries(&mut file, &header)?;

        info!(
            path = %path,
            internal_name = %header.internal_filename,
            segments = summaries.len(),
            "opened SPK kernel"
        );
        Ok(DafKernel {
            path,
            file,
            header,
            summaries,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn header(&self) -> &DAFHeader {
        &self.header
    }

    pub fn summaries(&self) -> &[Summary] {
        &self.summaries
    }
}

/// Read the 1-based DAF record `record_number`.
fn read_daf_record(file: &mut BufReader<File>, record_number: usize) -> Result<Vec<u8>> {
    let offset = (record_number - 1) * DAF_RECORD_BYTES;
    file.seek(SeekFrom::Start(offset as u64))?;
    let mut buffer = vec![0u8; DAF_RECORD_BYTES];
    file.read_exact(&mut buffer)?;
    Ok(buffer)
}

/// Read `n_words` double precision words starting at the 1-based DAF address `address`.
/// Raw bytes of `n_words` words starting at the 1-based word `address`.
fn read_word_bytes(file: &mut BufReader<File>, address: usize, n_words: usize) -> Result<Vec<u8>> {
    if address == 0 {
        return Err(NumephError::MalformedKernelData(
            "DAF word addresses start at 1".to_string(),
        ));
    }
    file.seek(SeekFrom::Start(((address - 1) * DAF_WORD_BYTES) as u64))?;
    let mut buffer = vec![0u8; n_words * DAF_WORD_BYTES];
    file.read_exact(&mut buffer)?;
    Ok(buffer)
}

fn read_words(file: &mut BufReader<File>, address: usize, n_words: usize) -> Result<Vec<f64>> {
    let buffer = read_word_bytes(file, address, n_words)?;
    let (_, words) = parse_words(&buffer, n_words).map_err(|err| {
        NumephError::MalformedKernelData(format!("unreadable words at address {address}: {err}"))
    })?;
    Ok(words)
}

/// Walk the summary record list starting at `header.fward`.
fn read_summaries(file: &mut BufReader<File>, header: &DAFHeader) -> Result<Vec<Summary>> {
    let summary_bytes = header.summary_words() * DAF_WORD_BYTES;
    let capacity =
        (DAF_RECORD_BYTES / DAF_WORD_BYTES - SUMMARY_CONTROL_WORDS) / header.summary_words();

    let mut summaries = Vec::new();
    let mut visited = HashSet::new();
    let mut record_number = header.fward as usize;

    while record_number != 0 {
        if !visited.insert(record_number) {
            return Err(NumephError::MalformedKernelData(format!(
                "summary record {record_number} is linked twice"
            )));
        }

        let record = read_daf_record(file, record_number)?;
        let (body, control) = parse_words(&record, SUMMARY_CONTROL_WORDS).map_err(|err| {
            NumephError::MalformedKernelData(format!("unreadable summary record: {err}"))
        })?;
        let (next, nsum) = (control[0], control[2]);

        if nsum < 0.0 || nsum.fract() != 0.0 || nsum as usize > capacity {
            return Err(NumephError::MalformedKernelData(format!(
                "summary record {record_number} announces {nsum} summaries"
            )));
        }
        if next < 0.0 || next.fract() != 0.0 {
            return Err(NumephError::MalformedKernelData(format!(
                "summary record {record_number} links to record {next}"
            )));
        }

        for chunk in body.chunks_exact(summary_bytes).take(nsum as usize) {
            let (_, summary) = Summary::parse(chunk).map_err(|err| {
                NumephError::MalformedKernelData(format!("unreadable summary: {err}"))
            })?;
            debug!(segment = %summary.id(), data_type = summary.data_type, "found segment");
            summaries.push(summary);
        }

        record_number = next as usize;
    }

    Ok(summaries)
}

impl KernelReader for DafKernel {
    fn enumerate_segments(&mut self) -> Result<Vec<Summary>> {
        Ok(self.summaries.clone())
    }

    fn read_records(&mut self, summary: &Summary) -> Result<RawSegment> {
        let components = summary.data_type().coefficient_blocks()?;

        let array_words = summary.array_words();
        if summary.initial_addr < 1 || array_words < SPK_DIRECTORY_WORDS {
            return Err(NumephError::MalformedKernelData(format!(
                "segment {} has invalid addresses [{}, {}]",
                summary.id(),
                summary.initial_addr,
                summary.final_addr
            )));
        }

        let file_len = self.file.get_ref().metadata()?.len();
        if summary.final_addr as u64 * DAF_WORD_BYTES as u64 > file_len {
            return Err(NumephError::MalformedKernelData(format!(
                "segment {} ends at address {}, past the end of the file",
                summary.id(),
                summary.final_addr
            )));
        }

        let directory_address = summary.final_addr as usize + 1 - SPK_DIRECTORY_WORDS;
        let footer = read_word_bytes(&mut self.file, directory_address, SPK_DIRECTORY_WORDS)?;
        let directory = DirectoryData::read(&footer)?;

        if directory.record_words() + SPK_DIRECTORY_WORDS != array_words {
            return Err(NumephError::MalformedKernelData(format!(
                "segment {} spans {array_words} words but its directory describes {} records of {} words",
                summary.id(),
                directory.n_records,
                directory.rsize
            )));
        }

        let coefficients = read_words(
            &mut self.file,
            summary.initial_addr as usize,
            directory.record_words(),
        )?;
        debug!(
            segment = %summary.id(),
            records = directory.n_records,
            rsize = directory.rsize,
            "read segment records"
        );

        Ok(RawSegment {
            directory,
            components,
            coefficients,
        })
    }
}

impl fmt::Display for DafKernel {
    /// Kernel header followed by one table per segment summary.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+{:-^78}+", " Ephemeris File Information ")?;
        writeln!(f, "{}", self.header)?;
        writeln!(f, "+{:-^78}+", " Available Segments ")?;
        for summary in &self.summaries {
            writeln!(f, "{summary}")?;
        }
        Ok(())
    }
}
