// File-level conversion helpers.
//
// Provides `convert_file()` and `convert_batch()`, which read a SCEL file
// fully into memory, decode it, and write the RIME dictionary through a
// `BufWriter`.  Decoding finishes before the output file is created, so a
// malformed input never leaves a partial dictionary behind.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use crate::rime::{DictMeta, RimeWriter, dict_name_from_path};
use crate::scel::{BinaryCursor, DecodeError, DecodeSummary, Entry, ScelDecoder};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `convert_file()` and `write_dict()`.
#[derive(Debug, Clone)]
pub struct ConvertStats {
    /// SCEL input size in bytes.
    pub input_size: u64,
    /// RIME output size in bytes.
    pub output_size: u64,
    /// Dictionary name written into the header.
    pub name: String,
    /// Decoder counters.
    pub summary: DecodeSummary,
}

/// A decoded SCEL file.
#[derive(Debug, Clone)]
pub struct ScelFile {
    /// Entries sorted by order.
    pub entries: Vec<Entry>,
    /// Decoder counters.
    pub summary: DecodeSummary,
    /// Input size in bytes.
    pub input_size: u64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// I/O error (file open, create, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The SCEL input could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    /// The output exists and overwriting was not requested.
    #[error("output file exists: {}", .0.display())]
    OutputExists(PathBuf),
    /// Several batch inputs would be written to the same output.
    #[error("several inputs map to output {}", .0.display())]
    DuplicateOutput(PathBuf),
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

/// Options for `convert_file()`.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Dictionary name. Derived from the output path, then the input path,
    /// when absent.
    pub name: Option<String>,
    /// Dictionary version string.
    pub version: String,
    /// Replace an existing output file.
    pub overwrite: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            name: None,
            version: DictMeta::default().version,
            overwrite: false,
        }
    }
}

impl ConvertOptions {
    /// Header fields for converting `input` into `output`.
    pub fn meta_for(&self, input: &Path, output: Option<&Path>) -> DictMeta {
        let name = self
            .name
            .clone()
            .or_else(|| output.and_then(dict_name_from_path))
            .or_else(|| dict_name_from_path(input))
            .unwrap_or_else(|| DictMeta::default().name);
        DictMeta::new(name, self.version.clone())
    }
}

// ---------------------------------------------------------------------------
// read_scel
// ---------------------------------------------------------------------------

/// Read and decode a SCEL file.
///
/// The file is read fully into memory; SCEL dictionaries are small and the
/// decoder seeks between sections.
pub fn read_scel(path: &Path) -> Result<ScelFile, ConvertError> {
    let data = std::fs::read(path)?;
    let input_size = data.len() as u64;
    debug!("{}: {input_size} bytes", path.display());

    let decoder = ScelDecoder::new(BinaryCursor::new(Cursor::new(data)));
    let (entries, summary) = decoder.into_parts()?;

    Ok(ScelFile {
        entries,
        summary,
        input_size,
    })
}

// ---------------------------------------------------------------------------
// write_dict
// ---------------------------------------------------------------------------

/// Write a decoded file as a RIME dictionary to any writer.
pub fn write_dict<W: Write>(
    scel: &ScelFile,
    meta: DictMeta,
    writer: W,
) -> Result<ConvertStats, ConvertError> {
    let mut counting = CountingWriter {
        inner: writer,
        count: 0,
    };
    let name = meta.name.clone();
    RimeWriter::new(meta).write(&mut counting, &scel.entries)?;
    counting.flush()?;

    Ok(ConvertStats {
        input_size: scel.input_size,
        output_size: counting.count,
        name,
        summary: scel.summary,
    })
}

// ---------------------------------------------------------------------------
// convert_file
// ---------------------------------------------------------------------------

/// Convert a SCEL file into a RIME dictionary at `rime_path`.
pub fn convert_file(
    scel_path: &Path,
    rime_path: &Path,
    opts: &ConvertOptions,
) -> Result<ConvertStats, ConvertError> {
    if !opts.overwrite && rime_path.exists() {
        return Err(ConvertError::OutputExists(rime_path.to_path_buf()));
    }

    let scel = read_scel(scel_path)?;
    let meta = opts.meta_for(scel_path, Some(rime_path));

    let output = BufWriter::with_capacity(BUF_SIZE, File::create(rime_path)?);
    let stats = write_dict(&scel, meta, output)?;

    info!(
        "{} -> {}: {} entries",
        scel_path.display(),
        rime_path.display(),
        stats.summary.entries
    );
    Ok(stats)
}

// ---------------------------------------------------------------------------
// convert_batch
// ---------------------------------------------------------------------------

/// Output path used by `convert_batch()` for `input`.
pub fn batch_output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let name = dict_name_from_path(input).unwrap_or_else(|| DictMeta::default().name);
    output_dir.join(format!("{name}.dict.yaml"))
}

/// Convert each input into `output_dir/<name>.dict.yaml`.
///
/// Files are independent; one failure does not stop the others. Results
/// are returned in input order. Inputs whose output paths collide (same
/// stem in different directories) are all rejected with
/// `ConvertError::DuplicateOutput` and none of them is written. With the
/// `parallel` feature the files are converted on the rayon thread pool.
pub fn convert_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    version: &str,
    overwrite: bool,
) -> Vec<Result<ConvertStats, ConvertError>> {
    let outputs: Vec<PathBuf> = inputs
        .iter()
        .map(|input| batch_output_path(input, output_dir))
        .collect();
    let mut claims: HashMap<&Path, usize> = HashMap::with_capacity(outputs.len());
    for output in &outputs {
        *claims.entry(output.as_path()).or_default() += 1;
    }

    let convert_one = |(input, output): (&PathBuf, &PathBuf)| {
        if claims[output.as_path()] > 1 {
            warn!(
                "{}: output {} is shared with another input",
                input.display(),
                output.display()
            );
            return Err(ConvertError::DuplicateOutput(output.clone()));
        }
        let opts = ConvertOptions {
            name: dict_name_from_path(input),
            version: version.to_string(),
            overwrite,
        };
        convert_file(input, output, &opts)
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        inputs.par_iter().zip(&outputs).map(convert_one).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        inputs.iter().zip(&outputs).map(convert_one).collect()
    }
}

// ---------------------------------------------------------------------------
// Counting writer
// ---------------------------------------------------------------------------

struct CountingWriter<W: Write> {
    inner: W,
    count: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
