// SCEL decoder: syllable palette pass, then phrase table pass.
//
// Phrase table layout, repeated until a group header reads 0:
//
//   u16  word_count
//   u16  pinyin byte length (2 bytes per syllable index)
//   u16  syllable index        x byte_length / 2
//   per word (x word_count):
//     u16  phrase byte length + UTF-16LE phrase
//     u16  record_length       bytes that follow, order included
//     u32  order
//     [u8] trailer             record_length - 4 bytes, unused
//
// There is no explicit end marker besides a zero word count.  Files carry
// padding after the last group, so a syllable index that does not resolve
// also ends the table.  That heuristic is load-bearing for real files and
// is kept as is.

use std::io::{Cursor, Read, Seek};

use log::{debug, trace};

use super::cursor::BinaryCursor;
use super::error::DecodeError;
use super::layout::ScelLayout;
use super::palette::SyllablePalette;

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One dictionary line: a phrase and its space-separated pinyin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub phrase: String,
    pub pinyin: String,
}

/// An entry together with its sort weight, as stored in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct WeightedEntry {
    entry: Entry,
    order: u32,
}

// ---------------------------------------------------------------------------
// Decode summary
// ---------------------------------------------------------------------------

/// Why the phrase table loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A group header read 0, or the source ran out at a group header.
    ZeroWordCount,
    /// A group declared no syllables at all.
    EmptyPronunciation,
    /// A group referenced a syllable past the end of the palette.
    UnresolvedSyllable {
        /// The offending index.
        index: u16,
        /// Offset of the index field.
        offset: u64,
    },
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroWordCount => write!(f, "zero word count"),
            Self::EmptyPronunciation => write!(f, "empty pronunciation"),
            Self::UnresolvedSyllable { index, offset } => {
                write!(f, "unresolved syllable {index} at offset {offset:#x}")
            }
        }
    }
}

/// Counters gathered while decoding one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Syllables in the palette.
    pub syllables: usize,
    /// Phrase groups decoded.
    pub groups: u64,
    /// Entries decoded.
    pub entries: usize,
    /// How the phrase table ended.
    pub stop: StopReason,
}

struct Decoded {
    table: Vec<Entry>,
    summary: DecodeSummary,
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Decoder for one SCEL source.
///
/// The first call to [`get_table`](Self::get_table) reads the whole source;
/// later calls return the cached table without touching the source again.
pub struct ScelDecoder<R> {
    cursor: BinaryCursor<R>,
    layout: ScelLayout,
    decoded: Option<Decoded>,
}

impl<R: Read + Seek> ScelDecoder<R> {
    /// Create a decoder using the standard SCEL layout.
    pub fn new(cursor: BinaryCursor<R>) -> Self {
        Self::with_layout(cursor, ScelLayout::default())
    }

    /// Create a decoder reading the sections at `layout`.
    pub fn with_layout(cursor: BinaryCursor<R>, layout: ScelLayout) -> Self {
        Self {
            cursor,
            layout,
            decoded: None,
        }
    }

    /// Create a decoder directly over a byte source.
    pub fn from_reader(reader: R) -> Self {
        Self::new(BinaryCursor::new(reader))
    }

    pub fn layout(&self) -> &ScelLayout {
        &self.layout
    }

    /// Whether the source has already been decoded.
    pub fn is_decoded(&self) -> bool {
        self.decoded.is_some()
    }

    /// The decoded table, sorted ascending by order; equal orders keep file
    /// order.
    pub fn get_table(&mut self) -> Result<&[Entry], DecodeError> {
        let decoded = match self.decoded.take() {
            Some(decoded) => decoded,
            None => self.decode()?,
        };
        Ok(self.decoded.insert(decoded).table.as_slice())
    }

    /// Counters from the decode, once it has happened.
    pub fn summary(&self) -> Option<&DecodeSummary> {
        self.decoded.as_ref().map(|d| &d.summary)
    }

    /// Decode if needed and take ownership of the table.
    pub fn into_table(self) -> Result<Vec<Entry>, DecodeError> {
        self.into_parts().map(|(table, _)| table)
    }

    /// Decode if needed and take the table together with its counters.
    pub fn into_parts(mut self) -> Result<(Vec<Entry>, DecodeSummary), DecodeError> {
        let decoded = match self.decoded.take() {
            Some(decoded) => decoded,
            None => self.decode()?,
        };
        Ok((decoded.table, decoded.summary))
    }

    fn decode(&mut self) -> Result<Decoded, DecodeError> {
        let palette = SyllablePalette::read(&mut self.cursor, &self.layout)?;
        let (mut weighted, groups, stop) = self.read_table(&palette)?;

        weighted.sort_by_key(|w| w.order);

        let summary = DecodeSummary {
            syllables: palette.len(),
            groups,
            entries: weighted.len(),
            stop,
        };
        debug!(
            "phrase table: {} entries in {} groups, stopped on {}",
            summary.entries, summary.groups, summary.stop
        );

        Ok(Decoded {
            table: weighted.into_iter().map(|w| w.entry).collect(),
            summary,
        })
    }

    fn read_table(
        &mut self,
        palette: &SyllablePalette,
    ) -> Result<(Vec<WeightedEntry>, u64, StopReason), DecodeError> {
        self.cursor.seek(self.layout.phrase_start)?;

        let mut table = Vec::new();
        let mut groups = 0u64;

        let stop = loop {
            let word_count = self.cursor.read_u16()?;
            if word_count == 0 {
                break StopReason::ZeroWordCount;
            }

            let pinyin = match read_pinyin(&mut self.cursor, palette)? {
                Pinyin::Unresolved { index, offset } => {
                    break StopReason::UnresolvedSyllable { index, offset };
                }
                Pinyin::Resolved(pinyin) if pinyin.is_empty() => {
                    break StopReason::EmptyPronunciation;
                }
                Pinyin::Resolved(pinyin) => pinyin,
            };
            trace!("group {groups}: {word_count} words [{pinyin}]");

            table.reserve(usize::from(word_count));
            for _ in 0..word_count {
                let phrase = self.cursor.read_utf16_string()?;
                let record_len = self.cursor.read_u16()?;
                let order = self.cursor.read_u32()?;
                self.cursor.skip(i64::from(record_len) - 4)?;

                table.push(WeightedEntry {
                    entry: Entry {
                        phrase,
                        pinyin: pinyin.clone(),
                    },
                    order,
                });
            }
            groups += 1;
        };

        Ok((table, groups, stop))
    }
}

enum Pinyin {
    Resolved(String),
    Unresolved { index: u16, offset: u64 },
}

/// Read one group's syllable indices and join the syllables with spaces.
///
/// Stops at the first index the palette cannot resolve; the remaining
/// indices of the group are left unread.
fn read_pinyin<R: Read + Seek>(
    cursor: &mut BinaryCursor<R>,
    palette: &SyllablePalette,
) -> Result<Pinyin, DecodeError> {
    let count = cursor.read_u16()? / 2;

    let mut pinyin = String::new();
    for i in 0..count {
        let index = cursor.read_u16()?;
        let Some(syllable) = palette.get(index) else {
            let offset = cursor.tell()?.saturating_sub(2);
            return Ok(Pinyin::Unresolved { index, offset });
        };
        if i > 0 {
            pinyin.push(' ');
        }
        pinyin.push_str(syllable);
    }
    Ok(Pinyin::Resolved(pinyin))
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Decode a SCEL source into its sorted table.
pub fn decode_table<R: Read + Seek>(reader: R) -> Result<Vec<Entry>, DecodeError> {
    ScelDecoder::from_reader(reader).into_table()
}

/// Decode an in-memory SCEL image.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<Entry>, DecodeError> {
    decode_table(Cursor::new(data))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
