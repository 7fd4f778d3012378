// Syllable palette: the pinyin syllables phrase records refer to by index.

use std::io::{Read, Seek};

use log::debug;

use super::cursor::BinaryCursor;
use super::error::DecodeError;
use super::layout::ScelLayout;

/// Ordered pinyin syllables; a syllable's index is its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyllablePalette {
    syllables: Vec<String>,
}

impl SyllablePalette {
    /// Read the palette section described by `layout`.
    ///
    /// Each record is a `u16` index (ignored) followed by a length-prefixed
    /// UTF-16LE syllable. Records are read until the cursor reaches
    /// `layout.phrase_start`; a record that runs past the end of the source
    /// fails the whole read.
    pub fn read<R: Read + Seek>(
        cursor: &mut BinaryCursor<R>,
        layout: &ScelLayout,
    ) -> Result<Self, DecodeError> {
        cursor.seek(layout.pinyin_start)?;

        let mut syllables = Vec::new();
        while cursor.tell()? < layout.phrase_start {
            cursor.skip(2)?;
            syllables.push(cursor.read_utf16_string()?);
        }

        debug!(
            "palette: {} syllables in {:#x}..{:#x}",
            syllables.len(),
            layout.pinyin_start,
            layout.phrase_start
        );
        Ok(Self { syllables })
    }

    /// Syllable at `index`, if the palette is that long.
    #[inline]
    pub fn get(&self, index: u16) -> Option<&str> {
        self.syllables.get(usize::from(index)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.syllables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syllables.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.syllables.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for SyllablePalette {
    fn from(syllables: Vec<String>) -> Self {
        Self { syllables }
    }
}
