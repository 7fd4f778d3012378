// Synthetic SCEL images for unit tests.

use super::layout::ScelLayout;

const COMPACT_HEADER_LEN: u64 = 0x10;

/// Builds a SCEL byte image: zeroed header, palette section, phrase table.
pub(crate) struct ScelFixture {
    layout: ScelLayout,
    syllables: Vec<String>,
    filler: bool,
    table: Vec<u8>,
}

impl ScelFixture {
    /// Palette laid out right after a short header, with the phrase table
    /// starting exactly where the last syllable ends.
    pub(crate) fn compact(syllables: &[&str]) -> Self {
        let palette_bytes: u64 = syllables.iter().map(|s| palette_record(s).len() as u64).sum();
        Self {
            layout: ScelLayout {
                pinyin_start: COMPACT_HEADER_LEN,
                phrase_start: COMPACT_HEADER_LEN + palette_bytes,
            },
            syllables: syllables.iter().map(|s| s.to_string()).collect(),
            filler: false,
            table: Vec::new(),
        }
    }

    /// Palette at the real SCEL offsets. The section is padded with one
    /// extra filler syllable so the phrase table lands on 0x2628.
    pub(crate) fn standard(syllables: &[&str]) -> Self {
        Self {
            layout: ScelLayout::default(),
            syllables: syllables.iter().map(|s| s.to_string()).collect(),
            filler: true,
            table: Vec::new(),
        }
    }

    pub(crate) fn layout(&self) -> ScelLayout {
        self.layout
    }

    /// Number of syllables a decoder will see, filler included.
    pub(crate) fn palette_len(&self) -> usize {
        self.syllables.len() + usize::from(self.filler && self.padding() > 0)
    }

    /// Append a phrase group whose words all use a 10-byte record
    /// (order plus 6 trailer bytes).
    pub(crate) fn group(self, indices: &[u16], words: &[(&str, u32)]) -> Self {
        let words: Vec<_> = words
            .iter()
            .map(|&(phrase, order)| (phrase, order, vec![0xA5u8; 6]))
            .collect();
        self.group_with_trailers(indices, &words)
    }

    /// Append a phrase group with explicit per-word trailers.
    pub(crate) fn group_with_trailers(
        mut self,
        indices: &[u16],
        words: &[(&str, u32, Vec<u8>)],
    ) -> Self {
        self.table
            .extend_from_slice(&(words.len() as u16).to_le_bytes());
        self.table
            .extend_from_slice(&((indices.len() * 2) as u16).to_le_bytes());
        for index in indices {
            self.table.extend_from_slice(&index.to_le_bytes());
        }
        for (phrase, order, trailer) in words {
            self.table.extend_from_slice(&utf16_field(phrase));
            self.table
                .extend_from_slice(&((trailer.len() + 4) as u16).to_le_bytes());
            self.table.extend_from_slice(&order.to_le_bytes());
            self.table.extend_from_slice(trailer);
        }
        self
    }

    /// Append raw bytes to the phrase table.
    pub(crate) fn raw(mut self, bytes: &[u8]) -> Self {
        self.table.extend_from_slice(bytes);
        self
    }

    /// Terminate the phrase table with a zero word count.
    pub(crate) fn end(self) -> Self {
        self.raw(&[0, 0])
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.layout.pinyin_start as usize];
        for syllable in &self.syllables {
            out.extend_from_slice(&palette_record(syllable));
        }
        if self.filler {
            let padding = self.padding();
            assert!(
                padding == 0 || padding >= 4,
                "palette leaves {padding} bytes, too few for a filler record"
            );
            if padding > 0 {
                out.extend_from_slice(&(self.syllables.len() as u16).to_le_bytes());
                out.extend_from_slice(&((padding - 4) as u16).to_le_bytes());
                out.resize(out.len() + padding - 4, 0);
            }
        }
        assert_eq!(out.len() as u64, self.layout.phrase_start);
        out.extend_from_slice(&self.table);
        out
    }

    fn padding(&self) -> usize {
        let used: usize = self.syllables.iter().map(|s| palette_record(s).len()).sum();
        self.layout.palette_len() as usize - used
    }
}

pub(crate) fn utf16_field(s: &str) -> Vec<u8> {
    let units: Vec<u16> = s.encode_utf16().collect();
    let mut out = ((units.len() * 2) as u16).to_le_bytes().to_vec();
    for unit in units {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

fn palette_record(syllable: &str) -> Vec<u8> {
    // The leading index is never read back.
    let mut out = vec![0xFF, 0xFF];
    out.extend_from_slice(&utf16_field(syllable));
    out
}
