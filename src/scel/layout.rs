// Fixed section offsets of the SCEL format.
//
// The header before the palette is undocumented and unused here.  Neither
// section carries a length or count field: the palette runs until the
// phrase table begins, and the phrase table runs until a zero word count
// or an unresolvable syllable reference.

/// Absolute offset of the syllable palette.
pub const PINYIN_SECTION_START: u64 = 0x1544;

/// Absolute offset of the phrase table; also the end of the palette.
pub const PHRASE_SECTION_START: u64 = 0x2628;

/// Section offsets used by the decoder.
///
/// `ScelLayout::default()` is the layout of every SCEL file seen in the
/// wild. Other values exist for inspecting shifted or hand-built files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScelLayout {
    /// Where the syllable palette begins.
    pub pinyin_start: u64,
    /// Where the phrase table begins. The palette ends here.
    pub phrase_start: u64,
}

impl ScelLayout {
    /// Size in bytes of the palette section.
    pub fn palette_len(&self) -> u64 {
        self.phrase_start.saturating_sub(self.pinyin_start)
    }
}

impl Default for ScelLayout {
    fn default() -> Self {
        Self {
            pinyin_start: PINYIN_SECTION_START,
            phrase_start: PHRASE_SECTION_START,
        }
    }
}
