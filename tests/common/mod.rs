// Builds SCEL images at the real section offsets for integration tests.

#![allow(dead_code)]

use scel2rime::scel::{PHRASE_SECTION_START, PINYIN_SECTION_START};

pub struct ScelImage {
    syllables: Vec<String>,
    table: Vec<u8>,
}

impl ScelImage {
    pub fn new(syllables: &[&str]) -> Self {
        Self {
            syllables: syllables.iter().map(|s| s.to_string()).collect(),
            table: Vec::new(),
        }
    }

    /// Palette length as the decoder sees it: the given syllables plus one
    /// filler record padding the section out to the phrase table.
    pub fn palette_len(&self) -> usize {
        self.syllables.len() + 1
    }

    /// One group; every word gets `record_length = 10` and a 6-byte trailer.
    pub fn group(mut self, indices: &[u16], words: &[(&str, u32)]) -> Self {
        push_u16(&mut self.table, words.len() as u16);
        push_u16(&mut self.table, (indices.len() * 2) as u16);
        for &index in indices {
            push_u16(&mut self.table, index);
        }
        for &(phrase, order) in words {
            self.table.extend_from_slice(&utf16_field(phrase));
            push_u16(&mut self.table, 10);
            self.table.extend_from_slice(&order.to_le_bytes());
            self.table.extend_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        }
        self
    }

    pub fn end(mut self) -> Self {
        push_u16(&mut self.table, 0);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; PINYIN_SECTION_START as usize];
        for (i, syllable) in self.syllables.iter().enumerate() {
            push_u16(&mut out, i as u16);
            out.extend_from_slice(&utf16_field(syllable));
        }

        let padding = PHRASE_SECTION_START as usize - out.len();
        assert!(padding >= 4, "palette too large for the fixture");
        push_u16(&mut out, self.syllables.len() as u16);
        push_u16(&mut out, (padding - 4) as u16);
        out.resize(PHRASE_SECTION_START as usize, 0);

        out.extend_from_slice(&self.table);
        out
    }
}

pub fn utf16_field(s: &str) -> Vec<u8> {
    let units: Vec<u16> = s.encode_utf16().collect();
    let mut out = Vec::with_capacity(2 + units.len() * 2);
    push_u16(&mut out, (units.len() * 2) as u16);
    for unit in units {
        push_u16(&mut out, unit);
    }
    out
}

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}
