// SCEL dictionary decoding.
//
// # Modules
//
// - `cursor`  — Little-endian reads and length-prefixed UTF-16LE strings
// - `layout`  — Fixed section offsets
// - `palette` — Syllable palette section
// - `decoder` — Phrase table decoding, ordering and caching
// - `error`   — Decode error type

pub mod cursor;
pub mod decoder;
pub mod error;
pub mod layout;
pub mod palette;

#[cfg(test)]
pub(crate) mod fixture;

pub use cursor::BinaryCursor;
pub use decoder::{DecodeSummary, Entry, ScelDecoder, StopReason, decode_bytes, decode_table};
pub use error::DecodeError;
pub use layout::{PHRASE_SECTION_START, PINYIN_SECTION_START, ScelLayout};
pub use palette::SyllablePalette;
