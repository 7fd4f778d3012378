// RIME `.dict.yaml` writer.
//
// A fixed YAML header followed by one `phrase<TAB>pinyin<TAB>1` line per
// entry.  Entries are written in the order given; the header declares
// `sort: by_weight`, so that order is what RIME sees.

use std::io::{self, Write};
use std::path::Path;

use crate::scel::Entry;

/// Weight written on every entry line.
const ENTRY_WEIGHT: u32 = 1;

const DEFAULT_NAME: &str = "scel";
const DEFAULT_VERSION: &str = "1.0";

/// Header fields of a RIME dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictMeta {
    /// Dictionary name; RIME expects it to match the file name stem.
    pub name: String,
    /// Free-form version string, written quoted.
    pub version: String,
}

impl DictMeta {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for DictMeta {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_VERSION)
    }
}

/// Derive a dictionary name from a file path: the file name with a
/// trailing `.dict.yaml`, `.yaml` or `.scel` removed.
pub fn dict_name_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let name = [".dict.yaml", ".yaml", ".scel"]
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
        .unwrap_or(file_name);
    (!name.is_empty()).then(|| name.to_string())
}

/// Formats decoded entries as a RIME dictionary.
#[derive(Debug, Clone, Default)]
pub struct RimeWriter {
    meta: DictMeta,
}

impl RimeWriter {
    pub fn new(meta: DictMeta) -> Self {
        Self { meta }
    }

    pub fn meta(&self) -> &DictMeta {
        &self.meta
    }

    /// Write the header block.
    pub fn write_header<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write!(
            w,
            "---\n\
             name: {}\n\
             version: \"{}\"\n\
             sort: by_weight\n\
             use_preset_vocabulary: false\n\
             ...\n",
            self.meta.name, self.meta.version
        )
    }

    /// Write entry lines only.
    pub fn write_entries<W: Write>(&self, w: &mut W, entries: &[Entry]) -> io::Result<()> {
        for entry in entries {
            writeln!(w, "{}\t{}\t{ENTRY_WEIGHT}", entry.phrase, entry.pinyin)?;
        }
        Ok(())
    }

    /// Write the header followed by every entry.
    pub fn write<W: Write>(&self, w: &mut W, entries: &[Entry]) -> io::Result<()> {
        self.write_header(w)?;
        self.write_entries(w, entries)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
