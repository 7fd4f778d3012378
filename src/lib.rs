//! scel2rime: convert Sogou SCEL input-method dictionaries into RIME
//! `.dict.yaml` files.
//!
//! The crate provides:
//! - A SCEL decoder (`scel`)
//! - A RIME dictionary writer (`rime`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use scel2rime::rime::{DictMeta, RimeWriter};
//! use scel2rime::scel;
//!
//! let file = std::fs::File::open("words.scel").unwrap();
//! let table = scel::decode_table(std::io::BufReader::new(file)).unwrap();
//!
//! let mut out = Vec::new();
//! RimeWriter::new(DictMeta::new("words", "1.0"))
//!     .write(&mut out, &table)
//!     .unwrap();
//! ```

pub mod io;
pub mod rime;
pub mod scel;

#[cfg(feature = "cli")]
pub mod cli;
