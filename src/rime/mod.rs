// RIME dictionary output.

pub mod writer;

pub use writer::{DictMeta, RimeWriter, dict_name_from_path};
