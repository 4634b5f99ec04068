//! Library for extracting structured records from Dwarf Fortress raw files.
//!
//! Raw text is split into `[KEY:VALUE]` tokens by [`tokenize`], fed through a
//! [`ParseContext`] that builds one [`CreatureRecord`] per `[CREATURE:ID]`,
//! and optionally merged across files by a [`RawReader`], which also resolves
//! `[COPY_TAGS_FROM]` references.

mod constants;
mod functions;
pub use constants::UNSET;
pub use functions::{build_object_id, derive_filename, read_to_string_without_bom};

pub mod builder;
pub mod dispatch;
pub mod json;
pub mod reader;
pub mod resolver;
pub mod tokenizer;
pub mod types;

pub use builder::{parse_raw_file, parse_raw_str, ParseContext};
pub use json::{to_json_array, to_json_lines, write_json};
pub use reader::{Extraction, RawReader, RawReaderBuilder};
pub use resolver::resolve_copy_from;
pub use tokenizer::{tokenize, Token};
pub use types::*;
