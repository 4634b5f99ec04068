//! Turns a token stream into finalized records.
//!
//! The builder is a [`ParseContext`] value that is threaded through every
//! token with [`ParseContext::step`]. The open record and the active caste are
//! addressed by index into the context's own collections, so nothing holds a
//! reference across steps.

use crate::{
    constants::{
        localization::UNSUPPORTED_OBJECT_MSG, ALL_CASTES, CASTE_KEY,
        DROPPED_TAG_PREFIXES, OBJECT_KEY, SELECT_CASTE_KEY,
    },
    dispatch::{lookup, Tag},
    functions::{derive_filename, read_to_string_without_bom},
    tokenizer::{tokenize, Token},
    types::{
        CasteRecord, CreatureRecord, Error, ObjectType, RawFile, RawRecord,
        Warning, WarningKind,
    },
};
use log::{debug, trace, warn};
use std::path::Path;
use strum_macros::EnumIs;

/// Which caste, if any, receives caste-scoped tags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum CasteCursor {
    #[default]
    None,
    Active(usize),
    /// `SELECT_CASTE:ALL`: every caste of the record.
    All,
    /// The last `SELECT_CASTE` named a caste this record doesn't have.
    NotFound,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum State {
    /// No `[OBJECT:TYPE]` seen yet.
    #[default]
    NoObject,
    InObject(ObjectType),
    InRecord { index: usize, caste: CasteCursor },
}

#[derive(Debug, Default)]
pub struct ParseContext {
    filename: String,
    object_type: ObjectType,
    state: State,
    records: Vec<CreatureRecord>,
    warnings: Vec<Warning>,
    logging: bool,
}

impl ParseContext {
    #[must_use]
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_owned(),
            ..Default::default()
        }
    }

    /// Emits warnings through `log` as they're raised, in addition to
    /// collecting them on the [`RawFile`].
    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn records(&self) -> &[CreatureRecord] {
        &self.records
    }

    /// Consumes one token and returns the updated context.
    #[must_use]
    pub fn step(mut self, token: Token<'_>) -> Self {
        match token.key {
            OBJECT_KEY => self.open_object(token),
            CASTE_KEY => self.open_caste(token),
            SELECT_CASTE_KEY => self.select_caste(token),
            key if self.opens_record(key) => self.open_record(token.value),
            _ => self.apply(token),
        }

        self
    }

    /// Runs every token of `text` through the context, then finishes it.
    #[must_use]
    pub fn parse(self, text: &str) -> RawFile {
        tokenize(text).fold(self, Self::step).finish()
    }

    /// Finalizes the open record, if any, and hands back everything built.
    #[must_use]
    pub fn finish(mut self) -> RawFile {
        self.finalize_open();

        RawFile {
            filename: self.filename,
            object_type: self.object_type,
            records: self.records,
            warnings: self.warnings,
        }
    }

    fn opens_record(&self, key: &str) -> bool {
        self.object_type.is_supported()
            && !self.state.is_no_object()
            && key == self.object_type.as_key()
    }

    fn open_object(&mut self, token: Token<'_>) {
        self.finalize_open();

        self.object_type = ObjectType::from_value(token.value);
        self.state = State::InObject(self.object_type);

        if !self.object_type.is_supported() {
            if self.logging {
                debug!(
                    "{}: {UNSUPPORTED_OBJECT_MSG} ({})",
                    self.filename, token.value
                );
            }

            self.push_warning(WarningKind::UnsupportedObject, token, None);
        }
    }

    fn open_record(&mut self, id: &str) {
        self.finalize_open();

        self.records.push(CreatureRecord::new(RawRecord::new(
            &self.filename,
            self.object_type,
            id,
        )));
        self.state = State::InRecord {
            index: self.records.len() - 1,
            caste: CasteCursor::None,
        };

        if self.logging {
            trace!("{}: opened {}:{id}", self.filename, self.object_type);
        }
    }

    fn open_caste(&mut self, token: Token<'_>) {
        let State::InRecord { index, ref mut caste } = self.state else {
            return;
        };

        let castes = &mut self.records[index].castes;
        castes.push(CasteRecord::new(token.value));
        *caste = CasteCursor::Active(castes.len() - 1);
    }

    fn select_caste(&mut self, token: Token<'_>) {
        let State::InRecord { index, ref mut caste } = self.state else {
            return;
        };

        *caste = match self.records[index]
            .castes
            .iter()
            .position(|c| c.id == token.value)
        {
            Some(position) => CasteCursor::Active(position),
            None if token.value == ALL_CASTES => CasteCursor::All,
            None => CasteCursor::NotFound,
        };

        if caste.is_not_found() {
            self.warn(WarningKind::UnknownCaste, token);
        }
    }

    fn apply(&mut self, token: Token<'_>) {
        // Outside a record, including under unsupported object types.
        let State::InRecord { index, caste } = self.state else {
            return;
        };

        let record = &mut self.records[index];

        let result = match lookup(token.key) {
            Some(Tag::Record(tag)) => tag.apply(record, token.value),
            Some(Tag::Caste(tag)) => match caste {
                CasteCursor::Active(position) => {
                    tag.apply(&mut record.castes[position], token.value)
                }
                CasteCursor::All if record.castes.is_empty() => {
                    Err(WarningKind::NoActiveCaste)
                }
                // A bad value fails on the first caste, before any change.
                CasteCursor::All => record
                    .castes
                    .iter_mut()
                    .try_for_each(|caste| tag.apply(caste, token.value)),
                CasteCursor::None => Err(WarningKind::NoActiveCaste),
                CasteCursor::NotFound => Err(WarningKind::UnknownCaste),
            },
            None => {
                if token.value.is_empty() && !is_dropped(token.key) {
                    record.attribute_tags.insert(token.key.to_owned());
                } else if self.logging {
                    trace!(
                        "{}:{}: unmapped tag {}",
                        self.filename,
                        token.line,
                        token.key
                    );
                }

                Ok(())
            }
        };

        if let Err(kind) = result {
            self.warn(kind, token);
        }
    }

    fn warn(&mut self, kind: WarningKind, token: Token<'_>) {
        let record = match self.state {
            State::InRecord { index, .. } => {
                Some(self.records[index].id().to_owned())
            }
            _ => None,
        };

        self.push_warning(kind, token, record);

        if self.logging {
            if let Some(warning) = self.warnings.last() {
                warn!("{warning}");
            }
        }
    }

    fn push_warning(
        &mut self,
        kind: WarningKind,
        token: Token<'_>,
        record: Option<String>,
    ) {
        self.warnings.push(Warning {
            kind,
            filename: self.filename.clone(),
            line: token.line,
            key: token.key.to_owned(),
            value: token.value.to_owned(),
            record,
        });
    }

    fn finalize_open(&mut self) {
        if let State::InRecord { index, .. } = self.state {
            self.records[index].raw.finalize();
            self.state = State::InObject(self.object_type);
        }
    }
}

fn is_dropped(key: &str) -> bool {
    DROPPED_TAG_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

/// Parses the text of one raw file. `path` is only used to name the file
/// when its first line doesn't.
#[must_use]
pub fn parse_raw_str<P: AsRef<Path>>(text: &str, path: P) -> RawFile {
    ParseContext::new(&derive_filename(text, path.as_ref())).parse(text)
}

/// Reads and parses one raw file. Only I/O failures are errors.
pub fn parse_raw_file<P: AsRef<Path>>(path: P) -> Result<RawFile, Error> {
    let path = path.as_ref();
    let text = read_to_string_without_bom(path)
        .map_err(|err| Error::Io(path.to_path_buf(), err))?;

    Ok(parse_raw_str(&text, path))
}
