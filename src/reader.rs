use crate::{
    builder::ParseContext,
    constants::{
        localization::{
            PARSED_FILE_MSG, RESOLVED_COPY_FROM_MSG, SKIPPED_FILE_MSG,
        },
        DEFAULT_EXTENSION,
    },
    functions::{derive_filename, read_to_string_without_bom},
    resolver::resolve_copy_from,
    types::{CreatureRecord, Error, RawFile, Warning},
};
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Merged output of a directory scan.
///
/// Per-file failures don't stop the scan; they end up in `errors` and the
/// remaining files are still parsed.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub records: Vec<CreatureRecord>,
    pub warnings: Vec<Warning>,
    pub errors: Vec<Error>,
    pub files_parsed: usize,
}

/// Reads raw files from directories into records.
///
/// # Fields
/// - `recursive`: Descends into subdirectories. Use [`RawReader::set_recursive`] to set it.
/// - `parallel`: Parses files on the `rayon` thread pool. Use [`RawReader::set_parallel`] to set it.
/// - `resolve_copy_from`: Runs the copy-from pass over the merged records. Use [`RawReader::set_resolve_copy_from`] to set it.
/// - `logging`: If enabled, logs parsed files and warnings. As this crate uses `log` for logging, you should [set up logging in your program](https://docs.rs/log/latest/log/#available-logging-implementations).
/// - `extension`: Extension of the files to parse, compared case-insensitively. `txt` by default.
///
/// # Example
/// ```no_run
/// use dfraw_txt_rs_lib::RawReaderBuilder;
///
/// let reader = RawReaderBuilder::new().logging(true).build();
/// let extraction = reader.read_dir("C:/Games/Dwarf Fortress/data/vanilla");
/// ```
#[derive(Debug, Clone)]
pub struct RawReader {
    recursive: bool,
    parallel: bool,
    resolve_copy_from: bool,
    logging: bool,
    extension: String,
}

impl Default for RawReader {
    fn default() -> Self {
        Self {
            recursive: true,
            parallel: true,
            resolve_copy_from: true,
            logging: false,
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }
}

impl RawReader {
    /// Creates a new [`RawReader`]. Scans are recursive, parallel and
    /// resolve copy-from references; logging is off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_recursive(&mut self, enabled: bool) {
        self.recursive = enabled;
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn set_resolve_copy_from(&mut self, enabled: bool) {
        self.resolve_copy_from = enabled;
    }

    /// Sets whether to output logs.
    ///
    /// As this crate uses `log` for logging, you should [set up logging in your program](https://docs.rs/log/latest/log/#available-logging-implementations).
    pub fn set_logging(&mut self, enabled: bool) {
        self.logging = enabled;
    }

    pub fn set_extension(&mut self, extension: &str) {
        self.extension = extension.trim_start_matches('.').to_owned();
    }

    /// Parses a single raw file. Copy-from references are left unresolved,
    /// since their bases usually live in other files.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<RawFile, Error> {
        let path = path.as_ref();
        let text = read_to_string_without_bom(path)
            .map_err(|err| Error::Io(path.to_path_buf(), err))?;

        Ok(ParseContext::new(&derive_filename(&text, path))
            .with_logging(self.logging)
            .parse(&text))
    }

    /// Parses every matching file under `dir`.
    ///
    /// # Example
    /// ```no_run
    /// use dfraw_txt_rs_lib::RawReader;
    ///
    /// let extraction = RawReader::new().read_dir("data/vanilla/vanilla_creatures/objects");
    /// println!("{} creatures", extraction.records.len());
    /// ```
    pub fn read_dir<P: AsRef<Path>>(&self, dir: P) -> Extraction {
        self.read_dirs([dir])
    }

    /// Parses every matching file under each of `dirs`, then merges the
    /// results in path order. Copy-from references are then resolved over
    /// the merged records; since a base id is built from the referencing
    /// record's own file name, only bases from the same file are found.
    pub fn read_dirs<I, P>(&self, dirs: I) -> Extraction
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut extraction = Extraction::default();
        let mut paths = Vec::new();

        for dir in dirs {
            self.collect_paths(
                dir.as_ref(),
                &mut paths,
                &mut extraction.errors,
            );
        }

        let parsed: Vec<Result<RawFile, Error>> = if self.parallel {
            paths.par_iter().map(|path| self.read_file(path)).collect()
        } else {
            paths.iter().map(|path| self.read_file(path)).collect()
        };

        for (path, result) in paths.iter().zip(parsed) {
            match result {
                Ok(file) => {
                    if self.logging {
                        info!(
                            "{}: {PARSED_FILE_MSG} ({} records)",
                            path.display(),
                            file.records.len()
                        );
                    }

                    extraction.files_parsed += 1;
                    extraction.records.extend(file.records);
                    extraction.warnings.extend(file.warnings);
                }
                Err(err) => {
                    if self.logging {
                        warn!("{SKIPPED_FILE_MSG} {err}");
                    }

                    extraction.errors.push(err);
                }
            }
        }

        if self.resolve_copy_from {
            let changed = resolve_copy_from(&mut extraction.records);

            if self.logging {
                info!("{RESOLVED_COPY_FROM_MSG} ({changed} records changed)");
            }
        }

        extraction
    }

    fn collect_paths(
        &self,
        dir: &Path,
        paths: &mut Vec<PathBuf>,
        errors: &mut Vec<Error>,
    ) {
        if !dir.is_dir() {
            errors.push(Error::NotADirectory(dir.to_path_buf()));
            return;
        }

        let walker = WalkDir::new(dir)
            .max_depth(if self.recursive { usize::MAX } else { 1 })
            .sort_by_file_name();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file()
                        && self.has_extension(entry.path())
                    {
                        paths.push(entry.into_path());
                    }
                }
                Err(err) => {
                    let path = err.path().unwrap_or(dir).to_path_buf();
                    errors.push(Error::Io(path, err.into()));
                }
            }
        }
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

/// A builder struct for [`RawReader`].
///
/// # Example
/// ```no_run
/// use dfraw_txt_rs_lib::RawReaderBuilder;
///
/// let reader = RawReaderBuilder::new()
///     .recursive(false)
///     .resolve_copy_from(false)
///     .build();
/// ```
#[derive(Default)]
pub struct RawReaderBuilder {
    reader: RawReader,
}

impl RawReaderBuilder {
    /// Creates a new [`RawReaderBuilder`] holding the [`RawReader`] defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.reader.recursive = enabled;
        self
    }

    #[must_use]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.reader.parallel = enabled;
        self
    }

    #[must_use]
    pub fn resolve_copy_from(mut self, enabled: bool) -> Self {
        self.reader.resolve_copy_from = enabled;
        self
    }

    /// Sets whether to output logs.
    ///
    /// As this crate uses `log` for logging, you should [set up logging in your program](https://docs.rs/log/latest/log/#available-logging-implementations).
    #[must_use]
    pub fn logging(mut self, enabled: bool) -> Self {
        self.reader.logging = enabled;
        self
    }

    /// Extension of the files to parse, with or without the leading dot.
    #[must_use]
    pub fn extension(mut self, extension: &str) -> Self {
        self.reader.set_extension(extension);
        self
    }

    #[must_use]
    pub fn build(self) -> RawReader {
        self.reader
    }
}
