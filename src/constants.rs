pub(crate) mod localization {
    pub const PARSED_FILE_MSG: &str = "Parsed file.";
    pub const SKIPPED_FILE_MSG: &str = "Skipped file, couldn't read it.";
    pub const UNSUPPORTED_OBJECT_MSG: &str =
        "Object type isn't supported, no records will be produced for it.";
    pub const RESOLVED_COPY_FROM_MSG: &str = "Resolved copy-from references.";
    pub const MISSING_BASE_MSG: &str = "Base record for copy-from not found";
}

/// Value of a signed scalar or range end that no tag has set.
pub const UNSET: i32 = -1;

pub const OBJECT_KEY: &str = "OBJECT";
pub const CASTE_KEY: &str = "CASTE";
pub const SELECT_CASTE_KEY: &str = "SELECT_CASTE";
/// `SELECT_CASTE` value that targets every caste of the record.
pub const ALL_CASTES: &str = "ALL";

/// `[KEY:VALUE]` or `[KEY]`. Neither part may contain brackets or a line
/// break, so a stray `[` is never matched past the nearest `]`.
pub const TAG_PATTERN: &str = r"\[([^\[\]:\r\n]+):?([^\[\]\r\n]*)\]";

/// Valueless tags starting with these are noise and never reach
/// `attributeTags`.
pub const DROPPED_TAG_PREFIXES: [&str; 2] = ["ATTACK_FLAG_", "TL_"];

pub const DEFAULT_EXTENSION: &str = "txt";

pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
