use crate::{
    constants::UTF8_BOM,
    types::{ObjectType, WarningKind},
};
use encoding_rs::WINDOWS_1252;
use slug::slugify;
use std::{fs::read, path::Path};

/// Reads a raw file, dropping the Byte Order Mark if there's any.
///
/// The game writes its raws in a single-byte code page, so files that aren't
/// valid UTF-8 are decoded as Windows-1252 instead of failing.
pub fn read_to_string_without_bom<P: AsRef<Path>>(
    file_path: P,
) -> std::io::Result<String> {
    let bytes: Vec<u8> = read(file_path.as_ref())?;
    let content: &[u8] = bytes.strip_prefix(&UTF8_BOM).unwrap_or(&bytes[..]);

    Ok(match std::str::from_utf8(content) {
        Ok(text) => text.to_owned(),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(content).0.into_owned(),
    })
}

/// The first non-empty line names the raw file, unless it already holds a
/// tag. In that case the file stem of `path` is used.
pub fn derive_filename(text: &str, path: &Path) -> String {
    if let Some(line) = text.lines().map(str::trim).find(|l| !l.is_empty()) {
        if !line.contains('[') {
            return line.to_owned();
        }
    }

    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[must_use]
pub fn build_object_id(
    filename: &str,
    object_type: ObjectType,
    id: &str,
) -> String {
    format!(
        "{}-{}-{}",
        slugify(filename),
        slugify(object_type.as_key()),
        slugify(id)
    )
}

pub(crate) fn parse_int(value: &str) -> Result<i32, WarningKind> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| WarningKind::InvalidNumber)
}

/// Parses the first `N` colon-separated parts of `value` positionally.
/// Trailing parts are ignored; any missing or malformed part fails the
/// whole tuple.
pub(crate) fn parse_tuple<const N: usize>(
    value: &str,
) -> Result<[i32; N], WarningKind> {
    let mut result: [i32; N] = [0; N];
    let mut parts = value.split(':');

    for slot in &mut result {
        *slot = parse_int(parts.next().ok_or(WarningKind::InvalidValue)?)?;
    }

    Ok(result)
}

/// Splits `value` at its last colon into a text head and an integer tail,
/// e.g. `LOCAL_CREATURE_MAT:MILK:20000`.
pub(crate) fn split_trailing_int(
    value: &str,
) -> Result<(&str, i32), WarningKind> {
    let (head, tail) = value.rsplit_once(':').ok_or(WarningKind::InvalidValue)?;

    if head.is_empty() {
        return Err(WarningKind::InvalidValue);
    }

    Ok((head, parse_int(tail)?))
}

/// `'D'` becomes `D`; numeric code points are kept as written.
pub(crate) fn unquote_tile(value: &str) -> &str {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .filter(|v| !v.is_empty())
        .unwrap_or(value)
}
