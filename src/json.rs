//! JSON output for record collections.

use crate::types::{CreatureRecord, Error, OutputFormat};
use std::io::Write;

/// Serializes `records` as one JSON array.
pub fn to_json_array(records: &[CreatureRecord]) -> Result<String, Error> {
    Ok(serde_json::to_string(records)?)
}

/// Serializes `records` as JSON lines, one object per line, each line
/// terminated by `\n`.
pub fn to_json_lines(records: &[CreatureRecord]) -> Result<String, Error> {
    let mut output = String::new();

    for record in records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }

    Ok(output)
}

/// Streams `records` into `writer` in the given layout.
///
/// # Example
/// ```no_run
/// use dfraw_txt_rs_lib::{write_json, OutputFormat, RawReader};
/// use std::{fs::File, io::BufWriter};
///
/// let extraction = RawReader::new().read_dir("data/vanilla");
/// let file = BufWriter::new(File::create("creatures.jsonl").unwrap());
/// write_json(file, &extraction.records, OutputFormat::Lines).unwrap();
/// ```
pub fn write_json<W: Write>(
    mut writer: W,
    records: &[CreatureRecord],
    format: OutputFormat,
) -> Result<(), Error> {
    match format {
        OutputFormat::Array => serde_json::to_writer(&mut writer, records)?,
        OutputFormat::Lines => {
            for record in records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n").map_err(serde_json::Error::io)?;
            }
        }
    }

    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}
