//! Delimited table reading and writing
//!
//! Reading follows RFC 4180: `,` separates fields, fields may be wrapped in
//! double quotes, a doubled quote inside a quoted field is a literal quote and
//! quoted fields may span lines. Writing quotes only the fields that need it
//! and always starts the file with a UTF-8 byte-order mark.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Byte-order mark written at the start of every output file
pub const BOM: char = '\u{feff}';

/// Parses delimited text into records
///
/// A leading BOM is stripped and blank lines are skipped. An unterminated
/// quote at the end of the input closes the final field instead of failing.
pub fn parse_records(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            // CRLF: the LF ends the record
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => finish_record(&mut records, &mut record, &mut field),
            _ => field.push(c),
        }
    }

    finish_record(&mut records, &mut record, &mut field);
    records
}

fn finish_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    if record.is_empty() && field.is_empty() {
        return;
    }

    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

/// Quotes a field if it contains a delimiter, quote or line break
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Formats one record as a line (including the trailing newline)
pub fn format_record(record: &[String]) -> String {
    let mut line = record
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Writes the BOM followed by every record
pub fn write_records<W: Write>(writer: &mut W, records: &[Vec<String>]) -> io::Result<()> {
    let mut bom = [0u8; 3];
    writer.write_all(BOM.encode_utf8(&mut bom).as_bytes())?;

    for record in records {
        writer.write_all(format_record(record).as_bytes())?;
    }

    writer.flush()
}

/// Builds the output path by inserting `suffix` before a `.csv` extension
///
/// Inputs without a `.csv` extension get `<suffix>.csv` appended to the full
/// file name.
///
/// # Example
///
/// ```
/// use email_enricher::table::output_path_for;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     output_path_for(Path::new("data/leads.csv"), "_updated"),
///     PathBuf::from("data/leads_updated.csv")
/// );
/// ```
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let split = file_name.len().checked_sub(4).filter(|&split| {
        file_name.is_char_boundary(split) && file_name[split..].eq_ignore_ascii_case(".csv")
    });

    let new_name = match split {
        Some(split) => format!("{}{}{}", &file_name[..split], suffix, &file_name[split..]),
        None => format!("{}{}.csv", file_name, suffix),
    };

    input.with_file_name(new_name)
}
