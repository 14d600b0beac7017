//! Record encoder

use crate::error::Result;
use crate::record::Record;

/// Encode a record to bytes
///
/// Format: `{"k1":"v1","k2":"v2"}`, keys in ascending order.
///
/// Fails with `InvalidFieldName` before producing any output if a field
/// name is empty or reserved.
pub fn encode_record(record: &Record) -> Result<Vec<u8>> {
    record.validate()?;

    // Two quotes per key and value, a colon and a comma per field, braces
    let hint = record
        .iter()
        .map(|(name, value)| name.len() + value.len() + 6)
        .sum::<usize>()
        + 2;

    let mut out = Vec::with_capacity(hint);
    out.push(b'{');
    for (i, (name, value)) in record.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        write_quoted(name, &mut out);
        out.push(b':');
        write_quoted(value, &mut out);
    }
    out.push(b'}');

    Ok(out)
}

/// Append `text` to `out`, escaping `"` and `\` with a backslash
pub fn escape_into(text: &str, out: &mut Vec<u8>) {
    for &byte in text.as_bytes() {
        if byte == b'"' || byte == b'\\' {
            out.push(b'\\');
        }
        out.push(byte);
    }
}

fn write_quoted(text: &str, out: &mut Vec<u8>) {
    out.push(b'"');
    escape_into(text, out);
    out.push(b'"');
}
