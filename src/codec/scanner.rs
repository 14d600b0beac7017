//! Record scanner
//!
//! Byte-at-a-time state machine that pulls one object out of a larger
//! buffer. A failed attempt at one `{` is retried at the next `{`, so the
//! scan only gives up once the buffer is exhausted. A well-formed object
//! that uses a field name the encoder would refuse is skipped whole.

use std::mem;

use crate::record::{validate_field_name, Record, RecordSpan};

/// Scanner position inside a candidate object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Just past `{`: expecting a key or an immediate `}`
    Open,
    /// Past a `,`: expecting a key
    ExpectKey,
    Key,
    KeyEscape,
    ExpectColon,
    ExpectValue,
    Value,
    ValueEscape,
    /// Past a value: expecting `,` or `}`
    ExpectSeparator,
}

/// Outcome of a single parse attempt at one `{`
#[derive(Debug)]
enum Attempt {
    /// A well-formed object with acceptable field names, closing at `close`
    Complete { record: Record, close: usize },
    /// A well-formed object using an empty or reserved field name. Not a
    /// record, but its bytes are skipped as a whole.
    Rejected { close: usize },
    /// Not an object: malformed or truncated
    Invalid,
}

/// Decode the first valid record at or after `start_index`
///
/// Returns `None` when no valid record remains. On success the record's
/// span holds `offset` (from `start_index` to its `{`) and `length` (from
/// `{` to `}`, inclusive), so the next call can start at
/// `start_index + offset + length`.
pub fn decode_record(buf: &[u8], start_index: usize) -> Option<Record> {
    let mut cursor = start_index;

    while let Some(open) = find_open_brace(buf, cursor) {
        cursor = match parse_object(buf, open) {
            Attempt::Complete { mut record, close } => {
                record.set_span(RecordSpan {
                    offset: open - start_index,
                    length: close + 1 - open,
                });
                return Some(record);
            }
            Attempt::Rejected { close } => {
                tracing::trace!(open, close, "object uses a reserved field name, skipping");
                close + 1
            }
            Attempt::Invalid => {
                tracing::trace!(open, "invalid object, retrying at next brace");
                open + 1
            }
        };
    }

    None
}

fn find_open_brace(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .iter()
        .position(|&b| b == b'{')
        .map(|i| from + i)
}

/// Single parse attempt for the object opening at `open`
///
/// Key and value bytes that are not valid UTF-8 are replaced with U+FFFD
/// rather than failing the attempt.
fn parse_object(buf: &[u8], open: usize) -> Attempt {
    let mut state = State::Open;
    let mut span: Vec<u8> = Vec::new();
    let mut pending_key: Option<String> = None;
    let mut record = Record::new();
    let mut rejected = false;

    let finish = |record: Record, rejected: bool, close: usize| {
        if rejected {
            Attempt::Rejected { close }
        } else {
            Attempt::Complete { record, close }
        }
    };

    for (pos, &byte) in buf.iter().enumerate().skip(open + 1) {
        state = match state {
            State::Open | State::ExpectKey => match byte {
                b'"' => State::Key,
                b'}' if state == State::Open => return finish(record, rejected, pos),
                b if b.is_ascii_whitespace() => state,
                _ => return Attempt::Invalid,
            },
            State::Key => match byte {
                b'\\' => State::KeyEscape,
                b'"' => {
                    let key = lossy_string(mem::take(&mut span));
                    rejected |= validate_field_name(&key).is_err();
                    pending_key = Some(key);
                    State::ExpectColon
                }
                _ => {
                    span.push(byte);
                    State::Key
                }
            },
            State::Value => match byte {
                b'\\' => State::ValueEscape,
                b'"' => {
                    let value = lossy_string(mem::take(&mut span));
                    if let Some(key) = pending_key.take() {
                        record.insert(key, value);
                    }
                    State::ExpectSeparator
                }
                _ => {
                    span.push(byte);
                    State::Value
                }
            },
            // The escaped byte is taken literally, whatever it is
            State::KeyEscape => {
                span.push(byte);
                State::Key
            }
            State::ValueEscape => {
                span.push(byte);
                State::Value
            }
            State::ExpectColon => match byte {
                b':' => State::ExpectValue,
                b if b.is_ascii_whitespace() => state,
                _ => return Attempt::Invalid,
            },
            State::ExpectValue => match byte {
                b'"' => State::Value,
                b if b.is_ascii_whitespace() => state,
                _ => return Attempt::Invalid,
            },
            State::ExpectSeparator => match byte {
                b',' => State::ExpectKey,
                b'}' => return finish(record, rejected, pos),
                b if b.is_ascii_whitespace() => state,
                _ => return Attempt::Invalid,
            },
        };
    }

    // Ran off the end: truncated object
    Attempt::Invalid
}

fn lossy_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
