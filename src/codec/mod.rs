//! Record Codec
//!
//! Converts records to and from their textual, escaped representation.
//!
//! ## Record Format
//! ```text
//! {"msg":"hi \"there\"","user":"alice"}
//! │└─key─┘ └──escaped value───┘       │
//! └── opening brace     closing brace ┘
//! ```
//!
//! - Keys and values are always double-quoted strings
//! - `"` and `\` inside a key or value are escaped with a backslash
//! - Keys are written in ascending order
//! - No trailing newline (the store adds one per append)
//!
//! ## Decoding
//! The decoder is lenient: it searches for the next `{`, tries to parse an
//! object there, and on failure moves on to the following `{`. Garbage,
//! truncated tails and stray braces are skipped, never reported.

mod encoder;
mod scanner;
mod iterator;

pub use encoder::{encode_record, escape_into};
pub use scanner::decode_record;
pub use iterator::RecordIter;
