//! Streaming JSON parser over mmap-backed or in-memory input.
//!
//! The parser scans a contiguous byte range character by character, builds a
//! [`joist_value::Value`] tree, and collects [`Stats`] on the way. Input
//! comes from a read-only memory mapping of a file ([`Input::map_file`]) or a
//! borrowed buffer ([`Input::from_bytes`]). Beyond strict RFC 8259 it always
//! accepts `//` and `/* */` comments and radix-prefixed integers; flexible
//! quoting, case-insensitive literals, and the duplicate-key policy are
//! opt-in through [`Control`].
//!
//! # Example
//!
//! ```
//! use joist_parser::{Control, Input, parse};
//!
//! let doc = br#"{"a":1,"b":[true,null,"x"]}"#;
//! let out = parse(&Input::from_bytes(doc), &Control::default())?;
//!
//! assert_eq!(out.root["a"].as_i64()?, 1);
//! assert_eq!(out.stats.keys, 2);
//! assert_eq!(out.stats.max_depth, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod control;
pub mod error;
pub mod input;
pub mod parser;
pub mod schema;
pub mod stats;

pub use control::{Control, DupKey};
pub use error::Error;
pub use input::{Input, MappedFile};
pub use parser::{MAX_DEPTH, Output, parse, parse_with_validator};
pub use schema::Validate;
pub use stats::Stats;
