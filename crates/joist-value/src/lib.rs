//! JSON value tree with insertion-ordered objects.
//!
//! A [`Value`] is a tagged variant over the eight JSON kinds: null, bool,
//! signed integer, unsigned integer, double, string, array, and object.
//! Objects preserve the order keys were first introduced, for both iteration
//! and serialization, while keeping O(1) amortized lookup.
//!
//! # Example
//!
//! ```
//! use joist_value::{Format, Value};
//!
//! let mut doc = Value::default();
//! doc["name"] = Value::from("Ada");
//! doc["tags"].push("math").expect("array");
//! doc["tags"].push("computing").expect("array");
//!
//! assert_eq!(doc.to_str().expect("serialize"),
//!            r#"{"name":"Ada","tags":["math","computing"]}"#);
//! assert!(doc.to_str_fmt(&Format::pretty()).expect("serialize").contains('\n'));
//! ```

pub mod error;
pub mod format;
pub mod object;
mod ser;
pub mod value;

pub use error::Error;
pub use format::{Format, FormatKind};
pub use object::Object;
pub use value::{Kind, Value};
