//! Value-tree serialization.

use core::fmt::Write;

use crate::error::Error;
use crate::format::{Format, FormatKind};
use crate::object::Object;
use crate::value::Value;

/// Renders `value` with `format`. On error nothing is exposed; partial
/// output is discarded with the buffer.
pub(crate) fn to_string(value: &Value, format: &Format) -> Result<String, Error> {
    let mut out = String::new();
    write_value(&mut out, value, format, 0)?;
    Ok(out)
}

fn write_value(
    out: &mut String,
    value: &Value,
    format: &Format,
    depth: usize,
) -> Result<(), Error> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Uint(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Double(d) => write_double(out, *d)?,
        Value::Str(s) => write_string(out, s),
        Value::Array(items) => write_array(out, items, format, depth)?,
        Value::Object(obj) => write_object(out, obj, format, depth)?,
    }
    Ok(())
}

/// Doubles print in shortest round-trip form. Finite integral values keep a
/// trailing `.0` so the text re-parses as a double rather than an integer.
#[allow(clippy::float_cmp)]
fn write_double(out: &mut String, d: f64) -> Result<(), Error> {
    if !d.is_finite() {
        return Err(Error::numeric(format!(
            "cannot serialize non-finite double {d}"
        )));
    }
    if d == d.trunc() {
        let _ = write!(out, "{d:.1}");
    } else {
        let _ = write!(out, "{d}");
    }
    Ok(())
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_array(
    out: &mut String,
    items: &[Value],
    format: &Format,
    depth: usize,
) -> Result<(), Error> {
    if items.is_empty() {
        out.push_str("[]");
        return Ok(());
    }
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(&format.item_sep);
        }
        break_line(out, format, depth + 1);
        write_value(out, item, format, depth + 1)?;
    }
    break_line(out, format, depth);
    out.push(']');
    Ok(())
}

fn write_object(
    out: &mut String,
    obj: &Object,
    format: &Format,
    depth: usize,
) -> Result<(), Error> {
    if obj.is_empty() {
        out.push_str("{}");
        return Ok(());
    }
    out.push('{');
    for (i, (key, value)) in obj.iter().enumerate() {
        if i > 0 {
            out.push_str(&format.item_sep);
        }
        break_line(out, format, depth + 1);
        write_string(out, key);
        out.push_str(&format.key_sep);
        write_value(out, value, format, depth + 1)?;
    }
    break_line(out, format, depth);
    out.push('}');
    Ok(())
}

fn break_line(out: &mut String, format: &Format, depth: usize) {
    if format.kind == FormatKind::Pretty {
        out.push('\n');
        for _ in 0..depth * format.indent {
            out.push(' ');
        }
    }
}
