//! Helper functions available inside bootkube templates.
//!
//! Two functions are registered on every render:
//!
//! - `indent(width=N, text=S)`: replaces every line break in `S` with a line
//!   break followed by `N` spaces. Used to inline PEM blocks into indented
//!   YAML literal scalars; the first line is left alone because the template
//!   already places it at the right column.
//! - `add(a=X, b=Y)`: integer addition.
//!
//! # Examples
//!
//! ```yaml
//! data:
//!   ca-bundle.crt: |
//!     {{ indent(width=4, text=etcd_ca_bundle) }}
//! ports:
//! - port: {{ add(a=2379, b=7600) }}
//! ```

use std::collections::HashMap;
use tera::Value;

/// Replace each `\n` in `text` with `\n` followed by `width` spaces.
///
/// A string without line breaks is returned unchanged.
#[must_use]
pub fn indent(width: usize, text: &str) -> String {
    let newline = format!("\n{}", " ".repeat(width));
    text.replace('\n', &newline)
}

/// Tera entry point for [`indent`].
pub fn indent_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let width = args
        .get("width")
        .and_then(Value::as_u64)
        .ok_or_else(|| tera::Error::msg("indent requires a non-negative integer `width` argument"))?;
    let text = args
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("indent requires a string `text` argument"))?;

    let width = usize::try_from(width)
        .map_err(|_| tera::Error::msg(format!("indent width {width} is too large")))?;

    Ok(Value::String(indent(width, text)))
}

/// Tera entry point for integer addition.
pub fn add_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let a = integer_arg(args, "a")?;
    let b = integer_arg(args, "b")?;
    let sum = a
        .checked_add(b)
        .ok_or_else(|| tera::Error::msg(format!("add overflowed: {a} + {b}")))?;
    Ok(Value::from(sum))
}

fn integer_arg(args: &HashMap<String, Value>, name: &str) -> tera::Result<i64> {
    args.get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| tera::Error::msg(format!("add requires an integer `{name}` argument")))
}
