//! Value escaping for the directive grammar
//!
//! | char | escaped |
//! |------|---------|
//! | `%`  | `%25`   |
//! | `,`  | `%2C`   |
//! | `:`  | `%3A`   |
//! | `@`  | `%40`   |
//! | `/`  | `@@`    |
//!
//! Control characters have no representation and are rejected.

use crate::error::{ImageKitError, Result};

/// Escape a directive value so grammar delimiters cannot fragment it
pub fn escape_value(value: &str) -> Result<String> {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            ',' => escaped.push_str("%2C"),
            ':' => escaped.push_str("%3A"),
            '@' => escaped.push_str("%40"),
            '/' => escaped.push_str("@@"),
            c if c.is_control() => {
                return Err(ImageKitError::encoding(format!(
                    "control character U+{:04X} cannot appear in a transformation value",
                    c as u32
                )))
            }
            c => escaped.push(c),
        }
    }
    Ok(escaped)
}

/// Reverse [`escape_value`]
pub fn unescape_value(value: &str) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("@@") {
            out.push('/');
            rest = tail;
        } else if c == '%' {
            let code = rest.get(1..3).ok_or_else(|| truncated(value))?;
            let decoded = match code.to_ascii_uppercase().as_str() {
                "25" => '%',
                "2C" => ',',
                "3A" => ':',
                "40" => '@',
                other => {
                    return Err(ImageKitError::encoding(format!(
                        "unknown escape '%{}' in '{}'",
                        other, value
                    )))
                }
            };
            out.push(decoded);
            rest = &rest[3..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    Ok(out)
}

fn truncated(value: &str) -> ImageKitError {
    ImageKitError::encoding(format!("truncated escape sequence in '{}'", value))
}
