//! Canonical debug rendering.
//!
//! The numeric rules are a compatibility contract checked by fixtures:
//! doubles render in their shortest round-trip form with a `.0` suffix when
//! integral, and switch to `%g`-style six-digit scientific notation from
//! magnitude 2^53 - 1 upward (and below 1e-4).

use std::fmt::{self, Write};

use chrono::SecondsFormat;

use super::{Duration, Timestamp, Value};
use crate::recursion::ensure_sufficient_stack;

/// Smallest magnitude rendered in scientific notation.
const SCIENTIFIC_THRESHOLD: f64 = 9_007_199_254_740_991.0;

/// Largest nonzero magnitude rendered in scientific notation at the small end.
const SMALL_THRESHOLD: f64 = 1e-4;

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+infinity" } else { "-infinity" }.to_owned();
    }
    let magnitude = value.abs();
    if magnitude >= SCIENTIFIC_THRESHOLD {
        return format_general(value);
    }
    if magnitude != 0.0 && magnitude < SMALL_THRESHOLD {
        return format_exponent(&format!("{value:e}"));
    }
    let mut out = value.to_string();
    if !out.contains('.') {
        out.push_str(".0");
    }
    out
}

/// `%g` with precision 6: six significant digits, trailing zeros trimmed.
fn format_general(value: f64) -> String {
    let rendered = format!("{value:.5e}");
    let Some((mantissa, exponent)) = rendered.split_once('e') else {
        return rendered;
    };
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    format_exponent(&format!("{mantissa}e{exponent}"))
}

/// Rewrite Rust's `1.5e3` exponent into C's `1.5e+03`.
fn format_exponent(rendered: &str) -> String {
    let Some((mantissa, exponent)) = rendered.split_once('e') else {
        return rendered.to_owned();
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Go-style duration text: `0`, `1h2m3.5s`, `1.5ms`, `-2us`.
pub fn format_duration(duration: Duration) -> String {
    let total =
        i128::from(duration.num_seconds()) * 1_000_000_000 + i128::from(duration.subsec_nanos());
    if total == 0 {
        return "0".to_owned();
    }
    let mut out = String::new();
    if total < 0 {
        out.push('-');
    }
    let mut nanos = total.unsigned_abs();
    if nanos < NANOS_PER_SECOND {
        let (unit, scale, width) = if nanos >= 1_000_000 {
            ("ms", 1_000_000, 6)
        } else if nanos >= 1_000 {
            ("us", 1_000, 3)
        } else {
            ("ns", 1, 0)
        };
        push_fraction(&mut out, nanos / scale, nanos % scale, width);
        out.push_str(unit);
        return out;
    }
    let hours = nanos / NANOS_PER_HOUR;
    nanos %= NANOS_PER_HOUR;
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    let minutes = nanos / NANOS_PER_MINUTE;
    nanos %= NANOS_PER_MINUTE;
    if minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }
    if nanos > 0 {
        push_fraction(
            &mut out,
            nanos / NANOS_PER_SECOND,
            nanos % NANOS_PER_SECOND,
            9,
        );
        out.push('s');
    }
    out
}

fn push_fraction(out: &mut String, whole: u128, fraction: u128, width: usize) {
    let _ = write!(out, "{whole}");
    if fraction > 0 {
        let digits = format!("{fraction:0width$}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
}

/// RFC3339 in UTC, with fractional seconds only when nonzero.
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn write_string_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

fn write_bytes_literal(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("b\"")?;
    for &b in bytes {
        match b {
            b'"' => f.write_str("\\\"")?,
            b'\\' => f.write_str("\\\\")?,
            b'\n' => f.write_str("\\n")?,
            b'\r' => f.write_str("\\r")?,
            b'\t' => f.write_str("\\t")?,
            0x20..=0x7e => f.write_char(char::from(b))?,
            _ => write!(f, "\\x{b:02x}")?,
        }
    }
    f.write_char('"')
}

impl Value<'_> {
    fn write_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Uint(u) => write!(f, "{u}u"),
            Value::Double(d) => f.write_str(&format_double(*d)),
            Value::Duration(d) => f.write_str(&format_duration(*d)),
            Value::Timestamp(t) => f.write_str(&format_timestamp(t)),
            Value::String(s) => write_string_literal(f, s),
            Value::Bytes(b) => write_bytes_literal(f, b),
            Value::Enum(e) => write!(f, "{}({})", e.type_name(), e.number()),
            Value::Type(t) => f.write_str(t.name()),
            Value::Error(e) => write!(f, "{e}"),
            Value::Unknown(_) => f.write_str("*unknown*"),
            Value::List(list) => {
                f.write_char('[')?;
                for (i, element) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_char(']')
            }
            Value::Map(map) => {
                f.write_char('{')?;
                for (i, (key, value)) in map.entries().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_char('}')
            }
            Value::Struct(s) => {
                write!(f, "{}{{", s.type_name())?;
                for (i, (name, value)) in s.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {value}", &**name)?;
                }
                f.write_char('}')
            }
            Value::Opaque(o) => f.write_str(&o.debug_string()),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| self.write_debug(f))
    }
}
