use std::fmt::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{FormatError, Result};
use crate::reflect::{FieldDescriptor, FieldKind, MapKey, Value};
use crate::shared::constants::{
    DOUBLE_QUOTE, FALSE_LITERAL, INFINITY_LITERAL, NAN_LITERAL, NEG_INFINITY_LITERAL,
    TRUE_LITERAL,
};
use crate::shared::string_utils::{push_quoted_str, push_quoted_utf16};

/// Whether `value` has a JSON form for `field`. Only enum numbers without a
/// declared name do not.
#[must_use]
pub fn is_representable(field: &FieldDescriptor, value: &Value) -> bool {
    match (field.kind, value, &field.enum_type) {
        (FieldKind::Enum, Value::Enum(number) | Value::I32(number), Some(enum_type)) => {
            enum_type.find_by_number(*number).is_some()
        }
        _ => true,
    }
}

/// Write a non-message value of `field`'s kind.
///
/// # Errors
///
/// Returns [`FormatError::InvalidSchema`] when the value's shape does not fit
/// the kind, and [`FormatError::InvalidText`] for ill-formed UTF-16 strings.
pub fn write_scalar(out: &mut String, field: &FieldDescriptor, value: &Value) -> Result<()> {
    let kind = field.kind;
    match (kind, value) {
        (FieldKind::Bool, Value::Bool(flag)) => {
            out.push_str(if *flag { TRUE_LITERAL } else { FALSE_LITERAL });
        }
        (FieldKind::Bytes, Value::Bytes(bytes)) => {
            // Base64 output never needs escaping.
            out.push(DOUBLE_QUOTE);
            out.push_str(&STANDARD.encode(bytes));
            out.push(DOUBLE_QUOTE);
        }
        (FieldKind::String, Value::String(text)) => push_quoted_str(out, text),
        (FieldKind::String, Value::Utf16(units)) => push_quoted_utf16(out, units)?,
        (FieldKind::Enum, Value::Enum(number) | Value::I32(number)) => {
            let enum_type = field.enum_type.as_ref().ok_or_else(|| {
                FormatError::invalid_schema(&field.name, "enum field without enum descriptor")
            })?;
            let enum_value = enum_type.find_by_number(*number).ok_or_else(|| {
                FormatError::invalid_schema(
                    &field.name,
                    format!("no name for value {number} in {}", enum_type.full_name),
                )
            })?;
            push_quoted_str(out, &enum_value.name);
        }
        (_, Value::I32(number)) if kind.is_32_bit_integer() => {
            let _ = write!(out, "{number}");
        }
        (_, Value::U32(number)) if kind.is_32_bit_integer() => {
            let _ = write!(out, "{number}");
        }
        (_, Value::I64(number)) if kind.is_64_bit_integer() => push_quoted_integer(out, number),
        (_, Value::U64(number)) if kind.is_64_bit_integer() => push_quoted_integer(out, number),
        (FieldKind::Float | FieldKind::Double, Value::F32(number)) => push_f32(out, *number),
        (FieldKind::Float | FieldKind::Double, Value::F64(number)) => push_f64(out, *number),
        _ => {
            return Err(FormatError::value_mismatch(
                &field.name,
                kind.proto_name(),
                value.shape_name(),
            ));
        }
    }
    Ok(())
}

/// 64-bit integers are quoted so JSON readers with double-only numbers keep
/// every digit.
fn push_quoted_integer(out: &mut String, number: impl std::fmt::Display) {
    let _ = write!(out, "{DOUBLE_QUOTE}{number}{DOUBLE_QUOTE}");
}

pub fn push_f64(out: &mut String, value: f64) {
    if let Some(special) = non_finite_literal(value.is_nan(), value.is_infinite(), value < 0.0) {
        push_special(out, special);
        return;
    }
    let mut buffer = ryu::Buffer::new();
    out.push_str(trim_integral_suffix(buffer.format_finite(value)));
}

pub fn push_f32(out: &mut String, value: f32) {
    if let Some(special) = non_finite_literal(value.is_nan(), value.is_infinite(), value < 0.0) {
        push_special(out, special);
        return;
    }
    let mut buffer = ryu::Buffer::new();
    out.push_str(trim_integral_suffix(buffer.format_finite(value)));
}

/// Shortest round-trip text for a finite double, e.g. `1.5`, `1`, `1e21`.
#[must_use]
pub fn format_f64(value: f64) -> String {
    let mut out = String::new();
    push_f64(&mut out, value);
    out
}

const fn non_finite_literal(nan: bool, infinite: bool, negative: bool) -> Option<&'static str> {
    if nan {
        Some(NAN_LITERAL)
    } else if infinite && negative {
        Some(NEG_INFINITY_LITERAL)
    } else if infinite {
        Some(INFINITY_LITERAL)
    } else {
        None
    }
}

fn push_special(out: &mut String, literal: &str) {
    out.push(DOUBLE_QUOTE);
    out.push_str(literal);
    out.push(DOUBLE_QUOTE);
}

fn trim_integral_suffix(text: &str) -> &str {
    text.strip_suffix(".0").unwrap_or(text)
}

/// Text of a map key, before quoting.
///
/// # Errors
///
/// Returns [`FormatError::InvalidSchema`] for key kinds that cannot be map
/// keys or keys whose shape does not fit the declared kind.
pub fn map_key_text(field: &FieldDescriptor, key_kind: FieldKind, key: &MapKey) -> Result<String> {
    let text = match (key_kind, key) {
        (FieldKind::String, MapKey::String(text)) => text.clone(),
        (FieldKind::Bool, MapKey::Bool(flag)) => {
            (if *flag { TRUE_LITERAL } else { FALSE_LITERAL }).to_string()
        }
        (kind, MapKey::I32(number)) if kind.is_integer() => number.to_string(),
        (kind, MapKey::U32(number)) if kind.is_integer() => number.to_string(),
        (kind, MapKey::I64(number)) if kind.is_integer() => number.to_string(),
        (kind, MapKey::U64(number)) if kind.is_integer() => number.to_string(),
        (kind, _) if kind == FieldKind::String || kind == FieldKind::Bool || kind.is_integer() => {
            return Err(FormatError::value_mismatch(
                &field.name,
                kind.proto_name(),
                key.shape_name(),
            ));
        }
        (kind, _) => return Err(FormatError::invalid_map_key(&field.name, kind)),
    };
    Ok(text)
}
