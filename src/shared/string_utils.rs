use crate::error::{FormatError, Result};
use crate::shared::constants::DOUBLE_QUOTE;

/// Escape forms for every code unit below 0xA0. An empty entry means the
/// character is written through unchanged.
///
/// `"` and `\` are required by the JSON grammar; `<` and `>` are escaped so the
/// output can be embedded in HTML.
#[rustfmt::skip]
const COMMON_REPRESENTATIONS: [&str; 160] = [
    // C0 control characters
    "\\u0000", "\\u0001", "\\u0002", "\\u0003", // 0x00
    "\\u0004", "\\u0005", "\\u0006", "\\u0007",
    "\\b",     "\\t",     "\\n",     "\\u000b",
    "\\f",     "\\r",     "\\u000e", "\\u000f",
    "\\u0010", "\\u0011", "\\u0012", "\\u0013", // 0x10
    "\\u0014", "\\u0015", "\\u0016", "\\u0017",
    "\\u0018", "\\u0019", "\\u001a", "\\u001b",
    "\\u001c", "\\u001d", "\\u001e", "\\u001f",
    "", "", "\\\"", "", "",        "", "",        "", // 0x20
    "", "", "",     "", "",        "", "",        "",
    "", "", "",     "", "",        "", "",        "", // 0x30
    "", "", "",     "", "\\u003c", "", "\\u003e", "",
    "", "", "",     "", "",        "", "",        "", // 0x40
    "", "", "",     "", "",        "", "",        "",
    "", "", "",     "", "",        "", "",        "", // 0x50
    "", "", "",     "", "\\\\",    "", "",        "",
    "", "", "",     "", "",        "", "",        "", // 0x60
    "", "", "",     "", "",        "", "",        "",
    "", "", "",     "", "",        "", "",        "", // 0x70
    "", "", "",     "", "",        "", "",        "\\u007f",
    // C1 control characters
    "\\u0080", "\\u0081", "\\u0082", "\\u0083", // 0x80
    "\\u0084", "\\u0085", "\\u0086", "\\u0087",
    "\\u0088", "\\u0089", "\\u008a", "\\u008b",
    "\\u008c", "\\u008d", "\\u008e", "\\u008f",
    "\\u0090", "\\u0091", "\\u0092", "\\u0093", // 0x90
    "\\u0094", "\\u0095", "\\u0096", "\\u0097",
    "\\u0098", "\\u0099", "\\u009a", "\\u009b",
    "\\u009c", "\\u009d", "\\u009e", "\\u009f",
];

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Escape UTF-16 text into the body of a JSON string literal (no quotes).
///
/// # Errors
///
/// Returns [`FormatError::InvalidText`] when a surrogate is not part of a
/// well-formed high/low pair.
pub fn escape_utf16(units: &[u16]) -> Result<String> {
    let mut out = String::with_capacity(units.len());
    push_escaped_utf16(&mut out, units)?;
    Ok(out)
}

/// Escape a Rust string into the body of a JSON string literal (no quotes).
#[must_use]
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    push_escaped_str(&mut out, value);
    out
}

/// Append `value` as a quoted, escaped JSON string.
pub fn push_quoted_str(out: &mut String, value: &str) {
    out.push(DOUBLE_QUOTE);
    push_escaped_str(out, value);
    out.push(DOUBLE_QUOTE);
}

/// Append UTF-16 `units` as a quoted, escaped JSON string.
///
/// # Errors
///
/// Returns [`FormatError::InvalidText`] on an unpaired surrogate.
pub fn push_quoted_utf16(out: &mut String, units: &[u16]) -> Result<()> {
    out.push(DOUBLE_QUOTE);
    push_escaped_utf16(out, units)?;
    out.push(DOUBLE_QUOTE);
    Ok(())
}

/// Append escaped Rust string content.
///
/// A `&str` can never hold an unpaired surrogate, so every supplementary
/// character becomes a well-formed pair of hex escapes.
pub fn push_escaped_str(out: &mut String, value: &str) {
    for unit in value.encode_utf16() {
        if is_high_surrogate(unit) || is_low_surrogate(unit) {
            push_hex_escape(out, unit);
        } else {
            push_escaped_unit(out, unit);
        }
    }
}

/// Append escaped UTF-16 content.
///
/// # Errors
///
/// Returns [`FormatError::InvalidText`] on an unpaired surrogate.
pub fn push_escaped_utf16(out: &mut String, units: &[u16]) -> Result<()> {
    let mut index = 0;
    while index < units.len() {
        let unit = units[index];
        if is_high_surrogate(unit) {
            let low = units
                .get(index + 1)
                .copied()
                .filter(|next| is_low_surrogate(*next))
                .ok_or_else(|| FormatError::unpaired_high_surrogate(index))?;
            push_hex_escape(out, unit);
            push_hex_escape(out, low);
            index += 2;
            continue;
        }
        if is_low_surrogate(unit) {
            return Err(FormatError::unpaired_low_surrogate(index));
        }
        push_escaped_unit(out, unit);
        index += 1;
    }
    Ok(())
}

/// Append one non-surrogate code unit.
fn push_escaped_unit(out: &mut String, unit: u16) {
    if unit < 0xa0 {
        let representation = COMMON_REPRESENTATIONS[usize::from(unit)];
        if representation.is_empty() {
            out.push(char::from(u8::try_from(unit).unwrap_or(b'?')));
        } else {
            out.push_str(representation);
        }
        return;
    }

    if requires_hex_escape(unit) {
        push_hex_escape(out, unit);
        return;
    }

    // Surrogates are routed elsewhere, so every unit here is a scalar value.
    match char::from_u32(u32::from(unit)) {
        Some(ch) => out.push(ch),
        None => push_hex_escape(out, unit),
    }
}

/// Code points that are legal in JSON but are escaped so that embedding the
/// output in HTML or script cannot change how surrounding text is displayed.
#[must_use]
pub const fn requires_hex_escape(unit: u16) -> bool {
    matches!(
        unit,
        0x00ad // soft hyphen
            | 0x06dd // Arabic end of ayah
            | 0x070f // Syriac abbreviation mark
            | 0x17b4..=0x17b5 // Khmer inherent vowels
            | 0xfeff // zero width no-break space
            | 0xfff9..=0xfffb // interlinear annotation marks
            | 0x0600..=0x0603 // Arabic signs
            | 0x200b..=0x200f // zero width and directional marks
            | 0x2028..=0x202e // separators and embedding controls
            | 0x2060..=0x2064 // invisible operators
            | 0x206a..=0x206f // deprecated format characters
    )
}

/// Append `\uXXXX` with four lowercase hex digits.
pub fn push_hex_escape(out: &mut String, unit: u16) {
    out.push_str("\\u");
    for shift in [12u16, 8, 4, 0] {
        out.push(char::from(HEX_DIGITS[usize::from((unit >> shift) & 0xf)]));
    }
}

#[must_use]
pub const fn is_high_surrogate(unit: u16) -> bool {
    matches!(unit, 0xd800..=0xdbff)
}

#[must_use]
pub const fn is_low_surrogate(unit: u16) -> bool {
    matches!(unit, 0xdc00..=0xdfff)
}
