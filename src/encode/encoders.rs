use crate::encode::primitives::{is_representable, map_key_text, write_scalar};
use crate::encode::well_known::write_message_value;
use crate::error::{FormatError, Result};
use crate::options::ResolvedFormatOptions;
use crate::reflect::{FieldDescriptor, ReflectMessage, Value};
use crate::shared::constants::{
    CLOSE_BRACE, CLOSE_BRACKET, ENTRY_SEPARATOR, KEY_SEPARATOR, OPEN_BRACE, OPEN_BRACKET,
};
use crate::shared::naming::to_json_name;
use crate::shared::string_utils::push_quoted_str;

/// Write `message` as a JSON object, fields in ascending number order.
///
/// A field is skipped when it belongs to a oneof whose active case is a
/// different member, when it holds its default value (unless defaults are
/// emitted or it is the active oneof member), or when it is a singular enum
/// whose number has no name.
///
/// # Errors
///
/// Propagates value writer errors.
pub fn write_message(
    out: &mut String,
    message: &dyn ReflectMessage,
    options: &ResolvedFormatOptions,
) -> Result<()> {
    let descriptor = message.descriptor();
    let oneof_cases: Vec<Option<u32>> = (0..descriptor.oneofs.len())
        .map(|index| message.oneof_case(index))
        .collect();

    let mut first = true;
    for field in descriptor.fields_in_number_order() {
        let active_member = match field.oneof_index {
            Some(index) => {
                if oneof_cases.get(index).copied().flatten() != Some(field.number) {
                    continue;
                }
                true
            }
            None => false,
        };

        let value = message.get(field);
        if !active_member && !options.emit_default_values && value.is_default_for(field) {
            continue;
        }
        if field.is_singular() && !is_representable(field, &value) {
            tracing::debug!(
                message_type = %descriptor.full_name,
                field = %field.name,
                "skipping enum value without a name"
            );
            continue;
        }

        begin_entry(out, first, OPEN_BRACE);
        push_quoted_str(out, &to_json_name(&field.name));
        out.push_str(KEY_SEPARATOR);
        write_field_value(out, field, &value, options)?;
        first = false;
    }

    close_container(out, first, OPEN_BRACE, CLOSE_BRACE);
    Ok(())
}

/// Write a field's whole value: a map, a list, or a single value.
///
/// # Errors
///
/// Propagates value writer errors.
pub fn write_field_value(
    out: &mut String,
    field: &FieldDescriptor,
    value: &Value,
    options: &ResolvedFormatOptions,
) -> Result<()> {
    if field.is_map() {
        write_map(out, field, value, options)
    } else if field.is_list() {
        write_list(out, field, value, options)
    } else {
        write_single_value(out, field, value, options)
    }
}

/// Write one element-level value. Message kinds go through the well-known
/// type dispatcher, everything else through the scalar writer.
///
/// # Errors
///
/// Propagates value writer errors.
pub fn write_single_value(
    out: &mut String,
    field: &FieldDescriptor,
    value: &Value,
    options: &ResolvedFormatOptions,
) -> Result<()> {
    if field.kind.is_message() {
        write_message_value(out, field, value, true, options)
    } else {
        write_scalar(out, field, value)
    }
}

/// Write a repeated field as `[ a, b ]`, or `[]` when nothing is written.
///
/// # Errors
///
/// Returns [`FormatError::InvalidSchema`] when `value` is not a list.
pub fn write_list(
    out: &mut String,
    field: &FieldDescriptor,
    value: &Value,
    options: &ResolvedFormatOptions,
) -> Result<()> {
    let Value::List(items) = value else {
        return Err(FormatError::value_mismatch(&field.name, "list", value.shape_name()));
    };

    let mut first = true;
    for item in items {
        if !is_representable(field, item) {
            tracing::debug!(field = %field.name, "skipping list element without a name");
            continue;
        }
        begin_entry(out, first, OPEN_BRACKET);
        write_single_value(out, field, item, options)?;
        first = false;
    }

    close_container(out, first, OPEN_BRACKET, CLOSE_BRACKET);
    Ok(())
}

/// Write a map field as `{ "k": v }` in entry order, keys always quoted.
///
/// # Errors
///
/// Returns [`FormatError::InvalidSchema`] for a map field without an entry
/// description, a value that is not a map, or an unsupported key kind.
pub fn write_map(
    out: &mut String,
    field: &FieldDescriptor,
    value: &Value,
    options: &ResolvedFormatOptions,
) -> Result<()> {
    let entry = field
        .map_entry
        .as_ref()
        .ok_or_else(|| FormatError::invalid_schema(&field.name, "map field without entry type"))?;
    let Value::Map(entries) = value else {
        return Err(FormatError::value_mismatch(&field.name, "map", value.shape_name()));
    };

    let mut first = true;
    for (key, item) in entries {
        if !is_representable(&entry.value, item) {
            tracing::debug!(field = %field.name, "skipping map entry without a name");
            continue;
        }
        let key_text = map_key_text(field, entry.key_kind, key)?;

        begin_entry(out, first, OPEN_BRACE);
        push_quoted_str(out, &key_text);
        out.push_str(KEY_SEPARATOR);
        write_single_value(out, &entry.value, item, options)?;
        first = false;
    }

    close_container(out, first, OPEN_BRACE, CLOSE_BRACE);
    Ok(())
}

/// Open the container before the first entry, separate later ones.
pub(crate) fn begin_entry(out: &mut String, first: bool, open: char) {
    if first {
        out.push(open);
        out.push(' ');
    } else {
        out.push_str(ENTRY_SEPARATOR);
    }
}

/// `{}` / `[]` when nothing was written, otherwise ` }` / ` ]`.
pub(crate) fn close_container(out: &mut String, empty: bool, open: char, close: char) {
    if empty {
        out.push(open);
    } else {
        out.push(' ');
    }
    out.push(close);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::options::resolve_format_options;
    use crate::reflect::{DynamicMessage, EnumDescriptor, FieldKind, MapKey, MessageDescriptor};

    fn render(message: &DynamicMessage, emit_defaults: bool) -> String {
        let options = ResolvedFormatOptions {
            emit_default_values: emit_defaults,
        };
        let mut out = String::new();
        write_message(&mut out, message, &options).unwrap();
        out
    }

    fn color() -> Arc<EnumDescriptor> {
        Arc::new(EnumDescriptor::new("test.Color", [("RED", 0), ("GREEN", 1)]))
    }

    fn sample_descriptor() -> Arc<MessageDescriptor> {
        Arc::new(
            MessageDescriptor::new("test.Sample")
                .with_oneof("choice")
                .with_field(FieldDescriptor::new("b", 2, FieldKind::Int32))
                .with_field(FieldDescriptor::new("a", 1, FieldKind::String))
                .with_field(FieldDescriptor::new("tags", 3, FieldKind::String).repeated())
                .with_field(FieldDescriptor::map(
                    "counts",
                    4,
                    FieldKind::String,
                    FieldDescriptor::map_value(FieldKind::Int64),
                ))
                .with_field(FieldDescriptor::new("color", 5, FieldKind::Enum).with_enum(color()))
                .with_field(FieldDescriptor::new("name", 6, FieldKind::String).in_oneof(0))
                .with_field(FieldDescriptor::new("id", 7, FieldKind::Int32).in_oneof(0)),
        )
    }

    #[test]
    fn default_message_is_empty_object() {
        let message = DynamicMessage::new(sample_descriptor());
        assert_eq!(render(&message, false), "{}");
    }

    #[test]
    fn fields_follow_number_order() {
        let message = DynamicMessage::new(sample_descriptor())
            .with(2, 7_i32)
            .with(1, "x");
        assert_eq!(render(&message, false), r#"{ "a": "x", "b": 7 }"#);
    }

    #[test]
    fn emit_defaults_writes_every_non_oneof_field() {
        let message = DynamicMessage::new(sample_descriptor());
        assert_eq!(
            render(&message, true),
            r#"{ "a": "", "b": 0, "tags": [], "counts": {}, "color": "RED" }"#
        );
    }

    #[test]
    fn active_oneof_member_is_written_even_when_default() {
        let message = DynamicMessage::new(sample_descriptor()).with(7, 0_i32);
        assert_eq!(render(&message, false), r#"{ "id": 0 }"#);
    }

    #[test]
    fn unnamed_enum_values_are_skipped() {
        let message = DynamicMessage::new(sample_descriptor()).with(5, Value::Enum(9));
        assert_eq!(render(&message, false), "{}");

        let descriptor = Arc::new(MessageDescriptor::new("test.Colors").with_field(
            FieldDescriptor::new("colors", 1, FieldKind::Enum)
                .repeated()
                .with_enum(color()),
        ));
        let message = DynamicMessage::new(descriptor).with(
            1,
            vec![Value::Enum(1), Value::Enum(9), Value::Enum(0)],
        );
        assert_eq!(render(&message, false), r#"{ "colors": [ "GREEN", "RED" ] }"#);
    }

    #[test]
    fn maps_keep_entry_order_and_quote_keys() {
        let message = DynamicMessage::new(sample_descriptor()).with(
            4,
            vec![
                (MapKey::from("z"), Value::I64(1)),
                (MapKey::from("a"), Value::I64(2)),
            ],
        );
        assert_eq!(render(&message, false), r#"{ "counts": { "z": "1", "a": "2" } }"#);
    }

    #[test]
    fn map_without_entry_is_schema_error() {
        let broken = FieldDescriptor {
            map_entry: None,
            ..FieldDescriptor::map(
                "broken",
                1,
                FieldKind::String,
                FieldDescriptor::map_value(FieldKind::Int32),
            )
        };
        let options = resolve_format_options(None);
        let mut out = String::new();
        let err = write_map(&mut out, &broken, &Value::Map(Vec::new()), &options).unwrap_err();
        assert!(matches!(err, FormatError::InvalidSchema { .. }));
    }
}
