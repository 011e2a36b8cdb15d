use crate::encode::encoders::{begin_entry, close_container, write_list, write_message};
use crate::encode::primitives::write_scalar;
use crate::encode::temporal::{format_duration, format_timestamp};
use crate::error::{FormatError, Result};
use crate::options::ResolvedFormatOptions;
use crate::reflect::{FieldDescriptor, MapKey, ReflectMessage, Value};
use crate::shared::constants::{CLOSE_BRACE, COMMA, KEY_SEPARATOR, NULL_LITERAL, OPEN_BRACE};
use crate::shared::naming::to_json_name;
use crate::shared::string_utils::push_quoted_str;
use crate::well_known::{
    FIELD_MASK_PATHS_FIELD, LIST_VALUE_VALUES_FIELD, NANOS_FIELD, SECONDS_FIELD,
    STRUCT_FIELDS_FIELD, VALUE_BOOL_FIELD, VALUE_LIST_FIELD, VALUE_NULL_FIELD, VALUE_NUMBER_FIELD,
    VALUE_STRING_FIELD, VALUE_STRUCT_FIELD, WRAPPER_VALUE_FIELD, WellKnownType,
};

/// Write the value of a message-typed field.
///
/// The type identity comes from the field's declared message type, falling
/// back to the instance's own descriptor.
///
/// # Errors
///
/// Propagates errors from the type's encoder; a non-message value is an
/// [`FormatError::InvalidSchema`].
pub fn write_message_value(
    out: &mut String,
    field: &FieldDescriptor,
    value: &Value,
    nested: bool,
    options: &ResolvedFormatOptions,
) -> Result<()> {
    match value {
        Value::Null => {
            out.push_str(NULL_LITERAL);
            Ok(())
        }
        Value::Message(message) => {
            let type_name = field
                .message_type
                .as_deref()
                .unwrap_or(&message.descriptor().full_name);
            write_typed_message(out, type_name, message.as_ref(), nested, options)
        }
        other => Err(FormatError::value_mismatch(
            &field.name,
            field.kind.proto_name(),
            other.shape_name(),
        )),
    }
}

/// Write `message` using the bespoke encoding for `type_name` when it names a
/// well-known type, or as an ordinary JSON object otherwise.
///
/// Timestamp, Duration and FieldMask are JSON strings in every position, so
/// `nested` does not change their output.
///
/// # Errors
///
/// Returns [`FormatError::MalformedWellKnown`] when the instance breaks the
/// type's invariants.
pub fn write_typed_message(
    out: &mut String,
    type_name: &str,
    message: &dyn ReflectMessage,
    nested: bool,
    options: &ResolvedFormatOptions,
) -> Result<()> {
    let Some(wkt) = WellKnownType::from_full_name(type_name) else {
        return write_message(out, message, options);
    };
    tracing::trace!(type_name, nested, "writing well-known type");

    match wkt {
        WellKnownType::Timestamp => {
            let (seconds, nanos) = read_seconds_and_nanos(message, type_name)?;
            push_quoted_str(out, &format_timestamp(seconds, nanos)?);
        }
        WellKnownType::Duration => {
            let (seconds, nanos) = read_seconds_and_nanos(message, type_name)?;
            push_quoted_str(out, &format_duration(seconds, nanos));
        }
        WellKnownType::FieldMask => write_field_mask(out, message, type_name)?,
        WellKnownType::Struct => write_struct(out, message, type_name, options)?,
        WellKnownType::ListValue => {
            let field = wkt_field(message, LIST_VALUE_VALUES_FIELD, type_name)?;
            write_list(out, field, &message.get(field), options)?;
        }
        WellKnownType::Value => write_struct_field_value(out, message, type_name, options)?,
        _ => {
            // Wrappers render as their single contained value.
            let field = wkt_field(message, WRAPPER_VALUE_FIELD, type_name)?;
            write_scalar(out, field, &message.get(field))?;
        }
    }
    Ok(())
}

fn wkt_field<'a>(
    message: &'a dyn ReflectMessage,
    number: u32,
    type_name: &str,
) -> Result<&'a FieldDescriptor> {
    message
        .descriptor()
        .field_by_number(number)
        .ok_or_else(|| FormatError::malformed(type_name, format!("missing field number {number}")))
}

fn read_seconds_and_nanos(message: &dyn ReflectMessage, type_name: &str) -> Result<(i64, i32)> {
    let seconds_field = wkt_field(message, SECONDS_FIELD, type_name)?;
    let seconds = match message.get(seconds_field).as_ref() {
        Value::I64(seconds) => *seconds,
        Value::I32(seconds) => i64::from(*seconds),
        other => {
            return Err(FormatError::malformed(
                type_name,
                format!("seconds must be an integer, found {}", other.shape_name()),
            ));
        }
    };

    let nanos_field = wkt_field(message, NANOS_FIELD, type_name)?;
    let nanos = match message.get(nanos_field).as_ref() {
        Value::I32(nanos) => *nanos,
        other => {
            return Err(FormatError::malformed(
                type_name,
                format!("nanos must be an int32, found {}", other.shape_name()),
            ));
        }
    };

    Ok((seconds, nanos))
}

/// Paths converted to JSON names and joined with commas.
fn write_field_mask(out: &mut String, message: &dyn ReflectMessage, type_name: &str) -> Result<()> {
    let field = wkt_field(message, FIELD_MASK_PATHS_FIELD, type_name)?;
    let value = message.get(field);
    let Value::List(paths) = value.as_ref() else {
        return Err(FormatError::malformed(type_name, "paths must be a list"));
    };

    let mut joined = String::new();
    for (idx, path) in paths.iter().enumerate() {
        let Value::String(path) = path else {
            return Err(FormatError::malformed(
                type_name,
                format!("path must be a string, found {}", path.shape_name()),
            ));
        };
        if idx > 0 {
            joined.push(COMMA);
        }
        joined.push_str(&to_json_name(path));
    }
    push_quoted_str(out, &joined);
    Ok(())
}

fn write_struct(
    out: &mut String,
    message: &dyn ReflectMessage,
    type_name: &str,
    options: &ResolvedFormatOptions,
) -> Result<()> {
    let field = wkt_field(message, STRUCT_FIELDS_FIELD, type_name)?;
    let value = message.get(field);
    let Value::Map(entries) = value.as_ref() else {
        return Err(FormatError::malformed(type_name, "fields must be a map"));
    };

    let mut first = true;
    for (key, value) in entries {
        let key = match key {
            MapKey::String(key) if !key.is_empty() => key,
            _ => return Err(FormatError::malformed(type_name, "struct fields cannot have an empty key")),
        };
        let Value::Message(value) = value else {
            return Err(FormatError::malformed(
                type_name,
                format!("struct field '{key}' has no value"),
            ));
        };

        begin_entry(out, first, OPEN_BRACE);
        push_quoted_str(out, key);
        out.push_str(KEY_SEPARATOR);
        write_struct_field_value(out, value.as_ref(), WellKnownType::Value.full_name(), options)?;
        first = false;
    }

    close_container(out, first, OPEN_BRACE, CLOSE_BRACE);
    Ok(())
}

/// A `google.protobuf.Value`, rendered as whichever kind is set.
fn write_struct_field_value(
    out: &mut String,
    message: &dyn ReflectMessage,
    type_name: &str,
    options: &ResolvedFormatOptions,
) -> Result<()> {
    if message.descriptor().oneofs.is_empty() {
        return Err(FormatError::malformed(type_name, "Value message has no kind oneof"));
    }
    let case = message
        .oneof_case(0)
        .ok_or_else(|| FormatError::value_kind_unset(type_name))?;
    let field = wkt_field(message, case, type_name)?;
    let value = message.get(field);

    match case {
        VALUE_NUMBER_FIELD | VALUE_STRING_FIELD | VALUE_BOOL_FIELD => {
            write_scalar(out, field, &value)
        }
        VALUE_STRUCT_FIELD | VALUE_LIST_FIELD => {
            write_message_value(out, field, &value, true, options)
        }
        VALUE_NULL_FIELD => {
            out.push_str(NULL_LITERAL);
            Ok(())
        }
        other => Err(FormatError::unexpected_value_case(type_name, other)),
    }
}
