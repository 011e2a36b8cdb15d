//! Fixture documents: a declarative schema plus one instance of it.
//!
//! ```json
//! {
//!   "enums": [{ "name": "demo.Color", "values": [{ "name": "RED", "number": 0 }] }],
//!   "messages": [{
//!     "name": "demo.Paint",
//!     "fields": [
//!       { "name": "color", "number": 1, "type": "enum", "enum": "demo.Color" },
//!       { "name": "labels", "number": 2, "type": "map", "key": "string",
//!         "value": { "type": "int32" } }
//!     ]
//!   }],
//!   "type": "demo.Paint",
//!   "message": { "color": "RED", "labels": { "a": 1 } }
//! }
//! ```
//!
//! Well-known type descriptors are always registered, so instances of them are
//! written in their plain field layout, e.g. `{ "seconds": 1, "nanos": 5 }`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{FormatError, Result};
use crate::reflect::{
    DynamicMessage, EnumDescriptor, FieldDescriptor, FieldKind, MapKey, MessageDescriptor, Value,
};
use crate::well_known::WellKnownType;

const MAP_TYPE: &str = "map";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureDocument {
    #[serde(default)]
    pub enums: Vec<EnumSpec>,
    #[serde(default)]
    pub messages: Vec<MessageSpec>,
    /// Full name of the instance's message type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Field values keyed by field name; `null` stands for an absent message.
    #[serde(default = "empty_object")]
    pub message: JsonValue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumSpec {
    pub name: String,
    pub values: Vec<EnumValueSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumValueSpec {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageSpec {
    pub name: String,
    #[serde(default)]
    pub oneofs: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    pub number: u32,
    /// `.proto` type name, or `map`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, rename = "enum")]
    pub enum_type: Option<String>,
    #[serde(default, rename = "message")]
    pub message_type: Option<String>,
    #[serde(default)]
    pub repeated: bool,
    #[serde(default)]
    pub oneof: Option<String>,
    /// Key type of a map field.
    #[serde(default)]
    pub key: Option<String>,
    /// Value type of a map field.
    #[serde(default)]
    pub value: Option<TypeSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, rename = "enum")]
    pub enum_type: Option<String>,
    #[serde(default, rename = "message")]
    pub message_type: Option<String>,
}

fn empty_object() -> JsonValue {
    JsonValue::Object(serde_json::Map::new())
}

/// Parse a fixture document from JSON text.
///
/// # Errors
///
/// Returns [`FormatError::Json`] when the text is not a fixture document.
pub fn parse_document(text: &str) -> Result<FixtureDocument> {
    serde_json::from_str(text).map_err(|err| FormatError::json_parse(&err))
}

/// Parse a fixture document and build its instance.
///
/// Returns `None` when the document's `message` is `null`.
///
/// # Errors
///
/// Returns [`FormatError::Json`] for unparseable text and
/// [`FormatError::Fixture`] when the instance does not fit the schema.
pub fn load_message(text: &str) -> Result<Option<DynamicMessage>> {
    let document = parse_document(text)?;
    let registry = SchemaRegistry::from_document(&document)?;
    registry.instance(&document.type_name, &document.message)
}

/// Descriptors declared by a fixture, plus every well-known type.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    enums: HashMap<String, Arc<EnumDescriptor>>,
    messages: HashMap<String, Arc<MessageDescriptor>>,
}

impl SchemaRegistry {
    /// Registry holding only the well-known types.
    #[must_use]
    pub fn with_well_known_types() -> Self {
        let mut registry = Self::default();
        for wkt in WellKnownType::all() {
            registry
                .messages
                .insert(wkt.full_name().to_string(), wkt.descriptor());
        }
        let null_value = crate::well_known::null_value_enum();
        registry
            .enums
            .insert(null_value.full_name.clone(), null_value);
        registry
    }

    /// # Errors
    ///
    /// Returns [`FormatError::Fixture`] for unknown type names, duplicate
    /// declarations, or malformed field declarations.
    pub fn from_document(document: &FixtureDocument) -> Result<Self> {
        let mut registry = Self::with_well_known_types();

        for spec in &document.enums {
            let descriptor = EnumDescriptor::new(
                spec.name.clone(),
                spec.values.iter().map(|value| (value.name.clone(), value.number)),
            );
            if registry
                .enums
                .insert(spec.name.clone(), Arc::new(descriptor))
                .is_some()
            {
                return Err(FormatError::fixture(format!("enum '{}' declared twice", spec.name)));
            }
        }

        for spec in &document.messages {
            let descriptor = registry.build_message(spec)?;
            if registry
                .messages
                .insert(spec.name.clone(), Arc::new(descriptor))
                .is_some()
            {
                return Err(FormatError::fixture(format!(
                    "message '{}' declared twice",
                    spec.name
                )));
            }
        }

        tracing::debug!(
            enums = registry.enums.len(),
            messages = registry.messages.len(),
            "loaded fixture schema"
        );
        Ok(registry)
    }

    /// # Errors
    ///
    /// Returns [`FormatError::Fixture`] when `name` is not registered.
    pub fn message(&self, name: &str) -> Result<&Arc<MessageDescriptor>> {
        self.messages
            .get(name)
            .ok_or_else(|| FormatError::fixture(format!("unknown message type '{name}'")))
    }

    fn enum_type(&self, name: &str) -> Result<Arc<EnumDescriptor>> {
        self.enums
            .get(name)
            .map(Arc::clone)
            .ok_or_else(|| FormatError::fixture(format!("unknown enum type '{name}'")))
    }

    fn build_message(&self, spec: &MessageSpec) -> Result<MessageDescriptor> {
        let mut descriptor = MessageDescriptor::new(spec.name.clone());
        for oneof in &spec.oneofs {
            descriptor = descriptor.with_oneof(oneof.clone());
        }

        for field_spec in &spec.fields {
            let context = || format!("{}.{}", spec.name, field_spec.name);
            let mut field = if field_spec.kind == MAP_TYPE {
                let key = field_spec.key.as_deref().ok_or_else(|| {
                    FormatError::fixture(format!("map field '{}' has no key type", context()))
                })?;
                let key_kind = parse_kind(key, &context())?;
                let value_spec = field_spec.value.as_ref().ok_or_else(|| {
                    FormatError::fixture(format!("map field '{}' has no value type", context()))
                })?;
                let value = self.typed_field(
                    FieldDescriptor::map_value(parse_kind(&value_spec.kind, &context())?),
                    value_spec.enum_type.as_deref(),
                    value_spec.message_type.as_deref(),
                    &context(),
                )?;
                FieldDescriptor::map(field_spec.name.clone(), field_spec.number, key_kind, value)
            } else {
                let kind = parse_kind(&field_spec.kind, &context())?;
                let field = self.typed_field(
                    FieldDescriptor::new(field_spec.name.clone(), field_spec.number, kind),
                    field_spec.enum_type.as_deref(),
                    field_spec.message_type.as_deref(),
                    &context(),
                )?;
                if field_spec.repeated {
                    field.repeated()
                } else {
                    field
                }
            };

            if let Some(oneof) = &field_spec.oneof {
                let index = spec
                    .oneofs
                    .iter()
                    .position(|name| name == oneof)
                    .ok_or_else(|| {
                        FormatError::fixture(format!(
                            "field '{}' names undeclared oneof '{oneof}'",
                            context()
                        ))
                    })?;
                field = field.in_oneof(index);
            }
            descriptor = descriptor.with_field(field);
        }
        Ok(descriptor)
    }

    fn typed_field(
        &self,
        field: FieldDescriptor,
        enum_type: Option<&str>,
        message_type: Option<&str>,
        context: &str,
    ) -> Result<FieldDescriptor> {
        match field.kind {
            FieldKind::Enum => {
                let name = enum_type.ok_or_else(|| {
                    FormatError::fixture(format!("enum field '{context}' has no enum type"))
                })?;
                Ok(field.with_enum(self.enum_type(name)?))
            }
            FieldKind::Message | FieldKind::Group => {
                let name = message_type.ok_or_else(|| {
                    FormatError::fixture(format!("message field '{context}' has no message type"))
                })?;
                Ok(field.with_message_type(name))
            }
            _ => Ok(field),
        }
    }

    /// Build an instance of `type_name` from loose JSON; `null` gives `None`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Fixture`] when the JSON does not fit the schema.
    pub fn instance(&self, type_name: &str, json: &JsonValue) -> Result<Option<DynamicMessage>> {
        if json.is_null() {
            return Ok(None);
        }
        self.build_instance(type_name, json).map(Some)
    }

    fn build_instance(&self, type_name: &str, json: &JsonValue) -> Result<DynamicMessage> {
        let descriptor = self.message(type_name)?;
        let JsonValue::Object(entries) = json else {
            return Err(FormatError::fixture(format!(
                "instance of '{type_name}' must be a JSON object"
            )));
        };

        let mut message = DynamicMessage::new(Arc::clone(descriptor));
        for (name, raw) in entries {
            let field = descriptor.field_by_name(name).ok_or_else(|| {
                FormatError::fixture(format!("'{type_name}' has no field '{name}'"))
            })?;
            let value = self.field_value(field, raw)?;
            message.set(field.number, value);
        }
        Ok(message)
    }

    fn field_value(&self, field: &FieldDescriptor, json: &JsonValue) -> Result<Value> {
        if let Some(entry) = &field.map_entry {
            let JsonValue::Object(entries) = json else {
                return Err(mismatch(field, "an object", json));
            };
            let mut map = Vec::with_capacity(entries.len());
            for (key, raw) in entries {
                let key = parse_map_key(field, entry.key_kind, key)?;
                map.push((key, self.single_value(&entry.value, raw)?));
            }
            return Ok(Value::Map(map));
        }

        if field.is_list() {
            let JsonValue::Array(items) = json else {
                return Err(mismatch(field, "an array", json));
            };
            let items = items
                .iter()
                .map(|item| self.single_value(field, item))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Value::List(items));
        }

        self.single_value(field, json)
    }

    fn single_value(&self, field: &FieldDescriptor, json: &JsonValue) -> Result<Value> {
        match field.kind {
            FieldKind::Message | FieldKind::Group => {
                if json.is_null() {
                    return Ok(Value::Null);
                }
                let type_name = field.message_type.as_deref().ok_or_else(|| {
                    FormatError::fixture(format!("field '{}' has no message type", field.name))
                })?;
                Ok(self.build_instance(type_name, json)?.into_value())
            }
            FieldKind::Enum => match json {
                JsonValue::String(name) => field
                    .enum_type
                    .as_ref()
                    .and_then(|enum_type| enum_type.find_by_name(name))
                    .map(|value| Value::Enum(value.number))
                    .ok_or_else(|| {
                        FormatError::fixture(format!(
                            "field '{}' has no enum value '{name}'",
                            field.name
                        ))
                    }),
                _ => Ok(Value::Enum(integer(field, json)?)),
            },
            FieldKind::Bool => json
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| mismatch(field, "a boolean", json)),
            FieldKind::String => string_value(field, json),
            FieldKind::Bytes => bytes_value(field, json),
            FieldKind::Double => Ok(Value::F64(float(field, json)?)),
            #[allow(clippy::cast_possible_truncation)]
            FieldKind::Float => Ok(Value::F32(float(field, json)? as f32)),
            FieldKind::Int32 | FieldKind::SInt32 | FieldKind::SFixed32 => {
                Ok(Value::I32(integer(field, json)?))
            }
            FieldKind::UInt32 | FieldKind::Fixed32 => Ok(Value::U32(integer(field, json)?)),
            FieldKind::Int64 | FieldKind::SInt64 | FieldKind::SFixed64 => {
                Ok(Value::I64(integer(field, json)?))
            }
            FieldKind::UInt64 | FieldKind::Fixed64 => Ok(Value::U64(integer(field, json)?)),
        }
    }
}

fn parse_kind(name: &str, context: &str) -> Result<FieldKind> {
    FieldKind::from_proto_name(name)
        .ok_or_else(|| FormatError::fixture(format!("field '{context}' has unknown type '{name}'")))
}

fn parse_map_key(field: &FieldDescriptor, kind: FieldKind, key: &str) -> Result<MapKey> {
    let invalid = || {
        FormatError::fixture(format!(
            "map key '{key}' of field '{}' is not a valid {}",
            field.name,
            kind.proto_name()
        ))
    };
    let key = match kind {
        FieldKind::String => MapKey::String(key.to_string()),
        FieldKind::Bool => MapKey::Bool(key.parse().map_err(|_| invalid())?),
        FieldKind::Int32 | FieldKind::SInt32 | FieldKind::SFixed32 => {
            MapKey::I32(key.parse().map_err(|_| invalid())?)
        }
        FieldKind::UInt32 | FieldKind::Fixed32 => MapKey::U32(key.parse().map_err(|_| invalid())?),
        FieldKind::Int64 | FieldKind::SInt64 | FieldKind::SFixed64 => {
            MapKey::I64(key.parse().map_err(|_| invalid())?)
        }
        FieldKind::UInt64 | FieldKind::Fixed64 => MapKey::U64(key.parse().map_err(|_| invalid())?),
        // Handed through so the formatter reports the unsupported key kind.
        _ => MapKey::String(key.to_string()),
    };
    Ok(key)
}

fn mismatch(field: &FieldDescriptor, expected: &str, found: &JsonValue) -> FormatError {
    FormatError::fixture(format!(
        "field '{}' expects {expected}, found {found}",
        field.name
    ))
}

/// Integers may be given as JSON numbers or as decimal strings.
fn integer<T>(field: &FieldDescriptor, json: &JsonValue) -> Result<T>
where
    T: TryFrom<i64> + TryFrom<u64> + std::str::FromStr,
{
    let parsed = match json {
        JsonValue::Number(number) => number
            .as_i64()
            .and_then(|n| <T as TryFrom<i64>>::try_from(n).ok())
            .or_else(|| {
                number
                    .as_u64()
                    .and_then(|n| <T as TryFrom<u64>>::try_from(n).ok())
            }),
        JsonValue::String(text) => text.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(field, &format!("a {}", field.kind.proto_name()), json))
}

/// Floats accept `"NaN"`, `"Infinity"` and `"-Infinity"` besides numbers.
fn float(field: &FieldDescriptor, json: &JsonValue) -> Result<f64> {
    let parsed = match json {
        JsonValue::Number(number) => number.as_f64(),
        JsonValue::String(text) => match text.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            other => other.parse().ok(),
        },
        _ => None,
    };
    parsed.ok_or_else(|| mismatch(field, "a number", json))
}

/// A JSON string, or `{ "utf16": [..] }` for raw and possibly ill-formed
/// UTF-16 code units.
fn string_value(field: &FieldDescriptor, json: &JsonValue) -> Result<Value> {
    match json {
        JsonValue::String(text) => Ok(Value::String(text.clone())),
        JsonValue::Object(object) => {
            let Some(JsonValue::Array(units)) = object.get("utf16") else {
                return Err(mismatch(field, "a string", json));
            };
            let units = units
                .iter()
                .map(|unit| {
                    unit.as_u64()
                        .and_then(|unit| u16::try_from(unit).ok())
                        .ok_or_else(|| mismatch(field, "UTF-16 code units", json))
                })
                .collect::<Result<Vec<u16>>>()?;
            Ok(Value::Utf16(units))
        }
        _ => Err(mismatch(field, "a string", json)),
    }
}

/// A string's UTF-8 bytes, or an array of byte values.
fn bytes_value(field: &FieldDescriptor, json: &JsonValue) -> Result<Value> {
    match json {
        JsonValue::String(text) => Ok(Value::Bytes(text.as_bytes().to_vec())),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|byte| u8::try_from(byte).ok())
                    .ok_or_else(|| mismatch(field, "byte values", json))
            })
            .collect::<Result<Vec<u8>>>()
            .map(Value::Bytes),
        _ => Err(mismatch(field, "bytes", json)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::ReflectMessage;

    const PAINT: &str = r#"{
        "enums": [{ "name": "demo.Color", "values": [
            { "name": "RED", "number": 0 }, { "name": "BLUE", "number": 2 }
        ] }],
        "messages": [{
            "name": "demo.Paint",
            "oneofs": ["finish"],
            "fields": [
                { "name": "color", "number": 1, "type": "enum", "enum": "demo.Color" },
                { "name": "coats", "number": 2, "type": "int64" },
                { "name": "labels", "number": 3, "type": "map", "key": "int32",
                  "value": { "type": "string" } },
                { "name": "matte", "number": 4, "type": "bool", "oneof": "finish" },
                { "name": "dried", "number": 5, "type": "message",
                  "message": "google.protobuf.Timestamp" }
            ]
        }],
        "type": "demo.Paint",
        "message": {
            "color": "BLUE",
            "coats": "3",
            "labels": { "7": "seven" },
            "matte": false,
            "dried": { "seconds": 10 }
        }
    }"#;

    #[test]
    fn loads_schema_and_instance() {
        let message = load_message(PAINT).unwrap().unwrap();
        let descriptor = message.descriptor();
        assert_eq!(descriptor.full_name, "demo.Paint");
        assert!(matches!(message.value(1), Some(Value::Enum(2))));
        assert!(matches!(message.value(2), Some(Value::I64(3))));
        assert_eq!(message.oneof_case(0), Some(4));
        match message.value(3) {
            Some(Value::Map(entries)) => assert_eq!(entries[0].0, MapKey::I32(7)),
            other => panic!("unexpected labels: {other:?}"),
        }
        assert!(matches!(message.value(5), Some(Value::Message(_))));
    }

    #[test]
    fn null_message_is_absent() {
        let text = r#"{ "type": "google.protobuf.Duration", "message": null }"#;
        assert!(load_message(text).unwrap().is_none());
    }

    #[test]
    fn unknown_field_is_fixture_error() {
        let text = r#"{ "type": "google.protobuf.Duration", "message": { "minutes": 1 } }"#;
        let err = load_message(text).unwrap_err();
        assert!(matches!(err, FormatError::Fixture { .. }));
    }

    #[test]
    fn utf16_strings_keep_raw_units() {
        let text = r#"{ "type": "google.protobuf.StringValue",
                        "message": { "value": { "utf16": [55357] } } }"#;
        let message = load_message(text).unwrap().unwrap();
        assert!(matches!(message.value(1), Some(Value::Utf16(units)) if units == &[0xd83d]));
    }

    #[test]
    fn malformed_document_is_json_error() {
        let err = load_message("{ \"type\": ").unwrap_err();
        assert!(matches!(err, FormatError::Json { .. }));
    }
}
