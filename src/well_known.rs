//! Identity and layout of the well-known types that have bespoke JSON forms.
//!
//! Types are recognized by full name only. The builders here produce
//! descriptors and instances with the standard field layout, which is all the
//! formatter assumes about them.

use std::sync::{Arc, LazyLock};

use crate::reflect::{
    DynamicMessage, EnumDescriptor, FieldDescriptor, FieldKind, MapKey, MessageDescriptor, Value,
};

/// Field number of `value` in every wrapper type.
pub const WRAPPER_VALUE_FIELD: u32 = 1;
/// Timestamp and Duration share this layout.
pub const SECONDS_FIELD: u32 = 1;
pub const NANOS_FIELD: u32 = 2;
pub const FIELD_MASK_PATHS_FIELD: u32 = 1;
pub const STRUCT_FIELDS_FIELD: u32 = 1;
pub const LIST_VALUE_VALUES_FIELD: u32 = 1;

pub const VALUE_NULL_FIELD: u32 = 1;
pub const VALUE_NUMBER_FIELD: u32 = 2;
pub const VALUE_STRING_FIELD: u32 = 3;
pub const VALUE_BOOL_FIELD: u32 = 4;
pub const VALUE_STRUCT_FIELD: u32 = 5;
pub const VALUE_LIST_FIELD: u32 = 6;

pub const NULL_VALUE_ENUM: &str = "google.protobuf.NullValue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownType {
    DoubleValue,
    FloatValue,
    Int64Value,
    UInt64Value,
    Int32Value,
    UInt32Value,
    BoolValue,
    StringValue,
    BytesValue,
    Timestamp,
    Duration,
    FieldMask,
    Struct,
    Value,
    ListValue,
}

const WELL_KNOWN_TYPES: [(&str, WellKnownType); 15] = [
    ("google.protobuf.DoubleValue", WellKnownType::DoubleValue),
    ("google.protobuf.FloatValue", WellKnownType::FloatValue),
    ("google.protobuf.Int64Value", WellKnownType::Int64Value),
    ("google.protobuf.UInt64Value", WellKnownType::UInt64Value),
    ("google.protobuf.Int32Value", WellKnownType::Int32Value),
    ("google.protobuf.UInt32Value", WellKnownType::UInt32Value),
    ("google.protobuf.BoolValue", WellKnownType::BoolValue),
    ("google.protobuf.StringValue", WellKnownType::StringValue),
    ("google.protobuf.BytesValue", WellKnownType::BytesValue),
    ("google.protobuf.Timestamp", WellKnownType::Timestamp),
    ("google.protobuf.Duration", WellKnownType::Duration),
    ("google.protobuf.FieldMask", WellKnownType::FieldMask),
    ("google.protobuf.Struct", WellKnownType::Struct),
    ("google.protobuf.Value", WellKnownType::Value),
    ("google.protobuf.ListValue", WellKnownType::ListValue),
];

static DESCRIPTORS: LazyLock<Vec<Arc<MessageDescriptor>>> = LazyLock::new(|| {
    WELL_KNOWN_TYPES
        .iter()
        .map(|(_, wkt)| Arc::new(wkt.build_descriptor()))
        .collect()
});

static NULL_VALUE: LazyLock<Arc<EnumDescriptor>> =
    LazyLock::new(|| Arc::new(EnumDescriptor::new(NULL_VALUE_ENUM, [("NULL_VALUE", 0)])));

impl WellKnownType {
    #[must_use]
    pub fn from_full_name(full_name: &str) -> Option<Self> {
        WELL_KNOWN_TYPES
            .iter()
            .find(|(name, _)| *name == full_name)
            .map(|(_, wkt)| *wkt)
    }

    #[must_use]
    pub fn full_name(self) -> &'static str {
        WELL_KNOWN_TYPES
            .iter()
            .find(|(_, wkt)| *wkt == self)
            .map_or("", |(name, _)| *name)
    }

    /// Every recognized type, in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        WELL_KNOWN_TYPES.iter().map(|(_, wkt)| *wkt)
    }

    #[must_use]
    pub const fn is_wrapper(self) -> bool {
        self.wrapped_kind().is_some()
    }

    /// Kind of the single `value` field of a wrapper type.
    #[must_use]
    pub const fn wrapped_kind(self) -> Option<FieldKind> {
        let kind = match self {
            Self::DoubleValue => FieldKind::Double,
            Self::FloatValue => FieldKind::Float,
            Self::Int64Value => FieldKind::Int64,
            Self::UInt64Value => FieldKind::UInt64,
            Self::Int32Value => FieldKind::Int32,
            Self::UInt32Value => FieldKind::UInt32,
            Self::BoolValue => FieldKind::Bool,
            Self::StringValue => FieldKind::String,
            Self::BytesValue => FieldKind::Bytes,
            _ => return None,
        };
        Some(kind)
    }

    /// Shared descriptor with the standard layout for this type.
    #[must_use]
    pub fn descriptor(self) -> Arc<MessageDescriptor> {
        WELL_KNOWN_TYPES
            .iter()
            .position(|(_, wkt)| *wkt == self)
            .and_then(|index| DESCRIPTORS.get(index))
            .map_or_else(|| Arc::new(self.build_descriptor()), Arc::clone)
    }

    fn build_descriptor(self) -> MessageDescriptor {
        let descriptor = MessageDescriptor::new(self.full_name());
        if let Some(kind) = self.wrapped_kind() {
            return descriptor.with_field(FieldDescriptor::new("value", WRAPPER_VALUE_FIELD, kind));
        }

        match self {
            Self::Timestamp | Self::Duration => descriptor
                .with_field(FieldDescriptor::new("seconds", SECONDS_FIELD, FieldKind::Int64))
                .with_field(FieldDescriptor::new("nanos", NANOS_FIELD, FieldKind::Int32)),
            Self::FieldMask => descriptor.with_field(
                FieldDescriptor::new("paths", FIELD_MASK_PATHS_FIELD, FieldKind::String).repeated(),
            ),
            Self::Struct => descriptor.with_field(FieldDescriptor::map(
                "fields",
                STRUCT_FIELDS_FIELD,
                FieldKind::String,
                FieldDescriptor::map_value(FieldKind::Message)
                    .with_message_type(Self::Value.full_name()),
            )),
            Self::ListValue => descriptor.with_field(
                FieldDescriptor::new("values", LIST_VALUE_VALUES_FIELD, FieldKind::Message)
                    .repeated()
                    .with_message_type(Self::Value.full_name()),
            ),
            Self::Value => descriptor
                .with_oneof("kind")
                .with_field(
                    FieldDescriptor::new("null_value", VALUE_NULL_FIELD, FieldKind::Enum)
                        .in_oneof(0)
                        .with_enum(null_value_enum()),
                )
                .with_field(
                    FieldDescriptor::new("number_value", VALUE_NUMBER_FIELD, FieldKind::Double)
                        .in_oneof(0),
                )
                .with_field(
                    FieldDescriptor::new("string_value", VALUE_STRING_FIELD, FieldKind::String)
                        .in_oneof(0),
                )
                .with_field(
                    FieldDescriptor::new("bool_value", VALUE_BOOL_FIELD, FieldKind::Bool)
                        .in_oneof(0),
                )
                .with_field(
                    FieldDescriptor::new("struct_value", VALUE_STRUCT_FIELD, FieldKind::Message)
                        .in_oneof(0)
                        .with_message_type(Self::Struct.full_name()),
                )
                .with_field(
                    FieldDescriptor::new("list_value", VALUE_LIST_FIELD, FieldKind::Message)
                        .in_oneof(0)
                        .with_message_type(Self::ListValue.full_name()),
                ),
            _ => descriptor,
        }
    }
}

/// The `google.protobuf.NullValue` enum.
#[must_use]
pub fn null_value_enum() -> Arc<EnumDescriptor> {
    Arc::clone(&NULL_VALUE)
}

// =============================================================================
// Instance builders
// =============================================================================

#[must_use]
pub fn timestamp(seconds: i64, nanos: i32) -> DynamicMessage {
    DynamicMessage::new(WellKnownType::Timestamp.descriptor())
        .with(SECONDS_FIELD, seconds)
        .with(NANOS_FIELD, nanos)
}

#[must_use]
pub fn duration(seconds: i64, nanos: i32) -> DynamicMessage {
    DynamicMessage::new(WellKnownType::Duration.descriptor())
        .with(SECONDS_FIELD, seconds)
        .with(NANOS_FIELD, nanos)
}

#[must_use]
pub fn field_mask<P: Into<String>>(paths: impl IntoIterator<Item = P>) -> DynamicMessage {
    let paths: Vec<Value> = paths
        .into_iter()
        .map(|path| Value::String(path.into()))
        .collect();
    DynamicMessage::new(WellKnownType::FieldMask.descriptor())
        .with(FIELD_MASK_PATHS_FIELD, Value::List(paths))
}

/// A wrapper instance, e.g. `wrapper(WellKnownType::Int32Value, 5)`.
#[must_use]
pub fn wrapper(wkt: WellKnownType, value: impl Into<Value>) -> DynamicMessage {
    DynamicMessage::new(wkt.descriptor()).with(WRAPPER_VALUE_FIELD, value)
}

/// A `google.protobuf.Struct`; each value should be a `google.protobuf.Value`.
#[must_use]
pub fn struct_of<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> DynamicMessage {
    let entries: Vec<(MapKey, Value)> = fields
        .into_iter()
        .map(|(key, value)| (MapKey::String(key.into()), value))
        .collect();
    DynamicMessage::new(WellKnownType::Struct.descriptor())
        .with(STRUCT_FIELDS_FIELD, Value::Map(entries))
}

/// A `google.protobuf.ListValue`; each item should be a `google.protobuf.Value`.
#[must_use]
pub fn list_of(values: impl IntoIterator<Item = Value>) -> DynamicMessage {
    DynamicMessage::new(WellKnownType::ListValue.descriptor())
        .with(LIST_VALUE_VALUES_FIELD, Value::List(values.into_iter().collect()))
}

fn value_with(number: u32, kind: Value) -> Value {
    DynamicMessage::new(WellKnownType::Value.descriptor())
        .with(number, kind)
        .into_value()
}

#[must_use]
pub fn null_value() -> Value {
    value_with(VALUE_NULL_FIELD, Value::Enum(0))
}

#[must_use]
pub fn number_value(number: f64) -> Value {
    value_with(VALUE_NUMBER_FIELD, Value::F64(number))
}

#[must_use]
pub fn string_value(text: impl Into<String>) -> Value {
    value_with(VALUE_STRING_FIELD, Value::String(text.into()))
}

#[must_use]
pub fn bool_value(flag: bool) -> Value {
    value_with(VALUE_BOOL_FIELD, Value::Bool(flag))
}

#[must_use]
pub fn struct_value(inner: DynamicMessage) -> Value {
    value_with(VALUE_STRUCT_FIELD, inner.into_value())
}

#[must_use]
pub fn list_value(inner: DynamicMessage) -> Value {
    value_with(VALUE_LIST_FIELD, inner.into_value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_by_full_name() {
        assert_eq!(
            WellKnownType::from_full_name("google.protobuf.Timestamp"),
            Some(WellKnownType::Timestamp)
        );
        assert_eq!(WellKnownType::from_full_name("Timestamp"), None);
        assert_eq!(WellKnownType::from_full_name("acme.Timestamp"), None);
    }

    #[test]
    fn full_names_round_trip() {
        for wkt in WellKnownType::all() {
            assert_eq!(WellKnownType::from_full_name(wkt.full_name()), Some(wkt));
            assert_eq!(wkt.descriptor().full_name, wkt.full_name());
        }
    }

    #[test]
    fn wrappers_hold_a_single_value_field() {
        let descriptor = WellKnownType::BytesValue.descriptor();
        assert_eq!(descriptor.fields.len(), 1);
        assert_eq!(descriptor.fields[0].kind, FieldKind::Bytes);
        assert!(!WellKnownType::Struct.is_wrapper());
    }

    #[test]
    fn value_members_share_one_oneof() {
        let descriptor = WellKnownType::Value.descriptor();
        assert_eq!(descriptor.oneofs.len(), 1);
        assert!(descriptor.fields.iter().all(|field| field.oneof_index == Some(0)));
    }
}
