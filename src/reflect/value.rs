use std::sync::Arc;

use crate::reflect::ReflectMessage;
use crate::reflect::descriptor::{FieldDescriptor, FieldKind};

/// Generic field value as exposed by a message instance.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// Numeric enum value; it may have no name in the enum's descriptor.
    Enum(i32),
    String(String),
    /// Text handed over as raw UTF-16 code units, which may be ill-formed.
    Utf16(Vec<u16>),
    Bytes(Vec<u8>),
    Message(Arc<dyn ReflectMessage>),
    /// An unset message field.
    Null,
    List(Vec<Self>),
    /// Map entries in the order the instance exposes them.
    Map(Vec<(MapKey, Self)>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    String(String),
}

impl Value {
    /// The zero/empty value for `field`'s kind and cardinality.
    #[must_use]
    pub fn default_for(field: &FieldDescriptor) -> Self {
        if field.is_map() {
            return Self::Map(Vec::new());
        }
        if field.is_list() {
            return Self::List(Vec::new());
        }
        Self::default_for_kind(field.kind)
    }

    #[must_use]
    pub fn default_for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Double => Self::F64(0.0),
            FieldKind::Float => Self::F32(0.0),
            FieldKind::Int64 | FieldKind::SInt64 | FieldKind::SFixed64 => Self::I64(0),
            FieldKind::UInt64 | FieldKind::Fixed64 => Self::U64(0),
            FieldKind::Int32 | FieldKind::SInt32 | FieldKind::SFixed32 => Self::I32(0),
            FieldKind::UInt32 | FieldKind::Fixed32 => Self::U32(0),
            FieldKind::Bool => Self::Bool(false),
            FieldKind::String => Self::String(String::new()),
            FieldKind::Bytes => Self::Bytes(Vec::new()),
            FieldKind::Enum => Self::Enum(0),
            FieldKind::Message | FieldKind::Group => Self::Null,
        }
    }

    /// Whether this value is the zero/empty default for `field`.
    ///
    /// Numeric zero of either sign counts as default. A present message is
    /// never default, even when all of its own fields are.
    #[must_use]
    pub fn is_default_for(&self, field: &FieldDescriptor) -> bool {
        if field.is_map() {
            return matches!(self, Self::Map(entries) if entries.is_empty());
        }
        if field.is_list() {
            return matches!(self, Self::List(items) if items.is_empty());
        }
        match self {
            Self::Bool(value) => !value,
            Self::I32(value) | Self::Enum(value) => *value == 0,
            Self::I64(value) => *value == 0,
            Self::U32(value) => *value == 0,
            Self::U64(value) => *value == 0,
            Self::F32(value) => *value == 0.0,
            Self::F64(value) => *value == 0.0,
            Self::String(value) => value.is_empty(),
            Self::Utf16(value) => value.is_empty(),
            Self::Bytes(value) => value.is_empty(),
            Self::Null => true,
            Self::Message(_) | Self::List(_) | Self::Map(_) => false,
        }
    }

    /// Short shape name used in error messages.
    #[must_use]
    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "int32",
            Self::I64(_) => "int64",
            Self::U32(_) => "uint32",
            Self::U64(_) => "uint64",
            Self::F32(_) => "float",
            Self::F64(_) => "double",
            Self::Enum(_) => "enum",
            Self::String(_) => "string",
            Self::Utf16(_) => "utf16 string",
            Self::Bytes(_) => "bytes",
            Self::Message(_) => "message",
            Self::Null => "null",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl MapKey {
    #[must_use]
    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "int32",
            Self::I64(_) => "int64",
            Self::U32(_) => "uint32",
            Self::U64(_) => "uint64",
            Self::String(_) => "string",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::F32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

#[allow(clippy::use_self)]
impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

#[allow(clippy::use_self)]
impl From<Vec<(MapKey, Value)>> for Value {
    fn from(value: Vec<(MapKey, Value)>) -> Self {
        Self::Map(value)
    }
}

impl From<String> for MapKey {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for MapKey {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for MapKey {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for MapKey {
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<i64> for MapKey {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<u32> for MapKey {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<u64> for MapKey {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_is_default() {
        let field = FieldDescriptor::new("d", 1, FieldKind::Double);
        assert!(Value::F64(-0.0).is_default_for(&field));
        assert!(!Value::F64(f64::NAN).is_default_for(&field));
    }

    #[test]
    fn empty_collections_are_default() {
        let list = FieldDescriptor::new("l", 1, FieldKind::Int32).repeated();
        assert!(Value::default_for(&list).is_default_for(&list));
        assert!(!Value::List(vec![Value::I32(0)]).is_default_for(&list));
    }

    #[test]
    fn unset_message_is_null() {
        let field = FieldDescriptor::new("m", 1, FieldKind::Message);
        assert!(matches!(Value::default_for(&field), Value::Null));
        assert!(Value::Null.is_default_for(&field));
    }
}
