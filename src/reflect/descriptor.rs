use std::sync::Arc;

/// Wire-level field type as declared in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Double,
    Float,
    Int64,
    UInt64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    UInt32,
    SFixed32,
    SFixed64,
    SInt32,
    SInt64,
    Enum,
}

impl FieldKind {
    #[must_use]
    pub const fn is_32_bit_integer(self) -> bool {
        matches!(
            self,
            Self::Int32 | Self::UInt32 | Self::SInt32 | Self::Fixed32 | Self::SFixed32
        )
    }

    #[must_use]
    pub const fn is_64_bit_integer(self) -> bool {
        matches!(
            self,
            Self::Int64 | Self::UInt64 | Self::SInt64 | Self::Fixed64 | Self::SFixed64
        )
    }

    #[must_use]
    pub const fn is_integer(self) -> bool {
        self.is_32_bit_integer() || self.is_64_bit_integer()
    }

    #[must_use]
    pub const fn is_message(self) -> bool {
        matches!(self, Self::Message | Self::Group)
    }

    /// The lowercase `.proto` spelling of the type.
    #[must_use]
    pub const fn proto_name(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Int32 => "int32",
            Self::Fixed64 => "fixed64",
            Self::Fixed32 => "fixed32",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Group => "group",
            Self::Message => "message",
            Self::Bytes => "bytes",
            Self::UInt32 => "uint32",
            Self::SFixed32 => "sfixed32",
            Self::SFixed64 => "sfixed64",
            Self::SInt32 => "sint32",
            Self::SInt64 => "sint64",
            Self::Enum => "enum",
        }
    }

    /// Parse the lowercase `.proto` spelling.
    #[must_use]
    pub fn from_proto_name(name: &str) -> Option<Self> {
        let kind = match name {
            "double" => Self::Double,
            "float" => Self::Float,
            "int64" => Self::Int64,
            "uint64" => Self::UInt64,
            "int32" => Self::Int32,
            "fixed64" => Self::Fixed64,
            "fixed32" => Self::Fixed32,
            "bool" => Self::Bool,
            "string" => Self::String,
            "group" => Self::Group,
            "message" => Self::Message,
            "bytes" => Self::Bytes,
            "uint32" => Self::UInt32,
            "sfixed32" => Self::SFixed32,
            "sfixed64" => Self::SFixed64,
            "sint32" => Self::SInt32,
            "sint64" => Self::SInt64,
            "enum" => Self::Enum,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    #[default]
    Singular,
    Repeated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub full_name: String,
    pub values: Vec<EnumValueDescriptor>,
}

impl EnumDescriptor {
    #[must_use]
    pub fn new<N: Into<String>>(
        full_name: impl Into<String>,
        values: impl IntoIterator<Item = (N, i32)>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            values: values
                .into_iter()
                .map(|(name, number)| EnumValueDescriptor {
                    name: name.into(),
                    number,
                })
                .collect(),
        }
    }

    /// First declared value with `number`; aliases resolve to the earliest name.
    #[must_use]
    pub fn find_by_number(&self, number: i32) -> Option<&EnumValueDescriptor> {
        self.values.iter().find(|value| value.number == number)
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&EnumValueDescriptor> {
        self.values.iter().find(|value| value.name == name)
    }
}

/// Key and value layout of a map field's synthesized entry type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub key_kind: FieldKind,
    pub value: Box<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub number: u32,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
    pub map_entry: Option<MapEntry>,
    pub oneof_index: Option<usize>,
    pub enum_type: Option<Arc<EnumDescriptor>>,
    /// Full name of the message type for message, group and map-value fields.
    pub message_type: Option<String>,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, number: u32, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            number,
            kind,
            cardinality: Cardinality::Singular,
            map_entry: None,
            oneof_index: None,
            enum_type: None,
            message_type: None,
        }
    }

    /// A map field. Map fields are repeated entry messages on the wire.
    #[must_use]
    pub fn map(name: impl Into<String>, number: u32, key_kind: FieldKind, value: Self) -> Self {
        let mut field = Self::new(name, number, FieldKind::Message);
        field.cardinality = Cardinality::Repeated;
        field.map_entry = Some(MapEntry {
            key_kind,
            value: Box::new(value),
        });
        field
    }

    /// The value half of a map entry.
    #[must_use]
    pub fn map_value(kind: FieldKind) -> Self {
        Self::new("value", 2, kind)
    }

    #[must_use]
    pub const fn repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }

    #[must_use]
    pub const fn in_oneof(mut self, index: usize) -> Self {
        self.oneof_index = Some(index);
        self
    }

    #[must_use]
    pub fn with_enum(mut self, enum_type: Arc<EnumDescriptor>) -> Self {
        self.enum_type = Some(enum_type);
        self
    }

    #[must_use]
    pub fn with_message_type(mut self, full_name: impl Into<String>) -> Self {
        self.message_type = Some(full_name.into());
        self
    }

    #[must_use]
    pub const fn is_map(&self) -> bool {
        self.map_entry.is_some()
    }

    /// Repeated but not a map.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        self.map_entry.is_none() && matches!(self.cardinality, Cardinality::Repeated)
    }

    #[must_use]
    pub const fn is_singular(&self) -> bool {
        matches!(self.cardinality, Cardinality::Singular)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofDescriptor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    pub full_name: String,
    pub fields: Vec<FieldDescriptor>,
    pub oneofs: Vec<OneofDescriptor>,
}

impl MessageDescriptor {
    #[must_use]
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            fields: Vec::new(),
            oneofs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare a oneof; members refer to it by the returned position.
    #[must_use]
    pub fn with_oneof(mut self, name: impl Into<String>) -> Self {
        self.oneofs.push(OneofDescriptor { name: name.into() });
        self
    }

    #[must_use]
    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.number == number)
    }

    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields sorted by ascending field number, independent of declaration order.
    #[must_use]
    pub fn fields_in_number_order(&self) -> Vec<&FieldDescriptor> {
        let mut fields: Vec<&FieldDescriptor> = self.fields.iter().collect();
        fields.sort_by_key(|field| field.number);
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_order_ignores_declaration_order() {
        let descriptor = MessageDescriptor::new("test.Msg")
            .with_field(FieldDescriptor::new("c", 3, FieldKind::Bool))
            .with_field(FieldDescriptor::new("a", 1, FieldKind::Bool))
            .with_field(FieldDescriptor::new("b", 2, FieldKind::Bool));
        let names: Vec<&str> = descriptor
            .fields_in_number_order()
            .into_iter()
            .map(|field| field.name.as_str())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn enum_aliases_resolve_to_first_name() {
        let descriptor = EnumDescriptor::new("test.E", [("FIRST", 1), ("ALIAS", 1), ("TWO", 2)]);
        assert_eq!(descriptor.find_by_number(1).map(|v| v.name.as_str()), Some("FIRST"));
        assert!(descriptor.find_by_number(3).is_none());
    }

    #[test]
    fn map_fields_are_repeated_but_not_lists() {
        let field = FieldDescriptor::map(
            "labels",
            1,
            FieldKind::String,
            FieldDescriptor::map_value(FieldKind::String),
        );
        assert!(field.is_map());
        assert!(!field.is_list());
        assert!(!field.is_singular());
    }

    #[test]
    fn proto_names_round_trip() {
        for kind in [FieldKind::SFixed64, FieldKind::Enum, FieldKind::Bytes] {
            assert_eq!(FieldKind::from_proto_name(kind.proto_name()), Some(kind));
        }
        assert_eq!(FieldKind::from_proto_name("varchar"), None);
    }
}
