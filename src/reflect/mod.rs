//! Schema and instance access the formatter relies on.
//!
//! Descriptors describe a message type; [`ReflectMessage`] exposes one
//! instance of it. [`DynamicMessage`] is the stock implementation.

pub mod descriptor;
pub mod dynamic;
pub mod value;

use std::borrow::Cow;
use std::fmt;

pub use descriptor::{
    Cardinality, EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldKind, MapEntry,
    MessageDescriptor, OneofDescriptor,
};
pub use dynamic::DynamicMessage;
pub use value::{MapKey, Value};

/// Read access to a message instance.
pub trait ReflectMessage: fmt::Debug + Send + Sync {
    fn descriptor(&self) -> &MessageDescriptor;

    /// Current value of `field`; unset fields yield the kind's default.
    fn get(&self, field: &FieldDescriptor) -> Cow<'_, Value>;

    /// Number of the member currently set in the oneof at `oneof_index`.
    fn oneof_case(&self, oneof_index: usize) -> Option<u32>;
}
