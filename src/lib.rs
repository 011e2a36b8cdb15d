#![forbid(unsafe_code)]
//! Canonical JSON text for schema-described messages.
//!
//! A message is read through [`ReflectMessage`] and written as single-line
//! JSON: fields in ascending number order, names in lowerCamelCase, default
//! values omitted unless requested, and the well-known types (wrappers,
//! `Timestamp`, `Duration`, `FieldMask`, `Struct`, `Value`, `ListValue`) in
//! their bespoke forms.
//!
//! ```
//! use pbjson::well_known::duration;
//!
//! let json = pbjson::format_message(&duration(-1, -500_000_000), None).unwrap();
//! assert_eq!(json, "\"-1.500s\"");
//! ```

pub mod cli;
pub mod encode;
pub mod error;
pub mod options;
pub mod reflect;
pub mod shared;
pub mod well_known;

pub use encode::{JsonFormatter, format_message};
pub use error::{FormatError, Result};
pub use options::{FormatOptions, ResolvedFormatOptions};
pub use reflect::{
    Cardinality, DynamicMessage, EnumDescriptor, FieldDescriptor, FieldKind, MapKey,
    MessageDescriptor, ReflectMessage, Value,
};
pub use shared::naming::to_json_name;
pub use shared::string_utils::escape_string;
pub use well_known::WellKnownType;

/// Convenience wrapper: load a fixture document and format its message.
///
/// For lower-level control, build a [`DynamicMessage`] yourself and call
/// [`format_message`].
///
/// # Errors
/// Returns an error if the document is invalid or formatting fails.
pub fn fixture_to_json(document: &str, options: Option<FormatOptions>) -> Result<String> {
    let message = cli::fixture::load_message(document)?;
    JsonFormatter::new(options).format_optional(message.as_ref().map(|m| m as &dyn ReflectMessage))
}
