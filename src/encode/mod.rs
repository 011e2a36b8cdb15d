pub mod encoders;
pub mod primitives;
pub mod temporal;
pub mod well_known;

use crate::error::Result;
use crate::options::{FormatOptions, ResolvedFormatOptions, resolve_format_options};
use crate::reflect::ReflectMessage;
use crate::shared::constants::NULL_LITERAL;

/// Formats message instances as canonical JSON text.
///
/// A formatter holds only its resolved options, so one instance can be shared
/// freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    options: ResolvedFormatOptions,
}

impl JsonFormatter {
    #[must_use]
    pub fn new(options: Option<FormatOptions>) -> Self {
        Self {
            options: resolve_format_options(options),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &ResolvedFormatOptions {
        &self.options
    }

    /// Format `message` as a single line of JSON.
    ///
    /// Well-known types at the top level use their bespoke encoding, so a
    /// `google.protobuf.Duration` formats as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error when the instance does not fit its schema, breaks a
    /// well-known type's invariants, or holds ill-formed UTF-16 text.
    pub fn format(&self, message: &dyn ReflectMessage) -> Result<String> {
        let type_name = &message.descriptor().full_name;
        let span = tracing::debug_span!("format", message_type = %type_name);
        let _guard = span.enter();

        let mut out = String::new();
        well_known::write_typed_message(&mut out, type_name, message, false, &self.options)
            .inspect_err(|err| tracing::debug!(error = %err, "formatting failed"))?;
        tracing::trace!(len = out.len(), "formatted message");
        Ok(out)
    }

    /// Like [`JsonFormatter::format`], rendering an absent message as `null`.
    ///
    /// # Errors
    ///
    /// Same as [`JsonFormatter::format`].
    pub fn format_optional(&self, message: Option<&dyn ReflectMessage>) -> Result<String> {
        message.map_or_else(|| Ok(NULL_LITERAL.to_string()), |message| self.format(message))
    }
}

/// Format `message` with the given options.
///
/// # Errors
///
/// Same as [`JsonFormatter::format`].
pub fn format_message(message: &dyn ReflectMessage, options: Option<FormatOptions>) -> Result<String> {
    JsonFormatter::new(options).format(message)
}
