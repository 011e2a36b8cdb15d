/// Caller-facing formatting configuration. Unset fields take their defaults
/// when resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Emit fields whose value equals the kind's zero/empty default.
    pub emit_default_values: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedFormatOptions {
    pub emit_default_values: bool,
}

impl FormatOptions {
    #[must_use]
    pub const fn emit_default_values(mut self, emit: bool) -> Self {
        self.emit_default_values = Some(emit);
        self
    }
}

#[must_use]
pub fn resolve_format_options(options: Option<FormatOptions>) -> ResolvedFormatOptions {
    let options = options.unwrap_or(FormatOptions {
        emit_default_values: None,
    });

    ResolvedFormatOptions {
        emit_default_values: options.emit_default_values.unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_omit_default_values() {
        assert!(!resolve_format_options(None).emit_default_values);
        assert!(!resolve_format_options(Some(FormatOptions::default())).emit_default_values);
    }

    #[test]
    fn explicit_emit_default_values() {
        let resolved = resolve_format_options(Some(FormatOptions::default().emit_default_values(true)));
        assert!(resolved.emit_default_values);
    }
}
