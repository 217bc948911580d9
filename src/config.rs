//! Options controlling how strictly form and annotation dictionaries are read.

/// Model options for controlling error handling and traversal limits.
///
/// These options allow you to trade strict PDF compliance for broader
/// compatibility with malformed or non-standard form dictionaries.
///
/// # Example
///
/// ```
/// use pdf_acroform::config::ModelOptions;
///
/// // Strict mode - fail on the first malformed field or annotation
/// let strict = ModelOptions::strict();
///
/// // Lenient mode - skip malformed entries and continue (default)
/// let lenient = ModelOptions::lenient();
///
/// // Custom configuration
/// let custom = ModelOptions {
///     max_field_depth: 16,
///     ..ModelOptions::lenient()
/// };
/// assert!(!custom.strict);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ModelOptions {
    /// Fail on the first malformed entry (true) or skip it (false)
    pub strict: bool,

    /// Skip fields and annotations that are not dictionaries
    pub skip_invalid_entries: bool,

    /// Maximum number of `Parent` hops when looking up inheritable entries
    pub max_inheritance_depth: u32,

    /// Maximum nesting of `Kids` arrays in the field tree
    pub max_field_depth: u32,

    /// Maximum length of a reference chain (`1 0 R` pointing at `2 0 R` ...)
    ///
    /// PDF Spec: ISO 32000-1:2008, Section H.1 - Implementation Limits
    pub max_reference_chain: u32,

    /// Maximum length of an action `Next` chain
    pub max_action_chain: u32,
}

impl Default for ModelOptions {
    /// Default configuration: lenient mode with traversal limits
    fn default() -> Self {
        Self::lenient()
    }
}

impl ModelOptions {
    /// Strict mode: fail on any malformed dictionary.
    ///
    /// Use this for validating form compliance.
    pub fn strict() -> Self {
        Self {
            strict: true,
            skip_invalid_entries: false,
            max_inheritance_depth: 32,
            max_field_depth: 64,
            max_reference_chain: 32,
            max_action_chain: 64,
        }
    }

    /// Lenient mode: skip malformed fields and annotations.
    ///
    /// Use this for viewing forms from untrusted sources.
    pub fn lenient() -> Self {
        Self {
            strict: false,
            skip_invalid_entries: true,
            max_inheritance_depth: 32,
            max_field_depth: 64,
            max_reference_chain: 32,
            max_action_chain: 64,
        }
    }

    /// Decide what to do with a malformed entry.
    ///
    /// Returns `Err` in strict mode, otherwise logs and returns `Ok(())` so
    /// the caller can skip the entry.
    pub(crate) fn tolerate(&self, err: crate::error::Error, context: &str) -> crate::error::Result<()> {
        if self.strict || !self.skip_invalid_entries {
            return Err(err);
        }
        log::warn!("Skipping malformed {}: {}", context, err);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_strict_mode() {
        let opts = ModelOptions::strict();
        assert!(opts.strict);
        assert!(!opts.skip_invalid_entries);
    }

    #[test]
    fn test_lenient_mode() {
        let opts = ModelOptions::lenient();
        assert!(!opts.strict);
        assert!(opts.skip_invalid_entries);
        assert_eq!(opts.max_inheritance_depth, 32);
    }

    #[test]
    fn test_tolerate() {
        let strict = ModelOptions::strict();
        assert!(strict.tolerate(Error::InvalidPdf("x".into()), "field").is_err());

        let lenient = ModelOptions::lenient();
        assert!(lenient.tolerate(Error::InvalidPdf("x".into()), "field").is_ok());
    }
}
