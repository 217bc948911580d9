//! Error types for the form and annotation model.
//!
//! This module defines all error types that can occur while resolving objects
//! and interpreting AcroForm, annotation and signature dictionaries.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading the interactive object model.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)] // "Invalid" prefix is intentional for clarity
pub enum Error {
    /// Referenced object not found in the object source
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// A required dictionary entry is missing
    #[error("Missing required entry /{key} in {dict} dictionary")]
    MissingEntry {
        /// Dictionary kind (e.g. "Sig", "AcroForm")
        dict: String,
        /// Missing key
        key: String,
    },

    /// Invalid PDF structure (generic)
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// Circular reference detected in object graph
    #[error("Circular reference detected: object {0}")]
    CircularReference(crate::object::ObjectRef),

    /// Recursion depth limit exceeded
    #[error("Recursion depth limit exceeded (max: {0})")]
    RecursionLimitExceeded(u32),

    /// No field with the given fully qualified name
    #[error("Form field not found: {0}")]
    FieldNotFound(String),

    /// A value cannot be stored in the target field
    #[error("Invalid field value: {0}")]
    InvalidFieldValue(String),

    /// Malformed or inconsistent signature byte range
    #[error("Invalid ByteRange: {0}")]
    ByteRange(String),

    /// Signature structure error
    #[error("Signature error: {0}")]
    Signature(String),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_type(expected: &str, found: &crate::object::Object) -> Self {
        Error::InvalidObjectType {
            expected: expected.to_string(),
            found: found.type_name().to_string(),
        }
    }

    pub(crate) fn missing(dict: &str, key: &str) -> Self {
        Error::MissingEntry {
            dict: dict.to_string(),
            key: key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Object, ObjectRef};

    #[test]
    fn test_object_not_found_error() {
        let err = Error::ObjectNotFound(10, 0);
        let msg = format!("{}", err);
        assert!(msg.contains("10 0 R"));
    }

    #[test]
    fn test_invalid_object_type_error() {
        let err = Error::invalid_type("Dictionary", &Object::Array(vec![]));
        let msg = format!("{}", err);
        assert!(msg.contains("Dictionary"));
        assert!(msg.contains("Array"));
    }

    #[test]
    fn test_missing_entry_error() {
        let err = Error::missing("Sig", "ByteRange");
        assert_eq!(format!("{}", err), "Missing required entry /ByteRange in Sig dictionary");
    }

    #[test]
    fn test_circular_reference_error() {
        let err = Error::CircularReference(ObjectRef::new(7, 0));
        assert!(format!("{}", err).contains("7 0 R"));
    }

    #[test]
    fn test_field_not_found_error() {
        let err = Error::FieldNotFound("address.city".to_string());
        assert!(format!("{}", err).contains("address.city"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
