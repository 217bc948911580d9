//! Signature fields and verification.
//!
//! Cryptographic verification is delegated to a [`SignatureHandler`]; this
//! module extracts the signed bytes and reports coverage problems.

use super::dictionary::SignatureDictionary;
use super::lock::SignatureLock;
use super::seed_value::{SeedValue, SeedValueViolation};
use super::types::VerificationStatus;
use crate::acroform::FieldDictionary;
use crate::error::{Error, Result};

/// Verifies the signature value over the signed bytes.
///
/// Implementations decode `Contents` according to the sub-filter (PKCS#7,
/// CAdES, RFC 3161) and check it against `signed_content`.
pub trait SignatureHandler {
    /// Verify a signature.
    fn verify(&self, signature: &SignatureDictionary, signed_content: &[u8]) -> Result<VerificationStatus>;
}

/// Typed view of a signature field.
#[derive(Debug, Clone, Copy)]
pub struct SignatureField<'a> {
    field: &'a FieldDictionary,
}

impl<'a> SignatureField<'a> {
    /// Wrap a field dictionary.
    pub fn new(field: &'a FieldDictionary) -> Self {
        Self { field }
    }

    /// The underlying field dictionary.
    pub fn field(&self) -> &'a FieldDictionary {
        self.field
    }

    /// Signature dictionary (`V`), absent for unsigned fields.
    pub fn signature(&self) -> Option<&'a SignatureDictionary> {
        self.field.signature.as_ref()
    }

    /// Fields locked on signing (`Lock`).
    pub fn lock(&self) -> Option<&'a SignatureLock> {
        self.field.lock.as_ref()
    }

    /// Signing constraints (`SV`).
    pub fn seed_value(&self) -> Option<&'a SeedValue> {
        self.field.seed_value.as_ref()
    }

    /// Check whether the field holds a signature value.
    pub fn is_signed(&self) -> bool {
        self.signature().map(SignatureDictionary::has_contents).unwrap_or(false)
    }

    /// Check whether this signature locks another field.
    ///
    /// A lock only takes effect once the field is signed.
    pub fn locks_field(&self, qualified_name: &str) -> bool {
        if !self.is_signed() {
            return false;
        }
        self.lock().map(|l| l.locks(qualified_name)).unwrap_or(false)
            || self.signature().map(|s| s.locks_field(qualified_name)).unwrap_or(false)
    }

    /// Seed value constraints broken by the signature.
    pub fn seed_value_violations(&self) -> Vec<SeedValueViolation> {
        match (self.seed_value(), self.signature()) {
            (Some(sv), Some(sig)) => sv.check(sig),
            _ => Vec::new(),
        }
    }

    /// Verify the signature against the complete file.
    ///
    /// A signature the handler accepts is downgraded to
    /// [`VerificationStatus::ValidWithWarnings`] when its byte range does
    /// not cover the whole file, i.e. the document was updated after signing.
    pub fn verify<H: SignatureHandler + ?Sized>(&self, handler: &H, file: &[u8]) -> Result<VerificationStatus> {
        let signature = self
            .signature()
            .ok_or_else(|| Error::Signature(format!("field {} is not signed", self.field.full_name)))?;
        let byte_range = signature
            .byte_range
            .as_ref()
            .ok_or_else(|| Error::missing("Sig", "ByteRange"))?;

        let content = byte_range.signed_content(file)?;
        let status = handler.verify(signature, &content)?;
        log::debug!(
            "Signature of {} over {} bytes: {:?}",
            self.field.full_name,
            content.len(),
            status
        );

        if status == VerificationStatus::Valid && !byte_range.covers_whole_document(file.len() as u64) {
            log::warn!(
                "Signature of {} does not cover the whole file ({} of {} bytes)",
                self.field.full_name,
                byte_range.end(),
                file.len()
            );
            return Ok(VerificationStatus::ValidWithWarnings);
        }
        Ok(status)
    }
}
