//! Digital signature structures.
//!
//! Reads the dictionaries attached to signature fields: the signature
//! itself, its byte ranges and modification-detection references (DocMDP,
//! FieldMDP, UR3), the field lock and the seed value constraints.
//!
//! ## PDF Specification Reference
//!
//! - ISO 32000-1:2008 Section 12.8 - Digital Signatures
//! - ISO 32000-2:2020 Section 12.8 - Digital Signatures
//!
//! Verifying the signature value itself needs a [`SignatureHandler`]; the
//! crate only supplies the signed bytes and their digests.

mod byterange;
mod dictionary;
mod lock;
mod reference;
mod seed_value;
mod types;
mod verifier;

pub use byterange::ByteRange;
pub use dictionary::{BuildProperties, SignatureDictionary, SignatureKind};
pub use lock::SignatureLock;
pub use reference::{
    FieldMdpAction, FieldSet, MdpPermission, SignatureReference, TransformMethod, TransformParams, UsageRights,
};
pub use seed_value::{
    CertSeedValue, CertSeedValueFlags, LockDocument, SeedValue, SeedValueFlags, SeedValueViolation, TimeStampSeed,
};
pub use types::{DigestAlgorithm, SignatureSubFilter, VerificationStatus};
pub use verifier::{SignatureField, SignatureHandler};
