//! Digital signature enums shared across the signature dictionaries.

/// Digest algorithm for the signed byte ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    /// SHA-1 (deprecated, but still common in legacy PDFs)
    Sha1,
    /// SHA-256 (recommended)
    #[default]
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// RIPEMD-160
    Ripemd160,
}

impl DigestAlgorithm {
    /// Parse a `DigestMethod` name (Table 234).
    pub fn from_pdf_name(name: &str) -> Option<Self> {
        match name {
            "SHA1" => Some(DigestAlgorithm::Sha1),
            "SHA256" => Some(DigestAlgorithm::Sha256),
            "SHA384" => Some(DigestAlgorithm::Sha384),
            "SHA512" => Some(DigestAlgorithm::Sha512),
            "RIPEMD160" => Some(DigestAlgorithm::Ripemd160),
            _ => None,
        }
    }

    /// PDF name of this algorithm.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA1",
            DigestAlgorithm::Sha256 => "SHA256",
            DigestAlgorithm::Sha384 => "SHA384",
            DigestAlgorithm::Sha512 => "SHA512",
            DigestAlgorithm::Ripemd160 => "RIPEMD160",
        }
    }

    /// Display name of this algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
            DigestAlgorithm::Ripemd160 => "RIPEMD-160",
        }
    }
}

/// Signature sub-filter (encoding of `Contents`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignatureSubFilter {
    /// adbe.pkcs7.detached - PKCS#7 detached signature
    Pkcs7Detached,
    /// adbe.pkcs7.sha1 - PKCS#7 with SHA-1 digest
    Pkcs7Sha1,
    /// adbe.x509.rsa_sha1 - raw RSA signature
    X509RsaSha1,
    /// ETSI.CAdES.detached - PAdES CAdES signature
    CadesDetached,
    /// ETSI.RFC3161 - document timestamp token
    Rfc3161,
    /// Any other sub-filter name
    Unknown(String),
}

impl SignatureSubFilter {
    /// PDF name for this sub-filter.
    pub fn as_pdf_name(&self) -> &str {
        match self {
            SignatureSubFilter::Pkcs7Detached => "adbe.pkcs7.detached",
            SignatureSubFilter::Pkcs7Sha1 => "adbe.pkcs7.sha1",
            SignatureSubFilter::X509RsaSha1 => "adbe.x509.rsa_sha1",
            SignatureSubFilter::CadesDetached => "ETSI.CAdES.detached",
            SignatureSubFilter::Rfc3161 => "ETSI.RFC3161",
            SignatureSubFilter::Unknown(name) => name,
        }
    }

    /// Parse a PDF name. Unknown names are kept.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "adbe.pkcs7.detached" => SignatureSubFilter::Pkcs7Detached,
            "adbe.pkcs7.sha1" => SignatureSubFilter::Pkcs7Sha1,
            "adbe.x509.rsa_sha1" => SignatureSubFilter::X509RsaSha1,
            "ETSI.CAdES.detached" => SignatureSubFilter::CadesDetached,
            "ETSI.RFC3161" => SignatureSubFilter::Rfc3161,
            other => SignatureSubFilter::Unknown(other.to_string()),
        }
    }
}

/// Verification status of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Signature is valid
    Valid,
    /// Signature is invalid (cryptographically)
    Invalid,
    /// Signature validity is unknown (e.g., untrusted certificate)
    Unknown,
    /// Signature is valid but the document was modified
    ValidWithWarnings,
}

impl VerificationStatus {
    /// Check if the status indicates a valid signature.
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationStatus::Valid)
    }

    /// Check if the status indicates any form of validity (including warnings).
    pub fn is_ok(&self) -> bool {
        matches!(self, VerificationStatus::Valid | VerificationStatus::ValidWithWarnings)
    }
}
