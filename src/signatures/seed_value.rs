//! Seed value dictionaries (`SV`, Tables 234 and 235).
//!
//! A seed value dictionary constrains how an unsigned signature field may be
//! signed. Each constraint is advisory unless its bit is set in `Ff`.

use super::dictionary::SignatureDictionary;
use super::types::{DigestAlgorithm, SignatureSubFilter};
use crate::config::ModelOptions;
use crate::dictionary::DictView;
use crate::error::{Error, Result};
use crate::library::{resolve_dict, ObjectResolver};
use crate::object::{Object, ObjectRef};
use crate::text_string::decode_text_string;
use bitflags::bitflags;
use indexmap::IndexMap;

bitflags! {
    /// Required constraints of a seed value dictionary (`Ff`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SeedValueFlags: u32 {
        /// Bit 1: `Filter` is required
        const FILTER = 1 << 0;
        /// Bit 2: `SubFilter` is required
        const SUB_FILTER = 1 << 1;
        /// Bit 3: `V` is required
        const V = 1 << 2;
        /// Bit 4: `Reasons` is required
        const REASONS = 1 << 3;
        /// Bit 5: `LegalAttestation` is required
        const LEGAL_ATTESTATION = 1 << 4;
        /// Bit 6: `AddRevInfo` is required
        const ADD_REV_INFO = 1 << 5;
        /// Bit 7: `DigestMethod` is required
        const DIGEST_METHOD = 1 << 6;
    }
}

bitflags! {
    /// Required constraints of a certificate seed value dictionary (`Ff`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CertSeedValueFlags: u32 {
        /// Bit 1: `Subject` is required
        const SUBJECT = 1 << 0;
        /// Bit 2: `Issuer` is required
        const ISSUER = 1 << 1;
        /// Bit 3: `OID` is required
        const OID = 1 << 2;
        /// Bit 4: `SubjectDN` is required
        const SUBJECT_DN = 1 << 3;
        /// Bit 5: reserved
        const RESERVED = 1 << 4;
        /// Bit 6: `KeyUsage` is required
        const KEY_USAGE = 1 << 5;
        /// Bit 7: `URL` is required
        const URL = 1 << 6;
    }
}

/// Certificate constraints (`Cert`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CertSeedValue {
    /// Required constraints
    pub flags: CertSeedValueFlags,
    /// Acceptable signing certificates, DER encoded (`Subject`)
    pub subjects: Vec<Vec<u8>>,
    /// Acceptable subject distinguished names (`SubjectDN`)
    pub subject_dns: Vec<IndexMap<String, String>>,
    /// Key usage patterns (`KeyUsage`)
    pub key_usage: Vec<String>,
    /// Acceptable issuer certificates, DER encoded (`Issuer`)
    pub issuers: Vec<Vec<u8>>,
    /// Acceptable certificate policy OIDs (`OID`)
    pub oids: Vec<String>,
    /// Where to obtain a certificate (`URL`)
    pub url: Option<String>,
    /// How to use the URL (`URLType`, default `Browser`)
    pub url_type: String,
}

/// Timestamp server constraint (`TimeStamp`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStampSeed {
    /// Timestamp server URL
    pub url: String,
    /// Whether a timestamp is required (`Ff` = 1)
    pub required: bool,
}

/// Whether signing locks the document (`LockDocument`, PDF 2.0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockDocument {
    /// The document is locked on signing
    True,
    /// The document is not locked
    False,
    /// The signer decides
    #[default]
    Auto,
}

/// A seed value constraint that a signature does not meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedValueViolation {
    /// Signature handler differs from the required `Filter`
    Filter {
        /// Required handler
        required: String,
        /// Handler used by the signature
        found: Option<String>,
    },
    /// Sub-filter is not one of the allowed ones
    SubFilter {
        /// Allowed sub-filters
        allowed: Vec<SignatureSubFilter>,
        /// Sub-filter of the signature
        found: Option<SignatureSubFilter>,
    },
    /// Digest method is not one of the allowed ones
    DigestMethod {
        /// Allowed digests
        allowed: Vec<DigestAlgorithm>,
        /// Digest declared by the signature
        found: DigestAlgorithm,
    },
    /// Reason is not one of the allowed ones
    Reason {
        /// Allowed reasons; empty when no reason may be given
        allowed: Vec<String>,
        /// Reason of the signature
        found: Option<String>,
    },
    /// Revocation information requires a PKCS#7 sub-filter
    AddRevInfo {
        /// Sub-filter of the signature
        found: Option<SignatureSubFilter>,
    },
}

/// A seed value dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedValue {
    /// Required constraints
    pub flags: SeedValueFlags,
    /// Signature handler (`Filter`)
    pub filter: Option<String>,
    /// Acceptable sub-filters, in order of preference (`SubFilter`)
    pub sub_filters: Vec<SignatureSubFilter>,
    /// Acceptable digest methods (`DigestMethod`)
    pub digest_methods: Vec<DigestAlgorithm>,
    /// Minimum handler version (`V`)
    pub version: Option<f64>,
    /// Certificate constraints (`Cert`)
    pub cert: Option<CertSeedValue>,
    /// Acceptable reasons (`Reasons`)
    pub reasons: Vec<String>,
    /// Certification requirement (`MDP` `P`, 0..=3); 0 means author signatures only
    pub mdp: Option<u8>,
    /// Timestamp server (`TimeStamp`)
    pub timestamp: Option<TimeStampSeed>,
    /// Acceptable legal attestations (`LegalAttestation`)
    pub legal_attestation: Vec<String>,
    /// Embed revocation information (`AddRevInfo`)
    pub add_rev_info: bool,
    /// Document lock on signing (`LockDocument`)
    pub lock_document: LockDocument,
    /// Appearance filter name (`AppearanceFilter`)
    pub appearance_filter: Option<String>,
    /// Object reference when the dictionary is indirect
    pub object_ref: Option<ObjectRef>,
}

impl SeedValue {
    /// Parse a seed value dictionary.
    pub fn parse<R: ObjectResolver + ?Sized>(resolver: &R, obj: &Object, options: &ModelOptions) -> Result<Self> {
        let dict = resolve_dict(resolver, obj)?;
        let view = DictView::new(&dict, resolver);

        let mut digest_methods = Vec::new();
        for name in view.name_array("DigestMethod") {
            match DigestAlgorithm::from_pdf_name(&name) {
                Some(alg) => digest_methods.push(alg),
                None => options.tolerate(
                    Error::Signature(format!("unknown seed value digest method /{}", name)),
                    "/SV /DigestMethod",
                )?,
            }
        }

        let mdp = match view.dict_entry("MDP") {
            Some(mdp) => match DictView::new(&mdp, resolver).integer("P") {
                Some(p @ 0..=3) => Some(p as u8),
                Some(p) => {
                    options.tolerate(Error::Signature(format!("seed value MDP {} out of range", p)), "/SV /MDP")?;
                    None
                },
                None => None,
            },
            None => None,
        };

        let timestamp = view.dict_entry("TimeStamp").and_then(|ts| {
            let tv = DictView::new(&ts, resolver);
            let url = tv.text_or_name("URL")?;
            Some(TimeStampSeed {
                url,
                required: tv.integer("Ff") == Some(1),
            })
        });

        let lock_document = match view.get("LockDocument") {
            Some(Object::Name(n)) => match n.as_str() {
                "true" => LockDocument::True,
                "false" => LockDocument::False,
                _ => LockDocument::Auto,
            },
            Some(Object::Boolean(true)) => LockDocument::True,
            Some(Object::Boolean(false)) => LockDocument::False,
            _ => LockDocument::Auto,
        };

        let cert = match view.dict_entry("Cert") {
            Some(cert) => Some(parse_cert(DictView::new(&cert, resolver))),
            None => None,
        };

        Ok(Self {
            flags: view.flags("Ff"),
            filter: view.name("Filter"),
            sub_filters: view
                .name_array("SubFilter")
                .iter()
                .map(|n| SignatureSubFilter::from_pdf_name(n))
                .collect(),
            digest_methods,
            version: view.number("V"),
            cert,
            reasons: view.text_array("Reasons"),
            mdp,
            timestamp,
            legal_attestation: view.text_array("LegalAttestation"),
            add_rev_info: view.bool("AddRevInfo").unwrap_or(false),
            lock_document,
            appearance_filter: view.text("AppearanceFilter"),
            object_ref: obj.as_reference(),
        })
    }

    /// Check a signature against the required constraints.
    ///
    /// The digest method is taken from the signature references; when none
    /// declares one, the digest constraint cannot be checked and is skipped.
    pub fn check(&self, signature: &SignatureDictionary) -> Vec<SeedValueViolation> {
        let mut violations = Vec::new();

        if self.flags.contains(SeedValueFlags::FILTER) {
            if let Some(required) = &self.filter {
                if signature.filter.as_ref() != Some(required) {
                    violations.push(SeedValueViolation::Filter {
                        required: required.clone(),
                        found: signature.filter.clone(),
                    });
                }
            }
        }

        if self.flags.contains(SeedValueFlags::SUB_FILTER) && !self.sub_filters.is_empty() {
            let ok = signature
                .sub_filter
                .as_ref()
                .map(|sf| self.sub_filters.contains(sf))
                .unwrap_or(false);
            if !ok {
                violations.push(SeedValueViolation::SubFilter {
                    allowed: self.sub_filters.clone(),
                    found: signature.sub_filter.clone(),
                });
            }
        }

        if self.flags.contains(SeedValueFlags::DIGEST_METHOD) && !self.digest_methods.is_empty() {
            if let Some(found) = signature.references.iter().find_map(|r| r.digest_method) {
                if !self.digest_methods.contains(&found) {
                    violations.push(SeedValueViolation::DigestMethod {
                        allowed: self.digest_methods.clone(),
                        found,
                    });
                }
            }
        }

        if self.flags.contains(SeedValueFlags::REASONS) {
            if let Some(violation) = self.check_reason(signature.reason.as_deref()) {
                violations.push(violation);
            }
        }

        if self.flags.contains(SeedValueFlags::ADD_REV_INFO) && self.add_rev_info {
            let pkcs7 = matches!(
                signature.sub_filter,
                Some(SignatureSubFilter::Pkcs7Detached) | Some(SignatureSubFilter::Pkcs7Sha1)
            );
            if !pkcs7 {
                violations.push(SeedValueViolation::AddRevInfo {
                    found: signature.sub_filter.clone(),
                });
            }
        }

        if !violations.is_empty() {
            log::debug!("Signature violates {} seed value constraint(s)", violations.len());
        }
        violations
    }

    fn check_reason(&self, reason: Option<&str>) -> Option<SeedValueViolation> {
        // A single "." forbids giving a reason
        let no_reason = self.reasons.len() == 1 && self.reasons[0] == ".";
        let ok = match (no_reason, reason) {
            (true, None) => true,
            (true, Some(r)) => r.is_empty(),
            (false, _) if self.reasons.is_empty() => true,
            (false, Some(r)) => self.reasons.iter().any(|allowed| allowed == r),
            (false, None) => false,
        };
        if ok {
            return None;
        }
        Some(SeedValueViolation::Reason {
            allowed: if no_reason { Vec::new() } else { self.reasons.clone() },
            found: reason.map(str::to_string),
        })
    }
}

fn parse_cert<R: ObjectResolver + ?Sized>(view: DictView<'_, R>) -> CertSeedValue {
    let byte_strings = |key: &str| -> Vec<Vec<u8>> {
        match view.get(key) {
            Some(Object::Array(items)) => items
                .iter()
                .filter_map(|o| view.resolve_item(o)?.as_string().map(<[u8]>::to_vec))
                .collect(),
            Some(Object::String(s)) => vec![s],
            _ => Vec::new(),
        }
    };

    let subject_dns = view
        .array("SubjectDN")
        .unwrap_or_default()
        .iter()
        .filter_map(|o| view.resolve_item(o))
        .filter_map(|o| {
            let dn = o.as_dict()?;
            Some(
                dn.iter()
                    .filter_map(|(k, v)| v.as_string().map(|s| (k.clone(), decode_text_string(s))))
                    .collect::<IndexMap<_, _>>(),
            )
        })
        .collect();

    CertSeedValue {
        flags: view.flags("Ff"),
        subjects: byte_strings("Subject"),
        subject_dns,
        key_usage: view.text_array("KeyUsage"),
        issuers: byte_strings("Issuer"),
        oids: byte_strings("OID")
            .iter()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .collect(),
        url: view.text("URL"),
        url_type: view.name("URLType").unwrap_or_else(|| "Browser".to_string()),
    }
}
