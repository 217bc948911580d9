//! Signature dictionaries (Table 252).
//!
//! The value of a signed signature field. Only the structure is read here;
//! cryptographic checks of `Contents` belong to a [`SignatureHandler`].
//!
//! [`SignatureHandler`]: super::SignatureHandler

use super::byterange::ByteRange;
use super::reference::{MdpPermission, SignatureReference};
use super::types::SignatureSubFilter;
use crate::config::ModelOptions;
use crate::dictionary::DictView;
use crate::error::{Error, Result};
use crate::library::{resolve_dict, ObjectResolver};
use crate::object::{Object, ObjectRef};
use crate::text_string::PdfDate;

/// Kind of signature dictionary (`Type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureKind {
    /// Ordinary signature (`Sig`)
    #[default]
    Signature,
    /// Document timestamp (`DocTimeStamp`)
    DocTimeStamp,
}

/// Names from the signature build properties (`Prop_Build`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildProperties {
    /// Signature handler that created the signature
    pub filter: Option<String>,
    /// Public-key security handler
    pub pub_sec: Option<String>,
    /// Signing application
    pub app: Option<String>,
}

/// A signature dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureDictionary {
    /// Object reference when the dictionary is indirect
    pub object_ref: Option<ObjectRef>,
    /// Dictionary type
    pub kind: SignatureKind,
    /// Preferred signature handler (`Filter`)
    pub filter: Option<String>,
    /// Encoding of the signature value (`SubFilter`)
    pub sub_filter: Option<SignatureSubFilter>,
    /// Signature value (`Contents`)
    pub contents: Vec<u8>,
    /// Signing certificate and chain (`Cert`, adbe.x509.rsa_sha1 only)
    pub certificates: Vec<Vec<u8>>,
    /// Signed byte ranges (`ByteRange`)
    pub byte_range: Option<ByteRange>,
    /// Signature references (`Reference`)
    pub references: Vec<SignatureReference>,
    /// Changed pages, fields and annotations since the previous signature (`Changes`)
    pub changes: Option<[i64; 3]>,
    /// Signer name (`Name`)
    pub name: Option<String>,
    /// Signing time (`M`)
    pub signing_time: Option<PdfDate>,
    /// Signing location (`Location`)
    pub location: Option<String>,
    /// Signing reason (`Reason`)
    pub reason: Option<String>,
    /// Signer contact information (`ContactInfo`)
    pub contact_info: Option<String>,
    /// Handler revision (`R`)
    pub revision: Option<i64>,
    /// Dictionary version (`V`)
    pub version: i64,
    /// Build properties (`Prop_Build`)
    pub build: Option<BuildProperties>,
    /// Seconds since authentication (`Prop_AuthTime`)
    pub auth_time: Option<i64>,
    /// Authentication method (`Prop_AuthType`)
    pub auth_type: Option<String>,
}

impl SignatureDictionary {
    /// Parse a signature dictionary.
    ///
    /// `Filter`, `Contents` and (for ordinary signatures) `ByteRange` are
    /// required; a missing or malformed one is an error in strict mode.
    pub fn parse<R: ObjectResolver + ?Sized>(resolver: &R, obj: &Object, options: &ModelOptions) -> Result<Self> {
        let dict = resolve_dict(resolver, obj)?;
        let view = DictView::new(&dict, resolver);

        let kind = match view.name("Type").as_deref() {
            Some("DocTimeStamp") => SignatureKind::DocTimeStamp,
            Some("Sig") | None => SignatureKind::Signature,
            Some(other) => {
                log::debug!("Signature dictionary with /Type /{}", other);
                SignatureKind::Signature
            },
        };

        let filter = view.name("Filter");
        if filter.is_none() {
            options.tolerate(Error::missing("Sig", "Filter"), "signature")?;
        }
        let contents = match view.bytes("Contents") {
            Some(c) => c,
            None => {
                options.tolerate(Error::missing("Sig", "Contents"), "signature")?;
                Vec::new()
            },
        };

        let byte_range = match view.array("ByteRange") {
            Some(items) => {
                let ints: Option<Vec<i64>> = items.iter().map(|o| view.resolve_item(o)?.as_integer()).collect();
                let parsed = ints
                    .ok_or_else(|| Error::ByteRange("non-integer element".into()))
                    .and_then(|v| ByteRange::from_integers(&v));
                match parsed {
                    Ok(br) => Some(br),
                    Err(e) => {
                        options.tolerate(e, "signature /ByteRange")?;
                        None
                    },
                }
            },
            None => {
                if kind == SignatureKind::Signature {
                    options.tolerate(Error::missing("Sig", "ByteRange"), "signature")?;
                }
                None
            },
        };

        let mut references = Vec::new();
        for item in view.array("Reference").unwrap_or_default() {
            match SignatureReference::parse(resolver, &item, options) {
                Ok(r) => references.push(r),
                Err(e) => options.tolerate(e, "signature /Reference")?,
            }
        }

        let certificates = match view.get("Cert") {
            Some(Object::String(cert)) => vec![cert],
            Some(Object::Array(items)) => items
                .iter()
                .filter_map(|o| view.resolve_item(o)?.as_string().map(<[u8]>::to_vec))
                .collect(),
            _ => Vec::new(),
        };

        let changes = view
            .number_array("Changes")
            .filter(|c| c.len() == 3)
            .map(|c| [c[0] as i64, c[1] as i64, c[2] as i64]);

        let build = view.dict_entry("Prop_Build").map(|pb| {
            let pbv = DictView::new(&pb, resolver);
            let entry_name = |key: &str| {
                pbv.dict_entry(key)
                    .and_then(|d| DictView::new(&d, resolver).text_or_name("Name"))
            };
            BuildProperties {
                filter: entry_name("Filter"),
                pub_sec: entry_name("PubSec"),
                app: entry_name("App"),
            }
        });

        Ok(Self {
            object_ref: obj.as_reference(),
            kind,
            filter,
            sub_filter: view.name("SubFilter").map(|n| SignatureSubFilter::from_pdf_name(&n)),
            contents,
            certificates,
            byte_range,
            references,
            changes,
            name: view.text("Name"),
            signing_time: view.date("M"),
            location: view.text("Location"),
            reason: view.text("Reason"),
            contact_info: view.text("ContactInfo"),
            revision: view.integer("R"),
            version: view.integer("V").unwrap_or(0),
            build,
            auth_time: view.integer("Prop_AuthTime"),
            auth_type: view.name("Prop_AuthType"),
        })
    }

    /// DocMDP permission when this is a certification signature.
    pub fn docmdp_permission(&self) -> Option<MdpPermission> {
        self.references.iter().find_map(SignatureReference::docmdp_permission)
    }

    /// Check whether the signature value is present.
    pub fn has_contents(&self) -> bool {
        self.contents.iter().any(|b| *b != 0)
    }

    /// Check whether any FieldMDP reference locks a field.
    pub fn locks_field(&self, qualified_name: &str) -> bool {
        self.references.iter().any(|r| r.params.locks(qualified_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ObjectStore;
    use crate::object::Dictionary;

    fn signature_dict() -> Dictionary {
        Dictionary::from([
            ("Type".to_string(), Object::name("Sig")),
            ("Filter".to_string(), Object::name("Adobe.PPKLite")),
            ("SubFilter".to_string(), Object::name("adbe.pkcs7.detached")),
            ("Contents".to_string(), Object::String(vec![0x30, 0x82, 0x01])),
            ("ByteRange".to_string(), Object::Array(vec![
                Object::Integer(0),
                Object::Integer(10),
                Object::Integer(20),
                Object::Integer(5),
            ])),
            ("Name".to_string(), Object::text("Jane Doe")),
            ("Reason".to_string(), Object::text("Approval")),
            ("M".to_string(), Object::text("D:20230115103000+01'00'")),
            (
                "Prop_Build".to_string(),
                Object::dictionary([("App", Object::dictionary([("Name", Object::name("Acrobat"))]))]),
            ),
        ])
    }

    #[test]
    fn test_parse_signature() {
        let store = ObjectStore::new();
        let sig = SignatureDictionary::parse(
            &store,
            &Object::Dictionary(signature_dict()),
            &ModelOptions::strict(),
        )
        .unwrap();
        assert_eq!(sig.kind, SignatureKind::Signature);
        assert_eq!(sig.sub_filter, Some(SignatureSubFilter::Pkcs7Detached));
        assert_eq!(sig.name.as_deref(), Some("Jane Doe"));
        assert_eq!(sig.version, 0);
        assert!(sig.has_contents());
        assert!(sig.byte_range.as_ref().unwrap().covers_whole_document(25));
        assert!(sig.signing_time.as_ref().unwrap().parsed.is_some());
        assert_eq!(sig.build.as_ref().unwrap().app.as_deref(), Some("Acrobat"));
        assert_eq!(sig.docmdp_permission(), None);
    }

    #[test]
    fn test_missing_byte_range() {
        let store = ObjectStore::new();
        let mut dict = signature_dict();
        dict.remove("ByteRange");
        let obj = Object::Dictionary(dict);
        assert!(SignatureDictionary::parse(&store, &obj, &ModelOptions::strict()).is_err());
        let sig = SignatureDictionary::parse(&store, &obj, &ModelOptions::lenient()).unwrap();
        assert!(sig.byte_range.is_none());
    }

    #[test]
    fn test_doc_timestamp_without_byte_range() {
        let store = ObjectStore::new();
        let obj = Object::dictionary([
            ("Type", Object::name("DocTimeStamp")),
            ("Filter", Object::name("Adobe.PPKLite")),
            ("SubFilter", Object::name("ETSI.RFC3161")),
            ("Contents", Object::String(vec![1, 2, 3])),
        ]);
        let sig = SignatureDictionary::parse(&store, &obj, &ModelOptions::strict()).unwrap();
        assert_eq!(sig.kind, SignatureKind::DocTimeStamp);
        assert_eq!(sig.sub_filter, Some(SignatureSubFilter::Rfc3161));
    }

    #[test]
    fn test_certification_reference() {
        let store = ObjectStore::new();
        let mut dict = signature_dict();
        dict.insert(
            "Reference".into(),
            Object::Array(vec![Object::dictionary([
                ("TransformMethod", Object::name("DocMDP")),
                ("TransformParams", Object::dictionary([("P", Object::Integer(3))])),
            ])]),
        );
        let sig = SignatureDictionary::parse(&store, &Object::Dictionary(dict), &ModelOptions::strict()).unwrap();
        assert_eq!(sig.docmdp_permission(), Some(MdpPermission::Annotations));
    }
}
