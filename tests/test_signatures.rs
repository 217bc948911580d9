//! Integration tests for signature fields: certification, locks, seed
//! values and verification through a handler.

use pdf_acroform::signatures::{
    ByteRange, DigestAlgorithm, MdpPermission, SeedValueViolation, SignatureSubFilter, TransformMethod,
};
use pdf_acroform::{
    Dictionary, InteractiveForm, ModelOptions, Object, ObjectRef, ObjectStore, Result, SignatureDictionary,
    SignatureHandler, VerificationStatus,
};
use proptest::prelude::*;
use sha2::{Digest, Sha256};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Accepts a signature whose `Contents` is the SHA-256 of the signed bytes.
struct DigestHandler;

impl SignatureHandler for DigestHandler {
    fn verify(&self, signature: &SignatureDictionary, signed_content: &[u8]) -> Result<VerificationStatus> {
        if Sha256::digest(signed_content).as_slice() == signature.contents.as_slice() {
            Ok(VerificationStatus::Valid)
        } else {
            Ok(VerificationStatus::Invalid)
        }
    }
}

const FILE: &[u8] = b"%PDF-1<sig-gap>rest-of-file";

fn signed_digest(ranges: &[i64]) -> Vec<u8> {
    let range = ByteRange::from_integers(ranges).unwrap();
    range.digest(FILE, DigestAlgorithm::Sha256).unwrap()
}

fn int_array(values: &[i64]) -> Object {
    Object::Array(values.iter().map(|v| Object::Integer(*v)).collect())
}

/// Two signature fields over a `details` group:
///
/// - `author` certifies with DocMDP P=2 and locks `details`
/// - `approval` carries a FieldMDP reference excluding `details.note` and a
///   seed value it does not satisfy; its byte range stops short of the file end
fn build_document() -> (ObjectStore, InteractiveForm) {
    let mut store = ObjectStore::new();
    let file_len = FILE.len() as i64;

    let author_ranges = [0, 6, 15, file_len - 15];
    let author_sig = store.add(Object::dictionary([
        ("Type", Object::name("Sig")),
        ("Filter", Object::name("Adobe.PPKLite")),
        ("SubFilter", Object::name("adbe.pkcs7.detached")),
        ("Contents", Object::string(signed_digest(&author_ranges))),
        ("ByteRange", int_array(&author_ranges)),
        ("Name", Object::text("Author")),
        ("M", Object::text("D:20240301120000Z")),
        (
            "Reference",
            Object::Array(vec![Object::dictionary([
                ("Type", Object::name("SigRef")),
                ("TransformMethod", Object::name("DocMDP")),
                ("DigestMethod", Object::name("SHA256")),
                (
                    "TransformParams",
                    Object::dictionary([
                        ("Type", Object::name("TransformParams")),
                        ("P", Object::Integer(2)),
                        ("V", Object::name("1.2")),
                    ]),
                ),
            ])]),
        ),
    ]));
    let author = store.add(Object::dictionary([
        ("FT", Object::name("Sig")),
        ("T", Object::text("author")),
        ("V", Object::Reference(author_sig)),
        (
            "Lock",
            Object::dictionary([
                ("Type", Object::name("SigFieldLock")),
                ("Action", Object::name("Include")),
                ("Fields", Object::Array(vec![Object::text("details")])),
            ]),
        ),
    ]));

    let approval_ranges = [0, 6, 15, 4];
    let approval_sig = store.add(Object::dictionary([
        ("Filter", Object::name("Adobe.PPKMS")),
        ("SubFilter", Object::name("ETSI.CAdES.detached")),
        ("Contents", Object::string(signed_digest(&approval_ranges))),
        ("ByteRange", int_array(&approval_ranges)),
        ("Reason", Object::text("Rejected")),
        (
            "Reference",
            Object::Array(vec![Object::dictionary([
                ("TransformMethod", Object::name("FieldMDP")),
                (
                    "TransformParams",
                    Object::dictionary([
                        ("Action", Object::name("Exclude")),
                        ("Fields", Object::Array(vec![Object::text("details.note")])),
                    ]),
                ),
            ])]),
        ),
    ]));
    let approval = store.add(Object::dictionary([
        ("FT", Object::name("Sig")),
        ("T", Object::text("approval")),
        ("V", Object::Reference(approval_sig)),
        (
            "SV",
            Object::dictionary([
                ("Type", Object::name("SV")),
                ("Ff", Object::Integer(0b1011)),
                ("Filter", Object::name("Adobe.PPKLite")),
                ("SubFilter", Object::Array(vec![Object::name("ETSI.CAdES.detached")])),
                ("Reasons", Object::Array(vec![Object::text("Approved"), Object::text("Reviewed")])),
            ]),
        ),
    ]));

    let pending = store.add(Object::dictionary([
        ("FT", Object::name("Sig")),
        ("T", Object::text("witness")),
    ]));

    let details = ObjectRef::new(90, 0);
    let name = store.add(Object::dictionary([
        ("T", Object::text("name")),
        ("Parent", Object::Reference(details)),
    ]));
    let note = store.add(Object::dictionary([
        ("T", Object::text("note")),
        ("Parent", Object::Reference(details)),
    ]));
    store.insert(
        details,
        Object::dictionary([
            ("T", Object::text("details")),
            ("FT", Object::name("Tx")),
            ("Kids", Object::Array(vec![Object::Reference(name), Object::Reference(note)])),
        ]),
    );

    let acroform = store.add(Object::dictionary([
        (
            "Fields",
            Object::Array(vec![
                Object::Reference(approval),
                Object::Reference(author),
                Object::Reference(pending),
                Object::Reference(details),
            ]),
        ),
        ("SigFlags", Object::Integer(3)),
    ]));
    let catalog = store.add(Object::dictionary([
        ("AcroForm", Object::Reference(acroform)),
        ("Perms", Object::dictionary([("DocMDP", Object::Reference(author_sig))])),
    ]));
    store.set_catalog(catalog);

    let form = InteractiveForm::from_catalog(&store, &store.catalog().unwrap(), &ModelOptions::strict())
        .unwrap()
        .unwrap();
    (store, form)
}

#[test]
fn test_signature_fields() {
    init();
    let (_, form) = build_document();

    let names: Vec<String> = form
        .signature_fields()
        .iter()
        .map(|f| f.field().full_name.clone())
        .collect();
    assert_eq!(names, vec!["approval", "author", "witness"]);
    assert!(form.has_signatures());
    assert!(form.sig_flags.bits() == 3);

    let witness = form.signature_fields()[2];
    assert!(!witness.is_signed());
    assert!(witness.signature().is_none());
    assert!(witness.seed_value_violations().is_empty());
}

#[test]
fn test_certification() {
    init();
    let (_, form) = build_document();

    // approval comes first in document order but has no DocMDP reference
    let cert = form.certification_signature().unwrap();
    assert_eq!(cert.field().full_name, "author");
    assert_eq!(form.document_mdp_permission(), Some(MdpPermission::FormFilling));
    assert!(MdpPermission::FormFilling.allows_form_filling());
    assert!(!MdpPermission::FormFilling.allows_annotations());

    let sig = cert.signature().unwrap();
    assert_eq!(sig.sub_filter, Some(SignatureSubFilter::Pkcs7Detached));
    assert_eq!(sig.name.as_deref(), Some("Author"));
    assert!(sig.signing_time.as_ref().and_then(|d| d.parsed).is_some());
    let reference = &sig.references[0];
    assert_eq!(reference.method, TransformMethod::DocMdp);
    assert_eq!(reference.digest_method, Some(DigestAlgorithm::Sha256));
}

#[test]
fn test_field_locks() {
    init();
    let (_, form) = build_document();
    let fields = form.signature_fields();
    let (approval, author) = (fields[0], fields[1]);

    // Lock dictionary: details and its kids
    assert!(author.locks_field("details"));
    assert!(author.locks_field("details.name"));
    assert!(!author.locks_field("approval"));
    assert!(!author.locks_field("detailsX"));

    // FieldMDP Exclude: everything but details.note
    assert!(approval.locks_field("details.name"));
    assert!(!approval.locks_field("details.note"));
}

#[test]
fn test_seed_value_violations() {
    init();
    let (_, form) = build_document();
    let approval = form.signature_fields()[0];

    let violations = approval.seed_value_violations();
    assert_eq!(
        violations,
        vec![
            SeedValueViolation::Filter {
                required: "Adobe.PPKLite".into(),
                found: Some("Adobe.PPKMS".into()),
            },
            SeedValueViolation::Reason {
                allowed: vec!["Approved".into(), "Reviewed".into()],
                found: Some("Rejected".into()),
            },
        ]
    );
}

#[test]
fn test_verify() {
    init();
    let (_, form) = build_document();
    let fields = form.signature_fields();

    assert_eq!(fields[1].verify(&DigestHandler, FILE).unwrap(), VerificationStatus::Valid);
    // Valid, but the byte range leaves the end of the file unsigned
    assert_eq!(
        fields[0].verify(&DigestHandler, FILE).unwrap(),
        VerificationStatus::ValidWithWarnings
    );

    let mut tampered = FILE.to_vec();
    tampered[2] = b'X';
    assert_eq!(fields[1].verify(&DigestHandler, &tampered).unwrap(), VerificationStatus::Invalid);

    // Only the excluded gap changed
    let mut gap_changed = FILE.to_vec();
    gap_changed[8] = b'?';
    assert_eq!(fields[1].verify(&DigestHandler, &gap_changed).unwrap(), VerificationStatus::Valid);

    assert!(fields[1].verify(&DigestHandler, &FILE[..10]).is_err());
    assert!(fields[2].verify(&DigestHandler, FILE).is_err());
}

#[test]
fn test_handler_as_trait_object() {
    init();
    let (_, form) = build_document();
    let handler: Box<dyn SignatureHandler> = Box::new(DigestHandler);
    let author = form.certification_signature().unwrap();
    assert!(author.verify(handler.as_ref(), FILE).unwrap().is_valid());
}

#[test]
fn test_malformed_byte_range() {
    init();
    let store = ObjectStore::new();
    let sig = Object::dictionary([
        ("Filter", Object::name("Adobe.PPKLite")),
        ("Contents", Object::string(vec![1, 2, 3])),
        ("ByteRange", int_array(&[0, 10, 5, 10])),
    ]);

    assert!(SignatureDictionary::parse(&store, &sig, &ModelOptions::strict()).is_err());
    let parsed = SignatureDictionary::parse(&store, &sig, &ModelOptions::lenient()).unwrap();
    assert!(parsed.byte_range.is_none());
    assert!(parsed.has_contents());
}

#[test]
fn test_timestamp_needs_no_byte_range_entry() {
    init();
    let store = ObjectStore::new();
    let mut dict = Dictionary::new();
    dict.insert("Type".into(), Object::name("DocTimeStamp"));
    dict.insert("Filter".into(), Object::name("Adobe.PPKLite"));
    dict.insert("SubFilter".into(), Object::name("ETSI.RFC3161"));
    dict.insert("Contents".into(), Object::string(vec![0u8; 8]));

    let parsed = SignatureDictionary::parse(&store, &Object::Dictionary(dict), &ModelOptions::strict()).unwrap();
    assert_eq!(parsed.sub_filter, Some(SignatureSubFilter::Rfc3161));
    assert!(!parsed.has_contents());
}

proptest! {
    #[test]
    fn prop_two_ranges_around_gap(head in 1u64..64, gap in 1u64..64, tail in 0u64..64) {
        let file_len = head + gap + tail;
        let range = ByteRange::from_integers(&[0, head as i64, (head + gap) as i64, tail as i64]).unwrap();

        prop_assert_eq!(range.signed_len(), head + tail);
        prop_assert_eq!(range.excluded_gap(), Some((head, gap)));
        prop_assert!(range.covers_whole_document(file_len));
        prop_assert!(!range.covers_whole_document(file_len + 1));

        let file: Vec<u8> = (0..file_len).map(|i| (i % 251) as u8).collect();
        let signed = range.signed_content(&file).unwrap();
        let mut expected = file[..head as usize].to_vec();
        expected.extend_from_slice(&file[(head + gap) as usize..]);
        prop_assert_eq!(&signed, &expected);
        prop_assert_eq!(
            range.digest(&file, DigestAlgorithm::Sha256).unwrap(),
            Sha256::digest(&expected).to_vec()
        );
    }

    #[test]
    fn prop_overlapping_ranges_rejected(start in 0i64..32, len in 2i64..32, back in 1i64..32) {
        let second = start + len - back.min(len);
        prop_assert!(ByteRange::from_integers(&[start, len, second, 4]).is_err());
    }
}
