//! Signature references and transform parameters.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.8.2 - Transform Methods.
//!
//! A signature reference dictionary (Table 253) names a transform method
//! (`DocMDP`, `UR3`, `FieldMDP`) and the parameters saying which changes the
//! signature permits after signing.

use crate::config::ModelOptions;
use crate::dictionary::DictView;
use crate::error::{Error, Result};
use crate::library::{resolve_dict, ObjectResolver};
use crate::object::{Object, ObjectRef};
use super::types::DigestAlgorithm;

/// Transform method of a signature reference (`TransformMethod`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformMethod {
    /// Certification signature
    DocMdp,
    /// Usage rights, PDF 1.5 form
    Ur,
    /// Usage rights
    Ur3,
    /// Changes restricted to a set of fields
    FieldMdp,
    /// Identity transform (deprecated)
    Identity,
    /// Unrecognized method
    Unknown(String),
}

impl TransformMethod {
    /// Parse a method name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "DocMDP" => TransformMethod::DocMdp,
            "UR" => TransformMethod::Ur,
            "UR3" => TransformMethod::Ur3,
            "FieldMDP" => TransformMethod::FieldMdp,
            "Identity" => TransformMethod::Identity,
            other => TransformMethod::Unknown(other.to_string()),
        }
    }
}

/// Changes permitted by a certification signature (`P` in DocMDP params).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum MdpPermission {
    /// No changes permitted
    NoChanges = 1,
    /// Form fill-in, page templates and signing
    #[default]
    FormFilling = 2,
    /// As `FormFilling`, plus annotation creation, deletion and modification
    Annotations = 3,
}

impl MdpPermission {
    /// Convert a `P` value. Values outside 1..=3 are rejected.
    pub fn from_pdf_int(value: i64) -> Option<Self> {
        match value {
            1 => Some(MdpPermission::NoChanges),
            2 => Some(MdpPermission::FormFilling),
            3 => Some(MdpPermission::Annotations),
            _ => None,
        }
    }

    /// The `P` value.
    pub fn to_pdf_int(self) -> i64 {
        self as i64
    }

    /// Check whether filling in form fields is permitted.
    pub fn allows_form_filling(&self) -> bool {
        *self >= MdpPermission::FormFilling
    }

    /// Check whether annotation changes are permitted.
    pub fn allows_annotations(&self) -> bool {
        *self == MdpPermission::Annotations
    }
}

/// Which fields an `Action` applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMdpAction {
    /// Every field in the document
    All,
    /// Only the listed fields
    Include,
    /// Every field except the listed ones
    Exclude,
}

impl FieldMdpAction {
    /// Parse an `Action` name.
    pub fn from_pdf_name(name: &str) -> Option<Self> {
        match name {
            "All" => Some(FieldMdpAction::All),
            "Include" => Some(FieldMdpAction::Include),
            "Exclude" => Some(FieldMdpAction::Exclude),
            _ => None,
        }
    }
}

/// A set of fields selected by an action and a name list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    /// Selection mode
    pub action: FieldMdpAction,
    /// Fully qualified field names
    pub fields: Vec<String>,
}

impl FieldSet {
    pub(crate) fn from_view<R: ObjectResolver + ?Sized>(view: DictView<'_, R>, context: &str) -> Result<Self> {
        let action_name = view.name("Action").ok_or_else(|| Error::missing(context, "Action"))?;
        let action = FieldMdpAction::from_pdf_name(&action_name)
            .ok_or_else(|| Error::Signature(format!("unknown {} action /{}", context, action_name)))?;
        let fields = view.text_array("Fields");
        if action != FieldMdpAction::All && !view.contains("Fields") {
            return Err(Error::missing(context, "Fields"));
        }
        Ok(Self { action, fields })
    }

    /// Check whether the field with this fully qualified name is selected.
    ///
    /// A listed name also selects the fields below it.
    pub fn contains(&self, qualified_name: &str) -> bool {
        let listed = self.fields.iter().any(|f| {
            qualified_name == f
                || (qualified_name.starts_with(f.as_str()) && qualified_name.as_bytes().get(f.len()) == Some(&b'.'))
        });
        match self.action {
            FieldMdpAction::All => true,
            FieldMdpAction::Include => listed,
            FieldMdpAction::Exclude => !listed,
        }
    }
}

/// Usage rights granted by a UR3 signature (Table 255).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UsageRights {
    /// Document-wide rights (`Document`), e.g. `FullSave`
    pub document: Vec<String>,
    /// Message shown by the viewer (`Msg`)
    pub message: Option<String>,
    /// Annotation rights (`Annots`)
    pub annots: Vec<String>,
    /// Form rights (`Form`)
    pub form: Vec<String>,
    /// Signature rights (`Signature`)
    pub signature: Vec<String>,
    /// Embedded file rights (`EF`)
    pub embedded_files: Vec<String>,
    /// Restrict other permissions (`P`)
    pub restrict_others: bool,
    /// Parameter version (`V`)
    pub version: Option<String>,
}

impl UsageRights {
    /// Check whether a form right (e.g. `FillIn`) is granted.
    pub fn allows_form(&self, right: &str) -> bool {
        self.form.iter().any(|r| r == right)
    }

    /// Check whether an annotation right (e.g. `Create`) is granted.
    pub fn allows_annots(&self, right: &str) -> bool {
        self.annots.iter().any(|r| r == right)
    }
}

/// Transform parameters (`TransformParams`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformParams {
    /// DocMDP parameters (Table 254)
    DocMdp {
        /// Permitted changes
        permissions: MdpPermission,
        /// Parameter version (`V`)
        version: Option<String>,
    },
    /// FieldMDP parameters (Table 256)
    FieldMdp {
        /// Locked fields
        fields: FieldSet,
        /// Parameter version (`V`)
        version: Option<String>,
    },
    /// UR3 parameters (Table 255)
    Ur3(UsageRights),
    /// Parameters of other methods, or absent
    None,
}

impl TransformParams {
    /// Check whether FieldMDP parameters lock a field.
    pub fn locks(&self, qualified_name: &str) -> bool {
        match self {
            TransformParams::FieldMdp { fields, .. } => fields.contains(qualified_name),
            _ => false,
        }
    }
}

/// A signature reference dictionary (`Reference` array entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureReference {
    /// Transform method
    pub method: TransformMethod,
    /// Transform parameters
    pub params: TransformParams,
    /// Digest method (`DigestMethod`)
    pub digest_method: Option<DigestAlgorithm>,
    /// Object the transform applies to (`Data`)
    pub data: Option<ObjectRef>,
}

impl SignatureReference {
    /// Parse a signature reference dictionary.
    pub fn parse<R: ObjectResolver + ?Sized>(resolver: &R, obj: &Object, options: &ModelOptions) -> Result<Self> {
        let dict = resolve_dict(resolver, obj)?;
        let view = DictView::new(&dict, resolver);
        let method_name = view
            .name("TransformMethod")
            .ok_or_else(|| Error::missing("SigRef", "TransformMethod"))?;
        let method = TransformMethod::from_pdf_name(&method_name);

        let params = match view.dict_entry("TransformParams") {
            Some(params_dict) => {
                let pv = DictView::new(&params_dict, resolver);
                match Self::parse_params(&method, pv) {
                    Ok(params) => params,
                    Err(e) => {
                        options.tolerate(e, "signature /TransformParams")?;
                        TransformParams::None
                    },
                }
            },
            None if method == TransformMethod::DocMdp => TransformParams::DocMdp {
                permissions: MdpPermission::default(),
                version: None,
            },
            None => TransformParams::None,
        };

        let digest_method = view.name("DigestMethod").and_then(|n| {
            let alg = DigestAlgorithm::from_pdf_name(&n);
            if alg.is_none() {
                log::debug!("Unknown signature reference digest method /{}", n);
            }
            alg
        });

        Ok(Self {
            method,
            params,
            digest_method,
            data: view.reference("Data"),
        })
    }

    fn parse_params<R: ObjectResolver + ?Sized>(method: &TransformMethod, pv: DictView<'_, R>) -> Result<TransformParams> {
        let version = pv.name("V");
        match method {
            TransformMethod::DocMdp => {
                let permissions = match pv.integer("P") {
                    Some(p) => MdpPermission::from_pdf_int(p)
                        .ok_or_else(|| Error::Signature(format!("DocMDP permission {} out of range", p)))?,
                    None => MdpPermission::default(),
                };
                Ok(TransformParams::DocMdp { permissions, version })
            },
            TransformMethod::FieldMdp => Ok(TransformParams::FieldMdp {
                fields: FieldSet::from_view(pv, "FieldMDP")?,
                version,
            }),
            TransformMethod::Ur | TransformMethod::Ur3 => Ok(TransformParams::Ur3(UsageRights {
                document: pv.name_array("Document"),
                message: pv.text("Msg"),
                annots: pv.name_array("Annots"),
                form: pv.name_array("Form"),
                signature: pv.name_array("Signature"),
                embedded_files: pv.name_array("EF"),
                restrict_others: pv.bool("P").unwrap_or(false),
                version,
            })),
            _ => Ok(TransformParams::None),
        }
    }

    /// DocMDP permission of a certification reference.
    pub fn docmdp_permission(&self) -> Option<MdpPermission> {
        match (&self.method, &self.params) {
            (TransformMethod::DocMdp, TransformParams::DocMdp { permissions, .. }) => Some(*permissions),
            _ => None,
        }
    }
}
