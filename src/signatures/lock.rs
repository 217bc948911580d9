//! Signature field lock dictionaries (`Lock`, Table 233).

use super::reference::{FieldSet, MdpPermission};
use crate::config::ModelOptions;
use crate::dictionary::DictView;
use crate::error::{Error, Result};
use crate::library::{resolve_dict, ObjectResolver};
use crate::object::Object;

/// Fields locked once the signature field is signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureLock {
    /// Locked fields
    pub fields: FieldSet,
    /// Document permission applied on signing (`P`, PDF 2.0)
    pub permissions: Option<MdpPermission>,
}

impl SignatureLock {
    /// Parse a `SigFieldLock` dictionary.
    pub fn parse<R: ObjectResolver + ?Sized>(resolver: &R, obj: &Object, options: &ModelOptions) -> Result<Self> {
        let dict = resolve_dict(resolver, obj)?;
        let view = DictView::new(&dict, resolver);
        let fields = FieldSet::from_view(view, "SigFieldLock")?;

        let permissions = match view.integer("P") {
            Some(p) => match MdpPermission::from_pdf_int(p) {
                Some(perm) => Some(perm),
                None => {
                    options.tolerate(
                        Error::Signature(format!("lock permission {} out of range", p)),
                        "/Lock /P",
                    )?;
                    None
                },
            },
            None => None,
        };
        Ok(Self { fields, permissions })
    }

    /// Check whether signing locks the field with this qualified name.
    pub fn locks(&self, qualified_name: &str) -> bool {
        self.fields.contains(qualified_name)
    }
}
