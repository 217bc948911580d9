//! Interactive forms (AcroForm).
//!
//! Reads the document's interactive form dictionary and its field tree.
//! See ISO 32000-1:2008, Section 12.7 - Interactive Forms.
//!
//! # Example
//!
//! ```
//! use pdf_acroform::acroform::{Field, InteractiveForm};
//! use pdf_acroform::config::ModelOptions;
//! use pdf_acroform::library::ObjectStore;
//! use pdf_acroform::object::Object;
//!
//! let mut store = ObjectStore::new();
//! let name = store.add(Object::dictionary([
//!     ("FT", Object::name("Tx")),
//!     ("T", Object::text("name")),
//!     ("V", Object::text("John")),
//! ]));
//! let acroform = store.add(Object::dictionary([("Fields", Object::Array(vec![Object::Reference(name)]))]));
//! let catalog = store.add(Object::dictionary([("AcroForm", Object::Reference(acroform))]));
//! store.set_catalog(catalog);
//!
//! let form = InteractiveForm::from_catalog(&store, &store.catalog()?, &ModelOptions::default())?
//!     .expect("document has a form");
//! match form.typed_field("name") {
//!     Some(Field::Text(text)) => assert_eq!(text.text(), "John"),
//!     _ => unreachable!(),
//! }
//! # Ok::<(), pdf_acroform::error::Error>(())
//! ```

pub mod button;
pub mod choice;
pub mod edit;
pub mod export;
pub mod field;
pub mod flags;
pub mod text;

pub use button::{ButtonField, ButtonKind};
pub use choice::ChoiceField;
pub use edit::EditOptions;
pub use export::FormData;
pub use field::{lookup_inherited, ChoiceOption, FieldDictionary, FieldType, FieldValue, INHERITABLE_KEYS};
pub use flags::{FieldFlags, SignatureFlags};
pub use text::TextField;

use crate::annotation_types::TextAlignment;
use crate::annotations::Annotation;
use crate::config::ModelOptions;
use crate::dictionary::DictView;
use crate::error::{Error, Result};
use crate::library::{resolve_dict, resolve_entry, ChainLimited, ObjectResolver};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::signatures::{MdpPermission, SignatureField};
use field::FormDefaults;
use std::collections::{HashMap, HashSet};

/// Typed view of a field.
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    /// Push button, check box or radio group
    Button(ButtonField<'a>),
    /// Text field
    Text(TextField<'a>),
    /// List box or combo box
    Choice(ChoiceField<'a>),
    /// Signature field
    Signature(SignatureField<'a>),
    /// Field without a known type, including non-terminal fields
    Unknown(&'a FieldDictionary),
}

impl<'a> Field<'a> {
    /// View a field according to its (inherited) type.
    pub fn from_dictionary(field: &'a FieldDictionary) -> Self {
        match field.field_type() {
            Some(FieldType::Button) => Field::Button(ButtonField::new(field)),
            Some(FieldType::Text) => Field::Text(TextField::new(field)),
            Some(FieldType::Choice) => Field::Choice(ChoiceField::new(field)),
            Some(FieldType::Signature) => Field::Signature(SignatureField::new(field)),
            _ => Field::Unknown(field),
        }
    }

    /// The underlying field dictionary.
    pub fn dictionary(&self) -> &'a FieldDictionary {
        match self {
            Field::Button(f) => f.field(),
            Field::Text(f) => f.field(),
            Field::Choice(f) => f.field(),
            Field::Signature(f) => f.field(),
            Field::Unknown(f) => f,
        }
    }
}

/// The document's interactive form (`AcroForm`, Table 218).
#[derive(Debug, Clone)]
pub struct InteractiveForm {
    /// Object reference when the AcroForm dictionary is indirect
    pub object_ref: Option<ObjectRef>,
    /// Complete AcroForm dictionary
    pub dict: Dictionary,
    /// Construct appearances when displaying (`NeedAppearances`)
    pub need_appearances: bool,
    /// Signature flags (`SigFlags`)
    pub sig_flags: SignatureFlags,
    /// Default resources (`DR`)
    pub default_resources: Option<Dictionary>,
    /// Form-wide default appearance (`DA`)
    pub default_appearance: Option<String>,
    /// Form-wide quadding (`Q`)
    pub quadding: TextAlignment,
    /// Whether an XFA form is present (`XFA`)
    pub has_xfa: bool,
    /// Signature dictionary referenced by the catalog's `Perms/DocMDP`
    pub docmdp_signature: Option<ObjectRef>,
    calculation_order: Vec<ObjectRef>,
    fields: Vec<FieldDictionary>,
    roots: Vec<usize>,
    by_name: HashMap<String, usize>,
    by_ref: HashMap<ObjectRef, usize>,
}

struct TreeWalker<'r, R: ObjectResolver + ?Sized> {
    resolver: &'r R,
    options: &'r ModelOptions,
    defaults: FormDefaults,
    visited: HashSet<ObjectRef>,
    fields: Vec<FieldDictionary>,
}

impl<'r, R: ObjectResolver + ?Sized> TreeWalker<'r, R> {
    fn walk(
        &mut self,
        obj: &Object,
        parent_index: Option<usize>,
        parent_name: &str,
        depth: u32,
    ) -> Result<Option<usize>> {
        if depth >= self.options.max_field_depth {
            self.options.tolerate(
                Error::RecursionLimitExceeded(self.options.max_field_depth),
                "field tree",
            )?;
            return Ok(None);
        }
        let object_ref = obj.as_reference();
        if let Some(r) = object_ref {
            if !self.visited.insert(r) {
                self.options.tolerate(Error::CircularReference(r), "field tree")?;
                return Ok(None);
            }
        }

        let dict = match resolve_dict(self.resolver, obj) {
            Ok(d) => d,
            Err(e) => {
                self.options.tolerate(e, "field")?;
                return Ok(None);
            },
        };
        let kids = match resolve_entry(self.resolver, &dict, "Kids")? {
            Some(Object::Array(kids)) => kids,
            Some(other) => {
                self.options.tolerate(Error::invalid_type("Array", &other), "field /Kids")?;
                Vec::new()
            },
            None => Vec::new(),
        };
        let is_widget = dict.get("Subtype").and_then(Object::as_name) == Some("Widget");

        let mut field = FieldDictionary::load(
            self.resolver,
            dict,
            object_ref,
            parent_name,
            depth,
            &self.defaults,
            self.options,
        )?;
        field.parent_index = parent_index;
        if let Some(pi) = parent_index {
            let expected = self.fields[pi].object_ref;
            if expected.is_some() && field.parent != expected {
                log::debug!(
                    "Field {} has /Parent {:?} but is a kid of {:?}",
                    field.full_name,
                    field.parent,
                    expected
                );
            }
        }
        let full_name = field.full_name.clone();
        let index = self.fields.len();
        self.fields.push(field);

        if is_widget {
            match Annotation::parse(self.resolver, obj, self.options) {
                Ok(widget) => self.fields[index].widgets.push(widget),
                Err(e) => self.options.tolerate(e, &format!("widget of field {}", full_name))?,
            }
        }

        for kid in &kids {
            if kid.is_null() {
                continue;
            }
            if self.is_widget_kid(kid)? {
                if let Some(r) = kid.as_reference() {
                    if !self.visited.insert(r) {
                        self.options.tolerate(Error::CircularReference(r), "field tree")?;
                        continue;
                    }
                }
                match Annotation::parse(self.resolver, kid, self.options) {
                    Ok(widget) => self.fields[index].widgets.push(widget),
                    Err(e) => self.options.tolerate(e, &format!("widget of field {}", full_name))?,
                }
            } else if let Some(child) = self.walk(kid, Some(index), &full_name, depth + 1)? {
                self.fields[index].children.push(child);
            }
        }

        Ok(Some(index))
    }

    /// A kid without `T` that is a widget annotation belongs to its parent.
    fn is_widget_kid(&self, kid: &Object) -> Result<bool> {
        let dict = match resolve_dict(self.resolver, kid) {
            Ok(d) => d,
            Err(_) => return Ok(false),
        };
        Ok(!dict.contains_key("T") && dict.get("Subtype").and_then(Object::as_name) == Some("Widget"))
    }
}

impl InteractiveForm {
    /// Read the form of a document from its catalog.
    ///
    /// Returns `None` when the catalog has no `AcroForm` entry. In strict
    /// mode any malformed field or widget is an error; in lenient mode it is
    /// logged and skipped.
    pub fn from_catalog<R: ObjectResolver + ?Sized>(
        resolver: &R,
        catalog: &Dictionary,
        options: &ModelOptions,
    ) -> Result<Option<Self>> {
        let raw = match catalog.get("AcroForm") {
            Some(raw) if !raw.is_null() => raw,
            _ => return Ok(None),
        };
        let resolver = &ChainLimited::new(resolver, options.max_reference_chain);
        let object_ref = raw.as_reference();
        let dict = match resolve_entry(resolver, catalog, "AcroForm")? {
            Some(Object::Dictionary(d)) => d,
            Some(other) => return Err(Error::invalid_type("Dictionary", &other)),
            None => return Ok(None),
        };

        let view = DictView::new(&dict, resolver);
        let default_appearance = view.text("DA");
        let quadding = view.integer("Q");
        let docmdp_signature = DictView::new(catalog, resolver)
            .dict_entry("Perms")
            .and_then(|perms| perms.get("DocMDP").and_then(Object::as_reference));

        let fields_array = match view.get("Fields") {
            Some(Object::Array(arr)) => arr,
            Some(other) => {
                options.tolerate(Error::invalid_type("Array", &other), "AcroForm /Fields")?;
                Vec::new()
            },
            None => {
                log::debug!("AcroForm has no /Fields");
                Vec::new()
            },
        };

        let mut walker = TreeWalker {
            resolver,
            options,
            defaults: FormDefaults {
                default_appearance: default_appearance.clone(),
                quadding,
            },
            visited: HashSet::new(),
            fields: Vec::new(),
        };
        let mut roots = Vec::new();
        for item in &fields_array {
            if item.is_null() {
                continue;
            }
            if let Some(index) = walker.walk(item, None, "", 0)? {
                roots.push(index);
            }
        }
        let fields = walker.fields;
        log::debug!("Loaded {} fields ({} roots)", fields.len(), roots.len());

        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut by_ref = HashMap::new();
        for (index, field) in fields.iter().enumerate() {
            if let Some(r) = field.object_ref {
                by_ref.insert(r, index);
            }
            // Nameless kids share their parent's name; prefer the terminal one
            match by_name.get(&field.full_name) {
                Some(&existing) if fields[existing].is_terminal() || !field.is_terminal() => {},
                _ => {
                    by_name.insert(field.full_name.clone(), index);
                },
            }
        }

        let calculation_order = view
            .array("CO")
            .unwrap_or_default()
            .iter()
            .filter_map(Object::as_reference)
            .collect();

        Ok(Some(Self {
            object_ref,
            need_appearances: view.bool("NeedAppearances").unwrap_or(false),
            sig_flags: view.flags("SigFlags"),
            default_resources: view.dict_entry("DR"),
            default_appearance,
            quadding: TextAlignment::from_pdf_int(quadding.unwrap_or(0)),
            has_xfa: view.contains("XFA"),
            docmdp_signature,
            calculation_order,
            fields,
            roots,
            by_name,
            by_ref,
            dict,
        }))
    }

    /// All fields, in document order (parents before their kids).
    pub fn fields(&self) -> &[FieldDictionary] {
        &self.fields
    }

    /// Top-level fields (`Fields` array).
    pub fn root_fields(&self) -> impl Iterator<Item = &FieldDictionary> {
        self.roots.iter().map(move |i| &self.fields[*i])
    }

    /// Fields without child fields.
    pub fn terminal_fields(&self) -> impl Iterator<Item = &FieldDictionary> {
        self.fields.iter().filter(|f| f.is_terminal())
    }

    /// Field by fully qualified name.
    pub fn field(&self, name: &str) -> Option<&FieldDictionary> {
        self.by_name.get(name).map(|i| &self.fields[*i])
    }

    /// Field by object reference.
    pub fn field_by_ref(&self, obj_ref: ObjectRef) -> Option<&FieldDictionary> {
        self.by_ref.get(&obj_ref).map(|i| &self.fields[*i])
    }

    /// Typed view of a field by fully qualified name.
    pub fn typed_field(&self, name: &str) -> Option<Field<'_>> {
        self.field(name).map(Field::from_dictionary)
    }

    /// Child fields of a field.
    pub fn children<'a>(&'a self, field: &'a FieldDictionary) -> impl Iterator<Item = &'a FieldDictionary> + 'a {
        field.children.iter().map(move |i| &self.fields[*i])
    }

    /// Parent field of a field.
    pub fn parent(&self, field: &FieldDictionary) -> Option<&FieldDictionary> {
        field.parent_index.map(|i| &self.fields[i])
    }

    /// Widget annotations of a field.
    pub fn widgets_for<'a>(&self, field: &'a FieldDictionary) -> &'a [Annotation] {
        &field.widgets
    }

    /// Terminal signature fields.
    pub fn signature_fields(&self) -> Vec<SignatureField<'_>> {
        self.terminal_fields()
            .filter(|f| f.field_type() == Some(FieldType::Signature))
            .map(SignatureField::new)
            .collect()
    }

    /// Fields in calculation order (`CO`). Unknown references are skipped.
    pub fn calculation_order(&self) -> Vec<&FieldDictionary> {
        self.calculation_order
            .iter()
            .filter_map(|r| {
                let field = self.field_by_ref(*r);
                if field.is_none() {
                    log::warn!("Calculation order names unknown field {}", r);
                }
                field
            })
            .collect()
    }

    /// The certification (DocMDP) signature.
    ///
    /// Prefers the signature named by the catalog's `Perms/DocMDP`; otherwise
    /// the first signature carrying a DocMDP reference.
    pub fn certification_signature(&self) -> Option<SignatureField<'_>> {
        let signatures = self.signature_fields();
        if let Some(target) = self.docmdp_signature {
            let by_perms = signatures
                .iter()
                .find(|f| f.signature().and_then(|s| s.object_ref) == Some(target));
            if let Some(field) = by_perms {
                return Some(*field);
            }
        }
        signatures
            .into_iter()
            .find(|f| f.signature().map(|s| s.docmdp_permission().is_some()).unwrap_or(false))
    }

    /// Permission level granted by the certification signature.
    pub fn document_mdp_permission(&self) -> Option<MdpPermission> {
        self.certification_signature()?
            .signature()?
            .docmdp_permission()
    }

    /// Check whether any signature field is signed.
    pub fn has_signatures(&self) -> bool {
        self.signature_fields().iter().any(|f| f.is_signed())
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn field_mut(&mut self, index: usize) -> &mut FieldDictionary {
        &mut self.fields[index]
    }

    /// Indices of a field and all its descendants.
    pub(crate) fn subtree(&self, index: usize) -> Vec<usize> {
        let mut out = vec![index];
        let mut i = 0;
        while i < out.len() {
            out.extend(self.fields[out[i]].children.iter().copied());
            i += 1;
        }
        out
    }
}
