//! Field dictionaries and inheritable entries.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.7.3 - Field Dictionaries.
//!
//! Fields form a tree through `Kids` and `Parent`. Some entries (`FT`, `Ff`,
//! `V`, `DV`, and for variable text `DA`, `Q`, `MaxLen`) are inheritable: a
//! field without its own entry takes the value of the nearest ancestor that
//! has one. `DA` and `Q` finally fall back to the AcroForm dictionary.

use crate::acroform::flags::FieldFlags;
use crate::actions::AdditionalActions;
use crate::annotation_types::TextAlignment;
use crate::annotations::Annotation;
use crate::config::ModelOptions;
use crate::dictionary::DictView;
use crate::error::{Error, Result};
use crate::library::{resolve_dict, resolve_entry, ObjectResolver};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::signatures::{SeedValue, SignatureDictionary, SignatureLock};
use crate::text_string::decode_text_string;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Keys looked up through the `Parent` chain.
pub const INHERITABLE_KEYS: [&str; 7] = ["FT", "Ff", "V", "DV", "DA", "Q", "MaxLen"];

/// Field type from /FT key in field dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Button field (/Btn) - checkbox, radio button, push button
    Button,
    /// Text field (/Tx) - single or multi-line text
    Text,
    /// Choice field (/Ch) - list box or combo box
    Choice,
    /// Signature field (/Sig)
    Signature,
    /// Unknown/unrecognized field type
    Unknown(String),
}

impl FieldType {
    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "Btn" => FieldType::Button,
            "Tx" => FieldType::Text,
            "Ch" => FieldType::Choice,
            "Sig" => FieldType::Signature,
            other => FieldType::Unknown(other.to_string()),
        }
    }

    /// Convert to PDF name.
    pub fn pdf_name(&self) -> &str {
        match self {
            FieldType::Button => "Btn",
            FieldType::Text => "Tx",
            FieldType::Choice => "Ch",
            FieldType::Signature => "Sig",
            FieldType::Unknown(name) => name,
        }
    }
}

/// Field value from /V or /DV.
///
/// Serializes without a tag: text and names as strings, arrays as string
/// arrays, `None` as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean value (for checkboxes)
    Boolean(bool),
    /// Text string value
    Text(String),
    /// Array of values (for multi-select list boxes)
    Array(Vec<String>),
    /// Name value (for radio buttons and check boxes)
    #[serde(skip_deserializing)]
    Name(String),
    /// No value present
    None,
}

impl FieldValue {
    /// Convert a resolved `V` or `DV` object.
    ///
    /// Text streams (rich text values) are read when unfiltered.
    pub fn from_object(obj: &Object) -> Self {
        match obj {
            Object::String(s) => FieldValue::Text(decode_text_string(s)),
            Object::Name(n) => FieldValue::Name(n.clone()),
            Object::Boolean(b) => FieldValue::Boolean(*b),
            Object::Array(items) => FieldValue::Array(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Object::String(s) => Some(decode_text_string(s)),
                        Object::Name(n) => Some(n.clone()),
                        _ => None,
                    })
                    .collect(),
            ),
            Object::Stream { dict, data } if crate::object::filter_names(dict).is_empty() => {
                FieldValue::Text(decode_text_string(data))
            },
            _ => FieldValue::None,
        }
    }

    /// Convert to a PDF object. Booleans become `/Yes` or `/Off`.
    pub fn to_object(&self) -> Object {
        match self {
            FieldValue::Text(s) => Object::text(s),
            FieldValue::Name(n) => Object::name(n.clone()),
            FieldValue::Boolean(true) => Object::name("Yes"),
            FieldValue::Boolean(false) => Object::name("Off"),
            FieldValue::Array(items) => Object::Array(items.iter().map(|s| Object::text(s)).collect()),
            FieldValue::None => Object::Null,
        }
    }

    /// Single string form of the value (text or name).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Check for the absent value.
    pub fn is_none(&self) -> bool {
        matches!(self, FieldValue::None)
    }
}

/// One entry of a choice or button `Opt` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Export value
    pub export: String,
    /// Text shown to the user
    pub display: String,
}

/// Look up an inheritable entry through the `Parent` chain.
///
/// Returns the resolved value from `dict` or its nearest ancestor. A cyclic
/// or over-long chain, or a parent that is not a dictionary, fails in strict
/// mode; in lenient mode the lookup stops there and reads as absent.
pub fn lookup_inherited<R: ObjectResolver + ?Sized>(
    resolver: &R,
    dict: &Dictionary,
    self_ref: Option<ObjectRef>,
    key: &str,
    options: &ModelOptions,
) -> Result<Option<Object>> {
    let mut visited: HashSet<ObjectRef> = self_ref.into_iter().collect();
    let mut current = dict.clone();
    let mut depth = 0;

    loop {
        if let Some(value) = resolve_entry(resolver, &current, key)? {
            return Ok(Some(value));
        }
        let parent = match current.get("Parent") {
            Some(p) if !p.is_null() => p.clone(),
            _ => return Ok(None),
        };

        if let Some(r) = parent.as_reference() {
            if !visited.insert(r) {
                options.tolerate(Error::CircularReference(r), "field parent chain")?;
                return Ok(None);
            }
        }
        depth += 1;
        if depth > options.max_inheritance_depth {
            options.tolerate(
                Error::RecursionLimitExceeded(options.max_inheritance_depth),
                "field parent chain",
            )?;
            return Ok(None);
        }

        current = match resolve_dict(resolver, &parent) {
            Ok(d) => d,
            Err(e) => {
                options.tolerate(e, &format!("/Parent of field while looking up /{}", key))?;
                return Ok(None);
            },
        };
    }
}

/// Form-level defaults for variable text.
#[derive(Debug, Clone, Default)]
pub(crate) struct FormDefaults {
    pub default_appearance: Option<String>,
    pub quadding: Option<i64>,
}

/// A field dictionary with its inheritable entries resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDictionary {
    /// Object reference when the field is indirect
    pub object_ref: Option<ObjectRef>,
    /// Complete field dictionary
    pub dict: Dictionary,
    /// Parent field (`Parent`)
    pub parent: Option<ObjectRef>,
    /// Partial name (`T`)
    pub partial_name: Option<String>,
    /// Alternate name for the user interface (`TU`)
    pub alternate_name: Option<String>,
    /// Export mapping name (`TM`)
    pub mapping_name: Option<String>,
    /// Fully qualified name
    pub full_name: String,
    /// Depth in the field tree, 0 for roots
    pub depth: u32,
    /// Child field indices in the form's field list
    pub children: Vec<usize>,
    /// Parent index in the form's field list
    pub parent_index: Option<usize>,
    /// Widget annotations of this field
    pub widgets: Vec<Annotation>,
    /// Trigger actions (`AA`)
    pub additional_actions: Option<AdditionalActions>,
    /// Options (`Opt`) for choice fields and check box/radio export values
    pub options: Vec<ChoiceOption>,
    /// First visible option of a list box (`TI`)
    pub top_index: usize,
    /// Selected option indices (`I`)
    pub selected_indices: Vec<usize>,
    /// Rich text value (`RV`)
    pub rich_value: Option<String>,
    /// Default style string (`DS`)
    pub default_style: Option<String>,
    /// Signature dictionary (`V` of a signature field)
    pub signature: Option<SignatureDictionary>,
    /// Signature lock (`Lock`)
    pub lock: Option<SignatureLock>,
    /// Seed value constraints (`SV`)
    pub seed_value: Option<SeedValue>,
    inherited: Dictionary,
}

impl FieldDictionary {
    /// Load a field dictionary, resolving its inheritable entries.
    pub(crate) fn load<R: ObjectResolver + ?Sized>(
        resolver: &R,
        dict: Dictionary,
        object_ref: Option<ObjectRef>,
        parent_name: &str,
        depth: u32,
        defaults: &FormDefaults,
        options: &ModelOptions,
    ) -> Result<Self> {
        let view = DictView::new(&dict, resolver);

        let mut inherited = Dictionary::new();
        for key in INHERITABLE_KEYS {
            if let Some(value) = lookup_inherited(resolver, &dict, object_ref, key, options)? {
                inherited.insert(key.to_string(), value);
            }
        }
        if !inherited.contains_key("DA") {
            if let Some(da) = &defaults.default_appearance {
                inherited.insert("DA".into(), Object::text(da));
            }
        }
        if !inherited.contains_key("Q") {
            if let Some(q) = defaults.quadding {
                inherited.insert("Q".into(), Object::Integer(q));
            }
        }

        let partial_name = view.text("T");
        let full_name = match (&partial_name, parent_name.is_empty()) {
            (Some(name), true) => name.clone(),
            (Some(name), false) => format!("{}.{}", parent_name, name),
            (None, _) => parent_name.to_string(),
        };
        log::trace!("Loading field {:?} ({:?})", full_name, object_ref);

        let mut additional_actions = None;
        if let Some(raw) = view.raw("AA").filter(|o| !o.is_null()) {
            match AdditionalActions::parse(resolver, raw, options) {
                Ok(aa) if !aa.is_empty() => additional_actions = Some(aa),
                Ok(_) => {},
                Err(e) => options.tolerate(e, &format!("/AA of field {}", full_name))?,
            }
        }

        let is_signature = inherited.get("FT").and_then(Object::as_name) == Some("Sig");
        let mut signature = None;
        let mut lock = None;
        let mut seed_value = None;
        if is_signature {
            let raw_value = dict.get("V").filter(|o| !o.is_null()).or_else(|| inherited.get("V"));
            if let Some(raw) = raw_value {
                match SignatureDictionary::parse(resolver, raw, options) {
                    Ok(sig) => signature = Some(sig),
                    Err(e) => options.tolerate(e, &format!("signature of field {}", full_name))?,
                }
            }
            if let Some(raw) = view.raw("Lock").filter(|o| !o.is_null()) {
                match SignatureLock::parse(resolver, raw, options) {
                    Ok(l) => lock = Some(l),
                    Err(e) => options.tolerate(e, &format!("/Lock of field {}", full_name))?,
                }
            }
            if let Some(raw) = view.raw("SV").filter(|o| !o.is_null()) {
                match SeedValue::parse(resolver, raw, options) {
                    Ok(sv) => seed_value = Some(sv),
                    Err(e) => options.tolerate(e, &format!("/SV of field {}", full_name))?,
                }
            }
        }

        let choice_options = parse_options(view);
        let selected_indices = view
            .array("I")
            .unwrap_or_default()
            .iter()
            .filter_map(|o| view.resolve_item(o)?.as_integer())
            .filter(|i| *i >= 0)
            .map(|i| i as usize)
            .collect();
        let rich_value = match view.get("RV") {
            Some(obj) => FieldValue::from_object(&obj).as_str().map(str::to_string),
            None => None,
        };

        Ok(Self {
            object_ref,
            parent: view.reference("Parent"),
            alternate_name: view.text("TU"),
            mapping_name: view.text("TM"),
            partial_name,
            full_name,
            depth,
            children: Vec::new(),
            parent_index: None,
            widgets: Vec::new(),
            additional_actions,
            options: choice_options,
            top_index: view.integer("TI").filter(|i| *i >= 0).unwrap_or(0) as usize,
            selected_indices,
            rich_value,
            default_style: view.text("DS"),
            signature,
            lock,
            seed_value,
            inherited,
            dict,
        })
    }

    /// Resolved inheritable entry (one of [`INHERITABLE_KEYS`]).
    pub fn inherited(&self, key: &str) -> Option<&Object> {
        self.inherited.get(key)
    }

    /// Field type (`FT`, inheritable).
    pub fn field_type(&self) -> Option<FieldType> {
        self.inherited("FT")
            .and_then(Object::as_name)
            .map(FieldType::from_pdf_name)
    }

    /// Field flags (`Ff`, inheritable). Unknown bits are retained.
    pub fn flags(&self) -> FieldFlags {
        let bits = self.inherited("Ff").and_then(Object::as_integer).unwrap_or(0);
        FieldFlags::from_bits_retain(bits as u32)
    }

    /// Field value (`V`, inheritable).
    pub fn value(&self) -> FieldValue {
        self.inherited("V")
            .map(FieldValue::from_object)
            .unwrap_or(FieldValue::None)
    }

    /// Default value (`DV`, inheritable).
    pub fn default_value(&self) -> FieldValue {
        self.inherited("DV")
            .map(FieldValue::from_object)
            .unwrap_or(FieldValue::None)
    }

    /// Default appearance string (`DA`), falling back to the form's.
    pub fn default_appearance(&self) -> Option<String> {
        self.inherited("DA")
            .and_then(Object::as_string)
            .map(decode_text_string)
    }

    /// Quadding (`Q`), falling back to the form's; left when absent.
    pub fn quadding(&self) -> TextAlignment {
        TextAlignment::from_pdf_int(self.inherited("Q").and_then(Object::as_integer).unwrap_or(0))
    }

    /// Maximum text length (`MaxLen`, inheritable).
    pub fn max_len(&self) -> Option<u32> {
        self.inherited("MaxLen")
            .and_then(Object::as_integer)
            .filter(|n| *n >= 0)
            .map(|n| n as u32)
    }

    /// Fully qualified name, partial names joined root to leaf with `.`.
    pub fn fully_qualified_name(&self) -> &str {
        &self.full_name
    }

    /// A terminal field has no child fields.
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    /// Check the read-only flag.
    pub fn is_read_only(&self) -> bool {
        self.flags().is_read_only()
    }

    /// Check the required flag.
    pub fn is_required(&self) -> bool {
        self.flags().is_required()
    }

    /// Check the no-export flag.
    pub fn is_no_export(&self) -> bool {
        self.flags().is_no_export()
    }

    /// Appearance states other than `Off` across all widgets, in widget order.
    pub fn on_states(&self) -> Vec<String> {
        let mut states: Vec<String> = Vec::new();
        for widget in &self.widgets {
            let names = widget
                .appearance
                .as_ref()
                .map(|ap| ap.on_state_names())
                .unwrap_or_default();
            for name in names {
                if !states.contains(&name) {
                    states.push(name);
                }
            }
        }
        states
    }

    /// Replace the resolved value after an edit.
    pub(crate) fn set_inherited(&mut self, key: &str, value: Option<Object>) {
        match value {
            Some(v) => {
                self.inherited.insert(key.to_string(), v);
            },
            None => {
                self.inherited.remove(key);
            },
        }
    }
}

/// Parse an `Opt` array: strings, or `[export display]` pairs.
fn parse_options<R: ObjectResolver + ?Sized>(view: DictView<'_, R>) -> Vec<ChoiceOption> {
    let items = match view.array("Opt") {
        Some(items) => items,
        None => return Vec::new(),
    };
    let text = |obj: &Object| match view.resolve_item(obj)? {
        Object::String(s) => Some(decode_text_string(&s)),
        Object::Name(n) => Some(n),
        _ => None,
    };

    items
        .iter()
        .filter_map(|item| match view.resolve_item(item)? {
            Object::Array(pair) if pair.len() >= 2 => Some(ChoiceOption {
                export: text(&pair[0])?,
                display: text(&pair[1])?,
            }),
            other => {
                let value = text(&other)?;
                Some(ChoiceOption {
                    export: value.clone(),
                    display: value,
                })
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ObjectStore;

    #[test]
    fn test_field_type_names() {
        for name in ["Btn", "Tx", "Ch", "Sig"] {
            assert_eq!(FieldType::from_pdf_name(name).pdf_name(), name);
        }
        assert_eq!(FieldType::from_pdf_name("Xx"), FieldType::Unknown("Xx".into()));
    }

    #[test]
    fn test_field_value_from_object() {
        assert_eq!(FieldValue::from_object(&Object::text("abc")), FieldValue::Text("abc".into()));
        assert_eq!(FieldValue::from_object(&Object::name("Yes")), FieldValue::Name("Yes".into()));
        assert_eq!(
            FieldValue::from_object(&Object::Array(vec![Object::text("a"), Object::text("b")])),
            FieldValue::Array(vec!["a".into(), "b".into()])
        );
        assert_eq!(FieldValue::from_object(&Object::Integer(1)), FieldValue::None);
        assert_eq!(
            FieldValue::from_object(&Object::stream(Dictionary::new(), b"rich".to_vec())),
            FieldValue::Text("rich".into())
        );
    }

    #[test]
    fn test_text_value_starting_with_bom_characters() {
        let value = FieldValue::Text("þÿab".into());
        assert_eq!(FieldValue::from_object(&value.to_object()), value);
    }

    #[test]
    fn test_field_value_json() {
        let json = serde_json::to_string(&FieldValue::Name("Yes".into())).unwrap();
        assert_eq!(json, "\"Yes\"");
        let json = serde_json::to_string(&FieldValue::None).unwrap();
        assert_eq!(json, "null");
        let value: FieldValue = serde_json::from_str("[\"a\"]").unwrap();
        assert_eq!(value, FieldValue::Array(vec!["a".into()]));
        let value: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(value, FieldValue::Boolean(true));
    }

    #[test]
    fn test_lookup_inherited_walks_parents() {
        let mut store = ObjectStore::new();
        let grand = store.add(Object::dictionary([("FT", Object::name("Tx")), ("Ff", Object::Integer(4096))]));
        let parent = store.add(Object::dictionary([
            ("Parent", Object::Reference(grand)),
            ("Ff", Object::Integer(1)),
        ]));
        let leaf = Dictionary::from([("Parent".to_string(), Object::Reference(parent))]);
        let opts = ModelOptions::default();

        assert_eq!(
            lookup_inherited(&store, &leaf, None, "FT", &opts).unwrap(),
            Some(Object::name("Tx"))
        );
        // Nearest ancestor wins
        assert_eq!(
            lookup_inherited(&store, &leaf, None, "Ff", &opts).unwrap(),
            Some(Object::Integer(1))
        );
        assert_eq!(lookup_inherited(&store, &leaf, None, "DV", &opts).unwrap(), None);
    }

    #[test]
    fn test_lookup_inherited_cycle() {
        let mut store = ObjectStore::new();
        let a = ObjectRef::new(1, 0);
        let b = ObjectRef::new(2, 0);
        store.insert(a, Object::dictionary([("Parent", Object::Reference(b))]));
        store.insert(b, Object::dictionary([("Parent", Object::Reference(a))]));
        let dict = store.get(a).unwrap().as_dict().unwrap().clone();

        assert!(lookup_inherited(&store, &dict, Some(a), "FT", &ModelOptions::strict()).is_err());
        assert_eq!(
            lookup_inherited(&store, &dict, Some(a), "FT", &ModelOptions::lenient()).unwrap(),
            None
        );
    }

    #[test]
    fn test_lookup_inherited_broken_parent() {
        let store = ObjectStore::new();
        let dict = Dictionary::from([("Parent".to_string(), Object::Integer(5))]);
        assert!(lookup_inherited(&store, &dict, None, "FT", &ModelOptions::strict()).is_err());
        assert_eq!(
            lookup_inherited(&store, &dict, None, "FT", &ModelOptions::lenient()).unwrap(),
            None
        );
    }

    #[test]
    fn test_load_with_form_defaults() {
        let store = ObjectStore::new();
        let dict = Dictionary::from([
            ("FT".to_string(), Object::name("Tx")),
            ("T".to_string(), Object::text("city")),
            (
                "Opt".to_string(),
                Object::Array(vec![
                    Object::text("A"),
                    Object::Array(vec![Object::text("b"), Object::text("Bee")]),
                ]),
            ),
        ]);
        let defaults = FormDefaults {
            default_appearance: Some("/Helv 0 Tf 0 g".into()),
            quadding: Some(1),
        };
        let field =
            FieldDictionary::load(&store, dict, None, "address", 1, &defaults, &ModelOptions::default()).unwrap();
        assert_eq!(field.full_name, "address.city");
        assert_eq!(field.field_type(), Some(FieldType::Text));
        assert_eq!(field.default_appearance().as_deref(), Some("/Helv 0 Tf 0 g"));
        assert_eq!(field.quadding(), TextAlignment::Center);
        assert_eq!(field.options[1].export, "b");
        assert_eq!(field.options[1].display, "Bee");
        assert!(field.is_terminal());
    }
}
