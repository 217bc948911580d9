//! Actions, destinations and additional-actions dictionaries.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.6 (Actions) and Section 12.3.2
//! (Destinations).

use crate::config::ModelOptions;
use crate::dictionary::DictView;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::library::ObjectResolver;
use crate::object::{Object, ObjectRef};
use crate::text_string::decode_text_string;
use bitflags::bitflags;
use std::collections::{BTreeMap, HashSet};

/// Target page of an explicit destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    /// Page object in this document
    Reference(ObjectRef),
    /// Zero-based page index (used by remote destinations)
    Index(u32),
}

/// How the target page is fitted to the window (Table 151).
#[derive(Debug, Clone, PartialEq)]
pub enum Fit {
    /// `[page /XYZ left top zoom]`; `None` keeps the current value
    Xyz {
        /// Left edge
        left: Option<f64>,
        /// Top edge
        top: Option<f64>,
        /// Zoom factor
        zoom: Option<f64>,
    },
    /// Fit the whole page
    Fit,
    /// Fit the page width
    FitH {
        /// Top edge
        top: Option<f64>,
    },
    /// Fit the page height
    FitV {
        /// Left edge
        left: Option<f64>,
    },
    /// Fit a rectangle
    FitR {
        /// Rectangle to fit
        rect: Rect,
    },
    /// Fit the bounding box of page contents
    FitB,
    /// Fit the bounding box width
    FitBH {
        /// Top edge
        top: Option<f64>,
    },
    /// Fit the bounding box height
    FitBV {
        /// Left edge
        left: Option<f64>,
    },
}

impl Fit {
    fn parse(name: &str, params: &[Object]) -> Self {
        let num = |i: usize| params.get(i).and_then(Object::as_number);
        match name {
            "XYZ" => Fit::Xyz {
                left: num(0),
                top: num(1),
                zoom: num(2).filter(|z| *z != 0.0),
            },
            "Fit" => Fit::Fit,
            "FitH" => Fit::FitH { top: num(0) },
            "FitV" => Fit::FitV { left: num(0) },
            "FitR" => match (num(0), num(1), num(2), num(3)) {
                (Some(a), Some(b), Some(c), Some(d)) => Fit::FitR {
                    rect: Rect::new(a, b, c, d),
                },
                _ => {
                    log::warn!("FitR destination without four coordinates, using Fit");
                    Fit::Fit
                },
            },
            "FitB" => Fit::FitB,
            "FitBH" => Fit::FitBH { top: num(0) },
            "FitBV" => Fit::FitBV { left: num(0) },
            other => {
                log::debug!("Unknown destination fit type /{}, using Fit", other);
                Fit::Fit
            },
        }
    }
}

/// A destination within a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// Named destination, resolved through the document's name tree
    Named(String),
    /// Explicit destination array
    Explicit {
        /// Target page
        page: PageTarget,
        /// Page fit
        fit: Fit,
    },
}

impl Destination {
    /// Parse a destination object.
    ///
    /// Accepts names, strings, explicit arrays, and the `<< /D [...] >>`
    /// form used as named-destination values.
    pub fn parse<R: ObjectResolver + ?Sized>(resolver: &R, obj: &Object) -> Result<Self> {
        match crate::library::resolve(resolver, obj)? {
            Object::Name(n) => Ok(Destination::Named(n)),
            Object::String(s) => Ok(Destination::Named(decode_text_string(&s))),
            Object::Array(arr) => {
                let page = match arr.first() {
                    Some(Object::Reference(r)) => PageTarget::Reference(*r),
                    Some(Object::Integer(n)) if *n >= 0 => PageTarget::Index(*n as u32),
                    _ => {
                        return Err(Error::InvalidPdf(
                            "Destination array has no page target".to_string(),
                        ))
                    },
                };
                let fit_name = arr.get(1).and_then(Object::as_name).unwrap_or("Fit");
                let params = arr.get(2..).unwrap_or(&[]);
                Ok(Destination::Explicit {
                    page,
                    fit: Fit::parse(fit_name, params),
                })
            },
            Object::Dictionary(dict) => match dict.get("D") {
                Some(inner) => Self::parse(resolver, inner),
                None => Err(Error::missing("Destination", "D")),
            },
            other => Err(Error::invalid_type("Destination", &other)),
        }
    }
}

/// Named action (Section 12.6.4.11).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedAction {
    /// Go to the next page
    NextPage,
    /// Go to the previous page
    PrevPage,
    /// Go to the first page
    FirstPage,
    /// Go to the last page
    LastPage,
    /// Viewer-specific name
    Other(String),
}

impl NamedAction {
    /// Parse from the `N` entry.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "NextPage" => Self::NextPage,
            "PrevPage" => Self::PrevPage,
            "FirstPage" => Self::FirstPage,
            "LastPage" => Self::LastPage,
            other => Self::Other(other.to_string()),
        }
    }

    /// PDF name.
    pub fn pdf_name(&self) -> &str {
        match self {
            Self::NextPage => "NextPage",
            Self::PrevPage => "PrevPage",
            Self::FirstPage => "FirstPage",
            Self::LastPage => "LastPage",
            Self::Other(name) => name,
        }
    }
}

/// A field named in a submit, reset or hide action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelector {
    /// Fully qualified field name
    Name(String),
    /// Field or annotation dictionary
    Reference(ObjectRef),
}

impl FieldSelector {
    fn parse_list(arr: &[Object]) -> Vec<FieldSelector> {
        arr.iter()
            .filter_map(|obj| match obj {
                Object::String(s) => Some(FieldSelector::Name(decode_text_string(s))),
                Object::Reference(r) => Some(FieldSelector::Reference(*r)),
                other => {
                    log::debug!("Ignoring {} in action field list", other.type_name());
                    None
                },
            })
            .collect()
    }
}

bitflags! {
    /// Submit-form action flags (Table 237).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SubmitFormFlags: u32 {
        /// Bit 1: `Fields` lists the fields to exclude
        const EXCLUDE = 1 << 0;
        /// Bit 2: Submit fields without a value
        const INCLUDE_NO_VALUE_FIELDS = 1 << 1;
        /// Bit 3: HTML form format (ignored for FDF/XFDF)
        const EXPORT_FORMAT = 1 << 2;
        /// Bit 4: Use HTTP GET
        const GET_METHOD = 1 << 3;
        /// Bit 5: Submit the mouse click coordinates
        const SUBMIT_COORDINATES = 1 << 4;
        /// Bit 6: XFDF format
        const XFDF = 1 << 5;
        /// Bit 7: Include incremental updates in FDF
        const INCLUDE_APPEND_SAVES = 1 << 6;
        /// Bit 8: Include annotations in FDF
        const INCLUDE_ANNOTATIONS = 1 << 7;
        /// Bit 9: Submit the whole document as PDF
        const SUBMIT_PDF = 1 << 8;
        /// Bit 10: Convert dates to canonical format
        const CANONICAL_FORMAT = 1 << 9;
        /// Bit 11: Only annotations by the current user
        const EXCL_NON_USER_ANNOTS = 1 << 10;
        /// Bit 12: Omit the F entry in FDF
        const EXCL_F_KEY = 1 << 11;
        /// Bit 14: Embed the form in FDF
        const EMBED_FORM = 1 << 13;
    }
}

bitflags! {
    /// Reset-form action flags (Table 239).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResetFormFlags: u32 {
        /// Bit 1: `Fields` lists the fields to exclude
        const EXCLUDE = 1 << 0;
    }
}

/// Action payload by type (`S` entry).
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    /// Go to a destination in this document
    GoTo(Destination),
    /// Go to a destination in another document
    GoToR {
        /// File specification
        file: Option<String>,
        /// Destination in the remote file
        dest: Option<Destination>,
        /// Open in a new window
        new_window: Option<bool>,
    },
    /// Launch an application or open a document
    Launch {
        /// File specification
        file: Option<String>,
        /// Open in a new window
        new_window: Option<bool>,
    },
    /// Resolve a URI
    Uri {
        /// Target URI
        uri: String,
        /// Append mouse coordinates
        is_map: bool,
    },
    /// Viewer-defined named action
    Named(NamedAction),
    /// JavaScript; `None` when the script is in a filtered stream
    JavaScript(Option<String>),
    /// Submit form data
    SubmitForm {
        /// Destination URL
        url: Option<String>,
        /// Fields included or excluded
        fields: Vec<FieldSelector>,
        /// Submit flags
        flags: SubmitFormFlags,
    },
    /// Reset fields to their default values
    ResetForm {
        /// Fields included or excluded
        fields: Vec<FieldSelector>,
        /// Reset flags
        flags: ResetFormFlags,
    },
    /// Import FDF data
    ImportData {
        /// FDF file specification
        file: Option<String>,
    },
    /// Show or hide annotations
    Hide {
        /// Annotations or fields to toggle
        targets: Vec<FieldSelector>,
        /// Hide (true) or show (false)
        hide: bool,
    },
    /// Any other action type
    Other {
        /// The `S` entry
        action_type: String,
    },
}

/// An action together with its `Next` sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Action payload
    pub kind: ActionKind,
    /// Actions performed after this one, in order
    pub next: Vec<Action>,
    /// Object reference when the action is indirect
    pub object_ref: Option<ObjectRef>,
}

impl Action {
    /// Parse an action dictionary (direct or indirect).
    pub fn parse<R: ObjectResolver + ?Sized>(
        resolver: &R,
        obj: &Object,
        options: &ModelOptions,
    ) -> Result<Self> {
        let mut visited = HashSet::new();
        let mut budget = options.max_action_chain;
        Self::parse_chain(resolver, obj, options, &mut visited, &mut budget)
    }

    fn parse_chain<R: ObjectResolver + ?Sized>(
        resolver: &R,
        obj: &Object,
        options: &ModelOptions,
        visited: &mut HashSet<ObjectRef>,
        budget: &mut u32,
    ) -> Result<Self> {
        if *budget == 0 {
            return Err(Error::RecursionLimitExceeded(options.max_action_chain));
        }
        *budget -= 1;

        let object_ref = obj.as_reference();
        if let Some(r) = object_ref {
            if !visited.insert(r) {
                return Err(Error::CircularReference(r));
            }
        }

        let dict = crate::library::resolve_dict(resolver, obj)?;
        let view = DictView::new(&dict, resolver);
        let kind = Self::parse_kind(&view)?;

        let mut next = Vec::new();
        let next_items = match view.get("Next") {
            Some(Object::Array(arr)) => arr,
            Some(_) => vec![dict.get("Next").cloned().unwrap_or(Object::Null)],
            None => Vec::new(),
        };
        for item in &next_items {
            match Self::parse_chain(resolver, item, options, visited, budget) {
                Ok(action) => next.push(action),
                Err(e) => options.tolerate(e, "Next action")?,
            }
        }

        Ok(Action {
            kind,
            next,
            object_ref,
        })
    }

    fn parse_kind<R: ObjectResolver + ?Sized>(view: &DictView<'_, R>) -> Result<ActionKind> {
        let action_type = view.name("S").ok_or_else(|| Error::missing("Action", "S"))?;
        log::trace!("Parsing /{} action", action_type);

        let kind = match action_type.as_str() {
            "GoTo" => {
                let dest = view.raw("D").ok_or_else(|| Error::missing("GoTo", "D"))?;
                ActionKind::GoTo(Destination::parse(view.resolver(), dest)?)
            },
            "GoToR" => ActionKind::GoToR {
                file: file_spec_name(&view, "F"),
                dest: view
                    .raw("D")
                    .and_then(|d| Destination::parse(view.resolver(), d).ok()),
                new_window: view.bool("NewWindow"),
            },
            "Launch" => ActionKind::Launch {
                file: file_spec_name(&view, "F"),
                new_window: view.bool("NewWindow"),
            },
            "URI" => {
                let uri = view
                    .bytes("URI")
                    .ok_or_else(|| Error::missing("URI", "URI"))?;
                ActionKind::Uri {
                    // URIs are 7-bit ASCII
                    uri: String::from_utf8_lossy(&uri).into_owned(),
                    is_map: view.bool("IsMap").unwrap_or(false),
                }
            },
            "Named" => {
                let name = view.name("N").ok_or_else(|| Error::missing("Named", "N"))?;
                ActionKind::Named(NamedAction::from_pdf_name(&name))
            },
            "JavaScript" => ActionKind::JavaScript(javascript_source(view)),
            "SubmitForm" => ActionKind::SubmitForm {
                url: file_spec_name(&view, "F"),
                fields: view
                    .array("Fields")
                    .map(|a| FieldSelector::parse_list(&a))
                    .unwrap_or_default(),
                flags: view.flags("Flags"),
            },
            "ResetForm" => ActionKind::ResetForm {
                fields: view
                    .array("Fields")
                    .map(|a| FieldSelector::parse_list(&a))
                    .unwrap_or_default(),
                flags: view.flags("Flags"),
            },
            "ImportData" => ActionKind::ImportData {
                file: file_spec_name(&view, "F"),
            },
            "Hide" => {
                let targets = match view.raw("T") {
                    Some(Object::Array(arr)) => FieldSelector::parse_list(arr),
                    Some(single) => FieldSelector::parse_list(std::slice::from_ref(single)),
                    None => Vec::new(),
                };
                ActionKind::Hide {
                    targets,
                    hide: view.bool("H").unwrap_or(true),
                }
            },
            other => ActionKind::Other {
                action_type: other.to_string(),
            },
        };
        Ok(kind)
    }

    /// The `S` name of this action.
    pub fn action_type(&self) -> &str {
        match &self.kind {
            ActionKind::GoTo(_) => "GoTo",
            ActionKind::GoToR { .. } => "GoToR",
            ActionKind::Launch { .. } => "Launch",
            ActionKind::Uri { .. } => "URI",
            ActionKind::Named(_) => "Named",
            ActionKind::JavaScript(_) => "JavaScript",
            ActionKind::SubmitForm { .. } => "SubmitForm",
            ActionKind::ResetForm { .. } => "ResetForm",
            ActionKind::ImportData { .. } => "ImportData",
            ActionKind::Hide { .. } => "Hide",
            ActionKind::Other { action_type } => action_type,
        }
    }

    /// This action followed by its `Next` actions, depth-first.
    pub fn sequence(&self) -> Vec<&Action> {
        let mut out = vec![self];
        for next in &self.next {
            out.extend(next.sequence());
        }
        out
    }
}

/// File specification as a path string (`UF` preferred over `F`).
pub(crate) fn file_spec_name<R: ObjectResolver + ?Sized>(view: &DictView<'_, R>, key: &str) -> Option<String> {
    match view.get(key)? {
        Object::String(s) => Some(decode_text_string(&s)),
        Object::Dictionary(d) => {
            let spec = DictView::new(&d, view.resolver());
            spec.text("UF").or_else(|| spec.text("F"))
        },
        other => {
            log::debug!("Unsupported file specification type {}", other.type_name());
            None
        },
    }
}

fn javascript_source<R: ObjectResolver + ?Sized>(view: &DictView<'_, R>) -> Option<String> {
    match view.get("JS")? {
        Object::String(s) => Some(decode_text_string(&s)),
        Object::Stream { dict, data } => {
            if crate::object::filter_names(&dict).is_empty() {
                Some(decode_text_string(&data))
            } else {
                log::debug!("JavaScript stream is filtered; source not decoded");
                None
            }
        },
        _ => None,
    }
}

/// Trigger events of an additional-actions dictionary.
///
/// Annotation triggers (Table 194) and form field triggers (Table 196).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TriggerEvent {
    /// `E`: cursor enters the annotation
    CursorEnter,
    /// `X`: cursor exits the annotation
    CursorExit,
    /// `D`: mouse button pressed
    MouseDown,
    /// `U`: mouse button released
    MouseUp,
    /// `Fo`: annotation receives focus
    Focus,
    /// `Bl`: annotation loses focus
    Blur,
    /// `PO`: page containing the annotation opened
    PageOpen,
    /// `PC`: page containing the annotation closed
    PageClose,
    /// `PV`: page becomes visible
    PageVisible,
    /// `PI`: page is no longer visible
    PageInvisible,
    /// `K`: keystroke in a text or combo field
    Keystroke,
    /// `F`: value is about to be formatted
    Format,
    /// `V`: value changed, validate it
    Validate,
    /// `C`: recalculate the value
    Calculate,
}

impl TriggerEvent {
    /// Parse from the dictionary key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "E" => Some(Self::CursorEnter),
            "X" => Some(Self::CursorExit),
            "D" => Some(Self::MouseDown),
            "U" => Some(Self::MouseUp),
            "Fo" => Some(Self::Focus),
            "Bl" => Some(Self::Blur),
            "PO" => Some(Self::PageOpen),
            "PC" => Some(Self::PageClose),
            "PV" => Some(Self::PageVisible),
            "PI" => Some(Self::PageInvisible),
            "K" => Some(Self::Keystroke),
            "F" => Some(Self::Format),
            "V" => Some(Self::Validate),
            "C" => Some(Self::Calculate),
            _ => None,
        }
    }

    /// The dictionary key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::CursorEnter => "E",
            Self::CursorExit => "X",
            Self::MouseDown => "D",
            Self::MouseUp => "U",
            Self::Focus => "Fo",
            Self::Blur => "Bl",
            Self::PageOpen => "PO",
            Self::PageClose => "PC",
            Self::PageVisible => "PV",
            Self::PageInvisible => "PI",
            Self::Keystroke => "K",
            Self::Format => "F",
            Self::Validate => "V",
            Self::Calculate => "C",
        }
    }

    /// Triggers that only apply to form fields.
    pub fn is_field_trigger(&self) -> bool {
        matches!(self, Self::Keystroke | Self::Format | Self::Validate | Self::Calculate)
    }
}

/// Additional-actions dictionary (`AA`) of an annotation or field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdditionalActions {
    actions: BTreeMap<TriggerEvent, Action>,
}

impl AdditionalActions {
    /// Parse an `AA` dictionary.
    ///
    /// Unknown trigger keys are ignored. Malformed actions fail in strict
    /// mode and are skipped otherwise.
    pub fn parse<R: ObjectResolver + ?Sized>(
        resolver: &R,
        obj: &Object,
        options: &ModelOptions,
    ) -> Result<Self> {
        let dict = crate::library::resolve_dict(resolver, obj)?;
        let mut keys: Vec<&String> = dict.keys().collect();
        keys.sort();

        let mut actions = BTreeMap::new();
        for key in keys {
            let event = match TriggerEvent::from_key(key) {
                Some(event) => event,
                None => {
                    log::debug!("Ignoring unknown trigger /{} in additional actions", key);
                    continue;
                },
            };
            let value = &dict[key.as_str()];
            if value.is_null() {
                continue;
            }
            match Action::parse(resolver, value, options) {
                Ok(action) => {
                    actions.insert(event, action);
                },
                Err(e) => options.tolerate(e, &format!("/{} trigger action", key))?,
            }
        }
        Ok(Self { actions })
    }

    /// Action for a trigger.
    pub fn get(&self, event: TriggerEvent) -> Option<&Action> {
        self.actions.get(&event)
    }

    /// Check whether no triggers are defined.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of triggers with an action.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Iterate over triggers and their actions.
    pub fn iter(&self) -> impl Iterator<Item = (TriggerEvent, &Action)> {
        self.actions.iter().map(|(k, v)| (*k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ObjectStore;

    fn uri_action(uri: &str) -> Object {
        Object::dictionary([
            ("S", Object::name("URI")),
            ("URI", Object::string(uri.as_bytes().to_vec())),
        ])
    }

    #[test]
    fn test_parse_uri_action() {
        let store = ObjectStore::new();
        let action = Action::parse(&store, &uri_action("https://example.com"), &ModelOptions::default())
            .unwrap();
        assert_eq!(
            action.kind,
            ActionKind::Uri {
                uri: "https://example.com".to_string(),
                is_map: false
            }
        );
        assert_eq!(action.action_type(), "URI");
    }

    #[test]
    fn test_parse_goto_explicit_destination() {
        let mut store = ObjectStore::new();
        let page = store.add(Object::dictionary([("Type", Object::name("Page"))]));
        let action = Object::dictionary([
            ("S", Object::name("GoTo")),
            (
                "D",
                Object::Array(vec![
                    Object::Reference(page),
                    Object::name("XYZ"),
                    Object::Integer(0),
                    Object::Integer(792),
                    Object::Null,
                ]),
            ),
        ]);
        let parsed = Action::parse(&store, &action, &ModelOptions::default()).unwrap();
        assert_eq!(
            parsed.kind,
            ActionKind::GoTo(Destination::Explicit {
                page: PageTarget::Reference(page),
                fit: Fit::Xyz {
                    left: Some(0.0),
                    top: Some(792.0),
                    zoom: None
                }
            })
        );
    }

    #[test]
    fn test_missing_action_type() {
        let store = ObjectStore::new();
        let obj = Object::dictionary([("URI", Object::text("x"))]);
        assert!(matches!(
            Action::parse(&store, &obj, &ModelOptions::default()),
            Err(Error::MissingEntry { .. })
        ));
    }

    #[test]
    fn test_next_chain_order() {
        let store = ObjectStore::new();
        let obj = Object::dictionary([
            ("S", Object::name("Named")),
            ("N", Object::name("NextPage")),
            (
                "Next",
                Object::Array(vec![uri_action("a:1"), uri_action("a:2")]),
            ),
        ]);
        let action = Action::parse(&store, &obj, &ModelOptions::default()).unwrap();
        let types: Vec<&str> = action.sequence().iter().map(|a| a.action_type()).collect();
        assert_eq!(types, vec!["Named", "URI", "URI"]);
    }

    #[test]
    fn test_cyclic_next_chain() {
        let mut store = ObjectStore::new();
        let a = ObjectRef::new(1, 0);
        let b = ObjectRef::new(2, 0);
        store.insert(
            a,
            Object::dictionary([("S", Object::name("Named")), ("N", Object::name("FirstPage")), ("Next", Object::Reference(b))]),
        );
        store.insert(
            b,
            Object::dictionary([("S", Object::name("Named")), ("N", Object::name("LastPage")), ("Next", Object::Reference(a))]),
        );

        let strict = Action::parse(&store, &Object::Reference(a), &ModelOptions::strict());
        assert!(matches!(strict, Err(Error::CircularReference(_))));

        let lenient = Action::parse(&store, &Object::Reference(a), &ModelOptions::lenient()).unwrap();
        assert_eq!(lenient.sequence().len(), 2);
    }

    #[test]
    fn test_submit_form_flags_and_fields() {
        let mut store = ObjectStore::new();
        let field = store.add(Object::dictionary([("T", Object::text("name"))]));
        let obj = Object::dictionary([
            ("S", Object::name("SubmitForm")),
            ("F", Object::dictionary([("FS", Object::name("URL")), ("F", Object::text("https://x/submit"))])),
            ("Fields", Object::Array(vec![Object::text("address.city"), Object::Reference(field)])),
            ("Flags", Object::Integer(0b100101)),
        ]);
        let action = Action::parse(&store, &obj, &ModelOptions::default()).unwrap();
        match action.kind {
            ActionKind::SubmitForm { url, fields, flags } => {
                assert_eq!(url.as_deref(), Some("https://x/submit"));
                assert_eq!(
                    fields,
                    vec![FieldSelector::Name("address.city".into()), FieldSelector::Reference(field)]
                );
                assert!(flags.contains(SubmitFormFlags::EXCLUDE));
                assert!(flags.contains(SubmitFormFlags::EXPORT_FORMAT));
                assert!(flags.contains(SubmitFormFlags::XFDF));
            },
            other => panic!("Expected SubmitForm, got {:?}", other),
        }
    }

    #[test]
    fn test_javascript_string_and_stream() {
        let store = ObjectStore::new();
        let inline = Object::dictionary([("S", Object::name("JavaScript")), ("JS", Object::text("app.alert(1)"))]);
        let action = Action::parse(&store, &inline, &ModelOptions::default()).unwrap();
        assert_eq!(action.kind, ActionKind::JavaScript(Some("app.alert(1)".into())));

        let mut filtered = crate::object::Dictionary::new();
        filtered.insert("Filter".into(), Object::name("FlateDecode"));
        let stream = Object::dictionary([
            ("S", Object::name("JavaScript")),
            ("JS", Object::stream(filtered, vec![0x78, 0x9c])),
        ]);
        let action = Action::parse(&store, &stream, &ModelOptions::default()).unwrap();
        assert_eq!(action.kind, ActionKind::JavaScript(None));
    }

    #[test]
    fn test_additional_actions() {
        let store = ObjectStore::new();
        let aa = Object::dictionary([
            ("E", uri_action("a:enter")),
            ("K", Object::dictionary([("S", Object::name("JavaScript")), ("JS", Object::text("AFNumber_Keystroke()"))])),
            ("WC", uri_action("a:doc")),
            ("Fo", Object::dictionary([("URI", Object::text("broken"))])),
        ]);

        let parsed = AdditionalActions::parse(&store, &aa, &ModelOptions::lenient()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed.get(TriggerEvent::CursorEnter).is_some());
        assert!(parsed.get(TriggerEvent::Keystroke).is_some());
        assert!(parsed.get(TriggerEvent::Focus).is_none());

        assert!(AdditionalActions::parse(&store, &aa, &ModelOptions::strict()).is_err());
    }

    #[test]
    fn test_named_destination_dictionary_form() {
        let store = ObjectStore::new();
        let obj = Object::dictionary([(
            "D",
            Object::Array(vec![Object::Integer(3), Object::name("FitH"), Object::Integer(500)]),
        )]);
        let dest = Destination::parse(&store, &obj).unwrap();
        assert_eq!(
            dest,
            Destination::Explicit {
                page: PageTarget::Index(3),
                fit: Fit::FitH { top: Some(500.0) }
            }
        );
    }
}
