//! Entries shared by markup annotations.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.5.6.2 - Markup Annotations.

use crate::annotation_types::{AnnotationIntent, ReplyType};
use crate::dictionary::DictView;
use crate::library::ObjectResolver;
use crate::object::{Object, ObjectRef};
use crate::text_string::{decode_text_string, PdfDate};

/// Markup entries (Table 170).
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupInfo {
    /// Author (`T`)
    pub author: Option<String>,
    /// Associated popup (`Popup`)
    pub popup: Option<ObjectRef>,
    /// Constant opacity (`CA`, default 1.0)
    pub opacity: f64,
    /// Rich text contents (`RC`), from a string or an unfiltered stream
    pub rich_text: Option<String>,
    /// Creation date (`CreationDate`)
    pub creation_date: Option<PdfDate>,
    /// Annotation this one replies to (`IRT`)
    pub in_reply_to: Option<ObjectRef>,
    /// Subject (`Subj`)
    pub subject: Option<String>,
    /// Relationship to `IRT` (`RT`, default Reply)
    pub reply_type: ReplyType,
    /// Intent (`IT`)
    pub intent: Option<AnnotationIntent>,
    /// Whether external data (`ExData`) is attached
    pub has_external_data: bool,
}

impl Default for MarkupInfo {
    fn default() -> Self {
        Self {
            author: None,
            popup: None,
            opacity: 1.0,
            rich_text: None,
            creation_date: None,
            in_reply_to: None,
            subject: None,
            reply_type: ReplyType::Reply,
            intent: None,
            has_external_data: false,
        }
    }
}

impl MarkupInfo {
    /// Read the markup entries of an annotation dictionary.
    pub fn from_view<R: ObjectResolver + ?Sized>(view: DictView<'_, R>) -> Self {
        let rich_text = match view.get("RC") {
            Some(Object::String(s)) => Some(decode_text_string(&s)),
            Some(Object::Stream { dict, data }) => {
                if crate::object::filter_names(&dict).is_empty() {
                    Some(decode_text_string(&data))
                } else {
                    log::debug!("Skipping filtered /RC stream");
                    None
                }
            },
            _ => None,
        };

        Self {
            author: view.text("T"),
            popup: view.reference("Popup"),
            opacity: view.number("CA").map(|v| v.clamp(0.0, 1.0)).unwrap_or(1.0),
            rich_text,
            creation_date: view.date("CreationDate"),
            in_reply_to: view.reference("IRT"),
            subject: view.text("Subj"),
            reply_type: view
                .name("RT")
                .map(|n| ReplyType::from_pdf_name(&n))
                .unwrap_or_default(),
            intent: view.name("IT").map(|n| AnnotationIntent::from_pdf_name(&n)),
            has_external_data: view.contains("ExData"),
        }
    }

    /// Check whether this annotation is a reply to another.
    pub fn is_reply(&self) -> bool {
        self.in_reply_to.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ObjectStore;
    use crate::object::Dictionary;

    #[test]
    fn test_markup_defaults() {
        let store = ObjectStore::new();
        let dict = Dictionary::new();
        let info = MarkupInfo::from_view(DictView::new(&dict, &store));
        assert_eq!(info, MarkupInfo::default());
        assert_eq!(info.opacity, 1.0);
        assert!(!info.is_reply());
    }

    #[test]
    fn test_markup_entries() {
        let mut store = ObjectStore::new();
        let parent = store.add(Object::dictionary([("Subtype", Object::name("Text"))]));
        let rc = store.add(Object::stream(Dictionary::new(), b"<body>Hi</body>".to_vec()));
        let dict = Dictionary::from([
            ("T".to_string(), Object::text("Reviewer")),
            ("CA".to_string(), Object::Real(0.5)),
            ("IRT".to_string(), Object::Reference(parent)),
            ("RT".to_string(), Object::name("Group")),
            ("RC".to_string(), Object::Reference(rc)),
            ("CreationDate".to_string(), Object::text("D:20240102030405Z")),
            ("IT".to_string(), Object::name("FreeTextCallout")),
        ]);
        let info = MarkupInfo::from_view(DictView::new(&dict, &store));
        assert_eq!(info.author.as_deref(), Some("Reviewer"));
        assert_eq!(info.opacity, 0.5);
        assert_eq!(info.in_reply_to, Some(parent));
        assert_eq!(info.reply_type, ReplyType::Group);
        assert_eq!(info.rich_text.as_deref(), Some("<body>Hi</body>"));
        assert!(info.creation_date.unwrap().parsed.is_some());
        assert_eq!(info.intent, Some(AnnotationIntent::FreeTextCallout));
    }
}
