//! Text fields.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.7.4.3 - Text Fields.

use crate::acroform::field::{FieldDictionary, FieldValue};
use crate::acroform::flags::FieldFlags;

/// Typed view of a text field.
#[derive(Debug, Clone, Copy)]
pub struct TextField<'a> {
    field: &'a FieldDictionary,
}

impl<'a> TextField<'a> {
    /// Wrap a field dictionary.
    pub fn new(field: &'a FieldDictionary) -> Self {
        Self { field }
    }

    /// The underlying field.
    pub fn field(&self) -> &'a FieldDictionary {
        self.field
    }

    /// Current text, empty when there is no value.
    pub fn text(&self) -> String {
        match self.field.value() {
            FieldValue::Text(s) | FieldValue::Name(s) => s,
            _ => String::new(),
        }
    }

    /// Maximum length (`MaxLen`, inheritable).
    pub fn max_len(&self) -> Option<u32> {
        self.field.max_len()
    }

    fn has(&self, flag: FieldFlags) -> bool {
        self.field.flags().contains(flag)
    }

    /// `Multiline` flag.
    pub fn is_multiline(&self) -> bool {
        self.has(FieldFlags::MULTILINE)
    }

    /// `Password` flag.
    pub fn is_password(&self) -> bool {
        self.has(FieldFlags::PASSWORD)
    }

    /// `FileSelect` flag.
    pub fn is_file_select(&self) -> bool {
        self.has(FieldFlags::FILE_SELECT)
    }

    /// `DoNotSpellCheck` flag.
    pub fn is_do_not_spell_check(&self) -> bool {
        self.has(FieldFlags::DO_NOT_SPELL_CHECK)
    }

    /// `DoNotScroll` flag.
    pub fn is_do_not_scroll(&self) -> bool {
        self.has(FieldFlags::DO_NOT_SCROLL)
    }

    /// `RichText` flag.
    pub fn is_rich_text(&self) -> bool {
        self.has(FieldFlags::RICH_TEXT)
    }

    /// Comb layout applies only with `MaxLen` set and none of the
    /// `Multiline`, `Password` or `FileSelect` flags.
    pub fn is_comb(&self) -> bool {
        self.has(FieldFlags::COMB)
            && self.max_len().is_some()
            && !self.field.flags().intersects(
                FieldFlags::MULTILINE | FieldFlags::PASSWORD | FieldFlags::FILE_SELECT,
            )
    }

    /// Rich text value (`RV`).
    pub fn rich_value(&self) -> Option<&'a str> {
        self.field.rich_value.as_deref()
    }

    /// Default style string (`DS`).
    pub fn default_style(&self) -> Option<&'a str> {
        self.field.default_style.as_deref()
    }
}
