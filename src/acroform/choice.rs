//! Choice fields: list boxes and combo boxes.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.7.4.4 - Choice Fields.

use crate::acroform::field::{ChoiceOption, FieldDictionary, FieldValue};
use crate::acroform::flags::FieldFlags;

/// Typed view of a choice field.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceField<'a> {
    field: &'a FieldDictionary,
}

impl<'a> ChoiceField<'a> {
    /// Wrap a field dictionary.
    pub fn new(field: &'a FieldDictionary) -> Self {
        Self { field }
    }

    /// The underlying field.
    pub fn field(&self) -> &'a FieldDictionary {
        self.field
    }

    /// Options (`Opt`).
    pub fn options(&self) -> &'a [ChoiceOption] {
        &self.field.options
    }

    /// First visible option of a list box (`TI`).
    pub fn top_index(&self) -> usize {
        self.field.top_index
    }

    /// Selected values from `V`: one string, or several for multi-select.
    pub fn selected_values(&self) -> Vec<String> {
        match self.field.value() {
            FieldValue::Text(s) | FieldValue::Name(s) => vec![s],
            FieldValue::Array(items) => items,
            _ => Vec::new(),
        }
    }

    /// Selected option indices.
    ///
    /// Uses `I` when present, otherwise matches `V` against the export
    /// values (then the display texts) of the options.
    pub fn selected_indices(&self) -> Vec<usize> {
        if !self.field.selected_indices.is_empty() {
            return self
                .field
                .selected_indices
                .iter()
                .copied()
                .filter(|i| *i < self.field.options.len())
                .collect();
        }
        let mut indices: Vec<usize> = self
            .selected_values()
            .iter()
            .filter_map(|value| self.index_of(value))
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Index of the option with this export value or display text.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        let options = &self.field.options;
        options
            .iter()
            .position(|o| o.export == value)
            .or_else(|| options.iter().position(|o| o.display == value))
    }

    fn has(&self, flag: FieldFlags) -> bool {
        self.field.flags().contains(flag)
    }

    /// Combo box (`Combo` flag); a list box otherwise.
    pub fn is_combo(&self) -> bool {
        self.has(FieldFlags::COMBO)
    }

    /// Multiple selection allowed (`MultiSelect`, list boxes).
    pub fn is_multi_select(&self) -> bool {
        self.has(FieldFlags::MULTI_SELECT)
    }

    /// Custom text allowed (`Edit`, combo boxes only).
    pub fn is_editable(&self) -> bool {
        self.is_combo() && self.has(FieldFlags::EDIT)
    }

    /// `Sort` flag.
    pub fn is_sorted(&self) -> bool {
        self.has(FieldFlags::SORT)
    }

    /// `CommitOnSelChange` flag.
    pub fn is_commit_on_sel_change(&self) -> bool {
        self.has(FieldFlags::COMMIT_ON_SEL_CHANGE)
    }
}
