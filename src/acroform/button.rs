//! Button fields: push buttons, check boxes and radio buttons.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.7.4.2 - Button Fields.

use crate::acroform::field::{FieldDictionary, FieldValue};
use crate::acroform::flags::FieldFlags;

/// Kind of button, from the `Pushbutton` and `Radio` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// Push button: no value, performs an action
    PushButton,
    /// Check box: on or off
    CheckBox,
    /// Radio button group: exactly one state on (or none)
    RadioButton,
}

/// Typed view of a button field.
#[derive(Debug, Clone, Copy)]
pub struct ButtonField<'a> {
    field: &'a FieldDictionary,
}

impl<'a> ButtonField<'a> {
    /// Wrap a field dictionary.
    pub fn new(field: &'a FieldDictionary) -> Self {
        Self { field }
    }

    /// The underlying field.
    pub fn field(&self) -> &'a FieldDictionary {
        self.field
    }

    /// Button kind. `Pushbutton` takes precedence over `Radio`.
    pub fn kind(&self) -> ButtonKind {
        let flags = self.field.flags();
        if flags.contains(FieldFlags::PUSHBUTTON) {
            ButtonKind::PushButton
        } else if flags.contains(FieldFlags::RADIO) {
            ButtonKind::RadioButton
        } else {
            ButtonKind::CheckBox
        }
    }

    /// Appearance states other than `Off`, from the widgets' normal appearances.
    pub fn on_states(&self) -> Vec<String> {
        self.field.on_states()
    }

    /// Current state name.
    ///
    /// Uses `V` when it is a name; otherwise the first widget whose `AS` is
    /// not `Off`.
    pub fn selected_state(&self) -> Option<String> {
        match self.field.value() {
            FieldValue::Name(state) => return Some(state),
            FieldValue::Text(state) => {
                log::debug!("Button {} has a string value", self.field.full_name);
                return Some(state);
            },
            _ => {},
        }
        self.field
            .widgets
            .iter()
            .filter_map(|w| w.appearance_state.clone())
            .find(|state| state != "Off")
    }

    /// Check whether the box or any radio button is on.
    pub fn is_checked(&self) -> bool {
        matches!(self.selected_state(), Some(state) if state != "Off")
    }

    /// Export values from `Opt`, one per widget.
    pub fn export_values(&self) -> Vec<String> {
        self.field.options.iter().map(|o| o.export.clone()).collect()
    }

    /// Export value of the selected state.
    ///
    /// With `Opt`, on states are widget indices into it; otherwise the state
    /// name is the export value.
    pub fn selected_export_value(&self) -> Option<String> {
        let state = self.selected_state().filter(|s| s != "Off")?;
        if self.field.options.is_empty() {
            return Some(state);
        }
        let index = self.field.widgets.iter().position(|w| {
            w.appearance
                .as_ref()
                .map(|ap| ap.on_state_names().contains(&state))
                .unwrap_or(false)
        });
        match index.and_then(|i| self.field.options.get(i)) {
            Some(option) => Some(option.export.clone()),
            None => state
                .parse::<usize>()
                .ok()
                .and_then(|i| self.field.options.get(i))
                .map(|o| o.export.clone())
                .or(Some(state)),
        }
    }

    /// `NoToggleToOff` flag.
    pub fn is_no_toggle_to_off(&self) -> bool {
        self.field.flags().contains(FieldFlags::NO_TOGGLE_TO_OFF)
    }

    /// `RadiosInUnison` flag.
    pub fn is_radios_in_unison(&self) -> bool {
        self.kind() == ButtonKind::RadioButton && self.field.flags().contains(FieldFlags::RADIOS_IN_UNISON)
    }
}
