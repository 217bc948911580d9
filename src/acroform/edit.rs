//! Changing field values.
//!
//! Edits are written to an [`ObjectStore`] and mirrored into the loaded
//! [`InteractiveForm`], so later queries see the new values.
//!
//! PDF Spec: ISO 32000-1:2008, Sections 12.7.4 (field types) and 12.7.5.3
//! (reset-form action).

use super::button::{ButtonField, ButtonKind};
use super::choice::ChoiceField;
use super::export::FormData;
use super::field::{lookup_inherited, FieldDictionary, FieldType, FieldValue};
use super::text::TextField;
use super::InteractiveForm;
use crate::actions::{Action, ActionKind, FieldSelector, ResetFormFlags};
use crate::annotation_types::AnnotationColor;
use crate::annotations::Annotation;
use crate::appearance::{AppearanceGenerator, DefaultAppearance, TextLayout, WidgetStyle};
use crate::config::ModelOptions;
use crate::error::{Error, Result};
use crate::library::ObjectStore;
use crate::object::{Dictionary, Object, ObjectRef};
use std::collections::HashSet;

/// Options for value changes.
#[derive(Debug, Clone, Default)]
pub struct EditOptions {
    /// Regenerate widget appearance streams after a change.
    ///
    /// When false, the form's `NeedAppearances` flag is set instead and
    /// viewers rebuild the appearances.
    pub generate_appearances: bool,
}

impl EditOptions {
    /// Options that regenerate appearance streams.
    pub fn with_appearances() -> Self {
        Self {
            generate_appearances: true,
        }
    }
}

/// New `V` and widget states for one field.
struct PlannedValue {
    value: Option<Object>,
    selected_indices: Option<Vec<usize>>,
    widget_states: Vec<(ObjectRef, String)>,
}

impl InteractiveForm {
    /// Set the value of a terminal field.
    ///
    /// The value is checked against the field type: text must fit `MaxLen`,
    /// choices must be among the options unless the combo box is editable,
    /// and button states must exist in the widget appearances. Read-only
    /// fields, push buttons and signature fields are rejected.
    pub fn set_field_value(
        &mut self,
        store: &mut ObjectStore,
        name: &str,
        value: FieldValue,
        options: &EditOptions,
    ) -> Result<()> {
        let index = self
            .index_of(name)
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))?;
        let field = &self.fields()[index];
        if !field.is_terminal() {
            return Err(Error::InvalidFieldValue(format!("{} is not a terminal field", name)));
        }
        if field.is_read_only() {
            return Err(Error::InvalidFieldValue(format!("{} is read-only", name)));
        }

        let plan = plan_value(field, value)?;
        log::debug!("Setting {} to {:?}", name, plan.value);
        self.apply_plan(store, index, plan)?;
        self.finish_edit(store, &[index], options)
    }

    /// Reset fields to their default values (`DV`).
    ///
    /// Follows reset-form semantics: with no selectors every field is reset;
    /// otherwise the selected fields and their descendants, or with
    /// [`ResetFormFlags::EXCLUDE`] every field except those. Fields without a
    /// default lose their value. Direct (non-indirect) fields cannot be
    /// written and are skipped. Returns the number of terminal fields reset.
    pub fn reset_fields(
        &mut self,
        store: &mut ObjectStore,
        selectors: &[FieldSelector],
        flags: ResetFormFlags,
        options: &EditOptions,
    ) -> Result<usize> {
        let mut selected: HashSet<usize> = HashSet::new();
        for selector in selectors {
            match self.select(selector) {
                Some(index) => selected.extend(self.subtree(index)),
                None => log::warn!("Reset names unknown field {:?}", selector),
            }
        }

        let targets: Vec<usize> = (0..self.fields().len())
            .filter(|i| {
                if selectors.is_empty() {
                    true
                } else if flags.contains(ResetFormFlags::EXCLUDE) {
                    !selected.contains(i)
                } else {
                    selected.contains(i)
                }
            })
            .filter(|i| {
                let field = &self.fields()[*i];
                field.is_terminal()
                    && match field.field_type() {
                        Some(FieldType::Signature) => false,
                        Some(FieldType::Button) => ButtonField::new(field).kind() != ButtonKind::PushButton,
                        _ => true,
                    }
            })
            .filter(|i| {
                let field = &self.fields()[*i];
                if field.object_ref.is_none() {
                    log::warn!("Not resetting direct field {}", field.full_name);
                }
                field.object_ref.is_some()
            })
            .collect();

        for &index in &targets {
            let field = &self.fields()[index];
            let default = field.inherited("DV").cloned();
            let plan = match field.field_type() {
                Some(FieldType::Button) => {
                    let state = default
                        .as_ref()
                        .and_then(Object::as_name)
                        .unwrap_or("Off")
                        .to_string();
                    PlannedValue {
                        value: default.clone(),
                        selected_indices: None,
                        widget_states: radio_states(field, &state),
                    }
                },
                Some(FieldType::Choice) => PlannedValue {
                    value: default,
                    selected_indices: Some(Vec::new()),
                    widget_states: Vec::new(),
                },
                _ => PlannedValue {
                    value: default,
                    selected_indices: None,
                    widget_states: Vec::new(),
                },
            };
            self.apply_plan(store, index, plan)?;
        }
        log::debug!("Reset {} field(s)", targets.len());

        self.finish_edit(store, &targets, options)?;
        Ok(targets.len())
    }

    /// Run a reset-form action against the form.
    ///
    /// Other action types are not form edits and are rejected.
    pub fn execute_reset_action(
        &mut self,
        store: &mut ObjectStore,
        action: &Action,
        options: &EditOptions,
    ) -> Result<usize> {
        match &action.kind {
            ActionKind::ResetForm { fields, flags } => self.reset_fields(store, fields, *flags, options),
            _ => Err(Error::Unsupported(format!("{} action as a form edit", action.action_type()))),
        }
    }

    /// Fill the form from exported data.
    ///
    /// Unknown or rejected fields are skipped with a warning. Returns the
    /// names of the fields that were set.
    pub fn import_data(
        &mut self,
        store: &mut ObjectStore,
        data: &FormData,
        options: &EditOptions,
    ) -> Result<Vec<String>> {
        let mut applied = Vec::new();
        for (name, value) in &data.fields {
            match self.set_field_value(store, name, value.clone(), options) {
                Ok(()) => applied.push(name.clone()),
                Err(e @ Error::FieldNotFound(_)) | Err(e @ Error::InvalidFieldValue(_)) => {
                    log::warn!("Skipping imported value for {}: {}", name, e)
                },
                Err(e) => return Err(e),
            }
        }
        Ok(applied)
    }

    fn select(&self, selector: &FieldSelector) -> Option<usize> {
        match selector {
            FieldSelector::Name(name) => self.index_of(name),
            FieldSelector::Reference(r) => self.fields().iter().position(|f| {
                f.object_ref == Some(*r) || f.widgets.iter().any(|w| w.object_ref == Some(*r))
            }),
        }
    }

    fn apply_plan(&mut self, store: &mut ObjectStore, index: usize, plan: PlannedValue) -> Result<()> {
        let field_ref = self.fields()[index].object_ref.ok_or_else(|| {
            Error::Unsupported(format!("editing direct field {}", self.fields()[index].full_name))
        })?;

        {
            let dict = store.dict_mut(field_ref)?;
            match &plan.value {
                Some(v) if !v.is_null() => {
                    dict.insert("V".into(), v.clone());
                },
                _ => {
                    dict.remove("V");
                },
            }
            match &plan.selected_indices {
                Some(indices) if !indices.is_empty() => {
                    let items = indices.iter().map(|i| Object::Integer(*i as i64)).collect();
                    dict.insert("I".into(), Object::Array(items));
                },
                Some(_) => {
                    dict.remove("I");
                },
                None => {},
            }
        }
        for (widget_ref, state) in &plan.widget_states {
            store.dict_mut(*widget_ref)?.insert("AS".into(), Object::name(state.clone()));
        }

        self.refresh_field(store, index, field_ref)
    }

    /// Re-read a field's value, selection and widgets after a write.
    fn refresh_field(&mut self, store: &ObjectStore, index: usize, field_ref: ObjectRef) -> Result<()> {
        let dict = store
            .get(field_ref)
            .and_then(Object::as_dict)
            .cloned()
            .ok_or(Error::ObjectNotFound(field_ref.id, field_ref.gen))?;
        let lenient = ModelOptions::lenient();
        let value = lookup_inherited(store, &dict, Some(field_ref), "V", &lenient)?;

        let mut widgets = Vec::new();
        for widget in &self.fields()[index].widgets {
            match widget.object_ref {
                Some(r) => widgets.push(Annotation::parse(store, &Object::Reference(r), &lenient)?),
                None => widgets.push(widget.clone()),
            }
        }
        let selected_indices = dict
            .get("I")
            .and_then(Object::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Object::as_integer)
                    .filter(|i| *i >= 0)
                    .map(|i| i as usize)
                    .collect()
            })
            .unwrap_or_default();

        let field = self.field_mut(index);
        field.set_inherited("V", value);
        field.widgets = widgets;
        field.selected_indices = selected_indices;
        field.dict = dict;
        Ok(())
    }

    fn finish_edit(&mut self, store: &mut ObjectStore, indices: &[usize], options: &EditOptions) -> Result<()> {
        if indices.is_empty() {
            return Ok(());
        }
        if !options.generate_appearances {
            return self.set_need_appearances(store);
        }
        for &index in indices {
            self.regenerate_appearances(store, index)?;
        }
        Ok(())
    }

    fn set_need_appearances(&mut self, store: &mut ObjectStore) -> Result<()> {
        match self.object_ref {
            Some(r) => {
                store.dict_mut(r)?.insert("NeedAppearances".into(), Object::Boolean(true));
            },
            None => {
                let catalog_ref = store
                    .catalog_ref()
                    .ok_or_else(|| Error::missing("trailer", "Root"))?;
                let catalog = store.dict_mut(catalog_ref)?;
                let acroform = catalog
                    .get_mut("AcroForm")
                    .and_then(Object::as_dict_mut)
                    .ok_or_else(|| Error::missing("Catalog", "AcroForm"))?;
                acroform.insert("NeedAppearances".into(), Object::Boolean(true));
            },
        }
        self.need_appearances = true;
        self.dict.insert("NeedAppearances".into(), Object::Boolean(true));
        Ok(())
    }

    fn regenerate_appearances(&mut self, store: &mut ObjectStore, index: usize) -> Result<()> {
        let generator = AppearanceGenerator::new();
        let field = &self.fields()[index];
        let field_ref = match field.object_ref {
            Some(r) => r,
            None => return Ok(()),
        };

        let dr = self.default_resources.as_ref();
        let mut reused = HashSet::new();
        let mut updates: Vec<(ObjectRef, Dictionary)> = Vec::new();
        for widget in &field.widgets {
            let widget_ref = match widget.object_ref {
                Some(r) => r,
                None => continue,
            };
            let mut ap = widget
                .dict
                .get("AP")
                .and_then(Object::as_dict)
                .cloned()
                .unwrap_or_default();
            let previous = ap.get("N").cloned();
            let previous_state = |state: &str| {
                previous
                    .as_ref()
                    .and_then(Object::as_dict)
                    .and_then(|states| states.get(state))
                    .cloned()
            };
            let style = widget_style(field, widget);
            let normal = match field.field_type() {
                Some(FieldType::Text) => {
                    let text = TextField::new(field);
                    let layout = TextLayout {
                        multiline: text.is_multiline(),
                        password: text.is_password(),
                        comb: if text.is_comb() { text.max_len() } else { None },
                    };
                    let appearance = generator.text_field(&style, &text.text(), layout);
                    store_stream(store, previous.as_ref(), appearance.to_object(dr), &mut reused)?
                },
                Some(FieldType::Choice) => {
                    let choice = ChoiceField::new(field);
                    let appearance = if choice.is_combo() {
                        let shown = choice
                            .selected_values()
                            .first()
                            .map(|v| display_for(&choice, v))
                            .unwrap_or_default();
                        generator.combo_box(&style, &shown)
                    } else {
                        let labels: Vec<String> = choice.options().iter().map(|o| o.display.clone()).collect();
                        generator.list_box(&style, &labels, &choice.selected_indices(), choice.top_index())
                    };
                    store_stream(store, previous.as_ref(), appearance.to_object(dr), &mut reused)?
                },
                Some(FieldType::Button) => {
                    let button = ButtonField::new(field);
                    let on_state = widget
                        .appearance
                        .as_ref()
                        .and_then(|ap| ap.on_state_names().into_iter().next());
                    let (kind, on_state) = match (button.kind(), on_state) {
                        (ButtonKind::PushButton, _) | (_, None) => continue,
                        (kind, Some(state)) => (kind, state),
                    };
                    let caption = widget
                        .widget()
                        .and_then(|w| w.appearance_characteristics.as_ref())
                        .and_then(|mk| mk.normal_caption.clone());
                    let draw = |on: bool| match kind {
                        ButtonKind::RadioButton => generator.radio_button(&style, on, caption.as_deref()),
                        _ => generator.check_box(&style, on, caption.as_deref()),
                    };
                    let on = store_stream(store, previous_state(&on_state).as_ref(), draw(true).to_object(dr), &mut reused)?;
                    let off = store_stream(store, previous_state("Off").as_ref(), draw(false).to_object(dr), &mut reused)?;
                    Object::dictionary([(on_state, on), ("Off".to_string(), off)])
                },
                _ => continue,
            };

            // Stale rollover and down appearances
            ap.remove("R");
            ap.remove("D");
            ap.insert("N".into(), normal);
            let mut entries = Dictionary::new();
            entries.insert("AP".into(), Object::Dictionary(ap));
            updates.push((widget_ref, entries));
        }

        let count = updates.len();
        for (widget_ref, entries) in updates {
            store.dict_mut(widget_ref)?.extend(entries);
        }
        log::trace!("Regenerated {} widget appearance(s) of {}", count, self.fields()[index].full_name);
        self.refresh_field(store, index, field_ref)
    }
}

/// Write a regenerated stream over the one it replaces, unless another
/// widget regenerated in the same pass already took that object.
fn store_stream(
    store: &mut ObjectStore,
    previous: Option<&Object>,
    stream: Object,
    reused: &mut HashSet<ObjectRef>,
) -> Result<Object> {
    if let Some(r) = previous.and_then(Object::as_reference) {
        if matches!(store.get(r), Some(Object::Stream { .. })) && reused.insert(r) {
            store.update(r, stream)?;
            return Ok(Object::Reference(r));
        }
    }
    Ok(Object::Reference(store.add(stream)))
}

/// Display text of a choice value.
fn display_for(choice: &ChoiceField<'_>, value: &str) -> String {
    choice
        .options()
        .iter()
        .find(|o| o.export == value)
        .map(|o| o.display.clone())
        .unwrap_or_else(|| value.to_string())
}

/// Style of one widget of a field.
pub(crate) fn widget_style(field: &FieldDictionary, widget: &Annotation) -> WidgetStyle {
    let mut style = WidgetStyle::new(widget.rect);
    if let Some(mk) = widget.widget().and_then(|w| w.appearance_characteristics.as_ref()) {
        style.rotation = mk.rotation;
        style.border_color = mk.border_color.unwrap_or(AnnotationColor::Transparent);
        style.background = mk.background_color.unwrap_or(AnnotationColor::Transparent);
    }
    style.border_width = widget.border_width();
    if let Some(bs) = widget.border_style() {
        style.border_style = bs.style;
        style.dash_pattern = bs.dash_pattern.clone();
    }
    style.default_appearance = field
        .default_appearance()
        .map(|da| DefaultAppearance::parse(&da))
        .unwrap_or_default();
    style.quadding = field.quadding();
    style
}

/// Widget `AS` values for a button set to `state`: widgets that have the
/// state turn on, all others off.
fn radio_states(field: &FieldDictionary, state: &str) -> Vec<(ObjectRef, String)> {
    field
        .widgets
        .iter()
        .filter_map(|w| {
            let r = w.object_ref?;
            let on_states = w.appearance.as_ref().map(|ap| ap.on_state_names()).unwrap_or_default();
            // A widget without state appearances follows the value
            let has_state = on_states.is_empty() || on_states.iter().any(|s| s == state);
            Some((r, if has_state { state.to_string() } else { "Off".to_string() }))
        })
        .collect()
}

fn plan_value(field: &FieldDictionary, value: FieldValue) -> Result<PlannedValue> {
    let name = &field.full_name;
    let plain = |value: Option<Object>| PlannedValue {
        value,
        selected_indices: None,
        widget_states: Vec::new(),
    };

    match field.field_type() {
        Some(FieldType::Text) => match value {
            FieldValue::None => Ok(plain(None)),
            FieldValue::Text(s) | FieldValue::Name(s) => {
                if let Some(max) = field.max_len() {
                    let len = s.chars().count();
                    if len > max as usize {
                        return Err(Error::InvalidFieldValue(format!(
                            "{} accepts at most {} characters, got {}",
                            name, max, len
                        )));
                    }
                }
                Ok(plain(Some(Object::text(&s))))
            },
            other => Err(Error::InvalidFieldValue(format!("{:?} for text field {}", other, name))),
        },
        Some(FieldType::Choice) => plan_choice(field, value),
        Some(FieldType::Button) => plan_button(field, value),
        Some(FieldType::Signature) => Err(Error::Unsupported(format!("setting signature field {}", name))),
        _ => Ok(plain(match value {
            FieldValue::None => None,
            other => Some(other.to_object()),
        })),
    }
}

fn plan_choice(field: &FieldDictionary, value: FieldValue) -> Result<PlannedValue> {
    let choice = ChoiceField::new(field);
    let name = &field.full_name;
    let requested = match value {
        FieldValue::None => Vec::new(),
        FieldValue::Text(s) | FieldValue::Name(s) => vec![s],
        FieldValue::Array(items) => items,
        FieldValue::Boolean(_) => {
            return Err(Error::InvalidFieldValue(format!("boolean for choice field {}", name)));
        },
    };
    if requested.len() > 1 && !choice.is_multi_select() {
        return Err(Error::InvalidFieldValue(format!("{} allows a single selection", name)));
    }

    let mut exports = Vec::new();
    let mut indices = Vec::new();
    for item in &requested {
        let position = choice
            .options()
            .iter()
            .position(|o| &o.export == item)
            .or_else(|| choice.options().iter().position(|o| &o.display == item));
        match position {
            Some(i) => {
                exports.push(choice.options()[i].export.clone());
                indices.push(i);
            },
            None if choice.is_editable() => exports.push(item.clone()),
            None => {
                return Err(Error::InvalidFieldValue(format!("{:?} is not an option of {}", item, name)));
            },
        }
    }
    indices.sort_unstable();

    let value = match exports.len() {
        0 => None,
        1 => Some(Object::text(&exports[0])),
        _ => Some(Object::Array(exports.iter().map(|e| Object::text(e)).collect())),
    };
    Ok(PlannedValue {
        value,
        selected_indices: Some(if choice.is_multi_select() { indices } else { Vec::new() }),
        widget_states: Vec::new(),
    })
}

fn plan_button(field: &FieldDictionary, value: FieldValue) -> Result<PlannedValue> {
    let button = ButtonField::new(field);
    let name = &field.full_name;
    if button.kind() == ButtonKind::PushButton {
        return Err(Error::InvalidFieldValue(format!("push button {} has no value", name)));
    }
    let on_states = button.on_states();

    let state = match value {
        FieldValue::Boolean(false) | FieldValue::None => "Off".to_string(),
        FieldValue::Boolean(true) => {
            if button.kind() == ButtonKind::RadioButton && on_states.len() > 1 {
                return Err(Error::InvalidFieldValue(format!("radio group {} needs a state name", name)));
            }
            on_states.first().cloned().unwrap_or_else(|| "Yes".to_string())
        },
        FieldValue::Text(s) | FieldValue::Name(s) => {
            if s == "Off" || on_states.contains(&s) {
                s
            } else if let Some(i) = field.options.iter().position(|o| o.export == s) {
                // With Opt, the widget at the option's index carries the state
                field
                    .widgets
                    .get(i)
                    .and_then(|w| w.appearance.as_ref())
                    .and_then(|ap| ap.on_state_names().into_iter().next())
                    .ok_or_else(|| Error::InvalidFieldValue(format!("no widget for {:?} in {}", s, name)))?
            } else {
                return Err(Error::InvalidFieldValue(format!("{:?} is not a state of {}", s, name)));
            }
        },
        FieldValue::Array(_) => {
            return Err(Error::InvalidFieldValue(format!("array for button field {}", name)));
        },
    };
    if state == "Off" && button.kind() == ButtonKind::RadioButton && button.is_no_toggle_to_off() {
        log::debug!("Turning off radio group {} despite NoToggleToOff", name);
    }

    Ok(PlannedValue {
        value: Some(Object::name(state.clone())),
        selected_indices: None,
        widget_states: radio_states(field, &state),
    })
}
