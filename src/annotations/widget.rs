//! Widget annotation entries.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.5.6.19 - Widget Annotations.
//!
//! A widget is the visual part of a form field. The field-level entries live
//! in [`crate::acroform`]; this module reads what belongs to the annotation:
//! highlighting, the appearance characteristics dictionary (`MK`), and the
//! activation and trigger actions.

use crate::actions::{Action, AdditionalActions};
use crate::annotation_types::{AnnotationColor, HighlightMode};
use crate::annotations::border::BorderStyle;
use crate::config::ModelOptions;
use crate::dictionary::DictView;
use crate::error::Result;
use crate::library::ObjectResolver;
use crate::object::ObjectRef;

/// Caption placement relative to the icon (`MK/TP`, Table 189).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextPosition {
    /// 0: caption only
    #[default]
    CaptionOnly,
    /// 1: icon only
    IconOnly,
    /// 2: caption below the icon
    Below,
    /// 3: caption above the icon
    Above,
    /// 4: caption right of the icon
    Right,
    /// 5: caption left of the icon
    Left,
    /// 6: caption overlaid on the icon
    Overlaid,
}

impl TextPosition {
    /// Decode `TP`. Out-of-range values read as caption only.
    pub fn from_pdf_int(value: i64) -> Self {
        match value {
            1 => Self::IconOnly,
            2 => Self::Below,
            3 => Self::Above,
            4 => Self::Right,
            5 => Self::Left,
            6 => Self::Overlaid,
            _ => Self::CaptionOnly,
        }
    }
}

/// When to scale an icon (`IF/SW`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconScaleWhen {
    /// `A`: always
    #[default]
    Always,
    /// `B`: when the icon is bigger than the bounds
    Bigger,
    /// `S`: when the icon is smaller than the bounds
    Smaller,
    /// `N`: never
    Never,
}

/// Icon fit dictionary (`MK/IF`, Table 247).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconFit {
    /// Scaling circumstance (`SW`)
    pub scale_when: IconScaleWhen,
    /// Keep aspect ratio (`S` = `P`, default) or stretch (`A`)
    pub proportional: bool,
    /// Leftover space distribution (`A`, default `[0.5 0.5]`)
    pub position: [f64; 2],
    /// Ignore the border width when fitting (`FB`)
    pub fit_bounds: bool,
}

impl Default for IconFit {
    fn default() -> Self {
        Self {
            scale_when: IconScaleWhen::Always,
            proportional: true,
            position: [0.5, 0.5],
            fit_bounds: false,
        }
    }
}

impl IconFit {
    fn from_view<R: ObjectResolver + ?Sized>(view: DictView<'_, R>) -> Self {
        let scale_when = match view.name("SW").as_deref() {
            Some("B") => IconScaleWhen::Bigger,
            Some("S") => IconScaleWhen::Smaller,
            Some("N") => IconScaleWhen::Never,
            _ => IconScaleWhen::Always,
        };
        let position = match view.number_array("A").as_deref() {
            Some([x, y]) => [x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)],
            _ => [0.5, 0.5],
        };
        Self {
            scale_when,
            proportional: view.name("S").as_deref() != Some("A"),
            position,
            fit_bounds: view.bool("FB").unwrap_or(false),
        }
    }
}

/// Appearance characteristics dictionary (`MK`, Table 189).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppearanceCharacteristics {
    /// Counter-clockwise rotation, one of 0, 90, 180, 270 (`R`)
    pub rotation: i32,
    /// Border color (`BC`)
    pub border_color: Option<AnnotationColor>,
    /// Background color (`BG`)
    pub background_color: Option<AnnotationColor>,
    /// Normal caption (`CA`)
    pub normal_caption: Option<String>,
    /// Rollover caption (`RC`)
    pub rollover_caption: Option<String>,
    /// Down caption (`AC`)
    pub down_caption: Option<String>,
    /// Normal icon (`I`)
    pub normal_icon: Option<ObjectRef>,
    /// Rollover icon (`RI`)
    pub rollover_icon: Option<ObjectRef>,
    /// Down icon (`IX`)
    pub down_icon: Option<ObjectRef>,
    /// Icon fit (`IF`)
    pub icon_fit: Option<IconFit>,
    /// Caption position (`TP`)
    pub text_position: TextPosition,
}

impl AppearanceCharacteristics {
    /// Read an `MK` dictionary.
    pub fn from_view<R: ObjectResolver + ?Sized>(view: DictView<'_, R>) -> Self {
        let color = |key: &str| {
            view.number_array(key)
                .and_then(|values| AnnotationColor::from_components(&values))
        };
        let icon_fit = view
            .dict_entry("IF")
            .map(|d| IconFit::from_view(DictView::new(&d, view.resolver())));

        Self {
            rotation: normalize_rotation(view.integer("R").unwrap_or(0)),
            border_color: color("BC"),
            background_color: color("BG"),
            normal_caption: view.text("CA"),
            rollover_caption: view.text("RC"),
            down_caption: view.text("AC"),
            normal_icon: view.reference("I"),
            rollover_icon: view.reference("RI"),
            down_icon: view.reference("IX"),
            icon_fit,
            text_position: TextPosition::from_pdf_int(view.integer("TP").unwrap_or(0)),
        }
    }
}

/// Round a rotation to the nearest quarter turn in 0..360.
pub fn normalize_rotation(degrees: i64) -> i32 {
    let quarter = (degrees as f64 / 90.0).round() as i64;
    if quarter * 90 != degrees {
        log::debug!("Rotation {} is not a multiple of 90", degrees);
    }
    (quarter.rem_euclid(4) * 90) as i32
}

/// Widget-specific annotation entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WidgetInfo {
    /// Highlighting mode (`H`, default Invert)
    pub highlight: HighlightMode,
    /// Appearance characteristics (`MK`)
    pub appearance_characteristics: Option<AppearanceCharacteristics>,
    /// Activation action (`A`)
    pub action: Option<Action>,
    /// Trigger actions (`AA`)
    pub additional_actions: Option<AdditionalActions>,
    /// Border style (`BS`)
    pub border_style: Option<BorderStyle>,
    /// Field this widget belongs to (`Parent`)
    pub parent: Option<ObjectRef>,
}

impl WidgetInfo {
    /// Read the widget entries of an annotation dictionary.
    ///
    /// Malformed actions fail in strict mode and are dropped otherwise.
    pub fn from_view<R: ObjectResolver + ?Sized>(view: DictView<'_, R>, options: &ModelOptions) -> Result<Self> {
        let mut action = None;
        if let Some(raw) = view.raw("A").filter(|o| !o.is_null()) {
            match Action::parse(view.resolver(), raw, options) {
                Ok(a) => action = Some(a),
                Err(e) => options.tolerate(e, "widget /A action")?,
            }
        }

        let mut additional_actions = None;
        if let Some(raw) = view.raw("AA").filter(|o| !o.is_null()) {
            match AdditionalActions::parse(view.resolver(), raw, options) {
                Ok(aa) if !aa.is_empty() => additional_actions = Some(aa),
                Ok(_) => {},
                Err(e) => options.tolerate(e, "widget /AA dictionary")?,
            }
        }

        Ok(Self {
            highlight: view
                .name("H")
                .map(|h| HighlightMode::from_pdf_name(&h))
                .unwrap_or_default(),
            appearance_characteristics: view
                .dict_entry("MK")
                .map(|mk| AppearanceCharacteristics::from_view(DictView::new(&mk, view.resolver()))),
            action,
            additional_actions,
            border_style: view
                .dict_entry("BS")
                .map(|bs| BorderStyle::from_view(DictView::new(&bs, view.resolver()))),
            parent: view.reference("Parent"),
        })
    }

    /// Rotation from `MK/R`, 0 when absent.
    pub fn rotation(&self) -> i32 {
        self.appearance_characteristics
            .as_ref()
            .map(|mk| mk.rotation)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionKind, TriggerEvent};
    use crate::library::ObjectStore;
    use crate::object::{Dictionary, Object};

    #[test]
    fn test_normalize_rotation() {
        assert_eq!(normalize_rotation(0), 0);
        assert_eq!(normalize_rotation(90), 90);
        assert_eq!(normalize_rotation(-90), 270);
        assert_eq!(normalize_rotation(450), 90);
        assert_eq!(normalize_rotation(100), 90);
    }

    #[test]
    fn test_appearance_characteristics() {
        let store = ObjectStore::new();
        let mk = Dictionary::from([
            ("R".to_string(), Object::Integer(180)),
            ("BC".to_string(), Object::number_array(&[1.0, 0.0, 0.0])),
            ("BG".to_string(), Object::Array(vec![])),
            ("CA".to_string(), Object::text("4")),
            ("TP".to_string(), Object::Integer(2)),
            (
                "IF".to_string(),
                Object::dictionary([("SW", Object::name("N")), ("S", Object::name("A"))]),
            ),
        ]);
        let mk = AppearanceCharacteristics::from_view(DictView::new(&mk, &store));
        assert_eq!(mk.rotation, 180);
        assert_eq!(mk.border_color, Some(AnnotationColor::Rgb(1.0, 0.0, 0.0)));
        assert_eq!(mk.background_color, Some(AnnotationColor::Transparent));
        assert_eq!(mk.normal_caption.as_deref(), Some("4"));
        assert_eq!(mk.text_position, TextPosition::Below);
        let fit = mk.icon_fit.unwrap();
        assert_eq!(fit.scale_when, IconScaleWhen::Never);
        assert!(!fit.proportional);
        assert_eq!(fit.position, [0.5, 0.5]);
    }

    #[test]
    fn test_widget_info() {
        let mut store = ObjectStore::new();
        let parent = store.add(Object::dictionary([("FT", Object::name("Tx"))]));
        let dict = Dictionary::from([
            ("H".to_string(), Object::name("P")),
            ("Parent".to_string(), Object::Reference(parent)),
            (
                "A".to_string(),
                Object::dictionary([("S", Object::name("URI")), ("URI", Object::string(b"https://example.com".to_vec()))]),
            ),
            (
                "AA".to_string(),
                Object::dictionary([(
                    "K",
                    Object::dictionary([("S", Object::name("JavaScript")), ("JS", Object::text("AFNumber_Keystroke()"))]),
                )]),
            ),
            ("BS".to_string(), Object::dictionary([("W", Object::Integer(2))])),
        ]);
        let info = WidgetInfo::from_view(DictView::new(&dict, &store), &ModelOptions::default()).unwrap();
        assert_eq!(info.highlight, HighlightMode::Push);
        assert_eq!(info.parent, Some(parent));
        assert!(matches!(info.action.unwrap().kind, ActionKind::Uri { .. }));
        let aa = info.additional_actions.unwrap();
        assert!(aa.get(TriggerEvent::Keystroke).is_some());
        assert_eq!(info.border_style.unwrap().width, 2.0);
        assert_eq!(info.appearance_characteristics, None);
    }

    #[test]
    fn test_bad_action_strict_vs_lenient() {
        let store = ObjectStore::new();
        let dict = Dictionary::from([("A".to_string(), Object::Integer(3))]);
        let lenient = WidgetInfo::from_view(DictView::new(&dict, &store), &ModelOptions::lenient()).unwrap();
        assert!(lenient.action.is_none());
        assert!(WidgetInfo::from_view(DictView::new(&dict, &store), &ModelOptions::strict()).is_err());
    }
}
