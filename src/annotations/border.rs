//! Annotation borders.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.5.4 - Border Styles.
//!
//! A border is described either by a border style dictionary (`BS`) or by
//! the older `Border` array. When both are present, `BS` wins.

use crate::annotation_types::{BorderEffectStyle, BorderStyleType};
use crate::dictionary::DictView;
use crate::library::ObjectResolver;

/// Border style dictionary (`BS`).
#[derive(Debug, Clone, PartialEq)]
pub struct BorderStyle {
    /// Border width in points (`W`, default 1)
    pub width: f64,
    /// Border style (`S`, default solid)
    pub style: BorderStyleType,
    /// Dash array (`D`, default `[3]`)
    pub dash_pattern: Vec<f64>,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            style: BorderStyleType::Solid,
            dash_pattern: vec![3.0],
        }
    }
}

impl BorderStyle {
    /// Read a `BS` dictionary.
    pub fn from_view<R: ObjectResolver + ?Sized>(view: DictView<'_, R>) -> Self {
        let defaults = Self::default();
        let width = match view.number("W") {
            Some(w) if w >= 0.0 => w,
            Some(w) => {
                log::debug!("Negative border width {}, using default", w);
                defaults.width
            },
            None => defaults.width,
        };
        let dash_pattern = view
            .number_array("D")
            .filter(|d| !d.is_empty() && d.iter().all(|v| *v >= 0.0))
            .unwrap_or(defaults.dash_pattern);

        Self {
            width,
            style: view
                .name("S")
                .map(|s| BorderStyleType::from_pdf_name(&s))
                .unwrap_or_default(),
            dash_pattern,
        }
    }
}

/// Legacy `Border` array `[hradius vradius width [dash]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyBorder {
    /// Horizontal corner radius
    pub horizontal_radius: f64,
    /// Vertical corner radius
    pub vertical_radius: f64,
    /// Border width; 0 means no border
    pub width: f64,
    /// Optional dash array
    pub dash_pattern: Option<Vec<f64>>,
}

impl Default for LegacyBorder {
    fn default() -> Self {
        Self {
            horizontal_radius: 0.0,
            vertical_radius: 0.0,
            width: 1.0,
            dash_pattern: None,
        }
    }
}

impl LegacyBorder {
    /// Read the `Border` entry of an annotation.
    ///
    /// Arrays shorter than three numbers are rejected.
    pub fn from_view<R: ObjectResolver + ?Sized>(view: DictView<'_, R>) -> Option<Self> {
        let arr = view.array("Border")?;
        if arr.len() < 3 {
            log::debug!("Border array has {} elements", arr.len());
            return None;
        }
        let num = |i: usize| view.resolve_item(&arr[i]).and_then(|o| o.as_number());
        let dash_pattern = arr.get(3).and_then(|o| view.resolve_item(o)).and_then(|o| {
            o.as_array()
                .map(|a| a.iter().filter_map(|v| v.as_number()).collect::<Vec<_>>())
        });

        Some(Self {
            horizontal_radius: num(0)?,
            vertical_radius: num(1)?,
            width: num(2)?.max(0.0),
            dash_pattern,
        })
    }
}

/// Border effect dictionary (`BE`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderEffect {
    /// Effect (`S`)
    pub style: BorderEffectStyle,
    /// Cloud intensity (`I`), 0 to 2
    pub intensity: f64,
}

impl BorderEffect {
    /// Read a `BE` dictionary. Intensity is clamped to 0..=2.
    pub fn from_view<R: ObjectResolver + ?Sized>(view: DictView<'_, R>) -> Self {
        Self {
            style: view
                .name("S")
                .map(|s| BorderEffectStyle::from_pdf_name(&s))
                .unwrap_or_default(),
            intensity: view.number("I").unwrap_or(0.0).clamp(0.0, 2.0),
        }
    }
}

/// Width of the border actually drawn: `BS/W`, else `Border[2]`, else 1.
pub fn effective_border_width(style: Option<&BorderStyle>, legacy: Option<&LegacyBorder>) -> f64 {
    match (style, legacy) {
        (Some(bs), _) => bs.width,
        (None, Some(border)) => border.width,
        (None, None) => 1.0,
    }
}
