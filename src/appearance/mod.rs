//! Appearance streams and appearance dictionaries.
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.5.5 - Appearance Streams.
//!
//! An annotation's `AP` dictionary holds up to three appearances (normal,
//! rollover, down). Each is either a single form XObject or, for annotations
//! with states such as check boxes, a subdictionary mapping state names to
//! form XObjects; the annotation's `AS` entry picks the state.

pub mod default_appearance;
pub mod generator;

pub use default_appearance::DefaultAppearance;
pub use generator::{
    AppearanceGenerator, AverageWidthMeasure, GeneratedAppearance, TextLayout, TextMeasure, WidgetStyle,
};

use crate::config::ModelOptions;
use crate::dictionary::DictView;
use crate::error::{Error, Result};
use crate::geometry::{Matrix, Rect};
use crate::library::ObjectResolver;
use crate::object::{filter_names, Dictionary, Object, ObjectRef};
use std::collections::BTreeMap;

/// Format a number for content streams: no exponent, at most four decimals,
/// trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded.fract() == 0.0 {
        return format!("{}", rounded as i64);
    }
    let s = format!("{:.4}", rounded);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Which appearance to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppearanceMode {
    /// `N`: normal appearance
    Normal,
    /// `R`: cursor over the annotation
    Rollover,
    /// `D`: mouse button held down
    Down,
}

impl AppearanceMode {
    /// Dictionary key of this mode.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Normal => "N",
            Self::Rollover => "R",
            Self::Down => "D",
        }
    }
}

/// A form XObject used as an appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct AppearanceStream {
    /// Object reference when the stream is indirect
    pub object_ref: Option<ObjectRef>,
    /// Form bounding box in form space
    pub bbox: Rect,
    /// Form matrix (identity when absent)
    pub matrix: Matrix,
    /// Resource dictionary, resolved
    pub resources: Option<Dictionary>,
    /// Content bytes as delivered by the object source
    pub content: bytes::Bytes,
    /// Filters still applied to `content`
    pub filters: Vec<String>,
    /// Complete stream dictionary
    pub dict: Dictionary,
}

impl AppearanceStream {
    /// Parse a form XObject.
    ///
    /// `BBox` is required; without it, strict mode fails and lenient mode
    /// substitutes an empty rectangle.
    pub fn parse<R: ObjectResolver + ?Sized>(
        resolver: &R,
        obj: &Object,
        options: &ModelOptions,
    ) -> Result<Self> {
        let resolved = crate::library::resolve(resolver, obj)?;
        let (dict, data) = match resolved {
            Object::Stream { dict, data } => (dict, data),
            other => return Err(Error::invalid_type("Stream", &other)),
        };

        let view = DictView::new(&dict, resolver);
        let bbox = match view.rect("BBox") {
            Some(rect) => rect,
            None => {
                options.tolerate(Error::missing("Form XObject", "BBox"), "appearance stream")?;
                Rect::default()
            },
        };
        let matrix = view.matrix("Matrix").unwrap_or_default();
        let resources = view.dict_entry("Resources");
        let filters = filter_names(&dict);

        Ok(Self {
            object_ref: obj.as_reference(),
            bbox,
            matrix,
            resources,
            content: data,
            filters,
            dict,
        })
    }

    /// Whether `content` is plain content-stream text.
    pub fn is_decoded(&self) -> bool {
        self.filters.is_empty()
    }

    /// Matrix mapping form space onto the annotation rectangle.
    ///
    /// The form's `BBox` is transformed by `Matrix`; the resulting box is
    /// then scaled and translated to fit `annot_rect` (Section 12.5.5,
    /// Algorithm 8.1). The returned matrix is `Matrix` followed by that fit.
    pub fn placement(&self, annot_rect: &Rect) -> Matrix {
        let transformed = self.matrix.transform_rect(&self.bbox);
        let sx = if transformed.width() > 0.0 {
            annot_rect.width() / transformed.width()
        } else {
            1.0
        };
        let sy = if transformed.height() > 0.0 {
            annot_rect.height() / transformed.height()
        } else {
            1.0
        };
        let fit = Matrix([
            sx,
            0.0,
            0.0,
            sy,
            annot_rect.llx - transformed.llx * sx,
            annot_rect.lly - transformed.lly * sy,
        ]);
        self.matrix.then(&fit)
    }
}

/// One entry of an appearance dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum AppearanceEntry {
    /// A single appearance
    Single(AppearanceStream),
    /// Appearances keyed by state name
    States(BTreeMap<String, AppearanceStream>),
}

impl AppearanceEntry {
    fn parse<R: ObjectResolver + ?Sized>(
        resolver: &R,
        obj: &Object,
        options: &ModelOptions,
    ) -> Result<Self> {
        match crate::library::resolve(resolver, obj)? {
            Object::Stream { .. } => Ok(Self::Single(AppearanceStream::parse(resolver, obj, options)?)),
            Object::Dictionary(states) => {
                let mut out = BTreeMap::new();
                for (state, value) in &states {
                    if value.is_null() {
                        continue;
                    }
                    match AppearanceStream::parse(resolver, value, options) {
                        Ok(stream) => {
                            out.insert(state.clone(), stream);
                        },
                        Err(e) => options.tolerate(e, &format!("appearance state /{}", state))?,
                    }
                }
                Ok(Self::States(out))
            },
            other => Err(Error::invalid_type("Stream or Dictionary", &other)),
        }
    }

    fn select(&self, state: Option<&str>) -> Option<&AppearanceStream> {
        match self {
            Self::Single(stream) => Some(stream),
            Self::States(states) => state.and_then(|s| states.get(s)),
        }
    }

    /// State names, sorted. Empty for a single appearance.
    pub fn state_names(&self) -> Vec<String> {
        match self {
            Self::Single(_) => Vec::new(),
            Self::States(states) => states.keys().cloned().collect(),
        }
    }
}

/// Appearance dictionary (`AP`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppearanceDictionary {
    /// Normal appearance
    pub normal: Option<AppearanceEntry>,
    /// Rollover appearance
    pub rollover: Option<AppearanceEntry>,
    /// Down appearance
    pub down: Option<AppearanceEntry>,
}

impl AppearanceDictionary {
    /// Parse an `AP` dictionary.
    pub fn parse<R: ObjectResolver + ?Sized>(
        resolver: &R,
        obj: &Object,
        options: &ModelOptions,
    ) -> Result<Self> {
        let dict = crate::library::resolve_dict(resolver, obj)?;
        let mut ap = AppearanceDictionary::default();

        for mode in [AppearanceMode::Normal, AppearanceMode::Rollover, AppearanceMode::Down] {
            let raw = match dict.get(mode.key()) {
                Some(raw) if !raw.is_null() => raw,
                _ => continue,
            };
            let entry = match AppearanceEntry::parse(resolver, raw, options) {
                Ok(entry) => entry,
                Err(e) => {
                    options.tolerate(e, &format!("/AP /{} entry", mode.key()))?;
                    continue;
                },
            };
            match mode {
                AppearanceMode::Normal => ap.normal = Some(entry),
                AppearanceMode::Rollover => ap.rollover = Some(entry),
                AppearanceMode::Down => ap.down = Some(entry),
            }
        }

        if ap.normal.is_none() {
            options.tolerate(Error::missing("AP", "N"), "appearance dictionary")?;
        }
        Ok(ap)
    }

    /// Entry for a mode, without fallback.
    pub fn entry(&self, mode: AppearanceMode) -> Option<&AppearanceEntry> {
        match mode {
            AppearanceMode::Normal => self.normal.as_ref(),
            AppearanceMode::Rollover => self.rollover.as_ref(),
            AppearanceMode::Down => self.down.as_ref(),
        }
    }

    /// Pick the appearance to draw.
    ///
    /// `state` is the annotation's `AS` entry. Rollover and down fall back to
    /// the normal appearance when they are absent or lack the state. State
    /// subdictionaries need a state; with none, nothing is drawn.
    pub fn select(&self, mode: AppearanceMode, state: Option<&str>) -> Option<&AppearanceStream> {
        let chosen = self.entry(mode).and_then(|e| e.select(state));
        match (chosen, mode) {
            (Some(stream), _) => Some(stream),
            (None, AppearanceMode::Normal) => None,
            (None, _) => self.normal.as_ref().and_then(|e| e.select(state)),
        }
    }

    /// State names of a mode, sorted.
    pub fn state_names(&self, mode: AppearanceMode) -> Vec<String> {
        self.entry(mode).map(AppearanceEntry::state_names).unwrap_or_default()
    }

    /// Normal-appearance states other than `Off`.
    pub fn on_state_names(&self) -> Vec<String> {
        self.state_names(AppearanceMode::Normal)
            .into_iter()
            .filter(|s| s != "Off")
            .collect()
    }

    /// Check whether the normal appearance is keyed by state.
    pub fn has_states(&self) -> bool {
        matches!(self.normal, Some(AppearanceEntry::States(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::library::ObjectStore;

    fn form(bbox: [f64; 4], content: &str) -> Object {
        let mut dict = Dictionary::new();
        dict.insert("Type".into(), Object::name("XObject"));
        dict.insert("Subtype".into(), Object::name("Form"));
        dict.insert("BBox".into(), Object::number_array(&bbox));
        Object::stream(dict, content.as_bytes().to_vec())
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-3.14159), "-3.1416");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn test_parse_stream_defaults() {
        let store = ObjectStore::new();
        let stream = AppearanceStream::parse(&store, &form([0.0, 0.0, 20.0, 10.0], "0 g"), &ModelOptions::default())
            .unwrap();
        assert_eq!(stream.bbox.width(), 20.0);
        assert!(stream.matrix.is_identity());
        assert!(stream.is_decoded());
        assert_eq!(&stream.content[..], b"0 g");
    }

    #[test]
    fn test_missing_bbox() {
        let store = ObjectStore::new();
        let obj = Object::stream(Dictionary::new(), Vec::new());
        assert!(AppearanceStream::parse(&store, &obj, &ModelOptions::strict()).is_err());
        let lenient = AppearanceStream::parse(&store, &obj, &ModelOptions::lenient()).unwrap();
        assert_eq!(lenient.bbox, Rect::default());
    }

    #[test]
    fn test_placement_scales_bbox_to_rect() {
        let store = ObjectStore::new();
        let stream = AppearanceStream::parse(&store, &form([0.0, 0.0, 10.0, 10.0], ""), &ModelOptions::default())
            .unwrap();
        let m = stream.placement(&Rect::new(100.0, 200.0, 120.0, 210.0));
        assert_eq!(m, Matrix([2.0, 0.0, 0.0, 1.0, 100.0, 200.0]));
    }

    #[test]
    fn test_placement_applies_form_matrix() {
        let store = ObjectStore::new();
        let mut obj = form([0.0, 0.0, 40.0, 10.0], "");
        if let Object::Stream { dict, .. } = &mut obj {
            dict.insert("Matrix".into(), Object::number_array(&[0.0, 1.0, -1.0, 0.0, 0.0, 0.0]));
        }
        let stream = AppearanceStream::parse(&store, &obj, &ModelOptions::default()).unwrap();
        let rect = Rect::new(100.0, 200.0, 120.0, 280.0);

        let m = stream.placement(&rect);
        assert_eq!(m, Matrix([0.0, 2.0, -2.0, 0.0, 120.0, 200.0]));
        assert_eq!(m.transform_rect(&stream.bbox), rect);

        let corners: Vec<(f64, f64)> = [(0.0, 0.0), (40.0, 0.0), (40.0, 10.0), (0.0, 10.0)]
            .iter()
            .map(|&(x, y)| {
                let p = m.transform_point(Point::new(x, y));
                (p.x, p.y)
            })
            .collect();
        assert_eq!(corners, vec![(120.0, 200.0), (120.0, 280.0), (100.0, 280.0), (100.0, 200.0)]);
    }

    #[test]
    fn test_state_selection() {
        let mut store = ObjectStore::new();
        let on = store.add(form([0.0, 0.0, 10.0, 10.0], "on"));
        let off = store.add(form([0.0, 0.0, 10.0, 10.0], "off"));
        let ap = Object::dictionary([
            ("N", Object::dictionary([("Yes", Object::Reference(on)), ("Off", Object::Reference(off))])),
            ("D", Object::dictionary([("Off", Object::Reference(off))])),
        ]);
        let ap = AppearanceDictionary::parse(&store, &ap, &ModelOptions::default()).unwrap();

        assert!(ap.has_states());
        assert_eq!(ap.state_names(AppearanceMode::Normal), vec!["Off", "Yes"]);
        assert_eq!(ap.on_state_names(), vec!["Yes"]);

        let normal = ap.select(AppearanceMode::Normal, Some("Yes")).unwrap();
        assert_eq!(normal.object_ref, Some(on));
        assert!(ap.select(AppearanceMode::Normal, None).is_none());

        // Down has no "Yes" state: falls back to normal
        let down = ap.select(AppearanceMode::Down, Some("Yes")).unwrap();
        assert_eq!(down.object_ref, Some(on));
        // Rollover absent
        let rollover = ap.select(AppearanceMode::Rollover, Some("Off")).unwrap();
        assert_eq!(rollover.object_ref, Some(off));
    }

    #[test]
    fn test_missing_normal_appearance() {
        let store = ObjectStore::new();
        let ap = Object::dictionary([("R", form([0.0, 0.0, 1.0, 1.0], ""))]);
        assert!(AppearanceDictionary::parse(&store, &ap, &ModelOptions::strict()).is_err());
        let lenient = AppearanceDictionary::parse(&store, &ap, &ModelOptions::lenient()).unwrap();
        assert!(lenient.normal.is_none());
        assert!(lenient.select(AppearanceMode::Rollover, None).is_some());
    }
}
