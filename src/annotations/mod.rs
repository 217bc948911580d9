//! PDF annotations.
//!
//! Provides access to page annotations per PDF spec ISO 32000-1:2008,
//! Section 12.5: the entries common to all annotations, the markup entries,
//! and a typed payload for each standard subtype.
//!
//! # Supported Annotation Types
//!
//! - Text (sticky notes), Popup
//! - Link (hyperlinks)
//! - Text Markup (Highlight, Underline, StrikeOut, Squiggly)
//! - FreeText (text boxes)
//! - Shape (Line, Square, Circle, Polygon, PolyLine)
//! - Stamp, Ink, FileAttachment, Caret
//! - Widget (form field widgets)
//!
//! Other subtypes keep their common entries and raw dictionary.

pub mod border;
pub mod markup;
pub mod widget;

pub use border::{effective_border_width, BorderEffect, BorderStyle, LegacyBorder};
pub use markup::MarkupInfo;
pub use widget::{AppearanceCharacteristics, IconFit, IconScaleWhen, TextPosition, WidgetInfo};

use crate::actions::{file_spec_name, Action, Destination};
use crate::annotation_types::{
    parse_rect_differences, quad_points, AnnotationColor, AnnotationFlags, AnnotationSubtype,
    CaptionPosition, CaretSymbol, FileAttachmentIcon, HighlightMode, LineEndingStyle, QuadPoint,
    StampType, TextAlignment, TextAnnotationIcon, TextMarkupType,
};
use crate::appearance::{AppearanceDictionary, AppearanceMode, AppearanceStream, DefaultAppearance};
use crate::config::ModelOptions;
use crate::dictionary::DictView;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::library::{resolve_entry, ChainLimited, ObjectResolver};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::text_string::PdfDate;

/// Square and circle entries (Section 12.5.6.8).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeInfo {
    /// Border style (`BS`)
    pub border_style: Option<BorderStyle>,
    /// Fill color (`IC`)
    pub interior_color: Option<AnnotationColor>,
    /// Border effect (`BE`)
    pub border_effect: Option<BorderEffect>,
    /// Insets of the drawn shape within `Rect` (`RD`)
    pub rect_differences: Option<[f64; 4]>,
}

/// Polygon and polyline entries (Section 12.5.6.9).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyInfo {
    /// Vertices in default user space (`Vertices`)
    pub vertices: Vec<Point>,
    /// Line endings, polylines only (`LE`)
    pub line_endings: [LineEndingStyle; 2],
    /// Border style (`BS`)
    pub border_style: Option<BorderStyle>,
    /// Fill color (`IC`)
    pub interior_color: Option<AnnotationColor>,
    /// Border effect (`BE`)
    pub border_effect: Option<BorderEffect>,
}

/// Subtype-specific annotation data.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationKind {
    /// Sticky note
    Text {
        /// Initially open (`Open`)
        open: bool,
        /// Icon (`Name`)
        icon: TextAnnotationIcon,
        /// Review state (`State`)
        state: Option<String>,
        /// State model (`StateModel`)
        state_model: Option<String>,
    },
    /// Hyperlink
    Link {
        /// Activation action (`A`)
        action: Option<Action>,
        /// Destination (`Dest`), used when there is no action
        destination: Option<Destination>,
        /// Highlighting mode (`H`)
        highlight: HighlightMode,
        /// Active regions (`QuadPoints`)
        quad_points: Vec<QuadPoint>,
        /// URI action preserved from a replaced annotation (`PA`)
        uri_action: Option<Action>,
        /// Border style (`BS`)
        border_style: Option<BorderStyle>,
    },
    /// Text box
    FreeText {
        /// Default appearance (`DA`)
        default_appearance: Option<DefaultAppearance>,
        /// Justification (`Q`)
        quadding: TextAlignment,
        /// Default style string (`DS`)
        default_style: Option<String>,
        /// Callout line points (`CL`)
        callout: Vec<Point>,
        /// Border effect (`BE`)
        border_effect: Option<BorderEffect>,
        /// Text rectangle insets (`RD`)
        rect_differences: Option<[f64; 4]>,
        /// Border style (`BS`)
        border_style: Option<BorderStyle>,
        /// Callout line ending (`LE`)
        line_ending: LineEndingStyle,
    },
    /// Straight line
    Line {
        /// Start and end point `[x1 y1 x2 y2]` (`L`)
        endpoints: [f64; 4],
        /// Border style (`BS`)
        border_style: Option<BorderStyle>,
        /// Line endings (`LE`)
        line_endings: [LineEndingStyle; 2],
        /// Fill color of line endings (`IC`)
        interior_color: Option<AnnotationColor>,
        /// Leader line length (`LL`)
        leader_length: f64,
        /// Leader line extension (`LLE`)
        leader_extension: f64,
        /// Show `Contents` as a caption (`Cap`)
        caption: bool,
        /// Leader line offset (`LLO`)
        leader_offset: f64,
        /// Caption placement (`CP`)
        caption_position: CaptionPosition,
        /// Caption offset (`CO`)
        caption_offset: [f64; 2],
    },
    /// Rectangle
    Square(ShapeInfo),
    /// Ellipse
    Circle(ShapeInfo),
    /// Closed polygon
    Polygon(PolyInfo),
    /// Open polyline
    PolyLine(PolyInfo),
    /// Highlight, underline, squiggly or strike-out
    TextMarkup {
        /// Which markup
        markup_type: TextMarkupType,
        /// Marked regions (`QuadPoints`)
        quad_points: Vec<QuadPoint>,
    },
    /// Insertion caret
    Caret {
        /// Caret insets (`RD`)
        rect_differences: Option<[f64; 4]>,
        /// Symbol (`Sy`)
        symbol: CaretSymbol,
    },
    /// Rubber stamp
    Stamp {
        /// Stamp icon (`Name`)
        name: StampType,
    },
    /// Freehand drawing
    Ink {
        /// Stroked paths (`InkList`)
        ink_list: Vec<Vec<Point>>,
        /// Border style (`BS`)
        border_style: Option<BorderStyle>,
    },
    /// Popup window for a markup annotation
    Popup {
        /// Parent annotation (`Parent`)
        parent: Option<ObjectRef>,
        /// Initially open (`Open`)
        open: bool,
    },
    /// Embedded file
    FileAttachment {
        /// File name from the file specification (`FS`)
        file_spec: Option<String>,
        /// Icon (`Name`)
        icon: FileAttachmentIcon,
    },
    /// Form field widget
    Widget(WidgetInfo),
    /// Subtypes without a typed payload
    Other,
}

/// A PDF annotation.
///
/// Represents all PDF annotation types per ISO 32000-1:2008, Section 12.5.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Object reference when the annotation is indirect
    pub object_ref: Option<ObjectRef>,
    /// Annotation subtype (`Subtype`)
    pub subtype: AnnotationSubtype,
    /// Annotation rectangle (`Rect`)
    pub rect: Rect,
    /// Text contents (`Contents`)
    pub contents: Option<String>,
    /// Page the annotation is on (`P`)
    pub page: Option<ObjectRef>,
    /// Unique name on the page (`NM`)
    pub name: Option<String>,
    /// Modification date (`M`)
    pub modified: Option<PdfDate>,
    /// Annotation flags (`F`)
    pub flags: AnnotationFlags,
    /// Appearance dictionary (`AP`)
    pub appearance: Option<AppearanceDictionary>,
    /// Appearance state (`AS`)
    pub appearance_state: Option<String>,
    /// Legacy border (`Border`)
    pub border: Option<LegacyBorder>,
    /// Color (`C`)
    pub color: Option<AnnotationColor>,
    /// Structure tree key (`StructParent`)
    pub struct_parent: Option<i64>,
    /// Optional content membership (`OC`)
    pub optional_content: Option<ObjectRef>,
    /// Markup entries, for markup subtypes
    pub markup: Option<MarkupInfo>,
    /// Subtype-specific data
    pub kind: AnnotationKind,
    /// Complete annotation dictionary
    pub dict: Dictionary,
}

impl Annotation {
    /// Parse an annotation dictionary (direct or indirect).
    ///
    /// `Subtype` and `Rect` are required. In lenient mode a missing `Rect`
    /// reads as an empty rectangle and a missing `Subtype` as an unknown
    /// subtype.
    pub fn parse<R: ObjectResolver + ?Sized>(
        resolver: &R,
        obj: &Object,
        options: &ModelOptions,
    ) -> Result<Self> {
        let object_ref = obj.as_reference();
        let dict = crate::library::resolve_dict(resolver, obj)?;
        let view = DictView::new(&dict, resolver);

        if let Some(t) = view.name("Type") {
            if t != "Annot" {
                log::debug!("Annotation has /Type /{}", t);
            }
        }

        let subtype = match view.name("Subtype") {
            Some(name) => AnnotationSubtype::from_pdf_name(&name),
            None => {
                options.tolerate(Error::missing("Annot", "Subtype"), "annotation")?;
                AnnotationSubtype::Unknown(String::new())
            },
        };
        let rect = match view.rect("Rect") {
            Some(rect) => rect,
            None => {
                options.tolerate(Error::missing("Annot", "Rect"), "annotation")?;
                Rect::default()
            },
        };
        log::trace!("Parsing /{} annotation {:?}", subtype.pdf_name(), object_ref);

        let appearance = match view.raw("AP").filter(|o| !o.is_null()) {
            Some(raw) => match AppearanceDictionary::parse(resolver, raw, options) {
                Ok(ap) => Some(ap),
                Err(e) => {
                    options.tolerate(e, "annotation /AP")?;
                    None
                },
            },
            None => None,
        };

        let markup = subtype.is_markup().then(|| MarkupInfo::from_view(view));
        let kind = Self::parse_kind(&subtype, view, &rect, options)?;

        Ok(Self {
            object_ref,
            rect,
            contents: view.text("Contents"),
            page: view.reference("P"),
            name: view.text("NM"),
            modified: view.date("M"),
            flags: view.flags("F"),
            appearance,
            appearance_state: view.name("AS"),
            border: LegacyBorder::from_view(view),
            color: color_entry(view, "C"),
            struct_parent: view.integer("StructParent"),
            optional_content: view.reference("OC"),
            markup,
            kind,
            subtype,
            dict: dict.clone(),
        })
    }

    fn parse_kind<R: ObjectResolver + ?Sized>(
        subtype: &AnnotationSubtype,
        view: DictView<'_, R>,
        rect: &Rect,
        options: &ModelOptions,
    ) -> Result<AnnotationKind> {
        let border_style = || {
            view.dict_entry("BS")
                .map(|bs| BorderStyle::from_view(DictView::new(&bs, view.resolver())))
        };
        let border_effect = || {
            view.dict_entry("BE")
                .map(|be| BorderEffect::from_view(DictView::new(&be, view.resolver())))
        };
        let rect_differences = || {
            view.number_array("RD")
                .and_then(|rd| parse_rect_differences(&rd, rect))
        };
        let quads = || {
            view.number_array("QuadPoints")
                .map(|q| quad_points::parse(&q))
                .unwrap_or_default()
        };

        let kind = match subtype {
            AnnotationSubtype::Text => AnnotationKind::Text {
                open: view.bool("Open").unwrap_or(false),
                icon: view
                    .name("Name")
                    .map(|n| TextAnnotationIcon::from_pdf_name(&n))
                    .unwrap_or_default(),
                state: view.text("State"),
                state_model: view.text("StateModel"),
            },
            AnnotationSubtype::Link => AnnotationKind::Link {
                action: optional_action(view, "A", options)?,
                destination: match view.raw("Dest").filter(|o| !o.is_null()) {
                    Some(dest) => match Destination::parse(view.resolver(), dest) {
                        Ok(d) => Some(d),
                        Err(e) => {
                            options.tolerate(e, "link /Dest")?;
                            None
                        },
                    },
                    None => None,
                },
                highlight: view
                    .name("H")
                    .map(|h| HighlightMode::from_pdf_name(&h))
                    .unwrap_or_default(),
                quad_points: quads(),
                uri_action: optional_action(view, "PA", options)?,
                border_style: border_style(),
            },
            AnnotationSubtype::FreeText => AnnotationKind::FreeText {
                default_appearance: view.text("DA").map(|da| DefaultAppearance::parse(&da)),
                quadding: TextAlignment::from_pdf_int(view.integer("Q").unwrap_or(0)),
                default_style: view.text("DS"),
                callout: view.number_array("CL").map(|cl| points(&cl)).unwrap_or_default(),
                border_effect: border_effect(),
                rect_differences: rect_differences(),
                border_style: border_style(),
                line_ending: view
                    .name("LE")
                    .map(|le| LineEndingStyle::from_pdf_name(&le))
                    .unwrap_or_default(),
            },
            AnnotationSubtype::Line => {
                let endpoints = match view.number_array("L").as_deref() {
                    Some(&[x1, y1, x2, y2]) => [x1, y1, x2, y2],
                    _ => {
                        options.tolerate(Error::missing("Line", "L"), "line annotation")?;
                        [0.0; 4]
                    },
                };
                let caption_offset = match view.number_array("CO").as_deref() {
                    Some(&[h, v]) => [h, v],
                    _ => [0.0, 0.0],
                };
                AnnotationKind::Line {
                    endpoints,
                    border_style: border_style(),
                    line_endings: LineEndingStyle::parse_pair(&view.name_array("LE")),
                    interior_color: color_entry(view, "IC"),
                    leader_length: view.number("LL").unwrap_or(0.0),
                    leader_extension: view.number("LLE").unwrap_or(0.0).max(0.0),
                    caption: view.bool("Cap").unwrap_or(false),
                    leader_offset: view.number("LLO").unwrap_or(0.0).max(0.0),
                    caption_position: view
                        .name("CP")
                        .map(|cp| CaptionPosition::from_pdf_name(&cp))
                        .unwrap_or_default(),
                    caption_offset,
                }
            },
            AnnotationSubtype::Square | AnnotationSubtype::Circle => {
                let shape = ShapeInfo {
                    border_style: border_style(),
                    interior_color: color_entry(view, "IC"),
                    border_effect: border_effect(),
                    rect_differences: rect_differences(),
                };
                if *subtype == AnnotationSubtype::Square {
                    AnnotationKind::Square(shape)
                } else {
                    AnnotationKind::Circle(shape)
                }
            },
            AnnotationSubtype::Polygon | AnnotationSubtype::PolyLine => {
                let poly = PolyInfo {
                    vertices: view.number_array("Vertices").map(|v| points(&v)).unwrap_or_default(),
                    line_endings: LineEndingStyle::parse_pair(&view.name_array("LE")),
                    border_style: border_style(),
                    interior_color: color_entry(view, "IC"),
                    border_effect: border_effect(),
                };
                if *subtype == AnnotationSubtype::Polygon {
                    AnnotationKind::Polygon(poly)
                } else {
                    AnnotationKind::PolyLine(poly)
                }
            },
            AnnotationSubtype::Highlight
            | AnnotationSubtype::Underline
            | AnnotationSubtype::Squiggly
            | AnnotationSubtype::StrikeOut => {
                let quad_points = quads();
                if quad_points.is_empty() {
                    options.tolerate(
                        Error::missing(subtype.pdf_name(), "QuadPoints"),
                        "text markup annotation",
                    )?;
                }
                match TextMarkupType::from_subtype(subtype) {
                    Some(markup_type) => AnnotationKind::TextMarkup {
                        markup_type,
                        quad_points,
                    },
                    None => AnnotationKind::Other,
                }
            },
            AnnotationSubtype::Caret => AnnotationKind::Caret {
                rect_differences: rect_differences(),
                symbol: view
                    .name("Sy")
                    .map(|s| CaretSymbol::from_pdf_name(&s))
                    .unwrap_or_default(),
            },
            AnnotationSubtype::Stamp => AnnotationKind::Stamp {
                name: view
                    .name("Name")
                    .map(|n| StampType::from_pdf_name(&n))
                    .unwrap_or_default(),
            },
            AnnotationSubtype::Ink => {
                let ink_list = view
                    .array("InkList")
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|path| view.resolve_item(path))
                    .filter_map(|path| {
                        let nums: Option<Vec<f64>> = path
                            .as_array()?
                            .iter()
                            .map(|n| view.resolve_item(n)?.as_number())
                            .collect();
                        nums.map(|n| points(&n))
                    })
                    .collect();
                AnnotationKind::Ink {
                    ink_list,
                    border_style: border_style(),
                }
            },
            AnnotationSubtype::Popup => AnnotationKind::Popup {
                parent: view.reference("Parent"),
                open: view.bool("Open").unwrap_or(false),
            },
            AnnotationSubtype::FileAttachment => AnnotationKind::FileAttachment {
                file_spec: file_spec_name(&view, "FS"),
                icon: view
                    .name("Name")
                    .map(|n| FileAttachmentIcon::from_pdf_name(&n))
                    .unwrap_or_default(),
            },
            AnnotationSubtype::Widget => AnnotationKind::Widget(WidgetInfo::from_view(view, options)?),
            _ => AnnotationKind::Other,
        };
        Ok(kind)
    }

    /// Check whether this is a widget annotation.
    pub fn is_widget(&self) -> bool {
        matches!(self.kind, AnnotationKind::Widget(_))
    }

    /// Widget entries, for widget annotations.
    pub fn widget(&self) -> Option<&WidgetInfo> {
        match &self.kind {
            AnnotationKind::Widget(info) => Some(info),
            _ => None,
        }
    }

    /// Border style dictionary, for subtypes that have one.
    pub fn border_style(&self) -> Option<&BorderStyle> {
        match &self.kind {
            AnnotationKind::Link { border_style, .. }
            | AnnotationKind::FreeText { border_style, .. }
            | AnnotationKind::Line { border_style, .. }
            | AnnotationKind::Ink { border_style, .. } => border_style.as_ref(),
            AnnotationKind::Square(shape) | AnnotationKind::Circle(shape) => shape.border_style.as_ref(),
            AnnotationKind::Polygon(poly) | AnnotationKind::PolyLine(poly) => poly.border_style.as_ref(),
            AnnotationKind::Widget(info) => info.border_style.as_ref(),
            _ => None,
        }
    }

    /// Width of the drawn border.
    pub fn border_width(&self) -> f64 {
        effective_border_width(self.border_style(), self.border.as_ref())
    }

    /// Appearance stream to draw for `mode`, using the current `AS` state.
    pub fn appearance_stream(&self, mode: AppearanceMode) -> Option<&AppearanceStream> {
        self.appearance
            .as_ref()?
            .select(mode, self.appearance_state.as_deref())
    }

    /// Popup associated with this annotation.
    pub fn popup(&self) -> Option<ObjectRef> {
        self.markup.as_ref().and_then(|m| m.popup)
    }

    /// Parent of a popup annotation.
    pub fn popup_parent(&self) -> Option<ObjectRef> {
        match self.kind {
            AnnotationKind::Popup { parent, .. } => parent,
            _ => None,
        }
    }
}

fn color_entry<R: ObjectResolver + ?Sized>(view: DictView<'_, R>, key: &str) -> Option<AnnotationColor> {
    view.number_array(key)
        .and_then(|values| AnnotationColor::from_components(&values))
}

fn optional_action<R: ObjectResolver + ?Sized>(
    view: DictView<'_, R>,
    key: &str,
    options: &ModelOptions,
) -> Result<Option<Action>> {
    let raw = match view.raw(key).filter(|o| !o.is_null()) {
        Some(raw) => raw,
        None => return Ok(None),
    };
    match Action::parse(view.resolver(), raw, options) {
        Ok(action) => Ok(Some(action)),
        Err(e) => {
            options.tolerate(e, &format!("annotation /{} action", key))?;
            Ok(None)
        },
    }
}

/// Pair up a flat coordinate list. A trailing odd value is dropped.
fn points(values: &[f64]) -> Vec<Point> {
    values
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect()
}

/// Load the annotations of a page.
///
/// `Annots` may be a direct or indirect array. Malformed annotations fail
/// in strict mode and are skipped otherwise. Popups and their markup
/// parents are linked in both directions when only one side names the
/// other.
pub fn page_annotations<R: ObjectResolver + ?Sized>(
    resolver: &R,
    page: &Dictionary,
    options: &ModelOptions,
) -> Result<Vec<Annotation>> {
    let resolver = &ChainLimited::new(resolver, options.max_reference_chain);
    let annots = match resolve_entry(resolver, page, "Annots")? {
        Some(Object::Array(arr)) => arr,
        Some(other) => {
            options.tolerate(Error::invalid_type("Array", &other), "page /Annots")?;
            return Ok(Vec::new());
        },
        None => return Ok(Vec::new()),
    };
    log::debug!("Loading {} annotations", annots.len());

    let mut result = Vec::with_capacity(annots.len());
    for item in &annots {
        if item.is_null() {
            continue;
        }
        match Annotation::parse(resolver, item, options) {
            Ok(annotation) => result.push(annotation),
            Err(e) => options.tolerate(e, "annotation")?,
        }
    }

    link_popups(&mut result);
    Ok(result)
}

fn link_popups(annotations: &mut [Annotation]) {
    let pairs: Vec<(ObjectRef, ObjectRef)> = annotations
        .iter()
        .filter_map(|a| Some((a.object_ref?, a.popup()?)))
        .chain(
            annotations
                .iter()
                .filter_map(|a| Some((a.popup_parent()?, a.object_ref?))),
        )
        .collect();

    for (parent_ref, popup_ref) in pairs {
        for annotation in annotations.iter_mut() {
            if annotation.object_ref == Some(popup_ref) {
                if let AnnotationKind::Popup { parent, .. } = &mut annotation.kind {
                    parent.get_or_insert(parent_ref);
                }
            } else if annotation.object_ref == Some(parent_ref) {
                if let Some(markup) = annotation.markup.as_mut() {
                    markup.popup.get_or_insert(popup_ref);
                }
            }
        }
    }
}
