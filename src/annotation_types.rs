//! Core annotation types and enums per PDF spec ISO 32000-1:2008, Section 12.5.
//!
//! Names that are not part of the standard are preserved rather than mapped
//! to a default, so a viewer can still report them.

use crate::geometry::Rect;
use crate::object::Object;
use bitflags::bitflags;

/// Annotation subtype per PDF spec Table 169.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationSubtype {
    /// Text annotation (sticky note) - Section 12.5.6.4
    Text,
    /// Link annotation - Section 12.5.6.5
    Link,
    /// Free text annotation - Section 12.5.6.6
    FreeText,
    /// Line annotation - Section 12.5.6.7
    Line,
    /// Square annotation - Section 12.5.6.8
    Square,
    /// Circle annotation - Section 12.5.6.8
    Circle,
    /// Polygon annotation - Section 12.5.6.9
    Polygon,
    /// Polyline annotation - Section 12.5.6.9
    PolyLine,
    /// Highlight annotation - Section 12.5.6.10
    Highlight,
    /// Underline annotation - Section 12.5.6.10
    Underline,
    /// Squiggly underline annotation - Section 12.5.6.10
    Squiggly,
    /// Strikeout annotation - Section 12.5.6.10
    StrikeOut,
    /// Rubber stamp annotation - Section 12.5.6.12
    Stamp,
    /// Caret annotation - Section 12.5.6.11
    Caret,
    /// Ink annotation - Section 12.5.6.13
    Ink,
    /// Popup annotation - Section 12.5.6.14
    Popup,
    /// File attachment annotation - Section 12.5.6.15
    FileAttachment,
    /// Sound annotation - Section 12.5.6.16
    Sound,
    /// Movie annotation - Section 12.5.6.17
    Movie,
    /// Widget annotation (form field) - Section 12.5.6.19
    Widget,
    /// Screen annotation - Section 12.5.6.18
    Screen,
    /// Printer's mark annotation - Section 12.5.6.20
    PrinterMark,
    /// Trap network annotation - Section 12.5.6.21
    TrapNet,
    /// Watermark annotation - Section 12.5.6.22
    Watermark,
    /// 3D annotation - Section 12.5.6.24
    ThreeD,
    /// Redaction annotation - Section 12.5.6.23
    Redact,
    /// RichMedia annotation - Adobe Extension Level 3
    RichMedia,
    /// Non-standard subtype, name preserved
    Unknown(String),
}

impl AnnotationSubtype {
    /// Get the PDF name for this annotation subtype.
    pub fn pdf_name(&self) -> &str {
        match self {
            Self::Text => "Text",
            Self::Link => "Link",
            Self::FreeText => "FreeText",
            Self::Line => "Line",
            Self::Square => "Square",
            Self::Circle => "Circle",
            Self::Polygon => "Polygon",
            Self::PolyLine => "PolyLine",
            Self::Highlight => "Highlight",
            Self::Underline => "Underline",
            Self::Squiggly => "Squiggly",
            Self::StrikeOut => "StrikeOut",
            Self::Stamp => "Stamp",
            Self::Caret => "Caret",
            Self::Ink => "Ink",
            Self::Popup => "Popup",
            Self::FileAttachment => "FileAttachment",
            Self::Sound => "Sound",
            Self::Movie => "Movie",
            Self::Widget => "Widget",
            Self::Screen => "Screen",
            Self::PrinterMark => "PrinterMark",
            Self::TrapNet => "TrapNet",
            Self::Watermark => "Watermark",
            Self::ThreeD => "3D",
            Self::Redact => "Redact",
            Self::RichMedia => "RichMedia",
            Self::Unknown(name) => name,
        }
    }

    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "Text" => Self::Text,
            "Link" => Self::Link,
            "FreeText" => Self::FreeText,
            "Line" => Self::Line,
            "Square" => Self::Square,
            "Circle" => Self::Circle,
            "Polygon" => Self::Polygon,
            "PolyLine" => Self::PolyLine,
            "Highlight" => Self::Highlight,
            "Underline" => Self::Underline,
            "Squiggly" => Self::Squiggly,
            "StrikeOut" => Self::StrikeOut,
            "Stamp" => Self::Stamp,
            "Caret" => Self::Caret,
            "Ink" => Self::Ink,
            "Popup" => Self::Popup,
            "FileAttachment" => Self::FileAttachment,
            "Sound" => Self::Sound,
            "Movie" => Self::Movie,
            "Widget" => Self::Widget,
            "Screen" => Self::Screen,
            "PrinterMark" => Self::PrinterMark,
            "TrapNet" => Self::TrapNet,
            "Watermark" => Self::Watermark,
            "3D" => Self::ThreeD,
            "Redact" => Self::Redact,
            "RichMedia" => Self::RichMedia,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Check if this is a markup annotation (Section 12.5.6.2).
    pub fn is_markup(&self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::FreeText
                | Self::Line
                | Self::Square
                | Self::Circle
                | Self::Polygon
                | Self::PolyLine
                | Self::Highlight
                | Self::Underline
                | Self::Squiggly
                | Self::StrikeOut
                | Self::Stamp
                | Self::Caret
                | Self::Ink
                | Self::FileAttachment
                | Self::Sound
                | Self::Redact
        )
    }

    /// Check if this is a text markup annotation.
    pub fn is_text_markup(&self) -> bool {
        matches!(self, Self::Highlight | Self::Underline | Self::Squiggly | Self::StrikeOut)
    }
}

bitflags! {
    /// Annotation flags (`F` entry) per PDF spec Table 165.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AnnotationFlags: u32 {
        /// Bit 1: Do not display a non-standard annotation without a handler
        const INVISIBLE = 1 << 0;
        /// Bit 2: Do not display or print
        const HIDDEN = 1 << 1;
        /// Bit 3: Print the annotation
        const PRINT = 1 << 2;
        /// Bit 4: Do not scale with page zoom
        const NO_ZOOM = 1 << 3;
        /// Bit 5: Do not rotate with the page
        const NO_ROTATE = 1 << 4;
        /// Bit 6: Do not display on screen
        const NO_VIEW = 1 << 5;
        /// Bit 7: Do not allow interaction
        const READ_ONLY = 1 << 6;
        /// Bit 8: Do not allow deletion or property changes
        const LOCKED = 1 << 7;
        /// Bit 9: Invert NoView on hover or selection
        const TOGGLE_NO_VIEW = 1 << 8;
        /// Bit 10: Do not allow content changes
        const LOCKED_CONTENTS = 1 << 9;
    }
}

impl AnnotationFlags {
    /// Whether the annotation is shown on screen.
    pub fn is_visible_on_screen(&self) -> bool {
        !self.intersects(Self::HIDDEN | Self::NO_VIEW)
    }

    /// Whether the annotation is printed.
    pub fn is_printable(&self) -> bool {
        self.contains(Self::PRINT) && !self.contains(Self::HIDDEN)
    }
}

/// Border style type per PDF spec Table 166.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyleType {
    /// Solid border (S)
    #[default]
    Solid,
    /// Dashed border (D)
    Dashed,
    /// Beveled border (B)
    Beveled,
    /// Inset border (I)
    Inset,
    /// Underline border (U)
    Underline,
}

impl BorderStyleType {
    /// Get PDF name for this border style.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Solid => "S",
            Self::Dashed => "D",
            Self::Beveled => "B",
            Self::Inset => "I",
            Self::Underline => "U",
        }
    }

    /// Parse from PDF name. Unknown styles are treated as solid.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "D" => Self::Dashed,
            "B" => Self::Beveled,
            "I" => Self::Inset,
            "U" => Self::Underline,
            _ => Self::Solid,
        }
    }
}

/// Border effect style per PDF spec Table 167.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderEffectStyle {
    /// No effect (S)
    #[default]
    None,
    /// Cloudy border (C)
    Cloudy,
}

impl BorderEffectStyle {
    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "C" => Self::Cloudy,
            _ => Self::None,
        }
    }
}

/// Line ending style per PDF spec Table 176.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEndingStyle {
    /// No line ending
    #[default]
    None,
    /// Square filled with interior color
    Square,
    /// Circle filled with interior color
    Circle,
    /// Diamond filled with interior color
    Diamond,
    /// Open arrow (two lines forming acute angle)
    OpenArrow,
    /// Closed arrow (filled triangle)
    ClosedArrow,
    /// Butt (perpendicular line at endpoint)
    Butt,
    /// Reverse open arrow
    ROpenArrow,
    /// Reverse closed arrow
    RClosedArrow,
    /// Slash (30 degrees from perpendicular)
    Slash,
}

impl LineEndingStyle {
    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "Square" => Self::Square,
            "Circle" => Self::Circle,
            "Diamond" => Self::Diamond,
            "OpenArrow" => Self::OpenArrow,
            "ClosedArrow" => Self::ClosedArrow,
            "Butt" => Self::Butt,
            "ROpenArrow" => Self::ROpenArrow,
            "RClosedArrow" => Self::RClosedArrow,
            "Slash" => Self::Slash,
            _ => Self::None,
        }
    }

    /// Parse an `LE` array of two names. Missing entries default to `None`.
    pub fn parse_pair(names: &[String]) -> [LineEndingStyle; 2] {
        let at = |i: usize| {
            names
                .get(i)
                .map(|n| Self::from_pdf_name(n))
                .unwrap_or_default()
        };
        [at(0), at(1)]
    }
}

/// Annotation color (`C`, `IC`, `MK/BG`, `MK/BC`).
///
/// The number of components selects the color space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AnnotationColor {
    /// Empty array: transparent
    #[default]
    Transparent,
    /// DeviceGray
    Gray(f64),
    /// DeviceRGB
    Rgb(f64, f64, f64),
    /// DeviceCMYK
    Cmyk(f64, f64, f64, f64),
}

impl AnnotationColor {
    /// Parse from component values. Other lengths are invalid.
    pub fn from_components(values: &[f64]) -> Option<Self> {
        match *values {
            [] => Some(Self::Transparent),
            [g] => Some(Self::Gray(g)),
            [r, g, b] => Some(Self::Rgb(r, g, b)),
            [c, m, y, k] => Some(Self::Cmyk(c, m, y, k)),
            _ => {
                log::debug!("Color array with {} components", values.len());
                None
            },
        }
    }

    /// Component values.
    pub fn components(&self) -> Vec<f64> {
        match *self {
            Self::Transparent => vec![],
            Self::Gray(g) => vec![g],
            Self::Rgb(r, g, b) => vec![r, g, b],
            Self::Cmyk(c, m, y, k) => vec![c, m, y, k],
        }
    }

    /// Check for the transparent color.
    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }

    /// Content stream operator setting this as the fill color.
    ///
    /// Returns an empty string for transparent.
    pub fn fill_operator(&self) -> String {
        self.operator(false)
    }

    /// Content stream operator setting this as the stroke color.
    pub fn stroke_operator(&self) -> String {
        self.operator(true)
    }

    fn operator(&self, stroke: bool) -> String {
        let fmt = crate::appearance::format_number;
        match *self {
            Self::Transparent => String::new(),
            Self::Gray(g) => format!("{} {}", fmt(g), if stroke { "G" } else { "g" }),
            Self::Rgb(r, g, b) => format!(
                "{} {} {} {}",
                fmt(r),
                fmt(g),
                fmt(b),
                if stroke { "RG" } else { "rg" }
            ),
            Self::Cmyk(c, m, y, k) => format!(
                "{} {} {} {} {}",
                fmt(c),
                fmt(m),
                fmt(y),
                fmt(k),
                if stroke { "K" } else { "k" }
            ),
        }
    }

    /// Convert to a PDF array object.
    pub fn to_object(&self) -> Object {
        Object::number_array(&self.components())
    }
}

/// Text annotation icon per PDF spec Section 12.5.6.4.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextAnnotationIcon {
    /// Comment icon
    Comment,
    /// Key icon
    Key,
    /// Note icon (default)
    #[default]
    Note,
    /// Help icon
    Help,
    /// New paragraph icon
    NewParagraph,
    /// Paragraph icon
    Paragraph,
    /// Insert icon
    Insert,
    /// Viewer-specific icon name
    Other(String),
}

impl TextAnnotationIcon {
    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "Comment" => Self::Comment,
            "Key" => Self::Key,
            "Note" => Self::Note,
            "Help" => Self::Help,
            "NewParagraph" => Self::NewParagraph,
            "Paragraph" => Self::Paragraph,
            "Insert" => Self::Insert,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Text markup annotation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMarkupType {
    /// Highlight annotation
    Highlight,
    /// Underline annotation
    Underline,
    /// Squiggly underline annotation
    Squiggly,
    /// Strikeout annotation
    StrikeOut,
}

impl TextMarkupType {
    /// Markup type for a subtype, if it is one.
    pub fn from_subtype(subtype: &AnnotationSubtype) -> Option<Self> {
        match subtype {
            AnnotationSubtype::Highlight => Some(Self::Highlight),
            AnnotationSubtype::Underline => Some(Self::Underline),
            AnnotationSubtype::Squiggly => Some(Self::Squiggly),
            AnnotationSubtype::StrikeOut => Some(Self::StrikeOut),
            _ => None,
        }
    }
}

/// Standard stamp types per PDF spec Section 12.5.6.12.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StampType {
    /// Approved stamp
    Approved,
    /// Experimental stamp
    Experimental,
    /// Not approved stamp
    NotApproved,
    /// As-is stamp
    AsIs,
    /// Expired stamp
    Expired,
    /// Not for public release stamp
    NotForPublicRelease,
    /// Confidential stamp
    Confidential,
    /// Final stamp
    Final,
    /// Sold stamp
    Sold,
    /// Departmental stamp
    Departmental,
    /// For comment stamp
    ForComment,
    /// Top secret stamp
    TopSecret,
    /// Draft stamp
    #[default]
    Draft,
    /// For public release stamp
    ForPublicRelease,
    /// Custom stamp name
    Custom(String),
}

impl StampType {
    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "Approved" => Self::Approved,
            "Experimental" => Self::Experimental,
            "NotApproved" => Self::NotApproved,
            "AsIs" => Self::AsIs,
            "Expired" => Self::Expired,
            "NotForPublicRelease" => Self::NotForPublicRelease,
            "Confidential" => Self::Confidential,
            "Final" => Self::Final,
            "Sold" => Self::Sold,
            "Departmental" => Self::Departmental,
            "ForComment" => Self::ForComment,
            "TopSecret" => Self::TopSecret,
            "Draft" => Self::Draft,
            "ForPublicRelease" => Self::ForPublicRelease,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// Annotation intent (`IT`) for free text, line and polygon annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationIntent {
    /// Plain free text
    FreeText,
    /// Free text callout
    FreeTextCallout,
    /// Typewriter-style free text
    FreeTextTypeWriter,
    /// Line with arrow head
    LineArrow,
    /// Dimension line
    LineDimension,
    /// Polygon cloud
    PolygonCloud,
    /// Polyline dimension
    PolyLineDimension,
    /// Polygon dimension
    PolygonDimension,
    /// Other intent name
    Other(String),
}

impl AnnotationIntent {
    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "FreeText" => Self::FreeText,
            "FreeTextCallout" => Self::FreeTextCallout,
            "FreeTextTypeWriter" | "FreeTextTypewriter" => Self::FreeTextTypeWriter,
            "LineArrow" => Self::LineArrow,
            "LineDimension" => Self::LineDimension,
            "PolygonCloud" => Self::PolygonCloud,
            "PolyLineDimension" => Self::PolyLineDimension,
            "PolygonDimension" => Self::PolygonDimension,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Text alignment (quadding, `Q`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    /// Left-justified (0)
    #[default]
    Left,
    /// Centered (1)
    Center,
    /// Right-justified (2)
    Right,
}

impl TextAlignment {
    /// Get PDF integer value.
    pub fn to_pdf_int(&self) -> i64 {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
        }
    }

    /// Parse from PDF integer. Out-of-range values read as left.
    pub fn from_pdf_int(value: i64) -> Self {
        match value {
            1 => Self::Center,
            2 => Self::Right,
            _ => Self::Left,
        }
    }
}

/// Caret annotation symbol per PDF spec Section 12.5.6.11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaretSymbol {
    /// No symbol
    #[default]
    None,
    /// Paragraph symbol (pilcrow)
    Paragraph,
}

impl CaretSymbol {
    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "P" => Self::Paragraph,
            _ => Self::None,
        }
    }
}

/// File attachment annotation icon per PDF spec Section 12.5.6.15.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FileAttachmentIcon {
    /// Graph icon
    Graph,
    /// Push pin icon (default)
    #[default]
    PushPin,
    /// Paperclip icon
    Paperclip,
    /// Tag icon
    Tag,
    /// Other icon name
    Other(String),
}

impl FileAttachmentIcon {
    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "Graph" | "GraphPushPin" => Self::Graph,
            "PushPin" => Self::PushPin,
            "Paperclip" | "PaperclipTag" => Self::Paperclip,
            "Tag" => Self::Tag,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Reply type for annotation replies per PDF spec Table 170.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyType {
    /// Reply annotation
    #[default]
    Reply,
    /// Group annotation
    Group,
}

impl ReplyType {
    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "Group" => Self::Group,
            _ => Self::Reply,
        }
    }
}

/// Highlight mode for link and widget annotations per PDF spec Table 173.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightMode {
    /// No highlighting (N)
    None,
    /// Invert the contents (I) - default
    #[default]
    Invert,
    /// Invert the border (O)
    Outline,
    /// Push effect (P)
    Push,
    /// Toggle (T), widgets only; same as Push
    Toggle,
}

impl HighlightMode {
    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "N" => Self::None,
            "O" => Self::Outline,
            "P" => Self::Push,
            "T" => Self::Toggle,
            _ => Self::Invert,
        }
    }
}

/// Caption positioning for line annotations (`CP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptionPosition {
    /// Centered inside the line (Inline)
    #[default]
    Inline,
    /// On top of the line (Top)
    Top,
}

impl CaptionPosition {
    /// Parse from PDF name.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "Top" => Self::Top,
            _ => Self::Inline,
        }
    }
}

/// A quad point specification (8 numbers defining a quadrilateral).
///
/// Points are `[x1 y1 x2 y2 x3 y3 x4 y4]`; in practice producers disagree
/// about the vertex order, so only the bounding box is reliable.
pub type QuadPoint = [f64; 8];

/// Helper functions for quad points.
pub mod quad_points {
    use super::QuadPoint;
    use crate::geometry::Rect;

    /// Get the bounding rectangle of a quad point.
    pub fn bounding_rect(quad: &QuadPoint) -> Rect {
        let xs = [quad[0], quad[2], quad[4], quad[6]];
        let ys = [quad[1], quad[3], quad[5], quad[7]];
        Rect {
            llx: xs.iter().copied().fold(f64::INFINITY, f64::min),
            lly: ys.iter().copied().fold(f64::INFINITY, f64::min),
            urx: xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ury: ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Group a flat array of numbers into quads.
    ///
    /// Trailing numbers that do not fill a full quad are dropped.
    pub fn parse(arr: &[f64]) -> Vec<QuadPoint> {
        if arr.len() % 8 != 0 {
            log::warn!("QuadPoints length {} is not a multiple of 8", arr.len());
        }
        arr.chunks_exact(8)
            .map(|chunk| {
                [
                    chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
                ]
            })
            .collect()
    }

    /// Bounding rectangle of all quads.
    pub fn union_rect(quads: &[QuadPoint]) -> Option<Rect> {
        quads
            .iter()
            .map(bounding_rect)
            .reduce(|a, b| a.union(&b))
    }
}

/// Rectangle differences (`RD`): left, bottom, right, top insets.
pub fn parse_rect_differences(values: &[f64], rect: &Rect) -> Option<[f64; 4]> {
    let diff: [f64; 4] = values.try_into().ok()?;
    if diff.iter().any(|d| *d < 0.0)
        || diff[0] + diff[2] > rect.width()
        || diff[1] + diff[3] > rect.height()
    {
        log::debug!("RD {:?} does not fit inside the annotation rectangle", diff);
        return None;
    }
    Some(diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_subtype_names() {
        for name in ["Text", "Link", "Highlight", "StrikeOut", "Stamp", "Ink", "Widget", "3D"] {
            assert_eq!(AnnotationSubtype::from_pdf_name(name).pdf_name(), name);
        }
    }

    #[test]
    fn test_unknown_subtype_preserved() {
        let subtype = AnnotationSubtype::from_pdf_name("Projection");
        assert_eq!(subtype, AnnotationSubtype::Unknown("Projection".into()));
        assert_eq!(subtype.pdf_name(), "Projection");
        assert!(!subtype.is_markup());
    }

    #[test]
    fn test_annotation_flags() {
        let flags = AnnotationFlags::from_bits_retain(4);
        assert!(flags.is_printable());
        assert!(flags.is_visible_on_screen());

        let hidden = AnnotationFlags::PRINT | AnnotationFlags::HIDDEN;
        assert!(!hidden.is_printable());
        assert!(!hidden.is_visible_on_screen());

        let no_view = AnnotationFlags::NO_VIEW | AnnotationFlags::PRINT;
        assert!(no_view.is_printable());
        assert!(!no_view.is_visible_on_screen());
    }

    #[test]
    fn test_annotation_color() {
        assert_eq!(AnnotationColor::from_components(&[]), Some(AnnotationColor::Transparent));
        assert_eq!(AnnotationColor::from_components(&[0.5]), Some(AnnotationColor::Gray(0.5)));
        assert_eq!(
            AnnotationColor::from_components(&[1.0, 1.0, 0.0]),
            Some(AnnotationColor::Rgb(1.0, 1.0, 0.0))
        );
        assert_eq!(AnnotationColor::from_components(&[1.0, 0.0]), None);
    }

    #[test]
    fn test_color_operators() {
        assert_eq!(AnnotationColor::Gray(0.0).fill_operator(), "0 g");
        assert_eq!(AnnotationColor::Rgb(1.0, 0.5, 0.0).stroke_operator(), "1 0.5 0 RG");
        assert_eq!(AnnotationColor::Cmyk(0.0, 0.0, 0.0, 1.0).fill_operator(), "0 0 0 1 k");
        assert_eq!(AnnotationColor::Transparent.fill_operator(), "");
    }

    #[test]
    fn test_quad_points() {
        let quads = quad_points::parse(&[
            100.0, 220.0, 150.0, 220.0, 100.0, 200.0, 150.0, 200.0, 1.0, 2.0,
        ]);
        assert_eq!(quads.len(), 1);

        let bounding = quad_points::bounding_rect(&quads[0]);
        assert_eq!(bounding.to_array(), [100.0, 200.0, 150.0, 220.0]);
        assert_eq!(quad_points::union_rect(&quads), Some(bounding));
        assert_eq!(quad_points::union_rect(&[]), None);
    }

    #[test]
    fn test_stamp_types() {
        assert_eq!(StampType::from_pdf_name("Approved"), StampType::Approved);
        assert_eq!(
            StampType::from_pdf_name("CustomName"),
            StampType::Custom("CustomName".to_string())
        );
    }

    #[test]
    fn test_line_ending_pair() {
        let pair = LineEndingStyle::parse_pair(&["OpenArrow".to_string()]);
        assert_eq!(pair, [LineEndingStyle::OpenArrow, LineEndingStyle::None]);
    }

    #[test]
    fn test_rect_differences_must_fit() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(parse_rect_differences(&[1.0, 1.0, 1.0, 1.0], &rect), Some([1.0; 4]));
        assert_eq!(parse_rect_differences(&[6.0, 0.0, 6.0, 0.0], &rect), None);
        assert_eq!(parse_rect_differences(&[1.0, 1.0], &rect), None);
    }

    #[test]
    fn test_is_text_markup() {
        assert!(AnnotationSubtype::Highlight.is_text_markup());
        assert!(AnnotationSubtype::Squiggly.is_text_markup());
        assert!(!AnnotationSubtype::Ink.is_text_markup());
        assert_eq!(
            TextMarkupType::from_subtype(&AnnotationSubtype::StrikeOut),
            Some(TextMarkupType::StrikeOut)
        );
    }
}
