//! Appearance stream generation for widget annotations.
//!
//! Builds uncompressed form XObjects for text fields, choice fields, check
//! boxes, radio buttons and push buttons from the field value, the widget's
//! `MK` colors and border, and the `DA` string. Layout follows Section
//! 12.7.3.3 (variable text): content is wrapped in `/Tx BMC ... EMC` and
//! clipped to the area inside the border.
//!
//! Glyph metrics come from a [`TextMeasure`]; the default
//! [`AverageWidthMeasure`] assumes a fixed average character width.

use crate::annotation_types::{AnnotationColor, BorderStyleType, TextAlignment};
use crate::appearance::{format_number, DefaultAppearance};
use crate::geometry::{Matrix, Rect};
use crate::object::{Dictionary, Object};

/// Padding between the border and variable text.
const TEXT_PADDING: f64 = 2.0;

/// Upper bound for auto-sized text.
const MAX_AUTO_FONT_SIZE: f64 = 12.0;

/// Lower bound for auto-sized text.
const MIN_AUTO_FONT_SIZE: f64 = 4.0;

/// Line height relative to font size.
const LEADING: f64 = 1.15;

/// Selection highlight used for list boxes.
const SELECTION_COLOR: AnnotationColor = AnnotationColor::Rgb(0.6, 0.757, 0.855);

/// Text width provider.
pub trait TextMeasure {
    /// Width of `text` set in `font` (resource name) at `font_size`.
    fn text_width(&self, font: Option<&str>, text: &str, font_size: f64) -> f64;
}

/// Measures every character with one average width, in em units.
///
/// Courier (`Cour`) is measured with its fixed 0.6 em advance.
#[derive(Debug, Clone, Copy)]
pub struct AverageWidthMeasure {
    /// Average advance width in em
    pub average_width: f64,
}

impl Default for AverageWidthMeasure {
    fn default() -> Self {
        Self { average_width: 0.5 }
    }
}

impl TextMeasure for AverageWidthMeasure {
    fn text_width(&self, font: Option<&str>, text: &str, font_size: f64) -> f64 {
        let em = match font {
            Some(name) if name.starts_with("Cour") => 0.6,
            _ => self.average_width,
        };
        text.chars().count() as f64 * em * font_size
    }
}

/// Visual style of a widget, gathered from the widget and its field.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetStyle {
    /// Annotation rectangle
    pub rect: Rect,
    /// `MK/R` rotation (0, 90, 180, 270)
    pub rotation: i32,
    /// Border width
    pub border_width: f64,
    /// Border style
    pub border_style: BorderStyleType,
    /// Dash pattern for dashed borders
    pub dash_pattern: Vec<f64>,
    /// `MK/BC`
    pub border_color: AnnotationColor,
    /// `MK/BG`
    pub background: AnnotationColor,
    /// Parsed `DA`
    pub default_appearance: DefaultAppearance,
    /// `Q`
    pub quadding: TextAlignment,
}

impl WidgetStyle {
    /// Style with no border and no background.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            rotation: 0,
            border_width: 0.0,
            border_style: BorderStyleType::Solid,
            dash_pattern: vec![3.0],
            border_color: AnnotationColor::Transparent,
            background: AnnotationColor::Transparent,
            default_appearance: DefaultAppearance::default(),
            quadding: TextAlignment::Left,
        }
    }

    /// Form bounding box: the rectangle size, swapped for quarter turns.
    pub fn bbox(&self) -> Rect {
        let (w, h) = (self.rect.width(), self.rect.height());
        match self.rotation.rem_euclid(360) {
            90 | 270 => Rect::new(0.0, 0.0, h, w),
            _ => Rect::new(0.0, 0.0, w, h),
        }
    }

    fn has_border(&self) -> bool {
        self.border_width > 0.0 && !self.border_color.is_transparent()
    }

    /// Area inside the border.
    fn inner(&self) -> Rect {
        let width = if !self.has_border() {
            0.0
        } else if matches!(self.border_style, BorderStyleType::Beveled | BorderStyleType::Inset) {
            self.border_width * 2.0
        } else {
            self.border_width
        };
        self.bbox().inset(width)
    }
}

/// Text field layout switches.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextLayout {
    /// Wrap text over several lines
    pub multiline: bool,
    /// Replace characters with asterisks
    pub password: bool,
    /// Comb field with this many cells
    pub comb: Option<u32>,
}

/// A generated form XObject.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAppearance {
    /// Form bounding box
    pub bbox: Rect,
    /// Form matrix
    pub matrix: Matrix,
    /// Content stream
    pub content: String,
    /// Font resource used by the content, if any
    pub font_name: Option<String>,
}

impl GeneratedAppearance {
    /// Build the stream object.
    ///
    /// The font resource is taken from the form's default resources when
    /// present there; standard font aliases get a Type 1 font dictionary.
    pub fn to_object(&self, default_resources: Option<&Dictionary>) -> Object {
        let mut dict = Dictionary::new();
        dict.insert("Type".into(), Object::name("XObject"));
        dict.insert("Subtype".into(), Object::name("Form"));
        dict.insert("BBox".into(), self.bbox.to_object());
        if !self.matrix.is_identity() {
            dict.insert("Matrix".into(), Object::number_array(&self.matrix.0));
        }

        if let Some(font) = &self.font_name {
            let from_dr = default_resources
                .and_then(|dr| dr.get("Font"))
                .and_then(Object::as_dict)
                .and_then(|fonts| fonts.get(font))
                .cloned();
            let font_obj = from_dr.or_else(|| standard_font(font));
            match font_obj {
                Some(obj) => {
                    let fonts = Object::dictionary([(font.clone(), obj)]);
                    dict.insert("Resources".into(), Object::dictionary([("Font", fonts)]));
                },
                None => log::warn!("Font /{} not found in default resources", font),
            }
        }

        Object::stream(dict, self.content.clone().into_bytes())
    }
}

/// Font dictionary for the usual standard-14 resource aliases.
fn standard_font(name: &str) -> Option<Object> {
    let base = match name {
        "Helv" => "Helvetica",
        "HeBo" => "Helvetica-Bold",
        "Cour" => "Courier",
        "TiRo" => "Times-Roman",
        "ZaDb" => "ZapfDingbats",
        "Symb" => "Symbol",
        _ => return None,
    };
    let mut font = Dictionary::new();
    font.insert("Type".into(), Object::name("Font"));
    font.insert("Subtype".into(), Object::name("Type1"));
    font.insert("BaseFont".into(), Object::name(base));
    if base != "ZapfDingbats" && base != "Symbol" {
        font.insert("Encoding".into(), Object::name("WinAnsiEncoding"));
    }
    Some(Object::Dictionary(font))
}

/// Generator for widget appearance streams.
#[derive(Debug, Clone, Default)]
pub struct AppearanceGenerator<M: TextMeasure = AverageWidthMeasure> {
    measure: M,
}

impl AppearanceGenerator<AverageWidthMeasure> {
    /// Generator using [`AverageWidthMeasure`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: TextMeasure> AppearanceGenerator<M> {
    /// Generator with a custom text measure.
    pub fn with_measure(measure: M) -> Self {
        Self { measure }
    }

    fn finish(&self, style: &WidgetStyle, content: String, font_name: Option<String>) -> GeneratedAppearance {
        GeneratedAppearance {
            bbox: style.bbox(),
            matrix: Matrix::rotate_quarter_turns(style.rotation),
            content,
            font_name,
        }
    }

    fn font_name(style: &WidgetStyle) -> String {
        style
            .default_appearance
            .font_name
            .clone()
            .unwrap_or_else(|| "Helv".to_string())
    }

    /// Background and border.
    fn frame(&self, style: &WidgetStyle, out: &mut String) {
        let bbox = style.bbox();
        let (w, h) = (bbox.width(), bbox.height());

        if !style.background.is_transparent() {
            out.push_str(&format!("{}\n", style.background.fill_operator()));
            out.push_str(&format!("0 0 {} {} re f\n", format_number(w), format_number(h)));
        }

        if !style.has_border() {
            return;
        }
        let bw = style.border_width;
        let half = bw / 2.0;

        // Beveled and inset borders get light and dark inner edges
        let bevel = match style.border_style {
            BorderStyleType::Beveled => Some((
                AnnotationColor::Gray(1.0),
                shade(&style.background, 0.5),
            )),
            BorderStyleType::Inset => Some((AnnotationColor::Gray(0.5), AnnotationColor::Gray(0.75))),
            _ => None,
        };
        if let Some((top_left, bottom_right)) = bevel {
            let (b, b2) = (bw, bw * 2.0);
            out.push_str(&format!("{}\n", top_left.fill_operator()));
            out.push_str(&format!(
                "{} {} m {} {} l {} {} l {} {} l {} {} l {} {} l f\n",
                fmt(b), fmt(b), fmt(b), fmt(h - b), fmt(w - b), fmt(h - b),
                fmt(w - b2), fmt(h - b2), fmt(b2), fmt(h - b2), fmt(b2), fmt(b2)
            ));
            out.push_str(&format!("{}\n", bottom_right.fill_operator()));
            out.push_str(&format!(
                "{} {} m {} {} l {} {} l {} {} l {} {} l {} {} l f\n",
                fmt(w - b), fmt(h - b), fmt(w - b), fmt(b), fmt(b), fmt(b),
                fmt(b2), fmt(b2), fmt(w - b2), fmt(b2), fmt(w - b2), fmt(h - b2)
            ));
        }

        out.push_str(&format!("{}\n", style.border_color.stroke_operator()));
        out.push_str(&format!("{} w\n", fmt(bw)));
        match style.border_style {
            BorderStyleType::Underline => {
                out.push_str(&format!("0 {} m {} {} l S\n", fmt(half), fmt(w), fmt(half)));
            },
            BorderStyleType::Dashed => {
                let dash: Vec<String> = style.dash_pattern.iter().map(|d| fmt(*d)).collect();
                out.push_str(&format!("[{}] 0 d\n", dash.join(" ")));
                out.push_str(&format!(
                    "{} {} {} {} re S\n",
                    fmt(half),
                    fmt(half),
                    fmt(w - bw),
                    fmt(h - bw)
                ));
            },
            _ => {
                out.push_str(&format!(
                    "{} {} {} {} re S\n",
                    fmt(half),
                    fmt(half),
                    fmt(w - bw),
                    fmt(h - bw)
                ));
            },
        }
    }

    /// Open the variable-text section clipped to `clip`.
    fn begin_variable_text(out: &mut String, clip: &Rect) {
        out.push_str("/Tx BMC\nq\n");
        out.push_str(&format!(
            "{} {} {} {} re W n\n",
            fmt(clip.llx),
            fmt(clip.lly),
            fmt(clip.width()),
            fmt(clip.height())
        ));
    }

    fn end_variable_text(out: &mut String) {
        out.push_str("Q\nEMC\n");
    }

    fn auto_size_single_line(&self, font: &str, text: &str, area: &Rect) -> f64 {
        let mut size = (area.height() / LEADING).clamp(MIN_AUTO_FONT_SIZE, MAX_AUTO_FONT_SIZE);
        let width = self.measure.text_width(Some(font), text, size);
        if width > area.width() && width > 0.0 {
            size = (size * area.width() / width).max(MIN_AUTO_FONT_SIZE);
        }
        size
    }

    fn aligned_x(&self, quadding: TextAlignment, area: &Rect, text_width: f64) -> f64 {
        match quadding {
            TextAlignment::Left => area.llx,
            TextAlignment::Center => area.llx + (area.width() - text_width) / 2.0,
            TextAlignment::Right => area.urx - text_width,
        }
    }

    /// Text field appearance.
    pub fn text_field(&self, style: &WidgetStyle, value: &str, layout: TextLayout) -> GeneratedAppearance {
        let mut out = String::new();
        self.frame(style, &mut out);

        let font = Self::font_name(style);
        let inner = style.inner();
        let area = inner.inset(TEXT_PADDING);
        let display: String = if layout.password {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        };

        Self::begin_variable_text(&mut out, &inner);
        if !display.is_empty() {
            let da = &style.default_appearance;
            let color = da.color.fill_operator();

            match layout.comb {
                Some(cells) if cells > 0 && !layout.multiline => {
                    let size = if da.is_auto_size() {
                        (inner.height() / LEADING).clamp(MIN_AUTO_FONT_SIZE, MAX_AUTO_FONT_SIZE)
                    } else {
                        da.font_size
                    };
                    let cell = inner.width() / cells as f64;
                    let y = baseline_centered(&inner, size);
                    out.push_str("BT\n");
                    push_text_state(&mut out, &color, &font, size);
                    let mut prev_x = 0.0;
                    for (i, c) in display.chars().take(cells as usize).enumerate() {
                        let glyph = c.to_string();
                        let cw = self.measure.text_width(Some(&font), &glyph, size);
                        let x = inner.llx + i as f64 * cell + (cell - cw) / 2.0;
                        let dy = if i == 0 { y } else { 0.0 };
                        out.push_str(&format!("{} {} Td\n", fmt(x - prev_x), fmt(dy)));
                        out.push_str(&format!("({}) Tj\n", escape_pdf_string(&glyph)));
                        prev_x = x;
                    }
                    out.push_str("ET\n");
                },
                _ if layout.multiline => {
                    let size = if da.is_auto_size() {
                        MAX_AUTO_FONT_SIZE
                    } else {
                        da.font_size
                    };
                    let lines = self.wrap(&font, &display, size, area.width());
                    let leading = size * LEADING;
                    out.push_str("BT\n");
                    push_text_state(&mut out, &color, &font, size);
                    let mut y = area.ury - size;
                    let mut prev = (0.0, 0.0);
                    for line in &lines {
                        let tw = self.measure.text_width(Some(&font), line, size);
                        let x = self.aligned_x(style.quadding, &area, tw);
                        out.push_str(&format!("{} {} Td\n", fmt(x - prev.0), fmt(y - prev.1)));
                        out.push_str(&format!("({}) Tj\n", escape_pdf_string(line)));
                        prev = (x, y);
                        y -= leading;
                    }
                    out.push_str("ET\n");
                },
                _ => {
                    let size = if da.is_auto_size() {
                        self.auto_size_single_line(&font, &display, &area)
                    } else {
                        da.font_size
                    };
                    let tw = self.measure.text_width(Some(&font), &display, size);
                    let x = self.aligned_x(style.quadding, &area, tw);
                    let y = baseline_centered(&inner, size);
                    out.push_str("BT\n");
                    push_text_state(&mut out, &color, &font, size);
                    out.push_str(&format!("{} {} Td\n", fmt(x), fmt(y)));
                    out.push_str(&format!("({}) Tj\n", escape_pdf_string(&display)));
                    out.push_str("ET\n");
                },
            }
        }
        Self::end_variable_text(&mut out);

        self.finish(style, out, Some(font))
    }

    /// Greedy word wrap. Explicit line breaks are honoured; words wider than
    /// the line are broken by character.
    pub fn wrap(&self, font: &str, text: &str, size: f64, width: f64) -> Vec<String> {
        let mut lines = Vec::new();
        let normalized = text.replace("\r\n", "\n");
        for paragraph in normalized.split(['\r', '\n']) {
            let mut current = String::new();
            for word in paragraph.split(' ') {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };
                if self.measure.text_width(Some(font), &candidate, size) <= width {
                    current = candidate;
                    continue;
                }
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                // Break an over-long word
                for c in word.chars() {
                    let mut next = current.clone();
                    next.push(c);
                    if !current.is_empty() && self.measure.text_width(Some(font), &next, size) > width {
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    } else {
                        current = next;
                    }
                }
            }
            lines.push(current);
        }
        lines
    }

    /// Combo box appearance: the current value as single-line text.
    pub fn combo_box(&self, style: &WidgetStyle, value: &str) -> GeneratedAppearance {
        self.text_field(style, value, TextLayout::default())
    }

    /// List box appearance: visible options from `top_index`, selected rows
    /// highlighted.
    pub fn list_box(
        &self,
        style: &WidgetStyle,
        options: &[String],
        selected: &[usize],
        top_index: usize,
    ) -> GeneratedAppearance {
        let mut out = String::new();
        self.frame(style, &mut out);

        let font = Self::font_name(style);
        let inner = style.inner();
        let da = &style.default_appearance;
        let size = if da.is_auto_size() {
            MAX_AUTO_FONT_SIZE
        } else {
            da.font_size
        };
        let row = size * LEADING;
        let area = Rect::new(inner.llx + TEXT_PADDING, inner.lly, inner.urx - TEXT_PADDING, inner.ury);

        Self::begin_variable_text(&mut out, &inner);
        let mut top = inner.ury;
        for (index, option) in options.iter().enumerate().skip(top_index) {
            if top <= inner.lly {
                break;
            }
            let bottom = top - row;
            if selected.contains(&index) {
                out.push_str(&format!("{}\n", SELECTION_COLOR.fill_operator()));
                out.push_str(&format!(
                    "{} {} {} {} re f\n",
                    fmt(inner.llx),
                    fmt(bottom),
                    fmt(inner.width()),
                    fmt(row)
                ));
            }
            let tw = self.measure.text_width(Some(&font), option, size);
            let x = self.aligned_x(style.quadding, &area, tw);
            let y = bottom + (row - size) / 2.0 + size * 0.22;
            out.push_str("BT\n");
            push_text_state(&mut out, &da.color.fill_operator(), &font, size);
            out.push_str(&format!("{} {} Td\n", fmt(x), fmt(y)));
            out.push_str(&format!("({}) Tj\n", escape_pdf_string(option)));
            out.push_str("ET\n");
            top = bottom;
        }
        Self::end_variable_text(&mut out);

        self.finish(style, out, Some(font))
    }

    /// Check box appearance for one state.
    ///
    /// `caption` is the `MK/CA` ZapfDingbats character; a check mark (`4`)
    /// is used when absent.
    pub fn check_box(&self, style: &WidgetStyle, on: bool, caption: Option<&str>) -> GeneratedAppearance {
        let mut out = String::new();
        self.frame(style, &mut out);
        if !on {
            return self.finish(style, out, None);
        }
        let glyph = caption.filter(|c| !c.is_empty()).unwrap_or("4");
        self.push_symbol(style, glyph, &mut out);
        self.finish(style, out, Some("ZaDb".to_string()))
    }

    /// Radio button appearance for one state.
    ///
    /// Without a caption, or with the ZapfDingbats circle `l`, the on state
    /// is a filled dot; other captions are drawn as glyphs.
    pub fn radio_button(&self, style: &WidgetStyle, on: bool, caption: Option<&str>) -> GeneratedAppearance {
        let mut out = String::new();
        let bbox = style.bbox();
        let (cx, cy) = (bbox.width() / 2.0, bbox.height() / 2.0);
        let radius = (bbox.width().min(bbox.height()) / 2.0 - style.border_width / 2.0).max(0.0);

        if !style.background.is_transparent() {
            out.push_str(&format!("{}\n", style.background.fill_operator()));
            out.push_str(&circle_path(cx, cy, radius));
            out.push_str("f\n");
        }
        if style.has_border() {
            out.push_str(&format!("{}\n", style.border_color.stroke_operator()));
            out.push_str(&format!("{} w\n", fmt(style.border_width)));
            out.push_str(&circle_path(cx, cy, radius));
            out.push_str("S\n");
        }
        if !on {
            return self.finish(style, out, None);
        }

        match caption.filter(|c| !c.is_empty() && *c != "l") {
            Some(glyph) => {
                self.push_symbol(style, glyph, &mut out);
                self.finish(style, out, Some("ZaDb".to_string()))
            },
            None => {
                let color = style.default_appearance.color.fill_operator();
                out.push_str(&format!("{}\n", color));
                out.push_str(&circle_path(cx, cy, radius * 0.5));
                out.push_str("f\n");
                self.finish(style, out, None)
            },
        }
    }

    /// Push button appearance with a centered caption.
    pub fn push_button(&self, style: &WidgetStyle, caption: &str) -> GeneratedAppearance {
        let mut out = String::new();
        self.frame(style, &mut out);
        let font = Self::font_name(style);
        if caption.is_empty() {
            return self.finish(style, out, None);
        }
        let inner = style.inner();
        let area = inner.inset(TEXT_PADDING);
        let da = &style.default_appearance;
        let size = if da.is_auto_size() {
            self.auto_size_single_line(&font, caption, &area)
        } else {
            da.font_size
        };
        let tw = self.measure.text_width(Some(&font), caption, size);
        let x = self.aligned_x(TextAlignment::Center, &area, tw);
        let y = baseline_centered(&inner, size);
        out.push_str("q\nBT\n");
        push_text_state(&mut out, &da.color.fill_operator(), &font, size);
        out.push_str(&format!("{} {} Td\n", fmt(x), fmt(y)));
        out.push_str(&format!("({}) Tj\n", escape_pdf_string(caption)));
        out.push_str("ET\nQ\n");
        self.finish(style, out, Some(font))
    }

    fn push_symbol(&self, style: &WidgetStyle, glyph: &str, out: &mut String) {
        let inner = style.inner();
        let da = &style.default_appearance;
        let size = if da.is_auto_size() {
            inner.width().min(inner.height()) * 0.8
        } else {
            da.font_size
        };
        let gw = self.measure.text_width(Some("ZaDb"), glyph, size);
        let x = inner.llx + (inner.width() - gw) / 2.0;
        let y = inner.lly + (inner.height() - size * 0.7) / 2.0;
        out.push_str("q\nBT\n");
        push_text_state(out, &da.color.fill_operator(), "ZaDb", size);
        out.push_str(&format!("{} {} Td\n", fmt(x), fmt(y)));
        out.push_str(&format!("({}) Tj\n", escape_pdf_string(glyph)));
        out.push_str("ET\nQ\n");
    }
}

fn fmt(value: f64) -> String {
    format_number(value)
}

fn push_text_state(out: &mut String, color: &str, font: &str, size: f64) {
    if !color.is_empty() {
        out.push_str(color);
        out.push('\n');
    }
    out.push_str(&format!("/{} {} Tf\n", font, fmt(size)));
}

/// Baseline that centers a line of `size` text vertically in `area`.
fn baseline_centered(area: &Rect, size: f64) -> f64 {
    area.lly + (area.height() - size) / 2.0 + size * 0.22
}

fn shade(color: &AnnotationColor, factor: f64) -> AnnotationColor {
    match *color {
        AnnotationColor::Transparent => AnnotationColor::Gray(0.5),
        AnnotationColor::Gray(g) => AnnotationColor::Gray(g * factor),
        AnnotationColor::Rgb(r, g, b) => AnnotationColor::Rgb(r * factor, g * factor, b * factor),
        AnnotationColor::Cmyk(c, m, y, k) => {
            AnnotationColor::Cmyk(c, m, y, (k + (1.0 - k) * (1.0 - factor)).min(1.0))
        },
    }
}

/// Generate a Bezier approximation of a circle path.
fn circle_path(cx: f64, cy: f64, r: f64) -> String {
    // Magic number for Bezier circle approximation
    let k = 0.552_284_7;
    let kp = r * k;
    let p = |x: f64, y: f64| format!("{} {}", fmt(x), fmt(y));

    format!(
        "{} m\n{} {} {} c\n{} {} {} c\n{} {} {} c\n{} {} {} c\n",
        p(cx + r, cy),
        p(cx + r, cy + kp),
        p(cx + kp, cy + r),
        p(cx, cy + r),
        p(cx - kp, cy + r),
        p(cx - r, cy + kp),
        p(cx - r, cy),
        p(cx - r, cy - kp),
        p(cx - kp, cy - r),
        p(cx, cy - r),
        p(cx + kp, cy - r),
        p(cx + r, cy - kp),
        p(cx + r, cy),
    )
}

/// Escape a string for a content-stream literal.
///
/// Characters above U+00FF cannot be shown with a simple font and become `?`.
fn escape_pdf_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            '\r' => result.push_str("\\r"),
            '\n' => result.push_str("\\n"),
            c if (c as u32) < 0x80 => result.push(c),
            c if (c as u32) <= 0xFF => result.push_str(&format!("\\{:03o}", c as u32)),
            _ => result.push('?'),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(w: f64, h: f64) -> WidgetStyle {
        let mut style = WidgetStyle::new(Rect::new(100.0, 100.0, 100.0 + w, 100.0 + h));
        style.border_width = 1.0;
        style.border_color = AnnotationColor::Gray(0.0);
        style.background = AnnotationColor::Gray(1.0);
        style.default_appearance = DefaultAppearance::parse("/Helv 10 Tf 0 g");
        style
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string("Hello (World)"), "Hello \\(World\\)");
        assert_eq!(escape_pdf_string("Back\\slash"), "Back\\\\slash");
        assert_eq!(escape_pdf_string("é"), "\\351");
        assert_eq!(escape_pdf_string("日"), "?");
    }

    #[test]
    fn test_text_field_single_line() {
        let gen = AppearanceGenerator::new();
        let ap = gen.text_field(&style(200.0, 20.0), "Hello", TextLayout::default());

        assert_eq!(ap.bbox, Rect::new(0.0, 0.0, 200.0, 20.0));
        assert!(ap.content.contains("1 g\n0 0 200 20 re f"));
        assert!(ap.content.contains("/Tx BMC"));
        assert!(ap.content.contains("/Helv 10 Tf"));
        assert!(ap.content.contains("(Hello) Tj"));
        assert!(ap.content.ends_with("EMC\n"));
        assert_eq!(ap.font_name.as_deref(), Some("Helv"));
    }

    #[test]
    fn test_password_masks_value() {
        let gen = AppearanceGenerator::new();
        let layout = TextLayout {
            password: true,
            ..Default::default()
        };
        let ap = gen.text_field(&style(100.0, 20.0), "secret", layout);
        assert!(ap.content.contains("(******) Tj"));
        assert!(!ap.content.contains("secret"));
    }

    #[test]
    fn test_right_aligned_text() {
        let gen = AppearanceGenerator::new();
        let mut s = style(100.0, 20.0);
        s.quadding = TextAlignment::Right;
        // "ab" is 2 * 0.5 * 10 = 10 wide; area right edge is 100 - 1 - 2 = 97
        let ap = gen.text_field(&s, "ab", TextLayout::default());
        assert!(ap.content.contains("87 "));
    }

    #[test]
    fn test_comb_field_one_glyph_per_cell() {
        let gen = AppearanceGenerator::new();
        let layout = TextLayout {
            comb: Some(4),
            ..Default::default()
        };
        let ap = gen.text_field(&style(80.0, 20.0), "12345", layout);
        assert_eq!(ap.content.matches(" Tj").count(), 4);
        assert!(!ap.content.contains("(5) Tj"));
    }

    #[test]
    fn test_wrap() {
        let gen = AppearanceGenerator::new();
        // 10pt at 0.5em: 5 points per character, 50 points fit 10 characters
        let lines = gen.wrap("Helv", "hello world again\nnext", 10.0, 50.0);
        assert_eq!(lines, vec!["hello", "world", "again", "next"]);

        let lines = gen.wrap("Helv", "abcdefghijklmnop", 10.0, 50.0);
        assert_eq!(lines, vec!["abcdefghij", "klmnop"]);
    }

    #[test]
    fn test_multiline_text_field() {
        let gen = AppearanceGenerator::new();
        let layout = TextLayout {
            multiline: true,
            ..Default::default()
        };
        let ap = gen.text_field(&style(60.0, 60.0), "one two three", layout);
        assert!(ap.content.matches(" Tj").count() >= 2);
    }

    #[test]
    fn test_list_box_highlights_selection() {
        let gen = AppearanceGenerator::new();
        let options = vec!["Red".to_string(), "Green".to_string(), "Blue".to_string()];
        let ap = gen.list_box(&style(100.0, 60.0), &options, &[1], 0);
        assert!(ap.content.contains("0.6 0.757 0.855 rg"));
        assert!(ap.content.contains("(Green) Tj"));

        let scrolled = gen.list_box(&style(100.0, 60.0), &options, &[], 2);
        assert!(!scrolled.content.contains("(Red) Tj"));
        assert!(scrolled.content.contains("(Blue) Tj"));
    }

    #[test]
    fn test_check_box_states() {
        let gen = AppearanceGenerator::new();
        let on = gen.check_box(&style(12.0, 12.0), true, None);
        assert!(on.content.contains("/ZaDb"));
        assert!(on.content.contains("(4) Tj"));

        let cross = gen.check_box(&style(12.0, 12.0), true, Some("8"));
        assert!(cross.content.contains("(8) Tj"));

        let off = gen.check_box(&style(12.0, 12.0), false, None);
        assert!(!off.content.contains("Tj"));
        assert!(off.font_name.is_none());
    }

    #[test]
    fn test_radio_button_dot() {
        let gen = AppearanceGenerator::new();
        let on = gen.radio_button(&style(12.0, 12.0), true, None);
        assert!(on.content.contains(" c\n"));
        assert!(on.content.trim_end().ends_with('f'));
        assert!(on.font_name.is_none());
    }

    #[test]
    fn test_rotated_widget_bbox_and_matrix() {
        let gen = AppearanceGenerator::new();
        let mut s = style(100.0, 20.0);
        s.rotation = 90;
        let ap = gen.text_field(&s, "x", TextLayout::default());
        assert_eq!(ap.bbox, Rect::new(0.0, 0.0, 20.0, 100.0));
        assert_eq!(ap.matrix, Matrix::rotate_quarter_turns(90));
    }

    #[test]
    fn test_to_object_uses_default_resources() {
        let gen = AppearanceGenerator::new();
        let ap = gen.text_field(&style(50.0, 20.0), "x", TextLayout::default());

        let font = Object::dictionary([("BaseFont", Object::name("Helvetica"))]);
        let dr = Dictionary::from([("Font".to_string(), Object::dictionary([("Helv", font.clone())]))]);
        let obj = ap.to_object(Some(&dr));
        let (dict, data) = obj.as_stream().unwrap();
        assert_eq!(dict.get("Subtype").unwrap().as_name(), Some("Form"));
        let resources = dict.get("Resources").unwrap().as_dict().unwrap();
        let fonts = resources.get("Font").unwrap().as_dict().unwrap();
        assert_eq!(fonts.get("Helv"), Some(&font));
        assert!(!data.is_empty());

        // No DR: standard font dictionary
        let obj = ap.to_object(None);
        let dict = obj.as_dict().unwrap();
        let fonts = dict["Resources"].as_dict().unwrap()["Font"].as_dict().unwrap();
        assert_eq!(fonts["Helv"].as_dict().unwrap()["BaseFont"].as_name(), Some("Helvetica"));
    }

    #[test]
    fn test_custom_measure() {
        struct Wide;
        impl TextMeasure for Wide {
            fn text_width(&self, _font: Option<&str>, text: &str, font_size: f64) -> f64 {
                text.len() as f64 * font_size
            }
        }
        let gen = AppearanceGenerator::with_measure(Wide);
        let lines = gen.wrap("Helv", "aa bb", 10.0, 25.0);
        assert_eq!(lines, vec!["aa", "bb"]);
    }
}
