//! Integration tests for `DA` parsing and appearance stream generation.

use pdf_acroform::acroform::EditOptions;
use pdf_acroform::annotation_types::{BorderStyleType, TextAlignment};
use pdf_acroform::appearance::{AppearanceGenerator, TextLayout, TextMeasure, WidgetStyle};
use pdf_acroform::geometry::{Matrix, Rect};
use pdf_acroform::{
    AnnotationColor, AppearanceMode, DefaultAppearance, Dictionary, FieldValue, InteractiveForm, ModelOptions,
    Object, ObjectStore,
};
use proptest::prelude::*;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn style(width: f64, height: f64, da: &str) -> WidgetStyle {
    let mut style = WidgetStyle::new(Rect::new(0.0, 0.0, width, height));
    style.default_appearance = DefaultAppearance::parse(da);
    style
}

#[test]
fn test_default_appearance_parsing() {
    init();
    let da = DefaultAppearance::parse("/F1 9 Tf 0.1 0.2 0.3 0.4 k");
    assert_eq!(da.font_name.as_deref(), Some("F1"));
    assert_eq!(da.font_size, 9.0);
    assert_eq!(da.color, AnnotationColor::Cmyk(0.1, 0.2, 0.3, 0.4));
    assert_eq!(da.to_da_string(), "/F1 9 Tf 0.1 0.2 0.3 0.4 k");

    // Later operators win; a malformed Tf is ignored
    let da = DefaultAppearance::parse("/Helv 10 Tf 1 g /Cour Tf 0 0 1 rg");
    assert_eq!(da.font_name.as_deref(), Some("Helv"));
    assert_eq!(da.color, AnnotationColor::Rgb(0.0, 0.0, 1.0));

    let empty = DefaultAppearance::parse("");
    assert!(empty.is_auto_size());
    assert_eq!(empty.font_name, None);
}

#[test]
fn test_single_line_text() {
    init();
    let mut s = style(100.0, 20.0, "/Helv 10 Tf 0 g");
    s.quadding = TextAlignment::Center;
    let generated = AppearanceGenerator::new().text_field(&s, "Hello", TextLayout::default());

    assert_eq!(generated.bbox, Rect::new(0.0, 0.0, 100.0, 20.0));
    assert_eq!(generated.font_name.as_deref(), Some("Helv"));
    let content = &generated.content;
    assert!(content.starts_with("/Tx BMC\nq\n0 0 100 20 re W n\n"));
    assert!(content.contains("0 g\n/Helv 10 Tf\n"));
    // 96pt of text area, 25pt of text, centered
    assert!(content.contains("37.5 7.2 Td\n(Hello) Tj\n"));
    assert!(content.ends_with("Q\nEMC\n"));
}

#[test]
fn test_password_comb_and_escaping() {
    init();
    let generator = AppearanceGenerator::new();
    let s = style(100.0, 20.0, "/Helv 10 Tf 0 g");

    let password = TextLayout {
        password: true,
        ..TextLayout::default()
    };
    let masked = generator.text_field(&s, "secret", password);
    assert!(masked.content.contains("(******) Tj"));
    assert!(!masked.content.contains("secret"));

    let comb = TextLayout {
        comb: Some(5),
        ..TextLayout::default()
    };
    let cells = generator.text_field(&s, "1234567", comb);
    assert_eq!(cells.content.matches(" Tj").count(), 5);
    assert!(!cells.content.contains("(6) Tj"));

    let escaped = generator.text_field(&s, "a(b)\\", TextLayout::default());
    assert!(escaped.content.contains("(a\\(b\\)\\\\) Tj"));

    let blank = generator.text_field(&s, "", TextLayout::default());
    assert!(!blank.content.contains("BT"));
}

#[test]
fn test_word_wrap() {
    init();
    let generator = AppearanceGenerator::new();
    assert_eq!(
        generator.wrap("Helv", "alpha beta gamma", 10.0, 50.0),
        vec!["alpha beta".to_string(), "gamma".to_string()]
    );
    assert_eq!(
        generator.wrap("Helv", "abcdefghij", 10.0, 20.0),
        vec!["abcd".to_string(), "efgh".to_string(), "ij".to_string()]
    );
    assert_eq!(generator.wrap("Helv", "one\ntwo", 10.0, 100.0).len(), 2);

    let s = style(60.0, 60.0, "/Helv 10 Tf 0 g");
    let multiline = TextLayout {
        multiline: true,
        ..TextLayout::default()
    };
    let generated = generator.text_field(&s, "alpha beta gamma", multiline);
    assert!(generated.content.contains("(alpha beta) Tj"));
    assert!(generated.content.contains("(gamma) Tj"));
}

#[test]
fn test_border_and_background() {
    init();
    let mut s = style(100.0, 20.0, "/Helv 10 Tf 0 g");
    s.border_width = 1.0;
    s.border_color = AnnotationColor::Gray(0.0);
    s.background = AnnotationColor::Gray(1.0);
    let content = AppearanceGenerator::new().text_field(&s, "x", TextLayout::default()).content;
    assert!(content.starts_with("1 g\n0 0 100 20 re f\n0 G\n1 w\n0.5 0.5 99 19 re S\n"));
    // Clip inside the border
    assert!(content.contains("1 1 98 18 re W n"));

    s.border_style = BorderStyleType::Dashed;
    s.dash_pattern = vec![2.0, 1.0];
    let dashed = AppearanceGenerator::new().text_field(&s, "x", TextLayout::default()).content;
    assert!(dashed.contains("[2 1] 0 d\n"));

    // A transparent border color draws no border
    s.border_color = AnnotationColor::Transparent;
    let plain = AppearanceGenerator::new().text_field(&s, "x", TextLayout::default()).content;
    assert!(!plain.contains(" w\n"));
}

#[test]
fn test_rotated_widget() {
    init();
    let mut s = style(20.0, 100.0, "/Helv 10 Tf 0 g");
    s.rotation = 90;
    let generated = AppearanceGenerator::new().text_field(&s, "up", TextLayout::default());
    assert_eq!(generated.bbox, Rect::new(0.0, 0.0, 100.0, 20.0));
    assert_eq!(generated.matrix, Matrix::rotate_quarter_turns(90));

    match generated.to_object(None) {
        Object::Stream { dict, .. } => {
            assert!(dict.contains_key("Matrix"));
            assert_eq!(dict.get("Subtype"), Some(&Object::name("Form")));
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_buttons_and_list() {
    init();
    let generator = AppearanceGenerator::new();
    let s = style(12.0, 12.0, "/ZaDb 0 Tf 0 g");

    let on = generator.check_box(&s, true, None);
    assert!(on.content.contains("(4) Tj"));
    assert_eq!(on.font_name.as_deref(), Some("ZaDb"));
    let off = generator.check_box(&s, false, None);
    assert!(off.content.is_empty());
    assert_eq!(off.font_name, None);

    let cross = generator.check_box(&s, true, Some("8"));
    assert!(cross.content.contains("(8) Tj"));

    let dot = generator.radio_button(&s, true, None);
    assert!(dot.content.contains(" c\n"));
    assert!(dot.content.ends_with("f\n"));
    assert_eq!(dot.font_name, None);

    let push = generator.push_button(&style(80.0, 20.0, "/Helv 0 Tf 0 g"), "Submit");
    assert!(push.content.contains("(Submit) Tj"));

    let list = generator.list_box(
        &style(80.0, 40.0, "/Helv 10 Tf 0 g"),
        &["One".to_string(), "Two".to_string(), "Three".to_string(), "Four".to_string()],
        &[1],
        1,
    );
    assert!(!list.content.contains("(One) Tj"));
    assert!(list.content.contains("0.6 0.757 0.855 rg"));
    assert!(list.content.contains("(Two) Tj"));
}

#[test]
fn test_stream_resources() {
    init();
    let s = style(100.0, 20.0, "/Helv 10 Tf 0 g");
    let generated = AppearanceGenerator::new().text_field(&s, "x", TextLayout::default());

    let font_of = |obj: Object| -> Option<Object> {
        let (dict, _) = obj.as_stream().map(|(d, b)| (d.clone(), b.clone()))?;
        let resources = dict.get("Resources")?.as_dict()?.clone();
        resources.get("Font")?.as_dict()?.get("Helv").cloned()
    };

    // Standard alias without default resources
    let standard = font_of(generated.to_object(None)).unwrap();
    assert_eq!(
        standard.as_dict().and_then(|d| d.get("BaseFont")),
        Some(&Object::name("Helvetica"))
    );

    // Default resources take precedence
    let dr = Dictionary::from([(
        "Font".to_string(),
        Object::dictionary([("Helv", Object::Reference(pdf_acroform::ObjectRef::new(9, 0)))]),
    )]);
    let from_dr = font_of(generated.to_object(Some(&dr))).unwrap();
    assert_eq!(from_dr, Object::Reference(pdf_acroform::ObjectRef::new(9, 0)));
}

struct WideMeasure;

impl TextMeasure for WideMeasure {
    fn text_width(&self, _font: Option<&str>, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size
    }
}

#[test]
fn test_custom_measure() {
    init();
    let generator = AppearanceGenerator::with_measure(WideMeasure);
    assert_eq!(generator.wrap("Helv", "ab cd", 10.0, 30.0), vec!["ab".to_string(), "cd".to_string()]);

    // Auto-sized text shrinks to fit
    let generated = generator.text_field(&style(44.0, 20.0, "/Helv 0 Tf 0 g"), "abcd", TextLayout::default());
    assert!(generated.content.contains("/Helv 10 Tf"));
}

#[test]
fn test_check_box_regenerated_on_edit() {
    init();
    let mut store = ObjectStore::new();
    let state = store.add(Object::stream(
        Dictionary::from([("BBox".to_string(), Object::number_array(&[0.0, 0.0, 12.0, 12.0]))]),
        Vec::new(),
    ));
    let checkbox = store.add(Object::dictionary([
        ("FT", Object::name("Btn")),
        ("T", Object::text("subscribe")),
        ("Subtype", Object::name("Widget")),
        ("Rect", Object::number_array(&[0.0, 0.0, 12.0, 12.0])),
        ("AS", Object::name("Off")),
        ("MK", Object::dictionary([("CA", Object::text("8"))])),
        (
            "AP",
            Object::dictionary([(
                "N",
                Object::dictionary([("On", Object::Reference(state)), ("Off", Object::Reference(state))]),
            )]),
        ),
    ]));
    let acroform = store.add(Object::dictionary([
        ("Fields", Object::Array(vec![Object::Reference(checkbox)])),
        ("DA", Object::text("/ZaDb 0 Tf 0 g")),
    ]));
    let catalog = store.add(Object::dictionary([("AcroForm", Object::Reference(acroform))]));
    store.set_catalog(catalog);

    let mut form = InteractiveForm::from_catalog(&store, &store.catalog().unwrap(), &ModelOptions::strict())
        .unwrap()
        .unwrap();
    form.set_field_value(&mut store, "subscribe", FieldValue::Boolean(true), &EditOptions::with_appearances())
        .unwrap();

    let widget = &form.field("subscribe").unwrap().widgets[0];
    assert_eq!(widget.appearance_state.as_deref(), Some("On"));
    let drawn = widget.appearance_stream(AppearanceMode::Normal).unwrap();
    assert!(drawn.is_decoded());
    assert!(String::from_utf8_lossy(&drawn.content).contains("(8) Tj"));
    assert_ne!(drawn.object_ref, Some(state));
}

proptest! {
    #[test]
    fn prop_da_font_and_size(font in "[A-Za-z][A-Za-z0-9]{0,7}", size in 0u32..200, gray in 0u32..=10) {
        let text = format!("/{} {} Tf {} g", font, size, gray as f64 / 10.0);
        let da = DefaultAppearance::parse(&text);
        prop_assert_eq!(da.font_name.as_deref(), Some(font.as_str()));
        prop_assert_eq!(da.font_size, size as f64);
        prop_assert_eq!(da.color, AnnotationColor::Gray(gray as f64 / 10.0));
    }

    #[test]
    fn prop_da_never_panics(text in "\\PC{0,40}") {
        let _ = DefaultAppearance::parse(&text);
    }
}
