//! Default appearance strings (`DA`).
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.7.3.3 - Variable Text.
//!
//! A `DA` string is a content-stream fragment such as `/Helv 12 Tf 0 g`.
//! Only the font (`Tf`) and the fill color (`g`, `rg`, `k`) matter for
//! laying out variable text; other operators are kept verbatim so they can
//! be replayed when an appearance is generated.

use crate::annotation_types::AnnotationColor;
use crate::appearance::format_number;
use nom::{
    branch::alt,
    bytes::complete::{take, take_while, take_while1},
    character::complete::{char, digit0, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::many0,
    sequence::{pair, preceded, tuple},
    IResult,
};

/// Token of a `DA` string.
#[derive(Debug, Clone, PartialEq)]
enum DaToken {
    Number(f64),
    Name(String),
    Operator(String),
    Other,
}

fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n' | 0x00 | 0x0C)
}

fn is_delimiter(c: u8) -> bool {
    matches!(c, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

fn number(input: &[u8]) -> IResult<&[u8], DaToken> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
        ))),
        |bytes: &[u8]| {
            std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .map(DaToken::Number)
                .ok_or(())
        },
    )(input)
}

fn name(input: &[u8]) -> IResult<&[u8], DaToken> {
    map(
        preceded(char('/'), take_while(|c| !is_whitespace(c) && !is_delimiter(c))),
        |bytes: &[u8]| DaToken::Name(String::from_utf8_lossy(bytes).into_owned()),
    )(input)
}

fn operator(input: &[u8]) -> IResult<&[u8], DaToken> {
    map(
        take_while1(|c: u8| c.is_ascii_alphabetic() || c == b'*' || c == b'\'' || c == b'"'),
        |bytes: &[u8]| DaToken::Operator(String::from_utf8_lossy(bytes).into_owned()),
    )(input)
}

fn other(input: &[u8]) -> IResult<&[u8], DaToken> {
    map(take(1usize), |_| DaToken::Other)(input)
}

fn token(input: &[u8]) -> IResult<&[u8], DaToken> {
    preceded(take_while(is_whitespace), alt((number, name, operator, other)))(input)
}

fn tokenize(input: &[u8]) -> Vec<DaToken> {
    match many0(token)(input) {
        Ok((_, tokens)) => tokens,
        Err(e) => {
            log::debug!("Failed to tokenize default appearance: {:?}", e);
            Vec::new()
        },
    }
}

/// Parsed default appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultAppearance {
    /// Font resource name in the `DR` font dictionary, without `/`
    pub font_name: Option<String>,
    /// Font size; 0 means auto-size
    pub font_size: f64,
    /// Text fill color
    pub color: AnnotationColor,
}

impl Default for DefaultAppearance {
    fn default() -> Self {
        Self {
            font_name: None,
            font_size: 0.0,
            color: AnnotationColor::Gray(0.0),
        }
    }
}

impl DefaultAppearance {
    /// Parse a `DA` string.
    ///
    /// Later operators override earlier ones. Malformed operand lists are
    /// ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use pdf_acroform::appearance::DefaultAppearance;
    ///
    /// let da = DefaultAppearance::parse("/Helv 0 Tf 0 0 1 rg");
    /// assert_eq!(da.font_name.as_deref(), Some("Helv"));
    /// assert!(da.is_auto_size());
    /// ```
    pub fn parse(da: &str) -> Self {
        let mut result = Self::default();
        let mut operands: Vec<DaToken> = Vec::new();

        for tok in tokenize(da.as_bytes()) {
            let op = match tok {
                DaToken::Operator(op) => op,
                DaToken::Other => {
                    operands.clear();
                    continue;
                },
                operand => {
                    operands.push(operand);
                    continue;
                },
            };

            let nums: Vec<f64> = operands
                .iter()
                .filter_map(|t| match t {
                    DaToken::Number(n) => Some(*n),
                    _ => None,
                })
                .collect();

            match op.as_str() {
                "Tf" => match operands.as_slice() {
                    [.., DaToken::Name(font), DaToken::Number(size)] => {
                        result.font_name = Some(font.clone());
                        result.font_size = size.abs();
                    },
                    _ => log::debug!("Malformed Tf operands in DA {:?}", da),
                },
                "g" | "rg" | "k" => {
                    let want = match op.as_str() {
                        "g" => 1,
                        "rg" => 3,
                        _ => 4,
                    };
                    if nums.len() >= want {
                        if let Some(color) = AnnotationColor::from_components(&nums[nums.len() - want..]) {
                            result.color = color;
                        }
                    } else {
                        log::debug!("Malformed {} operands in DA {:?}", op, da);
                    }
                },
                _ => {},
            }
            operands.clear();
        }
        result
    }

    /// Check whether the font size is chosen automatically.
    pub fn is_auto_size(&self) -> bool {
        self.font_size == 0.0
    }

    /// Font selection operator, e.g. `/Helv 12 Tf`.
    pub fn font_operator(&self, size: f64) -> Option<String> {
        self.font_name
            .as_ref()
            .map(|name| format!("/{} {} Tf", name, format_number(size)))
    }

    /// Serialize back to a `DA` string.
    pub fn to_da_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(font) = self.font_operator(self.font_size) {
            parts.push(font);
        }
        let color = self.color.fill_operator();
        if !color.is_empty() {
            parts.push(color);
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let da = DefaultAppearance::parse("/Helv 12 Tf 0 g");
        assert_eq!(da.font_name.as_deref(), Some("Helv"));
        assert_eq!(da.font_size, 12.0);
        assert_eq!(da.color, AnnotationColor::Gray(0.0));
    }

    #[test]
    fn test_parse_rgb_and_reals() {
        let da = DefaultAppearance::parse("0.25 0.5 1 rg /TiRo 9.5 Tf");
        assert_eq!(da.color, AnnotationColor::Rgb(0.25, 0.5, 1.0));
        assert_eq!(da.font_size, 9.5);
    }

    #[test]
    fn test_parse_cmyk() {
        let da = DefaultAppearance::parse("/Cour 10 Tf 0 0 0 1 k");
        assert_eq!(da.color, AnnotationColor::Cmyk(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_later_operators_win() {
        let da = DefaultAppearance::parse("/Helv 10 Tf 1 g /ZaDb 0 Tf 0.5 g");
        assert_eq!(da.font_name.as_deref(), Some("ZaDb"));
        assert!(da.is_auto_size());
        assert_eq!(da.color, AnnotationColor::Gray(0.5));
    }

    #[test]
    fn test_ignores_garbage() {
        let da = DefaultAppearance::parse("(text) Tj 12 Tf /F1 8 Tf");
        assert_eq!(da.font_name.as_deref(), Some("F1"));
        assert_eq!(da.font_size, 8.0);

        let empty = DefaultAppearance::parse("");
        assert_eq!(empty, DefaultAppearance::default());
    }

    #[test]
    fn test_to_da_string() {
        let da = DefaultAppearance::parse("/Helv  12.0   Tf   0 0 1   rg");
        assert_eq!(da.to_da_string(), "/Helv 12 Tf 0 0 1 rg");
    }
}
