//! PDF text strings and dates.
//!
//! Text strings (ISO 32000-1:2008, Section 7.9.2.2) are either UTF-16BE with a
//! byte order mark or PDFDocEncoding. PDF 2.0 adds UTF-8 with a BOM.
//! Dates (Section 7.9.4) use the form `D:YYYYMMDDHHmmSSOHH'mm'`.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Date pattern; every component after the year is optional.
    static ref RE_PDF_DATE: Regex = Regex::new(
        r"^(?:D:)?(\d{4})(\d{2})?(\d{2})?(\d{2})?(\d{2})?(\d{2})?(?:([Zz+\-])(?:(\d{2})'?(?:(\d{2})'?)?)?)?"
    )
    .unwrap();
}

/// Map a PDFDocEncoding byte to its Unicode character.
///
/// ISO 32000-1:2008, Appendix D.2, Table D.2
pub fn pdfdoc_encoding_lookup(code: u8) -> Option<char> {
    match code {
        // ASCII range, with the undefined control codes passed through
        0x00..=0x17 | 0x20..=0x7E => Some(code as char),
        0x18 => Some('\u{02D8}'), // breve
        0x19 => Some('\u{02C7}'), // caron
        0x1A => Some('\u{02C6}'), // circumflex
        0x1B => Some('\u{02D9}'), // dotaccent
        0x1C => Some('\u{02DD}'), // hungarumlaut
        0x1D => Some('\u{02DB}'), // ogonek
        0x1E => Some('\u{02DA}'), // ring
        0x1F => Some('\u{02DC}'), // tilde
        0x7F => None,
        0x80 => Some('\u{2022}'), // bullet
        0x81 => Some('\u{2020}'), // dagger
        0x82 => Some('\u{2021}'), // daggerdbl
        0x83 => Some('\u{2026}'), // ellipsis
        0x84 => Some('\u{2014}'), // emdash
        0x85 => Some('\u{2013}'), // endash
        0x86 => Some('\u{0192}'), // florin
        0x87 => Some('\u{2044}'), // fraction
        0x88 => Some('\u{2039}'), // guilsinglleft
        0x89 => Some('\u{203A}'), // guilsinglright
        0x8A => Some('\u{2212}'), // minus
        0x8B => Some('\u{2030}'), // perthousand
        0x8C => Some('\u{201E}'), // quotedblbase
        0x8D => Some('\u{201C}'), // quotedblleft
        0x8E => Some('\u{201D}'), // quotedblright
        0x8F => Some('\u{2018}'), // quoteleft
        0x90 => Some('\u{2019}'), // quoteright
        0x91 => Some('\u{201A}'), // quotesinglbase
        0x92 => Some('\u{2122}'), // trademark
        0x93 => Some('\u{FB01}'), // fi
        0x94 => Some('\u{FB02}'), // fl
        0x95 => Some('\u{0141}'), // Lslash
        0x96 => Some('\u{0152}'), // OE
        0x97 => Some('\u{0160}'), // Scaron
        0x98 => Some('\u{0178}'), // Ydieresis
        0x99 => Some('\u{017D}'), // Zcaron
        0x9A => Some('\u{0131}'), // dotlessi
        0x9B => Some('\u{0142}'), // lslash
        0x9C => Some('\u{0153}'), // oe
        0x9D => Some('\u{0161}'), // scaron
        0x9E => Some('\u{017E}'), // zcaron
        0x9F => None,
        0xA0 => Some('\u{20AC}'), // Euro
        0xAD => None,
        // ISO Latin-1 range - direct mapping
        0xA1..=0xFF => Some(code as char),
    }
}

/// Map a character back to its PDFDocEncoding byte, if representable.
fn pdfdoc_encoding_reverse(c: char) -> Option<u8> {
    let cp = c as u32;
    if (0x20..=0x7E).contains(&cp) || matches!(cp, 0x09 | 0x0A | 0x0D) {
        return Some(cp as u8);
    }
    if (0xA1..=0xFF).contains(&cp) && cp != 0xAD {
        return Some(cp as u8);
    }
    (0x18u8..=0x1F)
        .chain(0x80u8..=0xA0)
        .find(|&b| pdfdoc_encoding_lookup(b) == Some(c))
}

/// Decode a PDF text string.
///
/// - `FE FF` prefix: UTF-16BE (unpaired surrogates become U+FFFD)
/// - `EF BB BF` prefix: UTF-8 (PDF 2.0)
/// - otherwise: PDFDocEncoding
pub fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else if bytes.len() >= 3 && bytes[..3] == [0xEF, 0xBB, 0xBF] {
        String::from_utf8_lossy(&bytes[3..]).into_owned()
    } else {
        bytes
            .iter()
            .filter_map(|&b| pdfdoc_encoding_lookup(b))
            .collect()
    }
}

/// Encode a string as a PDF text string.
///
/// Uses PDFDocEncoding when every character is representable, otherwise
/// UTF-16BE with a byte order mark. PDFDocEncoding output that would
/// itself start with a byte order mark (text beginning with "þÿ" or "ï»¿")
/// is written as UTF-16BE too.
pub fn encode_text_string(text: &str) -> Vec<u8> {
    let pdfdoc: Option<Vec<u8>> = text.chars().map(pdfdoc_encoding_reverse).collect();
    match pdfdoc {
        Some(bytes) if !bytes.starts_with(&[0xFE, 0xFF]) && !bytes.starts_with(&[0xEF, 0xBB, 0xBF]) => bytes,
        _ => {
            let mut out = vec![0xFE, 0xFF];
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
            out
        },
    }
}

/// Parse a PDF date string.
///
/// Missing components default to the earliest valid value (month 1, day 1,
/// midnight) and a missing offset means UTC. Returns `None` for strings
/// that do not start with a four-digit year or describe an impossible date.
///
/// # Example
///
/// ```
/// use pdf_acroform::text_string::parse_date;
///
/// let date = parse_date("D:20231030120000+02'00'").unwrap();
/// assert_eq!(date.to_rfc3339(), "2023-10-30T12:00:00+02:00");
/// ```
pub fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    let caps = RE_PDF_DATE.captures(text.trim())?;
    let num = |i: usize, default: u32| -> u32 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(default)
    };

    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(2, 1), num(3, 1))?;
    let naive = date.and_hms_opt(num(4, 0), num(5, 0), num(6, 0))?;

    let offset_seconds = match caps.get(7).map(|m| m.as_str()) {
        Some("+") | Some("-") => {
            let seconds = (num(8, 0) * 3600 + num(9, 0) * 60) as i32;
            if caps.get(7).map(|m| m.as_str()) == Some("-") {
                -seconds
            } else {
                seconds
            }
        },
        _ => 0,
    };
    let offset = FixedOffset::east_opt(offset_seconds)?;
    offset.from_local_datetime(&naive).single()
}

/// Format a date as a PDF date string.
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    let mut out = format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}",
        date.year(),
        date.month(),
        date.day(),
        date.hour(),
        date.minute(),
        date.second()
    );
    let offset = date.offset().local_minus_utc();
    if offset == 0 {
        out.push('Z');
    } else {
        let sign = if offset < 0 { '-' } else { '+' };
        let abs = offset.abs();
        out.push_str(&format!("{}{:02}'{:02}'", sign, abs / 3600, (abs % 3600) / 60));
    }
    out
}

/// A date entry as stored in a dictionary: the raw text plus its parsed value.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfDate {
    /// Raw date string
    pub raw: String,
    /// Parsed date, when the string is well-formed
    pub parsed: Option<DateTime<FixedOffset>>,
}

impl PdfDate {
    /// Build from a raw date string.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_date(&raw);
        if parsed.is_none() {
            log::debug!("Unparseable PDF date {:?}", raw);
        }
        Self { raw, parsed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_pdfdoc() {
        assert_eq!(decode_text_string(b"Hello"), "Hello");
        assert_eq!(decode_text_string(&[0x80, 0x84]), "\u{2022}\u{2014}");
        assert_eq!(decode_text_string(&[0xE9]), "é");
    }

    #[test]
    fn test_decode_utf16be() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_string(&bytes), "Hi");
    }

    #[test]
    fn test_decode_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("Grüße".as_bytes());
        assert_eq!(decode_text_string(&bytes), "Grüße");
    }

    #[test]
    fn test_encode_prefers_pdfdoc() {
        assert_eq!(encode_text_string("Café"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(encode_text_string("\u{2022}"), vec![0x80]);
    }

    #[test]
    fn test_encode_falls_back_to_utf16() {
        let encoded = encode_text_string("日本");
        assert_eq!(&encoded[..2], &[0xFE, 0xFF]);
        assert_eq!(decode_text_string(&encoded), "日本");
    }

    #[test]
    fn test_encode_avoids_accidental_bom() {
        for text in ["þÿab", "ï»¿x"] {
            let encoded = encode_text_string(text);
            assert_eq!(&encoded[..2], &[0xFE, 0xFF]);
            assert_eq!(decode_text_string(&encoded), text);
        }
        // Not at the start: PDFDocEncoding is still fine
        assert_eq!(encode_text_string("aþÿ"), vec![b'a', 0xFE, 0xFF]);
    }

    #[test]
    fn test_parse_full_date() {
        let date = parse_date("D:20231030120000-05'30'").unwrap();
        assert_eq!(date.to_rfc3339(), "2023-10-30T12:00:00-05:30");
    }

    #[test]
    fn test_parse_partial_date() {
        let date = parse_date("D:2021").unwrap();
        assert_eq!(date.to_rfc3339(), "2021-01-01T00:00:00+00:00");

        let date = parse_date("D:20210315").unwrap();
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_date_utc_and_missing_prefix() {
        let date = parse_date("20200101093000Z").unwrap();
        assert_eq!(date.offset().local_minus_utc(), 0);
        assert_eq!(date.hour(), 9);
    }

    #[test]
    fn test_parse_date_without_apostrophes() {
        let date = parse_date("D:20200101093000+0100").unwrap();
        assert_eq!(date.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(parse_date("yesterday").is_none());
        assert!(parse_date("D:20231340").is_none());
    }

    #[test]
    fn test_format_date_roundtrip() {
        let date = parse_date("D:20231030120000+02'00'").unwrap();
        assert_eq!(format_date(&date), "D:20231030120000+02'00'");

        let utc = parse_date("D:19991231235959Z").unwrap();
        assert_eq!(format_date(&utc), "D:19991231235959Z");
    }

    #[test]
    fn test_pdf_date_keeps_raw() {
        let date = PdfDate::new("garbage");
        assert_eq!(date.raw, "garbage");
        assert!(date.parsed.is_none());
    }
}
