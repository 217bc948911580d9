//! Exporting field values.
//!
//! [`FormData`] maps fully qualified names to values. It serializes to JSON
//! through serde and to an FDF file (ISO 32000-1:2008, Section 12.7.7).

use super::button::{ButtonField, ButtonKind};
use super::field::{FieldType, FieldValue};
use super::InteractiveForm;
use crate::error::Result;
use crate::text_string::encode_text_string;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Field values by fully qualified name, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    /// Values by fully qualified name
    pub fields: IndexMap<String, FieldValue>,
}

impl FormData {
    /// Empty data set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a value.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Value of a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize to a JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a JSON object of values.
    ///
    /// Strings read as text values; use [`FormData::insert`] with
    /// [`FieldValue::Name`] for button states that must stay names.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write an FDF file with these values.
    ///
    /// Dotted names become nested `Kids` entries. `file` is the `F` entry
    /// naming the PDF the data belongs to.
    pub fn to_fdf(&self, file: Option<&str>) -> Result<Vec<u8>> {
        let mut roots: Vec<FdfNode> = Vec::new();
        for (name, value) in &self.fields {
            let parts: Vec<&str> = name.split('.').collect();
            insert_node(&mut roots, &parts, value);
        }

        let mut output = Vec::new();
        writeln!(output, "%FDF-1.2")?;
        // Binary marker
        output.write_all(b"%")?;
        output.write_all(&[0xe2, 0xe3, 0xcf, 0xd3])?;
        writeln!(output)?;

        writeln!(output, "1 0 obj")?;
        writeln!(output, "<<")?;
        writeln!(output, "/FDF <<")?;
        if let Some(file) = file {
            output.write_all(b"/F ")?;
            write_string(&mut output, file)?;
            writeln!(output)?;
        }
        writeln!(output, "/Fields [")?;
        for node in &roots {
            node.write(&mut output)?;
            writeln!(output)?;
        }
        writeln!(output, "]")?;
        writeln!(output, ">>")?;
        writeln!(output, ">>")?;
        writeln!(output, "endobj")?;

        writeln!(output, "trailer")?;
        writeln!(output, "<< /Root 1 0 R >>")?;
        writeln!(output, "%%EOF")?;
        Ok(output)
    }
}

struct FdfNode {
    name: String,
    value: Option<FieldValue>,
    kids: Vec<FdfNode>,
}

fn insert_node(nodes: &mut Vec<FdfNode>, parts: &[&str], value: &FieldValue) {
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return,
    };
    let index = match nodes.iter().position(|n| n.name == *first) {
        Some(i) => i,
        None => {
            nodes.push(FdfNode {
                name: first.to_string(),
                value: None,
                kids: Vec::new(),
            });
            nodes.len() - 1
        },
    };
    if rest.is_empty() {
        nodes[index].value = Some(value.clone());
    } else {
        insert_node(&mut nodes[index].kids, rest, value);
    }
}

impl FdfNode {
    fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        out.write_all(b"<< /T ")?;
        write_string(out, &self.name)?;
        match &self.value {
            Some(FieldValue::None) | None => {},
            Some(value) => {
                out.write_all(b" /V ")?;
                write_value(out, value)?;
            },
        }
        if !self.kids.is_empty() {
            out.write_all(b" /Kids [ ")?;
            for kid in &self.kids {
                kid.write(out)?;
                out.write_all(b" ")?;
            }
            out.write_all(b"]")?;
        }
        out.write_all(b" >>")?;
        Ok(())
    }
}

fn write_value(out: &mut Vec<u8>, value: &FieldValue) -> Result<()> {
    match value {
        FieldValue::Text(s) => write_string(out, s)?,
        FieldValue::Boolean(true) => out.write_all(b"/Yes")?,
        FieldValue::Boolean(false) => out.write_all(b"/Off")?,
        FieldValue::Name(n) => write_name(out, n)?,
        FieldValue::Array(items) => {
            out.write_all(b"[ ")?;
            for item in items {
                write_string(out, item)?;
                out.write_all(b" ")?;
            }
            out.write_all(b"]")?;
        },
        FieldValue::None => out.write_all(b"null")?,
    }
    Ok(())
}

/// Write a text string as a literal, PDFDocEncoded or UTF-16BE.
fn write_string(out: &mut Vec<u8>, text: &str) -> Result<()> {
    out.write_all(b"(")?;
    for byte in encode_text_string(text) {
        match byte {
            b'(' | b')' | b'\\' => out.write_all(&[b'\\', byte])?,
            b'\r' => out.write_all(b"\\r")?,
            b'\n' => out.write_all(b"\\n")?,
            _ => out.write_all(&[byte])?,
        }
    }
    out.write_all(b")")?;
    Ok(())
}

/// Write a name, escaping delimiters and non-regular bytes as `#xx`.
fn write_name(out: &mut Vec<u8>, name: &str) -> Result<()> {
    out.write_all(b"/")?;
    for byte in name.bytes() {
        let regular = (b'!'..=b'~').contains(&byte)
            && !matches!(byte, b'#' | b'/' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'%');
        if regular {
            out.write_all(&[byte])?;
        } else {
            write!(out, "#{:02X}", byte)?;
        }
    }
    Ok(())
}

impl InteractiveForm {
    /// Values of the exportable terminal fields.
    ///
    /// Fields flagged NoExport, push buttons and signature fields are left
    /// out.
    pub fn export_data(&self) -> FormData {
        let mut data = FormData::new();
        for field in self.terminal_fields() {
            if field.is_no_export() {
                log::trace!("Not exporting {} (NoExport)", field.full_name);
                continue;
            }
            match field.field_type() {
                Some(FieldType::Signature) => continue,
                Some(FieldType::Button) if ButtonField::new(field).kind() == ButtonKind::PushButton => continue,
                _ => {},
            }
            if field.full_name.is_empty() {
                log::debug!("Skipping unnamed field {:?}", field.object_ref);
                continue;
            }
            data.insert(field.full_name.clone(), field.value());
        }
        data
    }

    /// Export the field values as an FDF file.
    pub fn to_fdf(&self, file: Option<&str>) -> Result<Vec<u8>> {
        self.export_data().to_fdf(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FormData {
        let mut data = FormData::new();
        data.insert("name", FieldValue::Text("John (Jr)".into()));
        data.insert("address.city", FieldValue::Text("Paris".into()));
        data.insert("address.zip", FieldValue::Text("75001".into()));
        data.insert("agree", FieldValue::Name("Yes".into()));
        data.insert("colors", FieldValue::Array(vec!["r".into(), "g".into()]));
        data
    }

    #[test]
    fn test_fdf_structure() {
        let bytes = sample().to_fdf(Some("form.pdf")).unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert!(content.starts_with("%FDF-1.2"));
        assert!(content.contains("/F (form.pdf)"));
        assert!(content.contains("<< /T (name) /V (John \\(Jr\\)) >>"));
        assert!(content.contains("<< /T (address) /Kids [ << /T (city) /V (Paris) >> << /T (zip) /V (75001) >> ] >>"));
        assert!(content.contains("/V /Yes"));
        assert!(content.contains("/V [ (r) (g) ]"));
        assert!(content.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn test_name_escaping() {
        let mut out = Vec::new();
        write_name(&mut out, "A B#").unwrap();
        assert_eq!(out, b"/A#20B#23");
    }

    #[test]
    fn test_json() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"address.city\": \"Paris\""));
        let back = FormData::from_json(&json).unwrap();
        assert_eq!(back.len(), 5);
        // Names come back as text
        assert_eq!(back.get("agree"), Some(&FieldValue::Text("Yes".into())));
        assert_eq!(back.fields.keys().next().map(String::as_str), Some("name"));
    }
}
