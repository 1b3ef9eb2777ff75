//! Record fields, fixed and variable, with the embedded-field view.

use crate::subfield::SubField;
use irbis_wire::{fast_parse, split2};

/// A numbered field of a record.
///
/// Fixed fields (tag below 10) carry only `value`; variable fields carry
/// an optional leading value plus subfields. Both shapes share this one
/// type, matching the wire representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordField {
    /// Field tag, 1 to 999.
    pub tag: u32,
    /// Value before the first subfield marker (the whole body for fixed
    /// fields).
    pub value: String,
    /// Subfields in wire order.
    pub subfields: Vec<SubField>,
}

impl RecordField {
    /// Subfield code that introduces an embedded nested field.
    pub const EMBEDDED_CODE: char = '1';

    pub fn new(tag: u32) -> Self {
        RecordField {
            tag,
            ..Default::default()
        }
    }

    pub fn with_value(tag: u32, value: impl Into<String>) -> Self {
        RecordField {
            tag,
            value: value.into(),
            subfields: Vec::new(),
        }
    }

    /// Appends a subfield; chainable for record assembly.
    pub fn add(&mut self, code: char, value: impl Into<String>) -> &mut Self {
        self.subfields.push(SubField::new(code, value));
        self
    }

    /// Appends a subfield only when the value is non-empty.
    pub fn add_non_empty(&mut self, code: char, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if !value.is_empty() {
            self.subfields.push(SubField::new(code, value));
        }
        self
    }

    /// Drops the value and all subfields, keeping the tag.
    pub fn clear(&mut self) -> &mut Self {
        self.value.clear();
        self.subfields.clear();
        self
    }

    /// Parses one protocol line of the form `tag#body`.
    pub fn decode(line: &str) -> Self {
        let (tag, body) = split2(line, '#');
        let mut field = RecordField::new(fast_parse(tag.as_bytes()));
        field.decode_body(body.unwrap_or(""));
        field
    }

    /// Parses the body part: leading value, then `^`-separated subfields.
    pub fn decode_body(&mut self, body: &str) {
        let mut parts = body.split(SubField::DELIMITER);
        // Text before the first marker is the field value; when the body
        // opens with '^' that text is empty.
        self.value = parts.next().unwrap_or("").to_owned();
        for part in parts {
            if !part.is_empty() {
                self.subfields.push(SubField::decode(part));
            }
        }
    }

    /// First subfield with the given code.
    pub fn get_first_subfield(&self, code: char) -> Option<&SubField> {
        self.subfields.iter().find(|sf| sf.code == code)
    }

    /// Value of the first subfield with the given code.
    pub fn get_first_subfield_value(&self, code: char) -> Option<&str> {
        self.get_first_subfield(code).map(|sf| sf.value.as_str())
    }

    /// Expands nested fields encoded in `'1'` subfields.
    ///
    /// A new nested field begins at each `'1'` subfield; its tag is the
    /// leading three-digit prefix of the subfield value. Nested tags
    /// below 10 take the remainder of that value as their field value,
    /// otherwise the following subfields attach to the nested field
    /// until the next `'1'` or the end of the parent. Entries with an
    /// unusable tag or an empty body are skipped.
    pub fn get_embedded_fields(&self) -> Vec<RecordField> {
        let mut result = Vec::new();
        let mut current: Option<RecordField> = None;
        for subfield in &self.subfields {
            if subfield.code == Self::EMBEDDED_CODE {
                if let Some(field) = current.take() {
                    if field.verify() {
                        result.push(field);
                    }
                }
                let value = subfield.value.as_str();
                if value.len() < 3 || !value.as_bytes()[..3].iter().all(u8::is_ascii_digit) {
                    continue;
                }
                let tag = fast_parse(&value.as_bytes()[..3]);
                if tag == 0 {
                    continue;
                }
                let mut field = RecordField::new(tag);
                if tag < 10 {
                    field.value = value[3..].to_owned();
                }
                current = Some(field);
            } else if let Some(field) = current.as_mut() {
                field.subfields.push(subfield.clone());
            }
        }
        if let Some(field) = current {
            if field.verify() {
                result.push(field);
            }
        }
        result
    }

    /// A field is sound when it has a tag and either a value or at least
    /// one sound subfield.
    pub fn verify(&self) -> bool {
        self.tag != 0 && (!self.value.is_empty() || self.subfields.iter().any(SubField::verify))
    }
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.tag, self.value)?;
        for subfield in &self.subfields {
            write!(f, "{subfield}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_variable_field() {
        let field = RecordField::decode("200#^aHello^eWorld");
        assert_eq!(field.tag, 200);
        assert!(field.value.is_empty());
        assert_eq!(field.subfields.len(), 2);
        assert_eq!(field.get_first_subfield_value('a'), Some("Hello"));
        assert_eq!(field.get_first_subfield_value('e'), Some("World"));
        assert_eq!(field.get_first_subfield_value('z'), None);
    }

    #[test]
    fn decode_fixed_field() {
        let field = RecordField::decode("100#20260801");
        assert_eq!(field.tag, 100);
        assert_eq!(field.value, "20260801");
        assert!(field.subfields.is_empty());
    }

    #[test]
    fn decode_leading_value_with_subfields() {
        let field = RecordField::decode("700#lead^aMironov");
        assert_eq!(field.value, "lead");
        assert_eq!(field.get_first_subfield_value('a'), Some("Mironov"));
    }

    #[test]
    fn display_round_trip() {
        let mut field = RecordField::new(700);
        field.add('a', "Миронов").add('b', "А. В.");
        let line = field.to_string();
        assert_eq!(line, "700#^aМиронов^bА. В.");
        assert_eq!(RecordField::decode(&line), field);
    }

    #[test]
    fn embedded_fields_expand() {
        let mut field = RecordField::new(461);
        field
            .add('1', "200")
            .add('a', "Nested title")
            .add('e', "Nested subtitle")
            .add('1', "001embedded-id")
            .add('1', "700")
            .add('a', "Nested author");
        let embedded = field.get_embedded_fields();
        assert_eq!(embedded.len(), 3);
        assert_eq!(embedded[0].tag, 200);
        assert_eq!(embedded[0].get_first_subfield_value('a'), Some("Nested title"));
        assert_eq!(embedded[1].tag, 1);
        assert_eq!(embedded[1].value, "embedded-id");
        assert_eq!(embedded[2].tag, 700);
    }

    #[test]
    fn embedded_fields_skip_broken_entries() {
        let mut field = RecordField::new(461);
        field
            .add('1', "xx")
            .add('1', "200")
            .add('1', "700")
            .add('a', "Author");
        let embedded = field.get_embedded_fields();
        // The malformed tag and the empty 200 entry are both dropped.
        assert_eq!(embedded.len(), 1);
        assert_eq!(embedded[0].tag, 700);
    }

    #[test]
    fn verify_requires_content() {
        assert!(!RecordField::new(200).verify());
        assert!(RecordField::with_value(100, "x").verify());
        let mut field = RecordField::new(0);
        field.add('a', "x");
        assert!(!field.verify());
    }
}
