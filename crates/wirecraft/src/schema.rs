//! Validated schema: the wire order closed over typed fields.

use std::collections::BTreeSet;

use crate::defs::SchemaDef;
use crate::errors::SchemaError;
use crate::field::Field;

/// A loaded schema. Construction validates the whole document, so every
/// field carried here has a known kind, resolved bounds, and a pack code
/// from the supported table (or deliberately none).
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Parses and validates a JSON schema document.
    pub fn load(document: &str) -> Result<Self, SchemaError> {
        let def: SchemaDef = serde_json::from_str(document)?;
        Schema::try_from(&def)
    }

    /// Fields in wire order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Payload size implied by the declared widths. Nominal: text fields
    /// contribute their declared length even though the packer writes
    /// whatever the supplied value encodes to.
    pub fn nominal_len(&self) -> usize {
        self.fields.iter().filter_map(Field::wire_width).sum()
    }
}

impl TryFrom<&SchemaDef> for Schema {
    type Error = SchemaError;

    fn try_from(def: &SchemaDef) -> Result<Self, Self::Error> {
        let mut seen = BTreeSet::new();
        let mut fields = Vec::with_capacity(def.field_order.len());
        for name in &def.field_order {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateField(name.clone()));
            }
            let field_def = def
                .fields
                .get(name)
                .ok_or_else(|| SchemaError::UndefinedField(name.clone()))?;
            fields.push(Field::from_def(name, field_def)?);
        }
        Ok(Schema { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use crate::packcode::{ByteOrder, PackCode};

    const UPLINK: &str = r#"{
        "_field_order": ["id", "temp"],
        "fields": {
            "id": { "type": "uint", "packer": "B" },
            "temp": { "type": "int", "packer": "h", "byte_order": "big" }
        }
    }"#;

    #[test]
    fn loads_fields_in_wire_order() {
        let schema = Schema::load(UPLINK).unwrap();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "temp"]);
        assert_eq!(schema.fields()[0].pack, Some(PackCode::U8));
        assert_eq!(schema.fields()[1].pack, Some(PackCode::I16));
        assert_eq!(schema.fields()[1].byte_order, ByteOrder::Big);
        assert_eq!(schema.nominal_len(), 3);
    }

    #[test]
    fn order_entry_without_definition_is_rejected() {
        let err = Schema::load(
            r#"{"_field_order": ["ghost"], "fields": {}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UndefinedField(name) if name == "ghost"));
    }

    #[test]
    fn duplicate_order_entries_are_rejected() {
        let err = Schema::load(
            r#"{
                "_field_order": ["id", "id"],
                "fields": { "id": { "type": "uint", "packer": "B" } }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField(name) if name == "id"));
    }

    #[test]
    fn definitions_outside_the_order_are_ignored() {
        let schema = Schema::load(
            r#"{
                "_field_order": ["id"],
                "fields": {
                    "id": { "type": "uint", "packer": "B" },
                    "spare": { "type": "uint", "packer": "Q" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(schema.fields().len(), 1);
    }

    #[test]
    fn unsupported_pack_code_is_rejected() {
        let err = Schema::load(
            r#"{
                "_field_order": ["id"],
                "fields": { "id": { "type": "uint", "packer": "4s" } }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownPackCode { code, .. } if code == "4s"
        ));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = Schema::load(
            r#"{
                "_field_order": ["blob"],
                "fields": { "blob": { "type": "bytes" } }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownKind { kind, .. } if kind == "bytes"));
    }

    #[test]
    fn choice_without_values_is_rejected() {
        let err = Schema::load(
            r#"{
                "_field_order": ["mode"],
                "fields": { "mode": { "type": "choice" } }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::MissingChoiceValues(_)));

        let err = Schema::load(
            r#"{
                "_field_order": ["mode"],
                "fields": { "mode": { "type": "choice", "values": [] } }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyChoiceValues(_)));
    }

    #[test]
    fn malformed_json_is_reported_as_such() {
        let err = Schema::load("{").unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
    }

    #[test]
    fn nominal_len_counts_every_width_bearing_field() {
        let schema = Schema::load(
            r#"{
                "_field_order": ["id", "name", "mac", "mode"],
                "fields": {
                    "id": { "type": "uint", "packer": "I" },
                    "name": { "type": "string", "length": 6 },
                    "mac": { "type": "hex_string", "length_bytes": 8 },
                    "mode": { "type": "choice", "values": [1, 2] }
                }
            }"#,
        )
        .unwrap();
        // 4 + 6 + 8, the packless choice contributes nothing.
        assert_eq!(schema.nominal_len(), 18);
        assert!(matches!(
            schema.fields()[3].kind,
            FieldKind::Choice(_)
        ));
        assert_eq!(schema.fields()[3].wire_width(), None);
    }
}
