//! Document form of a schema, as it appears on disk.
//!
//! These types mirror the JSON layout attribute-for-attribute and stay
//! deliberately loose: every field attribute is optional here, and
//! [`Field::from_def`](crate::field::Field::from_def) decides which
//! combinations are valid for which kind. Serializing a `SchemaDef` writes
//! a document that loads back identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Whole schema document: the wire order plus one definition per name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SchemaDef {
    /// Field names in wire order. Also the generation order.
    #[serde(rename = "_field_order")]
    pub field_order: Vec<String>,
    /// Definitions keyed by field name. Entries not named in the order are
    /// carried but never packed.
    pub fields: BTreeMap<String, FieldDef>,
}

/// One field definition, all attributes optional except the kind.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FieldDef {
    /// Kind name: `int`, `uint`, `float`, `string`, `hex_string`, `choice`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Primitive pack code (`b`/`B`/`h`/`H`/`i`/`I`/`l`/`L`/`q`/`Q`/`f`/`d`).
    /// Absent or empty means the field packs no primitive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packer: Option<String>,
    /// `big` (default) or `little`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Number>,
    /// Decimal digits kept when generating floats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    /// Generated character count for `string` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Alphabet name for generated text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    /// Text byte encoding applied at pack time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Payload byte count for `hex_string` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_bytes: Option<usize>,
    /// Choice inventory, literal list or label map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<ValuesDef>,
}

/// Choice values as written in the document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ValuesDef {
    /// `"values": [1, 2, "text"]`: literals used verbatim.
    Literals(Vec<serde_json::Value>),
    /// `"values": {"off": 0, "on": 1}`: labels mapped to wire numbers.
    Labels(BTreeMap<String, serde_json::Number>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_round_trips_through_json() {
        let doc = r#"{
            "_field_order": ["id"],
            "fields": {
                "id": { "type": "uint", "packer": "B" }
            }
        }"#;
        let def: SchemaDef = serde_json::from_str(doc).unwrap();
        assert_eq!(def.field_order, vec!["id"]);
        assert_eq!(def.fields["id"].kind, "uint");
        assert_eq!(def.fields["id"].packer.as_deref(), Some("B"));

        let emitted = serde_json::to_string(&def).unwrap();
        let back: SchemaDef = serde_json::from_str(&emitted).unwrap();
        assert_eq!(back.field_order, def.field_order);
        assert_eq!(back.fields["id"].packer, def.fields["id"].packer);
    }

    #[test]
    fn label_map_and_literal_list_both_parse() {
        let doc = r#"{
            "_field_order": ["mode", "level"],
            "fields": {
                "mode": { "type": "choice", "values": {"off": 0, "on": 1} },
                "level": { "type": "choice", "values": [1, 2, 3] }
            }
        }"#;
        let def: SchemaDef = serde_json::from_str(doc).unwrap();
        assert!(matches!(def.fields["mode"].values, Some(ValuesDef::Labels(_))));
        assert!(matches!(
            def.fields["level"].values,
            Some(ValuesDef::Literals(_))
        ));
    }

    #[test]
    fn unknown_attributes_do_not_fail_the_parse() {
        // Hand-edited documents grow extra annotations; loading stays
        // permissive about attributes it does not know.
        let doc = r#"{
            "_field_order": ["id"],
            "fields": {
                "id": { "type": "uint", "packer": "B", "comment": "device id" }
            }
        }"#;
        let def: SchemaDef = serde_json::from_str(doc).unwrap();
        assert_eq!(def.fields["id"].kind, "uint");
    }
}
