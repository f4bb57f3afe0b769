//! Error types for schema loading and payload packing.

use thiserror::Error;

/// Errors produced while loading a document into a [crate::schema::Schema].
/// All are fatal: no partial schema is ever returned.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Document is not valid JSON or misses a required section.
    #[error("schema document is malformed: {0}")]
    Json(#[from] serde_json::Error),
    /// `_field_order` references a name with no definition.
    #[error("field `{0}` is listed in `_field_order` but never defined")]
    UndefinedField(String),
    #[error("field `{0}` appears more than once in `_field_order`")]
    DuplicateField(String),
    #[error("field `{field}` has unsupported type `{kind}`")]
    UnknownKind { field: String, kind: String },
    #[error("field `{field}` has unrecognized pack code `{code}`")]
    UnknownPackCode { field: String, code: String },
    #[error("field `{field}` has byte order `{order}`, expected `big` or `little`")]
    UnknownByteOrder { field: String, order: String },
    #[error("field `{field}` has unsupported encoding `{encoding}`")]
    UnknownEncoding { field: String, encoding: String },
    #[error("string field `{0}` must declare `length`")]
    MissingLength(String),
    #[error("hex field `{0}` must declare `length_bytes`")]
    MissingLengthBytes(String),
    #[error("choice field `{0}` must declare `values`")]
    MissingChoiceValues(String),
    #[error("choice field `{0}` has an empty `values` set")]
    EmptyChoiceValues(String),
    /// Choice literal that is neither a number nor a string.
    #[error("choice field `{0}` has a non-scalar literal in `values`")]
    InvalidChoiceLiteral(String),
    #[error("field `{field}` has out-of-range bound {bound}")]
    InvalidBound { field: String, bound: String },
    #[error("field `{field}` declares min {min} greater than max {max}")]
    InvalidBounds {
        field: String,
        min: String,
        max: String,
    },
}

/// Errors produced while packing a value set. Each aborts the whole
/// payload; partial bytes are discarded, and every variant names the
/// offending field.
// hex::FromHexError is PartialEq only, so Eq cannot be derived here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PackError {
    /// Value set has no entry for a field named in the wire order.
    #[error("no value supplied for field `{0}`")]
    MissingValue(String),
    #[error("label `{label}` is not mapped for choice field `{field}`")]
    UnknownChoiceLabel { field: String, label: String },
    #[error("value {value} does not fit field `{field}` ({width}-byte {class})")]
    Range {
        field: String,
        value: String,
        width: usize,
        class: &'static str,
    },
    #[error("field `{field}` is not valid hex: {source}")]
    HexDecode {
        field: String,
        source: hex::FromHexError,
    },
    #[error("field `{field}` needs a {expected} value, got {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("field `{field}` holds text not representable as {encoding}")]
    Unencodable {
        field: String,
        encoding: &'static str,
    },
}
