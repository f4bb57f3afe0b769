//! Field model: the closed set of kinds a schema can declare.
//!
//! Documents are open (any attribute may appear on any field); this module
//! closes them into a tagged model so that every consumer can match
//! exhaustively instead of probing attributes.

use crate::defs::{FieldDef, ValuesDef};
use crate::errors::SchemaError;
use crate::packcode::{ByteOrder, PackCode};
use crate::value::Value;

/// One named entry in the wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Name used to look values up and to key the decoded output.
    pub name: String,
    /// What the field holds and how values for it are produced.
    pub kind: FieldKind,
    /// Fixed-width primitive encoding, when the field has one.
    pub pack: Option<PackCode>,
    /// Byte order for multi-byte primitives.
    pub byte_order: ByteOrder,
}

/// Closed set of field kinds. Numeric bounds are resolved on load so that
/// generation can never be asked for an empty or unbounded range.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Signed integer, generated uniformly in `[min, max]`.
    Int { min: i128, max: i128 },
    /// Unsigned integer, generated uniformly in `[min, max]`.
    Uint { min: i128, max: i128 },
    /// Real number, generated in `[min, max]` and rounded to `precision`
    /// decimal digits.
    Float { min: f64, max: f64, precision: u32 },
    /// Fixed-length text. `charset` stays a free name, resolved leniently
    /// at generation time; `encoding` is applied at pack time.
    Text {
        length: usize,
        charset: Option<String>,
        encoding: Encoding,
    },
    /// Raw bytes carried as hex text until pack time.
    HexBytes { length_bytes: usize },
    /// One value out of an enumerated set.
    Choice(ChoiceValues),
}

impl FieldKind {
    /// Document name of the kind, used in diagnostics and emitted comments.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Int { .. } => "int",
            FieldKind::Uint { .. } => "uint",
            FieldKind::Float { .. } => "float",
            FieldKind::Text { .. } => "string",
            FieldKind::HexBytes { .. } => "hex_string",
            FieldKind::Choice(_) => "choice",
        }
    }
}

/// Value inventory for a choice field.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceValues {
    /// Literal values used verbatim, in document order.
    Literals(Vec<Value>),
    /// Symbolic labels mapped to numeric wire values, label-sorted.
    Labeled(Vec<(String, Value)>),
}

impl ChoiceValues {
    /// Wire value for `label` when this is a labeled mapping containing it.
    pub fn wire_value(&self, label: &str) -> Option<&Value> {
        match self {
            ChoiceValues::Labeled(pairs) => {
                pairs.iter().find(|(l, _)| l == label).map(|(_, v)| v)
            }
            ChoiceValues::Literals(_) => None,
        }
    }
}

/// Byte encoding applied to text fields at pack time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

impl Encoding {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Encoding::Utf8),
            "ascii" | "us-ascii" => Some(Encoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" => Some(Encoding::Latin1),
            _ => None,
        }
    }

    /// Canonical name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin-1",
        }
    }
}

impl Field {
    /// Closes one document definition into the typed model. `name` is the
    /// wire-order entry the definition was found under.
    pub fn from_def(name: &str, def: &FieldDef) -> Result<Self, SchemaError> {
        let pack = match def.packer.as_deref() {
            // An empty code means "no packer", matching documents that
            // template the attribute in unconditionally.
            None | Some("") => None,
            Some(code) => {
                Some(
                    PackCode::parse(code).ok_or_else(|| SchemaError::UnknownPackCode {
                        field: name.to_string(),
                        code: code.to_string(),
                    })?,
                )
            }
        };

        let byte_order = match def.byte_order.as_deref() {
            None => ByteOrder::default(),
            Some("big") => ByteOrder::Big,
            Some("little") => ByteOrder::Little,
            Some(other) => {
                return Err(SchemaError::UnknownByteOrder {
                    field: name.to_string(),
                    order: other.to_string(),
                });
            }
        };

        let kind = match def.kind.as_str() {
            "int" => int_kind(name, def, pack, true)?,
            "uint" => int_kind(name, def, pack, false)?,
            "float" => float_kind(name, def)?,
            "string" => FieldKind::Text {
                length: def
                    .length
                    .ok_or_else(|| SchemaError::MissingLength(name.to_string()))?,
                charset: def.charset.clone(),
                encoding: match def.encoding.as_deref() {
                    None => Encoding::default(),
                    Some(enc) => {
                        Encoding::parse(enc).ok_or_else(|| SchemaError::UnknownEncoding {
                            field: name.to_string(),
                            encoding: enc.to_string(),
                        })?
                    }
                },
            },
            "hex_string" => FieldKind::HexBytes {
                length_bytes: def
                    .length_bytes
                    .ok_or_else(|| SchemaError::MissingLengthBytes(name.to_string()))?,
            },
            "choice" => choice_kind(name, def)?,
            other => {
                return Err(SchemaError::UnknownKind {
                    field: name.to_string(),
                    kind: other.to_string(),
                });
            }
        };

        Ok(Field {
            name: name.to_string(),
            kind,
            pack,
            byte_order,
        })
    }

    /// Bytes this field occupies in the payload. `None` when it packs
    /// nothing (no pack code and no direct text/hex form). Text widths are
    /// nominal: the packer does not enforce the declared length.
    pub fn wire_width(&self) -> Option<usize> {
        if let Some(code) = self.pack {
            return Some(code.width());
        }
        match &self.kind {
            FieldKind::Text { length, .. } => Some(*length),
            FieldKind::HexBytes { length_bytes } => Some(*length_bytes),
            _ => None,
        }
    }
}

fn int_kind(
    name: &str,
    def: &FieldDef,
    pack: Option<PackCode>,
    signed: bool,
) -> Result<FieldKind, SchemaError> {
    // Default ranges come from the pack width; packless fields get the
    // 32-bit range.
    let default_max = match pack {
        Some(code) => {
            let bits = code.width() as u32 * 8;
            if signed {
                (1i128 << (bits - 1)) - 1
            } else {
                (1i128 << bits) - 1
            }
        }
        None if signed => (1i128 << 31) - 1,
        None => (1i128 << 32) - 1,
    };

    let min = match &def.min {
        Some(n) => int_bound(name, n)?,
        None => 0,
    };
    let max = match &def.max {
        Some(n) => int_bound(name, n)?,
        None => default_max,
    };
    if min > max {
        return Err(SchemaError::InvalidBounds {
            field: name.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }

    Ok(if signed {
        FieldKind::Int { min, max }
    } else {
        FieldKind::Uint { min, max }
    })
}

fn float_kind(name: &str, def: &FieldDef) -> Result<FieldKind, SchemaError> {
    let min = match &def.min {
        Some(n) => float_bound(name, n)?,
        None => 0.0,
    };
    let max = match &def.max {
        Some(n) => float_bound(name, n)?,
        None => 1.0,
    };
    if min > max {
        return Err(SchemaError::InvalidBounds {
            field: name.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(FieldKind::Float {
        min,
        max,
        precision: def.precision.unwrap_or(2),
    })
}

fn choice_kind(name: &str, def: &FieldDef) -> Result<FieldKind, SchemaError> {
    let values = def
        .values
        .as_ref()
        .ok_or_else(|| SchemaError::MissingChoiceValues(name.to_string()))?;
    let values = match values {
        ValuesDef::Literals(raw) => {
            let mut literals = Vec::with_capacity(raw.len());
            for literal in raw {
                literals.push(
                    Value::from_json(literal)
                        .ok_or_else(|| SchemaError::InvalidChoiceLiteral(name.to_string()))?,
                );
            }
            ChoiceValues::Literals(literals)
        }
        ValuesDef::Labels(map) => ChoiceValues::Labeled(
            map.iter()
                .map(|(label, n)| (label.clone(), number_value(n)))
                .collect(),
        ),
    };
    let empty = match &values {
        ChoiceValues::Literals(v) => v.is_empty(),
        ChoiceValues::Labeled(v) => v.is_empty(),
    };
    if empty {
        return Err(SchemaError::EmptyChoiceValues(name.to_string()));
    }
    Ok(FieldKind::Choice(values))
}

fn number_value(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i128::from(i))
    } else if let Some(u) = n.as_u64() {
        Value::Int(i128::from(u))
    } else {
        Value::Float(n.as_f64().unwrap_or_default())
    }
}

fn int_bound(name: &str, n: &serde_json::Number) -> Result<i128, SchemaError> {
    if let Some(i) = n.as_i64() {
        return Ok(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(i128::from(u));
    }
    // Fractional bounds truncate toward zero.
    match n.as_f64() {
        Some(f) if f >= i128::MIN as f64 && f <= i128::MAX as f64 => Ok(f as i128),
        _ => Err(SchemaError::InvalidBound {
            field: name.to_string(),
            bound: n.to_string(),
        }),
    }
}

fn float_bound(name: &str, n: &serde_json::Number) -> Result<f64, SchemaError> {
    match n.as_f64() {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(SchemaError::InvalidBound {
            field: name.to_string(),
            bound: n.to_string(),
        }),
    }
}
