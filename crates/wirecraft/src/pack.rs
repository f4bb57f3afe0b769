//! Payload assembly: an ordered value set becomes wire bytes.
//!
//! Packing walks the wire order and concatenates each field's bytes with no
//! padding or framing. Any failure aborts the whole payload; partial bytes
//! are never returned.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::errors::PackError;
use crate::field::{ChoiceValues, Encoding, Field, FieldKind};
use crate::packcode::{ByteOrder, PackCode};
use crate::schema::Schema;
use crate::value::{Value, ValueSet};

/// Assembled payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPayload {
    bytes: Vec<u8>,
}

impl PackedPayload {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Standard-alphabet base64, the transport form most uplink tooling
    /// expects.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl AsRef<[u8]> for PackedPayload {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Schema {
    /// Packs one value per field, in wire order. Every field must be
    /// present in `values`; extra entries are ignored.
    pub fn pack(&self, values: &ValueSet) -> Result<PackedPayload, PackError> {
        let mut bytes = Vec::with_capacity(self.nominal_len());
        for field in self.fields() {
            let value = values
                .get(&field.name)
                .ok_or_else(|| PackError::MissingValue(field.name.clone()))?;
            pack_field(field, value, &mut bytes)?;
            log::trace!("packed `{}`, payload is {} bytes", field.name, bytes.len());
        }
        Ok(PackedPayload { bytes })
    }
}

fn pack_field(field: &Field, value: &Value, out: &mut Vec<u8>) -> Result<(), PackError> {
    if let Some(code) = field.pack {
        let wire = resolve_wire_value(field, value)?;
        return pack_primitive(field, code, wire, out);
    }
    match &field.kind {
        FieldKind::Text { encoding, .. } => pack_text(field, value, *encoding, out),
        FieldKind::HexBytes { .. } => pack_hex(field, value, out),
        _ => {
            // A numeric or choice field without a pack code has no byte
            // form. The payload simply omits it, which shifts every later
            // field; schemas that hit this warning are almost always wrong.
            log::warn!(
                "field `{}` ({}) has no pack code, emitting no bytes for it",
                field.name,
                field.kind.kind_name()
            );
            Ok(())
        }
    }
}

/// For labeled choices, swaps the chosen label for its wire value. Labels
/// are text; any other value class, or a label outside the mapping, is an
/// error rather than a silent pass-through.
fn resolve_wire_value<'a>(field: &'a Field, value: &'a Value) -> Result<&'a Value, PackError> {
    let FieldKind::Choice(choice @ ChoiceValues::Labeled(_)) = &field.kind else {
        return Ok(value);
    };
    match value {
        Value::Text(label) => {
            choice
                .wire_value(label)
                .ok_or_else(|| PackError::UnknownChoiceLabel {
                    field: field.name.clone(),
                    label: label.clone(),
                })
        }
        other => Err(PackError::UnknownChoiceLabel {
            field: field.name.clone(),
            label: other.to_string(),
        }),
    }
}

fn pack_primitive(
    field: &Field,
    code: PackCode,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), PackError> {
    match code {
        PackCode::F32 => {
            let real = real_value(field, value)?;
            if real.is_finite() && real.abs() > f64::from(f32::MAX) {
                return Err(PackError::Range {
                    field: field.name.clone(),
                    value: value.to_string(),
                    width: 4,
                    class: "float",
                });
            }
            let narrowed = real as f32;
            match field.byte_order {
                ByteOrder::Big => out.extend_from_slice(&narrowed.to_be_bytes()),
                ByteOrder::Little => out.extend_from_slice(&narrowed.to_le_bytes()),
            }
            Ok(())
        }
        PackCode::F64 => {
            let real = real_value(field, value)?;
            match field.byte_order {
                ByteOrder::Big => out.extend_from_slice(&real.to_be_bytes()),
                ByteOrder::Little => out.extend_from_slice(&real.to_le_bytes()),
            }
            Ok(())
        }
        _ => match value {
            Value::Int(n) => pack_int(field, code, *n, out),
            other => Err(PackError::WrongType {
                field: field.name.clone(),
                expected: "integer",
                found: other.class(),
            }),
        },
    }
}

fn real_value(field: &Field, value: &Value) -> Result<f64, PackError> {
    match value {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(x) => Ok(*x),
        Value::Text(_) => Err(PackError::WrongType {
            field: field.name.clone(),
            expected: "numeric",
            found: value.class(),
        }),
    }
}

fn pack_int(field: &Field, code: PackCode, value: i128, out: &mut Vec<u8>) -> Result<(), PackError> {
    let width = code.width();
    let bits = width as u32 * 8;
    let (lo, hi) = if code.is_signed() {
        (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
    } else {
        (0, (1i128 << bits) - 1)
    };
    if value < lo || value > hi {
        return Err(PackError::Range {
            field: field.name.clone(),
            value: value.to_string(),
            width,
            class: if code.is_signed() {
                "signed integer"
            } else {
                "unsigned integer"
            },
        });
    }
    // Range-checked above, so the low `width` bytes of the two's-complement
    // form are the exact encoding.
    let raw = value as u64;
    match field.byte_order {
        ByteOrder::Big => out.extend_from_slice(&raw.to_be_bytes()[8 - width..]),
        ByteOrder::Little => out.extend_from_slice(&raw.to_le_bytes()[..width]),
    }
    Ok(())
}

fn pack_text(
    field: &Field,
    value: &Value,
    encoding: Encoding,
    out: &mut Vec<u8>,
) -> Result<(), PackError> {
    // Non-text values take their decimal text form. The declared length is
    // not enforced here; the wire carries whatever the text encodes to.
    let text = value.to_string();
    match encoding {
        Encoding::Utf8 => out.extend_from_slice(text.as_bytes()),
        Encoding::Ascii => {
            if !text.is_ascii() {
                return Err(PackError::Unencodable {
                    field: field.name.clone(),
                    encoding: encoding.name(),
                });
            }
            out.extend_from_slice(text.as_bytes());
        }
        Encoding::Latin1 => {
            if text.chars().any(|ch| ch as u32 > 0xFF) {
                return Err(PackError::Unencodable {
                    field: field.name.clone(),
                    encoding: encoding.name(),
                });
            }
            out.extend(text.chars().map(|ch| (ch as u32) as u8));
        }
    }
    Ok(())
}

fn pack_hex(field: &Field, value: &Value, out: &mut Vec<u8>) -> Result<(), PackError> {
    let text = value.to_string();
    let decoded = hex::decode(text.trim()).map_err(|source| PackError::HexDecode {
        field: field.name.clone(),
        source,
    })?;
    out.extend_from_slice(&decoded);
    Ok(())
}
