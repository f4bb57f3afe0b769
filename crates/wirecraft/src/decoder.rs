//! JavaScript decoder generation.
//!
//! Emits the source of a `decodeUplink(input)` function that reverses the
//! packer for a given schema: same field order, same widths, same byte
//! order. Two dialects are supported; both return the identical
//! `{ data, warnings, errors }` record so the consuming pipeline never has
//! to care which one it loaded.

use crate::field::{Field, FieldKind};
use crate::packcode::{ByteOrder, PackCode};
use crate::schema::Schema;

/// Target dialect for the generated decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsFlavor {
    /// Modern runtimes: `DataView` reads, 64-bit fields through `BigInt`.
    #[default]
    DataView,
    /// Legacy scripting sandboxes with neither `DataView` nor `BigInt`:
    /// plain byte arithmetic, 64-bit fields via manual long division.
    Es5,
}

/// Generates decoder source for a validated schema.
///
/// Fields without a pack code and without a direct byte form appear only
/// as a comment, mirroring the packer, which emits no bytes for them.
/// Eight-byte integers always decode to decimal strings: a JavaScript
/// number cannot carry the full 64-bit range.
pub fn generate(schema: &Schema, flavor: JsFlavor) -> String {
    let mut out = String::new();
    Helpers::collect(schema, flavor).emit(&mut out);

    out.push_str("function decodeUplink(input) {\n");
    out.push_str("  var data = {};\n");
    out.push_str("  var offset = 0;\n");
    match flavor {
        JsFlavor::DataView => {
            out.push_str("  var buffer = Uint8Array.from(input.bytes).buffer;\n");
            out.push_str("  var view = new DataView(buffer);\n");
        }
        JsFlavor::Es5 => out.push_str("  var bytes = input.bytes;\n"),
    }

    for field in schema.fields() {
        out.push('\n');
        emit_field(&mut out, field, flavor);
    }

    out.push_str("\n  return {\n    data: data,\n    warnings: [],\n    errors: []\n  };\n}\n");
    out
}

/// Which helper functions the emitted source needs. Each one is emitted at
/// most once, ahead of `decodeUplink`, in dependency order.
#[derive(Default)]
struct Helpers {
    bytes_to_string: bool,
    read_uint: bool,
    read_int: bool,
    read_f32: bool,
    read_f64: bool,
    u64_to_string: bool,
    read_u64: bool,
    read_i64: bool,
}

impl Helpers {
    fn collect(schema: &Schema, flavor: JsFlavor) -> Self {
        let mut helpers = Helpers::default();
        for field in schema.fields() {
            if let Some(code) = field.pack {
                if flavor == JsFlavor::Es5 {
                    helpers.primitive(code);
                }
            } else if matches!(field.kind, FieldKind::Text { .. }) {
                helpers.bytes_to_string = true;
            }
        }
        helpers
    }

    fn primitive(&mut self, code: PackCode) {
        match code {
            PackCode::U8 | PackCode::U16 | PackCode::U32 => self.read_uint = true,
            PackCode::I8 | PackCode::I16 | PackCode::I32 => {
                self.read_uint = true;
                self.read_int = true;
            }
            PackCode::F32 => {
                self.read_uint = true;
                self.read_f32 = true;
            }
            PackCode::F64 => self.read_f64 = true,
            PackCode::U64 => {
                self.read_uint = true;
                self.u64_to_string = true;
                self.read_u64 = true;
            }
            PackCode::I64 => {
                self.read_uint = true;
                self.u64_to_string = true;
                self.read_i64 = true;
            }
        }
    }

    fn emit(&self, out: &mut String) {
        let sources = [
            (self.bytes_to_string, JS_BYTES_TO_STRING),
            (self.read_uint, JS_READ_UINT),
            (self.read_int, JS_READ_INT),
            (self.read_f32, JS_READ_FLOAT32),
            (self.read_f64, JS_READ_FLOAT64),
            (self.u64_to_string, JS_U64_TO_STRING),
            (self.read_u64, JS_READ_UINT64),
            (self.read_i64, JS_READ_INT64),
        ];
        for (needed, source) in sources {
            if needed {
                out.push_str(source);
                out.push('\n');
            }
        }
    }
}

fn emit_field(out: &mut String, field: &Field, flavor: JsFlavor) {
    let slice_source = match flavor {
        JsFlavor::DataView => "input.bytes",
        JsFlavor::Es5 => "bytes",
    };

    if let Some(code) = field.pack {
        let width = code.width();
        out.push_str(&format!(
            "  // {}: {}, {}{}\n",
            field.name,
            field.kind.kind_name(),
            byte_count(width),
            endian_note(field, width)
        ));
        out.push_str(&format!(
            "  data.{} = {};\n",
            field.name,
            primitive_read(field, code, flavor)
        ));
        out.push_str(&format!("  offset += {width};\n"));
        return;
    }

    match &field.kind {
        FieldKind::Text { length, .. } => {
            out.push_str(&format!(
                "  // {}: string, {}\n",
                field.name,
                byte_count(*length)
            ));
            out.push_str(&format!(
                "  data.{} = bytesToString({}.slice(offset, offset + {}));\n",
                field.name, slice_source, length
            ));
            out.push_str(&format!("  offset += {length};\n"));
        }
        FieldKind::HexBytes { length_bytes } => {
            out.push_str(&format!(
                "  // {}: hex_string, {}\n",
                field.name,
                byte_count(*length_bytes)
            ));
            out.push_str("  // raw byte slice; hex text is an encode-time form only\n");
            out.push_str(&format!(
                "  data.{}_bytes = {}.slice(offset, offset + {});\n",
                field.name, slice_source, length_bytes
            ));
            out.push_str(&format!("  offset += {length_bytes};\n"));
        }
        _ => {
            out.push_str(&format!(
                "  // {}: {}, no pack code, not present in the payload\n",
                field.name,
                field.kind.kind_name()
            ));
        }
    }
}

fn byte_count(width: usize) -> String {
    if width == 1 {
        "1 byte".to_string()
    } else {
        format!("{width} bytes")
    }
}

fn endian_note(field: &Field, width: usize) -> &'static str {
    if width == 1 {
        return "";
    }
    match field.byte_order {
        ByteOrder::Big => ", big-endian",
        ByteOrder::Little => ", little-endian",
    }
}

fn primitive_read(field: &Field, code: PackCode, flavor: JsFlavor) -> String {
    let little = field.byte_order == ByteOrder::Little;
    match flavor {
        JsFlavor::DataView => {
            let method = data_view_method(code);
            if code.width() == 1 {
                format!("view.{method}(offset)")
            } else if matches!(code, PackCode::I64 | PackCode::U64) {
                format!("view.{method}(offset, {little}).toString()")
            } else {
                format!("view.{method}(offset, {little})")
            }
        }
        JsFlavor::Es5 => match code {
            PackCode::U8 | PackCode::U16 | PackCode::U32 => {
                format!("readUInt(bytes, offset, {}, {little})", code.width())
            }
            PackCode::I8 | PackCode::I16 | PackCode::I32 => {
                format!("readInt(bytes, offset, {}, {little})", code.width())
            }
            PackCode::U64 => format!("readUInt64(bytes, offset, {little})"),
            PackCode::I64 => format!("readInt64(bytes, offset, {little})"),
            PackCode::F32 => format!("readFloat32(bytes, offset, {little})"),
            PackCode::F64 => format!("readFloat64(bytes, offset, {little})"),
        },
    }
}

fn data_view_method(code: PackCode) -> &'static str {
    match code {
        PackCode::I8 => "getInt8",
        PackCode::U8 => "getUint8",
        PackCode::I16 => "getInt16",
        PackCode::U16 => "getUint16",
        PackCode::I32 => "getInt32",
        PackCode::U32 => "getUint32",
        PackCode::I64 => "getBigInt64",
        PackCode::U64 => "getBigUint64",
        PackCode::F32 => "getFloat32",
        PackCode::F64 => "getFloat64",
    }
}

const JS_BYTES_TO_STRING: &str = "function bytesToString(bytes) {
  var out = '';
  for (var i = 0; i < bytes.length; i++) {
    out += String.fromCharCode(bytes[i]);
  }
  return out;
}
";

const JS_READ_UINT: &str = "function readUInt(bytes, offset, len, littleEndian) {
  var value = 0;
  for (var i = 0; i < len; i++) {
    value = value * 256 + bytes[littleEndian ? offset + len - 1 - i : offset + i];
  }
  return value;
}
";

const JS_READ_INT: &str = "function readInt(bytes, offset, len, littleEndian) {
  var value = readUInt(bytes, offset, len, littleEndian);
  var limit = Math.pow(2, len * 8 - 1);
  return value >= limit ? value - limit * 2 : value;
}
";

const JS_READ_FLOAT32: &str = "function readFloat32(bytes, offset, littleEndian) {
  var bits = readUInt(bytes, offset, 4, littleEndian);
  var sign = bits >= 2147483648 ? -1 : 1;
  var exponent = Math.floor(bits / 8388608) % 256;
  var mantissa = bits % 8388608;
  if (exponent === 255) {
    return mantissa === 0 ? sign * Infinity : NaN;
  }
  if (exponent === 0) {
    return sign * mantissa * Math.pow(2, -149);
  }
  return sign * (mantissa + 8388608) * Math.pow(2, exponent - 150);
}
";

const JS_READ_FLOAT64: &str = "function readFloat64(bytes, offset, littleEndian) {
  var b = [];
  for (var i = 0; i < 8; i++) {
    b.push(bytes[littleEndian ? offset + 7 - i : offset + i]);
  }
  var sign = b[0] >= 128 ? -1 : 1;
  var exponent = (b[0] % 128) * 16 + Math.floor(b[1] / 16);
  var mantissa = b[1] % 16;
  for (var j = 2; j < 8; j++) {
    mantissa = mantissa * 256 + b[j];
  }
  if (exponent === 2047) {
    return mantissa === 0 ? sign * Infinity : NaN;
  }
  if (exponent === 0) {
    return sign * mantissa * Math.pow(2, -1074);
  }
  return sign * (mantissa + 4503599627370496) * Math.pow(2, exponent - 1075);
}
";

const JS_U64_TO_STRING: &str = "function u64ToString(hi, lo) {
  var out = '';
  while (hi !== 0 || lo !== 0) {
    var rest = hi % 10;
    hi = (hi - rest) / 10;
    var current = rest * 4294967296 + lo;
    lo = Math.floor(current / 10);
    out = String(current % 10) + out;
  }
  return out === '' ? '0' : out;
}
";

const JS_READ_UINT64: &str = "function readUInt64(bytes, offset, littleEndian) {
  var hi = readUInt(bytes, littleEndian ? offset + 4 : offset, 4, littleEndian);
  var lo = readUInt(bytes, littleEndian ? offset : offset + 4, 4, littleEndian);
  return u64ToString(hi, lo);
}
";

const JS_READ_INT64: &str = "function readInt64(bytes, offset, littleEndian) {
  var hi = readUInt(bytes, littleEndian ? offset + 4 : offset, 4, littleEndian);
  var lo = readUInt(bytes, littleEndian ? offset : offset + 4, 4, littleEndian);
  if (hi < 2147483648) {
    return u64ToString(hi, lo);
  }
  lo = lo === 0 ? 0 : 4294967296 - lo;
  hi = 4294967295 - hi + (lo === 0 ? 1 : 0);
  return '-' + u64ToString(hi, lo);
}
";
