//! # wirecraft
//!
//! Schema-driven packing of fixed-layout binary payloads.
//!
//! A JSON schema names fields in wire order and describes each one: kind,
//! primitive pack code, byte order, bounds or alphabet. From that single
//! document the crate packs value sets into bytes, synthesizes plausible
//! test values, and generates the JavaScript `decodeUplink` source that
//! reads those payloads back on the receiving side.
//!
//! ## Example
//!
//! ```
//! use wirecraft::schema::Schema;
//! use wirecraft::value::{Value, ValueSet};
//!
//! let schema = Schema::load(r#"{
//!     "_field_order": ["id", "temp"],
//!     "fields": {
//!         "id": { "type": "uint", "packer": "B" },
//!         "temp": { "type": "int", "packer": "h", "byte_order": "big" }
//!     }
//! }"#).unwrap();
//!
//! let values = ValueSet::from([
//!     ("id".to_string(), Value::Int(5)),
//!     ("temp".to_string(), Value::Int(-10)),
//! ]);
//! let payload = schema.pack(&values).unwrap();
//! assert_eq!(payload.bytes(), [0x05, 0xff, 0xf6]);
//! ```

pub mod decoder;
pub mod defs;
pub mod errors;
pub mod field;
pub mod generate;
pub mod pack;
pub mod packcode;
pub mod schema;
pub mod value;
