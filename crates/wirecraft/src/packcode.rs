//! Fixed-width primitive selectors shared by the packer and the decoder
//! generator. Keeping a single width table is what guarantees the two
//! consumers can never disagree about byte layout.

/// Identifies one fixed-width binary primitive encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackCode {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl PackCode {
    /// Maps a schema document code to a selector. Codes are the
    /// struct-style single characters; `i`/`l` and `I`/`L` both select the
    /// standard 4-byte form. Anything else, including prefixed or counted
    /// codes, is unrecognized.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "b" => Some(PackCode::I8),
            "B" => Some(PackCode::U8),
            "h" => Some(PackCode::I16),
            "H" => Some(PackCode::U16),
            "i" | "l" => Some(PackCode::I32),
            "I" | "L" => Some(PackCode::U32),
            "q" => Some(PackCode::I64),
            "Q" => Some(PackCode::U64),
            "f" => Some(PackCode::F32),
            "d" => Some(PackCode::F64),
            _ => None,
        }
    }

    /// Encoded width in bytes.
    pub fn width(self) -> usize {
        match self {
            PackCode::I8 | PackCode::U8 => 1,
            PackCode::I16 | PackCode::U16 => 2,
            PackCode::I32 | PackCode::U32 | PackCode::F32 => 4,
            PackCode::I64 | PackCode::U64 | PackCode::F64 => 8,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            PackCode::I8 | PackCode::I16 | PackCode::I32 | PackCode::I64
        )
    }
}

/// Byte order for multi-byte primitives; irrelevant at width 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Big,
    Little,
}
