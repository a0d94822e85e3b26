//! Typed numeric literal values

use std::fmt::{Display, Formatter};

/// The type selected by a numeric literal's suffix
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, derive_more::Display)]
pub enum NumberKind {
    #[display(fmt = "i8")]
    I8,
    #[display(fmt = "i16")]
    I16,
    #[display(fmt = "i32")]
    I32,
    #[display(fmt = "i64")]
    I64,
    #[display(fmt = "u8")]
    U8,
    #[display(fmt = "u16")]
    U16,
    #[display(fmt = "u32")]
    U32,
    #[display(fmt = "u64")]
    U64,
    #[display(fmt = "f32")]
    F32,
    #[display(fmt = "f64")]
    F64,
}

impl NumberKind {
    /// Gets the integer kind for a size suffix character (`s`, `S`, `l`, `L`, or none)
    pub fn from_suffix(suffix: Option<char>, unsigned: bool) -> Option<Self> {
        let kind = match (suffix, unsigned) {
            (Some('s'), false) => NumberKind::I8,
            (Some('s'), true) => NumberKind::U8,
            (Some('S'), false) => NumberKind::I16,
            (Some('S'), true) => NumberKind::U16,
            (Some('l') | None, false) => NumberKind::I32,
            (Some('l') | None, true) => NumberKind::U32,
            (Some('L'), false) => NumberKind::I64,
            (Some('L'), true) => NumberKind::U64,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, NumberKind::F32 | NumberKind::F64)
    }
}

/// A numeric literal value
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Number {
    /// Converts the 64 accumulated bits of an integer literal into `kind`, truncating the same
    /// way a two's complement cast does.
    pub fn from_bits(bits: u64, kind: NumberKind) -> Self {
        match kind {
            NumberKind::I8 => Number::I8(bits as i8),
            NumberKind::I16 => Number::I16(bits as i16),
            NumberKind::I32 => Number::I32(bits as i32),
            NumberKind::I64 => Number::I64(bits as i64),
            NumberKind::U8 => Number::U8(bits as u8),
            NumberKind::U16 => Number::U16(bits as u16),
            NumberKind::U32 => Number::U32(bits as u32),
            NumberKind::U64 => Number::U64(bits),
            NumberKind::F32 => Number::F32(bits as f32),
            NumberKind::F64 => Number::F64(bits as f64),
        }
    }

    pub fn kind(&self) -> NumberKind {
        match self {
            Number::I8(_) => NumberKind::I8,
            Number::I16(_) => NumberKind::I16,
            Number::I32(_) => NumberKind::I32,
            Number::I64(_) => NumberKind::I64,
            Number::U8(_) => NumberKind::U8,
            Number::U16(_) => NumberKind::U16,
            Number::U32(_) => NumberKind::U32,
            Number::U64(_) => NumberKind::U64,
            Number::F32(_) => NumberKind::F32,
            Number::F64(_) => NumberKind::F64,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I8(v) => write!(f, "{v}"),
            Number::I16(v) => write!(f, "{v}"),
            Number::I32(v) => write!(f, "{v}"),
            Number::I64(v) => write!(f, "{v}"),
            Number::U8(v) => write!(f, "{v}"),
            Number::U16(v) => write!(f, "{v}"),
            Number::U32(v) => write!(f, "{v}"),
            Number::U64(v) => write!(f, "{v}"),
            Number::F32(v) => write!(f, "{v}"),
            Number::F64(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_suffixes() {
        assert_eq!(NumberKind::from_suffix(None, false), Some(NumberKind::I32));
        assert_eq!(NumberKind::from_suffix(Some('s'), true), Some(NumberKind::U8));
        assert_eq!(NumberKind::from_suffix(Some('S'), false), Some(NumberKind::I16));
        assert_eq!(NumberKind::from_suffix(Some('L'), true), Some(NumberKind::U64));
        assert_eq!(NumberKind::from_suffix(Some('x'), false), None);
    }

    #[test]
    fn test_truncation() {
        assert_eq!(Number::from_bits(300, NumberKind::U8), Number::U8(44));
        assert_eq!(Number::from_bits(255, NumberKind::I8), Number::I8(-1));
        assert_eq!(Number::from_bits(26, NumberKind::I32).to_string(), "26");
    }
}
