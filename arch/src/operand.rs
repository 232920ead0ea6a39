use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Operand tokens with a fixed name in the EC16 ISA. These names are
/// reserved: they can never be used as labels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Named {
    A,
    C,
    Ie,
    Int,
    Status,
    Flags,
    Imask,
    Sp,
}

impl Named {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }
}

/// Operand class of one instruction-definition slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Class {
    /// Slot is unused.
    None,
    /// Signed 8-bit branch displacement, encoded into the opcode low byte.
    S8,
    /// Unsigned 8-bit immediate, encoded into the opcode low byte.
    U8,
    /// Unsigned 16-bit immediate or address, emitted as a trailing word.
    U16,
    Named(Named),
}

impl Class {
    /// Classes that take a numeric literal or label reference.
    pub fn is_value(&self) -> bool {
        matches!(self, Class::S8 | Class::U8 | Class::U16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named() {
        assert_eq!(Named::parse("a"), Some(Named::A));
        assert_eq!(Named::parse("sp"), Some(Named::Sp));
        assert_eq!(Named::parse("imask"), Some(Named::Imask));
        assert_eq!(Named::parse("hoge"), None);
        assert_eq!(Named::parse(""), None);
    }

    #[test]
    fn display_lowercase() {
        assert_eq!(Named::Status.to_string(), "status");
        assert_eq!(Named::Ie.to_string(), "ie");
    }
}
