use crate::encoder::{LowByte, Operand, Record};
use crate::error::{Error, ErrorKind};
use crate::symbol::Symbols;

/// A record with every label substituted and every opcode final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Inst {
        line: usize,
        addr: u16,
        opcode: u16,
        word: Option<u16>,
    },
    Words {
        line: usize,
        addr: u16,
        words: Vec<u16>,
    },
    Reserve {
        line: usize,
        addr: u16,
        len: u16,
    },
}

/// Third pass. Every label is defined by now (or never will be), so all
/// operands collapse to numbers and the branch and immediate range checks
/// become decidable.
pub fn link(symbols: &Symbols, records: Vec<Record>) -> Result<Vec<Resolved>, Error> {
    records
        .into_iter()
        .map(|record| link_record(symbols, record))
        .collect()
}

fn link_record(symbols: &Symbols, record: Record) -> Result<Resolved, Error> {
    match record {
        Record::Inst {
            line,
            addr,
            base,
            low,
            word,
        } => {
            let low_value = match low {
                Some((kind, operand)) => {
                    let value = resolve(symbols, operand).map_err(|e| e.at(line))?;
                    low_byte(kind, addr, value).map_err(|e| e.at(line))?
                }
                None => 0,
            };
            let word = match word {
                Some(operand) => Some(resolve(symbols, operand).map_err(|e| e.at(line))?),
                None => None,
            };
            Ok(Resolved::Inst {
                line,
                addr,
                opcode: base + low_value,
                word,
            })
        }
        Record::Words { line, addr, words } => {
            let words = words
                .into_iter()
                .map(|operand| resolve(symbols, operand).map_err(|e| e.at(line)))
                .collect::<Result<Vec<u16>, Error>>()?;
            Ok(Resolved::Words { line, addr, words })
        }
        Record::Reserve { line, addr, len } => Ok(Resolved::Reserve { line, addr, len }),
    }
}

fn resolve(symbols: &Symbols, operand: Operand) -> Result<u16, ErrorKind> {
    match operand {
        Operand::Literal(value) => Ok(value),
        Operand::Label(name) => symbols
            .value(&name)
            .ok_or(ErrorKind::UndefinedLabel(name)),
    }
}

/// U8 immediates go into the low byte unchanged; S8 branch displacements are
/// relative to the word after the instruction, stored two's-complement.
fn low_byte(kind: LowByte, addr: u16, value: u16) -> Result<u16, ErrorKind> {
    match kind {
        LowByte::U8 => {
            if value > 255 {
                return Err(ErrorKind::ArgumentTooBig);
            }
            Ok(value)
        }
        LowByte::S8 => {
            let offset = i32::from(value) - i32::from(addr) - 1;
            if !(-127..=128).contains(&offset) {
                return Err(ErrorKind::BranchOutOfReach);
            }
            let encoded = if offset < 0 { 256 + offset } else { offset };
            Ok(encoded as u16)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_displacement_encoding() {
        // backward to self-1: offset -2
        assert_eq!(low_byte(LowByte::S8, 1, 0).unwrap(), 0xFE);
        // forward by one word: offset 0
        assert_eq!(low_byte(LowByte::S8, 5, 6).unwrap(), 0x00);
        // extremes of the window
        assert_eq!(low_byte(LowByte::S8, 200, 74).unwrap(), 0x81);
        assert_eq!(low_byte(LowByte::S8, 0, 129).unwrap(), 0x80);
        assert!(matches!(
            low_byte(LowByte::S8, 200, 73),
            Err(ErrorKind::BranchOutOfReach)
        ));
        assert!(matches!(
            low_byte(LowByte::S8, 0, 130),
            Err(ErrorKind::BranchOutOfReach)
        ));
    }

    #[test]
    fn u8_immediates() {
        assert_eq!(low_byte(LowByte::U8, 0, 255).unwrap(), 255);
        assert!(matches!(
            low_byte(LowByte::U8, 0, 256),
            Err(ErrorKind::ArgumentTooBig)
        ));
    }
}
