use crate::operand::{Class, Named};
use once_cell::sync::Lazy;
use std::collections::HashMap;

// ----------------------------------------------------------------------------
// Instruction definitions

/// One legal (mnemonic, operand, operand) combination with its base opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstDef {
    pub mnemonic: &'static str,
    pub arg1: Class,
    pub arg2: Class,
    pub opcode: u16,
}

const fn def(mnemonic: &'static str, arg1: Class, arg2: Class, opcode: u16) -> InstDef {
    InstDef {
        mnemonic,
        arg1,
        arg2,
        opcode,
    }
}

const NONE: Class = Class::None;
const S8: Class = Class::S8;
const U8: Class = Class::U8;
const U16: Class = Class::U16;
const A: Class = Class::Named(Named::A);
const C: Class = Class::Named(Named::C);
const IE: Class = Class::Named(Named::Ie);
const INT: Class = Class::Named(Named::Int);
const STATUS: Class = Class::Named(Named::Status);
const FLAGS: Class = Class::Named(Named::Flags);
const IMASK: Class = Class::Named(Named::Imask);
const SP: Class = Class::Named(Named::Sp);

/// The full EC16 instruction set. Order matters: mnemonic indices and the
/// per-slot named-operand indices used by the fingerprint derive from first
/// appearance in this table.
pub const INSTRUCTIONS: &[InstDef] = &[
    def("add", A, U8, 0x4300),
    def("addc", A, U8, 0x4100),
    def("and", A, U8, 0x4C00),
    def("brcc", S8, NONE, 0xC000),
    def("brcs", S8, NONE, 0xC400),
    def("brnc", S8, NONE, 0xC200),
    def("brns", S8, NONE, 0xC600),
    def("broc", S8, NONE, 0xC100),
    def("bros", S8, NONE, 0xC500),
    def("brzc", S8, NONE, 0xC300),
    def("brzs", S8, NONE, 0xC700),
    def("calld", U16, NONE, 0xA100),
    def("calli", U8, NONE, 0xA300),
    def("clr", C, NONE, 0x1000),
    def("clr", IE, NONE, 0x0200),
    def("clr", INT, NONE, 0x0400),
    def("cmp", A, U8, 0x4400),
    def("dec", U8, NONE, 0x4600),
    def("inc", U8, NONE, 0x4700),
    def("jmpd", U16, NONE, 0xA000),
    def("jmpi", U8, NONE, 0xA200),
    def("mov", U8, A, 0x1600),
    def("mov", A, U8, 0x5000),
    def("mov", A, STATUS, 0x1400),
    def("mov", FLAGS, A, 0x1200),
    def("mov", IMASK, A, 0x0500),
    def("mov", SP, A, 0x1300),
    def("load", U8, U16, 0x6100),
    def("load", A, U16, 0x6000),
    def("movi", U8, A, 0x5200),
    def("movi", A, U8, 0x8000),
    def("movxi", U8, A, 0x8200),
    def("movxi", A, U8, 0x8300),
    def("nop", NONE, NONE, 0x0000),
    def("not", A, NONE, 0x2F00),
    def("or", A, U8, 0x4D00),
    def("pop", A, NONE, 0x5100),
    def("push", A, NONE, 0x1500),
    def("reti", NONE, NONE, 0x8500),
    def("rets", NONE, NONE, 0x8400),
    def("rol", A, NONE, 0x2800),
    def("ror", A, NONE, 0x2900),
    def("set", C, NONE, 0x1100),
    def("set", IE, NONE, 0x0300),
    def("shl", A, NONE, 0x2A00),
    def("shr", A, NONE, 0x2B00),
    def("sub", A, U8, 0x4200),
    def("subb", A, U8, 0x4000),
    def("swap", A, NONE, 0x2500),
    def("xor", A, U8, 0x4E00),
];

// ----------------------------------------------------------------------------
// Fingerprint matching

/// How one statement operand presents to the matcher. Numeric literals and
/// label references are indistinguishable here: both mean "some 16-bit value
/// known at link time".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Empty,
    Value,
    Named(Named),
}

impl Shape {
    /// Classify one textual operand token.
    pub fn of(token: Option<&str>) -> Shape {
        match token {
            None => Shape::Empty,
            Some(t) => match Named::parse(t) {
                Some(n) => Shape::Named(n),
                None => Shape::Value,
            },
        }
    }

    /// The shape a definition slot expects.
    pub fn of_class(class: &Class) -> Shape {
        match class {
            Class::None => Shape::Empty,
            Class::S8 | Class::U8 | Class::U16 => Shape::Value,
            Class::Named(n) => Shape::Named(*n),
        }
    }
}

/// The instruction catalogue keyed by fingerprint. Built once, immutable
/// afterwards. The duplicate-fingerprint check at build time guarantees that
/// any parseable statement matches at most one definition.
pub struct Table {
    mnemonics: Vec<&'static str>,
    named1: Vec<Named>,
    named2: Vec<Named>,
    by_fp: HashMap<u32, &'static InstDef>,
}

pub static TABLE: Lazy<Table> = Lazy::new(Table::build);

impl Table {
    fn build() -> Self {
        let mut mnemonics: Vec<&'static str> = Vec::new();
        let mut named1 = Vec::new();
        let mut named2 = Vec::new();
        for def in INSTRUCTIONS {
            if !mnemonics.contains(&def.mnemonic) {
                mnemonics.push(def.mnemonic);
            }
            if let Class::Named(n) = def.arg1 {
                if !named1.contains(&n) {
                    named1.push(n);
                }
            }
            if let Class::Named(n) = def.arg2 {
                if !named2.contains(&n) {
                    named2.push(n);
                }
            }
        }

        let mut table = Table {
            mnemonics,
            named1,
            named2,
            by_fp: HashMap::new(),
        };
        for def in INSTRUCTIONS {
            let fp = table
                .fingerprint(
                    def.mnemonic,
                    &Shape::of_class(&def.arg1),
                    &Shape::of_class(&def.arg2),
                )
                .expect("table entry must produce a fingerprint");
            if let Some(prev) = table.by_fp.insert(fp, def) {
                panic!(
                    "instruction table is equivocal: {:?} and {:?} share fingerprint {:#x}",
                    prev, def, fp
                );
            }
        }
        table
    }

    /// `mnemonic_index * 65536 + code(arg1) * 256 + code(arg2)`, with slot
    /// codes 0 for empty, 1 for any value, `2 + slot index` for named
    /// operands. None when the mnemonic is unknown or a named operand never
    /// occurs in that slot.
    pub fn fingerprint(&self, mnemonic: &str, arg1: &Shape, arg2: &Shape) -> Option<u32> {
        let m = self.mnemonics.iter().position(|s| *s == mnemonic)? as u32;
        let c1 = slot_code(&self.named1, arg1)?;
        let c2 = slot_code(&self.named2, arg2)?;
        Some(m * 65536 + c1 * 256 + c2)
    }

    pub fn lookup(&self, fp: u32) -> Option<&'static InstDef> {
        self.by_fp.get(&fp).copied()
    }

    pub fn is_mnemonic(&self, s: &str) -> bool {
        self.mnemonics.contains(&s)
    }
}

fn slot_code(named: &[Named], shape: &Shape) -> Option<u32> {
    match shape {
        Shape::Empty => Some(0),
        Shape::Value => Some(1),
        Shape::Named(n) => named.iter().position(|x| x == n).map(|i| i as u32 + 2),
    }
}
