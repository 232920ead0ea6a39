//! Two-pass assembler for the EC16 ISA.

pub mod directive;
pub mod encoder;
pub mod error;
pub mod image;
pub mod linker;
pub mod listing;
pub mod parser;
pub mod source;
pub mod symbol;
