pub mod inst;
pub mod operand;
