use crate::directive::Directive;
use crate::source::Source;
use color_print::cprintln;
use std::io;

/// Everything that can go wrong while assembling.
#[derive(thiserror::Error, Debug)]
pub enum ErrorKind {
    #[error("unknown instruction")]
    UnknownInstruction,
    #[error("mnemonic or directive expected")]
    ExpectedMnemonic,
    #[error("label `{0}` is not defined")]
    UndefinedLabel(String),
    #[error("label `{0}` has to be defined before usage")]
    UnresolvedLabel(String),
    #[error("label `{0}` is already defined")]
    DuplicateLabel(String),
    #[error("`{0}` is not a valid label")]
    InvalidLabel(String),
    #[error("label without instruction or directive")]
    OrphanedLabel,
    #[error("`{0}` is a reserved name")]
    ReservedLabel(String),
    #[error("`{0}` takes exactly one value")]
    DirectiveArity(Directive),
    #[error("`equ` requires a label")]
    MissingLabel,
    #[error("`{0}` is not a value")]
    ExpectedValue(String),
    #[error("value {value} out of range, must be 0..{max}")]
    ValueOutOfRange { value: i64, max: u32 },
    #[error("argument too big, must be 0..255")]
    ArgumentTooBig,
    #[error("destination out of reach (-127..+128)")]
    BranchOutOfReach,
    #[error("cannot move back from 0x{current:04x} to 0x{target:04x}")]
    AddressRegression { current: u32, target: u16 },
    #[error("internal memory exhausted (256 bytes)")]
    IntmemOverflow,
    #[error("external memory exhausted (65536 words)")]
    ExtmemOverflow,
    #[error("`{0}` is not a valid argument")]
    InvalidArgument(String),
    #[error("`include` requires a file name")]
    IncludeSyntax,
    #[error("cannot open `{0}`")]
    FileOpen(String, #[source] io::Error),
    #[error("cannot write `{0}`")]
    FileWrite(String, #[source] io::Error),
}

impl ErrorKind {
    pub fn at(self, line: usize) -> Error {
        Error {
            kind: self,
            line: Some(line),
        }
    }

    pub fn bare(self) -> Error {
        Error {
            kind: self,
            line: None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    pub line: Option<usize>,
}

impl Error {
    /// Print a compiler-style diagnostic with the offending source line.
    pub fn print_diag(&self, source: Option<&Source>) {
        cprintln!("<red,bold>error</>: {}", self.kind);
        let (Some(idx), Some(source)) = (self.line, source) else {
            return;
        };
        let Some(text) = source.line(idx) else {
            return;
        };
        cprintln!(
            "     <blue>--></> <underline>{}:{}</>",
            source.path().display(),
            idx + 1
        );
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", idx + 1, text);
        cprintln!("      <blue>|</>");
    }
}
