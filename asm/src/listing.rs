use crate::linker::Resolved;
use crate::source::Source;
use crate::symbol::Symbols;

const GUTTER: usize = 24;

/// Annotated listing: every source line prefixed with the address and words
/// it assembled to, followed by the label table.
pub fn annotate(source: &Source, records: &[Resolved], symbols: &Symbols) -> String {
    let mut out = String::new();
    let mut records = records.iter().peekable();
    for (idx, line) in source.lines() {
        let prefix = match records.next_if(|r| record_line(r) == idx) {
            Some(record) => format_record(record),
            None => " ".repeat(GUTTER),
        };
        out.push_str(&prefix);
        out.push_str(line);
        out.push('\n');
    }

    out.push_str("\n\nList of labels\n\n");
    for (name, sym) in symbols.iter() {
        let value = match sym.value {
            Some(v) => format!("{} | 0x{:04X}", v, v),
            None => "undefined".to_string(),
        };
        out.push_str(&format!("Line {}  {} {}\n", sym.line + 1, name, value));
    }
    out
}

fn record_line(record: &Resolved) -> usize {
    match record {
        Resolved::Inst { line, .. }
        | Resolved::Words { line, .. }
        | Resolved::Reserve { line, .. } => *line,
    }
}

fn format_record(record: &Resolved) -> String {
    let text = match record {
        Resolved::Inst {
            addr, opcode, word, ..
        } => {
            let word_part = match word {
                Some(w) => format!("0x{:04X}", w),
                None => String::new(),
            };
            format!("0x{:04X}  0x{:04X}  {}", addr, opcode, word_part)
        }
        Resolved::Words { addr, words, .. } => {
            let mut s = format!("0x{:04X}", addr);
            for w in words {
                s.push_str(&format!("  0x{:04X}", w));
            }
            s.push_str(" | ");
            s
        }
        Resolved::Reserve { .. } => String::new(),
    };
    format!("{:<GUTTER$}", text)
}
