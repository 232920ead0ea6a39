use crate::directive::Directive;
use crate::error::{Error, ErrorKind};
use crate::source::{strip_comment, Source};
use crate::symbol::Symbols;
use arch::inst::TABLE;
use arch::operand::Named;

/// One statement: an optional label, a mnemonic or directive, and its
/// operand tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub line: usize,
    pub label: Option<String>,
    pub head: String,
    pub args: Vec<String>,
}

/// First pass. Tokenizes every line, peels off labels and declares them in
/// the symbol table so later passes can tell labels from typos.
pub fn parse(source: &Source, symbols: &mut Symbols) -> Result<Vec<Stmt>, Error> {
    let mut stmts = Vec::new();
    for (idx, raw) in source.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = split_tokens(line);

        let mut label = None;
        if !is_head(&tokens[0]) {
            let mut name = tokens.remove(0);
            if name.len() > 1 && name.ends_with(':') {
                name.pop();
            }
            if Named::parse(&name).is_some() {
                return Err(ErrorKind::ReservedLabel(name).at(idx));
            }
            if !is_valid_label(&name) {
                return Err(ErrorKind::InvalidLabel(name).at(idx));
            }
            if tokens.is_empty() {
                return Err(ErrorKind::OrphanedLabel.at(idx));
            }
            symbols.declare(&name, idx).map_err(|e| e.at(idx))?;
            label = Some(name);
        }

        let head = tokens.remove(0);
        stmts.push(Stmt {
            line: idx,
            label,
            head,
            args: tokens,
        });
    }
    Ok(stmts)
}

fn is_head(token: &str) -> bool {
    TABLE.is_mnemonic(token) || Directive::parse(token).is_some()
}

fn is_valid_label(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if first.is_ascii_digit() {
        return false;
    }
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split on whitespace, keeping quoted strings intact and lowercasing
/// everything outside quotes.
fn split_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for c in line.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                    current.push(c);
                } else if c.is_whitespace() {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                } else {
                    current.extend(c.to_lowercase());
                }
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Parse a numeric literal: optional `#` prefix, optional sign, then a
/// decimal, `0x`, `0o` or `0b` body.
pub fn parse_num(s: &str) -> Option<i64> {
    let s = s.strip_prefix('#').unwrap_or(s);
    let (neg, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (radix, digits) = if let Some(hex) = s.strip_prefix("0x") {
        (16, hex)
    } else if let Some(oct) = s.strip_prefix("0o") {
        (8, oct)
    } else if let Some(bin) = s.strip_prefix("0b") {
        (2, bin)
    } else {
        (10, s)
    };
    if digits.is_empty() {
        return None;
    }
    let value = i64::from_str_radix(digits, radix).ok()?;
    Some(if neg { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_literals() {
        assert_eq!(parse_num("42"), Some(42));
        assert_eq!(parse_num("0x1f"), Some(31));
        assert_eq!(parse_num("0o17"), Some(15));
        assert_eq!(parse_num("0b101"), Some(5));
        assert_eq!(parse_num("-3"), Some(-3));
        assert_eq!(parse_num("#0x05"), Some(5));
        assert_eq!(parse_num("0x"), None);
        assert_eq!(parse_num("main"), None);
        assert_eq!(parse_num(""), None);
    }

    #[test]
    fn tokens_fold_case_outside_quotes() {
        assert_eq!(split_tokens("MOV A 0x1F"), ["mov", "a", "0x1f"]);
        assert_eq!(split_tokens("dw_e \"Hi There\" 1"), ["dw_e", "\"Hi There\"", "1"]);
        assert_eq!(split_tokens("  nop  "), ["nop"]);
    }

    #[test]
    fn labels_are_parsed() {
        let source = Source::from_lines("t.asm", "start: nop\n  mov a 1");
        let mut syms = Symbols::new();
        let stmts = parse(&source, &mut syms).unwrap();
        assert_eq!(stmts[0].label.as_deref(), Some("start"));
        assert_eq!(stmts[0].head, "nop");
        assert_eq!(stmts[1].label, None);
        assert_eq!(stmts[1].args, ["a", "1"]);
        assert!(syms.contains("start"));
    }
}
