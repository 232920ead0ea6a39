use crate::directive::Directive;
use crate::error::{Error, ErrorKind};
use crate::parser::{parse_num, Stmt};
use crate::symbol::Symbols;
use arch::inst::{Shape, TABLE};

/// A value that may still be a label reference after the second pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Literal(u16),
    Label(String),
}

/// Which encoding the opcode low byte carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowByte {
    S8,
    U8,
}

/// Output of the second pass: placed but not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Inst {
        line: usize,
        addr: u16,
        base: u16,
        low: Option<(LowByte, Operand)>,
        word: Option<Operand>,
    },
    Words {
        line: usize,
        addr: u16,
        words: Vec<Operand>,
    },
    Reserve {
        line: usize,
        addr: u16,
        len: u16,
    },
}

/// Assembly state threaded through the second pass: the symbol table and the
/// two location counters.
#[derive(Debug, Default)]
pub struct Context {
    pub symbols: Symbols,
    extmem: u32,
    intmem: u32,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extmem(&self) -> u32 {
        self.extmem
    }

    pub fn intmem(&self) -> u32 {
        self.intmem
    }

    /// Claim `words` words of external memory, returning the start address.
    fn alloc_ext(&mut self, words: u32) -> Result<u16, ErrorKind> {
        let addr = self.extmem;
        let end = addr + words;
        if end > 65536 {
            return Err(ErrorKind::ExtmemOverflow);
        }
        self.extmem = end;
        Ok(addr as u16)
    }
}

/// Second pass. Matches every statement against the instruction table or a
/// directive, assigns addresses and defines labels as their statements are
/// placed.
pub fn encode(ctx: &mut Context, stmts: &[Stmt]) -> Result<Vec<Record>, Error> {
    let mut records = Vec::new();
    for stmt in stmts {
        if let Some(directive) = Directive::parse(&stmt.head) {
            exec_directive(ctx, &mut records, stmt, directive).map_err(|e| e.at(stmt.line))?;
        } else if TABLE.is_mnemonic(&stmt.head) {
            let record = encode_inst(ctx, stmt).map_err(|e| e.at(stmt.line))?;
            records.push(record);
        } else {
            return Err(ErrorKind::ExpectedMnemonic.at(stmt.line));
        }
    }
    Ok(records)
}

fn encode_inst(ctx: &mut Context, stmt: &Stmt) -> Result<Record, ErrorKind> {
    let arg1 = stmt.args.first().map(String::as_str);
    let arg2 = stmt.args.get(1).map(String::as_str);
    let def = TABLE
        .fingerprint(&stmt.head, &Shape::of(arg1), &Shape::of(arg2))
        .and_then(|fp| TABLE.lookup(fp))
        .ok_or(ErrorKind::UnknownInstruction)?;

    let mut low = None;
    let mut word = None;
    let mut words = 1;
    for (class, token) in [(def.arg1, arg1), (def.arg2, arg2)] {
        match class {
            arch::operand::Class::S8 => low = Some((LowByte::S8, value_operand(token)?)),
            arch::operand::Class::U8 => low = Some((LowByte::U8, value_operand(token)?)),
            arch::operand::Class::U16 => {
                word = Some(value_operand(token)?);
                words += 1;
            }
            arch::operand::Class::None | arch::operand::Class::Named(_) => {}
        }
    }

    let addr = ctx.alloc_ext(words)?;
    if let Some(label) = &stmt.label {
        ctx.symbols.define(label, addr);
    }
    Ok(Record::Inst {
        line: stmt.line,
        addr,
        base: def.opcode,
        low,
        word,
    })
}

fn exec_directive(
    ctx: &mut Context,
    records: &mut Vec<Record>,
    stmt: &Stmt,
    directive: Directive,
) -> Result<(), ErrorKind> {
    match directive {
        Directive::Equ => {
            let value = resolve_now(ctx, one_arg(stmt, directive)?)?;
            let label = stmt.label.as_deref().ok_or(ErrorKind::MissingLabel)?;
            ctx.symbols.define(label, value);
        }
        Directive::OrgE => {
            let target = resolve_now(ctx, one_arg(stmt, directive)?)?;
            if u32::from(target) < ctx.extmem {
                return Err(ErrorKind::AddressRegression {
                    current: ctx.extmem,
                    target,
                });
            }
            ctx.extmem = u32::from(target);
            if let Some(label) = &stmt.label {
                ctx.symbols.define(label, target);
            }
        }
        Directive::OrgI => {
            let arg = one_arg(stmt, directive)?;
            let value = match parse_num(arg) {
                Some(v) => v,
                None => i64::from(resolve_now(ctx, arg)?),
            };
            if !(0..=255).contains(&value) {
                return Err(ErrorKind::ValueOutOfRange { value, max: 255 });
            }
            ctx.intmem = value as u32;
            if let Some(label) = &stmt.label {
                ctx.symbols.define(label, value as u16);
            }
        }
        Directive::ResI => {
            let count = resolve_now(ctx, one_arg(stmt, directive)?)?;
            if let Some(label) = &stmt.label {
                ctx.symbols.define(label, ctx.intmem as u16);
            }
            let end = ctx.intmem + u32::from(count);
            if end > 256 {
                return Err(ErrorKind::IntmemOverflow);
            }
            ctx.intmem = end;
        }
        Directive::ResE => {
            let count = resolve_now(ctx, one_arg(stmt, directive)?)?;
            let addr = ctx.alloc_ext(u32::from(count))?;
            if let Some(label) = &stmt.label {
                ctx.symbols.define(label, addr);
            }
            records.push(Record::Reserve {
                line: stmt.line,
                addr,
                len: count,
            });
        }
        Directive::DwE => {
            if stmt.args.is_empty() {
                return Err(ErrorKind::DirectiveArity(directive));
            }
            let mut words = Vec::new();
            for arg in &stmt.args {
                push_data(ctx, &mut words, arg)?;
            }
            let addr = ctx.alloc_ext(words.len() as u32)?;
            if let Some(label) = &stmt.label {
                ctx.symbols.define(label, addr);
            }
            records.push(Record::Words {
                line: stmt.line,
                addr,
                words,
            });
        }
    }
    Ok(())
}

fn one_arg(stmt: &Stmt, directive: Directive) -> Result<&str, ErrorKind> {
    match stmt.args.as_slice() {
        [arg] => Ok(arg),
        _ => Err(ErrorKind::DirectiveArity(directive)),
    }
}

/// Directive arguments must evaluate during the second pass: a numeric
/// literal, or a label that is already defined.
fn resolve_now(ctx: &Context, arg: &str) -> Result<u16, ErrorKind> {
    if let Some(value) = parse_num(arg) {
        return check_range(value, 65535);
    }
    if let Some(sym) = ctx.symbols.get(arg) {
        return sym.value.ok_or(ErrorKind::UnresolvedLabel(arg.to_string()));
    }
    Err(ErrorKind::ExpectedValue(arg.to_string()))
}

/// An instruction value operand: a literal now, or a label settled at link
/// time. Idents that never get defined surface as UndefinedLabel there.
fn value_operand(token: Option<&str>) -> Result<Operand, ErrorKind> {
    let token = token.ok_or(ErrorKind::UnknownInstruction)?;
    match parse_num(token) {
        Some(value) => Ok(Operand::Literal(check_range(value, 65535)?)),
        None => Ok(Operand::Label(token.to_string())),
    }
}

fn push_data(ctx: &Context, words: &mut Vec<Operand>, arg: &str) -> Result<(), ErrorKind> {
    if let Some(value) = parse_num(arg) {
        words.push(Operand::Literal(check_range(value, 65535)?));
        return Ok(());
    }
    if ctx.symbols.contains(arg) {
        words.push(Operand::Label(arg.to_string()));
        return Ok(());
    }
    let quoted = arg.len() > 2
        && (arg.starts_with('"') || arg.starts_with('\''))
        && arg.ends_with(arg.chars().next().unwrap_or('"'));
    if quoted {
        for ch in arg[1..arg.len() - 1].chars() {
            words.push(Operand::Literal(check_range(i64::from(u32::from(ch)), 65535)?));
        }
        return Ok(());
    }
    Err(ErrorKind::InvalidArgument(arg.to_string()))
}

fn check_range(value: i64, max: u32) -> Result<u16, ErrorKind> {
    if !(0..=i64::from(max)).contains(&value) {
        return Err(ErrorKind::ValueOutOfRange { value, max });
    }
    Ok(value as u16)
}
