use crate::error::ErrorKind;
use indexmap::IndexMap;

/// One label. The value stays `None` from declaration until the defining
/// statement is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub line: usize,
    pub value: Option<u16>,
}

/// Label table in declaration order.
#[derive(Debug, Default)]
pub struct Symbols(IndexMap<String, Symbol>);

impl Symbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, line: usize) -> Result<(), ErrorKind> {
        if self.0.contains_key(name) {
            return Err(ErrorKind::DuplicateLabel(name.to_string()));
        }
        self.0.insert(name.to_string(), Symbol { line, value: None });
        Ok(())
    }

    pub fn define(&mut self, name: &str, value: u16) {
        let sym = self.0.get_mut(name);
        debug_assert!(sym.is_some(), "define of undeclared label `{}`", name);
        if let Some(sym) = sym {
            debug_assert!(sym.value.is_none(), "label `{}` defined twice", name);
            sym.value = Some(value);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.0.get(name)
    }

    pub fn value(&self, name: &str) -> Option<u16> {
        self.0.get(name).and_then(|s| s.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_then_define() {
        let mut syms = Symbols::new();
        syms.declare("main", 3).unwrap();
        assert_eq!(syms.value("main"), None);
        syms.define("main", 0x10);
        assert_eq!(syms.value("main"), Some(0x10));
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut syms = Symbols::new();
        syms.declare("x", 0).unwrap();
        assert!(matches!(
            syms.declare("x", 5),
            Err(ErrorKind::DuplicateLabel(_))
        ));
    }

    #[test]
    #[should_panic(expected = "define of undeclared label")]
    fn define_requires_declaration() {
        let mut syms = Symbols::new();
        syms.define("ghost", 1);
    }

    #[test]
    #[should_panic(expected = "defined twice")]
    fn define_is_one_shot() {
        let mut syms = Symbols::new();
        syms.declare("x", 0).unwrap();
        syms.define("x", 1);
        syms.define("x", 2);
    }

    #[test]
    fn iteration_keeps_declaration_order() {
        let mut syms = Symbols::new();
        syms.declare("zz", 0).unwrap();
        syms.declare("aa", 1).unwrap();
        let names: Vec<&str> = syms.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["zz", "aa"]);
    }
}
