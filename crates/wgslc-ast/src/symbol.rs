//! Identifier interning.
//!
//! A [`Symbol`] decouples identifier text from identifier identity: two
//! scopes can bind the same text to different declarations while comparisons
//! stay integer-cheap.

use std::collections::HashMap;
use std::fmt;

/// An opaque handle uniquely identifying a declared name within a module.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Symbol(u32);

impl Symbol {
    const INVALID: u32 = u32::MAX;

    /// The sentinel symbol that names nothing.
    pub fn invalid() -> Self {
        Self(Self::INVALID)
    }

    /// Returns `true` unless this is the invalid sentinel.
    pub fn is_valid(self) -> bool {
        self.0 != Self::INVALID
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "${}", self.0)
        } else {
            write!(f, "$invalid")
        }
    }
}

/// Bidirectional identifier-text interner.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    by_name: HashMap<String, Symbol>,
    names: Vec<String>,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `name`, returning the existing symbol on repeat registration.
    pub fn register(&mut self, name: impl Into<String>) -> Symbol {
        let name = name.into();
        if let Some(&sym) = self.by_name.get(&name) {
            return sym;
        }
        let index = u32::try_from(self.names.len())
            .unwrap_or_else(|_| panic!("symbol table overflow: {} names", self.names.len()));
        assert!(index != Symbol::INVALID, "symbol table overflow");
        let sym = Symbol(index);
        self.by_name.insert(name.clone(), sym);
        self.names.push(name);
        sym
    }

    /// Looks up an already-registered name.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.by_name.get(name).copied()
    }

    /// Returns the text of a symbol, or `None` for the invalid sentinel or a
    /// symbol from another table.
    pub fn name_of(&self, sym: Symbol) -> Option<&str> {
        if !sym.is_valid() {
            return None;
        }
        self.names.get(sym.0 as usize).map(String::as_str)
    }
}
