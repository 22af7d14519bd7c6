//! Lexically-scoped name resolution.

use std::collections::HashMap;

use wgslc_ast::{Function, GlobalVariable, Handle, LocalVariable, Symbol, Type};

/// What a name in scope refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Definition {
    /// A module-scope variable or constant.
    Global(Handle<GlobalVariable>),
    /// A local variable of the function currently being resolved.
    Local(Handle<LocalVariable>),
    /// A formal parameter of the function currently being resolved.
    Param { ty: Handle<Type> },
    /// A user-declared function.
    Function(Handle<Function>),
}

/// A stack of name-to-declaration maps with innermost-first lookup.
///
/// The bottom scope holds module-scope declarations and lives for the whole
/// pass; function bodies and nested blocks push and pop above it. Shadowing
/// an outer binding is legal; rebinding within one scope overwrites.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<HashMap<Symbol, Definition>>,
}

impl ScopeStack {
    /// Creates a stack holding only the module scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    /// Opens a nested scope.
    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Closes the innermost scope, dropping its bindings.
    ///
    /// The module scope stays; pushes and pops must be paired.
    pub fn pop(&mut self) {
        assert!(self.scopes.len() > 1, "cannot pop the module scope");
        self.scopes.pop();
    }

    /// Binds `sym` in the innermost scope.
    pub fn set(&mut self, sym: Symbol, def: Definition) {
        // Unwrap is fine: the stack is never empty.
        let scope = self.scopes.last_mut().unwrap();
        scope.insert(sym, def);
    }

    /// Looks `sym` up, innermost scope first.
    pub fn get(&self, sym: Symbol) -> Option<Definition> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&sym).copied())
    }

    /// Number of open scopes, module scope included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgslc_ast::SymbolTable;

    fn param(index: u32) -> Definition {
        Definition::Param {
            ty: handle_of(index),
        }
    }

    fn handle_of(index: u32) -> Handle<Type> {
        // Fabricate distinct handles through a scratch arena.
        let mut arena = wgslc_ast::Arena::new();
        let mut h = arena.append(Type {
            name: None,
            inner: wgslc_ast::TypeInner::Void,
        });
        for _ in 0..index {
            h = arena.append(Type {
                name: None,
                inner: wgslc_ast::TypeInner::Void,
            });
        }
        h
    }

    #[test]
    fn innermost_wins() {
        let mut symbols = SymbolTable::new();
        let a = symbols.register("a");
        let mut scopes = ScopeStack::new();
        scopes.set(a, param(0));
        scopes.push();
        scopes.set(a, param(1));
        assert_eq!(scopes.get(a), Some(param(1)));
        scopes.pop();
        assert_eq!(scopes.get(a), Some(param(0)));
    }

    #[test]
    fn missing_name() {
        let mut symbols = SymbolTable::new();
        let a = symbols.register("a");
        let scopes = ScopeStack::new();
        assert_eq!(scopes.get(a), None);
    }

    #[test]
    fn rebinding_in_same_scope_overwrites() {
        let mut symbols = SymbolTable::new();
        let a = symbols.register("a");
        let mut scopes = ScopeStack::new();
        scopes.set(a, param(0));
        scopes.set(a, param(1));
        assert_eq!(scopes.get(a), Some(param(1)));
    }

    #[test]
    #[should_panic(expected = "module scope")]
    fn popping_module_scope_panics() {
        let mut scopes = ScopeStack::new();
        scopes.pop();
    }
}
