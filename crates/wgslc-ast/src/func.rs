//! Functions, entry-point decorations, and local variables.

use crate::arena::{Arena, Handle};
use crate::expr::Expression;
use crate::global::StorageClass;
use crate::stmt::Block;
use crate::symbol::Symbol;
use crate::types::Type;

/// The pipeline stage a function can be decorated with. A decorated function
/// is an entry point.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum PipelineStage {
    Vertex,
    Fragment,
    Compute,
}

/// A formal parameter declaration.
#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: Symbol,
    pub ty: Handle<Type>,
}

/// A function-local variable declaration.
#[derive(Clone, Debug)]
pub struct LocalVariable {
    pub name: Symbol,
    /// `None` or `Function` only; `None` defaults to `Function`.
    pub class: StorageClass,
    pub ty: Handle<Type>,
    /// Constants resolve as values, not references.
    pub is_const: bool,
    /// Optional initializer, stored in the module expression arena.
    pub init: Option<Handle<Expression>>,
}

/// A function declaration.
#[derive(Clone, Debug)]
pub struct Function {
    pub name: Symbol,
    pub params: Vec<Parameter>,
    /// `None` means the function returns void.
    pub return_type: Option<Handle<Type>>,
    /// Pipeline-stage decoration; `Some` marks an entry point.
    pub stage: Option<PipelineStage>,
    /// Workgroup-size decoration for compute entry points.
    pub workgroup_size: Option<[u32; 3]>,
    /// Function-local variable declarations.
    pub local_variables: Arena<LocalVariable>,
    /// The function body.
    pub body: Block,
}

impl Function {
    /// Creates an empty undecorated function.
    pub fn new(name: Symbol) -> Self {
        Self {
            name,
            params: Vec::new(),
            return_type: None,
            stage: None,
            workgroup_size: None,
            local_variables: Arena::new(),
            body: Vec::new(),
        }
    }

    /// Returns `true` if this function carries a pipeline-stage decoration.
    pub fn is_entry_point(&self) -> bool {
        self.stage.is_some()
    }
}
