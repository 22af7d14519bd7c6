//! wgslc abstract syntax tree.
//!
//! Arena-based AST and type model for WGSL-family shader modules. Types
//! live in a deduplicating registry; expressions, globals, and functions
//! live in append-only arenas referenced through typed [`Handle`]s.

pub mod arena;
mod display;
mod expr;
mod func;
mod global;
mod stmt;
mod symbol;
pub mod types;

pub use arena::{Arena, Handle, UniqueArena};
pub use display::{dump_module, type_name};
pub use expr::{BinaryOp, Expression, Literal, UnaryOp};
pub use func::{Function, LocalVariable, Parameter, PipelineStage};
pub use global::{BuiltIn, GlobalVariable, ResourceBinding, StorageClass};
pub use stmt::{Block, Statement, SwitchCase};
pub use symbol::{Symbol, SymbolTable};
pub use types::{
    AccessControl, ArraySize, Bytes, MemoryLayout, Scalar, ScalarKind, StorageFormat, StructMember,
    TextureClass, TextureDimension, Type, TypeInner, VectorSize, base_alignment,
    min_buffer_binding_size, unwrap_all, unwrap_if_needed,
};

/// A parsed shader module, prior to or after resolution.
#[derive(Clone, Debug, Default)]
pub struct Module {
    /// Interned identifier texts.
    pub symbols: SymbolTable,
    /// Deduplicated type registry.
    pub types: UniqueArena<Type>,
    /// Module-scope variables and constants, in declaration order.
    pub global_variables: Arena<GlobalVariable>,
    /// All expressions in the module, shared across functions.
    pub expressions: Arena<Expression>,
    /// Function declarations, in declaration order.
    pub functions: Arena<Function>,
}

impl Module {
    /// Creates an empty module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over entry-point functions in declaration order.
    pub fn entry_points(&self) -> impl Iterator<Item = (Handle<Function>, &Function)> {
        self.functions.iter().filter(|(_, f)| f.is_entry_point())
    }
}
