//! wgslc symbol resolution and type determination.
//!
//! A single forward pass over a parsed [`Module`](wgslc_ast::Module) that
//! assigns every expression a type, validates declarations and statements,
//! and records the cross-reference metadata downstream consumers need:
//! referenced globals, call edges, and ancestor entry points per function.
//!
//! Resolution is partial-failure tolerant. Semantic errors accumulate as
//! diagnostics and abort only the declaration that produced them; callers
//! must check [`ResolvedModule::has_errors`] before trusting any type.

mod intrinsic;
mod resolver;
mod scope;

use std::collections::BTreeSet;

use thiserror::Error;
use wgslc_ast::{Expression, Function, GlobalVariable, Handle, Type};

pub use resolver::resolve;
pub use scope::{Definition, ScopeStack};

/// A recoverable semantic error, scoped to one declaration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("`{0}` is a function and cannot be used as a value")]
    FunctionUsedAsValue(String),
    #[error("type `{0}` cannot be indexed")]
    NotIndexable(String),
    #[error("array index must be an integer scalar, found `{0}`")]
    NonIntegerIndex(String),
    #[error("type `{ty}` has no member `{member}`")]
    UnknownMember { ty: String, member: String },
    #[error("invalid swizzle `{pattern}` on `{ty}`")]
    InvalidSwizzle { pattern: String, ty: String },
    #[error("operator `{op}` cannot combine `{left}` and `{right}`")]
    InvalidBinaryOperands {
        op: String,
        left: String,
        right: String,
    },
    #[error("operator `{op}` cannot be applied to `{operand}`")]
    InvalidUnaryOperand { op: String, operand: String },
    #[error("no matching overload for `{name}` with {count} argument(s)")]
    NoMatchingOverload { name: String, count: usize },
    #[error("`{ty}` constructor expects {expected} component(s), found {found}")]
    ConstructorArity {
        ty: String,
        expected: u32,
        found: usize,
    },
    #[error("component {index} of `{ty}` constructor: expected `{expected}`, found `{found}`")]
    ConstructorComponent {
        ty: String,
        index: usize,
        expected: String,
        found: String,
    },
    #[error("type `{0}` cannot be constructed")]
    NotConstructible(String),
    #[error("bitcast target `{0}` is not a 32-bit scalar or vector")]
    InvalidBitcast(String),
    #[error("storage class `{0}` is not valid at module scope")]
    InvalidModuleStorageClass(String),
    #[error("storage class `{0}` is not valid for a function-local variable")]
    InvalidLocalStorageClass(String),
    #[error("cannot initialize `{expected}` with a value of type `{found}`")]
    InitializerMismatch { expected: String, found: String },
    #[error("cannot assign `{found}` to `{expected}`")]
    AssignMismatch { expected: String, found: String },
    #[error("expression is not an assignable storage location")]
    NotAssignable,
    #[error("condition must be `bool`, found `{0}`")]
    NonBoolCondition(String),
    #[error("switch condition must be an integer scalar, found `{0}`")]
    NonIntegerSwitch(String),
    #[error("case selector `{selector}` does not fit the `{ty}` switch condition")]
    SwitchSelectorMismatch { ty: String, selector: i32 },
    #[error("return type mismatch: expected `{expected}`, found `{found}`")]
    ReturnMismatch { expected: String, found: String },
}

/// Cross-reference metadata for one function, filled in during resolution.
///
/// Sets are ordered by handle, which matches declaration order.
#[derive(Clone, Debug, Default)]
pub struct FunctionInfo {
    /// Globals referenced by this function, directly or through callees.
    pub referenced_globals: BTreeSet<Handle<GlobalVariable>>,
    /// Functions this one calls directly.
    pub callees: BTreeSet<Handle<Function>>,
    /// Entry points that can reach this function through the call graph.
    pub ancestor_entry_points: BTreeSet<Handle<Function>>,
}

/// The output of a resolution pass.
#[derive(Clone, Debug, Default)]
pub struct ResolvedModule {
    pub(crate) expr_types: Vec<Option<Handle<Type>>>,
    pub(crate) info: Vec<FunctionInfo>,
    pub(crate) diagnostics: Vec<ResolveError>,
}

impl ResolvedModule {
    /// Returns the type assigned to an expression, or `None` if the
    /// expression's declaration failed to resolve.
    pub fn type_of(&self, expr: Handle<Expression>) -> Option<Handle<Type>> {
        self.expr_types.get(expr.index()).copied().flatten()
    }

    /// Returns the cross-reference metadata for a function.
    pub fn function_info(&self, function: Handle<Function>) -> &FunctionInfo {
        &self.info[function.index()]
    }

    /// Returns `true` if any diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// The accumulated diagnostics, in the order they were found.
    pub fn diagnostics(&self) -> &[ResolveError] {
        &self.diagnostics
    }
}
