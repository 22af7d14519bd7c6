//! Module-scope variables, storage classes, and resource decorations.

use crate::arena::Handle;
use crate::expr::Expression;
use crate::symbol::Symbol;
use crate::types::Type;

/// Address-space tag on a variable declaration.
///
/// Which classes are legal depends on the declaration context; the resolver
/// enforces the legality table.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum StorageClass {
    /// No class written by the author; defaults to `Function` for locals.
    None,
    /// Pipeline-stage input.
    Input,
    /// Pipeline-stage output.
    Output,
    /// Uniform buffer (read-only, uniform layout rules).
    Uniform,
    /// Workgroup shared storage.
    Workgroup,
    /// Opaque handles: samplers and textures.
    UniformConstant,
    /// Storage buffer.
    Storage,
    /// Module-scope private storage.
    Private,
    /// Function-local storage.
    Function,
}

impl StorageClass {
    /// Returns `true` for classes legal on module-scope variables.
    pub fn valid_for_module_scope(self) -> bool {
        matches!(
            self,
            Self::Input
                | Self::Output
                | Self::Uniform
                | Self::Workgroup
                | Self::UniformConstant
                | Self::Storage
                | Self::Private
        )
    }

    /// Returns `true` for classes legal on function-local variables.
    pub fn valid_for_function_scope(self) -> bool {
        matches!(self, Self::None | Self::Function)
    }
}

/// `[[group(N), binding(N)]]` resource binding decoration.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct ResourceBinding {
    pub group: u32,
    pub binding: u32,
}

/// Built-in pipeline inputs/outputs a variable can be decorated with.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum BuiltIn {
    Position,
    VertexIndex,
    InstanceIndex,
    FrontFacing,
    FragCoord,
    FragDepth,
    GlobalInvocationId,
    LocalInvocationId,
    LocalInvocationIndex,
    WorkgroupId,
}

/// A module-scope variable declaration.
#[derive(Clone, Debug)]
pub struct GlobalVariable {
    pub name: Symbol,
    pub class: StorageClass,
    pub ty: Handle<Type>,
    /// Module-scope constants resolve as values, not references.
    pub is_const: bool,
    /// Resource binding decoration, for buffer/sampler/texture variables.
    pub binding: Option<ResourceBinding>,
    /// Builtin decoration, for stage I/O variables.
    pub builtin: Option<BuiltIn>,
    /// Location decoration, for user-defined stage I/O.
    pub location: Option<u32>,
    /// Pipeline-overridable constant id decoration.
    pub constant_id: Option<u32>,
    /// Optional initializer, stored in the module expression arena.
    pub init: Option<Handle<Expression>>,
}

impl GlobalVariable {
    /// Creates an undecorated variable of the given class and type.
    pub fn new(name: Symbol, class: StorageClass, ty: Handle<Type>) -> Self {
        Self {
            name,
            class,
            ty,
            is_const: false,
            binding: None,
            builtin: None,
            location: None,
            constant_id: None,
            init: None,
        }
    }
}
