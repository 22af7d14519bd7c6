//! Expressions.
//!
//! Source-level expression nodes, stored in the module-wide arena and
//! referenced by [`Handle<Expression>`]. The resolver assigns each node a
//! type exactly once; the slot lives beside the arena, not in the node.

use crate::arena::Handle;
use crate::symbol::Symbol;
use crate::types::{Scalar, Type};

/// A literal constant value. The concrete type is fixed at parse time from
/// the lexical form (suffix); an explicit suffix always wins over context.
#[derive(Clone, Copy, Debug)]
pub enum Literal {
    Bool(bool),
    I32(i32),
    U32(u32),
    F32(f32),
}

impl Literal {
    /// Returns the scalar type of this literal.
    pub fn scalar(&self) -> Scalar {
        match *self {
            Self::Bool(_) => Scalar::BOOL,
            Self::I32(_) => Scalar::I32,
            Self::U32(_) => Scalar::U32,
            Self::F32(_) => Scalar::F32,
        }
    }
}

/// A unary operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum UnaryOp {
    /// Arithmetic negation; requires a signed numeric operand.
    Negate,
    /// Logical not; requires `bool` or a bool vector.
    LogicalNot,
}

/// A binary operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// Short-circuiting; backends must emit control flow, not a plain op.
    LogicalAnd,
    /// Short-circuiting; backends must emit control flow, not a plain op.
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOp {
    /// Returns `true` for operators producing `bool`/`vecN<bool>` results.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::Less
                | Self::LessEqual
                | Self::Greater
                | Self::GreaterEqual
        )
    }

    /// Returns `true` for the short-circuiting logical operators.
    pub fn is_short_circuit(self) -> bool {
        matches!(self, Self::LogicalAnd | Self::LogicalOr)
    }
}

/// An expression node.
#[derive(Clone, Debug)]
pub enum Expression {
    /// A scalar constructor: a bare literal whose type comes from its
    /// lexical form.
    Literal(Literal),
    /// A reference to a declared variable, parameter, or function by name.
    Identifier(Symbol),
    /// Array/vector/matrix accessor `base[index]`.
    Index {
        base: Handle<Expression>,
        index: Handle<Expression>,
    },
    /// Member accessor `base.member`: a struct field or a vector swizzle.
    Member {
        base: Handle<Expression>,
        member: Symbol,
    },
    /// Apply a unary operator.
    Unary {
        op: UnaryOp,
        expr: Handle<Expression>,
    },
    /// Apply a binary operator.
    Binary {
        op: BinaryOp,
        left: Handle<Expression>,
        right: Handle<Expression>,
    },
    /// Call an intrinsic or a user-declared function by name.
    Call {
        function: Symbol,
        arguments: Vec<Handle<Expression>>,
    },
    /// Type constructor: zero args (zero value), one arg (splat/cast), or
    /// one arg per constituent.
    Construct {
        ty: Handle<Type>,
        components: Vec<Handle<Expression>>,
    },
    /// Reinterpret the bits of `expr` as the target type.
    Bitcast {
        ty: Handle<Type>,
        expr: Handle<Expression>,
    },
}
