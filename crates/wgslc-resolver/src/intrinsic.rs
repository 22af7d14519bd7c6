//! Built-in function signatures.
//!
//! A fixed overload table keyed by callee name. Arguments arrive as value
//! types (references already unwrapped); the first structurally matching
//! overload decides the return type.

use wgslc_ast::{
    Handle, Scalar, ScalarKind, TextureClass, TextureDimension, Type, TypeInner, UniqueArena,
    VectorSize,
};

/// Outcome of an intrinsic lookup.
pub(crate) enum IntrinsicCall {
    /// The name is not a built-in; try user-declared functions.
    NotIntrinsic,
    /// The name is a built-in but no overload accepts these argument types.
    NoOverload,
    /// Matched; the call has this return type.
    Resolved(Handle<Type>),
}

/// Scalar-or-vector argument shape, the common case for math built-ins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Scalar(Scalar),
    Vector(VectorSize, Scalar),
    Other,
}

impl Shape {
    fn scalar(self) -> Option<Scalar> {
        match self {
            Self::Scalar(s) | Self::Vector(_, s) => Some(s),
            Self::Other => None,
        }
    }

    fn is_float(self) -> bool {
        self.scalar()
            .is_some_and(|s| s.kind == ScalarKind::Float)
    }

    fn is_numeric(self) -> bool {
        self.scalar().is_some_and(Scalar::is_numeric)
    }
}

fn shape_of(handle: Handle<Type>, types: &UniqueArena<Type>) -> Shape {
    match types[handle].inner {
        TypeInner::Scalar(s) => Shape::Scalar(s),
        TypeInner::Vector { size, scalar } => Shape::Vector(size, scalar),
        _ => Shape::Other,
    }
}

fn intern_scalar(types: &mut UniqueArena<Type>, scalar: Scalar) -> Handle<Type> {
    types.insert(Type {
        name: None,
        inner: TypeInner::Scalar(scalar),
    })
}

fn intern_vector(types: &mut UniqueArena<Type>, size: VectorSize, scalar: Scalar) -> Handle<Type> {
    types.insert(Type {
        name: None,
        inner: TypeInner::Vector { size, scalar },
    })
}

/// Float-in, float-out built-ins taking one argument of the result type.
const FLOAT_UNARY: &[&str] = &[
    "sin",
    "cos",
    "tan",
    "asin",
    "acos",
    "atan",
    "sinh",
    "cosh",
    "tanh",
    "sqrt",
    "inverseSqrt",
    "floor",
    "ceil",
    "round",
    "fract",
    "trunc",
    "exp",
    "exp2",
    "log",
    "log2",
    "saturate",
];

/// Does `shape` match the coordinate type a texture of `dim` expects?
fn is_coord(shape: Shape, dim: TextureDimension, kind: ScalarKind) -> bool {
    let arity = match dim {
        TextureDimension::D1 => None,
        TextureDimension::D2 => Some(VectorSize::Bi),
        TextureDimension::D3 | TextureDimension::Cube => Some(VectorSize::Tri),
    };
    match (shape, arity) {
        (Shape::Scalar(s), None) => s.kind == kind,
        (Shape::Vector(size, s), Some(want)) => size == want && s.kind == kind,
        _ => false,
    }
}

fn texture_of(
    handle: Handle<Type>,
    types: &UniqueArena<Type>,
) -> Option<(TextureDimension, TextureClass)> {
    match types[handle].inner {
        TypeInner::Texture { dim, class } => Some((dim, class)),
        _ => None,
    }
}

fn sampler_of(handle: Handle<Type>, types: &UniqueArena<Type>) -> Option<bool> {
    match types[handle].inner {
        TypeInner::Sampler { comparison } => Some(comparison),
        _ => None,
    }
}

/// Resolves a call against the built-in table.
pub(crate) fn resolve_call(
    name: &str,
    args: &[Handle<Type>],
    types: &mut UniqueArena<Type>,
) -> IntrinsicCall {
    use IntrinsicCall::{NoOverload, NotIntrinsic, Resolved};

    let shapes: Vec<Shape> = args.iter().map(|&a| shape_of(a, types)).collect();
    let same = |a: usize, b: usize| shapes[a] == shapes[b];

    match name {
        n if FLOAT_UNARY.contains(&n) => match shapes.as_slice() {
            [s] if s.is_float() => Resolved(args[0]),
            _ => NoOverload,
        },
        "abs" => match shapes.as_slice() {
            [s] if s.is_numeric() => Resolved(args[0]),
            _ => NoOverload,
        },
        "min" | "max" => match shapes.as_slice() {
            [s, _] if s.is_numeric() && same(0, 1) => Resolved(args[0]),
            _ => NoOverload,
        },
        "pow" | "atan2" | "step" => match shapes.as_slice() {
            [s, _] if s.is_float() && same(0, 1) => Resolved(args[0]),
            _ => NoOverload,
        },
        "clamp" => match shapes.as_slice() {
            [s, _, _] if s.is_numeric() && same(0, 1) && same(0, 2) => Resolved(args[0]),
            _ => NoOverload,
        },
        "mix" | "smoothStep" | "fma" => match shapes.as_slice() {
            [s, _, _] if s.is_float() && same(0, 1) && same(0, 2) => Resolved(args[0]),
            _ => NoOverload,
        },
        "dot" => match shapes.as_slice() {
            [Shape::Vector(_, s), _] if s.kind == ScalarKind::Float && same(0, 1) => {
                Resolved(intern_scalar(types, *s))
            }
            _ => NoOverload,
        },
        "cross" => match shapes.as_slice() {
            [Shape::Vector(VectorSize::Tri, s), _]
                if s.kind == ScalarKind::Float && same(0, 1) =>
            {
                Resolved(args[0])
            }
            _ => NoOverload,
        },
        "normalize" => match shapes.as_slice() {
            [Shape::Vector(_, s)] if s.kind == ScalarKind::Float => Resolved(args[0]),
            _ => NoOverload,
        },
        "length" => match shapes.as_slice() {
            [s] if s.is_float() => {
                let scalar = s.scalar().unwrap_or(Scalar::F32);
                Resolved(intern_scalar(types, scalar))
            }
            _ => NoOverload,
        },
        "distance" => match shapes.as_slice() {
            [s, _] if s.is_float() && same(0, 1) => {
                let scalar = s.scalar().unwrap_or(Scalar::F32);
                Resolved(intern_scalar(types, scalar))
            }
            _ => NoOverload,
        },
        "select" => match shapes.as_slice() {
            [_, _, Shape::Scalar(Scalar::BOOL)] if same(0, 1) && shapes[0] != Shape::Other => {
                Resolved(args[0])
            }
            _ => NoOverload,
        },
        "all" | "any" => match shapes.as_slice() {
            [Shape::Vector(_, Scalar::BOOL)] => Resolved(intern_scalar(types, Scalar::BOOL)),
            _ => NoOverload,
        },
        "isNan" | "isInf" => match shapes.as_slice() {
            [Shape::Scalar(s)] if s.kind == ScalarKind::Float => {
                Resolved(intern_scalar(types, Scalar::BOOL))
            }
            [Shape::Vector(size, s)] if s.kind == ScalarKind::Float => {
                Resolved(intern_vector(types, *size, Scalar::BOOL))
            }
            _ => NoOverload,
        },
        "textureSample" => {
            let [tex, sampler, coord] = args else {
                return NoOverload;
            };
            let Some((dim, class)) = texture_of(*tex, types) else {
                return NoOverload;
            };
            if sampler_of(*sampler, types) != Some(false)
                || !is_coord(shape_of(*coord, types), dim, ScalarKind::Float)
            {
                return NoOverload;
            }
            match class {
                TextureClass::Sampled { scalar } => {
                    Resolved(intern_vector(types, VectorSize::Quad, scalar))
                }
                TextureClass::Depth => Resolved(intern_scalar(types, Scalar::F32)),
                _ => NoOverload,
            }
        }
        "textureSampleLevel" => {
            let [tex, sampler, coord, level] = args else {
                return NoOverload;
            };
            let Some((dim, TextureClass::Sampled { scalar })) = texture_of(*tex, types) else {
                return NoOverload;
            };
            if sampler_of(*sampler, types) != Some(false)
                || !is_coord(shape_of(*coord, types), dim, ScalarKind::Float)
                || shape_of(*level, types) != Shape::Scalar(Scalar::F32)
            {
                return NoOverload;
            }
            Resolved(intern_vector(types, VectorSize::Quad, scalar))
        }
        "textureSampleCompare" => {
            let [tex, sampler, coord, reference] = args else {
                return NoOverload;
            };
            let Some((dim, TextureClass::Depth)) = texture_of(*tex, types) else {
                return NoOverload;
            };
            if sampler_of(*sampler, types) != Some(true)
                || !is_coord(shape_of(*coord, types), dim, ScalarKind::Float)
                || shape_of(*reference, types) != Shape::Scalar(Scalar::F32)
            {
                return NoOverload;
            }
            Resolved(intern_scalar(types, Scalar::F32))
        }
        "textureLoad" => {
            let (tex, coord, rest) = match args {
                [tex, coord] => (tex, coord, None),
                [tex, coord, extra] => (tex, coord, Some(extra)),
                _ => return NoOverload,
            };
            let Some((dim, class)) = texture_of(*tex, types) else {
                return NoOverload;
            };
            let scalar = match class {
                TextureClass::Sampled { scalar } | TextureClass::Multisampled { scalar } => scalar,
                _ => return NoOverload,
            };
            if !is_coord(shape_of(*coord, types), dim, ScalarKind::Sint) {
                return NoOverload;
            }
            // Level or sample index.
            if let Some(extra) = rest
                && shape_of(*extra, types) != Shape::Scalar(Scalar::I32)
            {
                return NoOverload;
            }
            Resolved(intern_vector(types, VectorSize::Quad, scalar))
        }
        _ => NotIntrinsic,
    }
}
