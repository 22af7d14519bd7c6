//! Type system for the wgslc AST.
//!
//! Types are immutable once interned into the module's [`UniqueArena`];
//! structurally identical descriptions share a single canonical instance.

use crate::arena::{Handle, UniqueArena};
use crate::global::StorageClass;

/// Width of a scalar type in bytes.
pub type Bytes = u8;

/// The kind of a scalar type.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum ScalarKind {
    /// Boolean.
    Bool,
    /// Signed integer.
    Sint,
    /// Unsigned integer.
    Uint,
    /// Floating point.
    Float,
}

/// A scalar type: kind + byte width.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Scalar {
    pub kind: ScalarKind,
    pub width: Bytes,
}

impl Scalar {
    pub const BOOL: Self = Self {
        kind: ScalarKind::Bool,
        width: 1,
    };
    pub const I32: Self = Self {
        kind: ScalarKind::Sint,
        width: 4,
    };
    pub const U32: Self = Self {
        kind: ScalarKind::Uint,
        width: 4,
    };
    pub const F32: Self = Self {
        kind: ScalarKind::Float,
        width: 4,
    };

    /// Returns `true` for signed integer and floating point scalars.
    pub fn is_signed_numeric(self) -> bool {
        matches!(self.kind, ScalarKind::Sint | ScalarKind::Float)
    }

    /// Returns `true` for any non-bool scalar.
    pub fn is_numeric(self) -> bool {
        self.kind != ScalarKind::Bool
    }

    /// Returns `true` for integer scalars.
    pub fn is_integer(self) -> bool {
        matches!(self.kind, ScalarKind::Sint | ScalarKind::Uint)
    }
}

/// Number of components in a vector.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum VectorSize {
    /// 2 components.
    Bi = 2,
    /// 3 components.
    Tri = 3,
    /// 4 components.
    Quad = 4,
}

impl VectorSize {
    /// Builds a size from a component count in 2..=4.
    pub fn from_count(count: u32) -> Option<Self> {
        match count {
            2 => Some(Self::Bi),
            3 => Some(Self::Tri),
            4 => Some(Self::Quad),
            _ => None,
        }
    }
}

/// Size of an array.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ArraySize {
    /// Fixed-size array.
    Constant(u32),
    /// Runtime-sized array. Legal only as the last member of a
    /// storage-class-appropriate struct.
    Runtime,
}

impl ArraySize {
    /// Returns `true` for runtime-sized (unbounded) arrays.
    pub fn is_runtime(self) -> bool {
        matches!(self, Self::Runtime)
    }
}

/// Read/write capability wrapped around a type, primarily for storage buffers.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum AccessControl {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

/// The dimensionality of a texture.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TextureDimension {
    D1,
    D2,
    D3,
    Cube,
}

/// Texel format for storage textures (representative subset).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum StorageFormat {
    R32Float,
    R32Sint,
    R32Uint,
    Rgba8Unorm,
    Rgba16Float,
    Rgba32Float,
}

/// What flavor of texture this is, beyond its dimension.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TextureClass {
    /// Sampled texture producing the given scalar kind.
    Sampled { scalar: Scalar },
    /// Multisampled texture producing the given scalar kind.
    Multisampled { scalar: Scalar },
    /// Depth texture, sampled with a comparison sampler.
    Depth,
    /// Storage texture with a fixed texel format and access mode.
    Storage {
        format: StorageFormat,
        access: AccessControl,
    },
}

/// A member of a struct type. Offsets are author-supplied, not computed.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct StructMember {
    pub name: String,
    pub ty: Handle<Type>,
    pub offset: u32,
}

/// A named type.
///
/// `name` is `Some` for structs and aliases; structural equality (and thus
/// registry deduplication) covers both the name and the shape.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Type {
    pub name: Option<String>,
    pub inner: TypeInner,
}

/// The concrete shape of a type.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum TypeInner {
    /// The empty type of functions without a return value.
    Void,
    /// A single scalar value.
    Scalar(Scalar),
    /// A vector of scalars.
    Vector { size: VectorSize, scalar: Scalar },
    /// A matrix, laid out as `columns` column vectors of `rows` scalars.
    Matrix {
        rows: VectorSize,
        columns: VectorSize,
        scalar: Scalar,
    },
    /// A fixed-size or runtime-sized array. `stride` is the optional
    /// author-supplied stride decoration, attached before interning.
    Array {
        base: Handle<Type>,
        size: ArraySize,
        stride: Option<u32>,
    },
    /// A composite struct type. `block` marks host-shareable buffer structs.
    Struct {
        members: Vec<StructMember>,
        block: bool,
    },
    /// A pointer (reference) to a value in a given storage class.
    Pointer {
        base: Handle<Type>,
        class: StorageClass,
    },
    /// An access-control wrapper; transparent to layout and unwrapping.
    AccessControl {
        access: AccessControl,
        base: Handle<Type>,
    },
    /// A named alias of another type; transparent to layout and unwrapping.
    /// The alias name lives in [`Type::name`].
    Alias { base: Handle<Type> },
    /// A sampler, plain or comparison.
    Sampler { comparison: bool },
    /// A texture.
    Texture {
        dim: TextureDimension,
        class: TextureClass,
    },
}

/// Host-memory-layout mode for buffer size and alignment queries.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum MemoryLayout {
    UniformBuffer,
    StorageBuffer,
}

fn round_up(align: u64, value: u64) -> u64 {
    if align == 0 {
        return value;
    }
    value.div_ceil(align) * align
}

fn scalar_size(scalar: Scalar) -> u64 {
    // Booleans have no host-shareable representation.
    if scalar.kind == ScalarKind::Bool {
        0
    } else {
        u64::from(scalar.width)
    }
}

fn vector_size(size: VectorSize, scalar: Scalar, layout: MemoryLayout) -> u64 {
    let elem = scalar_size(scalar);
    // A vec3 occupies a vec4 slot under uniform buffer rules.
    if size == VectorSize::Tri && layout == MemoryLayout::UniformBuffer {
        4 * elem
    } else {
        size as u64 * elem
    }
}

fn vector_alignment(size: VectorSize, scalar: Scalar) -> u64 {
    let elem = scalar_size(scalar);
    match size {
        VectorSize::Bi => 2 * elem,
        // vec3 rounds up to vec4 alignment in both layout modes.
        VectorSize::Tri | VectorSize::Quad => 4 * elem,
    }
}

/// Computes the total bytes a buffer binding must provide to back a value of
/// this type. Zero for types with no host representation (textures, samplers,
/// pointers, bool, void). A runtime-sized array contributes exactly one
/// element's stride.
pub fn min_buffer_binding_size(
    handle: Handle<Type>,
    layout: MemoryLayout,
    types: &UniqueArena<Type>,
) -> u64 {
    match types[handle].inner {
        TypeInner::Void
        | TypeInner::Pointer { .. }
        | TypeInner::Sampler { .. }
        | TypeInner::Texture { .. } => 0,
        TypeInner::Scalar(scalar) => scalar_size(scalar),
        TypeInner::Vector { size, scalar } => vector_size(size, scalar, layout),
        TypeInner::Matrix {
            rows,
            columns,
            scalar,
        } => {
            let col_align = vector_alignment(rows, scalar);
            (columns as u64 - 1) * col_align + rows as u64 * scalar_size(scalar)
        }
        TypeInner::Array { base, size, stride } => {
            let elem_size = min_buffer_binding_size(base, layout, types);
            if elem_size == 0 {
                return 0;
            }
            let align = base_alignment(handle, layout, types);
            let stride = match stride {
                Some(s) => u64::from(s),
                None => round_up(align, elem_size),
            };
            let count = match size {
                ArraySize::Constant(n) => u64::from(n),
                // The minimum binding still covers one element.
                ArraySize::Runtime => 1,
            };
            count * stride
        }
        TypeInner::Struct { ref members, .. } => {
            let unrounded = members
                .iter()
                .map(|m| u64::from(m.offset) + min_buffer_binding_size(m.ty, layout, types))
                .max()
                .unwrap_or(0);
            round_up(base_alignment(handle, layout, types), unrounded)
        }
        TypeInner::AccessControl { base, .. } | TypeInner::Alias { base } => {
            min_buffer_binding_size(base, layout, types)
        }
    }
}

/// Computes the alignment a value of this type requires at the start of a
/// buffer binding. Zero for types with no host representation.
pub fn base_alignment(
    handle: Handle<Type>,
    layout: MemoryLayout,
    types: &UniqueArena<Type>,
) -> u64 {
    match types[handle].inner {
        TypeInner::Void
        | TypeInner::Pointer { .. }
        | TypeInner::Sampler { .. }
        | TypeInner::Texture { .. } => 0,
        TypeInner::Scalar(scalar) => scalar_size(scalar),
        TypeInner::Vector { size, scalar } => vector_alignment(size, scalar),
        TypeInner::Matrix { rows, scalar, .. } => vector_alignment(rows, scalar),
        TypeInner::Array { base, .. } => {
            let elem = base_alignment(base, layout, types);
            if elem == 0 {
                return 0;
            }
            match layout {
                MemoryLayout::UniformBuffer => round_up(16, elem),
                MemoryLayout::StorageBuffer => elem,
            }
        }
        TypeInner::Struct { ref members, .. } => {
            let largest = members
                .iter()
                .map(|m| base_alignment(m.ty, layout, types))
                .max()
                .unwrap_or(0);
            if largest == 0 {
                return 0;
            }
            match layout {
                MemoryLayout::UniformBuffer => round_up(16, largest),
                MemoryLayout::StorageBuffer => largest,
            }
        }
        TypeInner::AccessControl { base, .. } | TypeInner::Alias { base } => {
            base_alignment(base, layout, types)
        }
    }
}

/// Strips `Alias` and `AccessControl` layers, leaving pointers intact.
pub fn unwrap_if_needed(handle: Handle<Type>, types: &UniqueArena<Type>) -> Handle<Type> {
    let mut current = handle;
    loop {
        match types[current].inner {
            TypeInner::Alias { base } | TypeInner::AccessControl { base, .. } => current = base,
            _ => return current,
        }
    }
}

/// Strips `Alias` and `AccessControl` layers and sees through at most one
/// `Pointer`. A second pointer layer, consecutive or not, blocks further
/// unwrapping: pointers to pointers are not auto-dereferenced transitively.
pub fn unwrap_all(handle: Handle<Type>, types: &UniqueArena<Type>) -> Handle<Type> {
    let mut current = unwrap_if_needed(handle, types);
    if let TypeInner::Pointer { base, .. } = types[current].inner {
        current = unwrap_if_needed(base, types);
    }
    current
}
