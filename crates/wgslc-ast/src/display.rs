//! Display implementations, canonical type names, and a module text dump.

use std::fmt;

use crate::Module;
use crate::arena::{Handle, UniqueArena};
use crate::expr::{BinaryOp, Expression, Literal, UnaryOp};
use crate::func::PipelineStage;
use crate::global::{BuiltIn, ResourceBinding, StorageClass};
use crate::stmt::Statement;
use crate::types::{
    AccessControl, ArraySize, Scalar, ScalarKind, StorageFormat, TextureClass, TextureDimension,
    Type, TypeInner,
};

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ScalarKind::Bool => write!(f, "bool"),
            ScalarKind::Sint => write!(f, "i{}", self.width * 8),
            ScalarKind::Uint => write!(f, "u{}", self.width * 8),
            ScalarKind::Float => write!(f, "f{}", self.width * 8),
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Input => "in",
            Self::Output => "out",
            Self::Uniform => "uniform",
            Self::Workgroup => "workgroup",
            Self::UniformConstant => "uniform_constant",
            Self::Storage => "storage",
            Self::Private => "private",
            Self::Function => "function",
        })
    }
}

impl fmt::Display for AccessControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadOnly => "read",
            Self::WriteOnly => "write",
            Self::ReadWrite => "read_write",
        })
    }
}

impl fmt::Display for TextureDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::D1 => "1d",
            Self::D2 => "2d",
            Self::D3 => "3d",
            Self::Cube => "cube",
        })
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::R32Float => "r32float",
            Self::R32Sint => "r32sint",
            Self::R32Uint => "r32uint",
            Self::Rgba8Unorm => "rgba8unorm",
            Self::Rgba16Float => "rgba16float",
            Self::Rgba32Float => "rgba32float",
        })
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Compute => "compute",
        })
    }
}

impl fmt::Display for BuiltIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Position => "position",
            Self::VertexIndex => "vertex_index",
            Self::InstanceIndex => "instance_index",
            Self::FrontFacing => "front_facing",
            Self::FragCoord => "frag_coord",
            Self::FragDepth => "frag_depth",
            Self::GlobalInvocationId => "global_invocation_id",
            Self::LocalInvocationId => "local_invocation_id",
            Self::LocalInvocationIndex => "local_invocation_index",
            Self::WorkgroupId => "workgroup_id",
        })
    }
}

impl fmt::Display for ResourceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[group({}), binding({})]]", self.group, self.binding)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}u"),
            Self::F32(v) => write!(f, "{v}f"),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::LogicalNot => write!(f, "!"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::BitwiseXor => "^",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
        };
        f.write_str(s)
    }
}

/// Renders the canonical structural name of a type.
///
/// Names are globally unique per structure and stable, suitable as
/// deduplication/debug keys for backends naming generated types.
pub fn type_name(handle: Handle<Type>, types: &UniqueArena<Type>) -> String {
    let ty = &types[handle];
    match ty.inner {
        TypeInner::Void => "void".into(),
        TypeInner::Scalar(s) => format!("{s}"),
        TypeInner::Vector { size, scalar } => format!("vec{}<{scalar}>", size as u32),
        TypeInner::Matrix {
            rows,
            columns,
            scalar,
        } => format!("mat{}x{}<{scalar}>", columns as u32, rows as u32),
        TypeInner::Array { base, size, stride } => {
            let base = type_name(base, types);
            let mut out = match size {
                ArraySize::Constant(n) => format!("array<{base}, {n}>"),
                ArraySize::Runtime => format!("array<{base}>"),
            };
            if let Some(stride) = stride {
                out = format!("[[stride({stride})]] {out}");
            }
            out
        }
        TypeInner::Struct { .. } => {
            format!("struct {}", ty.name.as_deref().unwrap_or("<anonymous>"))
        }
        TypeInner::Pointer { base, class } => {
            format!("ptr<{class}, {}>", type_name(base, types))
        }
        TypeInner::AccessControl { access, base } => {
            format!("[[access({access})]] {}", type_name(base, types))
        }
        TypeInner::Alias { .. } => ty.name.clone().unwrap_or_else(|| "<alias>".into()),
        TypeInner::Sampler { comparison } => if comparison {
            "sampler_comparison"
        } else {
            "sampler"
        }
        .into(),
        TypeInner::Texture { dim, class } => match class {
            TextureClass::Sampled { scalar } => format!("texture_{dim}<{scalar}>"),
            TextureClass::Multisampled { scalar } => {
                format!("texture_multisampled_{dim}<{scalar}>")
            }
            TextureClass::Depth => format!("texture_depth_{dim}"),
            TextureClass::Storage { format, access } => {
                format!("texture_storage_{dim}<{format}, {access}>")
            }
        },
    }
}

fn format_expr(handle: Handle<Expression>, module: &Module) -> String {
    let name = |sym| {
        module
            .symbols
            .name_of(sym)
            .unwrap_or("<unknown>")
            .to_owned()
    };
    match &module.expressions[handle] {
        Expression::Literal(lit) => format!("{lit}"),
        Expression::Identifier(sym) => name(*sym),
        Expression::Index { base, index } => {
            format!(
                "{}[{}]",
                format_expr(*base, module),
                format_expr(*index, module)
            )
        }
        Expression::Member { base, member } => {
            format!("{}.{}", format_expr(*base, module), name(*member))
        }
        Expression::Unary { op, expr } => format!("{op}{}", format_expr(*expr, module)),
        Expression::Binary { op, left, right } => {
            format!(
                "({} {op} {})",
                format_expr(*left, module),
                format_expr(*right, module)
            )
        }
        Expression::Call {
            function,
            arguments,
        } => {
            let args: Vec<_> = arguments.iter().map(|&a| format_expr(a, module)).collect();
            format!("{}({})", name(*function), args.join(", "))
        }
        Expression::Construct { ty, components } => {
            let args: Vec<_> = components.iter().map(|&a| format_expr(a, module)).collect();
            format!("{}({})", type_name(*ty, &module.types), args.join(", "))
        }
        Expression::Bitcast { ty, expr } => {
            format!(
                "bitcast<{}>({})",
                type_name(*ty, &module.types),
                format_expr(*expr, module)
            )
        }
    }
}

fn write_stmt(out: &mut String, stmt: &Statement, module: &Module, indent: usize) {
    let pad = " ".repeat(indent);
    match stmt {
        Statement::VariableDecl(local) => {
            out.push_str(&format!("{pad}var {local:?}\n"));
        }
        Statement::Assign { lhs, rhs } => {
            out.push_str(&format!(
                "{pad}{} = {}\n",
                format_expr(*lhs, module),
                format_expr(*rhs, module)
            ));
        }
        Statement::If {
            condition,
            accept,
            reject,
        } => {
            out.push_str(&format!("{pad}if ({}) {{\n", format_expr(*condition, module)));
            for s in accept {
                write_stmt(out, s, module, indent + 2);
            }
            if !reject.is_empty() {
                out.push_str(&format!("{pad}}} else {{\n"));
                for s in reject {
                    write_stmt(out, s, module, indent + 2);
                }
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        Statement::Switch { condition, cases } => {
            out.push_str(&format!(
                "{pad}switch ({}) {{\n",
                format_expr(*condition, module)
            ));
            for case in cases {
                if case.selectors.is_empty() {
                    out.push_str(&format!("{pad}  default:\n"));
                } else {
                    out.push_str(&format!("{pad}  case {:?}:\n", case.selectors));
                }
                for s in &case.body {
                    write_stmt(out, s, module, indent + 4);
                }
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        Statement::Loop { body, continuing } => {
            out.push_str(&format!("{pad}loop {{\n"));
            for s in body {
                write_stmt(out, s, module, indent + 2);
            }
            if !continuing.is_empty() {
                out.push_str(&format!("{pad}  continuing {{\n"));
                for s in continuing {
                    write_stmt(out, s, module, indent + 4);
                }
                out.push_str(&format!("{pad}  }}\n"));
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        Statement::Call(expr) => {
            out.push_str(&format!("{pad}{}\n", format_expr(*expr, module)));
        }
        Statement::Return { value } => match value {
            Some(v) => out.push_str(&format!("{pad}return {}\n", format_expr(*v, module))),
            None => out.push_str(&format!("{pad}return\n")),
        },
        Statement::Break => out.push_str(&format!("{pad}break\n")),
        Statement::Continue => out.push_str(&format!("{pad}continue\n")),
        Statement::Discard => out.push_str(&format!("{pad}discard\n")),
    }
}

/// Produces a human-readable text dump of a [`Module`] for debugging.
pub fn dump_module(module: &Module) -> String {
    let mut out = String::new();

    out.push_str("Types:\n");
    for (handle, _) in module.types.iter() {
        out.push_str(&format!("  {handle:?} {}\n", type_name(handle, &module.types)));
    }

    if !module.global_variables.is_empty() {
        out.push_str("\nGlobal Variables:\n");
        for (handle, var) in module.global_variables.iter() {
            let name = module.symbols.name_of(var.name).unwrap_or("_");
            let decoration = match &var.binding {
                Some(b) => format!("{b} "),
                None => String::new(),
            };
            let kw = if var.is_const { "const" } else { "var" };
            out.push_str(&format!(
                "  {handle:?} {decoration}{kw}<{}> {name}: {}\n",
                var.class,
                type_name(var.ty, &module.types)
            ));
        }
    }

    if !module.functions.is_empty() {
        out.push_str("\nFunctions:\n");
        for (handle, func) in module.functions.iter() {
            let name = module.symbols.name_of(func.name).unwrap_or("_");
            if let Some(stage) = func.stage {
                out.push_str(&format!("  [[stage({stage})]]\n"));
            }
            let params: Vec<_> = func
                .params
                .iter()
                .map(|p| {
                    format!(
                        "{}: {}",
                        module.symbols.name_of(p.name).unwrap_or("_"),
                        type_name(p.ty, &module.types)
                    )
                })
                .collect();
            let ret = match func.return_type {
                Some(ty) => format!(" -> {}", type_name(ty, &module.types)),
                None => String::new(),
            };
            out.push_str(&format!(
                "  fn {name}({})  [{handle:?}]{ret} {{\n",
                params.join(", ")
            ));
            for stmt in &func.body {
                write_stmt(&mut out, stmt, module, 4);
            }
            out.push_str("  }\n");
        }
    }

    out
}
