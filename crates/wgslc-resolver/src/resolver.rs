//! The type determiner.
//!
//! A single forward pass over a module's declarations, in declaration
//! order, resolving every expression bottom-up and recording call edges
//! and referenced globals as it goes. Ancestor entry points and transitive
//! global references are closed over the call graph once the pass ends.

use log::debug;

use wgslc_ast::{
    Arena, ArraySize, BinaryOp, Expression, Function, GlobalVariable, Handle, Module, Scalar,
    ScalarKind, Statement, StorageClass, SymbolTable, Type, TypeInner, UnaryOp, UniqueArena,
    VectorSize, type_name, unwrap_all, unwrap_if_needed,
};

use crate::intrinsic::{self, IntrinsicCall};
use crate::scope::{Definition, ScopeStack};
use crate::{FunctionInfo, ResolveError, ResolvedModule};

/// Resolves every declaration in `module`, interning any derived types the
/// pass needs into the module's registry.
///
/// Always returns the accumulated metadata; check
/// [`ResolvedModule::has_errors`] before trusting it. A declaration that
/// fails leaves its expressions untyped without stopping later declarations.
pub fn resolve(module: &mut Module) -> ResolvedModule {
    let Module {
        ref symbols,
        ref mut types,
        ref global_variables,
        ref expressions,
        ref functions,
    } = *module;

    let mut resolver = Resolver {
        symbols,
        types,
        globals: global_variables,
        expressions,
        functions,
        expr_types: vec![None; expressions.len()],
        info: vec![FunctionInfo::default(); functions.len()],
        scopes: ScopeStack::new(),
        errors: Vec::new(),
        current: None,
    };
    resolver.resolve_module();

    let Resolver {
        expr_types,
        mut info,
        errors,
        ..
    } = resolver;

    close_referenced_globals(&mut info);
    mark_ancestor_entry_points(functions, &mut info);

    debug!(
        "resolved {} function(s), {} diagnostic(s)",
        functions.len(),
        errors.len()
    );

    ResolvedModule {
        expr_types,
        info,
        diagnostics: errors,
    }
}

/// Folds each callee's referenced globals into its callers until the sets
/// stop growing.
fn close_referenced_globals(info: &mut [FunctionInfo]) {
    loop {
        let mut changed = false;
        for caller in 0..info.len() {
            let callees: Vec<_> = info[caller].callees.iter().copied().collect();
            for callee in callees {
                let inherited: Vec<_> = info[callee.index()]
                    .referenced_globals
                    .iter()
                    .copied()
                    .collect();
                for global in inherited {
                    changed |= info[caller].referenced_globals.insert(global);
                }
            }
        }
        if !changed {
            return;
        }
    }
}

/// Records, for every function reachable from an entry point, which entry
/// points can reach it. An entry point is not its own ancestor.
fn mark_ancestor_entry_points(functions: &Arena<Function>, info: &mut [FunctionInfo]) {
    for (entry, function) in functions.iter() {
        if !function.is_entry_point() {
            continue;
        }
        let mut stack: Vec<_> = info[entry.index()].callees.iter().copied().collect();
        while let Some(reached) = stack.pop() {
            if !info[reached.index()].ancestor_entry_points.insert(entry) {
                continue;
            }
            stack.extend(info[reached.index()].callees.iter().copied());
        }
    }
}

/// Scalar-or-vector-or-matrix view of a value type, for operator rules.
#[derive(Clone, Copy, PartialEq, Eq)]
enum BinShape {
    Scalar(Scalar),
    Vector(VectorSize, Scalar),
    Matrix {
        rows: VectorSize,
        columns: VectorSize,
        scalar: Scalar,
    },
    Other,
}

/// Can a constructor argument of scalar type `from` fill a `to` slot?
fn convertible(from: Scalar, to: Scalar) -> bool {
    if from.kind == ScalarKind::Bool || to.kind == ScalarKind::Bool {
        from.kind == to.kind
    } else {
        true
    }
}

struct Resolver<'a> {
    symbols: &'a SymbolTable,
    types: &'a mut UniqueArena<Type>,
    globals: &'a Arena<GlobalVariable>,
    expressions: &'a Arena<Expression>,
    functions: &'a Arena<Function>,
    expr_types: Vec<Option<Handle<Type>>>,
    info: Vec<FunctionInfo>,
    scopes: ScopeStack,
    errors: Vec<ResolveError>,
    /// The function whose body is being resolved, for local lookups and
    /// metadata recording.
    current: Option<(Handle<Function>, &'a Function)>,
}

impl<'a> Resolver<'a> {
    fn resolve_module(&mut self) {
        let globals = self.globals;
        for (handle, var) in globals.iter() {
            if let Err(error) = self.resolve_global(handle, var) {
                self.errors.push(error);
            }
        }

        let functions = self.functions;
        for (handle, function) in functions.iter() {
            self.current = Some((handle, function));
            let base = self.scopes.depth();
            let result = self.resolve_function(function);
            while self.scopes.depth() > base {
                self.scopes.pop();
            }
            self.current = None;
            if let Err(error) = result {
                self.errors.push(error);
            }
            // The name becomes visible to later declarations even when the
            // body failed; the signature itself is sound.
            self.scopes.set(function.name, Definition::Function(handle));
        }
    }

    fn resolve_global(
        &mut self,
        handle: Handle<GlobalVariable>,
        var: &GlobalVariable,
    ) -> Result<(), ResolveError> {
        if !var.is_const && !var.class.valid_for_module_scope() {
            return Err(ResolveError::InvalidModuleStorageClass(
                var.class.to_string(),
            ));
        }
        if let Some(init) = var.init {
            let found = self.resolve_expression(init)?;
            let expected = unwrap_all(var.ty, self.types);
            if unwrap_all(found, self.types) != expected {
                return Err(ResolveError::InitializerMismatch {
                    expected: self.name_of(expected),
                    found: self.name_of(found),
                });
            }
        }
        self.scopes.set(var.name, Definition::Global(handle));
        Ok(())
    }

    fn resolve_function(&mut self, function: &'a Function) -> Result<(), ResolveError> {
        debug!(
            "resolving function `{}`",
            self.symbols.name_of(function.name).unwrap_or("_")
        );
        self.in_scope(|cx| {
            for param in &function.params {
                cx.scopes.set(param.name, Definition::Param { ty: param.ty });
            }
            cx.resolve_block(function, &function.body)
        })
    }

    /// Runs `body` inside a fresh scope, unwinding any scopes it leaves
    /// open on the error path.
    fn in_scope<R>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<R, ResolveError>,
    ) -> Result<R, ResolveError> {
        let depth = self.scopes.depth();
        self.scopes.push();
        let out = body(self);
        while self.scopes.depth() > depth {
            self.scopes.pop();
        }
        out
    }

    fn resolve_block(
        &mut self,
        function: &'a Function,
        block: &'a [Statement],
    ) -> Result<(), ResolveError> {
        for statement in block {
            self.resolve_statement(function, statement)?;
        }
        Ok(())
    }

    fn resolve_statement(
        &mut self,
        function: &'a Function,
        statement: &'a Statement,
    ) -> Result<(), ResolveError> {
        match *statement {
            Statement::VariableDecl(handle) => {
                let local = &function.local_variables[handle];
                if !local.class.valid_for_function_scope() {
                    return Err(ResolveError::InvalidLocalStorageClass(
                        local.class.to_string(),
                    ));
                }
                if let Some(init) = local.init {
                    let found = self.resolve_expression(init)?;
                    let expected = unwrap_all(local.ty, self.types);
                    if unwrap_all(found, self.types) != expected {
                        return Err(ResolveError::InitializerMismatch {
                            expected: self.name_of(expected),
                            found: self.name_of(found),
                        });
                    }
                }
                self.scopes.set(local.name, Definition::Local(handle));
                Ok(())
            }
            Statement::Assign { lhs, rhs } => {
                let target = self.resolve_expression(lhs)?;
                let value = self.resolve_expression(rhs)?;
                let stripped = unwrap_if_needed(target, self.types);
                let TypeInner::Pointer { .. } = self.types[stripped].inner else {
                    return Err(ResolveError::NotAssignable);
                };
                let expected = unwrap_all(target, self.types);
                let found = unwrap_all(value, self.types);
                if expected != found {
                    return Err(ResolveError::AssignMismatch {
                        expected: self.name_of(expected),
                        found: self.name_of(found),
                    });
                }
                Ok(())
            }
            Statement::If {
                condition,
                ref accept,
                ref reject,
            } => {
                self.check_bool_condition(condition)?;
                self.in_scope(|cx| cx.resolve_block(function, accept))?;
                self.in_scope(|cx| cx.resolve_block(function, reject))
            }
            Statement::Switch {
                condition,
                ref cases,
            } => {
                let ty = self.resolve_expression(condition)?;
                let value = unwrap_all(ty, self.types);
                let scalar = match self.types[value].inner {
                    TypeInner::Scalar(s) if s.is_integer() => s,
                    _ => return Err(ResolveError::NonIntegerSwitch(self.name_of(value))),
                };
                for case in cases {
                    // Selectors are stored as i32, so the only representable
                    // mismatch is a negative selector on an unsigned condition.
                    if scalar.kind == ScalarKind::Uint
                        && let Some(&selector) = case.selectors.iter().find(|&&s| s < 0)
                    {
                        return Err(ResolveError::SwitchSelectorMismatch {
                            ty: self.name_of(value),
                            selector,
                        });
                    }
                    self.in_scope(|cx| cx.resolve_block(function, &case.body))?;
                }
                Ok(())
            }
            Statement::Loop {
                ref body,
                ref continuing,
            } => self.in_scope(|cx| {
                cx.resolve_block(function, body)?;
                cx.in_scope(|cx| cx.resolve_block(function, continuing))
            }),
            Statement::Call(expr) => {
                self.resolve_expression(expr)?;
                Ok(())
            }
            Statement::Return { value } => {
                let declared = function.return_type.map(|ty| unwrap_all(ty, self.types));
                match (declared, value) {
                    (None, None) => Ok(()),
                    (Some(expected), Some(value)) => {
                        let found = self.resolve_expression(value)?;
                        let found = unwrap_all(found, self.types);
                        if found != expected {
                            return Err(ResolveError::ReturnMismatch {
                                expected: self.name_of(expected),
                                found: self.name_of(found),
                            });
                        }
                        Ok(())
                    }
                    (Some(expected), None) => Err(ResolveError::ReturnMismatch {
                        expected: self.name_of(expected),
                        found: "void".into(),
                    }),
                    (None, Some(value)) => {
                        let found = self.resolve_expression(value)?;
                        Err(ResolveError::ReturnMismatch {
                            expected: "void".into(),
                            found: self.name_of(unwrap_all(found, self.types)),
                        })
                    }
                }
            }
            Statement::Break | Statement::Continue | Statement::Discard => Ok(()),
        }
    }

    fn check_bool_condition(&mut self, condition: Handle<Expression>) -> Result<(), ResolveError> {
        let ty = self.resolve_expression(condition)?;
        let value = unwrap_all(ty, self.types);
        match self.types[value].inner {
            TypeInner::Scalar(Scalar::BOOL) => Ok(()),
            _ => Err(ResolveError::NonBoolCondition(self.name_of(value))),
        }
    }

    fn resolve_expression(
        &mut self,
        expr: Handle<Expression>,
    ) -> Result<Handle<Type>, ResolveError> {
        let expressions = self.expressions;
        let ty = match expressions[expr] {
            Expression::Literal(literal) => self.intern(TypeInner::Scalar(literal.scalar())),
            Expression::Identifier(sym) => self.resolve_identifier(sym)?,
            Expression::Index { base, index } => self.resolve_index(base, index)?,
            Expression::Member { base, member } => self.resolve_member(base, member)?,
            Expression::Unary { op, expr } => self.resolve_unary(op, expr)?,
            Expression::Binary { op, left, right } => self.resolve_binary(op, left, right)?,
            Expression::Call {
                function,
                ref arguments,
            } => self.resolve_call(function, arguments)?,
            Expression::Construct {
                ty,
                ref components,
            } => self.resolve_construct(ty, components)?,
            Expression::Bitcast { ty, expr } => self.resolve_bitcast(ty, expr)?,
        };
        // Each node is resolved at most once; the slot is write-once.
        debug_assert!(self.expr_types[expr.index()].is_none());
        self.expr_types[expr.index()] = Some(ty);
        Ok(ty)
    }

    fn resolve_identifier(&mut self, sym: wgslc_ast::Symbol) -> Result<Handle<Type>, ResolveError> {
        let text = self.symbols.name_of(sym).unwrap_or("_").to_owned();
        match self.scopes.get(sym) {
            Some(Definition::Global(handle)) => {
                let var = &self.globals[handle];
                if let Some((current, _)) = self.current {
                    self.info[current.index()].referenced_globals.insert(handle);
                }
                if var.is_const {
                    Ok(var.ty)
                } else {
                    // Variables resolve as references to their contents.
                    Ok(self.intern(TypeInner::Pointer {
                        base: var.ty,
                        class: var.class,
                    }))
                }
            }
            Some(Definition::Local(handle)) => {
                let (_, function) = self
                    .current
                    .ok_or_else(|| ResolveError::UnknownIdentifier(text.clone()))?;
                let local = &function.local_variables[handle];
                if local.is_const {
                    Ok(local.ty)
                } else {
                    let class = match local.class {
                        StorageClass::None => StorageClass::Function,
                        other => other,
                    };
                    Ok(self.intern(TypeInner::Pointer {
                        base: local.ty,
                        class,
                    }))
                }
            }
            Some(Definition::Param { ty }) => Ok(ty),
            Some(Definition::Function(_)) => Err(ResolveError::FunctionUsedAsValue(text)),
            None => Err(ResolveError::UnknownIdentifier(text)),
        }
    }

    /// Splits a resolved type into its value type and, when it is a
    /// reference, the storage class to re-wrap results with.
    fn split_reference(&self, ty: Handle<Type>) -> (Handle<Type>, Option<StorageClass>) {
        let stripped = unwrap_if_needed(ty, self.types);
        match self.types[stripped].inner {
            TypeInner::Pointer { base, class } => (unwrap_if_needed(base, self.types), Some(class)),
            _ => (stripped, None),
        }
    }

    fn rewrap(&mut self, ty: Handle<Type>, class: Option<StorageClass>) -> Handle<Type> {
        match class {
            Some(class) => self.intern(TypeInner::Pointer { base: ty, class }),
            None => ty,
        }
    }

    fn resolve_index(
        &mut self,
        base: Handle<Expression>,
        index: Handle<Expression>,
    ) -> Result<Handle<Type>, ResolveError> {
        let base_ty = self.resolve_expression(base)?;
        let index_ty = self.resolve_expression(index)?;

        let index_value = unwrap_all(index_ty, self.types);
        match self.types[index_value].inner {
            TypeInner::Scalar(s) if s.is_integer() => {}
            _ => return Err(ResolveError::NonIntegerIndex(self.name_of(index_value))),
        }

        let (inner, class) = self.split_reference(base_ty);
        let element = match self.types[inner].inner {
            TypeInner::Array { base, .. } => base,
            TypeInner::Vector { scalar, .. } => self.intern(TypeInner::Scalar(scalar)),
            // A matrix indexes to one of its column vectors.
            TypeInner::Matrix { rows, scalar, .. } => {
                self.intern(TypeInner::Vector { size: rows, scalar })
            }
            _ => return Err(ResolveError::NotIndexable(self.name_of(inner))),
        };
        Ok(self.rewrap(element, class))
    }

    fn resolve_member(
        &mut self,
        base: Handle<Expression>,
        member: wgslc_ast::Symbol,
    ) -> Result<Handle<Type>, ResolveError> {
        let base_ty = self.resolve_expression(base)?;
        let (inner, class) = self.split_reference(base_ty);
        let text = self.symbols.name_of(member).unwrap_or("").to_owned();

        match self.types[inner].inner {
            TypeInner::Struct { ref members, .. } => {
                let field = members.iter().find(|m| m.name == text).map(|m| m.ty);
                match field {
                    Some(ty) => Ok(self.rewrap(ty, class)),
                    None => Err(ResolveError::UnknownMember {
                        ty: self.name_of(inner),
                        member: text,
                    }),
                }
            }
            TypeInner::Vector { size, scalar } => {
                let ty_name = self.name_of(inner);
                let invalid = || ResolveError::InvalidSwizzle {
                    pattern: text.clone(),
                    ty: ty_name.clone(),
                };
                if text.is_empty() || text.len() > 4 {
                    return Err(invalid());
                }
                for ch in text.chars() {
                    let component = match ch {
                        'x' | 'r' => 0,
                        'y' | 'g' => 1,
                        'z' | 'b' => 2,
                        'w' | 'a' => 3,
                        _ => return Err(invalid()),
                    };
                    if component >= size as u32 {
                        return Err(invalid());
                    }
                }
                if text.len() == 1 {
                    // Single-component swizzles stay assignable.
                    let scalar_ty = self.intern(TypeInner::Scalar(scalar));
                    Ok(self.rewrap(scalar_ty, class))
                } else {
                    // Multi-component swizzles are values, never references.
                    let size = VectorSize::from_count(text.len() as u32)
                        .ok_or_else(invalid)?;
                    Ok(self.intern(TypeInner::Vector { size, scalar }))
                }
            }
            _ => Err(ResolveError::UnknownMember {
                ty: self.name_of(inner),
                member: text,
            }),
        }
    }

    fn resolve_unary(
        &mut self,
        op: UnaryOp,
        expr: Handle<Expression>,
    ) -> Result<Handle<Type>, ResolveError> {
        let ty = self.resolve_expression(expr)?;
        let value = unwrap_all(ty, self.types);
        let shape = self.bin_shape(value);
        let ok = match op {
            UnaryOp::Negate => match shape {
                BinShape::Scalar(s) | BinShape::Vector(_, s) => s.is_signed_numeric(),
                _ => false,
            },
            UnaryOp::LogicalNot => matches!(
                shape,
                BinShape::Scalar(Scalar::BOOL) | BinShape::Vector(_, Scalar::BOOL)
            ),
        };
        if ok {
            Ok(value)
        } else {
            Err(ResolveError::InvalidUnaryOperand {
                op: op.to_string(),
                operand: self.name_of(value),
            })
        }
    }

    fn bin_shape(&self, ty: Handle<Type>) -> BinShape {
        match self.types[ty].inner {
            TypeInner::Scalar(s) => BinShape::Scalar(s),
            TypeInner::Vector { size, scalar } => BinShape::Vector(size, scalar),
            TypeInner::Matrix {
                rows,
                columns,
                scalar,
            } => BinShape::Matrix {
                rows,
                columns,
                scalar,
            },
            _ => BinShape::Other,
        }
    }

    fn resolve_binary(
        &mut self,
        op: BinaryOp,
        left: Handle<Expression>,
        right: Handle<Expression>,
    ) -> Result<Handle<Type>, ResolveError> {
        let left_ty = self.resolve_expression(left)?;
        let right_ty = self.resolve_expression(right)?;
        let lhs = unwrap_all(left_ty, self.types);
        let rhs = unwrap_all(right_ty, self.types);
        self.binary_result(op, lhs, rhs)
            .ok_or_else(|| ResolveError::InvalidBinaryOperands {
                op: op.to_string(),
                left: self.name_of(lhs),
                right: self.name_of(rhs),
            })
    }

    fn binary_result(
        &mut self,
        op: BinaryOp,
        lhs: Handle<Type>,
        rhs: Handle<Type>,
    ) -> Option<Handle<Type>> {
        let ls = self.bin_shape(lhs);
        let rs = self.bin_shape(rhs);

        if op.is_short_circuit() {
            return match (ls, rs) {
                (BinShape::Scalar(Scalar::BOOL), BinShape::Scalar(Scalar::BOOL)) => {
                    Some(self.intern(TypeInner::Scalar(Scalar::BOOL)))
                }
                _ => None,
            };
        }

        if op.is_comparison() {
            if lhs != rhs {
                return None;
            }
            let equality_only = matches!(op, BinaryOp::Equal | BinaryOp::NotEqual);
            return match ls {
                BinShape::Scalar(s) if s.is_numeric() || equality_only => {
                    Some(self.intern(TypeInner::Scalar(Scalar::BOOL)))
                }
                BinShape::Vector(size, s) if s.is_numeric() || equality_only => {
                    Some(self.intern(TypeInner::Vector {
                        size,
                        scalar: Scalar::BOOL,
                    }))
                }
                _ => None,
            };
        }

        let integer_only = matches!(
            op,
            BinaryOp::BitwiseAnd
                | BinaryOp::BitwiseOr
                | BinaryOp::BitwiseXor
                | BinaryOp::ShiftLeft
                | BinaryOp::ShiftRight
        );

        match (ls, rs) {
            (BinShape::Scalar(a), BinShape::Scalar(b)) if a == b && a.is_numeric() => {
                (!integer_only || a.is_integer()).then_some(lhs)
            }
            (BinShape::Vector(n, a), BinShape::Vector(m, b))
                if n == m && a == b && a.is_numeric() =>
            {
                (!integer_only || a.is_integer()).then_some(lhs)
            }
            // Scalar/vector broadcast.
            (BinShape::Vector(_, a), BinShape::Scalar(b)) if a == b && a.is_numeric() => {
                (!integer_only || a.is_integer()).then_some(lhs)
            }
            (BinShape::Scalar(a), BinShape::Vector(_, b)) if a == b && a.is_numeric() => {
                (!integer_only || a.is_integer()).then_some(rhs)
            }
            // Matrix algebra, multiplication only.
            (BinShape::Matrix { scalar, .. }, BinShape::Scalar(s))
                if op == BinaryOp::Multiply && s == scalar =>
            {
                Some(lhs)
            }
            (BinShape::Scalar(s), BinShape::Matrix { scalar, .. })
                if op == BinaryOp::Multiply && s == scalar =>
            {
                Some(rhs)
            }
            (
                BinShape::Matrix {
                    rows,
                    columns,
                    scalar,
                },
                BinShape::Vector(size, s),
            ) if op == BinaryOp::Multiply && s == scalar && size == columns => {
                Some(self.intern(TypeInner::Vector { size: rows, scalar }))
            }
            (
                BinShape::Vector(size, s),
                BinShape::Matrix {
                    rows,
                    columns,
                    scalar,
                },
            ) if op == BinaryOp::Multiply && s == scalar && size == rows => Some(self.intern(
                TypeInner::Vector {
                    size: columns,
                    scalar,
                },
            )),
            (
                BinShape::Matrix {
                    rows,
                    columns: inner_l,
                    scalar,
                },
                BinShape::Matrix {
                    rows: inner_r,
                    columns,
                    scalar: s,
                },
            ) if op == BinaryOp::Multiply && s == scalar && inner_l == inner_r => {
                Some(self.intern(TypeInner::Matrix {
                    rows,
                    columns,
                    scalar,
                }))
            }
            _ => None,
        }
    }

    fn resolve_call(
        &mut self,
        callee: wgslc_ast::Symbol,
        arguments: &[Handle<Expression>],
    ) -> Result<Handle<Type>, ResolveError> {
        let mut values = Vec::with_capacity(arguments.len());
        for &arg in arguments {
            let ty = self.resolve_expression(arg)?;
            values.push(unwrap_all(ty, self.types));
        }
        let name = self.symbols.name_of(callee).unwrap_or("_").to_owned();

        match intrinsic::resolve_call(&name, &values, self.types) {
            IntrinsicCall::Resolved(ty) => return Ok(ty),
            IntrinsicCall::NoOverload => {
                return Err(ResolveError::NoMatchingOverload {
                    name,
                    count: values.len(),
                });
            }
            IntrinsicCall::NotIntrinsic => {}
        }

        let Some(Definition::Function(handle)) = self.scopes.get(callee) else {
            return Err(ResolveError::UnknownFunction(name));
        };
        let function = &self.functions[handle];
        if function.params.len() != values.len() {
            return Err(ResolveError::NoMatchingOverload {
                name,
                count: values.len(),
            });
        }
        for (param, &value) in function.params.iter().zip(&values) {
            if unwrap_all(param.ty, self.types) != value {
                return Err(ResolveError::NoMatchingOverload {
                    name,
                    count: values.len(),
                });
            }
        }

        if let Some((current, _)) = self.current {
            self.info[current.index()].callees.insert(handle);
        }
        match function.return_type {
            Some(ty) => Ok(ty),
            None => Ok(self.intern(TypeInner::Void)),
        }
    }

    fn resolve_construct(
        &mut self,
        ty: Handle<Type>,
        components: &[Handle<Expression>],
    ) -> Result<Handle<Type>, ResolveError> {
        let mut values = Vec::with_capacity(components.len());
        for &component in components {
            let resolved = self.resolve_expression(component)?;
            values.push(unwrap_all(resolved, self.types));
        }
        let target = unwrap_if_needed(ty, self.types);
        // Zero arguments construct the zero value, but only of a
        // constructible type.
        if values.is_empty() {
            return match self.types[target].inner {
                TypeInner::Scalar(_)
                | TypeInner::Vector { .. }
                | TypeInner::Matrix { .. }
                | TypeInner::Struct { .. }
                | TypeInner::Array {
                    size: ArraySize::Constant(_),
                    ..
                } => Ok(ty),
                _ => Err(ResolveError::NotConstructible(self.name_of(ty))),
            };
        }
        match self.types[target].inner.clone() {
            TypeInner::Scalar(scalar) => {
                if values.len() != 1 {
                    return Err(self.arity_error(ty, 1, values.len()));
                }
                self.check_scalar_component(ty, 0, scalar, values[0])?;
                Ok(ty)
            }
            TypeInner::Vector { size, scalar } => {
                // One argument splats; otherwise one per component.
                if values.len() != 1 && values.len() != size as usize {
                    return Err(self.arity_error(ty, size as u32, values.len()));
                }
                for (index, &value) in values.iter().enumerate() {
                    self.check_scalar_component(ty, index, scalar, value)?;
                }
                Ok(ty)
            }
            TypeInner::Matrix {
                rows,
                columns,
                scalar,
            } => {
                if values.len() != columns as usize {
                    return Err(self.arity_error(ty, columns as u32, values.len()));
                }
                let column = self.intern(TypeInner::Vector { size: rows, scalar });
                for (index, &value) in values.iter().enumerate() {
                    if value != column {
                        return Err(self.component_error(ty, index, column, value));
                    }
                }
                Ok(ty)
            }
            TypeInner::Array {
                base,
                size: ArraySize::Constant(count),
                ..
            } => {
                if values.len() != count as usize {
                    return Err(self.arity_error(ty, count, values.len()));
                }
                let element = unwrap_all(base, self.types);
                for (index, &value) in values.iter().enumerate() {
                    if value != element {
                        return Err(self.component_error(ty, index, element, value));
                    }
                }
                Ok(ty)
            }
            TypeInner::Struct { members, .. } => {
                if values.len() != members.len() {
                    return Err(self.arity_error(ty, members.len() as u32, values.len()));
                }
                for (index, (member, &value)) in members.iter().zip(&values).enumerate() {
                    let expected = unwrap_all(member.ty, self.types);
                    if value != expected {
                        return Err(self.component_error(ty, index, expected, value));
                    }
                }
                Ok(ty)
            }
            _ => Err(ResolveError::NotConstructible(self.name_of(ty))),
        }
    }

    fn check_scalar_component(
        &mut self,
        ty: Handle<Type>,
        index: usize,
        expected: Scalar,
        value: Handle<Type>,
    ) -> Result<(), ResolveError> {
        match self.types[value].inner {
            TypeInner::Scalar(found) if convertible(found, expected) => Ok(()),
            _ => {
                let expected = self.intern(TypeInner::Scalar(expected));
                Err(self.component_error(ty, index, expected, value))
            }
        }
    }

    fn arity_error(&self, ty: Handle<Type>, expected: u32, found: usize) -> ResolveError {
        ResolveError::ConstructorArity {
            ty: self.name_of(ty),
            expected,
            found,
        }
    }

    fn component_error(
        &self,
        ty: Handle<Type>,
        index: usize,
        expected: Handle<Type>,
        found: Handle<Type>,
    ) -> ResolveError {
        ResolveError::ConstructorComponent {
            ty: self.name_of(ty),
            index,
            expected: self.name_of(expected),
            found: self.name_of(found),
        }
    }

    fn resolve_bitcast(
        &mut self,
        ty: Handle<Type>,
        expr: Handle<Expression>,
    ) -> Result<Handle<Type>, ResolveError> {
        let source = self.resolve_expression(expr)?;
        let source = unwrap_all(source, self.types);
        let target = unwrap_if_needed(ty, self.types);

        let arity_of = |h: Handle<Type>, types: &UniqueArena<Type>| match types[h].inner {
            TypeInner::Scalar(s) if s.is_numeric() && s.width == 4 => Some(1u32),
            TypeInner::Vector { size, scalar } if scalar.is_numeric() && scalar.width == 4 => {
                Some(size as u32)
            }
            _ => None,
        };

        match (arity_of(target, self.types), arity_of(source, self.types)) {
            (Some(t), Some(s)) if t == s => Ok(ty),
            _ => Err(ResolveError::InvalidBitcast(self.name_of(target))),
        }
    }

    fn intern(&mut self, inner: TypeInner) -> Handle<Type> {
        self.types.insert(Type { name: None, inner })
    }

    fn name_of(&self, ty: Handle<Type>) -> String {
        type_name(ty, self.types)
    }
}
