//! End-to-end resolution over hand-built modules.

use wgslc_ast::{
    ArraySize, BinaryOp, Expression, Function, GlobalVariable, Handle, Literal, LocalVariable,
    Module, Parameter, PipelineStage, ResourceBinding, Scalar, Statement, StorageClass, SwitchCase,
    Type, TypeInner, VectorSize,
};
use wgslc_resolver::{ResolveError, resolve};

fn scalar_ty(module: &mut Module, scalar: Scalar) -> Handle<Type> {
    module.types.insert(Type {
        name: None,
        inner: TypeInner::Scalar(scalar),
    })
}

fn vec_ty(module: &mut Module, size: VectorSize, scalar: Scalar) -> Handle<Type> {
    module.types.insert(Type {
        name: None,
        inner: TypeInner::Vector { size, scalar },
    })
}

fn ptr_ty(module: &mut Module, base: Handle<Type>, class: StorageClass) -> Handle<Type> {
    module.types.insert(Type {
        name: None,
        inner: TypeInner::Pointer { base, class },
    })
}

fn ident(module: &mut Module, name: &str) -> Handle<Expression> {
    let sym = module.symbols.register(name);
    module.expressions.append(Expression::Identifier(sym))
}

fn literal(module: &mut Module, lit: Literal) -> Handle<Expression> {
    module.expressions.append(Expression::Literal(lit))
}

fn global_var(
    module: &mut Module,
    name: &str,
    class: StorageClass,
    ty: Handle<Type>,
) -> Handle<GlobalVariable> {
    let sym = module.symbols.register(name);
    module
        .global_variables
        .append(GlobalVariable::new(sym, class, ty))
}

fn function(module: &mut Module, name: &str, body: Vec<Statement>) -> Handle<Function> {
    let sym = module.symbols.register(name);
    let mut f = Function::new(sym);
    f.body = body;
    module.functions.append(f)
}

fn entry_point(
    module: &mut Module,
    name: &str,
    stage: PipelineStage,
    body: Vec<Statement>,
) -> Handle<Function> {
    let sym = module.symbols.register(name);
    let mut f = Function::new(sym);
    f.stage = Some(stage);
    f.body = body;
    module.functions.append(f)
}

#[test]
fn variable_identifier_resolves_as_reference() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    global_var(&mut module, "x", StorageClass::Private, f32h);

    let lhs = ident(&mut module, "x");
    let rhs = literal(&mut module, Literal::F32(1.0));
    function(&mut module, "main", vec![Statement::Assign { lhs, rhs }]);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    let expected = ptr_ty(&mut module, f32h, StorageClass::Private);
    assert_eq!(resolved.type_of(lhs), Some(expected));
    assert_eq!(resolved.type_of(rhs), Some(f32h));
}

#[test]
fn constant_identifier_resolves_as_value() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    let init = literal(&mut module, Literal::F32(2.0));
    let sym = module.symbols.register("pi_ish");
    let mut var = GlobalVariable::new(sym, StorageClass::None, f32h);
    var.is_const = true;
    var.init = Some(init);
    module.global_variables.append(var);

    let use_site = ident(&mut module, "pi_ish");
    let name = module.symbols.register("main");
    let mut f = Function::new(name);
    f.return_type = Some(f32h);
    f.body = vec![Statement::Return {
        value: Some(use_site),
    }];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    assert_eq!(resolved.type_of(use_site), Some(f32h));
}

#[test]
fn indexing_preserves_reference() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    let arr = module.types.insert(Type {
        name: None,
        inner: TypeInner::Array {
            base: f32h,
            size: ArraySize::Constant(8),
            stride: Some(4),
        },
    });
    let mut var = GlobalVariable::new(
        module.symbols.register("data"),
        StorageClass::Storage,
        arr,
    );
    var.binding = Some(ResourceBinding {
        group: 0,
        binding: 0,
    });
    module.global_variables.append(var);

    let base = ident(&mut module, "data");
    let index = literal(&mut module, Literal::I32(3));
    let element = module.expressions.append(Expression::Index { base, index });
    let rhs = literal(&mut module, Literal::F32(0.5));
    function(&mut module, "main", vec![Statement::Assign {
        lhs: element,
        rhs,
    }]);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    let expected = ptr_ty(&mut module, f32h, StorageClass::Storage);
    assert_eq!(resolved.type_of(element), Some(expected));
}

#[test]
fn matrix_indexing_yields_column_vector() {
    let mut module = Module::new();
    let mat = module.types.insert(Type {
        name: None,
        inner: TypeInner::Matrix {
            rows: VectorSize::Tri,
            columns: VectorSize::Bi,
            scalar: Scalar::F32,
        },
    });
    global_var(&mut module, "m", StorageClass::Private, mat);

    let base = ident(&mut module, "m");
    let index = literal(&mut module, Literal::U32(1));
    let column = module.expressions.append(Expression::Index { base, index });
    function(&mut module, "main", vec![Statement::Call(column)]);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    let vec3 = vec_ty(&mut module, VectorSize::Tri, Scalar::F32);
    let expected = ptr_ty(&mut module, vec3, StorageClass::Private);
    assert_eq!(resolved.type_of(column), Some(expected));
}

#[test]
fn swizzles_on_a_parameter() {
    let mut module = Module::new();
    let vec4 = vec_ty(&mut module, VectorSize::Quad, Scalar::F32);
    let f32h = scalar_ty(&mut module, Scalar::F32);
    let vec3 = vec_ty(&mut module, VectorSize::Tri, Scalar::F32);

    let v = module.symbols.register("v");
    let xyz = module.symbols.register("xyz");
    let x = module.symbols.register("x");
    let base_a = module.expressions.append(Expression::Identifier(v));
    let multi = module.expressions.append(Expression::Member {
        base: base_a,
        member: xyz,
    });
    let base_b = module.expressions.append(Expression::Identifier(v));
    let single = module.expressions.append(Expression::Member {
        base: base_b,
        member: x,
    });

    let name = module.symbols.register("helper");
    let mut f = Function::new(name);
    f.params.push(Parameter { name: v, ty: vec4 });
    f.body = vec![Statement::Call(multi), Statement::Call(single)];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    // Multi-letter swizzles are values; a parameter base is a value too, so
    // the single-letter access is a bare scalar.
    assert_eq!(resolved.type_of(multi), Some(vec3));
    assert_eq!(resolved.type_of(single), Some(f32h));
}

#[test]
fn out_of_range_swizzle_is_an_error() {
    let mut module = Module::new();
    let vec2 = vec_ty(&mut module, VectorSize::Bi, Scalar::F32);
    let v = module.symbols.register("v");
    let z = module.symbols.register("z");
    let base = module.expressions.append(Expression::Identifier(v));
    let access = module.expressions.append(Expression::Member {
        base,
        member: z,
    });
    let name = module.symbols.register("helper");
    let mut f = Function::new(name);
    f.params.push(Parameter { name: v, ty: vec2 });
    f.body = vec![Statement::Call(access)];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::InvalidSwizzle { .. }]
    ));
    assert_eq!(resolved.type_of(access), None);
}

#[test]
fn multiply_shapes() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    let vec2 = vec_ty(&mut module, VectorSize::Bi, Scalar::F32);
    let vec3 = vec_ty(&mut module, VectorSize::Tri, Scalar::F32);
    let mat3x2 = module.types.insert(Type {
        name: None,
        inner: TypeInner::Matrix {
            rows: VectorSize::Tri,
            columns: VectorSize::Bi,
            scalar: Scalar::F32,
        },
    });

    let s = module.symbols.register("s");
    let v = module.symbols.register("v");
    let w = module.symbols.register("w");
    let m = module.symbols.register("m");

    let mul = |module: &mut Module, left, right| {
        module.expressions.append(Expression::Binary {
            op: BinaryOp::Multiply,
            left,
            right,
        })
    };

    let s0 = module.expressions.append(Expression::Identifier(s));
    let v0 = module.expressions.append(Expression::Identifier(v));
    let scalar_times_vector = mul(&mut module, s0, v0);

    let m0 = module.expressions.append(Expression::Identifier(m));
    let v1 = module.expressions.append(Expression::Identifier(v));
    let matrix_times_vector = mul(&mut module, m0, v1);

    let w0 = module.expressions.append(Expression::Identifier(w));
    let m1 = module.expressions.append(Expression::Identifier(m));
    let vector_times_matrix = mul(&mut module, w0, m1);

    let name = module.symbols.register("helper");
    let mut f = Function::new(name);
    f.params.push(Parameter { name: s, ty: f32h });
    f.params.push(Parameter { name: v, ty: vec2 });
    f.params.push(Parameter { name: w, ty: vec3 });
    f.params.push(Parameter { name: m, ty: mat3x2 });
    f.body = vec![
        Statement::Call(scalar_times_vector),
        Statement::Call(matrix_times_vector),
        Statement::Call(vector_times_matrix),
    ];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    // m has 3 rows and 2 columns: m * vec2 contracts over columns giving
    // vec3, and vec3 * m contracts over rows giving vec2.
    assert_eq!(resolved.type_of(scalar_times_vector), Some(vec2));
    assert_eq!(resolved.type_of(matrix_times_vector), Some(vec3));
    assert_eq!(resolved.type_of(vector_times_matrix), Some(vec2));
}

#[test]
fn mismatched_multiply_is_rejected() {
    let mut module = Module::new();
    let vec2 = vec_ty(&mut module, VectorSize::Bi, Scalar::F32);
    let vec3 = vec_ty(&mut module, VectorSize::Tri, Scalar::F32);
    let a = module.symbols.register("a");
    let b = module.symbols.register("b");
    let left = module.expressions.append(Expression::Identifier(a));
    let right = module.expressions.append(Expression::Identifier(b));
    let product = module.expressions.append(Expression::Binary {
        op: BinaryOp::Multiply,
        left,
        right,
    });
    let name = module.symbols.register("helper");
    let mut f = Function::new(name);
    f.params.push(Parameter { name: a, ty: vec2 });
    f.params.push(Parameter { name: b, ty: vec3 });
    f.body = vec![Statement::Call(product)];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::InvalidBinaryOperands { .. }]
    ));
}

#[test]
fn comparison_produces_bool_vector() {
    let mut module = Module::new();
    let vec3 = vec_ty(&mut module, VectorSize::Tri, Scalar::F32);
    let a = module.symbols.register("a");
    let left = module.expressions.append(Expression::Identifier(a));
    let right = module.expressions.append(Expression::Identifier(a));
    let cmp = module.expressions.append(Expression::Binary {
        op: BinaryOp::Less,
        left,
        right,
    });
    let name = module.symbols.register("helper");
    let mut f = Function::new(name);
    f.params.push(Parameter { name: a, ty: vec3 });
    f.body = vec![Statement::Call(cmp)];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    let bool3 = vec_ty(&mut module, VectorSize::Tri, Scalar::BOOL);
    assert_eq!(resolved.type_of(cmp), Some(bool3));
}

#[test]
fn call_graph_edges_and_ancestor_entry_points() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    let mut var = GlobalVariable::new(
        module.symbols.register("scale"),
        StorageClass::Uniform,
        f32h,
    );
    var.binding = Some(ResourceBinding {
        group: 0,
        binding: 0,
    });
    let scale = module.global_variables.append(var);

    // fn helper() -> f32 { return scale; }
    let use_site = ident(&mut module, "scale");
    let helper_sym = module.symbols.register("helper");
    let mut helper_fn = Function::new(helper_sym);
    helper_fn.return_type = Some(f32h);
    helper_fn.body = vec![Statement::Return {
        value: Some(use_site),
    }];
    let helper = module.functions.append(helper_fn);

    let call_a = module.expressions.append(Expression::Call {
        function: helper_sym,
        arguments: vec![],
    });
    let vertex = entry_point(&mut module, "vs_main", PipelineStage::Vertex, vec![
        Statement::Call(call_a),
    ]);

    let call_b = module.expressions.append(Expression::Call {
        function: helper_sym,
        arguments: vec![],
    });
    let compute = entry_point(&mut module, "cs_main", PipelineStage::Compute, vec![
        Statement::Call(call_b),
    ]);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    assert_eq!(resolved.type_of(call_a), Some(f32h));

    let helper_info = resolved.function_info(helper);
    assert!(helper_info.referenced_globals.contains(&scale));
    assert_eq!(
        helper_info.ancestor_entry_points.iter().copied().collect::<Vec<_>>(),
        vec![vertex, compute]
    );

    // Both entry points inherit the helper's global reference.
    for ep in [vertex, compute] {
        let info = resolved.function_info(ep);
        assert!(info.callees.contains(&helper));
        assert!(info.referenced_globals.contains(&scale));
        assert!(info.ancestor_entry_points.is_empty());
    }
}

#[test]
fn calling_an_undeclared_function_fails() {
    let mut module = Module::new();
    let later = module.symbols.register("later");
    let call = module.expressions.append(Expression::Call {
        function: later,
        arguments: vec![],
    });
    function(&mut module, "first", vec![Statement::Call(call)]);
    function(&mut module, "later", vec![]);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::UnknownFunction(name)] if name.as_str() == "later"
    ));
}

#[test]
fn intrinsic_calls() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    let vec3 = vec_ty(&mut module, VectorSize::Tri, Scalar::F32);

    let a = module.symbols.register("a");
    let sqrt = module.symbols.register("sqrt");
    let dot = module.symbols.register("dot");

    let arg0 = module.expressions.append(Expression::Identifier(a));
    let arg1 = module.expressions.append(Expression::Identifier(a));
    let dot_call = module.expressions.append(Expression::Call {
        function: dot,
        arguments: vec![arg0, arg1],
    });
    let sqrt_call = module.expressions.append(Expression::Call {
        function: sqrt,
        arguments: vec![dot_call],
    });

    let name = module.symbols.register("len_sq");
    let mut f = Function::new(name);
    f.params.push(Parameter { name: a, ty: vec3 });
    f.return_type = Some(f32h);
    f.body = vec![Statement::Return {
        value: Some(sqrt_call),
    }];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    assert_eq!(resolved.type_of(dot_call), Some(f32h));
    assert_eq!(resolved.type_of(sqrt_call), Some(f32h));
}

#[test]
fn intrinsic_overload_mismatch_names_the_call() {
    let mut module = Module::new();
    let arg = literal(&mut module, Literal::I32(1));
    let sin = module.symbols.register("sin");
    let call = module.expressions.append(Expression::Call {
        function: sin,
        arguments: vec![arg],
    });
    function(&mut module, "main", vec![Statement::Call(call)]);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::NoMatchingOverload { name, count: 1 }] if name.as_str() == "sin"
    ));
}

#[test]
fn intrinsic_arity_errors() {
    let mut module = Module::new();
    let vec3 = vec_ty(&mut module, VectorSize::Tri, Scalar::F32);
    let a = module.symbols.register("a");
    let distance = module.symbols.register("distance");
    let arg = module.expressions.append(Expression::Identifier(a));
    let call = module.expressions.append(Expression::Call {
        function: distance,
        arguments: vec![arg],
    });
    let name = module.symbols.register("helper");
    let mut f = Function::new(name);
    f.params.push(Parameter { name: a, ty: vec3 });
    f.body = vec![Statement::Call(call)];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::NoMatchingOverload { name, count: 1 }] if name.as_str() == "distance"
    ));
}

#[test]
fn select_condition_must_be_bool() {
    let mut module = Module::new();
    let select = module.symbols.register("select");
    let a = literal(&mut module, Literal::F32(1.0));
    let b = literal(&mut module, Literal::F32(2.0));
    let c = literal(&mut module, Literal::U32(1));
    let call = module.expressions.append(Expression::Call {
        function: select,
        arguments: vec![a, b, c],
    });
    function(&mut module, "main", vec![Statement::Call(call)]);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::NoMatchingOverload { count: 3, .. }]
    ));
}

#[test]
fn vector_constructor() {
    let mut module = Module::new();
    let vec3 = vec_ty(&mut module, VectorSize::Tri, Scalar::F32);
    let c0 = literal(&mut module, Literal::F32(1.0));
    let c1 = literal(&mut module, Literal::F32(2.0));
    // An integer component converts to the element type.
    let c2 = literal(&mut module, Literal::I32(3));
    let construct = module.expressions.append(Expression::Construct {
        ty: vec3,
        components: vec![c0, c1, c2],
    });
    function(&mut module, "main", vec![Statement::Call(construct)]);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    assert_eq!(resolved.type_of(construct), Some(vec3));
}

#[test]
fn constructor_arity_mismatch() {
    let mut module = Module::new();
    let vec3 = vec_ty(&mut module, VectorSize::Tri, Scalar::F32);
    let c0 = literal(&mut module, Literal::F32(1.0));
    let c1 = literal(&mut module, Literal::F32(2.0));
    let construct = module.expressions.append(Expression::Construct {
        ty: vec3,
        components: vec![c0, c1],
    });
    function(&mut module, "main", vec![Statement::Call(construct)]);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::ConstructorArity {
            expected: 3,
            found: 2,
            ..
        }]
    ));
}

#[test]
fn bool_constructor_does_not_convert_from_numeric() {
    let mut module = Module::new();
    let bool2 = vec_ty(&mut module, VectorSize::Bi, Scalar::BOOL);
    let c0 = literal(&mut module, Literal::Bool(true));
    let c1 = literal(&mut module, Literal::F32(1.0));
    let construct = module.expressions.append(Expression::Construct {
        ty: bool2,
        components: vec![c0, c1],
    });
    function(&mut module, "main", vec![Statement::Call(construct)]);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::ConstructorComponent { index: 1, .. }]
    ));
}

#[test]
fn zero_argument_constructors_need_a_constructible_type() {
    let mut module = Module::new();
    let vec2 = vec_ty(&mut module, VectorSize::Bi, Scalar::F32);
    let sampler = module.types.insert(Type {
        name: None,
        inner: TypeInner::Sampler { comparison: false },
    });
    let zero = module.expressions.append(Expression::Construct {
        ty: vec2,
        components: vec![],
    });
    let opaque = module.expressions.append(Expression::Construct {
        ty: sampler,
        components: vec![],
    });
    function(&mut module, "fine", vec![Statement::Call(zero)]);
    function(&mut module, "broken", vec![Statement::Call(opaque)]);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::NotConstructible(ty)] if ty.as_str() == "sampler"
    ));
    assert_eq!(resolved.type_of(zero), Some(vec2));
    assert_eq!(resolved.type_of(opaque), None);
}

#[test]
fn module_scope_storage_class_is_validated() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    global_var(&mut module, "bad", StorageClass::Function, f32h);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::InvalidModuleStorageClass(class)] if class.as_str() == "function"
    ));
}

#[test]
fn local_storage_class_is_validated() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    let name = module.symbols.register("main");
    let mut f = Function::new(name);
    let local = f.local_variables.append(LocalVariable {
        name: module.symbols.register("tmp"),
        class: StorageClass::Uniform,
        ty: f32h,
        is_const: false,
        init: None,
    });
    f.body = vec![Statement::VariableDecl(local)];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::InvalidLocalStorageClass(class)] if class.as_str() == "uniform"
    ));
}

#[test]
fn assignment_type_mismatch() {
    let mut module = Module::new();
    let i32h = scalar_ty(&mut module, Scalar::I32);
    global_var(&mut module, "counter", StorageClass::Private, i32h);

    let lhs = ident(&mut module, "counter");
    let rhs = literal(&mut module, Literal::F32(1.5));
    function(&mut module, "main", vec![Statement::Assign { lhs, rhs }]);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::AssignMismatch { expected, found }]
            if expected.as_str() == "i32" && found.as_str() == "f32"
    ));
}

#[test]
fn assigning_to_a_value_fails() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    let a = module.symbols.register("a");
    let lhs = module.expressions.append(Expression::Identifier(a));
    let rhs = literal(&mut module, Literal::F32(1.0));
    let name = module.symbols.register("helper");
    let mut f = Function::new(name);
    f.params.push(Parameter { name: a, ty: f32h });
    f.body = vec![Statement::Assign { lhs, rhs }];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::NotAssignable]
    ));
}

#[test]
fn one_bad_declaration_leaves_the_rest_resolved() {
    let mut module = Module::new();
    let i32h = scalar_ty(&mut module, Scalar::I32);
    let f32h = scalar_ty(&mut module, Scalar::F32);
    global_var(&mut module, "counter", StorageClass::Private, i32h);
    global_var(&mut module, "level", StorageClass::Private, f32h);

    // First function seeds exactly one type error.
    let bad_lhs = ident(&mut module, "counter");
    let bad_rhs = literal(&mut module, Literal::F32(1.5));
    function(&mut module, "broken", vec![Statement::Assign {
        lhs: bad_lhs,
        rhs: bad_rhs,
    }]);

    // Second function is independent and must resolve fully.
    let good_lhs = ident(&mut module, "level");
    let good_rhs = literal(&mut module, Literal::F32(2.0));
    function(&mut module, "fine", vec![Statement::Assign {
        lhs: good_lhs,
        rhs: good_rhs,
    }]);

    let resolved = resolve(&mut module);
    assert_eq!(resolved.diagnostics().len(), 1);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::AssignMismatch { .. }]
    ));
    let expected = ptr_ty(&mut module, f32h, StorageClass::Private);
    assert_eq!(resolved.type_of(good_lhs), Some(expected));
    assert_eq!(resolved.type_of(good_rhs), Some(f32h));
}

#[test]
fn locals_shadow_and_scope_out() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    let i32h = scalar_ty(&mut module, Scalar::I32);

    let name = module.symbols.register("main");
    let mut f = Function::new(name);
    let outer = f.local_variables.append(LocalVariable {
        name: module.symbols.register("x"),
        class: StorageClass::None,
        ty: f32h,
        is_const: false,
        init: None,
    });
    let inner = f.local_variables.append(LocalVariable {
        name: module.symbols.register("x"),
        class: StorageClass::None,
        ty: i32h,
        is_const: false,
        init: None,
    });

    let cond = literal(&mut module, Literal::Bool(true));
    let inner_use = ident(&mut module, "x");
    let outer_use = ident(&mut module, "x");
    f.body = vec![
        Statement::VariableDecl(outer),
        Statement::If {
            condition: cond,
            accept: vec![
                Statement::VariableDecl(inner),
                Statement::Call(inner_use),
            ],
            reject: vec![],
        },
        // The inner declaration has scoped out again here.
        Statement::Call(outer_use),
    ];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    let ptr_i32 = ptr_ty(&mut module, i32h, StorageClass::Function);
    let ptr_f32 = ptr_ty(&mut module, f32h, StorageClass::Function);
    assert_eq!(resolved.type_of(inner_use), Some(ptr_i32));
    assert_eq!(resolved.type_of(outer_use), Some(ptr_f32));
}

#[test]
fn return_type_mismatch() {
    let mut module = Module::new();
    let i32h = scalar_ty(&mut module, Scalar::I32);
    let value = literal(&mut module, Literal::F32(1.0));
    let name = module.symbols.register("main");
    let mut f = Function::new(name);
    f.return_type = Some(i32h);
    f.body = vec![Statement::Return { value: Some(value) }];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::ReturnMismatch { expected, found }]
            if expected.as_str() == "i32" && found.as_str() == "f32"
    ));
}

#[test]
fn if_condition_must_be_bool() {
    let mut module = Module::new();
    let cond = literal(&mut module, Literal::F32(1.0));
    function(&mut module, "main", vec![Statement::If {
        condition: cond,
        accept: vec![],
        reject: vec![],
    }]);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::NonBoolCondition(found)] if found.as_str() == "f32"
    ));
}

#[test]
fn switch_condition_must_be_an_integer_scalar() {
    let mut module = Module::new();
    let cond = literal(&mut module, Literal::F32(0.0));
    function(&mut module, "main", vec![Statement::Switch {
        condition: cond,
        cases: vec![SwitchCase {
            selectors: vec![0],
            body: vec![Statement::Break],
        }],
    }]);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::NonIntegerSwitch(found)] if found.as_str() == "f32"
    ));
}

#[test]
fn switch_on_a_signed_condition_allows_negative_selectors() {
    let mut module = Module::new();
    let cond = literal(&mut module, Literal::I32(2));
    function(&mut module, "main", vec![Statement::Switch {
        condition: cond,
        cases: vec![
            SwitchCase {
                selectors: vec![-1, 2],
                body: vec![Statement::Break],
            },
            // The default case carries no selectors.
            SwitchCase {
                selectors: vec![],
                body: vec![],
            },
        ],
    }]);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
}

#[test]
fn negative_selector_on_an_unsigned_switch() {
    let mut module = Module::new();
    let u32h = scalar_ty(&mut module, Scalar::U32);
    let n = module.symbols.register("n");
    let cond = module.expressions.append(Expression::Identifier(n));
    let name = module.symbols.register("helper");
    let mut f = Function::new(name);
    f.params.push(Parameter { name: n, ty: u32h });
    f.body = vec![Statement::Switch {
        condition: cond,
        cases: vec![SwitchCase {
            selectors: vec![0, -3],
            body: vec![Statement::Break],
        }],
    }];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::SwitchSelectorMismatch { ty, selector: -3 }] if ty.as_str() == "u32"
    ));
}

#[test]
fn global_initializer_type_mismatch() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    let init = literal(&mut module, Literal::I32(1));
    let sym = module.symbols.register("level");
    let mut var = GlobalVariable::new(sym, StorageClass::Private, f32h);
    var.init = Some(init);
    module.global_variables.append(var);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::InitializerMismatch { expected, found }]
            if expected.as_str() == "f32" && found.as_str() == "i32"
    ));
}

#[test]
fn local_initializer_type_mismatch() {
    let mut module = Module::new();
    let i32h = scalar_ty(&mut module, Scalar::I32);
    let init = literal(&mut module, Literal::Bool(true));
    let name = module.symbols.register("main");
    let mut f = Function::new(name);
    let local = f.local_variables.append(LocalVariable {
        name: module.symbols.register("tmp"),
        class: StorageClass::None,
        ty: i32h,
        is_const: false,
        init: Some(init),
    });
    f.body = vec![Statement::VariableDecl(local)];
    module.functions.append(f);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::InitializerMismatch { expected, found }]
            if expected.as_str() == "i32" && found.as_str() == "bool"
    ));
}

#[test]
fn bitcast_reinterprets_at_the_same_width() {
    let mut module = Module::new();
    let u32h = scalar_ty(&mut module, Scalar::U32);
    let source = literal(&mut module, Literal::F32(1.0));
    let cast = module.expressions.append(Expression::Bitcast {
        ty: u32h,
        expr: source,
    });
    function(&mut module, "main", vec![Statement::Call(cast)]);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
    assert_eq!(resolved.type_of(cast), Some(u32h));
}

#[test]
fn bitcast_rejects_non_numeric_targets() {
    let mut module = Module::new();
    let boolh = scalar_ty(&mut module, Scalar::BOOL);
    let source = literal(&mut module, Literal::U32(1));
    let cast = module.expressions.append(Expression::Bitcast {
        ty: boolh,
        expr: source,
    });
    function(&mut module, "main", vec![Statement::Call(cast)]);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::InvalidBitcast(ty)] if ty.as_str() == "bool"
    ));
}

#[test]
fn bitcast_cannot_change_component_count() {
    let mut module = Module::new();
    let vec2u = vec_ty(&mut module, VectorSize::Bi, Scalar::U32);
    let source = literal(&mut module, Literal::F32(1.0));
    let cast = module.expressions.append(Expression::Bitcast {
        ty: vec2u,
        expr: source,
    });
    function(&mut module, "main", vec![Statement::Call(cast)]);

    let resolved = resolve(&mut module);
    assert!(matches!(
        resolved.diagnostics(),
        [ResolveError::InvalidBitcast(ty)] if ty.as_str() == "vec2<u32>"
    ));
}

#[test]
fn aliases_are_transparent_to_assignment() {
    let mut module = Module::new();
    let f32h = scalar_ty(&mut module, Scalar::F32);
    let alias = module.types.insert(Type {
        name: Some("Scalar".into()),
        inner: TypeInner::Alias { base: f32h },
    });
    global_var(&mut module, "x", StorageClass::Private, alias);

    let lhs = ident(&mut module, "x");
    let rhs = literal(&mut module, Literal::F32(1.0));
    function(&mut module, "main", vec![Statement::Assign { lhs, rhs }]);

    let resolved = resolve(&mut module);
    assert!(!resolved.has_errors(), "{:?}", resolved.diagnostics());
}
