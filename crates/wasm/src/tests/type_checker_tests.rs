/*
 * Copyright (c) 2026. Mikhail Kulik.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use crate::error::{CompileError, CompileResult};
use crate::ir::{FunctionDef, Stmt};
use crate::signatures::SignatureRegistry;
use crate::transform;
use crate::type_checker::TypeChecker;
use crate::types::{FunctionSignature, SemanticType};

use SemanticType::{Bool, Float, Int};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn lower(source: &str) -> Vec<FunctionDef> {
    let module = parser::parse_source(source).expect("source should parse");
    transform::module(&module).expect("source should lower")
}

/// Check every function in order, registering each one like a compilation unit does.
fn check_with(registry: &mut SignatureRegistry, source: &str) -> CompileResult<Vec<FunctionDef>> {
    let mut checked = Vec::new();
    for mut def in lower(source) {
        let signature = TypeChecker::new(registry).check_function(&mut def)?;
        registry.register_function(&def.name, signature)?;
        checked.push(def);
    }
    Ok(checked)
}

fn check(source: &str) -> CompileResult<Vec<FunctionDef>> {
    check_with(&mut SignatureRegistry::new(), source)
}

fn check_ok(source: &str) -> FunctionDef {
    check(source)
        .expect("type checking should succeed")
        .pop()
        .expect("at least one function")
}

fn check_err(source: &str) -> CompileError {
    check(source).expect_err("type checking should fail")
}

fn is_type_error(err: &CompileError) -> bool {
    matches!(err, CompileError::Type { .. })
}

// ─── Accepted programs ────────────────────────────────────────────────────────

#[test]
fn test_annotated_function_signature() {
    let def = check_ok("def add(a: int, b: int) -> int:\n    return a + b\n");
    assert_eq!(def.return_type(), Some(Int));
    assert_eq!(def.params[0].resolved(), Some(Int));
    assert_eq!(def.params[1].resolved(), Some(Int));
}

#[test]
fn test_return_type_inferred_from_first_return() {
    let def = check_ok("def half(x: float):\n    return x / 2.0\n");
    assert_eq!(def.return_type(), Some(Float));
}

#[test]
fn test_no_return_means_none() {
    let def = check_ok("def noop(x: int):\n    pass\n");
    assert_eq!(def.return_type(), Some(SemanticType::None));
}

#[test]
fn test_assignment_types_are_written_back() {
    let def = check_ok("def f(a: int) -> bool:\n    x = a * 2\n    ok = x > 3\n    return ok\n");
    let types: Vec<_> = def
        .body
        .iter()
        .filter_map(|s| match &s.node {
            Stmt::Assign { target, .. } => target.resolved(),
            _ => None,
        })
        .collect();
    assert_eq!(types, vec![Int, Bool]);
}

#[test]
fn test_inference_is_stable_across_runs() {
    let source = "def f(n: int):\n    if n > 0:\n        return n * 2\n    return 0 - n\n";
    let first = check_ok(source);
    let second = check_ok(source);
    assert_eq!(first.return_type(), second.return_type());
    assert_eq!(first, second);
}

#[test]
fn test_recursion_with_declared_return() {
    let def = check_ok(
        "def fib(n: int) -> int:\n    if n < 2:\n        return n\n    return fib(n - 1) + fib(n - 2)\n",
    );
    assert_eq!(def.return_type(), Some(Int));
}

#[test]
fn test_recursion_after_inferred_return() {
    let def = check_ok("def down(n: int):\n    if n < 1:\n        return 0\n    return down(n - 1)\n");
    assert_eq!(def.return_type(), Some(Int));
}

#[test]
fn test_calls_to_earlier_functions() {
    let defs = check(
        "def sq(x: int) -> int:\n    return x * x\n\ndef sum_sq(a: int, b: int) -> int:\n    return sq(a) + sq(b)\n",
    )
    .expect("type checking should succeed");
    assert_eq!(defs.len(), 2);
}

#[test]
fn test_conversion_builtins() {
    let def = check_ok("def f(x: float) -> bool:\n    n = int(x)\n    y = float(n)\n    return bool(y)\n");
    assert_eq!(def.return_type(), Some(Bool));
}

#[test]
fn test_for_range_counter_is_int() {
    let def = check_ok("def total(n: int) -> int:\n    s = 0\n    for i in range(n):\n        s += i\n    return s\n");
    let Stmt::ForRange { target, .. } = &def.body[1].node else {
        panic!("expected ForRange, got {:?}", def.body[1]);
    };
    assert_eq!(target.resolved(), Some(Int));
}

#[test]
fn test_callback_resolution() {
    let mut registry = SignatureRegistry::new();
    registry
        .register_callback("log", FunctionSignature::new(vec![Int], SemanticType::None))
        .expect("callback registration");
    check_with(&mut registry, "def f(x: int) -> None:\n    log(x)\n").expect("type checking should succeed");

    let err = check_with(&mut registry, "def g(x: float) -> None:\n    log(x)\n")
        .expect_err("float argument to int callback");
    assert!(matches!(err, CompileError::Signature { .. }), "got {:?}", err);
}

// ─── Rejected programs ────────────────────────────────────────────────────────

#[test]
fn test_dynamic_type_change_rejected() {
    let err = check_err("def f() -> int:\n    x = 1\n    x = 1.5\n    return x\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_annotation_mismatch_rejected() {
    let err = check_err("def f() -> None:\n    x: float = 1\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_missing_parameter_annotation_rejected() {
    let err = check_err("def f(x) -> int:\n    return x\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_inconsistent_returns_rejected() {
    let err = check_err("def f(x: int):\n    if x > 0:\n        return 1\n    return 2.0\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_return_contradicting_declaration_rejected() {
    let err = check_err("def f(x: int) -> float:\n    return x\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_bare_return_in_valued_function_rejected() {
    let err = check_err("def f(x: int) -> int:\n    return\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_recursion_with_unknown_return_rejected() {
    let err = check_err("def f(n: int):\n    return f(n)\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_mixed_operand_types_rejected() {
    let err = check_err("def f(a: int, b: float) -> float:\n    return a + b\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_float_modulo_rejected() {
    let err = check_err("def f(a: float, b: float) -> float:\n    return a % b\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_bool_arithmetic_rejected() {
    let err = check_err("def f(a: bool, b: bool) -> bool:\n    return a + b\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_not_on_int_rejected() {
    let err = check_err("def f(a: int) -> bool:\n    return not a\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_non_bool_condition_rejected() {
    let err = check_err("def f(a: int) -> int:\n    if a:\n        return 1\n    return 0\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_float_range_bound_rejected() {
    let err = check_err("def f(n: float) -> None:\n    for i in range(n):\n        pass\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_loop_variable_type_conflict_rejected() {
    let err = check_err("def f() -> None:\n    i = 0.5\n    for i in range(3):\n        pass\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_assigning_none_rejected() {
    let err = check_err("def noop() -> None:\n    pass\n\ndef f() -> None:\n    x = noop()\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_printing_none_rejected() {
    let err = check_err("def noop() -> None:\n    pass\n\ndef f() -> None:\n    print(noop())\n");
    assert!(is_type_error(&err), "got {:?}", err);
}

#[test]
fn test_undefined_variable_rejected() {
    let err = check_err("def f() -> int:\n    return y\n");
    assert!(matches!(err, CompileError::Name { .. }), "got {:?}", err);
}

#[test]
fn test_undefined_function_rejected() {
    let err = check_err("def f() -> int:\n    return g(1)\n");
    assert!(matches!(err, CompileError::Name { .. }), "got {:?}", err);
}

#[test]
fn test_argument_count_mismatch_rejected() {
    let err = check_err("def sq(x: int) -> int:\n    return x * x\n\ndef f() -> int:\n    return sq(1, 2)\n");
    assert!(matches!(err, CompileError::Signature { .. }), "got {:?}", err);
}

#[test]
fn test_argument_type_mismatch_rejected() {
    let err = check_err("def sq(x: int) -> int:\n    return x * x\n\ndef f() -> int:\n    return sq(True)\n");
    assert!(matches!(err, CompileError::Signature { .. }), "got {:?}", err);
}

#[test]
fn test_builtin_arity_rejected() {
    let err = check_err("def f(x: int) -> None:\n    print(x, x)\n");
    assert!(matches!(err, CompileError::Signature { .. }), "got {:?}", err);
}

#[test]
fn test_redefinition_rejected() {
    let err = check_err("def f() -> None:\n    pass\n\ndef f() -> None:\n    pass\n");
    assert!(matches!(err, CompileError::Name { .. }), "got {:?}", err);
}

#[test]
fn test_reserved_name_rejected() {
    let err = check_err("def print(x: int) -> None:\n    pass\n");
    assert!(matches!(err, CompileError::Name { .. }), "got {:?}", err);
}

#[test]
fn test_nested_function_rejected() {
    let err = check_err("def outer() -> None:\n    def inner() -> None:\n        pass\n");
    assert!(matches!(err, CompileError::Name { .. }), "got {:?}", err);
}

#[test]
fn test_break_outside_loop_rejected() {
    let err = check_err("def f() -> None:\n    break\n");
    assert!(
        matches!(err, CompileError::SyntaxUnsupported { construct: "break", .. }),
        "got {:?}",
        err
    );
}

#[test]
fn test_continue_in_if_outside_loop_rejected() {
    let err = check_err("def f(x: int) -> None:\n    if x > 0:\n        continue\n");
    assert!(
        matches!(err, CompileError::SyntaxUnsupported { construct: "continue", .. }),
        "got {:?}",
        err
    );
}

// ─── Error locations ──────────────────────────────────────────────────────────

fn located<'s>(source: &'s str, err: &CompileError) -> &'s str {
    let span = err.span().expect("error should carry a source span");
    &source[span.clone()]
}

#[test]
fn test_error_points_at_statement_in_later_function() {
    let source = "def ok(a: int) -> int:\n    return a\n\ndef bad(a: int) -> int:\n    b = a\n    return c\n";
    let err = check_err(source);
    assert!(matches!(err, CompileError::Name { .. }), "got {:?}", err);
    assert!(located(source, &err).starts_with("return c"), "got {:?}", err.span());
    assert!(err.to_string().starts_with("NameError at "), "{}", err);
}

#[test]
fn test_error_points_at_innermost_statement() {
    let source = "def f(n: int) -> None:\n    while n > 0:\n        if n > 1:\n            n = 1.5\n";
    let err = check_err(source);
    assert!(is_type_error(&err), "got {:?}", err);
    assert!(located(source, &err).starts_with("n = 1.5"), "got {:?}", err.span());
}

#[test]
fn test_signature_error_points_at_definition() {
    let source = "def f(x: int) -> None:\n    pass\n\ndef g(y) -> None:\n    pass\n";
    let err = check_err(source);
    assert!(is_type_error(&err), "got {:?}", err);
    assert!(located(source, &err).starts_with("def g"), "got {:?}", err.span());
}
