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

use crate::error::CompileError;
use crate::ir::{BinaryOperator, Expr, FunctionDef, Stmt};
use crate::transform;
use crate::types::SemanticType;

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn lower(source: &str) -> Result<Vec<FunctionDef>, CompileError> {
    let module = parser::parse_source(source).expect("source should parse");
    transform::module(&module)
}

fn lower_one(source: &str) -> FunctionDef {
    let mut defs = lower(source).expect("source should lower");
    assert_eq!(defs.len(), 1);
    defs.remove(0)
}

/// Lower a one-line body inside a stub function and return the error.
fn body_err(line: &str) -> CompileError {
    lower(&format!("def f(x: int, y: float) -> None:\n    {}\n", line)).expect_err("lowering should fail")
}

fn unsupported_construct(err: &CompileError) -> &'static str {
    match err {
        CompileError::SyntaxUnsupported { construct, .. } => construct,
        other => panic!("expected SyntaxUnsupported, got {:?}", other),
    }
}

// ─── Lowering ─────────────────────────────────────────────────────────────────

#[test]
fn test_signature_annotations() {
    let def = lower_one("def f(a: int, b: float, c: bool) -> None:\n    pass\n");
    let annotations: Vec<_> = def.params.iter().map(|p| p.annotation).collect();
    assert_eq!(
        annotations,
        vec![Some(SemanticType::Int), Some(SemanticType::Float), Some(SemanticType::Bool)]
    );
    assert_eq!(def.return_annotation, Some(SemanticType::None));
    assert_eq!(def.body.len(), 1);
    assert_eq!(def.body[0].node, Stmt::Pass);
}

#[test]
fn test_definition_and_statements_keep_spans() {
    let source = "def f(x: int) -> None:\n    y = x\n    pass\n";
    let def = lower_one(source);
    assert!(source[def.span.clone()].starts_with("def f"));
    assert!(source[def.body[0].span.clone()].starts_with("y = x"));
    assert!(source[def.body[1].span.clone()].starts_with("pass"));
}

#[test]
fn test_elif_chain_becomes_nested_if() {
    let def = lower_one(
        "def f(x: int) -> int:\n    if x < 0:\n        return 0\n    elif x < 10:\n        return 1\n    else:\n        return 2\n",
    );
    let Stmt::If { orelse, .. } = &def.body[0].node else {
        panic!("expected If, got {:?}", def.body[0]);
    };
    assert_eq!(orelse.len(), 1);
    let Stmt::If { orelse: inner_else, .. } = &orelse[0].node else {
        panic!("expected nested If, got {:?}", orelse[0]);
    };
    assert_eq!(inner_else.len(), 1);
    assert_eq!(inner_else[0].node, Stmt::Return(Some(Expr::IntLiteral(2))));
}

#[test]
fn test_augmented_assignment_expands() {
    let def = lower_one("def f(x: int) -> None:\n    x -= 3\n");
    let Stmt::Assign { target, value } = &def.body[0].node else {
        panic!("expected Assign, got {:?}", def.body[0]);
    };
    assert_eq!(target.name, "x");
    assert!(matches!(
        value,
        Expr::BinaryOp { op: BinaryOperator::Sub, left, right }
            if matches!(**left, Expr::Variable(ref v) if v.name == "x")
            && **right == Expr::IntLiteral(3)
    ));
}

#[test]
fn test_range_defaults() {
    let def = lower_one("def f(n: int) -> None:\n    for i in range(n):\n        pass\n    for j in range(1, n):\n        pass\n");
    let Stmt::ForRange { begin, step, .. } = &def.body[0].node else {
        panic!("expected ForRange, got {:?}", def.body[0]);
    };
    assert_eq!((begin, step), (&Expr::IntLiteral(0), &Expr::IntLiteral(1)));
    let Stmt::ForRange { begin, step, .. } = &def.body[1].node else {
        panic!("expected ForRange, got {:?}", def.body[1]);
    };
    assert_eq!((begin, step), (&Expr::IntLiteral(1), &Expr::IntLiteral(1)));
}

#[test]
fn test_literals() {
    let def = lower_one("def f() -> None:\n    a = 7\n    b = 2.5\n    c = True\n    d = -2147483648\n");
    let values: Vec<_> = def
        .body
        .iter()
        .map(|s| match &s.node {
            Stmt::Assign { value, .. } => value.clone(),
            other => panic!("expected Assign, got {:?}", other),
        })
        .collect();
    assert_eq!(
        values,
        vec![
            Expr::IntLiteral(7),
            Expr::FloatLiteral(2.5),
            Expr::BoolLiteral(true),
            Expr::IntLiteral(i32::MIN),
        ]
    );
}

// ─── Rejections ───────────────────────────────────────────────────────────────

#[test]
fn test_top_level_statement_rejected() {
    let err = lower("x = 1\n").expect_err("top-level assignment");
    assert_eq!(unsupported_construct(&err), "assignment");
}

#[test]
fn test_unsupported_operators_rejected() {
    assert_eq!(unsupported_construct(&body_err("z = x // 2")), "binary operator");
    assert_eq!(unsupported_construct(&body_err("z = x ** 2")), "binary operator");
    assert_eq!(unsupported_construct(&body_err("z = x & 1")), "binary operator");
    assert_eq!(unsupported_construct(&body_err("z = x > 1 and x < 5")), "binary operator");
    assert_eq!(unsupported_construct(&body_err("z = ~x")), "unary operator");
    assert_eq!(unsupported_construct(&body_err("x //= 2")), "augmented assignment");
}

#[test]
fn test_unsupported_comparisons_rejected() {
    assert_eq!(unsupported_construct(&body_err("z = 0 < x < 5")), "chained comparison");
    assert_eq!(unsupported_construct(&body_err("z = x is x")), "identity comparison");
}

#[test]
fn test_unsupported_literals_rejected() {
    assert_eq!(unsupported_construct(&body_err("z = 'text'")), "string literal");
    assert_eq!(unsupported_construct(&body_err("z = None")), "None literal");
    assert_eq!(unsupported_construct(&body_err("z = [1, 2]")), "list literal");
    assert_eq!(unsupported_construct(&body_err("z = 2147483648")), "number literal");
}

#[test]
fn test_unsupported_statements_rejected() {
    assert_eq!(unsupported_construct(&body_err("a = b = 1")), "chained assignment");
    assert_eq!(unsupported_construct(&body_err("z: int")), "bare annotation");
    assert_eq!(unsupported_construct(&body_err("for i in x:\n        pass")), "for");
    assert_eq!(
        unsupported_construct(&body_err("while x > 0:\n        pass\n    else:\n        pass")),
        "while-else"
    );
}

#[test]
fn test_unsupported_calls_rejected() {
    assert_eq!(unsupported_construct(&body_err("print(x, end=1)")), "keyword argument");
    assert_eq!(unsupported_construct(&body_err("x.show()")), "attribute access");
    assert_eq!(unsupported_construct(&body_err("for i in range(1, 2, 3, 4):\n        pass")), "for");
}

#[test]
fn test_unsupported_annotation_is_type_error() {
    let err = lower("def f(s: str) -> None:\n    pass\n").expect_err("str annotation");
    assert!(matches!(err, CompileError::Type { .. }), "got {:?}", err);
}

#[test]
fn test_rejection_points_at_offending_expression() {
    let source = "def f(x: int) -> None:\n    y = x\n    z = 'text'\n";
    let err = lower(source).expect_err("string literal");
    let span = err.span().expect("error should carry a source span").clone();
    assert!(source[span].starts_with("'text'"), "got {:?}", err);
    assert!(err.to_string().contains(" at "), "{}", err);
}
