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

//! Lowering from the parsed AST to the typed IR.
//!
//! Accepts exactly the compiled subset and rejects everything else with
//! [`CompileError::SyntaxUnsupported`], naming the construct. Statement spans
//! are carried into the IR; errors point at the innermost offending node.

use ast::expr::Expr as AstExpr;
use ast::op::{AugOp, BinOp, CmpOp, UnaryOp};
use ast::stmt::Stmt as AstStmt;
use ast::types::TypeHint;
use ast::{Module, Param, Spanned};

use crate::error::{CompileError, CompileResult};
use crate::ir::{BinaryOperator, CompareOperator, Expr, FunctionDef, Stmt, UnaryOperator, Variable};
use crate::types::SemanticType;

/// Lower every top-level statement of `module`. Only function definitions are
/// allowed at the top level.
pub fn module(module: &Module) -> CompileResult<Vec<FunctionDef>> {
    module.body.iter().map(function).collect()
}

/// Lower one top-level function definition.
pub fn function(stmt: &Spanned<AstStmt>) -> CompileResult<FunctionDef> {
    let AstStmt::FuncDef {
        name,
        params,
        return_type_hint,
        body,
    } = &stmt.node
    else {
        let kind = stmt.node.kind();
        return Err(CompileError::unsupported(
            kind,
            format!("only function definitions are allowed at the top level, found {}", kind),
        )
        .at(&stmt.span));
    };

    let params = params
        .iter()
        .map(param)
        .collect::<CompileResult<Vec<_>>>()
        .map_err(|e| e.at(&stmt.span))?;
    let return_annotation = return_type_hint.as_ref().map(annotation).transpose()?;
    let body = block(body)?;
    Ok(FunctionDef::new(name.clone(), params, return_annotation, body).with_span(stmt.span.clone()))
}

fn param(p: &Param) -> CompileResult<Variable> {
    if p.default.is_some() {
        return Err(CompileError::unsupported(
            "default argument",
            format!("parameter '{}' has a default value", p.name),
        ));
    }
    Ok(match &p.type_hint {
        Some(hint) => Variable::annotated(p.name.clone(), annotation(hint)?),
        None => Variable::new(p.name.clone()),
    })
}

fn annotation(hint: &Spanned<TypeHint>) -> CompileResult<SemanticType> {
    SemanticType::from_type_hint(&hint.node).ok_or_else(|| {
        CompileError::type_error(format!(
            "unsupported type annotation '{}' (expected int, float, bool or None)",
            hint.node
        ))
        .at(&hint.span)
    })
}

// ─── Statements ──────────────────────────────────────────────────────────────

fn block(body: &[Spanned<AstStmt>]) -> CompileResult<Vec<Spanned<Stmt>>> {
    body.iter().map(stmt).collect()
}

fn stmt(s: &Spanned<AstStmt>) -> CompileResult<Spanned<Stmt>> {
    lower_stmt(s)
        .map(|node| Spanned::new(node, s.span.clone()))
        .map_err(|e| e.at(&s.span))
}

fn lower_stmt(s: &Spanned<AstStmt>) -> CompileResult<Stmt> {
    match &s.node {
        AstStmt::FuncDef { .. } => function(s).map(|def| Stmt::FunctionDef(Box::new(def))),

        AstStmt::Expr(e) => Ok(Stmt::Expression(expr(e)?)),

        AstStmt::Assign {
            targets,
            value,
            type_hint,
        } => {
            let target = match targets.as_slice() {
                [single] => target_name(single)?,
                _ => {
                    return Err(CompileError::unsupported(
                        "chained assignment",
                        "assign to exactly one name",
                    ));
                }
            };
            let Some(value) = value else {
                return Err(CompileError::unsupported(
                    "bare annotation",
                    format!("'{}' is annotated but never assigned", target),
                ));
            };
            let target = match type_hint {
                Some(hint) => Variable::annotated(target, annotation(hint)?),
                None => Variable::new(target),
            };
            Ok(Stmt::Assign {
                target,
                value: expr(value)?,
            })
        }

        AstStmt::AugAssign { target, op, value } => {
            let name = target_name(target)?;
            let op = match op {
                AugOp::Add | AugOp::Sub | AugOp::Mul | AugOp::Div | AugOp::Mod => binary_operator(op.bin_op())?,
                other => {
                    return Err(CompileError::unsupported(
                        "augmented assignment",
                        format!("operator '{}=' is not supported", bin_op_symbol(other.bin_op())),
                    ));
                }
            };
            Ok(Stmt::Assign {
                target: Variable::new(name.clone()),
                value: Expr::BinaryOp {
                    left: Box::new(Expr::Variable(Variable::new(name))),
                    op,
                    right: Box::new(expr(value)?),
                },
            })
        }

        AstStmt::Return(value) => Ok(Stmt::Return(value.as_ref().map(expr).transpose()?)),
        AstStmt::Pass => Ok(Stmt::Pass),
        AstStmt::Break => Ok(Stmt::Break),
        AstStmt::Continue => Ok(Stmt::Continue),

        AstStmt::If {
            test,
            body,
            elif_clauses,
            else_body,
        } => {
            // Fold the chain from the innermost `elif` outwards.
            let mut orelse = match else_body {
                Some(b) => block(b)?,
                None => Vec::new(),
            };
            for (elif_test, elif_body) in elif_clauses.iter().rev() {
                let node = Stmt::If {
                    test: expr(elif_test)?,
                    body: block(elif_body)?,
                    orelse,
                };
                let end = elif_body.last().map_or(elif_test.span.end, |b| b.span.end);
                orelse = vec![Spanned::new(node, elif_test.span.start..end)];
            }
            Ok(Stmt::If {
                test: expr(test)?,
                body: block(body)?,
                orelse,
            })
        }

        AstStmt::While { test, body, else_body } => {
            if else_body.is_some() {
                return Err(CompileError::unsupported("while-else", "'else' clause on a while loop"));
            }
            Ok(Stmt::While {
                test: expr(test)?,
                body: block(body)?,
            })
        }

        AstStmt::For {
            target,
            iter,
            body,
            else_body,
        } => {
            if else_body.is_some() {
                return Err(CompileError::unsupported("for-else", "'else' clause on a for loop"));
            }
            let target = Variable::new(target_name(target)?);
            let (begin, end, step) = range_args(iter)?;
            Ok(Stmt::ForRange {
                target,
                begin,
                end,
                step,
                body: block(body)?,
            })
        }
    }
}

fn target_name(target: &Spanned<AstExpr>) -> CompileResult<String> {
    match &target.node {
        AstExpr::Name(name) => Ok(name.clone()),
        other => Err(CompileError::unsupported(
            other.kind(),
            format!("cannot assign to {}", other.kind()),
        )
        .at(&target.span)),
    }
}

/// `range(end)`, `range(begin, end)` or `range(begin, end, step)`.
fn range_args(iter: &Spanned<AstExpr>) -> CompileResult<(Expr, Expr, Expr)> {
    let unsupported =
        || CompileError::unsupported("for", "only 'for <name> in range(...)' loops are supported").at(&iter.span);
    let AstExpr::Call { func, args, kwargs } = &iter.node else {
        return Err(unsupported());
    };
    if !matches!(&func.node, AstExpr::Name(n) if n == "range") {
        return Err(unsupported());
    }
    if !kwargs.is_empty() {
        return Err(CompileError::unsupported("keyword argument", "range() takes positional arguments only").at(&iter.span));
    }
    let mut args = args.iter().map(expr).collect::<CompileResult<Vec<_>>>()?;
    match args.len() {
        1 => Ok((Expr::IntLiteral(0), args.remove(0), Expr::IntLiteral(1))),
        2 => {
            let end = args.remove(1);
            Ok((args.remove(0), end, Expr::IntLiteral(1)))
        }
        3 => {
            let step = args.remove(2);
            let end = args.remove(1);
            Ok((args.remove(0), end, step))
        }
        n => Err(CompileError::unsupported(
            "for",
            format!("range() expects 1 to 3 arguments, got {}", n),
        )
        .at(&iter.span)),
    }
}

// ─── Expressions ─────────────────────────────────────────────────────────────

fn expr(e: &Spanned<AstExpr>) -> CompileResult<Expr> {
    lower_expr(e).map_err(|err| err.at(&e.span))
}

fn lower_expr(e: &Spanned<AstExpr>) -> CompileResult<Expr> {
    match &e.node {
        AstExpr::Name(name) => Ok(Expr::Variable(Variable::new(name.clone()))),
        AstExpr::Number(text) => number(text, false),
        AstExpr::Bool(b) => Ok(Expr::BoolLiteral(*b)),

        AstExpr::UnaryOp { op, operand } => match op {
            // Fold `-<literal>` so that i32::MIN is expressible.
            UnaryOp::Neg => match &operand.node {
                AstExpr::Number(text) => number(text, true),
                _ => Ok(Expr::UnaryOp {
                    op: UnaryOperator::Neg,
                    operand: Box::new(expr(operand)?),
                }),
            },
            UnaryOp::Not => Ok(Expr::UnaryOp {
                op: UnaryOperator::Not,
                operand: Box::new(expr(operand)?),
            }),
            UnaryOp::Pos => Err(CompileError::unsupported("unary operator", "unary '+' is not supported")),
            UnaryOp::Invert => Err(CompileError::unsupported("unary operator", "unary '~' is not supported")),
        },

        AstExpr::BinOp { left, op, right } => Ok(Expr::BinaryOp {
            left: Box::new(expr(left)?),
            op: binary_operator(*op)?,
            right: Box::new(expr(right)?),
        }),

        AstExpr::Compare {
            left,
            ops,
            comparators,
        } => {
            let (op, right) = match (ops.as_slice(), comparators.as_slice()) {
                ([op], [right]) => (*op, right),
                _ => {
                    return Err(CompileError::unsupported(
                        "chained comparison",
                        "use a single comparison operator",
                    ));
                }
            };
            Ok(Expr::Compare {
                left: Box::new(expr(left)?),
                op: compare_operator(op)?,
                right: Box::new(expr(right)?),
            })
        }

        AstExpr::Call { func, args, kwargs } => {
            let AstExpr::Name(name) = &func.node else {
                return Err(CompileError::unsupported(
                    func.node.kind(),
                    "only calls by plain function name are supported",
                ));
            };
            if let Some((kw, _)) = kwargs.first() {
                return Err(CompileError::unsupported(
                    "keyword argument",
                    format!("keyword argument '{}' in call to '{}'", kw, name),
                ));
            }
            Ok(Expr::Call {
                func: name.clone(),
                args: args.iter().map(expr).collect::<CompileResult<Vec<_>>>()?,
            })
        }

        other @ (AstExpr::StringLit(_)
        | AstExpr::NoneLit
        | AstExpr::Attribute { .. }
        | AstExpr::Subscript { .. }
        | AstExpr::Tuple(_)
        | AstExpr::List(_)) => Err(CompileError::unsupported(
            other.kind(),
            format!("{} is not supported", other.kind()),
        )),
    }
}

fn number(text: &str, negate: bool) -> CompileResult<Expr> {
    let is_float = text.contains(['.', 'e', 'E']);
    if is_float {
        let value: f64 = text
            .parse()
            .map_err(|_| CompileError::unsupported("number literal", format!("invalid float literal '{}'", text)))?;
        return Ok(Expr::FloatLiteral(if negate { -value } else { value }));
    }
    let out_of_range = || {
        CompileError::unsupported(
            "number literal",
            format!("integer literal {}{} does not fit in 32 bits", if negate { "-" } else { "" }, text),
        )
    };
    let value: i64 = text.parse().map_err(|_| out_of_range())?;
    let value = if negate { -value } else { value };
    i32::try_from(value).map(Expr::IntLiteral).map_err(|_| out_of_range())
}

fn binary_operator(op: BinOp) -> CompileResult<BinaryOperator> {
    match op {
        BinOp::Add => Ok(BinaryOperator::Add),
        BinOp::Sub => Ok(BinaryOperator::Sub),
        BinOp::Mul => Ok(BinaryOperator::Mul),
        BinOp::Div => Ok(BinaryOperator::Div),
        BinOp::Mod => Ok(BinaryOperator::Mod),
        other => Err(CompileError::unsupported(
            "binary operator",
            format!("operator '{}' is not supported", bin_op_symbol(other)),
        )),
    }
}

fn compare_operator(op: CmpOp) -> CompileResult<CompareOperator> {
    match op {
        CmpOp::Eq => Ok(CompareOperator::Eq),
        CmpOp::NotEq => Ok(CompareOperator::NotEq),
        CmpOp::Lt => Ok(CompareOperator::Lt),
        CmpOp::LtE => Ok(CompareOperator::LtE),
        CmpOp::Gt => Ok(CompareOperator::Gt),
        CmpOp::GtE => Ok(CompareOperator::GtE),
        CmpOp::Is | CmpOp::IsNot => Err(CompileError::unsupported("identity comparison", "'is' is not supported")),
        CmpOp::In | CmpOp::NotIn => Err(CompileError::unsupported("membership test", "'in' is not supported")),
    }
}

fn bin_op_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::FloorDiv => "//",
        BinOp::Mod => "%",
        BinOp::Pow => "**",
        BinOp::LShift => "<<",
        BinOp::RShift => ">>",
        BinOp::BitAnd => "&",
        BinOp::BitOr => "|",
        BinOp::BitXor => "^",
        BinOp::And => "and",
        BinOp::Or => "or",
        BinOp::MatMul => "@",
    }
}
