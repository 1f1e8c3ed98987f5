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

//! Typed intermediate representation.
//!
//! The tree is built once by the transformer. The only fields written after
//! construction are the type annotation slots on [`Variable`] and
//! [`FunctionDef`], filled in by the type checker and read by the code
//! generator. Reading a slot the checker has not filled is an internal error.
//! Statements and function definitions keep the byte range of their source.

use std::fmt;

pub use ast::Spanned;
use logos::Span;

use crate::error::{CompileError, CompileResult};
use crate::types::SemanticType;

/// A named variable occurrence: parameter, assignment target, loop variable or read.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    /// Source annotation, if any. Write-once.
    pub annotation: Option<SemanticType>,
    resolved: Option<SemanticType>,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            resolved: None,
        }
    }

    pub fn annotated(name: impl Into<String>, annotation: SemanticType) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation),
            resolved: None,
        }
    }

    /// The checker's verdict, if it has run over this node.
    pub fn resolved(&self) -> Option<SemanticType> {
        self.resolved
    }

    pub fn resolve(&mut self, ty: SemanticType) {
        self.resolved = Some(ty);
    }

    /// The checked type, or an internal error when the checker has not run.
    pub fn checked_type(&self) -> CompileResult<SemanticType> {
        self.resolved.ok_or_else(|| {
            CompileError::Internal(format!("variable '{}' read before type checking", self.name))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOperator {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Call by name: a builtin, a compiled function or a host callback.
    Call { func: String, args: Vec<Expr> },
    Variable(Variable),
    IntLiteral(i32),
    FloatLiteral(f64),
    BoolLiteral(bool),
    Compare {
        left: Box<Expr>,
        op: CompareOperator,
        right: Box<Expr>,
    },
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Only legal at the top level; nested definitions are rejected by the checker.
    FunctionDef(Box<FunctionDef>),
    Assign { target: Variable, value: Expr },
    Expression(Expr),
    If {
        test: Expr,
        body: Vec<Spanned<Stmt>>,
        orelse: Vec<Spanned<Stmt>>,
    },
    While { test: Expr, body: Vec<Spanned<Stmt>> },
    /// `for target in range(begin, end, step)`
    ForRange {
        target: Variable,
        begin: Expr,
        end: Expr,
        step: Expr,
        body: Vec<Spanned<Stmt>>,
    },
    Continue,
    Break,
    Return(Option<Expr>),
    Pass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Variable>,
    pub body: Vec<Spanned<Stmt>>,
    /// Declared `-> T`, if any.
    pub return_annotation: Option<SemanticType>,
    /// Source range of the whole `def`; empty for definitions built in code.
    pub span: Span,
    return_type: Option<SemanticType>,
}

impl FunctionDef {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Variable>,
        return_annotation: Option<SemanticType>,
        body: Vec<Spanned<Stmt>>,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            body,
            return_annotation,
            span: 0..0,
            return_type: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Effective return type computed by the checker.
    pub fn return_type(&self) -> Option<SemanticType> {
        self.return_type
    }

    pub fn set_return_type(&mut self, ty: SemanticType) {
        self.return_type = Some(ty);
    }
}

// ─── Debug listing ───────────────────────────────────────────────────────────

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOperator::Eq => "==",
            CompareOperator::NotEq => "!=",
            CompareOperator::Lt => "<",
            CompareOperator::LtE => "<=",
            CompareOperator::Gt => ">",
            CompareOperator::GtE => ">=",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(ty) = self.resolved.or(self.annotation) {
            write!(f, ": {}", ty)?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Call { func, args } => {
                write!(f, "{}(", func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Variable(v) => write!(f, "{}", v.name),
            Expr::IntLiteral(n) => write!(f, "{}", n),
            Expr::FloatLiteral(x) => write!(f, "{:?}", x),
            Expr::BoolLiteral(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Expr::Compare { left, op, right } => write!(f, "({} {} {})", left, op, right),
            Expr::BinaryOp { left, op, right } => write!(f, "({} {} {})", left, op, right),
            Expr::UnaryOp { op, operand } => match op {
                UnaryOperator::Neg => write!(f, "-{}", operand),
                UnaryOperator::Not => write!(f, "not {}", operand),
            },
        }
    }
}

fn write_body(f: &mut fmt::Formatter<'_>, body: &[Spanned<Stmt>], depth: usize) -> fmt::Result {
    for stmt in body {
        write_stmt(f, &stmt.node, depth)?;
    }
    Ok(())
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    let pad = "    ".repeat(depth);
    match stmt {
        Stmt::FunctionDef(def) => write!(f, "{}{}", pad, def),
        Stmt::Assign { target, value } => writeln!(f, "{}{} = {}", pad, target, value),
        Stmt::Expression(e) => writeln!(f, "{}{}", pad, e),
        Stmt::If { test, body, orelse } => {
            writeln!(f, "{}if {}:", pad, test)?;
            write_body(f, body, depth + 1)?;
            if !orelse.is_empty() {
                writeln!(f, "{}else:", pad)?;
                write_body(f, orelse, depth + 1)?;
            }
            Ok(())
        }
        Stmt::While { test, body } => {
            writeln!(f, "{}while {}:", pad, test)?;
            write_body(f, body, depth + 1)
        }
        Stmt::ForRange {
            target,
            begin,
            end,
            step,
            body,
        } => {
            writeln!(f, "{}for {} in range({}, {}, {}):", pad, target, begin, end, step)?;
            write_body(f, body, depth + 1)
        }
        Stmt::Continue => writeln!(f, "{}continue", pad),
        Stmt::Break => writeln!(f, "{}break", pad),
        Stmt::Return(Some(e)) => writeln!(f, "{}return {}", pad, e),
        Stmt::Return(None) => writeln!(f, "{}return", pad),
        Stmt::Pass => writeln!(f, "{}pass", pad),
    }
}

impl fmt::Display for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ")")?;
        if let Some(ret) = self.return_type.or(self.return_annotation) {
            write!(f, " -> {}", ret)?;
        }
        writeln!(f, ":")?;
        write_body(f, &self.body, 1)
    }
}
