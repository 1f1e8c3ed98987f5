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

use crate::{Expr, Param, Spanned};
use crate::op::AugOp;
use crate::types::TypeHint;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression used as a statement (e.g. function call)
    Expr(Spanned<Expr>),

    /// `x = expr`, `a = b = expr`, `x: type = expr` or the bare annotation `x: type`
    Assign {
        targets: Vec<Spanned<Expr>>,
        value: Option<Spanned<Expr>>,
        type_hint: Option<Spanned<TypeHint>>,
    },

    /// Augmented assignment: `x += 1`, `x -= 1`, etc.
    AugAssign {
        target: Spanned<Expr>,
        op: AugOp,
        value: Spanned<Expr>,
    },

    /// `return` / `return expr`
    Return(Option<Spanned<Expr>>),

    /// `pass`
    Pass,

    /// `break`
    Break,

    /// `continue`
    Continue,

    /// ```python
    /// if test:
    ///     body
    /// elif test2:
    ///     body2
    /// else:
    ///     orelse
    /// ```
    If {
        test: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
        elif_clauses: Vec<(Spanned<Expr>, Vec<Spanned<Stmt>>)>,
        else_body: Option<Vec<Spanned<Stmt>>>,
    },

    /// `while test: body [else: orelse]`
    While {
        test: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
        else_body: Option<Vec<Spanned<Stmt>>>,
    },

    /// `for target in iter: body [else: orelse]`
    For {
        target: Spanned<Expr>,
        iter: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
        else_body: Option<Vec<Spanned<Stmt>>>,
    },

    /// ```python
    /// def name(params) -> ret:
    ///     body
    /// ```
    FuncDef {
        name: String,
        params: Vec<Param>,
        return_type_hint: Option<Spanned<TypeHint>>,
        body: Vec<Spanned<Stmt>>,
    },
}

impl Stmt {
    /// Short human-readable name of the construct, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Stmt::Expr(_) => "expression statement",
            Stmt::Assign { .. } => "assignment",
            Stmt::AugAssign { .. } => "augmented assignment",
            Stmt::Return(_) => "return",
            Stmt::Pass => "pass",
            Stmt::Break => "break",
            Stmt::Continue => "continue",
            Stmt::If { .. } => "if",
            Stmt::While { .. } => "while",
            Stmt::For { .. } => "for",
            Stmt::FuncDef { .. } => "function definition",
        }
    }
}
