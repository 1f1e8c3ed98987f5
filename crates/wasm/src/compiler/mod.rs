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

//! Static WASM code generator.
//!
//! Lowers one type-checked IR function into a [`DefinedFunction`]. Assumes the
//! type checker has run over the function, so every variable and the return
//! type carry a resolved [`SemanticType`].
//!
//! Imports are registered on the shared [`ModuleBuilder`] the first time a
//! function needs them; calls stay symbolic until the module is encoded.

mod call;
mod control_flow;
pub mod helpers;
pub mod op;

use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::functions::FunctionContext;
use crate::instruction::Instruction;
use crate::ir::{Expr, FunctionDef, Spanned, Stmt};
use crate::module_builder::{DefinedFunction, ModuleBuilder};
use crate::signatures::SignatureRegistry;
use crate::types::SemanticType;

/// Generate code for `def`. Any imports the body needs are added to `module`;
/// the function itself is not, so the caller decides when to commit it.
pub fn generate(
    registry: &SignatureRegistry,
    module: &mut ModuleBuilder,
    def: &FunctionDef,
) -> CompileResult<DefinedFunction> {
    let ret = def.return_type().ok_or_else(|| {
        CompileError::Internal(format!(
            "function '{}' reached code generation without a return type",
            def.name
        ))
    })?;
    let params = def
        .params
        .iter()
        .map(|p| Ok((p.name.clone(), p.checked_type()?)))
        .collect::<CompileResult<Vec<_>>>()?;

    let ctx = FunctionContext::new(def.name.clone(), &params, ret).map_err(|e| e.at(&def.span))?;
    let mut generator = CodeGenerator {
        registry,
        module,
        ctx,
        def,
        ret,
    };
    generator.compile_body().map_err(|e| e.at(&def.span))?;

    let function = generator.ctx.finish(true)?;
    debug!(
        function = %function.name,
        locals = function.locals.len(),
        instructions = function.body.len(),
        "generated"
    );
    Ok(function)
}

/// The code generator for a single function body.
///
/// ## Lowering strategy
///
/// - `int` and `bool` map to `i32`, `float` to `f64`.
/// - Locals are allocated in first-assignment order after the parameters.
/// - Control flow uses structured blocks; `break`/`continue` depths are computed
///   from the block stack kept in [`FunctionContext`].
pub(crate) struct CodeGenerator<'a> {
    registry: &'a SignatureRegistry,
    module: &'a mut ModuleBuilder,
    ctx: FunctionContext,
    def: &'a FunctionDef,
    ret: SemanticType,
}

impl<'a> CodeGenerator<'a> {
    fn compile_body(&mut self) -> CompileResult<()> {
        let def = self.def;
        self.compile_block(&def.body)?;
        if self.ret != SemanticType::None {
            // Every valid path returned explicitly; falling through traps.
            self.ctx.emit(Instruction::Unreachable);
        }
        self.ctx.emit_end();
        Ok(())
    }

    // ─── Statements ──────────────────────────────────────────────────────

    pub(super) fn compile_block(&mut self, body: &[Spanned<Stmt>]) -> CompileResult<()> {
        for stmt in body {
            self.compile_stmt(&stmt.node).map_err(|e| e.at(&stmt.span))?;
        }
        Ok(())
    }

    pub(super) fn compile_stmt(&mut self, stmt: &Stmt) -> CompileResult<()> {
        match stmt {
            Stmt::FunctionDef(inner) => Err(CompileError::name_error(format!(
                "nested function '{}' inside '{}' is not supported",
                inner.name, self.def.name
            ))),

            Stmt::Assign { target, value } => {
                let ty = target.checked_type()?;
                self.compile_expr(value)?;
                let slot = self.ctx.declare_local(&target.name, ty)?;
                self.ctx.emit(Instruction::LocalSet(slot));
                Ok(())
            }

            Stmt::Expression(expr) => {
                let ty = self.compile_expr(expr)?;
                if ty != SemanticType::None {
                    self.ctx.emit(Instruction::Drop);
                }
                Ok(())
            }

            Stmt::If { test, body, orelse } => self.compile_if(test, body, orelse),
            Stmt::While { test, body } => self.compile_while(test, body),
            Stmt::ForRange {
                target,
                begin,
                end,
                step,
                body,
            } => self.compile_for_range(target, begin, end, step, body),
            Stmt::Continue => self.compile_continue(),
            Stmt::Break => self.compile_break(),

            Stmt::Return(value) => {
                if let Some(expr) = value {
                    self.compile_expr(expr)?;
                }
                self.ctx.emit(Instruction::Return);
                Ok(())
            }

            Stmt::Pass => Ok(()),
        }
    }

    // ─── Expressions ─────────────────────────────────────────────────────

    /// Compile an expression, leaving its value (if any) on the stack.
    /// Returns the semantic type of the produced value.
    pub(super) fn compile_expr(&mut self, expr: &Expr) -> CompileResult<SemanticType> {
        match expr {
            Expr::IntLiteral(n) => {
                self.ctx.emit(Instruction::I32Const(*n));
                Ok(SemanticType::Int)
            }
            Expr::FloatLiteral(x) => {
                self.ctx.emit(Instruction::F64Const(*x));
                Ok(SemanticType::Float)
            }
            Expr::BoolLiteral(b) => {
                self.ctx.emit(Instruction::I32Const(*b as i32));
                Ok(SemanticType::Bool)
            }
            Expr::Variable(var) => {
                let slot = self.ctx.get_local(&var.name).ok_or_else(|| {
                    CompileError::name_error(format!(
                        "name '{}' is not defined in function '{}'",
                        var.name, self.def.name
                    ))
                })?;
                self.ctx.emit(Instruction::LocalGet(slot));
                var.checked_type()
            }
            Expr::BinaryOp { left, op, right } => self.compile_binary_op(left, *op, right),
            Expr::Compare { left, op, right } => self.compile_compare(left, *op, right),
            Expr::UnaryOp { op, operand } => self.compile_unary_op(*op, operand),
            Expr::Call { func, args } => self.compile_call(func, args),
        }
    }
}
