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

//! Static type checker.
//!
//! Checks one function at a time and enforces:
//! - every parameter is annotated
//! - a variable keeps the type of its first assignment
//! - operators see operands of one shared, supported type
//! - calls resolve against builtins, the function itself, compiled functions
//!   and host callbacks, in that order
//! - all `return` statements agree on a single return type
//!
//! Resolved types are written back onto the IR for the code generator.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::ir::{BinaryOperator, Expr, FunctionDef, Spanned, Stmt, UnaryOperator, Variable};
use crate::signatures::{is_reserved, SignatureRegistry};
use crate::types::{FunctionSignature, SemanticType};

// ─── Builtins ────────────────────────────────────────────────────────────────

/// Inlined builtins: name, result type, accepted argument types.
const BUILTINS: &[(&str, SemanticType, &[SemanticType])] = &[
    ("int", SemanticType::Int, &[SemanticType::Int, SemanticType::Float, SemanticType::Bool]),
    ("float", SemanticType::Float, &[SemanticType::Int, SemanticType::Float, SemanticType::Bool]),
    ("bool", SemanticType::Bool, &[SemanticType::Int, SemanticType::Float, SemanticType::Bool]),
    ("print", SemanticType::None, &[SemanticType::Int, SemanticType::Float, SemanticType::Bool]),
];

/// Result type and accepted argument types of a builtin, if `name` is one.
pub fn builtin(name: &str) -> Option<(SemanticType, &'static [SemanticType])> {
    BUILTINS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, ret, accepted)| (*ret, *accepted))
}

// ─── Type checker ────────────────────────────────────────────────────────────

pub struct TypeChecker<'r> {
    registry: &'r SignatureRegistry,
    /// Variable name → fixed type, for the function being checked
    variables: HashMap<String, SemanticType>,
    function_name: String,
    param_types: Vec<SemanticType>,
    return_annotation: Option<SemanticType>,
    /// Type of the first `return` seen
    inferred_return: Option<SemanticType>,
    loop_depth: usize,
}

impl<'r> TypeChecker<'r> {
    pub fn new(registry: &'r SignatureRegistry) -> Self {
        Self {
            registry,
            variables: HashMap::new(),
            function_name: String::new(),
            param_types: Vec::new(),
            return_annotation: None,
            inferred_return: None,
            loop_depth: 0,
        }
    }

    /// Check one function definition, annotate it in place and return its
    /// signature. Nothing is registered; the caller records the signature
    /// once the function has been fully compiled.
    ///
    /// Errors raised outside any statement point at the whole definition.
    pub fn check_function(self, def: &mut FunctionDef) -> CompileResult<FunctionSignature> {
        let span = def.span.clone();
        self.check_definition(def).map_err(|e| e.at(&span))
    }

    fn check_definition(mut self, def: &mut FunctionDef) -> CompileResult<FunctionSignature> {
        if is_reserved(&def.name) {
            return Err(CompileError::name_error(format!(
                "'{}' is a reserved name and cannot be defined",
                def.name
            )));
        }
        if self.registry.contains_function(&def.name) {
            return Err(CompileError::name_error(format!(
                "function '{}' is already defined",
                def.name
            )));
        }
        self.function_name = def.name.clone();
        self.return_annotation = def.return_annotation;

        for param in def.params.iter_mut() {
            let ty = match param.annotation {
                Some(SemanticType::None) => {
                    return Err(CompileError::type_error(format!(
                        "parameter '{}' of function '{}' cannot have type None",
                        param.name, def.name
                    )));
                }
                Some(ty) => ty,
                None => {
                    return Err(CompileError::type_error(format!(
                        "parameter '{}' of function '{}' must have a type annotation",
                        param.name, def.name
                    )));
                }
            };
            if self.variables.insert(param.name.clone(), ty).is_some() {
                return Err(CompileError::name_error(format!(
                    "duplicate parameter '{}' in function '{}'",
                    param.name, def.name
                )));
            }
            param.resolve(ty);
            self.param_types.push(ty);
        }

        self.check_block(&mut def.body)?;

        let ret = self
            .return_annotation
            .or(self.inferred_return)
            .unwrap_or(SemanticType::None);
        def.set_return_type(ret);

        let signature = FunctionSignature::new(self.param_types, ret);
        debug!(function = %def.name, %signature, "type checked");
        Ok(signature)
    }

    // ─── Statement checking ──────────────────────────────────────────────

    fn check_block(&mut self, body: &mut [Spanned<Stmt>]) -> CompileResult<()> {
        for stmt in body.iter_mut() {
            self.check_stmt(&mut stmt.node).map_err(|e| e.at(&stmt.span))?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &mut Stmt) -> CompileResult<()> {
        match stmt {
            Stmt::FunctionDef(inner) => Err(CompileError::name_error(format!(
                "nested function '{}' inside '{}' is not supported",
                inner.name, self.function_name
            ))),

            Stmt::Assign { target, value } => self.check_assign(target, value),

            Stmt::Expression(expr) => self.infer_expr(expr).map(|_| ()),

            Stmt::If { test, body, orelse } => {
                self.check_condition(test, "if")?;
                self.check_block(body)?;
                self.check_block(orelse)
            }

            Stmt::While { test, body } => {
                self.check_condition(test, "while")?;
                self.loop_depth += 1;
                let result = self.check_block(body);
                self.loop_depth -= 1;
                result
            }

            Stmt::ForRange {
                target,
                begin,
                end,
                step,
                body,
            } => {
                self.check_for_range(target, begin, end, step)?;
                self.loop_depth += 1;
                let result = self.check_block(body);
                self.loop_depth -= 1;
                result
            }

            Stmt::Continue => self.check_in_loop("continue"),
            Stmt::Break => self.check_in_loop("break"),

            Stmt::Return(value) => self.check_return(value.as_mut()),

            Stmt::Pass => Ok(()),
        }
    }

    fn check_in_loop(&self, construct: &'static str) -> CompileResult<()> {
        if self.loop_depth == 0 {
            return Err(CompileError::unsupported(
                construct,
                format!("'{}' outside loop in function '{}'", construct, self.function_name),
            ));
        }
        Ok(())
    }

    fn check_condition(&mut self, test: &mut Expr, construct: &str) -> CompileResult<()> {
        let ty = self.infer_expr(test)?;
        if ty != SemanticType::Bool {
            return Err(CompileError::type_error(format!(
                "{} condition must be bool, got {}",
                construct, ty
            )));
        }
        Ok(())
    }

    fn check_assign(&mut self, target: &mut Variable, value: &mut Expr) -> CompileResult<()> {
        let inferred = self.infer_expr(value)?;
        if inferred == SemanticType::None {
            return Err(CompileError::type_error(format!(
                "cannot assign a None value to variable '{}'",
                target.name
            )));
        }

        if let Some(declared) = target.annotation {
            if declared != inferred {
                return Err(CompileError::type_error(format!(
                    "cannot assign {} value to variable '{}' declared as {}",
                    inferred, target.name, declared
                )));
            }
        }

        if let Some(&existing) = self.variables.get(&target.name) {
            if existing != inferred {
                return Err(CompileError::type_error(format!(
                    "cannot assign {} value to variable '{}' of type {}: dynamic type change not allowed",
                    inferred, target.name, existing
                )));
            }
        } else {
            self.variables.insert(target.name.clone(), inferred);
        }

        target.resolve(inferred);
        Ok(())
    }

    fn check_for_range(
        &mut self,
        target: &mut Variable,
        begin: &mut Expr,
        end: &mut Expr,
        step: &mut Expr,
    ) -> CompileResult<()> {
        for (what, expr) in [("begin", begin), ("end", end), ("step", step)] {
            let ty = self.infer_expr(expr)?;
            if ty != SemanticType::Int {
                return Err(CompileError::type_error(format!(
                    "range() {} must be int, got {}",
                    what, ty
                )));
            }
        }

        // The counter takes the type of `begin`, which is always int here.
        let ty = SemanticType::Int;
        if let Some(declared) = target.annotation {
            if declared != ty {
                return Err(CompileError::type_error(format!(
                    "loop variable '{}' declared as {} but range() yields {}",
                    target.name, declared, ty
                )));
            }
        }
        match self.variables.get(&target.name) {
            Some(&existing) if existing != ty => {
                return Err(CompileError::type_error(format!(
                    "loop variable '{}' already has type {}, range() yields {}",
                    target.name, existing, ty
                )));
            }
            Some(_) => {}
            None => {
                self.variables.insert(target.name.clone(), ty);
            }
        }
        target.resolve(ty);
        Ok(())
    }

    fn check_return(&mut self, value: Option<&mut Expr>) -> CompileResult<()> {
        let ty = match value {
            Some(expr) => {
                let ty = self.infer_expr(expr)?;
                if ty == SemanticType::None {
                    return Err(CompileError::type_error(format!(
                        "function '{}' returns the result of an expression with no value",
                        self.function_name
                    )));
                }
                ty
            }
            None => SemanticType::None,
        };

        if let Some(declared) = self.return_annotation {
            if declared != ty {
                return Err(CompileError::type_error(format!(
                    "return type {} does not match declared return type {} of function '{}'",
                    ty, declared, self.function_name
                )));
            }
        }

        match self.inferred_return {
            Some(first) if first != ty => Err(CompileError::type_error(format!(
                "return type {} of function '{}' disagrees with earlier return of type {}",
                ty, self.function_name, first
            ))),
            Some(_) => Ok(()),
            None => {
                self.inferred_return = Some(ty);
                Ok(())
            }
        }
    }

    // ─── Expression type inference ───────────────────────────────────────

    fn infer_expr(&mut self, expr: &mut Expr) -> CompileResult<SemanticType> {
        match expr {
            Expr::IntLiteral(_) => Ok(SemanticType::Int),
            Expr::FloatLiteral(_) => Ok(SemanticType::Float),
            Expr::BoolLiteral(_) => Ok(SemanticType::Bool),

            Expr::Variable(var) => match self.variables.get(&var.name) {
                Some(&ty) => {
                    var.resolve(ty);
                    Ok(ty)
                }
                None => Err(CompileError::name_error(format!(
                    "name '{}' is not defined in function '{}'",
                    var.name, self.function_name
                ))),
            },

            Expr::BinaryOp { left, op, right } => {
                let lt = self.infer_expr(left)?;
                let rt = self.infer_expr(right)?;
                if lt != rt {
                    return Err(CompileError::type_error(format!(
                        "operands of '{}' must share one type, got {} and {}",
                        op, lt, rt
                    )));
                }
                if !lt.is_numeric() {
                    return Err(CompileError::type_error(format!(
                        "unsupported operand type {} for '{}'",
                        lt, op
                    )));
                }
                if *op == BinaryOperator::Mod && lt != SemanticType::Int {
                    return Err(CompileError::type_error(format!(
                        "'%' requires int operands, got {}",
                        lt
                    )));
                }
                Ok(lt)
            }

            Expr::UnaryOp { op, operand } => {
                let ty = self.infer_expr(operand)?;
                match op {
                    UnaryOperator::Neg if ty.is_numeric() => Ok(ty),
                    UnaryOperator::Neg => Err(CompileError::type_error(format!(
                        "bad operand type for unary '-': {}",
                        ty
                    ))),
                    UnaryOperator::Not if ty == SemanticType::Bool => Ok(ty),
                    UnaryOperator::Not => Err(CompileError::type_error(format!(
                        "'not' requires a bool operand, got {}",
                        ty
                    ))),
                }
            }

            Expr::Compare { left, op, right } => {
                let lt = self.infer_expr(left)?;
                let rt = self.infer_expr(right)?;
                if lt != rt {
                    return Err(CompileError::type_error(format!(
                        "operands of '{}' must share one type, got {} and {}",
                        op, lt, rt
                    )));
                }
                if lt == SemanticType::None {
                    return Err(CompileError::type_error(format!(
                        "cannot compare values of type None with '{}'",
                        op
                    )));
                }
                Ok(SemanticType::Bool)
            }

            Expr::Call { func, args } => self.infer_call(func, args),
        }
    }

    fn infer_call(&mut self, func: &str, args: &mut [Expr]) -> CompileResult<SemanticType> {
        if let Some((ret, accepted)) = builtin(func) {
            if args.len() != 1 {
                return Err(CompileError::signature_error(format!(
                    "{}() takes exactly one argument ({} given)",
                    func,
                    args.len()
                )));
            }
            let ty = self.infer_expr(&mut args[0])?;
            if !accepted.contains(&ty) {
                return Err(CompileError::type_error(format!(
                    "{}() does not accept an argument of type {}",
                    func, ty
                )));
            }
            return Ok(ret);
        }

        let (params, ret) = if func == self.function_name {
            let ret = self.return_annotation.or(self.inferred_return).ok_or_else(|| {
                CompileError::type_error(format!(
                    "return type of recursive call to '{}' is not known yet; annotate it",
                    func
                ))
            })?;
            (self.param_types.clone(), ret)
        } else {
            match self.registry.resolve(func) {
                Some(callee) => {
                    let sig = callee.signature();
                    (sig.params.clone(), sig.ret)
                }
                None => {
                    return Err(CompileError::name_error(format!(
                        "function '{}' is not defined",
                        func
                    )));
                }
            }
        };

        if params.len() != args.len() {
            return Err(CompileError::signature_error(format!(
                "{}() takes {} argument(s) but {} were given",
                func,
                params.len(),
                args.len()
            )));
        }
        for (pos, (arg, expected)) in args.iter_mut().zip(params.iter()).enumerate() {
            let actual = self.infer_expr(arg)?;
            if actual != *expected {
                return Err(CompileError::signature_error(format!(
                    "argument {} of {}() must be {}, got {}",
                    pos, func, expected, actual
                )));
            }
        }
        Ok(ret)
    }
}
