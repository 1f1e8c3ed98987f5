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

use tracing::trace;

use super::*;
use crate::instruction::CallTarget;
use crate::signatures::{print_field, Callee, CALLBACK_MODULE, PRINT_MODULE};
use crate::types::FuncType;

impl<'a> CodeGenerator<'a> {
    pub(super) fn compile_call(&mut self, func: &str, args: &[Expr]) -> CompileResult<SemanticType> {
        match func {
            "int" | "float" | "bool" => self.compile_conversion(func, args),
            "print" => self.compile_print(args),
            _ if func == self.def.name => self.compile_self_call(args),
            _ => self.compile_named_call(func, args),
        }
    }

    fn single_arg<'e>(&self, func: &str, args: &'e [Expr]) -> CompileResult<&'e Expr> {
        match args {
            [arg] => Ok(arg),
            _ => Err(CompileError::signature_error(format!(
                "{}() takes exactly one argument ({} given)",
                func,
                args.len()
            ))),
        }
    }

    fn compile_conversion(&mut self, func: &str, args: &[Expr]) -> CompileResult<SemanticType> {
        let arg = self.single_arg(func, args)?;
        let from = self.compile_expr(arg)?;
        let to = match func {
            "int" => SemanticType::Int,
            "float" => SemanticType::Float,
            _ => SemanticType::Bool,
        };
        match (from, to) {
            (SemanticType::Float, SemanticType::Int) => self.ctx.emit(Instruction::I32TruncF64S),
            (SemanticType::Int | SemanticType::Bool, SemanticType::Float) => {
                self.ctx.emit(Instruction::F64ConvertI32S)
            }
            (SemanticType::Int, SemanticType::Bool) => {
                self.ctx.emit(Instruction::I32Const(0));
                self.ctx.emit(Instruction::I32Ne);
            }
            (SemanticType::Float, SemanticType::Bool) => {
                self.ctx.emit(Instruction::F64Const(0.0));
                self.ctx.emit(Instruction::F64Ne);
            }
            // bool → int and identity conversions share the representation
            (SemanticType::Bool, SemanticType::Int) => {}
            (a, b) if a == b => {}
            (a, b) => {
                return Err(CompileError::type_error(format!(
                    "{}() does not accept an argument of type {} (expected {})",
                    func, a, b
                )));
            }
        }
        Ok(to)
    }

    fn compile_print(&mut self, args: &[Expr]) -> CompileResult<SemanticType> {
        let arg = self.single_arg("print", args)?;
        let ty = self.compile_expr(arg)?;
        let (field, vt) = print_field(ty)
            .zip(ty.value_type())
            .ok_or_else(|| CompileError::type_error(format!("print() does not accept an argument of type {}", ty)))?;
        let idx = self.module.add_import(PRINT_MODULE, field, FuncType::new(vec![vt], vec![]));
        trace!(module = PRINT_MODULE, field, index = idx, "import");
        self.ctx.emit(Instruction::Call(CallTarget::Import(idx)));
        Ok(SemanticType::None)
    }

    fn compile_self_call(&mut self, args: &[Expr]) -> CompileResult<SemanticType> {
        let def = self.def;
        let params = def
            .params
            .iter()
            .map(|p| p.checked_type())
            .collect::<CompileResult<Vec<_>>>()?;
        self.compile_args(&def.name, &params, args)?;
        // The function under construction is appended right after the current ones.
        let idx = self.module.next_function_index();
        self.ctx.emit(Instruction::Call(CallTarget::Function(idx)));
        Ok(self.ret)
    }

    fn compile_named_call(&mut self, func: &str, args: &[Expr]) -> CompileResult<SemanticType> {
        let registry = self.registry;
        match registry.resolve(func) {
            Some(Callee::Function(sig)) => {
                let idx = self.module.function_index(func).ok_or_else(|| {
                    CompileError::Internal(format!("function '{}' is registered but not in the module", func))
                })?;
                self.compile_args(func, &sig.params, args)?;
                self.ctx.emit(Instruction::Call(CallTarget::Function(idx)));
                Ok(sig.ret)
            }
            Some(Callee::Callback(cb)) => {
                self.compile_args(func, &cb.source.params, args)?;
                let idx = self.module.add_import(CALLBACK_MODULE, func, cb.target.clone());
                trace!(module = CALLBACK_MODULE, field = func, index = idx, "import");
                self.ctx.emit(Instruction::Call(CallTarget::Import(idx)));
                Ok(cb.source.ret)
            }
            None => Err(CompileError::name_error(format!("function '{}' is not defined", func))),
        }
    }

    /// Compile call arguments left to right, checking them against `params`.
    fn compile_args(&mut self, func: &str, params: &[SemanticType], args: &[Expr]) -> CompileResult<()> {
        if params.len() != args.len() {
            return Err(CompileError::signature_error(format!(
                "{}() takes {} argument(s) but {} were given",
                func,
                params.len(),
                args.len()
            )));
        }
        for (pos, (arg, expected)) in args.iter().zip(params).enumerate() {
            let actual = helpers::infer_type(self.registry, self.def, arg)?;
            if actual != *expected {
                return Err(CompileError::signature_error(format!(
                    "argument {} of {}() must be {}, got {}",
                    pos, func, expected, actual
                )));
            }
            self.compile_expr(arg)?;
        }
        Ok(())
    }
}
