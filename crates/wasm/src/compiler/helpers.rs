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

use super::*;

/// Semantic type an expression produces, without emitting code.
///
/// Mirrors the lowering in [`CodeGenerator::compile_expr`] and reads the types
/// the checker wrote onto the IR.
pub fn infer_type(registry: &SignatureRegistry, current: &FunctionDef, expr: &Expr) -> CompileResult<SemanticType> {
    match expr {
        Expr::IntLiteral(_) => Ok(SemanticType::Int),
        Expr::FloatLiteral(_) => Ok(SemanticType::Float),
        Expr::BoolLiteral(_) => Ok(SemanticType::Bool),
        Expr::Variable(var) => var.checked_type(),
        Expr::Compare { .. } => Ok(SemanticType::Bool),
        Expr::BinaryOp { left, .. } => infer_type(registry, current, left),
        Expr::UnaryOp { operand, .. } => infer_type(registry, current, operand),
        Expr::Call { func, .. } => {
            if let Some((ret, _)) = crate::type_checker::builtin(func) {
                return Ok(ret);
            }
            if *func == current.name {
                return current.return_type().ok_or_else(|| {
                    CompileError::Internal(format!("return type of '{}' is not resolved", func))
                });
            }
            registry
                .resolve(func)
                .map(|callee| callee.signature().ret)
                .ok_or_else(|| CompileError::name_error(format!("function '{}' is not defined", func)))
        }
    }
}
