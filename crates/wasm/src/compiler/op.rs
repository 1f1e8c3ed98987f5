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
use crate::ir::{BinaryOperator, CompareOperator, UnaryOperator};

impl<'a> CodeGenerator<'a> {
    pub(super) fn compile_unary_op(&mut self, op: UnaryOperator, operand: &Expr) -> CompileResult<SemanticType> {
        match op {
            UnaryOperator::Neg => {
                let ty = helpers::infer_type(self.registry, self.def, operand)?;
                match ty {
                    SemanticType::Int => {
                        // -x == 0 - x
                        self.ctx.emit(Instruction::I32Const(0));
                        self.compile_expr(operand)?;
                        self.ctx.emit(Instruction::I32Sub);
                    }
                    SemanticType::Float => {
                        self.compile_expr(operand)?;
                        self.ctx.emit(Instruction::F64Neg);
                    }
                    other => {
                        return Err(CompileError::type_error(format!(
                            "bad operand type for unary '-': {}",
                            other
                        )));
                    }
                }
                Ok(ty)
            }
            UnaryOperator::Not => {
                self.compile_expr(operand)?;
                self.ctx.emit(Instruction::I32Eqz);
                Ok(SemanticType::Bool)
            }
        }
    }

    pub(super) fn compile_binary_op(
        &mut self,
        left: &Expr,
        op: BinaryOperator,
        right: &Expr,
    ) -> CompileResult<SemanticType> {
        let lt = self.compile_expr(left)?;
        let rt = self.compile_expr(right)?;
        if lt != rt {
            return Err(CompileError::type_error(format!(
                "operands of '{}' must share one type, got {} and {}",
                op, lt, rt
            )));
        }
        let instr = binary_instruction(op, lt).ok_or_else(|| {
            CompileError::type_error(format!("unsupported operand type {} for '{}'", lt, op))
        })?;
        if (lt, op) == (SemanticType::Int, BinaryOperator::Mod) {
            self.emit_floored_rem()?;
        } else {
            self.ctx.emit(instr);
        }
        Ok(lt)
    }

    /// Integer `%` with the sign of the divisor, built on the truncated
    /// `i32.rem_s`. Expects `[a, b]` on the stack.
    fn emit_floored_rem(&mut self) -> CompileResult<()> {
        let divisor = self.ctx.declare_stub(SemanticType::Int)?;
        let rem = self.ctx.declare_stub(SemanticType::Int)?;
        self.ctx.emit(Instruction::LocalSet(divisor));
        self.ctx.emit(Instruction::LocalGet(divisor));
        self.ctx.emit(Instruction::I32RemS);
        self.ctx.emit(Instruction::LocalSet(rem));

        // rem + (rem != 0 && (rem ^ b) < 0 ? b : 0)
        self.ctx.emit(Instruction::LocalGet(rem));
        self.ctx.emit(Instruction::LocalGet(divisor));
        self.ctx.emit(Instruction::I32Const(0));
        self.ctx.emit(Instruction::LocalGet(rem));
        self.ctx.emit(Instruction::LocalGet(divisor));
        self.ctx.emit(Instruction::I32Xor);
        self.ctx.emit(Instruction::I32Const(0));
        self.ctx.emit(Instruction::I32LtS);
        self.ctx.emit(Instruction::LocalGet(rem));
        self.ctx.emit(Instruction::I32Const(0));
        self.ctx.emit(Instruction::I32Ne);
        self.ctx.emit(Instruction::I32And);
        self.ctx.emit(Instruction::Select);
        self.ctx.emit(Instruction::I32Add);
        Ok(())
    }

    pub(super) fn compile_compare(
        &mut self,
        left: &Expr,
        op: CompareOperator,
        right: &Expr,
    ) -> CompileResult<SemanticType> {
        let lt = self.compile_expr(left)?;
        let rt = self.compile_expr(right)?;
        if lt != rt {
            return Err(CompileError::type_error(format!(
                "operands of '{}' must share one type, got {} and {}",
                op, lt, rt
            )));
        }
        let instr = compare_instruction(op, lt).ok_or_else(|| {
            CompileError::type_error(format!("cannot compare values of type {} with '{}'", lt, op))
        })?;
        self.ctx.emit(instr);
        Ok(SemanticType::Bool)
    }
}

/// Arithmetic instruction for `op` over operands of type `ty`.
/// Integer division truncates toward zero. For `int % int` this is only the
/// truncated remainder; the generator wraps it in a floor adjustment.
pub fn binary_instruction(op: BinaryOperator, ty: SemanticType) -> Option<Instruction> {
    let instr = match (ty, op) {
        (SemanticType::Int, BinaryOperator::Add) => Instruction::I32Add,
        (SemanticType::Int, BinaryOperator::Sub) => Instruction::I32Sub,
        (SemanticType::Int, BinaryOperator::Mul) => Instruction::I32Mul,
        (SemanticType::Int, BinaryOperator::Div) => Instruction::I32DivS,
        (SemanticType::Int, BinaryOperator::Mod) => Instruction::I32RemS,
        (SemanticType::Float, BinaryOperator::Add) => Instruction::F64Add,
        (SemanticType::Float, BinaryOperator::Sub) => Instruction::F64Sub,
        (SemanticType::Float, BinaryOperator::Mul) => Instruction::F64Mul,
        (SemanticType::Float, BinaryOperator::Div) => Instruction::F64Div,
        _ => return None,
    };
    Some(instr)
}

/// Comparison instruction for `op` over operands of type `ty`.
/// `int` and `bool` both compare as signed `i32`.
pub fn compare_instruction(op: CompareOperator, ty: SemanticType) -> Option<Instruction> {
    let instr = match ty {
        SemanticType::Int | SemanticType::Bool => match op {
            CompareOperator::Eq => Instruction::I32Eq,
            CompareOperator::NotEq => Instruction::I32Ne,
            CompareOperator::Lt => Instruction::I32LtS,
            CompareOperator::LtE => Instruction::I32LeS,
            CompareOperator::Gt => Instruction::I32GtS,
            CompareOperator::GtE => Instruction::I32GeS,
        },
        SemanticType::Float => match op {
            CompareOperator::Eq => Instruction::F64Eq,
            CompareOperator::NotEq => Instruction::F64Ne,
            CompareOperator::Lt => Instruction::F64Lt,
            CompareOperator::LtE => Instruction::F64Le,
            CompareOperator::Gt => Instruction::F64Gt,
            CompareOperator::GtE => Instruction::F64Ge,
        },
        SemanticType::None => return None,
    };
    Some(instr)
}
