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
use crate::functions::BlockKind;
use crate::ir::Variable;

impl<'a> CodeGenerator<'a> {
    pub(super) fn compile_if(
        &mut self,
        test: &Expr,
        body: &[Spanned<Stmt>],
        orelse: &[Spanned<Stmt>],
    ) -> CompileResult<()> {
        self.compile_expr(test)?;
        self.ctx.emit(Instruction::If);
        self.ctx.enter_block(BlockKind::If);

        self.compile_block(body)?;

        // `elif` chains arrive as a nested `If` inside `orelse`
        if !orelse.is_empty() {
            self.ctx.emit(Instruction::Else);
            self.compile_block(orelse)?;
        }

        self.ctx.exit_block()?;
        self.ctx.emit(Instruction::End);
        Ok(())
    }

    pub(super) fn compile_while(&mut self, test: &Expr, body: &[Spanned<Stmt>]) -> CompileResult<()> {
        // WASM pattern for while loops:
        // block $exit
        //   loop $loop
        //     <test>
        //     i32.eqz
        //     br_if $exit    ;; if test is false, break out
        //     <body>
        //     br $loop       ;; continue loop
        //   end
        // end
        self.ctx.emit(Instruction::Block);
        self.ctx.emit(Instruction::Loop);
        self.ctx.enter_block(BlockKind::While);

        self.compile_expr(test)?;
        self.ctx.emit(Instruction::I32Eqz);
        self.ctx.emit(Instruction::BrIf(1));

        self.compile_block(body)?;

        self.ctx.emit(Instruction::Br(0));
        self.ctx.exit_block()?;
        self.ctx.emit(Instruction::End); // end loop
        self.ctx.emit(Instruction::End); // end block
        Ok(())
    }

    pub(super) fn compile_for_range(
        &mut self,
        target: &Variable,
        begin: &Expr,
        end: &Expr,
        step: &Expr,
        body: &[Spanned<Stmt>],
    ) -> CompileResult<()> {
        // Bounds are evaluated once, in source order, into anonymous slots.
        let mut staged = [0u32; 3];
        for (slot, expr) in staged.iter_mut().zip([begin, end, step]) {
            let ty = self.compile_expr(expr)?;
            *slot = self.ctx.declare_stub(ty)?;
            self.ctx.emit(Instruction::LocalSet(*slot));
        }
        let [begin_slot, end_slot, step_slot] = staged;

        let var = self.ctx.declare_local(&target.name, target.checked_type()?)?;
        self.ctx.emit(Instruction::LocalGet(begin_slot));
        self.ctx.emit(Instruction::LocalSet(var));

        // block $exit
        //   loop $head
        //     var >= end ? br $exit
        //     <body>
        //     var += step
        //     br $head
        //   end
        // end
        self.ctx.emit(Instruction::Block);
        self.ctx.emit(Instruction::Loop);
        self.ctx.enter_block(BlockKind::For {
            var,
            step: step_slot,
        });

        self.ctx.emit(Instruction::LocalGet(var));
        self.ctx.emit(Instruction::LocalGet(end_slot));
        self.ctx.emit(Instruction::I32GeS);
        self.ctx.emit(Instruction::BrIf(1));

        self.compile_block(body)?;

        self.emit_increment(var, step_slot);
        self.ctx.emit(Instruction::Br(0));
        self.ctx.exit_block()?;
        self.ctx.emit(Instruction::End); // end loop
        self.ctx.emit(Instruction::End); // end block
        Ok(())
    }

    fn emit_increment(&mut self, var: u32, step: u32) {
        self.ctx.emit(Instruction::LocalGet(var));
        self.ctx.emit(Instruction::LocalGet(step));
        self.ctx.emit(Instruction::I32Add);
        self.ctx.emit(Instruction::LocalSet(var));
    }

    pub(super) fn compile_continue(&mut self) -> CompileResult<()> {
        let (depth, kind) = self.ctx.nearest_loop("continue")?;
        if let BlockKind::For { var, step } = kind {
            self.emit_increment(var, step);
        }
        self.ctx.emit(Instruction::Br(depth));
        Ok(())
    }

    pub(super) fn compile_break(&mut self) -> CompileResult<()> {
        let (depth, _) = self.ctx.nearest_loop("break")?;
        self.ctx.emit(Instruction::Br(depth + 1));
        Ok(())
    }
}
