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

use std::fmt;

use wasm_encoder::{BlockType, Ieee64};

/// Where a `call` goes. Imports and defined functions are numbered separately
/// while the module is under construction and merged into one index space
/// (imports first) only at encoding time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTarget {
    Import(u32),
    Function(u32),
}

impl CallTarget {
    pub fn resolve(self, import_count: u32) -> u32 {
        match self {
            CallTarget::Import(idx) => idx,
            CallTarget::Function(idx) => import_count + idx,
        }
    }
}

/// The instruction subset the generator emits. Structured blocks are always
/// of the empty block type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    // Control
    Unreachable,
    Block,
    Loop,
    If,
    Else,
    End,
    Br(u32),
    BrIf(u32),
    Return,
    Call(CallTarget),
    Drop,
    Select,

    // Variables and constants
    LocalGet(u32),
    LocalSet(u32),
    I32Const(i32),
    F64Const(f64),

    // Comparison
    I32Eqz,
    I32Eq,
    I32Ne,
    I32LtS,
    I32GtS,
    I32LeS,
    I32GeS,
    F64Eq,
    F64Ne,
    F64Lt,
    F64Gt,
    F64Le,
    F64Ge,

    // Arithmetic
    I32Add,
    I32Sub,
    I32Mul,
    I32DivS,
    I32RemS,
    I32And,
    I32Xor,
    F64Neg,
    F64Add,
    F64Sub,
    F64Mul,
    F64Div,

    // Conversion
    I32TruncF64S,
    F64ConvertI32S,
}

impl Instruction {
    /// The `wasm_encoder` form, with call targets placed after `import_count` imports.
    pub fn lower(&self, import_count: u32) -> wasm_encoder::Instruction<'static> {
        use wasm_encoder::Instruction as W;
        match *self {
            Instruction::Unreachable => W::Unreachable,
            Instruction::Block => W::Block(BlockType::Empty),
            Instruction::Loop => W::Loop(BlockType::Empty),
            Instruction::If => W::If(BlockType::Empty),
            Instruction::Else => W::Else,
            Instruction::End => W::End,
            Instruction::Br(depth) => W::Br(depth),
            Instruction::BrIf(depth) => W::BrIf(depth),
            Instruction::Return => W::Return,
            Instruction::Call(target) => W::Call(target.resolve(import_count)),
            Instruction::Drop => W::Drop,
            Instruction::Select => W::Select,
            Instruction::LocalGet(idx) => W::LocalGet(idx),
            Instruction::LocalSet(idx) => W::LocalSet(idx),
            Instruction::I32Const(v) => W::I32Const(v),
            Instruction::F64Const(v) => W::F64Const(Ieee64::from(v)),
            Instruction::I32Eqz => W::I32Eqz,
            Instruction::I32Eq => W::I32Eq,
            Instruction::I32Ne => W::I32Ne,
            Instruction::I32LtS => W::I32LtS,
            Instruction::I32GtS => W::I32GtS,
            Instruction::I32LeS => W::I32LeS,
            Instruction::I32GeS => W::I32GeS,
            Instruction::F64Eq => W::F64Eq,
            Instruction::F64Ne => W::F64Ne,
            Instruction::F64Lt => W::F64Lt,
            Instruction::F64Gt => W::F64Gt,
            Instruction::F64Le => W::F64Le,
            Instruction::F64Ge => W::F64Ge,
            Instruction::I32Add => W::I32Add,
            Instruction::I32Sub => W::I32Sub,
            Instruction::I32Mul => W::I32Mul,
            Instruction::I32DivS => W::I32DivS,
            Instruction::I32RemS => W::I32RemS,
            Instruction::I32And => W::I32And,
            Instruction::I32Xor => W::I32Xor,
            Instruction::F64Neg => W::F64Neg,
            Instruction::F64Add => W::F64Add,
            Instruction::F64Sub => W::F64Sub,
            Instruction::F64Mul => W::F64Mul,
            Instruction::F64Div => W::F64Div,
            Instruction::I32TruncF64S => W::I32TruncF64S,
            Instruction::F64ConvertI32S => W::F64ConvertI32S,
        }
    }

    /// Change in structured-block nesting caused by this instruction.
    pub fn nesting_delta(&self) -> i32 {
        match self {
            Instruction::Block | Instruction::Loop | Instruction::If => 1,
            Instruction::End => -1,
            _ => 0,
        }
    }

    fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Unreachable => "unreachable",
            Instruction::Block => "block",
            Instruction::Loop => "loop",
            Instruction::If => "if",
            Instruction::Else => "else",
            Instruction::End => "end",
            Instruction::Br(_) => "br",
            Instruction::BrIf(_) => "br_if",
            Instruction::Return => "return",
            Instruction::Call(_) => "call",
            Instruction::Drop => "drop",
            Instruction::Select => "select",
            Instruction::LocalGet(_) => "local.get",
            Instruction::LocalSet(_) => "local.set",
            Instruction::I32Const(_) => "i32.const",
            Instruction::F64Const(_) => "f64.const",
            Instruction::I32Eqz => "i32.eqz",
            Instruction::I32Eq => "i32.eq",
            Instruction::I32Ne => "i32.ne",
            Instruction::I32LtS => "i32.lt_s",
            Instruction::I32GtS => "i32.gt_s",
            Instruction::I32LeS => "i32.le_s",
            Instruction::I32GeS => "i32.ge_s",
            Instruction::F64Eq => "f64.eq",
            Instruction::F64Ne => "f64.ne",
            Instruction::F64Lt => "f64.lt",
            Instruction::F64Gt => "f64.gt",
            Instruction::F64Le => "f64.le",
            Instruction::F64Ge => "f64.ge",
            Instruction::I32Add => "i32.add",
            Instruction::I32Sub => "i32.sub",
            Instruction::I32Mul => "i32.mul",
            Instruction::I32DivS => "i32.div_s",
            Instruction::I32RemS => "i32.rem_s",
            Instruction::I32And => "i32.and",
            Instruction::I32Xor => "i32.xor",
            Instruction::F64Neg => "f64.neg",
            Instruction::F64Add => "f64.add",
            Instruction::F64Sub => "f64.sub",
            Instruction::F64Mul => "f64.mul",
            Instruction::F64Div => "f64.div",
            Instruction::I32TruncF64S => "i32.trunc_f64_s",
            Instruction::F64ConvertI32S => "f64.convert_i32_s",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())?;
        match self {
            Instruction::Br(n) | Instruction::BrIf(n) => write!(f, " {}", n),
            Instruction::LocalGet(n) | Instruction::LocalSet(n) => write!(f, " {}", n),
            Instruction::Call(CallTarget::Import(n)) => write!(f, " import:{}", n),
            Instruction::Call(CallTarget::Function(n)) => write!(f, " func:{}", n),
            Instruction::I32Const(v) => write!(f, " {}", v),
            Instruction::F64Const(v) => write!(f, " {:?}", v),
            _ => Ok(()),
        }
    }
}
