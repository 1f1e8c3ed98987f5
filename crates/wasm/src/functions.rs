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
use std::collections::HashMap;

use crate::error::{CompileError, CompileResult};
use crate::instruction::Instruction;
use crate::module_builder::DefinedFunction;
use crate::types::{FuncType, SemanticType};

/// One slot of the local table. Staging temporaries have no name.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSlot {
    pub name: Option<String>,
    pub ty: SemanticType,
}

/// Kind of an open structured construct, as far as `break`/`continue` care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    While,
    /// Counted loop; `continue` must advance `var` by `step` before re-entering.
    For { var: u32, step: u32 },
}

impl BlockKind {
    fn is_loop(&self) -> bool {
        !matches!(self, BlockKind::If)
    }
}

/// Context for compiling a single WASM function body.
///
/// Buffers instructions and the local table. Call targets stay symbolic until
/// the module is encoded, so the buffer is kept as [`Instruction`]s rather
/// than bytes. Call [`FunctionContext::finish`] once the body is complete.
pub struct FunctionContext {
    name: String,
    /// Slot-ordered local table; parameters occupy `0..param_count`.
    locals: Vec<LocalSlot>,
    /// Named locals → slot
    slots: HashMap<String, u32>,
    param_count: u32,
    results: Vec<SemanticType>,
    instructions: Vec<Instruction>,
    blocks: Vec<BlockKind>,
}

impl FunctionContext {
    /// Parameters are registered as locals at indices 0..N in declaration order.
    pub fn new(
        name: impl Into<String>,
        params: &[(String, SemanticType)],
        ret: SemanticType,
    ) -> CompileResult<Self> {
        let name = name.into();
        let mut ctx = Self {
            name,
            locals: Vec::new(),
            slots: HashMap::new(),
            param_count: 0,
            results: if ret == SemanticType::None { Vec::new() } else { vec![ret] },
            instructions: Vec::new(),
            blocks: Vec::new(),
        };
        for (param, ty) in params {
            if ctx.slots.contains_key(param) {
                return Err(CompileError::name_error(format!(
                    "duplicate parameter '{}' in function '{}'",
                    param, ctx.name
                )));
            }
            ctx.push_slot(Some(param.clone()), *ty)?;
        }
        ctx.param_count = ctx.locals.len() as u32;
        Ok(ctx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn push_slot(&mut self, name: Option<String>, ty: SemanticType) -> CompileResult<u32> {
        if ty.value_type().is_none() {
            return Err(CompileError::Internal(format!(
                "cannot allocate a None-typed local in function '{}'",
                self.name
            )));
        }
        let idx = self.locals.len() as u32;
        if let Some(name) = &name {
            self.slots.insert(name.clone(), idx);
        }
        self.locals.push(LocalSlot { name, ty });
        Ok(idx)
    }

    /// Declare a named local and return its slot. A name already declared with
    /// the same type keeps its slot; a different type is an error.
    pub fn declare_local(&mut self, name: &str, ty: SemanticType) -> CompileResult<u32> {
        if let Some(&existing) = self.slots.get(name) {
            let existing_ty = self.locals[existing as usize].ty;
            if existing_ty != ty {
                return Err(CompileError::type_error(format!(
                    "local '{}' in function '{}' redeclared as {} (previously {})",
                    name, self.name, ty, existing_ty
                )));
            }
            return Ok(existing);
        }
        self.push_slot(Some(name.to_string()), ty)
    }

    /// Allocate an anonymous temporary slot.
    pub fn declare_stub(&mut self, ty: SemanticType) -> CompileResult<u32> {
        self.push_slot(None, ty)
    }

    /// Get the slot index for a given variable name.
    pub fn get_local(&self, name: &str) -> Option<u32> {
        self.slots.get(name).copied()
    }

    pub fn locals(&self) -> &[LocalSlot] {
        &self.locals
    }

    /// Emit an instruction to the function body (buffered).
    pub fn emit(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    /// Emit the `End` instruction that closes the function body.
    pub fn emit_end(&mut self) {
        self.instructions.push(Instruction::End);
    }

    // ─── Block stack ─────────────────────────────────────────────────────

    pub fn enter_block(&mut self, kind: BlockKind) {
        self.blocks.push(kind);
    }

    pub fn exit_block(&mut self) -> CompileResult<BlockKind> {
        self.blocks.pop().ok_or_else(|| {
            CompileError::Internal(format!("block stack underflow in function '{}'", self.name))
        })
    }

    /// The nearest enclosing loop and the number of block-stack entries above it.
    /// `continue` branches to that depth, `break` to one more.
    pub fn nearest_loop(&self, construct: &'static str) -> CompileResult<(u32, BlockKind)> {
        self.blocks
            .iter()
            .rev()
            .enumerate()
            .find(|(_, kind)| kind.is_loop())
            .map(|(depth, kind)| (depth as u32, *kind))
            .ok_or_else(|| {
                CompileError::unsupported(construct, format!("'{}' outside loop", construct))
            })
    }

    /// Build the module-level description of this function.
    pub fn finish(self, export: bool) -> CompileResult<DefinedFunction> {
        if !self.blocks.is_empty() {
            return Err(CompileError::Internal(format!(
                "function '{}' finished with {} open block(s)",
                self.name,
                self.blocks.len()
            )));
        }
        let params = self.locals[..self.param_count as usize]
            .iter()
            .filter_map(|slot| slot.ty.value_type())
            .collect();
        let results = self.results.iter().filter_map(|t| t.value_type()).collect();
        Ok(DefinedFunction {
            name: self.name,
            ty: FuncType::new(params, results),
            param_count: self.param_count,
            locals: self.locals,
            body: self.instructions,
            export,
        })
    }
}
