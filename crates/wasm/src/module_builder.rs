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

//! Module description and its binary encoding.
//!
//! Layout: header, then the type, import, function, export and code sections
//! in that order. Sections with no entries are omitted.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::debug;
use wasm_encoder::{
    CodeSection, EntityType, ExportKind, ExportSection, Function, FunctionSection, ImportSection,
    Module as WasmModule, TypeSection, ValType,
};

use crate::functions::LocalSlot;
use crate::instruction::Instruction;
use crate::types::FuncType;

/// An imported host function.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub module: String,
    pub field: String,
    pub ty: FuncType,
}

/// A function defined by the module.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinedFunction {
    pub name: String,
    pub ty: FuncType,
    pub param_count: u32,
    /// Full local table, parameters included.
    pub locals: Vec<LocalSlot>,
    /// Body including the closing `end`.
    pub body: Vec<Instruction>,
    pub export: bool,
}

impl DefinedFunction {
    /// Non-parameter locals grouped by consecutive value type, as the code
    /// section declares them.
    pub fn local_groups(&self) -> Vec<(u32, ValType)> {
        let mut grouped: Vec<(u32, ValType)> = Vec::new();
        let declared = self.locals[self.param_count as usize..]
            .iter()
            .filter_map(|slot| slot.ty.value_type())
            .map(|vt| vt.to_val_type());
        for vt in declared {
            if let Some((count, last)) = grouped.last_mut() {
                if *last == vt {
                    *count += 1;
                    continue;
                }
            }
            grouped.push((1, vt));
        }
        grouped
    }
}

/// Restore point for undoing a failed function compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    imports: usize,
    functions: usize,
}

/// Collects imports and defined functions, then serializes them.
///
/// The encoded bytes are memoized; any mutation drops the cache.
#[derive(Debug, Default)]
pub struct ModuleBuilder {
    imports: Vec<Import>,
    functions: Vec<DefinedFunction>,
    encoded: Option<Arc<[u8]>>,
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn functions(&self) -> &[DefinedFunction] {
        &self.functions
    }

    pub fn import_index(&self, module: &str, field: &str) -> Option<u32> {
        self.imports
            .iter()
            .position(|i| i.module == module && i.field == field)
            .map(|i| i as u32)
    }

    /// Register an import unless `(module, field)` is already present; returns its index.
    pub fn add_import(&mut self, module: &str, field: &str, ty: FuncType) -> u32 {
        if let Some(idx) = self.import_index(module, field) {
            return idx;
        }
        self.encoded = None;
        self.imports.push(Import {
            module: module.to_string(),
            field: field.to_string(),
            ty,
        });
        (self.imports.len() - 1) as u32
    }

    pub fn function_index(&self, name: &str) -> Option<u32> {
        self.functions
            .iter()
            .position(|f| f.name == name)
            .map(|i| i as u32)
    }

    /// Index the next added function will receive.
    pub fn next_function_index(&self) -> u32 {
        self.functions.len() as u32
    }

    pub fn add_function(&mut self, function: DefinedFunction) -> u32 {
        self.encoded = None;
        self.functions.push(function);
        (self.functions.len() - 1) as u32
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            imports: self.imports.len(),
            functions: self.functions.len(),
        }
    }

    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        if self.imports.len() != checkpoint.imports || self.functions.len() != checkpoint.functions {
            self.encoded = None;
        }
        self.imports.truncate(checkpoint.imports);
        self.functions.truncate(checkpoint.functions);
    }

    pub fn clear(&mut self) {
        self.imports.clear();
        self.functions.clear();
        self.encoded = None;
    }

    pub fn is_encoded(&self) -> bool {
        self.encoded.is_some()
    }

    /// The module bytes, encoded on first request and shared afterwards.
    pub fn bytes(&mut self) -> Arc<[u8]> {
        if let Some(bytes) = &self.encoded {
            return Arc::clone(bytes);
        }
        let bytes: Arc<[u8]> = self.encode().into();
        debug!(
            imports = self.imports.len(),
            functions = self.functions.len(),
            size = bytes.len(),
            "encoded module"
        );
        self.encoded = Some(Arc::clone(&bytes));
        bytes
    }

    /// Function types in first-use order: imports, then defined functions.
    fn type_table(&self) -> Vec<FuncType> {
        let mut types: Vec<FuncType> = Vec::new();
        let all = self
            .imports
            .iter()
            .map(|i| &i.ty)
            .chain(self.functions.iter().map(|f| &f.ty));
        for ty in all {
            if !types.contains(ty) {
                types.push(ty.clone());
            }
        }
        types
    }

    fn type_index(types: &[FuncType], ty: &FuncType) -> u32 {
        match types.iter().position(|t| t == ty) {
            Some(idx) => idx as u32,
            None => panic!("function type {} missing from the type table", ty),
        }
    }

    /// Serialize the module. Deterministic for a given sequence of additions.
    pub fn encode(&self) -> Vec<u8> {
        let types = self.type_table();
        let import_count = self.imports.len() as u32;

        let mut type_section = TypeSection::new();
        for ty in &types {
            type_section.ty().function(
                ty.params.iter().map(|p| p.to_val_type()),
                ty.results.iter().map(|r| r.to_val_type()),
            );
        }

        let mut import_section = ImportSection::new();
        for import in &self.imports {
            import_section.import(
                &import.module,
                &import.field,
                EntityType::Function(Self::type_index(&types, &import.ty)),
            );
        }

        let mut function_section = FunctionSection::new();
        let mut export_section = ExportSection::new();
        let mut code_section = CodeSection::new();
        for (i, function) in self.functions.iter().enumerate() {
            function_section.function(Self::type_index(&types, &function.ty));
            if function.export {
                export_section.export(&function.name, ExportKind::Func, import_count + i as u32);
            }
            let mut body = Function::new(function.local_groups());
            for instr in &function.body {
                body.instruction(&instr.lower(import_count));
            }
            code_section.function(&body);
        }

        let mut wasm_module = WasmModule::new();
        if !type_section.is_empty() {
            wasm_module.section(&type_section);
        }
        if !import_section.is_empty() {
            wasm_module.section(&import_section);
        }
        if !function_section.is_empty() {
            wasm_module.section(&function_section);
        }
        if !export_section.is_empty() {
            wasm_module.section(&export_section);
        }
        if !code_section.is_empty() {
            wasm_module.section(&code_section);
        }
        wasm_module.finish()
    }

    /// Human-readable listing of imports, locals and instructions.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for (i, import) in self.imports.iter().enumerate() {
            let _ = writeln!(
                out,
                "(import {} \"{}\" \"{}\" {})",
                i, import.module, import.field, import.ty
            );
        }
        for (i, function) in self.functions.iter().enumerate() {
            let _ = writeln!(out, "(func {} ${} {}", i, function.name, function.ty);
            for (slot, local) in function.locals.iter().enumerate() {
                let role = if (slot as u32) < function.param_count { "param" } else { "local" };
                let name = local.name.as_deref().unwrap_or("<stub>");
                let _ = writeln!(out, "  ;; {} {} {}: {}", role, slot, name, local.ty);
            }
            let mut depth: i32 = 1;
            for instr in &function.body {
                if matches!(instr, Instruction::End | Instruction::Else) {
                    depth -= 1;
                }
                let _ = writeln!(out, "{}{}", "  ".repeat(depth.max(0) as usize + 1), instr);
                if matches!(instr, Instruction::Else) {
                    depth += 1;
                }
                depth += instr.nesting_delta().max(0);
            }
            let _ = writeln!(out, ")");
        }
        out
    }
}
