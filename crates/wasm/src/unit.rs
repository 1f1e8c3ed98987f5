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

//! A compilation unit: the signature registry, the module under construction
//! and the IR of every function compiled into it.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::debug;

use crate::compiler;
use crate::error::CompileResult;
use crate::ir::FunctionDef;
use crate::module_builder::ModuleBuilder;
use crate::signatures::{CallbackSignature, SignatureRegistry};
use crate::transform;
use crate::type_checker::TypeChecker;
use crate::types::FunctionSignature;

/// Functions are compiled one at a time and appended to a single module.
/// A function that fails to compile leaves the unit exactly as it was.
#[derive(Debug, Default)]
pub struct CompilationUnit {
    registry: SignatureRegistry,
    module: ModuleBuilder,
    functions: Vec<FunctionDef>,
}

impl CompilationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type check, generate and append one function, then record its signature.
    pub fn compile_function(&mut self, mut def: FunctionDef) -> CompileResult<FunctionSignature> {
        let signature = TypeChecker::new(&self.registry).check_function(&mut def)?;

        let checkpoint = self.module.checkpoint();
        let function = match compiler::generate(&self.registry, &mut self.module, &def) {
            Ok(function) => function,
            Err(err) => {
                self.module.rollback(checkpoint);
                return Err(err);
            }
        };
        if let Err(err) = self.registry.register_function(&def.name, signature.clone()) {
            self.module.rollback(checkpoint);
            return Err(err.at(&def.span));
        }
        let index = self.module.add_function(function);

        debug!(function = %def.name, index, %signature, "added function");
        self.functions.push(def);
        Ok(signature)
    }

    /// Lower and compile every function of a parsed module, in source order.
    /// Functions compiled before a failing one stay in the unit.
    pub fn compile_module(&mut self, module: &ast::Module) -> CompileResult<Vec<FunctionSignature>> {
        transform::module(module)?
            .into_iter()
            .map(|def| self.compile_function(def))
            .collect()
    }

    pub fn register_callback(&mut self, name: &str, signature: FunctionSignature) -> CompileResult<&CallbackSignature> {
        let callback = self.registry.register_callback(name, signature)?;
        debug!(callback = name, signature = %callback.source, "registered callback");
        Ok(callback)
    }

    pub fn registry(&self) -> &SignatureRegistry {
        &self.registry
    }

    pub fn module(&self) -> &ModuleBuilder {
        &self.module
    }

    /// Encoded module bytes; re-encoded only after the module changed.
    pub fn module_bytes(&mut self) -> Arc<[u8]> {
        self.module.bytes()
    }

    pub fn is_built(&self) -> bool {
        self.module.is_encoded()
    }

    pub fn functions(&self) -> &[FunctionDef] {
        &self.functions
    }

    /// Signature of a compiled function.
    pub fn signature(&self, name: &str) -> Option<&FunctionSignature> {
        self.registry.function(name)
    }

    /// Drop every function, callback and import.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.module.clear();
        self.functions.clear();
    }

    /// Typed IR, instruction listing and a hex dump of the encoded module.
    pub fn debug_dump(&mut self) -> String {
        let mut out = String::from(";; ── IR ──\n");
        for def in &self.functions {
            let _ = writeln!(out, "{}", def);
        }
        out.push_str(";; ── Module ──\n");
        out.push_str(&self.module.listing());
        out.push_str(";; ── Bytes ──\n");
        out.push_str(&hex_dump(&self.module.bytes()));
        out
    }
}

/// Classic 16-bytes-per-row hex dump with offsets.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let _ = write!(out, "{:08x}:", row * 16);
        for byte in chunk {
            let _ = write!(out, " {:02x}", byte);
        }
        out.push('\n');
    }
    out
}
