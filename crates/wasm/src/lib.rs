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

//! Static compiler from typed Python functions to WebAssembly.
//!
//! Pipeline: [`transform`] lowers the AST to the typed [`ir`], the
//! [`type_checker`] resolves types, the [`compiler`] lowers each function
//! to instructions, and the [`module_builder`] encodes the binary module.

pub mod compiler;
pub mod encoding;
pub mod error;
pub mod functions;
pub mod instruction;
pub mod ir;
pub mod module_builder;
pub mod signatures;
pub mod transform;
pub mod type_checker;
pub mod types;
pub mod unit;

#[cfg(test)]
mod tests;

pub use error::{CompileError, CompileResult};
pub use module_builder::ModuleBuilder;
pub use signatures::SignatureRegistry;
pub use types::{FuncType, FunctionSignature, SemanticType, ValueType};
pub use unit::CompilationUnit;

use ast::Module;

/// Compile a parsed AST module to WASM bytecode.
///
/// Every top-level function is type checked, compiled and exported under its
/// own name. Returns the first error encountered.
pub fn compile(module: &Module) -> CompileResult<Vec<u8>> {
    let mut unit = CompilationUnit::new();
    unit.compile_module(module)?;
    Ok(unit.module_bytes().to_vec())
}
