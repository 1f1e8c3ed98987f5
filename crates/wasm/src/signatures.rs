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

//! Signatures of compiled functions and registered host callbacks.

use std::collections::HashMap;

use crate::error::{CompileError, CompileResult};
use crate::types::{FuncType, FunctionSignature, SemanticType};

/// Import module of the scalar print functions.
pub const PRINT_MODULE: &str = "js";
/// Import module of user-registered host callbacks.
pub const CALLBACK_MODULE: &str = "callback";

/// Names no callback or compiled function may take.
pub const RESERVED_NAMES: &[&str] = &[
    "print",
    "print_int",
    "print_float",
    "print_bool",
    "int",
    "float",
    "bool",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Field name of the print import for a value of type `ty`.
pub fn print_field(ty: SemanticType) -> Option<&'static str> {
    match ty {
        SemanticType::Int => Some("print_int"),
        SemanticType::Float => Some("print_float"),
        SemanticType::Bool => Some("print_bool"),
        SemanticType::None => None,
    }
}

/// A host callback's source-level signature and the binary one derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackSignature {
    pub source: FunctionSignature,
    pub target: FuncType,
}

/// What a call by name resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Callee<'a> {
    Function(&'a FunctionSignature),
    Callback(&'a CallbackSignature),
}

impl<'a> Callee<'a> {
    pub fn signature(&self) -> &'a FunctionSignature {
        match *self {
            Callee::Function(sig) => sig,
            Callee::Callback(cb) => &cb.source,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    functions: HashMap<String, FunctionSignature>,
    callbacks: HashMap<String, CallbackSignature>,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a compiled function. Signatures are immutable once recorded.
    pub fn register_function(&mut self, name: &str, signature: FunctionSignature) -> CompileResult<()> {
        if is_reserved(name) {
            return Err(CompileError::name_error(format!(
                "'{}' is a reserved name and cannot be defined",
                name
            )));
        }
        if self.functions.contains_key(name) {
            return Err(CompileError::name_error(format!(
                "function '{}' is already defined",
                name
            )));
        }
        self.functions.insert(name.to_string(), signature);
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.get(name)
    }

    pub fn contains_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Record a host callback. Parameters must be `int`, `float` or `bool`;
    /// the result may also be `None`.
    pub fn register_callback(
        &mut self,
        name: &str,
        source: FunctionSignature,
    ) -> CompileResult<&CallbackSignature> {
        if is_reserved(name) {
            return Err(CompileError::name_error(format!(
                "'{}' is reserved and cannot be registered as a callback",
                name
            )));
        }
        if self.callbacks.contains_key(name) {
            return Err(CompileError::name_error(format!(
                "callback '{}' is already registered",
                name
            )));
        }
        if let Some(pos) = source.params.iter().position(|p| !p.is_scalar()) {
            return Err(CompileError::signature_error(format!(
                "callback '{}': parameter {} must be int, float or bool, got {}",
                name, pos, source.params[pos]
            )));
        }
        let target = source.func_type();
        let entry = self
            .callbacks
            .entry(name.to_string())
            .or_insert(CallbackSignature { source, target });
        Ok(entry)
    }

    /// Compiled functions first, then callbacks.
    pub fn resolve(&self, name: &str) -> Option<Callee<'_>> {
        if let Some(sig) = self.functions.get(name) {
            return Some(Callee::Function(sig));
        }
        self.callbacks.get(name).map(Callee::Callback)
    }

    pub fn clear(&mut self) {
        self.functions.clear();
        self.callbacks.clear();
    }
}
