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

use std::sync::{Arc, Mutex};

use tracing::debug;
use wasm::ir::FunctionDef;
use wasm::{CompilationUnit, FunctionSignature, SemanticType};

use crate::callbacks::{Callback, Callbacks};
use crate::error::{RuntimeError, RuntimeResult};
use crate::host::HostRuntime;
use crate::value::Value;
use crate::wasmtime_runtime::{RuntimeConfig, WasmtimeRuntime};

/// A session behind a mutex, for embedders sharing it across threads.
pub type SharedSession<R = WasmtimeRuntime> = Arc<Mutex<Session<R>>>;

/// Incrementally compiled functions plus the runtime executing them.
///
/// The module is encoded and instantiated on the first call after a change;
/// until the next change both are reused.
pub struct Session<R: HostRuntime = WasmtimeRuntime> {
    unit: CompilationUnit,
    callbacks: Callbacks,
    runtime: R,
    /// Bytes of the module currently instantiated in `runtime`
    instantiated: Option<Arc<[u8]>>,
}

impl Session<WasmtimeRuntime> {
    pub fn new() -> RuntimeResult<Self> {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> RuntimeResult<Self> {
        Ok(Self::with_runtime(WasmtimeRuntime::new(config)?))
    }
}

impl<R: HostRuntime> Session<R> {
    pub fn with_runtime(runtime: R) -> Self {
        Self {
            unit: CompilationUnit::new(),
            callbacks: Callbacks::new(),
            runtime,
            instantiated: None,
        }
    }

    pub fn into_shared(self) -> SharedSession<R> {
        Arc::new(Mutex::new(self))
    }

    /// Parse `source` and compile every top-level function in it.
    pub fn define(&mut self, source: &str) -> RuntimeResult<Vec<FunctionSignature>> {
        let module = parser::parse_source(source)?;
        self.define_module(&module)
    }

    pub fn define_module(&mut self, module: &ast::Module) -> RuntimeResult<Vec<FunctionSignature>> {
        Ok(self.unit.compile_module(module)?)
    }

    /// Compile an already lowered function.
    pub fn define_function(&mut self, def: FunctionDef) -> RuntimeResult<FunctionSignature> {
        Ok(self.unit.compile_function(def)?)
    }

    /// Make a host function callable from compiled code under `name`.
    pub fn register_callback<F>(&mut self, name: &str, signature: FunctionSignature, func: F) -> RuntimeResult<()>
    where
        F: Fn(&[Value]) -> Option<Value> + Send + Sync + 'static,
    {
        self.unit.register_callback(name, signature.clone())?;
        self.callbacks.insert(
            name,
            Callback {
                signature,
                func: Arc::new(func),
            },
        );
        Ok(())
    }

    pub fn signature(&self, name: &str) -> Option<&FunctionSignature> {
        self.unit.signature(name)
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn unit(&self) -> &CompilationUnit {
        &self.unit
    }

    pub fn module_bytes(&mut self) -> Arc<[u8]> {
        self.unit.module_bytes()
    }

    pub fn debug_dump(&mut self) -> String {
        self.unit.debug_dump()
    }

    /// Call a compiled function. Arguments are checked against its signature
    /// before anything reaches the runtime.
    pub fn call(&mut self, name: &str, args: &[Value]) -> RuntimeResult<Option<Value>> {
        let signature = self
            .unit
            .signature(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownFunction(name.to_string()))?;
        check_args(name, &signature, args)?;

        self.ensure_instantiated()?;
        let raw = self.runtime.call(name, args)?;

        match (raw, signature.ret) {
            (None, SemanticType::None) => Ok(None),
            (Some(value), ret) => value.coerce(ret).map(Some).ok_or_else(|| RuntimeError::Result {
                name: name.to_string(),
                detail: format!("got {} where {} was declared", value, ret),
            }),
            (None, ret) => Err(RuntimeError::Result {
                name: name.to_string(),
                detail: format!("no value where {} was declared", ret),
            }),
        }
    }

    fn ensure_instantiated(&mut self) -> RuntimeResult<()> {
        let bytes = self.unit.module_bytes();
        if let Some(current) = &self.instantiated {
            if Arc::ptr_eq(current, &bytes) {
                return Ok(());
            }
        }
        self.runtime.instantiate(&bytes, &self.callbacks)?;
        debug!(size = bytes.len(), "session module rebuilt");
        self.instantiated = Some(bytes);
        Ok(())
    }

    /// Forget every function and callback.
    pub fn reset(&mut self) {
        self.unit.reset();
        self.callbacks.clear();
        self.instantiated = None;
    }
}

fn check_args(name: &str, signature: &FunctionSignature, args: &[Value]) -> RuntimeResult<()> {
    if signature.params.len() != args.len() {
        return Err(RuntimeError::ArgumentCount {
            name: name.to_string(),
            expected: signature.params.len(),
            actual: args.len(),
        });
    }
    for (position, (arg, expected)) in args.iter().zip(&signature.params).enumerate() {
        if arg.semantic_type() != *expected {
            return Err(RuntimeError::ArgumentType {
                name: name.to_string(),
                position,
                expected: *expected,
                actual: arg.semantic_type(),
            });
        }
    }
    Ok(())
}
