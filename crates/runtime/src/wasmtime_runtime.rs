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

//! [`HostRuntime`] backed by wasmtime.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail};
use tracing::debug;
use wasm::signatures::{CALLBACK_MODULE, PRINT_MODULE};
use wasm::{SemanticType, ValueType};
use wasmtime::{Config, Engine, FuncType, Instance, Linker, Module, Store, Val, ValType};

use crate::callbacks::{Callback, Callbacks};
use crate::error::{RuntimeError, RuntimeResult};
use crate::host::HostRuntime;
use crate::value::Value;

/// Where `print` writes. Each printed value is followed by a newline.
pub type OutputSink = Arc<Mutex<dyn Write + Send>>;

/// Engine bounds. `None` keeps the wasmtime default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Fuel granted to every call; exhausting it traps.
    pub fuel: Option<u64>,
    pub max_wasm_stack: Option<usize>,
}

pub struct WasmtimeRuntime {
    engine: Engine,
    config: RuntimeConfig,
    output: OutputSink,
    store: Store<()>,
    instance: Option<Instance>,
}

impl WasmtimeRuntime {
    /// A runtime printing to stdout.
    pub fn new(config: RuntimeConfig) -> RuntimeResult<Self> {
        Self::with_output(config, Arc::new(Mutex::new(io::stdout())))
    }

    pub fn with_output(config: RuntimeConfig, output: OutputSink) -> RuntimeResult<Self> {
        let mut engine_config = Config::new();
        if config.fuel.is_some() {
            engine_config.consume_fuel(true);
        }
        if let Some(stack) = config.max_wasm_stack {
            engine_config.max_wasm_stack(stack);
        }
        let engine = Engine::new(&engine_config)?;
        let store = Store::new(&engine, ());
        Ok(Self {
            engine,
            config,
            output,
            store,
            instance: None,
        })
    }

    fn define_print(&self, linker: &mut Linker<()>) -> anyhow::Result<()> {
        let out = Arc::clone(&self.output);
        linker.func_wrap(PRINT_MODULE, "print_int", move |v: i32| emit(&out, Value::Int(v)))?;
        let out = Arc::clone(&self.output);
        linker.func_wrap(PRINT_MODULE, "print_float", move |v: f64| emit(&out, Value::Float(v)))?;
        let out = Arc::clone(&self.output);
        linker.func_wrap(PRINT_MODULE, "print_bool", move |v: i32| emit(&out, Value::Bool(v != 0)))?;
        Ok(())
    }

    fn define_callback(linker: &mut Linker<()>, name: &str, callback: &Callback) -> anyhow::Result<()> {
        let target = callback.signature.func_type();
        let ty = FuncType::new(
            target.params.iter().map(|vt| val_type(*vt)),
            target.results.iter().map(|vt| val_type(*vt)),
        );
        let signature = callback.signature.clone();
        let func = Arc::clone(&callback.func);
        let callee = name.to_string();
        linker.func_new(CALLBACK_MODULE, name, ty, move |_caller, params, results| {
            let args = params
                .iter()
                .zip(&signature.params)
                .map(|(val, ty)| {
                    Value::from_val(val, *ty)
                        .ok_or_else(|| anyhow!("callback '{}': argument does not match {}", callee, ty))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            match (func(&args), signature.ret) {
                (None, SemanticType::None) => Ok(()),
                (Some(value), ret) if ret != SemanticType::None => {
                    let value = value.coerce(ret).ok_or_else(|| {
                        anyhow!("callback '{}' returned {} but is declared to return {}", callee, value, ret)
                    })?;
                    results[0] = value.to_val();
                    Ok(())
                }
                (Some(value), _) => bail!("callback '{}' returned {} but is declared to return None", callee, value),
                (None, ret) => bail!("callback '{}' returned nothing but is declared to return {}", callee, ret),
            }
        })?;
        Ok(())
    }
}

impl HostRuntime for WasmtimeRuntime {
    fn instantiate(&mut self, bytes: &[u8], callbacks: &Callbacks) -> RuntimeResult<()> {
        let module = Module::new(&self.engine, bytes)?;

        let mut linker = Linker::new(&self.engine);
        self.define_print(&mut linker)?;
        for (name, callback) in callbacks.iter() {
            Self::define_callback(&mut linker, name, callback)?;
        }

        // A fresh store drops every previous instance.
        let mut store = Store::new(&self.engine, ());
        if let Some(fuel) = self.config.fuel {
            store.set_fuel(fuel)?;
        }
        let instance = linker.instantiate(&mut store, &module)?;
        self.store = store;
        self.instance = Some(instance);
        debug!(size = bytes.len(), callbacks = callbacks.len(), "instantiated module");
        Ok(())
    }

    fn call(&mut self, name: &str, args: &[Value]) -> RuntimeResult<Option<Value>> {
        let instance = self.instance.ok_or(RuntimeError::NotInstantiated)?;
        let func = instance
            .get_func(&mut self.store, name)
            .ok_or_else(|| RuntimeError::ExportNotFound(name.to_string()))?;

        if let Some(fuel) = self.config.fuel {
            self.store.set_fuel(fuel)?;
        }

        let params: Vec<Val> = args.iter().map(|v| v.to_val()).collect();
        let mut results: Vec<Val> = func
            .ty(&self.store)
            .results()
            .map(|ty| match ty {
                ValType::F64 => Val::F64(0),
                _ => Val::I32(0),
            })
            .collect();
        func.call(&mut self.store, &params, &mut results)?;

        Ok(results.first().and_then(|val| match val {
            Val::I32(v) => Some(Value::Int(*v)),
            Val::F64(bits) => Some(Value::Float(f64::from_bits(*bits))),
            _ => None,
        }))
    }
}

fn val_type(vt: ValueType) -> ValType {
    match vt {
        ValueType::I32 => ValType::I32,
        ValueType::F64 => ValType::F64,
    }
}

fn emit(out: &OutputSink, value: Value) -> anyhow::Result<()> {
    let mut sink = out.lock().map_err(|_| anyhow!("output sink lock poisoned"))?;
    writeln!(sink, "{}", value)?;
    Ok(())
}
