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

use wasm::{CompilationUnit, FunctionSignature, SemanticType};

use crate::callbacks::{Callback, Callbacks};
use crate::error::RuntimeError;
use crate::host::HostRuntime;
use crate::value::Value;
use crate::wasmtime_runtime::{OutputSink, RuntimeConfig, WasmtimeRuntime};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn compile(source: &str) -> Arc<[u8]> {
    let module = parser::parse_source(source).expect("source should parse");
    let mut unit = CompilationUnit::new();
    unit.compile_module(&module).expect("compilation should succeed");
    unit.module_bytes()
}

fn capturing_runtime(config: RuntimeConfig) -> (WasmtimeRuntime, Arc<Mutex<Vec<u8>>>) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let sink: OutputSink = buffer.clone();
    let runtime = WasmtimeRuntime::with_output(config, sink).expect("engine should build");
    (runtime, buffer)
}

fn captured(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8(buffer.lock().expect("buffer lock").clone()).expect("utf-8 output")
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn test_call_returns_raw_i32() {
    let bytes = compile("def add(a: int, b: int) -> int:\n    return a + b\n");
    let (mut runtime, _) = capturing_runtime(RuntimeConfig::default());
    runtime.instantiate(&bytes, &Callbacks::new()).expect("instantiation");
    assert_eq!(
        runtime.call("add", &[Value::Int(114), Value::Int(514)]).expect("call"),
        Some(Value::Int(628))
    );
}

#[test]
fn test_call_before_instantiate_fails() {
    let (mut runtime, _) = capturing_runtime(RuntimeConfig::default());
    let err = runtime.call("add", &[]).expect_err("nothing instantiated");
    assert!(matches!(err, RuntimeError::NotInstantiated), "got {:?}", err);
}

#[test]
fn test_missing_export() {
    let bytes = compile("def one() -> int:\n    return 1\n");
    let (mut runtime, _) = capturing_runtime(RuntimeConfig::default());
    runtime.instantiate(&bytes, &Callbacks::new()).expect("instantiation");
    let err = runtime.call("two", &[]).expect_err("no such export");
    assert!(matches!(err, RuntimeError::ExportNotFound(ref n) if n == "two"), "got {:?}", err);
}

#[test]
fn test_print_writes_python_style_lines() {
    let bytes = compile(
        "def show(n: int, x: float) -> None:\n    print(n)\n    print(x)\n    print(float(n))\n    print(n > 0)\n",
    );
    let (mut runtime, buffer) = capturing_runtime(RuntimeConfig::default());
    runtime.instantiate(&bytes, &Callbacks::new()).expect("instantiation");
    runtime.call("show", &[Value::Int(3), Value::Float(1.5)]).expect("call");
    assert_eq!(captured(&buffer), "3\n1.5\n3.0\nTrue\n");
}

#[test]
fn test_callback_receives_typed_arguments() {
    let mut unit = CompilationUnit::new();
    let signature = FunctionSignature::new(vec![SemanticType::Bool, SemanticType::Float], SemanticType::Int);
    unit.register_callback("pick", signature.clone()).expect("callback registration");
    let module = parser::parse_source("def f(x: float) -> int:\n    return pick(x > 0.0, x)\n").expect("parse");
    unit.compile_module(&module).expect("compilation should succeed");

    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let mut callbacks = Callbacks::new();
    callbacks.insert(
        "pick",
        Callback {
            signature,
            func: Arc::new(move |args: &[Value]| {
                log.lock().expect("log lock").extend_from_slice(args);
                Some(Value::Int(7))
            }),
        },
    );

    let (mut runtime, _) = capturing_runtime(RuntimeConfig::default());
    runtime.instantiate(&unit.module_bytes(), &callbacks).expect("instantiation");
    assert_eq!(runtime.call("f", &[Value::Float(2.5)]).expect("call"), Some(Value::Int(7)));
    assert_eq!(*seen.lock().expect("log lock"), vec![Value::Bool(true), Value::Float(2.5)]);
}

#[test]
fn test_fuel_exhaustion_traps() {
    let bytes = compile("def spin() -> None:\n    while True:\n        pass\n");
    let config = RuntimeConfig {
        fuel: Some(10_000),
        max_wasm_stack: None,
    };
    let (mut runtime, _) = capturing_runtime(config);
    runtime.instantiate(&bytes, &Callbacks::new()).expect("instantiation");
    let err = runtime.call("spin", &[]).expect_err("fuel should run out");
    assert!(matches!(err, RuntimeError::Wasm(_)), "got {:?}", err);
}

#[test]
fn test_division_by_zero_traps() {
    let bytes = compile("def div(a: int, b: int) -> int:\n    return a / b\n");
    let (mut runtime, _) = capturing_runtime(RuntimeConfig::default());
    runtime.instantiate(&bytes, &Callbacks::new()).expect("instantiation");
    let err = runtime.call("div", &[Value::Int(1), Value::Int(0)]).expect_err("integer divide by zero");
    assert!(matches!(err, RuntimeError::Wasm(_)), "got {:?}", err);
}
