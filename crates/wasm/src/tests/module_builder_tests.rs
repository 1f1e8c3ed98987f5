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

use std::sync::Arc;

use wasm_encoder::{
    BlockType, CodeSection, EntityType, ExportKind, ExportSection, Function, FunctionSection,
    Ieee64, ImportSection, Instruction as Op, Module, TypeSection, ValType,
};
use wasmparser::{Parser, Payload, Validator};

use crate::functions::LocalSlot;
use crate::instruction::{CallTarget, Instruction};
use crate::module_builder::{DefinedFunction, ModuleBuilder};
use crate::types::{FuncType, SemanticType, ValueType};

// ─── Helper builders ──────────────────────────────────────────────────────────

fn slot(name: &str, ty: SemanticType) -> LocalSlot {
    LocalSlot {
        name: Some(name.to_string()),
        ty,
    }
}

/// `def add(a: int, b: int) -> int: return a + b`, hand-assembled.
fn add_function() -> DefinedFunction {
    DefinedFunction {
        name: "add".to_string(),
        ty: FuncType::new(vec![ValueType::I32, ValueType::I32], vec![ValueType::I32]),
        param_count: 2,
        locals: vec![slot("a", SemanticType::Int), slot("b", SemanticType::Int)],
        body: vec![
            Instruction::LocalGet(0),
            Instruction::LocalGet(1),
            Instruction::I32Add,
            Instruction::End,
        ],
        export: true,
    }
}

fn validate(bytes: &[u8]) {
    Validator::new()
        .validate_all(bytes)
        .expect("WASM validation should succeed");
}

fn type_count(bytes: &[u8]) -> u32 {
    for payload in Parser::new(0).parse_all(bytes) {
        if let Payload::TypeSection(reader) = payload.expect("module should parse") {
            return reader.count();
        }
    }
    0
}

// ─── Encoding ─────────────────────────────────────────────────────────────────

#[test]
fn test_empty_module_is_header_only() {
    let builder = ModuleBuilder::new();
    let bytes = builder.encode();
    assert_eq!(&bytes[0..4], b"\0asm");
    assert_eq!(&bytes[4..8], &[0x01, 0x00, 0x00, 0x00]);
    assert_eq!(bytes.len(), 8);
    validate(&bytes);
}

#[test]
fn test_add_module_matches_reference_encoder() {
    let mut builder = ModuleBuilder::new();
    builder.add_function(add_function());
    let ours = builder.encode();

    let mut types = TypeSection::new();
    types.ty().function(vec![ValType::I32, ValType::I32], vec![ValType::I32]);
    let mut functions = FunctionSection::new();
    functions.function(0);
    let mut exports = ExportSection::new();
    exports.export("add", ExportKind::Func, 0);
    let mut code = CodeSection::new();
    let mut body = Function::new(vec![]);
    body.instruction(&Op::LocalGet(0));
    body.instruction(&Op::LocalGet(1));
    body.instruction(&Op::I32Add);
    body.instruction(&Op::End);
    code.function(&body);

    let mut module = Module::new();
    module.section(&types);
    module.section(&functions);
    module.section(&exports);
    module.section(&code);

    assert_eq!(ours, module.finish());
    validate(&ours);
}

#[test]
fn test_imports_precede_functions_in_index_space() {
    let mut builder = ModuleBuilder::new();
    let print_ty = FuncType::new(vec![ValueType::I32], vec![]);

    // caller is added before the import it uses
    let caller = DefinedFunction {
        name: "caller".to_string(),
        ty: FuncType::new(vec![], vec![]),
        param_count: 0,
        locals: vec![],
        body: vec![
            Instruction::I32Const(7),
            Instruction::Call(CallTarget::Import(0)),
            Instruction::I32Const(1),
            Instruction::I32Const(2),
            Instruction::Call(CallTarget::Function(1)),
            Instruction::Drop,
            Instruction::End,
        ],
        export: true,
    };
    builder.add_function(caller);
    builder.add_function(add_function());
    assert_eq!(builder.add_import("js", "print_int", print_ty.clone()), 0);

    let ours = builder.encode();
    validate(&ours);

    let mut types = TypeSection::new();
    types.ty().function(vec![ValType::I32], vec![]);
    types.ty().function(vec![], vec![]);
    types.ty().function(vec![ValType::I32, ValType::I32], vec![ValType::I32]);
    let mut imports = ImportSection::new();
    imports.import("js", "print_int", EntityType::Function(0));
    let mut functions = FunctionSection::new();
    functions.function(1);
    functions.function(2);
    let mut exports = ExportSection::new();
    exports.export("caller", ExportKind::Func, 1);
    exports.export("add", ExportKind::Func, 2);
    let mut code = CodeSection::new();
    let mut caller = Function::new(vec![]);
    caller.instruction(&Op::I32Const(7));
    caller.instruction(&Op::Call(0));
    caller.instruction(&Op::I32Const(1));
    caller.instruction(&Op::I32Const(2));
    caller.instruction(&Op::Call(2));
    caller.instruction(&Op::Drop);
    caller.instruction(&Op::End);
    code.function(&caller);
    let mut add = Function::new(vec![]);
    add.instruction(&Op::LocalGet(0));
    add.instruction(&Op::LocalGet(1));
    add.instruction(&Op::I32Add);
    add.instruction(&Op::End);
    code.function(&add);

    let mut module = Module::new();
    module.section(&types);
    module.section(&imports);
    module.section(&functions);
    module.section(&exports);
    module.section(&code);
    assert_eq!(ours, module.finish());
}

#[test]
fn test_lowering_resolves_calls_and_keeps_blocks_empty() {
    assert!(matches!(Instruction::Call(CallTarget::Import(2)).lower(3), Op::Call(2)));
    assert!(matches!(Instruction::Call(CallTarget::Function(1)).lower(3), Op::Call(4)));
    assert!(matches!(Instruction::Loop.lower(0), Op::Loop(BlockType::Empty)));
    assert!(matches!(Instruction::If.lower(0), Op::If(BlockType::Empty)));
    assert!(matches!(
        Instruction::F64Const(-0.5).lower(0),
        Op::F64Const(bits) if bits == Ieee64::from(-0.5)
    ));
}

#[test]
fn test_identical_function_types_share_one_entry() {
    let mut builder = ModuleBuilder::new();
    builder.add_function(add_function());
    let mut sub = add_function();
    sub.name = "sub".to_string();
    sub.body[2] = Instruction::I32Sub;
    builder.add_function(sub);

    let bytes = builder.encode();
    validate(&bytes);
    assert_eq!(type_count(&bytes), 1);
}

#[test]
fn test_add_import_deduplicates() {
    let mut builder = ModuleBuilder::new();
    let ty = FuncType::new(vec![ValueType::F64], vec![]);
    let first = builder.add_import("js", "print_float", ty.clone());
    let second = builder.add_import("js", "print_float", ty);
    assert_eq!(first, second);
    assert_eq!(builder.imports().len(), 1);
}

#[test]
fn test_local_groups_are_run_length_encoded() {
    let mut function = add_function();
    function.locals.extend([
        slot("x", SemanticType::Int),
        slot("y", SemanticType::Bool),
        slot("z", SemanticType::Float),
        slot("w", SemanticType::Int),
    ]);
    assert_eq!(
        function.local_groups(),
        vec![(2, ValType::I32), (1, ValType::F64), (1, ValType::I32)]
    );
}

// ─── Memoization and rollback ─────────────────────────────────────────────────

#[test]
fn test_bytes_are_memoized_until_change() {
    let mut builder = ModuleBuilder::new();
    builder.add_function(add_function());
    let first = builder.bytes();
    let second = builder.bytes();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(builder.is_encoded());

    builder.add_import("js", "print_bool", FuncType::new(vec![ValueType::I32], vec![]));
    assert!(!builder.is_encoded());
    let third = builder.bytes();
    assert!(!Arc::ptr_eq(&first, &third));
    validate(&third);
}

#[test]
fn test_rollback_restores_checkpoint() {
    let mut builder = ModuleBuilder::new();
    builder.add_function(add_function());
    let before = builder.encode();

    let checkpoint = builder.checkpoint();
    builder.add_import("callback", "log", FuncType::new(vec![ValueType::I32], vec![]));
    let mut other = add_function();
    other.name = "other".to_string();
    builder.add_function(other);
    builder.rollback(checkpoint);

    assert_eq!(builder.encode(), before);
    assert_eq!(builder.function_index("other"), None);
}

#[test]
fn test_listing_shows_symbolic_calls() {
    let mut builder = ModuleBuilder::new();
    builder.add_import("js", "print_int", FuncType::new(vec![ValueType::I32], vec![]));
    builder.add_function(DefinedFunction {
        name: "show".to_string(),
        ty: FuncType::new(vec![], vec![]),
        param_count: 0,
        locals: vec![],
        body: vec![
            Instruction::I32Const(1),
            Instruction::Call(CallTarget::Import(0)),
            Instruction::End,
        ],
        export: true,
    });
    let listing = builder.listing();
    assert!(listing.contains("(import 0 \"js\" \"print_int\""));
    assert!(listing.contains("call import:0"));
    assert!(listing.contains("$show"));
}
