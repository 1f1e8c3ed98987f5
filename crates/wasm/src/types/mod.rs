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

use ast::types::TypeHint;
use wasm_encoder::ValType;
use std::fmt;

/// The type domain tracked by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Python `int` → WASM `i32`
    Int,
    /// Python `float` → WASM `f64`
    Float,
    /// Python `bool` → WASM `i32` (0 or 1)
    Bool,
    /// Python `None` / void return → no WASM value
    None,
}

impl SemanticType {
    /// Convert a `TypeHint` from the AST into a `SemanticType`.
    /// Returns `None` for annotations outside the compiled subset (str, list, ...).
    pub fn from_type_hint(hint: &TypeHint) -> Option<SemanticType> {
        match hint {
            TypeHint::Int => Some(SemanticType::Int),
            TypeHint::Float => Some(SemanticType::Float),
            TypeHint::Bool => Some(SemanticType::Bool),
            TypeHint::None => Some(SemanticType::None),
            TypeHint::Str | TypeHint::Generic(..) | TypeHint::Custom(_) => None,
        }
    }

    /// The wire-level type a value of this type occupies. `None` for [`SemanticType::None`].
    pub fn value_type(self) -> Option<ValueType> {
        match self {
            SemanticType::Int | SemanticType::Bool => Some(ValueType::I32),
            SemanticType::Float => Some(ValueType::F64),
            SemanticType::None => None,
        }
    }

    /// Returns `true` for the arithmetic types (`int`, `float`).
    pub fn is_numeric(self) -> bool {
        matches!(self, SemanticType::Int | SemanticType::Float)
    }

    /// Returns `true` for the types a host callback may exchange.
    pub fn is_scalar(self) -> bool {
        self != SemanticType::None
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Int => write!(f, "int"),
            SemanticType::Float => write!(f, "float"),
            SemanticType::Bool => write!(f, "bool"),
            SemanticType::None => write!(f, "None"),
        }
    }
}

/// One of the two numeric value types the generated code uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    I32,
    F64,
}

impl ValueType {
    /// Convert to `wasm_encoder::ValType`.
    pub fn to_val_type(self) -> ValType {
        match self {
            ValueType::I32 => ValType::I32,
            ValueType::F64 => ValType::F64,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::I32 => write!(f, "i32"),
            ValueType::F64 => write!(f, "f64"),
        }
    }
}

/// Source-level signature: ordered parameter types and a return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    pub params: Vec<SemanticType>,
    pub ret: SemanticType,
}

impl FunctionSignature {
    pub fn new(params: Vec<SemanticType>, ret: SemanticType) -> Self {
        Self { params, ret }
    }

    /// The binary-level signature derived from this one.
    pub fn func_type(&self) -> FuncType {
        FuncType {
            params: self.params.iter().filter_map(|t| t.value_type()).collect(),
            results: self.ret.value_type().into_iter().collect(),
        }
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

/// Binary-level function type as it appears in the type section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuncType {
    pub params: Vec<ValueType>,
    pub results: Vec<ValueType>,
}

impl FuncType {
    pub fn new(params: Vec<ValueType>, results: Vec<ValueType>) -> Self {
        Self { params, results }
    }
}

impl fmt::Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(func")?;
        if !self.params.is_empty() {
            write!(f, " (param")?;
            for p in &self.params {
                write!(f, " {}", p)?;
            }
            write!(f, ")")?;
        }
        if !self.results.is_empty() {
            write!(f, " (result")?;
            for r in &self.results {
                write!(f, " {}", r)?;
            }
            write!(f, ")")?;
        }
        write!(f, ")")
    }
}
