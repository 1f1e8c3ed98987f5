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

use std::fmt;

use wasm::SemanticType;
use wasmtime::Val;

/// A value crossing the host boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f64),
    Bool(bool),
}

impl Value {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            Value::Int(_) => SemanticType::Int,
            Value::Float(_) => SemanticType::Float,
            Value::Bool(_) => SemanticType::Bool,
        }
    }

    pub fn to_val(self) -> Val {
        match self {
            Value::Int(v) => Val::I32(v),
            Value::Float(v) => Val::F64(v.to_bits()),
            Value::Bool(b) => Val::I32(b as i32),
        }
    }

    /// Read a raw engine value as `ty`. `bool` is any non-zero `i32`.
    pub fn from_val(val: &Val, ty: SemanticType) -> Option<Value> {
        match (val, ty) {
            (Val::I32(v), SemanticType::Int) => Some(Value::Int(*v)),
            (Val::I32(v), SemanticType::Bool) => Some(Value::Bool(*v != 0)),
            (Val::F64(bits), SemanticType::Float) => Some(Value::Float(f64::from_bits(*bits))),
            _ => None,
        }
    }

    /// Reinterpret a value as `ty` where the wire representation allows it.
    pub fn coerce(self, ty: SemanticType) -> Option<Value> {
        match (self, ty) {
            (Value::Int(v), SemanticType::Bool) => Some(Value::Bool(v != 0)),
            (Value::Bool(b), SemanticType::Int) => Some(Value::Int(b as i32)),
            (v, ty) if v.semantic_type() == ty => Some(v),
            _ => None,
        }
    }

    /// Parse a command-line literal as a value of type `ty`.
    pub fn parse(text: &str, ty: SemanticType) -> Option<Value> {
        match ty {
            SemanticType::Int => text.parse().ok().map(Value::Int),
            SemanticType::Float => text.parse().ok().map(Value::Float),
            SemanticType::Bool => match text {
                "True" | "true" | "1" => Some(Value::Bool(true)),
                "False" | "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            SemanticType::None => None,
        }
    }
}

/// Python-style rendering: `True`/`False`, integral floats keep a `.0`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Float(v) => write_float(f, v),
        }
    }
}

/// Shortest round-trip digits, switching to exponent form outside
/// `1e-4 <= |v| < 1e16` the way Python's `repr` does.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        return write!(f, "nan");
    }
    if v.is_infinite() {
        return write!(f, "{}", if v > 0.0 { "inf" } else { "-inf" });
    }
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        // `{:e}` yields e.g. `1.5e-7`; Python writes `1.5e-07`.
        let text = format!("{:e}", v);
        return match text.split_once('e').map(|(m, e)| (m, e.parse::<i32>())) {
            Some((mantissa, Ok(exp))) => {
                let sign = if exp < 0 { '-' } else { '+' };
                write!(f, "{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
            }
            _ => write!(f, "{}", text),
        };
    }
    if v.fract() == 0.0 {
        write!(f, "{:.1}", v)
    } else {
        write!(f, "{}", v)
    }
}
