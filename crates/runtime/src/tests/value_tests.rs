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

use wasm::SemanticType;
use wasmtime::Val;

use crate::value::Value;

#[test]
fn test_python_style_rendering() {
    assert_eq!(Value::Int(-7).to_string(), "-7");
    assert_eq!(Value::Bool(true).to_string(), "True");
    assert_eq!(Value::Bool(false).to_string(), "False");
    assert_eq!(Value::Float(2.0).to_string(), "2.0");
    assert_eq!(Value::Float(1.5).to_string(), "1.5");
    assert_eq!(Value::Float(-0.25).to_string(), "-0.25");
    assert_eq!(Value::Float(f64::INFINITY).to_string(), "inf");
    assert_eq!(Value::Float(f64::NAN).to_string(), "nan");
    assert_eq!(Value::Float(-0.0).to_string(), "-0.0");
}

#[test]
fn test_large_and_small_floats_use_exponent_form() {
    assert_eq!(Value::Float(1e16).to_string(), "1e+16");
    assert_eq!(Value::Float(-2.5e20).to_string(), "-2.5e+20");
    assert_eq!(Value::Float(1.5e300).to_string(), "1.5e+300");
    assert_eq!(Value::Float(1e-5).to_string(), "1e-05");
    assert_eq!(Value::Float(1.25e-7).to_string(), "1.25e-07");
    // boundaries stay positional
    assert_eq!(Value::Float(9999999999999998.0).to_string(), "9999999999999998.0");
    assert_eq!(Value::Float(0.0001).to_string(), "0.0001");
    assert_eq!(Value::Float(123456.789).to_string(), "123456.789");
}

#[test]
fn test_engine_value_conversion() {
    assert!(matches!(Value::Bool(true).to_val(), Val::I32(1)));
    assert!(matches!(Value::Float(0.5).to_val(), Val::F64(bits) if bits == 0.5f64.to_bits()));
    assert_eq!(Value::from_val(&Val::I32(3), SemanticType::Bool), Some(Value::Bool(true)));
    assert_eq!(Value::from_val(&Val::I32(3), SemanticType::Int), Some(Value::Int(3)));
    assert_eq!(Value::from_val(&Val::I32(3), SemanticType::Float), None);
}

#[test]
fn test_coerce_only_across_shared_representation() {
    assert_eq!(Value::Int(0).coerce(SemanticType::Bool), Some(Value::Bool(false)));
    assert_eq!(Value::Bool(true).coerce(SemanticType::Int), Some(Value::Int(1)));
    assert_eq!(Value::Float(1.0).coerce(SemanticType::Float), Some(Value::Float(1.0)));
    assert_eq!(Value::Float(1.0).coerce(SemanticType::Int), None);
    assert_eq!(Value::Int(1).coerce(SemanticType::None), None);
}

#[test]
fn test_parse_literals() {
    assert_eq!(Value::parse("42", SemanticType::Int), Some(Value::Int(42)));
    assert_eq!(Value::parse("-1.25", SemanticType::Float), Some(Value::Float(-1.25)));
    assert_eq!(Value::parse("True", SemanticType::Bool), Some(Value::Bool(true)));
    assert_eq!(Value::parse("1.5", SemanticType::Int), None);
    assert_eq!(Value::parse("yes", SemanticType::Bool), None);
}
