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

use parser::ParseError;
use thiserror::Error;
use wasm::{CompileError, SemanticType};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("module does not export '{0}'")]
    ExportNotFound(String),

    #[error("no module has been instantiated")]
    NotInstantiated,

    #[error("{name}() takes {expected} argument(s) but {actual} were given")]
    ArgumentCount {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("argument {position} of {name}() must be {expected}, got {actual}")]
    ArgumentType {
        name: String,
        position: usize,
        expected: SemanticType,
        actual: SemanticType,
    },

    #[error("{name}() returned an unexpected result: {detail}")]
    Result { name: String, detail: String },

    /// Compilation, instantiation or a trap inside the engine.
    #[error("wasm: {0:#}")]
    Wasm(#[from] anyhow::Error),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
