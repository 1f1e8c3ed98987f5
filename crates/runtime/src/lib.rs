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

//! Execution of compiled modules through a pluggable host runtime.
//!
//! A [`Session`] owns a compilation unit, the host callbacks and a
//! [`HostRuntime`]. Functions can be defined incrementally and called by
//! name; the module is rebuilt and re-instantiated only when it changed.

pub mod callbacks;
pub mod error;
pub mod host;
pub mod session;
pub mod value;
pub mod wasmtime_runtime;

#[cfg(test)]
mod tests;

pub use callbacks::{Callback, Callbacks, HostFn};
pub use error::{RuntimeError, RuntimeResult};
pub use host::HostRuntime;
pub use session::{Session, SharedSession};
pub use value::Value;
pub use wasmtime_runtime::{OutputSink, RuntimeConfig, WasmtimeRuntime};
