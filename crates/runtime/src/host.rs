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

use crate::callbacks::Callbacks;
use crate::error::RuntimeResult;
use crate::value::Value;

/// The engine a [`Session`](crate::Session) executes modules on.
///
/// `instantiate` replaces any previous instance. `call` returns the raw
/// result: `i32` results come back as [`Value::Int`] and are reinterpreted
/// by the caller, which knows the source-level return type.
pub trait HostRuntime {
    fn instantiate(&mut self, bytes: &[u8], callbacks: &Callbacks) -> RuntimeResult<()>;

    fn call(&mut self, name: &str, args: &[Value]) -> RuntimeResult<Option<Value>>;
}
