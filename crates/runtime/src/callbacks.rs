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

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use wasm::FunctionSignature;

use crate::value::Value;

/// A host function callable from compiled code. Returns `None` for `-> None`.
pub type HostFn = Arc<dyn Fn(&[Value]) -> Option<Value> + Send + Sync>;

#[derive(Clone)]
pub struct Callback {
    pub signature: FunctionSignature,
    pub func: HostFn,
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Host callbacks by name, linked under the `callback` import module.
#[derive(Debug, Clone, Default)]
pub struct Callbacks {
    entries: BTreeMap<String, Callback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, callback: Callback) {
        self.entries.insert(name.into(), callback);
    }

    pub fn get(&self, name: &str) -> Option<&Callback> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Callback)> {
        self.entries.iter().map(|(name, cb)| (name.as_str(), cb))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
