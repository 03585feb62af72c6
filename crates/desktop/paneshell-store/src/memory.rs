// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{err::Result, layout::LayoutBackend};

/// Process-local backend. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    cells: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Current text stored under `key`.
    pub fn snapshot(&self, key: &str) -> Option<String> { self.cells.read().get(key).cloned() }

    pub fn len(&self) -> usize { self.cells.read().len() }

    pub fn is_empty(&self) -> bool { self.cells.read().is_empty() }
}

#[async_trait]
impl LayoutBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<String>> { Ok(self.snapshot(key)) }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        self.cells.write().insert(key.to_owned(), value);
        Ok(())
    }
}
