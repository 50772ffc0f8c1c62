// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rand::rngs::StdRng;

use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::study::StudyContext;
use crate::types::deck::DeckFile;

#[derive(Clone)]
pub struct ServerState {
    pub port: u16,
    pub sample: Arc<DeckFile>,
    pub mutable: Arc<Mutex<MutableState>>,
}

pub struct MutableState {
    pub db: Database,
    pub context: StudyContext,
    pub rng: StdRng,
}

impl ServerState {
    pub fn lock(&self) -> Fallible<MutexGuard<'_, MutableState>> {
        self.mutable
            .lock()
            .map_err(|_| ErrorReport::new("server state lock poisoned."))
    }
}
