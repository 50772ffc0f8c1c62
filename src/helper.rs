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

use std::fs::write;

use tempfile::TempDir;
use tempfile::tempdir;

use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::deck::DeckFile;

/// A fresh database in a temporary directory. The directory is deleted when
/// the returned handle is dropped.
pub fn open_test_database() -> Fallible<(TempDir, Database)> {
    let dir = tempdir()?;
    let path = dir.path().join("factflare.db");
    let path = path
        .to_str()
        .ok_or_else(|| ErrorReport::new("invalid path"))?;
    let db = Database::new(path)?;
    Ok((dir, db))
}

pub fn test_deck() -> DeckFile {
    DeckFile {
        deck_name: "Test Deck".to_string(),
        facts: vec![
            "Water boils at 100 degrees Celsius at sea level.".to_string(),
            "Light from the Sun takes about eight minutes to reach Earth.".to_string(),
            "Octopuses have three hearts.".to_string(),
            "Honey never spoils.".to_string(),
            "Bananas are berries.".to_string(),
            "Venus spins backwards.".to_string(),
            "Sharks predate trees.".to_string(),
        ],
    }
}

/// A temporary collection directory holding `test_deck` as a JSON file.
pub fn create_test_collection() -> Fallible<TempDir> {
    let dir = tempdir()?;
    let json = serde_json::to_string_pretty(&test_deck())?;
    write(dir.path().join("test_deck.json"), json)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_collection() -> Fallible<()> {
        let dir = create_test_collection()?;
        assert!(dir.path().join("test_deck.json").exists());
        Ok(())
    }
}
