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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::deck::DeckFile;

/// Validate deck files without importing them.
pub fn check_decks(path: &str) -> Fallible<()> {
    let files = deck_files(Path::new(path))?;
    for file in &files {
        read_deck_file(file)?;
    }
    println!("ok");
    Ok(())
}

/// The deck files at `path`: the file itself, or every `.json` file under
/// the directory, sorted.
pub fn deck_files(path: &Path) -> Fallible<Vec<PathBuf>> {
    if !path.exists() {
        return fail("path does not exist.");
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    if files.is_empty() {
        return fail("no deck files found.");
    }
    files.sort();
    Ok(files)
}

pub fn read_deck_file(path: &Path) -> Fallible<DeckFile> {
    let text = read_to_string(path)?;
    DeckFile::from_json(&text).map_err(|e| ErrorReport::new(format!("{}: {e}", path.display())))
}
