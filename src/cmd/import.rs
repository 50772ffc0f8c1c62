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

use std::path::Path;

use crate::cmd::check::deck_files;
use crate::cmd::check::read_deck_file;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

/// Import the deck file at `path`, or every deck file under it. Every file
/// is validated before anything is stored.
pub fn import_decks(path: &str, directory: Option<String>) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let files = deck_files(Path::new(path))?;
    let mut decks = Vec::new();
    for file in &files {
        decks.push(read_deck_file(file)?);
    }
    let now = Timestamp::now();
    for deck in &decks {
        coll.db.insert_deck(deck, now)?;
        println!("Imported '{}' ({} facts).", deck.deck_name, deck.facts.len());
    }
    Ok(())
}
