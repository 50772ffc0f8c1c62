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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::deck::DeckExport;

pub fn export_deck(name: &str, directory: Option<String>) -> Fallible<()> {
    let coll: Collection = Collection::new(directory)?;
    let json: String = get_export(&coll, name)?;
    println!("{json}");
    Ok(())
}

fn get_export(coll: &Collection, name: &str) -> Fallible<String> {
    let deck = coll.db.load_deck_by_name(name)?;
    let export = DeckExport::from(deck);
    Ok(serde_json::to_string_pretty(&export)?)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::error::StudyError;
    use crate::helper::test_deck;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn test_export() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        let mut coll = Collection::new(Some(dir.path().display().to_string()))?;
        coll.db.insert_deck(&test_deck(), Timestamp::now())?;
        let json: Value = serde_json::from_str(&get_export(&coll, "Test Deck")?)?;
        assert_eq!(json["deckName"], "Test Deck");
        assert_eq!(json["facts"].as_array().unwrap().len(), test_deck().facts.len());
        assert_eq!(json["facts"][0]["content"], test_deck().facts[0].as_str());
        Ok(())
    }

    #[test]
    fn test_export_missing_deck() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        let coll = Collection::new(Some(dir.path().display().to_string()))?;
        let err = get_export(&coll, "Nope").err().unwrap();
        assert_eq!(
            err.study_error(),
            Some(&StudyError::DeckNotFound("Nope".to_string()))
        );
        Ok(())
    }
}
