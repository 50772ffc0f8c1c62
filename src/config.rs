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

use serde::Deserialize;

use crate::error::Fallible;
use crate::session::SessionLimits;
use crate::types::mode::StudyMode;

pub const CONFIG_FILE_NAME: &str = "factflare.toml";

/// Collection settings, read from `factflare.toml`. Every key is optional.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub port: u16,
    pub default_mode: StudyMode,
    /// Whether random mode avoids repeats until every fact has been shown.
    pub no_repeat_random: bool,
    /// A deck file to use instead of the built-in sample deck. Relative
    /// paths are resolved against the collection directory.
    pub sample_deck: Option<PathBuf>,
    /// Limits applied to every session.
    pub session: SessionLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            default_mode: StudyMode::Spaced,
            no_repeat_random: true,
            sample_deck: None,
            session: SessionLimits::default(),
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(text)?;
        Ok(config)
    }

    /// Load the config file from `directory`, falling back to the defaults
    /// when there is none.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No config file, using defaults.");
            return Ok(Self::default());
        }
        let text = read_to_string(&path)?;
        let mut config = Self::parse(&text)?;
        if let Some(sample) = config.sample_deck.take() {
            config.sample_deck = Some(directory.join(sample));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_empty_config() -> Fallible<()> {
        assert_eq!(Config::parse("")?, Config::default());
        Ok(())
    }

    #[test]
    fn test_full_config() -> Fallible<()> {
        let text = r#"
port = 9000
default_mode = "cram"
no_repeat_random = false
sample_deck = "decks/Sample.json"

[session]
fact_limit = 20
time_limit_minutes = 15
"#;
        let config = Config::parse(text)?;
        assert_eq!(config.port, 9000);
        assert_eq!(config.default_mode, StudyMode::Cram);
        assert!(!config.no_repeat_random);
        assert_eq!(config.sample_deck, Some(PathBuf::from("decks/Sample.json")));
        assert_eq!(config.session.fact_limit, Some(20));
        assert_eq!(config.session.time_limit_minutes, Some(15));
        Ok(())
    }

    #[test]
    fn test_unknown_key() {
        assert!(Config::parse("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_invalid_mode() {
        assert!(Config::parse("default_mode = \"shuffle\"").is_err());
    }

    #[test]
    fn test_load_missing_file() -> Fallible<()> {
        let dir = tempdir()?;
        assert_eq!(Config::load(dir.path())?, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_resolves_sample_path() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE_NAME), "sample_deck = \"mine.json\"\n")?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.sample_deck, Some(dir.path().join("mine.json")));
        Ok(())
    }
}
