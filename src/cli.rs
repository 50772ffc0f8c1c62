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

use clap::Parser;

use crate::api::server::start_server;
use crate::cmd::check::check_decks;
use crate::cmd::decks::delete_deck;
use crate::cmd::decks::list_decks;
use crate::cmd::export::export_deck;
use crate::cmd::import::import_decks;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_deck_stats;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Serve the study API.
    Serve {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// The port to listen on. Overrides the config file.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Import a deck file, or every deck file in a directory.
    Import {
        /// Path to a JSON deck file or a directory of them.
        path: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Print a deck, with the review state of every fact, as JSON.
    Export {
        /// The deck name.
        deck: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// List the decks in the collection.
    Decks {
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Delete a deck and its review history.
    Delete {
        /// The deck name.
        deck: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Print study statistics for a deck.
    Stats {
        /// The deck name.
        deck: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Validate deck files without importing them.
    Check {
        /// Path to a JSON deck file or a directory of them.
        path: String,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve { directory, port } => start_server(directory, port).await,
        Command::Import { path, directory } => import_decks(&path, directory),
        Command::Export { deck, directory } => export_deck(&deck, directory),
        Command::Decks { directory } => list_decks(directory),
        Command::Delete { deck, directory } => delete_deck(&deck, directory),
        Command::Stats {
            deck,
            directory,
            format,
        } => print_deck_stats(&deck, directory, format),
        Command::Check { path } => check_decks(&path),
    }
}
