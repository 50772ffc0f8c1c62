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

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write;

use clap::ValueEnum;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::stats::DeckStats;
use crate::study::study_stats;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_deck_stats(name: &str, directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let today = Timestamp::now().local_date();
    let stats = study_stats(&coll.db, name, today)?;
    match format {
        StatsFormat::Text => {
            print!("{}", render_text(&stats));
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

fn render_text(stats: &DeckStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Deck:            {}", stats.deck_name);
    let _ = writeln!(out, "Total facts:     {}", stats.total_facts);
    let _ = writeln!(out, "Reviewed facts:  {}", stats.reviewed_facts);
    let _ = writeln!(out, "Due facts:       {}", stats.due_facts);
    let _ = writeln!(out, "New facts:       {}", stats.new_facts);
    let _ = writeln!(out, "Avg. ease:       {:.2}", stats.avg_ease_factor);
    if !stats.recent_sessions.is_empty() {
        let _ = writeln!(out, "Recent sessions:");
        for session in &stats.recent_sessions {
            let _ = writeln!(
                out,
                "  {} {:<7} {} studied, {}% correct",
                session.started_at.into_inner().format("%Y-%m-%d %H:%M"),
                session.mode.as_str(),
                session.facts_studied,
                session.accuracy
            );
        }
    }
    out
}
