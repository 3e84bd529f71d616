//! The five-way partition of run records by mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::mode::GameMode;

/// Directory holding discarded runs, next to the category directories.
pub const ENDED_DIR: &str = "Ended Runs";

/// Category a record is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Normal,
    Growth,
    ArmsRace,
    LegacyVariant,
    CurrentVariant,
}

impl Category {
    /// Ingestion order.
    pub const ALL: [Category; 5] = [
        Category::Normal,
        Category::Growth,
        Category::ArmsRace,
        Category::LegacyVariant,
        Category::CurrentVariant,
    ];

    /// Classify a mode. The checks run in priority order.
    pub fn classify(mode: &dyn GameMode) -> Category {
        if mode.is_normal_mode() {
            Category::Normal
        } else if mode.prefix_has("Growth") {
            Category::Growth
        } else if mode.prefix_has("Arms Race") {
            Category::ArmsRace
        } else if mode.has_custom_word("old") {
            Category::LegacyVariant
        } else {
            Category::CurrentVariant
        }
    }

    /// Name of the category directory under the store root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Normal => "Normal",
            Category::Growth => "Growth",
            Category::ArmsRace => "Arms Race",
            Category::LegacyVariant => "Olddreads",
            Category::CurrentVariant => "Newdreads",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Normal => "Modes without heavy modifiers, usually connected to nexus.",
            Category::Growth => "Modes with the Growth prefix.",
            Category::ArmsRace => "Modes with the Arms Race prefix, below Growth in priority.",
            Category::LegacyVariant => "The old dreadnoughts mode, any mode with the 'old' word.",
            Category::CurrentVariant => "Every other mode, including current dreadnought modes.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = s.replace([' ', '-', '_'], "").to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.dir_name().replace(' ', "").to_lowercase() == folded
                    || format!("{c:?}").to_lowercase() == folded
            })
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}
