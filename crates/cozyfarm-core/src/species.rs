//! Companion species and their catalog entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Closed set of companion species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalType {
    Cat,
    Bunny,
    Bear,
    Fox,
    Duck,
    Hamster,
}

/// Display metadata for a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalInfo {
    #[serde(rename = "type")]
    pub animal_type: AnimalType,
    pub display_name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
}

impl AnimalType {
    pub const ALL: [AnimalType; 6] = [
        AnimalType::Cat,
        AnimalType::Bunny,
        AnimalType::Bear,
        AnimalType::Fox,
        AnimalType::Duck,
        AnimalType::Hamster,
    ];

    /// Stable identifier used in persisted snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalType::Cat => "cat",
            AnimalType::Bunny => "bunny",
            AnimalType::Bear => "bear",
            AnimalType::Fox => "fox",
            AnimalType::Duck => "duck",
            AnimalType::Hamster => "hamster",
        }
    }

    pub fn info(&self) -> AnimalInfo {
        let (display_name, emoji, description) = match self {
            AnimalType::Cat => ("Kitty", "🐱", "A cozy companion who loves naps"),
            AnimalType::Bunny => ("Bunny", "🐰", "A fluffy friend who hops with joy"),
            AnimalType::Bear => ("Bear", "🐻", "A gentle giant with a warm heart"),
            AnimalType::Fox => ("Fox", "🦊", "A clever friend who loves adventures"),
            AnimalType::Duck => ("Duckling", "🦆", "A cheerful companion who quacks happily"),
            AnimalType::Hamster => ("Hamster", "🐹", "A tiny friend with big energy"),
        };
        AnimalInfo {
            animal_type: *self,
            display_name,
            emoji,
            description,
        }
    }
}

impl fmt::Display for AnimalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimalType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AnimalType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "type".to_string(),
                message: format!(
                    "unknown species '{s}' (expected one of: {})",
                    AnimalType::ALL.map(|t| t.as_str()).join(", ")
                ),
            })
    }
}
