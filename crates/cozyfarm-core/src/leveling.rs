//! Experience-to-level mapping.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minimum experience for levels 1 through 10.
pub const DEFAULT_THRESHOLDS: [u32; 10] = [0, 10, 25, 50, 100, 175, 275, 400, 550, 725];

/// Ascending experience thresholds; index `i` is the floor of level `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct LevelTable {
    thresholds: Vec<u32>,
}

/// Where an animal stands within its current level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u32,
    pub experience: u32,
    /// Experience at which the current level began.
    pub current_floor: u32,
    /// `None` at the top of the table.
    pub next_threshold: Option<u32>,
    pub xp_to_next: u32,
    /// 0.0 .. 100.0
    pub percent: f64,
}

impl LevelTable {
    /// # Errors
    /// Returns an error unless the table is non-empty, starts at 0 and is
    /// strictly ascending.
    pub fn new(thresholds: Vec<u32>) -> Result<Self, ValidationError> {
        match thresholds.first() {
            None => {
                return Err(ValidationError::InvalidLevelTable(
                    "at least one threshold is required".to_string(),
                ))
            }
            Some(&first) if first != 0 => {
                return Err(ValidationError::InvalidLevelTable(format!(
                    "level 1 must start at 0 XP, got {first}"
                )))
            }
            Some(_) => {}
        }
        if let Some(pair) = thresholds.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ValidationError::InvalidLevelTable(format!(
                "thresholds must be strictly ascending ({} then {})",
                pair[0], pair[1]
            )));
        }
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &[u32] {
        &self.thresholds
    }

    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32
    }

    /// Highest level whose threshold `experience` meets.
    pub fn level_for(&self, experience: u32) -> u32 {
        self.thresholds
            .iter()
            .rposition(|&threshold| experience >= threshold)
            .map_or(1, |index| index as u32 + 1)
    }

    pub fn progress(&self, experience: u32) -> LevelProgress {
        let level = self.level_for(experience);
        let index = (level - 1) as usize;
        let current_floor = self.thresholds.get(index).copied().unwrap_or(0);
        let next_threshold = self.thresholds.get(index + 1).copied();

        let (xp_to_next, percent) = match next_threshold {
            Some(next) => {
                let span = f64::from(next - current_floor);
                let into_level = f64::from(experience - current_floor);
                (next - experience, (into_level / span * 100.0).min(100.0))
            }
            None => (0, 100.0),
        };

        LevelProgress {
            level,
            experience,
            current_floor,
            next_threshold,
            xp_to_next,
            percent,
        }
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
        }
    }
}

impl TryFrom<Vec<u32>> for LevelTable {
    type Error = ValidationError;

    fn try_from(thresholds: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(thresholds)
    }
}

impl From<LevelTable> for Vec<u32> {
    fn from(table: LevelTable) -> Self {
        table.thresholds
    }
}
