//! Minigame definitions: which variant to run and how hard to make it.

use serde::{Deserialize, Serialize};

use crate::MiniGameId;

/// Minigame variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    /// Timed reaction: hit falling notes.
    Rhythm,
    /// Avoidance navigation: reach the goal past patrolling guards.
    Stealth,
    /// Target acquisition: click short-lived targets.
    Aim,
    /// Survival: dodge projectiles until time runs out.
    Dodge,
    /// Binary decision between two options.
    Strategy,
    /// Unrecognised tag; no variant can be built for it.
    #[serde(other)]
    Unknown,
}

/// Difficulty tier. Variants read it to scale their thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Pick one of three values by tier.
    pub fn scale<T>(self, easy: T, medium: T, hard: T) -> T {
        match self {
            Difficulty::Easy => easy,
            Difficulty::Medium => medium,
            Difficulty::Hard => hard,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniGameDefinition {
    pub id: MiniGameId,
    pub game_type: GameType,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub description: String,
}

impl MiniGameDefinition {
    pub fn new(id: impl Into<MiniGameId>, game_type: GameType, difficulty: Difficulty) -> Self {
        Self {
            id: id.into(),
            game_type,
            difficulty,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_scale() {
        assert_eq!(Difficulty::Easy.scale(10, 15, 20), 10);
        assert_eq!(Difficulty::Medium.scale(10, 15, 20), 15);
        assert_eq!(Difficulty::Hard.scale(10, 15, 20), 20);
    }

    #[test]
    fn test_unknown_game_type() {
        let def: MiniGameDefinition = serde_json::from_str(
            r#"{"id": "mg", "gameType": "puzzle", "difficulty": "hard"}"#,
        )
        .unwrap();
        assert_eq!(def.game_type, GameType::Unknown);
        assert_eq!(def.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_default_difficulty() {
        let def: MiniGameDefinition =
            serde_json::from_str(r#"{"id": "mg", "gameType": "aim"}"#).unwrap();
        assert_eq!(def.difficulty, Difficulty::Medium);
        assert!(def.description.is_empty());
    }
}
