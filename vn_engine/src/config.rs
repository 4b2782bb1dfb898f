//! Engine configuration: timing, randomness and the player-facing strings.

use serde::{Deserialize, Serialize};
use vn_content::Difficulty;

use crate::minigame::TICK_MS;
use crate::EngineError;

/// Configuration for a [`StoryEngine`](crate::StoryEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of one minigame tick in time units.
    pub tick_ms: u32,

    /// Seed for minigame randomness; `None` seeds from entropy.
    pub rng_seed: Option<u64>,

    pub messages: Messages,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            rng_seed: None,
            messages: Messages::default(),
        }
    }
}

impl EngineConfig {
    /// Parse from TOML; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.tick_ms == 0 {
            return Err(EngineError::InvalidConfig("tick_ms must be positive".into()));
        }
        if self.messages.closing_message.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "closing_message must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Player-facing strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub ending_title: String,
    /// Shown when the story runs past its last node.
    pub closing_message: String,
    /// Label for options without text; `{n}` is the 1-based position.
    pub option_label: String,
    /// Title for minigames without a description.
    pub minigame_title: String,
    pub difficulty_easy: String,
    pub difficulty_medium: String,
    pub difficulty_hard: String,
    pub start_label: String,
    pub skip_label: String,
    pub success_title: String,
    pub success_message: String,
    pub failure_title: String,
    pub failure_message: String,
    pub continue_label: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            ending_title: "Ending".into(),
            closing_message: "Thanks for playing!".into(),
            option_label: "Option {n}".into(),
            minigame_title: "Minigame challenge".into(),
            difficulty_easy: "Easy".into(),
            difficulty_medium: "Medium".into(),
            difficulty_hard: "Hard".into(),
            start_label: "Start".into(),
            skip_label: "Skip".into(),
            success_title: "Challenge complete!".into(),
            success_message: "You pulled it off. The journey continues.".into(),
            failure_title: "Challenge failed".into(),
            failure_message: "It didn't work out, but the story goes on...".into(),
            continue_label: "Continue".into(),
        }
    }
}

impl Messages {
    /// Fallback label for the option at `index` (0-based).
    pub fn option_label(&self, index: usize) -> String {
        self.option_label.replace("{n}", &(index + 1).to_string())
    }

    pub fn difficulty(&self, difficulty: Difficulty) -> &str {
        match difficulty {
            Difficulty::Easy => &self.difficulty_easy,
            Difficulty::Medium => &self.difficulty_medium,
            Difficulty::Hard => &self.difficulty_hard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_ms, 16);
        assert!(config.rng_seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            rng_seed = 99

            [messages]
            closing_message = "Fin."
            "#,
        )
        .unwrap();

        assert_eq!(config.rng_seed, Some(99));
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.messages.closing_message, "Fin.");
        assert_eq!(config.messages.ending_title, "Ending");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            EngineConfig::from_toml_str("tick_ms = 0"),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("tick_ms = \"fast\""),
            Err(EngineError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_option_label() {
        let messages = Messages::default();
        assert_eq!(messages.option_label(0), "Option 1");
        assert_eq!(messages.option_label(2), "Option 3");
        assert_eq!(messages.difficulty(Difficulty::Hard), "Hard");
    }
}
