//! Character definitions and sprite lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::CharacterId;

/// Emotion tag carried by a script node.
///
/// Tags are normalized by upper-casing their first letter, so `happy` and
/// `Happy` are the same emotion. Tags outside the known set are kept as
/// [`Emotion::Other`] so they can still map to a sprite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Emotion {
    Normal,
    Happy,
    Sad,
    Angry,
    Surprised,
    Worried,
    Serious,
    Shy,
    Other(String),
}

impl Emotion {
    /// Parse an authored emotion tag.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        let mut chars = tag.chars();
        let normalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };

        match normalized.as_str() {
            "Normal" => Emotion::Normal,
            "Happy" => Emotion::Happy,
            "Sad" => Emotion::Sad,
            "Angry" => Emotion::Angry,
            "Surprised" => Emotion::Surprised,
            "Worried" => Emotion::Worried,
            "Serious" => Emotion::Serious,
            "Shy" => Emotion::Shy,
            _ => Emotion::Other(normalized),
        }
    }

    /// Normalized tag name (`"Happy"`, or the custom tag).
    pub fn name(&self) -> &str {
        match self {
            Emotion::Normal => "Normal",
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Surprised => "Surprised",
            Emotion::Worried => "Worried",
            Emotion::Serious => "Serious",
            Emotion::Shy => "Shy",
            Emotion::Other(tag) => tag,
        }
    }
}

impl From<String> for Emotion {
    fn from(tag: String) -> Self {
        Emotion::from_tag(&tag)
    }
}

impl From<Emotion> for String {
    fn from(emotion: Emotion) -> Self {
        emotion.name().to_string()
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A speaking character with one sprite per emotion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub sprites: HashMap<Emotion, String>,
}

impl Character {
    /// Create a character with no sprites.
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sprites: HashMap::new(),
        }
    }

    pub fn with_sprite(mut self, emotion: Emotion, sprite: impl Into<String>) -> Self {
        self.sprites.insert(emotion, sprite.into());
        self
    }

    /// Sprite for an emotion; `None` means the character is not drawn.
    pub fn sprite(&self, emotion: &Emotion) -> Option<&str> {
        self.sprites.get(emotion).map(String::as_str)
    }
}

/// Field prefix of sprite columns in flat character records.
const SPRITE_FIELD_PREFIX: &str = "sprite";

/// A character as it appears in a content file.
///
/// Sprites may be given as a `sprites` table keyed by emotion, or as flat
/// `spriteHappy`-style fields; both are folded into one mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterRecord {
    pub id: CharacterId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sprites: HashMap<String, String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl CharacterRecord {
    pub fn into_character(self) -> Character {
        let mut character = Character::new(self.id, self.name);

        for (key, value) in self.extra {
            let Some(tag) = key.strip_prefix(SPRITE_FIELD_PREFIX) else {
                continue;
            };
            match value {
                serde_json::Value::String(sprite) if !tag.is_empty() && !sprite.is_empty() => {
                    character.sprites.insert(Emotion::from_tag(tag), sprite);
                }
                _ => {}
            }
        }

        // The table wins over flat fields.
        for (tag, sprite) in self.sprites {
            if !sprite.is_empty() {
                character.sprites.insert(Emotion::from_tag(&tag), sprite);
            }
        }

        character
    }
}
