//! The content repository: ordered script collection plus id lookups.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::{
    Character, CharacterId, CharacterRecord, ContentError, ContentIssue, MiniGameDefinition,
    MiniGameId, NodeId, NodeType, ScriptNode, ScriptRecord,
};

/// Read-only lookups the engine needs from content.
///
/// All lookups are synchronous and side-effect free; "not found" is `None`.
pub trait ContentSource {
    /// Every script node in traversal order.
    fn scripts(&self) -> &[ScriptNode];

    fn script(&self, id: &NodeId) -> Option<&ScriptNode>;

    fn character(&self, id: &CharacterId) -> Option<&Character>;

    fn minigame(&self, id: &MiniGameId) -> Option<&MiniGameDefinition>;

    /// Index of a node in traversal order.
    fn position(&self, id: &NodeId) -> Option<usize> {
        self.scripts().iter().position(|node| &node.id == id)
    }

    /// Node that follows `id` in traversal order.
    fn positional_successor(&self, id: &NodeId) -> Option<&ScriptNode> {
        let index = self.position(id)?;
        self.scripts().get(index + 1)
    }
}

/// Ingestion options.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Reject content that has any [`ContentIssue`].
    pub strict: bool,
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Content file layout shared by the TOML and JSON formats.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDocument {
    #[serde(default, alias = "SCRIPTS")]
    pub scripts: Vec<ScriptRecord>,
    #[serde(default, alias = "CHARACTERS")]
    pub characters: Vec<CharacterRecord>,
    #[serde(default, alias = "MINIGAMES", alias = "miniGames")]
    pub minigames: Vec<MiniGameDefinition>,
}

/// In-memory content store.
#[derive(Debug, Clone, Default)]
pub struct ContentRepository {
    scripts: Vec<ScriptNode>,
    script_index: HashMap<NodeId, usize>,
    characters: HashMap<CharacterId, Character>,
    minigames: HashMap<MiniGameId, MiniGameDefinition>,
    /// Problems found while decoding records.
    ingest_issues: Vec<ContentIssue>,
}

impl ContentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node to the end of the traversal order.
    pub fn add_script(&mut self, node: ScriptNode) -> Result<(), ContentError> {
        if self.script_index.contains_key(&node.id) {
            return Err(ContentError::DuplicateNodeId(node.id));
        }
        self.script_index.insert(node.id.clone(), self.scripts.len());
        self.scripts.push(node);
        Ok(())
    }

    /// Add or replace a character.
    pub fn add_character(&mut self, character: Character) {
        self.characters.insert(character.id.clone(), character);
    }

    /// Add or replace a minigame definition.
    pub fn add_minigame(&mut self, definition: MiniGameDefinition) {
        self.minigames.insert(definition.id.clone(), definition);
    }

    /// Build from an in-memory list of nodes, keeping their order.
    pub fn with_scripts(
        scripts: impl IntoIterator<Item = ScriptNode>,
    ) -> Result<Self, ContentError> {
        let mut repository = Self::new();
        for node in scripts {
            repository.add_script(node)?;
        }
        Ok(repository)
    }

    /// Ingest a parsed content document.
    pub fn from_document(
        document: ContentDocument,
        options: LoadOptions,
    ) -> Result<Self, ContentError> {
        let mut repository = Self::new();

        for record in document.scripts {
            let (node, issue) = record.into_node();
            if let Some(issue) = issue {
                tracing::warn!(%issue, "choice payload decode failed; node keeps no options");
                repository.ingest_issues.push(issue);
            }
            repository.add_script(node)?;
        }
        for record in document.characters {
            repository.add_character(record.into_character());
        }
        for definition in document.minigames {
            repository.add_minigame(definition);
        }

        let issues = repository.issues();
        if options.strict && !issues.is_empty() {
            return Err(ContentError::Validation(issues));
        }
        for issue in issues.iter().skip(repository.ingest_issues.len()) {
            tracing::warn!(%issue, "content issue");
        }

        tracing::debug!(
            scripts = repository.scripts.len(),
            characters = repository.characters.len(),
            minigames = repository.minigames.len(),
            "content loaded"
        );
        Ok(repository)
    }

    pub fn from_toml_str(source: &str, options: LoadOptions) -> Result<Self, ContentError> {
        let document: ContentDocument = toml::from_str(source)?;
        Self::from_document(document, options)
    }

    pub fn from_json_str(source: &str, options: LoadOptions) -> Result<Self, ContentError> {
        let document: ContentDocument = serde_json::from_str(source)?;
        Self::from_document(document, options)
    }

    /// Load a `.toml` or `.json` content file.
    pub fn load(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&source, options),
            Some("json") => Self::from_json_str(&source, options),
            _ => Err(ContentError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Check cross-record references.
    pub fn validate(&self) -> Vec<ContentIssue> {
        let mut issues = Vec::new();

        for node in &self.scripts {
            for target in node.links() {
                if !self.script_index.contains_key(target) {
                    issues.push(ContentIssue::DanglingTarget {
                        node: node.id.clone(),
                        target: target.clone(),
                    });
                }
            }

            match node.node_type {
                NodeType::Choice if node.choices.is_empty() => {
                    issues.push(ContentIssue::EmptyChoices(node.id.clone()));
                }
                NodeType::MiniGame => match &node.mini_game_id {
                    None => issues.push(ContentIssue::MissingMiniGame(node.id.clone())),
                    Some(minigame) if !self.minigames.contains_key(minigame) => {
                        issues.push(ContentIssue::UnresolvedMiniGame {
                            node: node.id.clone(),
                            minigame: minigame.clone(),
                        });
                    }
                    Some(_) => {}
                },
                _ => {}
            }
        }

        issues
    }

    /// Ingestion issues followed by reference issues.
    pub fn issues(&self) -> Vec<ContentIssue> {
        let mut issues = self.ingest_issues.clone();
        issues.extend(self.validate());
        issues
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }
}

impl ContentSource for ContentRepository {
    fn scripts(&self) -> &[ScriptNode] {
        &self.scripts
    }

    fn script(&self, id: &NodeId) -> Option<&ScriptNode> {
        self.script_index.get(id).map(|&index| &self.scripts[index])
    }

    fn character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.get(id)
    }

    fn minigame(&self, id: &MiniGameId) -> Option<&MiniGameDefinition> {
        self.minigames.get(id)
    }

    fn position(&self, id: &NodeId) -> Option<usize> {
        self.script_index.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChoiceOption, Emotion, GameType};

    const STORY: &str = r#"
        [[scripts]]
        id = "start"
        nodeType = "narrator"
        content = "Rain on the harbor."
        backgroundImage = "bg/harbor.png"

        [[scripts]]
        id = "meet"
        nodeType = "dialogue"
        characterId = "lin"
        emotion = "happy"
        content = "You made it."
        nextNodeId = "pick"

        [[scripts]]
        id = "pick"
        nodeType = "choice"
        choices = [
            { text = "Follow her", nextNodeId = "chase" },
            { text = "Stay", nextNodeId = "end" },
        ]

        [[scripts]]
        id = "chase"
        nodeType = "minigame"
        miniGameId = "rooftops"

        [[scripts]]
        id = "end"
        nodeType = "ending"
        content = "The ship leaves without you."

        [[characters]]
        id = "lin"
        name = "Lin"
        spriteHappy = "img/lin_happy.png"

        [[minigames]]
        id = "rooftops"
        gameType = "stealth"
        difficulty = "easy"
        description = "Cross the rooftops unseen."
    "#;

    #[test]
    fn test_load_toml() {
        let repo = ContentRepository::from_toml_str(STORY, LoadOptions::strict()).unwrap();

        assert_eq!(repo.len(), 5);
        assert_eq!(repo.scripts()[0].id.as_str(), "start");
        assert_eq!(repo.position(&NodeId::new("pick")), Some(2));

        let meet = repo.script(&NodeId::new("meet")).unwrap();
        assert_eq!(meet.emotion, Some(Emotion::Happy));

        let lin = repo.character(&CharacterId::new("lin")).unwrap();
        assert_eq!(lin.sprite(&Emotion::Happy), Some("img/lin_happy.png"));

        let game = repo.minigame(&MiniGameId::new("rooftops")).unwrap();
        assert_eq!(game.game_type, GameType::Stealth);
        assert!(repo.issues().is_empty());
    }

    #[test]
    fn test_load_json_with_legacy_keys() {
        let repo = ContentRepository::from_json_str(
            r#"{
                "SCRIPTS": [
                    {"id": "a", "nodeType": "dialogue", "content": "hi"},
                    {"id": "b", "nodeType": "choice", "choices": "[{\"text\":\"go\",\"nextNodeId\":\"a\"}]"}
                ],
                "MINIGAMES": []
            }"#,
            LoadOptions::default(),
        )
        .unwrap();

        assert_eq!(repo.len(), 2);
        let b = repo.script(&NodeId::new("b")).unwrap();
        assert_eq!(b.choices, vec![ChoiceOption::new("go", "a")]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = ContentRepository::with_scripts(vec![
            ScriptNode::new("a", NodeType::Narrator, "one"),
            ScriptNode::new("a", NodeType::Narrator, "two"),
        ]);
        assert!(matches!(result, Err(ContentError::DuplicateNodeId(id)) if id.as_str() == "a"));
    }

    #[test]
    fn test_lenient_load_keeps_issues() {
        let source = r#"
            [[scripts]]
            id = "q"
            nodeType = "choice"
            choices = "not json"

            [[scripts]]
            id = "mg"
            nodeType = "minigame"
            miniGameId = "missing"
            nextNodeId = "nowhere"
        "#;

        let repo = ContentRepository::from_toml_str(source, LoadOptions::default()).unwrap();
        let issues = repo.issues();

        assert!(matches!(issues[0], ContentIssue::ChoicePayloadDecode { .. }));
        assert!(issues.contains(&ContentIssue::EmptyChoices(NodeId::new("q"))));
        assert!(issues.contains(&ContentIssue::UnresolvedMiniGame {
            node: NodeId::new("mg"),
            minigame: MiniGameId::new("missing"),
        }));
        assert!(issues.contains(&ContentIssue::DanglingTarget {
            node: NodeId::new("mg"),
            target: NodeId::new("nowhere"),
        }));
        assert!(repo.script(&NodeId::new("q")).unwrap().choices.is_empty());
    }

    #[test]
    fn test_strict_load_rejects_issues() {
        let source = r#"
            [[scripts]]
            id = "q"
            nodeType = "choice"
            choices = "not json"
        "#;

        let result = ContentRepository::from_toml_str(source, LoadOptions::strict());
        assert!(matches!(result, Err(ContentError::Validation(issues)) if issues.len() == 2));
    }

    #[test]
    fn test_positional_successor() {
        let repo = ContentRepository::with_scripts(vec![
            ScriptNode::new("a", NodeType::Narrator, ""),
            ScriptNode::new("b", NodeType::Narrator, ""),
        ])
        .unwrap();

        assert_eq!(
            repo.positional_successor(&NodeId::new("a")).map(|n| n.id.as_str()),
            Some("b")
        );
        assert!(repo.positional_successor(&NodeId::new("b")).is_none());
        assert!(repo.positional_successor(&NodeId::new("zzz")).is_none());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let path = std::env::temp_dir().join("vn_content_story.yaml");
        std::fs::write(&path, "scripts: []").unwrap();
        let result = ContentRepository::load(&path, LoadOptions::default());
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ContentError::UnsupportedFormat(_))));
    }
}
