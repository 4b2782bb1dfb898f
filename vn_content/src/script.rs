//! Script nodes - the units of narrative content.

use serde::{Deserialize, Serialize};

use crate::{CharacterId, ContentIssue, Emotion, MiniGameId, NodeId};

/// Kind of a script node; selects how the engine presents it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Narrator,
    Dialogue,
    Choice,
    #[serde(alias = "miniGame", alias = "mini_game")]
    MiniGame,
    Ending,
}

/// One selectable option of a choice node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    #[serde(default)]
    pub text: String,
    /// `None` is a dead end.
    #[serde(default)]
    pub next_node_id: Option<NodeId>,
}

impl ChoiceOption {
    pub fn new(text: impl Into<String>, target: impl Into<NodeId>) -> Self {
        Self {
            text: text.into(),
            next_node_id: Some(target.into()),
        }
    }

    /// Target of this option, ignoring blank ids.
    pub fn target(&self) -> Option<&NodeId> {
        self.next_node_id.as_ref().filter(|id| !id.is_blank())
    }
}

/// A script node as loaded and normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptNode {
    pub id: NodeId,
    pub node_type: NodeType,
    pub content: String,
    pub character_id: Option<CharacterId>,
    pub emotion: Option<Emotion>,
    pub background_image: Option<String>,
    pub next_node_id: Option<NodeId>,
    pub mini_game_id: Option<MiniGameId>,
    /// Only populated for [`NodeType::Choice`].
    pub choices: Vec<ChoiceOption>,
}

impl ScriptNode {
    /// Create a node with the given id, type and text.
    pub fn new(id: impl Into<NodeId>, node_type: NodeType, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            content: content.into(),
            character_id: None,
            emotion: None,
            background_image: None,
            next_node_id: None,
            mini_game_id: None,
            choices: Vec::new(),
        }
    }

    pub fn with_character(mut self, character: impl Into<CharacterId>) -> Self {
        self.character_id = Some(character.into());
        self
    }

    pub fn with_emotion(mut self, emotion: Emotion) -> Self {
        self.emotion = Some(emotion);
        self
    }

    pub fn with_background(mut self, image: impl Into<String>) -> Self {
        self.background_image = Some(image.into());
        self
    }

    /// Set the explicit successor.
    pub fn with_next(mut self, next: impl Into<NodeId>) -> Self {
        self.next_node_id = Some(next.into());
        self
    }

    pub fn with_minigame(mut self, minigame: impl Into<MiniGameId>) -> Self {
        self.mini_game_id = Some(minigame.into());
        self
    }

    pub fn with_choice(mut self, option: ChoiceOption) -> Self {
        self.choices.push(option);
        self
    }

    /// Explicit successor, ignoring blank ids.
    pub fn explicit_next(&self) -> Option<&NodeId> {
        self.next_node_id.as_ref().filter(|id| !id.is_blank())
    }

    /// Every node id this node can link to directly.
    pub fn links(&self) -> impl Iterator<Item = &NodeId> {
        self.explicit_next()
            .into_iter()
            .chain(self.choices.iter().filter_map(ChoiceOption::target))
    }
}

/// Choice options as authored: either a structured list or a JSON-encoded
/// string of the same list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ChoicePayload {
    Options(Vec<ChoiceOption>),
    Encoded(String),
}

impl ChoicePayload {
    /// Decode into a structured option list.
    pub fn decode(self) -> Result<Vec<ChoiceOption>, serde_json::Error> {
        match self {
            ChoicePayload::Options(options) => Ok(options),
            ChoicePayload::Encoded(raw) => serde_json::from_str(&raw),
        }
    }
}

/// A script node as it appears in a content file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRecord {
    pub id: NodeId,
    pub node_type: NodeType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub character_id: Option<CharacterId>,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub next_node_id: Option<NodeId>,
    #[serde(default)]
    pub mini_game_id: Option<MiniGameId>,
    #[serde(default)]
    pub choices: Option<ChoicePayload>,
}

impl ScriptRecord {
    /// Normalize into a [`ScriptNode`].
    ///
    /// A choice payload that fails to decode yields an empty option list and
    /// an issue; the node itself is still produced.
    pub fn into_node(self) -> (ScriptNode, Option<ContentIssue>) {
        let (choices, issue) = match self.choices {
            None => (Vec::new(), None),
            Some(payload) => match payload.decode() {
                Ok(options) => (options, None),
                Err(err) => {
                    let issue = ContentIssue::ChoicePayloadDecode {
                        node: self.id.clone(),
                        message: err.to_string(),
                    };
                    (Vec::new(), Some(issue))
                }
            },
        };

        let node = ScriptNode {
            id: self.id,
            node_type: self.node_type,
            content: self.content,
            character_id: self.character_id.filter(|id| !id.is_blank()),
            emotion: self
                .emotion
                .filter(|tag| !tag.trim().is_empty())
                .map(|tag| Emotion::from_tag(&tag)),
            background_image: self.background_image.filter(|img| !img.is_empty()),
            next_node_id: self.next_node_id.filter(|id| !id.is_blank()),
            mini_game_id: self.mini_game_id.filter(|id| !id.is_blank()),
            choices,
        };

        (node, issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_choices() {
        let record: ScriptRecord = serde_json::from_str(
            r#"{
                "id": "b",
                "nodeType": "choice",
                "content": "Which way?",
                "choices": [{"text": "Left", "nextNodeId": "l"}, {"text": "Right", "nextNodeId": "r"}]
            }"#,
        )
        .unwrap();

        let (node, issue) = record.into_node();
        assert!(issue.is_none());
        assert_eq!(node.choices.len(), 2);
        assert_eq!(node.choices[1].target(), Some(&NodeId::new("r")));
    }

    #[test]
    fn test_encoded_choices() {
        let record: ScriptRecord = serde_json::from_str(
            r#"{
                "id": "b",
                "nodeType": "choice",
                "choices": "[{\"text\": \"Go\", \"nextNodeId\": \"c\"}]"
            }"#,
        )
        .unwrap();

        let (node, issue) = record.into_node();
        assert!(issue.is_none());
        assert_eq!(node.choices, vec![ChoiceOption::new("Go", "c")]);
    }

    #[test]
    fn test_malformed_choices_become_empty() {
        let record: ScriptRecord = serde_json::from_str(
            r#"{"id": "b", "nodeType": "choice", "choices": "[{not json"}"#,
        )
        .unwrap();

        let (parsed, issue) = record.into_node();
        assert!(parsed.choices.is_empty());
        assert!(matches!(
            issue,
            Some(ContentIssue::ChoicePayloadDecode { ref node, .. }) if node.as_str() == "b"
        ));
    }

    #[test]
    fn test_blank_links_are_dropped() {
        let record: ScriptRecord = serde_json::from_str(
            r#"{"id": "a", "nodeType": "narrator", "nextNodeId": "", "emotion": "happy"}"#,
        )
        .unwrap();

        let (node, _) = record.into_node();
        assert!(node.next_node_id.is_none());
        assert_eq!(node.emotion, Some(Emotion::Happy));
    }

    #[test]
    fn test_links() {
        let node = ScriptNode::new("q", NodeType::Choice, "?")
            .with_next("fallback")
            .with_choice(ChoiceOption::new("Yes", "y"))
            .with_choice(ChoiceOption {
                text: "Nowhere".into(),
                next_node_id: None,
            });

        let links: Vec<_> = node.links().map(NodeId::as_str).collect();
        assert_eq!(links, vec!["fallback", "y"]);
    }

    #[test]
    fn test_node_type_tags() {
        let kind: NodeType = serde_json::from_str("\"minigame\"").unwrap();
        assert_eq!(kind, NodeType::MiniGame);
        let kind: NodeType = serde_json::from_str("\"miniGame\"").unwrap();
        assert_eq!(kind, NodeType::MiniGame);
    }
}
