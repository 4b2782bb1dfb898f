//! Errors and non-fatal findings produced while ingesting content.

use std::path::PathBuf;

use thiserror::Error;

use crate::{MiniGameId, NodeId};

/// Fatal ingestion errors.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("duplicate script node id `{0}`")]
    DuplicateNodeId(NodeId),

    #[error("failed to parse TOML content: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON content: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported content format for {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("content failed strict validation with {} issue(s)", .0.len())]
    Validation(Vec<ContentIssue>),
}

/// Problems that leave the content playable but degraded.
///
/// In lenient ingestion these are collected on the repository and logged;
/// strict ingestion turns them into [`ContentError::Validation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentIssue {
    #[error("choice payload of node `{node}` could not be decoded: {message}")]
    ChoicePayloadDecode { node: NodeId, message: String },

    #[error("choice node `{0}` has no options")]
    EmptyChoices(NodeId),

    #[error("node `{node}` links to unknown node `{target}`")]
    DanglingTarget { node: NodeId, target: NodeId },

    #[error("minigame node `{node}` references unknown minigame `{minigame}`")]
    UnresolvedMiniGame { node: NodeId, minigame: MiniGameId },

    #[error("minigame node `{0}` has no minigame id")]
    MissingMiniGame(NodeId),
}
