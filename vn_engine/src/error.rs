//! Engine errors.

use thiserror::Error;
use vn_content::NodeId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("the script collection is empty; nothing to begin")]
    EmptyScriptCollection,

    #[error("script node `{0}` not found")]
    NodeNotFound(NodeId),

    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        phase: &'static str,
        action: &'static str,
    },

    #[error("choice {index} is out of range ({len} options)")]
    InvalidChoice { index: usize, len: usize },

    #[error("failed to parse engine config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}
