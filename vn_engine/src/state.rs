//! Engine state and the per-node lifecycle phase.

use std::collections::HashSet;

use vn_content::{MiniGameId, NodeId};

use crate::minigame::{Outcome, RunId};

/// Where the engine is in the current node's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing loaded yet, or reset.
    #[default]
    Idle,
    /// Narration or dialogue shown; waiting for advance.
    Dialogue,
    /// Options shown; waiting for a selection.
    Choice { options: usize },
    /// Minigame summary shown; waiting for start or skip.
    MiniGameOffered { minigame: MiniGameId },
    MiniGameRunning { minigame: MiniGameId, run_id: RunId },
    /// Result shown; waiting for advance.
    MiniGameResolved { outcome: Outcome },
    /// Terminal. `synthesized` is set when the story ran past its last node.
    Ending { synthesized: bool },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Dialogue => "presenting dialogue",
            Phase::Choice { .. } => "presenting a choice",
            Phase::MiniGameOffered { .. } => "offering a minigame",
            Phase::MiniGameRunning { .. } => "running a minigame",
            Phase::MiniGameResolved { .. } => "showing a minigame result",
            Phase::Ending { .. } => "at an ending",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Ending { .. })
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Traversal state owned by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineState {
    /// Only `load_node` changes this.
    pub current_script_id: Option<NodeId>,
    /// Every node ever loaded. Append-only.
    pub visited_nodes: HashSet<NodeId>,
    /// First visits in order.
    pub visit_order: Vec<NodeId>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` current and record the visit. Returns `true` on a first visit.
    pub fn enter(&mut self, id: &NodeId) -> bool {
        self.current_script_id = Some(id.clone());
        let first = self.visited_nodes.insert(id.clone());
        if first {
            self.visit_order.push(id.clone());
        }
        first
    }

    pub fn has_visited(&self, id: &NodeId) -> bool {
        self.visited_nodes.contains(id)
    }
}
