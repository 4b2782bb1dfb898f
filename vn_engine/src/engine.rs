//! The narrative traversal engine.
//!
//! `StoryEngine` owns the traversal state and decides which node is active.
//! It moves between narrative and minigame modes:
//!
//! ```text
//! Idle -> load_node -> Dialogue --------------------------------> advance
//!                   -> Choice ----------------------------------> choose(i)
//!                   -> MiniGameOffered -> MiniGameRunning
//!                                    \-> (skip) -> MiniGameResolved -> advance
//!                   -> Ending (terminal)
//! ```
//!
//! Every operation runs to completion before the next one starts. A running
//! minigame is driven by `tick`/`update` and `handle_input`; its completion
//! callback is the only way control comes back to the story.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use vn_content::{ContentSource, MiniGameDefinition, MiniGameId, NodeId, NodeType, ScriptNode};

use crate::config::EngineConfig;
use crate::minigame::{
    create_minigame, Completion, GameContext, InputBus, InputEvent, MiniGame, Outcome, RunId,
};
use crate::presenter::{
    ChoiceEntry, ChoicePrompt, DialogueView, EndingView, MiniGamePanel, MiniGameSummary,
    Presenter, ResultSummary,
};
use crate::state::{EngineState, Phase};
use crate::EngineError;

/// A minigame from offer until its result is shown.
struct MiniGameSession {
    run_id: RunId,
    title: String,
    /// `None` when no variant exists for the definition's game type.
    game: Option<Box<dyn MiniGame>>,
}

/// Where a load lands once unresolved minigame nodes are skipped.
enum Landing {
    Node(ScriptNode),
    MiniGame(ScriptNode, MiniGameDefinition),
    /// Ran past the last node, or unresolved minigames form a cycle.
    Closing,
}

/// Drives a story held in `S` onto the display `P`.
pub struct StoryEngine<S, P> {
    content: S,
    presenter: P,
    config: EngineConfig,
    state: EngineState,
    phase: Phase,
    session: Option<MiniGameSession>,
    input: InputBus,
    rng: StdRng,
    /// Written by the running variant's completion callback.
    completed: Rc<Cell<Option<(RunId, Outcome)>>>,
    /// Time not yet consumed by whole ticks.
    pending_ms: u32,
}

impl<S: ContentSource, P: Presenter> StoryEngine<S, P> {
    pub fn new(content: S, presenter: P) -> Self {
        Self::build(content, presenter, EngineConfig::default())
    }

    /// Build with a custom config; rejects configs that fail
    /// [`EngineConfig::validate`].
    pub fn with_config(
        content: S,
        presenter: P,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::build(content, presenter, config))
    }

    fn build(content: S, presenter: P, config: EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            content,
            presenter,
            config,
            state: EngineState::new(),
            phase: Phase::Idle,
            session: None,
            input: InputBus::new(),
            rng,
            completed: Rc::new(Cell::new(None)),
            pending_ms: 0,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn content(&self) -> &S {
        &self.content
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Listeners currently installed by running minigames.
    pub fn input(&self) -> &InputBus {
        &self.input
    }

    /// The node `state().current_script_id` points at.
    pub fn current_node(&self) -> Option<&ScriptNode> {
        self.state
            .current_script_id
            .as_ref()
            .and_then(|id| self.content.script(id))
    }

    pub fn is_minigame_running(&self) -> bool {
        matches!(self.phase, Phase::MiniGameRunning { .. })
    }

    /// Start the story from the first node in collection order.
    pub fn begin(&mut self) -> Result<(), EngineError> {
        let Some(first) = self.content.scripts().first().map(|node| node.id.clone()) else {
            tracing::error!("cannot begin: script collection is empty");
            return Err(EngineError::EmptyScriptCollection);
        };
        self.reset();
        tracing::info!(node_id = %first, "story begins");
        self.load_node(&first)
    }

    /// Make `id` the current node and present it.
    ///
    /// Minigame nodes whose definition does not resolve are marked visited
    /// and skipped. If `id`, or any node reached by skipping, does not exist,
    /// the engine is left untouched.
    pub fn load_node(&mut self, id: &NodeId) -> Result<(), EngineError> {
        let (skipped, landing) = self.plan_load(id)?;

        self.release_session();
        for skipped_id in &skipped {
            self.state.enter(skipped_id);
        }

        match landing {
            Landing::Closing => {
                let background = skipped
                    .last()
                    .and_then(|id| self.content.script(id))
                    .and_then(|node| node.background_image.clone());
                self.presenter.set_background(background.as_deref());
                self.present_closing();
            }
            Landing::MiniGame(node, definition) => {
                self.enter_node(&node);
                self.offer_minigame(definition);
            }
            Landing::Node(node) => {
                self.enter_node(&node);
                match node.node_type {
                    NodeType::Choice => self.present_choice(&node),
                    NodeType::Ending => self.present_ending(&node),
                    _ => self.present_dialogue(&node),
                }
            }
        }
        Ok(())
    }

    /// Move to the successor of the current node.
    ///
    /// Allowed after dialogue and after a minigame result. An explicit
    /// `next_node_id` wins over collection order; past the last node the
    /// story closes with the configured message.
    pub fn advance(&mut self) -> Result<(), EngineError> {
        if matches!(
            self.phase,
            Phase::Dialogue | Phase::MiniGameResolved { .. }
        ) {
            return self.step_forward();
        }
        Err(self.invalid("advance"))
    }

    /// Select option `index` of the current choice node.
    pub fn choose(&mut self, index: usize) -> Result<(), EngineError> {
        let Phase::Choice { options } = self.phase else {
            return Err(self.invalid("choose an option"));
        };

        let target = self
            .current_node()
            .and_then(|node| node.choices.get(index))
            .map(|option| option.target().cloned());

        match target {
            None => Err(EngineError::InvalidChoice {
                index,
                len: options,
            }),
            Some(None) => {
                tracing::warn!(index, "choice option leads nowhere");
                Ok(())
            }
            Some(Some(target)) => self.load_node(&target),
        }
    }

    /// Start the offered minigame.
    pub fn start_minigame(&mut self) -> Result<(), EngineError> {
        let Phase::MiniGameOffered { minigame } = &self.phase else {
            return Err(self.invalid("start a minigame"));
        };
        let minigame = minigame.clone();

        let Some((run_id, title)) = self
            .session
            .as_ref()
            .filter(|session| session.game.is_some())
            .map(|session| (session.run_id, session.title.clone()))
        else {
            tracing::warn!(%minigame, "no playable variant; resolving as success");
            self.session = None;
            self.on_minigame_resolved(Outcome::Success);
            return Ok(());
        };

        tracing::info!(%minigame, %run_id, "minigame started");
        self.presenter
            .show_minigame_panel(&MiniGamePanel::Running { title });
        self.phase = Phase::MiniGameRunning { minigame, run_id };
        self.drive(|game, ctx| game.start(ctx));
        Ok(())
    }

    /// Decline the offered minigame. Counts as a win.
    pub fn skip_minigame(&mut self) -> Result<(), EngineError> {
        if !matches!(self.phase, Phase::MiniGameOffered { .. }) {
            return Err(self.invalid("skip a minigame"));
        }
        if let Some(session) = self.session.take() {
            tracing::info!(run_id = %session.run_id, "minigame skipped");
        }
        self.on_minigame_resolved(Outcome::Success);
        Ok(())
    }

    /// Run one simulation step of the running minigame.
    ///
    /// Returns whether a minigame is still running afterwards.
    pub fn tick(&mut self) -> bool {
        if !self.is_minigame_running() {
            return false;
        }
        self.drive(|game, ctx| game.tick(ctx));
        self.is_minigame_running()
    }

    /// Feed host frame time; runs as many whole ticks as it covers.
    pub fn update(&mut self, elapsed: Duration) -> usize {
        if !self.is_minigame_running() {
            self.pending_ms = 0;
            return 0;
        }

        let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
        self.pending_ms = self.pending_ms.saturating_add(elapsed_ms);

        let mut ticks = 0;
        while self.pending_ms >= self.config.tick_ms && self.is_minigame_running() {
            self.pending_ms -= self.config.tick_ms;
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Route an input event to the running minigame.
    ///
    /// Returns `false` when no running minigame listens for this kind of event.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let Phase::MiniGameRunning { run_id, .. } = self.phase else {
            return false;
        };
        if !self.input.wants(run_id, event.kind()) {
            return false;
        }
        self.drive(|game, ctx| game.handle_input(event, ctx));
        true
    }

    /// Drop everything and return to `Idle`.
    pub fn reset(&mut self) {
        self.session = None;
        self.input.clear();
        self.completed.set(None);
        self.state = EngineState::new();
        self.phase = Phase::Idle;
        self.pending_ms = 0;
        self.hide_panels();
        self.presenter.set_background(None);
    }

    fn invalid(&self, action: &'static str) -> EngineError {
        EngineError::InvalidTransition {
            phase: self.phase.name(),
            action,
        }
    }

    fn step_forward(&mut self) -> Result<(), EngineError> {
        let Some(current) = self.state.current_script_id.clone() else {
            return Err(self.invalid("advance"));
        };

        match self.successor(&current) {
            Some(next) => self.load_node(&next),
            None => {
                self.present_closing();
                Ok(())
            }
        }
    }

    /// Explicit `next_node_id`, else the next node in collection order.
    fn successor(&self, id: &NodeId) -> Option<NodeId> {
        match self.content.script(id).and_then(ScriptNode::explicit_next) {
            Some(next) => Some(next.clone()),
            None => self
                .content
                .positional_successor(id)
                .map(|node| node.id.clone()),
        }
    }

    /// Follow `id` past unresolved minigame nodes without touching state.
    fn plan_load(&self, id: &NodeId) -> Result<(Vec<NodeId>, Landing), EngineError> {
        let mut skipped = Vec::new();
        let mut id = id.clone();
        loop {
            let Some(node) = self.content.script(&id) else {
                tracing::warn!(node_id = %id, "script node not found");
                return Err(EngineError::NodeNotFound(id));
            };
            if node.node_type != NodeType::MiniGame {
                return Ok((skipped, Landing::Node(node.clone())));
            }
            if let Some(definition) = node
                .mini_game_id
                .as_ref()
                .and_then(|minigame| self.content.minigame(minigame))
            {
                return Ok((skipped, Landing::MiniGame(node.clone(), definition.clone())));
            }

            tracing::warn!(
                node_id = %node.id,
                minigame = ?node.mini_game_id.as_ref().map(MiniGameId::as_str),
                "minigame not found; skipping ahead"
            );
            skipped.push(node.id.clone());
            if skipped.len() > self.content.scripts().len() {
                tracing::error!(node_id = %node.id, "unresolved minigames loop back on themselves");
                return Ok((skipped, Landing::Closing));
            }
            match self.successor(&node.id) {
                Some(next) => id = next,
                None => return Ok((skipped, Landing::Closing)),
            }
        }
    }

    fn enter_node(&mut self, node: &ScriptNode) {
        self.state.enter(&node.id);
        self.presenter
            .set_background(node.background_image.as_deref());
        tracing::debug!(node_id = %node.id, node_type = ?node.node_type, "node loaded");
    }

    fn hide_panels(&mut self) {
        self.presenter.hide_dialogue();
        self.presenter.hide_choices();
        self.presenter.hide_minigame_panel();
        self.presenter.hide_ending();
    }

    fn sprite_for(&self, node: &ScriptNode) -> Option<String> {
        let character = node
            .character_id
            .as_ref()
            .and_then(|id| self.content.character(id))?;
        let emotion = node.emotion.as_ref()?;
        character.sprite(emotion).map(str::to_string)
    }

    fn present_dialogue(&mut self, node: &ScriptNode) {
        let speaker = node
            .character_id
            .as_ref()
            .and_then(|id| self.content.character(id))
            .map(|character| character.name.clone())
            .filter(|name| !name.is_empty());
        let view = DialogueView {
            speaker,
            sprite: self.sprite_for(node),
            text: node.content.clone(),
        };

        self.hide_panels();
        self.presenter.show_dialogue(&view);
        self.phase = Phase::Dialogue;
    }

    fn present_choice(&mut self, node: &ScriptNode) {
        let entries: Vec<_> = node
            .choices
            .iter()
            .enumerate()
            .map(|(index, option)| ChoiceEntry {
                index,
                label: if option.text.is_empty() {
                    self.config.messages.option_label(index)
                } else {
                    option.text.clone()
                },
                target: option.target().cloned(),
            })
            .collect();
        if entries.is_empty() {
            tracing::warn!(node_id = %node.id, "choice node has no options");
        }
        let prompt = ChoicePrompt {
            sprite: self.sprite_for(node),
            entries,
        };

        self.hide_panels();
        self.presenter.show_choices(&prompt);
        self.phase = Phase::Choice {
            options: node.choices.len(),
        };
    }

    fn present_ending(&mut self, node: &ScriptNode) {
        let view = EndingView {
            title: self.config.messages.ending_title.clone(),
            text: node.content.clone(),
        };
        self.hide_panels();
        self.presenter.show_ending(&view);
        self.phase = Phase::Ending { synthesized: false };
        tracing::info!(node_id = %node.id, "story ended");
    }

    fn present_closing(&mut self) {
        let view = EndingView {
            title: self.config.messages.ending_title.clone(),
            text: self.config.messages.closing_message.clone(),
        };
        self.hide_panels();
        self.presenter.show_ending(&view);
        self.phase = Phase::Ending { synthesized: true };
        tracing::info!("story ran past its last node");
    }

    fn offer_minigame(&mut self, definition: MiniGameDefinition) {
        let run_id = RunId::new();
        let game = create_minigame(&definition, self.completion(run_id));
        if game.is_none() {
            tracing::warn!(
                minigame = %definition.id,
                game_type = ?definition.game_type,
                "no variant for game type"
            );
        }

        let messages = &self.config.messages;
        let title = if definition.description.trim().is_empty() {
            messages.minigame_title.clone()
        } else {
            definition.description.clone()
        };
        let summary = MiniGameSummary {
            title: title.clone(),
            difficulty: definition.difficulty,
            difficulty_label: messages.difficulty(definition.difficulty).to_string(),
            start_label: messages.start_label.clone(),
            skip_label: messages.skip_label.clone(),
        };

        self.hide_panels();
        self.presenter
            .show_minigame_panel(&MiniGamePanel::Offer(summary));
        self.session = Some(MiniGameSession { run_id, title, game });
        self.phase = Phase::MiniGameOffered {
            minigame: definition.id,
        };
    }

    fn completion(&self, run_id: RunId) -> Completion {
        let slot = Rc::clone(&self.completed);
        Completion::new(run_id, move |outcome| slot.set(Some((run_id, outcome))))
    }

    /// Lend the running variant a context, then pick up its outcome if it
    /// finished.
    fn drive<F>(&mut self, f: F)
    where
        F: FnOnce(&mut dyn MiniGame, &mut GameContext<'_>),
    {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(game) = session.game.as_mut() else {
            return;
        };
        let mut ctx = GameContext {
            run_id: session.run_id,
            surface: self.presenter.surface(),
            input: &mut self.input,
            rng: &mut self.rng,
            tick_ms: self.config.tick_ms,
        };
        f(game.as_mut(), &mut ctx);
        self.collect_outcome();
    }

    fn collect_outcome(&mut self) {
        let Some((run_id, outcome)) = self.completed.take() else {
            return;
        };
        if self.session.as_ref().map(|session| session.run_id) != Some(run_id) {
            tracing::warn!(%run_id, "ignoring completion from a stale run");
            return;
        }
        self.on_minigame_resolved(outcome);
    }

    /// Show the result of a finished or skipped minigame.
    fn on_minigame_resolved(&mut self, outcome: Outcome) {
        self.release_session();
        self.pending_ms = 0;

        let messages = &self.config.messages;
        let (title, message) = match outcome {
            Outcome::Success => (&messages.success_title, &messages.success_message),
            Outcome::Failure => (&messages.failure_title, &messages.failure_message),
        };
        let summary = ResultSummary {
            outcome,
            title: title.clone(),
            message: message.clone(),
            continue_label: messages.continue_label.clone(),
        };

        tracing::info!(?outcome, "minigame resolved");
        self.presenter
            .show_minigame_panel(&MiniGamePanel::Result(summary));
        self.phase = Phase::MiniGameResolved { outcome };
    }

    fn release_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let leftover = self.input.owned_by(session.run_id);
        if leftover > 0 {
            tracing::warn!(
                run_id = %session.run_id,
                leftover,
                "minigame left input listeners installed; releasing them"
            );
            self.input.release_run(session.run_id);
        }
    }
}
