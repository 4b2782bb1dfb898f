//! Minigame contract - the lifecycle every variant follows.
//!
//! A variant is built with its definition and a [`Completion`], started
//! against a [`GameContext`], then driven by fixed-length ticks and routed
//! input until it reaches a win or lose condition. At that point it releases
//! its input listeners and fires the completion exactly once. The engine
//! learns about outcomes only through that callback.

mod aim;
mod dodge;
mod geometry;
mod input;
mod rhythm;
mod stealth;
mod strategy;

pub use aim::*;
pub use dodge::*;
pub use geometry::*;
pub use input::*;
pub use rhythm::*;
pub use stealth::*;
pub use strategy::*;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vn_content::{GameType, MiniGameDefinition};

use crate::surface::Surface;

/// Default simulation step in time units (milliseconds).
pub const TICK_MS: u32 = 16;

/// Identity of one minigame run, from offer to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result a minigame reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl From<bool> for Outcome {
    fn from(success: bool) -> Self {
        if success {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

/// Completion callback handed to a variant at construction.
///
/// The callback is consumed by the first [`Completion::fire`]; later calls
/// are ignored, so a variant cannot report twice.
pub struct Completion {
    run_id: RunId,
    callback: Option<Box<dyn FnOnce(Outcome)>>,
}

impl Completion {
    pub fn new(run_id: RunId, callback: impl FnOnce(Outcome) + 'static) -> Self {
        Self {
            run_id,
            callback: Some(Box::new(callback)),
        }
    }

    /// Invoke the callback. Returns `false` if it had already fired.
    pub fn fire(&mut self, outcome: Outcome) -> bool {
        match self.callback.take() {
            Some(callback) => {
                tracing::debug!(run_id = %self.run_id, ?outcome, "minigame completed");
                callback(outcome);
                true
            }
            None => false,
        }
    }

    pub fn has_fired(&self) -> bool {
        self.callback.is_none()
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("run_id", &self.run_id)
            .field("fired", &self.has_fired())
            .finish()
    }
}

/// Everything a variant may touch while it runs.
pub struct GameContext<'a> {
    pub run_id: RunId,
    /// Drawing target sized to [`CANVAS_WIDTH`] x [`CANVAS_HEIGHT`].
    pub surface: &'a mut dyn Surface,
    pub input: &'a mut InputBus,
    pub rng: &'a mut StdRng,
    /// Length of one tick in time units.
    pub tick_ms: u32,
}

/// Lifecycle bookkeeping shared by all variants: listener ownership and the
/// single completion.
#[derive(Debug)]
pub struct Lifecycle {
    completion: Completion,
    listeners: Vec<ListenerId>,
}

impl Lifecycle {
    pub fn new(completion: Completion) -> Self {
        Self {
            completion,
            listeners: Vec::new(),
        }
    }

    /// Register a listener owned by this run.
    pub fn listen(&mut self, ctx: &mut GameContext<'_>, kind: ListenerKind) -> ListenerId {
        let id = ctx.input.register(ctx.run_id, kind);
        self.listeners.push(id);
        id
    }

    /// Release every listener, then fire the completion.
    pub fn finish(&mut self, ctx: &mut GameContext<'_>, outcome: Outcome) {
        if self.completion.has_fired() {
            return;
        }
        for id in self.listeners.drain(..) {
            ctx.input.deregister(id);
        }
        self.completion.fire(outcome);
    }

    pub fn is_finished(&self) -> bool {
        self.completion.has_fired()
    }
}

/// Elapsed-time counter for timed rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub elapsed_ms: u32,
    pub duration_ms: u32,
}

impl Countdown {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            elapsed_ms: 0,
            duration_ms,
        }
    }

    pub fn advance(&mut self, ms: u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
    }

    pub fn expired(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn remaining_ms(&self) -> u32 {
        self.duration_ms.saturating_sub(self.elapsed_ms)
    }
}

/// The capability every minigame variant implements.
pub trait MiniGame {
    fn game_type(&self) -> GameType;

    /// Take over the surface and register input listeners.
    fn start(&mut self, ctx: &mut GameContext<'_>);

    /// Advance the simulation by one fixed step.
    fn tick(&mut self, _ctx: &mut GameContext<'_>) {}

    /// React to an input event routed to one of this run's listeners.
    fn handle_input(&mut self, event: &InputEvent, ctx: &mut GameContext<'_>);

    /// Whether the completion has fired.
    fn is_finished(&self) -> bool;
}

/// Build the variant for a definition, or `None` if its game type has none.
pub fn create_minigame(
    definition: &MiniGameDefinition,
    completion: Completion,
) -> Option<Box<dyn MiniGame>> {
    let game: Box<dyn MiniGame> = match definition.game_type {
        GameType::Rhythm => Box::new(RhythmGame::new(definition.difficulty, completion)),
        GameType::Stealth => Box::new(StealthGame::new(definition.difficulty, completion)),
        GameType::Aim => Box::new(AimGame::new(definition.difficulty, completion)),
        GameType::Dodge => Box::new(DodgeGame::new(definition.difficulty, completion)),
        GameType::Strategy => Box::new(StrategyGame::new(definition, completion)),
        GameType::Unknown => return None,
    };
    Some(game)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::surface::RecordingSurface;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Standalone host for driving a single variant in tests.
    pub struct Harness {
        pub run_id: RunId,
        pub surface: RecordingSurface,
        pub input: InputBus,
        pub rng: StdRng,
        pub fired: Rc<RefCell<Vec<Outcome>>>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                run_id: RunId::new(),
                surface: RecordingSurface::default(),
                input: InputBus::new(),
                rng: StdRng::seed_from_u64(7),
                fired: Rc::new(RefCell::new(Vec::new())),
            }
        }

        pub fn completion(&self) -> Completion {
            let fired = Rc::clone(&self.fired);
            Completion::new(self.run_id, move |outcome| fired.borrow_mut().push(outcome))
        }

        pub fn ctx(&mut self) -> GameContext<'_> {
            GameContext {
                run_id: self.run_id,
                surface: &mut self.surface,
                input: &mut self.input,
                rng: &mut self.rng,
                tick_ms: TICK_MS,
            }
        }

        pub fn outcomes(&self) -> Vec<Outcome> {
            self.fired.borrow().clone()
        }

        /// Tick until the game finishes or `max_ticks` pass.
        pub fn run(&mut self, game: &mut dyn MiniGame, max_ticks: usize) -> usize {
            for ticks in 0..max_ticks {
                if game.is_finished() {
                    return ticks;
                }
                let mut ctx = self.ctx();
                game.tick(&mut ctx);
            }
            max_ticks
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;
    use vn_content::Difficulty;

    #[test]
    fn test_completion_fires_once() {
        let harness = Harness::new();
        let mut completion = harness.completion();

        assert!(completion.fire(Outcome::Success));
        assert!(!completion.fire(Outcome::Failure));
        assert!(completion.has_fired());
        assert_eq!(harness.outcomes(), vec![Outcome::Success]);
    }

    #[test]
    fn test_lifecycle_releases_listeners_before_firing() {
        let mut harness = Harness::new();
        let mut lifecycle = Lifecycle::new(harness.completion());

        {
            let mut ctx = harness.ctx();
            lifecycle.listen(&mut ctx, ListenerKind::Keyboard);
            lifecycle.listen(&mut ctx, ListenerKind::Pointer);
        }
        assert_eq!(harness.input.len(), 2);

        let mut ctx = harness.ctx();
        lifecycle.finish(&mut ctx, Outcome::Failure);
        lifecycle.finish(&mut ctx, Outcome::Success);

        assert!(harness.input.is_empty());
        assert!(lifecycle.is_finished());
        assert_eq!(harness.outcomes(), vec![Outcome::Failure]);
    }

    #[test]
    fn test_countdown() {
        let mut clock = Countdown::new(40);
        clock.advance(16);
        clock.advance(16);
        assert!(!clock.expired());
        assert_eq!(clock.remaining_ms(), 8);
        clock.advance(16);
        assert!(clock.expired());
        assert_eq!(clock.remaining_ms(), 0);
    }

    #[test]
    fn test_factory_by_game_type() {
        let harness = Harness::new();
        for (game_type, expected) in [
            (GameType::Rhythm, true),
            (GameType::Stealth, true),
            (GameType::Aim, true),
            (GameType::Dodge, true),
            (GameType::Strategy, true),
            (GameType::Unknown, false),
        ] {
            let definition = MiniGameDefinition::new("mg", game_type, Difficulty::Easy);
            let game = create_minigame(&definition, harness.completion());
            assert_eq!(game.is_some(), expected, "{game_type:?}");
            if let Some(game) = game {
                assert_eq!(game.game_type(), game_type);
            }
        }
    }

    #[test]
    fn test_outcome_from_bool() {
        assert_eq!(Outcome::from(true), Outcome::Success);
        assert!(!Outcome::from(false).is_success());
    }
}
