//! Binary-decision variant: no simulation, the player picks one of two
//! courses and either pick resolves the minigame.

use vn_content::{GameType, MiniGameDefinition};

use super::{Completion, GameContext, InputEvent, Lifecycle, ListenerKind, MiniGame, Outcome};

const PROMPT: &str = "A matter of strategy. Choose wisely.";
const OPTIONS: [&str; 2] = ["Option A: Act boldly", "Option B: Play it safe"];

#[derive(Debug)]
pub struct StrategyGame {
    title: String,
    lifecycle: Lifecycle,
}

impl StrategyGame {
    pub fn new(definition: &MiniGameDefinition, completion: Completion) -> Self {
        Self {
            title: definition.description.clone(),
            lifecycle: Lifecycle::new(completion),
        }
    }
}

impl MiniGame for StrategyGame {
    fn game_type(&self) -> GameType {
        GameType::Strategy
    }

    fn start(&mut self, ctx: &mut GameContext<'_>) {
        self.lifecycle.listen(ctx, ListenerKind::Selection);
        ctx.surface.show_prompt(&self.title, PROMPT, &OPTIONS);
    }

    fn handle_input(&mut self, event: &InputEvent, ctx: &mut GameContext<'_>) {
        // Either pick resolves the minigame; the outcome only selects the
        // result text.
        let outcome = match event {
            InputEvent::Select(0) => Outcome::Success,
            InputEvent::Select(1) => Outcome::Failure,
            _ => return,
        };
        self.lifecycle.finish(ctx, outcome);
    }

    fn is_finished(&self) -> bool {
        self.lifecycle.is_finished()
    }
}
