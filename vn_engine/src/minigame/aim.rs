//! Target-acquisition variant: click short-lived targets before time runs out.

use rand::Rng;
use vn_content::{Difficulty, GameType};

use super::{
    Circle, Completion, Countdown, GameContext, InputEvent, Lifecycle, ListenerKind, MiniGame,
    Vec2,
};
use crate::surface::Color;

/// Ticks a target stays up.
const TARGET_LIFETIME: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimTuning {
    pub duration_ms: u32,
    pub target_hits: u32,
    pub target_radius: f32,
    pub spawn_chance: f64,
}

impl AimTuning {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            duration_ms: 20_000,
            target_hits: difficulty.scale(5, 8, 12),
            target_radius: difficulty.scale(40.0, 30.0, 20.0),
            spawn_chance: difficulty.scale(0.03, 0.035, 0.04),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub body: Circle,
    /// Ticks left before the target disappears.
    pub life: u32,
}

#[derive(Debug)]
pub struct AimGame {
    tuning: AimTuning,
    lifecycle: Lifecycle,
    clock: Countdown,
    targets: Vec<Target>,
    hits: u32,
}

impl AimGame {
    pub fn new(difficulty: Difficulty, completion: Completion) -> Self {
        let tuning = AimTuning::for_difficulty(difficulty);
        Self {
            tuning,
            lifecycle: Lifecycle::new(completion),
            clock: Countdown::new(tuning.duration_ms),
            targets: Vec::new(),
            hits: 0,
        }
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    fn status(&self) -> String {
        format!("Score: {} | Target: {}", self.hits, self.tuning.target_hits)
    }
}

impl MiniGame for AimGame {
    fn game_type(&self) -> GameType {
        GameType::Aim
    }

    fn start(&mut self, ctx: &mut GameContext<'_>) {
        self.lifecycle.listen(ctx, ListenerKind::Pointer);
        let status = self.status();
        ctx.surface.set_status(&status);
        ctx.surface.clear(Color::BACKDROP);
    }

    fn tick(&mut self, ctx: &mut GameContext<'_>) {
        if self.lifecycle.is_finished() {
            return;
        }
        if self.clock.expired() {
            let won = self.hits >= self.tuning.target_hits;
            self.lifecycle.finish(ctx, won.into());
            return;
        }

        for target in &mut self.targets {
            target.life = target.life.saturating_sub(1);
        }
        self.targets.retain(|target| target.life > 0);

        ctx.surface.clear(Color::BACKDROP);
        for target in &self.targets {
            ctx.surface.fill_circle(&target.body, Color::HAZARD);
        }

        self.clock.advance(ctx.tick_ms);
        if ctx.rng.gen_bool(self.tuning.spawn_chance) {
            let x = 50.0 + ctx.rng.gen::<f32>() * 700.0;
            let y = 50.0 + ctx.rng.gen::<f32>() * 500.0;
            self.targets.push(Target {
                body: Circle::new(x, y, self.tuning.target_radius),
                life: TARGET_LIFETIME,
            });
        }
    }

    fn handle_input(&mut self, event: &InputEvent, ctx: &mut GameContext<'_>) {
        if self.lifecycle.is_finished() {
            return;
        }
        let InputEvent::PointerDown { x, y } = *event else {
            return;
        };
        let point = Vec2::new(x, y);
        if let Some(index) = self.targets.iter().rposition(|t| t.body.contains(point)) {
            self.targets.remove(index);
            self.hits += 1;
            let status = self.status();
            ctx.surface.set_status(&status);
        }
    }

    fn is_finished(&self) -> bool {
        self.lifecycle.is_finished()
    }
}
