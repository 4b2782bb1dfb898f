//! Survival variant: stay clear of projectiles until the clock runs out.

use rand::Rng;
use std::collections::HashSet;
use vn_content::{Difficulty, GameType};

use super::{
    Circle, Completion, Countdown, GameContext, InputEvent, Key, Lifecycle, ListenerKind,
    MiniGame, Vec2, CANVAS_HEIGHT, CANVAS_WIDTH,
};
use crate::surface::Color;

const PLAYER_START: Circle = Circle::new(400.0, 300.0, 20.0);
const PLAYER_SPEED: f32 = 4.0;
const PROJECTILE_RADIUS: f32 = 15.0;
/// Distance outside the canvas at which projectiles spawn.
const SPAWN_OFFSET: f32 = 20.0;
/// Projectiles further than this outside the canvas are dropped.
const PRUNE_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DodgeTuning {
    pub survive_ms: u32,
    pub projectile_speed: f32,
    pub spawn_chance: f64,
}

impl DodgeTuning {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            survive_ms: difficulty.scale(15_000, 20_000, 25_000),
            projectile_speed: difficulty.scale(2.0, 3.0, 4.0),
            spawn_chance: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub body: Circle,
    pub velocity: Vec2,
}

#[derive(Debug)]
pub struct DodgeGame {
    tuning: DodgeTuning,
    lifecycle: Lifecycle,
    clock: Countdown,
    player: Circle,
    projectiles: Vec<Projectile>,
    held: HashSet<Key>,
}

impl DodgeGame {
    pub fn new(difficulty: Difficulty, completion: Completion) -> Self {
        let tuning = DodgeTuning::for_difficulty(difficulty);
        Self {
            tuning,
            lifecycle: Lifecycle::new(completion),
            clock: Countdown::new(tuning.survive_ms),
            player: PLAYER_START,
            projectiles: Vec::new(),
            held: HashSet::new(),
        }
    }

    pub fn player(&self) -> Circle {
        self.player
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn remaining_ms(&self) -> u32 {
        self.clock.remaining_ms()
    }

    fn steer(&mut self) {
        let mut position = self.player.center;
        if self.held.contains(&Key::ArrowUp) {
            position.y -= PLAYER_SPEED;
        }
        if self.held.contains(&Key::ArrowDown) {
            position.y += PLAYER_SPEED;
        }
        if self.held.contains(&Key::ArrowLeft) {
            position.x -= PLAYER_SPEED;
        }
        if self.held.contains(&Key::ArrowRight) {
            position.x += PLAYER_SPEED;
        }
        let size = self.player.radius;
        position.x = position.x.clamp(size, CANVAS_WIDTH - size);
        position.y = position.y.clamp(size, CANVAS_HEIGHT - size);
        self.player.center = position;
    }

    /// New projectile entering from a random edge, heading straight across.
    fn spawn(&self, rng: &mut impl Rng) -> Projectile {
        let speed = self.tuning.projectile_speed;
        let (center, velocity) = match rng.gen_range(0..4) {
            0 => (
                Vec2::new(rng.gen::<f32>() * CANVAS_WIDTH, -SPAWN_OFFSET),
                Vec2::new(0.0, speed),
            ),
            1 => (
                Vec2::new(rng.gen::<f32>() * CANVAS_WIDTH, CANVAS_HEIGHT + SPAWN_OFFSET),
                Vec2::new(0.0, -speed),
            ),
            2 => (
                Vec2::new(-SPAWN_OFFSET, rng.gen::<f32>() * CANVAS_HEIGHT),
                Vec2::new(speed, 0.0),
            ),
            _ => (
                Vec2::new(CANVAS_WIDTH + SPAWN_OFFSET, rng.gen::<f32>() * CANVAS_HEIGHT),
                Vec2::new(-speed, 0.0),
            ),
        };
        Projectile {
            body: Circle {
                center,
                radius: PROJECTILE_RADIUS,
            },
            velocity,
        }
    }

    fn report_remaining(&self, ctx: &mut GameContext<'_>) {
        let seconds = self.clock.remaining_ms() as f32 / 1000.0;
        ctx.surface.set_status(&format!("Survive: {seconds:.1}s"));
    }
}

impl MiniGame for DodgeGame {
    fn game_type(&self) -> GameType {
        GameType::Dodge
    }

    fn start(&mut self, ctx: &mut GameContext<'_>) {
        self.lifecycle.listen(ctx, ListenerKind::Keyboard);
        self.report_remaining(ctx);
        ctx.surface.clear(Color::BACKDROP);
        ctx.surface.fill_circle(&self.player, Color::PLAYER);
    }

    fn tick(&mut self, ctx: &mut GameContext<'_>) {
        if self.lifecycle.is_finished() {
            return;
        }
        self.report_remaining(ctx);
        if self.clock.expired() {
            self.lifecycle.finish(ctx, true.into());
            return;
        }

        self.steer();
        for projectile in &mut self.projectiles {
            projectile.body.center += projectile.velocity;
        }
        if self.projectiles.iter().any(|p| p.body.overlaps(&self.player)) {
            self.lifecycle.finish(ctx, false.into());
            return;
        }
        self.projectiles.retain(|p| !p.body.beyond_canvas(PRUNE_MARGIN));

        ctx.surface.clear(Color::BACKDROP);
        ctx.surface.fill_circle(&self.player, Color::PLAYER);
        for projectile in &self.projectiles {
            ctx.surface.fill_circle(&projectile.body, Color::HAZARD);
        }

        self.clock.advance(ctx.tick_ms);
        if ctx.rng.gen_bool(self.tuning.spawn_chance) {
            let projectile = self.spawn(&mut *ctx.rng);
            self.projectiles.push(projectile);
        }
    }

    fn handle_input(&mut self, event: &InputEvent, _ctx: &mut GameContext<'_>) {
        match event {
            InputEvent::KeyDown(key) => {
                self.held.insert(*key);
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(key);
            }
            _ => {}
        }
    }

    fn is_finished(&self) -> bool {
        self.lifecycle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minigame::test_support::Harness;
    use crate::minigame::Outcome;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_survival_wins() {
        let mut harness = Harness::new();
        let mut game = DodgeGame::new(Difficulty::Easy, harness.completion());
        game.tuning.spawn_chance = 0.0;
        game.start(&mut harness.ctx());
        assert_eq!(harness.surface.status.as_deref(), Some("Survive: 15.0s"));

        let ticks = harness.run(&mut game, 5_000);
        // 15000 / 16 rounds up to 938 steps, plus the one that sees the clock out.
        assert_eq!(ticks, 939);
        assert_eq!(harness.outcomes(), vec![Outcome::Success]);
        assert_eq!(harness.surface.status.as_deref(), Some("Survive: 0.0s"));
        assert!(harness.input.is_empty());
    }

    #[test]
    fn test_remaining_time_reported_each_tick() {
        let mut harness = Harness::new();
        let mut game = DodgeGame::new(Difficulty::Hard, harness.completion());
        game.tuning.spawn_chance = 0.0;
        game.start(&mut harness.ctx());

        for _ in 0..63 {
            game.tick(&mut harness.ctx());
        }
        assert_eq!(game.remaining_ms(), 25_000 - 63 * 16);
        assert_eq!(harness.surface.status.as_deref(), Some("Survive: 24.0s"));
    }

    #[test]
    fn test_projectile_contact_loses() {
        let mut harness = Harness::new();
        let mut game = DodgeGame::new(Difficulty::Medium, harness.completion());
        game.start(&mut harness.ctx());
        game.projectiles.push(Projectile {
            body: Circle::new(430.0, 300.0, PROJECTILE_RADIUS),
            velocity: Vec2::new(-3.0, 0.0),
        });

        game.tick(&mut harness.ctx());
        assert_eq!(harness.outcomes(), vec![Outcome::Failure]);
        assert!(harness.input.is_empty());
        assert!(game.is_finished());
    }

    #[test]
    fn test_offscreen_projectiles_pruned() {
        let mut harness = Harness::new();
        let mut game = DodgeGame::new(Difficulty::Easy, harness.completion());
        game.tuning.spawn_chance = 0.0;
        game.start(&mut harness.ctx());
        game.projectiles.push(Projectile {
            body: Circle::new(849.0, 100.0, PROJECTILE_RADIUS),
            velocity: Vec2::new(2.0, 0.0),
        });

        game.tick(&mut harness.ctx());
        assert!(game.projectiles().is_empty());
    }

    #[test]
    fn test_spawned_projectiles_head_inward() {
        let game = DodgeGame::new(Difficulty::Hard, Harness::new().completion());
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let p = game.spawn(&mut rng);
            let next = p.body.center + Vec2::new(p.velocity.x * 10.0, p.velocity.y * 10.0);
            let center = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
            assert!(next.distance(center) < p.body.center.distance(center));
            assert_eq!(p.velocity.x.abs() + p.velocity.y.abs(), 4.0);
        }
    }

    #[test]
    fn test_player_stays_inside_canvas() {
        let mut harness = Harness::new();
        let mut game = DodgeGame::new(Difficulty::Easy, harness.completion());
        game.tuning.spawn_chance = 0.0;
        game.start(&mut harness.ctx());

        game.handle_input(&InputEvent::KeyDown(Key::ArrowUp), &mut harness.ctx());
        for _ in 0..200 {
            game.tick(&mut harness.ctx());
        }
        assert_eq!(game.player().center.y, 20.0);
    }
}
