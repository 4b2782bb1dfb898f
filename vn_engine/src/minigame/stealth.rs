//! Avoidance-navigation variant: steer past patrolling guards to the goal.

use rand::Rng;
use std::collections::HashSet;
use vn_content::{Difficulty, GameType};

use super::{
    Circle, Completion, GameContext, InputEvent, Key, Lifecycle, ListenerKind, MiniGame, Vec2,
    CANVAS_HEIGHT, CANVAS_WIDTH,
};
use crate::surface::Color;

const PLAYER_START: Circle = Circle::new(50.0, 300.0, 20.0);
const GOAL: Circle = Circle::new(750.0, 300.0, 30.0);
const GUARD_RADIUS: f32 = 25.0;
const PLAYER_SPEED: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StealthTuning {
    pub guard_count: usize,
}

impl StealthTuning {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            guard_count: difficulty.scale(2, 3, 4),
        }
    }
}

/// A patrolling guard that bounces off the canvas edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guard {
    pub body: Circle,
    pub velocity: Vec2,
}

impl Guard {
    fn patrol(&mut self) {
        self.body.center += self.velocity;
        if self.body.center.x < 0.0 || self.body.center.x > CANVAS_WIDTH {
            self.velocity.x = -self.velocity.x;
        }
        if self.body.center.y < 0.0 || self.body.center.y > CANVAS_HEIGHT {
            self.velocity.y = -self.velocity.y;
        }
    }
}

#[derive(Debug)]
pub struct StealthGame {
    tuning: StealthTuning,
    lifecycle: Lifecycle,
    player: Circle,
    guards: Vec<Guard>,
    held: HashSet<Key>,
}

impl StealthGame {
    pub fn new(difficulty: Difficulty, completion: Completion) -> Self {
        Self {
            tuning: StealthTuning::for_difficulty(difficulty),
            lifecycle: Lifecycle::new(completion),
            player: PLAYER_START,
            guards: Vec::new(),
            held: HashSet::new(),
        }
    }

    pub fn player(&self) -> Circle {
        self.player
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
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
        position.x = position.x.clamp(0.0, CANVAS_WIDTH - size);
        position.y = position.y.clamp(0.0, CANVAS_HEIGHT - size);
        self.player.center = position;
    }

    fn draw(&self, ctx: &mut GameContext<'_>) {
        ctx.surface.clear(Color::BACKDROP);
        ctx.surface.fill_circle(&GOAL, Color::GOAL);
        for guard in &self.guards {
            ctx.surface.fill_circle(&guard.body, Color::HAZARD);
        }
        ctx.surface.fill_circle(&self.player, Color::PLAYER);
    }
}

impl MiniGame for StealthGame {
    fn game_type(&self) -> GameType {
        GameType::Stealth
    }

    fn start(&mut self, ctx: &mut GameContext<'_>) {
        self.guards = (0..self.tuning.guard_count)
            .map(|i| Guard {
                body: Circle::new(
                    200.0 + i as f32 * 150.0,
                    200.0 + ctx.rng.gen::<f32>() * 200.0,
                    GUARD_RADIUS,
                ),
                velocity: Vec2::new(
                    (ctx.rng.gen::<f32>() - 0.5) * 2.0,
                    (ctx.rng.gen::<f32>() - 0.5) * 2.0,
                ),
            })
            .collect();
        self.lifecycle.listen(ctx, ListenerKind::Keyboard);
        ctx.surface
            .set_status("Use the arrow keys to reach the green zone!");
        self.draw(ctx);
    }

    fn tick(&mut self, ctx: &mut GameContext<'_>) {
        if self.lifecycle.is_finished() {
            return;
        }

        self.steer();
        for guard in &mut self.guards {
            guard.patrol();
        }

        if self.guards.iter().any(|guard| guard.body.overlaps(&self.player)) {
            self.lifecycle.finish(ctx, false.into());
            return;
        }
        if self.player.overlaps(&GOAL) {
            self.lifecycle.finish(ctx, true.into());
            return;
        }

        self.draw(ctx);
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

    #[test]
    fn test_guard_count_scales() {
        let mut harness = Harness::new();
        for (difficulty, count) in [
            (Difficulty::Easy, 2),
            (Difficulty::Medium, 3),
            (Difficulty::Hard, 4),
        ] {
            let mut game = StealthGame::new(difficulty, harness.completion());
            game.start(&mut harness.ctx());
            assert_eq!(game.guards().len(), count);
            for (i, guard) in game.guards().iter().enumerate() {
                assert_eq!(guard.body.center.x, 200.0 + i as f32 * 150.0);
                assert!((200.0..400.0).contains(&guard.body.center.y));
            }
        }
    }

    #[test]
    fn test_arrow_keys_move_player() {
        let mut harness = Harness::new();
        let mut game = StealthGame::new(Difficulty::Easy, harness.completion());
        game.start(&mut harness.ctx());
        game.guards.clear();

        game.handle_input(&InputEvent::KeyDown(Key::ArrowRight), &mut harness.ctx());
        game.tick(&mut harness.ctx());
        assert_eq!(game.player().center, Vec2::new(53.0, 300.0));

        game.handle_input(&InputEvent::KeyUp(Key::ArrowRight), &mut harness.ctx());
        game.handle_input(&InputEvent::KeyDown(Key::ArrowUp), &mut harness.ctx());
        game.tick(&mut harness.ctx());
        assert_eq!(game.player().center, Vec2::new(53.0, 297.0));
    }

    #[test]
    fn test_player_is_clamped() {
        let mut harness = Harness::new();
        let mut game = StealthGame::new(Difficulty::Easy, harness.completion());
        game.start(&mut harness.ctx());
        game.guards.clear();
        game.player.center = Vec2::new(1.0, 300.0);

        game.handle_input(&InputEvent::KeyDown(Key::ArrowLeft), &mut harness.ctx());
        game.tick(&mut harness.ctx());
        assert_eq!(game.player().center.x, 0.0);
    }

    #[test]
    fn test_guard_contact_loses() {
        let mut harness = Harness::new();
        let mut game = StealthGame::new(Difficulty::Medium, harness.completion());
        game.start(&mut harness.ctx());
        game.guards = vec![Guard {
            body: Circle::new(60.0, 300.0, GUARD_RADIUS),
            velocity: Vec2::default(),
        }];

        game.tick(&mut harness.ctx());
        assert_eq!(harness.outcomes(), vec![Outcome::Failure]);
        assert!(harness.input.is_empty());

        game.tick(&mut harness.ctx());
        assert_eq!(harness.outcomes().len(), 1);
    }

    #[test]
    fn test_reaching_goal_wins() {
        let mut harness = Harness::new();
        let mut game = StealthGame::new(Difficulty::Hard, harness.completion());
        game.start(&mut harness.ctx());
        game.guards.clear();

        game.handle_input(&InputEvent::KeyDown(Key::ArrowRight), &mut harness.ctx());
        let ticks = harness.run(&mut game, 1_000);

        // 700 units to cover minus 50 of combined radius, 3 per tick.
        assert_eq!(ticks, 217);
        assert_eq!(harness.outcomes(), vec![Outcome::Success]);
        assert!(harness.input.is_empty());
    }

    #[test]
    fn test_guards_bounce() {
        let mut guard = Guard {
            body: Circle::new(799.5, 300.0, GUARD_RADIUS),
            velocity: Vec2::new(1.0, 0.0),
        };
        guard.patrol();
        assert_eq!(guard.velocity.x, -1.0);
    }
}
