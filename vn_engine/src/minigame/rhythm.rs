//! Timed-reaction variant: notes fall down a single lane and must be hit in
//! the strike zone before the round ends.

use rand::Rng;
use vn_content::{Difficulty, GameType};

use super::{
    Circle, Completion, Countdown, GameContext, InputEvent, Key, Lifecycle, ListenerKind,
    MiniGame, Vec2,
};
use crate::surface::Color;

const LANE_X: f32 = 400.0;
const NOTE_RADIUS: f32 = 20.0;
/// Notes strictly between these heights can be hit.
const STRIKE_ZONE: (f32, f32) = (500.0, 580.0);
const PRUNE_Y: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RhythmTuning {
    pub duration_ms: u32,
    pub target_hits: u32,
    /// Units a note falls per tick.
    pub fall_speed: f32,
    /// Chance of a new note on each tick.
    pub spawn_chance: f64,
}

impl RhythmTuning {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            duration_ms: 30_000,
            target_hits: difficulty.scale(10, 15, 20),
            fall_speed: difficulty.scale(2.0, 3.0, 4.0),
            spawn_chance: 0.02,
        }
    }
}

#[derive(Debug)]
pub struct RhythmGame {
    tuning: RhythmTuning,
    lifecycle: Lifecycle,
    clock: Countdown,
    notes: Vec<Circle>,
    hits: u32,
}

impl RhythmGame {
    pub fn new(difficulty: Difficulty, completion: Completion) -> Self {
        let tuning = RhythmTuning::for_difficulty(difficulty);
        Self {
            tuning,
            lifecycle: Lifecycle::new(completion),
            clock: Countdown::new(tuning.duration_ms),
            notes: Vec::new(),
            hits: 0,
        }
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    fn status(&self) -> String {
        format!("Score: {} | Target: {}", self.hits, self.tuning.target_hits)
    }

    fn draw(&self, ctx: &mut GameContext<'_>) {
        ctx.surface.clear(Color::BACKDROP);
        ctx.surface
            .fill_rect(Vec2::new(LANE_X - 50.0, 550.0), 100.0, 10.0, Color::PLAYER);
        for note in &self.notes {
            ctx.surface.fill_circle(note, Color::HAZARD);
        }
    }
}

impl MiniGame for RhythmGame {
    fn game_type(&self) -> GameType {
        GameType::Rhythm
    }

    fn start(&mut self, ctx: &mut GameContext<'_>) {
        self.lifecycle.listen(ctx, ListenerKind::Keyboard);
        ctx.surface.set_status("Score: 0 | Press Space to hit the notes!");
        self.draw(ctx);
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

        for note in &mut self.notes {
            note.center.y += self.tuning.fall_speed;
        }
        self.notes.retain(|note| note.center.y <= PRUNE_Y);
        self.draw(ctx);

        self.clock.advance(ctx.tick_ms);
        if ctx.rng.gen_bool(self.tuning.spawn_chance) {
            self.notes.push(Circle::new(LANE_X, 0.0, NOTE_RADIUS));
        }
    }

    fn handle_input(&mut self, event: &InputEvent, ctx: &mut GameContext<'_>) {
        if self.lifecycle.is_finished() || *event != InputEvent::KeyDown(Key::Space) {
            return;
        }
        // Newest note in the zone wins.
        let hit = self
            .notes
            .iter()
            .rposition(|note| note.center.y > STRIKE_ZONE.0 && note.center.y < STRIKE_ZONE.1);
        if let Some(index) = hit {
            self.notes.remove(index);
            self.hits += 1;
            let status = self.status();
            ctx.surface.set_status(&status);
        }
    }

    fn is_finished(&self) -> bool {
        self.lifecycle.is_finished()
    }
}
