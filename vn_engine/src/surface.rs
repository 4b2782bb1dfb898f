//! Drawing surface lent to a running minigame.

use serde::{Deserialize, Serialize};

use crate::minigame::{Circle, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BACKDROP: Color = Color::rgb(0x1a, 0x1a, 0x2e);
    pub const PLAYER: Color = Color::rgb(0x4f, 0xc3, 0xf7);
    pub const HAZARD: Color = Color::rgb(0xff, 0x6b, 0x6b);
    pub const GOAL: Color = Color::rgb(0x4c, 0xaf, 0x50);
}

/// Immediate-mode drawing target with an 800x600 logical canvas.
pub trait Surface {
    /// Start a new frame filled with `color`.
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, origin: Vec2, width: f32, height: f32, color: Color);

    fn fill_circle(&mut self, circle: &Circle, color: Color);

    /// Single line of status text under the canvas.
    fn set_status(&mut self, text: &str);

    /// Replace the canvas with a titled prompt offering `options`.
    fn show_prompt(&mut self, title: &str, description: &str, options: &[&str]);
}

/// A prompt as last shown on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prompt {
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
}

/// Headless surface that remembers what was drawn.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    /// Number of frames started with [`Surface::clear`].
    pub frames: usize,
    /// Circles drawn since the last clear.
    pub circles: Vec<(Circle, Color)>,
    pub rects: usize,
    pub status: Option<String>,
    pub prompt: Option<Prompt>,
}

impl Surface for RecordingSurface {
    fn clear(&mut self, _color: Color) {
        self.frames += 1;
        self.circles.clear();
        self.rects = 0;
    }

    fn fill_rect(&mut self, _origin: Vec2, _width: f32, _height: f32, _color: Color) {
        self.rects += 1;
    }

    fn fill_circle(&mut self, circle: &Circle, color: Color) {
        self.circles.push((*circle, color));
    }

    fn set_status(&mut self, text: &str) {
        self.status = Some(text.to_string());
    }

    fn show_prompt(&mut self, title: &str, description: &str, options: &[&str]) {
        self.prompt = Some(Prompt {
            title: title.to_string(),
            description: description.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        });
    }
}
