//! The presenter boundary: everything the engine asks the display to show.
//!
//! A presenter holds no game logic. It reflects the views the engine hands
//! it and lends its minigame [`Surface`] while a variant runs.

use vn_content::{Difficulty, NodeId};

use crate::minigame::Outcome;
use crate::surface::{RecordingSurface, Surface};

/// A line of narration or dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueView {
    /// Speaker name; `None` for narration or unknown characters.
    pub speaker: Option<String>,
    /// Sprite to draw; `None` hides the character.
    pub sprite: Option<String>,
    pub text: String,
}

/// One selectable entry of a choice prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceEntry {
    /// Pass to [`StoryEngine::choose`](crate::StoryEngine::choose).
    pub index: usize,
    pub label: String,
    pub target: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicePrompt {
    pub sprite: Option<String>,
    pub entries: Vec<ChoiceEntry>,
}

/// Pre-game summary with start and skip actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniGameSummary {
    pub title: String,
    pub difficulty: Difficulty,
    pub difficulty_label: String,
    pub start_label: String,
    pub skip_label: String,
}

/// Post-game result with a continue action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub outcome: Outcome,
    pub title: String,
    pub message: String,
    pub continue_label: String,
}

/// Contents of the minigame panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiniGamePanel {
    Offer(MiniGameSummary),
    /// The panel hosts the running variant's surface.
    Running { title: String },
    Result(ResultSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndingView {
    pub title: String,
    pub text: String,
}

/// Display capability consumed by the engine.
pub trait Presenter {
    fn show_dialogue(&mut self, view: &DialogueView);
    fn hide_dialogue(&mut self);

    fn show_choices(&mut self, prompt: &ChoicePrompt);
    fn hide_choices(&mut self);

    /// Set the backdrop, or clear it with `None`.
    fn set_background(&mut self, image: Option<&str>);

    fn show_minigame_panel(&mut self, panel: &MiniGamePanel);
    fn hide_minigame_panel(&mut self);

    fn show_ending(&mut self, view: &EndingView);
    fn hide_ending(&mut self);

    /// Drawing surface lent to a running minigame.
    fn surface(&mut self) -> &mut dyn Surface;
}

/// Headless presenter that keeps the latest state of every panel.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub dialogue: Option<DialogueView>,
    pub choices: Option<ChoicePrompt>,
    pub background: Option<String>,
    pub minigame_panel: Option<MiniGamePanel>,
    pub ending: Option<EndingView>,
    pub surface: RecordingSurface,
    /// Panels in the order they were shown.
    pub shown: Vec<&'static str>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for RecordingPresenter {
    fn show_dialogue(&mut self, view: &DialogueView) {
        self.shown.push("dialogue");
        self.dialogue = Some(view.clone());
    }

    fn hide_dialogue(&mut self) {
        self.dialogue = None;
    }

    fn show_choices(&mut self, prompt: &ChoicePrompt) {
        self.shown.push("choices");
        self.choices = Some(prompt.clone());
    }

    fn hide_choices(&mut self) {
        self.choices = None;
    }

    fn set_background(&mut self, image: Option<&str>) {
        self.background = image.map(str::to_string);
    }

    fn show_minigame_panel(&mut self, panel: &MiniGamePanel) {
        self.shown.push("minigame");
        self.minigame_panel = Some(panel.clone());
    }

    fn hide_minigame_panel(&mut self) {
        self.minigame_panel = None;
    }

    fn show_ending(&mut self, view: &EndingView) {
        self.shown.push("ending");
        self.ending = Some(view.clone());
    }

    fn hide_ending(&mut self) {
        self.ending = None;
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.surface
    }
}
