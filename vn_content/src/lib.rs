//! # VN Content
//!
//! The content side of the visual-novel engine: script nodes, characters and
//! minigame definitions, plus the repository that ingests and indexes them.
//! Records are immutable once loaded; nothing in this crate knows about
//! presentation or traversal.

pub mod character;
pub mod error;
pub mod ids;
pub mod minigame;
pub mod repository;
pub mod script;

pub use character::*;
pub use error::*;
pub use ids::*;
pub use minigame::*;
pub use repository::*;
pub use script::*;
