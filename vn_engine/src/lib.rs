//! # VN Engine
//!
//! Traversal and presentation control for a visual novel. The engine walks
//! the script graph held by a `vn_content` source, hands views to a
//! [`Presenter`], and hosts minigames that interrupt the story.
//!
//! ## Core Components
//!
//! - **engine**: `StoryEngine`, the state machine that owns traversal
//! - **minigame**: the lifecycle contract and the five built-in variants
//! - **presenter** / **surface**: display capabilities the host implements
//! - **config**: tick length, seed and player-facing strings
//!
//! ## Design Philosophy
//!
//! - **Content-Driven**: Branching comes only from script links and collection order
//! - **Single-Threaded**: Every operation completes before the next begins
//! - **Callback-Resolved**: A minigame hands control back only through its completion

pub mod config;
pub mod engine;
pub mod error;
pub mod minigame;
pub mod presenter;
pub mod state;
pub mod surface;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use minigame::*;
pub use presenter::*;
pub use state::*;
pub use surface::*;
