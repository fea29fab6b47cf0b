//! Deterministic gameplay module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One update per rendered frame (constant per-frame velocity)
//! - Stable brick iteration order (newest to oldest)
//! - No rendering, audio, or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Axis, ball_brick_overlap, hits_paddle};
pub use state::{Ball, Brick, GameState, Mode, Paddle, Session};
pub use tick::{Event, TickInput, tick};
