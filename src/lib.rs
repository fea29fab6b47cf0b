//! Neon Breaker - a neon-soaked 3D Brick Breaker
//!
//! Core modules:
//! - `sim`: Deterministic gameplay (physics, collisions, session tracking)
//! - `scene`: Display-list collaborator (nodes with transform + material)
//! - `fx`: Tween engine and particle-burst effects
//! - `timeline`: Timed-event schedules on a controllable clock
//! - `ui`: Menu/settings/game-over screens and pointer hit-testing
//! - `audio`: Procedural sound synthesis (Web Audio on wasm)
//! - `hud`: Score/lives/level sink with change detection
//! - `settings`: Preferences with LocalStorage persistence on wasm
//! - `game`: The per-instance context object tying everything together

pub mod audio;
pub mod fx;
pub mod game;
pub mod hud;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod timeline;
pub mod ui;

pub use game::Game;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    // === Arena (world units, camera looking down -Z) ===
    /// Side walls at x = +/- this
    pub const WALL_X: f32 = 22.0;
    /// Ceiling
    pub const WALL_TOP_Y: f32 = 12.0;
    /// Below this the ball is lost (not a wall)
    pub const FLOOR_Y: f32 = -12.0;

    // === Ball ===
    pub const BALL_RADIUS: f32 = 0.7;
    pub const BALL_SPAWN_POS: Vec2 = Vec2::new(0.0, -9.0);
    pub const BALL_START_VEL: Vec2 = Vec2::new(0.1, 0.15);

    // === Paddle ===
    pub const PADDLE_Y: f32 = -10.0;
    /// Player-controlled x is clamped to +/- this
    pub const PADDLE_LIMIT_X: f32 = 12.0;
    /// Vertical band around PADDLE_Y that counts as a paddle hit
    pub const PADDLE_BAND: f32 = 1.0;
    /// Horizontal reach for a paddle hit (slightly under half-width + radius)
    pub const PADDLE_HIT_HALF_WIDTH: f32 = 4.6;
    /// Lateral nudge per unit of ball-to-paddle offset
    pub const PADDLE_ENGLISH: f32 = 0.05;

    // === Bricks ===
    pub const BRICK_ROWS: usize = 5;
    pub const BRICK_COLS: usize = 10;
    pub const BRICK_WIDTH: f32 = 4.0;
    pub const BRICK_HEIGHT: f32 = 1.6;
    pub const BRICK_SPACING: f32 = 0.3;
    /// Y of the bottom row of a wave
    pub const WAVE_BASE_Y: f32 = 5.0;
    /// Per-row colors, bottom row first
    pub const ROW_COLORS: [u32; BRICK_ROWS] = [0xff006e, 0x00d9ff, 0x9d4edd, 0x06ffa5, 0xffbe0b];

    // === Session ===
    pub const STARTING_LIVES: u8 = 3;
    pub const BRICK_SCORE: u64 = 10;
    /// Ball speed multiplier applied on each wave clear
    pub const LEVEL_SPEED_SCALE: f32 = 1.1;

    // === Pointer mapping ===
    /// Pointer NDC x/y scaled into world units on the UI plane
    pub const POINTER_SCALE_X: f32 = 15.0;
    pub const POINTER_SCALE_Y: f32 = 10.0;

    // === Decor ===
    pub const STAR_COUNT: usize = 200;
}

/// Map pointer NDC (-1..1 on both axes, +y up) onto the UI/world plane
#[inline]
pub fn pointer_to_world(ndc: Vec2) -> Vec2 {
    Vec2::new(
        ndc.x * consts::POINTER_SCALE_X,
        ndc.y * consts::POINTER_SCALE_Y,
    )
}

/// Convert a packed 0xRRGGBB color to rgb components in [0, 1]
#[inline]
pub fn hex_rgb(hex: u32) -> glam::Vec3 {
    glam::Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}
