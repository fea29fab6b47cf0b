//! Game state and core simulation types
//!
//! One `GameState` per game instance; nothing here is process-global, so
//! tests can run several games side by side.

use glam::Vec2;

use crate::consts::*;

/// Current mode of the state machine
///
/// Exactly one mode is active per game. Transitions happen only through the
/// methods on [`GameState`]; physics drives only the Playing -> GameOver edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Title screen with START / SETTINGS / QUIT
    Menu,
    /// Missile launch sequence between START and gameplay
    Launching,
    /// Active gameplay
    Playing,
    /// Gameplay frozen
    Paused,
    /// Volume panel; remembers the mode it was entered from
    Settings,
    /// Run ended, waiting for RETURN TO MENU
    GameOver,
}

/// The ball. One instance; reset in place on life loss.
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn at_spawn() -> Self {
        Self {
            pos: BALL_SPAWN_POS,
            vel: BALL_START_VEL,
            radius: BALL_RADIUS,
        }
    }

    /// Back to spawn position and baseline velocity (speed-ups not carried)
    pub fn reset(&mut self) {
        self.pos = BALL_SPAWN_POS;
        self.vel = BALL_START_VEL;
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// The player's paddle. Only x is player-controlled; y is fixed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paddle {
    pub x: f32,
}

impl Paddle {
    /// Move toward the pointer-derived target, clamped to the arena
    pub fn set_target(&mut self, x: f32) {
        self.x = x.clamp(-PADDLE_LIMIT_X, PADDLE_LIMIT_X);
    }
}

/// A destructible brick. Row index determines its color tier.
#[derive(Debug, Clone, Copy)]
pub struct Brick {
    pub pos: Vec2,
    pub row: usize,
    pub color: u32,
}

/// Score / lives / level bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
        }
    }
}

impl Session {
    pub fn award_brick(&mut self) {
        self.score += BRICK_SCORE;
    }

    /// Decrement lives (never below zero); returns lives remaining
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn next_level(&mut self) {
        self.level += 1;
    }
}

/// Complete state for one game instance
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: Mode,
    /// Mode to return to when leaving Settings
    settings_return: Mode,
    pub session: Session,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Live bricks of the current wave, oldest first
    pub bricks: Vec<Brick>,
    /// Frames simulated while Playing
    pub time_ticks: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh game at the menu
    pub fn new() -> Self {
        Self {
            mode: Mode::Menu,
            settings_return: Mode::Menu,
            session: Session::default(),
            ball: Ball::at_spawn(),
            paddle: Paddle::default(),
            bricks: Vec::new(),
            time_ticks: 0,
        }
    }

    /// Populate a full wave grid (5 rows x 10 cols), row 0 at the bottom
    pub fn spawn_wave(&mut self) {
        let total_width =
            BRICK_COLS as f32 * BRICK_WIDTH + (BRICK_COLS - 1) as f32 * BRICK_SPACING;
        let start_x = -total_width / 2.0 + BRICK_WIDTH / 2.0;

        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                self.bricks.push(Brick {
                    pos: Vec2::new(
                        start_x + col as f32 * (BRICK_WIDTH + BRICK_SPACING),
                        row as f32 * (BRICK_HEIGHT + BRICK_SPACING) + WAVE_BASE_Y,
                    ),
                    row,
                    color: ROW_COLORS[row],
                });
            }
        }
    }

    // === Mode transitions ===

    /// START clicked: menu gives way to the launch sequence
    pub fn begin_launch(&mut self) {
        debug_assert_eq!(self.mode, Mode::Menu);
        self.mode = Mode::Launching;
    }

    /// Launch sequence complete: spawn paddle, ball, and the first wave
    pub fn begin_playing(&mut self) {
        debug_assert_eq!(self.mode, Mode::Launching);
        self.paddle = Paddle::default();
        self.ball = Ball::at_spawn();
        self.bricks.clear();
        self.spawn_wave();
        self.mode = Mode::Playing;
    }

    /// Toggle Playing <-> Paused; no-op in other modes
    pub fn toggle_pause(&mut self) {
        self.mode = match self.mode {
            Mode::Playing => Mode::Paused,
            Mode::Paused => Mode::Playing,
            other => other,
        };
    }

    /// Enter Settings, recording where to come back to
    pub fn enter_settings(&mut self) {
        debug_assert!(matches!(
            self.mode,
            Mode::Menu | Mode::Playing | Mode::Paused
        ));
        self.settings_return = self.mode;
        self.mode = Mode::Settings;
    }

    /// BACK clicked: return to exactly the mode Settings was entered from
    pub fn leave_settings(&mut self) -> Mode {
        debug_assert_eq!(self.mode, Mode::Settings);
        self.mode = self.settings_return;
        self.mode
    }

    /// Lives exhausted (the one physics-driven transition)
    pub fn game_over(&mut self) {
        debug_assert_eq!(self.mode, Mode::Playing);
        self.mode = Mode::GameOver;
    }

    /// RETURN TO MENU: full reset of session and ball
    pub fn return_to_menu(&mut self) {
        debug_assert_eq!(self.mode, Mode::GameOver);
        self.session = Session::default();
        self.ball = Ball::at_spawn();
        self.bricks.clear();
        self.time_ticks = 0;
        self.mode = Mode::Menu;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_has_full_grid_with_unique_positions() {
        let mut state = GameState::new();
        state.spawn_wave();
        assert_eq!(state.bricks.len(), BRICK_ROWS * BRICK_COLS);

        for (i, a) in state.bricks.iter().enumerate() {
            for b in &state.bricks[i + 1..] {
                assert!(
                    a.pos.distance(b.pos) > 0.01,
                    "duplicate brick position {:?}",
                    a.pos
                );
            }
        }
    }

    #[test]
    fn row_determines_color() {
        let mut state = GameState::new();
        state.spawn_wave();
        for brick in &state.bricks {
            assert_eq!(brick.color, ROW_COLORS[brick.row]);
        }
    }

    #[test]
    fn settings_returns_to_entry_mode() {
        let mut state = GameState::new();
        state.begin_launch();
        state.begin_playing();

        state.enter_settings();
        assert_eq!(state.mode, Mode::Settings);
        assert_eq!(state.leave_settings(), Mode::Playing);

        state.enter_settings();
        assert_eq!(state.leave_settings(), Mode::Playing);
    }

    #[test]
    fn return_to_menu_resets_session() {
        let mut state = GameState::new();
        state.begin_launch();
        state.begin_playing();
        state.session.score = 120;
        state.session.lives = 0;
        state.session.level = 3;
        state.ball.vel = Vec2::new(0.5, -0.4);
        state.game_over();

        state.return_to_menu();
        assert_eq!(state.mode, Mode::Menu);
        assert_eq!(state.session, Session::default());
        assert_eq!(state.ball.vel, BALL_START_VEL);
        assert!(state.bricks.is_empty());
    }

    #[test]
    fn lives_never_go_negative() {
        let mut session = Session::default();
        for _ in 0..10 {
            session.lose_life();
        }
        assert_eq!(session.lives, 0);
    }
}
