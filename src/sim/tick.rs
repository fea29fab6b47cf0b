//! Per-frame simulation update
//!
//! One `tick` per rendered frame while Playing; velocity is applied as-is
//! with no timestep scaling. Outcomes are reported as events so the caller
//! can drive audio, effects, and the HUD without the sim knowing about them.

use glam::Vec2;

use super::collision::{self, Axis};
use super::state::{GameState, Mode};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Target paddle x in world units (from pointer position)
    pub paddle_target_x: Option<f32>,
    /// Demo mode: the paddle tracks the ball by itself
    pub idle_mode: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Ball bounced off a side wall or the ceiling
    WallHit,
    /// Ball bounced off the paddle
    PaddleHit,
    /// A brick was removed; index is its slot in the brick list at the time
    BrickDestroyed { index: usize, pos: Vec2, color: u32 },
    /// Last brick destroyed; a fresh wave was spawned
    WaveCleared { level: u32 },
    /// Ball fell past the floor with lives remaining
    BallLost { lives_left: u8 },
    /// Ball fell past the floor with no lives remaining
    GameOver,
}

/// Advance gameplay by one frame. No-op unless the state is Playing.
pub fn tick(state: &mut GameState, input: &TickInput, events: &mut Vec<Event>) {
    if state.mode != Mode::Playing {
        return;
    }
    state.time_ticks += 1;

    // Paddle: demo AI tracks the ball, otherwise follow the pointer
    if input.idle_mode {
        state.paddle.set_target(state.ball.pos.x);
    } else if let Some(target) = input.paddle_target_x {
        state.paddle.set_target(target);
    }

    // 1. Integrate
    state.ball.pos += state.ball.vel;

    // 2. Walls (side flip happens at most once per tick; the floor is not a wall)
    if collision::past_side_wall(state.ball.pos.x) {
        state.ball.vel.x = -state.ball.vel.x;
        events.push(Event::WallHit);
    }
    if collision::past_ceiling(state.ball.pos.y) {
        state.ball.vel.y = -state.ball.vel.y;
        events.push(Event::WallHit);
    }

    // 3. Paddle: force upward and add lateral english from the contact offset
    if collision::hits_paddle(state.ball.pos, state.paddle.x) {
        state.ball.vel.y = state.ball.vel.y.abs();
        state.ball.vel.x += (state.ball.pos.x - state.paddle.x) * PADDLE_ENGLISH;
        events.push(Event::PaddleHit);
    }

    // 4. Bricks, newest to oldest; at most one destroyed per tick
    for i in (0..state.bricks.len()).rev() {
        let brick = state.bricks[i];
        if let Some(axis) = collision::ball_brick_overlap(state.ball.pos, state.ball.radius, brick.pos)
        {
            match axis {
                Axis::X => state.ball.vel.x = -state.ball.vel.x,
                Axis::Y => state.ball.vel.y = -state.ball.vel.y,
            }

            state.bricks.remove(i);
            state.session.award_brick();
            events.push(Event::BrickDestroyed {
                index: i,
                pos: brick.pos,
                color: brick.color,
            });

            // 5. Wave clear: level up, speed up, respawn the grid
            if state.bricks.is_empty() {
                state.session.next_level();
                state.ball.vel *= LEVEL_SPEED_SCALE;
                state.spawn_wave();
                events.push(Event::WaveCleared {
                    level: state.session.level,
                });
            }
            break;
        }
    }

    // 6. Life loss
    if collision::below_floor(state.ball.pos.y) {
        let remaining = state.session.lose_life();
        if remaining > 0 {
            state.ball.reset();
            events.push(Event::BallLost {
                lives_left: remaining,
            });
        } else {
            state.game_over();
            events.push(Event::GameOver);
        }
    }
}
