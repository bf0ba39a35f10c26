use crate::border::Border;
use crate::config::GameConfig;
use crate::entity::{Axis, Direction, Position};
use crate::error::SpliceError;
use crate::trail::Trail;
use rand::Rng;
use tracing::debug;

/// What a single tick did to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Idle,
    Blocked,
    Moved,
    Teleported,
    /// The trail no longer started on the boundary and was begun afresh.
    TrailRestarted,
    Claimed,
    ClaimRejected(SpliceError),
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Position,
    pub speed: i32,
    pub lives: u32,
    velocity: (i32, i32),
    axis: Option<Axis>,
    trail: Trail,
    teleport_pending: bool,
    teleport_step: i32,
}

impl Player {
    pub fn new(position: Position, speed: i32, lives: u32, teleport_step: i32) -> Self {
        Self {
            position,
            speed,
            lives,
            velocity: (0, 0),
            axis: None,
            trail: Trail::starting_at(position),
            teleport_pending: false,
            teleport_step,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.player_start,
            config.player_speed,
            config.lives,
            config.teleport_step,
        )
    }

    pub fn is_dead(&self) -> bool {
        self.lives == 0
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != (0, 0)
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// The trail as drawn on screen, running up to the current position.
    pub fn live_trail(&self) -> Trail {
        self.trail.with_live_end(self.position)
    }

    /// Start moving in `direction`. Turning onto the other axis marks a
    /// corner in the trail.
    pub fn steer(&mut self, direction: Direction) {
        if self.axis != Some(direction.axis()) {
            self.trail.add_endpoint(self.position);
        }
        self.axis = Some(direction.axis());
        self.velocity = direction.delta(self.speed);
    }

    pub fn stop(&mut self) {
        self.velocity = (0, 0);
    }

    /// Abandon the trail and jump somewhere random on the next tick.
    pub fn teleport(&mut self) {
        self.axis = None;
        self.trail.clear();
        self.stop();
        self.teleport_pending = true;
    }

    /// Send the player back to `position` with a fresh trail.
    pub fn respawn(&mut self, position: Position) {
        self.position = position;
        self.stop();
        self.teleport_pending = false;
        self.restart_trail();
    }

    pub fn update<R: Rng + ?Sized>(&mut self, border: &mut Border, rng: &mut R) -> Movement {
        if self.teleport_pending {
            self.teleport_pending = false;
            self.position = border.random_valid_position(self.teleport_step, rng);
            return Movement::Teleported;
        }
        if !self.is_moving() {
            return Movement::Idle;
        }

        let next = self.position.offset(self.velocity);
        if !border.contains_point(next, 1.0) {
            debug!(x = next.x, y = next.y, "move leaves the field");
            return Movement::Blocked;
        }
        self.position = next;

        if let Some(first) = self.trail.first_point() {
            if border.contains_point(first, -1.0) {
                self.restart_trail();
                return Movement::TrailRestarted;
            }
        }

        if border.is_on_edges(self.position) {
            if self.trail.is_empty() {
                self.restart_trail();
                return Movement::Moved;
            }
            let outcome = border.splice(&mut self.trail, self.position);
            self.restart_trail();
            return match outcome {
                Ok(()) => Movement::Claimed,
                Err(err) => Movement::ClaimRejected(err),
            };
        }

        self.trail.backtrack_to(self.position);
        Movement::Moved
    }

    /// Whether an enemy at `at` touches the trail being drawn.
    pub fn trail_hit(&self, at: Position, radius: i32) -> bool {
        !self.trail.is_empty() && self.live_trail().contains_point(at, radius, true)
    }

    /// Aftermath of a collision. With `return_to_start` the player goes back
    /// to where the trail began and keeps drawing from there.
    pub fn reset_after_hit(&mut self, return_to_start: bool, lose_life: bool) {
        let start = if return_to_start {
            self.trail.first_point()
        } else {
            None
        };
        self.trail.clear();
        if let Some(start) = start {
            self.position = start;
            self.restart_trail();
        }
        if lose_life {
            self.lives = self.lives.saturating_sub(1);
        }
    }

    fn restart_trail(&mut self) {
        self.trail = Trail::starting_at(self.position);
        self.axis = None;
    }
}
