use crate::border::Border;
use rand::RngCore;

/// A point on the integer field grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved(&self, direction: Direction) -> Self {
        self.offset(direction.delta(1))
    }

    pub fn offset(&self, (dx, dy): (i32, i32)) -> Self {
        Position::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }

    /// Per-tick displacement when moving `speed` units this way.
    pub fn delta(&self, speed: i32) -> (i32, i32) {
        match self {
            Direction::Up => (0, -speed),
            Direction::Down => (0, speed),
            Direction::Left => (-speed, 0),
            Direction::Right => (speed, 0),
        }
    }
}

/// The axis a stroke is currently drawn along. A new trail corner is only
/// recorded when the axis changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

pub trait Enemy {
    fn position(&self) -> Position;
    fn update(&mut self, border: &Border, rng: &mut dyn RngCore);
    /// Relocate after a direct hit on the player.
    fn teleport(&mut self, border: &Border, rng: &mut dyn RngCore);
}

/// Free-roaming enemy: walks toward a random target inside the open field
/// and picks a new one once it arrives or the target gets claimed.
#[derive(Debug, Clone)]
pub struct Qix {
    pub position: Position,
    pub target: Position,
    pub speed: i32,
}

impl Qix {
    pub fn new(position: Position, speed: i32) -> Self {
        Self {
            position,
            target: position,
            speed,
        }
    }

    pub fn choose_target(&mut self, border: &Border, rng: &mut dyn RngCore) {
        self.target = border.random_valid_position(1, rng);
    }
}

impl Enemy for Qix {
    fn position(&self) -> Position {
        self.position
    }

    fn update(&mut self, border: &Border, rng: &mut dyn RngCore) {
        if self.target == self.position || !border.contains_point(self.target, 1.0) {
            self.choose_target(border, rng);
        }

        let dx = self.target.x - self.position.x;
        let dy = self.target.y - self.position.y;
        self.position.x += dx.signum() * dx.abs().min(self.speed);
        self.position.y += dy.signum() * dy.abs().min(self.speed);
    }

    fn teleport(&mut self, border: &Border, rng: &mut dyn RngCore) {
        self.choose_target(border, rng);
        self.position = self.target;
    }
}

/// Patrol enemy that only ever moves along the boundary edges.
#[derive(Debug, Clone)]
pub struct Sparx {
    pub position: Position,
    pending_teleport: bool,
}

impl Sparx {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            pending_teleport: false,
        }
    }
}

impl Enemy for Sparx {
    fn position(&self) -> Position {
        self.position
    }

    fn update(&mut self, border: &Border, rng: &mut dyn RngCore) {
        self.position = if self.pending_teleport {
            self.pending_teleport = false;
            border.random_edge_position(1, rng)
        } else {
            border.next_patrol_position(self.position, rng)
        };
    }

    // Deferred to the next tick so the hit frame still shows the collision.
    fn teleport(&mut self, _border: &Border, _rng: &mut dyn RngCore) {
        self.pending_teleport = true;
    }
}
