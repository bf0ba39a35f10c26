use crate::entity::Position;
use std::fmt;

/// Segment from `start` to `end`. A line with `start == end` is degenerate:
/// it marks a stroke whose direction is not known yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub start: Position,
    pub end: Position,
}

impl Line {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Degenerate line sitting on a single point.
    pub fn at(point: Position) -> Self {
        Self::new(point, point)
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Euclidean length.
    pub fn distance(&self) -> f64 {
        let dx = f64::from(self.end.x - self.start.x);
        let dy = f64::from(self.end.y - self.start.y);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn contains(&self, point: Position) -> bool {
        self.contains_within(point, 0)
    }

    /// True if each coordinate of `point` falls inside the line's range on
    /// that axis, widened by `tolerance` on both sides.
    pub fn contains_within(&self, point: Position, tolerance: i32) -> bool {
        in_range(point.x, self.start.x, self.end.x, tolerance)
            && in_range(point.y, self.start.y, self.end.y, tolerance)
    }

    /// First point of `other`, walking from its start, that also lies on
    /// this line.
    pub fn intersection(&self, other: &Line) -> Option<Position> {
        let mut current = other.start;
        loop {
            if self.contains(current) {
                return Some(current);
            }
            current = other.next_step(current)?;
        }
    }

    pub fn intersects(&self, other: &Line) -> bool {
        self.intersection(other).is_some()
    }

    /// Whether `a` is no farther from this line's start than `b`.
    ///
    /// Both points are expected to lie on the line, so they share the
    /// line's constant coordinate. Returns `None` when they share neither.
    pub fn compare_point_order(&self, a: Position, b: Position) -> Option<bool> {
        if a.x == b.x {
            Some((a.y - self.start.y).abs() <= (b.y - self.start.y).abs())
        } else if a.y == b.y {
            Some((a.x - self.start.x).abs() <= (b.x - self.start.x).abs())
        } else {
            None
        }
    }

    /// One grid unit from `current` toward `end`. `None` once `current` has
    /// reached the end, or when the line is a single point.
    pub fn next_step(&self, current: Position) -> Option<Position> {
        if self.is_degenerate() {
            return None;
        }
        let x = step_toward(current.x, self.start.x, self.end.x)?;
        let y = step_toward(current.y, self.start.y, self.end.y)?;
        Some(Position::new(x, y))
    }

    pub fn reversed(&self) -> Line {
        Line::new(self.end, self.start)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})->({}, {})",
            self.start.x, self.start.y, self.end.x, self.end.y
        )
    }
}

fn in_range(value: i32, a: i32, b: i32, tolerance: i32) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    lo - tolerance <= value && value <= hi + tolerance
}

fn step_toward(current: i32, from: i32, to: i32) -> Option<i32> {
    if from == to {
        Some(current)
    } else if from < to {
        (current < to).then_some(current + 1)
    } else {
        (current > to).then_some(current - 1)
    }
}
