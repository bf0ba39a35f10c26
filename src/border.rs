use crate::config::GameConfig;
use crate::entity::Position;
use crate::error::SpliceError;
use crate::line::Line;
use crate::trail::Trail;
use rand::Rng;
use tracing::{debug, warn};

/// Rejection sampling gives up after this many draws.
const MAX_SAMPLE_ATTEMPTS: usize = 10_000;

const DISTANCE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    init_grid: Vec<Position>,
    edge_points: Vec<Position>,
}

impl Border {
    pub fn new(top_left: Position, bottom_right: Position) -> Self {
        let (left, top) = (top_left.x, top_left.y);
        let (right, bottom) = (bottom_right.x, bottom_right.y);
        let init_grid = vec![
            Position::new(left, top),
            Position::new(right, top),
            Position::new(right, bottom),
            Position::new(left, bottom),
        ];
        Self {
            left,
            top,
            right,
            bottom,
            edge_points: init_grid.clone(),
            init_grid,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.top_left(), config.bottom_right())
    }

    /// Corners of the unclaimed field, in boundary order.
    pub fn edge_points(&self) -> &[Position] {
        &self.edge_points
    }

    pub fn edges(&self) -> Vec<Line> {
        points_to_lines(&self.edge_points)
    }

    /// The original rectangle. Never changes during a level.
    pub fn init_grid(&self) -> &[Position] {
        &self.init_grid
    }

    /// Restore the full rectangle for a new level.
    pub fn reset(&mut self) {
        self.edge_points = self.init_grid.clone();
    }

    pub fn field_area(&self) -> f64 {
        polygon_area(&self.edge_points)
    }

    pub fn perimeter(&self) -> f64 {
        self.edges().iter().map(Line::distance).sum()
    }

    /// Percentage of the original rectangle that has been claimed.
    pub fn score(&self) -> u32 {
        let max_area = polygon_area(&self.init_grid);
        if max_area <= 0.0 {
            return 0;
        }
        let claimed = (max_area - self.field_area()) / max_area * 100.0;
        claimed.round().max(0.0) as u32
    }

    /// Point-in-field test against the boundary grown by `tolerance` units.
    ///
    /// With a positive tolerance, points on the boundary itself count as
    /// inside. A negative tolerance shrinks the field instead, so only
    /// points deeper than `-tolerance` from every edge qualify.
    pub fn contains_point(&self, point: Position, tolerance: f64) -> bool {
        let distance = self.distance_to_edges(point);
        if tolerance >= 0.0 {
            distance < tolerance || self.encloses(point)
        } else {
            distance > -tolerance && self.encloses(point)
        }
    }

    /// Whether `point` lies exactly on one of the boundary edges.
    pub fn is_on_edges(&self, point: Position) -> bool {
        edge_lines(&self.edge_points).any(|edge| edge.contains(point))
    }

    /// Length of the walk from `from` to `to` along the boundary, in
    /// boundary order. Two points on the same edge are measured directly.
    pub fn traversal_distance(&self, from: Position, to: Position) -> Option<f64> {
        let edges = Self::reordered_edges(self.edges(), from)?;
        let index = Self::index_of_containing_edge(&edges, to)?;
        if index == 0 {
            return Some(Line::new(from, to).distance());
        }

        let head = Line::new(from, edges[0].end).distance();
        let middle: f64 = edges[1..index].iter().map(Line::distance).sum();
        let tail = Line::new(edges[index].start, to).distance();
        Some(head + middle + tail)
    }

    /// Merge a finished trail into the boundary.
    ///
    /// `end` is where the stroke landed back on the boundary. On success the
    /// enclosed area is cut out of the field. Whatever the outcome, a
    /// non-empty trail is cleared and the boundary only changes on success.
    pub fn splice(&mut self, trail: &mut Trail, end: Position) -> Result<(), SpliceError> {
        if trail.is_empty() {
            return Err(SpliceError::EmptyTrail);
        }

        let result = self.try_splice(trail, end);
        trail.clear();

        match result {
            Ok(()) => debug!(
                score = self.score(),
                corners = self.edge_points.len(),
                "trail spliced into boundary"
            ),
            Err(err) => debug!(%err, x = end.x, y = end.y, "splice rejected"),
        }
        result
    }

    fn try_splice(&mut self, trail: &mut Trail, end: Position) -> Result<(), SpliceError> {
        trail.set_last_point(end);
        if !trail.prune() {
            return Err(SpliceError::TooShort);
        }
        let (Some(first), Some(last)) = (trail.first_point(), trail.last_point()) else {
            return Err(SpliceError::TooShort);
        };

        let forward = self
            .is_same_direction(first, last)
            .ok_or(SpliceError::UnknownDirection)?;
        let mut edges = self.edges();
        if !forward {
            edges = Trail::reverse_of(&edges);
        }
        let edges =
            Self::reordered_edges(edges, first).ok_or(SpliceError::EndpointOffBoundary)?;
        let spliced =
            Self::spliced_points(trail, &edges).ok_or(SpliceError::EndpointOffBoundary)?;

        // Replaying through a trail collapses overlaps the concatenation may
        // have introduced where the trail grazes existing corners.
        let mut canonical = Trail::new();
        canonical.append_points(spliced);
        if !canonical.prune() || canonical.is_empty() {
            return Err(SpliceError::Collapsed);
        }

        let mut points = canonical.points();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if distinct_count(&points) < 3 {
            return Err(SpliceError::Collapsed);
        }
        if !forward {
            points.reverse();
        }

        let area = polygon_area(&points);
        if area <= 0.0 {
            return Err(SpliceError::Collapsed);
        }
        if area >= self.field_area() {
            return Err(SpliceError::NoAreaClaimed);
        }

        self.edge_points = points;
        Ok(())
    }

    /// Whether walking the boundary forward from `first` reaches `last`
    /// sooner than walking it backward.
    fn is_same_direction(&self, first: Position, last: Position) -> Option<bool> {
        let there = self.traversal_distance(first, last)?;
        let back = self.traversal_distance(last, first)?;
        if (there - back).abs() > DISTANCE_EPSILON {
            return Some(there < back);
        }
        Some(
            Trail::compare_point_order_across_lines(&self.edges(), first, last)
                .unwrap_or(first <= last),
        )
    }

    /// Boundary corners up to the trail's start, the trail itself, then the
    /// corners after the edge where the trail ends. `edges` must already be
    /// oriented and rotated to begin on the trail's first point.
    fn spliced_points(trail: &Trail, edges: &[Line]) -> Option<Vec<Position>> {
        let first_index = Self::index_of_containing_edge(edges, trail.first_point()?)?;
        let last_index = Self::index_of_containing_edge(edges, trail.last_point()?)?;

        let mut points = lines_to_points(&edges[..=first_index]);
        points.extend(trail.points());
        points.extend(lines_to_points(&edges[last_index + 1..]));
        Some(points)
    }

    pub fn index_of_containing_edge(edges: &[Line], point: Position) -> Option<usize> {
        edges.iter().position(|edge| edge.contains(point))
    }

    /// Rotate `edges` so the first edge containing `start` comes first.
    pub fn reordered_edges(mut edges: Vec<Line>, start: Position) -> Option<Vec<Line>> {
        let index = Self::index_of_containing_edge(&edges, start)?;
        edges.rotate_left(index);
        Some(edges)
    }

    /// Random grid point inside the field (boundary included).
    pub fn random_valid_position<R: Rng + ?Sized>(&self, step: i32, rng: &mut R) -> Position {
        self.sample(step, rng, |p| self.contains_point(p, 1.0))
    }

    /// Random grid point on the boundary.
    pub fn random_edge_position<R: Rng + ?Sized>(&self, step: i32, rng: &mut R) -> Position {
        self.sample(step, rng, |p| self.is_on_edges(p))
    }

    /// Where a patrol standing on `current` moves next: one unit along the
    /// boundary, turning onto the following edge at corners.
    pub fn next_patrol_position<R: Rng + ?Sized>(&self, current: Position, rng: &mut R) -> Position {
        if let Some(edges) = Self::reordered_edges(self.edges(), current) {
            let next = edges
                .iter()
                .filter(|edge| edge.contains(current))
                .find_map(|edge| edge.next_step(current));
            if let Some(next) = next {
                return next;
            }
        }
        debug!(x = current.x, y = current.y, "patrol fell off the boundary");
        self.random_edge_position(1, rng)
    }

    fn sample<R, F>(&self, step: i32, rng: &mut R, accept: F) -> Position
    where
        R: Rng + ?Sized,
        F: Fn(Position) -> bool,
    {
        let step = step.max(1);
        let columns = (self.right - self.left) / step + 1;
        let rows = (self.bottom - self.top) / step + 1;

        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let candidate = Position::new(
                self.left + step * rng.gen_range(0..columns.max(1)),
                self.top + step * rng.gen_range(0..rows.max(1)),
            );
            if accept(candidate) {
                return candidate;
            }
        }

        warn!(
            step,
            attempts = MAX_SAMPLE_ATTEMPTS,
            "random sampling failed, using a boundary corner"
        );
        let index = rng.gen_range(0..self.edge_points.len().max(1));
        self.edge_points
            .get(index)
            .copied()
            .unwrap_or(Position::new(self.left, self.top))
    }

    fn distance_to_edges(&self, point: Position) -> f64 {
        edge_lines(&self.edge_points)
            .map(|edge| segment_distance(point, &edge))
            .fold(f64::INFINITY, f64::min)
    }

    /// Even-odd ray cast. Points exactly on an edge may land either way.
    fn encloses(&self, point: Position) -> bool {
        let (px, py) = (f64::from(point.x), f64::from(point.y));
        let mut inside = false;
        for edge in edge_lines(&self.edge_points) {
            let (x1, y1) = (f64::from(edge.start.x), f64::from(edge.start.y));
            let (x2, y2) = (f64::from(edge.end.x), f64::from(edge.end.y));
            if (y1 > py) != (y2 > py) {
                let crossing = x1 + (py - y1) * (x2 - x1) / (y2 - y1);
                if px < crossing {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// Closed ring of lines through `points`, ending back at the first point.
pub fn points_to_lines(points: &[Position]) -> Vec<Line> {
    edge_lines(points).collect()
}

/// Start point of every line; the inverse of [`points_to_lines`].
pub fn lines_to_points(lines: &[Line]) -> Vec<Position> {
    lines.iter().map(|line| line.start).collect()
}

fn edge_lines(points: &[Position]) -> impl Iterator<Item = Line> + '_ {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&start, &end)| Line::new(start, end))
}

/// Unsigned shoelace area.
pub fn polygon_area(points: &[Position]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = edge_lines(points)
        .map(|edge| {
            i64::from(edge.start.x) * i64::from(edge.end.y)
                - i64::from(edge.end.x) * i64::from(edge.start.y)
        })
        .sum();
    twice.abs() as f64 / 2.0
}

fn segment_distance(point: Position, segment: &Line) -> f64 {
    let (px, py) = (f64::from(point.x), f64::from(point.y));
    let (ax, ay) = (f64::from(segment.start.x), f64::from(segment.start.y));
    let (bx, by) = (f64::from(segment.end.x), f64::from(segment.end.y));
    let (dx, dy) = (bx - ax, by - ay);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

fn distinct_count(points: &[Position]) -> usize {
    let mut sorted = points.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn border() -> Border {
        Border::new(Position::new(100, 100), Position::new(700, 700))
    }

    /// Rectangle with the bottom-left quarter claimed: an L-shaped field.
    fn claimed_corner() -> Border {
        let mut border = border();
        let mut trail = Trail::starting_at(Position::new(100, 400));
        trail.add_endpoint(Position::new(400, 400));
        border
            .splice(&mut trail, Position::new(400, 700))
            .expect("corner claim");
        border
    }

    /// Point strictly inside edge `index`, `offset` units in (wrapped).
    fn point_on_edge(edges: &[Line], index: usize, offset: i32) -> Position {
        let edge = edges[index % edges.len()];
        let length = edge.distance() as i32;
        let along = offset % (length - 1) + 1;
        let dx = (edge.end.x - edge.start.x).signum();
        let dy = (edge.end.y - edge.start.y).signum();
        edge.start.offset((dx * along, dy * along))
    }

    proptest! {
        #[test]
        fn prop_traversal_distances_sum_to_perimeter(
            top_x in 101i32..700,
            side_y in 101i32..700,
            on_left in any::<bool>(),
        ) {
            let border = border();
            let a = Position::new(top_x, 100);
            let b = Position::new(if on_left { 100 } else { 700 }, side_y);

            let there = border.traversal_distance(a, b).unwrap();
            let back = border.traversal_distance(b, a).unwrap();
            prop_assert!((there + back - border.perimeter()).abs() < 1e-6);
        }

        #[test]
        fn prop_containment_matches_rectangle(x in 0i32..800, y in 0i32..800) {
            let border = border();
            let strictly_inside = (101..700).contains(&x) && (101..700).contains(&y);
            let strictly_outside = !(100..=700).contains(&x) || !(100..=700).contains(&y);

            if strictly_inside {
                prop_assert!(border.contains_point(Position::new(x, y), 1.0));
            }
            if strictly_outside {
                prop_assert!(!border.contains_point(Position::new(x, y), 1.0));
            }
        }

        #[test]
        fn prop_traversal_sums_to_perimeter_after_claim(
            a_edge in 0usize..6,
            a_offset in 0i32..1000,
            b_edge in 0usize..6,
            b_offset in 0i32..1000,
        ) {
            prop_assume!(a_edge != b_edge);
            let border = claimed_corner();
            let edges = border.edges();
            prop_assert_eq!(edges.len(), 6);
            let a = point_on_edge(&edges, a_edge, a_offset);
            let b = point_on_edge(&edges, b_edge, b_offset);

            let there = border.traversal_distance(a, b).unwrap();
            let back = border.traversal_distance(b, a).unwrap();
            prop_assert!(
                (there + back - border.perimeter()).abs() < 1e-6,
                "{} + {} != {} for {:?} and {:?}", there, back, border.perimeter(), a, b
            );
        }

        #[test]
        fn prop_containment_matches_claimed_field(x in 0i32..800, y in 0i32..800) {
            let border = claimed_corner();
            let in_rect = (100..=700).contains(&x) && (100..=700).contains(&y);
            let claimed = x < 400 && y > 400;
            let strictly_inside = (101..700).contains(&x)
                && (101..700).contains(&y)
                && !(x <= 400 && y >= 400);

            if strictly_inside {
                prop_assert!(border.contains_point(Position::new(x, y), 1.0));
            }
            if !in_rect || claimed {
                prop_assert!(!border.contains_point(Position::new(x, y), 1.0));
            }
        }

        #[test]
        fn prop_notch_claims_its_area(
            x in 110i32..600,
            width in 10i32..90,
            depth in 10i32..300,
            backwards in any::<bool>(),
        ) {
            let mut border = border();
            let mut corners = vec![
                Position::new(x, 100),
                Position::new(x, 100 + depth),
                Position::new(x + width, 100 + depth),
                Position::new(x + width, 100),
            ];
            if backwards {
                corners.reverse();
            }
            let mut trail = Trail::new();
            for &corner in &corners[..3] {
                trail.add_endpoint(corner);
            }

            prop_assert_eq!(border.splice(&mut trail, corners[3]), Ok(()));
            let expected = 360_000.0 - f64::from(width * depth);
            prop_assert_eq!(border.field_area(), expected);
            prop_assert!(!border.contains_point(
                Position::new(x + width / 2, 100 + depth / 2),
                1.0
            ));
        }
    }
}
