use crate::entity::Position;
use crate::line::Line;
use std::fmt;

/// Trails shorter than this never claim anything.
pub const MIN_TRAIL_LENGTH: f64 = 4.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    lines: Vec<Line>,
}

impl Trail {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Trail starting (open) at `point`.
    pub fn starting_at(point: Position) -> Self {
        let mut trail = Self::new();
        trail.add_endpoint(point);
        trail
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn last_line(&self) -> Option<&Line> {
        self.lines.last()
    }

    pub fn first_point(&self) -> Option<Position> {
        self.lines.first().map(|line| line.start)
    }

    pub fn last_point(&self) -> Option<Position> {
        self.lines.last().map(|line| line.end)
    }

    pub fn total_length(&self) -> f64 {
        self.lines.iter().map(Line::distance).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Overwrite the end of the last line without opening a new one.
    pub fn set_last_point(&mut self, point: Position) {
        if let Some(last) = self.lines.last_mut() {
            last.end = point;
        }
    }

    /// Close the open line at `point` and open a new one there.
    pub fn add_endpoint(&mut self, point: Position) {
        self.set_last_point(point);
        self.lines.push(Line::at(point));
    }

    /// Live per-step update. Stepping onto an earlier part of the trail cuts
    /// everything drawn after that point away.
    pub fn append_point(&mut self, point: Position) {
        if !self.backtrack_to(point) {
            self.add_endpoint(point);
        }
    }

    /// Append every point in order, then drop the trailing open line.
    pub fn append_points<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Position>,
    {
        for point in points {
            self.append_point(point);
        }
        self.lines.pop();
    }

    /// Truncate the trail at the first closed line containing `point` and
    /// reopen it there. Returns false if no closed line contains `point`.
    pub fn backtrack_to(&mut self, point: Position) -> bool {
        let closed = self.lines.len().saturating_sub(1);
        let Some(index) = self.lines[..closed]
            .iter()
            .position(|line| line.contains(point))
        else {
            return false;
        };

        self.lines.truncate(index + 1);
        self.add_endpoint(point);
        true
    }

    /// Whether `point` lies on the trail, within `tolerance` grid units.
    /// The open line is only considered when `include_open` is set.
    pub fn contains_point(&self, point: Position, tolerance: i32, include_open: bool) -> bool {
        let lines = if include_open {
            &self.lines[..]
        } else {
            &self.lines[..self.lines.len().saturating_sub(1)]
        };
        lines
            .iter()
            .any(|line| line.contains_within(point, tolerance))
    }

    /// Copy of this trail whose open line is stretched to `live`, i.e. the
    /// trail as currently drawn on screen.
    pub fn with_live_end(&self, live: Position) -> Trail {
        let mut trail = self.clone();
        trail.set_last_point(live);
        trail
    }

    /// Drop degenerate lines and collapse overlaps.
    ///
    /// Fails, leaving the trail untouched, when the trail is shorter than
    /// [`MIN_TRAIL_LENGTH`] before or after rebuilding. The rebuild replays
    /// the turning points backwards through [`append_points`](Self::append_points)
    /// and then flips the result, so the trail keeps its direction.
    pub fn prune(&mut self) -> bool {
        if self.total_length() < MIN_TRAIL_LENGTH {
            return false;
        }
        let Some(first) = self.first_point() else {
            return false;
        };

        let mut turning_points = vec![first];
        turning_points.extend(
            self.lines
                .iter()
                .filter(|line| !line.is_degenerate())
                .map(|line| line.end),
        );
        if turning_points.len() < 2 {
            return false;
        }

        let mut rebuilt = Trail::new();
        rebuilt.append_points(turning_points.into_iter().rev());
        if rebuilt.total_length() < MIN_TRAIL_LENGTH {
            return false;
        }

        self.lines = Trail::reverse_of(&rebuilt.lines);
        true
    }

    /// First point followed by the end of every line.
    pub fn points(&self) -> Vec<Position> {
        let mut points = Vec::with_capacity(self.lines.len() + 1);
        if let Some(first) = self.first_point() {
            points.push(first);
        }
        points.extend(self.lines.iter().map(|line| line.end));
        points
    }

    /// The same path walked from the other end.
    pub fn reverse_of(lines: &[Line]) -> Vec<Line> {
        lines.iter().rev().map(Line::reversed).collect()
    }

    /// Order of `a` and `b` along the single edge that contains both.
    pub fn compare_point_order_across_lines(
        edges: &[Line],
        a: Position,
        b: Position,
    ) -> Option<bool> {
        edges
            .iter()
            .find(|edge| edge.contains(a) && edge.contains(b))
            .and_then(|edge| edge.compare_point_order(a, b))
    }
}

impl fmt::Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trail[")?;
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{line}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_add_endpoint_opens_new_line() {
        let mut trail = Trail::starting_at(p(0, 0));
        assert_eq!(trail.len(), 1);
        assert!(trail.last_line().is_some_and(Line::is_degenerate));

        trail.add_endpoint(p(0, 10));
        assert_eq!(trail.lines(), &[Line::new(p(0, 0), p(0, 10)), Line::at(p(0, 10))]);
        assert_eq!(trail.last_point(), Some(p(0, 10)));
    }

    #[test]
    fn test_backtrack_collapses_overlap() {
        let mut trail = Trail::new();
        trail.append_point(p(100, 100));
        trail.append_point(p(200, 100));
        trail.append_point(p(150, 100));

        assert_eq!(trail.len(), 2, "backtrack should not add a third segment");
        assert_eq!(trail.lines()[0], Line::new(p(100, 100), p(150, 100)));
        assert_eq!(trail.last_point(), Some(p(150, 100)));
    }

    #[test]
    fn test_append_points_drops_open_line() {
        let mut trail = Trail::new();
        trail.append_points([p(100, 100), p(200, 100), p(150, 100)]);
        assert_eq!(trail.points(), vec![p(100, 100), p(150, 100)]);
    }

    #[test]
    fn test_backtrack_discards_later_segments() {
        let mut trail = Trail::new();
        trail.append_points([p(0, 0), p(10, 0), p(10, 10), p(5, 10), p(5, 0)]);
        // (5, 0) lies on the first line, so everything after it is cut away.
        assert_eq!(trail.points(), vec![p(0, 0), p(5, 0)]);
    }

    #[test]
    fn test_backtrack_ignores_open_line() {
        let mut trail = Trail::starting_at(p(0, 0));
        trail.set_last_point(p(0, 8));
        assert!(!trail.backtrack_to(p(0, 4)));
        assert!(!trail.contains_point(p(0, 4), 0, false));
        assert!(trail.contains_point(p(0, 4), 0, true));
    }

    #[test]
    fn test_contains_point_with_tolerance() {
        let mut trail = Trail::new();
        trail.append_points([p(0, 0), p(10, 0), p(10, 10)]);
        assert!(!trail.contains_point(p(5, 3), 0, true));
        assert!(trail.contains_point(p(5, 3), 3, true));
    }

    #[test]
    fn test_with_live_end_leaves_original_untouched() {
        let mut trail = Trail::starting_at(p(0, 0));
        trail.add_endpoint(p(0, 10));

        let live = trail.with_live_end(p(7, 10));

        assert_eq!(live.last_point(), Some(p(7, 10)));
        assert_eq!(trail.last_point(), Some(p(0, 10)));
    }

    #[test]
    fn test_prune_rejects_short_trail() {
        let mut trail = Trail::starting_at(p(400, 100));
        trail.set_last_point(p(401, 100));
        let before = trail.clone();

        assert!(!trail.prune());
        assert_eq!(trail, before);
    }

    #[test]
    fn test_prune_drops_degenerate_lines_and_keeps_direction() {
        let mut trail = Trail::starting_at(p(0, 0));
        trail.add_endpoint(p(0, 0));
        trail.add_endpoint(p(0, 10));
        trail.add_endpoint(p(0, 10));
        trail.set_last_point(p(10, 10));

        assert!(trail.prune());
        assert_eq!(trail.points(), vec![p(0, 0), p(0, 10), p(10, 10)]);
        assert!(trail.lines().iter().all(|line| !line.is_degenerate()));
    }

    #[test]
    fn test_prune_fails_when_rebuild_collapses() {
        // Out and straight back: long enough, but encloses nothing.
        let mut trail = Trail::starting_at(p(0, 0));
        trail.add_endpoint(p(10, 0));
        trail.set_last_point(p(0, 0));

        assert!(!trail.prune());
    }

    #[test]
    fn test_total_length() {
        let mut trail = Trail::new();
        trail.append_points([p(0, 0), p(0, 10), p(4, 10)]);
        assert_eq!(trail.total_length(), 14.0);
        assert_eq!(Trail::new().total_length(), 0.0);
    }

    #[test]
    fn test_points_of_empty_trail() {
        assert!(Trail::new().points().is_empty());
        assert_eq!(Trail::new().first_point(), None);
    }

    #[test]
    fn test_reverse_of() {
        let lines = vec![Line::new(p(0, 0), p(0, 5)), Line::new(p(0, 5), p(3, 5))];
        let reversed = Trail::reverse_of(&lines);
        assert_eq!(
            reversed,
            vec![Line::new(p(3, 5), p(0, 5)), Line::new(p(0, 5), p(0, 0))]
        );
        assert_eq!(Trail::reverse_of(&reversed), lines);
    }

    #[test]
    fn test_compare_point_order_across_lines() {
        let edges = vec![
            Line::new(p(100, 100), p(700, 100)),
            Line::new(p(700, 100), p(700, 700)),
        ];
        assert_eq!(
            Trail::compare_point_order_across_lines(&edges, p(200, 100), p(300, 100)),
            Some(true)
        );
        assert_eq!(
            Trail::compare_point_order_across_lines(&edges, p(700, 500), p(700, 200)),
            Some(false)
        );
        assert_eq!(
            Trail::compare_point_order_across_lines(&edges, p(200, 100), p(700, 500)),
            None
        );
    }

    #[test]
    fn test_display() {
        let mut trail = Trail::new();
        trail.append_points([p(0, 0), p(0, 5), p(2, 5)]);
        assert_eq!(trail.to_string(), "Trail[(0, 0)->(0, 5) -> (0, 5)->(2, 5)]");
    }
}
