use crate::entity::Position;
use crate::error::ConfigError;

/// Smallest field side that still leaves room to draw a claimable trail.
pub const MIN_FIELD_SIZE: i32 = 8;

/// Tunables for one game session.
///
/// The defaults reproduce the classic layout: a 600x600 field inset 100
/// units into an 800x800 screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub player_start: Position,
    pub player_speed: i32,
    pub lives: u32,
    pub qix_speed: i32,
    pub sparx_start: Position,
    /// Proximity, in grid units, at which an enemy hits the player or trail.
    pub collision_radius: i32,
    /// Grid granularity for teleport destinations.
    pub teleport_step: i32,
    /// Percentage that must be claimed to finish a level.
    pub level_up_score: u32,
    pub final_level: u32,
    pub sparx_from_level: u32,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            left: 100,
            top: 100,
            right: 700,
            bottom: 700,
            player_start: Position::new(400, 700),
            player_speed: 2,
            lives: 3,
            qix_speed: 1,
            sparx_start: Position::new(400, 100),
            collision_radius: 25,
            teleport_step: 20,
            level_up_score: 75,
            final_level: 2,
            sparx_from_level: 2,
            seed: None,
        }
    }
}

impl GameConfig {
    /// One grid unit per terminal cell, leaving a one-cell margin.
    pub fn for_terminal(width: i32, height: i32) -> Self {
        let right = width.max(MIN_FIELD_SIZE + 3) - 2;
        let bottom = height.max(MIN_FIELD_SIZE + 3) - 2;
        let center_x = (1 + right) / 2;
        Self {
            left: 1,
            top: 1,
            right,
            bottom,
            player_start: Position::new(center_x, bottom),
            player_speed: 1,
            sparx_start: Position::new(center_x, 1),
            collision_radius: 1,
            teleport_step: 1,
            ..Self::default()
        }
    }

    pub fn top_left(&self) -> Position {
        Position::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Position {
        Position::new(self.right, self.bottom)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.right - self.left;
        let height = self.bottom - self.top;
        if width < MIN_FIELD_SIZE || height < MIN_FIELD_SIZE {
            return Err(ConfigError::FieldTooSmall {
                width,
                height,
                min: MIN_FIELD_SIZE,
            });
        }
        if self.player_speed <= 0 {
            return Err(ConfigError::InvalidSpeed("player_speed"));
        }
        if self.qix_speed <= 0 {
            return Err(ConfigError::InvalidSpeed("qix_speed"));
        }
        if self.teleport_step <= 0 {
            return Err(ConfigError::InvalidSpeed("teleport_step"));
        }
        if !self.in_field(self.player_start) {
            return Err(ConfigError::InvalidStart("player"));
        }
        if !self.in_field(self.sparx_start) {
            return Err(ConfigError::InvalidStart("sparx"));
        }
        Ok(())
    }

    fn in_field(&self, p: Position) -> bool {
        (self.left..=self.right).contains(&p.x) && (self.top..=self.bottom).contains(&p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_terminal_layout_is_valid() {
        let config = GameConfig::for_terminal(40, 20);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.top_left(), Position::new(1, 1));
        assert_eq!(config.bottom_right(), Position::new(38, 18));
        assert_eq!(config.player_start.y, config.bottom);
        assert_eq!(config.sparx_start.y, config.top);
    }

    #[test]
    fn test_tiny_terminal_is_clamped() {
        let config = GameConfig::for_terminal(3, 3);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_small_field() {
        let config = GameConfig {
            right: 104,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FieldTooSmall { width: 4, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_speed_and_start() {
        let slow = GameConfig {
            player_speed: 0,
            ..GameConfig::default()
        };
        assert_eq!(slow.validate(), Err(ConfigError::InvalidSpeed("player_speed")));

        let outside = GameConfig {
            sparx_start: Position::new(0, 0),
            ..GameConfig::default()
        };
        assert_eq!(outside.validate(), Err(ConfigError::InvalidStart("sparx")));
    }
}
