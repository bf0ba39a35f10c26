use crate::border::Border;
use crate::config::GameConfig;
use crate::entity::{Direction, Enemy, Position, Qix, Sparx};
use crate::error::ConfigError;
use crate::player::{Movement, Player};
use crate::trail::Trail;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open,
    Claimed,
    Edge,
    Trail,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnemyKind {
    Qix,
    Sparx,
}

pub struct Game {
    pub config: GameConfig,
    pub border: Border,
    pub player: Player,
    pub qix: Qix,
    pub sparx: Sparx,
    pub state: GameState,
    pub level: u32,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = seeded_rng(config.seed);
        Ok(Self::with_rng(config, rng))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let border = Border::from_config(&config);
        let qix_start = border.random_valid_position(1, &mut rng);

        Self {
            player: Player::from_config(&config),
            qix: Qix::new(qix_start, config.qix_speed),
            sparx: Sparx::new(config.sparx_start),
            border,
            state: GameState::Playing,
            level: 1,
            config,
            rng,
        }
    }

    /// Grid columns covered by the field plus a one-unit margin.
    pub fn width(&self) -> i32 {
        self.config.right + 2
    }

    pub fn height(&self) -> i32 {
        self.config.bottom + 2
    }

    pub fn score(&self) -> u32 {
        self.border.score()
    }

    pub fn sparx_active(&self) -> bool {
        self.level >= self.config.sparx_from_level
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        self.cell_with_trail(x, y, &self.player.live_trail())
    }

    /// Like [`cell_at`](Self::cell_at), against a live trail the caller
    /// built once for the whole frame.
    pub fn cell_with_trail(&self, x: i32, y: i32, live_trail: &Trail) -> Cell {
        let point = Position::new(x, y);
        let config = &self.config;
        if x < config.left || x > config.right || y < config.top || y > config.bottom {
            return Cell::Outside;
        }
        if self.border.is_on_edges(point) {
            return Cell::Edge;
        }
        if live_trail.contains_point(point, 0, true) {
            return Cell::Trail;
        }
        if self.border.contains_point(point, 1.0) {
            Cell::Open
        } else {
            Cell::Claimed
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if self.state == GameState::Playing {
            self.player.steer(direction);
        }
    }

    pub fn stop(&mut self) {
        if self.state == GameState::Playing {
            self.player.stop();
        }
    }

    pub fn teleport(&mut self) {
        if self.state == GameState::Playing {
            self.player.teleport();
        }
    }

    pub fn update(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        let movement = self.player.update(&mut self.border, &mut self.rng);
        if movement != Movement::Idle {
            debug!(?movement, x = self.player.position.x, y = self.player.position.y, "player moved");
        }

        self.check_progress();
        if self.state != GameState::Playing {
            return;
        }

        self.qix.update(&self.border, &mut self.rng);
        self.collide(EnemyKind::Qix);

        if self.sparx_active() {
            self.sparx.update(&self.border, &mut self.rng);
            self.collide(EnemyKind::Sparx);
        }

        if self.player.is_dead() {
            self.state = GameState::Lost;
            info!(level = self.level, score = self.score(), "game over");
        }
    }

    fn check_progress(&mut self) {
        let score = self.score();
        if score <= self.config.level_up_score {
            return;
        }
        if self.level >= self.config.final_level {
            self.state = GameState::Won;
            info!(level = self.level, score, "final level cleared");
        } else {
            self.next_level();
        }
    }

    /// Direct contact costs a life and sends the enemy elsewhere. Touching
    /// the trail is handled per enemy: the qix only rewinds the player to
    /// the start of the trail, the sparx costs a life.
    fn collide(&mut self, kind: EnemyKind) {
        let radius = self.config.collision_radius;
        let enemy: &mut dyn Enemy = match kind {
            EnemyKind::Qix => &mut self.qix,
            EnemyKind::Sparx => &mut self.sparx,
        };
        let at = enemy.position();
        let player = &mut self.player;

        let direct = (at.x - player.position.x).abs() <= radius
            && (at.y - player.position.y).abs() <= radius;
        if direct {
            enemy.teleport(&self.border, &mut self.rng);
            player.reset_after_hit(kind == EnemyKind::Qix, true);
            info!(?kind, lives = player.lives, "player hit");
            return;
        }

        if player.trail_hit(at, radius) {
            match kind {
                EnemyKind::Qix => player.reset_after_hit(true, false),
                EnemyKind::Sparx => player.reset_after_hit(false, true),
            }
            info!(?kind, lives = player.lives, "trail hit");
        }
    }

    pub fn next_level(&mut self) {
        self.level += 1;
        info!(level = self.level, "level up");

        self.border.reset();
        self.player.respawn(self.config.player_start);
        self.sparx = Sparx::new(self.config.sparx_start);
        self.qix.teleport(&self.border, &mut self.rng);
    }

    pub fn reset(&mut self) {
        let rng = seeded_rng(self.config.seed);
        *self = Self::with_rng(self.config.clone(), rng);
    }
}

/// Fixed seeds replay the same game, which is what the tests rely on.
fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
