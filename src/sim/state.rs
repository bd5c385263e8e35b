//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`. The driver owns one
//! instance; renderers and audio only ever see `&GameState`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, Rect};
use super::firing::FirePattern;
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to press start
    Idle,
    /// Active gameplay
    Running,
    /// Frozen mid-game
    Paused,
    /// Out of lives (terminal until reset)
    GameOver,
    /// Level target reached, waiting for "next level"
    LevelWon,
}

/// State machine inputs coming from buttons and keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Reset,
    NextLevel,
}

/// Fruit artwork used by enemies and drops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fruit {
    Apple,
    Banana,
    Orange,
    Cherry,
    /// Big bright apple worth bonus points
    MedApple,
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Small,
    Medium,
    Large,
    Boss,
}

/// Per-kind enemy stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    /// Enemies are square
    pub size: f32,
    pub health: i32,
    pub base_speed: f32,
    pub score: u64,
    pub fruit: Fruit,
}

impl EnemyKind {
    /// Regular kinds, unlocked one per level
    pub const REGULAR: [EnemyKind; 3] = [EnemyKind::Small, EnemyKind::Medium, EnemyKind::Large];

    pub const fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Small => EnemyStats {
                size: 20.0,
                health: 1,
                base_speed: 2.0,
                score: 10,
                fruit: Fruit::Apple,
            },
            EnemyKind::Medium => EnemyStats {
                size: 30.0,
                health: 2,
                base_speed: 1.5,
                score: 25,
                fruit: Fruit::Banana,
            },
            EnemyKind::Large => EnemyStats {
                size: 40.0,
                health: 3,
                base_speed: 1.0,
                score: 50,
                fruit: Fruit::Orange,
            },
            EnemyKind::Boss => EnemyStats {
                size: 60.0,
                health: 5,
                base_speed: 1.0,
                score: 100,
                fruit: Fruit::Cherry,
            },
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// Ticks of invulnerability left after a hit
    pub invulnerable_ticks: u32,
}

impl Player {
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            pos: Vec2::new(canvas_width / 2.0, canvas_height - PLAYER_BOTTOM_OFFSET),
            invulnerable_ticks: 0,
        }
    }

    pub fn size() -> Vec2 {
        Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Where new bullets appear (top-left of the bullet box)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + PLAYER_WIDTH / 2.0 - BULLET_WIDTH / 2.0,
            self.pos.y - BULLET_HEIGHT,
        )
    }

    /// Keep the ship fully on screen
    pub fn clamp_to(&mut self, canvas_width: f32) {
        self.pos.x = self.pos.x.clamp(0.0, (canvas_width - PLAYER_WIDTH).max(0.0));
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }
}

impl Bounds for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, Self::size())
    }
}

/// A player bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
}

impl Bounds for Bullet {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }
}

/// A bullet fired by an enemy (always falls straight down)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub speed: f32,
}

impl Bounds for EnemyBullet {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(ENEMY_BULLET_WIDTH, ENEMY_BULLET_HEIGHT))
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub health: i32,
    pub max_health: i32,
    /// Pixels per tick (already scaled by level)
    pub speed: f32,
    pub shoot_timer: u32,
    pub shoot_interval: f32,
}

impl Enemy {
    pub fn size(&self) -> f32 {
        self.kind.stats().size
    }

    pub fn score(&self) -> u64 {
        self.kind.stats().score
    }

    pub fn fruit(&self) -> Fruit {
        self.kind.stats().fruit
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Spawn point for this enemy's bullets
    pub fn gun(&self) -> Vec2 {
        let size = self.size();
        Vec2::new(self.pos.x + size / 2.0 - ENEMY_BULLET_WIDTH / 2.0, self.pos.y + size)
    }
}

impl Bounds for Enemy {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size()))
    }
}

/// What a drop does when collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Doubles the bullet fan
    Power,
    /// Flat score bonus
    Points,
}

/// A falling drop item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub pos: Vec2,
    pub speed: f32,
    /// Radians, for rendering only
    pub rotation: f32,
    pub fruit: Fruit,
    pub effect: ItemEffect,
    /// Score awarded by points items (0 means the default bonus)
    pub points: u64,
}

impl Item {
    /// Drop left behind by a destroyed enemy
    pub fn dropped_by(enemy: &Enemy) -> Self {
        let (fruit, effect, points) = match enemy.kind {
            EnemyKind::Medium => (Fruit::MedApple, ItemEffect::Points, POINTS_ITEM_VALUE),
            _ => (enemy.fruit(), ItemEffect::Power, 0),
        };
        Self {
            pos: Vec2::new(enemy.pos.x + enemy.size() / 2.0 - 15.0, enemy.pos.y),
            speed: ITEM_SPEED,
            rotation: 0.0,
            fruit,
            effect,
            points,
        }
    }

    /// Points granted on pickup
    pub fn point_value(&self) -> u64 {
        if self.points == 0 {
            POINTS_ITEM_VALUE
        } else {
            self.points
        }
    }
}

impl Bounds for Item {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(ITEM_SIZE))
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left
    pub life: u32,
    /// HSL hue in degrees
    pub hue: f32,
}

/// Explosion ring colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionColor {
    Red,
    Orange,
    Yellow,
    Gold,
}

/// An expanding explosion ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub life: u32,
    pub color: ExplosionColor,
}

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitCause {
    Enemy,
    EnemyBullet,
}

/// Discrete things that happened during a tick, for audio and UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Shoot { bullets: u32 },
    PlayerHit { cause: HitCause, lives_left: u32 },
    EnemyKilled { kind: EnemyKind, pos: Vec2 },
    PowerPickup { bullet_count: u32 },
    PointsPickup { points: u64 },
    LevelWon { level: u32, score: u64 },
    GameOver { level: u32, score: u64 },
}

/// Values shown in the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub bullet_count: u32,
    pub bullet_level: u32,
    pub phase: GamePhase,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn and drop decisions draw from this
    pub rng: Pcg32,
    /// Canvas size in pixels
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Current level (1-based)
    pub level: u32,
    /// Enemies spawned this level
    pub wave_count: u32,
    pub fire_pattern: FirePattern,
    /// Ticks simulated since the last reset (drives blinking)
    pub time_ticks: u64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub items: Vec<Item>,
    pub particles: Vec<Particle>,
    pub explosions: Vec<Explosion>,
    /// Events raised during the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game on the default canvas
    pub fn new(seed: u64) -> Self {
        Self::with_canvas(seed, CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    /// Create a new game on a canvas of the given size
    pub fn with_canvas(seed: u64, width: f32, height: f32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            width,
            height,
            phase: GamePhase::Idle,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            wave_count: 0,
            fire_pattern: FirePattern::Single,
            time_ticks: 0,
            player: Player::new(width, height),
            bullets: Vec::new(),
            enemies: Vec::new(),
            enemy_bullets: Vec::new(),
            items: Vec::new(),
            particles: Vec::new(),
            explosions: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Bullets per shot (1, 2, 4 or 8)
    pub fn bullet_count(&self) -> u32 {
        self.fire_pattern.count()
    }

    /// log2(bullet count) + 1
    pub fn bullet_level(&self) -> u32 {
        self.fire_pattern.level()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: self.lives,
            level: self.level,
            bullet_count: self.bullet_count(),
            bullet_level: self.bullet_level(),
            phase: self.phase,
        }
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply a state machine command. Returns false if it does not apply in
    /// the current phase.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Reset => {
                self.reset();
                true
            }
            Command::NextLevel => self.next_level(),
        }
    }

    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Running;
        log::info!("Game started (seed {})", self.seed);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Paused;
        log::info!("Paused at tick {}", self.time_ticks);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Running;
        log::info!("Resumed");
        true
    }

    /// Back to the title state with every counter and pool cleared
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.level = 1;
        self.wave_count = 0;
        self.fire_pattern = FirePattern::Single;
        self.time_ticks = 0;
        self.player = Player::new(self.width, self.height);
        self.bullets.clear();
        self.enemies.clear();
        self.enemy_bullets.clear();
        self.items.clear();
        self.particles.clear();
        self.explosions.clear();
        self.events.clear();
        log::info!("Game reset");
    }

    /// Advance from a won level into the next one
    pub fn next_level(&mut self) -> bool {
        if self.phase != GamePhase::LevelWon {
            return false;
        }
        self.level += 1;
        self.wave_count = 0;
        // Falling drops carry over into the new level
        self.bullets.clear();
        self.enemies.clear();
        self.enemy_bullets.clear();
        self.particles.clear();
        self.explosions.clear();
        self.phase = GamePhase::Running;
        log::info!("Starting level {}", self.level);
        true
    }

    /// Spawn an explosion ring centered on `pos`
    pub fn spawn_explosion(&mut self, pos: Vec2, color: ExplosionColor) {
        self.explosions.push(Explosion {
            pos,
            radius: 0.0,
            life: EXPLOSION_LIFE,
            color,
        });
    }

    /// Spawn `count` particles flying out evenly around `pos`
    pub fn spawn_burst(&mut self, pos: Vec2, count: usize) {
        self.particles.reserve(count);
        for i in 0..count {
            let angle = std::f32::consts::TAU / count as f32 * i as f32;
            let speed = self.rng.random_range(2.0f32..5.0);
            let hue = self.rng.random_range(30.0f32..90.0);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: PARTICLE_LIFE,
                hue,
            });
        }
    }
}
