//! Fruit Blaster - A single-screen fruit-themed arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Sound cues for simulation events
//! - `settings`: Player preferences

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
///
/// All speeds and durations are per tick; one tick is one frame at `TICK_RATE`.
pub mod consts {
    /// Simulation ticks per second
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Canvas dimensions (pixels, y grows downward)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Distance from the bottom edge to the ship's top
    pub const PLAYER_BOTTOM_OFFSET: f32 = 50.0;
    pub const STARTING_LIVES: u32 = 3;
    /// Invulnerability window after taking a hit
    pub const INVULNERABLE_TICKS: u32 = 120;

    /// Player bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 7.0;
    /// Horizontal speed multiplier applied to sin(angle)
    pub const BULLET_SPREAD: f32 = 2.0;
    pub const BULLET_DAMAGE: i32 = 1;

    /// Enemy bullets
    pub const ENEMY_BULLET_WIDTH: f32 = 4.0;
    pub const ENEMY_BULLET_HEIGHT: f32 = 8.0;
    pub const ENEMY_BULLET_BASE_SPEED: f32 = 3.0;
    pub const ENEMY_BULLET_SPEED_PER_LEVEL: f32 = 0.5;

    /// Spawner
    pub const SPAWN_BASE_CHANCE: f32 = 0.02;
    pub const SPAWN_CHANCE_PER_LEVEL: f32 = 0.05;
    pub const ENEMY_SPEED_PER_LEVEL: f32 = 0.1;
    pub const BOSS_SCORE_PER_LEVEL: u64 = 500;
    pub const BOSS_CHANCE: f64 = 0.05;
    pub const SHOOT_INTERVAL_MIN: f32 = 30.0;
    pub const SHOOT_INTERVAL_MAX: f32 = 60.0;

    /// Drops
    pub const DROP_CHANCE: f64 = 0.3;
    pub const ITEM_SIZE: f32 = 36.0;
    pub const ITEM_SPEED: f32 = 2.0;
    pub const ITEM_SPIN: f32 = 0.1;
    pub const POINTS_ITEM_VALUE: u64 = 50;

    /// Effects
    pub const PARTICLE_LIFE: u32 = 30;
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    pub const KILL_PARTICLES: usize = 10;
    pub const POWER_PICKUP_PARTICLES: usize = 15;
    pub const POINTS_PICKUP_PARTICLES: usize = 20;
    pub const EXPLOSION_LIFE: u32 = 30;
    pub const EXPLOSION_GROWTH: f32 = 2.0;

    /// Score needed per level before the level can be won
    pub const LEVEL_SCORE_STEP: u64 = 1000;
}
