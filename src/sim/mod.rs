//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod firing;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Bounds, Rect, check_collision, overlaps};
pub use firing::{FirePattern, fire};
pub use state::{
    Bullet, Command, Enemy, EnemyBullet, EnemyKind, Explosion, ExplosionColor, Fruit, GameEvent,
    GamePhase, GameState, HitCause, Hud, Item, ItemEffect, Particle, Player,
};
pub use tick::{TickInput, TickOutcome, level_complete, tick};
