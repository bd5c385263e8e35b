//! Player firing patterns
//!
//! The bullet count only ever takes the values 1, 2, 4 and 8, so it is an enum
//! rather than an integer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bullet, GameEvent, GameState};
use crate::consts::*;

/// Bullet fan fired per shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FirePattern {
    #[default]
    Single,
    Double,
    Quad,
    Octo,
}

impl FirePattern {
    /// Bullets per shot
    pub const fn count(self) -> u32 {
        match self {
            FirePattern::Single => 1,
            FirePattern::Double => 2,
            FirePattern::Quad => 4,
            FirePattern::Octo => 8,
        }
    }

    /// Launch angles in degrees, 0 = straight up
    pub const fn angles(self) -> &'static [f32] {
        match self {
            FirePattern::Single => &[0.0],
            FirePattern::Double => &[-10.0, 10.0],
            FirePattern::Quad => &[-15.0, -5.0, 5.0, 15.0],
            // Last two entries are out of order
            FirePattern::Octo => &[-25.0, -15.0, -5.0, 5.0, 15.0, 25.0, 35.0, -35.0],
        }
    }

    /// Next pattern up, capped at eight bullets
    pub const fn upgrade(self) -> Self {
        match self {
            FirePattern::Single => FirePattern::Double,
            FirePattern::Double => FirePattern::Quad,
            FirePattern::Quad | FirePattern::Octo => FirePattern::Octo,
        }
    }

    /// log2(count) + 1
    pub const fn level(self) -> u32 {
        self.count().trailing_zeros() + 1
    }
}

/// Velocity of a bullet launched at `angle_deg`
pub fn launch_velocity(angle_deg: f32) -> Vec2 {
    Vec2::new(angle_deg.to_radians().sin() * BULLET_SPREAD, -BULLET_SPEED)
}

/// Fire one volley from the player's muzzle. Does nothing unless running.
pub fn fire(state: &mut GameState) -> bool {
    if !state.is_running() {
        return false;
    }

    let muzzle = state.player.muzzle();
    let pattern = state.fire_pattern;
    state
        .bullets
        .extend(pattern.angles().iter().map(|&angle| Bullet {
            pos: muzzle,
            vel: launch_velocity(angle),
            damage: BULLET_DAMAGE,
        }));
    state.events.push(GameEvent::Shoot {
        bullets: pattern.count(),
    });
    true
}
