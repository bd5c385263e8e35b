//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use rand::Rng;

use super::collision::{Bounds, overlaps};
use super::firing::fire;
use super::spawner::maybe_spawn;
use super::state::{
    EnemyBullet, ExplosionColor, GameEvent, GamePhase, GameState, HitCause, Item, ItemEffect,
};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Absolute pointer x on the canvas (mouse steering)
    pub pointer_x: Option<f32>,
    /// Fire a volley (edge-triggered)
    pub fire: bool,
}

impl TickInput {
    /// Drop edge-triggered inputs once a tick has consumed them; held keys stay
    pub fn clear_one_shot(&mut self) {
        self.fire = false;
        self.pointer_x = None;
    }
}

/// Whether the driver should schedule another tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Halt,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    // Paused, idle, won or lost: nothing moves
    if !state.is_running() {
        return TickOutcome::Halt;
    }

    state.events.clear();
    state.time_ticks += 1;

    if let Some(x) = input.pointer_x {
        state.player.pos.x = x - PLAYER_WIDTH / 2.0;
    }
    if input.fire {
        fire(state);
    }

    update_player(state, input);
    update_bullets(state);
    update_enemies(state);
    update_enemy_fire(state);
    check_player_hits(state);
    check_bullet_hits(state);
    update_items(state);
    update_particles(state);
    update_explosions(state);
    check_level_complete(state);

    if state.is_running() {
        TickOutcome::Continue
    } else {
        TickOutcome::Halt
    }
}

fn update_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;
    if input.left {
        player.pos.x -= PLAYER_SPEED;
    }
    if input.right {
        player.pos.x += PLAYER_SPEED;
    }
    player.clamp_to(state.width);

    player.invulnerable_ticks = player.invulnerable_ticks.saturating_sub(1);
}

fn update_bullets(state: &mut GameState) {
    let width = state.width;
    state.bullets.retain_mut(|bullet| {
        bullet.pos += bullet.vel;
        bullet.pos.y >= 0.0 && bullet.pos.x >= 0.0 && bullet.pos.x <= width
    });
}

fn update_enemies(state: &mut GameState) {
    maybe_spawn(state);

    let height = state.height;
    state.enemies.retain_mut(|enemy| {
        enemy.pos.y += enemy.speed;
        enemy.pos.y <= height
    });
}

fn update_enemy_fire(state: &mut GameState) {
    let speed = ENEMY_BULLET_BASE_SPEED + state.level as f32 * ENEMY_BULLET_SPEED_PER_LEVEL;
    for enemy in &mut state.enemies {
        enemy.shoot_timer += 1;
        if enemy.shoot_timer as f32 > enemy.shoot_interval {
            state.enemy_bullets.push(EnemyBullet {
                pos: enemy.gun(),
                speed,
            });
            enemy.shoot_timer = 0;
        }
    }

    let height = state.height;
    state.enemy_bullets.retain_mut(|bullet| {
        bullet.pos.y += bullet.speed;
        bullet.pos.y <= height
    });
}

/// Take one life from the player and start the invulnerability window
fn damage_player(state: &mut GameState, cause: HitCause) {
    state.lives = state.lives.saturating_sub(1);
    state.player.invulnerable_ticks = INVULNERABLE_TICKS;

    let color = match cause {
        HitCause::Enemy => ExplosionColor::Red,
        HitCause::EnemyBullet => ExplosionColor::Orange,
    };
    let center = state.player.center();
    state.spawn_explosion(center, color);
    state.events.push(GameEvent::PlayerHit {
        cause,
        lives_left: state.lives,
    });

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            level: state.level,
            score: state.score,
        });
        log::info!("Game over at level {} with score {}", state.level, state.score);
    }
}

fn check_player_hits(state: &mut GameState) {
    // Contact with an enemy hurts but leaves the enemy alive
    let touching = state
        .enemies
        .iter()
        .filter(|enemy| overlaps(&state.player, *enemy))
        .count();
    for _ in 0..touching {
        if state.player.is_invulnerable() || !state.is_running() {
            break;
        }
        damage_player(state, HitCause::Enemy);
    }

    // Enemy bullets are consumed only when they actually deal damage
    let mut i = 0;
    while i < state.enemy_bullets.len() {
        if state.is_running()
            && !state.player.is_invulnerable()
            && overlaps(&state.player, &state.enemy_bullets[i])
        {
            state.enemy_bullets.remove(i);
            damage_player(state, HitCause::EnemyBullet);
        } else {
            i += 1;
        }
    }
}

fn check_bullet_hits(state: &mut GameState) {
    let enemies = &mut state.enemies;
    state.bullets.retain(|bullet| {
        // A bullet stops at the first live enemy it touches
        match enemies
            .iter_mut()
            .find(|enemy| !enemy.is_dead() && overlaps(bullet, &**enemy))
        {
            Some(enemy) => {
                enemy.health -= bullet.damage;
                false
            }
            None => true,
        }
    });

    if !state.enemies.iter().any(|e| e.is_dead()) {
        return;
    }

    let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| e.is_dead());
    state.enemies = alive;

    for enemy in dead {
        let center = enemy.center();
        state.score += enemy.score();
        state.spawn_explosion(center, ExplosionColor::Yellow);
        state.spawn_burst(center, KILL_PARTICLES);
        state.events.push(GameEvent::EnemyKilled {
            kind: enemy.kind,
            pos: center,
        });

        if state.rng.random_bool(DROP_CHANCE) {
            state.items.push(Item::dropped_by(&enemy));
        }
    }
}

fn update_items(state: &mut GameState) {
    let height = state.height;
    let mut collected = Vec::new();

    let player = &state.player;
    state.items.retain_mut(|item| {
        item.pos.y += item.speed;
        item.rotation += ITEM_SPIN;
        if item.pos.y > height {
            return false;
        }
        if overlaps(player, &*item) {
            collected.push(item.clone());
            return false;
        }
        true
    });

    for item in collected {
        let center = item.center();
        state.spawn_explosion(center, ExplosionColor::Gold);
        match item.effect {
            ItemEffect::Points => {
                let points = item.point_value();
                state.score += points;
                state.spawn_burst(center, POINTS_PICKUP_PARTICLES);
                state.events.push(GameEvent::PointsPickup { points });
            }
            ItemEffect::Power => {
                state.fire_pattern = state.fire_pattern.upgrade();
                state.spawn_burst(center, POWER_PICKUP_PARTICLES);
                state.events.push(GameEvent::PowerPickup {
                    bullet_count: state.bullet_count(),
                });
                log::debug!("Fire pattern upgraded to {} bullets", state.bullet_count());
            }
        }
    }
}

fn update_particles(state: &mut GameState) {
    state.particles.retain_mut(|particle| {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
        particle.life = particle.life.saturating_sub(1);
        particle.life > 0
    });
}

fn update_explosions(state: &mut GameState) {
    state.explosions.retain_mut(|explosion| {
        explosion.radius += EXPLOSION_GROWTH;
        explosion.life = explosion.life.saturating_sub(1);
        explosion.life > 0
    });
}

/// Whether the current level's clear condition holds
pub fn level_complete(state: &GameState) -> bool {
    state.score >= LEVEL_SCORE_STEP * state.level as u64 && state.enemies.is_empty()
}

fn check_level_complete(state: &mut GameState) {
    if state.is_running() && level_complete(state) {
        state.phase = GamePhase::LevelWon;
        state.events.push(GameEvent::LevelWon {
            level: state.level,
            score: state.score,
        });
        log::info!("Level {} won with score {}", state.level, state.score);
    }
}
