//! Enemy spawning
//!
//! One roll per tick decides whether a new enemy enters from above the top
//! edge. Higher levels spawn more often, unlock bigger fruit and move faster.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, GameState};
use crate::consts::*;

/// Chance per tick that an enemy spawns
pub fn spawn_chance(level: u32) -> f32 {
    SPAWN_BASE_CHANCE * (1.0 + level as f32 * SPAWN_CHANCE_PER_LEVEL)
}

/// Pick an enemy type for the given level and score
pub fn choose_kind<R: Rng>(rng: &mut R, level: u32, score: u64) -> EnemyKind {
    let unlocked = (level as usize).clamp(1, EnemyKind::REGULAR.len());
    let mut kind = EnemyKind::REGULAR[rng.random_range(0..unlocked)];

    if score > BOSS_SCORE_PER_LEVEL * level as u64 && rng.random_bool(BOSS_CHANCE) {
        kind = EnemyKind::Boss;
    }
    kind
}

/// Build an enemy of `kind` at a random column above the canvas
pub fn make_enemy<R: Rng>(rng: &mut R, kind: EnemyKind, level: u32, canvas_width: f32) -> Enemy {
    let stats = kind.stats();
    let max_x = (canvas_width - stats.size).max(0.0);
    let x = if max_x > 0.0 { rng.random_range(0.0..=max_x) } else { 0.0 };

    Enemy {
        pos: Vec2::new(x, -stats.size),
        kind,
        health: stats.health,
        max_health: stats.health,
        speed: stats.base_speed * (1.0 + level as f32 * ENEMY_SPEED_PER_LEVEL),
        shoot_timer: 0,
        shoot_interval: rng.random_range(SHOOT_INTERVAL_MIN..SHOOT_INTERVAL_MAX),
    }
}

/// Spawn one enemy unconditionally
pub fn spawn_enemy(state: &mut GameState) {
    let kind = choose_kind(&mut state.rng, state.level, state.score);
    let enemy = make_enemy(&mut state.rng, kind, state.level, state.width);
    if kind == EnemyKind::Boss {
        log::debug!("Boss spawned at x={:.0} (level {})", enemy.pos.x, state.level);
    }
    state.enemies.push(enemy);
    state.wave_count += 1;
}

/// Roll the per-tick spawn chance. Returns true if an enemy was added.
pub fn maybe_spawn(state: &mut GameState) -> bool {
    let chance = spawn_chance(state.level) as f64;
    if state.rng.random_bool(chance.min(1.0)) {
        spawn_enemy(state);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_chance_scales_with_level() {
        assert!((spawn_chance(1) - 0.021).abs() < 1e-6);
        assert!((spawn_chance(10) - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_level_one_only_spawns_small() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..200 {
            assert_eq!(choose_kind(&mut rng, 1, 0), EnemyKind::Small);
        }
    }

    #[test]
    fn test_level_two_unlocks_medium_only() {
        let mut rng = Pcg32::seed_from_u64(2);
        let kinds: Vec<_> = (0..500).map(|_| choose_kind(&mut rng, 2, 0)).collect();
        assert!(kinds.contains(&EnemyKind::Small));
        assert!(kinds.contains(&EnemyKind::Medium));
        assert!(!kinds.contains(&EnemyKind::Large));
        assert!(!kinds.contains(&EnemyKind::Boss));
    }

    #[test]
    fn test_boss_needs_score_threshold() {
        let mut rng = Pcg32::seed_from_u64(3);
        // score == 500 * level is not enough
        assert!((0..2000).all(|_| choose_kind(&mut rng, 1, 500) != EnemyKind::Boss));
        let bosses = (0..2000)
            .filter(|_| choose_kind(&mut rng, 1, 501) == EnemyKind::Boss)
            .count();
        assert!(bosses > 0, "bosses should appear above the threshold");
        assert!(bosses < 400, "boss roll is only 5%: got {bosses}");
    }

    #[test]
    fn test_enemy_stats_scale() {
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..100 {
            let enemy = make_enemy(&mut rng, EnemyKind::Large, 3, 800.0);
            assert_eq!(enemy.health, 3);
            assert_eq!(enemy.max_health, 3);
            assert!((enemy.speed - 1.3).abs() < 1e-6);
            assert_eq!(enemy.pos.y, -40.0);
            assert!((0.0..=760.0).contains(&enemy.pos.x));
            assert!((30.0..60.0).contains(&enemy.shoot_interval));
            assert_eq!(enemy.shoot_timer, 0);
        }
    }

    #[test]
    fn test_spawn_counts_wave() {
        let mut state = GameState::new(9);
        spawn_enemy(&mut state);
        spawn_enemy(&mut state);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.wave_count, 2);
    }

    #[test]
    fn test_spawn_rate_is_roughly_right() {
        let mut state = GameState::new(11);
        let spawned = (0..10_000).filter(|_| maybe_spawn(&mut state)).count();
        // Expect ~210 at level 1
        assert!((120..320).contains(&spawned), "spawned {spawned}");
    }
}
