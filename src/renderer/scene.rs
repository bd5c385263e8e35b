//! Scene assembly
//!
//! Turns a `&GameState` snapshot into one triangle list in canvas pixels.
//! Draw order is back to front: stars, bullets, enemies, items, ship,
//! particles, explosions.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, hsl, with_alpha};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Enemy, Explosion, ExplosionColor, Fruit, GameState, Item, Particle, Player};

const STAR_COUNT: u32 = 50;
/// Pixels per second
const STAR_DRIFT: f32 = 50.0;
const CIRCLE_SEGMENTS: u32 = 20;
const SMALL_SEGMENTS: u32 = 8;
const PARTICLE_RADIUS: f32 = 2.0;
const EXPLOSION_LINE_WIDTH: f32 = 3.0;
const HEALTH_BAR_HEIGHT: f32 = 3.0;
/// Size items are drawn at (their hitbox is larger)
const ITEM_DRAW_SIZE: f32 = 28.0;

/// Draws shapes relative to a local origin, rotated and faded as a unit
struct Pen<'a> {
    out: &'a mut Vec<Vertex>,
    origin: Vec2,
    rotation: f32,
    alpha: f32,
}

impl Pen<'_> {
    fn at(&self, offset: Vec2) -> Vec2 {
        self.origin + Vec2::from_angle(self.rotation).rotate(offset)
    }

    fn color(&self, color: [f32; 4]) -> [f32; 4] {
        with_alpha(color, color[3] * self.alpha)
    }

    fn circle(&mut self, offset: Vec2, radius: f32, color: [f32; 4]) {
        let verts = shapes::circle(self.at(offset), radius, self.color(color), CIRCLE_SEGMENTS);
        self.out.extend(verts);
    }

    fn outline(&mut self, offset: Vec2, radius: f32, width: f32, color: [f32; 4]) {
        let verts = shapes::circle_outline(self.at(offset), radius, width, self.color(color), CIRCLE_SEGMENTS);
        self.out.extend(verts);
    }

    fn ellipse(&mut self, offset: Vec2, radii: Vec2, angle: f32, color: [f32; 4]) {
        let verts = shapes::ellipse(
            self.at(offset),
            radii,
            self.rotation + angle,
            self.color(color),
            SMALL_SEGMENTS * 2,
        );
        self.out.extend(verts);
    }

    /// Rect given by its top-left corner in local coordinates
    fn rect(&mut self, top_left: Vec2, size: Vec2, color: [f32; 4]) {
        let center = self.at(top_left + size / 2.0);
        let verts = shapes::rotated_rect(center, size, self.rotation, self.color(color));
        self.out.extend(verts);
    }

    fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
        let verts = shapes::line(self.at(a), self.at(b), width, self.color(color));
        self.out.extend(verts);
    }

    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        let verts = shapes::triangle(self.at(a), self.at(b), self.at(c), self.color(color));
        self.out.extend(verts);
    }
}

/// Build the full frame. `time` is wall-clock seconds, used for the
/// starfield drift and the item glow pulse.
pub fn build_scene(state: &GameState, settings: &Settings, time: f32) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);

    if settings.starfield {
        starfield(&mut out, state.width, state.height, time);
    }

    for bullet in &state.bullets {
        out.extend(shapes::rect(bullet.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT), colors::BULLET));
    }
    for bullet in &state.enemy_bullets {
        out.extend(shapes::rect(
            bullet.pos,
            Vec2::new(ENEMY_BULLET_WIDTH, ENEMY_BULLET_HEIGHT),
            colors::ENEMY_BULLET,
        ));
    }

    for enemy in &state.enemies {
        draw_enemy(&mut out, enemy);
    }
    for item in &state.items {
        draw_item(&mut out, item, time);
    }

    draw_player(&mut out, &state.player);

    if settings.particles {
        for particle in &state.particles {
            draw_particle(&mut out, particle);
        }
    }
    for explosion in &state.explosions {
        draw_explosion(&mut out, explosion);
    }

    out
}

fn starfield(out: &mut Vec<Vertex>, width: f32, height: f32, time: f32) {
    for i in 0..STAR_COUNT {
        let x = (i as f32 * 73.0).rem_euclid(width);
        let y = (i as f32 * 53.0 + time * STAR_DRIFT).rem_euclid(height);
        out.extend(shapes::circle(Vec2::new(x, y), 1.0, colors::STAR, SMALL_SEGMENTS));
    }
}

/// Ship alpha: half while blinking during invulnerability
pub fn player_alpha(player: &Player) -> f32 {
    if player.is_invulnerable() && (player.invulnerable_ticks / 5) % 2 == 0 {
        0.5
    } else {
        1.0
    }
}

fn draw_player(out: &mut Vec<Vertex>, player: &Player) {
    let mut pen = Pen {
        out,
        origin: player.pos + Player::size() / 2.0,
        rotation: 0.0,
        alpha: player_alpha(player),
    };

    pen.triangle(
        Vec2::new(0.0, -15.0),
        Vec2::new(-10.0, 15.0),
        Vec2::new(10.0, 15.0),
        colors::SHIP_BODY,
    );
    pen.circle(Vec2::new(0.0, -5.0), 5.0, colors::SHIP_CANOPY);
    pen.rect(Vec2::new(-12.0, -2.0), Vec2::new(24.0, 4.0), colors::SHIP_WINGS);
    pen.rect(Vec2::new(-2.0, -18.0), Vec2::new(4.0, 4.0), colors::SHIP_MUZZLE);
}

/// Fruit artwork scaled to a box of `size` pixels
fn draw_fruit(pen: &mut Pen<'_>, fruit: Fruit, size: f32) {
    let leaf_angle = std::f32::consts::FRAC_PI_4;
    match fruit {
        Fruit::Apple => {
            pen.circle(Vec2::ZERO, size / 2.0 - 2.0, colors::APPLE);
            pen.rect(Vec2::new(-1.0, -10.0), Vec2::new(2.0, 5.0), colors::STEM);
            pen.ellipse(Vec2::new(5.0, -8.0), Vec2::new(4.0, 2.0), leaf_angle, colors::LEAF);
        }
        Fruit::Banana => {
            pen.circle(Vec2::new(-3.0, 0.0), size / 2.5, colors::BANANA);
            pen.circle(Vec2::new(0.0, -5.0), size / 2.8, colors::BANANA);
            pen.circle(Vec2::new(3.0, 0.0), size / 2.5, colors::BANANA);
            pen.rect(Vec2::new(-2.0, 5.0), Vec2::new(4.0, 3.0), colors::BANANA_TIP);
        }
        Fruit::Orange => {
            let r = size / 2.0 - 1.0;
            pen.circle(Vec2::ZERO, r, colors::ORANGE);
            for band in [0.4, 0.6, 0.8] {
                pen.outline(Vec2::ZERO, r * band, 1.0, colors::ORANGE_RIND);
            }
        }
        Fruit::Cherry => {
            pen.circle(Vec2::new(-5.0, 0.0), size / 3.0, colors::CHERRY);
            pen.circle(Vec2::new(5.0, 0.0), size / 3.0, colors::CHERRY);
            pen.line(Vec2::new(-5.0, -5.0), Vec2::new(0.0, -8.0), 2.0, colors::STEM);
            pen.line(Vec2::new(0.0, -8.0), Vec2::new(5.0, -5.0), 2.0, colors::STEM);
        }
        Fruit::MedApple => {
            pen.circle(Vec2::ZERO, size / 2.0 + 2.0, colors::MED_APPLE);
            pen.rect(Vec2::new(-2.0, -18.0), Vec2::new(4.0, 6.0), colors::STEM);
            pen.ellipse(Vec2::new(7.0, -14.0), Vec2::new(5.0, 2.5), leaf_angle, colors::LEAF);
        }
    }
}

fn draw_enemy(out: &mut Vec<Vertex>, enemy: &Enemy) {
    let size = enemy.size();
    {
        let mut pen = Pen {
            out: &mut *out,
            origin: enemy.pos + Vec2::splat(size / 2.0),
            rotation: 0.0,
            alpha: 1.0,
        };
        draw_fruit(&mut pen, enemy.fruit(), size);
    }

    // Health bar only once damaged
    if enemy.health < enemy.max_health {
        let bar_pos = Vec2::new(enemy.pos.x, enemy.pos.y - 5.0);
        let frac = enemy.health.max(0) as f32 / enemy.max_health as f32;
        out.extend(shapes::rect(bar_pos, Vec2::new(size, HEALTH_BAR_HEIGHT), colors::HEALTH_BACK));
        out.extend(shapes::rect(
            bar_pos,
            Vec2::new(size * frac, HEALTH_BAR_HEIGHT),
            colors::HEALTH_FRONT,
        ));
    }
}

/// Glow alpha oscillates in 0.2..=1.0
pub fn glow_alpha(time: f32) -> f32 {
    0.6 + (time * 10.0).sin() * 0.4
}

fn draw_item(out: &mut Vec<Vertex>, item: &Item, time: f32) {
    let center = item.pos + Vec2::splat(ITEM_SIZE / 2.0);
    out.extend(shapes::circle(
        center,
        ITEM_SIZE / 2.0 + 2.0,
        with_alpha(colors::GLOW, glow_alpha(time) * 0.5),
        CIRCLE_SEGMENTS,
    ));

    let mut pen = Pen {
        out,
        origin: center,
        rotation: item.rotation,
        alpha: 1.0,
    };
    draw_fruit(&mut pen, item.fruit, ITEM_DRAW_SIZE);
}

fn draw_particle(out: &mut Vec<Vertex>, particle: &Particle) {
    let alpha = particle.life as f32 / PARTICLE_LIFE as f32;
    let color = with_alpha(hsl(particle.hue, 1.0, 0.5), alpha);
    out.extend(shapes::circle(particle.pos, PARTICLE_RADIUS, color, SMALL_SEGMENTS));
}

pub fn explosion_color(color: ExplosionColor) -> [f32; 4] {
    match color {
        ExplosionColor::Red => colors::EXPLOSION_RED,
        ExplosionColor::Orange => colors::EXPLOSION_ORANGE,
        ExplosionColor::Yellow => colors::EXPLOSION_YELLOW,
        ExplosionColor::Gold => colors::EXPLOSION_GOLD,
    }
}

fn draw_explosion(out: &mut Vec<Vertex>, explosion: &Explosion) {
    let alpha = explosion.life as f32 / EXPLOSION_LIFE as f32;
    out.extend(shapes::circle_outline(
        explosion.pos,
        explosion.radius,
        EXPLOSION_LINE_WIDTH,
        with_alpha(explosion_color(explosion.color), alpha),
        CIRCLE_SEGMENTS,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EnemyKind, ItemEffect};

    fn quiet_settings() -> Settings {
        Settings {
            starfield: false,
            ..Settings::default()
        }
    }

    fn has_color(verts: &[Vertex], color: [f32; 4]) -> bool {
        verts.iter().any(|v| v.color == color)
    }

    fn rgb_matches(v: &Vertex, color: [f32; 4]) -> bool {
        v.color[..3] == color[..3]
    }

    fn enemy(kind: EnemyKind, health: i32) -> Enemy {
        let stats = kind.stats();
        Enemy {
            pos: Vec2::new(100.0, 100.0),
            kind,
            health,
            max_health: stats.health,
            speed: 1.0,
            shoot_timer: 0,
            shoot_interval: 45.0,
        }
    }

    #[test]
    fn test_idle_scene_draws_ship_only() {
        let state = GameState::new(1);
        let verts = build_scene(&state, &quiet_settings(), 0.0);
        assert!(!verts.is_empty());
        assert!(has_color(&verts, colors::SHIP_BODY));
        assert!(!has_color(&verts, colors::STAR));
    }

    #[test]
    fn test_starfield_toggle() {
        let state = GameState::new(1);
        let with_stars = build_scene(&state, &Settings::default(), 1.5);
        let without = build_scene(&state, &quiet_settings(), 1.5);
        assert!(has_color(&with_stars, colors::STAR));
        assert!(with_stars.len() > without.len());
    }

    #[test]
    fn test_player_blinks_while_invulnerable() {
        let mut player = Player::new(800.0, 600.0);
        assert_eq!(player_alpha(&player), 1.0);
        player.invulnerable_ticks = 120;
        assert_eq!(player_alpha(&player), 0.5);
        player.invulnerable_ticks = 115;
        assert_eq!(player_alpha(&player), 1.0);

        let mut state = GameState::new(1);
        state.player.invulnerable_ticks = 120;
        let verts = build_scene(&state, &quiet_settings(), 0.0);
        let body: Vec<_> = verts
            .iter()
            .filter(|v| rgb_matches(v, colors::SHIP_BODY))
            .collect();
        assert!(!body.is_empty());
        assert!(body.iter().all(|v| v.color[3] == 0.5));
    }

    #[test]
    fn test_health_bar_only_when_damaged() {
        let mut state = GameState::new(1);
        state.enemies.push(enemy(EnemyKind::Medium, 2));
        let verts = build_scene(&state, &quiet_settings(), 0.0);
        assert!(!has_color(&verts, colors::HEALTH_FRONT));

        state.enemies[0].health = 1;
        let verts = build_scene(&state, &quiet_settings(), 0.0);
        let bar: Vec<_> = verts
            .iter()
            .filter(|v| v.color == colors::HEALTH_FRONT)
            .collect();
        assert_eq!(bar.len(), 6);
        let max_x = bar.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!((max_x - 115.0).abs() < 1e-4, "half of a 30px bar");
    }

    #[test]
    fn test_particles_fade_and_toggle() {
        let mut state = GameState::new(1);
        state.particles.push(Particle {
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::ZERO,
            life: 15,
            hue: 60.0,
        });
        let verts = build_scene(&state, &quiet_settings(), 0.0);
        assert!(verts.iter().any(|v| v.color == [1.0, 1.0, 0.0, 0.5]));

        let settings = Settings {
            particles: false,
            ..quiet_settings()
        };
        let verts = build_scene(&state, &settings, 0.0);
        assert!(!verts.iter().any(|v| v.color == [1.0, 1.0, 0.0, 0.5]));
    }

    #[test]
    fn test_explosion_ring_radius_and_alpha() {
        let explosion = Explosion {
            pos: Vec2::new(200.0, 200.0),
            radius: 10.0,
            life: 30,
            color: ExplosionColor::Gold,
        };
        let mut verts = Vec::new();
        draw_explosion(&mut verts, &explosion);
        assert!(!verts.is_empty());
        for v in &verts {
            let d = Vec2::from(v.position).distance(explosion.pos);
            assert!((8.5 - 1e-3..=11.5 + 1e-3).contains(&d));
            assert_eq!(v.color, colors::EXPLOSION_GOLD);
        }
    }

    #[test]
    fn test_items_glow_and_every_fruit_draws() {
        let mut state = GameState::new(1);
        for (i, fruit) in [Fruit::Apple, Fruit::Banana, Fruit::Orange, Fruit::Cherry, Fruit::MedApple]
            .into_iter()
            .enumerate()
        {
            state.items.push(Item {
                pos: Vec2::new(60.0 * i as f32, 100.0),
                speed: ITEM_SPEED,
                rotation: 0.3,
                fruit,
                effect: ItemEffect::Power,
                points: 0,
            });
        }
        let verts = build_scene(&state, &quiet_settings(), 0.0);
        assert!(verts.iter().any(|v| rgb_matches(v, colors::GLOW)));
        for color in [
            colors::APPLE,
            colors::BANANA,
            colors::ORANGE,
            colors::CHERRY,
            colors::MED_APPLE,
        ] {
            assert!(has_color(&verts, color));
        }
    }

    #[test]
    fn test_glow_alpha_range() {
        for i in 0..100 {
            let a = glow_alpha(i as f32 * 0.037);
            assert!((0.2 - 1e-6..=1.0 + 1e-6).contains(&a));
        }
    }
}
