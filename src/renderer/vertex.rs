//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Replace the alpha channel of a color
pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// HSL (hue in degrees, saturation/lightness 0..1) to opaque RGBA
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> [f32; 4] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, 1.0]
}

/// Colors for game elements
pub mod colors {
    /// 0xRRGGBB to opaque RGBA
    const fn rgb(hex: u32) -> [f32; 4] {
        [
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub const BACKGROUND: [f32; 4] = rgb(0x001a4d);
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 0.3];

    // Ship
    pub const SHIP_BODY: [f32; 4] = rgb(0xff8c00);
    pub const SHIP_CANOPY: [f32; 4] = rgb(0x87ceeb);
    pub const SHIP_WINGS: [f32; 4] = rgb(0xa9a9a9);
    pub const SHIP_MUZZLE: [f32; 4] = rgb(0xff0000);

    // Projectiles
    pub const BULLET: [f32; 4] = rgb(0xffff00);
    pub const ENEMY_BULLET: [f32; 4] = rgb(0xff6666);

    // Fruit
    pub const APPLE: [f32; 4] = rgb(0xff6b6b);
    pub const MED_APPLE: [f32; 4] = rgb(0xff4d4d);
    pub const BANANA: [f32; 4] = rgb(0xffd93d);
    pub const BANANA_TIP: [f32; 4] = rgb(0xdaa520);
    pub const ORANGE: [f32; 4] = rgb(0xff9f43);
    pub const ORANGE_RIND: [f32; 4] = rgb(0xff8c00);
    pub const CHERRY: [f32; 4] = rgb(0xee5a6f);
    pub const STEM: [f32; 4] = rgb(0x8b4513);
    pub const LEAF: [f32; 4] = rgb(0x228b22);

    // Health bars
    pub const HEALTH_BACK: [f32; 4] = rgb(0xff0000);
    pub const HEALTH_FRONT: [f32; 4] = rgb(0x00ff00);

    // Effects
    pub const GLOW: [f32; 4] = rgb(0xffd700);
    pub const EXPLOSION_RED: [f32; 4] = rgb(0xff0000);
    pub const EXPLOSION_ORANGE: [f32; 4] = rgb(0xff6600);
    pub const EXPLOSION_YELLOW: [f32; 4] = rgb(0xffff00);
    pub const EXPLOSION_GOLD: [f32; 4] = rgb(0xffd700);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(hsl(0.0, 1.0, 0.5), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(hsl(120.0, 1.0, 0.5), [0.0, 1.0, 0.0, 1.0]));
        assert!(close(hsl(240.0, 1.0, 0.5), [0.0, 0.0, 1.0, 1.0]));
        assert!(close(hsl(60.0, 1.0, 0.5), [1.0, 1.0, 0.0, 1.0]));
        assert!(close(hsl(360.0, 1.0, 0.5), hsl(0.0, 1.0, 0.5)));
    }

    #[test]
    fn test_palette_hex() {
        assert!(close(colors::BULLET, [1.0, 1.0, 0.0, 1.0]));
        assert!(close(with_alpha(colors::GLOW, 0.5), [1.0, 215.0 / 255.0, 0.0, 0.5]));
    }

    #[test]
    fn test_vertex_layout_stride() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
    }
}
