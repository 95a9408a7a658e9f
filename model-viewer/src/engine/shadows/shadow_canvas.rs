use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

/// Square coverage buffer lying on a horizontal ground square.
///
/// Texel `(i, j)` covers world X increasing with `i` and world Z increasing
/// with `j`, matching the UV layout of a `Plane3d` mesh of the same size.
#[derive(Debug, Clone)]
pub struct ShadowCanvas {
    resolution: u32,
    center: Vec2,
    scale: f32,
    values: Vec<f32>,
}

impl ShadowCanvas {
    /// `center` is the world (x, z) of the square's centre, `scale` its edge length.
    pub fn new(resolution: u32, center: Vec2, scale: f32) -> Self {
        let resolution = resolution.max(1);
        Self {
            resolution,
            center,
            scale,
            values: vec![0.0; (resolution * resolution) as usize],
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, i: u32, j: u32) -> f32 {
        self.values[(j * self.resolution + i) as usize]
    }

    pub fn clear(&mut self) {
        self.values.fill(0.0);
    }

    /// Texel containing the world (x, z) point, if it lies on the canvas.
    pub fn texel_at(&self, world: Vec2) -> Option<(u32, u32)> {
        let t = self.to_texel_space(world);
        let res = self.resolution as f32;
        if t.x < 0.0 || t.y < 0.0 || t.x >= res || t.y >= res {
            return None;
        }
        Some((t.x as u32, t.y as u32))
    }

    fn to_texel_space(&self, world: Vec2) -> Vec2 {
        let origin = self.center - Vec2::splat(self.scale * 0.5);
        (world - origin) * (self.resolution as f32 / self.scale)
    }

    /// Rasterise a triangle given in world (x, z), keeping the larger of the
    /// existing value and `value` at every covered texel centre.
    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, value: f32) {
        let (a, b, c) = (
            self.to_texel_space(a),
            self.to_texel_space(b),
            self.to_texel_space(c),
        );
        let area = edge(a, b, c);
        if area.abs() <= f32::EPSILON {
            return;
        }

        let res = self.resolution as f32;
        let min = a.min(b).min(c);
        let max = a.max(b).max(c);
        if max.x < 0.0 || max.y < 0.0 || min.x >= res || min.y >= res {
            return;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil() as u32).min(self.resolution - 1);
        let y1 = (max.y.ceil() as u32).min(self.resolution - 1);

        for j in y0..=y1 {
            for i in x0..=x1 {
                let p = Vec2::new(i as f32 + 0.5, j as f32 + 0.5);
                let w0 = edge(b, c, p) * area.signum();
                let w1 = edge(c, a, p) * area.signum();
                let w2 = edge(a, b, p) * area.signum();
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let slot = &mut self.values[(j * self.resolution + i) as usize];
                    *slot = slot.max(value);
                }
            }
        }
    }

    /// `self += other * weight`, texel by texel. Canvases must match in size.
    pub fn add_weighted(&mut self, other: &ShadowCanvas, weight: f32) {
        debug_assert_eq!(self.resolution, other.resolution);
        for (value, sample) in self.values.iter_mut().zip(&other.values) {
            *value += sample * weight;
        }
    }

    /// Separable box blur, clamped at the edges.
    pub fn box_blur(&mut self, radius: u32) {
        if radius == 0 {
            return;
        }
        let res = self.resolution as i64;
        let r = radius as i64;
        let mut scratch = vec![0.0; self.values.len()];

        for j in 0..res {
            for i in 0..res {
                let (lo, hi) = ((i - r).max(0), (i + r).min(res - 1));
                let sum: f32 = (lo..=hi).map(|k| self.values[(j * res + k) as usize]).sum();
                scratch[(j * res + i) as usize] = sum / (hi - lo + 1) as f32;
            }
        }
        for j in 0..res {
            for i in 0..res {
                let (lo, hi) = ((j - r).max(0), (j + r).min(res - 1));
                let sum: f32 = (lo..=hi).map(|k| scratch[(k * res + i) as usize]).sum();
                self.values[(j * res + i) as usize] = sum / (hi - lo + 1) as f32;
            }
        }
    }

    /// Export as an sRGB texture of `color`, with alpha computed per texel.
    pub fn to_image(&self, color: Color, alpha: impl Fn(f32) -> f32) -> Image {
        let srgba = color.to_srgba();
        let rgb = [srgba.red, srgba.green, srgba.blue].map(to_byte);
        let mut data = Vec::with_capacity(self.values.len() * 4);
        for value in &self.values {
            data.extend_from_slice(&rgb);
            data.push(to_byte(alpha(*value)));
        }

        Image::new(
            Extent3d {
                width: self.resolution,
                height: self.resolution,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        )
    }
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
