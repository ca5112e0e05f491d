//! Circular alpha mask sampled by every star sprite.

/// Default side length of the mask in texels.
pub const DEFAULT_SPRITE_SIDE: u32 = 128;

/// Sub-samples per texel axis used to anti-alias the circle edge.
const SUBSAMPLES: u32 = 4;

/// A square RGBA8 bitmap holding a filled white circle of radius `side / 3`
/// centered at `(side / 2, side / 2)`, with premultiplied alpha.
#[derive(Clone, Debug)]
pub struct SpriteMask {
    side: u32,
    pixels: Vec<u8>,
}

impl SpriteMask {
    /// Rasterize the circle. Edge texels get fractional coverage.
    pub fn circle(side: u32) -> Self {
        let center = side as f32 / 2.0;
        let radius = side as f32 / 3.0;
        let radius_sq = radius * radius;
        let step = 1.0 / SUBSAMPLES as f32;
        let samples = (SUBSAMPLES * SUBSAMPLES) as f32;

        let mut pixels = vec![0u8; side as usize * side as usize * 4];
        for y in 0..side {
            for x in 0..side {
                let mut inside = 0u32;
                for sy in 0..SUBSAMPLES {
                    for sx in 0..SUBSAMPLES {
                        let px = x as f32 + (sx as f32 + 0.5) * step - center;
                        let py = y as f32 + (sy as f32 + 0.5) * step - center;
                        if px * px + py * py <= radius_sq {
                            inside += 1;
                        }
                    }
                }

                // White premultiplied by coverage: every channel equals alpha.
                let alpha = (inside as f32 / samples * 255.0).round() as u8;
                let offset = (y as usize * side as usize + x as usize) * 4;
                pixels[offset..offset + 4].fill(alpha);
            }
        }

        Self { side, pixels }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn radius(&self) -> f32 {
        self.side as f32 / 3.0
    }

    /// Alpha of the texel at `(x, y)`, or 0 outside the bitmap.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.side || y >= self.side {
            return 0;
        }
        self.pixels[(y as usize * self.side as usize + x as usize) * 4 + 3]
    }

    /// Fraction of the bitmap covered by the circle, about `π / 9`.
    pub fn coverage(&self) -> f32 {
        let total: u64 = self.pixels.iter().skip(3).step_by(4).map(|&a| a as u64).sum();
        coverage_ratio(total, self.side)
    }

    /// Tightly packed RGBA8 rows for texture upload.
    pub fn as_rgba8(&self) -> &[u8] {
        &self.pixels
    }
}

/// Summed alpha over the maximum for a `side × side` bitmap. The texel count
/// is computed in `u64`; `side²` overflows `u32` above 65535.
fn coverage_ratio(alpha_sum: u64, side: u32) -> f32 {
    if side == 0 {
        return 0.0;
    }
    let texels = side as u64 * side as u64;
    (alpha_sum as f64 / (255.0 * texels as f64)) as f32
}

impl Default for SpriteMask {
    fn default() -> Self {
        Self::circle(DEFAULT_SPRITE_SIDE)
    }
}
