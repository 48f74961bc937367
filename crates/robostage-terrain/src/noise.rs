//! Seeded 2D gradient noise.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Classic Perlin gradient noise with a seeded permutation table.
///
/// Values lie in about `[-1, 1]` and are zero on integer lattice points.
/// The same seed always yields the same field.
#[derive(Clone)]
pub struct Perlin {
    perm: [u8; 512],
}

impl std::fmt::Debug for Perlin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Perlin").finish_non_exhaustive()
    }
}

impl Perlin {
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn get(&self, x: f32, y: f32) -> f32 {
        let (xf, yf) = (x.floor(), y.floor());
        let xi = ((xf as i64) & 255) as usize;
        let yi = ((yf as i64) & 255) as usize;
        let (dx, dy) = (x - xf, y - yf);
        let (u, v) = (fade(dx), fade(dy));

        let p = |i: usize| usize::from(self.perm[i]);
        let a = p(xi) + yi;
        let b = p(xi + 1) + yi;

        let bottom = lerp(grad(p(a), dx, dy), grad(p(b), dx - 1.0, dy), u);
        let top = lerp(
            grad(p(a + 1), dx, dy - 1.0),
            grad(p(b + 1), dx - 1.0, dy - 1.0),
            u,
        );
        lerp(bottom, top, v)
    }
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn grad(hash: usize, x: f32, y: f32) -> f32 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(noise: &Perlin) -> Vec<f32> {
        (0..200)
            .map(|k| {
                let t = k as f32 * 0.137;
                noise.get(t, t * 0.71 - 3.0)
            })
            .collect()
    }

    #[test]
    fn same_seed_same_values() {
        assert_eq!(samples(&Perlin::new(5)), samples(&Perlin::new(5)));
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(samples(&Perlin::new(5)), samples(&Perlin::new(6)));
    }

    #[test]
    fn zero_on_lattice() {
        let noise = Perlin::new(1);
        for (x, y) in [(0.0, 0.0), (3.0, -7.0), (-120.0, 44.0)] {
            assert!(noise.get(x, y).abs() < 1e-6);
        }
    }

    #[test]
    fn values_bounded_and_varied() {
        let values = samples(&Perlin::new(9));
        assert!(values.iter().all(|v| v.abs() <= 1.5));
        let spread = values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
            - values.iter().copied().fold(f32::INFINITY, f32::min);
        assert!(spread > 0.1);
    }
}
