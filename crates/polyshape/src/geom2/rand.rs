//! Random star-shaped rings (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic sample shapes for property tests and benchmarks. Rings are
//!   simple (star-shaped around the center) but generally not convex.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, then scale and translate.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{Polygon, Ring};

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    /// Clamped to [0, 0.95].
    pub radial_jitter: f64,
    pub base_radius: f64,
    pub center: [f64; 2],
    /// Random global phase in [0, 2π)?
    pub random_phase: bool,
}
impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(12),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.5,
            base_radius: 100.0,
            center: [0.0, 0.0],
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a star-shaped ring in CCW (y-up) order.
pub fn draw_ring_radial(cfg: RadialCfg, tok: ReplayToken) -> Ring {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.95);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = 2.0 * std::f64::consts::PI / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * 2.0 * std::f64::consts::PI
    } else {
        0.0
    };
    let center = Vector2::new(cfg.center[0], cfg.center[1]);
    (0..n)
        .map(|k| {
            let th = phase + (k as f64) * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u) * r0;
            center + Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect()
}

/// Draw a polygon with a star-shaped outline and, if `with_hole`, a small
/// reversed hole around the center.
///
/// The hole is guaranteed to lie inside the outline when the outline has at
/// least 6 vertices.
pub fn draw_polygon_radial(
    name: impl Into<String>,
    cfg: RadialCfg,
    tok: ReplayToken,
    with_hole: bool,
) -> Polygon {
    let outline = draw_ring_radial(cfg, tok);
    let mut rings = vec![outline];
    if with_hole {
        // Outline vertices sit at radius >= 0.05 * r0 with angular gaps below
        // 2Δ, so every outline edge stays farther than 0.025 * r0 from the center.
        let hole_cfg = RadialCfg {
            vertex_count: VertexCount::Fixed(6),
            angle_jitter_frac: 0.0,
            radial_jitter: 0.0,
            base_radius: cfg.base_radius.max(1e-9) * 0.02,
            ..cfg
        };
        let mut hole = draw_ring_radial(hole_cfg, tok);
        hole.reverse();
        rings.push(hole);
    }
    Polygon {
        name: name.into(),
        rings,
        source: None,
    }
}
