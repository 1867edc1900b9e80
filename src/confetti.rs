//! Confetti overlay simulation. Pure state; the DOM layer paints it.

use crate::host::Viewport;
use crate::rng::RandomSource;

pub const PALETTE: &[&str] = &[
    "#f44336", "#e91e63", "#9c27b0", "#673ab7", "#3f51b5", "#2196f3", "#03a9f4", "#00bcd4",
    "#009688", "#4caf50", "#8bc34a", "#cddc39", "#ffeb3b", "#ffc107", "#ff9800", "#ff5722",
    "#795548",
];

/// Simulation runs in 60 Hz frame units regardless of the real frame rate.
const FRAME_MS: f64 = 1_000.0 / 60.0;
const GRAVITY: f64 = 0.1;
const FRICTION: f64 = 0.99;
const MAX_INITIAL_VY: f64 = 10.0;
const MAX_INITIAL_VX: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ConfettiPiece {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
    /// Radians.
    pub angle: f64,
    pub spin: f64,
    pub color: &'static str,
}

impl ConfettiPiece {
    fn spawn(bounds: Viewport, rng: &mut impl RandomSource) -> Self {
        let height = rng.range(10.0, 30.0);
        Self {
            x: wrap(rng.range(0.0, bounds.width as f64), bounds.width as f64),
            y: -height,
            vx: rng.range(-MAX_INITIAL_VX, MAX_INITIAL_VX),
            vy: rng.range(0.0, MAX_INITIAL_VY),
            width: rng.range(5.0, 20.0),
            height,
            angle: rng.range(0.0, std::f64::consts::TAU),
            spin: rng.range(-0.2, 0.2),
            color: PALETTE[rng.index(PALETTE.len())],
        }
    }
}

#[derive(Clone, Debug)]
pub struct ConfettiField {
    bounds: Viewport,
    pieces: Vec<ConfettiPiece>,
}

impl ConfettiField {
    pub fn new(bounds: Viewport, count: usize, rng: &mut impl RandomSource) -> Self {
        Self {
            bounds,
            pieces: (0..count).map(|_| ConfettiPiece::spawn(bounds, &mut *rng)).collect(),
        }
    }

    pub fn bounds(&self) -> Viewport {
        self.bounds
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    /// Follow the tracked viewport; pieces outside the new width wrap back in.
    pub fn resize(&mut self, bounds: Viewport) {
        self.bounds = bounds;
        let width = bounds.width as f64;
        for p in &mut self.pieces {
            p.x = wrap(p.x, width);
        }
    }

    /// Advance by `dt_ms`; pieces that leave the bottom are recycled at the top.
    pub fn step(&mut self, dt_ms: f64, rng: &mut impl RandomSource) {
        let frames = (dt_ms / FRAME_MS).clamp(0.0, 4.0);
        let width = self.bounds.width as f64;
        let floor = self.bounds.height as f64;
        for p in &mut self.pieces {
            p.vy += GRAVITY * frames;
            p.vx *= FRICTION.powf(frames);
            p.vy *= FRICTION.powf(frames);
            p.x = wrap(p.x + p.vx * frames, width);
            p.y += p.vy * frames;
            p.angle = (p.angle + p.spin * frames) % std::f64::consts::TAU;
            if p.y - p.height > floor {
                *p = ConfettiPiece::spawn(self.bounds, &mut *rng);
            }
        }
    }
}

fn wrap(x: f64, width: f64) -> f64 {
    if width <= 0.0 {
        return 0.0;
    }
    // rem_euclid can round up to `width` for tiny negative inputs.
    let r = x.rem_euclid(width);
    if r >= width { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;

    #[test]
    fn spawns_requested_count_above_viewport() {
        let mut rng = SeededRandom::with_seed(3);
        let field = ConfettiField::new(Viewport::new(800, 600), 200, &mut rng);
        assert_eq!(field.pieces().len(), 200);
        for p in field.pieces() {
            assert!(p.y < 0.0);
            assert!((0.0..800.0).contains(&p.x));
            assert!(PALETTE.contains(&p.color));
        }
    }

    #[test]
    fn pieces_fall_and_recycle_within_bounds() {
        let mut rng = SeededRandom::with_seed(11);
        let bounds = Viewport::new(320, 240);
        let mut field = ConfettiField::new(bounds, 50, &mut rng);
        let start: f64 = field.pieces().iter().map(|p| p.y).sum();
        field.step(16.0, &mut rng);
        let after: f64 = field.pieces().iter().map(|p| p.y).sum();
        assert!(after > start);
        // Long enough for every piece to cycle through at least once.
        for _ in 0..2_000 {
            field.step(16.0, &mut rng);
            for p in field.pieces() {
                assert!((0.0..320.0).contains(&p.x));
                assert!(p.y - p.height <= 240.0 + 1e-9 || p.y < 0.0);
            }
        }
    }

    #[test]
    fn resize_rebinds_horizontal_bounds() {
        let mut rng = SeededRandom::with_seed(5);
        let mut field = ConfettiField::new(Viewport::new(1_000, 500), 30, &mut rng);
        field.resize(Viewport::new(100, 500));
        assert_eq!(field.bounds(), Viewport::new(100, 500));
        assert!(field.pieces().iter().all(|p| (0.0..100.0).contains(&p.x)));
    }

    #[test]
    fn zero_width_viewport_is_harmless() {
        let mut rng = SeededRandom::with_seed(9);
        let mut field = ConfettiField::new(Viewport::default(), 10, &mut rng);
        field.step(16.0, &mut rng);
        assert!(field.pieces().iter().all(|p| p.x == 0.0));
    }
}
