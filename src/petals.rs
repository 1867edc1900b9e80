//! Floating petal layer: a few independent, endlessly looping drifts.

use crate::animation::{AnimationSpec, Easing, Property};
use crate::rng::RandomSource;

/// Horizontal drift range around each petal's anchor, px.
pub const OFFSET_RANGE: (f64, f64) = (-250.0, 250.0);
/// Where a fall ends, px below the card top.
pub const END_Y_RANGE: (f64, f64) = (600.0, 800.0);
/// One loop, ms.
pub const DURATION_RANGE_MS: (f64, f64) = (8_000.0, 12_000.0);
pub const STAGGER_MS: u32 = 600;

#[derive(Clone, Debug, PartialEq)]
pub struct Petal {
    pub index: usize,
    pub start_y: f64,
    pub end_y: f64,
    pub offset_x: f64,
    /// Anchor, percent of the container width.
    pub left_pct: f64,
    pub rotate_deg: f64,
    pub duration_ms: u32,
    pub delay_ms: u32,
}

impl Petal {
    fn generate(index: usize, rng: &mut impl RandomSource) -> Self {
        let i = index as f64;
        Self {
            index,
            start_y: -40.0 - i * 20.0,
            end_y: rng.range(END_Y_RANGE.0, END_Y_RANGE.1),
            offset_x: rng.range(OFFSET_RANGE.0, OFFSET_RANGE.1),
            left_pct: 10.0 + i * 12.0,
            rotate_deg: i * 45.0,
            duration_ms: rng.range(DURATION_RANGE_MS.0, DURATION_RANGE_MS.1) as u32,
            delay_ms: index as u32 * STAGGER_MS,
        }
    }

    /// Fall loop for this petal.
    pub fn animation(&self) -> AnimationSpec {
        AnimationSpec::new(format!("petal-{}", self.index), self.duration_ms)
            .track(Property::TranslateX, [self.offset_x, self.offset_x])
            .track(Property::TranslateY, [self.start_y, self.end_y])
            .track(Property::Rotate, [self.rotate_deg, self.rotate_deg])
            .track(Property::Opacity, [0.0, 1.0, 0.6, 0.0])
            .delay(self.delay_ms)
            .easing(Easing::EaseInOut)
            .infinite()
    }

    /// Inline placement; motion comes from the animation class.
    pub fn style(&self) -> String {
        format!(
            "position:absolute;left:{}%;top:0;width:24px;height:24px;border-radius:9999px;\
             background:#f9a8d4;filter:blur(4px);opacity:0;",
            self.left_pct
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PetalField {
    petals: Vec<Petal>,
}

impl PetalField {
    pub fn generate(count: usize, rng: &mut impl RandomSource) -> Self {
        Self {
            petals: (0..count).map(|i| Petal::generate(i, &mut *rng)).collect(),
        }
    }

    pub fn petals(&self) -> &[Petal] {
        &self.petals
    }

    pub fn animations(&self) -> Vec<AnimationSpec> {
        self.petals.iter().map(Petal::animation).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Repeat;
    use crate::rng::{ScriptedRandom, SeededRandom};

    #[test]
    fn layout_stays_in_bounds_for_many_seeds() {
        for seed in 0..64 {
            let field = PetalField::generate(8, &mut SeededRandom::with_seed(seed));
            assert_eq!(field.petals().len(), 8);
            for p in field.petals() {
                assert!((OFFSET_RANGE.0..OFFSET_RANGE.1).contains(&p.offset_x));
                assert!((END_Y_RANGE.0..END_Y_RANGE.1).contains(&p.end_y));
                assert!((8_000..12_000).contains(&p.duration_ms));
            }
        }
    }

    #[test]
    fn stagger_and_anchor_follow_index() {
        let field = PetalField::generate(8, &mut ScriptedRandom::new(vec![0.5]));
        let p = &field.petals()[3];
        assert_eq!(p.delay_ms, 1_800);
        assert_eq!(p.start_y, -100.0);
        assert_eq!(p.left_pct, 46.0);
        assert_eq!(p.rotate_deg, 135.0);
        assert_eq!(p.offset_x, 0.0);
        assert_eq!(p.end_y, 700.0);
    }

    #[test]
    fn every_petal_loops_forever() {
        let field = PetalField::generate(8, &mut SeededRandom::with_seed(1));
        let anims = field.animations();
        assert!(anims.iter().all(|a| a.repeat == Repeat::Infinite));
        assert!(anims[0].to_css().contains("@keyframes gc-petal-0"));
    }
}
