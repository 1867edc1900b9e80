//! Declarative animation table.
//!
//! Each entry lists what moves (property tracks), how long, after what delay and
//! how often. The DOM layer turns the table into CSS `@keyframes` once at mount;
//! nothing here runs per frame.

use std::fmt::Write as _;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Property {
    Opacity,
    Scale,
    /// Degrees.
    Rotate,
    /// Pixels.
    TranslateX,
    /// Pixels.
    TranslateY,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Infinite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOut,
    EaseInOut,
}

impl Easing {
    fn css(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

/// Values one property passes through, evenly spaced over the duration.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub property: Property,
    pub keyframes: Vec<f64>,
}

impl Track {
    pub fn new(property: Property, keyframes: impl Into<Vec<f64>>) -> Self {
        Self {
            property,
            keyframes: keyframes.into(),
        }
    }

    /// Linear interpolation at `t` in `[0, 1]`.
    pub fn sample(&self, t: f64) -> f64 {
        match self.keyframes.as_slice() {
            [] => 0.0,
            [only] => *only,
            frames => {
                let span = (frames.len() - 1) as f64;
                let pos = t.clamp(0.0, 1.0) * span;
                let i = (pos.floor() as usize).min(frames.len() - 2);
                let local = pos - i as f64;
                frames[i] + (frames[i + 1] - frames[i]) * local
            }
        }
    }

    fn stops(&self) -> impl Iterator<Item = f64> + '_ {
        let span = self.keyframes.len().saturating_sub(1).max(1) as f64;
        (0..self.keyframes.len()).map(move |i| i as f64 / span)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSpec {
    /// Used for both the `@keyframes` name and the CSS class.
    pub name: String,
    pub tracks: Vec<Track>,
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub repeat: Repeat,
    pub easing: Easing,
}

impl AnimationSpec {
    pub fn new(name: impl Into<String>, duration_ms: u32) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
            duration_ms,
            delay_ms: 0,
            repeat: Repeat::Once,
            easing: Easing::EaseInOut,
        }
    }

    pub fn track(mut self, property: Property, keyframes: impl Into<Vec<f64>>) -> Self {
        self.tracks.push(Track::new(property, keyframes));
        self
    }

    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn infinite(mut self) -> Self {
        self.repeat = Repeat::Infinite;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn class_name(&self) -> String {
        format!("gc-{}", self.name)
    }

    /// Sorted union of every track's keyframe offsets.
    fn stops(&self) -> Vec<f64> {
        let mut stops: Vec<f64> = self.tracks.iter().flat_map(Track::stops).collect();
        stops.sort_by(f64::total_cmp);
        stops.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        if stops.is_empty() {
            stops = vec![0.0, 1.0];
        }
        stops
    }

    fn frame_declarations(&self, t: f64) -> String {
        let mut out = String::new();
        let mut transform = String::new();
        for track in &self.tracks {
            let v = fmt_num(track.sample(t));
            match track.property {
                Property::Opacity => {
                    let _ = write!(out, "opacity:{v};");
                }
                Property::TranslateX => {
                    let _ = write!(transform, "translateX({v}px) ");
                }
                Property::TranslateY => {
                    let _ = write!(transform, "translateY({v}px) ");
                }
                Property::Scale => {
                    let _ = write!(transform, "scale({v}) ");
                }
                Property::Rotate => {
                    let _ = write!(transform, "rotate({v}deg) ");
                }
            }
        }
        if !transform.is_empty() {
            let _ = write!(out, "transform:{};", transform.trim_end());
        }
        out
    }

    /// `@keyframes` block plus a class applying it.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        let _ = write!(css, "@keyframes {}{{", self.class_name());
        for t in self.stops() {
            let _ = write!(css, "{}%{{{}}}", fmt_num(t * 100.0), self.frame_declarations(t));
        }
        css.push('}');
        let iterations = match self.repeat {
            Repeat::Once => "1",
            Repeat::Infinite => "infinite",
        };
        let _ = write!(
            css,
            ".{name}{{animation:{name} {}ms {} {}ms {} both;}}",
            self.duration_ms,
            self.easing.css(),
            self.delay_ms,
            iterations,
            name = self.class_name(),
        );
        css
    }
}

// Three decimals is plenty for pixels, degrees and opacity.
fn fmt_num(v: f64) -> String {
    let r = (v * 1_000.0).round() / 1_000.0;
    if r == 0.0 { "0".to_string() } else { format!("{r}") }
}

pub const CARD_ENTER: &str = "card-enter";
pub const HALO_SPIN: &str = "halo-spin";
pub const HEART_PULSE: &str = "heart-pulse";
pub const HEADLINE_RISE: &str = "headline-rise";
pub const MESSAGE_RISE: &str = "message-rise";
pub const SURPRISE_FADE: &str = "surprise-fade";

/// Fixed transitions of the card, excluding the per-petal loops.
pub fn page_animations() -> Vec<AnimationSpec> {
    vec![
        AnimationSpec::new(CARD_ENTER, 800)
            .track(Property::Scale, [0.9, 1.0])
            .track(Property::Opacity, [0.0, 1.0])
            .easing(Easing::EaseOut),
        AnimationSpec::new(HALO_SPIN, 20_000)
            .track(Property::Rotate, [0.0, 360.0])
            .easing(Easing::Linear)
            .infinite(),
        AnimationSpec::new(HEART_PULSE, 3_000)
            .track(Property::Scale, [1.0, 1.06, 1.0])
            .infinite(),
        AnimationSpec::new(HEADLINE_RISE, 300)
            .track(Property::TranslateY, [20.0, 0.0])
            .track(Property::Opacity, [0.0, 1.0])
            .delay(200),
        AnimationSpec::new(MESSAGE_RISE, 300)
            .track(Property::TranslateY, [20.0, 0.0])
            .track(Property::Opacity, [0.0, 1.0])
            .delay(400),
        AnimationSpec::new(SURPRISE_FADE, 300)
            .track(Property::Opacity, [0.0, 1.0])
            .delay(600),
    ]
}

/// Stylesheet text for a whole table.
pub fn stylesheet<'a>(specs: impl IntoIterator<Item = &'a AnimationSpec>) -> String {
    specs.into_iter().map(AnimationSpec::to_css).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_interpolates_between_keyframes() {
        let t = Track::new(Property::Scale, [1.0, 1.06, 1.0]);
        assert_eq!(t.sample(0.0), 1.0);
        assert!((t.sample(0.5) - 1.06).abs() < 1e-12);
        assert!((t.sample(0.25) - 1.03).abs() < 1e-12);
        assert_eq!(t.sample(1.0), 1.0);
        assert_eq!(t.sample(7.0), 1.0);
    }

    #[test]
    fn halo_spin_renders_infinite_linear_rotation() {
        let specs = page_animations();
        let halo = specs.iter().find(|s| s.name == HALO_SPIN).unwrap();
        let css = halo.to_css();
        assert!(css.starts_with("@keyframes gc-halo-spin{"));
        assert!(css.contains("0%{transform:rotate(0deg);}"));
        assert!(css.contains("100%{transform:rotate(360deg);}"));
        assert!(css.contains(".gc-halo-spin{animation:gc-halo-spin 20000ms linear 0ms infinite both;}"));
    }

    #[test]
    fn mixed_tracks_share_one_transform_and_union_stops() {
        let spec = AnimationSpec::new("mixed", 1_000)
            .track(Property::TranslateY, [0.0, 100.0])
            .track(Property::Opacity, [0.0, 1.0, 0.0]);
        let css = spec.to_css();
        assert!(css.contains("50%{opacity:1;transform:translateY(50px);}"));
        assert!(css.contains(".gc-mixed{animation:gc-mixed 1000ms ease-in-out 0ms 1 both;}"));
    }

    #[test]
    fn entrance_delays_follow_reading_order() {
        let specs = page_animations();
        let delay = |name: &str| specs.iter().find(|s| s.name == name).unwrap().delay_ms;
        assert!(delay(HEADLINE_RISE) < delay(MESSAGE_RISE));
        assert!(delay(MESSAGE_RISE) < delay(SURPRISE_FADE));
        assert!(stylesheet(&specs).contains("@keyframes gc-card-enter"));
    }
}
