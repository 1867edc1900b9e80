//! Last-known window size.

use crate::host::Viewport;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportTracker {
    current: Viewport,
}

impl ViewportTracker {
    /// Missing size information falls back to 0x0.
    pub fn new(initial: Option<Viewport>) -> Self {
        Self {
            current: initial.unwrap_or_default(),
        }
    }

    pub fn current(&self) -> Viewport {
        self.current
    }

    /// Record a reported size; `None` keeps the last-known value.
    pub fn update(&mut self, reported: Option<Viewport>) -> bool {
        match reported {
            Some(v) if v != self.current => {
                self.current = v;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_size_defaults_to_zero() {
        assert_eq!(ViewportTracker::new(None).current(), Viewport::new(0, 0));
    }

    #[test]
    fn update_sets_exact_size_and_ignores_missing() {
        let mut t = ViewportTracker::new(Some(Viewport::new(100, 50)));
        assert!(t.update(Some(Viewport::new(1920, 1080))));
        assert_eq!(t.current(), Viewport::new(1920, 1080));
        assert!(!t.update(None));
        assert_eq!(t.current(), Viewport::new(1920, 1080));
        assert!(!t.update(Some(Viewport::new(1920, 1080))));
    }
}
