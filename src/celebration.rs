//! Self-expiring celebration flag.

/// Each activation arms a new generation; only the reset carrying the latest
/// generation may clear the flag, so overlapping reset timers are harmless.
#[derive(Clone, Debug, Default)]
pub struct CelebrationTrigger {
    active: bool,
    generation: u64,
}

impl CelebrationTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Set the flag and return the generation the matching reset must present.
    pub fn activate(&mut self) -> u64 {
        self.active = true;
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Clear the flag if `generation` is still current. Returns whether it changed.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.active {
            return false;
        }
        self.active = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_then_expiry() {
        let mut c = CelebrationTrigger::new();
        assert!(!c.is_active());
        let g = c.activate();
        assert!(c.is_active());
        assert!(c.expire(g));
        assert!(!c.is_active());
        assert!(!c.expire(g));
    }

    #[test]
    fn stale_reset_is_ignored_after_rearm() {
        let mut c = CelebrationTrigger::new();
        let first = c.activate();
        let second = c.activate();
        assert_ne!(first, second);
        assert!(!c.expire(first));
        assert!(c.is_active());
        assert!(c.expire(second));
    }
}
