//! Reveal lifecycle: `Typing -> Revealed`, with no way back.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealPhase {
    #[default]
    Typing,
    Revealed,
}

/// Tracks whether the full message and surprise panel are shown.
///
/// Reveal is triggered either by the delayed timer or by the user; whichever
/// comes second is a no-op.
#[derive(Clone, Debug, Default)]
pub struct RevealScheduler {
    phase: RevealPhase,
}

impl RevealScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn is_revealed(&self) -> bool {
        self.phase == RevealPhase::Revealed
    }

    /// Returns `true` only on the transition.
    pub fn reveal(&mut self) -> bool {
        let changed = self.phase == RevealPhase::Typing;
        self.phase = RevealPhase::Revealed;
        changed
    }
}
