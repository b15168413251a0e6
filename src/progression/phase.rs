use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum SeedPhase {
    #[default]
    Phase1,
    Phase2,
    Phase3,
    Phase4,
}

impl SeedPhase {
    pub fn next(self) -> Option<SeedPhase> {
        match self {
            SeedPhase::Phase1 => Some(SeedPhase::Phase2),
            SeedPhase::Phase2 => Some(SeedPhase::Phase3),
            SeedPhase::Phase3 => Some(SeedPhase::Phase4),
            SeedPhase::Phase4 => None,
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedPhaseTracker {
    pub current: SeedPhase,
}

impl SeedPhaseTracker {
    /// Step one phase forward. `None` once the last phase is reached.
    pub fn try_advance(&mut self) -> Option<SeedPhase> {
        let next = self.current.next()?;
        self.current = next;
        Some(next)
    }
}
