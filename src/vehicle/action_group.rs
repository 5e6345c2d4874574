// ---------------------------------------------------------------------------
// RCS action group: the on/off toggle the controller asks for
// ---------------------------------------------------------------------------

/// Boolean on/off switch for the vessel's RCS thrusters.
///
/// The controller only states intent through this trait; how the flag
/// reaches the hardware belongs to the implementor.
pub trait ActionGroup {
    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);
}

/// Write the desired state only when it differs from the current one.
/// Returns true if a write happened.
pub fn ensure(group: &mut dyn ActionGroup, enabled: bool) -> bool {
    if group.is_enabled() == enabled {
        return false;
    }
    group.set_enabled(enabled);
    true
}

/// In-memory group used by the simulator; counts every write.
#[derive(Debug, Clone, Default)]
pub struct SimActionGroup {
    enabled: bool,
    writes: usize,
}

impl SimActionGroup {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, writes: 0 }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ActionGroup for SimActionGroup {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_skips_redundant_writes() {
        let mut group = SimActionGroup::new(false);
        assert!(!ensure(&mut group, false));
        assert!(ensure(&mut group, true));
        assert!(!ensure(&mut group, true));
        assert!(group.is_enabled());
        assert_eq!(group.writes(), 1);
    }
}
