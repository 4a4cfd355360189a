//! The platform-wide kill switch.
//!
//! A single piece of shared, versioned state read at the top of every
//! decision path — not a broadcast to running agents. While engaged, no
//! evaluation starts anywhere in the core.

use std::sync::RwLock;

use tracing::{info, warn};

use concord_contracts::error::{GovResult, GovernanceError};

struct KillState {
    engaged: bool,
    /// Incremented on every engage, so operators can correlate refusals
    /// with a specific activation.
    version: u64,
    reason: String,
}

/// Shared, versioned halt-everything state.
pub struct KillSwitch {
    state: RwLock<KillState>,
}

impl KillSwitch {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(KillState {
                engaged: false,
                version: 0,
                reason: String::new(),
            }),
        }
    }

    /// Engage the switch. Returns the new activation version.
    pub fn engage(&self, reason: impl Into<String>) -> u64 {
        let mut state = self.state.write().expect("kill switch lock poisoned");
        state.engaged = true;
        state.version += 1;
        state.reason = reason.into();
        warn!(version = state.version, reason = %state.reason, "kill switch engaged");
        state.version
    }

    /// Release the switch; evaluations may resume.
    pub fn release(&self) {
        let mut state = self.state.write().expect("kill switch lock poisoned");
        if state.engaged {
            info!(version = state.version, "kill switch released");
        }
        state.engaged = false;
    }

    /// The check run at the top of every decision path.
    pub fn check(&self) -> GovResult<()> {
        let state = self.state.read().expect("kill switch lock poisoned");
        if state.engaged {
            return Err(GovernanceError::KillSwitchEngaged {
                version: state.version,
                reason: state.reason.clone(),
            });
        }
        Ok(())
    }

    /// True while engaged.
    pub fn is_engaged(&self) -> bool {
        self.state.read().expect("kill switch lock poisoned").engaged
    }
}

impl Default for KillSwitch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use concord_contracts::error::GovernanceError;

    use super::KillSwitch;

    #[test]
    fn engage_blocks_and_release_unblocks() {
        let switch = KillSwitch::new();
        assert!(switch.check().is_ok());

        let version = switch.engage("incident response drill");
        assert_eq!(version, 1);
        match switch.check().unwrap_err() {
            GovernanceError::KillSwitchEngaged { version, reason } => {
                assert_eq!(version, 1);
                assert!(reason.contains("drill"));
            }
            other => panic!("expected KillSwitchEngaged, got {:?}", other),
        }

        switch.release();
        assert!(switch.check().is_ok());
    }

    #[test]
    fn versions_increment_per_activation() {
        let switch = KillSwitch::new();
        assert_eq!(switch.engage("first"), 1);
        switch.release();
        assert_eq!(switch.engage("second"), 2);
    }
}
