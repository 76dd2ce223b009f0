//! Propagation: amplify negative statuses applied to the holder.

use crate::core::StatusId;
use crate::host::{CombatServices, StatusDisplay};

use super::StackReactor;

/// How a propagation status amplifies an incoming count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropagationMode {
    /// Add the holder's own stacks of the propagation status.
    AddOwnStacks,
    /// Multiply by a fixed factor.
    Multiply(i64),
}

/// Amplifies incoming negative, propagatable statuses.
///
/// Never reacts to its own status being added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Propagation {
    pub status: StatusId,
    pub mode: PropagationMode,
}

impl Propagation {
    #[must_use]
    pub const fn add_own_stacks(status: StatusId) -> Self {
        Self {
            status,
            mode: PropagationMode::AddOwnStacks,
        }
    }

    #[must_use]
    pub const fn multiply(status: StatusId, factor: i64) -> Self {
        Self {
            status,
            mode: PropagationMode::Multiply(factor),
        }
    }
}

impl StackReactor for Propagation {
    fn on_other_status_added(
        &self,
        own_stacks: i64,
        incoming: StatusId,
        pending: i64,
        services: &dyn CombatServices,
    ) -> i64 {
        if incoming == self.status {
            return pending;
        }
        let amplifies = services
            .status_info(incoming)
            .is_some_and(|info| info.propagatable && info.display == StatusDisplay::Negative);
        if !amplifies {
            return pending;
        }
        match self.mode {
            PropagationMode::AddOwnStacks => pending.saturating_add(own_stacks),
            PropagationMode::Multiply(factor) => pending.saturating_mul(factor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryCombat, StatusInfo};

    const HEX: StatusId = StatusId(1);
    const FROSTBITE: StatusId = StatusId(2);
    const ROOTED: StatusId = StatusId(3);
    const RAGE: StatusId = StatusId(4);

    fn host() -> MemoryCombat {
        let mut host = MemoryCombat::new(1);
        host.define_status(StatusInfo::new(HEX, "hex", StatusDisplay::Negative).propagatable());
        host.define_status(StatusInfo::new(FROSTBITE, "frostbite", StatusDisplay::Negative).propagatable());
        host.define_status(StatusInfo::new(ROOTED, "rooted", StatusDisplay::Negative));
        host.define_status(StatusInfo::new(RAGE, "rage", StatusDisplay::Positive).propagatable());
        host
    }

    #[test]
    fn test_add_own_stacks() {
        let host = host();
        let hex = Propagation::add_own_stacks(HEX);
        assert_eq!(hex.on_other_status_added(4, FROSTBITE, 4, &host), 8);
    }

    #[test]
    fn test_only_negative_propagatable_others() {
        let host = host();
        let hex = Propagation::multiply(HEX, 2);
        assert_eq!(hex.on_other_status_added(1, FROSTBITE, 3, &host), 6);
        assert_eq!(hex.on_other_status_added(1, ROOTED, 3, &host), 3);
        assert_eq!(hex.on_other_status_added(1, RAGE, 3, &host), 3);
        assert_eq!(hex.on_other_status_added(1, HEX, 3, &host), 3);
        // Unknown statuses are left alone.
        assert_eq!(hex.on_other_status_added(1, StatusId(99), 3, &host), 3);
    }
}
