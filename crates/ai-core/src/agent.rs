use core::fmt::Debug;

/// Stable identifier for an actor or any other world entity.
///
/// Deterministic simulation requires:
/// - stable ordering (`Ord`)
/// - a stable numeric ID (`stable_id`) for seeding, logs and world-state values
///
/// `from_stable_id` is the inverse of `stable_id`; world-state properties store entity
/// references as their stable ID and actions turn them back into handles.
pub trait AgentId: Copy + Ord + Eq + Debug + 'static {
    fn stable_id(self) -> u64;

    fn from_stable_id(id: u64) -> Self;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }

    fn from_stable_id(id: u64) -> Self {
        id
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }

    fn from_stable_id(id: u64) -> Self {
        id as u32
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }

    fn from_stable_id(id: u64) -> Self {
        id as usize
    }
}
