use crate::AgentId;

/// Read-only world access.
///
/// The kernel does not prescribe which queries a world must expose; perception and planning
/// crates define extension traits (`PerceptionWorld`, `AiWorld`) on top of this one.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink. Only the act phase of a tick receives it.
pub trait WorldMut: WorldView {}
