use ai_core::{ActionOutcome, ActionRuntime, Blackboard, TickContext, WorldMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtStatus {
    Running,
    Success,
    Failure,
}

impl From<ActionOutcome> for BtStatus {
    fn from(outcome: ActionOutcome) -> Self {
        match outcome {
            ActionOutcome::Success => BtStatus::Success,
            ActionOutcome::Failure => BtStatus::Failure,
        }
    }
}

/// A behaviour tree node, ticked in the think phase.
///
/// Nodes never touch the world directly: leaves that want something done queue a command on
/// the actor's runtime and report `Running` until it finishes.
pub trait BtNode<W>: 'static
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) -> BtStatus;

    /// Forgets progress. Leaves owning a command withdraw it.
    fn reset(&mut self, actions: &mut ActionRuntime<W>);

    fn debug_string(&self) -> String {
        let name = core::any::type_name::<Self>();
        let name = name.split('<').next().unwrap_or(name);
        name.rsplit("::").next().unwrap_or(name).to_string()
    }
}
