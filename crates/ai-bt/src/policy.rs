use ai_core::{ActionRuntime, Blackboard, Policy, TickContext, WorldMut};
use ai_tools::{emit as trace_emit, TraceEvent};

use crate::bt::{BtNode, BtStatus};

/// Runs a behaviour tree as the actor's decision making.
pub struct BtPolicy<W>
where
    W: WorldMut + 'static,
{
    root: Box<dyn BtNode<W>>,
    last: Option<BtStatus>,
}

impl<W> BtPolicy<W>
where
    W: WorldMut + 'static,
{
    pub fn new(root: Box<dyn BtNode<W>>) -> Self {
        Self { root, last: None }
    }

    pub fn last_status(&self) -> Option<BtStatus> {
        self.last
    }
}

impl<W> Policy<W> for BtPolicy<W>
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
    ) {
        let status = self.root.tick(ctx, agent, world, blackboard, actions);
        if self.last != Some(status) {
            trace_emit(
                blackboard,
                TraceEvent::for_agent(ctx, agent, "bt.status")
                    .with_a(status as u64)
                    .with_detail(self.root.debug_string()),
            );
        }
        self.last = Some(status);
        if status != BtStatus::Running {
            self.root.reset(actions);
        }
    }
}
