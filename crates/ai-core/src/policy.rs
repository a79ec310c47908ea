use crate::{ActionRuntime, Blackboard, TickContext, WorldMut};

/// Decision-making front end (goal planner, behaviour tree, script).
///
/// Policies run in the think phase: they read the world, may write the actor's blackboard
/// and submit commands to the runtime's queue, but never tick actions themselves.
pub trait Policy<W>: 'static
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
    );
}

/// Per-tick input stage (perception). Runs before the policy, every tick.
pub trait Sense<W>: 'static
where
    W: WorldMut + 'static,
{
    fn update(&mut self, ctx: &TickContext, agent: W::Agent, world: &W, blackboard: &mut Blackboard);
}
