use ai_core::{AgentId, Blackboard, TickContext, WorldState, WsProp};
use ai_perception::{memory_key, FactKind, FactMask, MemoryFact, MemorySystem};

use crate::AiWorld;

/// Everything goals and templates may read while an actor is deciding.
pub struct ActorView<'a, W>
where
    W: AiWorld,
{
    pub ctx: &'a TickContext,
    pub agent: W::Agent,
    pub world: &'a W,
    pub memory: Option<&'a MemorySystem<W::Agent>>,
    /// The actor's current world state.
    pub state: WorldState,
}

impl<'a, W> ActorView<'a, W>
where
    W: AiWorld,
{
    pub fn new(ctx: &'a TickContext, agent: W::Agent, world: &'a W, blackboard: &'a Blackboard) -> Self {
        let mut state = WorldState::new();
        world.fill_world_state(agent, &mut state);
        state.clear_prop(WsProp::Action);
        Self {
            ctx,
            agent,
            world,
            memory: blackboard.get(memory_key::<W::Agent>()),
            state,
        }
    }

    pub fn now(&self) -> f64 {
        self.ctx.time_seconds
    }

    /// Current confidence of a remembered fact of `kind` about `entity`.
    pub fn fact_confidence(&self, kind: FactKind, entity: u64) -> Option<(&'a MemoryFact<W::Agent>, f32)> {
        let memory = self.memory?;
        let pattern = MemoryFact::pattern(kind, W::Agent::from_stable_id(entity));
        let fact = memory.find(&pattern, FactMask::KIND | FactMask::SOURCE)?;
        let confidence = memory.confidence(fact, self.now());
        (confidence > 0.0).then_some((fact, confidence))
    }
}
