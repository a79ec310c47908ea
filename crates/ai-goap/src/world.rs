use ai_core::{SplitMix64, StrId, Vec3, WorldMut, WorldState, WorldView};

/// Read-only world queries used by goals, templates and actions.
///
/// Entities are addressed with the world's agent handle type; world-state values carry their
/// stable id (`AgentId::stable_id`).
pub trait AiWorld: WorldView {
    /// Writes the actor's world-grounded properties (`AtEntityPos`, `UsingSmartObj`, items).
    /// `Action` is never read from the world: it names what the actor should be doing and is
    /// only reached by planning.
    fn fill_world_state(&self, agent: Self::Agent, state: &mut WorldState);

    fn position(&self, entity: Self::Agent) -> Option<Vec3>;

    /// A destination for wandering, or `None` if the actor cannot wander right now.
    fn random_destination(&self, _agent: Self::Agent, _rng: &mut SplitMix64) -> Option<Vec3> {
        None
    }

    fn offers_action(&self, smart_object: Self::Agent, action: &StrId) -> bool;

    /// Seconds `action` takes on `smart_object`.
    fn use_duration(&self, _smart_object: Self::Agent, _action: &StrId) -> Option<f32> {
        None
    }

    /// Item that must be equipped to perform `action` on `smart_object`.
    fn required_item(&self, _smart_object: Self::Agent, _action: &StrId) -> Option<StrId> {
        None
    }

    fn has_item(&self, _agent: Self::Agent, _item: &StrId) -> bool {
        false
    }
}

/// World mutations performed by actions in the act phase.
pub trait AiWorldMut: AiWorld + WorldMut {
    fn set_position(&mut self, agent: Self::Agent, position: Vec3);

    /// Claims a user slot. `false` when the object is full or gone.
    fn reserve_smart_object(&mut self, agent: Self::Agent, smart_object: Self::Agent) -> bool;

    fn release_smart_object(&mut self, agent: Self::Agent, smart_object: Self::Agent);

    fn equip_item(&mut self, _agent: Self::Agent, _item: &StrId) -> bool {
        false
    }
}
