//! Concrete actions instantiated by the built-in templates.

use ai_core::{
    Action, ActionStatus, AgentId, Blackboard, StrId, TickContext, Vec3,
};

use crate::AiWorldMut;

/// Distance at which a moving actor counts as arrived.
pub const ARRIVAL_TOLERANCE: f32 = 0.009;

/// RNG stream for wander destinations.
const WANDER_STREAM: u64 = 0x57A2;

/// Straight-line step towards `target` at `speed` units per second.
fn step_to<W: AiWorldMut>(
    ctx: &TickContext,
    agent: W::Agent,
    world: &mut W,
    target: Vec3,
    speed: f32,
) -> ActionStatus {
    let Some(position) = world.position(agent) else {
        return ActionStatus::Failure;
    };
    let next = position.step_towards(target, speed.max(0.0) * ctx.dt_seconds);
    world.set_position(agent, next);
    if next.distance_squared(target) <= ARRIVAL_TOLERANCE * ARRIVAL_TOLERANCE {
        ActionStatus::Success
    } else {
        ActionStatus::Running
    }
}

/// Does nothing, forever. Only ends when deactivated.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleAction;

impl<W: AiWorldMut + 'static> Action<W> for IdleAction {
    fn update(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActionStatus {
        ActionStatus::Running
    }

    fn debug_string(&self) -> String {
        "Idle".to_string()
    }
}

/// Walks to a world-chosen random destination.
#[derive(Debug, Clone)]
pub struct WanderAction {
    speed: f32,
    destination: Option<Vec3>,
}

impl WanderAction {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            destination: None,
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }
}

impl<W: AiWorldMut + 'static> Action<W> for WanderAction {
    fn activate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> bool {
        let mut rng = ctx.rng_for_agent(agent, WANDER_STREAM);
        self.destination = world.random_destination(agent, &mut rng);
        self.destination.is_some()
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActionStatus {
        match self.destination {
            Some(target) => step_to(ctx, agent, world, target, self.speed),
            None => ActionStatus::Failure,
        }
    }

    fn deactivate(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) {
        self.destination = None;
    }

    fn debug_string(&self) -> String {
        match self.destination {
            Some(d) => format!("Wander(to=({:.2}, {:.2}, {:.2}))", d.x, d.y, d.z),
            None => "Wander".to_string(),
        }
    }
}

/// Walks to a smart object's current position.
#[derive(Debug, Clone)]
pub struct GotoSmartObjAction {
    target: Option<u64>,
    speed: f32,
}

impl GotoSmartObjAction {
    pub fn new(target: Option<u64>, speed: f32) -> Self {
        Self { target, speed }
    }
}

impl<W: AiWorldMut + 'static> Action<W> for GotoSmartObjAction {
    fn activate(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> bool {
        self.target
            .is_some_and(|t| world.position(W::Agent::from_stable_id(t)).is_some())
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActionStatus {
        let target = self
            .target
            .and_then(|t| world.position(W::Agent::from_stable_id(t)));
        match target {
            Some(target) => step_to(ctx, agent, world, target, self.speed),
            None => ActionStatus::Failure,
        }
    }

    fn is_valid(&self, _ctx: &TickContext, _agent: W::Agent, world: &W) -> bool {
        self.target
            .is_some_and(|t| world.position(W::Agent::from_stable_id(t)).is_some())
    }

    fn debug_string(&self) -> String {
        match self.target {
            Some(t) => format!("GotoSmartObj(#{t})"),
            None => "GotoSmartObj(?)".to_string(),
        }
    }
}

/// Occupies a smart object slot for the world-reported duration of `action`.
#[derive(Debug, Clone)]
pub struct UseSmartObjAction {
    target: Option<u64>,
    action: StrId,
    remaining: f32,
    reserved: bool,
}

impl UseSmartObjAction {
    pub fn new(target: Option<u64>, action: StrId) -> Self {
        Self {
            target,
            action,
            remaining: 0.0,
            reserved: false,
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved
    }
}

impl<W: AiWorldMut + 'static> Action<W> for UseSmartObjAction {
    fn activate(
        &mut self,
        _ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> bool {
        let Some(target) = self.target.map(W::Agent::from_stable_id) else {
            return false;
        };
        if !world.offers_action(target, &self.action) {
            return false;
        }
        if !world.reserve_smart_object(agent, target) {
            return false;
        }
        self.reserved = true;
        self.remaining = world.use_duration(target, &self.action).unwrap_or(0.0);
        true
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActionStatus {
        self.remaining -= ctx.dt_seconds;
        if self.remaining <= 0.0 {
            ActionStatus::Success
        } else {
            ActionStatus::Running
        }
    }

    fn deactivate(
        &mut self,
        _ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) {
        if let (true, Some(target)) = (self.reserved, self.target) {
            world.release_smart_object(agent, W::Agent::from_stable_id(target));
        }
        self.reserved = false;
    }

    fn is_valid(&self, _ctx: &TickContext, _agent: W::Agent, world: &W) -> bool {
        self.target
            .is_some_and(|t| world.offers_action(W::Agent::from_stable_id(t), &self.action))
    }

    fn debug_string(&self) -> String {
        match self.target {
            Some(t) => format!("UseSmartObj(#{t}, '{}', {:.2}s left)", self.action, self.remaining),
            None => format!("UseSmartObj(?, '{}')", self.action),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EquipItemAction {
    item: StrId,
}

impl EquipItemAction {
    pub fn new(item: StrId) -> Self {
        Self { item }
    }
}

impl<W: AiWorldMut + 'static> Action<W> for EquipItemAction {
    fn activate(
        &mut self,
        _ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> bool {
        // the item may have been dropped since planning
        world.has_item(agent, &self.item)
    }

    fn update(
        &mut self,
        _ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActionStatus {
        if world.equip_item(agent, &self.item) {
            ActionStatus::Success
        } else {
            ActionStatus::Failure
        }
    }

    fn debug_string(&self) -> String {
        format!("EquipItem('{}')", self.item)
    }
}
