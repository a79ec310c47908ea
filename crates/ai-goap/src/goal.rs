//! Goals: relevance scoring and the world state they want.

use std::collections::BTreeMap;

use ai_core::{AgentId, StrId, WorldState, WsProp, WsValue};
use ai_perception::{FactKind, MemoryFact};

use crate::{ActorView, AiWorld};

pub const IDLE_ACTION: StrId = StrId::from_static("Idle");
pub const WANDER_ACTION: StrId = StrId::from_static("Wander");

/// A behaviour archetype with a relevance score and a desired world state.
///
/// Goals are stateless between ticks: the policy re-evaluates relevance every decision tick
/// and asks the winner for its desired properties.
pub trait Goal<W>: 'static
where
    W: AiWorld,
{
    fn name(&self) -> &StrId;

    /// Static weight in `[0, 1]` from the actor description.
    fn personality_factor(&self) -> f32;

    fn eval_relevance(&self, view: &ActorView<'_, W>) -> f32;

    fn desired_props(&self, view: &ActorView<'_, W>) -> WorldState;

    fn is_satisfied(&self, view: &ActorView<'_, W>) -> bool {
        let desired = self.desired_props(view);
        !desired.is_empty() && view.state.satisfies(&desired)
    }

    fn debug_string(&self) -> String {
        format!("{}(pf={})", self.name(), self.personality_factor())
    }
}

/// Index of the goal with strictly greatest relevance above zero. Equal relevances go to the
/// goal registered first; `excluded` goals are skipped.
pub fn select_goal(relevance: &[f32], excluded: &[bool]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in relevance.iter().enumerate() {
        if excluded.get(idx).copied().unwrap_or(false) || value.is_nan() || value <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_value)) if best_value >= value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Fallback goal. Its near-zero relevance loses to any other active goal.
#[derive(Debug, Clone)]
pub struct GoalIdle {
    name: StrId,
    personality_factor: f32,
}

impl GoalIdle {
    pub const RELEVANCE_SCALE: f32 = 0.01;

    pub fn new(personality_factor: f32) -> Self {
        Self {
            name: StrId::from_static("Idle"),
            personality_factor: personality_factor.clamp(0.0, 1.0),
        }
    }
}

impl Default for GoalIdle {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl<W: AiWorld> Goal<W> for GoalIdle {
    fn name(&self) -> &StrId {
        &self.name
    }

    fn personality_factor(&self) -> f32 {
        self.personality_factor
    }

    fn eval_relevance(&self, _view: &ActorView<'_, W>) -> f32 {
        self.personality_factor * Self::RELEVANCE_SCALE
    }

    fn desired_props(&self, _view: &ActorView<'_, W>) -> WorldState {
        WorldState::new().with_prop(WsProp::Action, IDLE_ACTION)
    }
}

#[derive(Debug, Clone)]
pub struct GoalWander {
    name: StrId,
    personality_factor: f32,
}

impl GoalWander {
    pub fn new(personality_factor: f32) -> Self {
        Self {
            name: StrId::from_static("Wander"),
            personality_factor: personality_factor.clamp(0.0, 1.0),
        }
    }
}

impl<W: AiWorld> Goal<W> for GoalWander {
    fn name(&self) -> &StrId {
        &self.name
    }

    fn personality_factor(&self) -> f32 {
        self.personality_factor
    }

    fn eval_relevance(&self, _view: &ActorView<'_, W>) -> f32 {
        self.personality_factor
    }

    fn desired_props(&self, _view: &ActorView<'_, W>) -> WorldState {
        WorldState::new().with_prop(WsProp::Action, WANDER_ACTION)
    }
}

/// Work at a remembered smart object.
///
/// `actions` maps smart-object type to the action performed on it. Relevance is
/// `pf * object_confidence * (0.5 + 0.5 * overseer_confidence)`, zero when no remembered
/// smart object has a mapped type.
#[derive(Debug, Clone)]
pub struct GoalWork {
    name: StrId,
    personality_factor: f32,
    actions: BTreeMap<StrId, StrId>,
}

impl GoalWork {
    pub fn new(personality_factor: f32, actions: BTreeMap<StrId, StrId>) -> Self {
        Self {
            name: StrId::from_static("Work"),
            personality_factor: personality_factor.clamp(0.0, 1.0),
            actions,
        }
    }

    pub fn with_action(mut self, object_type: impl Into<StrId>, action: impl Into<StrId>) -> Self {
        self.actions.insert(object_type.into(), action.into());
        self
    }

    pub fn actions(&self) -> &BTreeMap<StrId, StrId> {
        &self.actions
    }

    /// Most confident remembered smart object this goal can work at.
    fn target<'a, W: AiWorld>(
        &self,
        view: &ActorView<'a, W>,
    ) -> Option<(&'a MemoryFact<W::Agent>, f32, &StrId)> {
        let memory = view.memory?;
        let (fact, confidence) = memory.most_confident_by(view.now(), |f| {
            f.kind == FactKind::SmartObject
                && f
                    .smart_object_type()
                    .is_some_and(|t| self.actions.contains_key(t))
        })?;
        let action = self.actions.get(fact.smart_object_type()?)?;
        Some((fact, confidence, action))
    }
}

impl<W: AiWorld> Goal<W> for GoalWork {
    fn name(&self) -> &StrId {
        &self.name
    }

    fn personality_factor(&self) -> f32 {
        self.personality_factor
    }

    fn eval_relevance(&self, view: &ActorView<'_, W>) -> f32 {
        let Some((_, object_confidence, _)) = self.target(view) else {
            return 0.0;
        };
        let overseer = view
            .memory
            .and_then(|m| m.most_confident(FactKind::Overseer, view.now()))
            .map(|(_, c)| c)
            .unwrap_or(0.0);
        self.personality_factor * object_confidence * (0.5 + 0.5 * overseer)
    }

    fn desired_props(&self, view: &ActorView<'_, W>) -> WorldState {
        let Some((fact, _, action)) = self.target(view) else {
            return WorldState::new();
        };
        WorldState::new()
            .with_prop(WsProp::Action, action.clone())
            .with_prop(
                WsProp::UsingSmartObj,
                WsValue::Entity(fact.source.stable_id()),
            )
    }

    fn debug_string(&self) -> String {
        let table: Vec<String> = self
            .actions
            .iter()
            .map(|(t, a)| format!("{t}->{a}"))
            .collect();
        format!("Work(pf={}, [{}])", self.personality_factor, table.join(", "))
    }
}
