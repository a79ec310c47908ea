//! Action templates: stateless, shared blueprints the planner searches over.
//!
//! Validation runs in three short-circuiting steps: a structural
//! [`validate_context_preconditions`](ActionTemplate::validate_context_preconditions) check
//! against the desired state, [`preconditions`](ActionTemplate::preconditions) which may query
//! memory and the world, and finally [`create_instance`](ActionTemplate::create_instance).

use ai_core::{Action, AgentId, StrId, WorldState, WsProp, WsValue};
use ai_perception::FactKind;
use serde::{Deserialize, Serialize};

use crate::actions::{
    EquipItemAction, GotoSmartObjAction, IdleAction, UseSmartObjAction, WanderAction,
};
use crate::goal::{IDLE_ACTION, WANDER_ACTION};
use crate::{ActorView, AiWorldMut};

pub trait ActionTemplate<W>: 'static
where
    W: AiWorldMut + 'static,
{
    fn name(&self) -> &StrId;

    /// Properties this action establishes. `Ref(p)` stands for the desired value of `p`.
    fn effects(&self) -> &WorldState;

    fn cost(&self) -> u32 {
        1
    }

    /// Higher precedence templates are tried first when several apply.
    fn precedence(&self) -> i32 {
        0
    }

    fn validate_context_preconditions(&self, _view: &ActorView<'_, W>, _desired: &WorldState) -> bool {
        true
    }

    /// What must hold before the action can run, or `None` if it cannot help right now.
    fn preconditions(&self, _view: &ActorView<'_, W>, _desired: &WorldState) -> Option<WorldState> {
        Some(WorldState::new())
    }

    fn create_instance(&self, view: &ActorView<'_, W>, desired: &WorldState) -> Box<dyn Action<W>>;

    fn debug_string(&self) -> String {
        format!("{}(cost={}, effects={})", self.name(), self.cost(), self.effects())
    }
}

/// Cost and precedence shared by every template description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateParams {
    pub cost: u32,
    pub precedence: i32,
    /// Movement speed in units per second, for templates that move the actor.
    pub speed: f32,
}

impl Default for TemplateParams {
    fn default() -> Self {
        Self {
            cost: 1,
            precedence: 0,
            speed: 1.5,
        }
    }
}

impl TemplateParams {
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_precedence(mut self, precedence: i32) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

macro_rules! template_common {
    () => {
        fn name(&self) -> &StrId {
            &self.name
        }

        fn effects(&self) -> &WorldState {
            &self.effects
        }

        fn cost(&self) -> u32 {
            self.params.cost
        }

        fn precedence(&self) -> i32 {
            self.params.precedence
        }
    };
}

#[derive(Debug, Clone)]
pub struct IdleTemplate {
    name: StrId,
    effects: WorldState,
    params: TemplateParams,
}

impl IdleTemplate {
    pub fn new(params: TemplateParams) -> Self {
        Self {
            name: StrId::from_static("Idle"),
            effects: WorldState::new().with_prop(WsProp::Action, IDLE_ACTION),
            params,
        }
    }
}

impl<W: AiWorldMut + 'static> ActionTemplate<W> for IdleTemplate {
    template_common!();

    fn create_instance(&self, _view: &ActorView<'_, W>, _desired: &WorldState) -> Box<dyn Action<W>> {
        Box::new(IdleAction)
    }
}

#[derive(Debug, Clone)]
pub struct WanderTemplate {
    name: StrId,
    effects: WorldState,
    params: TemplateParams,
}

impl WanderTemplate {
    pub fn new(params: TemplateParams) -> Self {
        Self {
            name: StrId::from_static("Wander"),
            effects: WorldState::new().with_prop(WsProp::Action, WANDER_ACTION),
            params,
        }
    }
}

impl<W: AiWorldMut + 'static> ActionTemplate<W> for WanderTemplate {
    template_common!();

    /// Wandering never serves a smart-object interaction.
    fn validate_context_preconditions(&self, _view: &ActorView<'_, W>, desired: &WorldState) -> bool {
        !desired.is_prop_set(WsProp::UsingSmartObj)
    }

    fn create_instance(&self, _view: &ActorView<'_, W>, _desired: &WorldState) -> Box<dyn Action<W>> {
        Box::new(WanderAction::new(self.params.speed))
    }
}

#[derive(Debug, Clone)]
pub struct GotoSmartObjTemplate {
    name: StrId,
    effects: WorldState,
    params: TemplateParams,
}

impl GotoSmartObjTemplate {
    pub fn new(params: TemplateParams) -> Self {
        Self {
            name: StrId::from_static("GotoSmartObj"),
            effects: WorldState::new()
                .with_prop(WsProp::AtEntityPos, WsValue::Ref(WsProp::AtEntityPos)),
            params,
        }
    }
}

impl<W: AiWorldMut + 'static> ActionTemplate<W> for GotoSmartObjTemplate {
    template_common!();

    fn validate_context_preconditions(&self, _view: &ActorView<'_, W>, desired: &WorldState) -> bool {
        desired
            .get(WsProp::AtEntityPos)
            .and_then(WsValue::as_entity)
            .is_some()
    }

    fn preconditions(&self, view: &ActorView<'_, W>, desired: &WorldState) -> Option<WorldState> {
        let target = desired.get(WsProp::AtEntityPos)?.as_entity()?;
        view.world.position(W::Agent::from_stable_id(target))?;
        Some(WorldState::new())
    }

    fn create_instance(&self, _view: &ActorView<'_, W>, desired: &WorldState) -> Box<dyn Action<W>> {
        let target = desired.get(WsProp::AtEntityPos).and_then(WsValue::as_entity);
        Box::new(GotoSmartObjAction::new(target, self.params.speed))
    }
}

#[derive(Debug, Clone)]
pub struct UseSmartObjTemplate {
    name: StrId,
    effects: WorldState,
    params: TemplateParams,
}

impl UseSmartObjTemplate {
    pub fn new(params: TemplateParams) -> Self {
        Self {
            name: StrId::from_static("UseSmartObj"),
            effects: WorldState::new()
                .with_prop(WsProp::Action, WsValue::Ref(WsProp::Action))
                .with_prop(WsProp::UsingSmartObj, WsValue::Ref(WsProp::UsingSmartObj)),
            params,
        }
    }

    fn target(desired: &WorldState) -> Option<(u64, &StrId)> {
        let target = desired.get(WsProp::UsingSmartObj)?.as_entity()?;
        let action = desired.get(WsProp::Action)?.as_id()?;
        Some((target, action))
    }
}

impl<W: AiWorldMut + 'static> ActionTemplate<W> for UseSmartObjTemplate {
    template_common!();

    fn validate_context_preconditions(&self, _view: &ActorView<'_, W>, desired: &WorldState) -> bool {
        Self::target(desired).is_some()
    }

    /// Needs a remembered smart object offering the action, and the actor standing at it
    /// (holding the required item, if any).
    fn preconditions(&self, view: &ActorView<'_, W>, desired: &WorldState) -> Option<WorldState> {
        let (target, action) = Self::target(desired)?;
        view.fact_confidence(FactKind::SmartObject, target)?;

        let entity = W::Agent::from_stable_id(target);
        if !view.world.offers_action(entity, action) {
            return None;
        }

        let mut pre = WorldState::new().with_prop(WsProp::AtEntityPos, WsValue::Entity(target));
        if let Some(item) = view.world.required_item(entity, action) {
            pre.set_prop(WsProp::ItemEquipped, item);
        }
        Some(pre)
    }

    fn create_instance(&self, _view: &ActorView<'_, W>, desired: &WorldState) -> Box<dyn Action<W>> {
        let target = desired.get(WsProp::UsingSmartObj).and_then(WsValue::as_entity);
        let action = desired
            .get(WsProp::Action)
            .and_then(WsValue::as_id)
            .cloned()
            .unwrap_or_default();
        Box::new(UseSmartObjAction::new(target, action))
    }
}

#[derive(Debug, Clone)]
pub struct EquipItemTemplate {
    name: StrId,
    effects: WorldState,
    params: TemplateParams,
}

impl EquipItemTemplate {
    pub fn new(params: TemplateParams) -> Self {
        Self {
            name: StrId::from_static("EquipItem"),
            effects: WorldState::new()
                .with_prop(WsProp::ItemEquipped, WsValue::Ref(WsProp::ItemEquipped)),
            params,
        }
    }
}

impl<W: AiWorldMut + 'static> ActionTemplate<W> for EquipItemTemplate {
    template_common!();

    fn validate_context_preconditions(&self, _view: &ActorView<'_, W>, desired: &WorldState) -> bool {
        desired
            .get(WsProp::ItemEquipped)
            .and_then(WsValue::as_id)
            .is_some()
    }

    fn preconditions(&self, view: &ActorView<'_, W>, desired: &WorldState) -> Option<WorldState> {
        let item = desired.get(WsProp::ItemEquipped)?.as_id()?;
        view.world
            .has_item(view.agent, item)
            .then(WorldState::new)
    }

    fn create_instance(&self, _view: &ActorView<'_, W>, desired: &WorldState) -> Box<dyn Action<W>> {
        let item = desired
            .get(WsProp::ItemEquipped)
            .and_then(WsValue::as_id)
            .cloned()
            .unwrap_or_default();
        Box::new(EquipItemAction::new(item))
    }
}
