//! Goal selection and regressive world-state planning.
//!
//! - [`Goal`]: relevance scoring plus a desired [`ai_core::WorldState`].
//! - [`ActionTemplate`]: shared blueprint validated against the desired state.
//! - [`Planner`]: regressive A* from the desired state back to the actor's state.
//! - [`GoalPlanningPolicy`]: the `ai_core::Policy` tying goals, planner and command queue.
//! - [`AiRegistry`] / [`ActorDesc`]: data-driven actor construction.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod actions;
pub mod desc;
pub mod goal;
pub mod planner;
pub mod policy;
pub mod registry;
pub mod template;
pub mod view;
pub mod world;

pub use actions::{
    EquipItemAction, GotoSmartObjAction, IdleAction, UseSmartObjAction, WanderAction,
    ARRIVAL_TOLERANCE,
};
pub use desc::{ActorDesc, DescError, GoalDesc, TemplateDesc};
pub use goal::{select_goal, Goal, GoalIdle, GoalWander, GoalWork, IDLE_ACTION, WANDER_ACTION};
pub use planner::{Plan, PlanStep, Planner, PlannerConfig};
pub use policy::{GoalPlanningPolicy, GoalPolicyConfig};
pub use registry::{AiRegistry, GoalFactory, TemplateFactory};
pub use template::{
    ActionTemplate, EquipItemTemplate, GotoSmartObjTemplate, IdleTemplate, TemplateParams,
    UseSmartObjTemplate, WanderTemplate,
};
pub use view::ActorView;
pub use world::{AiWorld, AiWorldMut};
