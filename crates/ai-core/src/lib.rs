//! Deterministic, engine-agnostic actor AI kernel.
//!
//! - [`WorldState`]: symbolic property bag shared by goals, templates and the planner.
//! - [`Action`] / [`ActionInstance`]: the activate/update/deactivate lifecycle.
//! - [`ActionRuntime`]: per-actor command queue feeding an execution stack.
//! - [`Brain`]: senses + policy + runtime for one actor, ticked in think/act phases.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod agent;
pub mod blackboard;
pub mod brain;
pub mod error;
pub mod math;
pub mod policy;
pub mod rng;
pub mod runtime;
pub mod sequence;
pub mod strid;
pub mod tick;
pub mod world;
pub mod world_state;

pub use action::{Action, ActionInstance, ActionOutcome, ActionState, ActionStatus};
pub use agent::AgentId;
pub use blackboard::{BbKey, Blackboard};
pub use brain::{tick_brains, Brain, BrainConfig};
pub use error::WorldStateError;
pub use math::Vec3;
pub use policy::{Policy, Sense};
pub use rng::{DeterministicRng, SplitMix64};
pub use runtime::{ActionRuntime, CommandId};
pub use sequence::ActionSequence;
pub use strid::StrId;
pub use tick::TickContext;
pub use world::{WorldMut, WorldView};
pub use world_state::{WorldState, WsProp, WsValue};
