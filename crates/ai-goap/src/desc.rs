//! Actor descriptions: which perceptors, sensors, goals and action templates an actor uses.
//!
//! ```yaml
//! perception:
//!   perceptors: [SmartObject, Overseer]
//!   sensors:
//!     - type: Vision
//!       config: { max_range: 15.0, max_fov_degrees: 140.0 }
//! goals:
//!   - { name: Work, personality_factor: 0.8, params: { actions: { Anvil: Hammer } } }
//!   - { name: Wander, personality_factor: 0.2 }
//! actions:
//!   - { name: GotoSmartObj, params: { speed: 2.0 } }
//!   - { name: UseSmartObj }
//!   - { name: Wander }
//!   - { name: Idle }
//! ```

use ai_core::StrId;
use ai_perception::{PerceptionDesc, PerceptionDescError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GoalPolicyConfig, PlannerConfig, TemplateParams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDesc {
    pub name: StrId,
    #[serde(default = "default_personality_factor")]
    pub personality_factor: f32,
    /// Goal-specific parameters, e.g. the Work goal's `actions` table.
    #[serde(default)]
    pub params: serde_json::Value,
}

fn default_personality_factor() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDesc {
    pub name: StrId,
    #[serde(default)]
    pub params: TemplateParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorDesc {
    pub perception: PerceptionDesc,
    pub goals: Vec<GoalDesc>,
    pub actions: Vec<TemplateDesc>,
    /// Without decision making the actor only runs externally queued commands.
    pub decision_making: bool,
    pub think_every_ticks: u32,
    pub planner: PlannerConfig,
    pub policy: GoalPolicyConfig,
}

impl Default for ActorDesc {
    fn default() -> Self {
        Self {
            perception: PerceptionDesc::default(),
            goals: Vec::new(),
            actions: Vec::new(),
            decision_making: true,
            think_every_ticks: 1,
            planner: PlannerConfig::default(),
            policy: GoalPolicyConfig::default(),
        }
    }
}

impl ActorDesc {
    pub fn from_json(text: &str) -> Result<Self, DescError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, DescError> {
        Ok(serde_yaml::from_str(text)?)
    }
}

#[derive(Debug, Error)]
pub enum DescError {
    #[error("invalid actor description JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid actor description YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown goal `{0}`")]
    UnknownGoal(StrId),

    #[error("invalid parameters for goal `{name}`: {source}")]
    GoalParams {
        name: StrId,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Perception(#[from] PerceptionDescError),
}
