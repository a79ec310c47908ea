use std::collections::BTreeMap;
use std::rc::Rc;

use ai_core::{Brain, BrainConfig, StrId};
use ai_perception::{PerceptionWorld, PerceptorRegistry};
use serde::Deserialize;
use tracing::warn;

use crate::{
    ActionTemplate, ActorDesc, AiWorldMut, DescError, EquipItemTemplate, Goal, GoalDesc, GoalIdle,
    GoalPlanningPolicy, GoalWander, GoalWork, GotoSmartObjTemplate, IdleTemplate, Planner,
    TemplateParams, UseSmartObjTemplate, WanderTemplate,
};

pub type GoalFactory<W> = fn(&GoalDesc) -> Result<Box<dyn Goal<W>>, DescError>;
pub type TemplateFactory<W> = fn(TemplateParams) -> Rc<dyn ActionTemplate<W>>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkParams {
    actions: BTreeMap<StrId, StrId>,
}

/// Goal, template and perceptor variants available to actor descriptions.
///
/// Owned by the simulation; tests build isolated registries. Templates are created once per
/// `(name, params)` and shared by every actor built from this registry.
pub struct AiRegistry<W>
where
    W: AiWorldMut + PerceptionWorld + 'static,
{
    goals: BTreeMap<StrId, GoalFactory<W>>,
    templates: BTreeMap<StrId, TemplateFactory<W>>,
    perceptors: PerceptorRegistry<W>,
    shared: Vec<(StrId, TemplateParams, Rc<dyn ActionTemplate<W>>)>,
}

impl<W> Default for AiRegistry<W>
where
    W: AiWorldMut + PerceptionWorld + 'static,
{
    fn default() -> Self {
        Self {
            goals: BTreeMap::new(),
            templates: BTreeMap::new(),
            perceptors: PerceptorRegistry::default(),
            shared: Vec::new(),
        }
    }
}

impl<W> AiRegistry<W>
where
    W: AiWorldMut + PerceptionWorld + 'static,
{
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            perceptors: PerceptorRegistry::with_builtins(),
            ..Self::default()
        };

        registry.register_goal("Idle", |desc| Ok(Box::new(GoalIdle::new(desc.personality_factor))));
        registry.register_goal("Wander", |desc| {
            Ok(Box::new(GoalWander::new(desc.personality_factor)))
        });
        registry.register_goal("Work", |desc| {
            let params: WorkParams = if desc.params.is_null() {
                WorkParams::default()
            } else {
                serde_json::from_value(desc.params.clone()).map_err(|source| {
                    DescError::GoalParams {
                        name: desc.name.clone(),
                        source,
                    }
                })?
            };
            Ok(Box::new(GoalWork::new(desc.personality_factor, params.actions)))
        });

        registry.register_template("Idle", |p| Rc::new(IdleTemplate::new(p)));
        registry.register_template("Wander", |p| Rc::new(WanderTemplate::new(p)));
        registry.register_template("GotoSmartObj", |p| Rc::new(GotoSmartObjTemplate::new(p)));
        registry.register_template("UseSmartObj", |p| Rc::new(UseSmartObjTemplate::new(p)));
        registry.register_template("EquipItem", |p| Rc::new(EquipItemTemplate::new(p)));
        registry
    }

    pub fn register_goal(&mut self, name: impl Into<StrId>, factory: GoalFactory<W>) {
        self.goals.insert(name.into(), factory);
    }

    pub fn register_template(&mut self, name: impl Into<StrId>, factory: TemplateFactory<W>) {
        self.templates.insert(name.into(), factory);
    }

    pub fn perceptors(&self) -> &PerceptorRegistry<W> {
        &self.perceptors
    }

    pub fn perceptors_mut(&mut self) -> &mut PerceptorRegistry<W> {
        &mut self.perceptors
    }

    pub fn goal(&self, desc: &GoalDesc) -> Result<Box<dyn Goal<W>>, DescError> {
        let factory = self
            .goals
            .get(&desc.name)
            .ok_or_else(|| DescError::UnknownGoal(desc.name.clone()))?;
        factory(desc)
    }

    /// Shared template instance, created on first request.
    pub fn template(&mut self, name: &StrId, params: TemplateParams) -> Option<Rc<dyn ActionTemplate<W>>> {
        if let Some((_, _, template)) = self
            .shared
            .iter()
            .find(|(n, p, _)| n == name && *p == params)
        {
            return Some(template.clone());
        }
        let template = (self.templates.get(name)?)(params);
        self.shared.push((name.clone(), params, template.clone()));
        Some(template)
    }

    /// Number of distinct template instances shared so far.
    pub fn shared_template_count(&self) -> usize {
        self.shared.len()
    }

    pub fn build_policy(&mut self, desc: &ActorDesc) -> Result<GoalPlanningPolicy<W>, DescError> {
        let mut planner = Planner::default().with_config(desc.planner);
        for action in &desc.actions {
            match self.template(&action.name, action.params) {
                Some(template) => planner.add_template(template),
                None => warn!(template = %action.name, "unknown action template; skipped"),
            }
        }

        let mut policy = GoalPlanningPolicy::new(planner).with_config(desc.policy);
        for goal in &desc.goals {
            policy.add_goal(self.goal(goal)?);
        }
        Ok(policy)
    }

    pub fn build_brain(&mut self, agent: W::Agent, desc: &ActorDesc) -> Result<Brain<W>, DescError> {
        let mut brain = if desc.decision_making {
            Brain::new(agent, Box::new(self.build_policy(desc)?))
        } else {
            Brain::passive(agent)
        };
        brain = brain.with_config(BrainConfig::deterministic(agent, desc.think_every_ticks));

        let perception = &desc.perception;
        if !perception.perceptors.is_empty() || !perception.sensors.is_empty() {
            brain = brain.with_sense(Box::new(self.perceptors.build(perception)?));
        }
        Ok(brain)
    }
}
