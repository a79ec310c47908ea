use ai_core::{
    ActionOutcome, ActionRuntime, Blackboard, CommandId, Policy, StrId, TickContext,
};
use ai_tools::{emit as trace_emit, TraceEvent};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::goal::select_goal;
use crate::{ActorView, AiWorldMut, Goal, GoalIdle, Planner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalPolicyConfig {
    /// Register a [`GoalIdle`] when no goal named "Idle" is present.
    pub ensure_idle_goal: bool,
}

impl Default for GoalPolicyConfig {
    fn default() -> Self {
        Self {
            ensure_idle_goal: true,
        }
    }
}

/// Goal-driven decision making: pick the most relevant goal, plan for it, queue the plan.
///
/// Runs only while the actor's command queue is empty, so queued intents (planned or
/// external) are never preempted before they start. A running chain this policy did not queue
/// is left alone until it finishes. When the winning goal changes, the policy's own running
/// chain is aborted and the new plan queued. When the current goal's command finished, the goal
/// is planned again. Goals that cannot be planned for are skipped for this tick.
pub struct GoalPlanningPolicy<W>
where
    W: AiWorldMut + 'static,
{
    goals: Vec<Box<dyn Goal<W>>>,
    planner: Planner<W>,
    config: GoalPolicyConfig,
    relevance: Vec<f32>,
    current_goal: Option<usize>,
    current_command: Option<CommandId>,
    plan_calls: u64,
    plan_failures: u64,
    goal_switches: u64,
    last_outcome: Option<ActionOutcome>,
}

impl<W> GoalPlanningPolicy<W>
where
    W: AiWorldMut + 'static,
{
    pub fn new(planner: Planner<W>) -> Self {
        Self {
            goals: Vec::new(),
            planner,
            config: GoalPolicyConfig::default(),
            relevance: Vec::new(),
            current_goal: None,
            current_command: None,
            plan_calls: 0,
            plan_failures: 0,
            goal_switches: 0,
            last_outcome: None,
        }
    }

    pub fn with_config(mut self, config: GoalPolicyConfig) -> Self {
        self.config = config;
        self
    }

    /// Goals are ranked in registration order on equal relevance.
    pub fn with_goal(mut self, goal: Box<dyn Goal<W>>) -> Self {
        self.add_goal(goal);
        self
    }

    pub fn add_goal(&mut self, goal: Box<dyn Goal<W>>) {
        self.goals.push(goal);
        self.relevance.push(0.0);
    }

    pub fn goals(&self) -> &[Box<dyn Goal<W>>] {
        &self.goals
    }

    pub fn planner(&self) -> &Planner<W> {
        &self.planner
    }

    /// Relevance of every goal as of the last decision tick.
    pub fn relevance(&self) -> &[f32] {
        &self.relevance
    }

    pub fn current_goal(&self) -> Option<&StrId> {
        self.current_goal.map(|idx| self.goals[idx].name())
    }

    pub fn current_command(&self) -> Option<CommandId> {
        self.current_command
    }

    pub fn plan_calls(&self) -> u64 {
        self.plan_calls
    }

    pub fn plan_failures(&self) -> u64 {
        self.plan_failures
    }

    pub fn goal_switches(&self) -> u64 {
        self.goal_switches
    }

    pub fn last_outcome(&self) -> Option<ActionOutcome> {
        self.last_outcome
    }

    fn ensure_idle_goal(&mut self) {
        if !self.config.ensure_idle_goal {
            return;
        }
        let idle = StrId::from_static("Idle");
        if !self.goals.iter().any(|g| *g.name() == idle) {
            self.add_goal(Box::new(GoalIdle::default()));
        }
    }
}

impl<W> Policy<W> for GoalPlanningPolicy<W>
where
    W: AiWorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) {
        self.ensure_idle_goal();
        let mut events: Vec<TraceEvent> = Vec::new();

        if let Some(command) = self.current_command {
            if let Some(outcome) = actions.take_finished(command) {
                self.last_outcome = Some(outcome);
                self.current_command = None;
                events.push(
                    TraceEvent::for_agent(ctx, agent, "command.finished")
                        .with_a(command.0)
                        .with_b(matches!(outcome, ActionOutcome::Success) as u64),
                );
            }
        }

        if !actions.is_queue_empty() {
            return flush(blackboard, events);
        }
        // The current chain may have been replaced or aborted from outside.
        if self.current_command.is_some() && actions.current_command() != self.current_command {
            self.current_command = None;
        }
        // A chain this policy did not queue owns the actor until it finishes.
        if !actions.is_stack_empty() && actions.current_command() != self.current_command {
            return flush(blackboard, events);
        }

        let view = ActorView::new(ctx, agent, world, &*blackboard);
        for (idx, goal) in self.goals.iter().enumerate() {
            self.relevance[idx] = goal.eval_relevance(&view).max(0.0);
        }

        let mut excluded = vec![false; self.goals.len()];
        while let Some(best) = select_goal(&self.relevance, &excluded) {
            let running = self.current_command.is_some();
            if Some(best) == self.current_goal && running {
                break;
            }

            let goal = &self.goals[best];
            if goal.is_satisfied(&view) {
                excluded[best] = true;
                continue;
            }

            let desired = goal.desired_props(&view);
            self.plan_calls += 1;
            let plan = self.planner.plan(&view, &desired);
            let Some(action) = plan.as_ref().and_then(|p| p.instantiate(&view)) else {
                self.plan_failures += 1;
                debug!(agent = ?agent, goal = %goal.name(), desired = %desired, "no plan for goal");
                events.push(
                    TraceEvent::for_agent(ctx, agent, "plan.failed")
                        .with_a(best as u64)
                        .with_detail(desired.to_string()),
                );
                excluded[best] = true;
                continue;
            };
            let plan_debug = plan.as_ref().map(|p| p.debug_string()).unwrap_or_default();

            if self.current_goal != Some(best) {
                self.goal_switches += 1;
                debug!(
                    agent = ?agent,
                    from = ?self.current_goal.map(|idx| self.goals[idx].name().to_string()),
                    to = %goal.name(),
                    relevance = self.relevance[best],
                    "goal switch"
                );
                events.push(
                    TraceEvent::for_agent(ctx, agent, "goal.select")
                        .with_a(best as u64)
                        .with_b((self.relevance[best] * 1000.0) as u64)
                        .with_detail(goal.name().to_string()),
                );
            }
            if !actions.is_stack_empty() {
                actions.request_abort();
            }

            let command = actions.enqueue(action);
            debug!(agent = ?agent, goal = %goal.name(), plan = %plan_debug, "plan queued");
            events.push(
                TraceEvent::for_agent(ctx, agent, "plan.built")
                    .with_a(command.0)
                    .with_b(best as u64)
                    .with_detail(plan_debug),
            );
            self.current_goal = Some(best);
            self.current_command = Some(command);
            break;
        }

        drop(view);
        flush(blackboard, events);
    }
}

fn flush(blackboard: &mut Blackboard, events: Vec<TraceEvent>) {
    for event in events {
        trace_emit(blackboard, event);
    }
}
