use crate::{Blackboard, TickContext, WorldMut};

/// Result of one `Action::update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Running,
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Success,
    Failure,
}

impl From<ActionOutcome> for ActionStatus {
    fn from(value: ActionOutcome) -> Self {
        match value {
            ActionOutcome::Success => ActionStatus::Success,
            ActionOutcome::Failure => ActionStatus::Failure,
        }
    }
}

impl ActionStatus {
    pub fn outcome(self) -> Option<ActionOutcome> {
        match self {
            ActionStatus::Running => None,
            ActionStatus::Success => Some(ActionOutcome::Success),
            ActionStatus::Failure => Some(ActionOutcome::Failure),
        }
    }
}

/// Lifecycle state of an [`ActionInstance`].
///
/// ```text
/// Inactive --activate--> Running | Failed
/// Running  --update-->   Running | Succeeded | Failed
/// any      --deactivate--> Inactive
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Inactive,
    Running,
    Succeeded,
    Failed,
}

impl ActionState {
    pub fn is_finished(self) -> bool {
        matches!(self, ActionState::Succeeded | ActionState::Failed)
    }

    pub fn outcome(self) -> Option<ActionOutcome> {
        match self {
            ActionState::Succeeded => Some(ActionOutcome::Success),
            ActionState::Failed => Some(ActionOutcome::Failure),
            ActionState::Inactive | ActionState::Running => None,
        }
    }
}

/// A concrete, per-actor runnable unit.
///
/// Implementations only provide behaviour; the lifecycle ordering is enforced by
/// [`ActionInstance`]. `deactivate` must release everything `activate` acquired and must be
/// safe after a failed activation.
pub trait Action<W>: 'static
where
    W: WorldMut + 'static,
{
    /// Re-validates instance preconditions and acquires resources. `false` fails the action
    /// without it ever running.
    fn activate(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> bool {
        true
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus;

    fn deactivate(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) {
    }

    /// Cheap per-tick check that the action's targets still exist. An invalid action fails
    /// instead of being updated.
    fn is_valid(&self, _ctx: &TickContext, _agent: W::Agent, _world: &W) -> bool {
        true
    }

    /// Composite actions hand their children to the execution stack through this. The
    /// returned action runs on top of `self` until it finishes.
    fn take_sub_action(&mut self) -> Option<Box<dyn Action<W>>> {
        None
    }

    fn on_sub_action_done(&mut self, _outcome: ActionOutcome) {}

    /// Human-readable description for logs and debug overlays.
    fn debug_string(&self) -> String {
        let name = std::any::type_name::<Self>();
        let base = name.split('<').next().unwrap_or(name);
        base.rsplit("::").next().unwrap_or(base).to_string()
    }
}

/// An action together with its lifecycle state.
pub struct ActionInstance<W>
where
    W: WorldMut + 'static,
{
    action: Box<dyn Action<W>>,
    state: ActionState,
}

impl<W> ActionInstance<W>
where
    W: WorldMut + 'static,
{
    pub fn new(action: Box<dyn Action<W>>) -> Self {
        Self {
            action,
            state: ActionState::Inactive,
        }
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn action(&self) -> &dyn Action<W> {
        self.action.as_ref()
    }

    pub fn action_mut(&mut self) -> &mut dyn Action<W> {
        self.action.as_mut()
    }

    pub fn activate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionState {
        debug_assert_eq!(
            self.state,
            ActionState::Inactive,
            "activate() on an action that is already active: {}",
            self.action.debug_string()
        );
        if self.state != ActionState::Inactive {
            return self.state;
        }

        self.state = if self.action.activate(ctx, agent, world, blackboard) {
            ActionState::Running
        } else {
            ActionState::Failed
        };
        self.state
    }

    pub fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionState {
        debug_assert_eq!(
            self.state,
            ActionState::Running,
            "update() on an action that is not running: {}",
            self.action.debug_string()
        );
        if self.state != ActionState::Running {
            return self.state;
        }

        if !self.action.is_valid(ctx, agent, &*world) {
            self.state = ActionState::Failed;
            return self.state;
        }

        self.state = match self.action.update(ctx, agent, world, blackboard) {
            ActionStatus::Running => ActionState::Running,
            ActionStatus::Success => ActionState::Succeeded,
            ActionStatus::Failure => ActionState::Failed,
        };
        self.state
    }

    /// Forced abort / cleanup. Idempotent; a no-op on an inactive instance.
    pub fn deactivate(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        if self.state == ActionState::Inactive {
            return;
        }
        self.action.deactivate(ctx, agent, world, blackboard);
        self.state = ActionState::Inactive;
    }

    pub fn debug_string(&self) -> String {
        self.action.debug_string()
    }
}
