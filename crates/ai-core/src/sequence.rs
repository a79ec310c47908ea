use std::collections::VecDeque;

use crate::{Action, ActionOutcome, ActionStatus, Blackboard, TickContext, WorldMut};

/// Runs a fixed list of actions one after another on the execution stack.
///
/// The sequence never ticks its steps itself: each step is handed to the runtime via
/// `take_sub_action`, runs on top of the sequence and reports back through
/// `on_sub_action_done`. A failing step fails the whole sequence; the sequence succeeds on
/// the first update after its last step succeeded.
pub struct ActionSequence<W>
where
    W: WorldMut + 'static,
{
    pending: VecDeque<Box<dyn Action<W>>>,
    total: usize,
    completed: usize,
    child_running: bool,
    failed: bool,
}

impl<W> ActionSequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(steps: Vec<Box<dyn Action<W>>>) -> Self {
        let total = steps.len();
        Self {
            pending: steps.into(),
            total,
            completed: 0,
            child_running: false,
            failed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of steps that already finished successfully.
    pub fn completed(&self) -> usize {
        self.completed
    }
}

impl<W> Action<W> for ActionSequence<W>
where
    W: WorldMut + 'static,
{
    fn update(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActionStatus {
        if self.failed {
            ActionStatus::Failure
        } else if self.child_running || !self.pending.is_empty() {
            ActionStatus::Running
        } else {
            ActionStatus::Success
        }
    }

    fn take_sub_action(&mut self) -> Option<Box<dyn Action<W>>> {
        if self.failed || self.child_running {
            return None;
        }
        let next = self.pending.pop_front()?;
        self.child_running = true;
        Some(next)
    }

    fn on_sub_action_done(&mut self, outcome: ActionOutcome) {
        self.child_running = false;
        match outcome {
            ActionOutcome::Success => self.completed += 1,
            ActionOutcome::Failure => self.failed = true,
        }
    }

    fn debug_string(&self) -> String {
        let steps: Vec<String> = self.pending.iter().map(|a| a.debug_string()).collect();
        format!(
            "Sequence[{}/{}] pending=[{}]",
            self.completed,
            self.total,
            steps.join(", ")
        )
    }
}
