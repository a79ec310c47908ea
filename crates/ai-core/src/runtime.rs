use std::collections::VecDeque;

use tracing::debug;

use crate::{Action, ActionInstance, ActionOutcome, ActionState, Blackboard, TickContext, WorldMut};

/// Handle for a command submitted to an actor's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(pub u64);

/// How many finished top-level commands are remembered for `take_finished`.
const FINISHED_HISTORY: usize = 8;

struct PendingCommand<W>
where
    W: WorldMut + 'static,
{
    id: CommandId,
    action: Box<dyn Action<W>>,
}

struct Frame<W>
where
    W: WorldMut + 'static,
{
    /// Set only for the bottom frame (the promoted command).
    command: Option<CommandId>,
    instance: ActionInstance<W>,
}

/// Per-actor command queue (FIFO) feeding an execution stack (LIFO).
///
/// The queue only drains into the stack when the stack is empty, and at most one command is
/// promoted per tick: an actor never runs two top-level action chains at once, and queued
/// commands are delayed, never dropped. Lower stack frames are parents paused until the
/// sub-action above them finishes.
pub struct ActionRuntime<W>
where
    W: WorldMut + 'static,
{
    queue: VecDeque<PendingCommand<W>>,
    stack: Vec<Frame<W>>,
    next_command: u64,
    abort_requested: bool,
    finished: VecDeque<(CommandId, ActionOutcome)>,
}

impl<W> Default for ActionRuntime<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            stack: Vec::new(),
            next_command: 0,
            abort_requested: false,
            finished: VecDeque::new(),
        }
    }
}

impl<W> ActionRuntime<W>
where
    W: WorldMut + 'static,
{
    /// Appends a command to the back of the queue.
    pub fn enqueue(&mut self, action: Box<dyn Action<W>>) -> CommandId {
        let id = CommandId(self.next_command);
        self.next_command += 1;
        self.queue.push_back(PendingCommand { id, action });
        id
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_queue_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_stack_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Nothing running and nothing waiting.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.stack.is_empty()
    }

    pub fn is_queued(&self, id: CommandId) -> bool {
        self.queue.iter().any(|c| c.id == id)
    }

    /// The command owning the running chain.
    pub fn current_command(&self) -> Option<CommandId> {
        self.stack.first().and_then(|f| f.command)
    }

    pub fn is_running(&self, id: CommandId) -> bool {
        self.current_command() == Some(id)
    }

    /// Lifecycle state of the top (currently ticked) action.
    pub fn top_state(&self) -> Option<ActionState> {
        self.stack.last().map(|f| f.instance.state())
    }

    pub fn top_action(&self) -> Option<&dyn Action<W>> {
        self.stack.last().map(|f| f.instance.action())
    }

    /// Debug strings of the stack, bottom first.
    pub fn stack_debug_strings(&self) -> Vec<String> {
        self.stack.iter().map(|f| f.instance.debug_string()).collect()
    }

    /// Drops a command that has not been promoted yet. Returns `false` if it is not queued.
    pub fn cancel_queued(&mut self, id: CommandId) -> bool {
        let Some(pos) = self.queue.iter().position(|c| c.id == id) else {
            return false;
        };
        self.queue.remove(pos);
        true
    }

    /// Asks the next `process_command_queue` to abort the running chain before promoting.
    pub fn request_abort(&mut self) {
        self.abort_requested = true;
    }

    pub fn is_abort_requested(&self) -> bool {
        self.abort_requested
    }

    /// Outcome of a finished top-level command, if it finished recently.
    pub fn take_finished(&mut self, id: CommandId) -> Option<ActionOutcome> {
        let pos = self.finished.iter().position(|(fid, _)| *fid == id)?;
        self.finished.remove(pos).map(|(_, outcome)| outcome)
    }

    /// Deactivates the whole running chain, top first.
    ///
    /// Aborting with nothing running is a caller bug: it asserts in debug builds and does
    /// nothing in release builds.
    pub fn abort(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        debug_assert!(!self.stack.is_empty(), "abort() with an empty execution stack");
        self.abort_requested = false;
        while let Some(mut frame) = self.stack.pop() {
            debug!(
                agent = ?agent,
                action = %frame.instance.debug_string(),
                "action aborted"
            );
            frame.instance.deactivate(ctx, agent, world, blackboard);
            if let Some(id) = frame.command {
                self.record_finished(id, ActionOutcome::Failure);
            }
        }
    }

    /// Per-tick entry point.
    ///
    /// 1. Apply a requested abort.
    /// 2. Promote one queued command if (and only if) the stack is empty.
    /// 3. Tick the top of the stack.
    ///
    /// Returns the outcome of a top-level command that finished during this call.
    pub fn process_command_queue(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Option<(CommandId, ActionOutcome)> {
        if self.abort_requested {
            self.abort_requested = false;
            if !self.stack.is_empty() {
                self.abort(ctx, agent, world, blackboard);
            }
        }

        if self.stack.is_empty() {
            let command = self.queue.pop_front()?;
            let mut instance = ActionInstance::new(command.action);
            if instance.activate(ctx, agent, world, blackboard) == ActionState::Failed {
                debug!(
                    agent = ?agent,
                    command = command.id.0,
                    action = %instance.debug_string(),
                    "command failed to activate"
                );
                instance.deactivate(ctx, agent, world, blackboard);
                self.record_finished(command.id, ActionOutcome::Failure);
                return Some((command.id, ActionOutcome::Failure));
            }
            self.stack.push(Frame {
                command: Some(command.id),
                instance,
            });
        }

        self.tick_stack(ctx, agent, world, blackboard)
    }

    fn tick_stack(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Option<(CommandId, ActionOutcome)> {
        // Descend into sub-actions handed out by composite parents.
        loop {
            let top = self.stack.last_mut()?;
            let Some(child) = top.instance.action_mut().take_sub_action() else {
                break;
            };

            let mut instance = ActionInstance::new(child);
            if instance.activate(ctx, agent, world, blackboard) == ActionState::Failed {
                debug!(
                    agent = ?agent,
                    action = %instance.debug_string(),
                    "sub-action failed to activate"
                );
                instance.deactivate(ctx, agent, world, blackboard);
                top.instance
                    .action_mut()
                    .on_sub_action_done(ActionOutcome::Failure);
                continue;
            }
            self.stack.push(Frame {
                command: None,
                instance,
            });
        }

        let top = self.stack.last_mut()?;
        let state = top.instance.update(ctx, agent, world, blackboard);
        let outcome = state.outcome()?;

        let mut frame = self.stack.pop()?;
        if outcome == ActionOutcome::Failure {
            debug!(
                agent = ?agent,
                action = %frame.instance.debug_string(),
                "action failed"
            );
        }
        frame.instance.deactivate(ctx, agent, world, blackboard);

        if let Some(parent) = self.stack.last_mut() {
            parent.instance.action_mut().on_sub_action_done(outcome);
            return None;
        }

        let id = frame.command?;
        self.record_finished(id, outcome);
        Some((id, outcome))
    }

    fn record_finished(&mut self, id: CommandId, outcome: ActionOutcome) {
        if self.finished.len() == FINISHED_HISTORY {
            self.finished.pop_front();
        }
        self.finished.push_back((id, outcome));
    }
}
