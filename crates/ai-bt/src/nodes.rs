use ai_core::{Action, ActionRuntime, Blackboard, CommandId, TickContext, WorldMut};
use tracing::debug;

use crate::bt::{BtNode, BtStatus};

/// Reactive selector: re-evaluates children from the first every tick, so a higher-priority
/// branch that becomes runnable preempts the running one.
pub struct Selector<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Box<dyn BtNode<W>>>,
    running: Option<usize>,
}

impl<W> Selector<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self {
            children,
            running: None,
        }
    }
}

impl<W> BtNode<W> for Selector<W>
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        for i in 0..self.children.len() {
            match self.children[i].tick(ctx, agent, world, blackboard, actions) {
                BtStatus::Failure => continue,
                BtStatus::Success => {
                    self.reset(actions);
                    return BtStatus::Success;
                }
                BtStatus::Running => {
                    if let Some(prev) = self.running.filter(|&prev| prev != i) {
                        self.children[prev].reset(actions);
                    }
                    self.running = Some(i);
                    return BtStatus::Running;
                }
            }
        }

        self.reset(actions);
        BtStatus::Failure
    }

    fn reset(&mut self, actions: &mut ActionRuntime<W>) {
        self.running = None;
        for child in self.children.iter_mut() {
            child.reset(actions);
        }
    }
}

/// Reactive sequence: every tick re-checks the children before the running one.
pub struct Sequence<W>
where
    W: WorldMut + 'static,
{
    children: Vec<Box<dyn BtNode<W>>>,
    running: Option<usize>,
}

impl<W> Sequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(children: Vec<Box<dyn BtNode<W>>>) -> Self {
        Self {
            children,
            running: None,
        }
    }
}

impl<W> BtNode<W> for Sequence<W>
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        for i in 0..self.children.len() {
            match self.children[i].tick(ctx, agent, world, blackboard, actions) {
                BtStatus::Success => continue,
                BtStatus::Failure => {
                    self.reset(actions);
                    return BtStatus::Failure;
                }
                BtStatus::Running => {
                    if let Some(prev) = self.running.filter(|&prev| prev != i) {
                        self.children[prev].reset(actions);
                    }
                    self.running = Some(i);
                    return BtStatus::Running;
                }
            }
        }

        self.reset(actions);
        BtStatus::Success
    }

    fn reset(&mut self, actions: &mut ActionRuntime<W>) {
        self.running = None;
        for child in self.children.iter_mut() {
            child.reset(actions);
        }
    }
}

pub struct Condition<F> {
    cond: F,
}

impl<F> Condition<F> {
    pub fn new(cond: F) -> Self {
        Self { cond }
    }
}

impl<F, W> BtNode<W> for Condition<F>
where
    F: FnMut(&TickContext, W::Agent, &W, &Blackboard) -> bool + 'static,
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &mut Blackboard,
        _actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        if (self.cond)(ctx, agent, world, &*blackboard) {
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }

    fn reset(&mut self, _actions: &mut ActionRuntime<W>) {}
}

/// Queues the action built by `make` and waits for the command to finish.
///
/// On reset a still-queued command is withdrawn and a running one is aborted on the next act
/// phase.
pub struct RunCommand<F> {
    make: F,
    command: Option<CommandId>,
}

impl<F> RunCommand<F> {
    pub fn new(make: F) -> Self {
        Self {
            make,
            command: None,
        }
    }

    pub fn command(&self) -> Option<CommandId> {
        self.command
    }
}

impl<F, W> BtNode<W> for RunCommand<F>
where
    F: FnMut(&TickContext, W::Agent, &W, &Blackboard) -> Box<dyn Action<W>> + 'static,
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &W,
        blackboard: &mut Blackboard,
        actions: &mut ActionRuntime<W>,
    ) -> BtStatus {
        if let Some(id) = self.command {
            if let Some(outcome) = actions.take_finished(id) {
                self.command = None;
                return outcome.into();
            }
            if actions.is_queued(id) || actions.is_running(id) {
                return BtStatus::Running;
            }
            debug!(agent = ?agent, command = id.0, "command vanished from the runtime");
            self.command = None;
            return BtStatus::Failure;
        }

        let action = (self.make)(ctx, agent, world, &*blackboard);
        self.command = Some(actions.enqueue(action));
        BtStatus::Running
    }

    fn reset(&mut self, actions: &mut ActionRuntime<W>) {
        let Some(id) = self.command.take() else {
            return;
        };
        if !actions.cancel_queued(id) && actions.is_running(id) {
            actions.request_abort();
        }
    }
}
