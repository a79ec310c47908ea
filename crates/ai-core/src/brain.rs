use crate::{
    ActionOutcome, ActionRuntime, AgentId, Blackboard, CommandId, Policy, Sense, TickContext,
    WorldMut,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrainConfig {
    pub think_every_ticks: u32,
    pub think_offset_ticks: u32,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            think_every_ticks: 1,
            think_offset_ticks: 0,
        }
    }
}

impl BrainConfig {
    /// Spreads decision ticks of many actors over `think_every_ticks` frames.
    pub fn deterministic(agent: impl AgentId, think_every_ticks: u32) -> Self {
        let every = think_every_ticks.max(1);
        let offset = (agent.stable_id() % (every as u64)) as u32;
        Self {
            think_every_ticks: every,
            think_offset_ticks: offset,
        }
    }

    pub fn should_think(&self, tick: u64) -> bool {
        let every = self.think_every_ticks.max(1) as u64;
        ((tick + (self.think_offset_ticks as u64)) % every) == 0
    }
}

/// One actor's AI: senses, decision policy, blackboard and command runtime.
///
/// A tick is split in two phases. `think` only reads the world (senses, memory, policy);
/// `act` runs the command queue/stack with write access. [`tick_brains`] runs `think` for
/// every actor before any `act`, so decisions never depend on actor processing order.
pub struct Brain<W>
where
    W: WorldMut + 'static,
{
    pub agent: W::Agent,
    pub config: BrainConfig,
    pub blackboard: Blackboard,
    pub actions: ActionRuntime<W>,
    pub senses: Vec<Box<dyn Sense<W>>>,
    pub policy: Option<Box<dyn Policy<W>>>,
}

impl<W> Brain<W>
where
    W: WorldMut + 'static,
{
    pub fn new(agent: W::Agent, policy: Box<dyn Policy<W>>) -> Self {
        Self {
            policy: Some(policy),
            ..Self::passive(agent)
        }
    }

    /// A brain without decision making; its queue is fed externally.
    pub fn passive(agent: W::Agent) -> Self {
        Self {
            agent,
            config: BrainConfig::default(),
            blackboard: Blackboard::new(),
            actions: ActionRuntime::default(),
            senses: Vec::new(),
            policy: None,
        }
    }

    pub fn with_config(mut self, config: BrainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_sense(mut self, sense: Box<dyn Sense<W>>) -> Self {
        self.senses.push(sense);
        self
    }

    pub fn think(&mut self, ctx: &TickContext, world: &W) {
        for sense in self.senses.iter_mut() {
            sense.update(ctx, self.agent, world, &mut self.blackboard);
        }

        if !self.config.should_think(ctx.tick) {
            return;
        }
        if let Some(policy) = self.policy.as_mut() {
            policy.tick(ctx, self.agent, world, &mut self.blackboard, &mut self.actions);
        }
    }

    pub fn act(&mut self, ctx: &TickContext, world: &mut W) -> Option<(CommandId, ActionOutcome)> {
        self.actions
            .process_command_queue(ctx, self.agent, world, &mut self.blackboard)
    }

    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) -> Option<(CommandId, ActionOutcome)> {
        self.think(ctx, &*world);
        self.act(ctx, world)
    }
}

/// Ticks all brains for one frame: every `think`, then every `act`, in stable-id order.
pub fn tick_brains<W>(ctx: &TickContext, world: &mut W, brains: &mut [Brain<W>])
where
    W: WorldMut + 'static,
{
    brains.sort_by_key(|b| b.agent.stable_id());
    for brain in brains.iter_mut() {
        brain.think(ctx, &*world);
    }
    for brain in brains.iter_mut() {
        let _ = brain.act(ctx, world);
    }
}
