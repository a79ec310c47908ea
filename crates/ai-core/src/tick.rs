use crate::{rng, AgentId, SplitMix64};

/// Per-frame simulation context shared by every actor ticked in that frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    /// Simulation time at the start of this tick. Memory timestamps are taken from here.
    pub time_seconds: f64,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32, time_seconds: f64, seed: u64) -> Self {
        Self {
            tick,
            dt_seconds,
            time_seconds,
            seed,
        }
    }

    /// Fixed-step context: `time_seconds = tick * dt_seconds`.
    pub fn fixed(tick: u64, dt_seconds: f32, seed: u64) -> Self {
        Self::new(tick, dt_seconds, tick as f64 * dt_seconds as f64, seed)
    }

    pub fn rng_for_agent<A: AgentId>(&self, agent: A, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed ^ self.tick, agent.stable_id(), stream);
        SplitMix64::new(seed)
    }
}
