use std::borrow::Cow;
use std::collections::VecDeque;

use ai_core::{AgentId, BbKey, Blackboard, TickContext};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One step of an actor's decision history (goal switch, plan built, command finished).
///
/// Events are recorded in simulation order with the tick they happened on, so two runs of the
/// same timeline produce identical logs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub agent: u64,
    pub tag: Cow<'static, str>,
    pub a: u64,
    pub b: u64,
    /// Free-form text, e.g. a plan's action list.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            agent: 0,
            tag: tag.into(),
            a: 0,
            b: 0,
            detail: None,
        }
    }

    /// Event stamped with the current tick and the actor's stable id.
    pub fn for_agent(
        ctx: &TickContext,
        agent: impl AgentId,
        tag: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            agent: agent.stable_id(),
            ..Self::new(ctx.tick, tag)
        }
    }

    pub fn with_a(mut self, a: u64) -> Self {
        self.a = a;
        self
    }

    pub fn with_b(mut self, b: u64) -> Self {
        self.b = b;
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

/// In-memory event log. With a capacity set, the oldest events are dropped first.
#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: VecDeque<TraceEvent>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub capacity: Option<usize>,
}

impl TraceLog {
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: Some(capacity.max(1)),
        }
    }

    pub fn push(&mut self, event: TraceEvent) {
        if let Some(cap) = self.capacity {
            while self.events.len() >= cap {
                self.events.pop_front();
            }
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.tag == tag)
    }

    pub fn last_with_tag(&self, tag: &str) -> Option<&TraceEvent> {
        self.events.iter().rev().find(|e| e.tag == tag)
    }
}

/// Blackboard key for collecting events in-memory.
pub const TRACE_LOG: BbKey<TraceLog> = BbKey::new(0xA11D_7ACE_0000_0001);
/// Blackboard key for streaming events into a user-provided sink.
pub const TRACE_SINK: BbKey<Box<dyn TraceSink>> = BbKey::new(0xA11D_7ACE_0000_0002);

/// Starts recording an actor's events on its blackboard.
pub fn enable_trace_log(blackboard: &mut Blackboard, log: TraceLog) {
    blackboard.set(TRACE_LOG, log);
}

/// Records `event` into whichever of [`TRACE_LOG`] / [`TRACE_SINK`] the blackboard holds.
/// A no-op when neither is installed.
pub fn emit(blackboard: &mut Blackboard, event: TraceEvent) {
    match (blackboard.contains(TRACE_LOG), blackboard.contains(TRACE_SINK)) {
        (false, false) => {}
        (true, false) => {
            if let Some(log) = blackboard.get_mut(TRACE_LOG) {
                log.push(event);
            }
        }
        (false, true) => {
            if let Some(sink) = blackboard.get_mut(TRACE_SINK) {
                sink.emit(event);
            }
        }
        (true, true) => {
            if let Some(log) = blackboard.get_mut(TRACE_LOG) {
                log.push(event.clone());
            }
            if let Some(sink) = blackboard.get_mut(TRACE_SINK) {
                sink.emit(event);
            }
        }
    }
}
