use std::cell::RefCell;
use std::rc::Rc;

use ai_core::{Blackboard, TickContext};
use ai_tools::{emit, enable_trace_log, TraceEvent, TraceLog, TraceSink, TRACE_LOG, TRACE_SINK};

#[derive(Clone, Default)]
struct RcSink(Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[test]
fn emit_without_log_or_sink_is_a_no_op() {
    let mut bb = Blackboard::new();
    emit(&mut bb, TraceEvent::new(1, "ignored"));
    assert!(bb.is_empty());
}

#[test]
fn agent_events_carry_tick_and_stable_id() {
    let mut bb = Blackboard::new();
    enable_trace_log(&mut bb, TraceLog::default());

    let ctx = TickContext::fixed(12, 0.1, 0);
    emit(
        &mut bb,
        TraceEvent::for_agent(&ctx, 7u32, "goal.select").with_a(1).with_b(250),
    );

    let log = bb.get(TRACE_LOG).unwrap();
    let event = log.last_with_tag("goal.select").unwrap();
    assert_eq!((event.tick, event.agent, event.a, event.b), (12, 7, 1, 250));
}

#[test]
fn capacity_limit_drops_oldest_events() {
    let mut log = TraceLog::with_capacity_limit(2);
    for tick in 0..5 {
        log.push(TraceEvent::new(tick, "tick"));
    }
    let ticks: Vec<u64> = log.with_tag("tick").map(|e| e.tick).collect();
    assert_eq!(ticks, vec![3, 4]);
}

#[test]
fn emit_writes_to_both_log_and_sink_when_both_present() {
    let mut bb = Blackboard::new();
    enable_trace_log(&mut bb, TraceLog::default());

    let handle = RcSink::default();
    let shared = handle.0.clone();
    bb.set(TRACE_SINK, Box::new(handle) as Box<dyn TraceSink>);

    emit(&mut bb, TraceEvent::new(3, "both").with_detail("x"));

    let log = bb.get(TRACE_LOG).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log.events[0].detail.as_deref(), Some("x"));

    let events = shared.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].tag, "both");
}
