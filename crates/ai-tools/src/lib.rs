//! Deterministic decision tracing for ai-core brains.
//!
//! Policies record [`TraceEvent`]s on the actor's blackboard; replay and debugging tools read
//! them back from [`TRACE_LOG`] or receive them live through a [`TraceSink`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{emit, enable_trace_log, TraceEvent, TraceLog, TraceSink, TRACE_LOG, TRACE_SINK};
