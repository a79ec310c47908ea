//! Umbrella crate that re-exports the `ai-*` building blocks.
//!
//! A tick runs in two phases for every actor, in stable id order:
//!
//! 1. think: senses update the actor's memory, then the decision policy (goal planning or a
//!    behaviour tree) may queue commands. The world is read-only.
//! 2. act: the command runtime applies a requested abort, promotes at most one queued command
//!    and ticks the top of the execution stack. The world is mutable.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ai_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use ai_tools as tools;

#[cfg(feature = "perception")]
#[cfg_attr(docsrs, doc(cfg(feature = "perception")))]
pub use ai_perception as perception;

#[cfg(feature = "goap")]
#[cfg_attr(docsrs, doc(cfg(feature = "goap")))]
pub use ai_goap as goap;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use ai_bt as bt;
