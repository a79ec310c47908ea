//! Behaviour tree decision making for `ai-core` brains.
//!
//! An alternative to goal planning: the tree is ticked in the think phase and its
//! [`RunCommand`] leaves feed the same command queue the planner uses.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod nodes;
pub mod policy;

pub use bt::{BtNode, BtStatus};
pub use nodes::{Condition, RunCommand, Selector, Sequence};
pub use policy::BtPolicy;
