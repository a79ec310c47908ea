//! Symbolic world state used by goals, action templates and the planner.
//!
//! A [`WorldState`] maps every [`WsProp`] key to at most one [`WsValue`]. It is a small value
//! type: the planner clones it freely while searching and compares states structurally.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{StrId, WorldStateError};

/// Closed set of world-state property keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WsProp {
    /// Entity the actor stands at.
    AtEntityPos,
    /// Smart object the actor is interacting with.
    UsingSmartObj,
    /// Symbolic action the actor is performing.
    Action,
    /// Item the actor carries.
    HasItem,
    /// Item the actor has equipped.
    ItemEquipped,
}

impl WsProp {
    pub const COUNT: usize = 5;

    pub const ALL: [WsProp; WsProp::COUNT] = [
        WsProp::AtEntityPos,
        WsProp::UsingSmartObj,
        WsProp::Action,
        WsProp::HasItem,
        WsProp::ItemEquipped,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            WsProp::AtEntityPos => "AtEntityPos",
            WsProp::UsingSmartObj => "UsingSmartObj",
            WsProp::Action => "Action",
            WsProp::HasItem => "HasItem",
            WsProp::ItemEquipped => "ItemEquipped",
        }
    }
}

impl fmt::Display for WsProp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed world-state value.
///
/// `Ref` is a planning variable: inside template effects and preconditions it means "whatever
/// value the desired state holds for that property". It never appears in an actor's state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WsValue {
    Bool(bool),
    Number(f32),
    Id(StrId),
    /// Entity reference by stable id (see `AgentId::stable_id`).
    Entity(u64),
    Ref(WsProp),
}

impl WsValue {
    pub fn as_ref_prop(&self) -> Option<WsProp> {
        match self {
            WsValue::Ref(prop) => Some(*prop),
            _ => None,
        }
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, WsValue::Ref(_))
    }

    pub fn as_id(&self) -> Option<&StrId> {
        match self {
            WsValue::Id(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<u64> {
        match self {
            WsValue::Entity(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            WsValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for WsValue {
    fn from(value: bool) -> Self {
        WsValue::Bool(value)
    }
}

impl From<f32> for WsValue {
    fn from(value: f32) -> Self {
        WsValue::Number(value)
    }
}

impl From<StrId> for WsValue {
    fn from(value: StrId) -> Self {
        WsValue::Id(value)
    }
}

impl From<&'static str> for WsValue {
    fn from(value: &'static str) -> Self {
        WsValue::Id(StrId::from_static(value))
    }
}

impl fmt::Display for WsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WsValue::Bool(b) => write!(f, "{b}"),
            WsValue::Number(n) => write!(f, "{n}"),
            WsValue::Id(id) if id.is_empty() => f.write_str("<empty>"),
            WsValue::Id(id) => write!(f, "'{id}'"),
            WsValue::Entity(id) => write!(f, "#{id}"),
            WsValue::Ref(prop) => write!(f, "${prop}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldState {
    props: [Option<WsValue>; WsProp::COUNT],
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prop(mut self, prop: WsProp, value: impl Into<WsValue>) -> Self {
        self.set_prop(prop, value);
        self
    }

    pub fn set_prop(&mut self, prop: WsProp, value: impl Into<WsValue>) {
        self.props[prop.index()] = Some(value.into());
    }

    /// Copies `prop` from `other`, clearing it here when `other` does not set it.
    pub fn set_prop_from(&mut self, prop: WsProp, other: &WorldState) {
        self.props[prop.index()] = other.props[prop.index()].clone();
    }

    pub fn clear_prop(&mut self, prop: WsProp) {
        self.props[prop.index()] = None;
    }

    pub fn prop(&self, prop: WsProp) -> Result<&WsValue, WorldStateError> {
        self.get(prop).ok_or(WorldStateError::PropertyNotSet(prop))
    }

    pub fn get(&self, prop: WsProp) -> Option<&WsValue> {
        self.props[prop.index()].as_ref()
    }

    pub fn is_prop_set(&self, prop: WsProp) -> bool {
        self.props[prop.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.props.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.props.iter().all(Option::is_none)
    }

    /// Set properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (WsProp, &WsValue)> + '_ {
        WsProp::ALL
            .iter()
            .filter_map(move |&prop| self.get(prop).map(|value| (prop, value)))
    }

    /// Number of properties set in `goal` that are unset or different here.
    pub fn diff_count(&self, goal: &WorldState) -> u32 {
        goal.iter()
            .filter(|(prop, value)| self.get(*prop) != Some(*value))
            .count() as u32
    }

    pub fn satisfies(&self, goal: &WorldState) -> bool {
        self.diff_count(goal) == 0
    }

    /// For every property set in `goal` but unset here, take the actor's current value.
    pub fn merge_missing_from(&mut self, goal: &WorldState, actor: &WorldState) {
        for prop in WsProp::ALL {
            if goal.is_prop_set(prop) && !self.is_prop_set(prop) {
                self.set_prop_from(prop, actor);
            }
        }
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (prop, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{prop}={value}")?;
        }
        f.write_str("}")
    }
}
