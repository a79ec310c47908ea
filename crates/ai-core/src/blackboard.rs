use std::any::Any;
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Typed key into an actor's [`Blackboard`].
///
/// Subsystems publish their keys as constants (`ai_perception::memory_key`,
/// `ai_tools::TRACE_LOG`); the numeric id must be unique per stored type.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    id: u64,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    pub fn id(self) -> u64 {
        self.id
    }
}

/// Per-actor scratch storage owned exclusively by one brain.
///
/// Holds the actor's memory store, trace buffers and any action-private state. Reading a key
/// with the wrong type is a structural invariant violation: it asserts in debug builds and
/// reads as "absent" in release builds.
#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<u64, Box<dyn Any>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains<T: 'static>(&self, key: BbKey<T>) -> bool {
        self.values.contains_key(&key.id)
    }

    pub fn set<T: 'static>(&mut self, key: BbKey<T>, value: T) {
        self.values.insert(key.id, Box::new(value));
    }

    /// Stores a value that must not exist yet (one-time installation of a subsystem store).
    pub fn install<T: 'static>(&mut self, key: BbKey<T>, value: T) {
        debug_assert!(
            !self.values.contains_key(&key.id),
            "blackboard key id={:#x} installed twice",
            key.id
        );
        self.values.entry(key.id).or_insert_with(|| Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        let typed = self.values.get(&key.id)?.downcast_ref::<T>();
        debug_assert!(
            typed.is_some(),
            "blackboard type mismatch for key id={:#x}",
            key.id
        );
        typed
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        let typed = self.values.get_mut(&key.id)?.downcast_mut::<T>();
        debug_assert!(
            typed.is_some(),
            "blackboard type mismatch for key id={:#x}",
            key.id
        );
        typed
    }

    pub fn get_or_insert_with<T: 'static>(
        &mut self,
        key: BbKey<T>,
        make: impl FnOnce() -> T,
    ) -> Option<&mut T> {
        if !self.values.contains_key(&key.id) {
            self.values.insert(key.id, Box::new(make()));
        }
        self.get_mut(key)
    }

    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        let matches = self.values.get(&key.id)?.is::<T>();
        debug_assert!(
            matches,
            "blackboard type mismatch for key id={:#x}",
            key.id
        );
        if !matches {
            return None;
        }
        let value = self.values.remove(&key.id)?;
        value.downcast::<T>().ok().map(|b| *b)
    }
}
