use std::collections::HashMap;

use crate::error::AudioError;
use crate::units::Attributes3d;

/// Opaque handle to a registered event. Cheap to copy and store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventHandle(u32);

/// A registered event: its name, the backend instance, and the attributes last pushed.
pub(crate) struct EventSlot<I> {
    pub name: String,
    pub instance: I,
    pub attributes: Attributes3d,
}

/// Arena of event instances keyed by name. The registry is the only owner.
pub(crate) struct EventRegistry<I> {
    slots: Vec<EventSlot<I>>,
    by_name: HashMap<String, EventHandle>,
}

impl<I> EventRegistry<I> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn insert(&mut self, name: &str, instance: I) -> Result<EventHandle, AudioError> {
        if self.contains(name) {
            return Err(AudioError::AlreadyExists(name.to_string()));
        }
        let handle = EventHandle(self.slots.len() as u32);
        self.slots.push(EventSlot {
            name: name.to_string(),
            instance,
            attributes: Attributes3d::default(),
        });
        self.by_name.insert(name.to_string(), handle);
        Ok(handle)
    }

    pub fn lookup(&self, name: &str) -> Result<EventHandle, AudioError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AudioError::NotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, handle: EventHandle) -> Option<&mut EventSlot<I>> {
        self.slots.get_mut(handle.0 as usize)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Remove every slot, in creation order.
    pub fn drain(&mut self) -> impl Iterator<Item = EventSlot<I>> + '_ {
        self.by_name.clear();
        self.slots.drain(..)
    }
}
