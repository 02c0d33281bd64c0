use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::entity::{Entities, Entity};

/// Marker trait for types that can be attached to entities.
pub trait Component: 'static + Send + Sync {}

impl<T: 'static + Send + Sync> Component for T {}

/// Type-erased view of a component column so despawn can clear every column.
trait Column: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clear(&mut self, index: u32) -> bool;
}

/// Components of one type, indexed by entity slot.
struct ColumnOf<T> {
    slots: Vec<Option<T>>,
}

impl<T: Component> ColumnOf<T> {
    fn get(&self, index: u32) -> Option<&T> {
        self.slots.get(index as usize).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        self.slots.get_mut(index as usize).and_then(Option::as_mut)
    }

    fn put(&mut self, index: u32, value: T) {
        let idx = index as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx] = Some(value);
    }

    fn take(&mut self, index: u32) -> Option<T> {
        self.slots.get_mut(index as usize).and_then(Option::take)
    }
}

impl<T: Component> Column for ColumnOf<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clear(&mut self, index: u32) -> bool {
        self.take(index).is_some()
    }
}

/// Owns all entities and their components.
#[derive(Default)]
pub struct World {
    entities: Entities,
    columns: HashMap<TypeId, Box<dyn Column>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Entities ----

    /// Spawn an entity with no components.
    pub fn spawn(&mut self) -> Entity {
        self.entities.spawn()
    }

    /// Despawn an entity and drop all of its components.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.despawn(entity) {
            return false;
        }
        for column in self.columns.values_mut() {
            column.clear(entity.index);
        }
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // ---- Components ----

    fn column<T: Component>(&self) -> Option<&ColumnOf<T>> {
        self.columns
            .get(&TypeId::of::<T>())
            .and_then(|c| c.as_any().downcast_ref::<ColumnOf<T>>())
    }

    fn column_mut<T: Component>(&mut self) -> Option<&mut ColumnOf<T>> {
        self.columns
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.as_any_mut().downcast_mut::<ColumnOf<T>>())
    }

    /// Attach a component, replacing any existing one of the same type.
    ///
    /// # Panics
    /// Panics if the entity is not alive.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) {
        assert!(
            self.entities.is_alive(entity),
            "cannot insert component on dead entity {entity:?}"
        );
        let column = self
            .columns
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ColumnOf::<T> { slots: Vec::new() }));
        if let Some(column) = column.as_any_mut().downcast_mut::<ColumnOf<T>>() {
            column.put(entity.index, component);
        }
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.column::<T>()?.get(entity.index)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.column_mut::<T>()?.get_mut(entity.index)
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Detach a component and return it.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.column_mut::<T>()?.take(entity.index)
    }

    /// All live entities holding a `T`, in slot order.
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        let Some(column) = self.column::<T>() else {
            return Vec::new();
        };
        column
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .filter_map(|(index, _)| self.entities.at(index as u32))
            .collect()
    }

    /// Borrow two different component types of one entity mutably at the same time.
    ///
    /// Returns `None` if the entity is dead, lacks either component, or `A` and `B`
    /// are the same type.
    pub fn with_pair_mut<A, B, R>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut A, &mut B) -> R,
    ) -> Option<R>
    where
        A: Component,
        B: Component,
    {
        let key = TypeId::of::<A>();
        if key == TypeId::of::<B>() || !self.entities.is_alive(entity) {
            return None;
        }
        // Lift column A out of the map so column B can be borrowed alongside it.
        let mut lifted = self.columns.remove(&key)?;
        let first = lifted
            .as_any_mut()
            .downcast_mut::<ColumnOf<A>>()
            .and_then(|c| c.get_mut(entity.index));
        let result = match first {
            Some(a) => self
                .column_mut::<B>()
                .and_then(|c| c.get_mut(entity.index))
                .map(|b| f(a, b)),
            None => None,
        };
        self.columns.insert(key, lifted);
        result
    }
}
