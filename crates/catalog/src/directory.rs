//! Ordered, id-indexed collection of catalog entities.

use std::collections::HashMap;

use stockhub_core::{DomainError, DomainResult, Entity};

/// Entities in backend order, indexed by id.
#[derive(Debug, Clone)]
pub struct Directory<E: Entity> {
    items: Vec<E>,
    index: HashMap<E::Id, usize>,
}

impl<E: Entity> Default for Directory<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<E: Entity> Directory<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory, rejecting duplicate identifiers.
    pub fn from_items(items: impl IntoIterator<Item = E>) -> DomainResult<Self> {
        let mut dir = Self::new();
        for item in items {
            dir.insert(item)?;
        }
        Ok(dir)
    }

    pub fn insert(&mut self, item: E) -> DomainResult<()> {
        let id = item.id();
        if self.index.contains_key(&id) {
            return Err(DomainError::duplicate(format!("{id:?}")));
        }
        self.index.insert(id, self.items.len());
        self.items.push(item);
        Ok(())
    }

    pub fn get(&self, id: E::Id) -> Option<&E> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    /// Like `get`, but a missing record is an `Unknown` error.
    pub fn require(&self, id: E::Id) -> DomainResult<&E> {
        self.get(id)
            .ok_or_else(|| DomainError::unknown(format!("{id:?}")))
    }

    /// Label of the entity, or `"-"` when it is not known.
    pub fn label_of(&self, id: E::Id) -> &str {
        self.get(id).map(Entity::label).unwrap_or("-")
    }

    pub fn contains(&self, id: E::Id) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.items.iter()
    }
}
