//! Registry of all entities of one kind
//!
//! Mirrors the selection list of the editor: an ordered collection with
//! one active entry, unique names (ignoring case), and never empty.

use crate::attributes::AttributeNames;
use crate::entity::{Entity, LoadOutcome};
use crate::error::DomainError;
use crate::save_format::Mapping;
use crate::view::FieldView;

/// Result of applying form edits to an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Edits applied, name unchanged
    Saved,
    /// Edits applied including a new name
    Renamed { from: String },
    /// Edits applied except the name, which was empty or already taken
    NameRejected { attempted: String },
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[derive(Debug, Clone)]
pub struct Registry<E> {
    entities: Vec<E>,
    active: usize,
}

impl<E: Entity> Registry<E> {
    /// Creates a registry holding one placeholder entity.
    pub fn new(attributes: &AttributeNames) -> Self {
        let mut registry = Self {
            entities: Vec::new(),
            active: 0,
        };
        registry.create(attributes);
        registry
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Never true once constructed.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.entities.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.entities.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.entities.get_mut(index)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &E {
        &self.entities[self.active]
    }

    pub fn active_mut(&mut self) -> &mut E {
        &mut self.entities[self.active]
    }

    pub fn select(&mut self, index: usize) -> Result<(), DomainError> {
        if index >= self.entities.len() {
            return Err(DomainError::not_found(E::KIND, index));
        }
        self.active = index;
        Ok(())
    }

    /// Names in list order.
    pub fn names(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.name().to_string()).collect()
    }

    /// Names of every entity except the one at `index`.
    pub fn other_names(&self, index: usize) -> Vec<String> {
        self.entities
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, e)| e.name().to_string())
            .collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entities.iter().position(|e| same_name(e.name(), name))
    }

    pub fn find(&self, name: &str) -> Option<&E> {
        self.position(name).map(|i| &self.entities[i])
    }

    pub fn is_name_taken(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Lowest-numbered unused `"<Kind> N"`, starting at 1.
    pub fn placeholder_name(&self) -> String {
        let mut id = 1;
        loop {
            let name = format!("{} {}", E::KIND, id);
            if !self.is_name_taken(&name) {
                return name;
            }
            id += 1;
        }
    }

    /// Appends a placeholder-named entity and makes it active.
    pub fn create(&mut self, attributes: &AttributeNames) -> usize {
        let name = self.placeholder_name();
        self.entities.push(E::new(&name, attributes));
        self.active = self.entities.len() - 1;
        tracing::debug!(kind = E::KIND, name = %name, "Created entity");
        self.active
    }

    /// Appends an entity with the given name without changing the active
    /// entry.
    pub fn add(&mut self, name: &str, attributes: &AttributeNames) -> Result<usize, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation(format!("{} name cannot be empty", E::KIND)));
        }
        if self.is_name_taken(name) {
            return Err(DomainError::name_taken(E::KIND, name));
        }
        self.entities.push(E::new(name, attributes));
        Ok(self.entities.len() - 1)
    }

    /// Deletes the entity at `index` and returns it.
    ///
    /// A replacement is created if the registry would become empty. The
    /// entry now at `min(index, len - 1)` becomes active.
    pub fn remove(&mut self, index: usize, attributes: &AttributeNames) -> Result<E, DomainError> {
        if index >= self.entities.len() {
            return Err(DomainError::not_found(E::KIND, index));
        }
        let removed = self.entities.remove(index);
        if self.entities.is_empty() {
            self.create(attributes);
        }
        self.active = index.min(self.entities.len() - 1);
        tracing::debug!(kind = E::KIND, name = removed.name(), "Removed entity");
        Ok(removed)
    }

    /// Reads the form into the entity at `index`.
    ///
    /// If the edited name is empty or matches another entity (ignoring
    /// case) the old name is restored; every other edit is kept.
    pub fn update(&mut self, index: usize, view: &dyn FieldView) -> Result<UpdateOutcome, DomainError> {
        let entity = self
            .entities
            .get_mut(index)
            .ok_or_else(|| DomainError::not_found(E::KIND, index))?;
        let previous = entity.name().to_string();
        entity.read_form(view);
        let attempted = entity.name().to_string();
        if attempted == previous {
            return Ok(UpdateOutcome::Saved);
        }

        let clash = attempted.trim().is_empty()
            || self
                .entities
                .iter()
                .enumerate()
                .any(|(i, e)| i != index && same_name(e.name(), &attempted));
        if clash {
            self.entities[index].set_name(&previous);
            tracing::debug!(kind = E::KIND, name = %previous, attempted = %attempted, "Rejected rename");
            return Ok(UpdateOutcome::NameRejected { attempted });
        }
        Ok(UpdateOutcome::Renamed { from: previous })
    }

    /// Loads one document entry into the entity with that name, adding it
    /// first if needed. The header spelling becomes the entity's name.
    pub fn load_entry(
        &mut self,
        name: &str,
        data: &Mapping,
        attributes: &AttributeNames,
    ) -> Result<(usize, LoadOutcome), DomainError> {
        let index = match self.position(name) {
            Some(index) => index,
            None => self.add(name, attributes)?,
        };
        let entity = &mut self.entities[index];
        entity.set_name(name);
        Ok((index, entity.load(data)))
    }
}
