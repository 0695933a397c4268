use indexmap::{map::Entry, IndexMap};

use crate::{
    entity::Entity,
    error::{CimError, Result},
    schema::Schema,
};

/// Every entity of one grid model, keyed by identifier in first-seen
/// order.
#[derive(Clone, Debug, Default)]
pub struct Model {
    entities: IndexMap<String, Entity>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Add `entity` unless its identifier is taken. Returns the entity
    /// that now holds the identifier.
    pub fn insert(&mut self, entity: Entity) -> &mut Entity {
        match self.entities.entry(entity.id().to_string()) {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(entity),
        }
    }

    /// Put `entity` in place of the one with the same identifier,
    /// keeping its position. Returns the old entity.
    pub fn replace(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.id().to_string(), entity)
    }

    /// Link `source.attr` to `target` and keep the inverse role of the
    /// target in step.
    ///
    /// When a single reference moves from one target to another, the old
    /// target loses its back-link.
    pub fn link(&mut self, source: &str, attr: &str, target: &str) -> Result<()> {
        let target_class = match self.entities.get(target) {
            Some(t) => t.class(),
            None => {
                return Err(CimError::DanglingReference {
                    source_id: source.to_string(),
                    attribute: attr.to_string(),
                    target: target.to_string(),
                })
            }
        };
        let entity = self
            .entities
            .get_mut(source)
            .ok_or_else(|| CimError::DanglingReference {
                source_id: source.to_string(),
                attribute: attr.to_string(),
                target: source.to_string(),
            })?;
        let previous = entity.set_reference(attr, target, target_class)?;
        let roles = entity
            .class()
            .attribute(attr)
            .and_then(|a| a.inverse().map(|inverse| (a.name(), inverse)));

        if let Some((forward, inverse)) = roles {
            if let Some(previous) = previous {
                if let Some(old) = self.entities.get_mut(&previous) {
                    old.unlink(inverse, source);
                }
            }
            // a single inverse slot that moves leaves its old owner
            // pointing at `target`
            let stale = match self.entities.get_mut(target) {
                Some(t) => t.set_inverse(inverse, source)?,
                None => None,
            };
            if let Some(stale) = stale {
                if let Some(old) = self.entities.get_mut(&stale) {
                    old.unlink(forward, target);
                }
            }
        }
        Ok(())
    }

    /// Entities still typed as the schema's fallback class.
    pub fn provisional<'a>(&'a self, schema: &'a Schema) -> impl Iterator<Item = &'a Entity> + 'a {
        self.iter()
            .filter(move |e| e.class_name() == schema.fallback())
    }

    /// Entities of `class` or one of its subclasses.
    pub fn of_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.iter().filter(move |e| e.class().is_a(class))
    }
}

impl<'a> IntoIterator for &'a Model {
    type Item = &'a Entity;
    type IntoIter = indexmap::map::Values<'a, String, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.values()
    }
}

impl FromIterator<Entity> for Model {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut model = Model::new();
        for e in iter {
            model.insert(e);
        }
        model
    }
}
