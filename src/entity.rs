use indexmap::IndexMap;
use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    error::{CimError, Result},
    schema::{AttributeDef, AttributeKind, ClassDef},
};

/// The content of one set attribute slot.
///
/// Links hold the identifier of their target, never the target itself;
/// they are resolved through the `Model` that owns both ends.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Literal(String),
    Enum(String),
    Link(String),
    Links(Vec<String>),
}

impl Value {
    /// Text of a literal or enum value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Literal(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Every target of a link or link list, in acquisition order.
    pub fn targets(&self) -> &[String] {
        match self {
            Value::Link(id) => std::slice::from_ref(id),
            Value::Links(ids) => ids,
            _ => &[],
        }
    }
}

/// What a caller may hand to `Entity::set`.
#[derive(Clone, Copy, Debug)]
pub enum SetValue<'a> {
    Text(&'a str),
    Entity(&'a Entity),
}

impl SetValue<'_> {
    fn describe(&self) -> &'static str {
        match self {
            SetValue::Text(_) => "text",
            SetValue::Entity(_) => "an entity",
        }
    }
}

/// One instance of a schema class.
///
/// Identity is the `id` alone: an entity keeps its `id` when it is
/// retyped, and two entities with the same `id` compare equal whatever
/// their classes.
#[derive(Clone)]
pub struct Entity {
    id: String,
    class: &'static ClassDef,
    values: IndexMap<&'static str, Value>,
}

impl Entity {
    pub fn new(id: impl Into<String>, class: &'static ClassDef) -> Self {
        Entity {
            id: id.into(),
            class,
            values: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn class(&self) -> &'static ClassDef {
        self.class
    }

    pub fn class_name(&self) -> &'static str {
        self.class.name()
    }

    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.values.get(attr)
    }

    pub fn is_set(&self, attr: &str) -> bool {
        self.values.contains_key(attr)
    }

    /// Text of a primitive or enum attribute.
    pub fn text(&self, attr: &str) -> Option<&str> {
        self.get(attr).and_then(Value::as_text)
    }

    /// Target of a single reference.
    pub fn link(&self, attr: &str) -> Option<&str> {
        match self.get(attr) {
            Some(Value::Link(id)) => Some(id),
            _ => None,
        }
    }

    /// Targets of a reference or reference list, empty when unset.
    pub fn links(&self, attr: &str) -> &[String] {
        self.get(attr).map(Value::targets).unwrap_or(&[])
    }

    /// Set values in class attribute order.
    pub fn values(&self) -> impl Iterator<Item = (&'static AttributeDef, &Value)> {
        self.class
            .attributes()
            .filter_map(move |a| self.values.get(a.name()).map(|v| (a, v)))
    }

    /// Assign one attribute.
    ///
    /// Text goes into primitive and enum slots, entities into reference
    /// slots; anything else is an `AttributeKindMismatch`. This does not
    /// maintain inverse roles, use `Model::link` for that.
    pub fn set(&mut self, attr: &str, value: SetValue<'_>) -> Result<()> {
        let def = self.attribute(attr)?;
        match (def.kind(), value) {
            (AttributeKind::Primitive, SetValue::Text(text)) => {
                self.values.insert(def.name(), Value::Literal(text.to_string()));
                Ok(())
            }
            (AttributeKind::Enum, SetValue::Text(text)) => {
                self.values.insert(def.name(), Value::Enum(text.to_string()));
                Ok(())
            }
            (AttributeKind::Reference | AttributeKind::ReferenceList, SetValue::Entity(target)) => {
                self.set_reference(attr, target.id(), target.class()).map(|_| ())
            }
            (kind, value) => Err(CimError::AttributeKindMismatch {
                class: self.class_name().to_string(),
                attribute: attr.to_string(),
                kind,
                given: value.describe(),
            }),
        }
    }

    /// Link `attr` to the entity `target` of class `target_class`.
    ///
    /// A single reference is replaced and its previous target returned;
    /// a list gets `target` appended unless it already holds it.
    pub(crate) fn set_reference(
        &mut self,
        attr: &str,
        target: &str,
        target_class: &ClassDef,
    ) -> Result<Option<String>> {
        let def = self.attribute(attr)?;
        if !def.kind().is_link() {
            return Err(CimError::AttributeKindMismatch {
                class: self.class_name().to_string(),
                attribute: attr.to_string(),
                kind: def.kind(),
                given: "an entity",
            });
        }
        if let Some(range) = def.range() {
            if !target_class.is_a(range) {
                return Err(CimError::IncompatibleTarget {
                    class: self.class_name().to_string(),
                    attribute: attr.to_string(),
                    expected: range.to_string(),
                    found: target_class.name().to_string(),
                    target: target.to_string(),
                });
            }
        }
        Ok(self.attach(def.name(), def.kind(), target))
    }

    /// Store a back-link without checking the range of `attr`.
    pub(crate) fn set_inverse(&mut self, attr: &str, source: &str) -> Result<Option<String>> {
        let def = self.attribute(attr)?;
        Ok(self.attach(def.name(), def.kind(), source))
    }

    fn attach(&mut self, name: &'static str, kind: AttributeKind, target: &str) -> Option<String> {
        if kind == AttributeKind::ReferenceList {
            match self.values.get_mut(name) {
                Some(Value::Links(ids)) => {
                    if !ids.iter().any(|i| i == target) {
                        ids.push(target.to_string());
                    }
                }
                _ => {
                    self.values
                        .insert(name, Value::Links(vec![target.to_string()]));
                }
            }
            return None;
        }
        match self.values.insert(name, Value::Link(target.to_string())) {
            Some(Value::Link(prev)) if prev != target => Some(prev),
            _ => None,
        }
    }

    /// Drop `target` from a reference or reference list.
    pub fn unlink(&mut self, attr: &str, target: &str) {
        let emptied = match self.values.get_mut(attr) {
            Some(Value::Link(id)) => *id == target,
            Some(Value::Links(ids)) => {
                ids.retain(|i| i != target);
                ids.is_empty()
            }
            _ => false,
        };
        if emptied {
            self.values.shift_remove(attr);
        }
    }

    pub fn unset(&mut self, attr: &str) -> Option<Value> {
        self.values.shift_remove(attr)
    }

    /// A copy of this entity as an instance of `class`, same `id`.
    ///
    /// Values are carried over wherever `class` has a slot of the same
    /// name and kind; callers check the subtype relation first.
    pub(crate) fn retyped(&self, class: &'static ClassDef) -> Entity {
        let values = self
            .values
            .iter()
            .filter_map(|(name, value)| {
                let def = class.attribute(name)?;
                (def.kind() == self.class.attribute(name)?.kind())
                    .then(|| (def.name(), value.clone()))
            })
            .collect();
        Entity {
            id: self.id.clone(),
            class,
            values,
        }
    }

    fn attribute(&self, attr: &str) -> Result<&'static AttributeDef> {
        self.class
            .attribute(attr)
            .ok_or_else(|| CimError::UnknownAttribute {
                class: self.class_name().to_string(),
                attribute: attr.to_string(),
            })
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("class", &self.class_name())
            .field("values", &self.values)
            .finish()
    }
}
