//! Registry of CIM classes and their attributes.
//!
//! Classes are described by static `ClassInfo` tables (see `catalog`),
//! each naming its parent. `Schema::new` walks the parent chains once and
//! keeps, for every class, the ordered list of all attributes it owns or
//! inherits. Subtype checks are walks over the same chains.
use indexmap::IndexMap;
use std::fmt;
use thiserror::Error;

use crate::profile::{Profile, ProfileSet};

pub mod catalog;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const MD_NS: &str = "http://iec.ch/TC57/61970-552/ModelDescription/1#";
pub const CIM_NS: &str = "http://iec.ch/TC57/2013/CIM-schema-cim16#";
pub const ENTSOE_NS: &str = "http://entsoe.eu/CIM/SchemaExtension/3/1#";

/// XML namespaces a CIM document may use, with their fixed prefixes.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Namespace {
    Cim,
    Entsoe,
    Md,
    Rdf,
}

impl Namespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Cim => "cim",
            Namespace::Entsoe => "entsoe",
            Namespace::Md => "md",
            Namespace::Rdf => "rdf",
        }
    }

    pub fn url(self) -> &'static str {
        match self {
            Namespace::Cim => CIM_NS,
            Namespace::Entsoe => ENTSOE_NS,
            Namespace::Md => MD_NS,
            Namespace::Rdf => RDF_NS,
        }
    }

    pub fn from_url(url: &str) -> Option<Namespace> {
        [
            Namespace::Cim,
            Namespace::Entsoe,
            Namespace::Md,
            Namespace::Rdf,
        ]
        .into_iter()
        .find(|ns| ns.url() == url)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AttributeKind {
    /// Strings, numbers, booleans, dates: anything held as text.
    Primitive,
    /// An enumeration literal, held as its tag string.
    Enum,
    /// A link to one other entity.
    Reference,
    /// Links to any number of other entities.
    ReferenceList,
}

impl AttributeKind {
    pub fn is_link(self) -> bool {
        matches!(self, AttributeKind::Reference | AttributeKind::ReferenceList)
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Primitive => write!(f, "a primitive attribute"),
            AttributeKind::Enum => write!(f, "an enum attribute"),
            AttributeKind::Reference => write!(f, "a class attribute"),
            AttributeKind::ReferenceList => write!(f, "a list attribute"),
        }
    }
}

/// Static description of one attribute, as declared on its class.
#[derive(Clone, Copy, Debug)]
pub struct AttributeInfo {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub namespace: Namespace,
    pub profiles: ProfileSet,
    pub used: bool,
    /// Target class of a link, or enumeration type of an enum.
    pub range: Option<&'static str>,
    /// Slot on the range class that holds the back-link.
    pub inverse: Option<&'static str>,
}

impl AttributeInfo {
    const fn new(
        name: &'static str,
        kind: AttributeKind,
        range: Option<&'static str>,
        profiles: &[Profile],
    ) -> Self {
        AttributeInfo {
            name,
            kind,
            namespace: Namespace::Cim,
            profiles: ProfileSet::of(profiles),
            used: true,
            range,
            inverse: None,
        }
    }

    pub const fn primitive(name: &'static str, profiles: &[Profile]) -> Self {
        Self::new(name, AttributeKind::Primitive, None, profiles)
    }

    pub const fn enumeration(name: &'static str, range: &'static str, profiles: &[Profile]) -> Self {
        Self::new(name, AttributeKind::Enum, Some(range), profiles)
    }

    pub const fn reference(name: &'static str, range: &'static str, profiles: &[Profile]) -> Self {
        Self::new(name, AttributeKind::Reference, Some(range), profiles)
    }

    pub const fn list(name: &'static str, range: &'static str, profiles: &[Profile]) -> Self {
        Self::new(name, AttributeKind::ReferenceList, Some(range), profiles)
    }

    /// Declared in the schema but never exchanged.
    pub const fn unused(mut self) -> Self {
        self.used = false;
        self
    }

    pub const fn inverse(mut self, role: &'static str) -> Self {
        self.inverse = Some(role);
        self
    }

    pub const fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }
}

/// Static description of one class.
#[derive(Clone, Copy, Debug)]
pub struct ClassInfo {
    pub name: &'static str,
    pub parent: Option<&'static str>,
    pub namespace: Namespace,
    pub profiles: ProfileSet,
    pub recommended: Profile,
    pub attributes: &'static [AttributeInfo],
}

impl ClassInfo {
    pub const fn new(
        name: &'static str,
        parent: Option<&'static str>,
        profiles: &[Profile],
        recommended: Profile,
        attributes: &'static [AttributeInfo],
    ) -> Self {
        ClassInfo {
            name,
            parent,
            namespace: Namespace::Cim,
            profiles: ProfileSet::of(profiles),
            recommended,
            attributes,
        }
    }
}

/// Every link names a declared range class, and every inverse role is a
/// link slot on that class.
fn check_links(classes: &IndexMap<&'static str, ClassDef>) -> Result<(), SchemaError> {
    for class in classes.values() {
        for attr in class.attributes.values().filter(|a| a.kind().is_link()) {
            let range = attr
                .range()
                .and_then(|r| classes.get(r))
                .ok_or_else(|| SchemaError::UnknownRange {
                    attribute: attr.full_name().to_string(),
                    range: attr.range().unwrap_or_default().to_string(),
                })?;
            if let Some(inverse) = attr.inverse() {
                if !range.attribute(inverse).map_or(false, |a| a.kind().is_link()) {
                    return Err(SchemaError::UnknownInverse {
                        attribute: attr.full_name().to_string(),
                        inverse: format!("{}.{}", range.name(), inverse),
                    });
                }
            }
        }
    }
    Ok(())
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum SchemaError {
    #[error("class {0} is declared twice")]
    Duplicate(String),
    #[error("class {class} names unknown parent {parent}")]
    UnknownParent { class: String, parent: String },
    #[error("class {0} is its own ancestor")]
    Cycle(String),
    #[error("fallback class {0} is not declared")]
    UnknownFallback(String),
    #[error("link {attribute} has unknown range {range:?}")]
    UnknownRange { attribute: String, range: String },
    #[error("link {attribute} names missing inverse {inverse}")]
    UnknownInverse { attribute: String, inverse: String },
}

/// An attribute as seen from a class that owns or inherits it.
#[derive(Debug)]
pub struct AttributeDef {
    info: &'static AttributeInfo,
    declared_in: &'static str,
    full_name: String,
}

impl AttributeDef {
    pub fn name(&self) -> &'static str {
        self.info.name
    }

    pub fn kind(&self) -> AttributeKind {
        self.info.kind
    }

    pub fn namespace(&self) -> Namespace {
        self.info.namespace
    }

    pub fn profiles(&self) -> ProfileSet {
        self.info.profiles
    }

    pub fn is_used(&self) -> bool {
        self.info.used
    }

    pub fn range(&self) -> Option<&'static str> {
        self.info.range
    }

    pub fn inverse(&self) -> Option<&'static str> {
        self.info.inverse
    }

    pub fn declared_in(&self) -> &'static str {
        self.declared_in
    }

    /// `<declaring class>.<attribute>`, the element name in RDF/XML.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

/// A class with its inheritance resolved.
#[derive(Debug)]
pub struct ClassDef {
    info: &'static ClassInfo,
    // self first, root last
    ancestors: Vec<&'static str>,
    attributes: IndexMap<&'static str, AttributeDef>,
    profiles_including_attributes: ProfileSet,
}

impl ClassDef {
    pub fn name(&self) -> &'static str {
        self.info.name
    }

    pub fn parent(&self) -> Option<&'static str> {
        self.info.parent
    }

    pub fn namespace(&self) -> Namespace {
        self.info.namespace
    }

    pub fn possible_profiles(&self) -> ProfileSet {
        self.info.profiles
    }

    pub fn recommended_profile(&self) -> Profile {
        self.info.recommended
    }

    /// Own profiles plus the profiles of every owned or inherited
    /// attribute: every profile this class can carry data for.
    pub fn possible_profiles_including_attributes(&self) -> ProfileSet {
        self.profiles_including_attributes
    }

    pub fn ancestors(&self) -> &[&'static str] {
        &self.ancestors
    }

    /// True if `ancestor` is this class or one of its superclasses.
    pub fn is_a(&self, ancestor: &str) -> bool {
        self.ancestors.iter().any(|a| *a == ancestor)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.get(name)
    }

    /// Inherited attributes first, in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDef> {
        self.attributes.values()
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes.keys().copied()
    }

    /// Profile an attribute is written to when this class is written in
    /// `class_profile`: the class profile if the attribute allows it,
    /// otherwise the attribute's first profile in `Profile` order.
    pub fn attribute_profile(&self, attr: &str, class_profile: Profile) -> Option<Profile> {
        let profiles = self.attribute(attr)?.profiles();
        if profiles.contains(class_profile) {
            Some(class_profile)
        } else {
            profiles.first()
        }
    }
}

#[derive(Debug)]
pub struct Schema {
    classes: IndexMap<&'static str, ClassDef>,
    fallback: &'static str,
}

impl Schema {
    /// Resolve a class table. `fallback` names the most generic class
    /// that entities may be declared with before their real type is known.
    pub fn new(infos: &'static [ClassInfo], fallback: &'static str) -> Result<Schema, SchemaError> {
        let mut by_name: IndexMap<&'static str, &'static ClassInfo> = IndexMap::new();
        for info in infos {
            if by_name.insert(info.name, info).is_some() {
                return Err(SchemaError::Duplicate(info.name.to_string()));
            }
        }
        if !by_name.contains_key(fallback) {
            return Err(SchemaError::UnknownFallback(fallback.to_string()));
        }

        let mut classes = IndexMap::new();
        for info in infos {
            let mut chain = vec![info];
            let mut parent = info.parent;
            while let Some(p) = parent {
                let pinfo = by_name.get(p).copied().ok_or_else(|| SchemaError::UnknownParent {
                    class: chain[chain.len() - 1].name.to_string(),
                    parent: p.to_string(),
                })?;
                if chain.iter().any(|c| c.name == pinfo.name) {
                    return Err(SchemaError::Cycle(info.name.to_string()));
                }
                chain.push(pinfo);
                parent = pinfo.parent;
            }

            let mut attributes: IndexMap<&'static str, AttributeDef> = IndexMap::new();
            for class in chain.iter().rev() {
                for attr in class.attributes {
                    attributes.insert(
                        attr.name,
                        AttributeDef {
                            info: attr,
                            declared_in: class.name,
                            full_name: format!("{}.{}", class.name, attr.name),
                        },
                    );
                }
            }
            // after shadowing, so a redefined attribute only counts once
            let profiles = attributes
                .values()
                .fold(info.profiles, |p, a| p.union(a.profiles()));

            classes.insert(
                info.name,
                ClassDef {
                    info,
                    ancestors: chain.iter().map(|c| c.name).collect(),
                    attributes,
                    profiles_including_attributes: profiles,
                },
            );
        }

        check_links(&classes)?;
        Ok(Schema { classes, fallback })
    }

    /// The built-in CGMES 2.4.15 catalogue.
    pub fn cgmes() -> &'static Schema {
        &catalog::CGMES
    }

    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values()
    }

    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    /// True if `ancestor` is `class` or one of its superclasses.
    pub fn is_ancestor_or_self(&self, ancestor: &str, class: &str) -> bool {
        self.class(class).map_or(false, |c| c.is_a(ancestor))
    }

    pub fn attribute_names(&self, class: &str) -> Vec<&'static str> {
        self.class(class)
            .map(|c| c.attribute_names().collect())
            .unwrap_or_default()
    }

    pub fn full_name(&self, class: &str, attr: &str) -> Option<&str> {
        self.class(class)?.attribute(attr).map(|a| a.full_name())
    }

    pub fn kind(&self, class: &str, attr: &str) -> Option<AttributeKind> {
        self.class(class)?.attribute(attr).map(|a| a.kind())
    }

    pub fn is_used(&self, class: &str, attr: &str) -> bool {
        self.class(class)
            .and_then(|c| c.attribute(attr))
            .map_or(false, |a| a.is_used())
    }

    pub fn possible_profiles(&self, class: &str) -> ProfileSet {
        self.class(class)
            .map_or(ProfileSet::EMPTY, |c| c.possible_profiles())
    }

    pub fn recommended_profile(&self, class: &str) -> Option<Profile> {
        self.class(class).map(|c| c.recommended_profile())
    }

    pub fn attribute_profiles(&self, class: &str, attr: &str) -> ProfileSet {
        self.class(class)
            .and_then(|c| c.attribute(attr))
            .map_or(ProfileSet::EMPTY, |a| a.profiles())
    }

    pub fn possible_profiles_including_attributes(&self, class: &str) -> ProfileSet {
        self.class(class)
            .map_or(ProfileSet::EMPTY, |c| c.possible_profiles_including_attributes())
    }
}
