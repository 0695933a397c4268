//! Serializes a `Model` to RDF/XML, either as one document or as one
//! document per profile.
//!
//! In a profile document every object whose class or attributes can carry
//! data for that profile appears once: with `rdf:ID` if the profile is the
//! one chosen for its class (the main entry), otherwise as an
//! `rdf:about` stub holding only the attributes that land in the
//! profile. Stubs without such attributes are left out.
use indexmap::IndexMap;
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    diagnostics::{DiagnosticSink, Diagnostics},
    entity::{Entity, Value},
    error::{unshare, CimError, Result},
    model::Model,
    profile::Profile,
    schema::{AttributeDef, AttributeKind, Namespace, Schema},
};

fn map_err(error: quick_xml::Error) -> CimError {
    if let quick_xml::Error::Io(error) = error {
        CimError::Write(unshare(error))
    } else {
        CimError::Xml(error)
    }
}

#[derive(Clone, Debug)]
pub struct WriterConfig {
    indent: usize,
    header: bool,
    modeling_authority_set: Option<String>,
    class_profiles: IndexMap<String, Profile>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            indent: 2,
            header: true,
            modeling_authority_set: None,
            class_profiles: IndexMap::new(),
        }
    }
}

impl WriterConfig {
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Write an `md:FullModel` header into profile documents.
    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn modeling_authority_set(mut self, uri: impl Into<String>) -> Self {
        self.modeling_authority_set = Some(uri.into());
        self
    }

    /// Main profile for objects of `class`; unmapped classes use their
    /// recommended profile.
    pub fn class_profile(mut self, class: impl Into<String>, profile: Profile) -> Self {
        self.class_profiles.insert(class.into(), profile);
        self
    }

    pub fn class_profiles(mut self, map: IndexMap<String, Profile>) -> Self {
        self.class_profiles.extend(map);
        self
    }
}

/// Class name to recommended profile, for every class present in
/// `model`, in order of first appearance. A starting point for
/// `WriterConfig::class_profiles`.
pub fn class_profile_map(schema: &Schema, model: &Model) -> IndexMap<String, Profile> {
    let mut map = IndexMap::new();
    for entity in model {
        if !map.contains_key(entity.class_name()) {
            if let Some(profile) = schema.recommended_profile(entity.class_name()) {
                map.insert(entity.class_name().to_string(), profile);
            }
        }
    }
    map
}

/// One object as it will appear in a document.
struct Entry<'m> {
    entity: &'m Entity,
    main: bool,
    attributes: Vec<(&'static AttributeDef, &'m Value)>,
}

pub struct CimWriter<'m, S: DiagnosticSink = Diagnostics> {
    schema: &'static Schema,
    model: &'m Model,
    config: WriterConfig,
    sink: S,
}

impl<'m> CimWriter<'m, Diagnostics> {
    pub fn new(schema: &'static Schema, model: &'m Model) -> Self {
        CimWriter {
            schema,
            model,
            config: WriterConfig::default(),
            sink: Diagnostics::new(),
        }
    }
}

impl<'m, S: DiagnosticSink> CimWriter<'m, S> {
    pub fn config(mut self, config: WriterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_sink<T: DiagnosticSink>(self, sink: T) -> CimWriter<'m, T> {
        CimWriter {
            schema: self.schema,
            model: self.model,
            config: self.config,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Write every object, with all its used attributes, to `out`.
    pub fn write<W: Write>(&mut self, out: W) -> Result<W> {
        let entries = self.plan(None);
        let (out, count) = self.emit(out, &entries, None)?;
        info!("wrote {} of {} CIM objects", count, self.model.len());
        Ok(out)
    }

    /// The unpartitioned document as a string.
    pub fn write_string(&mut self) -> Result<String> {
        let out = self.write(Vec::new())?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// The document for `profile`, or `None` if no object has data for it.
    pub fn generate(&mut self, profile: Profile, model_id: &str) -> Result<Option<String>> {
        let entries = self.plan(Some(profile));
        if entries.is_empty() {
            debug!(%profile, "nothing to write");
            return Ok(None);
        }
        let (out, count) = self.emit(Vec::new(), &entries, Some((profile, model_id)))?;
        info!("wrote {} of {} CIM objects for {}", count, self.model.len(), profile);
        Ok(Some(String::from_utf8_lossy(&out).into_owned()))
    }

    /// Write one file `<path_stem>_<LongName>.xml` per profile that has
    /// data, with model id `<model_id_stem>_<LongName>`.
    pub fn write_profiles(
        &mut self,
        path_stem: impl AsRef<Path>,
        model_id_stem: &str,
    ) -> Result<IndexMap<Profile, PathBuf>> {
        let mut written = IndexMap::new();
        for profile in Profile::ALL {
            let model_id = format!("{}_{}", model_id_stem, profile.long_name());
            if let Some(doc) = self.generate(profile, &model_id)? {
                let mut name = path_stem.as_ref().as_os_str().to_owned();
                name.push(format!("_{}.xml", profile.long_name()));
                let path = PathBuf::from(name);
                fs::write(&path, doc).map_err(|e| CimError::io(&path, e))?;
                written.insert(profile, path);
            }
        }
        Ok(written)
    }

    fn class_profile(&self, entity: &Entity) -> Profile {
        self.config
            .class_profiles
            .get(entity.class_name())
            .copied()
            .unwrap_or_else(|| entity.class().recommended_profile())
    }

    fn plan(&mut self, profile: Option<Profile>) -> Vec<Entry<'m>> {
        let model = self.model;
        let mut entries = Vec::new();
        for entity in model {
            let class = entity.class();
            let entry = match profile {
                None => Entry {
                    entity,
                    main: true,
                    attributes: entity.values().filter(|(a, _)| a.is_used()).collect(),
                },
                Some(profile) => {
                    if entity.class_name() == self.schema.fallback()
                        || !class.possible_profiles_including_attributes().contains(profile)
                    {
                        continue;
                    }
                    let class_profile = self.class_profile(entity);
                    let attributes: Vec<_> = entity
                        .values()
                        .filter(|(a, _)| {
                            a.is_used()
                                && class.attribute_profile(a.name(), class_profile) == Some(profile)
                        })
                        .collect();
                    let main = class_profile == profile;
                    if !main && attributes.is_empty() {
                        continue;
                    }
                    Entry {
                        entity,
                        main,
                        attributes,
                    }
                }
            };
            self.check_links(&entry);
            entries.push(entry);
        }
        entries
    }

    fn check_links(&mut self, entry: &Entry<'_>) {
        for (attr, value) in &entry.attributes {
            for target in value.targets() {
                if !self.model.contains(target) {
                    self.sink.report(CimError::DanglingReference {
                        source_id: entry.entity.id().to_string(),
                        attribute: attr.name().to_string(),
                        target: target.clone(),
                    });
                }
            }
        }
    }

    fn emit<W: Write>(
        &self,
        out: W,
        entries: &[Entry<'_>],
        header: Option<(Profile, &str)>,
    ) -> Result<(W, usize)> {
        let header = header.filter(|_| self.config.header);

        let mut namespaces: IndexMap<&'static str, &'static str> = IndexMap::new();
        let mut used = |ns: Namespace| {
            namespaces.insert(ns.prefix(), ns.url());
        };
        used(Namespace::Rdf);
        if header.is_some() {
            used(Namespace::Md);
        }
        for entry in entries {
            used(entry.entity.class().namespace());
            for (attr, _) in &entry.attributes {
                used(attr.namespace());
            }
        }
        namespaces.sort_keys();

        let mut emitter = Emitter::new(out, self.config.indent);
        emitter.open(&namespaces)?;
        if let Some((profile, model_id)) = header {
            emitter.header(profile, model_id, self.config.modeling_authority_set.as_deref())?;
        }
        for entry in entries {
            emitter.entry(entry)?;
        }
        Ok((emitter.finish()?, entries.len()))
    }
}

/// Thin layer over `quick_xml::Writer` for the element shapes CIM uses.
struct Emitter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> Emitter<W> {
    fn new(out: W, indent: usize) -> Self {
        Emitter {
            writer: Writer::new_with_indent(out, b' ', indent),
        }
    }

    fn write_event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(map_err)
    }

    fn open(&mut self, namespaces: &IndexMap<&str, &str>) -> Result<()> {
        self.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut rdf_open = BytesStart::new("rdf:RDF");
        for (prefix, url) in namespaces {
            let ns = format!("xmlns:{}", prefix);
            rdf_open.push_attribute((&ns[..], *url));
        }
        self.write_event(Event::Start(rdf_open))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.write_event(Event::Start(BytesStart::new(name)))?;
        self.write_event(Event::Text(BytesText::new(text)))?;
        self.write_event(Event::End(BytesEnd::new(name)))
    }

    fn resource_element(&mut self, name: &str, resource: &str) -> Result<()> {
        let mut start = BytesStart::new(name);
        start.push_attribute(("rdf:resource", resource));
        self.write_event(Event::Empty(start))
    }

    fn header(&mut self, profile: Profile, model_id: &str, authority: Option<&str>) -> Result<()> {
        let about = format!("#{}", model_id);
        let mut start = BytesStart::new("md:FullModel");
        start.push_attribute(("rdf:about", &about[..]));
        self.write_event(Event::Start(start))?;
        for uri in profile.uris() {
            self.text_element("md:Model.profile", uri)?;
        }
        if let Some(authority) = authority {
            self.text_element("md:Model.modelingAuthoritySet", authority)?;
        }
        self.write_event(Event::End(BytesEnd::new("md:FullModel")))
    }

    fn entry(&mut self, entry: &Entry<'_>) -> Result<()> {
        let class = entry.entity.class();
        let name = format!("{}:{}", class.namespace().prefix(), class.name());
        let mut start = BytesStart::new(name.as_str());
        if entry.main {
            start.push_attribute(("rdf:ID", entry.entity.id()));
        } else {
            let about = format!("#{}", entry.entity.id());
            start.push_attribute(("rdf:about", &about[..]));
        }
        if entry.attributes.is_empty() {
            return self.write_event(Event::Empty(start));
        }

        self.write_event(Event::Start(start))?;
        for (attr, value) in &entry.attributes {
            let element = format!("{}:{}", attr.namespace().prefix(), attr.full_name());
            match (attr.kind(), value) {
                (AttributeKind::Enum, Value::Enum(tag) | Value::Literal(tag)) => {
                    self.resource_element(&element, &enum_resource(attr.namespace(), tag))?;
                }
                (_, Value::Literal(text) | Value::Enum(text)) => {
                    self.text_element(&element, text)?;
                }
                (_, Value::Link(_) | Value::Links(_)) => {
                    for target in value.targets() {
                        self.resource_element(&element, &format!("#{}", target))?;
                    }
                }
            }
        }
        self.write_event(Event::End(BytesEnd::new(name.as_str())))
    }

    /// Finishes writing and returns the underlying `Write`
    fn finish(mut self) -> Result<W> {
        self.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;
        let mut out = self.writer.into_inner();
        out.write_all(b"\n")?;
        Ok(out)
    }
}

/// `rdf:resource` for an enum literal: a bare literal becomes a fragment,
/// a full URI is moved into the attribute's namespace.
fn enum_resource(namespace: Namespace, tag: &str) -> String {
    match tag.rfind('#') {
        None => format!("#{}", tag),
        Some(0) => tag.to_string(),
        Some(i) => format!("{}{}", namespace.url(), &tag[i + 1..]),
    }
}
