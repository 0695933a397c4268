//! Builds a `Model` from CIM RDF/XML sources.
//!
//! Objects are created as their elements arrive. A reference to an object
//! that has not been read yet is kept as a deferred link and resolved
//! once every source of the call has been consumed, so files may be given
//! in any order. An object first declared with a general class and later
//! with a subclass is retyped under the same identifier; links to it are
//! identifiers and so stay valid.
use indexmap::IndexMap;
use std::{
    collections::HashMap,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Cursor},
    mem,
    path::Path,
};
use tracing::{debug, info};

use crate::{
    diagnostics::{DiagnosticSink, Diagnostics},
    entity::{Entity, SetValue},
    error::{CimError, Result},
    model::Model,
    parser::{Element, ElementReader, ModelDescription, Property},
    schema::{AttributeKind, Schema},
};

/// A link that could not be made when its property was read.
#[derive(Debug)]
struct Deferred {
    source: String,
    attr: &'static str,
    target: String,
    // position of the property in the combined input
    seq: u64,
}

pub struct CimReader<S: DiagnosticSink = Diagnostics> {
    schema: &'static Schema,
    sink: S,
    model: Model,
    deferred: Vec<Deferred>,
    // last immediate assignment of each single reference
    direct: HashMap<(String, &'static str), u64>,
    seq: u64,
    descriptions: Vec<ModelDescription>,
}

impl CimReader<Diagnostics> {
    pub fn new(schema: &'static Schema) -> Self {
        CimReader::with_sink(schema, Diagnostics::new())
    }
}

impl<S: DiagnosticSink> CimReader<S> {
    pub fn with_sink(schema: &'static Schema, sink: S) -> Self {
        CimReader {
            schema,
            sink,
            model: Model::new(),
            deferred: Vec::new(),
            direct: HashMap::new(),
            seq: 0,
            descriptions: Vec::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// `md:FullModel` headers of the last read, in input order.
    pub fn model_descriptions(&self) -> &[ModelDescription] {
        &self.descriptions
    }

    /// Read RDF/XML files into one model.
    pub fn read_files<P, I>(&mut self, paths: I) -> Result<Model>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        self.reset();
        for path in paths {
            let path = path.as_ref();
            let file = File::open(path).map_err(|e| CimError::io(path, e));
            let read = file.and_then(|f| self.read_source(path.display(), BufReader::new(f)));
            if let Err(e) = read {
                self.reset();
                return Err(e);
            }
        }
        Ok(self.finish())
    }

    /// Read in-memory RDF/XML documents into one model.
    pub fn read_strings<T, I>(&mut self, xmls: I) -> Result<Model>
    where
        T: AsRef<[u8]>,
        I: IntoIterator<Item = T>,
    {
        self.read_sources(
            xmls.into_iter()
                .enumerate()
                .map(|(i, xml)| (format!("string #{}", i + 1), Cursor::new(xml))),
        )
    }

    /// Read labelled sources into one model. The label only appears in
    /// log messages.
    pub fn read_sources<L, R, I>(&mut self, sources: I) -> Result<Model>
    where
        L: Display,
        R: BufRead,
        I: IntoIterator<Item = (L, R)>,
    {
        self.reset();
        for (label, source) in sources {
            if let Err(e) = self.read_source(label, source) {
                self.reset();
                return Err(e);
            }
        }
        Ok(self.finish())
    }

    fn reset(&mut self) {
        self.model = Model::new();
        self.deferred.clear();
        self.direct.clear();
        self.seq = 0;
        self.descriptions.clear();
    }

    fn read_source<L: Display, R: BufRead>(&mut self, label: L, source: R) -> Result<()> {
        let before = self.model.len();
        let mut elements = ElementReader::new(source);
        for element in elements.by_ref() {
            self.element(element.map_err(|e| e.in_source(&label))?);
        }
        self.descriptions.extend(elements.take_descriptions());
        info!("read {} CIM objects from {}", self.model.len() - before, label);
        Ok(())
    }

    fn element(&mut self, element: Element) {
        let id = match element.id {
            Some(id) => id,
            None => {
                self.sink.report(CimError::MissingIdentifier {
                    class: element.class_name,
                });
                return;
            }
        };
        let class = match self.schema.class(&element.class_name) {
            Some(class) => class,
            None => {
                self.sink.report(CimError::UnknownClass {
                    class: element.class_name,
                    id,
                });
                return;
            }
        };

        match self.model.get(&id) {
            None => {
                debug!(id = %id, class = class.name(), "created object");
                self.model.insert(Entity::new(id.as_str(), class));
            }
            Some(existing) if existing.class_name() != class.name() => {
                if class.is_a(existing.class_name()) {
                    debug!(
                        id = %id,
                        from = existing.class_name(),
                        to = class.name(),
                        "retyped object"
                    );
                    let retyped = existing.retyped(class);
                    self.model.replace(retyped);
                } else {
                    let refused = CimError::RetypeRefused {
                        id: id.clone(),
                        existing: existing.class_name().to_string(),
                        declared: class.name().to_string(),
                    };
                    self.sink.report(refused);
                }
            }
            Some(_) => {}
        }

        for property in &element.properties {
            self.property(&id, property);
        }
    }

    fn property(&mut self, id: &str, property: &Property) {
        self.seq += 1;
        let seq = self.seq;
        let class = match self.model.get(id) {
            Some(entity) => entity.class(),
            None => return,
        };
        let name = property.attribute_name();
        let def = match class.attribute(name) {
            Some(def) => def,
            None => {
                self.sink.report(CimError::UnknownAttribute {
                    class: class.name().to_string(),
                    attribute: property.name.clone(),
                });
                return;
            }
        };

        let result = match (def.kind(), property.resource.as_deref()) {
            (AttributeKind::Enum, Some(tag)) => self.set_text(id, name, tag),
            (AttributeKind::Primitive, Some(_)) => Err(CimError::AttributeKindMismatch {
                class: class.name().to_string(),
                attribute: name.to_string(),
                kind: AttributeKind::Primitive,
                given: "a resource",
            }),
            (kind, Some(target)) => {
                self.resolve(id, def.name(), kind, target, seq);
                Ok(())
            }
            // an element with no content leaves the slot unset
            (_, None) => match property.value.as_deref() {
                Some(text) => self.set_text(id, name, text),
                None => Ok(()),
            },
        };
        if let Err(e) = result {
            self.sink.report(e);
        }
    }

    fn set_text(&mut self, id: &str, attr: &str, text: &str) -> Result<()> {
        match self.model.get_mut(id) {
            Some(entity) => entity.set(attr, SetValue::Text(text)),
            None => Ok(()),
        }
    }

    /// Link now if the target exists and fits, otherwise defer.
    fn resolve(&mut self, id: &str, attr: &'static str, kind: AttributeKind, target: &str, seq: u64) {
        let linked = if self.model.contains(target) {
            self.model.link(id, attr, target)
        } else {
            Err(CimError::DanglingReference {
                source_id: id.to_string(),
                attribute: attr.to_string(),
                target: target.to_string(),
            })
        };
        match linked {
            Ok(()) => {
                if kind == AttributeKind::Reference {
                    self.direct.insert((id.to_string(), attr), seq);
                }
            }
            Err(CimError::DanglingReference { .. }) | Err(CimError::IncompatibleTarget { .. }) => {
                self.deferred.push(Deferred {
                    source: id.to_string(),
                    attr,
                    target: target.to_string(),
                    seq,
                });
            }
            Err(e) => self.sink.report(e),
        }
    }

    /// Apply every deferred link, then hand the model over.
    fn finish(&mut self) -> Model {
        let pending = self.deferred.len();
        let applied = self.complete();
        info!("set {} of {} remaining attributes", applied, pending);

        for entity in self.model.provisional(self.schema) {
            self.sink.report(CimError::Provisional {
                id: entity.id().to_string(),
                class: entity.class_name().to_string(),
            });
        }

        self.deferred.clear();
        self.direct.clear();
        self.seq = 0;
        mem::take(&mut self.model)
    }

    /// Lists collect every deferred link. A single reference takes the
    /// deferred link that came last in the input, unless an immediate
    /// link to the same slot came later still.
    fn complete(&mut self) -> usize {
        let deferred = mem::take(&mut self.deferred);
        let mut singles: IndexMap<(String, &'static str), String> = IndexMap::new();
        let mut applied = 0;

        for d in deferred {
            if !self.model.contains(&d.target) {
                self.sink.report(CimError::DanglingReference {
                    source_id: d.source,
                    attribute: d.attr.to_string(),
                    target: d.target,
                });
                continue;
            }
            let kind = self
                .model
                .get(&d.source)
                .and_then(|e| e.class().attribute(d.attr))
                .map(|a| a.kind());
            match kind {
                Some(AttributeKind::ReferenceList) => {
                    match self.model.link(&d.source, d.attr, &d.target) {
                        Ok(()) => applied += 1,
                        Err(e) => self.sink.report(e),
                    }
                }
                Some(_) => {
                    let key = (d.source, d.attr);
                    if self.direct.get(&key).map_or(false, |seq| *seq > d.seq) {
                        debug!(id = %key.0, attr = key.1, "kept later immediate link");
                        continue;
                    }
                    singles.insert(key, d.target);
                }
                None => {
                    let class = self.model.get(&d.source).map_or("?", Entity::class_name);
                    self.sink.report(CimError::UnknownAttribute {
                        class: class.to_string(),
                        attribute: d.attr.to_string(),
                    });
                }
            }
        }

        for ((source, attr), target) in singles {
            match self.model.link(&source, attr, &target) {
                Ok(()) => applied += 1,
                Err(e) => self.sink.report(e),
            }
        }
        applied
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::{
        io::{self, BufReader, Read},
        path::PathBuf,
    };

    use super::CimReader;
    use crate::{
        entity::Value,
        error::CimError,
        schema::Schema,
    };

    fn doc(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:cim="http://iec.ch/TC57/2013/CIM-schema-cim16#"
         xmlns:entsoe="http://entsoe.eu/CIM/SchemaExtension/3/1#"
         xmlns:md="http://iec.ch/TC57/61970-552/ModelDescription/1#"
         xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
{}
</rdf:RDF>
"#,
            body
        )
    }

    fn reader() -> CimReader {
        CimReader::new(Schema::cgmes())
    }

    #[test]
    fn forward_reference_resolves() {
        let mut r = reader();
        let model = r
            .read_strings([doc(r##"
  <cim:Terminal rdf:ID="_t1">
    <cim:Terminal.ConductingEquipment rdf:resource="#_l1"/>
  </cim:Terminal>
  <cim:ACLineSegment rdf:ID="_l1">
    <cim:IdentifiedObject.name>L1</cim:IdentifiedObject.name>
  </cim:ACLineSegment>"##)])
            .unwrap();

        assert_eq!(model.get("_t1").unwrap().link("ConductingEquipment"), Some("_l1"));
        assert_eq!(model.get("_l1").unwrap().links("Terminals"), &["_t1".to_string()]);
        assert!(r.sink().is_empty());
    }

    #[test]
    fn forward_reference_across_sources() {
        let mut r = reader();
        let model = r
            .read_strings([
                doc(r##"<cim:Terminal rdf:ID="_t1"><cim:Terminal.ConductingEquipment rdf:resource="#_l1"/></cim:Terminal>"##),
                doc(r##"<cim:ACLineSegment rdf:ID="_l1"/>"##),
            ])
            .unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.get("_t1").unwrap().link("ConductingEquipment"), Some("_l1"));
    }

    #[test]
    fn literals_and_enums() {
        let mut r = reader();
        let model = r
            .read_strings([doc(r##"
  <cim:Terminal rdf:ID="_t1">
    <cim:IdentifiedObject.name>T1</cim:IdentifiedObject.name>
    <cim:ACDCTerminal.sequenceNumber>1</cim:ACDCTerminal.sequenceNumber>
    <cim:Terminal.phases rdf:resource="http://iec.ch/TC57/2013/CIM-schema-cim16#PhaseCode.ABC"/>
    <entsoe:IdentifiedObject.shortName>t</entsoe:IdentifiedObject.shortName>
  </cim:Terminal>"##)])
            .unwrap();

        let t = model.get("_t1").unwrap();
        assert_eq!(t.text("name"), Some("T1"));
        assert_eq!(t.text("sequenceNumber"), Some("1"));
        assert_eq!(t.text("shortName"), Some("t"));
        assert_eq!(
            t.get("phases"),
            Some(&Value::Enum(
                "http://iec.ch/TC57/2013/CIM-schema-cim16#PhaseCode.ABC".to_string()
            ))
        );
    }

    const NODES: &str = r##"
  <cim:TopologicalNode rdf:ID="_n1"/>
  <cim:TopologicalNode rdf:ID="_n2"/>"##;

    #[test]
    fn later_immediate_link_wins() {
        let mut r = reader();
        let model = r
            .read_strings([doc(&format!(
                r##"{}
  <cim:Terminal rdf:ID="_t1"><cim:Terminal.TopologicalNode rdf:resource="#_n1"/></cim:Terminal>
  <cim:Terminal rdf:about="#_t1"><cim:Terminal.TopologicalNode rdf:resource="#_n2"/></cim:Terminal>"##,
                NODES
            ))])
            .unwrap();

        assert_eq!(model.get("_t1").unwrap().link("TopologicalNode"), Some("_n2"));
        assert!(!model.get("_n1").unwrap().is_set("Terminal"));
        assert_eq!(model.get("_n2").unwrap().links("Terminal"), &["_t1".to_string()]);
    }

    #[test]
    fn later_deferred_link_beats_earlier_immediate_one() {
        let mut r = reader();
        let model = r
            .read_strings([doc(r##"
  <cim:TopologicalNode rdf:ID="_n1"/>
  <cim:Terminal rdf:ID="_t1"><cim:Terminal.TopologicalNode rdf:resource="#_n1"/></cim:Terminal>
  <cim:Terminal rdf:about="#_t1"><cim:Terminal.TopologicalNode rdf:resource="#_n2"/></cim:Terminal>
  <cim:TopologicalNode rdf:ID="_n2"/>"##)])
            .unwrap();

        assert_eq!(model.get("_t1").unwrap().link("TopologicalNode"), Some("_n2"));
        assert!(!model.get("_n1").unwrap().is_set("Terminal"));
    }

    #[test]
    fn later_immediate_link_beats_earlier_deferred_one() {
        let mut r = reader();
        let model = r
            .read_strings([doc(r##"
  <cim:Terminal rdf:ID="_t1"><cim:Terminal.TopologicalNode rdf:resource="#_n2"/></cim:Terminal>
  <cim:TopologicalNode rdf:ID="_n1"/>
  <cim:Terminal rdf:about="#_t1"><cim:Terminal.TopologicalNode rdf:resource="#_n1"/></cim:Terminal>
  <cim:TopologicalNode rdf:ID="_n2"/>"##)])
            .unwrap();

        assert_eq!(model.get("_t1").unwrap().link("TopologicalNode"), Some("_n1"));
        assert_eq!(model.get("_n1").unwrap().links("Terminal"), &["_t1".to_string()]);
        assert!(!model.get("_n2").unwrap().is_set("Terminal"));
    }

    #[test]
    fn last_of_several_deferred_links_wins() {
        let mut r = reader();
        let model = r
            .read_strings([doc(&format!(
                r##"
  <cim:Terminal rdf:ID="_t1"><cim:Terminal.TopologicalNode rdf:resource="#_n1"/></cim:Terminal>
  <cim:Terminal rdf:about="#_t1"><cim:Terminal.TopologicalNode rdf:resource="#_n2"/></cim:Terminal>{}"##,
                NODES
            ))])
            .unwrap();
        assert_eq!(model.get("_t1").unwrap().link("TopologicalNode"), Some("_n2"));
    }

    #[test]
    fn list_accumulates_from_several_elements() {
        let mut r = reader();
        let model = r
            .read_strings([doc(r##"
  <cim:TopologicalNode rdf:ID="_n1"><cim:TopologicalNode.ConnectivityNodes rdf:resource="#_c1"/></cim:TopologicalNode>
  <cim:ConnectivityNode rdf:ID="_c2"/>
  <cim:TopologicalNode rdf:about="#_n1"><cim:TopologicalNode.ConnectivityNodes rdf:resource="#_c2"/></cim:TopologicalNode>
  <cim:ConnectivityNode rdf:ID="_c1"/>"##)])
            .unwrap();

        let mut links = model.get("_n1").unwrap().links("ConnectivityNodes").to_vec();
        links.sort();
        assert_eq!(links, vec!["_c1".to_string(), "_c2".to_string()]);
        assert_eq!(model.get("_c1").unwrap().link("TopologicalNode"), Some("_n1"));
    }

    #[test]
    fn retype_keeps_attributes_and_inbound_links() {
        let mut r = reader();
        let model = r
            .read_strings([doc(r##"
  <cim:IdentifiedObject rdf:ID="_l1">
    <cim:IdentifiedObject.name>line</cim:IdentifiedObject.name>
  </cim:IdentifiedObject>
  <cim:Terminal rdf:ID="_t1"><cim:Terminal.ConductingEquipment rdf:resource="#_l1"/></cim:Terminal>
  <cim:ACLineSegment rdf:about="#_l1">
    <cim:ACLineSegment.r>0.1</cim:ACLineSegment.r>
  </cim:ACLineSegment>"##)])
            .unwrap();

        let line = model.get("_l1").unwrap();
        assert_eq!(line.class_name(), "ACLineSegment");
        assert_eq!(line.text("name"), Some("line"));
        assert_eq!(line.text("r"), Some("0.1"));
        assert_eq!(line.links("Terminals"), &["_t1".to_string()]);
        assert_eq!(model.get("_t1").unwrap().link("ConductingEquipment"), Some("_l1"));
        assert_eq!(model.ids().collect::<Vec<_>>(), vec!["_l1", "_t1"]);
        assert_eq!(r.sink().count("provisional"), 0);
    }

    #[test]
    fn retype_refused() {
        let mut r = reader();
        let model = r
            .read_strings([doc(r##"
  <cim:Terminal rdf:ID="_x"><cim:IdentifiedObject.name>T</cim:IdentifiedObject.name></cim:Terminal>
  <cim:BaseVoltage rdf:about="#_x"><cim:IdentifiedObject.description>d</cim:IdentifiedObject.description></cim:BaseVoltage>"##)])
            .unwrap();

        let x = model.get("_x").unwrap();
        assert_eq!(x.class_name(), "Terminal");
        assert_eq!(x.text("name"), Some("T"));
        assert_eq!(x.text("description"), Some("d"));
        assert_eq!(r.sink().count("retype_refused"), 1);
    }

    #[test]
    fn recoverable_problems_are_reported() {
        let mut r = reader();
        let model = r
            .read_strings([doc(r##"
  <cim:Gadget rdf:ID="_g"/>
  <cim:BaseVoltage><cim:BaseVoltage.nominalVoltage>1</cim:BaseVoltage.nominalVoltage></cim:BaseVoltage>
  <cim:Terminal rdf:ID="_t1">
    <cim:Terminal.colour>red</cim:Terminal.colour>
    <cim:Terminal.ConnectivityNode rdf:resource="#_nowhere"/>
    <cim:IdentifiedObject.name rdf:resource="#_t1"/>
    <cim:Terminal.ConductingEquipment>_l1</cim:Terminal.ConductingEquipment>
  </cim:Terminal>"##)])
            .unwrap();

        assert_eq!(model.len(), 1);
        let sink = r.sink();
        assert_eq!(sink.count("unknown_class"), 1);
        assert_eq!(sink.count("missing_identifier"), 1);
        assert_eq!(sink.count("unknown_attribute"), 1);
        assert_eq!(sink.count("dangling_reference"), 1);
        assert_eq!(sink.count("attribute_kind_mismatch"), 2);
        assert!(!model.get("_t1").unwrap().is_set("ConnectivityNode"));
    }

    #[test]
    fn incompatible_target_is_retried_after_retype() {
        let mut r = reader();
        let model = r
            .read_strings([doc(r##"
  <cim:IdentifiedObject rdf:ID="_l1"/>
  <cim:Terminal rdf:ID="_t1"><cim:Terminal.ConductingEquipment rdf:resource="#_l1"/></cim:Terminal>
  <cim:ACLineSegment rdf:about="#_l1"/>"##)])
            .unwrap();

        assert_eq!(model.get("_t1").unwrap().link("ConductingEquipment"), Some("_l1"));
        assert!(r.sink().is_empty());
    }

    #[test]
    fn incompatible_target_is_reported_at_the_end() {
        let mut r = reader();
        let model = r
            .read_strings([doc(r##"
  <cim:BaseVoltage rdf:ID="_bv"/>
  <cim:Terminal rdf:ID="_t1"><cim:Terminal.ConductingEquipment rdf:resource="#_bv"/></cim:Terminal>"##)])
            .unwrap();

        assert!(!model.get("_t1").unwrap().is_set("ConductingEquipment"));
        assert_eq!(r.sink().count("incompatible_target"), 1);
    }

    #[test]
    fn provisional_objects_are_reported() {
        let mut r = reader();
        r.read_strings([doc(r##"<cim:IdentifiedObject rdf:ID="_x"/>"##)])
            .unwrap();
        let errors: Vec<_> = r.sink().errors_of("provisional").collect();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CimError::Provisional { id, .. } if id == "_x"));
    }

    #[test]
    fn each_read_starts_fresh() {
        let mut r = reader();
        let first = r
            .read_strings([doc(r##"<cim:Terminal rdf:ID="_t1"><cim:Terminal.ConductingEquipment rdf:resource="#_l1"/></cim:Terminal>"##)])
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(r.sink().count("dangling_reference"), 1);

        let second = r.read_strings([doc(r##"<cim:ACLineSegment rdf:ID="_l1"/>"##)]).unwrap();
        assert_eq!(second.len(), 1);
        assert!(!second.get("_l1").unwrap().is_set("Terminals"));
        assert_eq!(r.sink().count("dangling_reference"), 1);
    }

    #[test]
    fn fatal_errors_abort_the_read() {
        let mut r = reader();
        let err = r
            .read_strings([doc(r##"<cim:Terminal rdf:ID="_t1"/>"##), "<html/>".to_string()])
            .unwrap_err();
        assert!(matches!(err, CimError::NotRdf(_)));

        let err = r.read_files(["/nonexistent/model.xml"]).unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    /// Serves a document prefix, then fails like a dropped connection.
    struct Interrupted<'a> {
        prefix: &'a [u8],
    }

    impl io::Read for Interrupted<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.prefix.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "connection reset"));
            }
            self.prefix.read(buf)
        }
    }

    #[test]
    fn source_failure_is_an_io_error_on_that_source() {
        let xml = doc(r##"<cim:Terminal rdf:ID="_t1"/>"##);
        let prefix = &xml.as_bytes()[..xml.len() / 2];
        let mut r = reader();
        let err = r
            .read_sources([("broken.xml", BufReader::new(Interrupted { prefix }))])
            .unwrap_err();

        assert_eq!(err.kind(), "io");
        match err {
            CimError::Io { path, source } => {
                assert_eq!(path, PathBuf::from("broken.xml"));
                assert_eq!(source.to_string(), "connection reset");
            }
            other => panic!("expected Io, got {:?}", other),
        }
    }

    #[test]
    fn empty_property_leaves_the_slot_unset() {
        let mut r = reader();
        let model = r
            .read_strings([doc(r##"
  <cim:Terminal rdf:ID="_t1">
    <cim:IdentifiedObject.name/>
    <cim:IdentifiedObject.description></cim:IdentifiedObject.description>
    <cim:IdentifiedObject.mRID> </cim:IdentifiedObject.mRID>
  </cim:Terminal>"##)])
            .unwrap();

        let t1 = model.get("_t1").unwrap();
        assert!(!t1.is_set("name"));
        assert!(!t1.is_set("description"));
        assert_eq!(t1.get("mRID"), Some(&Value::Literal(" ".to_string())));
        assert!(r.sink().is_empty());
    }

    #[test]
    fn model_descriptions_are_kept() {
        let mut r = reader();
        r.read_strings([doc(r##"
  <md:FullModel rdf:about="urn:uuid:42">
    <md:Model.profile>http://entsoe.eu/CIM/EquipmentCore/3/1</md:Model.profile>
  </md:FullModel>
  <cim:BaseVoltage rdf:ID="_bv"/>"##)])
            .unwrap();

        let descriptions = r.model_descriptions();
        assert_eq!(descriptions.len(), 1);
        assert_eq!(descriptions[0].id.as_deref(), Some("urn:uuid:42"));
        assert_eq!(
            descriptions[0].profiles().collect::<Vec<_>>(),
            vec!["http://entsoe.eu/CIM/EquipmentCore/3/1"]
        );
    }
}
