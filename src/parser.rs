//! Turns an RDF/XML byte stream into a lazy sequence of `Element`s.
//!
//! CIM documents are flat: every child of `rdf:RDF` is one object, and
//! every child of an object is one property carrying either text or an
//! `rdf:resource`. Deeper nesting is skipped.
use quick_xml::{
    events::{BytesStart, Event},
    name::{Namespace, ResolveResult},
    NsReader,
};
use std::io::BufRead;

use crate::{
    error::{CimError, Result},
    profile::{Profile, ProfileSet},
    schema::{MD_NS, RDF_NS},
};

/// One object element: `<cim:Terminal rdf:ID="_1">...</cim:Terminal>`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Element {
    pub namespace: String,
    pub class_name: String,
    /// From `rdf:ID`, or `rdf:about` without its leading `#`.
    pub id: Option<String>,
    pub properties: Vec<Property>,
}

/// One property element of an object.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Property {
    pub namespace: String,
    /// The local name as written, usually `<Class>.<attribute>`.
    pub name: String,
    pub resource: Option<String>,
    pub value: Option<String>,
}

impl Property {
    /// `name` without its class prefix.
    pub fn attribute_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// The `md:FullModel` header of a document.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ModelDescription {
    pub id: Option<String>,
    /// Property names (`Model.profile`, `Model.created`, ...) with their
    /// resource or text, in document order.
    pub properties: Vec<(String, String)>,
}

impl ModelDescription {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every `Model.profile` URI.
    pub fn profiles(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(n, _)| n == "Model.profile")
            .map(|(_, v)| v.as_str())
    }

    /// The profiles among `profiles()` that this crate knows.
    pub fn known_profiles(&self) -> ProfileSet {
        self.profiles().filter_map(Profile::from_uri).collect()
    }
}

#[derive(Debug)]
struct Head {
    namespace: String,
    local: String,
    qname: String,
    id: Option<String>,
    resource: Option<String>,
}

enum Step {
    Open { head: Head, empty: bool },
    Text(String),
    Close,
    Eof,
    Skip,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Prolog,
    Body,
    Done,
}

pub struct ElementReader<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    state: State,
    descriptions: Vec<ModelDescription>,
}

impl<R: BufRead> ElementReader<R> {
    pub fn new(source: R) -> Self {
        // text is kept verbatim; whitespace between elements is dropped
        // where it is read
        ElementReader {
            reader: NsReader::from_reader(source),
            buf: Vec::new(),
            state: State::Prolog,
            descriptions: Vec::new(),
        }
    }

    /// `md:FullModel` headers met so far.
    pub fn descriptions(&self) -> &[ModelDescription] {
        &self.descriptions
    }

    pub fn take_descriptions(&mut self) -> Vec<ModelDescription> {
        std::mem::take(&mut self.descriptions)
    }

    fn step(&mut self) -> Result<Step> {
        self.buf.clear();
        let step = match self.reader.read_event_into(&mut self.buf)? {
            Event::Start(e) => Step::Open {
                head: head(&self.reader, &e)?,
                empty: false,
            },
            Event::Empty(e) => Step::Open {
                head: head(&self.reader, &e)?,
                empty: true,
            },
            Event::Text(t) => Step::Text(t.unescape()?.into_owned()),
            Event::CData(c) => Step::Text(String::from_utf8_lossy(&c).into_owned()),
            Event::End(_) => Step::Close,
            Event::Eof => Step::Eof,
            _ => Step::Skip,
        };
        Ok(step)
    }

    /// Consume everything up to and including the `rdf:RDF` start tag.
    /// Returns false for an empty `<rdf:RDF/>`.
    fn open(&mut self) -> Result<bool> {
        loop {
            match self.step()? {
                Step::Open { head, empty } => {
                    if head.namespace == RDF_NS {
                        return Ok(!empty);
                    }
                    return Err(CimError::NotRdf(head.qname));
                }
                Step::Eof => return Err(CimError::NotRdf(String::from("an empty document"))),
                _ => {}
            }
        }
    }

    fn next_element(&mut self) -> Result<Option<Element>> {
        loop {
            match self.step()? {
                Step::Open { head, empty } => {
                    let properties = if empty {
                        Vec::new()
                    } else {
                        self.properties(&head.qname)?
                    };
                    if head.namespace == MD_NS {
                        if head.local == "FullModel" {
                            self.descriptions.push(ModelDescription {
                                id: head.id,
                                properties: properties
                                    .into_iter()
                                    .map(|p| (p.name, p.resource.or(p.value).unwrap_or_default()))
                                    .collect(),
                            });
                        }
                        continue;
                    }
                    return Ok(Some(Element {
                        namespace: head.namespace,
                        class_name: head.local,
                        id: head.id,
                        properties,
                    }));
                }
                Step::Close => return Ok(None),
                Step::Eof => return Err(CimError::UnexpectedEof(String::from("rdf:RDF"))),
                Step::Text(_) | Step::Skip => {}
            }
        }
    }

    fn properties(&mut self, owner: &str) -> Result<Vec<Property>> {
        let mut properties = Vec::new();
        loop {
            match self.step()? {
                Step::Open { head, empty } => {
                    let value = if empty { None } else { self.text(&head.qname)? };
                    properties.push(Property {
                        namespace: head.namespace,
                        name: head.local,
                        resource: head.resource,
                        value,
                    });
                }
                Step::Close => return Ok(properties),
                Step::Eof => return Err(CimError::UnexpectedEof(owner.to_string())),
                Step::Text(_) | Step::Skip => {}
            }
        }
    }

    /// Text content of a property, skipping any nested elements.
    fn text(&mut self, owner: &str) -> Result<Option<String>> {
        let mut text: Option<String> = None;
        let mut depth = 0usize;
        loop {
            match self.step()? {
                Step::Open { empty: false, .. } => depth += 1,
                Step::Open { empty: true, .. } | Step::Skip => {}
                Step::Text(t) if depth == 0 => text.get_or_insert_with(String::new).push_str(&t),
                Step::Text(_) => {}
                Step::Close if depth == 0 => return Ok(text),
                Step::Close => depth -= 1,
                Step::Eof => return Err(CimError::UnexpectedEof(owner.to_string())),
            }
        }
    }
}

impl<R: BufRead> Iterator for ElementReader<R> {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match self.state {
            State::Done => return None,
            State::Prolog => match self.open() {
                Ok(true) => {
                    self.state = State::Body;
                    self.next_element()
                }
                Ok(false) => Ok(None),
                Err(e) => Err(e),
            },
            State::Body => self.next_element(),
        };
        match result {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => {
                self.state = State::Done;
                None
            }
            Err(e) => {
                self.state = State::Done;
                Some(Err(e))
            }
        }
    }
}

fn head<R>(reader: &NsReader<R>, e: &BytesStart<'_>) -> Result<Head> {
    let (ns, local) = reader.resolve_element(e.name());
    let mut head = Head {
        namespace: namespace_url(ns),
        local: String::from_utf8_lossy(local.as_ref()).into_owned(),
        qname: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        id: None,
        resource: None,
    };
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let (ns, local) = reader.resolve_attribute(attr.key);
        if namespace_url(ns) != RDF_NS {
            continue;
        }
        match local.as_ref() {
            b"ID" => head.id = Some(attr.unescape_value()?.into_owned()),
            b"about" => head.id = Some(strip_hash(&attr.unescape_value()?)),
            b"resource" => head.resource = Some(strip_hash(&attr.unescape_value()?)),
            _ => {}
        }
    }
    Ok(head)
}

fn namespace_url(ns: ResolveResult<'_>) -> String {
    match ns {
        ResolveResult::Bound(Namespace(url)) => String::from_utf8_lossy(url).into_owned(),
        _ => String::new(),
    }
}

fn strip_hash(s: &str) -> String {
    s.strip_prefix('#').unwrap_or(s).to_string()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Element, ElementReader, Property};
    use crate::{
        error::CimError,
        profile::{Profile, ProfileSet},
        schema::CIM_NS,
    };

    const DOC: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:cim="http://iec.ch/TC57/2013/CIM-schema-cim16#"
         xmlns:md="http://iec.ch/TC57/61970-552/ModelDescription/1#"
         xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <md:FullModel rdf:about="urn:uuid:1234">
    <md:Model.created>2024-01-01T00:00:00Z</md:Model.created>
    <md:Model.profile>http://entsoe.eu/CIM/Topology/4/1</md:Model.profile>
    <md:Model.profile>http://example.com/unknown</md:Model.profile>
  </md:FullModel>
  <cim:Terminal rdf:ID="_t1">
    <cim:IdentifiedObject.name>T &amp; 1</cim:IdentifiedObject.name>
    <cim:Terminal.ConductingEquipment rdf:resource="#_l1"/>
  </cim:Terminal>
  <cim:ACLineSegment rdf:about="#_l1"/>
  <cim:BaseVoltage>
    <cim:BaseVoltage.nominalVoltage>400</cim:BaseVoltage.nominalVoltage>
  </cim:BaseVoltage>
</rdf:RDF>
"##;

    fn read_all(xml: &str) -> Vec<Element> {
        ElementReader::new(xml.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn objects_and_properties() {
        let elements = read_all(DOC);
        assert_eq!(elements.len(), 3);

        let terminal = &elements[0];
        assert_eq!(terminal.namespace, CIM_NS);
        assert_eq!(terminal.class_name, "Terminal");
        assert_eq!(terminal.id.as_deref(), Some("_t1"));
        assert_eq!(
            terminal.properties,
            vec![
                Property {
                    namespace: CIM_NS.to_string(),
                    name: "IdentifiedObject.name".to_string(),
                    resource: None,
                    value: Some("T & 1".to_string()),
                },
                Property {
                    namespace: CIM_NS.to_string(),
                    name: "Terminal.ConductingEquipment".to_string(),
                    resource: Some("_l1".to_string()),
                    value: None,
                },
            ]
        );
        assert_eq!(terminal.properties[1].attribute_name(), "ConductingEquipment");
    }

    #[test]
    fn about_and_missing_identifier() {
        let elements = read_all(DOC);
        assert_eq!(elements[1].id.as_deref(), Some("_l1"));
        assert!(elements[1].properties.is_empty());
        assert_eq!(elements[2].id, None);
    }

    #[test]
    fn model_description_is_captured_not_emitted() {
        let mut reader = ElementReader::new(DOC.as_bytes());
        assert!(reader.by_ref().all(|e| e.unwrap().namespace == CIM_NS));

        let descriptions = reader.take_descriptions();
        assert_eq!(descriptions.len(), 1);
        let md = &descriptions[0];
        assert_eq!(md.id.as_deref(), Some("urn:uuid:1234"));
        assert_eq!(md.get("Model.created"), Some("2024-01-01T00:00:00Z"));
        assert_eq!(md.profiles().count(), 2);
        assert_eq!(md.known_profiles(), ProfileSet::of(&[Profile::TP]));
    }

    #[test]
    fn nested_markup_inside_a_property_is_skipped() {
        let xml = r#"<rdf:RDF xmlns:cim="http://iec.ch/TC57/2013/CIM-schema-cim16#"
                             xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <cim:Terminal rdf:ID="_t1">
    <cim:IdentifiedObject.description>a<cim:x>ignored</cim:x>b</cim:IdentifiedObject.description>
  </cim:Terminal>
</rdf:RDF>"#;
        let elements = read_all(xml);
        assert_eq!(elements[0].properties[0].value.as_deref(), Some("ab"));
    }

    #[test]
    fn property_text_keeps_its_whitespace() {
        let xml = r#"<rdf:RDF xmlns:cim="http://iec.ch/TC57/2013/CIM-schema-cim16#"
                             xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <cim:Terminal rdf:ID="_t1">
    <cim:IdentifiedObject.description>  padded value  </cim:IdentifiedObject.description>
    <cim:IdentifiedObject.name>a<!-- note --> b</cim:IdentifiedObject.name>
    <cim:IdentifiedObject.shortName>
</cim:IdentifiedObject.shortName>
  </cim:Terminal>
</rdf:RDF>"#;
        let elements = read_all(xml);
        let values: Vec<_> = elements[0]
            .properties
            .iter()
            .map(|p| p.value.as_deref())
            .collect();
        assert_eq!(values, vec![Some("  padded value  "), Some("a b"), Some("\n")]);
    }

    #[test]
    fn empty_rdf_root() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"/>"#;
        assert!(read_all(xml).is_empty());
    }

    #[test]
    fn non_rdf_root_is_fatal() {
        let mut reader = ElementReader::new(r#"<html><body/></html>"#.as_bytes());
        match reader.next() {
            Some(Err(CimError::NotRdf(name))) => assert_eq!(name, "html"),
            other => panic!("expected NotRdf, got {:?}", other),
        }
        assert!(reader.next().is_none());

        let mut reader = ElementReader::new("".as_bytes());
        assert!(matches!(reader.next(), Some(Err(CimError::NotRdf(_)))));
    }

    #[test]
    fn truncated_document_is_fatal() {
        let xml = r#"<rdf:RDF xmlns:cim="http://iec.ch/TC57/2013/CIM-schema-cim16#"
                             xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <cim:Terminal rdf:ID="_t1">
    <cim:IdentifiedObject.name>T1</cim:IdentifiedObject.name>"#;
        let mut reader = ElementReader::new(xml.as_bytes());
        let err = reader.next().unwrap().unwrap_err();
        assert!(err.is_fatal());
        assert!(reader.next().is_none());
    }

    #[test]
    fn malformed_xml_is_fatal() {
        let xml = r#"<rdf:RDF xmlns:cim="http://iec.ch/TC57/2013/CIM-schema-cim16#"
                             xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <cim:Terminal rdf:ID="_t1"></cim:BaseVoltage>
</rdf:RDF>"#;
        let results: Vec<_> = ElementReader::new(xml.as_bytes()).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(CimError::Xml(_))));
    }
}
