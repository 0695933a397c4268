//! Read and write CIM (CGMES) power grid models in RDF/XML.
//!
//! ```no_run
//! use cim_rdf::{CimReader, CimWriter, Profile, Schema};
//!
//! # fn main() -> cim_rdf::Result<()> {
//! let schema = Schema::cgmes();
//! let model = CimReader::new(schema).read_files(["grid_EQ.xml", "grid_TP.xml"])?;
//! let mut writer = CimWriter::new(schema, &model);
//! if let Some(doc) = writer.generate(Profile::SSH, "grid_SteadyStateHypothesis")? {
//!     println!("{}", doc);
//! }
//! # Ok(())
//! # }
//! ```
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod model;
pub mod parser;
pub mod profile;
pub mod reader;
pub mod schema;
pub mod writer;

pub use crate::{
    diagnostics::{DiagnosticSink, Diagnostics},
    entity::{Entity, SetValue, Value},
    error::{CimError, Result},
    model::Model,
    profile::{Profile, ProfileSet},
    reader::CimReader,
    schema::Schema,
    writer::{class_profile_map, CimWriter, WriterConfig},
};
