use anyhow::{bail, Context};
use clap::Parser;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cim_rdf::{CimReader, CimWriter, Schema, WriterConfig};

/// Read CIM RDF/XML files into one model and write it back out, either
/// as a single document or split into one document per profile.
#[derive(Debug, Parser)]
#[command(name = "cim-rdf", version)]
struct Cli {
    /// Log filter, e.g. `info` or `cim_rdf=debug`
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Write one `<output>_<Profile>.xml` per profile instead of a single file
    #[arg(long)]
    split: bool,

    /// Model id stem for `md:FullModel` headers; defaults to the output file stem
    #[arg(long)]
    model_id: Option<String>,

    /// `md:Model.modelingAuthoritySet` for profile headers
    #[arg(long)]
    authority: Option<String>,

    /// Input files (.xml or .rdf)
    #[arg(required = true, value_parser = rdf_path)]
    inputs: Vec<PathBuf>,

    /// Output file
    #[arg(short, long, value_parser = rdf_path)]
    output: PathBuf,
}

fn rdf_path(arg: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(arg);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xml") || ext.eq_ignore_ascii_case("rdf") => Ok(path),
        _ => Err(format!("{} is not an .xml or .rdf file", arg)),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).context("invalid --log-level")?)
        .with_writer(std::io::stderr)
        .init();

    let schema = Schema::cgmes();
    let mut reader = CimReader::new(schema);
    let model = reader
        .read_files(&cli.inputs)
        .context("reading CIM input failed")?;
    for (message, count) in reader.sink().grouped() {
        info!("{} x while reading: {}", count, message);
    }
    if model.is_empty() {
        bail!("no CIM objects found in {} input file(s)", cli.inputs.len());
    }

    let mut config = WriterConfig::default();
    if let Some(authority) = &cli.authority {
        config = config.modeling_authority_set(authority.as_str());
    }
    let mut writer = CimWriter::new(schema, &model).config(config);

    if cli.split {
        let stem = cli.output.with_extension("");
        let model_id = match &cli.model_id {
            Some(id) => id.clone(),
            None => file_stem(&cli.output),
        };
        let written = writer
            .write_profiles(&stem, &model_id)
            .context("writing profile documents failed")?;
        for (profile, path) in &written {
            info!("{} -> {}", profile, path.display());
        }
    } else {
        let file = File::create(&cli.output)
            .with_context(|| format!("cannot create {}", cli.output.display()))?;
        let mut out = writer
            .write(BufWriter::new(file))
            .with_context(|| format!("writing {} failed", cli.output.display()))?;
        out.flush()
            .with_context(|| format!("writing {} failed", cli.output.display()))?;
    }
    for (message, count) in writer.sink().grouped() {
        info!("{} x while writing: {}", count, message);
    }
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}
