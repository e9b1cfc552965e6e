
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::parsing::vcf_stream::TrackedStream;

/// The per-stream facts echoed into every output table's metadata
#[derive(Clone, Debug)]
pub struct StreamDescription {
    /// File name of the stream, no directory part
    pub name: String,
    pub start_offset: i64,
    pub end_offset: i64
}

impl StreamDescription {
    pub fn from_stream(stream: &TrackedStream) -> Self {
        Self {
            name: stream.name(),
            start_offset: stream.start_offset(),
            end_offset: stream.end_offset()
        }
    }
}

/// Opens a buffered output handle, gzip-compressed when the path ends in `.gz`.
/// # Arguments
/// * `filename` - the output path
/// # Errors
/// * if the file does not open properly
pub fn open_output_writer(filename: &Path) -> std::io::Result<Box<dyn Write>> {
    let file = File::create(filename)?;
    let writer: Box<dyn Write> = if filename.extension().unwrap_or_default() == "gz" {
        Box::new(BufWriter::new(GzEncoder::new(file, Compression::default())))
    } else {
        Box::new(BufWriter::new(file))
    };
    Ok(writer)
}

/// Writes the `##FILE_{i}=...` metadata lines shared by both output tables
pub fn write_file_metadata(handle: &mut dyn Write, streams: &[StreamDescription]) -> std::io::Result<()> {
    for (i, stream) in streams.iter().enumerate() {
        writeln!(
            handle,
            "##FILE_{i}=<Name: {}; Start Offset: {}; End Offset: {}>",
            stream.name, stream.start_offset, stream.end_offset
        )?;
    }
    Ok(())
}

/// Renders an optional score, with NA marking an unavailable comparison
pub fn na_cell(value: Option<i64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "NA".to_string()
    }
}
