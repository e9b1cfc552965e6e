
use std::io::Write;
use std::path::Path;

use crate::data_types::coordinates::Coordinates;
use crate::data_types::interval_report::OffsetPair;
use crate::writers::stream_table::{na_cell, open_output_writer, write_file_metadata, StreamDescription};

/// Writes the catalog-vs-stream offset table: one row per catalog interval,
/// one (start, end) offset column pair per stream. Offsets are stream minus
/// catalog; paused and exhausted streams render as NA.
pub struct CatalogOffsetWriter {
    csv_writer: csv::Writer<Box<dyn Write>>,
    num_streams: usize
}

impl CatalogOffsetWriter {
    /// Opens the output file and writes the metadata and header lines.
    /// # Arguments
    /// * `filename` - the output path, gzip-compressed when it ends in `.gz`
    /// * `streams` - descriptions of the streams, in column order
    /// # Errors
    /// * if the file does not open or the preamble does not write
    pub fn new(filename: &Path, streams: &[StreamDescription]) -> anyhow::Result<Self> {
        let mut handle = open_output_writer(filename)?;
        write_file_metadata(&mut handle, streams)?;
        writeln!(handle, "##INFO=<BDDIST_START_i: interval start offset of stream i, stream minus catalog; NA when stream i has no overlapping record>")?;
        writeln!(handle, "##INFO=<BDDIST_END_i: interval end offset of stream i, stream minus catalog; NA when stream i has no overlapping record>")?;

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(handle);

        let mut header = vec!["#CHROM".to_string(), "START".to_string(), "END".to_string()];
        for i in 0..streams.len() {
            header.push(format!("BDDIST_START_{i}"));
            header.push(format!("BDDIST_END_{i}"));
        }
        csv_writer.write_record(&header)?;

        Ok(Self {
            csv_writer,
            num_streams: streams.len()
        })
    }

    /// Writes one catalog interval row.
    /// # Arguments
    /// * `interval` - the catalog interval
    /// * `offsets` - one offset pair per stream, None for paused/exhausted streams
    pub fn write_row(&mut self, interval: &Coordinates, offsets: &[OffsetPair]) -> anyhow::Result<()> {
        assert_eq!(offsets.len(), self.num_streams);

        let mut record = vec![
            interval.chrom().to_string(),
            interval.start().to_string(),
            interval.end().to_string()
        ];
        for offset_pair in offsets.iter() {
            record.push(na_cell(offset_pair.map(|(s, _)| s)));
            record.push(na_cell(offset_pair.map(|(_, e)| e)));
        }
        self.csv_writer.write_record(&record)?;
        Ok(())
    }

    /// Flushes everything to disk
    pub fn finish(&mut self) -> anyhow::Result<()> {
        self.csv_writer.flush()?;
        Ok(())
    }
}
