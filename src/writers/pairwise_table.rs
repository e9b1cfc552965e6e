
use itertools::Itertools;
use std::io::Write;
use std::path::Path;

use crate::data_types::coordinates::Coordinates;
use crate::data_types::interval_report::PairComparison;
use crate::writers::stream_table::{na_cell, open_output_writer, write_file_metadata, StreamDescription};

/// Writes the pairwise comparison table: one row per catalog interval, with
/// positional offset, edit distance, length difference, and resolved allele
/// pairing columns for every unordered stream pair. Column groups are laid
/// out metric-major: all positional pairs, then all edit-distance pairs, then
/// all length pairs, then all pairing labels.
pub struct PairwiseWriter {
    csv_writer: csv::Writer<Box<dyn Write>>,
    num_pairs: usize
}

impl PairwiseWriter {
    /// Opens the output file and writes the metadata and header lines.
    /// # Arguments
    /// * `filename` - the output path, gzip-compressed when it ends in `.gz`
    /// * `streams` - descriptions of the streams, in index order
    /// # Errors
    /// * if the file does not open or the preamble does not write
    pub fn new(filename: &Path, streams: &[StreamDescription]) -> anyhow::Result<Self> {
        let mut handle = open_output_writer(filename)?;
        write_file_metadata(&mut handle, streams)?;
        writeln!(handle, "##INFO=<PSDIST_START_i-j / PSDIST_END_i-j: record start/end offset between streams i and j, i minus j; NA unless both streams overlap the interval>")?;
        writeln!(handle, "##INFO=<LVDIST_ALL1_i-j / LVDIST_ALL2_i-j: per-allele edit distance between streams i and j; NA when either allele lacks comparable sequence>")?;
        writeln!(handle, "##INFO=<LNDIST_ALL1_i-j / LNDIST_ALL2_i-j: per-allele length difference between streams i and j, i minus j, under the edit-distance allele pairing; NA when either length is unavailable>")?;
        writeln!(handle, "##INFO=<CMPORD_i-j: allele pairing selected for streams i and j, VERT or CROSS; NA unless both streams overlap the interval>")?;

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(handle);

        let pairs: Vec<(usize, usize)> = (0..streams.len()).tuple_combinations().collect();
        let mut header = vec!["#CHROM".to_string(), "START".to_string(), "END".to_string()];
        for &(i, j) in pairs.iter() {
            header.push(format!("PSDIST_START_{i}-{j}"));
            header.push(format!("PSDIST_END_{i}-{j}"));
        }
        for &(i, j) in pairs.iter() {
            header.push(format!("LVDIST_ALL1_{i}-{j}"));
            header.push(format!("LVDIST_ALL2_{i}-{j}"));
        }
        for &(i, j) in pairs.iter() {
            header.push(format!("LNDIST_ALL1_{i}-{j}"));
            header.push(format!("LNDIST_ALL2_{i}-{j}"));
        }
        for &(i, j) in pairs.iter() {
            header.push(format!("CMPORD_{i}-{j}"));
        }
        csv_writer.write_record(&header)?;

        Ok(Self {
            csv_writer,
            num_pairs: pairs.len()
        })
    }

    /// Writes one catalog interval row.
    /// # Arguments
    /// * `interval` - the catalog interval
    /// * `comparisons` - one entry per stream pair in combination order, None
    ///   for pairs where either stream did not overlap the interval
    pub fn write_row(&mut self, interval: &Coordinates, comparisons: &[Option<PairComparison>]) -> anyhow::Result<()> {
        assert_eq!(comparisons.len(), self.num_pairs);

        let mut record = vec![
            interval.chrom().to_string(),
            interval.start().to_string(),
            interval.end().to_string()
        ];
        for comparison in comparisons.iter() {
            record.push(na_cell(comparison.as_ref().map(|c| c.start_offset())));
            record.push(na_cell(comparison.as_ref().map(|c| c.end_offset())));
        }
        for comparison in comparisons.iter() {
            let slots = comparison.as_ref().map(|c| *c.edit_slots()).unwrap_or([None, None]);
            record.push(na_cell(slots[0]));
            record.push(na_cell(slots[1]));
        }
        for comparison in comparisons.iter() {
            let slots = comparison.as_ref().map(|c| *c.length_slots()).unwrap_or([None, None]);
            record.push(na_cell(slots[0]));
            record.push(na_cell(slots[1]));
        }
        for comparison in comparisons.iter() {
            let label = comparison.as_ref()
                .map(|c| c.order_used().as_ref().to_string())
                .unwrap_or_else(|| "NA".to_string());
            record.push(label);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::comp_enums::PairingOrder;

    fn mock_descriptions(count: usize) -> Vec<StreamDescription> {
        (0..count)
            .map(|i| StreamDescription {
                name: format!("caller_{i}.vcf"),
                start_offset: 0,
                end_offset: 0
            })
            .collect()
    }

    #[test]
    fn test_pairwise_table() {
        let dir = tempfile::tempdir().unwrap();
        let out_fn = dir.path().join("pairwise.tsv");

        let mut writer = PairwiseWriter::new(&out_fn, &mock_descriptions(2)).unwrap();
        let interval = Coordinates::new("chr1".to_string(), 100, 200);
        let comparison = PairComparison::new(
            -1, -1, [Some(0), Some(2)], [Some(0), None], PairingOrder::Cross
        );
        writer.write_row(&interval, &[Some(comparison)]).unwrap();
        writer.write_row(&interval, &[None]).unwrap();
        writer.finish().unwrap();
        drop(writer);

        let text = std::fs::read_to_string(&out_fn).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[6],
            "#CHROM\tSTART\tEND\tPSDIST_START_0-1\tPSDIST_END_0-1\tLVDIST_ALL1_0-1\tLVDIST_ALL2_0-1\tLNDIST_ALL1_0-1\tLNDIST_ALL2_0-1\tCMPORD_0-1"
        );
        assert_eq!(lines[7], "chr1\t100\t200\t-1\t-1\t0\t2\t0\tNA\tCROSS");
        assert_eq!(lines[8], "chr1\t100\t200\tNA\tNA\tNA\tNA\tNA\tNA\tNA");
    }

    #[test]
    fn test_three_stream_header() {
        let dir = tempfile::tempdir().unwrap();
        let out_fn = dir.path().join("pairwise.tsv");

        let writer = PairwiseWriter::new(&out_fn, &mock_descriptions(3)).unwrap();
        assert_eq!(writer.num_pairs, 3);
        drop(writer);

        let text = std::fs::read_to_string(&out_fn).unwrap();
        let header = text.lines().last().unwrap();
        // metric-major layout: all positional pairs come before any LVDIST column
        assert_eq!(
            header,
            "#CHROM\tSTART\tEND\
             \tPSDIST_START_0-1\tPSDIST_END_0-1\tPSDIST_START_0-2\tPSDIST_END_0-2\tPSDIST_START_1-2\tPSDIST_END_1-2\
             \tLVDIST_ALL1_0-1\tLVDIST_ALL2_0-1\tLVDIST_ALL1_0-2\tLVDIST_ALL2_0-2\tLVDIST_ALL1_1-2\tLVDIST_ALL2_1-2\
             \tLNDIST_ALL1_0-1\tLNDIST_ALL2_0-1\tLNDIST_ALL1_0-2\tLNDIST_ALL2_0-2\tLNDIST_ALL1_1-2\tLNDIST_ALL2_1-2\
             \tCMPORD_0-1\tCMPORD_0-2\tCMPORD_1-2"
        );
    }
}
