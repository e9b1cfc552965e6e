
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::data_types::alleles::{Allele, Genotype};
use crate::data_types::coordinates::Coordinates;
use crate::parsing::text_io::open_text_reader;

#[derive(thiserror::Error, Debug)]
pub enum StreamError {
    #[error("error while opening {path:?}: {source}")]
    OpenFailure { path: PathBuf, source: std::io::Error },
    #[error("error while reading {path:?}: {source}")]
    ReadFailure { path: PathBuf, source: std::io::Error },
    #[error("malformed record in {path:?}: {reason}; line: {line:?}")]
    RecordFormat { path: PathBuf, reason: String, line: String },
    #[error("{path:?} is not in sorted order: chromosome {current:?} appears after {previous:?}")]
    OrderingViolation { path: PathBuf, previous: String, current: String }
}

/// How a stream's records expose span and allele information.
/// This is the per-tool quirk strategy, injected at construction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum_macros::AsRefStr, strum_macros::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum RecordStyle {
    /// REF/ALT sequence text; span end is POS + REF length - 1
    #[default]
    #[strum(serialize = "sequence")]
    Sequence,
    /// No usable allele text; span end comes from the leading INFO `END=` entry,
    /// allele lengths derive from the span
    #[strum(serialize = "pos-only")]
    PositionOnly,
    /// Like pos-only, but per-ALT allele lengths come from the INFO `SVLEN=` base counts
    #[strum(serialize = "svlen")]
    SvLength
}

/// Everything needed to open one comparison stream
#[derive(Clone, Debug)]
pub struct StreamConfig {
    /// Path to the variant call file, plain or `.gz`
    pub path: PathBuf,
    /// Added to every start position at parse time (coordinate convention correction)
    pub start_offset: i64,
    /// Added to every end position at parse time
    pub end_offset: i64,
    /// Record parsing strategy for this tool
    pub style: RecordStyle
}

impl StreamConfig {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            start_offset: 0,
            end_offset: 0,
            style: RecordStyle::default()
        }
    }

    pub fn with_offsets(mut self, start_offset: i64, end_offset: i64) -> Self {
        self.start_offset = start_offset;
        self.end_offset = end_offset;
        self
    }

    pub fn with_style(mut self, style: RecordStyle) -> Self {
        self.style = style;
        self
    }
}

/// Column indices pulled from the last `#CHROM`-style header line
#[derive(Clone, Debug)]
struct ColumnMap {
    chrom: usize,
    pos: usize,
    ref_allele: usize,
    alt: usize,
    info: usize,
    /// First sample column, the one genotypes are read from
    sample: usize,
    /// Fewest columns a data line can carry and still cover every mapped index
    min_fields: usize
}

impl ColumnMap {
    /// Parses a `#CHROM POS ID REF ALT QUAL FILTER INFO FORMAT SAMPLE ...` header line
    fn from_header(path: &Path, line: &str) -> Result<Self, StreamError> {
        let header_error = |reason: &str| StreamError::RecordFormat {
            path: path.to_path_buf(),
            reason: reason.to_string(),
            line: line.to_string()
        };

        let mut chrom = None;
        let mut pos = None;
        let mut ref_allele = None;
        let mut alt = None;
        let mut info = None;
        let mut format = None;
        for (i, name) in line.split('\t').enumerate() {
            match name.trim_start_matches('#') {
                "CHROM" => chrom = Some(i),
                "POS" => pos = Some(i),
                "REF" => ref_allele = Some(i),
                "ALT" => alt = Some(i),
                "INFO" => info = Some(i),
                "FORMAT" => format = Some(i),
                _ => {}
            }
        }

        let format = format.ok_or_else(|| header_error("header is missing the FORMAT column"))?;
        let num_columns = line.split('\t').count();
        if format + 1 >= num_columns {
            return Err(header_error("header has no sample column after FORMAT"));
        }

        let chrom = chrom.ok_or_else(|| header_error("header is missing the CHROM column"))?;
        let pos = pos.ok_or_else(|| header_error("header is missing the POS column"))?;
        let ref_allele = ref_allele.ok_or_else(|| header_error("header is missing the REF column"))?;
        let alt = alt.ok_or_else(|| header_error("header is missing the ALT column"))?;
        let info = info.ok_or_else(|| header_error("header is missing the INFO column"))?;
        let sample = format + 1;

        // headers are free to reorder columns, so a data line must cover the
        // largest mapped index, not just the sample column
        let min_fields = 1 + sample.max(chrom).max(pos).max(ref_allele).max(alt).max(info);
        Ok(Self {
            chrom, pos, ref_allele, alt, info, sample,
            min_fields
        })
    }
}

/// One open comparison stream with its own position, pause, and exhaustion state.
/// Created once per input file; mutated in place on every advance; the
/// underlying file handle is dropped as soon as the stream exhausts.
pub struct TrackedStream {
    config: StreamConfig,
    /// None once the stream is exhausted
    reader: Option<Box<dyn BufRead>>,
    columns: ColumnMap,
    /// Span of the current record (offsets already applied), None once exhausted
    span: Option<Coordinates>,
    /// Genotype of the current record, rebuilt on every advance
    genotype: Genotype,
    /// Chromosome of the immediately preceding record, for order validation
    previous_chromosome: Option<String>,
    /// True when the current record lies strictly ahead of the interval being processed
    paused: bool,
    exhausted: bool,
    /// Records advanced past without being compared; never decreases
    skipped_count: u64
}

impl TrackedStream {
    /// Opens the configured file and positions the stream on its first record.
    /// # Arguments
    /// * `config` - path, offsets, and record style for this stream
    /// # Errors
    /// * if the file does not open, the header is unusable, or the first record is malformed
    pub fn open(config: StreamConfig) -> Result<Self, StreamError> {
        let reader = open_text_reader(&config.path)
            .map_err(|source| StreamError::OpenFailure { path: config.path.clone(), source })?;
        Self::from_reader(reader, config)
    }

    /// Builds a tracked stream over any line-oriented reader; the seam the tests use.
    /// # Arguments
    /// * `reader` - raw record lines, header included
    /// * `config` - offsets and record style; the path is only used in error messages
    pub fn from_reader(mut reader: Box<dyn BufRead>, config: StreamConfig) -> Result<Self, StreamError> {
        // header phase: metadata lines pass by, the last #CHROM line defines the columns,
        // and the first data line ends the phase
        let mut columns: Option<ColumnMap> = None;
        let mut first_record: Option<String> = None;
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line)
                .map_err(|source| StreamError::ReadFailure { path: config.path.clone(), source })?;
            if bytes_read == 0 {
                break;
            }

            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(stripped) = trimmed.strip_prefix('#') {
                if stripped.starts_with("CHROM") {
                    columns = Some(ColumnMap::from_header(&config.path, trimmed)?);
                }
                continue;
            }

            first_record = Some(trimmed.to_string());
            break;
        }

        let columns = columns.ok_or_else(|| StreamError::RecordFormat {
            path: config.path.clone(),
            reason: "missing #CHROM header line".to_string(),
            line: String::new()
        })?;

        let mut stream = Self {
            config,
            reader: Some(reader),
            columns,
            span: None,
            genotype: Genotype::absent(),
            previous_chromosome: None,
            paused: false,
            exhausted: false,
            skipped_count: 0
        };

        match first_record {
            Some(record_line) => stream.apply_record(&record_line)?,
            None => {
                // header-only file, nothing to compare
                stream.exhausted = true;
                stream.reader = None;
            }
        }
        Ok(stream)
    }

    /// Moves to the next record and rebuilds the genotype.
    /// Returns false once the stream is exhausted; the file handle is released
    /// at that point and further calls are no-ops.
    /// # Errors
    /// * if reading fails or the record is malformed
    pub fn advance(&mut self) -> Result<bool, StreamError> {
        if self.exhausted {
            return Ok(false);
        }

        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = match self.reader.as_mut() {
                Some(reader) => reader.read_line(&mut line)
                    .map_err(|source| StreamError::ReadFailure { path: self.config.path.clone(), source })?,
                None => 0
            };
            if bytes_read == 0 {
                self.exhausted = true;
                self.reader = None;
                self.previous_chromosome = self.span.take().map(|s| s.chrom().to_string());
                self.genotype = Genotype::absent();
                return Ok(false);
            }

            let trimmed = line.trim_end();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let owned = trimmed.to_string();
            self.apply_record(&owned)?;
            return Ok(true);
        }
    }

    /// Fails if the current record's chromosome sorts (ASCII) before the previous
    /// record's chromosome. Lexicographic ordering is deliberate: inputs must be
    /// pre-sorted consistently with it ("chr10" sorts before "chr2").
    pub fn check_order(&self) -> Result<(), StreamError> {
        if let (Some(previous), Some(span)) = (self.previous_chromosome.as_deref(), self.span.as_ref()) {
            if span.chrom() < previous {
                return Err(StreamError::OrderingViolation {
                    path: self.config.path.clone(),
                    previous: previous.to_string(),
                    current: span.chrom().to_string()
                });
            }
        }
        Ok(())
    }

    /// Parses one data line into the stream state: span with offsets applied,
    /// rebuilt genotype, and order-tracking bookkeeping.
    fn apply_record(&mut self, line: &str) -> Result<(), StreamError> {
        let record_error = |reason: String| StreamError::RecordFormat {
            path: self.config.path.clone(),
            reason,
            line: line.to_string()
        };

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < self.columns.min_fields {
            return Err(record_error(format!(
                "expected at least {} columns, found {}", self.columns.min_fields, fields.len()
            )));
        }

        let chrom = fields[self.columns.chrom].to_string();
        let pos: i64 = fields[self.columns.pos].parse()
            .map_err(|_| record_error(format!("unparseable position {:?}", fields[self.columns.pos])))?;

        let raw_end = match self.config.style {
            RecordStyle::Sequence => pos + fields[self.columns.ref_allele].len() as i64 - 1,
            RecordStyle::PositionOnly |
            RecordStyle::SvLength => parse_info_end(fields[self.columns.info]).ok_or_else(|| {
                record_error("INFO does not lead with a parseable END= entry".to_string())
            })?
        };

        // offset correction happens exactly once, here
        let start = pos + self.config.start_offset;
        let end = raw_end + self.config.end_offset;

        let genotype = self.build_genotype(&fields, start, end, &record_error)?;

        self.previous_chromosome = self.span.take().map(|s| s.chrom().to_string());
        self.span = Some(Coordinates::new(chrom, start, end));
        self.genotype = genotype;
        Ok(())
    }

    /// Builds the diploid genotype from the first colon-delimited token of the
    /// sample column; `.` indices become absent alleles.
    fn build_genotype(
        &self,
        fields: &[&str],
        start: i64,
        end: i64,
        record_error: &dyn Fn(String) -> StreamError
    ) -> Result<Genotype, StreamError> {
        let gt_token = fields[self.columns.sample].split(':').next().unwrap_or_default();
        if gt_token.is_empty() {
            return Ok(Genotype::absent());
        }

        let alts: Vec<&str> = fields[self.columns.alt].split(',').collect();
        let span_length = (end - start + 1).max(0) as usize;

        let mut alleles = vec![];
        for token in gt_token.split(['/', '|']) {
            if token == "." {
                alleles.push(Allele::Absent);
                continue;
            }

            let index: usize = token.parse()
                .map_err(|_| record_error(format!("unparseable allele index {token:?}")))?;
            let allele = match self.config.style {
                RecordStyle::Sequence => {
                    if index == 0 {
                        Allele::from_sequence(fields[self.columns.ref_allele].as_bytes().to_vec(), true)
                    } else {
                        let alt = alts.get(index - 1)
                            .ok_or_else(|| record_error(format!("allele index {index} exceeds ALT count {}", alts.len())))?;
                        Allele::from_sequence(alt.as_bytes().to_vec(), false)
                    }
                },
                RecordStyle::PositionOnly => Allele::from_length(span_length, index == 0),
                RecordStyle::SvLength => {
                    if index == 0 {
                        Allele::from_length(span_length, true)
                    } else {
                        let sv_lengths = parse_info_svlen(fields[self.columns.info])
                            .ok_or_else(|| record_error("INFO is missing a parseable SVLEN= entry".to_string()))?;
                        let base_count = sv_lengths.get(index - 1)
                            .ok_or_else(|| record_error(format!("allele index {index} exceeds SVLEN count {}", sv_lengths.len())))?;
                        Allele::from_length(base_count.unsigned_abs() as usize, false)
                    }
                }
            };
            alleles.push(allele);
        }

        Genotype::new(alleles).map_err(|e| record_error(e.to_string()))
    }

    // getters / state mutators used by the synchronizer and driver
    pub fn span(&self) -> Option<&Coordinates> {
        self.span.as_ref()
    }

    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped_count
    }

    /// Counts a record that was advanced past without being compared
    pub fn record_skip(&mut self) {
        self.skipped_count += 1;
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// File name without the directory part, for output metadata
    pub fn name(&self) -> String {
        self.config.path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.config.path.to_string_lossy().to_string())
    }

    pub fn start_offset(&self) -> i64 {
        self.config.start_offset
    }

    pub fn end_offset(&self) -> i64 {
        self.config.end_offset
    }
}

/// Pulls the end position from the leading INFO entry, e.g. `END=1234;...`
fn parse_info_end(info: &str) -> Option<i64> {
    info.split(';').next()?
        .strip_prefix("END=")?
        .parse()
        .ok()
}

/// Pulls the per-ALT base counts from an INFO `SVLEN=` entry
fn parse_info_svlen(info: &str) -> Option<Vec<i64>> {
    let raw = info.split(';')
        .find_map(|entry| entry.strip_prefix("SVLEN="))?;
    raw.split(',')
        .map(|v| v.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const VCF_HEADER: &str = "##fileformat=VCFv4.2\n##source=mock\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tHG001\n";

    fn mock_stream(records: &str, config: StreamConfig) -> Result<TrackedStream, StreamError> {
        let content = format!("{VCF_HEADER}{records}");
        TrackedStream::from_reader(Box::new(Cursor::new(content.into_bytes())), config)
    }

    fn mock_config() -> StreamConfig {
        StreamConfig::new(PathBuf::from("mock.vcf"))
    }

    #[test]
    fn test_sequence_record() {
        let records = "chr1\t100\t.\tAAT\tAAC\t.\tPASS\t.\tGT\t0/1\n";
        let stream = mock_stream(records, mock_config()).unwrap();

        // end = 100 + 3 - 1
        assert_eq!(stream.span(), Some(&Coordinates::new("chr1".to_string(), 100, 102)));
        assert!(!stream.exhausted());
        assert!(!stream.paused());
        assert_eq!(stream.genotype().allele(0), &Allele::from_sequence(b"AAT".to_vec(), true));
        assert_eq!(stream.genotype().allele(1), &Allele::from_sequence(b"AAC".to_vec(), false));
    }

    #[test]
    fn test_offsets_applied_once() {
        let records = "chr1\t100\t.\tAAT\tAAC\t.\tPASS\t.\tGT\t0/1\n";
        let config = mock_config().with_offsets(-1, 2);
        let stream = mock_stream(records, config).unwrap();
        assert_eq!(stream.span(), Some(&Coordinates::new("chr1".to_string(), 99, 104)));
    }

    #[test]
    fn test_multi_alt_genotype() {
        let records = "chr1\t100\t.\tA\tAT,ATT\t.\tPASS\t.\tGT\t1|2\n";
        let stream = mock_stream(records, mock_config()).unwrap();
        assert_eq!(stream.genotype().allele(0), &Allele::from_sequence(b"AT".to_vec(), false));
        assert_eq!(stream.genotype().allele(1), &Allele::from_sequence(b"ATT".to_vec(), false));
    }

    #[test]
    fn test_hemizygous_genotype() {
        let records = "chrX\t100\t.\tA\tAT\t.\tPASS\t.\tGT\t1\n";
        let stream = mock_stream(records, mock_config()).unwrap();
        assert_eq!(stream.genotype().allele(0), &Allele::from_sequence(b"AT".to_vec(), false));
        assert_eq!(stream.genotype().allele(1), &Allele::Absent);
    }

    #[test]
    fn test_missing_allele_indices() {
        let records = "chr1\t100\t.\tA\tAT\t.\tPASS\t.\tGT\t./.\n";
        let stream = mock_stream(records, mock_config()).unwrap();
        assert_eq!(stream.genotype(), &Genotype::absent());
    }

    #[test]
    fn test_position_only_record() {
        let records = "chr1\t100\t.\t.\t.\t.\tPASS\tEND=250;RU=AAG\tGT\t0/1\n";
        let config = mock_config().with_style(RecordStyle::PositionOnly);
        let stream = mock_stream(records, config).unwrap();

        assert_eq!(stream.span(), Some(&Coordinates::new("chr1".to_string(), 100, 250)));
        // span-derived lengths, no sequence text
        assert_eq!(stream.genotype().allele(0), &Allele::from_length(151, true));
        assert_eq!(stream.genotype().allele(1), &Allele::from_length(151, false));
    }

    #[test]
    fn test_svlen_record() {
        let records = "chr1\t100\t.\t.\t.\t.\tPASS\tEND=150;SVLEN=75,30\tGT\t1/2\n";
        let config = mock_config().with_style(RecordStyle::SvLength);
        let stream = mock_stream(records, config).unwrap();

        assert_eq!(stream.genotype().allele(0), &Allele::from_length(75, false));
        assert_eq!(stream.genotype().allele(1), &Allele::from_length(30, false));
    }

    #[test]
    fn test_advance_and_exhaustion() {
        let records = "chr1\t100\t.\tA\tT\t.\tPASS\t.\tGT\t0/1\nchr1\t200\t.\tC\tCG\t.\tPASS\t.\tGT\t1/1\n";
        let mut stream = mock_stream(records, mock_config()).unwrap();

        assert!(stream.advance().unwrap());
        assert_eq!(stream.span(), Some(&Coordinates::new("chr1".to_string(), 200, 200)));
        assert_eq!(stream.genotype().allele(0), &Allele::from_sequence(b"CG".to_vec(), false));

        assert!(!stream.advance().unwrap());
        assert!(stream.exhausted());
        assert_eq!(stream.span(), None);
        assert_eq!(stream.genotype(), &Genotype::absent());

        // further advances stay exhausted
        assert!(!stream.advance().unwrap());
    }

    #[test]
    fn test_order_check() {
        let records = "chr2\t100\t.\tA\tT\t.\tPASS\t.\tGT\t0/1\nchr1\t50\t.\tC\tG\t.\tPASS\t.\tGT\t0/1\n";
        let mut stream = mock_stream(records, mock_config()).unwrap();
        stream.check_order().unwrap();

        assert!(stream.advance().unwrap());
        let result = stream.check_order();
        assert!(matches!(result, Err(StreamError::OrderingViolation { .. })));
    }

    #[test]
    fn test_missing_header() {
        let content = "chr1\t100\t.\tA\tT\t.\tPASS\t.\tGT\t0/1\n";
        let result = TrackedStream::from_reader(
            Box::new(Cursor::new(content.as_bytes().to_vec())), mock_config()
        );
        assert!(matches!(result, Err(StreamError::RecordFormat { .. })));
    }

    #[test]
    fn test_header_only_file() {
        let stream = mock_stream("", mock_config()).unwrap();
        assert!(stream.exhausted());
        assert_eq!(stream.span(), None);
    }

    #[test]
    fn test_unparseable_position() {
        let records = "chr1\toops\t.\tA\tT\t.\tPASS\t.\tGT\t0/1\n";
        let result = mock_stream(records, mock_config());
        assert!(matches!(result, Err(StreamError::RecordFormat { .. })));
    }

    #[test]
    fn test_missing_columns() {
        let records = "chr1\t100\t.\tA\n";
        let result = mock_stream(records, mock_config());
        assert!(matches!(result, Err(StreamError::RecordFormat { .. })));
    }

    #[test]
    fn test_reordered_header_short_line() {
        // INFO mapped after the sample column; a line covering only the sample
        // index must be a format error, not an out-of-bounds panic
        let content = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFORMAT\tHG001\tINFO\n\
                       chr1\t100\t.\tA\tT\t.\tGT\t0/1\n";
        let config = mock_config().with_style(RecordStyle::PositionOnly);
        let result = TrackedStream::from_reader(
            Box::new(Cursor::new(content.as_bytes().to_vec())), config
        );
        assert!(matches!(result, Err(StreamError::RecordFormat { .. })));
    }

    #[test]
    fn test_allele_index_out_of_range() {
        let records = "chr1\t100\t.\tA\tT\t.\tPASS\t.\tGT\t0/2\n";
        let result = mock_stream(records, mock_config());
        assert!(matches!(result, Err(StreamError::RecordFormat { .. })));
    }

    #[test]
    fn test_triploid_rejected() {
        let records = "chr1\t100\t.\tA\tT\t.\tPASS\t.\tGT\t0/1/1\n";
        let result = mock_stream(records, mock_config());
        assert!(matches!(result, Err(StreamError::RecordFormat { .. })));
    }

    #[test]
    fn test_pos_only_missing_end() {
        let records = "chr1\t100\t.\t.\t.\t.\tPASS\tRU=AAG;END=250\tGT\t0/1\n";
        let config = mock_config().with_style(RecordStyle::PositionOnly);
        // END must be the leading INFO entry
        let result = mock_stream(records, config);
        assert!(matches!(result, Err(StreamError::RecordFormat { .. })));
    }

    #[test]
    fn test_record_style_parsing() {
        use std::str::FromStr;
        assert_eq!(RecordStyle::from_str("sequence").unwrap(), RecordStyle::Sequence);
        assert_eq!(RecordStyle::from_str("POS-ONLY").unwrap(), RecordStyle::PositionOnly);
        assert_eq!(RecordStyle::from_str("svlen").unwrap(), RecordStyle::SvLength);
        assert!(RecordStyle::from_str("other").is_err());
    }
}
