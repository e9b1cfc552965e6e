
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::data_types::coordinates::Coordinates;
use crate::parsing::text_io::open_text_reader;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("error while opening catalog {path:?}: {source}")]
    OpenFailure { path: PathBuf, source: std::io::Error },
    #[error("error while reading catalog {path:?}: {source}")]
    ReadFailure { path: PathBuf, source: std::io::Error },
    #[error("malformed catalog record in {path:?}: {reason}; line: {line:?}")]
    RecordFormat { path: PathBuf, reason: String, line: String }
}

/// Sequential reader over the reference interval catalog: tab-separated
/// `chrom start end ...` rows, optionally gzip-compressed, with `#`-prefixed
/// header lines. Callers must provide the rows sorted by (chrom ASCII, start);
/// that ordering is a contract, not something this reader verifies.
pub struct CatalogReader {
    /// Path we opened, kept for error reporting
    path: PathBuf,
    /// Dropped (closing the file) once the catalog is exhausted
    reader: Option<Box<dyn BufRead>>,
    /// The interval currently being processed, None once exhausted
    current: Option<Coordinates>
}

impl CatalogReader {
    /// Opens the catalog and loads the first interval.
    /// # Arguments
    /// * `filename` - path to the catalog file, plain or `.gz`
    /// # Errors
    /// * if the file does not open or the first record is malformed
    pub fn new(filename: &Path) -> Result<Self, CatalogError> {
        let reader = open_text_reader(filename)
            .map_err(|source| CatalogError::OpenFailure { path: filename.to_path_buf(), source })?;

        let mut result = Self {
            path: filename.to_path_buf(),
            reader: Some(reader),
            current: None
        };
        result.advance()?;
        Ok(result)
    }

    /// Moves to the next catalog interval, skipping `#`-prefixed lines.
    /// Returns false once the catalog is exhausted.
    /// # Errors
    /// * if reading fails or a record does not parse
    pub fn advance(&mut self) -> Result<bool, CatalogError> {
        let reader = match self.reader.as_mut() {
            Some(r) => r,
            None => return Ok(false)
        };

        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line)
                .map_err(|source| CatalogError::ReadFailure { path: self.path.clone(), source })?;
            if bytes_read == 0 {
                // end of the catalog, release the file handle
                self.reader = None;
                self.current = None;
                return Ok(false);
            }

            let trimmed = line.trim_end();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            self.current = Some(self.parse_interval(trimmed)?);
            return Ok(true);
        }
    }

    fn parse_interval(&self, line: &str) -> Result<Coordinates, CatalogError> {
        let record_error = |reason: &str| CatalogError::RecordFormat {
            path: self.path.clone(),
            reason: reason.to_string(),
            line: line.to_string()
        };

        let mut fields = line.split('\t');
        let chrom = fields.next()
            .ok_or_else(|| record_error("missing chromosome column"))?;
        let start: i64 = fields.next()
            .ok_or_else(|| record_error("missing start column"))?
            .parse()
            .map_err(|_| record_error("unparseable start position"))?;
        let end: i64 = fields.next()
            .ok_or_else(|| record_error("missing end column"))?
            .parse()
            .map_err(|_| record_error("unparseable end position"))?;

        Ok(Coordinates::new(chrom.to_string(), start, end))
    }

    /// The interval currently being processed, None once exhausted
    pub fn current(&self) -> Option<&Coordinates> {
        self.current.as_ref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.current.is_none()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
