
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Opens a line-oriented reader over a plain or gzip-compressed text file,
/// keyed on the `.gz` extension.
/// # Arguments
/// * `filename` - the file path to open
/// # Errors
/// * if the file does not open properly
pub fn open_text_reader(filename: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(filename)?;
    let reader: Box<dyn BufRead> = if filename.extension().unwrap_or_default() == "gz" {
        Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}
