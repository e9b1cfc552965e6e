
use anyhow::{anyhow, bail, Context};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::parsing::vcf_stream::{RecordStyle, StreamConfig};

/// Loads a batch of stream configurations from a TSV manifest with no header.
/// Columns: file path (required), start offset, end offset, record style;
/// omitted trailing columns default to zero offsets and the sequence style.
/// Relative paths are resolved against the manifest's folder.
/// # Arguments
/// * `manifest_fn` - path to the TSV manifest
/// # Errors
/// * if the manifest does not open or a row does not parse
pub fn load_input_manifest(manifest_fn: &Path) -> anyhow::Result<Vec<StreamConfig>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false) // no headers in the file, disable so we do not skip first row
        .flexible(true) // trailing columns are optional
        .from_path(manifest_fn)
        .with_context(|| format!("Error while opening {manifest_fn:?}:"))?;

    let manifest_folder = match manifest_fn.parent() {
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::default()
    };

    let mut configs = vec![];
    for result in csv_reader.records() {
        let row = result.with_context(|| format!("Error while reading {manifest_fn:?}"))?;

        let filename = row.get(0).ok_or(anyhow!("Missing filename on row: {row:?}"))?;
        if filename.is_empty() {
            bail!("Empty filename on row: {row:?}");
        }
        let raw_path = PathBuf::from(filename);
        let full_path = if raw_path.has_root() {
            raw_path
        } else {
            // the normal approach, relative to the manifest
            manifest_folder.join(raw_path)
        };

        let start_offset: i64 = match row.get(1) {
            Some(v) if !v.is_empty() => v.parse()
                .with_context(|| format!("Error while parsing start offset on row: {row:?}"))?,
            _ => 0
        };
        let end_offset: i64 = match row.get(2) {
            Some(v) if !v.is_empty() => v.parse()
                .with_context(|| format!("Error while parsing end offset on row: {row:?}"))?,
            _ => 0
        };
        let style = match row.get(3) {
            Some(v) if !v.is_empty() => RecordStyle::from_str(v)
                .map_err(|_| anyhow!("Unknown record style {v:?} on row: {row:?}"))?,
            _ => RecordStyle::default()
        };

        configs.push(
            StreamConfig::new(full_path)
                .with_offsets(start_offset, end_offset)
                .with_style(style)
        );
    }

    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_manifest_loading() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_fn = dir.path().join("inputs.tsv");
        let mut manifest = std::fs::File::create(&manifest_fn).unwrap();
        writeln!(manifest, "caller_a.vcf.gz").unwrap();
        writeln!(manifest, "caller_b.vcf.gz\t-1\t0").unwrap();
        writeln!(manifest, "/abs/caller_c.vcf\t0\t1\tpos-only").unwrap();
        writeln!(manifest, "caller_d.vcf\t0\t0\tsvlen").unwrap();
        manifest.flush().unwrap();

        let configs = load_input_manifest(&manifest_fn).unwrap();
        assert_eq!(configs.len(), 4);

        assert_eq!(configs[0].path, dir.path().join("caller_a.vcf.gz"));
        assert_eq!((configs[0].start_offset, configs[0].end_offset), (0, 0));
        assert_eq!(configs[0].style, RecordStyle::Sequence);

        assert_eq!((configs[1].start_offset, configs[1].end_offset), (-1, 0));

        // absolute paths stay as given
        assert_eq!(configs[2].path, PathBuf::from("/abs/caller_c.vcf"));
        assert_eq!(configs[2].style, RecordStyle::PositionOnly);

        assert_eq!(configs[3].style, RecordStyle::SvLength);
    }

    #[test]
    fn test_bad_offset() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_fn = dir.path().join("inputs.tsv");
        std::fs::write(&manifest_fn, "caller_a.vcf\toops\n").unwrap();
        assert!(load_input_manifest(&manifest_fn).is_err());
    }

    #[test]
    fn test_unknown_style() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_fn = dir.path().join("inputs.tsv");
        std::fs::write(&manifest_fn, "caller_a.vcf\t0\t0\tmystery\n").unwrap();
        assert!(load_input_manifest(&manifest_fn).is_err());
    }

    #[test]
    fn test_missing_manifest() {
        assert!(load_input_manifest(Path::new("/no/such/manifest.tsv")).is_err());
    }
}
