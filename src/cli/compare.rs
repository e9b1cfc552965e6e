
use anyhow::bail;
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_optional_filename, check_required_filename, AFTER_HELP, FULL_VERSION};
use crate::parsing::input_manifest::load_input_manifest;
use crate::parsing::vcf_stream::StreamConfig;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct CompareSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    trconcord_version: String,

    /// Reference interval catalog (BED)
    #[clap(required = true)]
    #[clap(short = 'b')]
    #[clap(long = "catalog")]
    #[clap(value_name = "BED")]
    #[clap(help_heading = Some("Input/Output"))]
    pub catalog_filename: PathBuf,

    /// Variant call file to compare (VCF); repeat for each input, all with zero offsets and sequence-style records
    #[clap(long = "vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub vcf_filenames: Vec<PathBuf>,

    /// Input manifest (TSV): file path, start offset, end offset, record style per row
    #[clap(short = 'i')]
    #[clap(long = "input-list")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_list: Option<PathBuf>,

    /// Output directory containing the offset and pairwise comparison tables
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-dir")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_folder: PathBuf,

    /// Catalog offsets greater than this trigger a warning
    #[clap(long = "offset-warning")]
    #[clap(value_name = "BP")]
    #[clap(help_heading = Some("Compare parameters"))]
    #[clap(default_value = "500")]
    pub offset_warning: i64,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8
}

/// Validates the settings, logs them, and assembles the full stream
/// configuration list from the direct `--vcf` inputs and the manifest.
pub fn check_compare_settings(mut settings: CompareSettings) -> anyhow::Result<(CompareSettings, Vec<StreamConfig>)> {
    // hard code the version in
    settings.trconcord_version = FULL_VERSION.clone();
    info!("Trconcord version: {:?}", &settings.trconcord_version);
    info!("Sub-command: compare");
    info!("Inputs:");

    // check for all the required input files
    check_required_filename(&settings.catalog_filename, "Catalog BED")?;
    check_optional_filename(settings.input_list.as_deref(), "Input list")?;
    info!("\tCatalog BED: {:?}", &settings.catalog_filename);

    // direct inputs first, then the manifest entries
    let mut stream_configs: Vec<StreamConfig> = settings.vcf_filenames.iter()
        .map(|path| StreamConfig::new(path.clone()))
        .collect();
    if let Some(manifest_fn) = settings.input_list.as_deref() {
        info!("\tInput list: {manifest_fn:?}");
        stream_configs.extend(load_input_manifest(manifest_fn)?);
    }

    if stream_configs.is_empty() {
        bail!("At least one input is required via --vcf or --input-list");
    }
    for (i, config) in stream_configs.iter().enumerate() {
        check_required_filename(&config.path, "Input VCF")?;
        info!(
            "\tStream {i}: {:?}, offsets ({}, {}), style {:?}",
            &config.path, config.start_offset, config.end_offset, config.style
        );
    }

    // outputs
    info!("Outputs:");
    info!("\tOutput folder: {:?}", &settings.output_folder);

    // other misc parameters
    info!("Compare parameters:");
    if settings.offset_warning <= 0 {
        bail!("--offset-warning must be >0");
    }
    info!("\tOffset warning threshold: {}", settings.offset_warning);

    Ok((settings, stream_configs))
}
