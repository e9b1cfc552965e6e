
use log::{error, info, LevelFilter};
use std::time::Instant;

use trconcord::cli::compare::{check_compare_settings, CompareSettings};
use trconcord::cli::core::{get_cli, Commands};
use trconcord::compare_driver::{run_comparisons, DriverConfigBuilder};
use trconcord::parsing::catalog::CatalogReader;
use trconcord::parsing::vcf_stream::TrackedStream;
use trconcord::util::json_io::save_json;
use trconcord::writers::catalog_offsets::CatalogOffsetWriter;
use trconcord::writers::pairwise_table::PairwiseWriter;
use trconcord::writers::stream_table::StreamDescription;

fn run_compare(settings: CompareSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let (settings, stream_configs) = match check_compare_settings(settings) {
        Ok(sc) => sc,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // create the primary output folder
    info!("Creating output folder at {:?}...", settings.output_folder);
    match std::fs::create_dir_all(&settings.output_folder) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while creating output folder: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // save the CLI options
    let cli_json = settings.output_folder.join("cli_settings.json");
    info!("Saving CLI options to {cli_json:?}...");
    if let Err(e) = save_json(&settings, &cli_json) {
        error!("Error while saving CLI options: {e}");
        std::process::exit(exitcode::IOERR);
    }

    // open the catalog and every input stream
    info!("Opening catalog and input streams...");
    let mut catalog = match CatalogReader::new(&settings.catalog_filename) {
        Ok(c) => c,
        Err(e) => {
            error!("Error while opening catalog: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
    let mut streams: Vec<TrackedStream> = vec![];
    for config in stream_configs.into_iter() {
        match TrackedStream::open(config) {
            Ok(s) => streams.push(s),
            Err(e) => {
                error!("Error while opening input stream: {e}");
                std::process::exit(exitcode::IOERR);
            }
        }
    }
    let descriptions: Vec<StreamDescription> = streams.iter()
        .map(StreamDescription::from_stream)
        .collect();

    // build our configuration
    let driver_config = match DriverConfigBuilder::default()
        .max_offset_warning(settings.offset_warning)
        .build() {
        Ok(dc) => dc,
        Err(e) => {
            error!("Error while building driver config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    // open the two output tables; from here on every fatal exit must flush
    // and drop both writers first or the gzip outputs are left unreadable
    let offsets_fn = settings.output_folder.join("catalog_offsets.tsv.gz");
    let mut offset_writer = match CatalogOffsetWriter::new(&offsets_fn, &descriptions) {
        Ok(w) => w,
        Err(e) => {
            error!("Error while opening {offsets_fn:?}: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };
    let pairwise_fn = settings.output_folder.join("pairwise_comparison.tsv.gz");
    let mut pairwise_writer = match PairwiseWriter::new(&pairwise_fn, &descriptions) {
        Ok(w) => w,
        Err(e) => {
            error!("Error while opening {pairwise_fn:?}: {e:#}");
            drop(offset_writer);
            std::process::exit(exitcode::IOERR);
        }
    };

    // run the main loop
    info!("Comparing streams across the catalog...");
    let run_result = run_comparisons(
        &mut catalog, &mut streams, &mut offset_writer, &mut pairwise_writer, &driver_config
    );

    // flush and close both outputs before acting on the run result, so the
    // rows written ahead of a fatal error stay readable
    let finish_result = offset_writer.finish().and(pairwise_writer.finish());
    drop(offset_writer);
    drop(pairwise_writer);

    let summary = match run_result {
        Ok(s) => s,
        Err(e) => {
            error!("Error while comparing streams: {e:#}");
            std::process::exit(exitcode::DATAERR);
        }
    };
    if let Err(e) = finish_result {
        error!("Error while finalizing output files: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    info!("Catalog intervals processed: {}", summary.intervals_processed);
    if summary.large_offset_warnings > 0 {
        info!("Large offset warnings: {}", summary.large_offset_warnings);
    }
    info!("Comparisons completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Compare(settings) => {
            run_compare(*settings);
        }
    }

    info!("Process finished successfully.");
}
