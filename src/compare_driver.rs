
use anyhow::Context;
use itertools::Itertools;
use log::{debug, warn};

use crate::data_types::comp_enums::DistanceMetric;
use crate::data_types::interval_report::{OffsetPair, PairComparison};
use crate::genotype_compare::compare_genotypes;
use crate::parsing::catalog::CatalogReader;
use crate::parsing::vcf_stream::TrackedStream;
use crate::stream_sync::synchronize;
use crate::writers::catalog_offsets::CatalogOffsetWriter;
use crate::writers::pairwise_table::PairwiseWriter;

/// Knobs for the main comparison loop
#[derive(derive_builder::Builder, Clone, Debug)]
#[builder(default)]
pub struct DriverConfig {
    /// Catalog offsets strictly greater than this trigger a warning
    pub max_offset_warning: i64
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_offset_warning: 500
        }
    }
}

/// Counters reported after the comparison loop finishes
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Serialize)]
pub struct RunSummary {
    /// Catalog intervals that were processed
    pub intervals_processed: u64,
    /// Catalog offsets that exceeded the warning threshold
    pub large_offset_warnings: u64
}

/// Runs the full comparison loop: for each catalog interval in order, every
/// stream is synchronized, catalog offsets and pairwise comparisons are
/// written, and the participating streams move on. The loop is strictly
/// sequential; each stream's file is read exactly once, front to back.
/// # Arguments
/// * `catalog` - the reference interval catalog, already positioned on its first interval
/// * `streams` - the tracked streams, in output column order
/// * `offset_writer` - receives one catalog offset row per interval
/// * `pairwise_writer` - receives one pairwise comparison row per interval
/// * `config` - loop knobs
/// # Errors
/// * if any stream or catalog read fails, an out-of-order record is found, or a row does not write
pub fn run_comparisons(
    catalog: &mut CatalogReader,
    streams: &mut [TrackedStream],
    offset_writer: &mut CatalogOffsetWriter,
    pairwise_writer: &mut PairwiseWriter,
    config: &DriverConfig
) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary::default();

    while let Some(interval) = catalog.current().cloned() {
        debug!("interval = {interval}");
        for stream in streams.iter_mut() {
            synchronize(stream, &interval)
                .with_context(|| format!("Error while synchronizing {:?} to {interval}:", stream.path()))?;
        }

        // catalog offsets, stream minus catalog; a paused stream sits ahead of
        // this interval and contributes nothing here
        let offsets: Vec<OffsetPair> = streams.iter()
            .map(|stream| {
                if stream.paused() {
                    None
                } else {
                    stream.span().map(|span| {
                        (span.start() - interval.start(), span.end() - interval.end())
                    })
                }
            })
            .collect();
        for (i, offset_pair) in offsets.iter().enumerate() {
            if let Some((start_offset, end_offset)) = offset_pair {
                if *start_offset > config.max_offset_warning || *end_offset > config.max_offset_warning {
                    warn!("Large offset for stream {i} at {interval}: start {start_offset}, end {end_offset}");
                    summary.large_offset_warnings += 1;
                }
            }
        }
        offset_writer.write_row(&interval, &offsets)?;

        // pairwise comparisons over every unordered stream pair; the edit
        // distance resolves the allele pairing and the length metric reuses it
        let comparisons: Vec<Option<PairComparison>> = (0..streams.len()).tuple_combinations()
            .map(|(i, j)| {
                let (stream1, stream2) = (&streams[i], &streams[j]);
                if stream1.paused() || stream2.paused() {
                    return None;
                }
                let span1 = stream1.span()?;
                let span2 = stream2.span()?;

                let edit = compare_genotypes(
                    stream1.genotype(), stream2.genotype(),
                    DistanceMetric::EditDistance, None
                );
                let length = compare_genotypes(
                    stream1.genotype(), stream2.genotype(),
                    DistanceMetric::Length, Some(edit.order_used())
                );
                Some(PairComparison::new(
                    span1.start() - span2.start(),
                    span1.end() - span2.end(),
                    *edit.slot_scores(),
                    *length.slot_scores(),
                    edit.order_used()
                ))
            })
            .collect();
        pairwise_writer.write_row(&interval, &comparisons)?;

        // participating streams move on; paused streams hold their record for
        // a later interval
        for stream in streams.iter_mut() {
            if !stream.paused() {
                stream.advance()
                    .with_context(|| format!("Error while advancing {:?}:", stream.path()))?;
            }
        }

        summary.intervals_processed += 1;
        catalog.advance()?;
    }

    // post-run diagnostics
    for stream in streams.iter() {
        if !stream.exhausted() {
            warn!("Stream {:?} still has records after the last catalog interval", stream.path());
        }
        if stream.skipped_count() > 0 {
            warn!("Stream {:?} skipped {} record(s) matching no catalog interval", stream.path(), stream.skipped_count());
        }
    }

    Ok(summary)
}
