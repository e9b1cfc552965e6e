
use crate::data_types::coordinates::Coordinates;
use crate::parsing::vcf_stream::{StreamError, TrackedStream};

/// Positions one stream relative to a reference interval: records entirely
/// before the interval are skipped (counted), and the stream is paused when
/// its current record lies entirely after the interval. Exhausted streams
/// always end up paused. Chromosome names compare as ASCII strings, matching
/// the required input sort.
/// # Arguments
/// * `stream` - the stream to position, mutated in place
/// * `interval` - the reference interval being processed
/// # Errors
/// * if an out-of-order record is encountered or reading fails
pub fn synchronize(stream: &mut TrackedStream, interval: &Coordinates) -> Result<(), StreamError> {
    stream.check_order()?;

    // catch-up: the current record ends before the interval starts
    loop {
        let span = match stream.span() {
            Some(s) => s,
            None => {
                stream.set_paused(true);
                return Ok(());
            }
        };

        let behind = (span.chrom() == interval.chrom() && span.end() < interval.start())
            || span.chrom() < interval.chrom();
        if !behind {
            break;
        }

        stream.advance()?;
        stream.check_order()?;
        stream.record_skip();
    }

    let span = match stream.span() {
        Some(s) => s,
        None => {
            stream.set_paused(true);
            return Ok(());
        }
    };

    // ahead: the current record starts after the interval ends, so it is held
    // back for a later interval
    let ahead = (span.chrom() == interval.chrom() && span.start() > interval.end())
        || span.chrom() > interval.chrom();
    stream.set_paused(ahead);
    Ok(())
}
