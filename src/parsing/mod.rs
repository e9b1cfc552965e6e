
/// Sequential reader over the reference interval catalog
pub mod catalog;
/// Batch loading of stream configurations from a TSV manifest
pub mod input_manifest;
/// Shared plain/gzip text reader construction
pub mod text_io;
/// Tracked variant call streams and their record parsing strategies
pub mod vcf_stream;
