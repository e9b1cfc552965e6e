
/// Catalog-vs-stream offset table output
pub mod catalog_offsets;
/// Pairwise stream comparison table output
pub mod pairwise_table;
/// Shared output plumbing: stream descriptions, gz-aware handles, NA cells
pub mod stream_table;
