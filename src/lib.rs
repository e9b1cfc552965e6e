
/// Command line interface functionality
pub mod cli;
/// The main per-interval comparison loop
pub mod compare_driver;
/// Contains various shared data types
pub mod data_types;
/// Diploid genotype comparison with allele pairing resolution
pub mod genotype_compare;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Positions streams relative to catalog intervals
pub mod stream_sync;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
