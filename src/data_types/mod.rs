
/// Allele and diploid genotype representations
pub mod alleles;
/// Pairing order and distance metric enumerations
pub mod comp_enums;
/// Wrapper for coordinates with some additional functionalities
pub mod coordinates;
/// Per-interval comparison results that flow from the driver to the writers
pub mod interval_report;
