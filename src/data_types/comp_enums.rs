
/// The two possible ways to align two diploid genotypes' allele slots.
/// Upstream tools do not agree on haplotype ordering, so the comparator
/// has to resolve which pairing to score.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum_macros::AsRefStr)]
pub enum PairingOrder {
    /// A1 vs B1 and A2 vs B2
    #[strum(serialize = "VERT")]
    Vertical,
    /// A2 vs B1 and A1 vs B2
    #[strum(serialize = "CROSS")]
    Cross
}

/// Per-allele distance functions supported by the comparator
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DistanceMetric {
    /// Levenshtein distance over sequence text; only applies when both
    /// sequences are non-empty and purely {A,C,G,T}
    EditDistance,
    /// Signed allele length difference; only applies when both lengths are positive
    Length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_labels() {
        assert_eq!(PairingOrder::Vertical.as_ref(), "VERT");
        assert_eq!(PairingOrder::Cross.as_ref(), "CROSS");
    }
}
