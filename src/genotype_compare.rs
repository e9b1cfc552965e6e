
use crate::data_types::alleles::{Allele, Genotype};
use crate::data_types::comp_enums::{DistanceMetric, PairingOrder};
use crate::util::edit_distance::edit_distance;

/// The resolved result of comparing two diploid genotypes
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenotypeComparison {
    /// Sum of the absolute available slot scores; unavailable slots contribute 0
    total: i64,
    /// The two per-slot scores, None where a slot comparison was unavailable
    slot_scores: [Option<i64>; 2],
    /// Which allele pairing produced the result
    order_used: PairingOrder
}

impl GenotypeComparison {
    // getters
    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn slot_scores(&self) -> &[Option<i64>; 2] {
        &self.slot_scores
    }

    pub fn order_used(&self) -> PairingOrder {
        self.order_used
    }
}

/// Compares two alleles under the given metric.
/// Returns None when the metric's preconditions are not met: edit distance
/// needs non-empty {A,C,G,T} sequence text on both sides, the length metric
/// needs both lengths to be positive.
/// # Arguments
/// * `a1` - the first allele
/// * `a2` - the second allele
/// * `metric` - the distance function to apply
pub fn compare_allele(a1: &Allele, a2: &Allele, metric: DistanceMetric) -> Option<i64> {
    match metric {
        DistanceMetric::EditDistance => {
            match (a1.sequence(), a2.sequence()) {
                (Some(s1), Some(s2)) if a1.is_comparable_sequence() && a2.is_comparable_sequence() => {
                    Some(edit_distance(s1, s2) as i64)
                },
                _ => None
            }
        },
        DistanceMetric::Length => {
            if a1.length() > 0 && a2.length() > 0 {
                Some(a1.length() as i64 - a2.length() as i64)
            } else {
                None
            }
        }
    }
}

/// Scores one specific pairing of the two genotypes' allele slots
fn score_pairing(
    gt1: &Genotype, gt2: &Genotype,
    metric: DistanceMetric, order: PairingOrder
) -> GenotypeComparison {
    let slot_scores = match order {
        PairingOrder::Vertical => [
            compare_allele(gt1.allele(0), gt2.allele(0), metric),
            compare_allele(gt1.allele(1), gt2.allele(1), metric)
        ],
        PairingOrder::Cross => [
            compare_allele(gt1.allele(1), gt2.allele(0), metric),
            compare_allele(gt1.allele(0), gt2.allele(1), metric)
        ]
    };

    // unavailable slots rank as 0, they are never reported as 0
    let total = slot_scores.iter()
        .map(|s| s.map_or(0, i64::abs))
        .sum();

    GenotypeComparison {
        total,
        slot_scores,
        order_used: order
    }
}

/// Compares two diploid genotypes, resolving the ambiguous allele pairing.
/// When `known_order` is None, both pairings are scored and the lower total
/// wins; a tie selects Vertical. Passing a previously resolved order skips
/// that resolution so a follow-up metric reuses the same pairing.
/// # Arguments
/// * `gt1` - the first genotype
/// * `gt2` - the second genotype
/// * `metric` - the distance function to apply per allele slot
/// * `known_order` - a pairing already resolved for this genotype pair, if any
pub fn compare_genotypes(
    gt1: &Genotype, gt2: &Genotype,
    metric: DistanceMetric, known_order: Option<PairingOrder>
) -> GenotypeComparison {
    if let Some(order) = known_order {
        return score_pairing(gt1, gt2, metric, order);
    }

    let vertical = score_pairing(gt1, gt2, metric, PairingOrder::Vertical);
    let cross = score_pairing(gt1, gt2, metric, PairingOrder::Cross);

    // the lesser total is assumed to be the correct pairing; ties stay vertical
    if vertical.total <= cross.total {
        vertical
    } else {
        cross
    }
}
