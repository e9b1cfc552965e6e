
use crate::data_types::comp_enums::PairingOrder;

/// Start/end positional offsets of one span relative to another.
/// `None` means the comparison was not available this cycle (paused or
/// exhausted stream), rendered as `NA` in the outputs.
pub type OffsetPair = Option<(i64, i64)>;

/// The full pairwise result for two eligible streams at one catalog interval
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PairComparison {
    /// First stream start - second stream start
    start_offset: i64,
    /// First stream end - second stream end
    end_offset: i64,
    /// Per-slot edit distances, None where a slot was unavailable
    edit_slots: [Option<i64>; 2],
    /// Per-slot signed length differences, None where a slot was unavailable
    length_slots: [Option<i64>; 2],
    /// The allele pairing that was selected by the edit-distance comparison
    /// and reused by the length comparison
    order_used: PairingOrder
}

impl PairComparison {
    pub fn new(
        start_offset: i64, end_offset: i64,
        edit_slots: [Option<i64>; 2], length_slots: [Option<i64>; 2],
        order_used: PairingOrder
    ) -> Self {
        Self {
            start_offset, end_offset,
            edit_slots, length_slots,
            order_used
        }
    }

    // getters
    pub fn start_offset(&self) -> i64 {
        self.start_offset
    }

    pub fn end_offset(&self) -> i64 {
        self.end_offset
    }

    pub fn edit_slots(&self) -> &[Option<i64>; 2] {
        &self.edit_slots
    }

    pub fn length_slots(&self) -> &[Option<i64>; 2] {
        &self.length_slots
    }

    pub fn order_used(&self) -> PairingOrder {
        self.order_used
    }
}
