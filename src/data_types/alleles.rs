
/// The nucleotide alphabet that sequence-level comparisons are restricted to
const ALLOWED_BASES: &[u8] = b"ACGT";

/// A single allele of a diploid genotype.
/// An `Absent` allele (uncalled, e.g. the second slot of a hemizygous call) is
/// structurally distinct from a present allele with no usable sequence text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Allele {
    Present {
        /// The allele sequence; None for position-only callers that never expose REF/ALT text
        sequence: Option<Vec<u8>>,
        /// True if this allele is a copy of the reference (GT index 0)
        is_reference_copy: bool,
        /// Allele length, derived independently of `sequence` so that
        /// length comparisons work even without sequence text
        length: usize
    },
    Absent
}

impl Allele {
    /// Creates an allele backed by sequence text; length is the sequence length.
    /// # Arguments
    /// * `sequence` - the allele sequence as reported by the caller
    /// * `is_reference_copy` - true if this is the REF allele
    pub fn from_sequence(sequence: Vec<u8>, is_reference_copy: bool) -> Self {
        let length = sequence.len();
        Self::Present {
            sequence: Some(sequence),
            is_reference_copy,
            length
        }
    }

    /// Creates a sequence-free allele with an independently derived length,
    /// e.g. from the record span or a base-count INFO field.
    /// # Arguments
    /// * `length` - the derived allele length
    /// * `is_reference_copy` - true if this is the REF allele
    pub fn from_length(length: usize, is_reference_copy: bool) -> Self {
        Self::Present {
            sequence: None,
            is_reference_copy,
            length
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    /// Returns the sequence text if this allele carries any
    pub fn sequence(&self) -> Option<&[u8]> {
        match self {
            Self::Present { sequence, .. } => sequence.as_deref(),
            Self::Absent => None
        }
    }

    /// Returns the allele length; an absent allele has length 0
    pub fn length(&self) -> usize {
        match self {
            Self::Present { length, .. } => *length,
            Self::Absent => 0
        }
    }

    /// True if this allele has non-empty sequence text drawn purely from {A,C,G,T},
    /// the precondition for edit-distance comparison
    pub fn is_comparable_sequence(&self) -> bool {
        match self.sequence() {
            Some(seq) => !seq.is_empty() && seq.iter().all(|b| ALLOWED_BASES.contains(b)),
            None => false
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GenotypeError {
    #[error("genotype reports {count} allele indices, at most 2 are supported")]
    TooManyAlleles { count: usize }
}

/// A diploid genotype: always exactly two allele slots.
/// Hemizygous calls are right-padded with `Allele::Absent` at construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Genotype {
    alleles: [Allele; 2]
}

impl Genotype {
    /// Builds a genotype from the alleles a record reported, padding to 2 slots.
    /// # Arguments
    /// * `alleles` - 0, 1, or 2 alleles in caller order
    /// # Errors
    /// * if more than 2 alleles are provided
    pub fn new(alleles: Vec<Allele>) -> Result<Self, GenotypeError> {
        if alleles.len() > 2 {
            return Err(GenotypeError::TooManyAlleles { count: alleles.len() });
        }

        let mut iter = alleles.into_iter();
        let a0 = iter.next().unwrap_or(Allele::Absent);
        let a1 = iter.next().unwrap_or(Allele::Absent);
        Ok(Self {
            alleles: [a0, a1]
        })
    }

    /// A genotype with both slots absent, used for exhausted streams
    pub fn absent() -> Self {
        Self {
            alleles: [Allele::Absent, Allele::Absent]
        }
    }

    /// Returns the allele in the given slot
    /// # Panics
    /// * if `slot` is not 0 or 1
    pub fn allele(&self, slot: usize) -> &Allele {
        &self.alleles[slot]
    }
}
