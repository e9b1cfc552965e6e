
/// A genomic span: chromosome plus inclusive start/end coordinates.
/// Positions are signed because per-stream offset correction can push a
/// coordinate below zero on malformed-but-parseable inputs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Coordinates {
    /// Chromosome / contig name
    chrom: String,
    /// First position of the span, inclusive
    start: i64,
    /// Last position of the span, inclusive
    end: i64
}

impl Coordinates {
    pub fn new(chrom: String, start: i64, end: i64) -> Self {
        Self {
            chrom, start, end
        }
    }

    // getters
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}
