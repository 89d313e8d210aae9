#![crate_name = "punnett"]
use std::fmt;

pub mod prelude;

pub mod distribution;
pub mod survey;

pub type Allele = char;
pub type Gamete = char;
pub type FrequencyTable = Vec<FrequencyRow>;

#[derive(Debug, thiserror::Error)]
pub enum CrossError {
    #[error("genotype must have exactly two letters (e.g. Cc, CC, cc): got {input:?}")]
    InvalidGenotypeFormat { input: String },
}

/// An ordered pair of alleles at a single gene locus.
///
/// Uppercase letters are dominant, lowercase recessive. Values are
/// constructed through `parse()`, which strips whitespace and
/// canonicalizes the pair, so a `Genotype` in hand is always in
/// canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Genotype([Allele; 2]);

impl Genotype {
    /// Parses a free-form genotype string into canonical form.
    ///
    /// All whitespace is stripped first; exactly two characters must
    /// remain or this fails with `InvalidGenotypeFormat`. Heterozygous
    /// pairs are rebuilt from the uppercase letter, so `"cC"` and
    /// `"Cc"` both canonicalize to `Cc`. Two-character input that
    /// matches neither case pattern (digits, punctuation) passes
    /// through unchanged; locus identity is not checked.
    pub fn parse(raw: &str) -> Result<Self, CrossError> {
        let stripped: Vec<Allele> = raw.chars().filter(|c| !c.is_whitespace()).collect();
        match stripped.as_slice() {
            [a, b] => Ok(Self::canonical(*a, *b)),
            _ => Err(CrossError::InvalidGenotypeFormat {
                input: raw.to_string(),
            }),
        }
    }

    fn canonical(a: Allele, b: Allele) -> Self {
        if a.is_uppercase() && b.is_uppercase() {
            Genotype([a, b])
        } else if a.is_lowercase() && b.is_lowercase() {
            Genotype([a, b])
        } else if a.is_uppercase() || b.is_uppercase() {
            let dominant = if a.is_uppercase() { a } else { b };
            Genotype([dominant.to_ascii_uppercase(), dominant.to_ascii_lowercase()])
        } else {
            Genotype([a, b])
        }
    }

    /// The two gametes this genotype can contribute, by locus position.
    pub fn gametes(&self) -> (Gamete, Gamete) {
        (self.0[0], self.0[1])
    }

    pub fn alleles(&self) -> [Allele; 2] {
        self.0
    }

    /// Classifies the observable trait from the dominance pattern.
    ///
    /// Total over any two-character genotype; non-alphabetic pairs
    /// fall through to `Affected`.
    pub fn phenotype(&self) -> Phenotype {
        let [a, b] = self.0;
        if a.is_uppercase() && b.is_uppercase() {
            Phenotype::Normal
        } else if (a.is_uppercase() && b.is_lowercase()) || (a.is_lowercase() && b.is_uppercase()) {
            Phenotype::Carrier
        } else {
            Phenotype::Affected
        }
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.0[0], self.0[1])
    }
}

impl serde::Serialize for Genotype {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The observable trait category for a single-locus genotype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Phenotype {
    Normal,
    Carrier,
    Affected,
}

impl fmt::Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Phenotype::Normal => write!(f, "Normal"),
            Phenotype::Carrier => write!(f, "Carrier"),
            Phenotype::Affected => write!(f, "Affected"),
        }
    }
}

/// The 2x2 tabulation of offspring genotypes from two parents.
///
/// Row index follows parent 1's allele position, column index parent
/// 2's. Cell (i, j) is the canonicalized combination of parent 1's
/// i-th gamete and parent 2's j-th gamete.
#[derive(Debug, Clone, PartialEq)]
pub struct PunnettGrid {
    cells: ndarray::Array2<Genotype>,
}

impl PunnettGrid {
    fn from_parents(parent1: &Genotype, parent2: &Genotype) -> Self {
        let (a0, a1) = parent1.gametes();
        let (b0, b1) = parent2.gametes();
        Self {
            cells: ndarray::arr2(&[
                [Genotype::canonical(a0, b0), Genotype::canonical(a0, b1)],
                [Genotype::canonical(a1, b0), Genotype::canonical(a1, b1)],
            ]),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> &Genotype {
        &self.cells[[row, col]]
    }

    /// The four offspring genotypes in row-major order.
    pub fn flatten(&self) -> Vec<Genotype> {
        self.cells.iter().copied().collect()
    }
}

/// One group of the frequency table: a distinct offspring genotype
/// with its count out of 4, probability in percent, and phenotype.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FrequencyRow {
    #[serde(rename = "Genotype")]
    pub genotype: Genotype,
    #[serde(rename = "Count")]
    pub count: u32,
    #[serde(rename = "Probability (%)")]
    pub probability: f64,
    #[serde(rename = "Phenotype")]
    pub phenotype: Phenotype,
}

pub struct CrossOutcome {
    pub grid: PunnettGrid,
    pub table: FrequencyTable,
}

/// Crosses two parental genotype strings.
///
/// Canonicalizes both parents, builds the Punnett grid, and groups the
/// four offspring by genotype in first-occurrence order. Counts sum to
/// 4 and probabilities to 100. Fails with `InvalidGenotypeFormat` if
/// either parent string is malformed; no partial result is produced.
pub fn cross(parent1: &str, parent2: &str) -> Result<CrossOutcome, CrossError> {
    let p1 = Genotype::parse(parent1)?;
    let p2 = Genotype::parse(parent2)?;
    let grid = PunnettGrid::from_parents(&p1, &p2);

    let mut table = FrequencyTable::new();
    for child in grid.flatten() {
        match table.iter_mut().find(|row| row.genotype == child) {
            Some(row) => row.count += 1,
            None => table.push(FrequencyRow {
                genotype: child,
                count: 1,
                probability: 0.0,
                phenotype: child.phenotype(),
            }),
        }
    }
    for row in table.iter_mut() {
        row.probability = f64::from(row.count) / 4.0 * 100.0;
    }

    Ok(CrossOutcome { grid, table })
}
